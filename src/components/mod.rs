//! Per-entity component data.
//!
//! Each type here lives in its own table inside
//! [`EntityStore`](crate::ecs::EntityStore) and is attached selectively: an
//! entity only has the components its definition (archetype) gives it.
//!
//! Submodules overview:
//! - [`animation`] – frame sequences per named state and frame resolution from time
//! - [`audio`] – voices an entity keeps playing
//! - [`collision`] – hitbox and tile contacts
//! - [`direction`] – facing direction
//! - [`flags`] – gravity/ground/water bit set
//! - [`info`] – definition kind and instance name
//! - [`position`] – world-space position in tiles
//! - [`render`] – animation cursor and draw layer
//! - [`state`] – movement state (idle, walk, swim, ...)
//! - [`timers`] – named countdowns
//! - [`velocity`] – tiles per tick

pub mod animation;
pub mod audio;
pub mod collision;
pub mod direction;
pub mod flags;
pub mod info;
pub mod position;
pub mod render;
pub mod state;
pub mod timers;
pub mod velocity;
