//! Engine systems.
//!
//! Free functions that advance one subworld by one tick, plus draw extraction
//! and the audio backend loop. The gameplay state runs them in this order:
//!
//! 1. [`input::control_player`] – steer the player from [`InputState`](crate::resources::input::InputState)
//! 2. [`gravity::apply_gravity`] – downward acceleration, clamped
//! 3. [`movement::integrate`] – `position += velocity`
//! 4. [`collision::resolve_tiles`] – push hitboxes out of solid tiles, set ground/water flags
//! 5. [`state::select`] – pick each entity's movement state
//! 6. [`animation::advance`] – switch and advance animations
//! 7. [`timers::tick`] – count down entity timers
//! 8. [`camera::follow_target`] – keep the camera on the player
//!
//! Submodules overview
//! - [`audio`] – entity voice bookkeeping and the null audio backend thread
//! - [`render`] – draw command extraction for backgrounds, tiles and entities
//! - [`spawn`] – build an entity from its definition

pub mod animation;
pub mod audio;
pub mod camera;
pub mod collision;
pub mod gravity;
pub mod input;
pub mod movement;
pub mod render;
pub mod spawn;
pub mod state;
pub mod timers;
