//! Scroll engine library.
//!
//! Simulation core of a side-scrolling platformer: an entity/component
//! store, chunked tile worlds, content loading and a fixed-step scheduler
//! driving a stack of game states. Rendering, audio mixing and windowing sit
//! behind the [`systems::render::Renderer`] trait and the audio channel
//! bridge.

pub mod components;
pub mod ecs;
pub mod error;
pub mod events;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod states;
pub mod systems;
