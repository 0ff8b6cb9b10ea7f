//! Messages exchanged between the scheduler, game states and the audio
//! thread.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`gamestate`] – deferred push/pop requests for the state stack
//! - [`input`] – abstract input actions and press/release events
pub mod audio;
pub mod gamestate;
pub mod input;
