//! Game states.
//!
//! The scheduler keeps a stack of [`GameState`]s. Every state on the stack is
//! updated and drawn each tick/frame, bottom to top; input goes to the top
//! first and stops at the first state that consumes it. Stack changes are
//! requested through [`StateContext::events`] and applied on the next tick.
//!
//! ```text
//! Intro ──> MainMenu ──> BaseGame ──> WorldMap ──> Gameplay
//!                             └──────────────────> Gameplay   (start level set)
//! ```
//!
//! Pausing is cooperative: [`GameState::pause`] and [`GameState::resume`]
//! only flip the state's own flag, and each state decides what that means in
//! its `update`.

pub mod basegame;
pub mod gameplay;
pub mod intro;
pub mod mainmenu;
pub mod worldmap;

use crate::events::audio::AudioMessage;
use crate::events::gamestate::StateQueue;
use crate::events::input::InputEvent;
use crate::resources::assets::AssetSource;
use crate::resources::audio::AudioBridge;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::render::Renderer;

use basegame::{BaseGame, Session};
use gameplay::Gameplay;
use intro::Intro;
use mainmenu::MainMenu;
use worldmap::WorldMap;

/// Collaborators a state may use while entering, updating or handling input.
pub struct StateContext<'a> {
    /// Deferred push/pop requests.
    pub events: &'a mut StateQueue,
    pub input: &'a InputState,
    pub audio: &'a mut AudioBridge,
    /// Messages the audio thread sent since the previous tick.
    pub audio_messages: &'a [AudioMessage],
    pub assets: &'a dyn AssetSource,
    pub config: &'a GameConfig,
    pub time: &'a WorldTime,
    pub quit: &'a mut bool,
}

impl StateContext<'_> {
    /// Ask the scheduler to stop at the top of its next iteration.
    pub fn request_quit(&mut self) {
        *self.quit = true;
    }
}

pub enum GameState {
    Intro(Intro),
    MainMenu(MainMenu),
    BaseGame(BaseGame),
    WorldMap(WorldMap),
    Gameplay(Gameplay),
}

/// Forward a call to whichever state is inside.
macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            GameState::Intro($s) => $body,
            GameState::MainMenu($s) => $body,
            GameState::BaseGame($s) => $body,
            GameState::WorldMap($s) => $body,
            GameState::Gameplay($s) => $body,
        }
    };
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Intro(_) => "Intro",
            GameState::MainMenu(_) => "MainMenu",
            GameState::BaseGame(_) => "BaseGame",
            GameState::WorldMap(_) => "WorldMap",
            GameState::Gameplay(_) => "Gameplay",
        }
    }

    /// Called right after the state is linked on top of `parent`.
    pub fn enter(&mut self, parent: Option<&GameState>, ctx: &mut StateContext) {
        dispatch!(self, s => s.enter(parent, ctx))
    }

    /// Called right before the state is unlinked.
    pub fn exit(&mut self, ctx: &mut StateContext) {
        dispatch!(self, s => s.exit(ctx))
    }

    pub fn update(&mut self, ctx: &mut StateContext) {
        dispatch!(self, s => s.update(ctx))
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        dispatch!(self, s => s.draw(renderer))
    }

    /// Returns whether the event was consumed.
    pub fn handle_input(&mut self, event: InputEvent, ctx: &mut StateContext) -> bool {
        dispatch!(self, s => s.handle_input(event, ctx))
    }

    pub fn pause(&mut self) {
        *self.paused_mut() = true;
    }

    pub fn resume(&mut self) {
        *self.paused_mut() = false;
    }

    pub fn is_paused(&self) -> bool {
        dispatch!(self, s => s.paused)
    }

    fn paused_mut(&mut self) -> &mut bool {
        dispatch!(self, s => &mut s.paused)
    }

    /// Session data this state shares with the states it pushes.
    pub fn session(&self) -> Option<&Session> {
        match self {
            GameState::BaseGame(s) => s.session(),
            GameState::WorldMap(s) => s.session(),
            GameState::Gameplay(s) => s.session(),
            GameState::Intro(_) | GameState::MainMenu(_) => None,
        }
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("kind", &self.name())
            .field("paused", &self.is_paused())
            .finish()
    }
}
