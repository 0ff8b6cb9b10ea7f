use log::info;

use super::mainmenu::MainMenu;
use super::{GameState, StateContext};
use crate::events::input::InputEvent;
use crate::systems::render::Renderer;

/// Title card shown at startup. Leaves for the main menu after
/// `intro_seconds` or on the first key press.
#[derive(Debug, Default)]
pub struct Intro {
    elapsed: f32,
    done: bool,
    pub(super) paused: bool,
}

impl Intro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(super) fn enter(&mut self, _parent: Option<&GameState>, _ctx: &mut StateContext) {
        info!("intro");
    }

    pub(super) fn exit(&mut self, _ctx: &mut StateContext) {}

    pub(super) fn update(&mut self, ctx: &mut StateContext) {
        if self.done || self.paused {
            return;
        }
        self.elapsed += ctx.time.delta();
        if self.elapsed >= ctx.config.intro_seconds {
            self.finish(ctx);
        }
    }

    pub(super) fn draw(&self, _renderer: &mut dyn Renderer) {}

    pub(super) fn handle_input(&mut self, event: InputEvent, ctx: &mut StateContext) -> bool {
        if event.pressed && !self.done {
            self.finish(ctx);
        }
        true
    }

    fn finish(&mut self, ctx: &mut StateContext) {
        self.done = true;
        ctx.events.pop();
        ctx.events.push(|| GameState::MainMenu(MainMenu::new()));
    }
}
