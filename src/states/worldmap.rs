use log::{error, info, warn};

use super::basegame::Session;
use super::gameplay::Gameplay;
use super::{GameState, StateContext};
use crate::events::input::{InputAction, InputEvent};
use crate::systems::render::Renderer;

/// Level select over the world's level list.
#[derive(Debug, Default)]
pub struct WorldMap {
    session: Option<Session>,
    cursor: usize,
    leaving: bool,
    pub(super) paused: bool,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn levels(&self) -> &[String] {
        match &self.session {
            Some(s) => s.content.world.levels.as_slice(),
            None => &[],
        }
    }

    /// Name of the level under the cursor.
    pub fn selected(&self) -> Option<&str> {
        self.levels().get(self.cursor).map(String::as_str)
    }

    pub(super) fn enter(&mut self, parent: Option<&GameState>, ctx: &mut StateContext) {
        self.session = parent.and_then(GameState::session).cloned();
        if self.session.is_none() {
            error!("world map pushed without a session");
            self.leave(ctx);
            return;
        }
        if self.levels().is_empty() {
            warn!("world map has no levels");
        }
        info!("world map: {} levels", self.levels().len());
    }

    pub(super) fn exit(&mut self, _ctx: &mut StateContext) {}

    pub(super) fn update(&mut self, ctx: &mut StateContext) {
        if self.leaving {
            return;
        }
        if self.session.as_ref().is_some_and(|s| s.lives() == 0) {
            info!("game over");
            self.leave(ctx);
        }
    }

    pub(super) fn draw(&self, _renderer: &mut dyn Renderer) {}

    pub(super) fn handle_input(&mut self, event: InputEvent, ctx: &mut StateContext) -> bool {
        if !event.pressed || self.leaving {
            return true;
        }
        let count = self.levels().len();
        match event.action {
            InputAction::Left | InputAction::Up => self.cursor = self.cursor.saturating_sub(1),
            InputAction::Right | InputAction::Down => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            InputAction::Confirm | InputAction::Jump => {
                if let Some(name) = self.selected().map(str::to_string) {
                    info!("world map: entering '{}'", name);
                    ctx.events.push(move || GameState::Gameplay(Gameplay::new(name)));
                }
            }
            InputAction::Back => self.leave(ctx),
            _ => {}
        }
        true
    }

    // BaseGame pops itself once this is gone
    fn leave(&mut self, ctx: &mut StateContext) {
        self.leaving = true;
        ctx.events.pop();
    }
}
