//! Session root.
//!
//! BaseGame loads the content definitions once, registers the world's sounds
//! and music with the audio bridge and holds the lives counter. It then
//! pushes the world map, or a level directly when the config names a start
//! level. When its children are gone it pops itself, returning to the menu.

use std::cell::Cell;
use std::rc::Rc;

use log::{error, info};

use super::gameplay::Gameplay;
use super::worldmap::WorldMap;
use super::{GameState, StateContext};
use crate::events::input::InputEvent;
use crate::resources::defloader::{Content, load_content};
use crate::systems::render::Renderer;

pub const START_LIVES: u32 = 3;

/// Data shared by BaseGame and every state pushed above it.
#[derive(Debug, Clone)]
pub struct Session {
    pub content: Rc<Content>,
    pub lives: Rc<Cell<u32>>,
}

impl Session {
    pub fn new(content: Content) -> Self {
        Self {
            content: Rc::new(content),
            lives: Rc::new(Cell::new(START_LIVES)),
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives.get()
    }

    /// Take one life; returns how many are left.
    pub fn lose_life(&self) -> u32 {
        let left = self.lives.get().saturating_sub(1);
        self.lives.set(left);
        left
    }
}

#[derive(Debug, Default)]
pub struct BaseGame {
    session: Option<Session>,
    had_child: bool,
    leaving: bool,
    pub(super) paused: bool,
}

impl BaseGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start with an already loaded session instead of loading on enter.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub(super) fn enter(&mut self, _parent: Option<&GameState>, ctx: &mut StateContext) {
        if self.session.is_none() {
            match load_content(ctx.assets) {
                Ok(content) => {
                    info!(
                        "content loaded: {} tiles, {} entities, {} levels",
                        content.tiles.len(),
                        content.entities.len(),
                        content.world.levels.len()
                    );
                    self.session = Some(Session::new(content));
                }
                Err(e) => {
                    error!("failed to load content: {}", e);
                    self.leave(ctx);
                    return;
                }
            }
        }
        let Some(session) = &self.session else {
            return;
        };
        for (id, path) in &session.content.world.sounds {
            ctx.audio.register_sound(id.as_str(), path.as_str());
        }
        for (id, path) in &session.content.world.music {
            ctx.audio.register_music(id.as_str(), path.as_str());
        }

        match ctx.config.start_level.clone() {
            Some(level) => ctx.events.push(move || GameState::Gameplay(Gameplay::new(level))),
            None => ctx.events.push(|| GameState::WorldMap(WorldMap::new())),
        }
    }

    pub(super) fn exit(&mut self, ctx: &mut StateContext) {
        ctx.audio.stop_music();
    }

    pub(super) fn update(&mut self, ctx: &mut StateContext) {
        // paused means a child is on top; resumed after one means it is done
        if self.paused {
            self.had_child = true;
        } else if self.had_child && !self.leaving {
            info!("session over");
            self.leave(ctx);
        }
    }

    pub(super) fn draw(&self, _renderer: &mut dyn Renderer) {}

    pub(super) fn handle_input(&mut self, _event: InputEvent, _ctx: &mut StateContext) -> bool {
        false
    }

    fn leave(&mut self, ctx: &mut StateContext) {
        self.leaving = true;
        ctx.events.pop();
    }
}
