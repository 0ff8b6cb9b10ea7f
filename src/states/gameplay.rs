//! A running level.
//!
//! Gameplay owns the [`Level`] loaded from `levels/<name>.json` and steps its
//! current subworld once per tick. Falling below the subworld costs a life
//! and ends the level.

use log::{debug, error, info};

use super::basegame::Session;
use super::{GameState, StateContext};
use crate::components::position::Position;
use crate::events::input::{InputAction, InputEvent};
use crate::resources::camera2d::Camera;
use crate::resources::defloader::load_level;
use crate::resources::level::Level;
use crate::systems::render::Renderer;
use crate::systems::{animation, audio, camera, collision, gravity, input, movement, render, state, timers};

/// How far below the subworld bounds the player may drop before dying.
const FALL_MARGIN: f32 = 2.0;
const JUMP_SOUND: &str = "jump";

pub struct Gameplay {
    level_name: String,
    session: Option<Session>,
    level: Option<Level>,
    camera: Camera,
    /// Seconds of simulated time in this level; drives tile animations.
    elapsed: f32,
    leaving: bool,
    pub(super) paused: bool,
}

impl Gameplay {
    pub fn new(level_name: impl Into<String>) -> Self {
        Self {
            level_name: level_name.into(),
            session: None,
            level: None,
            camera: Camera::for_resolution(320, 240),
            elapsed: 0.0,
            leaving: false,
            paused: false,
        }
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(super) fn enter(&mut self, parent: Option<&GameState>, ctx: &mut StateContext) {
        self.camera = Camera::for_resolution(ctx.config.render_width, ctx.config.render_height);
        let Some(session) = parent.and_then(GameState::session).cloned() else {
            error!("level '{}' pushed without a session", self.level_name);
            self.leave(ctx);
            return;
        };
        match load_level(ctx.assets, &self.level_name, &session.content) {
            Ok(level) => {
                info!("level '{}' loaded: {} subworlds", self.level_name, level.len());
                if let Some(sw) = level.current() {
                    if ctx.audio.has_music(&sw.theme) {
                        ctx.audio.play_music(&sw.theme);
                    }
                    camera::follow_target(&mut self.camera, sw);
                }
                self.level = Some(level);
            }
            Err(e) => {
                error!("failed to load level '{}': {}", self.level_name, e);
                self.leave(ctx);
            }
        }
        self.session = Some(session);
    }

    pub(super) fn exit(&mut self, ctx: &mut StateContext) {
        info!("leaving level '{}'", self.level_name);
        if let Some(sw) = self.level.as_mut().and_then(Level::current_mut) {
            for e in sw.store.entities().collect::<Vec<_>>() {
                audio::stop_entity_voices(ctx.audio, &mut sw.store, e);
            }
        }
        ctx.audio.stop_music();
    }

    pub(super) fn update(&mut self, ctx: &mut StateContext) {
        if self.paused || self.leaving {
            return;
        }
        let (Some(level), Some(session)) = (self.level.as_mut(), self.session.as_ref()) else {
            return;
        };
        let Some(sw) = level.current_mut() else {
            return;
        };
        let dt = ctx.time.delta();
        self.elapsed += dt;

        audio::release_finished_voices(&mut sw.store, ctx.audio_messages);

        if input::control_player(sw, ctx.input) && ctx.audio.has_sound(JUMP_SOUND) {
            if let Some(player) = sw.player() {
                audio::play_entity_sound(ctx.audio, &mut sw.store, player, JUMP_SOUND);
            }
        }
        gravity::apply_gravity(&mut sw.store);
        movement::integrate(&mut sw.store);
        let player = sw.player();
        movement::face_velocity(&mut sw.store, player);
        collision::resolve_tiles(sw, &session.content.tiles);
        state::select(&mut sw.store);
        animation::advance(&mut sw.store, dt);
        for (e, name) in timers::tick(&mut sw.store, dt) {
            debug!("timer '{}' expired on {}", name, e);
        }
        camera::follow_target(&mut self.camera, sw);

        let fell = player
            .and_then(|p| sw.store.try_get::<Position>(p))
            .is_some_and(|p| p.0.y < sw.bounds.normalized().bottom() as f32 - FALL_MARGIN);
        if fell {
            let left = session.lose_life();
            info!("player fell out of '{}', {} lives left", self.level_name, left);
            self.leave(ctx);
        }
    }

    pub(super) fn draw(&self, renderer: &mut dyn Renderer) {
        let (Some(level), Some(session)) = (self.level.as_ref(), self.session.as_ref()) else {
            return;
        };
        let Some(sw) = level.current() else {
            return;
        };
        render::draw_backgrounds(&sw.backgrounds, &self.camera, renderer);
        render::draw_tiles(sw, &session.content.tiles, &self.camera, self.elapsed, renderer);
        render::draw_entities(sw, &self.camera, renderer);
    }

    pub(super) fn handle_input(&mut self, event: InputEvent, ctx: &mut StateContext) -> bool {
        if event.pressed && !self.leaving {
            match event.action {
                InputAction::Pause => {
                    self.paused = !self.paused;
                    info!("level '{}' paused={}", self.level_name, self.paused);
                }
                InputAction::Back => self.leave(ctx),
                _ => {}
            }
        }
        // player controls read the polled state; nothing below should see them
        true
    }

    fn leave(&mut self, ctx: &mut StateContext) {
        self.leaving = true;
        ctx.events.pop();
    }
}
