use log::info;

use super::basegame::BaseGame;
use super::{GameState, StateContext};
use crate::events::input::{InputAction, InputEvent};
use crate::systems::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Quit,
}

pub const MENU_ITEMS: [MenuItem; 2] = [MenuItem::Start, MenuItem::Quit];

#[derive(Debug, Default)]
pub struct MainMenu {
    cursor: usize,
    pub(super) paused: bool,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> MenuItem {
        MENU_ITEMS[self.cursor]
    }

    pub(super) fn enter(&mut self, _parent: Option<&GameState>, _ctx: &mut StateContext) {
        info!("main menu");
    }

    pub(super) fn exit(&mut self, _ctx: &mut StateContext) {}

    pub(super) fn update(&mut self, _ctx: &mut StateContext) {}

    pub(super) fn draw(&self, _renderer: &mut dyn Renderer) {}

    pub(super) fn handle_input(&mut self, event: InputEvent, ctx: &mut StateContext) -> bool {
        if !event.pressed {
            return true;
        }
        let n = MENU_ITEMS.len();
        match event.action {
            InputAction::Up => self.cursor = (self.cursor + n - 1) % n,
            InputAction::Down => self.cursor = (self.cursor + 1) % n,
            InputAction::Confirm | InputAction::Jump => self.activate(ctx),
            InputAction::Back => ctx.request_quit(),
            _ => {}
        }
        true
    }

    fn activate(&mut self, ctx: &mut StateContext) {
        match self.selected() {
            MenuItem::Start => {
                info!("menu: start");
                ctx.events.push(|| GameState::BaseGame(BaseGame::new()));
            }
            MenuItem::Quit => {
                info!("menu: quit");
                ctx.request_quit();
            }
        }
    }
}
