//! Fixed-step scheduler and state stack.
//!
//! [`Game`] owns the state stack and everything a state borrows through its
//! [`StateContext`]. One [`Game::pump`] call:
//!
//! 1. stops if a quit was requested, or if the stack and the deferred event
//!    queue are both empty;
//! 2. dispatches queued input top-first until a state consumes it;
//! 3. runs one tick if the tick deadline has passed, then moves the deadline
//!    exactly one period on;
//! 4. draws one frame under the same rule for the render deadline;
//! 5. sleeps until the earlier deadline when neither ran.
//!
//! A tick applies deferred push/pop requests in FIFO order and then updates
//! every state bottom to top. Deadlines never snap to the current time, so a
//! stalled host is followed by a burst of catch-up ticks.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, warn};

use crate::error::Result;
use crate::events::gamestate::{StateEvent, StateQueue};
use crate::events::input::InputEvent;
use crate::resources::assets::AssetSource;
use crate::resources::audio::AudioBridge;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::{Clock, FixedRate, WorldTime};
use crate::states::{GameState, StateContext};
use crate::systems::render::Renderer;

/// Builds a [`StateContext`] from disjoint fields of a [`Game`], leaving
/// `stack` free to borrow.
macro_rules! state_context {
    ($game:ident, $messages:expr) => {
        StateContext {
            events: &mut $game.events,
            input: &$game.input,
            audio: &mut $game.audio,
            audio_messages: $messages,
            assets: &*$game.assets,
            config: &$game.config,
            time: &$game.time,
            quit: &mut $game.quit,
        }
    };
}

pub struct Game<C: Clock, R: Renderer> {
    clock: C,
    renderer: R,
    stack: Vec<GameState>,
    events: StateQueue,
    input: InputState,
    pending_input: VecDeque<InputEvent>,
    audio: AudioBridge,
    assets: Box<dyn AssetSource>,
    config: GameConfig,
    time: WorldTime,
    tick_rate: FixedRate,
    render_rate: FixedRate,
    origin: Duration,
    quit: bool,
    running: bool,
}

impl<C: Clock, R: Renderer> Game<C, R> {
    /// Validate `config` and set up an empty stack. Deadlines count from the
    /// clock's current time.
    pub fn new(
        config: GameConfig,
        clock: C,
        renderer: R,
        assets: Box<dyn AssetSource>,
        audio: AudioBridge,
    ) -> Result<Self> {
        config.validate()?;
        let origin = clock.now();
        info!(
            "game loop: {} Hz tick, {} Hz render",
            config.tick_rate, config.render_rate
        );
        Ok(Self {
            tick_rate: FixedRate::new(config.tick_rate),
            render_rate: FixedRate::new(config.render_rate),
            time: WorldTime::new(config.tick_rate),
            clock,
            renderer,
            stack: Vec::new(),
            events: StateQueue::new(),
            input: InputState::new(),
            pending_input: VecDeque::new(),
            audio,
            assets,
            config,
            origin,
            quit: false,
            running: true,
        })
    }

    /// Queue a state to be pushed on the next tick.
    pub fn push_state(&mut self, factory: impl FnOnce() -> GameState + 'static) {
        self.events.push(factory);
    }

    /// Queue a pop for the next tick.
    pub fn pop_state(&mut self) {
        self.events.pop();
    }

    /// Queue an input event for the next pump.
    pub fn send_input(&mut self, event: InputEvent) {
        self.pending_input.push_back(event);
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn states(&self) -> &[GameState] {
        &self.stack
    }

    pub fn states_mut(&mut self) -> &mut [GameState] {
        &mut self.stack
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio_mut(&mut self) -> &mut AudioBridge {
        &mut self.audio
    }

    /// One scheduler iteration. Returns `false` once the loop has stopped.
    pub fn pump(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.quit {
            info!("quit requested");
            self.running = false;
            return false;
        }
        if self.stack.is_empty() && self.events.is_empty() {
            info!("state stack empty");
            self.running = false;
            return false;
        }

        self.dispatch_input();

        let now = self.clock.now().saturating_sub(self.origin);
        let mut worked = false;
        if self.tick_rate.is_due(now) {
            let lag = self.tick_rate.lag(now);
            if lag > 1 {
                debug!("tick deadline {} periods behind", lag);
            }
            self.tick();
            self.tick_rate.advance();
            worked = true;
        }
        if self.render_rate.is_due(now) {
            self.draw();
            self.render_rate.advance();
            worked = true;
        }
        if !worked {
            let next = self.tick_rate.deadline().min(self.render_rate.deadline());
            self.clock.sleep_until(self.origin + next);
        }
        true
    }

    /// Pump until the loop stops.
    pub fn run(&mut self) {
        while self.pump() {}
    }

    /// Pump until the clock reaches `limit` (from the clock origin) or the
    /// loop stops.
    pub fn run_for(&mut self, limit: Duration) {
        while self.clock.now() < limit && self.pump() {}
    }

    fn dispatch_input(&mut self) {
        while let Some(event) = self.pending_input.pop_front() {
            self.input.apply(event);
            let mut ctx = state_context!(self, &[]);
            let consumer = self
                .stack
                .iter_mut()
                .rev()
                .find_map(|s| s.handle_input(event, &mut ctx).then(|| s.name()));
            if let Some(name) = consumer {
                debug!("{:?} consumed by {}", event, name);
            }
        }
    }

    fn tick(&mut self) {
        let messages = self.audio.poll();
        let mut ctx = state_context!(self, &messages);

        for event in ctx.events.take() {
            match event {
                StateEvent::Push(factory) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.pause();
                    }
                    self.stack.push(factory());
                    if let Some((top, rest)) = self.stack.split_last_mut() {
                        info!("push {} (depth {})", top.name(), rest.len() + 1);
                        top.enter(rest.last(), &mut ctx);
                    }
                }
                StateEvent::Pop => match self.stack.last_mut() {
                    Some(top) => {
                        info!("pop {}", top.name());
                        top.exit(&mut ctx);
                        self.stack.pop();
                        if let Some(top) = self.stack.last_mut() {
                            top.resume();
                        }
                    }
                    None => warn!("pop on an empty state stack"),
                },
            }
        }

        for state in self.stack.iter_mut() {
            state.update(&mut ctx);
        }

        self.time.ticks += 1;
        self.input.end_tick();
    }

    fn draw(&mut self) {
        self.renderer.begin_frame();
        for state in &self.stack {
            state.draw(&mut self.renderer);
        }
        self.renderer.end_frame();
        self.time.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::input::InputAction;
    use crate::resources::assets::MemorySource;
    use crate::resources::worldtime::ManualClock;
    use crate::states::intro::Intro;
    use crate::states::mainmenu::MainMenu;
    use crate::systems::render::DrawList;

    fn game(config: GameConfig) -> (Game<ManualClock, DrawList>, ManualClock) {
        let clock = ManualClock::new();
        let (tx_cmd, _rx_cmd) = crossbeam_channel::unbounded();
        let (_tx_msg, rx_msg) = crossbeam_channel::unbounded();
        let audio = AudioBridge::from_channels(4, tx_cmd, rx_msg);
        let g = Game::new(config, clock.clone(), DrawList::new(), Box::new(MemorySource::new()), audio)
            .unwrap();
        (g, clock)
    }

    #[test]
    fn test_empty_stack_stops() {
        let (mut g, _) = game(GameConfig::new());
        assert!(!g.pump());
        assert!(!g.is_running());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::new();
        config.tick_rate = 0;
        let (tx_cmd, _rx) = crossbeam_channel::unbounded();
        let (_tx, rx_msg) = crossbeam_channel::unbounded();
        let audio = AudioBridge::from_channels(1, tx_cmd, rx_msg);
        let res = Game::new(config, ManualClock::new(), DrawList::new(), Box::new(MemorySource::new()), audio);
        assert!(res.is_err());
    }

    #[test]
    fn test_rates_over_one_second() {
        let (mut g, clock) = game(GameConfig::new());
        g.push_state(|| GameState::MainMenu(MainMenu::new()));
        g.run_for(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
        assert_eq!(g.time().ticks, 64);
        assert_eq!(g.time().frames, 60);
        assert_eq!(g.renderer().frames, 60);
    }

    #[test]
    fn test_stall_catches_up_one_tick_per_pump() {
        let (mut g, clock) = game(GameConfig::new());
        g.push_state(|| GameState::MainMenu(MainMenu::new()));
        clock.set(Duration::from_millis(100));
        // deadlines 0..=6 are all due at 100 ms
        for _ in 0..7 {
            g.pump();
        }
        assert_eq!(g.time().ticks, 7);
        assert_eq!(clock.now(), Duration::from_millis(100));
        g.pump();
        assert_eq!(g.time().ticks, 7);
        assert!(clock.now() > Duration::from_millis(100));
    }

    #[test]
    fn test_quit_observed_next_pump() {
        let (mut g, _) = game(GameConfig::new());
        g.push_state(|| GameState::MainMenu(MainMenu::new()));
        assert!(g.pump());
        g.send_input(InputEvent::press(InputAction::Back));
        assert!(g.pump());
        assert!(g.is_running());
        assert!(!g.pump());
        assert!(!g.is_running());
    }

    #[test]
    fn test_intro_replaced_by_menu() {
        let mut config = GameConfig::new();
        config.intro_seconds = 0.0;
        let (mut g, _) = game(config);
        g.push_state(|| GameState::Intro(Intro::new()));
        g.pump();
        assert_eq!(g.states()[0].name(), "Intro");
        g.run_for(Duration::from_millis(100));
        let names: Vec<&str> = g.states().iter().map(GameState::name).collect();
        assert_eq!(names, vec!["MainMenu"]);
    }
}
