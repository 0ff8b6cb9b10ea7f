//! Scheduler integration tests: fixed-rate determinism, deferred stack
//! changes, input capture and a full headless session.

use std::time::Duration;

use scrollengine::components::position::Position;
use scrollengine::events::input::{InputAction, InputEvent};
use scrollengine::game::Game;
use scrollengine::resources::assets::MemorySource;
use scrollengine::resources::audio::AudioBridge;
use scrollengine::resources::defloader::{ENTITIES_FILE, TILES_FILE, WORLD_FILE, level_path};
use scrollengine::resources::gameconfig::GameConfig;
use scrollengine::resources::worldtime::{Clock, ManualClock};
use scrollengine::states::GameState;
use scrollengine::states::basegame::BaseGame;
use scrollengine::states::intro::Intro;
use scrollengine::states::mainmenu::MainMenu;
use scrollengine::systems::render::DrawList;

const TILES: &str = r#"{"tiles": [
    {"name": "ground", "collision": "solid",
     "frames": [{"texture": "tiles", "origin": [0, 0]}]},
    {"name": "ledge", "collision": "platform",
     "frames": [{"texture": "tiles", "origin": [16, 0]}]}
]}"#;

const ENTITIES: &str = r#"{"entities": [
    {"name": "player", "hitbox": [0.1, 0, 0.8, 1], "gravity": true, "solid": true,
     "states": {
        "idle": [{"texture": "hero", "origin": [0, 0]}],
        "walk": [{"texture": "hero", "origin": [16, 0]}, {"texture": "hero", "origin": [32, 0]}],
        "jump": [{"texture": "hero", "origin": [48, 0]}]
     }}
]}"#;

const WORLD: &str = r#"{"levels": ["1-1"], "sounds": {"jump": "sfx/jump.wav"}}"#;

// an 8-wide floor along y = 0, player dropped from y = 3
const LEVEL: &str = r#"{"subworlds": [{
    "id": 0, "theme": "overworld", "bounds": [0, 0, 64, 15], "palette": ["ground"],
    "layers": [{"width": 8, "height": 1,
                "data": "AQAAAAEAAAABAAAAAQAAAAEAAAABAAAAAQAAAAEAAAA="}],
    "player": [2, 3]
}]}"#;

fn assets() -> MemorySource {
    MemorySource::new()
        .with(TILES_FILE, TILES)
        .with(ENTITIES_FILE, ENTITIES)
        .with(WORLD_FILE, WORLD)
        .with(level_path("1-1"), LEVEL)
}

fn game(config: GameConfig) -> (Game<ManualClock, DrawList>, ManualClock) {
    let clock = ManualClock::new();
    let g = Game::new(
        config,
        clock.clone(),
        DrawList::new(),
        Box::new(assets()),
        AudioBridge::spawn(4),
    )
    .unwrap();
    (g, clock)
}

fn names(g: &Game<ManualClock, DrawList>) -> Vec<&'static str> {
    g.states().iter().map(GameState::name).collect()
}

#[test]
fn test_one_second_is_64_ticks_and_60_frames() {
    let (mut g, clock) = game(GameConfig::new());
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.run_for(Duration::from_secs(1));
    assert_eq!(clock.now(), Duration::from_secs(1));
    assert_eq!(g.time().ticks, 64);
    assert_eq!(g.time().frames, 60);
}

#[test]
fn test_other_rates() {
    let mut config = GameConfig::new();
    config.tick_rate = 100;
    config.render_rate = 30;
    let (mut g, _) = game(config);
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.run_for(Duration::from_secs(3));
    assert_eq!(g.time().ticks, 300);
    assert_eq!(g.time().frames, 90);
}

#[test]
fn test_deferred_push_pop_fifo() {
    let mut config = GameConfig::new();
    config.intro_seconds = 60.0;
    let (mut g, _) = game(config);
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.push_state(|| GameState::Intro(Intro::new()));
    // nothing is linked before the first tick
    assert!(g.states().is_empty());

    g.pump();
    assert_eq!(names(&g), vec!["MainMenu", "Intro"]);
    assert!(g.states()[0].is_paused());
    assert!(!g.states()[1].is_paused());

    g.pop_state();
    g.push_state(|| GameState::Intro(Intro::new()));
    g.pop_state();
    assert_eq!(names(&g), vec!["MainMenu", "Intro"]);
    g.run_for(Duration::from_millis(20));
    assert_eq!(names(&g), vec!["MainMenu"]);
    assert!(!g.states()[0].is_paused());
}

#[test]
fn test_input_stops_at_first_consumer() {
    let mut config = GameConfig::new();
    config.intro_seconds = 60.0;
    let (mut g, _) = game(config);
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.push_state(|| GameState::Intro(Intro::new()));
    g.pump();

    // the intro takes the press; the menu below would quit on Back
    g.send_input(InputEvent::press(InputAction::Back));
    assert!(g.pump());
    g.run_for(Duration::from_millis(100));
    assert!(g.is_running());
    assert_eq!(names(&g), vec!["MainMenu", "MainMenu"]);
}

#[test]
fn test_loop_ends_when_stack_empties() {
    let (mut g, _) = game(GameConfig::new());
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.pump();
    g.pop_state();
    g.run();
    assert!(!g.is_running());
    assert!(g.states().is_empty());
}

#[test]
fn test_headless_session_reaches_level() {
    let mut config = GameConfig::new();
    config.start_level = Some("1-1".into());
    let (mut g, _) = game(config);
    g.push_state(|| GameState::BaseGame(BaseGame::new()));
    g.run_for(Duration::from_secs(2));
    assert_eq!(names(&g), vec!["BaseGame", "Gameplay"]);

    let GameState::Gameplay(play) = &g.states()[1] else {
        panic!("gameplay on top");
    };
    let sw = play.level().unwrap().current().unwrap();
    let pos = sw.store.get::<Position>(sw.player().unwrap()).0;
    assert!((pos.y - 1.0).abs() < 1e-4, "player at {:?}", pos);
    // the floor tiles and the player were drawn last frame
    assert_eq!(g.renderer().commands.len(), 9);

    // half a second of walking right stays on the floor
    g.send_input(InputEvent::press(InputAction::Right));
    g.run_for(Duration::from_millis(2500));
    let GameState::Gameplay(play) = &g.states()[1] else {
        panic!("gameplay on top");
    };
    let sw = play.level().unwrap().current().unwrap();
    let pos = sw.store.get::<Position>(sw.player().unwrap()).0;
    assert!(pos.x > 3.5 && pos.x < 8.0, "player at {:?}", pos);
    assert!((pos.y - 1.0).abs() < 1e-4, "player at {:?}", pos);
}

#[test]
fn test_back_unwinds_to_menu() {
    let (mut g, _) = game(GameConfig::new());
    g.push_state(|| GameState::MainMenu(MainMenu::new()));
    g.pump();
    g.send_input(InputEvent::press(InputAction::Confirm));
    g.run_for(Duration::from_millis(100));
    assert_eq!(names(&g), vec!["MainMenu", "BaseGame", "WorldMap"]);

    g.send_input(InputEvent::press(InputAction::Back));
    g.run_for(Duration::from_millis(200));
    assert_eq!(names(&g), vec!["MainMenu"]);
    assert!(g.is_running());
}
