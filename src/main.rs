/// Entry point and frame loop.
///
/// The loop owns the real-world collaborators (terminal, keyboard, gamepad,
/// speaker, wall clock) and feeds the session its three inbound calls:
/// `toggle`, `pick(row, col)` and `tick`. Whatever events come back are
/// applied to the board view and played as sound cues.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{GameConfig, LoggingConfig};
use sim::clock::IntervalClock;
use sim::event::GameEvent;
use sim::session::GameSession;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::{play_events, SoundEngine};
use ui::view::BoardView;

const FRAME_SLEEP: Duration = Duration::from_millis(10);

fn main() {
    let (config, config_error) = GameConfig::load();
    init_logging(&config.logging);
    if let Some(e) = config_error {
        eprintln!("Warning: {e}");
        eprintln!("Using default settings.");
        warn!(error = %e, "config fallback to defaults");
    }

    let clock = IntervalClock::new(Duration::from_millis(config.turn.tick_rate_ms));
    let mut session = GameSession::new(config.turn.clone(), clock, config.seed);
    let mut view = BoardView::new();
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut view, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    if session.has_bingo() {
        println!("BINGO! Thanks for playing Dice Bingo!");
    } else {
        println!("Thanks for playing Dice Bingo!");
    }
    info!(bingo = session.has_bingo(), "exit");
}

/// Log to the configured file; the terminal belongs to the renderer.
/// `RUST_LOG` overrides the configured level.
fn init_logging(cfg: &LoggingConfig) {
    let path = match &cfg.file {
        Some(p) => p,
        None => return,
    };
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
}

fn game_loop(
    session: &mut GameSession<IntervalClock>,
    view: &mut BoardView,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    loop {
        kb.drain_events();
        gp.update();

        let commands: Vec<Command> = kb.commands().iter().chain(gp.commands()).copied().collect();
        for cmd in commands {
            let events = match cmd {
                Command::Quit => return Ok(()),
                Command::Move { d_row, d_col } => {
                    view.move_cursor(d_row, d_col);
                    continue;
                }
                Command::Pick => {
                    let (row, col) = view.cursor;
                    session.pick(row, col)
                }
                Command::Toggle => session.toggle(),
            };
            dispatch(view, sound, &events);
        }

        if let Some(sub) = session.clock_mut().poll(Instant::now()) {
            let events = session.tick(sub);
            dispatch(view, sound, &events);
        }

        renderer.render(view)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn dispatch(view: &mut BoardView, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    view.apply_all(events);
    play_events(sound, events);
}
