/// Keyboard input: turns terminal key presses into board commands.
///
/// Bingo input is edge-triggered only (one press = one command), so only
/// Press events count. Repeat and Release events are dropped; a held arrow
/// key does not sweep the cursor across the card.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the player asked for this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move { d_row: i32, d_col: i32 },
    Pick,
    Toggle,
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PICK: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_TOGGLE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map a single key press to a command.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    let code = key.code;
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && (code == KeyCode::Char('c') || code == KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }
    let cmd = if KEYS_LEFT.contains(&code) {
        Command::Move { d_row: 0, d_col: -1 }
    } else if KEYS_RIGHT.contains(&code) {
        Command::Move { d_row: 0, d_col: 1 }
    } else if KEYS_UP.contains(&code) {
        Command::Move { d_row: -1, d_col: 0 }
    } else if KEYS_DOWN.contains(&code) {
        Command::Move { d_row: 1, d_col: 0 }
    } else if KEYS_PICK.contains(&code) {
        Command::Pick
    } else if KEYS_TOGGLE.contains(&code) {
        Command::Toggle
    } else if KEYS_QUIT.contains(&code) {
        Command::Quit
    } else {
        return None;
    };
    Some(cmd)
}

pub struct InputState {
    /// Commands decoded during the most recent `drain_events()`.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame.
    pub fn drain_events(&mut self) {
        self.commands.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = command_for(&key) {
                    self.commands.push(cmd);
                }
            }
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}
