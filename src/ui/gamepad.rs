/// Gamepad input using gilrs, mapped onto the same commands as the keyboard.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick  →  Move cursor
///   A                   →  Pick
///   Start               →  Start / Pause / Resume
///   Select              →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
struct ActionMap {
    pick: Vec<Btn>,
    toggle: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            pick: vec![Btn::A],
            toggle: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Empty or unrecognised lists keep the current mapping.
    fn apply_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let pick = parse_list(&cfg.pick);
        if !pick.is_empty() { self.pick = pick; }
        let toggle = parse_list(&cfg.toggle);
        if !toggle.is_empty() { self.toggle = toggle; }
        let quit = parse_list(&cfg.quit);
        if !quit.is_empty() { self.quit = quit; }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn command_for(&self, btn: Btn) -> Option<Command> {
        if self.pick.contains(&btn) {
            Some(Command::Pick)
        } else if self.toggle.contains(&btn) {
            Some(Command::Toggle)
        } else if self.quit.contains(&btn) {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Stick position quantised to a direction, for edge detection.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: (i32, i32),

    action_map: ActionMap,
    commands: Vec<Command>,
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new().ok(),
            stick_dir: (0, 0),
            action_map: ActionMap::default(),
            commands: Vec::new(),
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.apply_config(cfg);
    }

    /// Poll the pad; call once per frame.
    pub fn update(&mut self) {
        self.commands.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();
        let mut stick = None;

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    let cmd = match btn {
                        Button::DPadUp => Some(Command::Move { d_row: -1, d_col: 0 }),
                        Button::DPadDown => Some(Command::Move { d_row: 1, d_col: 0 }),
                        Button::DPadLeft => Some(Command::Move { d_row: 0, d_col: -1 }),
                        Button::DPadRight => Some(Command::Move { d_row: 0, d_col: 1 }),
                        other => Btn::from_gilrs(other).and_then(|b| self.action_map.command_for(b)),
                    };
                    if let Some(cmd) = cmd {
                        self.commands.push(cmd);
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    let (mut x, mut y) = stick.unwrap_or(self.stick_dir);
                    let q = if value < -STICK_DEADZONE { -1 } else if value > STICK_DEADZONE { 1 } else { 0 };
                    match axis {
                        Axis::LeftStickX => x = q,
                        Axis::LeftStickY => y = -q, // stick up is positive
                        _ => {}
                    }
                    stick = Some((x, y));
                }
                EventType::Disconnected => stick = Some((0, 0)),
                _ => {}
            }
        }

        if let Some(dir) = stick {
            if dir != self.stick_dir && dir != (0, 0) {
                self.commands.push(Command::Move { d_row: dir.1, d_col: dir.0 });
            }
            self.stick_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping() {
        let map = ActionMap::default();
        assert_eq!(map.command_for(Btn::A), Some(Command::Pick));
        assert_eq!(map.command_for(Btn::Start), Some(Command::Toggle));
        assert_eq!(map.command_for(Btn::Select), Some(Command::Quit));
        assert_eq!(map.command_for(Btn::Y), None);
    }

    #[test]
    fn config_overrides_known_buttons_only() {
        let mut map = ActionMap::default();
        map.apply_config(&GamepadConfig {
            pick: vec!["x".into(), "bogus".into()],
            toggle: vec!["nope".into()],
            quit: vec![],
        });
        assert_eq!(map.command_for(Btn::X), Some(Command::Pick));
        assert_eq!(map.command_for(Btn::A), None);
        assert_eq!(map.command_for(Btn::Start), Some(Command::Toggle));
    }
}
