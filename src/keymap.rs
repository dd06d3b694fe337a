//! Buttons, the commands they send, and new-press/held-press tracking.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Power,
    VolumeUp,
    VolumeDown,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Power, Button::VolumeUp, Button::VolumeDown];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub address: u8,
    pub command: u8,
}

impl Command {
    pub const fn new(address: u8, command: u8) -> Self {
        Self { address, command }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub power: Command,
    pub volume_up: Command,
    pub volume_down: Command,
}

impl Keymap {
    pub const fn command(&self, button: Button) -> Command {
        match button {
            Button::Power => self.power,
            Button::VolumeUp => self.volume_up,
            Button::VolumeDown => self.volume_down,
        }
    }
}

/// TV device address for NEC.
pub const NEC_TV: u8 = 0b1110_1010;

pub const NEC_KEYMAP: Keymap = Keymap {
    power: Command::new(NEC_TV, 0b0001_0111),
    volume_up: Command::new(NEC_TV, 0b0000_1111),
    volume_down: Command::new(NEC_TV, 0b0001_0000),
};

/// TV device address for Sony SIRC.
pub const SONY_TV: u8 = 0x01;

pub const SONY_KEYMAP: Keymap = Keymap {
    power: Command::new(SONY_TV, 0x15),
    volume_up: Command::new(SONY_TV, 0x12),
    volume_down: Command::new(SONY_TV, 0x13),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// First poll with this button down.
    Send(Button),
    /// Same button still down since the last poll.
    Repeat(Button),
}

/// Remembers which button was down on the previous poll.
#[derive(Debug, Default)]
pub struct Trigger {
    last: Option<Button>,
}

impl Trigger {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn update(&mut self, pressed: Option<Button>) -> Option<Action> {
        let previous = core::mem::replace(&mut self.last, pressed);
        let button = pressed?;
        if previous == Some(button) {
            Some(Action::Repeat(button))
        } else {
            Some(Action::Send(button))
        }
    }
}

/// First button reported down, in [`Button::ALL`] order.
pub fn first_pressed<F>(mut is_down: F) -> Option<Button>
where
    F: FnMut(Button) -> bool,
{
    Button::ALL.into_iter().find(|&button| is_down(button))
}
