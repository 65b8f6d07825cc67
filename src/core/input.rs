use crate::game::navigation::NavDirection;
use log::{trace, warn};
use std::io::BufRead;

/// Discrete menu command produced by an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Left,
    Right,
    Up,
    Down,
    Activate,
    Quit,
}

impl MenuCommand {
    #[inline(always)]
    pub const fn direction(self) -> Option<NavDirection> {
        match self {
            Self::Left => Some(NavDirection::Left),
            Self::Right => Some(NavDirection::Right),
            Self::Up => Some(NavDirection::Up),
            Self::Down => Some(NavDirection::Down),
            Self::Activate | Self::Quit => None,
        }
    }

    /// Accepts arrow names, vi keys and a few confirm/quit aliases.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "left" | "h" => Some(Self::Left),
            "right" | "l" => Some(Self::Right),
            "up" | "k" => Some(Self::Up),
            "down" | "j" => Some(Self::Down),
            "start" | "enter" | "a" | "activate" => Some(Self::Activate),
            "quit" | "q" | "exit" | "back" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Source of menu commands, polled once per frame.
pub trait InputSource {
    /// Commands gathered since the previous poll, in arrival order.
    /// `None` once the device is gone.
    fn poll(&mut self) -> Option<Vec<MenuCommand>>;
}

/// Reads whitespace-separated command words, one batch per line.
pub struct LineInput<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineInput<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn poll(&mut self) -> Option<Vec<MenuCommand>> {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => None,
            Ok(_) => {
                let batch: Vec<_> = self
                    .line
                    .split_whitespace()
                    .filter_map(|word| {
                        let cmd = MenuCommand::from_word(word);
                        if cmd.is_none() {
                            warn!("Ignoring unknown input `{word}'");
                        }
                        cmd
                    })
                    .collect();
                trace!("input batch: {batch:?}");
                Some(batch)
            }
            Err(e) => {
                warn!("Input read failed: {e}");
                None
            }
        }
    }
}
