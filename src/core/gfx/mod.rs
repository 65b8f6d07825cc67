mod backends;

use crate::ui::actors::Actor;

pub use backends::software::{State as SoftwareRenderer, init as init_software};

// --- Public Data Contract ---

/// Consumer of a frame's draw list.
pub trait Renderer {
    /// Paints `actors` in order and presents the frame.
    fn draw(&mut self, actors: &[Actor]);

    /// Called once when the menu shuts down.
    fn finish(&mut self) {}
}
