pub mod input;
pub mod interaction;
pub mod navigator;
pub mod shortcuts;

pub use input::{InputEvent, Modifiers};
pub use interaction::{InteractionController, InteractionMode, Outcome};
pub use navigator::{Direction, navigate};
pub use shortcuts::{ShortcutAction, ShortcutMap};
