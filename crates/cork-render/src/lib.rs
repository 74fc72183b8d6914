pub mod hit;
pub mod path;

pub use hit::{Hit, cards_at, hit_test, hit_test_screen, visible_cards};
pub use path::{ConnectionPath, Orientation, connection_path, connection_paths};
