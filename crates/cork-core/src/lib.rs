pub mod config;
pub mod id;
pub mod layout;
pub mod model;
pub mod store;
pub mod viewport;

pub use config::CanvasConfig;
pub use id::{CardId, ConnectionId};
pub use layout::layout_batch;
pub use model::*;
pub use store::{Board, BoardMutation, CardStore, ConnectionStore};
pub use viewport::{ScaleLimits, ViewportSize, ViewportTransform};
