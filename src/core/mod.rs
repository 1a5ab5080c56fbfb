pub mod pane;
pub mod primitives;
pub mod types;

pub use pane::PaneId;
pub use types::{DataPoint, Viewport};
