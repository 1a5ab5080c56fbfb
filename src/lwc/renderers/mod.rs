mod baseline_area;
mod baseline_line;
mod composite;
mod walk_line;

pub use baseline_area::{BaselineAreaData, BaselineAreaRenderer};
pub use baseline_line::{BaselineLineData, BaselineLineRenderer};
pub use composite::CompositeRenderer;

use crate::error::ChartResult;
use crate::render::RenderFrame;

/// One draw pass of a pane view.
pub trait PaneRenderer {
    /// Stable identifier used for diagnostics and ordering checks.
    fn name(&self) -> &'static str;
    fn draw(&self, frame: &mut RenderFrame) -> ChartResult<()>;
}

/// Normalized position of `level` between `top` and `bottom`, clamped to [0, 1].
pub(crate) fn split_offset(level: f64, top: f64, bottom: f64) -> f64 {
    let span = bottom - top;
    if !span.is_finite() || span <= 0.0 || !level.is_finite() {
        return if level > top { 1.0 } else { 0.0 };
    }
    ((level - top) / span).clamp(0.0, 1.0)
}
