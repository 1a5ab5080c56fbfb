mod baseline_pane_view;
mod items;
mod line_pane_view_base;
mod sources;

pub use baseline_pane_view::BaselinePaneView;
pub use items::{ItemBuilder, ItemRange, LineItem, LineItemBuilder, PlotItem, visible_timed_values};
pub use line_pane_view_base::{LinePaneViewBase, SeriesUpdateKind};
pub use sources::{PriceScaleSource, SeriesScales, SeriesSource, TimeScaleSource};
