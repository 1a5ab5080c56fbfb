mod chart_model;
mod pane;
mod price_scale;
mod series;
mod time_scale;

pub use chart_model::{ChartModel, SeriesId};
pub use pane::{DefaultPriceAxes, LEFT_PRICE_SCALE_ID, Pane, RIGHT_PRICE_SCALE_ID};
pub use price_scale::{
    AutoScaleSource, PriceRange, PriceScale, PriceScaleMargins, PriceScaleMode, PriceScaleOptions,
};
pub use series::{
    BaseValue, BaseValueKind, BaselineSeries, BaselineStyleOptions, FirstValue, SeriesRow,
};
pub use time_scale::{LogicalRange, StrictRange, TimePointIndex, TimeScale, TimeScaleOptions};
