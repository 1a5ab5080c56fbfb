//! Collaborator contracts a pane view reads from while building a frame.

use crate::error::ChartResult;
use crate::lwc::model::{
    BaselineSeries, BaselineStyleOptions, DefaultPriceAxes, FirstValue, PriceScale,
    PriceScaleMargins, SeriesRow, StrictRange, TimePointIndex, TimeScale,
};

pub trait SeriesSource {
    type Options;

    fn visible(&self) -> bool;
    fn first_value(&self, visible_bars: StrictRange) -> Option<FirstValue>;
    fn options(&self) -> &Self::Options;
    /// Rows sorted by time index.
    fn rows(&self) -> &[SeriesRow];
}

pub trait PriceScaleSource {
    fn id(&self) -> &str;
    /// Configured margins, `None` when absent or malformed.
    fn scale_margins(&self) -> Option<PriceScaleMargins>;
    fn is_empty(&self) -> bool;
    fn price_to_coordinate(&self, price: f64, base_value: f64) -> ChartResult<f64>;
}

pub trait TimeScaleSource {
    fn bar_spacing(&self) -> f64;
    fn is_empty(&self) -> bool;
    fn visible_strict_range(&mut self) -> Option<StrictRange>;
    fn index_to_coordinate(&self, index: TimePointIndex) -> ChartResult<f64>;
}

/// Scale borrows handed to a view for one frame.
pub struct SeriesScales<'a> {
    pub price_scale: &'a dyn PriceScaleSource,
    pub time_scale: &'a mut dyn TimeScaleSource,
    pub default_axes: &'a DefaultPriceAxes,
}

impl SeriesScales<'_> {
    #[must_use]
    pub fn is_custom_price_scale(&self) -> bool {
        self.default_axes.is_custom(self.price_scale.id())
    }
}

impl SeriesSource for BaselineSeries {
    type Options = BaselineStyleOptions;

    fn visible(&self) -> bool {
        BaselineSeries::visible(self)
    }

    fn first_value(&self, visible_bars: StrictRange) -> Option<FirstValue> {
        BaselineSeries::first_value(self, visible_bars)
    }

    fn options(&self) -> &BaselineStyleOptions {
        BaselineSeries::options(self)
    }

    fn rows(&self) -> &[SeriesRow] {
        BaselineSeries::rows(self)
    }
}

impl PriceScaleSource for PriceScale {
    fn id(&self) -> &str {
        PriceScale::id(self)
    }

    fn scale_margins(&self) -> Option<PriceScaleMargins> {
        PriceScale::scale_margins(self)
    }

    fn is_empty(&self) -> bool {
        PriceScale::is_empty(self)
    }

    fn price_to_coordinate(&self, price: f64, base_value: f64) -> ChartResult<f64> {
        PriceScale::price_to_coordinate(self, price, base_value)
    }
}

impl TimeScaleSource for TimeScale {
    fn bar_spacing(&self) -> f64 {
        TimeScale::bar_spacing(self)
    }

    fn is_empty(&self) -> bool {
        TimeScale::is_empty(self)
    }

    fn visible_strict_range(&mut self) -> Option<StrictRange> {
        TimeScale::visible_strict_range(self)
    }

    fn index_to_coordinate(&self, index: TimePointIndex) -> ChartResult<f64> {
        TimeScale::index_to_coordinate(self, index)
    }
}
