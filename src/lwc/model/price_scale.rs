use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

use super::StrictRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceScaleMode {
    #[default]
    Normal,
    Logarithmic,
    Percentage,
    IndexedTo100,
}

/// Fractions of the pane height kept free above and below the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl PriceScaleMargins {
    pub fn validate(self) -> ChartResult<()> {
        if !self.top.is_finite() || !(0.0..=1.0).contains(&self.top) {
            return Err(ChartError::InvalidOptions(
                "price scale top margin must be in [0,1]".to_owned(),
            ));
        }
        if !self.bottom.is_finite() || !(0.0..=1.0).contains(&self.bottom) {
            return Err(ChartError::InvalidOptions(
                "price scale bottom margin must be in [0,1]".to_owned(),
            ));
        }
        if self.top + self.bottom > 1.0 {
            return Err(ChartError::InvalidOptions(
                "sum of price scale margins must be <= 1".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for PriceScaleMargins {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceScaleOptions {
    pub auto_scale: bool,
    pub mode: PriceScaleMode,
    pub invert_scale: bool,
    /// `None` leaves the whole pane height to the scale.
    pub scale_margins: Option<PriceScaleMargins>,
}

impl Default for PriceScaleOptions {
    fn default() -> Self {
        Self {
            auto_scale: true,
            mode: PriceScaleMode::Normal,
            invert_scale: false,
            scale_margins: Some(PriceScaleMargins::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.min == self.max || self.min.is_nan() || self.max.is_nan()
    }

    #[must_use]
    pub fn merge(self, other: PriceRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.min), f(self.max))
    }
}

/// Anything that contributes a price range to an autoscaled price scale.
pub trait AutoScaleSource {
    fn visible(&self) -> bool;
    /// Reference value anchoring percentage and indexed modes.
    fn first_value(&self, visible_bars: StrictRange) -> Option<f64>;
    fn price_range(&self, visible_bars: StrictRange) -> Option<PriceRange>;
    fn min_move(&self) -> f64 {
        0.01
    }
}

const LOG_LOGICAL_OFFSET: f64 = 4.0;
const LOG_COORD_OFFSET: f64 = 0.0001;

/// Vertical price axis mapping prices to pane-local pixel rows.
#[derive(Debug, Clone)]
pub struct PriceScale {
    id: String,
    options: PriceScaleOptions,
    height: f64,
    price_range: Option<PriceRange>,
}

impl PriceScale {
    #[must_use]
    pub fn new(id: impl Into<String>, options: PriceScaleOptions) -> Self {
        Self {
            id: id.into(),
            options,
            height: 0.0,
            price_range: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn options(&self) -> PriceScaleOptions {
        self.options
    }

    pub fn apply_options(&mut self, options: PriceScaleOptions) -> ChartResult<()> {
        if let Some(margins) = options.scale_margins {
            margins.validate()?;
        }
        self.options = options;
        Ok(())
    }

    /// Margins usable for layout, or `None` when absent or malformed.
    #[must_use]
    pub fn scale_margins(&self) -> Option<PriceScaleMargins> {
        let margins = self.options.scale_margins?;
        match margins.validate() {
            Ok(()) => Some(margins),
            Err(err) => {
                warn!(scale = %self.id, error = %err, "ignoring malformed scale margins");
                None
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> PriceScaleMode {
        self.options.mode
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.options.invert_scale
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height.max(0.0);
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    /// Pins the range in scale space (already transformed for the active mode).
    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        self.price_range = range;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height <= 0.0 || self.price_range.is_none_or(PriceRange::is_empty)
    }

    /// Rebuilds the autoscaled range from every visible source.
    ///
    /// No-op when autoscale is disabled.
    pub fn recalculate_price_range(
        &mut self,
        visible_bars: StrictRange,
        sources: &[&dyn AutoScaleSource],
    ) {
        if !self.options.auto_scale {
            return;
        }

        let mut merged: Option<PriceRange> = None;
        let mut min_move: f64 = 0.0;
        for source in sources.iter().filter(|source| source.visible()) {
            let (Some(first_value), Some(range)) = (
                source.first_value(visible_bars),
                source.price_range(visible_bars),
            ) else {
                continue;
            };
            let range = range.map(|price| self.price_to_logical(price, first_value));
            merged = Some(merged.map_or(range, |acc| acc.merge(range)));
            min_move = min_move.max(source.min_move());
        }

        self.price_range = match merged {
            Some(range) if range.is_empty() => {
                let extend = 5.0 * min_move.max(f64::EPSILON);
                Some(PriceRange::new(range.min() - extend, range.max() + extend))
            }
            Some(range) => Some(range),
            None => self.price_range.or(Some(PriceRange::new(-0.5, 0.5))),
        };
    }

    /// Maps a price to a pixel row; `base_value` anchors relative modes.
    pub fn price_to_coordinate(&self, price: f64, base_value: f64) -> ChartResult<f64> {
        if !price.is_finite() || !base_value.is_finite() {
            return Err(ChartError::InvalidData(
                "price and base value must be finite".to_owned(),
            ));
        }
        self.logical_to_coordinate(self.price_to_logical(price, base_value))
    }

    pub fn coordinate_to_price(&self, coordinate: f64, base_value: f64) -> ChartResult<f64> {
        let logical = self.coordinate_to_logical(coordinate)?;
        Ok(match self.options.mode {
            PriceScaleMode::Percentage => from_percent(logical, base_value),
            PriceScaleMode::IndexedTo100 => from_indexed_to_100(logical, base_value),
            PriceScaleMode::Logarithmic => from_log(logical),
            PriceScaleMode::Normal => logical,
        })
    }

    fn price_to_logical(&self, price: f64, base_value: f64) -> f64 {
        match self.options.mode {
            PriceScaleMode::Percentage => to_percent(price, base_value),
            PriceScaleMode::IndexedTo100 => to_indexed_to_100(price, base_value),
            PriceScaleMode::Logarithmic => to_log(price),
            PriceScaleMode::Normal => price,
        }
    }

    fn logical_to_coordinate(&self, logical: f64) -> ChartResult<f64> {
        // An empty scale maps everything onto row 0.
        let Some(range) = self.price_range.filter(|_| !self.is_empty()) else {
            return Ok(0.0);
        };
        let inv_coordinate = self.bottom_margin_px()
            + (self.internal_height() - 1.0) * (logical - range.min()) / range.length();
        Ok(self.inverted_coordinate(inv_coordinate))
    }

    fn coordinate_to_logical(&self, coordinate: f64) -> ChartResult<f64> {
        if !coordinate.is_finite() {
            return Err(ChartError::InvalidData(
                "coordinate must be finite".to_owned(),
            ));
        }
        let Some(range) = self.price_range.filter(|_| !self.is_empty()) else {
            return Ok(0.0);
        };
        let inv_coordinate = self.inverted_coordinate(coordinate);
        Ok(range.min()
            + range.length()
                * ((inv_coordinate - self.bottom_margin_px()) / (self.internal_height() - 1.0)))
    }

    fn internal_height(&self) -> f64 {
        self.height - self.top_margin_px() - self.bottom_margin_px()
    }

    fn inverted_coordinate(&self, coordinate: f64) -> f64 {
        if self.is_inverted() {
            coordinate
        } else {
            self.height - 1.0 - coordinate
        }
    }

    fn top_margin_px(&self) -> f64 {
        let margins = self.scale_margins_or_zero();
        let fraction = if self.is_inverted() {
            margins.bottom
        } else {
            margins.top
        };
        fraction * self.height
    }

    fn bottom_margin_px(&self) -> f64 {
        let margins = self.scale_margins_or_zero();
        let fraction = if self.is_inverted() {
            margins.top
        } else {
            margins.bottom
        };
        fraction * self.height
    }

    fn scale_margins_or_zero(&self) -> PriceScaleMargins {
        self.options
            .scale_margins
            .filter(|margins| margins.validate().is_ok())
            .unwrap_or(PriceScaleMargins {
                top: 0.0,
                bottom: 0.0,
            })
    }
}

fn to_percent(value: f64, base_value: f64) -> f64 {
    let result = 100.0 * (value - base_value) / base_value;
    if base_value < 0.0 { -result } else { result }
}

fn from_percent(value: f64, base_value: f64) -> f64 {
    let value = if base_value < 0.0 { -value } else { value };
    (value / 100.0) * base_value + base_value
}

fn to_indexed_to_100(value: f64, base_value: f64) -> f64 {
    let result = 100.0 * (value - base_value) / base_value + 100.0;
    if base_value < 0.0 { -result } else { result }
}

fn from_indexed_to_100(value: f64, base_value: f64) -> f64 {
    let mut value = value - 100.0;
    if base_value < 0.0 {
        value = -value;
    }
    (value / 100.0) * base_value + base_value
}

fn to_log(price: f64) -> f64 {
    let magnitude = price.abs();
    if magnitude < 1e-15 {
        return 0.0;
    }
    let value = (magnitude + LOG_COORD_OFFSET).log10() + LOG_LOGICAL_OFFSET;
    if price < 0.0 { -value } else { value }
}

fn from_log(logical: f64) -> f64 {
    let magnitude = logical.abs();
    if magnitude < 1e-15 {
        return 0.0;
    }
    let value = 10f64.powf(magnitude - LOG_LOGICAL_OFFSET) - LOG_COORD_OFFSET;
    if logical < 0.0 { -value } else { value }
}
