use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub type TimePointIndex = i64;

const MIN_VISIBLE_BARS_COUNT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

/// Inclusive range of time point indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictRange {
    left: TimePointIndex,
    right: TimePointIndex,
}

impl StrictRange {
    #[must_use]
    pub fn new(left: TimePointIndex, right: TimePointIndex) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub fn left(self) -> TimePointIndex {
        self.left
    }

    #[must_use]
    pub fn right(self) -> TimePointIndex {
        self.right
    }

    #[must_use]
    pub fn count(self) -> f64 {
        (self.right - self.left + 1) as f64
    }

    #[must_use]
    pub fn contains(self, index: TimePointIndex) -> bool {
        self.left <= index && index <= self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeScaleOptions {
    /// Empty bars kept right of the last point.
    pub right_offset: f64,
    pub bar_spacing: f64,
    pub min_bar_spacing: f64,
    /// Zero means "half the scale width".
    pub max_bar_spacing: f64,
}

impl Default for TimeScaleOptions {
    fn default() -> Self {
        Self {
            right_offset: 0.0,
            bar_spacing: 6.0,
            min_bar_spacing: 0.5,
            max_bar_spacing: 0.0,
        }
    }
}

impl TimeScaleOptions {
    pub fn validate(self) -> ChartResult<()> {
        if !self.right_offset.is_finite() {
            return Err(ChartError::InvalidOptions(
                "time scale right offset must be finite".to_owned(),
            ));
        }
        if !self.bar_spacing.is_finite() || self.bar_spacing <= 0.0 {
            return Err(ChartError::InvalidOptions(
                "time scale bar spacing must be finite and > 0".to_owned(),
            ));
        }
        if !self.min_bar_spacing.is_finite() || self.min_bar_spacing <= 0.0 {
            return Err(ChartError::InvalidOptions(
                "time scale min bar spacing must be finite and > 0".to_owned(),
            ));
        }
        if !self.max_bar_spacing.is_finite() || self.max_bar_spacing < 0.0 {
            return Err(ChartError::InvalidOptions(
                "time scale max bar spacing must be finite and >= 0".to_owned(),
            ));
        }
        if self.max_bar_spacing > 0.0 && self.max_bar_spacing < self.min_bar_spacing {
            return Err(ChartError::InvalidOptions(
                "time scale max bar spacing must be >= min bar spacing".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Horizontal axis: one slot per time point, `bar_spacing` pixels apart,
/// anchored on the right edge.
#[derive(Debug, Clone)]
pub struct TimeScale {
    options: TimeScaleOptions,
    width: f64,
    times: Vec<f64>,
    right_offset: f64,
    bar_spacing: f64,
    visible_range: Option<LogicalRange>,
    visible_range_invalidated: bool,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::from_valid_options(TimeScaleOptions::default())
    }
}

impl TimeScale {
    pub fn new(options: TimeScaleOptions) -> ChartResult<Self> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: TimeScaleOptions) -> Self {
        Self {
            width: 0.0,
            times: Vec::new(),
            right_offset: options.right_offset,
            bar_spacing: options.bar_spacing,
            visible_range: None,
            visible_range_invalidated: true,
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> TimeScaleOptions {
        self.options
    }

    pub fn set_width(&mut self, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale width must be finite and > 0".to_owned(),
            ));
        }
        self.width = width;
        self.visible_range_invalidated = true;
        self.correct_bar_spacing();
        self.correct_offset();
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.times.is_empty()
    }

    /// Replaces the sorted time points; index `i` maps to `times[i]`.
    pub fn set_times(&mut self, times: Vec<f64>) {
        self.times = times;
        self.visible_range_invalidated = true;
        self.correct_bar_spacing();
        self.correct_offset();
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Index of an exact time point.
    #[must_use]
    pub fn time_to_index(&self, time: f64) -> Option<TimePointIndex> {
        self.times
            .binary_search_by(|probe| probe.total_cmp(&time))
            .ok()
            .map(|index| index as TimePointIndex)
    }

    /// Rightmost index the offset is measured from.
    #[must_use]
    pub fn base_index(&self) -> TimePointIndex {
        (self.times.len() as TimePointIndex - 1).max(0)
    }

    #[must_use]
    pub fn right_offset(&self) -> f64 {
        self.right_offset
    }

    pub fn set_right_offset(&mut self, offset: f64) -> ChartResult<()> {
        if !offset.is_finite() {
            return Err(ChartError::InvalidData(
                "time scale right offset must be finite".to_owned(),
            ));
        }
        self.right_offset = offset;
        self.visible_range_invalidated = true;
        self.correct_offset();
        Ok(())
    }

    #[must_use]
    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    pub fn set_bar_spacing(&mut self, bar_spacing: f64) -> ChartResult<()> {
        if !bar_spacing.is_finite() || bar_spacing <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale bar spacing must be finite and > 0".to_owned(),
            ));
        }
        self.bar_spacing = bar_spacing;
        self.visible_range_invalidated = true;
        self.correct_bar_spacing();
        self.correct_offset();
        Ok(())
    }

    /// Spreads every time point across the width, keeping the configured right offset.
    pub fn fit_content(&mut self) -> ChartResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let bars = self.times.len() as f64 + self.options.right_offset;
        self.bar_spacing = self.width / bars;
        self.right_offset = self.options.right_offset;
        self.visible_range_invalidated = true;
        self.correct_bar_spacing();
        self.correct_offset();
        Ok(())
    }

    pub fn index_to_coordinate(&self, index: TimePointIndex) -> ChartResult<f64> {
        if self.is_empty() {
            return Ok(0.0);
        }
        let delta_from_right = self.base_index() as f64 + self.right_offset - index as f64;
        Ok(self.width - (delta_from_right + 0.5) * self.bar_spacing - 1.0)
    }

    pub fn coordinate_to_float_index(&self, x: f64) -> ChartResult<f64> {
        if !x.is_finite() {
            return Err(ChartError::InvalidData(
                "coordinate must be finite".to_owned(),
            ));
        }
        let delta_from_right = (self.width - 1.0 - x) / self.bar_spacing;
        let index = self.base_index() as f64 + self.right_offset - delta_from_right;
        Ok((index * 1_000_000.0).round() / 1_000_000.0)
    }

    pub fn visible_logical_range(&mut self) -> Option<LogicalRange> {
        self.update_visible_range();
        self.visible_range
    }

    pub fn visible_strict_range(&mut self) -> Option<StrictRange> {
        self.update_visible_range();
        self.visible_range.map(|range| {
            StrictRange::new(
                range.from.floor() as TimePointIndex,
                range.to.ceil() as TimePointIndex,
            )
        })
    }

    fn update_visible_range(&mut self) {
        if !self.visible_range_invalidated {
            return;
        }
        self.visible_range_invalidated = false;
        if self.is_empty() {
            self.visible_range = None;
            return;
        }
        let bars_length = self.width / self.bar_spacing;
        let right_border = self.right_offset + self.base_index() as f64;
        self.visible_range = Some(LogicalRange {
            from: right_border - bars_length + 1.0,
            to: right_border,
        });
    }

    fn correct_bar_spacing(&mut self) {
        let max = if self.options.max_bar_spacing > 0.0 {
            self.options.max_bar_spacing
        } else {
            self.width * 0.5
        }
        .max(self.options.min_bar_spacing);
        let clamped = self.bar_spacing.clamp(self.options.min_bar_spacing, max);
        if (clamped - self.bar_spacing).abs() > f64::EPSILON {
            self.bar_spacing = clamped;
            self.visible_range_invalidated = true;
        }
    }

    fn correct_offset(&mut self) {
        if self.times.is_empty() || self.width <= 0.0 {
            return;
        }
        let visible_points = MIN_VISIBLE_BARS_COUNT.min(self.times.len() as f64);
        let min_right_offset = -(self.base_index() as f64) - 1.0 + visible_points;
        let max_right_offset = self.width / self.bar_spacing - visible_points;
        let corrected = self.right_offset.min(max_right_offset).max(min_right_offset);
        if (corrected - self.right_offset).abs() > f64::EPSILON {
            self.right_offset = corrected;
            self.visible_range_invalidated = true;
        }
    }
}
