use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::DataPoint;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle, LineType};

use super::{
    AutoScaleSource, PriceRange, RIGHT_PRICE_SCALE_ID, StrictRange, TimePointIndex, TimeScale,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseValueKind {
    #[default]
    Price,
    Percentage,
}

/// Level the baseline series splits around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseValue {
    #[serde(rename = "type", default)]
    pub kind: BaseValueKind,
    pub price: f64,
}

impl Default for BaseValue {
    fn default() -> Self {
        Self {
            kind: BaseValueKind::Price,
            price: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaselineStyleOptions {
    pub visible: bool,
    pub price_scale_id: String,
    pub base_value: BaseValue,
    pub top_fill_color1: Color,
    pub top_fill_color2: Color,
    pub top_line_color: Color,
    pub bottom_fill_color1: Color,
    pub bottom_fill_color2: Color,
    pub bottom_line_color: Color,
    pub line_width: f64,
    pub line_style: LineStrokeStyle,
    pub line_type: LineType,
}

impl Default for BaselineStyleOptions {
    fn default() -> Self {
        Self {
            visible: true,
            price_scale_id: RIGHT_PRICE_SCALE_ID.to_owned(),
            base_value: BaseValue::default(),
            top_fill_color1: Color::from_rgba8(38, 166, 154, 0.28),
            top_fill_color2: Color::from_rgba8(38, 166, 154, 0.05),
            top_line_color: Color::from_rgba8(38, 166, 154, 1.0),
            bottom_fill_color1: Color::from_rgba8(239, 83, 80, 0.05),
            bottom_fill_color2: Color::from_rgba8(239, 83, 80, 0.28),
            bottom_line_color: Color::from_rgba8(239, 83, 80, 1.0),
            line_width: 3.0,
            line_style: LineStrokeStyle::Solid,
            line_type: LineType::Simple,
        }
    }
}

impl BaselineStyleOptions {
    /// Parses camelCase JSON options; missing fields keep their defaults.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidOptions(format!("failed to parse baseline options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidOptions(format!("failed to serialize baseline options: {e}"))
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidOptions(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        if !self.base_value.price.is_finite() {
            return Err(ChartError::InvalidOptions(
                "base value price must be finite".to_owned(),
            ));
        }
        if self.price_scale_id.is_empty() {
            return Err(ChartError::InvalidOptions(
                "price scale id must not be empty".to_owned(),
            ));
        }
        for color in [
            self.top_fill_color1,
            self.top_fill_color2,
            self.top_line_color,
            self.bottom_fill_color1,
            self.bottom_fill_color2,
            self.bottom_line_color,
        ] {
            color.validate()?;
        }
        Ok(())
    }
}

/// Series sample placed on the shared time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub index: TimePointIndex,
    pub time: f64,
    pub value: f64,
}

/// Reference value of the first row at or right of the visible range start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstValue {
    pub value: f64,
    pub index: TimePointIndex,
}

#[derive(Debug, Clone, Default)]
pub struct BaselineSeries {
    options: BaselineStyleOptions,
    points: Vec<DataPoint>,
    rows: Vec<SeriesRow>,
}

impl BaselineSeries {
    pub fn new(options: BaselineStyleOptions) -> ChartResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            points: Vec::new(),
            rows: Vec::new(),
        })
    }

    #[must_use]
    pub fn options(&self) -> &BaselineStyleOptions {
        &self.options
    }

    pub fn apply_options(&mut self, options: BaselineStyleOptions) -> ChartResult<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.options.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.options.visible = visible;
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Replaces the raw samples. Rows stay empty until `reindex` runs.
    pub fn set_data(&mut self, points: Vec<DataPoint>) {
        let original_count = points.len();
        self.points = canonicalize_points(points);
        self.rows.clear();
        debug!(
            original_count,
            canonical_count = self.points.len(),
            "set baseline series data"
        );
    }

    /// Places every sample on `time_scale`; samples without a time point are dropped.
    pub fn reindex(&mut self, time_scale: &TimeScale) {
        self.rows = self
            .points
            .iter()
            .filter_map(|point| {
                time_scale.time_to_index(point.time).map(|index| SeriesRow {
                    index,
                    time: point.time,
                    value: point.value,
                })
            })
            .collect();
        if self.rows.len() != self.points.len() {
            warn!(
                dropped = self.points.len() - self.rows.len(),
                "series samples missing from the time scale"
            );
        }
    }

    #[must_use]
    pub fn first_value(&self, visible_bars: StrictRange) -> Option<FirstValue> {
        let start = self
            .rows
            .partition_point(|row| row.index < visible_bars.left());
        self.rows.get(start).map(|row| FirstValue {
            value: row.value,
            index: row.index,
        })
    }

    fn visible_rows(&self, visible_bars: StrictRange) -> &[SeriesRow] {
        let start = self
            .rows
            .partition_point(|row| row.index < visible_bars.left());
        let end = self
            .rows
            .partition_point(|row| row.index <= visible_bars.right());
        &self.rows[start..end.max(start)]
    }
}

impl AutoScaleSource for BaselineSeries {
    fn visible(&self) -> bool {
        self.options.visible
    }

    fn first_value(&self, visible_bars: StrictRange) -> Option<f64> {
        BaselineSeries::first_value(self, visible_bars).map(|first| first.value)
    }

    fn price_range(&self, visible_bars: StrictRange) -> Option<PriceRange> {
        self.visible_rows(visible_bars)
            .iter()
            .map(|row| PriceRange::new(row.value, row.value))
            .reduce(PriceRange::merge)
    }
}

fn canonicalize_points(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    let original_len = points.len();
    points.retain(|point| point.is_finite());
    points.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut deduped: Vec<DataPoint> = Vec::with_capacity(points.len());
    let mut duplicate_count = 0_usize;
    for point in points {
        if let Some(last) = deduped.last_mut()
            && point.time.total_cmp(&last.time) == Ordering::Equal
        {
            *last = point;
            duplicate_count += 1;
            continue;
        }
        deduped.push(point);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized baseline series data"
        );
    }
    deduped
}

#[cfg(test)]
mod tests {
    use crate::core::DataPoint;
    use crate::lwc::model::{AutoScaleSource, StrictRange, TimeScale, TimeScaleOptions};

    use super::{BaseValueKind, BaselineSeries, BaselineStyleOptions};

    fn indexed_series(points: Vec<DataPoint>) -> BaselineSeries {
        let mut series = BaselineSeries::new(BaselineStyleOptions::default()).expect("series");
        series.set_data(points);
        let mut time_scale = TimeScale::new(TimeScaleOptions::default()).expect("time scale");
        time_scale.set_width(400.0).expect("width");
        time_scale.set_times(series.points().iter().map(|p| p.time).collect());
        series.reindex(&time_scale);
        series
    }

    #[test]
    fn set_data_sorts_filters_and_keeps_last_duplicate() {
        let series = indexed_series(vec![
            DataPoint::new(3.0, 30.0),
            DataPoint::new(1.0, 10.0),
            DataPoint::new(f64::NAN, 5.0),
            DataPoint::new(1.0, 15.0),
        ]);
        let values = series.rows().iter().map(|r| r.value).collect::<Vec<_>>();
        assert_eq!(values, vec![15.0, 30.0]);
        assert_eq!(series.rows()[1].index, 1);
    }

    #[test]
    fn first_value_is_nearest_row_right_of_visible_start() {
        let series = indexed_series(
            (0..10)
                .map(|i| DataPoint::new(i as f64, 100.0 + i as f64))
                .collect(),
        );
        let first = series.first_value(StrictRange::new(4, 8)).expect("first");
        assert_eq!(first.index, 4);
        assert_eq!(first.value, 104.0);
        assert!(series.first_value(StrictRange::new(12, 20)).is_none());
    }

    #[test]
    fn autoscale_range_only_covers_visible_rows() {
        let series =
            indexed_series((0..10).map(|i| DataPoint::new(i as f64, i as f64)).collect());
        let range = AutoScaleSource::price_range(&series, StrictRange::new(2, 5)).expect("range");
        assert_eq!((range.min(), range.max()), (2.0, 5.0));
    }

    #[test]
    fn json_options_fill_missing_fields_with_defaults() {
        let options = BaselineStyleOptions::from_json_str(
            r#"{ "baseValue": { "type": "percentage", "price": 12.5 }, "lineWidth": 2 }"#,
        )
        .expect("parse");
        assert_eq!(options.base_value.kind, BaseValueKind::Percentage);
        assert_eq!(options.base_value.price, 12.5);
        assert_eq!(options.line_width, 2.0);
        assert_eq!(options.price_scale_id, "right");
        assert!(options.visible);
    }

    #[test]
    fn pretty_json_keeps_camel_case_keys() {
        let options = BaselineStyleOptions {
            price_scale_id: "overlay".to_owned(),
            ..BaselineStyleOptions::default()
        };
        let json = options.to_json_pretty().expect("serialize");
        assert!(json.contains("\"priceScaleId\": \"overlay\""));
        assert!(json.contains("\"topFillColor1\""));
        assert_eq!(BaselineStyleOptions::from_json_str(&json).expect("parse"), options);
    }

    #[test]
    fn json_options_reject_invalid_line_width() {
        assert!(BaselineStyleOptions::from_json_str(r#"{ "lineWidth": 0 }"#).is_err());
        assert!(BaselineStyleOptions::from_json_str("{ not json").is_err());
    }
}
