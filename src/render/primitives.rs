use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels and a normalized alpha.
    #[must_use]
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            alpha,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Dash styles understood by every stroke primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    LargeDashed,
    SparseDotted,
}

impl LineStrokeStyle {
    /// Dash pattern (on, off, ...) scaled by the stroke width. Empty means solid.
    #[must_use]
    pub fn dash_pattern(self, line_width: f64) -> SmallVec<[f64; 2]> {
        let w = line_width;
        match self {
            Self::Solid => SmallVec::new(),
            Self::Dotted => SmallVec::from_buf([w, w]),
            Self::Dashed => SmallVec::from_buf([2.0 * w, 2.0 * w]),
            Self::LargeDashed => SmallVec::from_buf([6.0 * w, 6.0 * w]),
            Self::SparseDotted => SmallVec::from_buf([w, 4.0 * w]),
        }
    }
}

/// How consecutive points of a series are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineType {
    #[default]
    Simple,
    WithSteps,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    BezierTo {
        control1: Point,
        control2: Point,
        to: Point,
    },
    Close,
}

impl PathCommand {
    fn points_are_finite(self) -> bool {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => p.is_finite(),
            Self::BezierTo {
                control1,
                control2,
                to,
            } => control1.is_finite() && control2.is_finite() && to.is_finite(),
            Self::Close => true,
        }
    }
}

fn validate_path(path: &[PathCommand]) -> ChartResult<()> {
    match path.first() {
        Some(PathCommand::MoveTo(_)) => {}
        Some(_) => {
            return Err(ChartError::InvalidData(
                "path must start with a move command".to_owned(),
            ));
        }
        None => {
            return Err(ChartError::InvalidData(
                "path must not be empty".to_owned(),
            ));
        }
    }
    if path.iter().any(|command| !command.points_are_finite()) {
        return Err(ChartError::InvalidData(
            "path coordinates must be finite".to_owned(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient running from `top` to `bottom` along the y axis.
///
/// Two stops may share an offset, which produces a hard color edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalGradient {
    pub top: f64,
    pub bottom: f64,
    pub stops: SmallVec<[GradientStop; 4]>,
}

impl VerticalGradient {
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self {
            top,
            bottom,
            stops: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(GradientStop { offset, color });
        self
    }

    /// Color at a normalized offset; the later stop wins on a shared offset.
    #[must_use]
    pub fn color_at(&self, offset: f64) -> Option<Color> {
        let mut picked = None;
        for stop in &self.stops {
            if stop.offset <= offset {
                picked = Some(stop.color);
            } else if picked.is_none() {
                return Some(stop.color);
            }
        }
        picked
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.top.is_finite() || !self.bottom.is_finite() {
            return Err(ChartError::InvalidData(
                "gradient bounds must be finite".to_owned(),
            ));
        }
        if self.stops.is_empty() {
            return Err(ChartError::InvalidData(
                "gradient requires at least one stop".to_owned(),
            ));
        }
        let mut previous = 0.0;
        for stop in &self.stops {
            if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
                return Err(ChartError::InvalidData(
                    "gradient stop offset must be in [0, 1]".to_owned(),
                ));
            }
            if stop.offset < previous {
                return Err(ChartError::InvalidData(
                    "gradient stop offsets must be non-decreasing".to_owned(),
                ));
            }
            previous = stop.offset;
            stop.color.validate()?;
        }
        Ok(())
    }
}

/// Filled closed path painted with a vertical gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPathPrimitive {
    pub path: Vec<PathCommand>,
    pub gradient: VerticalGradient,
}

impl FillPathPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        validate_path(&self.path)?;
        self.gradient.validate()
    }
}

/// Stroked open path painted with a vertical gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePathPrimitive {
    pub path: Vec<PathCommand>,
    pub stroke_width: f64,
    pub style: LineStrokeStyle,
    pub gradient: VerticalGradient,
}

impl StrokePathPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        validate_path(&self.path)?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.gradient.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LineStrokeStyle, VerticalGradient};

    #[test]
    fn dash_patterns_scale_with_line_width() {
        assert!(LineStrokeStyle::Solid.dash_pattern(2.0).is_empty());
        assert_eq!(LineStrokeStyle::Dashed.dash_pattern(2.0).as_slice(), &[4.0, 4.0]);
        assert_eq!(
            LineStrokeStyle::SparseDotted.dash_pattern(3.0).as_slice(),
            &[3.0, 12.0]
        );
    }

    #[test]
    fn hard_edge_gradient_switches_color_at_shared_offset() {
        let above = Color::rgb(0.0, 1.0, 0.0);
        let below = Color::rgb(1.0, 0.0, 0.0);
        let gradient = VerticalGradient::new(0.0, 100.0)
            .with_stop(0.0, above)
            .with_stop(0.5, above)
            .with_stop(0.5, below)
            .with_stop(1.0, below);
        gradient.validate().expect("valid gradient");
        assert_eq!(gradient.color_at(0.25), Some(above));
        assert_eq!(gradient.color_at(0.5), Some(below));
        assert_eq!(gradient.color_at(0.9), Some(below));
    }

    #[test]
    fn decreasing_stop_offsets_are_rejected() {
        let color = Color::rgb(0.2, 0.2, 0.2);
        let gradient = VerticalGradient::new(0.0, 10.0)
            .with_stop(0.6, color)
            .with_stop(0.4, color);
        assert!(gradient.validate().is_err());
    }
}
