use std::rc::Rc;

use crate::error::ChartResult;
use crate::lwc::views::{ItemRange, LineItem};
use crate::render::{
    Color, LineStrokeStyle, LineType, RenderFrame, StrokePathPrimitive, VerticalGradient,
};

use super::walk_line::walk_line;
use super::{PaneRenderer, split_offset};

/// Draw payload for the two-tone outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineLineData {
    pub items: Rc<Vec<LineItem>>,
    pub top_color: Color,
    pub bottom_color: Color,
    pub line_width: f64,
    pub line_style: LineStrokeStyle,
    pub line_type: LineType,
    pub base_level_coordinate: f64,
    /// Full pane height; the stroke gradient spans `0..bottom`.
    pub bottom: f64,
    pub visible_range: Option<ItemRange>,
    pub bar_width: f64,
}

impl BaselineLineData {
    #[must_use]
    pub fn gradient(&self) -> VerticalGradient {
        let split = split_offset(self.base_level_coordinate, 0.0, self.bottom);
        VerticalGradient::new(0.0, self.bottom)
            .with_stop(0.0, self.top_color)
            .with_stop(split, self.top_color)
            .with_stop(split, self.bottom_color)
            .with_stop(1.0, self.bottom_color)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BaselineLineRenderer {
    data: Option<BaselineLineData>,
}

impl BaselineLineRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: BaselineLineData) {
        self.data = Some(data);
    }

    #[must_use]
    pub fn data(&self) -> Option<&BaselineLineData> {
        self.data.as_ref()
    }
}

impl PaneRenderer for BaselineLineRenderer {
    fn name(&self) -> &'static str {
        "baseline-line"
    }

    fn draw(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let Some(data) = &self.data else {
            return Ok(());
        };
        let Some(range) = data.visible_range else {
            return Ok(());
        };

        let mut path = Vec::with_capacity(range.len());
        if walk_line(&data.items, range, data.line_type, data.bar_width, &mut path).is_none() {
            return Ok(());
        }

        frame.push_stroke(StrokePathPrimitive {
            path,
            stroke_width: data.line_width,
            style: data.line_style,
            gradient: data.gradient(),
        });
        Ok(())
    }
}
