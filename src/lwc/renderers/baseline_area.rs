use std::rc::Rc;

use crate::error::ChartResult;
use crate::lwc::views::{ItemRange, LineItem};
use crate::render::{
    Color, FillPathPrimitive, LineStrokeStyle, LineType, RenderFrame, VerticalGradient,
};

use super::walk_line::{close_to_level, walk_line};
use super::{PaneRenderer, split_offset};

/// Draw payload for the two-tone filled region.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineAreaData {
    pub items: Rc<Vec<LineItem>>,
    pub top_fill_color1: Color,
    pub top_fill_color2: Color,
    pub bottom_fill_color1: Color,
    pub bottom_fill_color2: Color,
    pub line_width: f64,
    pub line_style: LineStrokeStyle,
    pub line_type: LineType,
    /// Pixel row of the base value; the fill closes onto it.
    pub base_level_coordinate: f64,
    pub top: f64,
    pub bottom: f64,
    pub visible_range: Option<ItemRange>,
    pub bar_width: f64,
}

impl BaselineAreaData {
    /// Fill gradient over `top..bottom`, switching palettes at the base level.
    #[must_use]
    pub fn gradient(&self) -> VerticalGradient {
        let split = split_offset(self.base_level_coordinate, self.top, self.bottom);
        VerticalGradient::new(self.top, self.bottom)
            .with_stop(0.0, self.top_fill_color1)
            .with_stop(split, self.top_fill_color2)
            .with_stop(split, self.bottom_fill_color1)
            .with_stop(1.0, self.bottom_fill_color2)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BaselineAreaRenderer {
    data: Option<BaselineAreaData>,
}

impl BaselineAreaRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: BaselineAreaData) {
        self.data = Some(data);
    }

    #[must_use]
    pub fn data(&self) -> Option<&BaselineAreaData> {
        self.data.as_ref()
    }
}

impl PaneRenderer for BaselineAreaRenderer {
    fn name(&self) -> &'static str {
        "baseline-area"
    }

    fn draw(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        let Some(data) = &self.data else {
            return Ok(());
        };
        let Some(range) = data.visible_range else {
            return Ok(());
        };

        let mut path = Vec::with_capacity(range.len() + 3);
        let Some(span) = walk_line(&data.items, range, data.line_type, data.bar_width, &mut path)
        else {
            return Ok(());
        };
        close_to_level(&mut path, span, data.base_level_coordinate);

        frame.push_fill(FillPathPrimitive {
            path,
            gradient: data.gradient(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::core::Viewport;
    use crate::lwc::renderers::PaneRenderer;
    use crate::lwc::views::{ItemRange, LineItem};
    use crate::render::{Color, LineStrokeStyle, LineType, PathCommand, Point, RenderFrame};

    use super::{BaselineAreaData, BaselineAreaRenderer};

    fn area_data(visible_range: Option<ItemRange>) -> BaselineAreaData {
        let items = vec![
            LineItem {
                time: 0,
                price: 1.0,
                x: 10.0,
                y: 20.0,
            },
            LineItem {
                time: 1,
                price: 2.0,
                x: 20.0,
                y: 70.0,
            },
        ];
        BaselineAreaData {
            items: Rc::new(items),
            top_fill_color1: Color::rgb(0.0, 1.0, 0.0),
            top_fill_color2: Color::rgba(0.0, 1.0, 0.0, 0.2),
            bottom_fill_color1: Color::rgba(1.0, 0.0, 0.0, 0.2),
            bottom_fill_color2: Color::rgb(1.0, 0.0, 0.0),
            line_width: 2.0,
            line_style: LineStrokeStyle::Solid,
            line_type: LineType::Simple,
            base_level_coordinate: 40.0,
            top: 0.0,
            bottom: 80.0,
            visible_range,
            bar_width: 6.0,
        }
    }

    #[test]
    fn area_path_closes_onto_base_level() {
        let mut renderer = BaselineAreaRenderer::new();
        renderer.set_data(area_data(Some(ItemRange { from: 0, to: 2 })));
        let mut frame = RenderFrame::new(Viewport::new(100, 80));
        renderer.draw(&mut frame).expect("draw");

        let fill = frame.fills().next().expect("fill");
        assert_eq!(
            fill.path,
            vec![
                PathCommand::MoveTo(Point::new(10.0, 20.0)),
                PathCommand::LineTo(Point::new(20.0, 70.0)),
                PathCommand::LineTo(Point::new(20.0, 40.0)),
                PathCommand::LineTo(Point::new(10.0, 40.0)),
                PathCommand::Close,
            ]
        );
        frame.validate().expect("valid frame");
    }

    #[test]
    fn gradient_splits_at_base_level_within_band() {
        let data = area_data(None);
        let gradient = data.gradient();
        let offsets = gradient.stops.iter().map(|s| s.offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![0.0, 0.5, 0.5, 1.0]);
        assert_eq!(gradient.stops[1].color, data.top_fill_color2);
        assert_eq!(gradient.stops[2].color, data.bottom_fill_color1);
    }

    #[test]
    fn nothing_is_drawn_without_payload_or_visible_range() {
        let mut frame = RenderFrame::new(Viewport::new(100, 80));
        let mut renderer = BaselineAreaRenderer::new();
        renderer.draw(&mut frame).expect("draw without data");
        renderer.set_data(area_data(None));
        renderer.draw(&mut frame).expect("draw without range");
        assert!(frame.is_empty());
    }
}
