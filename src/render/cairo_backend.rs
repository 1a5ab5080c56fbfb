use cairo::{Context, Format, ImageSurface, LineJoin, LinearGradient};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawCommand, PathCommand, RenderFrame, Renderer, VerticalGradient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub fills_drawn: usize,
    pub strokes_drawn: usize,
}

/// Renderers that can also draw into an externally owned Cairo context, for
/// example a toolkit's draw callback.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo renderer backend.
///
/// `Renderer::render` paints into an owned offscreen image surface;
/// `CairoContextRenderer` paints into a caller-provided context.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for command in &frame.commands {
            match command {
                DrawCommand::FillPath(fill) => {
                    append_path(context, &fill.path);
                    apply_gradient(context, &fill.gradient)?;
                    context
                        .fill()
                        .map_err(|err| map_backend_error("failed to fill path", err))?;
                    stats.fills_drawn += 1;
                }
                DrawCommand::StrokePath(stroke) => {
                    append_path(context, &stroke.path);
                    apply_gradient(context, &stroke.gradient)?;
                    context.set_line_width(stroke.stroke_width);
                    context.set_line_join(LineJoin::Round);
                    context.set_dash(&stroke.style.dash_pattern(stroke.stroke_width), 0.0);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke path", err))?;
                    context.set_dash(&[], 0.0);
                    stats.strokes_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_gradient(context: &Context, gradient: &VerticalGradient) -> ChartResult<()> {
    let pattern = LinearGradient::new(0.0, gradient.top, 0.0, gradient.bottom);
    for stop in &gradient.stops {
        pattern.add_color_stop_rgba(
            stop.offset,
            stop.color.red,
            stop.color.green,
            stop.color.blue,
            stop.color.alpha,
        );
    }
    context
        .set_source(&pattern)
        .map_err(|err| map_backend_error("failed to set gradient source", err))
}

fn append_path(context: &Context, path: &[PathCommand]) {
    context.new_path();
    for command in path {
        match *command {
            PathCommand::MoveTo(p) => context.move_to(p.x, p.y),
            PathCommand::LineTo(p) => context.line_to(p.x, p.y),
            PathCommand::BezierTo {
                control1,
                control2,
                to,
            } => context.curve_to(control1.x, control1.y, control2.x, control2.y, to.x, to.y),
            PathCommand::Close => context.close_path(),
        }
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
