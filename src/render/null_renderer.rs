use crate::error::ChartResult;
use crate::render::{DrawCommand, RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so invalid geometry surfaces without a
/// real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_fill_count: usize,
    pub last_stroke_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_fill_count = 0;
        self.last_stroke_count = 0;
        for command in &frame.commands {
            match command {
                DrawCommand::FillPath(_) => self.last_fill_count += 1,
                DrawCommand::StrokePath(_) => self.last_stroke_count += 1,
            }
        }
        self.frames_rendered += 1;
        Ok(())
    }
}
