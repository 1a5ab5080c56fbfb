use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{FillPathPrimitive, StrokePathPrimitive};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPath(FillPathPrimitive),
    StrokePath(StrokePathPrimitive),
}

/// Backend-agnostic scene for one pane draw pass.
///
/// Commands keep submission order; backends must paint them front to back in
/// that order so later passes sit on top of earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push_fill(&mut self, fill: FillPathPrimitive) {
        self.commands.push(DrawCommand::FillPath(fill));
    }

    pub fn push_stroke(&mut self, stroke: StrokePathPrimitive) {
        self.commands.push(DrawCommand::StrokePath(stroke));
    }

    pub fn fills(&self) -> impl Iterator<Item = &FillPathPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillPath(fill) => Some(fill),
            DrawCommand::StrokePath(_) => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &StrokePathPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::StrokePath(stroke) => Some(stroke),
            DrawCommand::FillPath(_) => None,
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for command in &self.commands {
            match command {
                DrawCommand::FillPath(fill) => fill.validate()?,
                DrawCommand::StrokePath(stroke) => stroke.validate()?,
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
