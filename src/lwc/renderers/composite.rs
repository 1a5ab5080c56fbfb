use smallvec::SmallVec;

use crate::error::ChartResult;
use crate::render::RenderFrame;

use super::PaneRenderer;

/// Ordered renderer list executed as one draw call.
///
/// Renderers draw in insertion order, so later entries paint over earlier
/// ones. Storage is inline for the usual handful of passes.
#[derive(Default)]
pub struct CompositeRenderer<'a> {
    renderers: SmallVec<[&'a dyn PaneRenderer; 4]>,
}

impl<'a> CompositeRenderer<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: &'a dyn PaneRenderer) -> Self {
        self.renderers.push(renderer);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Names of the held renderers in draw order.
    pub fn renderer_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.renderers.iter().map(|renderer| renderer.name())
    }

    /// Draws every renderer in order, stopping at the first failure.
    pub fn draw(&self, frame: &mut RenderFrame) -> ChartResult<()> {
        for renderer in &self.renderers {
            renderer.draw(frame)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CompositeRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.renderer_names()).finish()
    }
}
