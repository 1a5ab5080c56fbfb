use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::ChartResult;

use super::items::{ItemBuilder, ItemRange, PlotItem, visible_timed_values};
use super::sources::{SeriesScales, SeriesSource};

/// What changed upstream since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesUpdateKind {
    /// Rows were replaced or re-indexed; items must be rebuilt.
    Data,
    /// Style options changed.
    Options,
    /// Scale or layout state moved; only coordinates are stale.
    Other,
}

/// Shared item cache for line-like pane views.
///
/// Items are rebuilt from series rows through the injected `ItemBuilder`
/// and converted to pixels at most once per validity epoch.
#[derive(Debug)]
pub struct LinePaneViewBase<B: ItemBuilder> {
    builder: B,
    items: Rc<Vec<B::Item>>,
    visible_range: Option<ItemRange>,
    extended_visible_range: bool,
    invalidated: bool,
    data_invalidated: bool,
    rebuild_count: u64,
    recompute_count: u64,
}

impl<B: ItemBuilder> LinePaneViewBase<B> {
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            items: Rc::new(Vec::new()),
            visible_range: None,
            extended_visible_range: true,
            invalidated: true,
            data_invalidated: true,
            rebuild_count: 0,
            recompute_count: 0,
        }
    }

    pub fn update(&mut self, kind: SeriesUpdateKind) {
        self.invalidated = true;
        if kind == SeriesUpdateKind::Data {
            self.data_invalidated = true;
        }
    }

    #[must_use]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    #[must_use]
    pub fn items(&self) -> &Rc<Vec<B::Item>> {
        &self.items
    }

    #[must_use]
    pub fn visible_range(&self) -> Option<ItemRange> {
        self.visible_range
    }

    /// Number of times items were rebuilt from rows.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Number of times item coordinates were recomputed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Brings items up to date; a no-op while the view is valid.
    pub fn make_valid<S: SeriesSource + ?Sized>(
        &mut self,
        series: &S,
        scales: &mut SeriesScales<'_>,
    ) {
        if self.data_invalidated {
            self.fill_raw_items(series);
            self.data_invalidated = false;
        }
        if self.invalidated {
            self.recompute_count += 1;
            if let Err(err) = self.update_coordinates(series, scales) {
                warn!(error = %err, "failed to convert series items to coordinates");
                self.visible_range = None;
            }
            self.invalidated = false;
        }
    }

    fn fill_raw_items<S: SeriesSource + ?Sized>(&mut self, series: &S) {
        let builder = &mut self.builder;
        let items = series
            .rows()
            .iter()
            .map(|row| builder.build_item(row.index, row.value))
            .collect();
        self.items = Rc::new(items);
        self.visible_range = None;
        self.rebuild_count += 1;
        trace!(count = self.items.len(), "rebuilt series items");
    }

    fn update_coordinates<S: SeriesSource + ?Sized>(
        &mut self,
        series: &S,
        scales: &mut SeriesScales<'_>,
    ) -> ChartResult<()> {
        self.visible_range = None;
        if scales.time_scale.is_empty() || scales.price_scale.is_empty() || self.items.is_empty()
        {
            return Ok(());
        }
        let Some(visible_bars) = scales.time_scale.visible_strict_range() else {
            return Ok(());
        };
        let Some(first_value) = series.first_value(visible_bars) else {
            return Ok(());
        };

        let range = visible_timed_values(
            self.items.as_slice(),
            visible_bars,
            self.extended_visible_range,
        );
        let items = Rc::make_mut(&mut self.items);
        for item in &mut items[range.from..range.to] {
            let x = scales.time_scale.index_to_coordinate(item.time())?;
            let y = scales
                .price_scale
                .price_to_coordinate(item.price(), first_value.value)?;
            item.set_coordinates(x, y);
        }
        self.visible_range = Some(range);
        Ok(())
    }
}
