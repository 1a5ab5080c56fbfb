use std::collections::BTreeSet;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{DataPoint, PaneId};
use crate::error::{ChartError, ChartResult};
use crate::lwc::views::{BaselinePaneView, SeriesScales, SeriesUpdateKind};
use crate::render::RenderFrame;

use super::{
    AutoScaleSource, BaselineSeries, BaselineStyleOptions, DefaultPriceAxes, Pane,
    PriceScaleOptions, TimeScale, TimeScaleOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u32);

impl SeriesId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct SeriesEntry {
    series: BaselineSeries,
    view: BaselinePaneView,
    pane_index: usize,
}

/// Owns the shared time scale, the panes and every baseline series with its
/// pane view.
#[derive(Debug)]
pub struct ChartModel {
    width: f64,
    time_scale: TimeScale,
    panes: Vec<Pane>,
    series: IndexMap<SeriesId, SeriesEntry>,
    next_series_id: u32,
}

impl ChartModel {
    #[must_use]
    pub fn with_default_pane(width: f64) -> Self {
        Self::from_time_scale(width, TimeScale::default())
    }

    /// Like [`ChartModel::with_default_pane`] with custom time scale options.
    pub fn with_time_scale_options(width: f64, options: TimeScaleOptions) -> ChartResult<Self> {
        Ok(Self::from_time_scale(width, TimeScale::new(options)?))
    }

    fn from_time_scale(width: f64, mut time_scale: TimeScale) -> Self {
        if let Err(err) = time_scale.set_width(width) {
            warn!(width, error = %err, "chart width rejected, time scale left empty");
        }
        let pane = Pane::new(
            PaneId::new(0),
            PriceScaleOptions::default(),
            PriceScaleOptions::default(),
        );
        Self {
            width,
            time_scale,
            panes: vec![pane],
            series: IndexMap::new(),
            next_series_id: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "chart model width must be finite and > 0".to_owned(),
            ));
        }
        self.width = width;
        self.time_scale.set_width(width)?;
        self.refresh_price_scales();
        Ok(())
    }

    #[must_use]
    pub fn time_scale(&self) -> &TimeScale {
        &self.time_scale
    }

    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn set_pane_height(&mut self, pane_index: usize, height: f64) -> ChartResult<()> {
        if !height.is_finite() || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "pane height must be finite and > 0".to_owned(),
            ));
        }
        self.pane_index_checked(pane_index)?;
        self.panes[pane_index].set_height(height);
        self.refresh_price_scales();
        Ok(())
    }

    /// Replaces the set of price scale ids treated as default axes on `pane_index`.
    pub fn set_default_price_axes(
        &mut self,
        pane_index: usize,
        axes: DefaultPriceAxes,
    ) -> ChartResult<()> {
        self.pane_index_checked(pane_index)?;
        self.panes[pane_index].set_default_axes(axes);
        for entry in self
            .series
            .values_mut()
            .filter(|entry| entry.pane_index == pane_index)
        {
            entry.view.update(SeriesUpdateKind::Options);
        }
        Ok(())
    }

    /// Replaces the options of price scale `price_scale_id` on `pane_index`.
    pub fn apply_price_scale_options(
        &mut self,
        pane_index: usize,
        price_scale_id: &str,
        options: PriceScaleOptions,
    ) -> ChartResult<()> {
        self.pane_index_checked(pane_index)?;
        let price_scale = self.panes[pane_index]
            .price_scale_mut(price_scale_id)
            .ok_or_else(|| {
                ChartError::InvalidData(format!("unknown price scale `{price_scale_id}`"))
            })?;
        price_scale.apply_options(options)?;
        self.refresh_price_scales();
        Ok(())
    }

    /// Adds an empty baseline series to `pane_index`.
    ///
    /// A price scale id that is not yet on the pane creates an overlay scale.
    pub fn add_baseline_series(
        &mut self,
        pane_index: usize,
        options: BaselineStyleOptions,
    ) -> ChartResult<SeriesId> {
        self.pane_index_checked(pane_index)?;
        let series = BaselineSeries::new(options)?;
        let price_scale_id = series.options().price_scale_id.clone();
        self.panes[pane_index].ensure_overlay_price_scale(
            price_scale_id.as_str(),
            PriceScaleOptions {
                scale_margins: None,
                ..PriceScaleOptions::default()
            },
        );

        let id = SeriesId(self.next_series_id);
        self.next_series_id += 1;
        self.series.insert(
            id,
            SeriesEntry {
                series,
                view: BaselinePaneView::new(),
                pane_index,
            },
        );
        debug!(series = id.raw(), pane_index, %price_scale_id, "added baseline series");
        Ok(id)
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&BaselineSeries> {
        self.series.get(&id).map(|entry| &entry.series)
    }

    #[must_use]
    pub fn series_view(&self, id: SeriesId) -> Option<&BaselinePaneView> {
        self.series.get(&id).map(|entry| &entry.view)
    }

    pub fn apply_series_options(
        &mut self,
        id: SeriesId,
        options: BaselineStyleOptions,
    ) -> ChartResult<()> {
        let entry = self.series.get_mut(&id).ok_or_else(|| unknown_series(id))?;
        entry.series.apply_options(options)?;
        entry.view.update(SeriesUpdateKind::Options);
        let price_scale_id = entry.series.options().price_scale_id.clone();
        let pane_index = entry.pane_index;
        self.panes[pane_index].ensure_overlay_price_scale(
            price_scale_id,
            PriceScaleOptions {
                scale_margins: None,
                ..PriceScaleOptions::default()
            },
        );
        self.refresh_price_scales();
        Ok(())
    }

    /// Replaces the samples of one series and re-indexes every series on the
    /// merged time axis.
    pub fn set_series_data(&mut self, id: SeriesId, points: Vec<DataPoint>) -> ChartResult<()> {
        let entry = self.series.get_mut(&id).ok_or_else(|| unknown_series(id))?;
        entry.series.set_data(points);

        let times: BTreeSet<OrderedFloat<f64>> = self
            .series
            .values()
            .flat_map(|entry| entry.series.points().iter().map(|p| OrderedFloat(p.time)))
            .collect();
        self.time_scale
            .set_times(times.into_iter().map(OrderedFloat::into_inner).collect());

        for entry in self.series.values_mut() {
            entry.series.reindex(&self.time_scale);
            entry.view.update(SeriesUpdateKind::Data);
        }
        debug!(
            series = id.raw(),
            time_points = self.time_scale.times().len(),
            "updated series data"
        );
        self.refresh_price_scales();
        Ok(())
    }

    pub fn fit_content(&mut self) -> ChartResult<()> {
        self.time_scale.fit_content()?;
        self.refresh_price_scales();
        Ok(())
    }

    pub fn set_bar_spacing(&mut self, bar_spacing: f64) -> ChartResult<()> {
        self.time_scale.set_bar_spacing(bar_spacing)?;
        self.refresh_price_scales();
        Ok(())
    }

    pub fn set_right_offset(&mut self, right_offset: f64) -> ChartResult<()> {
        self.time_scale.set_right_offset(right_offset)?;
        self.refresh_price_scales();
        Ok(())
    }

    /// Draws every series of `pane_index` into `frame`, returning how many
    /// series produced a renderer.
    pub fn draw_pane(&mut self, pane_index: usize, frame: &mut RenderFrame) -> ChartResult<usize> {
        self.pane_index_checked(pane_index)?;
        let pane = &self.panes[pane_index];
        let height = pane.height();
        let width = self.width;

        let mut drawn = 0;
        for (id, entry) in self
            .series
            .iter_mut()
            .filter(|(_, entry)| entry.pane_index == pane_index)
        {
            let price_scale_id = entry.series.options().price_scale_id.as_str();
            let Some(price_scale) = pane.price_scale(price_scale_id) else {
                warn!(series = id.raw(), price_scale_id, "series price scale is missing");
                continue;
            };
            let mut scales = SeriesScales {
                price_scale,
                time_scale: &mut self.time_scale,
                default_axes: pane.default_axes(),
            };
            if let Some(renderer) = entry.view.renderer(&entry.series, &mut scales, height, width)
            {
                renderer.draw(frame)?;
                drawn += 1;
            }
        }
        trace!(pane_index, drawn, commands = frame.commands.len(), "drew pane");
        Ok(drawn)
    }

    fn pane_index_checked(&self, pane_index: usize) -> ChartResult<()> {
        if pane_index >= self.panes.len() {
            return Err(ChartError::InvalidData(format!(
                "pane index {pane_index} is out of range"
            )));
        }
        Ok(())
    }

    /// Autoscales every price scale from its series and marks item
    /// coordinates stale.
    fn refresh_price_scales(&mut self) {
        if let Some(visible_bars) = self.time_scale.visible_strict_range() {
            for (pane_index, pane) in self.panes.iter_mut().enumerate() {
                for price_scale in pane.price_scales_mut() {
                    let sources: Vec<&dyn AutoScaleSource> = self
                        .series
                        .values()
                        .filter(|entry| {
                            entry.pane_index == pane_index
                                && entry.series.options().price_scale_id == price_scale.id()
                        })
                        .map(|entry| &entry.series as &dyn AutoScaleSource)
                        .collect();
                    price_scale.recalculate_price_range(visible_bars, &sources);
                }
            }
        }
        for entry in self.series.values_mut() {
            entry.view.update(SeriesUpdateKind::Other);
        }
    }
}

fn unknown_series(id: SeriesId) -> ChartError {
    ChartError::InvalidData(format!("unknown series id {}", id.raw()))
}
