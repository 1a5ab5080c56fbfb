use std::rc::Rc;

use tracing::{trace, warn};

use crate::lwc::model::{BaseValueKind, BaselineStyleOptions};
use crate::lwc::renderers::{
    BaselineAreaData, BaselineAreaRenderer, BaselineLineData, BaselineLineRenderer,
    CompositeRenderer,
};

use super::items::{ItemBuilder, LineItem, LineItemBuilder};
use super::line_pane_view_base::{LinePaneViewBase, SeriesUpdateKind};
use super::sources::{SeriesScales, SeriesSource};

/// Vertical pixel band the area fill is confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawableBand {
    top: f64,
    bottom: f64,
}

/// Pane view of a baseline series.
///
/// Owns the area and line renderers for its whole lifetime and refills their
/// payloads on every `renderer` call. The area always draws before the line.
#[derive(Debug)]
pub struct BaselinePaneView<B: ItemBuilder<Item = LineItem> = LineItemBuilder> {
    base: LinePaneViewBase<B>,
    area_renderer: BaselineAreaRenderer,
    line_renderer: BaselineLineRenderer,
}

impl BaselinePaneView {
    #[must_use]
    pub fn new() -> Self {
        Self::with_builder(LineItemBuilder)
    }
}

impl Default for BaselinePaneView {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ItemBuilder<Item = LineItem>> BaselinePaneView<B> {
    #[must_use]
    pub fn with_builder(builder: B) -> Self {
        Self {
            base: LinePaneViewBase::new(builder),
            area_renderer: BaselineAreaRenderer::new(),
            line_renderer: BaselineLineRenderer::new(),
        }
    }

    pub fn update(&mut self, kind: SeriesUpdateKind) {
        self.base.update(kind);
    }

    #[must_use]
    pub fn base(&self) -> &LinePaneViewBase<B> {
        &self.base
    }

    #[must_use]
    pub fn area_renderer(&self) -> &BaselineAreaRenderer {
        &self.area_renderer
    }

    #[must_use]
    pub fn line_renderer(&self) -> &BaselineLineRenderer {
        &self.line_renderer
    }

    /// Prepares both payloads for one frame and returns `[area, line]`.
    ///
    /// Returns `None` when the series is hidden, has no first value in the
    /// visible range, or its base level cannot be placed on the price scale.
    pub fn renderer<S>(
        &mut self,
        series: &S,
        scales: &mut SeriesScales<'_>,
        height: f64,
        width: f64,
    ) -> Option<CompositeRenderer<'_>>
    where
        S: SeriesSource<Options = BaselineStyleOptions> + ?Sized,
    {
        if !series.visible() {
            trace!("baseline series hidden, nothing to draw");
            return None;
        }
        let Some(first_value) = scales
            .time_scale
            .visible_strict_range()
            .and_then(|visible_bars| series.first_value(visible_bars))
        else {
            trace!("baseline series has no first value, nothing to draw");
            return None;
        };

        let options = series.options();
        let band = drawable_band(options, scales, height);
        let base_level_coordinate = match scales
            .price_scale
            .price_to_coordinate(options.base_value.price, first_value.value)
        {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!(error = %err, "failed to place baseline level on price scale");
                return None;
            }
        };
        let bar_width = scales.time_scale.bar_spacing();

        self.base.make_valid(series, scales);
        let items = Rc::clone(self.base.items());
        let visible_range = self.base.visible_range();
        trace!(
            height,
            width,
            base_level_coordinate,
            top = band.top,
            bottom = band.bottom,
            "prepared baseline pane view"
        );

        self.area_renderer.set_data(BaselineAreaData {
            items: Rc::clone(&items),
            top_fill_color1: options.top_fill_color1,
            top_fill_color2: options.top_fill_color2,
            bottom_fill_color1: options.bottom_fill_color1,
            bottom_fill_color2: options.bottom_fill_color2,
            line_width: options.line_width,
            line_style: options.line_style,
            line_type: options.line_type,
            base_level_coordinate,
            top: band.top,
            bottom: band.bottom,
            visible_range,
            bar_width,
        });
        self.line_renderer.set_data(BaselineLineData {
            items,
            top_color: options.top_line_color,
            bottom_color: options.bottom_line_color,
            line_width: options.line_width,
            line_style: options.line_style,
            line_type: options.line_type,
            base_level_coordinate,
            bottom: height,
            visible_range,
            bar_width,
        });

        Some(
            CompositeRenderer::new()
                .with_renderer(&self.area_renderer)
                .with_renderer(&self.line_renderer),
        )
    }
}

/// Margins narrow the band only for price-based levels on custom scales.
fn drawable_band(
    options: &BaselineStyleOptions,
    scales: &SeriesScales<'_>,
    height: f64,
) -> DrawableBand {
    if options.base_value.kind == BaseValueKind::Price
        && scales.is_custom_price_scale()
        && let Some(margins) = scales.price_scale.scale_margins()
    {
        return DrawableBand {
            top: height * margins.top,
            bottom: height * (1.0 - margins.bottom),
        };
    }
    DrawableBand {
        top: 0.0,
        bottom: height,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::core::DataPoint;
    use crate::lwc::model::{
        BaseValue, BaseValueKind, BaselineSeries, BaselineStyleOptions, DefaultPriceAxes,
        PriceRange, PriceScale, PriceScaleMargins, PriceScaleOptions, TimeScale,
        TimeScaleOptions,
    };
    use crate::lwc::views::SeriesScales;

    use super::BaselinePaneView;

    struct Fixture {
        series: BaselineSeries,
        price_scale: PriceScale,
        time_scale: TimeScale,
        axes: DefaultPriceAxes,
    }

    fn fixture(price_scale_id: &str, kind: BaseValueKind) -> Fixture {
        let options = BaselineStyleOptions {
            price_scale_id: price_scale_id.to_owned(),
            base_value: BaseValue { kind, price: 50.0 },
            ..BaselineStyleOptions::default()
        };
        let mut series = BaselineSeries::new(options).expect("series");
        series.set_data((0..20).map(|i| DataPoint::new(i as f64, i as f64 * 5.0)).collect());

        let mut time_scale = TimeScale::new(TimeScaleOptions::default()).expect("time scale");
        time_scale.set_width(120.0).expect("width");
        time_scale.set_times((0..20).map(f64::from).collect());
        series.reindex(&time_scale);

        let mut price_scale = PriceScale::new(
            price_scale_id,
            PriceScaleOptions {
                scale_margins: Some(PriceScaleMargins {
                    top: 0.1,
                    bottom: 0.1,
                }),
                ..PriceScaleOptions::default()
            },
        );
        price_scale.set_height(100.0);
        price_scale.set_price_range(Some(PriceRange::new(0.0, 100.0)));

        Fixture {
            series,
            price_scale,
            time_scale,
            axes: DefaultPriceAxes::default(),
        }
    }

    fn band(fixture: &mut Fixture) -> (f64, f64) {
        let mut view = BaselinePaneView::new();
        let mut scales = SeriesScales {
            price_scale: &fixture.price_scale,
            time_scale: &mut fixture.time_scale,
            default_axes: &fixture.axes,
        };
        view.renderer(&fixture.series, &mut scales, 100.0, 120.0)
            .expect("renderer");
        let area = view.area_renderer().data().expect("area payload");
        (area.top, area.bottom)
    }

    #[test]
    fn custom_scale_with_margins_narrows_the_band() {
        let mut fixture = fixture("overlay", BaseValueKind::Price);
        let (top, bottom) = band(&mut fixture);
        assert_abs_diff_eq!(top, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bottom, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn default_axis_ignores_margins() {
        let mut fixture = fixture("right", BaseValueKind::Price);
        assert_eq!(band(&mut fixture), (0.0, 100.0));
    }

    #[test]
    fn percentage_base_value_uses_full_band() {
        let mut fixture = fixture("overlay", BaseValueKind::Percentage);
        assert_eq!(band(&mut fixture), (0.0, 100.0));
    }

    #[test]
    fn empty_price_scale_puts_baseline_on_row_zero() {
        let mut fixture = fixture("right", BaseValueKind::Price);
        fixture.price_scale.set_price_range(None);
        let mut view = BaselinePaneView::new();
        let mut scales = SeriesScales {
            price_scale: &fixture.price_scale,
            time_scale: &mut fixture.time_scale,
            default_axes: &fixture.axes,
        };
        assert!(view.renderer(&fixture.series, &mut scales, 100.0, 120.0).is_some());
        let area = view.area_renderer().data().expect("area");
        assert_eq!(area.base_level_coordinate, 0.0);
    }

    #[test]
    fn payloads_share_items_and_geometry() {
        let mut fixture = fixture("right", BaseValueKind::Price);
        let mut view = BaselinePaneView::new();
        let mut scales = SeriesScales {
            price_scale: &fixture.price_scale,
            time_scale: &mut fixture.time_scale,
            default_axes: &fixture.axes,
        };
        let names = view
            .renderer(&fixture.series, &mut scales, 100.0, 120.0)
            .expect("renderer")
            .renderer_names()
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["baseline-area", "baseline-line"]);

        let area = view.area_renderer().data().expect("area");
        let line = view.line_renderer().data().expect("line");
        assert!(std::rc::Rc::ptr_eq(&area.items, &line.items));
        assert_eq!(area.base_level_coordinate, line.base_level_coordinate);
        assert_eq!(area.visible_range, line.visible_range);
        assert_eq!(area.bar_width, line.bar_width);
        assert_eq!(line.bottom, 100.0);
    }
}
