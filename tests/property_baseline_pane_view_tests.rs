use std::rc::Rc;

use approx::abs_diff_eq;
use baseline_pane::core::DataPoint;
use baseline_pane::lwc::model::{
    AutoScaleSource, BaseValue, BaseValueKind, BaselineSeries, BaselineStyleOptions,
    DefaultPriceAxes, PriceRange, PriceScale, PriceScaleMargins, PriceScaleOptions, TimeScale,
    TimeScaleOptions,
};
use baseline_pane::lwc::renderers::BaselineAreaData;
use baseline_pane::lwc::views::{BaselinePaneView, ItemRange, SeriesScales};
use proptest::prelude::*;

struct Scene {
    series: BaselineSeries,
    price_scale: PriceScale,
    time_scale: TimeScale,
    axes: DefaultPriceAxes,
}

fn scene(
    values: &[f64],
    kind: BaseValueKind,
    base_price: f64,
    price_scale_id: &str,
    margins: PriceScaleMargins,
    width: f64,
    height: f64,
) -> Scene {
    let options = BaselineStyleOptions {
        price_scale_id: price_scale_id.to_owned(),
        base_value: BaseValue {
            kind,
            price: base_price,
        },
        ..BaselineStyleOptions::default()
    };
    let mut series = BaselineSeries::new(options).expect("series");
    series.set_data(
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| DataPoint::new(i as f64 * 60.0, value))
            .collect(),
    );

    let mut time_scale = TimeScale::new(TimeScaleOptions::default()).expect("time scale");
    time_scale.set_width(width).expect("width");
    time_scale.set_times(series.points().iter().map(|p| p.time).collect());
    series.reindex(&time_scale);

    let mut price_scale = PriceScale::new(
        price_scale_id,
        PriceScaleOptions {
            scale_margins: Some(margins),
            ..PriceScaleOptions::default()
        },
    );
    price_scale.set_height(height);
    if let Some(visible_bars) = time_scale.visible_strict_range() {
        let sources: [&dyn AutoScaleSource; 1] = [&series];
        price_scale.recalculate_price_range(visible_bars, &sources);
    } else {
        price_scale.set_price_range(Some(PriceRange::new(-1.0, 1.0)));
    }

    Scene {
        series,
        price_scale,
        time_scale,
        axes: DefaultPriceAxes::default(),
    }
}

/// Scalar payload fields; items are compared by identity since unset
/// coordinates are NaN.
fn geometry(area: &BaselineAreaData) -> (f64, f64, f64, Option<ItemRange>, f64) {
    (
        area.base_level_coordinate,
        area.top,
        area.bottom,
        area.visible_range,
        area.bar_width,
    )
}

fn margins_strategy() -> impl Strategy<Value = PriceScaleMargins> {
    (0.0f64..0.5, 0.0f64..0.5).prop_map(|(top, bottom)| PriceScaleMargins { top, bottom })
}

fn kind_strategy() -> impl Strategy<Value = BaseValueKind> {
    prop_oneof![Just(BaseValueKind::Price), Just(BaseValueKind::Percentage)]
}

proptest! {
    #[test]
    fn hidden_series_never_renders(
        values in proptest::collection::vec(-1_000.0f64..1_000.0, 0..40),
        height in 0.0f64..2_000.0,
        width in 1.0f64..2_000.0,
    ) {
        let mut scene = scene(
            &values,
            BaseValueKind::Price,
            0.0,
            "right",
            PriceScaleMargins::default(),
            width,
            height,
        );
        scene.series.set_visible(false);
        let mut scales = SeriesScales {
            price_scale: &scene.price_scale,
            time_scale: &mut scene.time_scale,
            default_axes: &scene.axes,
        };
        let mut view = BaselinePaneView::new();
        prop_assert!(view.renderer(&scene.series, &mut scales, height, width).is_none());
    }

    #[test]
    fn area_band_follows_kind_scale_and_margins(
        values in proptest::collection::vec(-1_000.0f64..1_000.0, 1..40),
        kind in kind_strategy(),
        custom in any::<bool>(),
        margins in margins_strategy(),
        height in 1.0f64..2_000.0,
    ) {
        let price_scale_id = if custom { "overlay" } else { "right" };
        let mut scene = scene(&values, kind, 0.0, price_scale_id, margins, 400.0, height);
        let mut scales = SeriesScales {
            price_scale: &scene.price_scale,
            time_scale: &mut scene.time_scale,
            default_axes: &scene.axes,
        };
        let mut view = BaselinePaneView::new();
        prop_assert!(view.renderer(&scene.series, &mut scales, height, 400.0).is_some());

        let area = view.area_renderer().data().expect("area");
        let (top, bottom) = if kind == BaseValueKind::Price && custom {
            (height * margins.top, height * (1.0 - margins.bottom))
        } else {
            (0.0, height)
        };
        prop_assert!(abs_diff_eq!(area.top, top, epsilon = 1e-9));
        prop_assert!(abs_diff_eq!(area.bottom, bottom, epsilon = 1e-9));
        prop_assert!(area.top <= area.bottom);
        prop_assert_eq!(view.line_renderer().data().expect("line").bottom, height);
    }

    #[test]
    fn payloads_share_geometry_and_stay_stable_within_an_epoch(
        values in proptest::collection::vec(-1_000.0f64..1_000.0, 1..80),
        base_price in -1_000.0f64..1_000.0,
        bar_spacing in 1.0f64..40.0,
        right_offset in -10.0f64..10.0,
    ) {
        let mut scene = scene(
            &values,
            BaseValueKind::Price,
            base_price,
            "right",
            PriceScaleMargins::default(),
            600.0,
            300.0,
        );
        scene.time_scale.set_bar_spacing(bar_spacing).expect("bar spacing");
        scene.time_scale.set_right_offset(right_offset).expect("right offset");

        let mut view = BaselinePaneView::new();
        let mut frames = Vec::new();
        for _ in 0..3 {
            let mut scales = SeriesScales {
                price_scale: &scene.price_scale,
                time_scale: &mut scene.time_scale,
                default_axes: &scene.axes,
            };
            if view.renderer(&scene.series, &mut scales, 300.0, 600.0).is_none() {
                continue;
            }
            let area = view.area_renderer().data().cloned().expect("area");
            let line = view.line_renderer().data().cloned().expect("line");
            prop_assert!(Rc::ptr_eq(&area.items, &line.items));
            prop_assert_eq!(area.base_level_coordinate, line.base_level_coordinate);
            prop_assert_eq!(area.visible_range, line.visible_range);
            prop_assert_eq!(area.bar_width, line.bar_width);
            frames.push((area, line));
        }

        prop_assert!(view.base().recompute_count() <= 1);
        prop_assert!(view.base().rebuild_count() <= 1);
        if let Some((first_area, first_line)) = frames.first() {
            for (area, line) in &frames {
                prop_assert!(Rc::ptr_eq(&area.items, &first_area.items));
                prop_assert_eq!(geometry(area), geometry(first_area));
                prop_assert_eq!(line.gradient(), first_line.gradient());
                prop_assert_eq!(line.visible_range, first_line.visible_range);
            }
        }
    }
}
