use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::pane::PaneId;

use super::{PriceScale, PriceScaleOptions};

pub const LEFT_PRICE_SCALE_ID: &str = "left";
pub const RIGHT_PRICE_SCALE_ID: &str = "right";

/// Identifiers of the built-in axes a pane creates for itself.
///
/// Every other price scale id belongs to a user-added overlay ("custom")
/// scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPriceAxes {
    ids: IndexSet<String>,
}

impl Default for DefaultPriceAxes {
    fn default() -> Self {
        Self::new([LEFT_PRICE_SCALE_ID, RIGHT_PRICE_SCALE_ID])
    }
}

impl DefaultPriceAxes {
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_default(&self, price_scale_id: &str) -> bool {
        self.ids.contains(price_scale_id)
    }

    #[must_use]
    pub fn is_custom(&self, price_scale_id: &str) -> bool {
        !self.is_default(price_scale_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// One horizontal drawing region and the price scales living in it.
#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    height: f64,
    default_axes: DefaultPriceAxes,
    price_scales: IndexMap<String, PriceScale>,
}

impl Pane {
    /// Creates a pane with the built-in left and right scales.
    #[must_use]
    pub fn new(
        id: PaneId,
        left_options: PriceScaleOptions,
        right_options: PriceScaleOptions,
    ) -> Self {
        let mut price_scales = IndexMap::new();
        price_scales.insert(
            LEFT_PRICE_SCALE_ID.to_owned(),
            PriceScale::new(LEFT_PRICE_SCALE_ID, left_options),
        );
        price_scales.insert(
            RIGHT_PRICE_SCALE_ID.to_owned(),
            PriceScale::new(RIGHT_PRICE_SCALE_ID, right_options),
        );
        Self {
            id,
            height: 0.0,
            default_axes: DefaultPriceAxes::default(),
            price_scales,
        }
    }

    #[must_use]
    pub fn id(&self) -> PaneId {
        self.id
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
        for scale in self.price_scales.values_mut() {
            scale.set_height(height);
        }
    }

    #[must_use]
    pub fn default_axes(&self) -> &DefaultPriceAxes {
        &self.default_axes
    }

    pub fn set_default_axes(&mut self, axes: DefaultPriceAxes) {
        self.default_axes = axes;
    }

    #[must_use]
    pub fn price_scale(&self, id: &str) -> Option<&PriceScale> {
        self.price_scales.get(id)
    }

    #[must_use]
    pub fn price_scale_mut(&mut self, id: &str) -> Option<&mut PriceScale> {
        self.price_scales.get_mut(id)
    }

    pub fn price_scales_mut(&mut self) -> impl Iterator<Item = &mut PriceScale> {
        self.price_scales.values_mut()
    }

    /// Returns the overlay scale `id`, creating it on first use.
    pub fn ensure_overlay_price_scale(
        &mut self,
        id: impl Into<String>,
        options: PriceScaleOptions,
    ) -> &mut PriceScale {
        let id = id.into();
        let height = self.height;
        self.price_scales.entry(id.clone()).or_insert_with(|| {
            let mut scale = PriceScale::new(id, options);
            scale.set_height(height);
            scale
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::pane::PaneId;
    use crate::lwc::model::PriceScaleOptions;

    use super::{DefaultPriceAxes, Pane};

    #[test]
    fn pane_creates_left_and_right_default_scales() {
        let pane = Pane::new(
            PaneId::new(0),
            PriceScaleOptions::default(),
            PriceScaleOptions::default(),
        );
        assert_eq!(pane.price_scale("left").map(|s| s.id()), Some("left"));
        assert_eq!(pane.price_scale("right").map(|s| s.id()), Some("right"));
        assert!(pane.default_axes().is_default("left"));
        assert!(pane.default_axes().is_custom("volume"));
    }

    #[test]
    fn overlay_scales_inherit_pane_height() {
        let mut pane = Pane::new(
            PaneId::new(1),
            PriceScaleOptions::default(),
            PriceScaleOptions::default(),
        );
        pane.set_height(320.0);
        let overlay = pane.ensure_overlay_price_scale("overlay", PriceScaleOptions::default());
        assert_eq!(overlay.height(), 320.0);
    }

    #[test]
    fn custom_default_axes_are_configurable() {
        let axes = DefaultPriceAxes::new(["right", "primary"]);
        assert!(axes.is_default("primary"));
        assert!(axes.is_custom("left"));
        assert_eq!(axes.ids().collect::<Vec<_>>(), vec!["right", "primary"]);
    }
}
