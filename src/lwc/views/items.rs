use serde::{Deserialize, Serialize};

use crate::lwc::model::{StrictRange, TimePointIndex};

/// Item whose screen position is filled in after construction.
pub trait PlotItem: Clone {
    fn time(&self) -> TimePointIndex;
    fn price(&self) -> f64;
    fn set_coordinates(&mut self, x: f64, y: f64);
}

/// Builds one item from a time index and price; coordinates stay unset.
pub trait ItemBuilder {
    type Item: PlotItem;

    fn build_item(&mut self, time: TimePointIndex, price: f64) -> Self::Item;
}

/// Point of a line-like series in pane pixels.
///
/// `x`/`y` are NaN until the owning view converts the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub time: TimePointIndex,
    pub price: f64,
    pub x: f64,
    pub y: f64,
}

impl LineItem {
    #[must_use]
    pub fn new(time: TimePointIndex, price: f64) -> Self {
        Self {
            time,
            price,
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PlotItem for LineItem {
    fn time(&self) -> TimePointIndex {
        self.time
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn set_coordinates(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineItemBuilder;

impl ItemBuilder for LineItemBuilder {
    type Item = LineItem;

    fn build_item(&mut self, time: TimePointIndex, price: f64) -> LineItem {
        LineItem::new(time, price)
    }
}

/// Half-open range of item positions, `from..to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRange {
    pub from: usize,
    pub to: usize,
}

impl ItemRange {
    #[must_use]
    pub fn len(self) -> usize {
        self.to.saturating_sub(self.from)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Items whose time falls inside `visible_bars`.
///
/// With `extended`, one neighbour on each side is included so lines run off
/// the pane edges instead of stopping at the last visible point.
#[must_use]
pub fn visible_timed_values<T: PlotItem>(
    items: &[T],
    visible_bars: StrictRange,
    extended: bool,
) -> ItemRange {
    let first = items.partition_point(|item| item.time() < visible_bars.left());
    let last = items.partition_point(|item| item.time() <= visible_bars.right());
    if !extended {
        return ItemRange {
            from: first,
            to: last.max(first),
        };
    }

    let mut from = first;
    let mut to = last;
    if first > 0 && first < items.len() && items[first].time() >= visible_bars.left() {
        from = first - 1;
    }
    if last > 0 && last < items.len() && items[last - 1].time() <= visible_bars.right() {
        to = last + 1;
    }
    ItemRange {
        from,
        to: to.max(from),
    }
}

#[cfg(test)]
mod tests {
    use crate::lwc::model::StrictRange;

    use super::{ItemRange, LineItem, visible_timed_values};

    fn items(times: &[i64]) -> Vec<LineItem> {
        times.iter().map(|&t| LineItem::new(t, t as f64)).collect()
    }

    #[test]
    fn strict_visible_range_selects_inner_items() {
        let items = items(&[0, 2, 4, 6, 8]);
        let range = visible_timed_values(&items, StrictRange::new(3, 6), false);
        assert_eq!(range, ItemRange { from: 2, to: 4 });
    }

    #[test]
    fn extended_visible_range_adds_one_neighbour_per_side() {
        let items = items(&[0, 2, 4, 6, 8]);
        let range = visible_timed_values(&items, StrictRange::new(3, 6), true);
        assert_eq!(range, ItemRange { from: 1, to: 5 });
    }

    #[test]
    fn extended_range_does_not_run_past_the_ends() {
        let items = items(&[0, 1, 2]);
        let range = visible_timed_values(&items, StrictRange::new(-5, 10), true);
        assert_eq!(range, ItemRange { from: 0, to: 3 });
    }

    #[test]
    fn range_right_of_all_items_is_empty() {
        let items = items(&[0, 1, 2]);
        let range = visible_timed_values(&items, StrictRange::new(10, 20), true);
        assert!(range.is_empty());
    }

    #[test]
    fn new_items_have_no_coordinates() {
        assert!(!LineItem::new(3, 10.0).has_coordinates());
    }
}
