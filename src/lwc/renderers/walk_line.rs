use crate::lwc::views::{ItemRange, LineItem};
use crate::render::{LineType, PathCommand, Point};

const CURVE_TENSION: f64 = 6.0;

/// Horizontal extent of a walked path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PathSpan {
    pub first_x: f64,
    pub last_x: f64,
}

/// Appends the line through `items[range]` to `path`.
///
/// A single item becomes a horizontal segment one bar wide. Returns `None`
/// when the range selects nothing.
pub(crate) fn walk_line(
    items: &[LineItem],
    range: ItemRange,
    line_type: LineType,
    bar_width: f64,
    path: &mut Vec<PathCommand>,
) -> Option<PathSpan> {
    let visible = items.get(range.from..range.to)?;
    let (first, rest) = visible.split_first()?;

    if rest.is_empty() {
        let half = bar_width / 2.0;
        let span = PathSpan {
            first_x: first.x - half,
            last_x: first.x + half,
        };
        path.push(PathCommand::MoveTo(Point::new(span.first_x, first.y)));
        path.push(PathCommand::LineTo(Point::new(span.last_x, first.y)));
        return Some(span);
    }

    path.push(PathCommand::MoveTo(item_point(first)));
    for (index, pair) in visible.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        match line_type {
            LineType::Simple => path.push(PathCommand::LineTo(item_point(curr))),
            LineType::WithSteps => {
                path.push(PathCommand::LineTo(Point::new(curr.x, prev.y)));
                path.push(PathCommand::LineTo(item_point(curr)));
            }
            LineType::Curved => {
                let from = range.from + index;
                let (control1, control2) = control_points(items, from, from + 1);
                path.push(PathCommand::BezierTo {
                    control1,
                    control2,
                    to: item_point(curr),
                });
            }
        }
    }

    let last = rest.last().unwrap_or(first);
    Some(PathSpan {
        first_x: first.x,
        last_x: last.x,
    })
}

/// Closes a walked line down (or up) to the horizontal `level`.
pub(crate) fn close_to_level(path: &mut Vec<PathCommand>, span: PathSpan, level: f64) {
    path.push(PathCommand::LineTo(Point::new(span.last_x, level)));
    path.push(PathCommand::LineTo(Point::new(span.first_x, level)));
    path.push(PathCommand::Close);
}

fn item_point(item: &LineItem) -> Point {
    Point::new(item.x, item.y)
}

fn is_placed(item: &LineItem) -> bool {
    item.x.is_finite() && item.y.is_finite()
}

/// Bezier controls for `items[from]..items[to]`. Neighbours come from the
/// whole series; one without coordinates falls back to the segment end.
fn control_points(items: &[LineItem], from: usize, to: usize) -> (Point, Point) {
    let start = &items[from];
    let end = &items[to];
    let before = items
        .get(from.wrapping_sub(1))
        .filter(|item| is_placed(item))
        .unwrap_or(start);
    let after = items
        .get(to + 1)
        .filter(|item| is_placed(item))
        .unwrap_or(end);
    (
        Point::new(
            start.x + (end.x - before.x) / CURVE_TENSION,
            start.y + (end.y - before.y) / CURVE_TENSION,
        ),
        Point::new(
            end.x - (after.x - start.x) / CURVE_TENSION,
            end.y - (after.y - start.y) / CURVE_TENSION,
        ),
    )
}
