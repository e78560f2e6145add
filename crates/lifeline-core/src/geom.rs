#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    euclid::rect(x, y, width, height)
}

pub fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Union of all rectangles, or `None` for an empty input.
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(&r))
}

/// Returns true when `outer` contains `inner`, allowing `eps` of floating point slack.
pub fn rect_contains_rect(outer: &Rect, inner: &Rect, eps: f64) -> bool {
    inner.min_x() + eps >= outer.min_x()
        && inner.max_x() <= outer.max_x() + eps
        && inner.min_y() + eps >= outer.min_y()
        && inner.max_y() <= outer.max_y() + eps
}

/// Point where the ray from the center of `r` toward `toward` leaves the rectangle.
///
/// When `toward` lies inside the rectangle (or on its center) the center is returned.
pub fn rect_boundary_toward(r: &Rect, toward: Point) -> Point {
    let c = r.center();
    let d = toward - c;
    let hw = r.width() / 2.0;
    let hh = r.height() / 2.0;
    let tx = if d.x != 0.0 { hw / d.x.abs() } else { f64::INFINITY };
    let ty = if d.y != 0.0 { hh / d.y.abs() } else { f64::INFINITY };
    let t = tx.min(ty);
    if !t.is_finite() || t >= 1.0 {
        return c;
    }
    // Snap the crossed edge exactly so axis-aligned rays land on integral coordinates.
    if tx <= ty {
        point(c.x + hw.copysign(d.x), c.y + d.y * t)
    } else {
        point(c.x + d.x * t, c.y + hh.copysign(d.y))
    }
}

pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
}

/// Point at arc length `length` along the polyline.
///
/// Negative lengths are measured from the end. Lengths past either end clamp to that end.
pub fn point_at_length(points: &[Point], length: f64) -> Option<Point> {
    let first = *points.first()?;
    let last = *points.last()?;
    let total = polyline_length(points);
    let mut remaining = if length < 0.0 { total + length } else { length };
    if remaining <= 0.0 {
        return Some(first);
    }
    for w in points.windows(2) {
        let seg = w[1] - w[0];
        let l = seg.length();
        if remaining <= l {
            if l == 0.0 {
                return Some(w[0]);
            }
            return Some(w[0] + seg * (remaining / l));
        }
        remaining -= l;
    }
    Some(last)
}

pub fn point_at_ratio(points: &[Point], ratio: f64) -> Option<Point> {
    let total = polyline_length(points);
    point_at_length(points, total * ratio.clamp(0.0, 1.0))
}

fn closest_on_segment(a: Point, b: Point, p: Point) -> Point {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

pub fn closest_point(points: &[Point], p: Point) -> Option<Point> {
    if points.len() == 1 {
        return points.first().copied();
    }
    points
        .windows(2)
        .map(|w| closest_on_segment(w[0], w[1], p))
        .min_by(|a, b| (*a - p).square_length().total_cmp(&(*b - p).square_length()))
}

/// Intersections of the horizontal and vertical lines through `p` with the polyline; the one
/// closest to `p` wins. Falls back to the closest point when neither line crosses the polyline.
pub fn axis_projection(points: &[Point], p: Point) -> Option<Point> {
    let mut hits: Vec<Point> = Vec::new();
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if a.y == b.y {
            if a.y == p.y {
                hits.push(closest_on_segment(a, b, p));
            }
        } else if p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            hits.push(point(a.x + (b.x - a.x) * t, p.y));
        }
        if a.x == b.x {
            if a.x == p.x {
                hits.push(closest_on_segment(a, b, p));
            }
        } else if p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) {
            let t = (p.x - a.x) / (b.x - a.x);
            hits.push(point(p.x, a.y + (b.y - a.y) * t));
        }
    }
    hits.into_iter()
        .min_by(|a, b| (*a - p).square_length().total_cmp(&(*b - p).square_length()))
        .or_else(|| closest_point(points, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_toward_point_below_hits_bottom_edge() {
        let r = rect(100.0, 20.0, 100.0, 80.0);
        assert_eq!(rect_boundary_toward(&r, point(150.0, 600.0)), point(150.0, 100.0));
    }

    #[test]
    fn boundary_toward_point_inside_returns_center() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect_boundary_toward(&r, point(6.0, 6.0)), point(5.0, 5.0));
    }

    #[test]
    fn length_is_measured_along_the_polyline_and_clamped() {
        let line = [point(0.0, 0.0), point(0.0, 10.0), point(10.0, 10.0)];
        assert_eq!(point_at_length(&line, 15.0), Some(point(5.0, 10.0)));
        assert_eq!(point_at_length(&line, -5.0), Some(point(5.0, 10.0)));
        assert_eq!(point_at_length(&line, 100.0), Some(point(10.0, 10.0)));
        assert_eq!(point_at_length(&line, -100.0), Some(point(0.0, 0.0)));
        assert_eq!(point_at_length(&[], 1.0), None);
    }

    #[test]
    fn ratio_endpoints_are_the_polyline_ends() {
        let line = [point(650.0, 100.0), point(650.0, 600.0)];
        assert_eq!(point_at_ratio(&line, 0.0), Some(point(650.0, 100.0)));
        assert_eq!(point_at_ratio(&line, 1.0), Some(point(650.0, 600.0)));
        assert_eq!(point_at_ratio(&line, 0.5), Some(point(650.0, 350.0)));
    }

    #[test]
    fn axis_projection_prefers_horizontal_hit_on_vertical_line() {
        let line = [point(450.0, 100.0), point(450.0, 600.0)];
        assert_eq!(axis_projection(&line, point(150.0, 150.0)), Some(point(450.0, 150.0)));
        // Above the line: no axis hit, closest point wins.
        assert_eq!(axis_projection(&line, point(150.0, 50.0)), Some(point(450.0, 100.0)));
    }

    #[test]
    fn union_and_containment() {
        let a = rect(400.0, 20.0, 100.0, 80.0);
        let b = rect(600.0, 20.0, 100.0, 80.0);
        let u = union_all([a, b]).unwrap();
        assert_eq!(u, rect(400.0, 20.0, 300.0, 80.0));
        assert!(rect_contains_rect(&u, &a, 0.0));
        assert!(rect_contains_rect(&u, &b, 0.0));
        assert!(union_all(std::iter::empty()).is_none());
    }
}
