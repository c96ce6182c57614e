// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smallest enclosing circle of a set of circles.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};
use smallvec::SmallVec;

type Basis = SmallVec<[Circle; 3]>;

/// Compute the smallest circle enclosing every circle in `circles`.
///
/// Uses the incremental move-to-front construction over a basis of at most three circles.
/// Input order is kept as given (no shuffling), so the result is deterministic. Returns `None`
/// for an empty slice.
///
/// ```rust
/// use kurbo::Circle;
/// use circlet_pack::enclose;
///
/// let e = enclose(&[Circle::new((-1.0, 0.0), 1.0), Circle::new((1.0, 0.0), 1.0)]).unwrap();
/// assert!((e.radius - 2.0).abs() < 1e-12);
/// assert!(e.center.x.abs() < 1e-12);
/// ```
pub fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut basis = Basis::new();
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        if e.is_some_and(|e| encloses_weak(e, p)) {
            i += 1;
            continue;
        }
        match extend_basis(&basis, p) {
            Some(next) => {
                basis = next;
                e = Some(enclose_basis(&basis));
                i = 0;
            }
            // Only reachable through floating-point breakdown; fall back to a loose bound.
            None => return Some(loose_bound(circles)),
        }
    }
    e
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Basis> {
    if encloses_weak_all(p, basis) {
        return Some(smallvec::smallvec![p]);
    }
    for &b in basis {
        if encloses_not(p, b) && encloses_weak_all(enclose2(b, p), basis) {
            return Some(smallvec::smallvec![b, p]);
        }
    }
    for i in 0..basis.len().saturating_sub(1) {
        for j in i + 1..basis.len() {
            let (a, b) = (basis[i], basis[j]);
            if encloses_not(enclose2(a, b), p)
                && encloses_not(enclose2(a, p), b)
                && encloses_not(enclose2(b, p), a)
                && encloses_weak_all(enclose3(a, b, p), basis)
            {
                return Some(smallvec::smallvec![a, b, p]);
            }
        }
    }
    None
}

fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius;
    let d = b.center - a.center;
    dr < 0.0 || dr * dr < d.hypot2()
}

fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius + a.radius.max(b.radius).max(1.0) * 1e-9;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.hypot2()
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match *basis {
        [a] => a,
        [a, b] => enclose2(a, b),
        [a, b, c] => enclose3(a, b, c),
        _ => unreachable!("basis holds one to three circles"),
    }
}

fn enclose2(a: Circle, b: Circle) -> Circle {
    let d = b.center - a.center;
    let l = d.hypot();
    if l == 0.0 {
        return if a.radius >= b.radius { a } else { b };
    }
    let dr = b.radius - a.radius;
    Circle::new(
        Point::new(
            (a.center.x + b.center.x + d.x / l * dr) / 2.0,
            (a.center.y + b.center.y + d.y / l * dr) / 2.0,
        ),
        (l + a.radius + b.radius) / 2.0,
    )
}

/// Circle internally tangent to three circles (Apollonius).
fn enclose3(a: Circle, b: Circle, c: Circle) -> Circle {
    let (x1, y1, r1) = (a.center.x, a.center.y, a.radius);
    let (x2, y2, r2) = (b.center.x, b.center.y, b.radius);
    let (x3, y3, r3) = (c.center.x, c.center.y, c.radius);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(Point::new(x1 + xa + xb * r, y1 + ya + yb * r), r)
}

/// Centroid-centered circle reaching the far edge of every input circle.
fn loose_bound(circles: &[Circle]) -> Circle {
    #[allow(
        clippy::cast_precision_loss,
        reason = "sibling counts are far below 2^52."
    )]
    let n = circles.len() as f64;
    let sum = circles
        .iter()
        .fold(kurbo::Vec2::ZERO, |acc, c| acc + c.center.to_vec2());
    let center = (sum / n).to_point();
    let radius = circles
        .iter()
        .map(|c| (c.center - center).hypot() + c.radius)
        .fold(0.0, f64::max);
    Circle::new(center, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_encloses(outer: Circle, inner: &[Circle]) {
        for c in inner {
            let reach = (c.center - outer.center).hypot() + c.radius;
            assert!(
                reach <= outer.radius + 1e-9,
                "{c:?} escapes enclosing circle {outer:?}"
            );
        }
    }

    #[test]
    fn empty_and_single() {
        assert!(enclose(&[]).is_none());
        let c = Circle::new((3.0, 4.0), 2.0);
        let e = enclose(&[c]).unwrap();
        assert_eq!(e.center, c.center);
        assert_eq!(e.radius, c.radius);
    }

    #[test]
    fn nested_input_returns_outer() {
        let outer = Circle::new((0.0, 0.0), 10.0);
        let inner = Circle::new((2.0, 1.0), 3.0);
        let e = enclose(&[inner, outer]).unwrap();
        assert!((e.radius - 10.0).abs() < 1e-9);
        assert!(e.center.distance(Point::ORIGIN) < 1e-9);
    }

    #[test]
    fn three_tangent_unit_circles() {
        let h = 3.0_f64.sqrt();
        let circles = [
            Circle::new((-1.0, 0.0), 1.0),
            Circle::new((1.0, 0.0), 1.0),
            Circle::new((0.0, h), 1.0),
        ];
        let e = enclose(&circles).unwrap();
        // Circumradius of the unit triangle of side 2 plus the unit radius.
        let expected = 2.0 / h + 1.0;
        assert!((e.radius - expected).abs() < 1e-9, "radius {}", e.radius);
        assert_encloses(e, &circles);
    }

    #[test]
    fn scattered_circles_are_enclosed() {
        let circles = [
            Circle::new((0.0, 0.0), 1.0),
            Circle::new((5.0, 1.0), 0.5),
            Circle::new((-3.0, 4.0), 2.0),
            Circle::new((2.0, -6.0), 1.5),
            Circle::new((1.0, 1.0), 0.0),
            Circle::new((-4.0, -2.0), 0.25),
        ];
        let e = enclose(&circles).unwrap();
        assert_encloses(e, &circles);
        assert!(e.radius <= loose_bound(&circles).radius + 1e-9);
    }

    #[test]
    fn coincident_centers() {
        let circles = [Circle::new((1.0, 1.0), 1.0), Circle::new((1.0, 1.0), 2.0)];
        let e = enclose(&circles).unwrap();
        assert!((e.radius - 2.0).abs() < 1e-9);
    }
}
