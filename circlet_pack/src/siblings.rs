// Copyright 2025 the Circlet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-chain packing of sibling circles.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};

use crate::enclose::enclose;

/// Pack `circles` tightly around the origin, keeping their radii.
///
/// Circles are placed in slice order: each new circle goes tangent to a pair of circles on the
/// current front chain, next to the pair closest to the origin, without overlapping any other
/// circle. Afterwards every center is translated so the smallest enclosing circle of the pack
/// is centered on the origin. Returns the radius of that enclosing circle (zero for an empty
/// slice).
///
/// The result only depends on the input order, never on randomness.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].center = Point::ORIGIN;
    if n == 1 {
        return circles[0].radius;
    }

    let (ra, rb) = (circles[0].radius, circles[1].radius);
    circles[0].center = Point::new(-rb, 0.0);
    circles[1].center = Point::new(ra, 0.0);
    if n == 2 {
        return ra + rb;
    }

    circles[2].center = place(circles[1], circles[0], circles[2].radius);

    // Doubly linked front chain over circle indices.
    let mut next: Vec<usize> = alloc::vec![0; n];
    let mut prev: Vec<usize> = alloc::vec![0; n];
    let (mut a, mut b) = (0_usize, 1_usize);
    next[0] = 1;
    prev[1] = 0;
    next[1] = 2;
    prev[2] = 1;
    next[2] = 0;
    prev[0] = 2;

    let mut i = 3;
    'pack: while i < n {
        circles[i].center = place(circles[a], circles[b], circles[i].radius);
        let c = circles[i];

        // Find the closest intersecting circle on the front chain, measuring "closeness" as
        // the linear distance along the chain in either direction.
        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].radius, circles[a].radius);
        loop {
            if sj <= sk {
                if intersects(circles[j], c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].radius;
                j = next[j];
            } else {
                if intersects(circles[k], c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].radius;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        // Insert the new circle between a and b.
        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;
        b = i;

        // Pick the chain pair closest to the origin as the next anchor.
        let mut best = score(circles, a, next[a]);
        let mut cursor = next[b];
        while cursor != b {
            let s = score(circles, cursor, next[cursor]);
            if s < best {
                a = cursor;
                best = s;
            }
            cursor = next[cursor];
        }
        b = next[a];
        i += 1;
    }

    // Enclose the front chain only; interior circles are inside it by construction.
    let mut chain = alloc::vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }
    let Some(e) = enclose(&chain) else {
        unreachable!("front chain holds at least three circles");
    };
    let offset = e.center.to_vec2();
    for circle in circles.iter_mut() {
        circle.center -= offset;
    }
    e.radius
}

/// Center for a circle of radius `r` tangent to both `a` and `b`, on the left of `a → b`.
fn place(b: Circle, a: Circle, r: f64) -> Point {
    let d = b.center - a.center;
    let d2 = d.hypot2();
    if d2 == 0.0 {
        return Point::new(a.center.x + r, a.center.y);
    }
    let a2 = (a.radius + r) * (a.radius + r);
    let b2 = (b.radius + r) * (b.radius + r);
    if a2 > b2 {
        let x = (d2 + b2 - a2) / (2.0 * d2);
        let y = (b2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            b.center.x - x * d.x - y * d.y,
            b.center.y - x * d.y + y * d.x,
        )
    } else {
        let x = (d2 + a2 - b2) / (2.0 * d2);
        let y = (a2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            a.center.x + x * d.x - y * d.y,
            a.center.y + x * d.y + y * d.x,
        )
    }
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.radius + b.radius - 1e-6;
    dr > 0.0 && dr * dr > (b.center - a.center).hypot2()
}

/// Squared distance from the origin to the radius-weighted midpoint of two chain circles.
fn score(circles: &[Circle], i: usize, j: usize) -> f64 {
    let (a, b) = (circles[i], circles[j]);
    let ab = a.radius + b.radius;
    if ab == 0.0 {
        return a.center.to_vec2().hypot2();
    }
    let x = (a.center.x * b.radius + b.center.x * a.radius) / ab;
    let y = (a.center.y * b.radius + b.center.y * a.radius) / ab;
    x * x + y * y
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn assert_packed(circles: &[Circle], radius: f64) {
        for (i, a) in circles.iter().enumerate() {
            let reach = a.center.to_vec2().hypot() + a.radius;
            assert!(
                reach <= radius + 1e-6,
                "circle {i} reaches {reach} beyond {radius}"
            );
            for (j, b) in circles.iter().enumerate().skip(i + 1) {
                let gap = a.center.distance(b.center) - a.radius - b.radius;
                assert!(gap >= -1e-6, "circles {i} and {j} overlap by {}", -gap);
            }
        }
    }

    fn radii(rs: &[f64]) -> Vec<Circle> {
        rs.iter().map(|&r| Circle::new(Point::ORIGIN, r)).collect()
    }

    #[test]
    fn trivial_counts() {
        assert_eq!(pack_siblings(&mut []), 0.0);

        let mut one = radii(&[3.0]);
        assert_eq!(pack_siblings(&mut one), 3.0);
        assert_eq!(one[0].center, Point::ORIGIN);

        let mut two = radii(&[3.0, 1.0]);
        assert_eq!(pack_siblings(&mut two), 4.0);
        assert_eq!(two[0].center, Point::new(-1.0, 0.0));
        assert_eq!(two[1].center, Point::new(3.0, 0.0));
        assert_packed(&two, 4.0);
    }

    #[test]
    fn three_equal_circles_touch() {
        let mut c = radii(&[1.0, 1.0, 1.0]);
        let r = pack_siblings(&mut c);
        assert_packed(&c, r);
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            let d = c[i].center.distance(c[j].center);
            assert!((d - 2.0).abs() < 1e-9, "{i}-{j} distance {d}");
        }
        assert!((r - (2.0 / 3.0_f64.sqrt() + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn many_mixed_circles_do_not_overlap() {
        let mut c = radii(&[5.0, 4.0, 4.0, 3.0, 3.0, 2.5, 2.0, 2.0, 1.0, 1.0, 0.5, 0.0, 3.5]);
        let r = pack_siblings(&mut c);
        assert_packed(&c, r);
        let area: f64 = c.iter().map(|c| c.radius * c.radius).sum();
        assert!(r * r >= area, "enclosing circle must cover the total area");
    }

    #[test]
    fn deterministic() {
        let input = radii(&[2.0, 3.0, 1.0, 4.0, 1.5, 2.2]);
        let mut first = input.clone();
        let mut second = input;
        let r1 = pack_siblings(&mut first);
        let r2 = pack_siblings(&mut second);
        assert_eq!(r1, r2);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.center, b.center);
        }
    }

    #[test]
    fn enclosing_circle_is_centered() {
        let mut c = vec![
            Circle::new(Point::ORIGIN, 4.0),
            Circle::new(Point::ORIGIN, 1.0),
            Circle::new(Point::ORIGIN, 1.0),
            Circle::new(Point::ORIGIN, 1.0),
        ];
        let r = pack_siblings(&mut c);
        let e = enclose(&c).unwrap();
        assert!(e.center.distance(Point::ORIGIN) < 1e-9);
        assert!((e.radius - r).abs() < 1e-9);
    }
}
