//! Curve conversions: elliptical arcs and quadratics to cubic Beziers.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DVec2, dvec2};

/// Largest sweep a single cubic approximates
const MAX_SEGMENT_SWEEP: f64 = FRAC_PI_2;

/// Convert an elliptical arc to cubic Bezier segments.
///
/// Each entry is `[c1x, c1y, c2x, c2y, x, y]`. The arc is split so no segment
/// sweeps more than 90 degrees, giving at most four segments. The last
/// segment always ends exactly on `to`.
///
/// A zero radius or coincident endpoints yields one straight-line segment.
pub fn arc_to_curve(
    from: DVec2,
    radii: DVec2,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: DVec2,
) -> Vec<[f64; 6]> {
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();
    if rx == 0.0 || ry == 0.0 || from == to {
        return vec![[from.x, from.y, to.x, to.y, to.x, to.y]];
    }

    let phi = super::rad(x_axis_rotation);
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Midpoint of the chord in ellipse-aligned space
    let half = (from - to) * 0.5;
    let p = dvec2(
        cos_phi * half.x + sin_phi * half.y,
        -sin_phi * half.x + cos_phi * half.y,
    );

    // Grow radii that are too small to span the chord
    let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * p.y * p.y - ry2 * p.x * p.x;
    let den = rx2 * p.y * p.y + ry2 * p.x * p.x;
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (num / den).max(0.0).sqrt();
    let center_p = dvec2(coef * rx * p.y / ry, -coef * ry * p.x / rx);

    let mid = (from + to) * 0.5;
    let center = dvec2(
        cos_phi * center_p.x - sin_phi * center_p.y + mid.x,
        sin_phi * center_p.x + cos_phi * center_p.y + mid.y,
    );

    let u = dvec2((p.x - center_p.x) / rx, (p.y - center_p.y) / ry);
    let v = dvec2((-p.x - center_p.x) / rx, (-p.y - center_p.y) / ry);
    let theta1 = angle_between(DVec2::X, u);
    let mut delta = angle_between(u, v);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let count = ((delta.abs() / MAX_SEGMENT_SWEEP) - 1e-9).ceil().clamp(1.0, 4.0) as usize;
    let step = delta / count as f64;
    let t = 4.0 / 3.0 * (step / 4.0).tan();

    let to_world = |unit: DVec2| -> DVec2 {
        let x = rx * unit.x;
        let y = ry * unit.y;
        dvec2(
            center.x + cos_phi * x - sin_phi * y,
            center.y + sin_phi * x + cos_phi * y,
        )
    };

    let mut segments = Vec::with_capacity(count);
    for i in 0..count {
        let a1 = theta1 + step * i as f64;
        let a2 = a1 + step;
        let (s1, c1) = a1.sin_cos();
        let (s2, c2) = a2.sin_cos();
        let ctrl1 = to_world(dvec2(c1 - t * s1, s1 + t * c1));
        let ctrl2 = to_world(dvec2(c2 + t * s2, s2 - t * c2));
        let end = if i + 1 == count { to } else { to_world(dvec2(c2, s2)) };
        segments.push([ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, end.x, end.y]);
    }
    segments
}

/// Signed angle from `u` to `v`
fn angle_between(u: DVec2, v: DVec2) -> f64 {
    let a = (u.x * v.y - u.y * v.x).atan2(u.dot(v));
    // atan2 returns -PI for exactly opposite vectors on some inputs; keep it positive
    if a == -PI { PI } else { a }
}

/// Exact degree elevation of a quadratic Bezier.
///
/// Returns `[c1x, c1y, c2x, c2y, x2, y2]` with `c1 = p1 + 2/3 (c - p1)` and
/// `c2 = p2 + 2/3 (c - p2)`.
pub fn quadratic_to_curve(x1: f64, y1: f64, cx: f64, cy: f64, x2: f64, y2: f64) -> [f64; 6] {
    const TWO_THIRDS: f64 = 2.0 / 3.0;
    [
        x1 + TWO_THIRDS * (cx - x1),
        y1 + TWO_THIRDS * (cy - y1),
        x2 + TWO_THIRDS * (cx - x2),
        y2 + TWO_THIRDS * (cy - y2),
        x2,
        y2,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn quadratic_elevation_formula() {
        let c = quadratic_to_curve(0.0, 0.0, 3.0, 6.0, 9.0, 0.0);
        assert!(close(c[0], 2.0) && close(c[1], 4.0));
        assert!(close(c[2], 5.0) && close(c[3], 4.0));
        assert_eq!((c[4], c[5]), (9.0, 0.0));
    }

    #[test]
    fn half_circle_splits_into_two_segments() {
        let segs = arc_to_curve(
            dvec2(-10.0, 0.0),
            dvec2(10.0, 10.0),
            0.0,
            true,
            true,
            dvec2(10.0, 0.0),
        );
        assert_eq!(segs.len(), 2);
        let last = segs[1];
        assert_eq!((last[4], last[5]), (10.0, 0.0));
        // Midpoint of a clockwise (y-down) half circle from west to east passes the top
        let mid = segs[0];
        assert!(close(mid[4], 0.0));
        assert!(close(mid[5].abs(), 10.0));
    }

    #[test]
    fn quarter_arc_is_one_segment() {
        let segs = arc_to_curve(
            dvec2(10.0, 0.0),
            dvec2(10.0, 10.0),
            0.0,
            false,
            true,
            dvec2(0.0, 10.0),
        );
        assert_eq!(segs.len(), 1);
        // Standard kappa for a circular quarter arc
        let k = 4.0 / 3.0 * (std::f64::consts::PI / 8.0).tan() * 10.0;
        assert!(close(segs[0][0], 10.0));
        assert!(close(segs[0][1], k));
        assert!(close(segs[0][2], k));
        assert!(close(segs[0][3], 10.0));
    }

    #[test]
    fn large_arc_uses_more_segments() {
        let segs = arc_to_curve(
            dvec2(10.0, 0.0),
            dvec2(10.0, 10.0),
            0.0,
            true,
            true,
            dvec2(0.0, -10.0),
        );
        assert_eq!(segs.len(), 3);
        assert_eq!((segs[2][4], segs[2][5]), (0.0, -10.0));
    }

    #[test]
    fn endpoint_is_exact_with_rotation_and_scaling() {
        let to = dvec2(37.123456789, -12.987654321);
        let segs = arc_to_curve(dvec2(1.5, 2.5), dvec2(3.0, 1.0), 33.0, false, false, to);
        assert!(!segs.is_empty() && segs.len() <= 4);
        let last = segs.last().unwrap();
        assert_eq!(last[4], to.x);
        assert_eq!(last[5], to.y);
    }

    #[test]
    fn degenerate_arcs_are_straight_lines() {
        let from = dvec2(1.0, 1.0);
        let to = dvec2(5.0, 3.0);
        assert_eq!(
            arc_to_curve(from, dvec2(0.0, 4.0), 0.0, false, true, to),
            vec![[1.0, 1.0, 5.0, 3.0, 5.0, 3.0]]
        );
        assert_eq!(
            arc_to_curve(from, dvec2(4.0, 4.0), 0.0, false, true, from),
            vec![[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]]
        );
    }
}
