//! Polyline smoothing into cubic Beziers

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DVec2, dvec2};

use super::absolute::path_to_curve;
use super::path::{AbsPath, AbsSegment, Path};

/// Pull factor used when the caller passes 0
const DEFAULT_SMOOTHING: f64 = 4.0;

/// Control points on either side of a vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchors {
    /// Incoming control point (ends the curve arriving at the vertex)
    pub before: DVec2,
    /// Outgoing control point (starts the curve leaving the vertex)
    pub after: DVec2,
}

/// Control points for `cur` given its neighbours.
///
/// Larger `value` keeps the control points closer to the vertex. Local
/// extrema get horizontal tangents, and control points are kept inside the
/// vertical range of the neighbours so curves never overshoot.
pub fn anchors(prev: DVec2, cur: DVec2, next: DVec2, value: f64) -> Anchors {
    let value = if value == 0.0 { DEFAULT_SMOOTHING } else { value };
    let len1 = (cur.x - prev.x) / value;
    let len2 = (next.x - cur.x) / value;

    let (angle1, angle2) =
        if (cur.y >= prev.y && cur.y >= next.y) || (cur.y <= prev.y && cur.y <= next.y) {
            (FRAC_PI_2, FRAC_PI_2)
        } else {
            let mut a1 = ((cur.x - prev.x) / (cur.y - prev.y).abs()).atan();
            if prev.y < cur.y {
                a1 = PI - a1;
            }
            let mut a2 = ((next.x - cur.x) / (cur.y - next.y).abs()).atan();
            if next.y < cur.y {
                a2 = PI - a2;
            }
            (a1, a2)
        };

    let mut alpha = FRAC_PI_2 - ((angle1 + angle2) % TAU) / 2.0;
    if alpha > FRAC_PI_2 {
        alpha -= PI;
    }

    let mut before = dvec2(
        cur.x - len1 * (alpha + angle1).sin(),
        cur.y - len1 * (alpha + angle1).cos(),
    );
    let mut after = dvec2(
        cur.x + len2 * (alpha + angle2).sin(),
        cur.y + len2 * (alpha + angle2).cos(),
    );

    if (cur.y > prev.y && before.y < prev.y) || (cur.y < prev.y && before.y > prev.y) {
        before.x += (prev.y - before.y).abs() * (before.x - cur.x) / (before.y - cur.y);
        before.y = prev.y;
    }
    if (cur.y > next.y && after.y < next.y) || (cur.y < next.y && after.y > next.y) {
        after.x -= (next.y - after.y).abs() * (after.x - cur.x) / (after.y - cur.y);
        after.y = next.y;
    }

    Anchors { before, after }
}

#[derive(Clone, Copy)]
enum Vertex {
    Move(DVec2),
    To { at: DVec2, close: bool },
}

impl Vertex {
    fn point(self) -> DVec2 {
        match self {
            Vertex::Move(p) | Vertex::To { at: p, .. } => p,
        }
    }
}

/// Endpoints of every segment; a close becomes a vertex back at the sub-path start.
fn vertices(path: &AbsPath) -> Vec<Vertex> {
    let mut out: Vec<Vertex> = Vec::with_capacity(path.len());
    let mut pen = DVec2::ZERO;
    let mut start = DVec2::ZERO;
    for segment in path.segments() {
        match *segment {
            AbsSegment::Move(p) => {
                out.push(Vertex::Move(p));
                pen = p;
                start = p;
            }
            AbsSegment::Close => {
                if pen != start {
                    out.push(Vertex::To { at: start, close: true });
                } else if let Some(Vertex::To { close, .. }) = out.last_mut() {
                    *close = true;
                }
                pen = start;
            }
            other => {
                if let Some(p) = other.end() {
                    out.push(Vertex::To { at: p, close: false });
                    pen = p;
                }
            }
        }
    }
    out
}

/// Smooth a polyline into a chain of cubic curves, one per segment.
///
/// The first curve of each sub-path starts with its control point on the
/// sub-path start. A sub-path that returns to its start is smoothed through
/// the join as well.
pub fn smooth(path: &Path, value: f64) -> AbsPath {
    let vertices = vertices(&path_to_curve(path));
    let mut out = Vec::with_capacity(vertices.len());
    let mut pen_control = DVec2::ZERO;
    let mut sub_start = DVec2::ZERO;
    let mut first_curve = 0;

    for (i, vertex) in vertices.iter().enumerate() {
        let (at, close) = match *vertex {
            Vertex::Move(p) => {
                out.push(AbsSegment::Move(p));
                sub_start = p;
                pen_control = p;
                first_curve = out.len();
                continue;
            }
            Vertex::To { at, close } => (at, close),
        };
        let prev = if i > 0 { vertices[i - 1].point() } else { sub_start };
        let next = match vertices.get(i + 1) {
            Some(Vertex::To { at, .. }) => Some(*at),
            _ => None,
        };

        let (incoming, outgoing) = match next {
            None if at == sub_start => match out.get(first_curve) {
                Some(AbsSegment::Cubic(_, _, first_end)) => {
                    let a = anchors(prev, sub_start, *first_end, value);
                    if let Some(AbsSegment::Cubic(c1, _, _)) = out.get_mut(first_curve) {
                        *c1 = a.after;
                    }
                    (a.before, a.after)
                }
                _ => (at, at),
            },
            None => (at, at),
            Some(next) => {
                let a = anchors(prev, at, next, value);
                (a.before, a.after)
            }
        };

        out.push(AbsSegment::Cubic(pen_control, incoming, at));
        pen_control = outgoing;
        if close {
            out.push(AbsSegment::Close);
        }
    }

    AbsPath(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_point_polyline_gives_three_curves() {
        let path: Path = "M0,0 L10,10 L20,5 L30,20".parse().unwrap();
        let out = smooth(&path, 0.0);
        assert_eq!(out.len(), 4);
        assert_eq!(out.segments()[0], AbsSegment::Move(dvec2(0.0, 0.0)));
        let AbsSegment::Cubic(c1, _, end) = out.segments()[1] else {
            panic!("expected a cubic");
        };
        assert_eq!(c1, dvec2(0.0, 0.0));
        assert_eq!(end, dvec2(10.0, 10.0));
        let AbsSegment::Cubic(_, c2, end) = out.segments()[3] else {
            panic!("expected a cubic");
        };
        assert_eq!(c2, end);
        assert_eq!(end, dvec2(30.0, 20.0));
    }

    #[test]
    fn extremum_gets_horizontal_tangent() {
        let a = anchors(dvec2(0.0, 10.0), dvec2(10.0, 0.0), dvec2(20.0, 10.0), 0.0);
        assert!((a.before.y - 0.0).abs() < 1e-9);
        assert!((a.after.y - 0.0).abs() < 1e-9);
        assert!((a.before.x - 7.5).abs() < 1e-9);
        assert!((a.after.x - 12.5).abs() < 1e-9);
    }

    #[test]
    fn larger_value_pulls_controls_closer() {
        let prev = dvec2(0.0, 0.0);
        let cur = dvec2(10.0, 5.0);
        let next = dvec2(20.0, 20.0);
        let loose = anchors(prev, cur, next, 2.0);
        let tight = anchors(prev, cur, next, 8.0);
        assert!(tight.after.distance(cur) < loose.after.distance(cur));
    }

    #[test]
    fn controls_stay_within_neighbour_range() {
        let a = anchors(dvec2(0.0, 0.0), dvec2(1.0, 10.0), dvec2(50.0, 11.0), 1.0);
        assert!(a.after.y <= 11.0 + 1e-9);
        assert!(a.before.y >= 0.0 - 1e-9);
    }

    #[test]
    fn closed_loop_is_smoothed_through_start() {
        let path: Path = "M0,0 L10,0 L10,10 L0,10 Z".parse().unwrap();
        let out = smooth(&path, 0.0);
        assert!(matches!(out.segments().last(), Some(AbsSegment::Close)));
        let curves = out
            .segments()
            .iter()
            .filter(|s| matches!(s, AbsSegment::Cubic(..)))
            .count();
        assert_eq!(curves, 4);
    }
}
