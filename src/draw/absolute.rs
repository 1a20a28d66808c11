//! Normalization of user paths into absolute form.
//!
//! `path_to_absolute` walks the commands once with a pen position, the start
//! of the current sub-path and the last control point (for the `S`/`T`
//! reflections). `path_to_curve` goes one step further and leaves only
//! segments VML draws natively.

use glam::{DVec2, dvec2};

use super::curve::{arc_to_curve, quadratic_to_curve};
use super::path::{AbsPath, AbsSegment, Path, Segment};
use crate::log::debug;

/// Control point left behind by the previous segment, for shorthand reflection
#[derive(Clone, Copy, Debug)]
enum LastControl {
    None,
    Cubic(DVec2),
    Quad(DVec2),
}

/// Convert a path to absolute coordinates.
///
/// Relative commands are resolved against the pen, `H`/`V` become `L`,
/// `S` becomes `C` and `T` becomes `Q` with the reflected control point,
/// and every `A` becomes one or more cubic segments. A missing trailing
/// close is left missing.
pub fn path_to_absolute(path: &Path) -> AbsPath {
    let mut out = Vec::with_capacity(path.len());
    let mut pen = DVec2::ZERO;
    let mut start = DVec2::ZERO;
    let mut last = LastControl::None;

    for command in path.commands() {
        let origin = if command.relative { pen } else { DVec2::ZERO };
        let at = |p: DVec2| p + origin;

        last = match command.segment {
            Segment::Move(p) => {
                let p = at(p);
                out.push(AbsSegment::Move(p));
                pen = p;
                start = p;
                LastControl::None
            }
            Segment::Line(p) => {
                pen = at(p);
                out.push(AbsSegment::Line(pen));
                LastControl::None
            }
            Segment::Horizontal(x) => {
                pen = dvec2(x + origin.x, pen.y);
                out.push(AbsSegment::Line(pen));
                LastControl::None
            }
            Segment::Vertical(y) => {
                pen = dvec2(pen.x, y + origin.y);
                out.push(AbsSegment::Line(pen));
                LastControl::None
            }
            Segment::Cubic(c1, c2, p) => {
                let c2 = at(c2);
                let p = at(p);
                out.push(AbsSegment::Cubic(at(c1), c2, p));
                pen = p;
                LastControl::Cubic(c2)
            }
            Segment::SmoothCubic(c2, p) => {
                let c1 = match last {
                    LastControl::Cubic(prev) => pen * 2.0 - prev,
                    _ => pen,
                };
                let c2 = at(c2);
                let p = at(p);
                out.push(AbsSegment::Cubic(c1, c2, p));
                pen = p;
                LastControl::Cubic(c2)
            }
            Segment::Quad(c, p) => {
                let c = at(c);
                let p = at(p);
                out.push(AbsSegment::Quad(c, p));
                pen = p;
                LastControl::Quad(c)
            }
            Segment::SmoothQuad(p) => {
                let c = match last {
                    LastControl::Quad(prev) => pen * 2.0 - prev,
                    _ => pen,
                };
                let p = at(p);
                out.push(AbsSegment::Quad(c, p));
                pen = p;
                LastControl::Quad(c)
            }
            Segment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to,
            } => {
                let to = at(to);
                for s in arc_to_curve(pen, radii, rotation, large_arc, sweep, to) {
                    out.push(AbsSegment::Cubic(
                        dvec2(s[0], s[1]),
                        dvec2(s[2], s[3]),
                        dvec2(s[4], s[5]),
                    ));
                }
                pen = to;
                LastControl::None
            }
            Segment::Close => {
                out.push(AbsSegment::Close);
                pen = start;
                LastControl::None
            }
        };
    }

    AbsPath(out)
}

/// Convert a path to absolute form containing only `M`, `L`, `C` and `Z`.
///
/// Quadratics are raised to cubics exactly; lines stay lines.
pub fn path_to_curve(path: &Path) -> AbsPath {
    let absolute = path_to_absolute(path);
    debug!(segments = absolute.len(), "raising quadratics to cubics");

    let mut pen = DVec2::ZERO;
    let mut start = DVec2::ZERO;
    let mut out = Vec::with_capacity(absolute.len());
    for segment in absolute.0 {
        let segment = match segment {
            AbsSegment::Quad(c, p) => {
                let k = quadratic_to_curve(pen.x, pen.y, c.x, c.y, p.x, p.y);
                AbsSegment::Cubic(dvec2(k[0], k[1]), dvec2(k[2], k[3]), p)
            }
            other => other,
        };
        match segment {
            AbsSegment::Move(p) => {
                pen = p;
                start = p;
            }
            AbsSegment::Close => pen = start,
            other => {
                if let Some(p) = other.end() {
                    pen = p;
                }
            }
        }
        out.push(segment);
    }
    AbsPath(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs(text: &str) -> String {
        path_to_absolute(&text.parse().unwrap()).to_string()
    }

    #[test]
    fn relative_commands_resolve_against_pen() {
        assert_eq!(abs("m10,10 l5,5 l-5,5 z"), "M10,10L15,15L10,20Z");
    }

    #[test]
    fn close_returns_pen_to_subpath_start() {
        assert_eq!(abs("M10,10 L20,10 Z l5,0"), "M10,10L20,10ZL15,10");
    }

    #[test]
    fn relative_move_after_close() {
        assert_eq!(abs("M10,10 L20,20 z m5,5 l1,1"), "M10,10L20,20ZM15,15L16,16");
    }

    #[test]
    fn horizontal_and_vertical_expand_to_lines() {
        assert_eq!(abs("M1,2 H10 V20 h-3 v-4"), "M1,2L10,2L10,20L7,20L7,16");
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        assert_eq!(abs("M0,0 C0,10 10,10 10,0 S20,-10 20,0"), "M0,0C0,10,10,10,10,0C10,-10,20,-10,20,0");
    }

    #[test]
    fn smooth_cubic_without_previous_uses_pen() {
        assert_eq!(abs("M5,5 S10,10 15,5"), "M5,5C5,5,10,10,15,5");
    }

    #[test]
    fn smooth_quad_reflects_previous_control() {
        assert_eq!(abs("M0,0 Q5,10 10,0 T20,0"), "M0,0Q5,10,10,0Q15,-10,20,0");
        assert_eq!(abs("M0,0 L1,1 T2,2"), "M0,0L1,1Q1,1,2,2");
    }

    #[test]
    fn arcs_become_cubics_ending_on_target() {
        let path = path_to_absolute(&"M0,0 a10,10 0 1,1 20,0".parse().unwrap());
        assert!(path.segments()[1..].iter().all(|s| matches!(s, AbsSegment::Cubic(..))));
        assert_eq!(path.segments().last().and_then(|s| s.end()), Some(dvec2(20.0, 0.0)));
    }

    #[test]
    fn missing_close_is_not_inserted() {
        assert_eq!(abs("M0,0 L1,0 L1,1"), "M0,0L1,0L1,1");
    }

    #[test]
    fn curve_form_has_only_native_segments() {
        let path = path_to_curve(&"M0,0 Q3,6 9,0 L9,9 z".parse().unwrap());
        assert_eq!(path.to_string(), "M0,0C2,4,5,4,9,0L9,9Z");
        assert!(
            path.segments()
                .iter()
                .all(|s| !matches!(s, AbsSegment::Quad(..)))
        );
    }
}
