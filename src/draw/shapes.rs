//! Shape paths and whole-path transforms

use glam::{DVec2, dvec2};

use super::absolute::path_to_absolute;
use super::path::{AbsPath, Path, PathCommand, Segment};
use super::rotate_point;
use crate::matrix::Matrix;
use crate::types::BBox;

/// Closed ellipse centered on `(x, y)`, drawn as two 180 degree arcs
/// starting at the leftmost point.
pub fn ellipse_path(x: f64, y: f64, rx: f64, ry: f64) -> Path {
    let half = |to: DVec2| Segment::Arc {
        radii: dvec2(rx, ry),
        rotation: 0.0,
        large_arc: true,
        sweep: true,
        to,
    };
    Path(vec![
        PathCommand::abs(Segment::Move(dvec2(x - rx, y))),
        PathCommand::abs(half(dvec2(x + rx, y))),
        PathCommand::abs(half(dvec2(x - rx, y))),
        PathCommand::abs(Segment::Close),
    ])
}

/// Rectangle outline, with quarter-arc corners when `radius` is positive.
///
/// Square corners give four absolute line-tos back to the start. Rounded
/// corners are drawn clockwise from the top edge with relative commands.
pub fn rect_path(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Path {
    if radius > 0.0 {
        let r = radius;
        let corner = |dx: f64, dy: f64| {
            PathCommand::rel(Segment::Arc {
                radii: dvec2(r, r),
                rotation: 0.0,
                large_arc: false,
                sweep: true,
                to: dvec2(dx, dy),
            })
        };
        let line = |dx: f64, dy: f64| PathCommand::rel(Segment::Line(dvec2(dx, dy)));
        return Path(vec![
            PathCommand::abs(Segment::Move(dvec2(x + r, y))),
            line(width - r * 2.0, 0.0),
            corner(r, r),
            line(0.0, height - r * 2.0),
            corner(-r, r),
            line(r * 2.0 - width, 0.0),
            corner(-r, -r),
            line(0.0, r * 2.0 - height),
            corner(r, -r),
            PathCommand::rel(Segment::Close),
        ]);
    }

    let line = |px: f64, py: f64| PathCommand::abs(Segment::Line(dvec2(px, py)));
    Path(vec![
        PathCommand::abs(Segment::Move(dvec2(x, y))),
        line(x + width, y),
        line(x + width, y + height),
        line(x, y + height),
        line(x, y),
        PathCommand::abs(Segment::Close),
    ])
}

/// Rotate every vertex by `degrees` about `center`, then translate.
///
/// Returns a new absolute path; the input is left untouched.
pub fn rotate_and_translate_path(
    path: &Path,
    degrees: f64,
    center: DVec2,
    translation: DVec2,
) -> AbsPath {
    let absolute = path_to_absolute(path);
    if degrees == 0.0 && translation == DVec2::ZERO {
        return absolute;
    }
    absolute
        .0
        .into_iter()
        .map(|s| {
            s.map_points(|p| {
                rotate_point(p.x, p.y, degrees, center.x, center.y) + translation
            })
        })
        .collect()
}

/// Bounding box over every vertex, control points included.
pub fn path_dimensions(path: &AbsPath) -> BBox {
    BBox::from_points(path.points())
}

/// Apply `matrix` to every vertex
pub fn map_path(path: &AbsPath, matrix: &Matrix) -> AbsPath {
    path.0
        .iter()
        .map(|s| s.map_points(|p| matrix.transform_point(p)))
        .collect()
}
