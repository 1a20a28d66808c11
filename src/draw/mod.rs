//! Geometry library: path normalization, curve conversion, shape paths and
//! the small trigonometry helpers they share. Everything here is pure.

mod absolute;
mod curve;
mod gradient;
mod parse;
mod path;
mod shapes;
mod smooth;
mod snap;

use std::f64::consts::PI;

use glam::{DVec2, dvec2};

pub use absolute::{path_to_absolute, path_to_curve};
pub use curve::{arc_to_curve, quadratic_to_curve};
pub use gradient::{
    DEFAULT_STOP_COLOR, Gradient, GradientConfig, GradientGeometry, GradientKind, Stop, StopConfig,
    parse_gradient,
};
pub use parse::parse_path;
pub(crate) use path::fmt_num;
pub use path::{AbsPath, AbsSegment, Path, PathCommand, Segment};
pub use shapes::{ellipse_path, map_path, path_dimensions, rect_path, rotate_and_translate_path};
pub use smooth::{Anchors, anchors, smooth};
pub use snap::{Snapped, snap_ends};

/// Degrees to radians, wrapping at 360 first
pub fn rad(degrees: f64) -> f64 {
    degrees % 360.0 * PI / 180.0
}

/// Radians to degrees, wrapped with `%` (the sign is kept)
pub fn degrees(radians: f64) -> f64 {
    radians * 180.0 / PI % 360.0
}

/// Rotate `(x, y)` about the origin by `radians`
pub fn rotate(x: f64, y: f64, radians: f64) -> DVec2 {
    let (sin, cos) = radians.sin_cos();
    dvec2(x * cos - y * sin, x * sin + y * cos)
}

/// Rotate `(x, y)` about `(cx, cy)` by `degrees`
pub fn rotate_point(x: f64, y: f64, degrees: f64, cx: f64, cy: f64) -> DVec2 {
    if degrees == 0.0 {
        return dvec2(x, y);
    }
    rotate(x - cx, y - cy, rad(degrees)) + dvec2(cx, cy)
}
