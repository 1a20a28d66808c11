//! 2D affine transform and its VML serializations.
//!
//! The matrix is stored as a `glam::DAffine2`:
//!
//! ```text
//! | a c e |     a = m00, c = m01, e = m02
//! | b d f |     b = m10, d = m11, f = m12
//! ```
//!
//! `translate`, `rotate` and `scale` compose in call order: each new
//! operation applies after the ones already in the matrix.

use std::fmt;

use glam::{DAffine2, DMat2, DVec2, dvec2};

use crate::draw::{fmt_num, rad};
use crate::surface::config::{OFFSET_MAX, OFFSET_MIN};

/// Round to `places` decimals, halves away from zero
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix(DAffine2);

/// A matrix decomposed into simple operations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub shear: f64,
    /// Rotation in degrees
    pub rotate: f64,
    /// True when the matrix has no shear and either scales uniformly or does not rotate
    pub is_simple: bool,
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix(DAffine2::from_cols_array(&[a, b, c, d, e, f]))
    }

    pub fn identity() -> Self {
        Matrix(DAffine2::IDENTITY)
    }

    pub fn affine(&self) -> DAffine2 {
        self.0
    }

    /// Multiply on the right: `other` applies first, in local space
    pub fn append(&mut self, other: &Matrix) -> &mut Self {
        self.0 = self.0 * other.0;
        self
    }

    /// Multiply on the left: `other` applies last, in surface space
    pub fn prepend(&mut self, other: &Matrix) -> &mut Self {
        self.0 = other.0 * self.0;
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.prepend(&Matrix(DAffine2::from_translation(dvec2(dx, dy))))
    }

    /// Rotate by `degrees` about `(cx, cy)`.
    ///
    /// Sine and cosine are rounded to 9 decimals so right angles are exact.
    pub fn rotate(&mut self, degrees: f64, cx: f64, cy: f64) -> &mut Self {
        let a = rad(degrees);
        let cos = round_to(a.cos(), 9);
        let sin = round_to(a.sin(), 9);
        let rotation = DAffine2::from_mat2(DMat2::from_cols_array(&[cos, sin, -sin, cos]));
        self.prepend(&Matrix(about(rotation, dvec2(cx, cy))))
    }

    /// Scale by `(sx, sy)` about `(cx, cy)`
    pub fn scale(&mut self, sx: f64, sy: f64, cx: f64, cy: f64) -> &mut Self {
        let scaling = DAffine2::from_scale(dvec2(sx, sy));
        self.prepend(&Matrix(about(scaling, dvec2(cx, cy))))
    }

    pub fn invert(&self) -> Option<Matrix> {
        if self.0.matrix2.determinant() == 0.0 {
            return None;
        }
        Some(Matrix(self.0.inverse()))
    }

    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.0.transform_point2(p)
    }

    /// Mapped x coordinate of `(x, y)`
    pub fn x(&self, x: f64, y: f64) -> f64 {
        self.transform_point(dvec2(x, y)).x
    }

    /// Mapped y coordinate of `(x, y)`
    pub fn y(&self, x: f64, y: f64) -> f64 {
        self.transform_point(dvec2(x, y)).y
    }

    fn raw(&self, row: usize, col: usize) -> f64 {
        let m = &self.0;
        match (row, col) {
            (0, 0) => m.matrix2.x_axis.x,
            (0, 1) => m.matrix2.y_axis.x,
            (0, 2) => m.translation.x,
            (1, 0) => m.matrix2.x_axis.y,
            (1, 1) => m.matrix2.y_axis.y,
            (1, 2) => m.translation.y,
            (2, 2) => 1.0,
            _ => 0.0,
        }
    }

    /// Element at `(row, col)` rounded to 4 decimals
    pub fn get(&self, row: usize, col: usize) -> f64 {
        round_to(self.raw(row, col), 4)
    }

    /// Translation rounded to 4 decimals and clamped to the signed 16-bit range
    pub fn offset(&self) -> [f64; 2] {
        let clamp = |v: f64| round_to(v, 4).clamp(OFFSET_MIN, OFFSET_MAX);
        [clamp(self.raw(0, 2)), clamp(self.raw(1, 2))]
    }

    /// DirectX matrix filter, for elements without a skew child
    pub fn to_filter(&self) -> String {
        format!(
            "progid:DXImageTransform.Microsoft.Matrix(sizingMethod='auto expand',FilterType=bilinear,M11={}, M12={}, M21={}, M22={}, Dx={}, Dy={})",
            fmt_num(self.get(0, 0)),
            fmt_num(self.get(0, 1)),
            fmt_num(self.get(1, 0)),
            fmt_num(self.get(1, 1)),
            fmt_num(self.get(0, 2)),
            fmt_num(self.get(1, 2)),
        )
    }

    /// Decompose into translation, scale, shear and rotation
    pub fn split(&self) -> Split {
        let mut row0 = dvec2(self.raw(0, 0), self.raw(0, 1));
        let mut row1 = dvec2(self.raw(1, 0), self.raw(1, 1));

        let scale_x = row0.length();
        if scale_x != 0.0 {
            row0 /= scale_x;
        }
        let mut shear = row0.dot(row1);
        row1 -= row0 * shear;
        let scale_y = row1.length();
        if scale_y != 0.0 {
            row1 /= scale_y;
            shear /= scale_y;
        }
        let rotate = crate::draw::degrees((-row0.y).clamp(-1.0, 1.0).asin());

        Split {
            translate_x: self.raw(0, 2),
            translate_y: self.raw(1, 2),
            scale_x,
            scale_y,
            shear,
            rotate,
            is_simple: round_to(shear, 9) == 0.0
                && (round_to(scale_x, 9) == round_to(scale_y, 9) || rotate == 0.0),
        }
    }
}

/// `op` applied about `center` instead of the origin
fn about(op: DAffine2, center: DVec2) -> DAffine2 {
    DAffine2::from_translation(center) * op * DAffine2::from_translation(-center)
}

/// Skew matrix form: the linear part followed by a zero translation
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},0,0",
            fmt_num(self.get(0, 0)),
            fmt_num(self.get(0, 1)),
            fmt_num(self.get(1, 0)),
            fmt_num(self.get(1, 1)),
        )
    }
}
