//! Path model for the SVG-style path mini-language.
//!
//! Two forms exist:
//! - [`Path`]: what callers write. Commands may be relative and may use the
//!   shorthand forms (`H`, `V`, `S`, `T`) and elliptical arcs (`A`).
//! - [`AbsPath`]: the normalized form every renderer consumes. Only absolute
//!   move/line/cubic/quadratic/close segments exist, so a relative command
//!   cannot reappear once a path has been normalized.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use glam::DVec2;

use crate::errors::PathError;

/// One path command's geometry, without its absolute/relative flag
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Move(DVec2),
    Line(DVec2),
    Horizontal(f64),
    Vertical(f64),
    Cubic(DVec2, DVec2, DVec2),
    SmoothCubic(DVec2, DVec2),
    Quad(DVec2, DVec2),
    SmoothQuad(DVec2),
    Arc {
        radii: DVec2,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: DVec2,
    },
    Close,
}

impl Segment {
    /// Upper-case command letter
    pub fn letter(&self) -> char {
        match self {
            Segment::Move(_) => 'M',
            Segment::Line(_) => 'L',
            Segment::Horizontal(_) => 'H',
            Segment::Vertical(_) => 'V',
            Segment::Cubic(..) => 'C',
            Segment::SmoothCubic(..) => 'S',
            Segment::Quad(..) => 'Q',
            Segment::SmoothQuad(_) => 'T',
            Segment::Arc { .. } => 'A',
            Segment::Close => 'Z',
        }
    }

    /// Numeric arguments in wire order
    pub fn args(&self) -> Vec<f64> {
        match *self {
            Segment::Move(p) | Segment::Line(p) | Segment::SmoothQuad(p) => vec![p.x, p.y],
            Segment::Horizontal(v) | Segment::Vertical(v) => vec![v],
            Segment::Cubic(c1, c2, p) => vec![c1.x, c1.y, c2.x, c2.y, p.x, p.y],
            Segment::SmoothCubic(c, p) | Segment::Quad(c, p) => vec![c.x, c.y, p.x, p.y],
            Segment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to,
            } => vec![
                radii.x,
                radii.y,
                rotation,
                f64::from(u8::from(large_arc)),
                f64::from(u8::from(sweep)),
                to.x,
                to.y,
            ],
            Segment::Close => Vec::new(),
        }
    }

    /// True for commands VML can draw without curve conversion
    pub fn is_vml_native(&self) -> bool {
        matches!(
            self,
            Segment::Move(_) | Segment::Line(_) | Segment::Cubic(..) | Segment::Close
        )
    }
}

/// A single command as written: geometry plus the relative flag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathCommand {
    pub relative: bool,
    pub segment: Segment,
}

impl PathCommand {
    pub fn abs(segment: Segment) -> Self {
        PathCommand {
            relative: false,
            segment,
        }
    }

    pub fn rel(segment: Segment) -> Self {
        PathCommand {
            relative: true,
            segment,
        }
    }

    /// Command letter, lower-case when relative
    pub fn letter(&self) -> char {
        let c = self.segment.letter();
        if self.relative { c.to_ascii_lowercase() } else { c }
    }
}

/// A path as supplied by callers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path(pub Vec<PathCommand>);

impl Path {
    pub fn new() -> Self {
        Path(Vec::new())
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }

    pub fn push(&mut self, command: PathCommand) {
        self.0.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if any command needs curve conversion before VML can draw it
    pub fn needs_curve_conversion(&self) -> bool {
        self.0.iter().any(|c| !c.segment.is_vml_native())
    }
}

impl FromIterator<PathCommand> for Path {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse::parse_path(s)
    }
}

/// A normalized, absolute path segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbsSegment {
    Move(DVec2),
    Line(DVec2),
    Cubic(DVec2, DVec2, DVec2),
    Quad(DVec2, DVec2),
    Close,
}

impl AbsSegment {
    pub fn letter(&self) -> char {
        match self {
            AbsSegment::Move(_) => 'M',
            AbsSegment::Line(_) => 'L',
            AbsSegment::Cubic(..) => 'C',
            AbsSegment::Quad(..) => 'Q',
            AbsSegment::Close => 'Z',
        }
    }

    /// Every point of the segment, control points included
    pub fn points(&self) -> Vec<DVec2> {
        match *self {
            AbsSegment::Move(p) | AbsSegment::Line(p) => vec![p],
            AbsSegment::Cubic(c1, c2, p) => vec![c1, c2, p],
            AbsSegment::Quad(c, p) => vec![c, p],
            AbsSegment::Close => Vec::new(),
        }
    }

    /// Where the pen ends up, if the segment moves it explicitly
    pub fn end(&self) -> Option<DVec2> {
        match *self {
            AbsSegment::Move(p) | AbsSegment::Line(p) => Some(p),
            AbsSegment::Cubic(_, _, p) | AbsSegment::Quad(_, p) => Some(p),
            AbsSegment::Close => None,
        }
    }

    /// Apply `f` to every point of the segment
    pub fn map_points(self, f: impl Fn(DVec2) -> DVec2) -> Self {
        match self {
            AbsSegment::Move(p) => AbsSegment::Move(f(p)),
            AbsSegment::Line(p) => AbsSegment::Line(f(p)),
            AbsSegment::Cubic(c1, c2, p) => AbsSegment::Cubic(f(c1), f(c2), f(p)),
            AbsSegment::Quad(c, p) => AbsSegment::Quad(f(c), f(p)),
            AbsSegment::Close => AbsSegment::Close,
        }
    }

    pub fn args(&self) -> Vec<f64> {
        self.points().into_iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

/// A path in absolute, normalized form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbsPath(pub Vec<AbsSegment>);

impl AbsPath {
    pub fn segments(&self) -> &[AbsSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All vertices, control points included
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.0.iter().flat_map(|s| s.points())
    }
}

impl FromIterator<AbsSegment> for AbsPath {
    fn from_iter<I: IntoIterator<Item = AbsSegment>>(iter: I) -> Self {
        AbsPath(iter.into_iter().collect())
    }
}

impl From<AbsPath> for Path {
    fn from(path: AbsPath) -> Self {
        path.0
            .into_iter()
            .map(|s| {
                PathCommand::abs(match s {
                    AbsSegment::Move(p) => Segment::Move(p),
                    AbsSegment::Line(p) => Segment::Line(p),
                    AbsSegment::Cubic(c1, c2, p) => Segment::Cubic(c1, c2, p),
                    AbsSegment::Quad(c, p) => Segment::Quad(c, p),
                    AbsSegment::Close => Segment::Close,
                })
            })
            .collect()
    }
}

/// Format a number the short way: no trailing `.0`, no negative zero.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == 0.0 { "0".to_string() } else { format!("{}", v) }
}

fn write_command(out: &mut String, letter: char, args: &[f64]) {
    out.push(letter);
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", fmt_num(*a));
    }
}

/// Compact string form, e.g. `M10,20L30,40Z`
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for c in &self.0 {
            write_command(&mut out, c.letter(), &c.segment.args());
        }
        f.write_str(&out)
    }
}

impl fmt::Display for AbsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for s in &self.0 {
            write_command(&mut out, s.letter(), &s.args());
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn display_compact_form() {
        let path: Path = [
            PathCommand::abs(Segment::Move(dvec2(10.0, 20.0))),
            PathCommand::rel(Segment::Line(dvec2(-5.0, 0.5))),
            PathCommand::abs(Segment::Close),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "M10,20l-5,0.5Z");
    }

    #[test]
    fn arc_flags_render_as_digits() {
        let arc = Segment::Arc {
            radii: dvec2(5.0, 5.0),
            rotation: 0.0,
            large_arc: true,
            sweep: false,
            to: dvec2(1.0, 2.0),
        };
        assert_eq!(arc.args(), vec![5.0, 5.0, 0.0, 1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(-3.0), "-3");
    }

    #[test]
    fn abs_path_converts_back_to_absolute_commands() {
        let abs = AbsPath(vec![
            AbsSegment::Move(dvec2(0.0, 0.0)),
            AbsSegment::Quad(dvec2(1.0, 1.0), dvec2(2.0, 0.0)),
        ]);
        let path = Path::from(abs);
        assert!(path.commands().iter().all(|c| !c.relative));
        assert_eq!(path.to_string(), "M0,0Q1,1,2,0");
    }

    #[test]
    fn native_segments() {
        assert!(Segment::Cubic(DVec2::ZERO, DVec2::ZERO, DVec2::ZERO).is_vml_native());
        assert!(!Segment::Horizontal(1.0).is_vml_native());
        assert!(!Segment::SmoothQuad(DVec2::ZERO).is_vml_native());
    }
}
