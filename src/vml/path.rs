//! Transcoding paths into VML path strings.
//!
//! VML paths use integer coordinates in a `ZOOM`-scaled space and their own
//! command letters: `m`/`l`/`c` for absolute move/line/curve, `t`/`r`/`v` for
//! the relative forms and `x` to close.
//!
//! Three routes:
//! - anything with `A`, `H`, `Q`, `S`, `T` or `V` is normalized to absolute
//!   cubic form first;
//! - text that only uses `M`, `L`, `C` and `Z` is transcoded token by token
//!   without building a path;
//! - everything else goes through absolute normalization.

use crate::draw::{AbsPath, AbsSegment, Path, PathCommand, Segment, path_to_absolute, path_to_curve};
use crate::errors::PathError;
use crate::log::{debug, trace};
use crate::surface::config::ZOOM;

/// Path input in either of its two forms
#[derive(Clone, Copy, Debug)]
pub enum PathSource<'a> {
    Text(&'a str),
    Commands(&'a Path),
}

/// Scale to native units and round half up
pub(crate) fn zoomed(value: f64) -> i64 {
    (value * ZOOM + 0.5).floor() as i64
}

fn native_letter(letter: char) -> Option<char> {
    match letter {
        'M' => Some('m'),
        'L' => Some('l'),
        'C' => Some('c'),
        'm' => Some('t'),
        'l' => Some('r'),
        'c' => Some('v'),
        'Z' | 'z' => Some('x'),
        _ => None,
    }
}

fn is_curve_only(letter: char) -> bool {
    matches!(letter.to_ascii_lowercase(), 'a' | 'h' | 'q' | 's' | 't' | 'v')
}

fn push_token(out: &mut Vec<String>, letter: char, args: &[f64]) {
    let mut token = String::with_capacity(1 + args.len() * 8);
    token.push(letter);
    let values: Vec<String> = args.iter().map(|v| zoomed(*v).to_string()).collect();
    token.push_str(&values.join(","));
    out.push(token);
}

/// Convert a path to a VML path string
pub fn path_to_vml(source: PathSource<'_>) -> Result<String, PathError> {
    match source {
        PathSource::Text(text) => {
            if text.chars().any(is_curve_only) {
                debug!("path needs curve conversion");
                return Ok(absolute_to_vml(&path_to_curve(&text.parse()?)));
            }
            if let Some(vml) = transcode_text(text) {
                trace!(text, "path transcoded on the fast route");
                return Ok(vml);
            }
            debug!("path text not in the fast subset, normalizing");
            Ok(absolute_to_vml(&path_to_absolute(&text.parse()?)))
        }
        PathSource::Commands(path) => {
            if path.needs_curve_conversion() {
                debug!("path needs curve conversion");
                return Ok(absolute_to_vml(&path_to_curve(path)));
            }
            Ok(commands_to_vml(path))
        }
    }
}

/// Emit an absolute path, lowering each letter
pub fn absolute_to_vml(path: &AbsPath) -> String {
    let mut tokens = Vec::with_capacity(path.len());
    for segment in path.segments() {
        let letter = match segment {
            AbsSegment::Close => 'x',
            other => other.letter().to_ascii_lowercase(),
        };
        push_token(&mut tokens, letter, &segment.args());
    }
    tokens.join(" ")
}

/// Commands that are already native map one to one
fn commands_to_vml(path: &Path) -> String {
    let mut tokens = Vec::with_capacity(path.len());
    for PathCommand { relative, segment } in path.commands() {
        let letter = match (segment, relative) {
            (Segment::Close, _) => 'x',
            (_, true) => native_letter(segment.letter().to_ascii_lowercase()).unwrap_or('x'),
            (_, false) => native_letter(segment.letter()).unwrap_or('x'),
        };
        push_token(&mut tokens, letter, &segment.args());
    }
    tokens.join(" ")
}

/// Fast route for text using only `M`, `L`, `C`, `Z`.
///
/// Returns `None` when the text strays outside that subset or its argument
/// counts do not fit, leaving the full parser to report the problem.
fn transcode_text(text: &str) -> Option<String> {
    let mut tokens = Vec::new();
    let mut scanner = Scanner::new(text);
    let mut current: Option<(char, Vec<f64>)> = None;

    loop {
        scanner.skip_separators();
        let Some(c) = scanner.peek() else {
            break;
        };
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            scanner.bump();
            if let Some((letter, args)) = current.take() {
                flush(&mut tokens, letter, &args)?;
            }
            native_letter(c)?;
            current = Some((c, Vec::new()));
            continue;
        }

        let value = scanner.number()?;
        let (letter, args) = current.as_mut()?;
        // A move that already has its point continues as line-tos
        if letter.eq_ignore_ascii_case(&'m') && args.len() == 2 {
            let move_letter = *letter;
            flush(&mut tokens, move_letter, args)?;
            *letter = if move_letter == 'm' { 'l' } else { 'L' };
            args.clear();
        }
        args.push(value);
    }

    if let Some((letter, args)) = current {
        flush(&mut tokens, letter, &args)?;
    }
    Some(tokens.join(" "))
}

fn flush(tokens: &mut Vec<String>, letter: char, args: &[f64]) -> Option<()> {
    let arity = match letter.to_ascii_lowercase() {
        'm' | 'l' => 2,
        'c' => 6,
        _ => 0,
    };
    let fits = if arity == 0 {
        args.is_empty()
    } else {
        !args.is_empty() && args.len() % arity == 0
    };
    if !fits {
        return None;
    }
    if arity == 0 {
        push_token(tokens, native_letter(letter)?, args);
        return Some(());
    }
    for group in args.chunks_exact(arity) {
        push_token(tokens, native_letter(letter)?, group);
    }
    Some(())
}

/// Minimal number scanner for the fast route
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|b| *b as char)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c == ',' || c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        self.pos - start
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        let mut count = self.digits();
        if self.peek() == Some('.') {
            self.bump();
            count += self.digits();
        }
        if count == 0 {
            return None;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.digits() == 0 {
                self.pos = mark;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

/// Native arc string for a full ellipse: two `ar` halves through the top and
/// bottom points, then a close.
pub fn ellipse_to_vml(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    let left = zoomed(cx - rx);
    let top = zoomed(cy - ry);
    let right = zoomed(cx + rx);
    let bottom = zoomed(cy + ry);
    let mid = zoomed(cx);
    format!(
        "ar{left},{top},{right},{bottom},{mid},{top},{mid},{bottom} ar{left},{top},{right},{bottom},{mid},{bottom},{mid},{top} x"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vml(text: &str) -> String {
        path_to_vml(PathSource::Text(text)).unwrap()
    }

    #[test]
    fn fast_route_maps_letters_and_scales() {
        assert_eq!(vml("M1,2 L3,4 Z"), "m21600,43200 l64800,86400 x");
        assert_eq!(vml("m1,0 l0.5,0.5 c1 1 2 2 3 3 z"), "t21600,0 r10800,10800 v21600,21600,43200,43200,64800,64800 x");
    }

    #[test]
    fn extra_move_points_become_lines() {
        assert_eq!(vml("M0,0 1,1 2,2"), "m0,0 l21600,21600 l43200,43200");
        assert_eq!(vml("m0,0 1,1"), "t0,0 r21600,21600");
    }

    #[test]
    fn rounding_is_to_nearest() {
        // 0.00002 * 21600 = 0.432, 0.00003 * 21600 = 0.648
        assert_eq!(vml("M0.00002,0.00003"), "m0,1");
        assert_eq!(vml("M-0.5,1e-1"), "m-10800,2160");
    }

    #[test]
    fn curve_route_for_shorthand_commands() {
        assert_eq!(vml("M0,0 H1 V1"), "m0,0 l21600,0 l21600,21600");
        assert_eq!(vml("M0,0 Q3,6 9,0"), "m0,0 c43200,86400,108000,86400,194400,0");
        let arc = vml("M0,0 A1,1 0 0,1 2,0");
        assert!(arc.starts_with("m0,0 c"));
        assert!(arc.ends_with(",43200,0"));
    }

    #[test]
    fn native_commands_map_directly() {
        let path: Path = "M10,20 l5,0 C1,2 3,4 5,6 z".parse().unwrap();
        assert_eq!(
            path_to_vml(PathSource::Commands(&path)).unwrap(),
            "m216000,432000 r108000,0 c21600,43200,64800,86400,108000,129600 x"
        );
    }

    #[test]
    fn bad_text_is_reported_by_the_parser() {
        assert!(matches!(
            path_to_vml(PathSource::Text("M0,0 L1")),
            Err(PathError::ArgumentCount { .. })
        ));
        assert!(matches!(
            path_to_vml(PathSource::Text("M0,0 K1,1")),
            Err(PathError::UnknownCommand { .. })
        ));
        assert!(path_to_vml(PathSource::Text("10,10")).is_err());
    }

    #[test]
    fn ellipse_arc_string() {
        assert_eq!(
            ellipse_to_vml(1.0, 1.0, 1.0, 0.5),
            "ar0,10800,43200,32400,21600,10800,21600,32400 ar0,10800,43200,32400,21600,32400,21600,10800 x"
        );
    }
}
