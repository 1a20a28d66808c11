//! Parse pest pairs into path commands

use glam::dvec2;
use pest::Parser;
use pest::iterators::Pair;

use super::path::{Path, PathCommand, Segment};
use crate::errors::{PathError, path_source};
use crate::{PathParser, Rule};

/// Parse path text (`"M10,10 l5 5 z"`) into commands.
///
/// Repeated argument groups repeat the command; after a move they become
/// line-tos of the same relativity.
pub fn parse_path(source: &str) -> Result<Path, PathError> {
    let pairs = PathParser::parse(Rule::path, source).map_err(|e| syntax_error(source, e))?;

    let mut path = Path::new();
    for pair in pairs {
        if pair.as_rule() != Rule::path {
            continue;
        }
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::command {
                parse_command(source, inner, &mut path)?;
            }
        }
    }
    Ok(path)
}

fn syntax_error(source: &str, err: pest::error::Error<Rule>) -> PathError {
    let (start, len) = match err.location {
        pest::error::InputLocation::Pos(p) => (p, 1),
        pest::error::InputLocation::Span((s, e)) => (s, e.saturating_sub(s).max(1)),
    };
    let start = start.min(source.len().saturating_sub(1));
    let len = len.min(source.len().saturating_sub(start)).max(usize::from(!source.is_empty()));
    PathError::Syntax {
        message: err.variant.message().to_string(),
        src: path_source(source),
        span: (start, len).into(),
    }
}

/// Number of arguments one instance of a command takes
fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'C' => Some(6),
        'S' | 'Q' => Some(4),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

fn parse_command(source: &str, pair: Pair<Rule>, path: &mut Path) -> Result<(), PathError> {
    let span = pair.as_span();
    let command_span = (span.start(), span.end() - span.start());
    let mut inner = pair.into_inner();

    let Some(letter_pair) = inner.next() else {
        return Ok(());
    };
    let letter_span = letter_pair.as_span();
    let letter = letter_pair.as_str().chars().next().unwrap_or(' ');

    let Some(arity) = arity(letter) else {
        return Err(PathError::UnknownCommand {
            command: letter,
            src: path_source(source),
            span: (letter_span.start(), 1).into(),
        });
    };

    let mut args = Vec::new();
    for number in inner {
        let text = number.as_str();
        let value: f64 = text.parse().map_err(|_| PathError::InvalidNumber {
            text: text.to_string(),
            src: path_source(source),
            span: (number.as_span().start(), text.len()).into(),
        })?;
        args.push(value);
    }

    let count_error = || PathError::ArgumentCount {
        command: letter,
        arity,
        found: args.len(),
        src: path_source(source),
        span: command_span.into(),
    };

    let relative = letter.is_ascii_lowercase();
    let upper = letter.to_ascii_uppercase();

    if arity == 0 {
        if !args.is_empty() {
            return Err(count_error());
        }
        path.push(PathCommand {
            relative,
            segment: Segment::Close,
        });
        return Ok(());
    }

    if args.is_empty() || args.len() % arity != 0 {
        return Err(count_error());
    }

    for (i, a) in args.chunks_exact(arity).enumerate() {
        let segment = match upper {
            'M' if i == 0 => Segment::Move(dvec2(a[0], a[1])),
            'M' | 'L' => Segment::Line(dvec2(a[0], a[1])),
            'T' => Segment::SmoothQuad(dvec2(a[0], a[1])),
            'H' => Segment::Horizontal(a[0]),
            'V' => Segment::Vertical(a[0]),
            'C' => Segment::Cubic(dvec2(a[0], a[1]), dvec2(a[2], a[3]), dvec2(a[4], a[5])),
            'S' => Segment::SmoothCubic(dvec2(a[0], a[1]), dvec2(a[2], a[3])),
            'Q' => Segment::Quad(dvec2(a[0], a[1]), dvec2(a[2], a[3])),
            _ => Segment::Arc {
                radii: dvec2(a[0], a[1]),
                rotation: a[2],
                large_arc: a[3] != 0.0,
                sweep: a[4] != 0.0,
                to: dvec2(a[5], a[6]),
            },
        };
        path.push(PathCommand { relative, segment });
    }
    Ok(())
}
