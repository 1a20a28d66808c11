//! Error types with rich diagnostics using miette
//!
//! Path errors carry the offending path text and a span so a malformed path
//! renders as a pointed-at snippet rather than a bare message.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Name given to path text in diagnostics.
const PATH_SOURCE_NAME: &str = "<path>";

pub(crate) fn path_source(text: &str) -> NamedSource<String> {
    NamedSource::new(PATH_SOURCE_NAME, text.to_string())
}

// ============================================================================
// Path Errors
// ============================================================================

/// Errors raised while reading the path mini-language
#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("invalid path syntax: {message}")]
    #[diagnostic(code(vmldraw::path::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown path command `{command}`")]
    #[diagnostic(
        code(vmldraw::path::unknown_command),
        help("path commands are M, L, H, V, C, S, Q, T, A and Z, in either case")
    )]
    UnknownCommand {
        command: char,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a path command")]
        span: SourceSpan,
    },

    #[error("`{command}` takes arguments in groups of {arity}, found {found}")]
    #[diagnostic(code(vmldraw::path::argument_count))]
    ArgumentCount {
        command: char,
        arity: usize,
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this command")]
        span: SourceSpan,
    },

    #[error("invalid number `{text}`")]
    #[diagnostic(code(vmldraw::path::invalid_number))]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a number")]
        span: SourceSpan,
    },
}

// ============================================================================
// Surface Errors
// ============================================================================

/// Errors raised by surface bookkeeping
#[derive(Error, Diagnostic, Debug)]
pub enum SurfaceError {
    #[error("no sprite with id `{id}`")]
    #[diagnostic(code(vmldraw::surface::unknown_sprite))]
    UnknownSprite { id: String },

    #[error("a sprite with id `{id}` already exists")]
    #[diagnostic(code(vmldraw::surface::duplicate_sprite))]
    DuplicateSprite { id: String },

    #[error("surface has been destroyed")]
    #[diagnostic(
        code(vmldraw::surface::destroyed),
        help("create a new surface; a destroyed one cannot be re-rendered")
    )]
    Destroyed,

    #[error("markup serialization failed: {message}")]
    #[diagnostic(code(vmldraw::surface::markup))]
    Markup { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}
