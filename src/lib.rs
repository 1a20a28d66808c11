//! A VML drawing engine.
//!
//! Sprites (circles, ellipses, rectangles, paths, text and images) live on a
//! [`Surface`]. The VML engine keeps a retained element tree in step with
//! them, re-emitting only what each sprite's pending changes say is stale.
//! The [`draw`] module holds the geometry the engine is built on: SVG path
//! parsing and normalization, curve conversion, shape paths, smoothing and
//! axis snapping.
//!
//! ```
//! use vmldraw::{Engine, Sprite, SpriteType, Surface, SurfaceConfig};
//!
//! let mut surface = Engine::vml(SurfaceConfig::default().with_size(200.0, 100.0));
//! surface
//!     .add(Sprite::new("box", SpriteType::Rect).with(|a| {
//!         a.width = Some(20.0);
//!         a.height = Some(10.0);
//!         a.fill = Some("steelblue".into());
//!     }))
//!     .unwrap();
//! surface.render_all().unwrap();
//! assert!(surface.markup().unwrap().contains("vml:shape"));
//! ```

use pest_derive::Parser;

pub mod color;
pub mod draw;
pub mod errors;
mod log;
pub mod matrix;
pub mod surface;
pub mod types;
pub mod vml;

pub use errors::{PathError, SurfaceError};
pub use matrix::Matrix;
pub use surface::{
    Change, ChangeSet, Engine, Paint, Rotation, Scaling, Sprite, SpriteAttrs, SpriteType, Surface,
    SurfaceConfig, TextAnchor, Translation,
};
pub use types::{BBox, ViewBox, ViewBoxShift};
pub use vml::{PathSource, VmlSurface, path_to_vml};

#[derive(Parser)]
#[grammar = "path.pest"]
pub struct PathParser;

/// Transcode SVG path text to a VML path string.
///
/// Returns the VML path on success, or a diagnostic pointing into the text.
pub fn vml_path(source: &str) -> Result<String, miette::Report> {
    Ok(path_to_vml(PathSource::Text(source))?)
}
