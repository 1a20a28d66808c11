//! Emitting a sprite matrix onto its element

use glam::DVec2;

use super::dom::VmlDocument;
use super::state::RenderState;
use crate::draw::fmt_num;
use crate::matrix::Matrix;
use crate::types::{BBox, ViewBoxShift};

/// The matrix as it reaches the device: the sprite matrix followed by the
/// view-box shift
pub(crate) fn device_matrix(sprite: &Matrix, shift: Option<ViewBoxShift>) -> Matrix {
    let mut matrix = *sprite;
    if let Some(s) = shift {
        matrix.prepend(&Matrix::new(
            s.scale,
            0.0,
            0.0,
            s.scale,
            s.dx * s.scale,
            s.dy * s.scale,
        ));
    }
    matrix
}

/// Write `matrix` to the element.
///
/// Shapes carry it on their skew child. Images have none, so they get a
/// matrix filter and are positioned at the top-left of their mapped box.
pub(crate) fn emit(doc: &mut VmlDocument, state: &RenderState, matrix: &Matrix, plain: BBox) {
    match state.handles.skew {
        Some(skew) => {
            let [dx, dy] = matrix.offset();
            doc.set_attr(skew, "origin", "0,0");
            doc.set_attr(skew, "matrix", matrix.to_string());
            doc.set_attr(skew, "offset", format!("{},{}", fmt_num(dx), fmt_num(dy)));
        }
        None => {
            let element = state.handles.element;
            let corners = plain.corners().map(|c| matrix.transform_point(c));
            let min = corners
                .iter()
                .fold(DVec2::splat(f64::INFINITY), |acc, c| acc.min(*c));
            doc.set_style(element, "filter", matrix.to_filter());
            doc.set_style(element, "left", format!("{}px", fmt_num(min.x)));
            doc.set_style(element, "top", format!("{}px", fmt_num(min.y)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vml::dom::Tag;

    #[test]
    fn shift_applies_after_the_sprite_matrix() {
        let mut sprite = Matrix::identity();
        sprite.translate(10.0, 0.0);
        let shift = ViewBoxShift {
            dx: 5.0,
            dy: 5.0,
            scale: 2.0,
        };
        let m = device_matrix(&sprite, Some(shift));
        assert_eq!(m.offset(), [30.0, 10.0]);
        assert_eq!(device_matrix(&sprite, None), sprite);
    }

    #[test]
    fn skew_gets_matrix_and_offset() {
        let mut doc = VmlDocument::new();
        let element = doc.create(Tag::Shape);
        let skew = doc.create(Tag::Skew);
        doc.append_child(element, skew);
        let mut state = RenderState::new(element);
        state.handles.skew = Some(skew);

        let mut m = Matrix::identity();
        m.translate(3.0, -4.0);
        emit(&mut doc, &state, &m, BBox::default());
        assert_eq!(doc.attr(skew, "origin"), Some("0,0"));
        assert_eq!(doc.attr(skew, "matrix"), Some("1,0,0,1,0,0"));
        assert_eq!(doc.attr(skew, "offset"), Some("3,-4"));
    }

    #[test]
    fn images_use_a_filter() {
        let mut doc = VmlDocument::new();
        let element = doc.create(Tag::Image);
        let state = RenderState::new(element);

        let mut m = Matrix::identity();
        m.rotate(90.0, 0.0, 0.0);
        emit(&mut doc, &state, &m, BBox::new(0.0, 0.0, 10.0, 20.0));
        assert!(doc.style(element, "filter").unwrap().contains("M11=0, M12=-1"));
        assert_eq!(doc.style(element, "left"), Some("-20px"));
        assert_eq!(doc.style(element, "top"), Some("0px"));
    }
}
