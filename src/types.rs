//! Small geometric value types shared by the geometry library and the surface.

use glam::{DVec2, dvec2};

/// Axis-aligned bounding box in logical (unscaled) units
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        BBox { x, y, width, height }
    }

    /// Smallest box covering every point. An empty iterator yields the zero box.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut min = DVec2::splat(f64::MAX);
        let mut max = DVec2::splat(f64::MIN);
        let mut any = false;
        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if !any {
            return BBox::default();
        }
        BBox {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    pub fn center(&self) -> DVec2 {
        dvec2(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [DVec2; 4] {
        let (x2, y2) = (self.x + self.width, self.y + self.height);
        [
            dvec2(self.x, self.y),
            dvec2(x2, self.y),
            dvec2(self.x, y2),
            dvec2(x2, y2),
        ]
    }
}

/// Logical coordinate window a surface maps onto its physical size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Uniform logical-to-physical remapping derived from a [`ViewBox`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBoxShift {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

impl ViewBoxShift {
    /// Fit `view_box` into a `width` x `height` surface, preserving aspect
    /// ratio and centering along the axis with slack.
    ///
    /// Returns `None` for a degenerate view box.
    pub fn fit(view_box: &ViewBox, width: f64, height: f64) -> Option<Self> {
        if view_box.width <= 0.0 || view_box.height <= 0.0 {
            return None;
        }
        let width = if width > 0.0 { width } else { 1.0 };
        let height = if height > 0.0 { height } else { 1.0 };

        let size = (width / view_box.width).min(height / view_box.height);
        let mut x = view_box.x;
        let mut y = view_box.y;
        if view_box.width * size < width {
            x -= (width - view_box.width * size) / 2.0 / size;
        }
        if view_box.height * size < height {
            y -= (height - view_box.height * size) / 2.0 / size;
        }
        Some(ViewBoxShift {
            dx: -x,
            dy: -y,
            scale: size,
        })
    }
}
