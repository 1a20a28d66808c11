//! Gradient descriptors

use crate::color::to_hex;

/// Stop color used when none is given or it cannot be read
pub const DEFAULT_STOP_COLOR: &str = "#ffffff";

/// Geometry of a gradient as configured by the caller
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial {
        center_x: f64,
        center_y: f64,
        focal_x: f64,
        focal_y: f64,
        radius: f64,
    },
}

/// One configured stop; `offset` is a percentage
#[derive(Clone, Debug, PartialEq)]
pub struct StopConfig {
    pub offset: f64,
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

impl StopConfig {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        StopConfig {
            offset,
            color: Some(color.into()),
            opacity: None,
        }
    }
}

/// A gradient as handed to `add_gradient`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientConfig {
    pub id: String,
    pub kind: GradientKind,
    /// Direction of a linear gradient in degrees
    pub angle: Option<f64>,
    pub stops: Vec<StopConfig>,
}

/// Normalized stop: color is always `#rrggbb`
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GradientGeometry {
    /// `[x1, y1, x2, y2]` in unit space
    Linear { vector: [f64; 4] },
    Radial {
        center_x: f64,
        center_y: f64,
        focal_x: f64,
        focal_y: f64,
        radius: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub geometry: GradientGeometry,
    /// Sorted by offset
    pub stops: Vec<Stop>,
}

impl Gradient {
    pub fn is_linear(&self) -> bool {
        matches!(self.geometry, GradientGeometry::Linear { .. })
    }
}

/// Unit vector for a linear gradient at `angle` degrees.
///
/// The larger component is scaled to 1 and negative components are moved
/// onto the start point, so the vector always lies in the unit square.
fn linear_vector(angle: f64) -> [f64; 4] {
    let radians = super::rad(angle);
    let mut vector = [0.0, 0.0, radians.cos(), radians.sin()];
    let longest = vector[2].abs().max(vector[3].abs());
    let scale = if longest == 0.0 { 1.0 } else { 1.0 / longest };
    vector[2] *= scale;
    vector[3] *= scale;
    if vector[2] < 0.0 {
        vector[0] = -vector[2];
        vector[2] = 0.0;
    }
    if vector[3] < 0.0 {
        vector[1] = -vector[3];
        vector[3] = 0.0;
    }
    vector
}

/// Normalize a configured gradient.
///
/// Linear gradients without an angle run corner to corner (`[0, 0, 1, 1]`).
/// Stops are sorted by offset; missing or unreadable colors become white and
/// missing opacities become 1.
pub fn parse_gradient(config: &GradientConfig) -> Gradient {
    let geometry = match config.kind {
        GradientKind::Linear => GradientGeometry::Linear {
            vector: config.angle.map_or([0.0, 0.0, 1.0, 1.0], linear_vector),
        },
        GradientKind::Radial {
            center_x,
            center_y,
            focal_x,
            focal_y,
            radius,
        } => GradientGeometry::Radial {
            center_x,
            center_y,
            focal_x,
            focal_y,
            radius,
        },
    };

    let mut stops: Vec<Stop> = config
        .stops
        .iter()
        .map(|s| Stop {
            offset: s.offset,
            color: s
                .color
                .as_deref()
                .and_then(to_hex)
                .unwrap_or_else(|| DEFAULT_STOP_COLOR.to_string()),
            opacity: s.opacity.unwrap_or(1.0),
        })
        .collect();
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    Gradient {
        id: config.id.clone(),
        geometry,
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(g: &Gradient) -> [f64; 4] {
        match g.geometry {
            GradientGeometry::Linear { vector } => vector,
            _ => panic!("expected linear gradient"),
        }
    }

    #[test]
    fn linear_defaults() {
        let g = parse_gradient(&GradientConfig {
            id: "g".into(),
            stops: vec![
                StopConfig { offset: 100.0, color: None, opacity: None },
                StopConfig { offset: 0.0, color: Some("red".into()), opacity: Some(0.5) },
            ],
            ..Default::default()
        });
        assert!(g.is_linear());
        assert_eq!(vector(&g), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(g.stops[0], Stop { offset: 0.0, color: "#ff0000".into(), opacity: 0.5 });
        assert_eq!(g.stops[1], Stop { offset: 100.0, color: "#ffffff".into(), opacity: 1.0 });
    }

    #[test]
    fn angled_vector_is_normalized_into_unit_square() {
        let g = parse_gradient(&GradientConfig {
            id: "g".into(),
            angle: Some(180.0),
            ..Default::default()
        });
        let v = vector(&g);
        assert!((v[0] - 1.0).abs() < 1e-9);
        assert_eq!(v[2], 0.0);
        assert!(v[3].abs() < 1e-9);

        let g = parse_gradient(&GradientConfig {
            id: "g".into(),
            angle: Some(45.0),
            ..Default::default()
        });
        let v = vector(&g);
        assert!((v[2] - 1.0).abs() < 1e-9 && (v[3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn radial_keeps_geometry() {
        let g = parse_gradient(&GradientConfig {
            id: "r".into(),
            kind: GradientKind::Radial {
                center_x: 0.5,
                center_y: 0.5,
                focal_x: 0.25,
                focal_y: 0.25,
                radius: 0.5,
            },
            stops: vec![StopConfig::new(0.0, "#000")],
            ..Default::default()
        });
        assert!(!g.is_linear());
        assert_eq!(g.stops[0].color, "#000000");
    }
}
