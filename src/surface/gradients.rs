//! Gradient registry owned by a surface

use std::collections::HashMap;

use crate::draw::{GradientConfig, fmt_num, parse_gradient};

/// A registered gradient in the form fills consume
#[derive(Clone, Debug, PartialEq)]
pub struct GradientEntry {
    pub id: String,
    /// `"0% #ffffff,100% #000000"`, sorted by offset
    pub colors: String,
    /// Direction in degrees
    pub angle: f64,
}

#[derive(Clone, Debug, Default)]
pub struct GradientRegistry {
    entries: HashMap<String, GradientEntry>,
}

impl GradientRegistry {
    /// Register `config`, replacing any gradient with the same id
    pub fn register(&mut self, config: &GradientConfig) -> &GradientEntry {
        let parsed = parse_gradient(config);
        let colors = parsed
            .stops
            .iter()
            .map(|s| format!("{}% {}", fmt_num(s.offset), s.color))
            .collect::<Vec<_>>()
            .join(",");
        let entry = GradientEntry {
            id: parsed.id.clone(),
            colors,
            angle: config.angle.unwrap_or(0.0),
        };
        self.entries.insert(parsed.id.clone(), entry);
        &self.entries[&parsed.id]
    }

    pub fn get(&self, id: &str) -> Option<&GradientEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::StopConfig;

    #[test]
    fn colors_are_sorted_and_normalized() {
        let mut registry = GradientRegistry::default();
        let entry = registry.register(&GradientConfig {
            id: "sky".into(),
            angle: Some(90.0),
            stops: vec![StopConfig::new(100.0, "navy"), StopConfig::new(0.0, "#fff")],
            ..Default::default()
        });
        assert_eq!(entry.colors, "0% #ffffff,100% #000080");
        assert_eq!(entry.angle, 90.0);
        assert!(registry.get("sky").is_some());
        assert!(registry.get("ground").is_none());
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = GradientRegistry::default();
        registry.register(&GradientConfig {
            id: "g".into(),
            stops: vec![StopConfig::new(0.0, "red")],
            ..Default::default()
        });
        registry.register(&GradientConfig {
            id: "g".into(),
            stops: vec![StopConfig::new(50.0, "blue")],
            ..Default::default()
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("g").map(|e| e.colors.as_str()), Some("50% #0000ff"));
    }
}
