use super::{Category, Element, Summary};
use crate::error::ElementError;
use serde::Serialize;

/// An element that was excluded, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedElement {
    pub global_id: String,
    pub reason: String,
}

impl From<&ElementError> for SkippedElement {
    fn from(err: &ElementError) -> Self {
        Self {
            global_id: err.element_id().to_string(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThermalReport {
    pub source: String,
    /// Retained, deduplicated elements in source order.
    pub elements: Vec<Element>,
    pub skipped: Vec<SkippedElement>,
    pub master: Summary,
    pub windows: Summary,
    pub walls: Summary,
    pub slabs: Summary,
}

impl ThermalReport {
    #[must_use]
    pub fn windows_data(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| e.category == Category::Window)
            .collect()
    }

    #[must_use]
    pub fn walls_data(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| e.category == Category::Wall)
            .collect()
    }

    #[must_use]
    pub fn slabs_data(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| e.category.is_horizontal())
            .collect()
    }

    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.elements.iter().filter_map(|e| e.area_m2).sum()
    }
}
