use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Window,
    Wall,
    Slab,
    Floor,
    Roof,
    Foundation,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Window => "Window",
            Self::Wall => "Wall",
            Self::Slab => "Slab",
            Self::Floor => "Floor",
            Self::Roof => "Roof",
            Self::Foundation => "Foundation",
        }
    }

    /// Categories produced from slab and roof entities.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Slab | Self::Floor | Self::Roof | Self::Foundation)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Internal,
    External,
}

impl Position {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame/glass breakdown behind a window U-value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowAssembly {
    pub frame_material: Option<String>,
    pub glass_material: Option<String>,
    /// Inset frame dimension in meters.
    pub frame_width: Option<f64>,
    pub frame_thickness: f64,
    pub frame_k: f64,
    pub frame_u: Option<f64>,
    pub frame_area: Option<f64>,
    pub glass_k: Option<f64>,
    pub glass_u: f64,
    pub glass_area: Option<f64>,
}

/// One envelope element of the thermal report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub global_id: String,
    pub name: String,
    pub category: Category,
    pub type_name: String,
    pub position: Position,
    /// Rounded placement `x_y_z`, or `Unknown`.
    pub location_key: String,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub thickness_mm: Option<f64>,
    pub area_m2: Option<f64>,
    pub u_value: Option<f64>,
    pub assembly: Option<WindowAssembly>,
}

impl Element {
    /// Copy with U-values, areas and dimensions rounded to 3 decimals, for export.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let mut out = self.clone();
        out.width_mm = out.width_mm.map(round3);
        out.height_mm = out.height_mm.map(round3);
        out.thickness_mm = out.thickness_mm.map(round3);
        out.area_m2 = out.area_m2.map(round3);
        out.u_value = out.u_value.map(round3);
        if let Some(assembly) = out.assembly.as_mut() {
            assembly.frame_u = assembly.frame_u.map(round3);
            assembly.frame_area = assembly.frame_area.map(round3);
            assembly.glass_area = assembly.glass_area.map(round3);
            assembly.glass_u = round3(assembly.glass_u);
        }
        out
    }
}

#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
