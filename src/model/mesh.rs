use serde::{Deserialize, Serialize};

/// Triangulated boundary of one element, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    /// Vertex indices of each triangle, counter-clockwise seen from outside.
    pub faces: Vec<[usize; 3]>,
}
