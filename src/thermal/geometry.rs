//! Upward-facing area of a triangle mesh, the last-resort slab/roof area.

use crate::model::Mesh;

const EPS: f64 = 1e-12;

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(v: [f64; 3]) -> f64 {
    (v[0].powi(2) + v[1].powi(2) + v[2].powi(2)).sqrt()
}

/// Sums the area of all faces whose normal points up (positive z).
///
/// Returns `None` without a mesh, when a face references a missing vertex,
/// or when no upward area was found.
#[must_use]
pub fn estimate_upward_area(mesh: Option<&Mesh>) -> Option<f64> {
    let mesh = mesh?;
    let mut total = 0.0;

    for face in &mesh.faces {
        let p1 = *mesh.vertices.get(face[0])?;
        let p2 = *mesh.vertices.get(face[1])?;
        let p3 = *mesh.vertices.get(face[2])?;

        let normal = cross(sub(p2, p1), sub(p3, p1));
        let doubled = length(normal);
        if doubled > EPS && normal[2] / doubled > 0.0 {
            total += 0.5 * doubled;
        }
    }

    if total > 0.0 {
        Some(total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_up() -> Mesh {
        Mesh {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn unit_square_facing_up() {
        assert_relative_eq!(estimate_upward_area(Some(&unit_square_up())).unwrap(), 1.0);
    }

    #[test]
    fn box_counts_only_top_face() {
        // 2 x 3 x 0.3 slab
        let vertices = vec![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 3.0, 0.0],
            [0.0, 3.0, 0.0],
            [0.0, 0.0, 0.3],
            [2.0, 0.0, 0.3],
            [2.0, 3.0, 0.3],
            [0.0, 3.0, 0.3],
        ];
        let faces = vec![
            // bottom, facing down
            [0, 2, 1],
            [0, 3, 2],
            // top, facing up
            [4, 5, 6],
            [4, 6, 7],
            // sides
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];

        let area = estimate_upward_area(Some(&Mesh { vertices, faces })).unwrap();
        assert_relative_eq!(area, 6.0);
    }

    #[test]
    fn pitched_face_counts_its_true_area() {
        let mesh = Mesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]],
            faces: vec![[0, 1, 2]],
        };
        let expected = 0.5 * 2.0_f64.sqrt();
        assert_relative_eq!(estimate_upward_area(Some(&mesh)).unwrap(), expected);
    }

    #[test]
    fn missing_or_bad_meshes() {
        assert_eq!(estimate_upward_area(None), None);

        let dangling = Mesh {
            vertices: vec![[0.0, 0.0, 0.0]],
            faces: vec![[0, 1, 2]],
        };
        assert_eq!(estimate_upward_area(Some(&dangling)), None);

        let mut downward = unit_square_up();
        downward.faces = vec![[0, 2, 1], [0, 3, 2]];
        assert_eq!(estimate_upward_area(Some(&downward)), None);
    }
}
