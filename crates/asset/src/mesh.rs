//! CPU-side mesh buffers shared by loaders and the tangent builder.
//!
//! A mesh is a struct of parallel attribute arrays plus a flattened triangle
//! index list; imported and hardcoded geometry both go through this one
//! representation. Vertex identity is the array index.

use thiserror::Error;

/// Violation of the mesh buffer invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error(
        "attribute arrays out of step: {positions} positions, {normals} normals, {uvs} uvs"
    )]
    AttributeMismatch {
        positions: usize,
        normals: usize,
        uvs: usize,
    },
    #[error("tangent array holds {tangents} entries for {vertices} vertices")]
    TangentMismatch { tangents: usize, vertices: usize },
    #[error("index list length {0} is not a multiple of 3")]
    RaggedIndices(usize),
    #[error("index {index} out of bounds for {vertices} vertices")]
    IndexOutOfBounds { index: u32, vertices: usize },
}

/// Indexed triangle mesh as parallel attribute arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Empty until [`generate_tangents`](crate::tangent::generate_tangents)
    /// fills it; afterwards exactly one unit tangent per vertex.
    pub tangents: Vec<[f32; 3]>,
    /// Flattened triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_tangents(&self) -> bool {
        self.tangents.len() == self.positions.len() && !self.positions.is_empty()
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Check every buffer invariant; loaders call this before handing a mesh on.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertices = self.positions.len();
        if self.normals.len() != vertices || self.uvs.len() != vertices {
            return Err(MeshError::AttributeMismatch {
                positions: vertices,
                normals: self.normals.len(),
                uvs: self.uvs.len(),
            });
        }
        if !self.tangents.is_empty() && self.tangents.len() != vertices {
            return Err(MeshError::TangentMismatch {
                tangents: self.tangents.len(),
                vertices,
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(self.indices.len()));
        }
        for &index in &self.indices {
            if index as usize >= vertices {
                return Err(MeshError::IndexOutOfBounds { index, vertices });
            }
        }
        Ok(())
    }

    /// Unit cube centered on the origin: 24 vertices (4 per face, so each
    /// face keeps its own normal and UVs), 12 triangles, CCW outward.
    pub fn cube() -> Self {
        // (face normal, four corner positions in CCW order)
        const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +Z
            (
                [0.0, 0.0, 1.0],
                [
                    [-1.0, -1.0, 1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                ],
            ),
            // -Z
            (
                [0.0, 0.0, -1.0],
                [
                    [1.0, -1.0, -1.0],
                    [-1.0, -1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                    [1.0, 1.0, -1.0],
                ],
            ),
            // +X
            (
                [1.0, 0.0, 0.0],
                [
                    [1.0, -1.0, 1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                ],
            ),
            // -X
            (
                [-1.0, 0.0, 0.0],
                [
                    [-1.0, -1.0, -1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                ],
            ),
            // +Y
            (
                [0.0, 1.0, 0.0],
                [
                    [-1.0, 1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [1.0, 1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                ],
            ),
            // -Y
            (
                [0.0, -1.0, 0.0],
                [
                    [-1.0, -1.0, -1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                    [-1.0, -1.0, 1.0],
                ],
            ),
        ];
        const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let mut mesh = MeshData::default();
        for (normal, corners) in FACES {
            let base = mesh.positions.len() as u32;
            for (corner, uv) in corners.iter().zip(CORNER_UVS) {
                mesh.positions.push(*corner);
                mesh.normals.push(normal);
                mesh.uvs.push(uv);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_valid() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        cube.validate().expect("cube invariants");
    }

    #[test]
    fn validate_rejects_mismatched_attributes() {
        let mut mesh = MeshData::cube();
        mesh.uvs.pop();
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::AttributeMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_bounds_index() {
        let mut mesh = MeshData::cube();
        mesh.indices[0] = 24;
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                index: 24,
                vertices: 24
            })
        );
    }

    #[test]
    fn validate_rejects_ragged_index_list() {
        let mut mesh = MeshData::cube();
        mesh.indices.pop();
        assert_eq!(mesh.validate(), Err(MeshError::RaggedIndices(35)));
    }

    #[test]
    fn validate_rejects_partial_tangents() {
        let mut mesh = MeshData::cube();
        mesh.tangents.push([1.0, 0.0, 0.0]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::TangentMismatch { .. })
        ));
    }
}
