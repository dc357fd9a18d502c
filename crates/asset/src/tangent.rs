//! Per-vertex tangent generation for normal-mapped shading.
//!
//! Policy: accumulate-and-average. Every triangle contributes its raw UV-space
//! tangent to its three corner vertices in a single pass; the stored tangent
//! is the normalized average of the contributions. Triangles with a degenerate
//! UV mapping contribute nothing, and vertices left without a contribution get
//! a fallback axis orthogonal to their normal, so no NaN/Inf ever reaches the
//! vertex buffer.

use glam::{Vec2, Vec3};

use crate::mesh::{MeshData, MeshError};

/// UV-area determinants below this are treated as degenerate.
const UV_AREA_EPSILON: f32 = 1e-8;

/// Raw (unnormalized) tangent of one triangle, `None` when the UV mapping is
/// degenerate or the result is not finite.
///
/// With edges `e1 = p1 - p0`, `e2 = p2 - p0` and UV deltas `(du1, dv1)`,
/// `(du2, dv2)`, the tangent solves the 2x2 system mapping UV deltas onto
/// edges: `t = (dv2*e1 - dv1*e2) / (du1*dv2 - du2*dv1)`.
pub fn triangle_tangent(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    uv0: Vec2,
    uv1: Vec2,
    uv2: Vec2,
) -> Option<Vec3> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let duv1 = uv1 - uv0;
    let duv2 = uv2 - uv0;

    let r = duv1.x * duv2.y - duv2.x * duv1.y;
    if r.abs() < UV_AREA_EPSILON {
        return None;
    }
    let tangent = (e1 * duv2.y - e2 * duv1.y) / r;
    tangent.is_finite().then_some(tangent)
}

/// Fill `mesh.tangents` with one unit tangent per vertex.
///
/// Pure over the mesh's own buffers: any previous tangents are discarded and
/// recomputed, so running this twice yields identical output.
pub fn generate_tangents(mesh: &mut MeshData) -> Result<(), MeshError> {
    mesh.tangents.clear();
    mesh.validate()?;

    let vertex_count = mesh.vertex_count();
    let mut sums = vec![Vec3::ZERO; vertex_count];
    let mut uses = vec![0u32; vertex_count];

    for [i0, i1, i2] in mesh.triangles() {
        let (a, b, c) = (i0 as usize, i1 as usize, i2 as usize);
        let Some(tangent) = triangle_tangent(
            Vec3::from(mesh.positions[a]),
            Vec3::from(mesh.positions[b]),
            Vec3::from(mesh.positions[c]),
            Vec2::from(mesh.uvs[a]),
            Vec2::from(mesh.uvs[b]),
            Vec2::from(mesh.uvs[c]),
        ) else {
            continue;
        };
        for corner in [a, b, c] {
            sums[corner] += tangent;
            uses[corner] += 1;
        }
    }

    mesh.tangents = (0..vertex_count)
        .map(|i| {
            let normal = Vec3::from(mesh.normals[i]);
            if uses[i] == 0 {
                return fallback_tangent(normal).to_array();
            }
            let average = sums[i] / uses[i] as f32;
            average
                .try_normalize()
                .unwrap_or_else(|| fallback_tangent(normal))
                .to_array()
        })
        .collect();
    Ok(())
}

/// Arbitrary unit axis orthogonal to `normal`; used where no triangle gave a
/// usable tangent.
fn fallback_tangent(normal: Vec3) -> Vec3 {
    // Project the world axis least aligned with the normal into its plane.
    let axis = if normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    (axis - normal * normal.dot(axis))
        .try_normalize()
        .unwrap_or(Vec3::X)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{vec2, vec3};

    const TOLERANCE: f32 = 1e-4;

    fn unit_quad() -> MeshData {
        MeshData {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            tangents: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < TOLERANCE,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn unit_quad_yields_plus_x_tangents() {
        let mut mesh = unit_quad();
        generate_tangents(&mut mesh).expect("quad is valid");
        assert_eq!(mesh.tangents.len(), 4);
        for tangent in &mesh.tangents {
            assert_close(Vec3::from(*tangent), Vec3::X);
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_finite_unit_tangent() {
        let mut mesh = unit_quad();
        // Collapse every UV onto one point: r = 0 for both triangles.
        mesh.uvs = vec![[0.5, 0.5]; 4];
        generate_tangents(&mut mesh).expect("still structurally valid");
        for (tangent, normal) in mesh.tangents.iter().zip(&mesh.normals) {
            let t = Vec3::from(*tangent);
            assert!(t.is_finite());
            assert!((t.length() - 1.0).abs() < TOLERANCE);
            assert!(t.dot(Vec3::from(*normal)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn generation_is_idempotent() {
        let mut once = MeshData::cube();
        generate_tangents(&mut once).expect("cube is valid");
        let mut twice = once.clone();
        generate_tangents(&mut twice).expect("cube is valid");
        assert_eq!(once.tangents, twice.tangents);
    }

    #[test]
    fn uv_scale_shrinks_raw_tangent_without_turning_it() {
        let p = [vec3(0.0, 0.0, 0.0), vec3(2.0, 1.0, 0.0), vec3(-1.0, 2.0, 0.0)];
        let uv = [vec2(0.1, 0.2), vec2(0.9, 0.4), vec2(0.3, 0.8)];
        let k = 4.0;

        let base = triangle_tangent(p[0], p[1], p[2], uv[0], uv[1], uv[2]).unwrap();
        let scaled =
            triangle_tangent(p[0], p[1], p[2], uv[0] * k, uv[1] * k, uv[2] * k).unwrap();

        assert_close(scaled * k, base);
        assert!(base.normalize().dot(scaled.normalize()) > 1.0 - TOLERANCE);
    }

    #[test]
    fn tangent_and_bitangent_reconstruct_triangle_edges() {
        // Shear-free mapping (uv = 0.5 * position.xy) so the true bitangent
        // equals normal x tangent.
        let p = [vec3(0.0, 0.0, 0.0), vec3(2.0, 1.0, 0.0), vec3(-1.0, 2.0, 0.0)];
        let uv = [vec2(0.0, 0.0), vec2(1.0, 0.5), vec2(-0.5, 1.0)];

        let tangent = triangle_tangent(p[0], p[1], p[2], uv[0], uv[1], uv[2]).unwrap();
        let e1 = p[1] - p[0];
        let e2 = p[2] - p[0];
        let normal = e1.cross(e2).normalize();
        let bitangent = normal.cross(tangent);

        let duv1 = uv[1] - uv[0];
        let duv2 = uv[2] - uv[0];
        assert_close(tangent * duv1.x + bitangent * duv1.y, e1);
        assert_close(tangent * duv2.x + bitangent * duv2.y, e2);
    }

    #[test]
    fn zero_area_triangle_is_skipped_not_propagated() {
        let mut mesh = MeshData {
            positions: vec![[0.0; 3], [0.0; 3], [0.0; 3]],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            tangents: Vec::new(),
            indices: vec![0, 1, 2],
        };
        generate_tangents(&mut mesh).expect("structurally valid");
        for tangent in &mesh.tangents {
            let t = Vec3::from(*tangent);
            assert!(t.is_finite());
            assert!((t.length() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn invalid_mesh_is_rejected() {
        let mut mesh = unit_quad();
        mesh.indices[0] = 9;
        assert!(matches!(
            generate_tangents(&mut mesh),
            Err(MeshError::IndexOutOfBounds { index: 9, .. })
        ));
    }
}
