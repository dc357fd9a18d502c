//! Asset loading and CPU-side geometry processing.
//! Meshes are struct-of-arrays ([`mesh::MeshData`]) whether imported from OBJ
//! or built inline; tangents come from [`tangent::generate_tangents`].

pub mod mesh;
pub mod obj;
pub mod tangent;
pub mod texture;
