//! Wavefront OBJ importer producing [`MeshData`].
//!
//! Supports `v`/`vt`/`vn`/`f` with all four face-element forms (`p`, `p/t`,
//! `p//n`, `p/t/n`), negative (relative) indices, fan triangulation of
//! polygons and deduplication of identical corner triples. Everything else
//! (`o`, `g`, `s`, `usemtl`, ...) is ignored. Tangents are left empty for the
//! tangent builder.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};

use crate::mesh::MeshData;

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let mesh = load_obj_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded OBJ {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut parser = ObjParser::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        parser.line(line_no + 1, &line)?;
    }
    parser.finish()
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// Corner reference: position index plus optional texcoord/normal indices.
type CornerKey = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct ObjParser {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    /// Corner triple -> output vertex, so shared corners share one vertex.
    corners: HashMap<CornerKey, u32>,
    mesh: MeshData,
}

impl ObjParser {
    fn line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let mut parts = trimmed.split_whitespace();
        // Non-empty after trim, so a tag is always present.
        let tag = parts.next().unwrap_or_default();
        match tag {
            "v" => self.positions.push(read_floats(&mut parts, line_no, "v")?),
            "vt" => self.texcoords.push(read_floats(&mut parts, line_no, "vt")?),
            "vn" => self.normals.push(read_floats(&mut parts, line_no, "vn")?),
            "f" => self.face(parts, line_no)?,
            _ => {}
        }
        Ok(())
    }

    fn face<'a>(&mut self, elements: impl Iterator<Item = &'a str>, line_no: usize) -> Result<()> {
        let mut face: Vec<u32> = Vec::new();
        for element in elements {
            face.push(self.corner(element, line_no)?);
        }
        if face.len() < 3 {
            bail!("Face with fewer than 3 vertices on line {line_no}");
        }
        // Triangulate as a fan around the first corner.
        for i in 1..(face.len() - 1) {
            self.mesh
                .indices
                .extend_from_slice(&[face[0], face[i], face[i + 1]]);
        }
        Ok(())
    }

    /// Resolve one `p[/t][/n]` token to an output vertex, deduplicating.
    fn corner(&mut self, token: &str, line_no: usize) -> Result<u32> {
        let mut split = token.split('/');
        let position = split
            .next()
            .ok_or_else(|| anyhow!("Malformed face element '{token}' on line {line_no}"))?;
        let pi = resolve_index(position, self.positions.len(), line_no)?;
        let ti = match split.next() {
            Some(value) if !value.is_empty() => {
                Some(resolve_index(value, self.texcoords.len(), line_no)?)
            }
            _ => None,
        };
        let ni = match split.next() {
            Some(value) if !value.is_empty() => {
                Some(resolve_index(value, self.normals.len(), line_no)?)
            }
            _ => None,
        };

        let key = (pi, ti, ni);
        if let Some(&index) = self.corners.get(&key) {
            return Ok(index);
        }

        let index = u32::try_from(self.mesh.positions.len())
            .map_err(|_| anyhow!("Too many vertices in OBJ (>{})", u32::MAX))?;
        self.mesh.positions.push(self.positions[pi]);
        self.mesh
            .uvs
            .push(ti.map_or([0.0, 0.0], |i| self.texcoords[i]));
        self.mesh
            .normals
            .push(ni.map_or([0.0, 0.0, 1.0], |i| self.normals[i]));
        self.corners.insert(key, index);
        Ok(index)
    }

    fn finish(self) -> Result<MeshData> {
        if self.mesh.indices.is_empty() {
            bail!("OBJ contained no triangles");
        }
        self.mesh.validate()?;
        Ok(self.mesh)
    }
}

fn read_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    tag: &str,
) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts
            .next()
            .ok_or_else(|| anyhow!("'{tag}' needs {N} values, got {i} on line {line_no}"))?;
        *slot = token
            .parse::<f32>()
            .with_context(|| format!("Failed to parse '{tag}' value on line {line_no}"))?;
    }
    Ok(out)
}

/// OBJ indices are 1-based; negative values count back from the array end.
fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{token}' on line {line_no}"))?;
    if raw == 0 {
        bail!("OBJ indices are 1-based; found 0 on line {line_no}");
    }
    let resolved = if raw > 0 {
        raw - 1
    } else {
        len as i64 + raw
    };
    if resolved < 0 || resolved as usize >= len {
        bail!("OBJ index {raw} resolved out of bounds (len={len}) on line {line_no}");
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 3]);
        assert!(mesh.tangents.is_empty());
    }

    #[test]
    fn quad_fan_triangulates_to_two_triangles() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3 4
        "#;
        let mesh = load_obj_from_str(src).expect("parse quad");
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn shared_corners_deduplicate() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3
            f 1 3 4
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        // Corners 1 and 3 appear in both faces but are stored once.
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_uv_and_normal_get_defaults() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f 1 2 3
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.uvs, vec![[0.0, 0.0]; 3]);
        assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn rejects_zero_index() {
        let src = "v 0 0 0\nf 0 0 0\n";
        assert!(load_obj_from_str(src).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let src = "v 0 0 0\nf 1 2 3\n";
        assert!(load_obj_from_str(src).is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(load_obj_from_str("# nothing here\n").is_err());
    }

    #[test]
    fn rejects_malformed_float() {
        let src = "v 0 zero 0\n";
        assert!(load_obj_from_str(src).is_err());
    }
}
