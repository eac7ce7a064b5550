//! Wavefront OBJ parsing.
//!
//! Reads positions, texture coordinates and faces grouped by material. Faces
//! with more than three corners are fan triangulated. Normals are accepted in
//! face corners but not stored; shading only needs the camera direction.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use lmk_core::{Aabb, Point3};

use crate::error::{LmkIoError, Result};

/// One triangle corner: a position index and an optional texture coordinate index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Zero-based index into [`ObjMesh::positions`].
    pub position: usize,
    /// Zero-based index into [`ObjMesh::tex_coords`].
    pub tex_coord: Option<usize>,
}

/// Triangles that share one material.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroup {
    /// Material named by the preceding `usemtl`, if any.
    pub material: Option<String>,
    /// Triangles in file order.
    pub triangles: Vec<[Corner; 3]>,
}

/// Parsed OBJ mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Texture coordinates `(u, v)`.
    pub tex_coords: Vec<[f32; 2]>,
    /// Face groups in the order their material was first selected.
    pub groups: Vec<FaceGroup>,
    /// Library names from `mtllib` statements.
    pub material_libs: Vec<String>,
}

impl ObjMesh {
    /// Total triangle count over all groups.
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }

    /// Bounds of every position, referenced or not.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    fn group_mut(&mut self, material: &Option<String>) -> &mut FaceGroup {
        let pos = match self.groups.iter().position(|g| &g.material == material) {
            Some(pos) => pos,
            None => {
                self.groups.push(FaceGroup {
                    material: material.clone(),
                    triangles: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos]
    }
}

fn parse_floats<const N: usize>(
    parts: &mut std::str::SplitWhitespace<'_>,
    line: usize,
    what: &str,
) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts.next().ok_or_else(|| LmkIoError::Parse {
            line,
            message: format!("missing {} component {}", what, i),
        })?;
        *slot = token.parse().map_err(|_| LmkIoError::Parse {
            line,
            message: format!("invalid {} component: {}", what, token),
        })?;
    }
    Ok(out)
}

/// Resolve a one-based or negative relative OBJ index.
fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize> {
    let idx: i64 = token.parse().map_err(|_| LmkIoError::Parse {
        line,
        message: format!("invalid face index: {}", token),
    })?;

    let resolved = if idx > 0 {
        idx - 1
    } else {
        len as i64 + idx
    };

    if idx == 0 || resolved < 0 || resolved >= len as i64 {
        return Err(LmkIoError::IndexOutOfRange {
            line,
            index: idx,
            len,
        });
    }
    Ok(resolved as usize)
}

fn parse_corner(token: &str, positions: usize, tex_coords: usize, line: usize) -> Result<Corner> {
    let mut fields = token.split('/');
    let position = resolve_index(fields.next().unwrap_or(token), positions, line)?;
    let tex_coord = match fields.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, tex_coords, line)?),
        _ => None,
    };
    Ok(Corner {
        position,
        tex_coord,
    })
}

/// Parse an OBJ mesh from a reader.
///
/// Faces must reference elements declared above them, which is what
/// exporters produce and what negative indices require anyway.
pub fn parse_obj<R: Read>(reader: R) -> Result<ObjMesh> {
    let buf_reader = BufReader::new(reader);
    let mut mesh = ObjMesh::default();
    let mut material: Option<String> = None;

    for (line_idx, line) in buf_reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut parts, line_no, "vertex")?;
                mesh.positions.push(Point3::new(x, y, z));
            }
            Some("vt") => {
                let [u, v] = parse_floats::<2>(&mut parts, line_no, "texture coordinate")?;
                mesh.tex_coords.push([u, v]);
            }
            Some("f") => {
                let corners = parts
                    .map(|p| parse_corner(p, mesh.positions.len(), mesh.tex_coords.len(), line_no))
                    .collect::<Result<Vec<_>>>()?;

                if corners.len() < 3 {
                    log::warn!("skipping degenerate face on line {}", line_no);
                    continue;
                }

                let group = mesh.group_mut(&material);
                for i in 1..corners.len() - 1 {
                    group
                        .triangles
                        .push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            Some("usemtl") => {
                material = parts.next().map(str::to_string);
            }
            Some("mtllib") => {
                mesh.material_libs.extend(parts.map(str::to_string));
            }
            _ => {
                // vn, o, g, s and friends carry nothing the renderer uses
            }
        }
    }

    if mesh.triangle_count() == 0 {
        return Err(LmkIoError::EmptyMesh);
    }

    Ok(mesh)
}

/// Parse an OBJ file from a path.
pub fn parse_obj_file<P: AsRef<Path>>(path: P) -> Result<ObjMesh> {
    let file = std::fs::File::open(path)?;
    parse_obj(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_quad_obj() -> String {
        r#"
mtllib quad.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl skin
f 1/1 2/2 3/3 4/4
"#
        .to_string()
    }

    #[test]
    fn test_parse_obj() {
        let mesh = parse_obj(make_quad_obj().as_bytes()).unwrap();

        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.tex_coords.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.material_libs, vec!["quad.mtl".to_string()]);
        assert_eq!(mesh.groups[0].material.as_deref(), Some("skin"));
    }

    #[test]
    fn test_fan_triangulation() {
        let mesh = parse_obj(make_quad_obj().as_bytes()).unwrap();
        let tris = &mesh.groups[0].triangles;
        let pos = |t: &[Corner; 3]| [t[0].position, t[1].position, t[2].position];
        assert_eq!(pos(&tris[0]), [0, 1, 2]);
        assert_eq!(pos(&tris[1]), [0, 2, 3]);
        assert_eq!(tris[1][2].tex_coord, Some(3));
    }

    #[test]
    fn test_corner_forms() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1//1 2/1/1 -1\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        let tri = mesh.groups[0].triangles[0];
        assert_eq!(tri[0].tex_coord, None);
        assert_eq!(tri[1].tex_coord, Some(0));
        assert_eq!(tri[2].position, 2);
        assert_eq!(mesh.groups[0].material, None);
    }

    #[test]
    fn test_groups_by_material() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl a\nf 1 2 3\nusemtl b\nf 1 2 3\nusemtl a\nf 3 2 1\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.groups.len(), 2);
        assert_eq!(mesh.groups[0].triangles.len(), 2);
        assert_eq!(mesh.groups[1].triangles.len(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let src = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = parse_obj(src.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            LmkIoError::IndexOutOfRange {
                line: 3,
                index: 3,
                len: 2
            }
        );
    }

    #[test]
    fn test_invalid_vertex() {
        let err = parse_obj("v 0 zero 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LmkIoError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_empty_mesh() {
        let err = parse_obj("v 0 0 0\n".as_bytes()).unwrap_err();
        assert_eq!(err, LmkIoError::EmptyMesh);
    }

    #[test]
    fn test_bounds() {
        let mesh = parse_obj(make_quad_obj().as_bytes()).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
    }
}
