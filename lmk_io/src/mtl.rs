//! Wavefront MTL material libraries.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{LmkIoError, Result};

/// One `newmtl` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Ambient color `Ka`.
    pub ambient: [f32; 3],
    /// Diffuse color `Kd`.
    pub diffuse: [f32; 3],
    /// Specular color `Ks`.
    pub specular: [f32; 3],
    /// Diffuse texture `map_Kd` as written in the file.
    pub diffuse_map: Option<PathBuf>,
}

impl Material {
    /// Material with white diffuse color and no texture.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [1.0; 3],
            specular: [0.0; 3],
            diffuse_map: None,
        }
    }
}

/// Materials keyed by name, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate materials in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Merge another library; later definitions do not replace earlier ones.
    pub fn merge(&mut self, other: MaterialLibrary) {
        for m in other.materials {
            if self.get(&m.name).is_none() {
                self.materials.push(m);
            }
        }
    }
}

fn parse_color(parts: &mut std::str::SplitWhitespace<'_>, line: usize) -> Result<[f32; 3]> {
    let mut rgb = [0.0f32; 3];
    let mut count = 0;
    for (slot, token) in rgb.iter_mut().zip(parts.by_ref()) {
        *slot = token.parse().map_err(|_| LmkIoError::Parse {
            line,
            message: format!("invalid color component: {}", token),
        })?;
        count += 1;
    }
    match count {
        // a single value means grey
        1 => Ok([rgb[0]; 3]),
        3 => Ok(rgb),
        _ => Err(LmkIoError::Parse {
            line,
            message: "color needs 1 or 3 components".to_string(),
        }),
    }
}

/// Parse a material library from a reader.
pub fn parse_mtl<R: Read>(reader: R) -> Result<MaterialLibrary> {
    let buf_reader = BufReader::new(reader);
    let mut library = MaterialLibrary::default();
    let mut current: Option<Material> = None;

    for (line_idx, line) in buf_reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let keyword = parts.next();
        if keyword == Some("newmtl") {
            if let Some(done) = current.take() {
                library.materials.push(done);
            }
            let name = parts.next().ok_or_else(|| LmkIoError::Parse {
                line: line_no,
                message: "newmtl without a name".to_string(),
            })?;
            current = Some(Material::new(name));
            continue;
        }

        let Some(material) = current.as_mut() else {
            log::warn!("MTL statement before newmtl on line {}", line_no);
            continue;
        };

        match keyword {
            Some("Ka") => material.ambient = parse_color(&mut parts, line_no)?,
            Some("Kd") => material.diffuse = parse_color(&mut parts, line_no)?,
            Some("Ks") => material.specular = parse_color(&mut parts, line_no)?,
            Some("map_Kd") => {
                // options such as -s precede the file name, which comes last
                material.diffuse_map = parts.last().map(PathBuf::from);
            }
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        library.materials.push(done);
    }

    Ok(library)
}

/// Parse a material library from a path.
pub fn parse_mtl_file<P: AsRef<Path>>(path: P) -> Result<MaterialLibrary> {
    let file = std::fs::File::open(path)?;
    parse_mtl(file)
}

/// The MTL file that accompanies `obj_path`: same stem, `.mtl` extension.
pub fn companion_mtl_path<P: AsRef<Path>>(obj_path: P) -> PathBuf {
    obj_path.as_ref().with_extension("mtl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mtl() {
        let src = r#"
# exported
newmtl skin
Ka 0.1 0.1 0.1
Kd 0.8 0.6 0.5
Ks 0
map_Kd -s 1 1 1 textures/face.png

newmtl eyes
Kd 0.2 0.2 0.9
"#;
        let lib = parse_mtl(src.as_bytes()).unwrap();
        assert_eq!(lib.len(), 2);

        let skin = lib.get("skin").unwrap();
        assert_eq!(skin.ambient, [0.1, 0.1, 0.1]);
        assert_eq!(skin.diffuse, [0.8, 0.6, 0.5]);
        assert_eq!(skin.specular, [0.0, 0.0, 0.0]);
        assert_eq!(skin.diffuse_map, Some(PathBuf::from("textures/face.png")));

        let eyes = lib.get("eyes").unwrap();
        assert_eq!(eyes.diffuse_map, None);
        assert!(lib.get("teeth").is_none());
    }

    #[test]
    fn test_invalid_color() {
        let err = parse_mtl("newmtl a\nKd 1 x 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LmkIoError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_companion_path() {
        assert_eq!(
            companion_mtl_path("/data/scan_01.obj"),
            PathBuf::from("/data/scan_01.mtl")
        );
    }

    #[test]
    fn test_merge_keeps_first() {
        let mut a = parse_mtl("newmtl m\nKd 1 0 0\n".as_bytes()).unwrap();
        let b = parse_mtl("newmtl m\nKd 0 1 0\nnewmtl n\n".as_bytes()).unwrap();
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get("m").unwrap().diffuse, [1.0, 0.0, 0.0]);
    }
}
