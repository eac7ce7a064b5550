//! OBJ mesh together with its materials and textures.
//!
//! Companion files are found by convention: the material library shares the
//! OBJ stem, and texture paths are resolved against the OBJ directory. When no
//! companion library exists the `mtllib` names from the OBJ are tried instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::mtl::{companion_mtl_path, parse_mtl_file, Material, MaterialLibrary};
use crate::obj::{parse_obj_file, ObjMesh};
use crate::texture::Texture;

/// A mesh ready to be turned into scene actors.
#[derive(Debug, Clone)]
pub struct ObjAsset {
    /// Geometry and face groups.
    pub mesh: ObjMesh,
    /// Materials that were found.
    pub materials: MaterialLibrary,
    textures: Vec<Option<Arc<Texture>>>,
}

impl ObjAsset {
    /// Load an OBJ file and its companion material library and textures.
    ///
    /// Missing companion files are logged and skipped; the affected groups
    /// render with the default material.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mesh = parse_obj_file(path)?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let materials = load_materials(path, &dir, &mesh)?;

        let mut cache: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
        let mut textures = Vec::with_capacity(mesh.groups.len());
        for group in &mesh.groups {
            let map = group
                .material
                .as_deref()
                .and_then(|name| materials.get(name))
                .and_then(|m| m.diffuse_map.as_ref());
            let texture = match map {
                Some(rel) => {
                    let full = dir.join(rel);
                    if let Some(tex) = cache.get(&full) {
                        Some(Arc::clone(tex))
                    } else {
                        match Texture::load(&full) {
                            Ok(tex) => {
                                let tex = Arc::new(tex);
                                cache.insert(full, Arc::clone(&tex));
                                Some(tex)
                            }
                            Err(err) => {
                                log::warn!("texture {} not loaded: {}", full.display(), err);
                                None
                            }
                        }
                    }
                }
                None => None,
            };
            textures.push(texture);
        }

        log::debug!(
            "loaded {}: {} triangles, {} groups, {} materials, {} textures",
            path.display(),
            mesh.triangle_count(),
            mesh.groups.len(),
            materials.len(),
            cache.len()
        );

        Ok(Self {
            mesh,
            materials,
            textures,
        })
    }

    /// Build from parts, e.g. for meshes assembled in memory.
    pub fn from_parts(
        mesh: ObjMesh,
        materials: MaterialLibrary,
        textures: Vec<Option<Arc<Texture>>>,
    ) -> Self {
        Self {
            mesh,
            materials,
            textures,
        }
    }

    /// Material of face group `group`.
    pub fn group_material(&self, group: usize) -> Option<&Material> {
        let name = self.mesh.groups.get(group)?.material.as_deref()?;
        self.materials.get(name)
    }

    /// Diffuse texture of face group `group`.
    pub fn group_texture(&self, group: usize) -> Option<&Arc<Texture>> {
        self.textures.get(group)?.as_ref()
    }
}

fn load_materials(obj_path: &Path, dir: &Path, mesh: &ObjMesh) -> Result<MaterialLibrary> {
    let companion = companion_mtl_path(obj_path);
    if companion.is_file() {
        return parse_mtl_file(&companion);
    }

    let mut library = MaterialLibrary::default();
    for name in &mesh.material_libs {
        let lib_path = dir.join(name);
        if lib_path.is_file() {
            library.merge(parse_mtl_file(&lib_path)?);
        } else {
            log::warn!("material library {} not found", lib_path.display());
        }
    }
    Ok(library)
}
