//! Scene graph: actors with surface properties and an optional texture.

use std::sync::Arc;

use lmk_core::{Aabb, Point3};
use lmk_io::{ObjAsset, ObjMesh, Texture};

/// Surface reflectance coefficients.
///
/// Lighting is a single white headlight plus unit ambient light, so a
/// fragment's color is `color * texel * (ambient + diffuse * |n·l|)` plus a
/// white specular term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    /// Base color in `[0, 1]`.
    pub color: [f32; 3],
    /// Ambient coefficient.
    pub ambient: f32,
    /// Diffuse coefficient.
    pub diffuse: f32,
    /// Specular coefficient.
    pub specular: f32,
    /// Specular exponent.
    pub specular_power: f32,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: [1.0; 3],
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
        }
    }
}

impl Property {
    /// White, ambient-only reflectance: texture colors pass through unlit.
    pub fn ambient_only() -> Self {
        Self {
            ambient: 1.0,
            diffuse: 0.0,
            specular: 0.0,
            ..Self::default()
        }
    }
}

/// Triangle corner with an optional texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// World position.
    pub position: Point3,
    /// Texture coordinate `(u, v)`.
    pub uv: Option<[f32; 2]>,
}

impl Vertex {
    /// Untextured vertex.
    pub const fn new(position: Point3) -> Self {
        Self { position, uv: None }
    }

    /// Textured vertex.
    pub const fn with_uv(position: Point3, uv: [f32; 2]) -> Self {
        Self {
            position,
            uv: Some(uv),
        }
    }
}

/// A renderable set of triangles sharing one property and texture.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Triangles in world coordinates.
    pub triangles: Vec<[Vertex; 3]>,
    /// Diffuse texture.
    pub texture: Option<Arc<Texture>>,
    /// Reflectance.
    pub property: Property,
    /// Hidden actors are neither drawn nor counted in bounds.
    pub visible: bool,
}

impl Actor {
    /// Visible actor with the default property.
    pub fn new(triangles: Vec<[Vertex; 3]>) -> Self {
        Self {
            triangles,
            texture: None,
            property: Property::default(),
            visible: true,
        }
    }

    /// Attach a texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Replace the property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self
    }

    /// Bounds of all triangle corners.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.triangles.iter().flatten().map(|v| v.position))
    }
}

/// Actors plus background color.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Actors in draw order.
    pub actors: Vec<Actor>,
    /// Background color in `[0, 1]`.
    pub background: [f32; 3],
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            background: [1.0; 3],
        }
    }
}

impl Scene {
    /// Empty scene with the given background.
    pub fn new(background: [f32; 3]) -> Self {
        Self {
            actors: Vec::new(),
            background,
        }
    }

    /// Add an actor.
    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// One actor per face group, colored and textured from its material.
    pub fn from_asset(asset: &ObjAsset, background: [f32; 3]) -> Self {
        let mesh = &asset.mesh;
        let actors = mesh
            .groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let triangles = group
                    .triangles
                    .iter()
                    .map(|tri| tri.map(|c| textured_vertex(mesh, c)))
                    .collect();
                let mut actor = Actor::new(triangles);
                if let Some(material) = asset.group_material(i) {
                    actor.property.color = material.diffuse;
                }
                actor.texture = asset.group_texture(i).cloned();
                actor
            })
            .collect();
        Self {
            actors,
            background,
        }
    }

    /// A single untextured actor with the default property.
    pub fn from_geometry(mesh: &ObjMesh, background: [f32; 3]) -> Self {
        let triangles = mesh
            .groups
            .iter()
            .flat_map(|g| g.triangles.iter())
            .map(|tri| tri.map(|c| Vertex::new(mesh.positions[c.position])))
            .collect();
        Self {
            actors: vec![Actor::new(triangles)],
            background,
        }
    }

    /// Give every actor the same property.
    pub fn set_property_all(&mut self, property: Property) {
        for actor in &mut self.actors {
            actor.property = property;
        }
    }

    /// Union of visible actor bounds.
    pub fn visible_bounds(&self) -> Option<Aabb> {
        self.actors
            .iter()
            .filter(|a| a.visible)
            .filter_map(Actor::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Background quantized to 8 bits.
    pub fn background_rgb(&self) -> [u8; 3] {
        self.background.map(crate::raster::quantize)
    }
}

fn textured_vertex(mesh: &ObjMesh, corner: lmk_io::Corner) -> Vertex {
    Vertex {
        position: mesh.positions[corner.position],
        uv: corner.tex_coord.map(|t| mesh.tex_coords[t]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_only() {
        let p = Property::ambient_only();
        assert_eq!((p.ambient, p.diffuse, p.specular), (1.0, 0.0, 0.0));
        assert_eq!(p.color, [1.0; 3]);
    }

    #[test]
    fn test_visible_bounds_skip_hidden() {
        let tri = |z: f32| {
            [
                Vertex::new(Point3::new(0.0, 0.0, z)),
                Vertex::new(Point3::new(1.0, 0.0, z)),
                Vertex::new(Point3::new(0.0, 1.0, z)),
            ]
        };
        let mut scene = Scene::default();
        scene.add_actor(Actor::new(vec![tri(0.0)]));
        let mut hidden = Actor::new(vec![tri(10.0)]);
        hidden.visible = false;
        scene.add_actor(hidden);

        let bounds = scene.visible_bounds().unwrap();
        assert_eq!(bounds.depth_range(), (0.0, 0.0));
    }

    #[test]
    fn test_from_geometry() {
        let mesh = lmk_io::parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nusemtl a\nf 1 2 3\nusemtl b\nf 2 4 3\n".as_bytes(),
        )
        .unwrap();
        let scene = Scene::from_geometry(&mesh, [1.0; 3]);
        assert_eq!(scene.actors.len(), 1);
        assert_eq!(scene.actors[0].triangles.len(), 2);
        assert_eq!(scene.background_rgb(), [255, 255, 255]);
    }
}
