//! Triangle scan conversion.
//!
//! Pixels are sampled at their centers with edge functions. Attributes are
//! interpolated affinely, which is exact under parallel projection. Depth is
//! the distance in front of the camera; nearer fragments win and ties keep the
//! fragment drawn first.

use lmk_core::Point3;

use crate::camera::Camera;
use crate::framebuffer::FrameBuffer;
use crate::scene::{Actor, Scene};

/// A projected triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    /// Pixel column, 0 at the left edge.
    pub x: f32,
    /// Pixel row, 0 at the bottom edge.
    pub y: f32,
    /// Distance in front of the camera.
    pub depth: f32,
    /// Texture coordinate.
    pub uv: [f32; 2],
}

/// Map `[0, 1]` to `0..=255`, clamping out of range values.
#[inline]
pub fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[inline]
fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Scan convert one triangle.
///
/// `shade` receives barycentric weights and returns the fragment color.
/// Fragments outside `clip = (near, far)` are discarded. Returns the number of
/// fragments that passed the depth test.
pub fn rasterize_triangle<F>(
    fb: &mut FrameBuffer,
    tri: &[ScreenVertex; 3],
    clip: (f32, f32),
    mut shade: F,
) -> usize
where
    F: FnMut([f32; 3]) -> [u8; 3],
{
    let p = tri.map(|v| (v.x, v.y));
    let area = edge(p[0], p[1], p[2]);
    if area.abs() < f32::EPSILON {
        return 0;
    }

    let min_x = tri.iter().map(|v| v.x).fold(f32::INFINITY, f32::min);
    let max_x = tri.iter().map(|v| v.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = tri.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
    let max_y = tri.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(fb.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(fb.height());

    let mut written = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let c = (x as f32 + 0.5, y as f32 + 0.5);
            // dividing by the signed area makes both windings positive inside
            let w0 = edge(p[1], p[2], c) / area;
            let w1 = edge(p[2], p[0], c) / area;
            let w2 = edge(p[0], p[1], c) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = w0 * tri[0].depth + w1 * tri[1].depth + w2 * tri[2].depth;
            if depth < clip.0 || depth > clip.1 {
                continue;
            }

            let nearer = fb.depth(x, y).is_some_and(|current| depth < current);
            if nearer && fb.write_if_nearer(x, y, depth, shade([w0, w1, w2])) {
                written += 1;
            }
        }
    }
    written
}

fn draw_actor(fb: &mut FrameBuffer, actor: &Actor, camera: &Camera) -> usize {
    let (w, h) = (fb.width(), fb.height());
    let light = camera.direction_of_projection();
    let prop = actor.property;
    let mut written = 0;

    for tri in &actor.triangles {
        let [a, b, c] = tri.map(|v| v.position);
        let normal = (b - a).cross(c - a).normalize();
        // two-sided headlight
        let facing = normal.dot(light).abs();
        let lit = prop.ambient + prop.diffuse * facing;
        let spec = prop.specular * facing.powf(prop.specular_power);

        let screen = tri.map(|v| {
            let s: Point3 = camera.project(v.position, w, h);
            ScreenVertex {
                x: s.x,
                y: s.y,
                depth: s.z,
                uv: v.uv.unwrap_or([0.0, 0.0]),
            }
        });

        let texture = actor.texture.as_deref();
        written += rasterize_triangle(fb, &screen, camera.clipping_range, |bary| {
            let texel = match texture {
                Some(tex) => {
                    let interp = |k: usize| {
                        bary[0] * screen[0].uv[k] + bary[1] * screen[1].uv[k] + bary[2] * screen[2].uv[k]
                    };
                    tex.sample(interp(0), interp(1)).map(|t| t as f32 / 255.0)
                }
                None => [1.0; 3],
            };
            [0, 1, 2].map(|k| quantize(prop.color[k] * texel[k] * lit + spec))
        });
    }
    written
}

/// Clear `fb` to the scene background and draw every visible actor.
///
/// Returns the number of fragments written.
pub fn render_scene(scene: &Scene, camera: &Camera, fb: &mut FrameBuffer) -> usize {
    fb.clear(scene.background_rgb());
    scene
        .actors
        .iter()
        .filter(|a| a.visible)
        .map(|a| draw_actor(fb, a, camera))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Property, Vertex};

    fn sv(x: f32, y: f32, depth: f32) -> ScreenVertex {
        ScreenVertex {
            x,
            y,
            depth,
            uv: [0.0, 0.0],
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(0.5), 128);
    }

    #[test]
    fn test_both_windings_fill() {
        let mut fb = FrameBuffer::new(4, 4);
        let ccw = [sv(0.0, 0.0, 1.0), sv(4.0, 0.0, 1.0), sv(0.0, 4.0, 1.0)];
        let cw = [sv(0.0, 0.0, 1.0), sv(0.0, 4.0, 1.0), sv(4.0, 0.0, 1.0)];
        let a = rasterize_triangle(&mut fb, &ccw, (0.0, 10.0), |_| [9; 3]);
        fb.clear([0; 3]);
        let b = rasterize_triangle(&mut fb, &cw, (0.0, 10.0), |_| [9; 3]);
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let mut fb = FrameBuffer::new(2, 2);
        let full = |d| [sv(-1.0, -1.0, d), sv(5.0, -1.0, d), sv(-1.0, 5.0, d)];
        rasterize_triangle(&mut fb, &full(5.0), (0.0, 10.0), |_| [1; 3]);
        rasterize_triangle(&mut fb, &full(2.0), (0.0, 10.0), |_| [2; 3]);
        rasterize_triangle(&mut fb, &full(3.0), (0.0, 10.0), |_| [3; 3]);
        assert_eq!(fb.pixel(0, 0), Some([2; 3]));
    }

    #[test]
    fn test_clipping_discards() {
        let mut fb = FrameBuffer::new(2, 2);
        let tri = [sv(-1.0, -1.0, 20.0), sv(5.0, -1.0, 20.0), sv(-1.0, 5.0, 20.0)];
        assert_eq!(rasterize_triangle(&mut fb, &tri, (0.0, 10.0), |_| [1; 3]), 0);
    }

    #[test]
    fn test_ambient_only_ignores_orientation() {
        let mut scene = Scene::default();
        let tilted = [
            Vertex::new(Point3::new(-100.0, -100.0, -50.0)),
            Vertex::new(Point3::new(100.0, -100.0, 50.0)),
            Vertex::new(Point3::new(0.0, 100.0, 0.0)),
        ];
        let mut prop = Property::ambient_only();
        prop.color = [0.2, 0.4, 0.6];
        scene.add_actor(crate::scene::Actor::new(vec![tilted]).with_property(prop));

        let mut camera = Camera::looking_at_origin(500.0, 150.0);
        camera.clipping_range = (100.0, 900.0);
        let mut fb = FrameBuffer::new(16, 16);
        render_scene(&scene, &camera, &mut fb);
        assert_eq!(fb.pixel(8, 6), Some([51, 102, 153]));
        assert_eq!(fb.pixel(0, 15), Some([255, 255, 255]));
    }
}
