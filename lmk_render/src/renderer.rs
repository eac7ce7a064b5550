//! Random-view rendering of a mesh file.

use std::path::{Path, PathBuf};

use instant::Instant;
use lmk_core::{Aabb, ViewTransform};
use lmk_io::{parse_obj_file, ObjAsset};

use crate::camera::Camera;
use crate::config::{ColorMode, RenderConfig};
use crate::error::{RenderError, Result};
use crate::framebuffer::{flip_vertical, FrameBuffer};
use crate::raster::render_scene;
use crate::sampler::{RandomTransformSampler, TransformSampler};
use crate::scene::{Property, Scene};
use crate::stack::ViewStack;

/// Renders stacks of randomly posed views.
///
/// The mesh stays fixed at the origin; each view moves the camera by the
/// inverse of the sampled rotation. No state carries from one call to the next
/// apart from the sampler's position.
///
/// # Example
///
/// ```ignore
/// use lmk_render::{RenderConfig, Renderer};
///
/// let config = RenderConfig::default().with_n_views(16).with_image_size(256);
/// let mut renderer = Renderer::new(config)?;
/// let (stack, transforms) = renderer.render("scans/subject_01.obj")?;
/// assert_eq!(stack.n_views(), transforms.len());
/// ```
#[derive(Debug)]
pub struct Renderer<S = RandomTransformSampler> {
    config: RenderConfig,
    sampler: S,
}

impl Renderer<RandomTransformSampler> {
    /// Renderer drawing views from entropy-seeded random transforms.
    pub fn new(config: RenderConfig) -> Result<Self> {
        let sampler = RandomTransformSampler::new(config.ranges);
        Self::with_sampler(config, sampler)
    }
}

impl<S: TransformSampler> Renderer<S> {
    /// Renderer with an injected transform source.
    pub fn with_sampler(config: RenderConfig, sampler: S) -> Result<Self> {
        config.validate()?;
        if !config.off_screen_rendering {
            log::debug!("no window system attached, rendering off-screen anyway");
        }
        Ok(Self { config, sampler })
    }

    /// Configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Transform source.
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Render `n_views` textured views of an OBJ mesh.
    ///
    /// Only `.obj` meshes in [`ColorMode::Rgb`] are supported; anything else
    /// fails before a file is opened. Lighting is flattened to ambient only so
    /// textures come through unshaded. A failed write aborts the call and the
    /// partially filled stack is dropped.
    pub fn render<P: AsRef<Path>>(&mut self, mesh_path: P) -> Result<(ViewStack, Vec<ViewTransform>)> {
        let path = mesh_path.as_ref();
        let extension = extension_of(path);
        if extension != "obj" || self.config.color_mode != ColorMode::Rgb {
            return Err(RenderError::Unsupported {
                extension,
                color_mode: self.config.color_mode,
            });
        }

        let asset = ObjAsset::load(path).map_err(|source| RenderError::Mesh {
            path: path.display().to_string(),
            source,
        })?;

        let mut scene = Scene::from_asset(&asset, self.config.background);
        scene.set_property_all(Property::ambient_only());
        let mut session = RenderSession::open(scene, &self.config);

        let size = self.config.image_size as usize;
        let mut stack = ViewStack::zeros(self.config.n_views, size, size, 3);
        let mut transforms = Vec::with_capacity(self.config.n_views);

        let start = Instant::now();
        for idx in 0..self.config.n_views {
            let view = self.sampler.sample();

            session.reset_camera();
            session.camera.apply_transform(&view.camera_transform());
            if let Some(bounds) = session.scene.visible_bounds() {
                session.camera.reset_clipping_range(&bounds);
            }

            let rgb = session.capture();
            stack.store_view(idx, &rgb, 3);

            if self.config.write_renderings {
                let out = self.output_path(format!("rendering{}_RGB.png", idx));
                lmk_io::write_png_rgb(&out, self.config.image_size, self.config.image_size, &rgb)
                    .map_err(|source| io_error(&out, source))?;
            }
            self.write_transform(idx, &view)?;
            transforms.push(view);
        }

        log::info!(
            "Pure rendering generation time: {:.3}s for {} views",
            start.elapsed().as_secs_f64(),
            self.config.n_views
        );

        Ok((stack, transforms))
    }

    /// Render `n_views` single channel views of the bare mesh geometry.
    ///
    /// The mesh is lit by a white headlight with the default diffuse property.
    /// The clipping range is fitted to the untransformed mesh depth with half
    /// the depth range of slack on both sides, before the camera moves.
    pub fn render_geometry<P: AsRef<Path>>(
        &mut self,
        mesh_path: P,
    ) -> Result<(ViewStack, Vec<ViewTransform>)> {
        let path = mesh_path.as_ref();
        let extension = extension_of(path);
        if extension != "obj" {
            return Err(RenderError::Unsupported {
                extension,
                color_mode: ColorMode::Geometry,
            });
        }

        let mesh = parse_obj_file(path).map_err(|source| RenderError::Mesh {
            path: path.display().to_string(),
            source,
        })?;
        let (zmin, zmax) = mesh.bounds().map_or((0.0, 0.0), |b: Aabb| b.depth_range());
        let slack = (zmax - zmin) / 2.0;

        let scene = Scene::from_geometry(&mesh, self.config.background);
        let mut session = RenderSession::open(scene, &self.config);

        let size = self.config.image_size as usize;
        let mut stack = ViewStack::zeros(self.config.n_views, size, size, 1);
        let mut transforms = Vec::with_capacity(self.config.n_views);
        let d = self.config.camera_distance;

        let start = Instant::now();
        for idx in 0..self.config.n_views {
            let view = self.sampler.sample();

            session.reset_camera();
            session.camera.clipping_range = (d - zmax - slack, d - zmin + slack);
            session.camera.apply_transform(&view.camera_transform());

            let rgb = session.capture();
            stack.store_view(idx, &rgb, 3);

            if self.config.write_renderings {
                let out = self.output_path(format!("rendering{}.png", idx));
                let gray: Vec<u8> = rgb.iter().step_by(3).copied().collect();
                lmk_io::write_png_gray(&out, self.config.image_size, self.config.image_size, &gray)
                    .map_err(|source| io_error(&out, source))?;
            }
            self.write_transform(idx, &view)?;
            transforms.push(view);
        }

        log::info!(
            "Pure rendering generation time: {:.3}s for {} views",
            start.elapsed().as_secs_f64(),
            self.config.n_views
        );

        Ok((stack, transforms))
    }

    fn output_path(&self, name: String) -> PathBuf {
        self.config.temp_dir.join(name)
    }

    fn write_transform(&self, idx: usize, view: &ViewTransform) -> Result<()> {
        if self.config.write_transforms {
            let out = self.output_path(format!("transform{}.txt", idx));
            lmk_io::write_transform_record(&out, view).map_err(|source| io_error(&out, source))?;
        }
        Ok(())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn io_error(path: &Path, source: lmk_io::LmkIoError) -> RenderError {
    RenderError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Scene, camera and frame buffer owned by one render call.
///
/// Released when dropped, on success and on every error path.
pub struct RenderSession {
    /// Scene being rendered.
    pub scene: Scene,
    /// Active camera.
    pub camera: Camera,
    /// Off-screen target.
    pub framebuffer: FrameBuffer,
    camera_distance: f32,
    parallel_scale: f32,
    views_captured: usize,
}

impl RenderSession {
    /// Allocate a session for `config.image_size` square frames.
    pub fn open(scene: Scene, config: &RenderConfig) -> Self {
        log::debug!(
            "opening render session: {} actors, {}x{} target",
            scene.actors.len(),
            config.image_size,
            config.image_size
        );
        let parallel_scale = config.view_side_length() / 2.0;
        Self {
            scene,
            camera: Camera::looking_at_origin(config.camera_distance, parallel_scale),
            framebuffer: FrameBuffer::new(config.image_size, config.image_size),
            camera_distance: config.camera_distance,
            parallel_scale,
            views_captured: 0,
        }
    }

    /// Put the camera back on +Z looking at the origin, +Y up.
    pub fn reset_camera(&mut self) {
        let clipping_range = self.camera.clipping_range;
        self.camera = Camera::looking_at_origin(self.camera_distance, self.parallel_scale);
        self.camera.clipping_range = clipping_range;
    }

    /// Draw the scene and return top-down interleaved RGB bytes.
    pub fn capture(&mut self) -> Vec<u8> {
        render_scene(&self.scene, &self.camera, &mut self.framebuffer);
        self.views_captured += 1;
        let w = self.framebuffer.width() as usize;
        let h = self.framebuffer.height() as usize;
        flip_vertical(&self.framebuffer.read_rgb(), w, h, 3)
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        log::debug!(
            "render session released after {} views",
            self.views_captured
        );
    }
}
