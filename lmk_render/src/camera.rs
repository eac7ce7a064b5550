//! Orthographic camera.
//!
//! Follows the usual scene-graph camera model: a position looking at a focal
//! point with a view-up hint. The view frame is right-handed with the camera
//! looking down its negative Z axis. Depth is reported as positive distance in
//! front of the camera, which is also the unit of the clipping range.

use lmk_core::{Aabb, Point3, RigidTransform};

/// Fraction of the depth spread added on both sides when fitting the clipping range.
pub const CLIPPING_RANGE_EXPANSION: f32 = 0.5;

/// Smallest allowed near/far ratio.
pub const NEAR_PLANE_TOLERANCE: f32 = 0.001;

/// Parallel projection camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Point3,
    /// Point the camera looks at.
    pub focal_point: Point3,
    /// Up hint, orthogonalized against the view direction.
    pub view_up: Point3,
    /// Half height of the visible window in world units.
    pub parallel_scale: f32,
    /// `(near, far)` distances from the camera.
    pub clipping_range: (f32, f32),
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            focal_point: Point3::ZERO,
            view_up: Point3::Y,
            parallel_scale: 1.0,
            clipping_range: (0.01, 1000.01),
        }
    }
}

impl Camera {
    /// Camera on the +Z axis at `distance`, looking at the origin with +Y up.
    pub fn looking_at_origin(distance: f32, parallel_scale: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, distance),
            parallel_scale,
            ..Self::default()
        }
    }

    /// Unit vector from the position towards the focal point.
    pub fn direction_of_projection(&self) -> Point3 {
        (self.focal_point - self.position).normalize()
    }

    /// `(right, up, back)` axes of the view frame in world coordinates.
    pub fn view_axes(&self) -> (Point3, Point3, Point3) {
        let back = (self.position - self.focal_point).normalize();
        let right = self.view_up.cross(back).normalize();
        let up = back.cross(right);
        (right, up, back)
    }

    /// World point to `(x right, y up, depth)` view coordinates.
    pub fn world_to_view(&self, p: Point3) -> Point3 {
        let (right, up, back) = self.view_axes();
        let d = p - self.position;
        Point3::new(d.dot(right), d.dot(up), -d.dot(back))
    }

    /// World point to `(x, y, depth)` with `x`, `y` in pixels from the bottom-left corner.
    pub fn project(&self, p: Point3, width: u32, height: u32) -> Point3 {
        let v = self.world_to_view(p);
        let aspect = width as f32 / height as f32;
        let ndc_x = v.x / (self.parallel_scale * aspect);
        let ndc_y = v.y / self.parallel_scale;
        Point3::new(
            (ndc_x + 1.0) * 0.5 * width as f32,
            (ndc_y + 1.0) * 0.5 * height as f32,
            v.z,
        )
    }

    /// Move the camera rigidly: position and focal point as points, view-up as a direction.
    pub fn apply_transform(&mut self, t: &RigidTransform) {
        self.position = t.transform_point(self.position);
        self.focal_point = t.transform_point(self.focal_point);
        self.view_up = t.transform_vector(self.view_up);
    }

    /// Fit the clipping range around `bounds` with some breathing room.
    pub fn reset_clipping_range(&mut self, bounds: &Aabb) {
        let dir = self.direction_of_projection();
        let mut near = f32::MAX;
        let mut far = f32::MIN;
        for corner in bounds.corners() {
            let dist = (corner - self.position).dot(dir);
            near = near.min(dist);
            far = far.max(dist);
        }

        // geometry behind the camera must not drag the near plane past it
        near = near.max(0.0);
        let spread = far - near;
        near = 0.99 * near - spread * CLIPPING_RANGE_EXPANSION;
        far = 1.01 * far + spread * CLIPPING_RANGE_EXPANSION;

        if near >= far {
            near = 0.01 * far;
        }
        if near < NEAR_PLANE_TOLERANCE * far {
            near = NEAR_PLANE_TOLERANCE * far;
        }
        self.clipping_range = (near, far);
    }

    /// Whether `depth` lies inside the clipping range.
    #[inline]
    pub fn in_clipping_range(&self, depth: f32) -> bool {
        depth >= self.clipping_range.0 && depth <= self.clipping_range.1
    }
}
