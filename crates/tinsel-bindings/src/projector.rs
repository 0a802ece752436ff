//! Orbit camera and world-to-screen projection for screen-space queries

use tinsel_core::Vec3;

/// Maps world positions to screen pixels
pub trait ScreenProjector {
    /// Pixel coordinates (origin top-left), or `None` if behind the camera
    fn project(&self, world: Vec3) -> Option<[f32; 2]>;
}

/// Camera orbiting a target point, driven by yaw/pitch deltas
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 2.0, 0.0),
            distance: 45.0,
            yaw: 0.0,
            pitch: 0.15,
            fov: 45.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Apply an orbit delta in radians
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        if yaw.is_finite() {
            self.yaw += yaw;
        }
        if pitch.is_finite() {
            // 1.56 ≈ 89.4°, short of the pole so the up vector stays valid
            self.pitch = (self.pitch + pitch).clamp(-1.56, 1.56);
        }
    }

    /// Point `distance` units in front of the camera, on the view axis
    pub fn point_in_front(&self, distance: f32) -> Vec3 {
        let eye = self.eye();
        let forward = (self.target - eye).normalized();
        eye + forward * distance
    }

    pub fn projector(&self, viewport: [f32; 2]) -> PerspectiveProjector {
        PerspectiveProjector::look_at(
            self.eye(),
            self.target,
            self.fov,
            viewport,
            self.near,
            self.far,
        )
    }
}

/// Right-handed perspective projection backed by a glam view-projection matrix
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveProjector {
    view_proj: glam::Mat4,
    viewport: [f32; 2],
}

impl PerspectiveProjector {
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        fov_degrees: f32,
        viewport: [f32; 2],
        near: f32,
        far: f32,
    ) -> Self {
        let aspect = if viewport[1] > 0.0 {
            viewport[0] / viewport[1]
        } else {
            1.0
        };
        let view = glam::Mat4::look_at_rh(to_glam_vec3(eye), to_glam_vec3(target), glam::Vec3::Y);
        let proj = glam::Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far);
        Self {
            view_proj: proj * view,
            viewport,
        }
    }

    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }
}

impl ScreenProjector for PerspectiveProjector {
    fn project(&self, world: Vec3) -> Option<[f32; 2]> {
        let clip = self.view_proj * to_glam_vec3(world).extend(1.0);
        if clip.w <= 1e-6 || !clip.is_finite() {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let [w, h] = self.viewport;
        Some([(ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h])
    }
}

/// Convert Tinsel Vec3 to glam Vec3
fn to_glam_vec3(v: Vec3) -> glam::Vec3 {
    glam::Vec3::new(v.x, v.y, v.z)
}
