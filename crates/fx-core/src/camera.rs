use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::{GALLERY_CAMERA_FOV_DEG, GALLERY_CAMERA_Z};

/// Right-handed perspective camera looking down -Z at the gallery ring.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, GALLERY_CAMERA_Z),
            target: Vec3::new(0.0, 0.0, GALLERY_CAMERA_Z - 1.0),
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: GALLERY_CAMERA_FOV_DEG.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to normalized device coordinates. `None` behind the eye.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

/// Surface pixel (top-left origin) to NDC with +Y up.
pub fn pixel_to_ndc(px: Vec2, size: Vec2) -> Option<Vec2> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        2.0 * (px.x / size.x) - 1.0,
        2.0 * (1.0 - px.y / size.y) - 1.0,
    ))
}
