use std::f32::consts::FRAC_PI_2;

use crate::{Mat4, Vec3, vec3};

/// Pitch stops just short of straight up/down so look-at never degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Perspective projection parameters (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Projection {
    pub fn new(fov_y_rad: f32, z_near: f32, z_far: f32, aspect: f32) -> Self {
        Self {
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(1e-6);
    }
}

/// First-person fly camera: yaw/pitch orientation plus per-frame movement
/// deltas that accumulate until [`FlyCamera::update`] consumes them.
///
/// Yaw 0 looks down -Z; yaw grows turning left, pitch grows looking up.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    home: Vec3,
    pending_strafe: f32,
    pending_walk: f32,
    pending_rise: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            home: position,
            pending_strafe: 0.0,
            pending_walk: 0.0,
            pending_rise: 0.0,
        }
    }

    /// Full look direction from yaw and pitch.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        vec3(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Strafe direction: yaw-only, stays in the ground plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        vec3(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Queue a movement delta (world units) for the next [`update`](Self::update).
    pub fn push_move(&mut self, strafe: f32, walk: f32, rise: f32) {
        self.pending_strafe += strafe;
        self.pending_walk += walk;
        self.pending_rise += rise;
    }

    /// Apply mouse deltas. Pitch is clamped short of vertical.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Snap back to the starting pose and drop queued movement.
    pub fn reset(&mut self) {
        self.position = self.home;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.pending_strafe = 0.0;
        self.pending_walk = 0.0;
        self.pending_rise = 0.0;
    }

    /// Consume queued movement along the current basis and zero it out.
    pub fn update(&mut self) {
        self.position += self.right() * self.pending_strafe;
        self.position += self.forward() * self.pending_walk;
        self.position += Vec3::Y * self.pending_rise;
        self.pending_strafe = 0.0;
        self.pending_walk = 0.0;
        self.pending_rise = 0.0;
    }

    /// Right-handed look-at view matrix for the current pose.
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_unit_and_minus_z_at_rest() {
        let cam = FlyCamera::new(Vec3::ZERO);
        let f = cam.forward();
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!((f - vec3(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn pitch_clamps_short_of_vertical() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.rotate(0.0, 10.0);
        assert!(cam.pitch < FRAC_PI_2);
        cam.rotate(0.0, -20.0);
        assert!(cam.pitch > -FRAC_PI_2);
    }

    #[test]
    fn update_consumes_pending_movement() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.push_move(1.0, 0.0, 0.0);
        cam.update();
        assert!((cam.position - vec3(1.0, 0.0, 0.0)).length() < 1e-6);
        // Second update moves nothing: deltas were drained.
        cam.update();
        assert!((cam.position - vec3(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn reset_restores_home_pose() {
        let mut cam = FlyCamera::new(vec3(0.0, 2.0, 6.0));
        cam.rotate(1.0, 0.5);
        cam.push_move(3.0, 3.0, 3.0);
        cam.update();
        cam.reset();
        assert_eq!(cam.position, vec3(0.0, 2.0, 6.0));
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.pitch, 0.0);
    }

    #[test]
    fn view_matrix_is_finite() {
        let mut cam = FlyCamera::new(vec3(1.0, 2.0, 3.0));
        cam.rotate(0.7, -0.2);
        let v = cam.view().to_cols_array();
        assert!(v.iter().all(|f| f.is_finite()));
    }
}
