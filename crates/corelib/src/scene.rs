//! Explicit scene state: camera, objects, timing.
//!
//! Everything the per-frame loop mutates lives here, passed by reference to
//! update and render code instead of sitting in globals.

use std::time::Instant;

use crate::camera::{FlyCamera, Projection};
use crate::transform::Transform;

/// Handle to a mesh uploaded to the renderer (dense, assigned in upload order).
pub type MeshId = u32;

/// Shading mode per object, one for each demo material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Environment-mapped: mixes the sky cubemap into the lit color.
    Reflective { reflectivity: f32 },
    /// Tangent-space normal mapping from the normal/height texture.
    NormalMapped,
    /// Normal mapping plus view-dependent UV offset from the height channel.
    Parallax { height_scale: f32 },
}

#[derive(Clone, Copy, Debug)]
pub struct SceneObject {
    pub transform: Transform,
    pub mesh: MeshId,
    pub material: Material,
    /// Y-axis spin in rad/s; 0 leaves the object static.
    pub spin_speed: f32,
}

/// Scene container: one camera, a flat object list, elapsed time.
pub struct Scene {
    pub camera: FlyCamera,
    pub projection: Projection,
    objects: Vec<SceneObject>,
    pub elapsed: f32,
}

impl Scene {
    pub fn new(camera: FlyCamera, projection: Projection) -> Self {
        Self {
            camera,
            projection,
            objects: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn push_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    #[inline]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Advance animation by `dt` seconds: spin flagged objects about Y.
    /// Idempotent per frame; all state derives from accumulated time.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        for object in &mut self.objects {
            if object.spin_speed != 0.0 {
                object.transform.rotate_y(object.spin_speed * dt);
            }
        }
    }
}

/// Monotonic frame clock: elapsed seconds since start plus per-frame delta.
pub struct FrameClock {
    start: Instant,
    last_elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_elapsed: 0.0,
        }
    }

    /// Returns `(elapsed, dt)` in seconds since construction / the last tick.
    pub fn tick(&mut self) -> (f32, f32) {
        let elapsed = self.start.elapsed().as_secs_f32();
        let dt = elapsed - self.last_elapsed;
        self.last_elapsed = elapsed;
        (elapsed, dt)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn test_scene() -> Scene {
        let camera = FlyCamera::new(vec3(0.0, 2.0, 6.0));
        let projection = Projection::new(70f32.to_radians(), 0.1, 100.0, 16.0 / 9.0);
        Scene::new(camera, projection)
    }

    #[test]
    fn advance_spins_only_flagged_objects() {
        let mut scene = test_scene();
        scene.push_object(SceneObject {
            transform: Transform::identity(),
            mesh: 0,
            material: Material::NormalMapped,
            spin_speed: 1.0,
        });
        scene.push_object(SceneObject {
            transform: Transform::identity(),
            mesh: 0,
            material: Material::NormalMapped,
            spin_speed: 0.0,
        });
        scene.advance(0.5);
        assert!((scene.objects()[0].transform.rotation_euler.y - 0.5).abs() < 1e-6);
        assert_eq!(scene.objects()[1].transform.rotation_euler.y, 0.0);
    }

    #[test]
    fn advance_accumulates_elapsed_time() {
        let mut scene = test_scene();
        scene.advance(0.25);
        scene.advance(0.25);
        assert!((scene.elapsed - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let (e1, _) = clock.tick();
        let (e2, dt) = clock.tick();
        assert!(e2 >= e1);
        assert!(dt >= 0.0);
    }
}
