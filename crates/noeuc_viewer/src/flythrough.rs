//! Scripted camera control.
//!
//! Stands in for interactive input: between frames the camera moves along
//! its own forward axis by `speed * dt` and turns around its own Y axis.
//! It never runs while a frame is being rendered.

use noeuc_core::Camera;
use noeuc_math::Vec3;

/// Movement along the camera's local axes, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub right: f32,
    pub up: f32,
    pub forward: f32,
}

impl MoveInput {
    pub fn is_idle(&self) -> bool {
        self.right == 0.0 && self.up == 0.0 && self.forward == 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlyThrough {
    /// Yaw in radians per second
    pub yaw_rate: f32,
    pub input: MoveInput,
}

impl FlyThrough {
    /// Fly forward while turning `yaw_degrees_per_second`.
    pub fn new(yaw_degrees_per_second: f32) -> Self {
        Self {
            yaw_rate: yaw_degrees_per_second.to_radians(),
            input: MoveInput {
                forward: 1.0,
                ..Default::default()
            },
        }
    }

    /// Advance the camera by `dt` seconds.
    pub fn step(&self, camera: &mut Camera, dt: f32) {
        if !self.input.is_idle() {
            let distance = camera.speed * dt;
            // Camera space looks down -Z
            let offset = Vec3::new(self.input.right, self.input.up, -self.input.forward) * distance;
            camera.translate_local(offset);
        }

        if self.yaw_rate != 0.0 {
            camera.rotate_local_y(self.yaw_rate * dt);
        }
    }
}
