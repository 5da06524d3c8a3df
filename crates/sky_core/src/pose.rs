use glam::Vec3;

/// Degrees of rotation per 100 units of mouse travel.
pub const LOOK_DEGREES_PER_100: f32 = 30.0;
pub const PITCH_LIMIT_DEG: f32 = 90.0;

/// Free-look camera position and orientation. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Pitch, clamped to [-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG].
    pub rx: f32,
    /// Yaw, unbounded.
    pub ry: f32,
    /// Movement speed in units per second.
    pub velocity: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 3.0, 19.0),
            rx: 7.0,
            ry: 15.0,
            velocity: 10.0,
        }
    }
}

impl CameraPose {
    /// Applies a mouse delta: horizontal travel turns, vertical travel pitches.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.ry -= dx / 100.0 * LOOK_DEGREES_PER_100;
        self.rx += dy / 100.0 * LOOK_DEGREES_PER_100;
        self.rx = self.rx.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Moves `distance` along the view direction (negative moves backwards).
    pub fn move_forward(&mut self, distance: f32) {
        let (rx, ry) = (self.rx.to_radians(), self.ry.to_radians());
        self.position.x -= ry.sin() * rx.cos() * distance;
        self.position.y -= -rx.sin() * distance;
        self.position.z -= ry.cos() * rx.cos() * distance;
    }

    /// Strafes `distance` to the right (negative strafes left).
    pub fn strafe(&mut self, distance: f32) {
        let ry = (self.ry - 90.0).to_radians();
        self.position.x -= ry.sin() * distance;
        self.position.z -= ry.cos() * distance;
    }
}
