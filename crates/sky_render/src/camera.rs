use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation (degrees) and scale of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_deg: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation_deg: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation_deg,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation_deg: Vec3) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation_deg.y.to_radians(),
            self.rotation_deg.x.to_radians(),
            self.rotation_deg.z.to_radians(),
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.translation)
    }
}

/// Perspective parameters of a camera node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraView {
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined view-projection for a camera placed at `camera_transform`.
    /// Scale is ignored for the view matrix.
    pub fn view_proj(&self, camera_transform: &Transform) -> Mat4 {
        let world = Mat4::from_rotation_translation(
            camera_transform.rotation(),
            camera_transform.translation,
        );
        self.projection() * world.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        assert!(Transform::default().matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn transform_matrix_applies_translation_and_scale() {
        let t = Transform::from_translation(Vec3::new(0.0, -20.0, 0.0))
            .with_scale(Vec3::splat(20.0));
        let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(20.0, -20.0, 0.0), 1e-4));
    }

    #[test]
    fn view_proj_maps_point_in_front_of_camera_inside_clip_volume() {
        let view = CameraView {
            aspect: 16.0 / 9.0,
            ..CameraView::default()
        };
        let cam = Transform::from_translation(Vec3::new(0.0, 5.0, 8.0));
        let clip = view.view_proj(&cam) * glam::Vec4::new(0.0, 5.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn point_behind_camera_has_negative_w() {
        let view = CameraView::default();
        let cam = Transform::default();
        let clip = view.view_proj(&cam) * glam::Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert!(clip.w < 0.0);
    }
}
