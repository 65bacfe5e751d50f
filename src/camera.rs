use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Screen scale factor the kernel expects baked into the image-plane axes.
const IMAGE_PLANE_SCALE: f32 = 0.5135;

/// Camera configuration consumed by the rendering kernel.
///
/// `orig` and `target` are user-set; `dir`, `x` and `y` form the derived
/// viewing basis and are only meaningful after [`Camera::update_basis`] has
/// run for the current output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position in world space.
    pub orig: Vec3,
    /// Look-at point in world space.
    pub target: Vec3,
    /// Normalized view direction, derived.
    #[serde(default)]
    pub dir: Vec3,
    /// Image-plane horizontal axis, derived. Scaled by the aspect ratio.
    #[serde(default)]
    pub x: Vec3,
    /// Image-plane vertical axis, derived.
    #[serde(default)]
    pub y: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            orig: Vec3::new(1.0, 2.0, 8.0),
            target: Vec3::ZERO,
            dir: Vec3::ZERO,
            x: Vec3::ZERO,
            y: Vec3::ZERO,
        }
    }
}

impl Camera {
    /// Creates a camera looking from `orig` towards `target` with the basis
    /// left zeroed until the first [`Camera::update_basis`].
    pub fn look_at(orig: Vec3, target: Vec3) -> Self {
        Self {
            orig,
            target,
            ..Self::default()
        }
    }

    /// Recomputes `dir`, `x` and `y` from `orig`/`target` for the given
    /// output resolution. The horizontal axis absorbs the aspect ratio so the
    /// kernel can map pixel coordinates straight onto the image plane.
    pub fn update_basis(&mut self, width: u32, height: u32) {
        let forward = self.target - self.orig;
        self.dir = if forward.length_squared() > f32::EPSILON {
            forward.normalize()
        } else {
            Vec3::NEG_Z
        };

        // A view direction parallel to world-up has no well-defined right
        // axis; fall back to world X rather than emitting NaNs.
        let right = self.dir.cross(Vec3::Y);
        let right = if right.length_squared() > f32::EPSILON {
            right.normalize()
        } else {
            Vec3::X
        };

        let aspect = width as f32 / height.max(1) as f32;
        self.x = right * (aspect * IMAGE_PLANE_SCALE);
        self.y = right.cross(self.dir).normalize() * IMAGE_PLANE_SCALE;
    }

    /// True when every component of the camera is finite.
    pub fn is_finite(&self) -> bool {
        self.orig.is_finite()
            && self.target.is_finite()
            && self.dir.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthogonal_and_scaled() {
        let mut camera = Camera::default();
        camera.update_basis(640, 480);

        assert!((camera.dir.length() - 1.0).abs() < 1e-5);
        assert!(camera.dir.dot(camera.x).abs() < 1e-5);
        assert!(camera.dir.dot(camera.y).abs() < 1e-5);
        assert!(camera.x.dot(camera.y).abs() < 1e-5);

        let aspect = 640.0 / 480.0;
        assert!((camera.x.length() - aspect * IMAGE_PLANE_SCALE).abs() < 1e-5);
        assert!((camera.y.length() - IMAGE_PLANE_SCALE).abs() < 1e-5);
    }

    #[test]
    fn dir_points_from_orig_to_target() {
        let mut camera = Camera::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        camera.update_basis(800, 600);
        assert!((camera.dir - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn deserializing_without_basis_yields_zeroed_vectors() {
        let camera: Camera =
            serde_json::from_str(r#"{"orig": [1.0, 2.0, 8.0], "target": [0.0, 0.0, 0.0]}"#)
                .unwrap();
        assert_eq!(camera.orig, Vec3::new(1.0, 2.0, 8.0));
        assert_eq!(camera.dir, Vec3::ZERO);
        assert_eq!(camera.x, Vec3::ZERO);
        assert_eq!(camera.y, Vec3::ZERO);
    }

    #[test]
    fn serde_round_trip_preserves_the_basis() {
        let mut camera = Camera::default();
        camera.update_basis(640, 480);
        let json = serde_json::to_string(&camera).unwrap();
        let restored: Camera = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, camera);
    }

    #[test]
    fn degenerate_directions_stay_finite() {
        // Looking straight down world-up.
        let mut camera = Camera::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        camera.update_basis(640, 480);
        assert!(camera.is_finite());

        // Zero-length view vector.
        let mut camera = Camera::look_at(Vec3::ONE, Vec3::ONE);
        camera.update_basis(640, 480);
        assert!(camera.is_finite());
    }
}
