//! Byte-exact mirror of the config block the rendering kernel reads.
//!
//! The kernel receives the whole configuration as a single read-only buffer,
//! so field order, types and the absence of padding all matter here. The
//! native [`RenderingConfig`] is converted right before upload.

use bytemuck::{bytes_of, Pod, Zeroable};
use glam::Vec3;

use crate::camera::Camera;
use crate::config::RenderingConfig;

/// Three-component float as laid out in the kernel's config block. Used for
/// both positions and directions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVec {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for GpuVec {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<GpuVec> for Vec3 {
    fn from(v: GpuVec) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Camera block: user-set origin/target followed by the derived basis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuCamera {
    pub orig: GpuVec,
    pub target: GpuVec,
    pub dir: GpuVec,
    pub x: GpuVec,
    pub y: GpuVec,
}

impl From<&Camera> for GpuCamera {
    fn from(camera: &Camera) -> Self {
        Self {
            orig: camera.orig.into(),
            target: camera.target.into(),
            dir: camera.dir.into(),
            x: camera.x.into(),
            y: camera.y.into(),
        }
    }
}

/// Full config block in kernel layout. Boolean options become 0/1 ints.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuRenderingConfig {
    pub width: u32,
    pub height: u32,
    pub super_sampling_size: i32,
    pub activate_fast_rendering: i32,
    pub enable_shadow: i32,
    pub max_iterations: u32,
    pub epsilon: f32,
    pub mu: [f32; 4],
    pub light: [f32; 3],
    pub camera: GpuCamera,
}

impl From<&RenderingConfig> for GpuRenderingConfig {
    fn from(config: &RenderingConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            super_sampling_size: config.super_sampling_size,
            activate_fast_rendering: config.fast_rendering as i32,
            enable_shadow: config.enable_shadow as i32,
            max_iterations: config.max_iterations,
            epsilon: config.epsilon,
            mu: config.mu,
            light: config.light,
            camera: (&config.camera).into(),
        }
    }
}

impl GpuRenderingConfig {
    /// Raw bytes in upload order.
    pub fn as_bytes(&self) -> &[u8] {
        bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn layout_has_no_padding() {
        assert_eq!(size_of::<GpuVec>(), 12);
        assert_eq!(size_of::<GpuCamera>(), 60);
        assert_eq!(size_of::<GpuRenderingConfig>(), 116);
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn byte_image_matches_field_order() {
        let mut config = RenderingConfig {
            width: 800,
            height: 600,
            super_sampling_size: 2,
            max_iterations: 100,
            epsilon: 0.001,
            mu: [-0.2, 0.8, 0.0, 0.0],
            light: [1.0, 1.0, 1.0],
            camera: Camera::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO),
            ..RenderingConfig::default()
        };
        config.update_camera();

        let block = GpuRenderingConfig::from(&config);
        let bytes = block.as_bytes();
        assert_eq!(bytes.len(), 116);

        assert_eq!(u32_at(bytes, 0), 800);
        assert_eq!(u32_at(bytes, 4), 600);
        assert_eq!(u32_at(bytes, 8), 2);
        // Flags, as 0/1 ints.
        assert_eq!(u32_at(bytes, 12), 1);
        assert_eq!(u32_at(bytes, 16), 1);
        assert_eq!(u32_at(bytes, 20), 100);
        assert_eq!(f32_at(bytes, 24), 0.001);
        // mu
        assert_eq!(f32_at(bytes, 28), -0.2);
        assert_eq!(f32_at(bytes, 32), 0.8);
        // light
        assert_eq!(f32_at(bytes, 44), 1.0);
        // camera.orig starts right after light.
        assert_eq!(f32_at(bytes, 56), 0.0);
        assert_eq!(f32_at(bytes, 64), -5.0);
        // camera.target
        assert_eq!(f32_at(bytes, 68), 0.0);
    }

    #[test]
    fn flags_convert_to_zero_and_one() {
        let config = RenderingConfig {
            fast_rendering: false,
            enable_shadow: true,
            ..RenderingConfig::default()
        };
        let block = GpuRenderingConfig::from(&config);
        assert_eq!(block.activate_fast_rendering, 0);
        assert_eq!(block.enable_shadow, 1);
    }

    #[test]
    fn conversion_preserves_every_field() {
        let mut config = RenderingConfig::default();
        config.update_camera();
        let block = GpuRenderingConfig::from(&config);

        assert_eq!(block.width, config.width);
        assert_eq!(block.height, config.height);
        assert_eq!(block.super_sampling_size, config.super_sampling_size);
        assert_eq!(block.max_iterations, config.max_iterations);
        assert_eq!(block.epsilon, config.epsilon);
        assert_eq!(block.mu, config.mu);
        assert_eq!(block.light, config.light);
        assert_eq!(Vec3::from(block.camera.orig), config.camera.orig);
        assert_eq!(Vec3::from(block.camera.dir), config.camera.dir);
    }
}
