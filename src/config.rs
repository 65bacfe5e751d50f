use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;

/// Global rendering settings consumed by the fractal kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Output image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Sub-samples per pixel axis; the kernel takes the square of this many
    /// samples when anti-aliasing.
    #[serde(default = "default_super_sampling")]
    pub super_sampling_size: i32,
    /// Skips super-sampling while the camera is moving.
    #[serde(default = "default_true")]
    pub fast_rendering: bool,
    /// Enables the shadow ray pass.
    #[serde(default = "default_true")]
    pub enable_shadow: bool,
    /// Iteration cap for the quaternion escape-time loop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Distance threshold terminating the ray march.
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
    /// Quaternion Julia set parameter.
    #[serde(default = "default_mu")]
    pub mu: [f32; 4],
    /// Light position in world space.
    #[serde(default = "default_light")]
    pub light: [f32; 3],
    #[serde(default)]
    pub camera: Camera,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            super_sampling_size: default_super_sampling(),
            fast_rendering: true,
            enable_shadow: true,
            max_iterations: default_max_iterations(),
            epsilon: default_epsilon(),
            mu: default_mu(),
            light: default_light(),
            camera: Camera::default(),
        }
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_super_sampling() -> i32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> u32 {
    9
}

fn default_epsilon() -> f32 {
    0.003 * 0.75
}

fn default_mu() -> [f32; 4] {
    [-0.2, 0.4, -0.4, -0.4]
}

fn default_light() -> [f32; 3] {
    [5.0, 10.0, 15.0]
}

/// Violation of one of the domain invariants a config must satisfy before it
/// is handed to the kernel.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("super-sampling size must be at least 1 (got {0})")]
    InvalidSuperSampling(i32),
    #[error("epsilon must be positive and finite (got {0})")]
    InvalidEpsilon(f32),
    #[error("{field} contains a non-finite component")]
    NonFinite { field: &'static str },
}

impl RenderingConfig {
    /// Parses a rendering config from the XML produced by the authoring
    /// tools. Absent tags keep their default values; the returned config is
    /// validated and its camera basis is up to date.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid rendering config XML")?;
        let root = document.root_element();
        if !root.has_tag_name("rendering") {
            return Err(anyhow!("expected <rendering> root element"));
        }

        let mut config = Self::default();
        config.width = parse_u32(optional_text(&root, "width"), config.width)?;
        config.height = parse_u32(optional_text(&root, "height"), config.height)?;
        config.super_sampling_size = parse_i32(
            optional_text(&root, "superSamplingSize"),
            config.super_sampling_size,
        )?;
        config.fast_rendering =
            parse_bool(optional_text(&root, "fastRendering"), config.fast_rendering)?;
        config.enable_shadow =
            parse_bool(optional_text(&root, "enableShadow"), config.enable_shadow)?;
        config.max_iterations =
            parse_u32(optional_text(&root, "maxIterations"), config.max_iterations)?;
        config.epsilon = parse_f32(optional_text(&root, "epsilon"), config.epsilon)?;
        config.mu = parse_floats(optional_text(&root, "mu"), config.mu)?;
        config.light = parse_floats(optional_text(&root, "light"), config.light)?;

        if let Some(camera) = root.children().find(|n| n.has_tag_name("camera")) {
            config.camera.orig = parse_vec3(optional_text(&camera, "orig"), config.camera.orig)?;
            config.camera.target =
                parse_vec3(optional_text(&camera, "target"), config.camera.target)?;
        }

        config.validate().context("rendering config is invalid")?;
        config.update_camera();
        Ok(config)
    }

    /// Checks the invariants the kernel assumes but never re-checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.super_sampling_size < 1 {
            return Err(ConfigError::InvalidSuperSampling(self.super_sampling_size));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if self.mu.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::NonFinite { field: "mu" });
        }
        if self.light.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::NonFinite { field: "light" });
        }
        if !self.camera.orig.is_finite() || !self.camera.target.is_finite() {
            return Err(ConfigError::NonFinite { field: "camera" });
        }
        Ok(())
    }

    /// Number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length in floats of the RGB accumulation buffer the kernel writes.
    pub fn pixel_buffer_len(&self) -> usize {
        self.pixel_count() * 3
    }

    /// Recomputes the camera basis for the current output resolution.
    pub fn update_camera(&mut self) {
        self.camera.update_basis(self.width, self.height);
    }
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_u32(value: Option<String>, default: u32) -> Result<u32> {
    match value {
        Some(value) => value
            .parse::<u32>()
            .map_err(|err| anyhow!("failed to parse integer {value:?}: {err}")),
        None => Ok(default),
    }
}

fn parse_i32(value: Option<String>, default: i32) -> Result<i32> {
    match value {
        Some(value) => value
            .parse::<i32>()
            .map_err(|err| anyhow!("failed to parse integer {value:?}: {err}")),
        None => Ok(default),
    }
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float {value:?}: {err}")),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref() {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(anyhow!("failed to parse boolean {other:?}")),
    }
}

fn parse_floats<const N: usize>(value: Option<String>, default: [f32; N]) -> Result<[f32; N]> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut components = [0.0; N];
    let mut numbers = value.split_whitespace();
    for component in components.iter_mut() {
        let text = numbers
            .next()
            .ok_or_else(|| anyhow!("expected {N} components in {value:?}"))?;
        *component = text
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float {text:?}: {err}"))?;
    }
    if numbers.next().is_some() {
        return Err(anyhow!("expected {N} components in {value:?}"));
    }
    Ok(components)
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let components = parse_floats(value, default.to_array())?;
    Ok(Vec3::from_array(components))
}
