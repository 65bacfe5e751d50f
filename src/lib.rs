//! Configuration data layer for a GPU quaternion Julia set renderer.
//!
//! The crate owns the camera and rendering-settings structs the fractal
//! kernel consumes: loading them from the authoring XML, validating the
//! values the kernel assumes, and producing the byte-exact config block the
//! kernel reads from its buffer. The kernel itself, windowing and UI are
//! intentionally kept outside of the crate so that the code remains testable
//! and easy to embed in headless tools.

pub mod camera;
pub mod config;
pub mod gpu;
pub mod shared;

pub use camera::Camera;
pub use config::{ConfigError, RenderingConfig};
pub use gpu::{GpuCamera, GpuRenderingConfig, GpuVec};
pub use shared::SharedConfig;
