use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use log::info;

use julia3d_config::{GpuRenderingConfig, RenderingConfig};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    let config = match &options.path {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            RenderingConfig::from_xml(&xml)
                .with_context(|| format!("failed to load config {path}"))?
        }
        None => {
            let mut config = RenderingConfig::default();
            config.update_camera();
            config
        }
    };

    print_summary(&config);

    if let Some(path) = &options.emit_gpu {
        let block = GpuRenderingConfig::from(&config);
        fs::write(path, block.as_bytes())
            .with_context(|| format!("failed to write GPU config block to {path}"))?;
        info!("wrote {} bytes to {path}", block.as_bytes().len());
        println!("Wrote {}-byte GPU config block to {path}", block.as_bytes().len());
    }

    Ok(())
}

fn print_summary(config: &RenderingConfig) {
    println!(
        "Rendering {}x{} ({} floats in the pixel buffer)",
        config.width,
        config.height,
        config.pixel_buffer_len()
    );
    println!(
        " - super-sampling {}x{}, fast rendering {}, shadows {}",
        config.super_sampling_size,
        config.super_sampling_size,
        on_off(config.fast_rendering),
        on_off(config.enable_shadow)
    );
    println!(
        " - max iterations {}, epsilon {}",
        config.max_iterations, config.epsilon
    );
    println!(
        " - mu ({}, {}, {}, {})",
        config.mu[0], config.mu[1], config.mu[2], config.mu[3]
    );
    println!(
        " - light ({}, {}, {})",
        config.light[0], config.light[1], config.light[2]
    );
    let camera = &config.camera;
    println!(
        " - camera orig=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) dir=({:.2}, {:.2}, {:.2})",
        camera.orig.x,
        camera.orig.y,
        camera.orig.z,
        camera.target.x,
        camera.target.y,
        camera.target.z,
        camera.dir.x,
        camera.dir.y,
        camera.dir.z
    );
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

struct CliOptions {
    path: Option<String>,
    emit_gpu: Option<String>,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut path = None;
        let mut emit_gpu = None;
        let mut defaults = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--defaults" => defaults = true,
                "--emit-gpu" => {
                    emit_gpu = Some(args.next().ok_or_else(|| {
                        anyhow!("--emit-gpu requires a path argument")
                    })?);
                }
                other if path.is_none() && !other.starts_with('-') => {
                    path = Some(other.to_string());
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: julia3d-config [<config.xml> | --defaults] [--emit-gpu <path>]"
                    ));
                }
            }
        }
        if path.is_none() && !defaults {
            return Err(anyhow!(
                "Usage: julia3d-config [<config.xml> | --defaults] [--emit-gpu <path>]"
            ));
        }
        if path.is_some() && defaults {
            return Err(anyhow!("--defaults cannot be combined with a config path"));
        }
        Ok(Self { path, emit_gpu })
    }
}
