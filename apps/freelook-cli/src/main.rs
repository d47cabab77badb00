use anyhow::Context;
use clap::{Parser, Subcommand};
use freelook_common::{DemoConfig, IntentPolicy};
use freelook_input::{Action, HeldDirections};
use freelook_kernel::{compose_instance, FreeLookCamera, Scene, Variant};
use freelook_render::{DebugTextRenderer, Frame, Projection, Renderer};
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "freelook-cli", about = "Headless driver for the freelook camera and composer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run frames headless and print the last one
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Keys held for the whole run, e.g. "w,a"
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Cursor motion applied every frame, in pixels
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        look: Option<Vec<f32>>,
        /// Override the movement policy: first_match or combined
        #[arg(long)]
        policy: Option<IntentPolicy>,
    },
    /// Compose a single instance and print its model matrix
    Instance {
        #[arg(short, long, default_value = "0")]
        index: usize,
        #[arg(short, long, default_value = "0.0")]
        time: f32,
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        x: f32,
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        y: f32,
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        z: f32,
    },
}

/// Drive a camera through `frames` fixed-delta frames and return the final frame.
fn simulate(
    config: &DemoConfig,
    frames: u32,
    dt: f32,
    keys: &[String],
    look: Option<(f32, f32)>,
) -> anyhow::Result<Frame> {
    let mut camera = FreeLookCamera::default();
    camera.sensitivity = config.sensitivity;
    let scene = Scene::from_config(config);
    let projection = Projection::from_config(config);

    let mut held = HeldDirections::new();
    for key in keys {
        match Action::from_key_name(key.trim()) {
            Some(Action::Press(dir)) => held.press(dir),
            _ => anyhow::bail!("'{key}' is not a movement key (use w, a, s, d)"),
        }
    }

    // Cursor starts at the window center.
    let mut cursor = (config.width as f32 / 2.0, config.height as f32 / 2.0);
    camera.update_orientation(cursor.0, cursor.1);

    let mut time = 0.0;
    for frame in 0..frames {
        if let Some((dx, dy)) = look {
            cursor = (cursor.0 + dx, cursor.1 + dy);
            camera.update_orientation(cursor.0, cursor.1);
        }
        let intents = held.resolve(config.intent_policy);
        camera.navigate_many(&intents, dt * config.move_speed);
        time += dt;
        tracing::trace!(frame, eye = ?camera.eye(), "simulated frame");
    }

    Ok(Frame::capture(&camera, &projection, &scene, time))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = DemoConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Info => {
            println!("freelook-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", freelook_common::crate_info());
            println!("input: {}", freelook_input::crate_info());
            println!("render: {}", freelook_render::crate_info());
            println!(
                "scene: {} instances, offset ({:.1}, {:.1}, {:.1})",
                config.positions.len(),
                config.scene_offset.x,
                config.scene_offset.y,
                config.scene_offset.z
            );
        }
        Commands::Simulate {
            frames,
            dt,
            keys,
            look,
            policy,
        } => {
            if !(dt.is_finite() && dt >= 0.0) {
                anyhow::bail!("dt must be a non-negative number of seconds, got {dt}");
            }
            if let Some(policy) = policy {
                config.intent_policy = policy;
            }
            let look = match look.as_deref() {
                None => None,
                Some([dx, dy]) => Some((*dx, *dy)),
                Some(other) => anyhow::bail!("--look takes two values (dx,dy), got {}", other.len()),
            };
            println!(
                "Simulating {frames} frames at dt={dt}s, policy={:?}",
                config.intent_policy
            );

            let frame = simulate(&config, frames, dt, &keys, look)?;
            let mut renderer = DebugTextRenderer::new();
            print!("{}", renderer.render(&frame));
        }
        Commands::Instance {
            index,
            time,
            x,
            y,
            z,
        } => {
            let inst = compose_instance(Vec3::new(x, y, z), index, time);
            println!(
                "instance {index} variant={:?} t={time} anim={:.4}",
                Variant::for_index(index),
                inst.animation
            );
            for row in 0..4 {
                let r = inst.model.row(row);
                println!("  [{:8.4} {:8.4} {:8.4} {:8.4}]", r.x, r.y, r.z, r.w);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "freelook-cli",
            "simulate",
            "--frames",
            "10",
            "--keys",
            "w,d",
            "--look",
            "5,-2",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                frames, keys, look, ..
            } => {
                assert_eq!(frames, 10);
                assert_eq!(keys, vec!["w", "d"]);
                assert_eq!(look, Some(vec![5.0, -2.0]));
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn cli_parses_negative_leading_look() {
        let cli =
            Cli::try_parse_from(["freelook-cli", "simulate", "--look", "-5,2", "--frames", "3"])
                .unwrap();
        match cli.command {
            Commands::Simulate { frames, look, .. } => {
                assert_eq!(look, Some(vec![-5.0, 2.0]));
                assert_eq!(frames, 3);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn simulate_forward_for_one_second() {
        let config = DemoConfig::default();
        let frame = simulate(&config, 10, 0.1, &["w".to_string()], None).unwrap();
        assert!(frame.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-4));
        assert!((frame.time - 1.0).abs() < 1e-5);
        assert_eq!(frame.instances.len(), 10);
    }

    #[test]
    fn simulate_look_turns_camera() {
        let config = DemoConfig::default();
        let frame = simulate(&config, 1, 0.016, &[], Some((50.0, 0.0))).unwrap();
        assert!((frame.yaw - 5.0).abs() < 1e-5);
        assert_eq!(frame.pitch, 0.0);
    }

    #[test]
    fn simulate_rejects_non_movement_keys() {
        let config = DemoConfig::default();
        assert!(simulate(&config, 1, 0.1, &["q".to_string()], None).is_err());
    }

    #[test]
    fn simulate_combined_policy() {
        let config = DemoConfig {
            intent_policy: IntentPolicy::Combined,
            ..DemoConfig::default()
        };
        let keys = ["w".to_string(), "d".to_string()];
        let frame = simulate(&config, 1, 1.0, &keys, None).unwrap();
        assert!(frame.eye.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), 1e-5));
    }
}
