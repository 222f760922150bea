use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use lego::{FrameDriver, Gesture, Lego, LegoConfig, Mount};
use lego_render::{AlwaysSupported, DebugTextRenderer, GraphicsProbe};
use lego_render_wgpu::WgpuProbe;
use lego_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lego-cli", about = "Headless tools for the lego scene composer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720", value_parser = parse_size, global = true)]
    size: (u32, u32),

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, configuration summary and the composed scene
    Info {
        /// Also ask wgpu for an adapter and report it
        #[arg(long)]
        gpu: bool,
    },
    /// Render frames with the text renderer
    Frames {
        /// Number of frames to render
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Orbit the camera by this many pixels of drag per frame
        #[arg(long, default_value = "0")]
        spin: f32,
        /// Only print the last frame
        #[arg(short, long)]
        quiet: bool,
    },
    /// Bind every light to the debug panel and print its layout as JSON
    Panel,
    /// Print the effective configuration as YAML
    Config,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(w)?, parse(h)?))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LegoConfig> {
    match path {
        Some(path) => LegoConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(LegoConfig::default()),
    }
}

fn gpu_line(probe: &dyn GraphicsProbe) -> String {
    let status = if probe.is_supported() {
        "supported"
    } else {
        "unsupported"
    };
    format!("gpu: {status} ({})", probe.describe())
}

fn compose(config: &LegoConfig, (width, height): (u32, u32)) -> anyhow::Result<Lego<DebugTextRenderer>> {
    let lego = Lego::new(
        Some(Mount::container("cli", width, height)),
        config,
        &AlwaysSupported,
        DebugTextRenderer::new(),
    )?;
    Ok(lego)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    tracing::debug!(lights = config.lights.len(), size = ?cli.size, "configuration ready");

    match cli.command {
        Commands::Info { gpu } => {
            let lego = compose(&config, cli.size)?;
            println!("lego-cli v{}", env!("CARGO_PKG_VERSION"));
            if gpu {
                println!("{}", gpu_line(&WgpuProbe::detect()));
            }
            println!(
                "camera: fov={} near={} far={} position={:?}",
                config.camera.fov, config.camera.near, config.camera.far, config.camera.position
            );
            println!(
                "ground: {}x{}x{} color={}",
                config.ground.width, config.ground.depth, config.ground.thickness, config.ground.color
            );
            println!(
                "debug: enabled={} multiple={} stats={}",
                config.debug.enabled, config.debug.multiple, config.debug.stats
            );
            println!("{}", SceneInspector::summary(lego.scene()));
            for node in SceneInspector::list_nodes(lego.scene()) {
                println!("  {node}");
            }
        }
        Commands::Frames {
            count,
            dt,
            spin,
            quiet,
        } => {
            let mut lego = compose(&config, cli.size)?;
            for i in 0..count {
                if spin != 0.0 {
                    lego.handle_gesture(Gesture::Rotate(Vec2::new(spin, 0.0)));
                }
                let frame = lego.advance(dt);
                if !quiet || i + 1 == count {
                    print!("{frame}");
                }
            }
            if let Some(stats) = lego.stats() {
                println!("{stats}");
            }
        }
        Commands::Panel => {
            let mut lego = compose(&config, cli.size)?;
            if lego.debug().is_none() {
                anyhow::bail!("the debug panel is disabled in this configuration");
            }
            let lights: Vec<_> = lego.scene().light_ids().collect();
            for id in lights {
                lego.bind_light(id);
            }
            let panel = lego.panel().context("debug panel missing")?;
            println!("{}", panel.layout_json()?);
        }
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
