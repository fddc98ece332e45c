use anyhow::Context;
use clap::{Parser, Subcommand};
use diorama_common::{LoadedModel, TextureData};
use diorama_kernel::{Diorama, DioramaConfig, ManualClock, Scene, SurfaceSize};
use diorama_render::{FrameLoop, TextRenderer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diorama-cli", about = "Headless tools for the portal diorama")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the frame loop headlessly and print every frame's state
    Frames {
        /// Number of frames to run
        #[arg(short, long, default_value = "3")]
        frames: usize,
        /// Seconds between frames
        #[arg(long, default_value = "0.016")]
        step: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Device pixel ratio before capping
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f64,
        /// RNG seed for the particle field
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Attach assets from this directory before the first frame
        #[arg(long)]
        assets_dir: Option<PathBuf>,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load an asset directory (or a single model file) and report how its
    /// nodes are wired
    Inspect {
        #[arg(default_value = "./static")]
        path: PathBuf,
    },
    /// Print the default configuration as JSON, or write it to a file
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct FramesArgs {
    frames: usize,
    step: f32,
    surface: SurfaceSize,
    seed: u64,
}

fn run_frames(config: &DioramaConfig, args: &FramesArgs, assets_dir: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let mut diorama = Diorama::new(config, args.surface, &mut StdRng::seed_from_u64(args.seed));
    if let Some(dir) = assets_dir {
        let model = diorama_assets::load_portal_assets(dir)
            .with_context(|| format!("loading assets from {}", dir.display()))?;
        let report = diorama.attach_loaded_nodes(model);
        tracing::info!(attached = report.attached, missing = ?report.missing, "assets attached");
    }

    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(&clock);
    let mut renderer = TextRenderer::new();
    let mut dumps = Vec::with_capacity(args.frames);
    for _ in 0..args.frames {
        dumps.push(frame_loop.tick(&mut diorama, &mut renderer));
        clock.advance(args.step);
    }
    tracing::info!(frames = frame_loop.ticks(), "headless run finished");
    Ok(dumps)
}

fn inspect(path: &Path) -> anyhow::Result<String> {
    let (nodes, texture) = if path.is_file() {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        (diorama_assets::load_model_from_slice(&bytes)?, None)
    } else {
        let model = diorama_assets::load_portal_assets(path)
            .with_context(|| format!("loading assets from {}", path.display()))?;
        (model.nodes, Some(model.baked_texture))
    };

    let mut out = match &texture {
        Some(t) => format!("Baked texture: {}x{}\n", t.width, t.height),
        None => "Baked texture: none\n".to_string(),
    };

    let mut scene = Scene::new();
    let report = scene.attach_loaded_nodes(LoadedModel {
        nodes,
        baked_texture: texture.unwrap_or_else(TextureData::white),
    });

    out.push_str(&format!("Nodes: {}\n", report.attached));
    for node in scene.nodes() {
        let bounds = match node.mesh.bounds() {
            Some((lo, hi)) => format!(
                "({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            ),
            None => "empty".to_string(),
        };
        out.push_str(&format!(
            "  {} {:?} verts={} tris={} bounds={}\n",
            node.name,
            node.material,
            node.mesh.vertex_count(),
            node.mesh.triangle_count(),
            bounds
        ));
    }
    if report.is_complete() {
        out.push_str("All named nodes present\n");
    } else {
        out.push_str(&format!("Missing: {}\n", report.missing.join(", ")));
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Frames {
            frames,
            step,
            width,
            height,
            pixel_ratio,
            seed,
            assets_dir,
            config,
        } => {
            let config = match config {
                Some(path) => DioramaConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => DioramaConfig::default(),
            };
            let args = FramesArgs {
                frames,
                step,
                surface: SurfaceSize::new(width, height, pixel_ratio),
                seed,
            };
            for dump in run_frames(&config, &args, assets_dir.as_deref())? {
                print!("{dump}");
            }
        }
        Commands::Inspect { path } => {
            print!("{}", inspect(&path)?);
        }
        Commands::Config { output: Some(path) } => {
            DioramaConfig::default()
                .save(&path)
                .with_context(|| format!("writing config {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote default config");
        }
        Commands::Config { output: None } => {
            println!("{}", serde_json::to_string_pretty(&DioramaConfig::default())?);
        }
    }

    Ok(())
}
