//! tilebin - compile editor tilesets and worlds into runtime binaries
//!
//! ```text
//! tilebin tileset cave.json cave.bin
//! tilebin world -c types.toml --print-bounds world.json world.bin
//! tilebin inspect world.bin
//! ```

mod source;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use source::{TilesetSource, WorldSource};
use tilebin_compile::{compile_tileset, compile_world, read_world, EntityTypes, WorldView};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilebin", version, about = "Tile map asset compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a tileset description into a tileset binary.
    Tileset {
        /// Tileset JSON file.
        input: PathBuf,
        /// Output binary.
        output: PathBuf,
    },
    /// Compile a world of maps into a world binary.
    World {
        /// Entity type configuration (TOML).
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Print every extracted boundary.
        #[arg(long)]
        print_bounds: bool,
        /// World JSON file.
        input: PathBuf,
        /// Output binary.
        output: PathBuf,
    },
    /// Summarize a compiled world binary.
    Inspect {
        /// World binary.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Tileset { input, output } => run_tileset(&input, &output),
        Command::World {
            config,
            print_bounds,
            input,
            output,
        } => run_world(config.as_deref(), print_bounds, &input, &output),
        Command::Inspect { input } => run_inspect(&input),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn run_tileset(input: &Path, output: &Path) -> Result<()> {
    let source: TilesetSource = read_json(input)?;
    let tileset = source
        .into_tileset()
        .with_context(|| format!("invalid tileset {}", input.display()))?;
    let bytes = compile_tileset(&tileset)
        .with_context(|| format!("failed to compile {}", input.display()))?;
    fs::write(output, &bytes).with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), bytes = bytes.len(), "wrote tileset");
    Ok(())
}

fn run_world(config: Option<&Path>, print_bounds: bool, input: &Path, output: &Path) -> Result<()> {
    let types = match config {
        Some(path) => EntityTypes::load(path)
            .with_context(|| format!("failed to load entity types from {}", path.display()))?,
        None => EntityTypes::default(),
    };
    let source: WorldSource = read_json(input)?;
    let maps = source
        .into_maps()
        .with_context(|| format!("invalid world {}", input.display()))?;
    let world = compile_world(&maps, &types)
        .with_context(|| format!("failed to compile {}", input.display()))?;

    if print_bounds {
        let dump: Vec<serde_json::Value> = world
            .boundaries
            .iter()
            .map(|boundary| {
                let points: Vec<[i32; 2]> = boundary.points.iter().map(|p| [p.x, p.y]).collect();
                json!({ "flags": boundary.flags, "points": points })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&dump)?);
    }

    fs::write(output, &world.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), bytes = world.bytes.len(), "wrote world");
    Ok(())
}

fn run_inspect(input: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let view = read_world(&bytes).with_context(|| format!("malformed world {}", input.display()))?;
    print!("{}", summarize(&view));
    Ok(())
}

fn summarize(view: &WorldView) -> String {
    let mut out = String::new();
    out.push_str(&format!("maps: {}\n", view.maps.len()));
    for (map, offset) in view.maps.iter().zip(&view.map_offsets) {
        out.push_str(&format!(
            "  @{offset:#x} ({}, {}) {}x{} layers={} entities={} tilesets={}+{} properties={}\n",
            map.x,
            map.y,
            map.width,
            map.height,
            map.layers.len(),
            map.entities.len(),
            map.map_tileset_offsets.len(),
            map.entity_tileset_offsets.len(),
            map.properties.len(),
        ));
    }
    let one_way = view.boundaries.iter().filter(|b| b.is_one_way()).count();
    out.push_str(&format!(
        "boundaries: {} ({} one-way)\n",
        view.boundaries.len(),
        one_way
    ));
    out
}
