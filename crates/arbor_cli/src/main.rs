//! Arbor CLI
//!
//! Filter trees, resolve panel placement, and replay scripted interactions
//! against a check-tree picker.

use anyhow::{Context, Result};
use arbor_core::dom::Document;
use arbor_core::events::Event;
use arbor_core::geometry::Rect;
use arbor_picker::{check_tree_picker, load_tree, resolve, Locale, Placement, PickerConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod render;
mod script;

use script::{Script, Simulation};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Arbor check-tree picker CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the part of a tree that matches a search keyword
    Filter {
        /// Tree data (JSON array of nodes)
        data: PathBuf,

        /// Search keyword (blank shows everything)
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// Picker configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decide whether a panel opens up or down
    Place {
        /// Anchor top edge in viewport coordinates
        #[arg(long)]
        top: f32,

        /// Anchor height
        #[arg(long, default_value = "32")]
        height: f32,

        /// Viewport height
        #[arg(long, default_value = "800")]
        viewport: f32,

        /// Panel height
        #[arg(long, default_value = "320")]
        panel_height: f32,

        /// Explicit orientation (skips geometry)
        #[arg(long)]
        dropup: Option<bool>,
    },

    /// Replay a scripted interaction and print each frame
    Simulate {
        /// Tree data (JSON array of nodes)
        data: PathBuf,

        /// Interaction script (TOML)
        #[arg(short, long)]
        script: PathBuf,

        /// Picker configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Locale messages (TOML)
        #[arg(short, long)]
        locale: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Filter {
            data,
            keyword,
            config,
        } => cmd_filter(&data, &keyword, config.as_deref()),

        Commands::Place {
            top,
            height,
            viewport,
            panel_height,
            dropup,
        } => cmd_place(top, height, viewport, panel_height, dropup),

        Commands::Simulate {
            data,
            script,
            config,
            locale,
        } => cmd_simulate(&data, &script, config.as_deref(), locale.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<PickerConfig> {
    match path {
        Some(path) => PickerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PickerConfig::default()),
    }
}

fn cmd_filter(data: &Path, keyword: &str, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let tree = load_tree(data).with_context(|| format!("Failed to load {}", data.display()))?;
    let label_key = config.label_key.clone();
    let value_key = config.value_key.clone();

    let mut doc = Document::default();
    let mut picker = check_tree_picker(tree).config(config).build(&mut doc);
    picker.handle_search(keyword, &Event::text_input(None, keyword));

    let filtered = picker.filtered_data();
    info!(
        "{} top-level node(s) match '{}'",
        filtered.len(),
        keyword.trim()
    );
    print!("{}", render::outline(&filtered, &label_key, &value_key));

    Ok(())
}

fn cmd_place(
    top: f32,
    height: f32,
    viewport: f32,
    panel_height: f32,
    dropup: Option<bool>,
) -> Result<()> {
    if viewport <= 0.0 || panel_height < 0.0 || height < 0.0 {
        anyhow::bail!("Sizes must be positive (viewport {viewport}, panel {panel_height}, anchor {height})");
    }

    let anchor = Rect::new(0.0, top, 0.0, height);
    let placement = resolve(dropup.map(Placement::from_dropup), anchor, viewport, panel_height);
    debug!(
        top,
        bottom = anchor.bottom(),
        viewport,
        panel_height,
        "resolved {}",
        placement
    );
    println!("{}", placement);

    Ok(())
}

fn cmd_simulate(
    data: &Path,
    script: &Path,
    config: Option<&Path>,
    locale: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let locale = match locale {
        Some(path) => Locale::load(path)
            .with_context(|| format!("Failed to load locale {}", path.display()))?,
        None => Locale::default(),
    };
    let tree = load_tree(data).with_context(|| format!("Failed to load {}", data.display()))?;
    let script = Script::load(script)?;

    info!("Replaying {} step(s)", script.steps.len());
    let mut sim = Simulation::new(tree, config, locale, &script)?;
    print!("{}", render::frame(&sim.picker.render()));

    for (i, step) in script.steps.iter().enumerate() {
        sim.step(step)?;
        println!("-- {} {:?}", i + 1, step);
        print!("{}", render::frame(&sim.picker.render()));
    }

    Ok(())
}
