mod script;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sandplay::{FileJournal, GestureSettings, SandplaySession, SessionError};
use sandplay_core::catalog::{assets_for_theme, find_theme};
use sandplay_core::{
    GridCoord, Journal, ObjectVisual, PlacementStore, ThemeEntry, TrayRules, UserId,
    DEFAULT_THEME_SLUG, THEME_CATALOG,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::script::ReplayScript;

#[derive(Parser)]
#[command(name = "sandplay", version, about = "Tools for the sandplay tray and journal")]
struct Cli {
    /// TOML file overriding tray size, cell size and edge tolerances.
    #[arg(long, global = true, env = "SANDPLAY_RULES")]
    rules: Option<PathBuf>,
    #[arg(long, global = true, env = "SANDPLAY_JOURNAL_DIR")]
    journal_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List themes and their assets.
    Catalog {
        #[arg(long)]
        theme: Option<String>,
    },
    /// Projected position of a cell.
    Project {
        #[arg(long)]
        col: u32,
        #[arg(long)]
        row: u32,
    },
    /// Cell under a projected point.
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        y: f32,
    },
    /// Drop random assets from a theme and print them in painter order.
    Scatter {
        #[arg(long, default_value = DEFAULT_THEME_SLUG)]
        theme: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a recorded session and save its talisman.
    Replay {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        user: String,
    },
    /// Show a user's saved talismans.
    Journal {
        #[arg(long)]
        user: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesFile {
    cols: Option<u32>,
    rows: Option<u32>,
    cell_size: Option<f32>,
    front_tolerance: Option<f32>,
    back_tolerance: Option<f32>,
}

impl RulesFile {
    fn apply(self, rules: &mut TrayRules) {
        if let Some(cols) = self.cols {
            rules.cols = cols;
        }
        if let Some(rows) = self.rows {
            rules.rows = rows;
        }
        if let Some(cell_size) = self.cell_size {
            rules.cell_size = cell_size;
        }
        if let Some(front) = self.front_tolerance {
            rules.front_tolerance = front;
        }
        if let Some(back) = self.back_tolerance {
            rules.back_tolerance = back;
        }
    }
}

fn load_rules(path: Option<&Path>) -> Result<TrayRules, Box<dyn std::error::Error>> {
    let mut rules = TrayRules::default();
    if let Some(path) = path {
        let raw = fs::read_to_string(path)?;
        let overlay: RulesFile = toml::from_str(&raw)?;
        overlay.apply(&mut rules);
        tracing::debug!(path = %path.display(), ?rules, "tray rules loaded");
    }
    Ok(rules)
}

fn resolve_theme(value: &str) -> Result<&'static ThemeEntry, SessionError> {
    find_theme(value).ok_or_else(|| {
        eprintln!("available themes:");
        for entry in THEME_CATALOG {
            eprintln!("  {} ({})", entry.slug, entry.name);
        }
        SessionError::UnknownTheme(value.to_string())
    })
}

fn journal_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_dir()
            .map(|dir| dir.join("sandplay"))
            .unwrap_or_else(|| PathBuf::from(".sandplay"))
    })
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = load_rules(cli.rules.as_deref())?;
    let geometry = rules.geometry();

    match cli.command {
        Commands::Catalog { theme } => {
            let themes: Vec<_> = match theme.as_deref() {
                Some(value) => vec![resolve_theme(value)?],
                None => THEME_CATALOG.iter().collect(),
            };
            for entry in themes {
                println!("{} [{}] {} / {}", entry.name, entry.slug, entry.color, entry.accent);
                for asset in assets_for_theme(entry.slug) {
                    println!("  {} ({})", asset.name, asset.icon);
                }
            }
        }
        Commands::Project { col, row } => {
            let cell = geometry.bounds.clamp(GridCoord::new(col, row));
            if cell != GridCoord::new(col, row) {
                tracing::warn!(col, row, "cell clamped to tray bounds");
            }
            let (x, y) = geometry.to_projected(cell);
            println!("({}, {}) -> ({x:.1}, {y:.1})", cell.col, cell.row);
        }
        Commands::Locate { x, y } => match geometry.locate(x, y) {
            Some(cell) => println!("({x:.1}, {y:.1}) -> ({}, {})", cell.col, cell.row),
            None => {
                let nearest = geometry.to_grid(x, y);
                println!(
                    "({x:.1}, {y:.1}) is off the tray, nearest cell ({}, {})",
                    nearest.col, nearest.row
                );
            }
        },
        Commands::Scatter { theme, count, seed } => {
            let entry = resolve_theme(&theme)?;
            let assets: Vec<_> = assets_for_theme(entry.slug).collect();
            if assets.is_empty() {
                eprintln!("theme {} has no assets", entry.name);
                return Ok(());
            }
            let seed = seed.unwrap_or_else(rand::random);
            let mut rng = StdRng::seed_from_u64(seed);
            let bounds = geometry.bounds;
            let mut store = PlacementStore::new(bounds);
            for _ in 0..count {
                let asset = assets[rng.random_range(0..assets.len())];
                let cell = GridCoord::new(
                    rng.random_range(0..bounds.cols),
                    rng.random_range(0..bounds.rows),
                );
                let visual = ObjectVisual::Icon {
                    icon: asset.icon.to_string(),
                };
                store.add(asset.name, visual, cell, false);
            }
            println!("seed: {seed}");
            for object in store.render_order() {
                let (x, y) = geometry.to_projected(object.position());
                println!(
                    "{} {} at ({}, {}) -> ({x:.1}, {y:.1})",
                    object.id(),
                    object.kind(),
                    object.position().col,
                    object.position().row
                );
            }
        }
        Commands::Replay { script, user } => {
            let user = UserId::parse(&user)?;
            let script = ReplayScript::load(&script)?;
            let mut session = SandplaySession::new(rules, GestureSettings::default());
            let theme = session.start(&script.theme)?;
            println!("theme: {}", theme.name);
            script.apply_steps(&mut session)?;
            println!("layout: {}", session.tray().describe_layout());

            let reflector = script.reflector()?;
            for reframe in session.reflect_with(&reflector)? {
                println!("{}: {}", reframe.kind, reframe.title);
                println!("  {}", reframe.content);
            }
            let talisman = session.release_with(&reflector, now_ms())?;
            println!("talisman: {} ({})", talisman.name, talisman.mood);

            let mut journal = FileJournal::open(journal_dir(cli.journal_dir))?;
            let shard = session.save_to_journal(&mut journal, &user)?;
            println!("saved: {} -> {}", shard.id, journal.path().display());
        }
        Commands::Journal { user } => {
            let user = UserId::parse(&user)?;
            let journal = FileJournal::open(journal_dir(cli.journal_dir))?;
            let shards = journal.list(&user)?;
            if shards.is_empty() {
                println!("no talismans saved for {user}");
            }
            for shard in shards {
                println!(
                    "{} {} [{}] {} objects, mood {}",
                    shard.id,
                    shard.talisman.name,
                    shard.theme,
                    shard.objects.len(),
                    shard.talisman.mood
                );
            }
        }
    }

    Ok(())
}
