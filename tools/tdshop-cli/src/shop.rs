//! Roll and buy commands
//!
//! Both commands keep the session in a JSON save file between runs. Running
//! `roll` again without buying shows the same selection, since the save
//! records the generator state from before that selection was rolled.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use tdshop_core::{LevelConfig, ShopOffer, ShopSave, ShopSession};

/// Level and save file shared by the shop commands
#[derive(Args)]
pub struct SessionArgs {
    /// Level file (TOML)
    #[arg(short, long)]
    pub level: PathBuf,

    /// Save file (defaults to shop.json in the platform data directory)
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

/// Arguments for the roll command
#[derive(Args)]
pub struct RollArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Wave number used to evaluate weight curves
    #[arg(short, long, default_value = "0")]
    pub round: f32,

    /// Start a new run with this seed, replacing any existing save
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Lock the selection so later rolls keep it
    #[arg(long)]
    pub lock: bool,

    /// Print offers as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the buy command
#[derive(Args)]
pub struct BuyArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Index of the offer to buy (as listed by `roll`)
    #[arg(short, long)]
    pub index: usize,

    /// Wave number of the selection being bought from
    #[arg(short, long, default_value = "0")]
    pub round: f32,
}

/// Execute the roll command
pub fn roll(args: RollArgs) -> Result<()> {
    let level = load_level(&args.session.level)?;
    let save_path = resolve_save_path(args.session.save)?;
    let mut session = open_session(&save_path, args.seed)?;

    let offers = session
        .roll(&level, args.round)
        .with_context(|| format!("Failed to roll shop for '{}'", level.name))?
        .to_vec();
    if args.lock {
        session.lock();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&offers)?);
    } else {
        print_offers(&level, &session, args.round, &offers);
    }

    write_save(&save_path, &session)
}

/// Execute the buy command
pub fn buy(args: BuyArgs) -> Result<()> {
    let level = load_level(&args.session.level)?;
    let save_path = resolve_save_path(args.session.save)?;
    let Some(save) = ShopSave::load_or_default(&save_path)? else {
        bail!(
            "No shop in progress at {} (run `tdshop roll` first)",
            save_path.display()
        );
    };

    let mut session = ShopSession::from_save(&save);
    session
        .roll(&level, args.round)
        .with_context(|| format!("Failed to restore shop for '{}'", level.name))?;
    let offer = session.purchase(args.index)?;
    println!("Bought {}", offer);

    write_save(&save_path, &session)
}

fn load_level(path: &Path) -> Result<LevelConfig> {
    LevelConfig::load(path).with_context(|| format!("Failed to load level {}", path.display()))
}

fn resolve_save_path(save: Option<PathBuf>) -> Result<PathBuf> {
    match save {
        Some(path) => Ok(path),
        None => default_save_path().context("Could not determine data directory for the save file"),
    }
}

/// `shop.json` in the platform data directory
fn default_save_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "tdshop", "tdshop")
        .map(|dirs| dirs.data_dir().join("shop.json"))
}

/// Resume the saved session, or start a new one
///
/// An explicit seed always starts a new run.
fn open_session(save_path: &Path, seed: Option<i32>) -> Result<ShopSession> {
    if let Some(seed) = seed {
        tracing::info!("Starting new shop with seed {}", seed);
        return Ok(ShopSession::new(seed));
    }

    match ShopSave::load_or_default(save_path)? {
        Some(save) => {
            tracing::debug!("Resuming shop from {}", save_path.display());
            Ok(ShopSession::from_save(&save))
        }
        None => {
            let session = ShopSession::fresh();
            tracing::info!(
                "Starting new shop with random seed {}",
                session.generator().seed()
            );
            Ok(session)
        }
    }
}

fn write_save(path: &Path, session: &ShopSession) -> Result<()> {
    session
        .to_save()
        .save(path)
        .with_context(|| format!("Failed to write save {}", path.display()))
}

fn print_offers(level: &LevelConfig, session: &ShopSession, round: f32, offers: &[ShopOffer]) {
    let phase = if session.in_initial_phase(level) {
        "initial selection"
    } else {
        "selection"
    };
    println!("{} round {} {}:", level.name, round, phase);
    for (index, offer) in offers.iter().enumerate() {
        println!("  [{}] {}", index, offer);
    }
    if session.is_locked() {
        println!("  (locked)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"
name = "test"
initial_choices = 2

[[initial_turrets]]
name = "gunner"
category = "gunner"
weight = 1.0

[[initial_turrets]]
name = "smasher"
category = "smasher"
weight = 1.0

[[turrets]]
name = "gunner"
category = "gunner"
weight = 1.0
"#;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let level = dir.path().join("test.toml");
        std::fs::write(&level, LEVEL).unwrap();
        let save = dir.path().join("shop.json");
        (dir, level, save)
    }

    fn roll_args(level: &Path, save: &Path, seed: Option<i32>) -> RollArgs {
        RollArgs {
            session: SessionArgs {
                level: level.to_path_buf(),
                save: Some(save.to_path_buf()),
            },
            round: 0.0,
            seed,
            lock: false,
            json: true,
        }
    }

    #[test]
    fn test_roll_then_buy() {
        let (_dir, level, save) = setup();

        roll(roll_args(&level, &save, Some(42))).unwrap();
        let after_roll = ShopSave::load(&save).unwrap();
        assert_eq!(after_roll.rng.seed, 42);
        assert_eq!(after_roll.rng.draw_count, 0);

        buy(BuyArgs {
            session: SessionArgs {
                level: level.clone(),
                save: Some(save.clone()),
            },
            index: 0,
            round: 0.0,
        })
        .unwrap();
        let after_buy = ShopSave::load(&save).unwrap();
        assert_eq!(after_buy.purchases, 1);
        assert_eq!(after_buy.owned_turrets.len(), 1);
        assert!(after_buy.rng.draw_count > 0);
    }

    #[test]
    fn test_roll_again_keeps_selection() {
        let (_dir, level, save) = setup();

        roll(roll_args(&level, &save, Some(9))).unwrap();
        let first = ShopSave::load(&save).unwrap();
        roll(roll_args(&level, &save, None)).unwrap();
        assert_eq!(ShopSave::load(&save).unwrap(), first);
    }

    #[test]
    fn test_buy_without_save_fails() {
        let (_dir, level, save) = setup();
        let result = buy(BuyArgs {
            session: SessionArgs {
                level,
                save: Some(save),
            },
            index: 0,
            round: 0.0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_buy_index_out_of_range() {
        let (_dir, level, save) = setup();
        roll(roll_args(&level, &save, Some(1))).unwrap();

        let result = buy(BuyArgs {
            session: SessionArgs {
                level,
                save: Some(save),
            },
            index: 5,
            round: 0.0,
        });
        assert!(result.is_err());
    }
}
