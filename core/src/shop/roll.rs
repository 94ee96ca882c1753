//! Generating one shop selection

use std::collections::BTreeSet;

use crate::config::LevelConfig;
use crate::error::ShopError;
use crate::rng::Squirrel3;
use crate::weighted::WeightedList;

use super::{ModuleCard, ShopOffer, TurretCard};

/// Roll the cards for one shop selection
///
/// In the initial phase every card is a turret from the level's initial table.
/// Afterwards each slot first draws which kind of card it holds (module, turret
/// or life, weighted by the level's option curves at `round`, at most one life
/// per selection) and then draws the card itself. Turrets and modules avoid
/// duplicating cards already in this selection under the level's duplicate
/// checks; modules are limited to those fitting an owned turret category.
pub fn roll_selection(
    level: &LevelConfig,
    round: f32,
    initial_phase: bool,
    owned_turrets: &BTreeSet<String>,
    rng: &mut Squirrel3,
) -> Result<Vec<ShopOffer>, ShopError> {
    if initial_phase {
        return roll_initial(level, rng);
    }

    let turret_weight = level.option_weights.turret.evaluate(round).max(0.0);
    let module_weight = level.option_weights.module.evaluate(round).max(0.0);
    let life_weight = level.option_weights.life.evaluate(round).max(0.0);

    let turret_table = level.turrets.to_weighted_list(round);
    let mut module_table = level.modules.to_weighted_list(round);
    module_table.retain(|entry| entry.item.fits_any(owned_turrets));

    let mut offers = Vec::with_capacity(level.selection_choices);
    let mut turrets: Vec<TurretCard> = Vec::new();
    let mut modules: Vec<ModuleCard> = Vec::new();
    let mut has_life = false;

    for _ in 0..level.selection_choices {
        let life = if has_life { 0.0 } else { life_weight };
        let total = turret_weight + module_weight + life;
        if total <= 0.0 {
            return Err(ShopError::NoOptions { round });
        }

        let choice = rng.range_f32(0.0, total);
        if module_weight > 0.0 && choice <= module_weight {
            let card = pick_module(level, &module_table, &modules, rng)?;
            modules.push(card.clone());
            offers.push(ShopOffer::Module(card));
        } else if turret_weight > 0.0 && choice <= module_weight + turret_weight {
            let card = turret_table
                .get_one(level.turret_duplicate_check, rng, &turrets)?
                .clone();
            turrets.push(card.clone());
            offers.push(ShopOffer::Turret(card));
        } else {
            has_life = true;
            offers.push(ShopOffer::Life {
                lives: level.life_count,
            });
        }
    }

    log::debug!(
        "Rolled {} offers for '{}' at round {} ({} turrets, {} modules)",
        offers.len(),
        level.name,
        round,
        turrets.len(),
        modules.len()
    );
    Ok(offers)
}

fn roll_initial(level: &LevelConfig, rng: &mut Squirrel3) -> Result<Vec<ShopOffer>, ShopError> {
    let table = WeightedList::from_slice(&level.initial_turrets);
    let mut turrets: Vec<TurretCard> = Vec::with_capacity(level.initial_choices);

    for _ in 0..level.initial_choices {
        let card = table
            .get_one(level.initial_duplicate_check, rng, &turrets)?
            .clone();
        turrets.push(card);
    }

    log::debug!(
        "Rolled initial selection of {} turrets for '{}'",
        turrets.len(),
        level.name
    );
    Ok(turrets.into_iter().map(ShopOffer::Turret).collect())
}

fn pick_module(
    level: &LevelConfig,
    table: &WeightedList<ModuleCard>,
    offered: &[ModuleCard],
    rng: &mut Squirrel3,
) -> Result<ModuleCard, ShopError> {
    if table.is_empty() {
        return Err(ShopError::NoModuleCandidates);
    }
    Ok(table
        .get_one(level.module_duplicate_check, rng, offered)?
        .clone())
}
