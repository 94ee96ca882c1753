//! A player's shop across one level

use std::collections::BTreeSet;

use crate::config::LevelConfig;
use crate::error::ShopError;
use crate::rng::{RngState, Squirrel3};

use super::{ShopOffer, ShopSave, roll_selection};

/// Shop state for one run of a level
///
/// Owns its generator. The generator state at the start of the current roll is
/// kept alongside it, which is what gets saved: resuming from a save rolls the
/// exact selection the player was looking at.
#[derive(Debug, Clone)]
pub struct ShopSession {
    rng: Squirrel3,
    roll_start: RngState,
    offers: Vec<ShopOffer>,
    locked: bool,
    purchases: u32,
    owned_turrets: BTreeSet<String>,
}

impl ShopSession {
    /// Start a session with a fixed seed
    pub fn new(seed: i32) -> Self {
        Self::with_rng(Squirrel3::with_seed(seed))
    }

    /// Start a session with a random seed
    pub fn fresh() -> Self {
        Self::with_rng(Squirrel3::new())
    }

    fn with_rng(rng: Squirrel3) -> Self {
        Self {
            roll_start: rng.state(),
            rng,
            offers: Vec::new(),
            locked: false,
            purchases: 0,
            owned_turrets: BTreeSet::new(),
        }
    }

    /// Resume a saved session
    ///
    /// No offers are held after resuming; the next [`roll`](Self::roll)
    /// regenerates them from the saved generator state.
    pub fn from_save(save: &ShopSave) -> Self {
        let mut session = Self::with_rng(Squirrel3::from_state(save.rng));
        session.purchases = save.purchases;
        session.locked = save.locked;
        session.owned_turrets = save.owned_turrets.iter().cloned().collect();
        session
    }

    pub fn to_save(&self) -> ShopSave {
        ShopSave {
            rng: self.roll_start,
            purchases: self.purchases,
            owned_turrets: self.owned_turrets.iter().cloned().collect(),
            locked: self.locked,
        }
    }

    /// Roll a new selection, or return the current one while locked
    ///
    /// The previous selection is discarded first. A failed roll leaves no
    /// offers and does not advance the generator or the saved state.
    pub fn roll(&mut self, level: &LevelConfig, round: f32) -> Result<&[ShopOffer], ShopError> {
        if self.locked && !self.offers.is_empty() {
            log::debug!("Shop locked, keeping {} offers", self.offers.len());
            return Ok(&self.offers);
        }

        self.offers.clear();
        let initial_phase = self.in_initial_phase(level);
        let mut rng = self.rng;
        let offers = roll_selection(level, round, initial_phase, &self.owned_turrets, &mut rng)?;

        self.roll_start = self.rng.state();
        self.rng = rng;
        self.offers = offers;
        Ok(&self.offers)
    }

    /// Buy the offer at `index`
    ///
    /// The selection is used up and the shop unlocks. Buying a turret adds
    /// its category to the owned set, which opens up modules for it.
    pub fn purchase(&mut self, index: usize) -> Result<ShopOffer, ShopError> {
        let len = self.offers.len();
        if index >= len {
            return Err(ShopError::OfferOutOfRange { index, len });
        }

        let offer = self.offers.swap_remove(index);
        if let ShopOffer::Turret(card) = &offer {
            self.owned_turrets.insert(card.category.clone());
        }
        self.purchases += 1;
        self.offers.clear();
        self.locked = false;
        self.roll_start = self.rng.state();

        log::info!("Purchased {} (purchase #{})", offer, self.purchases);
        Ok(offer)
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn offers(&self) -> &[ShopOffer] {
        &self.offers
    }

    pub fn generator(&self) -> &Squirrel3 {
        &self.rng
    }

    pub fn purchases(&self) -> u32 {
        self.purchases
    }

    pub fn owned_turrets(&self) -> &BTreeSet<String> {
        &self.owned_turrets
    }

    /// Mark a turret category as owned without buying it (e.g. a level's starting turret)
    pub fn add_owned_turret(&mut self, category: impl Into<String>) {
        self.owned_turrets.insert(category.into());
    }

    /// Whether the next roll comes from the level's initial selection
    pub fn in_initial_phase(&self, level: &LevelConfig) -> bool {
        self.purchases < level.initial_selection_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::shop::{ModuleCard, TurretCard};
    use crate::weighted::{DuplicatePolicy, WeightedItem};

    fn level() -> LevelConfig {
        let mut level = LevelConfig {
            name: "test".to_string(),
            initial_choices: 2,
            selection_choices: 3,
            initial_duplicate_check: DuplicatePolicy::ByIdentity,
            initial_turrets: vec![
                WeightedItem::new(TurretCard::new("gunner", "gunner"), 1.0),
                WeightedItem::new(TurretCard::new("smasher", "smasher"), 1.0),
            ],
            ..LevelConfig::default()
        };
        level
            .turrets
            .push(TurretCard::new("lancer", "lancer"), Curve::constant(1.0));
        level
            .turrets
            .push(TurretCard::new("gunner", "gunner"), Curve::constant(1.0));
        level.modules.push(
            ModuleCard::new("frostbite", "slow").valid_for(["gunner"]),
            Curve::constant(1.0),
        );
        level.modules.push(
            ModuleCard::new("overclock", "speed").valid_for(["smasher"]),
            Curve::constant(1.0),
        );
        level
    }

    #[test]
    fn test_initial_roll_offers_distinct_turrets() {
        let level = level();
        let mut session = ShopSession::new(42);
        assert!(session.in_initial_phase(&level));

        let offers = session.roll(&level, 0.0).unwrap().to_vec();
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| matches!(o, ShopOffer::Turret(_))));
        assert_ne!(offers[0], offers[1]);
    }

    #[test]
    fn test_purchase_turret_updates_state() {
        let level = level();
        let mut session = ShopSession::new(7);
        session.roll(&level, 0.0).unwrap();
        let bought = session.purchase(0).unwrap();

        let ShopOffer::Turret(card) = bought else {
            panic!("initial selection should only hold turrets");
        };
        assert!(session.owned_turrets().contains(&card.category));
        assert_eq!(session.purchases(), 1);
        assert!(session.offers().is_empty());
        assert!(!session.in_initial_phase(&level));
    }

    #[test]
    fn test_purchase_out_of_range() {
        let mut session = ShopSession::new(1);
        assert_eq!(
            session.purchase(0),
            Err(ShopError::OfferOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_modules_only_for_owned_turrets() {
        let mut level = level();
        level.option_weights.turret = Curve::constant(0.0);
        level.initial_selection_count = 0;

        let mut session = ShopSession::new(99);
        session.add_owned_turret("gunner");
        for round in 0..20 {
            let offers = session.roll(&level, round as f32).unwrap().to_vec();
            for offer in offers {
                match offer {
                    ShopOffer::Module(card) => assert_eq!(card.name, "frostbite"),
                    other => panic!("unexpected offer {other}"),
                }
            }
        }
    }

    #[test]
    fn test_no_module_candidates() {
        let mut level = level();
        level.option_weights.turret = Curve::constant(0.0);
        level.initial_selection_count = 0;

        let mut session = ShopSession::new(3);
        assert_eq!(
            session.roll(&level, 0.0),
            Err(ShopError::NoModuleCandidates)
        );
    }

    #[test]
    fn test_no_options() {
        let mut level = level();
        level.initial_selection_count = 0;
        level.option_weights.turret = Curve::constant(0.0);
        level.option_weights.module = Curve::constant(0.0);

        let mut session = ShopSession::new(3);
        assert_eq!(
            session.roll(&level, 4.0),
            Err(ShopError::NoOptions { round: 4.0 })
        );
    }

    #[test]
    fn test_failed_roll_discards_offers_and_keeps_state() {
        let mut level = level();
        level.initial_selection_count = 0;
        level.option_weights.module = Curve::constant(0.0);

        let mut session = ShopSession::new(21);
        session.roll(&level, 1.0).unwrap();
        let saved = session.to_save();
        let generator = *session.generator();

        // Modules become likely, but none fit: no turret is owned
        level.option_weights.turret = Curve::constant(0.0);
        level.option_weights.module = Curve::constant(1.0);
        assert_eq!(
            session.roll(&level, 2.0),
            Err(ShopError::NoModuleCandidates)
        );

        assert!(session.offers().is_empty());
        assert_eq!(session.to_save(), saved);
        assert_eq!(*session.generator(), generator);
        assert!(matches!(
            session.purchase(0),
            Err(ShopError::OfferOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_at_most_one_life_per_roll() {
        let mut level = level();
        level.initial_selection_count = 0;
        level.option_weights.turret = Curve::constant(0.0);
        level.option_weights.module = Curve::constant(0.0);
        level.option_weights.life = Curve::constant(1.0);
        level.selection_choices = 1;

        let mut session = ShopSession::new(11);
        let offers = session.roll(&level, 0.0).unwrap();
        assert_eq!(offers, &[ShopOffer::Life { lives: 1 }]);

        // A second slot has nothing left to offer
        level.selection_choices = 2;
        assert!(matches!(
            session.roll(&level, 0.0),
            Err(ShopError::NoOptions { .. })
        ));
    }

    #[test]
    fn test_lock_keeps_offers() {
        let level = level();
        let mut session = ShopSession::new(5);
        let first = session.roll(&level, 0.0).unwrap().to_vec();
        let draws = session.generator().draw_count();

        session.lock();
        assert_eq!(session.roll(&level, 0.0).unwrap(), first.as_slice());
        assert_eq!(session.generator().draw_count(), draws);

        session.unlock();
        session.roll(&level, 0.0).unwrap();
        assert!(session.generator().draw_count() > draws);
    }

    #[test]
    fn test_save_restores_open_selection() {
        let level = level();
        let mut session = ShopSession::new(-1234);
        session.roll(&level, 0.0).unwrap();
        session.purchase(1).unwrap();
        let open = session.roll(&level, 3.0).unwrap().to_vec();

        let save = session.to_save();
        let mut resumed = ShopSession::from_save(&save);
        assert_eq!(resumed.purchases(), 1);
        assert_eq!(resumed.owned_turrets(), session.owned_turrets());
        assert_eq!(resumed.roll(&level, 3.0).unwrap(), open.as_slice());
        assert_eq!(resumed.generator().state(), session.generator().state());
    }
}
