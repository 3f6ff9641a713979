use std::collections::BTreeMap;

use crate::candidates::{CandidateSnapshot, CandidateTier};
use crate::config::BotGenConfig;
use crate::ids::{SCAV_BODY, SLOT_FULL_PLATE, SLOT_TORSO_PLATE};
use crate::plates::Coverage;
use crate::tables::BotType;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BotTier {
    Scav,
    Boss,
    Regular,
}

/// Bosses carry no last names; scavengers wear the scav body.
pub fn bot_tier(bot: &BotType) -> BotTier {
    if bot.last_name.is_empty() {
        BotTier::Boss
    } else if bot.appearance.body.contains_key(SCAV_BODY) {
        BotTier::Scav
    } else {
        BotTier::Regular
    }
}

fn percent(chance: f64) -> u32 {
    (chance * 100.0).round() as u32
}

pub struct BotLoadoutWeighter<'a> {
    config: &'a BotGenConfig,
    candidates: &'a CandidateSnapshot,
}

impl<'a> BotLoadoutWeighter<'a> {
    pub fn new(config: &'a BotGenConfig, candidates: &'a CandidateSnapshot) -> Self {
        Self { config, candidates }
    }

    /// (chest plate, full plate) chances for a tier, in [0, 1].
    pub fn chances(&self, tier: BotTier) -> (f64, f64) {
        let c = self.config;
        match tier {
            BotTier::Boss => (c.boss_chest_plate_chance, c.boss_full_plate_chance),
            BotTier::Scav => (c.scav_chest_plate_chance, c.scav_full_plate_chance),
            BotTier::Regular => (c.base_chest_plate_chance, c.base_full_plate_chance),
        }
    }

    pub fn candidate_tier(&self, tier: BotTier) -> CandidateTier {
        match tier {
            BotTier::Scav => CandidateTier::Scav,
            BotTier::Boss if self.candidates.has_boss_tier() => CandidateTier::Boss,
            BotTier::Boss | BotTier::Regular => CandidateTier::All,
        }
    }

    /// Sets plate chances on the profile and the plates it may roll for
    /// `carrier`.
    pub fn apply(&self, bot: &mut BotType, carrier: &str, coverage: Coverage) -> BotTier {
        let tier = bot_tier(bot);
        let (chest, full) = self.chances(tier);
        bot.chances.mods.insert(SLOT_TORSO_PLATE.to_string(), percent(chest));
        bot.chances.mods.insert(SLOT_FULL_PLATE.to_string(), percent(full));

        let mut plates = self.candidates.get(self.candidate_tier(tier), coverage);
        if plates.is_empty() {
            log::warn!("No {:?} plates for {:?} bots, using the full plate list", coverage, tier);
            plates = self.candidates.get(CandidateTier::All, coverage);
        }
        let plates = plates.to_vec();
        let mut slots = BTreeMap::new();
        slots.insert(coverage.slot_name().to_string(), plates);
        bot.inventory.mods.insert(carrier.to_string(), slots);
        tier
    }

    pub fn apply_all<'b, I>(&self, bots: I, carrier: &str, coverage: Coverage)
    where
        I: IntoIterator<Item = &'b mut BotType>,
    {
        for bot in bots {
            self.apply(bot, carrier, coverage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidateSetBuilder;
    use serde_json::Value;

    fn snapshot(boss_min: Option<u32>) -> CandidateSnapshot {
        let mut builder = CandidateSetBuilder::new(3, boss_min);
        for class in 3..=6 {
            builder.push(&format!("plate{class}ChestCeramic"), class, Coverage::Torso);
            builder.push(&format!("plate{class}FullPlateCeramic"), class, Coverage::Full);
        }
        builder.finalize()
    }

    fn bot(last_names: &[&str], scav_body: bool) -> BotType {
        let mut bot = BotType::default();
        bot.last_name = last_names.iter().map(|s| s.to_string()).collect();
        if scav_body {
            bot.appearance.body.insert(SCAV_BODY.to_string(), Value::from(1));
        }
        bot
    }

    #[test]
    fn tiers_follow_profile_markers() {
        assert_eq!(bot_tier(&bot(&[], false)), BotTier::Boss);
        assert_eq!(bot_tier(&bot(&[], true)), BotTier::Boss);
        assert_eq!(bot_tier(&bot(&["Ivanov"], true)), BotTier::Scav);
        assert_eq!(bot_tier(&bot(&["Smith"], false)), BotTier::Regular);
    }

    #[test]
    fn scavs_roll_from_the_scav_set() {
        let config = BotGenConfig::default();
        let snap = snapshot(None);
        let weighter = BotLoadoutWeighter::new(&config, &snap);
        let mut scav = bot(&["Ivanov"], true);

        weighter.apply(&mut scav, "vest", Coverage::Full);

        assert_eq!(scav.chances.mods[SLOT_TORSO_PLATE], 20);
        assert_eq!(scav.chances.mods[SLOT_FULL_PLATE], 10);
        assert_eq!(
            scav.inventory.mods["vest"][SLOT_FULL_PLATE],
            vec!["plate3ChestCeramic".to_string(), "plate3FullPlateCeramic".to_string()]
        );
    }

    #[test]
    fn empty_tier_lists_fall_back_to_all_plates() {
        let config = BotGenConfig::default();
        let mut builder = CandidateSetBuilder::new(2, None);
        builder.push("plate4ChestCeramic", 4, Coverage::Torso);
        let snap = builder.finalize();
        assert!(snap.get(CandidateTier::Scav, Coverage::Torso).is_empty());

        let mut scav = bot(&["Ivanov"], true);
        BotLoadoutWeighter::new(&config, &snap).apply(&mut scav, "vest", Coverage::Torso);

        assert_eq!(scav.chances.mods[SLOT_TORSO_PLATE], 20);
        assert_eq!(
            scav.inventory.mods["vest"][SLOT_TORSO_PLATE],
            vec!["plate4ChestCeramic".to_string()]
        );
    }

    #[test]
    fn bosses_use_the_boss_set_only_when_configured() {
        let config = BotGenConfig::default();
        let mut boss = bot(&[], false);

        let plain = snapshot(None);
        BotLoadoutWeighter::new(&config, &plain).apply(&mut boss, "rig", Coverage::Torso);
        assert_eq!(boss.inventory.mods["rig"][SLOT_TORSO_PLATE].len(), 4);
        assert_eq!(boss.chances.mods[SLOT_TORSO_PLATE], 95);

        let tiered = snapshot(Some(6));
        BotLoadoutWeighter::new(&config, &tiered).apply(&mut boss, "rig", Coverage::Torso);
        assert_eq!(boss.inventory.mods["rig"][SLOT_TORSO_PLATE], vec!["plate6ChestCeramic".to_string()]);
    }

    #[test]
    fn regulars_get_base_chances_and_the_full_list() {
        let config = BotGenConfig::default();
        let snap = snapshot(None);
        let mut pmc = bot(&["Smith"], false);
        BotLoadoutWeighter::new(&config, &snap).apply_all([&mut pmc], "vest", Coverage::Torso);
        assert_eq!(pmc.chances.mods[SLOT_TORSO_PLATE], 60);
        assert_eq!(pmc.chances.mods[SLOT_FULL_PLATE], 50);
        assert_eq!(pmc.inventory.mods["vest"][SLOT_TORSO_PLATE].len(), 4);
    }
}
