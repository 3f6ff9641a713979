use crate::adjustments::{rebalance_blunt, tweak_ammo_damage};
use crate::candidates::{CandidateSetBuilder, CandidateSnapshot};
use crate::carriers::{CarrierRetrofitter, RetrofitReport};
use crate::category::CategoryRegistrar;
use crate::config::RebalanceConfig;
use crate::materials::MaterialCatalog;
use crate::plates::PlateFactory;
use crate::tables::Database;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub plates: usize,
    pub retrofit: RetrofitReport,
    pub blunt_rebalanced: usize,
    pub ammo_tweaked: usize,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        let r = &self.retrofit;
        let mut out = String::new();
        out.push_str(&format!("plates generated: {}\n", self.plates));
        out.push_str(&format!(
            "carriers retrofitted: {} torso, {} full ({} low profile)\n",
            r.torso_carriers, r.full_carriers, r.low_profile
        ));
        out.push_str(&format!(
            "legacy integrated armor: {}, soft armor reinforced: {}\n",
            r.legacy, r.integrated_soft_armor
        ));
        out.push_str(&format!(
            "headwear: {}, visors: {}, armored equipment: {}\n",
            r.headwear, r.visors, r.armored_equipment
        ));
        out.push_str(&format!("blunt rebalanced: {}\n", self.blunt_rebalanced));
        out.push_str(&format!("ammo tweaked: {}\n", self.ammo_tweaked));
        out
    }
}

/// Runs every stage in order. Stops at the first failure, leaving whatever
/// was already written in place.
pub fn generate(db: &mut Database, config: &RebalanceConfig) -> Result<GenerationReport> {
    let gen = &config.generation_config;
    let catalog = MaterialCatalog::from_config(config);

    if gen.change_material_destructibility {
        catalog.tweak_destructibility(&mut db.globals)?;
    }

    let registrar = CategoryRegistrar::new(&gen.languages);
    registrar.register_category(db);

    let candidates = generate_plates(db, config, &catalog)?;

    let retrofit = CarrierRetrofitter::new(config, &candidates).retrofit_all(db)?;

    registrar.register_container(db, &candidates)?;

    let blunt_rebalanced = rebalance_blunt(db, &candidates);
    let ammo_tweaked = if gen.tweak_ammo_damage {
        tweak_ammo_damage(db)
    } else {
        0
    };

    Ok(GenerationReport {
        plates: candidates.plate_count(),
        retrofit,
        blunt_rebalanced,
        ammo_tweaked,
    })
}

fn generate_plates(
    db: &mut Database,
    config: &RebalanceConfig,
    catalog: &MaterialCatalog,
) -> Result<CandidateSnapshot> {
    let bots = &config.bot_gen_config;
    let mut builder = CandidateSetBuilder::new(bots.max_scav_plate_level, bots.min_boss_plate_level);
    PlateFactory::new(config, catalog).generate(db, &mut builder)?;
    Ok(builder.finalize())
}

/// The guarded entry point: a failure in any stage is logged and swallowed
/// so the host can carry on with a partially reworked database.
pub fn run_pipeline(db: &mut Database, config: &RebalanceConfig) -> Option<GenerationReport> {
    log::info!("Generating armor plates");
    let outcome = match generate(db, config) {
        Ok(report) => Some(report),
        Err(err) => {
            log::error!("Unable to generate, stopped early: {err}");
            None
        }
    };
    log::info!("Done generating");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PLATE_CONTAINER, PLATE_TEMPLATE};
    use crate::test_support::{fixture_database, HEAVY_VEST};

    #[test]
    fn full_run_reports_every_stage() {
        let mut db = fixture_database();
        let report = run_pipeline(&mut db, &RebalanceConfig::default()).unwrap();
        assert!(report.plates > 0);
        assert_eq!(report.retrofit.torso_carriers, 1);
        assert_eq!(report.retrofit.full_carriers, 1);
        assert_eq!(report.ammo_tweaked, 0);
        assert!(db.items.contains_key(PLATE_CONTAINER));
        assert!(report.summary().contains("plates generated"));
    }

    #[test]
    fn failure_keeps_partial_mutations() {
        let mut db = fixture_database();
        db.items.remove(PLATE_TEMPLATE);
        let vest_durability = db.items[HEAVY_VEST].props.durability;

        assert!(run_pipeline(&mut db, &RebalanceConfig::default()).is_none());

        assert!(db.handbook.categories.iter().any(|c| c.id == crate::ids::PLATE_CATEGORY));
        assert_eq!(db.items[HEAVY_VEST].props.durability, vest_durability);
        assert!(!db.items.contains_key(PLATE_CONTAINER));
    }
}
