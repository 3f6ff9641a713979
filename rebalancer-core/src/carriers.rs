//! Classification and retrofit of pre-existing armor items.

use serde_json::Map;

use crate::bots::BotLoadoutWeighter;
use crate::candidates::{CandidateSnapshot, CandidateTier};
use crate::config::RebalanceConfig;
use crate::economy::EconomySync;
use crate::ids::{
    BASELINE_MATERIAL, PARENT_ARMORED_EQUIPMENT, PARENT_ARMOR_VEST, PARENT_CHEST_RIG, PARENT_HEADWEAR,
    PARENT_VISORS, PLATE_CONTAINER, SLOT_PROTO,
};
use crate::overrides::{legacy_override, low_profile_override};
use crate::plates::Coverage;
use crate::tables::{Database, ItemProps, Slot, SlotFilter, SlotProps, TemplateItem, Vec3};
use crate::{RebalancerError, Result};

const ARMORED_EQUIPMENT_DURABILITY: f64 = 1.25;
const INTEGRATED_SOFT_DURABILITY: f64 = 2.0;
const REPAIR_COST_DIVISOR: f64 = 5.0;
const HEAVY_CARRIER_CLASS: u32 = 3;
const LIGHT_CARRIER_CLASS: u32 = 2;
const CARRIER_BLUNT_MULTIPLIER: f64 = 1.5;
const CARRIER_PENALTY_DIVISOR: f64 = 2.0;
/// Share of a carrier's weight left once its built-in armor is gone.
const WEIGHT_RETAIN: f64 = 0.2;
/// Price factor for a carrier sold as an empty shell.
const SHELL_PRICE_FACTOR: f64 = 0.3;

const VISOR_CLASS: u32 = 1;
const VISOR_DURABILITY_MIN: f64 = 10.0;
const VISOR_DURABILITY_SPAN: f64 = 20.0;
const VISOR_RICOCHET: Vec3 = Vec3 {
    x: 0.8,
    y: 0.6,
    z: 45.0,
};

/// What a vest or rig looks like before retrofit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VestProfile {
    pub coverage: Coverage,
    pub has_arms: bool,
    pub heavy: bool,
    pub is_vest: bool,
    pub soft_armor: bool,
}

/// Item kinds the rework distinguishes, decided once per item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Plate,
    Container,
    Headwear { zone_count: usize },
    Visor { blindness_protection: f64 },
    ArmoredEquipment,
    VestOrRig(VestProfile),
    NotArmor,
}

pub fn classify(item: &TemplateItem, candidates: &CandidateSnapshot) -> ItemKind {
    let props = &item.props;
    let class = props.class();
    let parent = item.parent.as_str();

    if candidates.is_generated(&item.id) {
        return ItemKind::Plate;
    }
    if item.id == PLATE_CONTAINER {
        return ItemKind::Container;
    }

    match parent {
        PARENT_HEADWEAR if class > 0 => ItemKind::Headwear {
            zone_count: props.head_segments.as_ref().map_or(0, Vec::len),
        },
        PARENT_VISORS if class == 0 => match props.blindness_protection {
            Some(blindness_protection) => ItemKind::Visor { blindness_protection },
            None => ItemKind::NotArmor,
        },
        PARENT_ARMORED_EQUIPMENT if class > 0 && !item.id.to_ascii_lowercase().contains("plate") => {
            ItemKind::ArmoredEquipment
        }
        PARENT_ARMOR_VEST | PARENT_CHEST_RIG if class > 0 => ItemKind::VestOrRig(VestProfile {
            coverage: if props.has_zone("Stomach") {
                Coverage::Full
            } else {
                Coverage::Torso
            },
            has_arms: props.has_zone("LeftArm"),
            heavy: props.armor_type.as_deref() == Some("Heavy"),
            is_vest: parent == PARENT_ARMOR_VEST,
            soft_armor: props.armor_material.as_deref() == Some(BASELINE_MATERIAL),
        }),
        _ => ItemKind::NotArmor,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetrofitOutcome {
    Skipped,
    Headwear,
    Visor,
    ArmoredEquipment,
    IntegratedSoftArmor,
    Legacy,
    Carrier { coverage: Coverage, low_profile: bool },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrofitReport {
    pub headwear: usize,
    pub visors: usize,
    pub armored_equipment: usize,
    pub integrated_soft_armor: usize,
    pub legacy: usize,
    pub torso_carriers: usize,
    pub full_carriers: usize,
    pub low_profile: usize,
}

impl RetrofitReport {
    fn record(&mut self, outcome: RetrofitOutcome) {
        match outcome {
            RetrofitOutcome::Skipped => {}
            RetrofitOutcome::Headwear => self.headwear += 1,
            RetrofitOutcome::Visor => self.visors += 1,
            RetrofitOutcome::ArmoredEquipment => self.armored_equipment += 1,
            RetrofitOutcome::IntegratedSoftArmor => self.integrated_soft_armor += 1,
            RetrofitOutcome::Legacy => self.legacy += 1,
            RetrofitOutcome::Carrier { coverage, low_profile } => {
                match coverage {
                    Coverage::Torso => self.torso_carriers += 1,
                    Coverage::Full => self.full_carriers += 1,
                }
                if low_profile {
                    self.low_profile += 1;
                }
            }
        }
    }
}

pub struct CarrierRetrofitter<'a> {
    config: &'a RebalanceConfig,
    candidates: &'a CandidateSnapshot,
    economy: EconomySync,
}

impl<'a> CarrierRetrofitter<'a> {
    /// Takes the frozen candidate sets: retrofit can only start once plate
    /// generation has finished.
    pub fn new(config: &'a RebalanceConfig, candidates: &'a CandidateSnapshot) -> Self {
        Self {
            config,
            candidates,
            economy: EconomySync::new(),
        }
    }

    pub fn retrofit_all(&mut self, db: &mut Database) -> Result<RetrofitReport> {
        let mut report = RetrofitReport::default();
        let ids: Vec<String> = db.items.keys().cloned().collect();
        for id in ids {
            let outcome = self.retrofit(db, &id)?;
            report.record(outcome);
        }
        log::info!(
            "Retrofitted {} torso and {} full carriers, {} headwear, {} visors",
            report.torso_carriers,
            report.full_carriers,
            report.headwear,
            report.visors
        );
        Ok(report)
    }

    pub fn retrofit(&mut self, db: &mut Database, id: &str) -> Result<RetrofitOutcome> {
        let kind = classify(db.item(id)?, self.candidates);

        let outcome = match kind {
            ItemKind::Plate | ItemKind::Container | ItemKind::NotArmor => RetrofitOutcome::Skipped,
            ItemKind::Headwear { zone_count } => {
                let factor = self.config.generation_config.headwear_durability.factor(zone_count);
                item_mut(db, id)?.props.scale_durability(factor);
                log::info!("Tweaked headwear {}", id);
                RetrofitOutcome::Headwear
            }
            ItemKind::Visor { blindness_protection } => {
                armor_visor(&mut item_mut(db, id)?.props, blindness_protection);
                log::info!("Armored visor {}", id);
                RetrofitOutcome::Visor
            }
            ItemKind::ArmoredEquipment => {
                item_mut(db, id)?.props.scale_durability(ARMORED_EQUIPMENT_DURABILITY);
                log::info!("Tweaked armored equipment {}", id);
                RetrofitOutcome::ArmoredEquipment
            }
            ItemKind::VestOrRig(profile) => self.retrofit_carrier(db, id, profile)?,
        };
        Ok(outcome)
    }

    fn retrofit_carrier(&mut self, db: &mut Database, id: &str, profile: VestProfile) -> Result<RetrofitOutcome> {
        if self.config.generation_config.ignore_integrated_armors && profile.soft_armor {
            let item = item_mut(db, id)?;
            item.props.scale_durability(INTEGRATED_SOFT_DURABILITY);
            return Ok(RetrofitOutcome::IntegratedSoftArmor);
        }

        {
            let props = &mut item_mut(db, id)?.props;
            props.repair_cost = props.repair_cost.map(|cost| cost / REPAIR_COST_DIVISOR);
        }

        if let Some(legacy) = legacy_override(id) {
            item_mut(db, id)?.props.set_durability(legacy.durability);
            self.economy.rescale(db, id, legacy.price_factor)?;
            log::info!("Kept integrated armor {} at durability {}", id, legacy.durability);
            return Ok(RetrofitOutcome::Legacy);
        }

        let candidates = self.candidates;
        let coverage = profile.coverage;
        let plates = candidates.get(CandidateTier::All, coverage);
        if plates.is_empty() {
            return Err(RebalancerError::EmptyCandidateSet(match coverage {
                Coverage::Torso => "torso",
                Coverage::Full => "full",
            }));
        }

        let low_profile = low_profile_override(id);
        {
            let item = item_mut(db, id)?;
            let props = &mut item.props;
            if profile.is_vest {
                props.merges_with_children = Some(true);
            }
            props.armor_material = Some(BASELINE_MATERIAL.to_string());
            props.slots = Some(vec![plate_slot(id, coverage, plates)]);

            match low_profile {
                Some(o) => {
                    props.ergonomic_penalty = Some(o.ergonomic_penalty);
                    props.speed_penalty = Some(o.speed_penalty);
                    props.mouse_penalty = Some(o.mouse_penalty);
                    props.armor_class = Some(o.armor_class);
                    props.set_durability(o.durability);
                }
                None => apply_generic_curve(props, profile),
            }

            props.weight = props.weight.map(|w| w * WEIGHT_RETAIN);
        }

        self.economy.rescale(db, id, SHELL_PRICE_FACTOR)?;

        BotLoadoutWeighter::new(&self.config.bot_gen_config, candidates).apply_all(
            db.bots.values_mut(),
            id,
            coverage,
        );

        log::info!("Retrofitted carrier {} ({:?})", id, coverage);
        Ok(RetrofitOutcome::Carrier {
            coverage,
            low_profile: low_profile.is_some(),
        })
    }
}

fn item_mut<'d>(db: &'d mut Database, id: &str) -> Result<&'d mut TemplateItem> {
    db.items
        .get_mut(id)
        .ok_or_else(|| RebalancerError::MissingItem(id.to_string()))
}

fn apply_generic_curve(props: &mut ItemProps, profile: VestProfile) {
    let class = if profile.heavy || profile.has_arms {
        HEAVY_CARRIER_CLASS
    } else {
        LIGHT_CARRIER_CLASS
    };
    props.armor_class = Some(class);
    props.scale_durability(class as f64);
    props.blunt_throughput = props.blunt_throughput.map(|b| b * CARRIER_BLUNT_MULTIPLIER);
    props.ergonomic_penalty = props.ergonomic_penalty.map(|p| p / CARRIER_PENALTY_DIVISOR);
    props.speed_penalty = props.speed_penalty.map(|p| p / CARRIER_PENALTY_DIVISOR);
    props.mouse_penalty = props.mouse_penalty.map(|p| p / CARRIER_PENALTY_DIVISOR);
}

fn armor_visor(props: &mut ItemProps, blindness_protection: f64) {
    let durability = (VISOR_DURABILITY_MIN + VISOR_DURABILITY_SPAN * blindness_protection.clamp(0.0, 1.0)).round();
    props.armor_class = Some(VISOR_CLASS);
    props.set_durability(durability);
    props.ricochet_params = Some(VISOR_RICOCHET);
    if props.head_segments.is_none() {
        props.head_segments = Some(vec!["Eyes".to_string()]);
    }
    if props.armor_material.is_none() {
        props.armor_material = Some("Glass".to_string());
    }
}

fn plate_slot(carrier: &str, coverage: Coverage, plates: &[String]) -> Slot {
    let suffix = match coverage {
        Coverage::Torso => "mainPlateSlot",
        Coverage::Full => "mainFullPlateSlot",
    };
    Slot {
        name: coverage.slot_name().to_string(),
        id: format!("{carrier}_{suffix}"),
        parent: carrier.to_string(),
        props: SlotProps {
            filters: vec![SlotFilter {
                filter: plates.to_vec(),
                extra: Map::new(),
            }],
            extra: Map::new(),
        },
        required: false,
        merge_slot_with_children: true,
        proto: SLOT_PROTO.to_string(),
        extra: Map::new(),
    }
}
