use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::plates::Coverage;
use crate::{RebalancerError, Result};

/// Mod configuration, shaped like the `config.json` shipped next to the mod.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RebalanceConfig {
    #[serde(default)]
    pub generation_config: GenerationConfig,
    #[serde(default)]
    pub bot_gen_config: BotGenConfig,
    #[serde(default = "default_materials")]
    pub materials_config: BTreeMap<String, MaterialConfig>,
    #[serde(default)]
    pub plate_policy: PlatePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GenerationConfig {
    pub ignore_integrated_armors: bool,
    pub change_material_destructibility: bool,
    pub tweak_background_color: bool,
    pub tweak_ammo_damage: bool,
    pub min_plate_level: u32,
    pub max_plate_level: u32,
    pub headwear_durability: HeadwearDurability,
    pub languages: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ignore_integrated_armors: false,
            change_material_destructibility: true,
            tweak_background_color: true,
            tweak_ammo_damage: false,
            min_plate_level: 3,
            max_plate_level: 6,
            headwear_durability: HeadwearDurability::default(),
            languages: vec!["en".to_string(), "ch".to_string()],
        }
    }
}

/// How helmet durability is raised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Mode")]
pub enum HeadwearDurability {
    /// Durability times a flat multiplier.
    Fixed {
        #[serde(rename = "Multiplier")]
        multiplier: f64,
    },
    /// Durability times `1 + per_zone * protected head segments`.
    PerZone {
        #[serde(rename = "PerZone")]
        per_zone: f64,
    },
}

impl Default for HeadwearDurability {
    fn default() -> Self {
        HeadwearDurability::Fixed { multiplier: 1.1 }
    }
}

impl HeadwearDurability {
    pub fn factor(&self, zone_count: usize) -> f64 {
        match *self {
            HeadwearDurability::Fixed { multiplier } => multiplier,
            HeadwearDurability::PerZone { per_zone } => 1.0 + per_zone * zone_count as f64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BotGenConfig {
    pub max_scav_plate_level: u32,
    pub min_boss_plate_level: Option<u32>,
    pub base_chest_plate_chance: f64,
    pub base_full_plate_chance: f64,
    pub boss_chest_plate_chance: f64,
    pub boss_full_plate_chance: f64,
    pub scav_chest_plate_chance: f64,
    pub scav_full_plate_chance: f64,
}

impl Default for BotGenConfig {
    fn default() -> Self {
        Self {
            max_scav_plate_level: 4,
            min_boss_plate_level: None,
            base_chest_plate_chance: 0.6,
            base_full_plate_chance: 0.5,
            boss_chest_plate_chance: 0.95,
            boss_full_plate_chance: 0.9,
            scav_chest_plate_chance: 0.2,
            scav_full_plate_chance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MaterialConfig {
    pub durability_base: f64,
    pub weight_multiplier: f64,
    pub penalty_multiplier: f64,
    pub blunt_throughput: f64,
    pub price_multiplier: f64,
    pub destructibility: f64,
    pub explosion_destructibility: f64,
}

fn material(
    durability_base: f64,
    weight_multiplier: f64,
    penalty_multiplier: f64,
    blunt_throughput: f64,
    price_multiplier: f64,
    destructibility: f64,
    explosion_destructibility: f64,
) -> MaterialConfig {
    MaterialConfig {
        durability_base,
        weight_multiplier,
        penalty_multiplier,
        blunt_throughput,
        price_multiplier,
        destructibility,
        explosion_destructibility,
    }
}

fn default_materials() -> BTreeMap<String, MaterialConfig> {
    [
        ("UHMWPE", material(5.0, 0.7, 0.8, 0.35, 1.4, 0.35, 0.25)),
        ("Aramid", material(0.0, 0.6, 0.6, 0.3, 0.8, 0.25, 0.2)),
        ("Ceramic", material(10.0, 1.0, 1.0, 0.5, 1.0, 0.8, 0.6)),
        ("Titan", material(20.0, 0.9, 0.9, 0.25, 1.6, 0.55, 0.45)),
        ("Aluminium", material(15.0, 0.8, 0.9, 0.3, 0.9, 0.6, 0.5)),
        ("Combined", material(15.0, 0.9, 0.9, 0.4, 1.3, 0.5, 0.4)),
        ("ArmoredSteel", material(30.0, 1.5, 1.3, 0.2, 0.7, 0.7, 0.5)),
        ("Glass", material(0.0, 1.0, 1.0, 0.5, 1.0, 0.8, 0.8)),
    ]
    .into_iter()
    .map(|(name, cfg)| (name.to_string(), cfg))
    .collect()
}

/// Material/class combinations that never produce a plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkipRule {
    pub material: String,
    pub min_class: u32,
    pub max_class: u32,
    /// `None` skips both coverage kinds.
    #[serde(default)]
    pub coverage: Option<Coverage>,
}

impl SkipRule {
    pub fn new(material: &str, min_class: u32, max_class: u32) -> Self {
        Self {
            material: material.to_string(),
            min_class,
            max_class,
            coverage: None,
        }
    }

    pub fn matches(&self, material: &str, class: u32, coverage: Coverage) -> bool {
        self.material == material
            && (self.min_class..=self.max_class).contains(&class)
            && self.coverage.map_or(true, |c| c == coverage)
    }
}

/// Plate blunt throughput is raised for a band of mid classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BluntBand {
    pub min_class: u32,
    pub max_class: u32,
    pub multiplier: f64,
    #[serde(default)]
    pub exempt_materials: Vec<String>,
}

impl BluntBand {
    pub fn factor(&self, material: &str, class: u32) -> f64 {
        let in_band = (self.min_class..=self.max_class).contains(&class);
        if in_band && !self.exempt_materials.iter().any(|m| m == material) {
            self.multiplier
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlatePolicy {
    pub excluded_materials: Vec<String>,
    pub skip: Vec<SkipRule>,
    pub blunt_band: Option<BluntBand>,
}

impl Default for PlatePolicy {
    fn default() -> Self {
        Self {
            // Glass never makes plates; Aramid is held back for arm plates.
            excluded_materials: vec!["Glass".to_string(), "Aramid".to_string()],
            skip: vec![
                SkipRule::new("Aluminium", 5, 6),
                SkipRule::new("UHMWPE", 6, 6),
                SkipRule::new("Titan", 3, 3),
            ],
            blunt_band: Some(BluntBand {
                min_class: 3,
                max_class: 5,
                multiplier: 1.25,
                exempt_materials: vec!["ArmoredSteel".to_string(), "Titan".to_string()],
            }),
        }
    }
}

impl PlatePolicy {
    pub fn skips(&self, material: &str, class: u32, coverage: Coverage) -> bool {
        self.skip.iter().any(|rule| rule.matches(material, class, coverage))
    }

    pub fn blunt_factor(&self, material: &str, class: u32) -> f64 {
        self.blunt_band
            .as_ref()
            .map_or(1.0, |band| band.factor(material, class))
    }
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            generation_config: GenerationConfig::default(),
            bot_gen_config: BotGenConfig::default(),
            materials_config: default_materials(),
            plate_policy: PlatePolicy::default(),
        }
    }
}

impl RebalanceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RebalanceConfig =
            serde_json::from_str(&text).map_err(|source| RebalancerError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let gen = &self.generation_config;
        if gen.min_plate_level < 1 || gen.max_plate_level > 6 || gen.min_plate_level > gen.max_plate_level {
            return Err(RebalancerError::Config(format!(
                "plate levels must satisfy 1 <= MinPlateLevel <= MaxPlateLevel <= 6, got {}..={}",
                gen.min_plate_level, gen.max_plate_level
            )));
        }
        if gen.languages.is_empty() {
            return Err(RebalancerError::Config(
                "at least one language is required".to_string(),
            ));
        }

        let bots = &self.bot_gen_config;
        let chances = [
            ("BaseChestPlateChance", bots.base_chest_plate_chance),
            ("BaseFullPlateChance", bots.base_full_plate_chance),
            ("BossChestPlateChance", bots.boss_chest_plate_chance),
            ("BossFullPlateChance", bots.boss_full_plate_chance),
            ("ScavChestPlateChance", bots.scav_chest_plate_chance),
            ("ScavFullPlateChance", bots.scav_full_plate_chance),
        ];
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(RebalancerError::Config(format!(
                    "{name} must be a probability in [0, 1], got {chance}"
                )));
            }
        }

        if bots.max_scav_plate_level < gen.min_plate_level {
            return Err(RebalancerError::Config(format!(
                "MaxScavPlateLevel {} is below MinPlateLevel {}, scavs would have no plates",
                bots.max_scav_plate_level, gen.min_plate_level
            )));
        }
        if let Some(min_boss) = bots.min_boss_plate_level {
            if min_boss > gen.max_plate_level {
                return Err(RebalancerError::Config(format!(
                    "MinBossPlateLevel {} is above MaxPlateLevel {}, bosses would have no plates",
                    min_boss, gen.max_plate_level
                )));
            }
        }

        for (name, m) in &self.materials_config {
            let coefficients = [
                m.durability_base,
                m.weight_multiplier,
                m.penalty_multiplier,
                m.blunt_throughput,
                m.price_multiplier,
                m.destructibility,
                m.explosion_destructibility,
            ];
            if coefficients.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(RebalancerError::Config(format!(
                    "material {name} has a negative or non-finite coefficient"
                )));
            }
        }

        if let HeadwearDurability::Fixed { multiplier } = gen.headwear_durability {
            if multiplier <= 0.0 {
                return Err(RebalancerError::Config(
                    "headwear durability multiplier must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}
