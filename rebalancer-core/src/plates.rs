//! Plate generation: one chest plate and one full-size plate per
//! (material, class) pair that the policy does not skip.

use serde::{Deserialize, Serialize};

use crate::candidates::CandidateSetBuilder;
use crate::config::{PlatePolicy, RebalanceConfig};
use crate::economy::{publish_offer, register_price, OfferTerms};
use crate::ids::{
    full_prefab, material_color, material_tag, torso_prefab, PARENT_ARMORED_EQUIPMENT, PLATE_CATEGORY,
    PLATE_TEMPLATE, PLATE_TRADER, SLOT_FULL_PLATE, SLOT_TORSO_PLATE,
};
use crate::locale::{plate_texts, write_item_texts};
use crate::materials::{Material, MaterialCatalog};
use crate::tables::{Database, TemplateItem};
use crate::{RebalancerError, Result};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Coverage {
    /// Chest only.
    Torso,
    /// Chest and stomach.
    Full,
}

impl Coverage {
    pub fn zones(self) -> Vec<String> {
        match self {
            Coverage::Torso => vec!["Chest".to_string()],
            Coverage::Full => vec!["Chest".to_string(), "Stomach".to_string()],
        }
    }

    fn id_part(self) -> &'static str {
        match self {
            Coverage::Torso => "Chest",
            Coverage::Full => "FullPlate",
        }
    }

    /// Carrier slot that holds plates of this coverage.
    pub fn slot_name(self) -> &'static str {
        match self {
            Coverage::Torso => SLOT_TORSO_PLATE,
            Coverage::Full => SLOT_FULL_PLATE,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArmorType {
    Light,
    Heavy,
}

impl ArmorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArmorType::Light => "Light",
            ArmorType::Heavy => "Heavy",
        }
    }
}

/// Deterministic plate id, e.g. `plate4ChestCeramic` or `plate5FullPlateSteel`.
pub fn plate_id(material: &str, class: u32, coverage: Coverage) -> String {
    format!("plate{}{}{}", class, coverage.id_part(), material_tag(material))
}

pub fn loyalty_level(class: u32) -> u32 {
    match class {
        0..=1 => 0,
        2..=4 => 1,
        5 => 2,
        _ => 3,
    }
}

pub fn buy_restriction(class: u32) -> u32 {
    30 / class.max(1)
}

struct CoverageCoefficients {
    height: u32,
    width: u32,
    weight: f64,
    durability_base: f64,
    speed: f64,
    mouse: f64,
    blunt: f64,
    heavy_above: u32,
    repair: f64,
    price: f64,
    sound: &'static str,
}

const TORSO: CoverageCoefficients = CoverageCoefficients {
    height: 2,
    width: 2,
    weight: 0.3,
    durability_base: 40.0,
    speed: -0.3,
    mouse: -0.2,
    blunt: 1.0,
    heavy_above: 4,
    repair: 30.0,
    price: 3000.0,
    sound: "gear_helmet",
};

const FULL: CoverageCoefficients = CoverageCoefficients {
    height: 3,
    width: 2,
    weight: 0.4,
    durability_base: 55.0,
    speed: -0.4,
    mouse: -0.3,
    blunt: 0.8,
    heavy_above: 3,
    repair: 50.0,
    price: 4500.0,
    sound: "container_case",
};

const DURABILITY_PER_CLASS: f64 = 5.0;

fn coefficients(coverage: Coverage) -> &'static CoverageCoefficients {
    match coverage {
        Coverage::Torso => &TORSO,
        Coverage::Full => &FULL,
    }
}

/// A generated plate's derived statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateVariant {
    pub id: String,
    pub material: String,
    pub armor_class: u32,
    pub coverage: Coverage,
    pub durability: f64,
    pub weight: f64,
    pub speed_penalty: f64,
    pub mouse_penalty: f64,
    pub ergonomic_penalty: f64,
    pub blunt_throughput: f64,
    pub armor_type: ArmorType,
    pub repair_cost: f64,
    pub price: f64,
    pub loyalty_level: u32,
    pub buy_restriction: u32,
}

pub fn derive_variant(
    material: &Material,
    class: u32,
    coverage: Coverage,
    template_weight: f64,
    policy: &PlatePolicy,
) -> PlateVariant {
    let k = coefficients(coverage);
    let c = class as f64;
    let price = k.price * c * material.price_multiplier;

    PlateVariant {
        id: plate_id(&material.name, class, coverage),
        material: material.name.clone(),
        armor_class: class,
        coverage,
        durability: k.durability_base + material.durability_base + c * DURABILITY_PER_CLASS,
        weight: template_weight * c * material.weight_multiplier * k.weight,
        speed_penalty: c * k.speed * material.penalty_multiplier,
        mouse_penalty: c * k.mouse * material.penalty_multiplier,
        ergonomic_penalty: -1.0,
        blunt_throughput: material.blunt_throughput * k.blunt * policy.blunt_factor(&material.name, class),
        armor_type: if class > k.heavy_above {
            ArmorType::Heavy
        } else {
            ArmorType::Light
        },
        repair_cost: k.repair * c * material.price_multiplier,
        price,
        loyalty_level: loyalty_level(class),
        buy_restriction: buy_restriction(class),
    }
}

pub struct PlateFactory<'a> {
    config: &'a RebalanceConfig,
    catalog: &'a MaterialCatalog,
}

impl<'a> PlateFactory<'a> {
    pub fn new(config: &'a RebalanceConfig, catalog: &'a MaterialCatalog) -> Self {
        Self { config, catalog }
    }

    /// Every (material, class, coverage) combination the policy allows, in
    /// generation order.
    pub fn plan(&self, host_materials: &[String]) -> Result<Vec<(&'a Material, u32, Coverage)>> {
        let gen = &self.config.generation_config;
        let policy = &self.config.plate_policy;
        let mut out = Vec::new();

        for name in host_materials {
            if self.catalog.is_excluded(name) {
                continue;
            }
            let material = self.catalog.resolve(name)?;
            for class in gen.min_plate_level..=gen.max_plate_level {
                for coverage in [Coverage::Torso, Coverage::Full] {
                    if !policy.skips(name, class, coverage) {
                        out.push((material, class, coverage));
                    }
                }
            }
        }
        Ok(out)
    }

    pub fn generate(
        &self,
        db: &mut Database,
        candidates: &mut CandidateSetBuilder,
    ) -> Result<Vec<PlateVariant>> {
        let template = db.item(PLATE_TEMPLATE)?.clone();
        let template_weight = template.props.weight.unwrap_or(1.0);
        let host_materials: Vec<String> = db.globals.config.armor_materials.keys().cloned().collect();

        let mut variants = Vec::new();
        for (material, class, coverage) in self.plan(&host_materials)? {
            let variant = derive_variant(material, class, coverage, template_weight, &self.config.plate_policy);
            if !candidates.push(&variant.id, class, coverage) {
                return Err(RebalancerError::DuplicatePlate(variant.id));
            }
            self.register(db, &template, &variant)?;
            log::debug!(
                "Generated plate {} (class {}, durability {}, price {})",
                variant.id,
                variant.armor_class,
                variant.durability,
                variant.price
            );
            variants.push(variant);
        }

        log::info!("Generated {} plates", variants.len());
        Ok(variants)
    }

    fn register(&self, db: &mut Database, template: &TemplateItem, variant: &PlateVariant) -> Result<()> {
        let item = self.build_item(template, variant);
        db.items.insert(variant.id.clone(), item);

        for lang in &self.config.generation_config.languages {
            let texts = plate_texts(lang, &variant.material, variant.armor_class, variant.coverage);
            write_item_texts(db, lang, &variant.id, texts);
        }

        register_price(db, &variant.id, PLATE_CATEGORY, variant.price);
        publish_offer(
            db,
            PLATE_TRADER,
            &variant.id,
            OfferTerms {
                price: variant.price,
                buy_restriction: variant.buy_restriction,
                loyalty_level: variant.loyalty_level,
            },
        )
    }

    fn build_item(&self, template: &TemplateItem, variant: &PlateVariant) -> TemplateItem {
        let k = coefficients(variant.coverage);
        let mut item = template.clone();
        item.id = variant.id.clone();
        item.parent = PARENT_ARMORED_EQUIPMENT.to_string();

        let props = &mut item.props;
        let prefab = match variant.coverage {
            Coverage::Torso => torso_prefab(&variant.material),
            Coverage::Full => full_prefab(&variant.material),
        };
        props.prefab.get_or_insert_with(Default::default).path = prefab.to_string();
        props.height = Some(k.height);
        props.width = Some(k.width);
        props.weight = Some(variant.weight);
        props.armor_class = Some(variant.armor_class);
        props.armor_zone = Some(variant.coverage.zones());
        props.set_durability(variant.durability);
        props.armor_material = Some(variant.material.clone());
        props.speed_penalty = Some(variant.speed_penalty);
        props.mouse_penalty = Some(variant.mouse_penalty);
        props.ergonomic_penalty = Some(variant.ergonomic_penalty);
        props.blunt_throughput = Some(variant.blunt_throughput);
        props.armor_type = Some(variant.armor_type.as_str().to_string());
        props.repair_cost = Some(variant.repair_cost);
        props.loot_experience = Some(variant.armor_class);
        props.item_sound = Some(k.sound.to_string());

        if self.config.generation_config.tweak_background_color {
            if let Some(color) = material_color(&variant.material) {
                props.background_color = Some(color.to_string());
            }
        }
        item
    }
}
