use std::collections::BTreeMap;

use crate::config::RebalanceConfig;
use crate::tables::Globals;
use crate::{RebalancerError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub weight_multiplier: f64,
    pub penalty_multiplier: f64,
    pub blunt_throughput: f64,
    pub durability_base: f64,
    pub price_multiplier: f64,
    pub destructibility: f64,
    pub explosion_destructibility: f64,
}

/// Material coefficients resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, Material>,
    excluded: Vec<String>,
}

impl MaterialCatalog {
    pub fn from_config(config: &RebalanceConfig) -> Self {
        let materials = config
            .materials_config
            .iter()
            .map(|(name, m)| {
                let material = Material {
                    name: name.clone(),
                    weight_multiplier: m.weight_multiplier,
                    penalty_multiplier: m.penalty_multiplier,
                    blunt_throughput: m.blunt_throughput,
                    durability_base: m.durability_base,
                    price_multiplier: m.price_multiplier,
                    destructibility: m.destructibility,
                    explosion_destructibility: m.explosion_destructibility,
                };
                (name.clone(), material)
            })
            .collect();

        Self {
            materials,
            excluded: config.plate_policy.excluded_materials.clone(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| RebalancerError::UnknownMaterial(name.to_string()))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|m| m == name)
    }

    /// Overwrites the host's material physics from configuration. Every host
    /// material must be configured.
    pub fn tweak_destructibility(&self, globals: &mut Globals) -> Result<()> {
        for (name, physics) in globals.config.armor_materials.iter_mut() {
            let material = self.resolve(name)?;
            physics.destructibility = material.destructibility;
            physics.explosion_destructibility = material.explosion_destructibility;
            log::info!(
                "Material {} destructibility -> {}, explosion destructibility -> {}",
                name,
                physics.destructibility,
                physics.explosion_destructibility
            );
        }
        Ok(())
    }
}
