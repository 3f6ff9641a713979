//! Table-wide passes that run after carriers and plates are in place.

use crate::candidates::CandidateSnapshot;
use crate::ids::{PARENT_AMMO, PARENT_ARMORED_EQUIPMENT, PARENT_FACECOVER, PARENT_HEADWEAR};
use crate::tables::Database;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BluntRule {
    pub parents: &'static [&'static str],
    pub class: u32,
    pub multiplier: f64,
    /// Armor materials the rule leaves alone.
    pub exempt_material: Option<&'static str>,
}

const HEAD: &[&str] = &[PARENT_HEADWEAR, PARENT_FACECOVER];
const EQUIPMENT: &[&str] = &[PARENT_ARMORED_EQUIPMENT];

pub const BLUNT_RULES: &[BluntRule] = &[
    BluntRule { parents: HEAD, class: 3, multiplier: 1.35, exempt_material: None },
    BluntRule { parents: HEAD, class: 4, multiplier: 1.2, exempt_material: None },
    BluntRule { parents: HEAD, class: 5, multiplier: 1.15, exempt_material: None },
    BluntRule { parents: EQUIPMENT, class: 3, multiplier: 1.3, exempt_material: Some("Glass") },
    BluntRule { parents: EQUIPMENT, class: 4, multiplier: 1.2, exempt_material: Some("Glass") },
];

const AMMO_ARMOR_DAMAGE: f64 = 0.9;

fn blunt_rule(parent: &str, class: u32, material: Option<&str>) -> Option<&'static BluntRule> {
    BLUNT_RULES.iter().find(|rule| {
        rule.class == class
            && rule.parents.contains(&parent)
            && !(rule.exempt_material.is_some() && rule.exempt_material == material)
    })
}

/// Raises blunt throughput on head and equipment armor by class. Generated
/// plates already carry their own band and are skipped.
pub fn rebalance_blunt(db: &mut Database, candidates: &CandidateSnapshot) -> usize {
    let mut touched = 0;
    for item in db.items.values_mut() {
        if candidates.is_generated(&item.id) {
            continue;
        }
        let props = &mut item.props;
        let Some(class) = props.armor_class else {
            continue;
        };
        let Some(rule) = blunt_rule(&item.parent, class, props.armor_material.as_deref()) else {
            continue;
        };
        if let Some(blunt) = props.blunt_throughput.as_mut() {
            *blunt *= rule.multiplier;
            touched += 1;
        }
    }
    log::info!("Rebalanced blunt throughput on {} items", touched);
    touched
}

pub fn tweak_ammo_damage(db: &mut Database) -> usize {
    let mut touched = 0;
    for item in db.items.values_mut() {
        if item.parent != PARENT_AMMO {
            continue;
        }
        if let Some(damage) = item.props.armor_damage.as_mut() {
            *damage *= AMMO_ARMOR_DAMAGE;
            touched += 1;
        }
    }
    log::info!("Tweaked armor damage on {} rounds", touched);
    touched
}
