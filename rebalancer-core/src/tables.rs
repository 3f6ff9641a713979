//! Host database tables.
//!
//! Only the fields the rework reads or writes are typed; everything else is
//! carried through `extra` so a load/save cycle does not drop data the host
//! still needs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{RebalancerError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_name", default)]
    pub name: String,
    #[serde(rename = "_parent", default)]
    pub parent: String,
    #[serde(rename = "_props", default)]
    pub props: ItemProps,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemProps {
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "Height", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "Width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "Durability", default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<f64>,
    #[serde(rename = "MaxDurability", default, skip_serializing_if = "Option::is_none")]
    pub max_durability: Option<f64>,
    #[serde(
        rename = "armorClass",
        default,
        deserialize_with = "de_armor_class",
        skip_serializing_if = "Option::is_none"
    )]
    pub armor_class: Option<u32>,
    #[serde(rename = "armorZone", default, skip_serializing_if = "Option::is_none")]
    pub armor_zone: Option<Vec<String>>,
    #[serde(rename = "headSegments", default, skip_serializing_if = "Option::is_none")]
    pub head_segments: Option<Vec<String>>,
    #[serde(rename = "ArmorMaterial", default, skip_serializing_if = "Option::is_none")]
    pub armor_material: Option<String>,
    #[serde(rename = "ArmorType", default, skip_serializing_if = "Option::is_none")]
    pub armor_type: Option<String>,
    #[serde(rename = "speedPenaltyPercent", default, skip_serializing_if = "Option::is_none")]
    pub speed_penalty: Option<f64>,
    #[serde(rename = "mousePenalty", default, skip_serializing_if = "Option::is_none")]
    pub mouse_penalty: Option<f64>,
    #[serde(rename = "weaponErgonomicPenalty", default, skip_serializing_if = "Option::is_none")]
    pub ergonomic_penalty: Option<f64>,
    #[serde(rename = "BluntThroughput", default, skip_serializing_if = "Option::is_none")]
    pub blunt_throughput: Option<f64>,
    #[serde(rename = "RepairCost", default, skip_serializing_if = "Option::is_none")]
    pub repair_cost: Option<f64>,
    #[serde(rename = "LootExperience", default, skip_serializing_if = "Option::is_none")]
    pub loot_experience: Option<u32>,
    #[serde(rename = "ItemSound", default, skip_serializing_if = "Option::is_none")]
    pub item_sound: Option<String>,
    #[serde(rename = "BackgroundColor", default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(rename = "MergesWithChildren", default, skip_serializing_if = "Option::is_none")]
    pub merges_with_children: Option<bool>,
    #[serde(rename = "BlindnessProtection", default, skip_serializing_if = "Option::is_none")]
    pub blindness_protection: Option<f64>,
    #[serde(rename = "RicochetParams", default, skip_serializing_if = "Option::is_none")]
    pub ricochet_params: Option<Vec3>,
    #[serde(rename = "ArmorDamage", default, skip_serializing_if = "Option::is_none")]
    pub armor_damage: Option<f64>,
    #[serde(rename = "Prefab", default, skip_serializing_if = "Option::is_none")]
    pub prefab: Option<Prefab>,
    #[serde(rename = "Slots", default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<Slot>>,
    #[serde(rename = "Grids", default, skip_serializing_if = "Option::is_none")]
    pub grids: Option<Vec<Grid>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemProps {
    pub fn class(&self) -> u32 {
        self.armor_class.unwrap_or(0)
    }

    pub fn has_zone(&self, zone: &str) -> bool {
        self.armor_zone
            .as_ref()
            .map_or(false, |zones| zones.iter().any(|z| z == zone))
    }

    /// Writes both durability fields; the host has no separate decay state at
    /// this point.
    pub fn set_durability(&mut self, value: f64) {
        self.durability = Some(value);
        self.max_durability = Some(value);
    }

    pub fn scale_durability(&mut self, factor: f64) {
        let current = self.durability.unwrap_or(0.0);
        self.set_durability(current * factor);
    }
}

/// The host stores armor class as a number, but a few community items carry
/// it as a string or a fractional value. Both are rounded to the nearest class.
fn de_armor_class<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn whole_class(n: f64) -> u32 {
        if n.is_finite() && n > 0.0 {
            n.round() as u32
        } else {
            0
        }
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(n)) => Some(whole_class(n)),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().map(whole_class),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prefab {
    #[serde(default)]
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotFilter {
    #[serde(rename = "Filter", default)]
    pub filter: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotProps {
    #[serde(default)]
    pub filters: Vec<SlotFilter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_parent")]
    pub parent: String,
    #[serde(rename = "_props", default)]
    pub props: SlotProps,
    #[serde(rename = "_required", default)]
    pub required: bool,
    #[serde(rename = "_mergeSlotWithChildren", default)]
    pub merge_slot_with_children: bool,
    #[serde(rename = "_proto", default)]
    pub proto: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    #[serde(rename = "_name", default)]
    pub name: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_props", default)]
    pub props: SlotProps,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Handbook {
    #[serde(rename = "Categories", default)]
    pub categories: Vec<HandbookCategory>,
    #[serde(rename = "Items", default)]
    pub items: Vec<HandbookItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Handbook {
    pub fn price_of(&self, id: &str) -> Option<f64> {
        self.items.iter().find(|entry| entry.id == id).map(|entry| entry.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandbookCategory {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ParentId", default)]
    pub parent_id: Option<String>,
    #[serde(rename = "Icon", default)]
    pub icon: String,
    #[serde(rename = "Color", default)]
    pub color: String,
    #[serde(rename = "Order", default)]
    pub order: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandbookItem {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ParentId")]
    pub parent_id: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assort {
    #[serde(default)]
    pub items: Vec<AssortItem>,
    #[serde(default)]
    pub barter_scheme: BTreeMap<String, Vec<Vec<BarterCost>>>,
    #[serde(default)]
    pub loyal_level_items: BTreeMap<String, u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssortItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_tpl")]
    pub tpl: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "slotId")]
    pub slot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upd: Option<AssortUpd>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssortUpd {
    #[serde(rename = "StackObjectsCount", default, skip_serializing_if = "Option::is_none")]
    pub stack_objects_count: Option<u64>,
    #[serde(rename = "BuyRestrictionMax", default, skip_serializing_if = "Option::is_none")]
    pub buy_restriction_max: Option<u32>,
    #[serde(rename = "UnlimitedCount", default, skip_serializing_if = "Option::is_none")]
    pub unlimited_count: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarterCost {
    #[serde(rename = "_tpl")]
    pub tpl: String,
    pub count: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Trader {
    pub assort: Option<Assort>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotType {
    #[serde(default)]
    pub appearance: BotAppearance,
    #[serde(rename = "lastName", default)]
    pub last_name: Vec<String>,
    #[serde(default)]
    pub chances: BotChances,
    #[serde(default)]
    pub inventory: BotInventory,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotAppearance {
    #[serde(default)]
    pub body: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotChances {
    #[serde(default)]
    pub mods: BTreeMap<String, u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotInventory {
    #[serde(default)]
    pub mods: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Globals {
    #[serde(default)]
    pub config: GlobalsConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalsConfig {
    #[serde(rename = "ArmorMaterials", default)]
    pub armor_materials: BTreeMap<String, ArmorMaterialPhysics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmorMaterialPhysics {
    #[serde(rename = "Destructibility", default)]
    pub destructibility: f64,
    #[serde(rename = "ExplosionDestructibility", default)]
    pub explosion_destructibility: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// All host tables the rework touches.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub globals: Globals,
    pub items: BTreeMap<String, TemplateItem>,
    pub handbook: Handbook,
    pub prices: BTreeMap<String, f64>,
    pub traders: BTreeMap<String, Trader>,
    pub bots: BTreeMap<String, BotType>,
    pub locales: BTreeMap<String, BTreeMap<String, String>>,
}

const GLOBALS_FILE: &str = "globals.json";
const ITEMS_FILE: &str = "templates/items.json";
const HANDBOOK_FILE: &str = "templates/handbook.json";
const PRICES_FILE: &str = "templates/prices.json";
const TRADERS_DIR: &str = "traders";
const ASSORT_FILE: &str = "assort.json";
const BOTS_DIR: &str = "bots/types";
const LOCALES_DIR: &str = "locales/global";

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| RebalancerError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|source| RebalancerError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text)?;
    Ok(())
}

/// Files named `*.json` directly under `dir`, as (stem, path) pairs.
fn json_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    if !dir.exists() {
        return Ok(out);
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().map_or(true, |ext| ext != "json") {
            log::warn!("Ignoring non-JSON file {}", path.display());
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            out.push((stem.to_string(), path.to_path_buf()));
        }
    }
    Ok(out)
}

impl Database {
    pub fn load(root: &Path) -> Result<Self> {
        let globals: Globals = read_json(&root.join(GLOBALS_FILE))?;
        let items: BTreeMap<String, TemplateItem> = read_json(&root.join(ITEMS_FILE))?;
        let handbook: Handbook = read_json(&root.join(HANDBOOK_FILE))?;
        let prices_path = root.join(PRICES_FILE);
        let prices = if prices_path.exists() {
            read_json(&prices_path)?
        } else {
            BTreeMap::new()
        };

        let mut traders = BTreeMap::new();
        let traders_dir = root.join(TRADERS_DIR);
        if traders_dir.exists() {
            for entry in WalkDir::new(&traders_dir).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_dir() {
                    continue;
                }
                let id = entry.file_name().to_string_lossy().into_owned();
                let assort_path = entry.path().join(ASSORT_FILE);
                let assort = if assort_path.exists() {
                    Some(read_json(&assort_path)?)
                } else {
                    None
                };
                traders.insert(id, Trader { assort });
            }
        }

        let mut bots = BTreeMap::new();
        for (name, path) in json_files(&root.join(BOTS_DIR))? {
            bots.insert(name, read_json(&path)?);
        }

        let mut locales = BTreeMap::new();
        for (lang, path) in json_files(&root.join(LOCALES_DIR))? {
            locales.insert(lang, read_json(&path)?);
        }

        log::info!(
            "Loaded database: {} items, {} traders, {} bot types, {} locales",
            items.len(),
            traders.len(),
            bots.len(),
            locales.len()
        );

        Ok(Self {
            globals,
            items,
            handbook,
            prices,
            traders,
            bots,
            locales,
        })
    }

    /// Copies every file of `source` into `out`, then overwrites the tables
    /// held in memory.
    pub fn save(&self, source: &Path, out: &Path) -> Result<()> {
        for entry in WalkDir::new(source).min_depth(1) {
            let entry = entry?;
            let relative = match entry.path().strip_prefix(source) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let dest = out.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &dest)?;
            }
        }

        write_json(&out.join(GLOBALS_FILE), &self.globals)?;
        write_json(&out.join(ITEMS_FILE), &self.items)?;
        write_json(&out.join(HANDBOOK_FILE), &self.handbook)?;
        write_json(&out.join(PRICES_FILE), &self.prices)?;

        for (id, trader) in &self.traders {
            if let Some(assort) = &trader.assort {
                write_json(&out.join(TRADERS_DIR).join(id).join(ASSORT_FILE), assort)?;
            }
        }
        for (name, bot) in &self.bots {
            write_json(&out.join(BOTS_DIR).join(format!("{name}.json")), bot)?;
        }
        for (lang, table) in &self.locales {
            write_json(&out.join(LOCALES_DIR).join(format!("{lang}.json")), table)?;
        }
        Ok(())
    }

    pub fn item(&self, id: &str) -> Result<&TemplateItem> {
        self.items
            .get(id)
            .ok_or_else(|| RebalancerError::MissingItem(id.to_string()))
    }

    pub fn assort_mut(&mut self, trader: &str) -> Result<&mut Assort> {
        self.traders
            .get_mut(trader)
            .and_then(|t| t.assort.as_mut())
            .ok_or_else(|| RebalancerError::MissingTrader(trader.to_string()))
    }

    pub fn set_locale(&mut self, lang: &str, key: impl Into<String>, value: impl Into<String>) {
        self.locales
            .entry(lang.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_class_accepts_numbers_and_strings() {
        let numeric: ItemProps = serde_json::from_str(r#"{"armorClass": 4}"#).unwrap();
        let text: ItemProps = serde_json::from_str(r#"{"armorClass": "3"}"#).unwrap();
        let missing: ItemProps = serde_json::from_str("{}").unwrap();
        assert_eq!(numeric.armor_class, Some(4));
        assert_eq!(text.armor_class, Some(3));
        assert_eq!(missing.class(), 0);
    }

    #[test]
    fn fractional_armor_class_rounds_to_the_nearest_class() {
        let class = |raw: &str| serde_json::from_str::<ItemProps>(raw).unwrap().armor_class;
        assert_eq!(class(r#"{"armorClass": 3.6}"#), Some(4));
        assert_eq!(class(r#"{"armorClass": 4.4}"#), Some(4));
        assert_eq!(class(r#"{"armorClass": "2.5"}"#), Some(3));
        assert_eq!(class(r#"{"armorClass": -1}"#), Some(0));
        assert_eq!(class(r#"{"armorClass": "heavy"}"#), None);
    }

    #[test]
    fn unknown_handbook_fields_survive_a_round_trip() {
        let raw = r#"{"Categories":[{"Id":"c","ParentId":null,"Icon":"i","Color":"","Order":"1","Hidden":true}],
            "Items":[{"Id":"a","ParentId":"c","Price":100,"Tag":"x"}]}"#;
        let handbook: Handbook = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&handbook).unwrap();
        assert_eq!(back["Categories"][0]["Hidden"], true);
        assert_eq!(back["Items"][0]["Tag"], "x");
        assert_eq!(back["Items"][0]["Price"], 100.0);
    }

    #[test]
    fn unknown_props_survive_a_round_trip() {
        let raw = r#"{"_id":"a","_name":"vest","_parent":"p","_type":"Item",
            "_props":{"Durability":50,"CanSellOnRagfair":true}}"#;
        let item: TemplateItem = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["_type"], "Item");
        assert_eq!(back["_props"]["CanSellOnRagfair"], true);
        assert_eq!(back["_props"]["Durability"], 50.0);
    }

    #[test]
    fn set_durability_keeps_max_in_step() {
        let mut props = ItemProps::default();
        props.set_durability(70.0);
        props.scale_durability(2.0);
        assert_eq!(props.durability, Some(140.0));
        assert_eq!(props.max_durability, props.durability);
    }

    #[test]
    fn load_and_save_keep_the_directory_layout() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let root = src.path();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::create_dir_all(root.join("traders/t1")).unwrap();
        fs::create_dir_all(root.join("traders/t2")).unwrap();
        fs::create_dir_all(root.join("bots/types")).unwrap();
        fs::create_dir_all(root.join("locales/global")).unwrap();
        fs::write(
            root.join("globals.json"),
            r#"{"config":{"ArmorMaterials":{"Ceramic":{"Destructibility":0.8,"ExplosionDestructibility":0.6}}}}"#,
        )
        .unwrap();
        fs::write(root.join("templates/items.json"), r#"{"a":{"_id":"a","_parent":"p","_props":{}}}"#).unwrap();
        fs::write(root.join("templates/handbook.json"), r#"{"Categories":[],"Items":[]}"#).unwrap();
        fs::write(root.join("traders/t1/assort.json"), r#"{"items":[],"barter_scheme":{},"loyal_level_items":{}}"#).unwrap();
        fs::write(root.join("traders/t2/base.json"), "{}").unwrap();
        fs::write(root.join("bots/types/usec.json"), r#"{"lastName":["Smith"]}"#).unwrap();
        fs::write(root.join("locales/global/en.json"), r#"{"a Name":"A"}"#).unwrap();

        let mut db = Database::load(root).unwrap();
        assert!(db.traders["t1"].assort.is_some());
        assert!(db.traders["t2"].assort.is_none());
        assert_eq!(db.bots["usec"].last_name, vec!["Smith".to_string()]);

        db.set_locale("en", "b Name", "B");
        db.save(root, out.path()).unwrap();

        let reloaded = Database::load(out.path()).unwrap();
        assert_eq!(reloaded.locales["en"]["b Name"], "B");
        assert!(out.path().join("traders/t2/base.json").exists());
        assert_eq!(
            reloaded.globals.config.armor_materials["Ceramic"].destructibility,
            0.8
        );
    }
}
