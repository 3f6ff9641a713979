use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub mod adjustments;
pub mod bots;
pub mod candidates;
pub mod carriers;
pub mod category;
pub mod config;
pub mod economy;
pub mod ids;
pub mod locale;
pub mod materials;
pub mod overrides;
pub mod pipeline;
pub mod plates;
pub mod tables;

use config::RebalanceConfig;
use pipeline::run_pipeline;
use tables::Database;

pub use pipeline::GenerationReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancerSettings {
    pub database_path: PathBuf,
    pub output_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub debug: bool,
}

#[derive(Debug, Error)]
pub enum RebalancerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to walk database directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("no configuration for armor material {0}")]
    UnknownMaterial(String),
    #[error("item {0} not found")]
    MissingItem(String),
    #[error("trader {0} not found or has no assort")]
    MissingTrader(String),
    #[error("item {0} has no handbook entry")]
    MissingHandbookEntry(String),
    #[error("price of {0} was already rescaled")]
    AlreadyRescaled(String),
    #[error("no {0} plates were generated")]
    EmptyCandidateSet(&'static str),
    #[error("plate {0} generated twice")]
    DuplicatePlate(String),
}

pub type Result<T> = std::result::Result<T, RebalancerError>;

const REPORT_FILE: &str = "rework_report.txt";

pub fn run(settings: RebalancerSettings) -> Result<()> {
    if !settings.database_path.exists() {
        return Err(RebalancerError::Config(format!(
            "Database path does not exist: {}",
            settings.database_path.display()
        )));
    }
    if settings.output_path.starts_with(&settings.database_path) {
        return Err(RebalancerError::Config(
            "Output path must lie outside the database path".to_string(),
        ));
    }

    let config = match &settings.config_path {
        Some(path) => RebalanceConfig::load(path)?,
        None => {
            log::info!("No configuration given, using defaults");
            RebalanceConfig::default()
        }
    };

    let mut db = Database::load(&settings.database_path)?;

    // Stage failures are logged inside; whatever was applied is still saved.
    let report = run_pipeline(&mut db, &config);

    if !settings.output_path.exists() {
        fs::create_dir_all(&settings.output_path)?;
    }
    db.save(&settings.database_path, &settings.output_path)?;
    log::info!("Wrote reworked database to {}", settings.output_path.display());

    if settings.debug {
        let text = match &report {
            Some(report) => report.summary(),
            None => "generation stopped early, see the log for the failing stage\n".to_string(),
        };
        fs::write(settings.output_path.join(REPORT_FILE), text)?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{Map, Value};

    use crate::economy::register_price;
    use crate::ids::*;
    use crate::tables::{
        ArmorMaterialPhysics, Assort, AssortItem, BarterCost, BotType, Database, Grid, SlotFilter,
        SlotProps, TemplateItem, Trader,
    };

    pub const HEADWEAR: &str = "5aa7e276e5b5b000171d0647";
    pub const VISOR: &str = "5b432be65acfc433000ed01f";
    pub const HEAVY_VEST: &str = "5c0e625a86f7742d77340f62";
    pub const LIGHT_RIG: &str = "5c0e746986f7741453628fe5";
    const AMMO: &str = "56dff3afd2720bba668b4567";

    fn item(id: &str, parent: &str) -> TemplateItem {
        let mut item = TemplateItem::default();
        item.id = id.to_string();
        item.name = id.to_string();
        item.parent = parent.to_string();
        item
    }

    pub fn vest(id: &str, class: u32, armor_type: &str, zones: &[&str], durability: f64) -> TemplateItem {
        let mut vest = item(id, PARENT_ARMOR_VEST);
        let props = &mut vest.props;
        props.armor_class = Some(class);
        props.armor_type = Some(armor_type.to_string());
        props.armor_zone = Some(zones.iter().map(|z| z.to_string()).collect());
        props.set_durability(durability);
        props.armor_material = Some("UHMWPE".to_string());
        props.weight = Some(10.0);
        props.ergonomic_penalty = Some(-10.0);
        props.speed_penalty = Some(-6.0);
        props.mouse_penalty = Some(-8.0);
        props.blunt_throughput = Some(0.2);
        props.repair_cost = Some(250.0);
        vest
    }

    fn bot(last_names: &[&str], scav_body: bool) -> BotType {
        let mut bot = BotType::default();
        bot.last_name = last_names.iter().map(|s| s.to_string()).collect();
        if scav_body {
            bot.appearance.body.insert(SCAV_BODY.to_string(), Value::from(1));
        }
        bot
    }

    /// A small host database: every default armor material, the two cloned
    /// templates, one of each armor kind, two traders and three bot tiers.
    pub fn fixture_database() -> Database {
        let mut db = Database::default();

        for (name, destructibility) in [
            ("UHMWPE", 0.45),
            ("Aramid", 0.25),
            ("Ceramic", 0.8),
            ("Titan", 0.55),
            ("Aluminium", 0.6),
            ("Combined", 0.5),
            ("ArmoredSteel", 0.7),
            ("Glass", 0.8),
        ] {
            db.globals.config.armor_materials.insert(
                name.to_string(),
                ArmorMaterialPhysics {
                    destructibility,
                    explosion_destructibility: destructibility,
                    extra: Map::new(),
                },
            );
        }

        let mut template = item(PLATE_TEMPLATE, PARENT_ARMORED_EQUIPMENT);
        template.props.weight = Some(1.0);
        db.items.insert(PLATE_TEMPLATE.to_string(), template);

        let mut bag = item(CONTAINER_TEMPLATE, "5795f317245977243854e041");
        bag.props.grids = Some(vec![Grid {
            name: "main".to_string(),
            id: format!("{CONTAINER_TEMPLATE}_grid"),
            props: SlotProps {
                filters: vec![SlotFilter {
                    filter: vec!["54009119af1c881c07000029".to_string()],
                    extra: Map::new(),
                }],
                extra: Map::new(),
            },
            extra: Map::new(),
        }]);
        db.items.insert(CONTAINER_TEMPLATE.to_string(), bag);

        let mut helmet = item(HEADWEAR, PARENT_HEADWEAR);
        helmet.props.armor_class = Some(4);
        helmet.props.head_segments = Some(vec!["Top".into(), "Nape".into(), "Ears".into()]);
        helmet.props.set_durability(40.0);
        helmet.props.armor_material = Some("Aramid".to_string());
        helmet.props.blunt_throughput = Some(0.2);
        db.items.insert(HEADWEAR.to_string(), helmet);

        let mut visor = item(VISOR, PARENT_VISORS);
        visor.props.armor_class = Some(0);
        visor.props.blindness_protection = Some(0.5);
        db.items.insert(VISOR.to_string(), visor);

        db.items
            .insert(HEAVY_VEST.to_string(), vest(HEAVY_VEST, 4, "Heavy", &["Chest"], 80.0));

        let mut rig = vest(LIGHT_RIG, 3, "Light", &["Chest", "Stomach"], 50.0);
        rig.parent = PARENT_CHEST_RIG.to_string();
        db.items.insert(LIGHT_RIG.to_string(), rig);

        let mut round = item(AMMO, PARENT_AMMO);
        round.props.armor_damage = Some(40.0);
        db.items.insert(AMMO.to_string(), round);

        register_price(&mut db, HEAVY_VEST, "5b5f701386f774093f2ecf0f", 100_000.0);
        register_price(&mut db, LIGHT_RIG, "5b5f6f8786f77447ed563642", 40_000.0);

        let mut assort = Assort::default();
        assort.items.push(AssortItem {
            id: "heavy_vest_offer".to_string(),
            tpl: HEAVY_VEST.to_string(),
            parent_id: "hideout".to_string(),
            slot_id: "hideout".to_string(),
            upd: None,
            extra: Map::new(),
        });
        assort.barter_scheme.insert(
            "heavy_vest_offer".to_string(),
            vec![vec![BarterCost {
                tpl: ROUBLES.to_string(),
                count: 33_333.0,
                extra: Map::new(),
            }]],
        );
        assort.loyal_level_items.insert("heavy_vest_offer".to_string(), 2);
        db.traders.insert(
            PLATE_TRADER.to_string(),
            Trader {
                assort: Some(assort),
            },
        );
        db.traders.insert("ragfair".to_string(), Trader { assort: None });

        db.bots.insert("assault".to_string(), bot(&["Ivanov"], true));
        db.bots.insert("bosskilla".to_string(), bot(&[], false));
        db.bots.insert("usec".to_string(), bot(&["Smith"], false));

        db.set_locale("en", format!("{HEAVY_VEST} Name"), "Heavy vest");
        db.set_locale("ch", format!("{HEAVY_VEST} Name"), "重型防弹衣");
        db
    }
}
