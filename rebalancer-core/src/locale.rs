//! Display texts for generated items. English and Chinese are built in;
//! any other configured language receives the English texts.

use crate::ids::{level_numeral, material_name_cn, material_tag};
use crate::plates::Coverage;
use crate::tables::Database;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTexts {
    pub name: String,
    pub short_name: String,
    pub description: String,
}

pub fn plate_texts(lang: &str, material: &str, class: u32, coverage: Coverage) -> ItemTexts {
    let numeral = level_numeral(class);
    if lang == "ch" {
        let mat = material_name_cn(material);
        return match coverage {
            Coverage::Torso => ItemTexts {
                name: format!("Class {class} {mat} 防弹插板"),
                short_name: format!("{numeral} {mat} C."),
                description: format!(
                    "{mat}制{numeral}级保护的多重防弹插板，设计用于防弹背心插槽，以保护生命体征。"
                ),
            },
            Coverage::Full => ItemTexts {
                name: format!("Class {class} {mat} 全尺寸防弹插板"),
                short_name: format!("{numeral} {mat} F."),
                description: format!(
                    "{mat}制{numeral}级保护的多重防弹插板，设计用于全尺寸防弹背心以保护胃部，也就是说，只要足够大以容纳它。"
                ),
            },
        };
    }

    let mat = material_tag(material);
    match coverage {
        Coverage::Torso => ItemTexts {
            name: format!("Class {class} {mat} Ballistic Plate"),
            short_name: format!("{numeral} {mat} C."),
            description: format!(
                "{mat} multi-hit ballistic plate of level {numeral} protection designed for use in a plate carrier to protect the vitals."
            ),
        },
        Coverage::Full => ItemTexts {
            name: format!("Class {class} {mat} Full-Size Plate"),
            short_name: format!("{numeral} {mat} F."),
            description: format!(
                "{mat} multi-hit ballistic plate of level {numeral} protection designed as a plate to also protect the stomach, that is, if the carrier is large enough to fit it."
            ),
        },
    }
}

pub fn container_texts(lang: &str) -> ItemTexts {
    if lang == "ch" {
        return ItemTexts {
            name: "插板储存袋".to_string(),
            short_name: "插板袋".to_string(),
            description: "一个大而耐用的手提袋，便于存放和运输多个装甲板。军队通常用于快速部署和为战区士兵提供替换防弹板。".to_string(),
        };
    }
    ItemTexts {
        name: "Ballistic Plate Storage Bag".to_string(),
        short_name: "Plate Bag".to_string(),
        description: "A large, durable carry bag meant for easy storing and moving of multiple armor plates. Used commonly by military forces for rapid deployment and access of replacement ballistic plates for soldiers in combat zones.".to_string(),
    }
}

pub fn category_name(lang: &str) -> &'static str {
    match lang {
        "ch" => "防弹插板",
        _ => "Armor Plates",
    }
}

/// Writes the `"<id> Name"`, `"<id> ShortName"` and `"<id> Description"` keys.
pub fn write_item_texts(db: &mut Database, lang: &str, id: &str, texts: ItemTexts) {
    db.set_locale(lang, format!("{id} Name"), texts.name);
    db.set_locale(lang, format!("{id} ShortName"), texts.short_name);
    db.set_locale(lang, format!("{id} Description"), texts.description);
}
