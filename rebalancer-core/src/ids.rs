//! Well-known host identifiers and the small lookup tables used when naming
//! generated items.

// Taxonomy parents.
pub const PARENT_HEADWEAR: &str = "5a341c4086f77401f2541505";
pub const PARENT_FACECOVER: &str = "5a341c4686f77469e155819e";
pub const PARENT_VISORS: &str = "5448e5724bdc2ddf718b4568";
pub const PARENT_ARMORED_EQUIPMENT: &str = "57bef4c42459772e8d35a53b";
pub const PARENT_ARMOR_VEST: &str = "5448e54d4bdc2dcc718b4568";
pub const PARENT_CHEST_RIG: &str = "5448e5284bdc2dcb718b4567";
pub const PARENT_AMMO: &str = "5485a8684bdc2da71d8b4567";

// Handbook nodes.
pub const PLATE_CATEGORY: &str = "plate_category";
pub const HANDBOOK_GEAR_COMPONENTS: &str = "5b47574386f77428ca22b33f";
pub const HANDBOOK_STORAGE_CONTAINERS: &str = "5b5f6fa186f77409407a7eb7";

// Templates cloned for generated items.
pub const PLATE_TEMPLATE: &str = "5648a7494bdc2d9d488b4583";
pub const CONTAINER_TEMPLATE: &str = "59fb042886f7746c5005a7b2";
pub const PLATE_CONTAINER: &str = "plateContainer";

pub const PLATE_TRADER: &str = "5ac3b934156ae10c4430e83c";
pub const ROUBLES: &str = "5449016a4bdc2d6f028b456f";
pub const DOLLARS: &str = "5696686a4bdc2da3298b456a";
pub const EUROS: &str = "569668774bdc2da2298b4568";

pub fn is_currency(tpl: &str) -> bool {
    matches!(tpl, ROUBLES | DOLLARS | EUROS)
}
pub const SLOT_PROTO: &str = "55d30c4c4bdc2db4468b457e";

/// Body part only scavenger profiles wear.
pub const SCAV_BODY: &str = "5cc2e59214c02e000f16684e";

pub const SLOT_TORSO_PLATE: &str = "mod_equipment_plate";
pub const SLOT_FULL_PLATE: &str = "mod_equipment_full";

/// Material every retrofitted carrier is normalised to.
pub const BASELINE_MATERIAL: &str = "Aramid";

pub fn level_numeral(class: u32) -> &'static str {
    match class {
        1 => "Ⅰ",
        2 => "Ⅱ",
        3 => "Ⅲ",
        4 => "Ⅳ",
        5 => "Ⅴ",
        6 => "Ⅵ",
        _ => "?",
    }
}

/// Name used in ids and English texts.
pub fn material_tag(material: &str) -> &str {
    match material {
        "ArmoredSteel" => "Steel",
        other => other,
    }
}

pub fn material_name_cn(material: &str) -> &'static str {
    match material {
        "UHMWPE" => "高分子PE",
        "Aramid" => "芳纶",
        "Ceramic" => "陶瓷",
        "Titan" => "钛",
        "Aluminium" => "铝",
        "Combined" => "复合材料",
        "ArmoredSteel" => "装甲钢",
        "Glass" => "玻璃纤维",
        _ => "?",
    }
}

pub fn material_color(material: &str) -> Option<&'static str> {
    match material {
        "UHMWPE" => Some("violet"),
        "Aramid" => Some("default"),
        "Ceramic" => Some("yellow"),
        "Titan" => Some("blue"),
        "Aluminium" => Some("orange"),
        "Combined" => Some("green"),
        "ArmoredSteel" => Some("red"),
        _ => None,
    }
}

pub fn torso_prefab(material: &str) -> &'static str {
    match material {
        "Combined" | "Ceramic" | "UHMWPE" => "assets/item_equipment_armorplate_chest_heavy.bundle",
        _ => "assets/item_equipment_armorplate_chest_light.bundle",
    }
}

pub fn full_prefab(material: &str) -> &'static str {
    match material {
        "Aluminium" | "Ceramic" | "UHMWPE" => "assets/item_equipment_armorplate_full_2.bundle",
        _ => "assets/item_equipment_armorplate_full_1.bundle",
    }
}
