//! Per-item exceptions to the generic carrier curve.

/// Integrated-armor vests that keep a fixed durability and skip the plate
/// conversion entirely.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegacyOverride {
    pub id: &'static str,
    pub durability: f64,
    pub price_factor: f64,
}

const LEGACY_PRICE_FACTOR: f64 = 0.8;

pub const LEGACY_OVERRIDES: &[LegacyOverride] = &[
    // 6B2
    LegacyOverride {
        id: "5df8a2ca86f7740bfe6df777",
        durability: 128.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    // NPP KlASS Kora-Kulon (black, digital flora)
    LegacyOverride {
        id: "64be79c487d1510151095552",
        durability: 128.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    LegacyOverride {
        id: "64be79e2bf8412471d0d9bcc",
        durability: 128.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    // MF-UNTAR
    LegacyOverride {
        id: "5ab8e4ed86f7742d8e50c7fa",
        durability: 100.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    // 6B5-16
    LegacyOverride {
        id: "5c0e3eb886f7742015526062",
        durability: 160.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    // 6B3TM-01
    LegacyOverride {
        id: "5d5d646386f7742797261fd9",
        durability: 86.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
    // 6B5-15
    LegacyOverride {
        id: "5c0e446786f7742013381639",
        durability: 110.0,
        price_factor: LEGACY_PRICE_FACTOR,
    },
];

/// Final stats for low-profile rigs, applied instead of the generic curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LowProfileOverride {
    pub id: &'static str,
    pub ergonomic_penalty: f64,
    pub speed_penalty: f64,
    pub mouse_penalty: f64,
    pub armor_class: u32,
    pub durability: f64,
}

const fn low_profile(
    id: &'static str,
    ergonomic_penalty: f64,
    speed_penalty: f64,
    mouse_penalty: f64,
    armor_class: u32,
    durability: f64,
) -> LowProfileOverride {
    LowProfileOverride {
        id,
        ergonomic_penalty,
        speed_penalty,
        mouse_penalty,
        armor_class,
        durability,
    }
}

pub const LOW_PROFILE_OVERRIDES: &[LowProfileOverride] = &[
    // 5.11 Hexgrid
    low_profile("5fd4c474dd870108a754b241", -1.0, -1.0, -1.0, 1, 10.0),
    // HPC
    low_profile("63737f448b28897f2802b874", 0.0, -1.0, 0.0, 1, 10.0),
    // TT SK
    low_profile("628cd624459354321c4b7fa2", 0.0, -1.0, 0.0, 1, 10.0),
    // S&S Precision PlateFrame
    low_profile("628b9784bcf6e2659e09b8a2", -1.0, 0.0, 0.0, 1, 10.0),
    low_profile("628b9c7d45122232a872358f", -1.0, 0.0, 0.0, 1, 10.0),
    // MBSS
    low_profile("64a5366719bab53bd203bf33", -1.0, 0.0, -1.0, 1, 10.0),
    // LBT-6094A Slick
    low_profile("5e4abb5086f77406975c9342", 0.0, 0.0, 0.0, 3, 100.0),
    low_profile("6038b4b292ec1c3103795a0b", 0.0, 0.0, 0.0, 3, 100.0),
    low_profile("6038b4ca92ec1c3103795a0d", 0.0, 0.0, 0.0, 3, 100.0),
    low_profile("010521_ARMR_SLICK_FDE000", 0.0, 0.0, 0.0, 3, 100.0),
    low_profile("010521_ARMR_SLICK_ODG000", 0.0, 0.0, 0.0, 3, 100.0),
];

pub fn legacy_override(id: &str) -> Option<&'static LegacyOverride> {
    LEGACY_OVERRIDES.iter().find(|o| o.id == id)
}

pub fn low_profile_override(id: &str) -> Option<&'static LowProfileOverride> {
    LOW_PROFILE_OVERRIDES.iter().find(|o| o.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_do_not_overlap_or_repeat() {
        let legacy: HashSet<_> = LEGACY_OVERRIDES.iter().map(|o| o.id).collect();
        let low: HashSet<_> = LOW_PROFILE_OVERRIDES.iter().map(|o| o.id).collect();
        assert_eq!(legacy.len(), LEGACY_OVERRIDES.len());
        assert_eq!(low.len(), LOW_PROFILE_OVERRIDES.len());
        assert!(legacy.is_disjoint(&low));
    }

    #[test]
    fn lookups_find_listed_ids() {
        assert_eq!(legacy_override("5c0e3eb886f7742015526062").unwrap().durability, 160.0);
        assert_eq!(low_profile_override("63737f448b28897f2802b874").unwrap().armor_class, 1);
        assert!(legacy_override("5648a7494bdc2d9d488b4583").is_none());
    }
}
