//! The plate handbook category and the plate storage bag.

use serde_json::Map;

use crate::candidates::{CandidateSnapshot, CandidateTier};
use crate::economy::{publish_offer, register_price, OfferTerms};
use crate::ids::{
    CONTAINER_TEMPLATE, HANDBOOK_GEAR_COMPONENTS, HANDBOOK_STORAGE_CONTAINERS, PLATE_CATEGORY,
    PLATE_CONTAINER, PLATE_TRADER,
};
use crate::locale::{category_name, container_texts, write_item_texts};
use crate::plates::Coverage;
use crate::tables::{Database, HandbookCategory, SlotFilter};
use crate::{RebalancerError, Result};

const CATEGORY_ICON: &str = "/files/handbook/icon_gear_components.png";
const CONTAINER_PREFAB: &str = "assets/content/items/spec/item_spec_armorrepair/item_spec_armorrepair.bundle";
const CONTAINER_SOUND: &str = "spec_armorrep";
const CONTAINER_HEIGHT: u32 = 3;
const CONTAINER_WEIGHT: f64 = 2.25;
const CONTAINER_PRICE: f64 = 350_000.0;
const CONTAINER_BUY_RESTRICTION: u32 = 2;
const CONTAINER_LOYALTY: u32 = 2;

pub struct CategoryRegistrar<'a> {
    languages: &'a [String],
}

impl<'a> CategoryRegistrar<'a> {
    pub fn new(languages: &'a [String]) -> Self {
        Self { languages }
    }

    pub fn register_category(&self, db: &mut Database) {
        db.handbook.categories.push(HandbookCategory {
            id: PLATE_CATEGORY.to_string(),
            parent_id: Some(HANDBOOK_GEAR_COMPONENTS.to_string()),
            icon: CATEGORY_ICON.to_string(),
            color: String::new(),
            order: "100".to_string(),
            extra: Map::new(),
        });
        for lang in self.languages {
            db.set_locale(lang, PLATE_CATEGORY, category_name(lang));
        }
    }

    /// Registers the plate bag. Its grid accepts every full-size-compatible
    /// plate, so it must run after generation.
    pub fn register_container(&self, db: &mut Database, candidates: &CandidateSnapshot) -> Result<()> {
        let plates = candidates.get(CandidateTier::All, Coverage::Full);
        if plates.is_empty() {
            return Err(RebalancerError::EmptyCandidateSet("full"));
        }

        let mut container = db.item(CONTAINER_TEMPLATE)?.clone();
        container.id = PLATE_CONTAINER.to_string();

        let props = &mut container.props;
        props.height = Some(CONTAINER_HEIGHT);
        props.weight = Some(CONTAINER_WEIGHT);
        props.prefab.get_or_insert_with(Default::default).path = CONTAINER_PREFAB.to_string();
        props.item_sound = Some(CONTAINER_SOUND.to_string());

        let grids = props.grids.get_or_insert_with(Vec::new);
        if grids.is_empty() {
            grids.push(Default::default());
        }
        let filters = &mut grids[0].props.filters;
        if filters.is_empty() {
            filters.push(SlotFilter::default());
        }
        filters[0].filter = plates.to_vec();

        db.items.insert(PLATE_CONTAINER.to_string(), container);
        for lang in self.languages {
            write_item_texts(db, lang, PLATE_CONTAINER, container_texts(lang));
        }

        register_price(db, PLATE_CONTAINER, HANDBOOK_STORAGE_CONTAINERS, CONTAINER_PRICE);
        publish_offer(
            db,
            PLATE_TRADER,
            PLATE_CONTAINER,
            OfferTerms {
                price: CONTAINER_PRICE,
                buy_restriction: CONTAINER_BUY_RESTRICTION,
                loyalty_level: CONTAINER_LOYALTY,
            },
        )?;
        log::info!("Registered {} holding {} plate kinds", PLATE_CONTAINER, plates.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidateSetBuilder;
    use crate::test_support::fixture_database;

    fn languages() -> Vec<String> {
        vec!["en".to_string(), "ch".to_string()]
    }

    #[test]
    fn category_is_added_with_names() {
        let mut db = fixture_database();
        let langs = languages();
        CategoryRegistrar::new(&langs).register_category(&mut db);
        let cat = db.handbook.categories.iter().find(|c| c.id == PLATE_CATEGORY).unwrap();
        assert_eq!(cat.parent_id.as_deref(), Some(HANDBOOK_GEAR_COMPONENTS));
        assert_eq!(db.locales["en"][PLATE_CATEGORY], "Armor Plates");
        assert_eq!(db.locales["ch"][PLATE_CATEGORY], "防弹插板");
    }

    #[test]
    fn container_filters_on_the_full_set() {
        let mut db = fixture_database();
        let langs = languages();
        let mut builder = CandidateSetBuilder::new(4, None);
        builder.push("plate4ChestCeramic", 4, Coverage::Torso);
        builder.push("plate4FullPlateCeramic", 4, Coverage::Full);
        let snap = builder.finalize();

        CategoryRegistrar::new(&langs).register_container(&mut db, &snap).unwrap();

        let bag = &db.items[PLATE_CONTAINER];
        let grids = bag.props.grids.as_ref().unwrap();
        assert_eq!(grids[0].props.filters[0].filter, snap.get(CandidateTier::All, Coverage::Full));
        assert_eq!(bag.props.height, Some(3));
        assert_eq!(db.handbook.price_of(PLATE_CONTAINER), Some(CONTAINER_PRICE));
        let assort = db.traders[PLATE_TRADER].assort.as_ref().unwrap();
        assert_eq!(assort.loyal_level_items[PLATE_CONTAINER], 2);
        assert_eq!(db.locales["en"]["plateContainer ShortName"], "Plate Bag");
    }

    #[test]
    fn container_refuses_an_empty_plate_set() {
        let mut db = fixture_database();
        let langs = languages();
        let snap = CandidateSetBuilder::new(4, None).finalize();
        let err = CategoryRegistrar::new(&langs)
            .register_container(&mut db, &snap)
            .unwrap_err();
        assert!(matches!(err, RebalancerError::EmptyCandidateSet("full")));
        assert!(!db.items.contains_key(PLATE_CONTAINER));
    }
}
