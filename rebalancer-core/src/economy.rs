//! Handbook prices, the flat price table, and trader offers.

use std::collections::HashSet;

use serde_json::Map;

use crate::ids::{is_currency, ROUBLES};
use crate::tables::{AssortItem, AssortUpd, BarterCost, Database, HandbookItem};
use crate::{RebalancerError, Result};

const UNLIMITED_STOCK: u64 = 99_999_999;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferTerms {
    pub price: f64,
    pub buy_restriction: u32,
    pub loyalty_level: u32,
}

/// Adds a handbook entry and the matching flat price.
pub fn register_price(db: &mut Database, id: &str, parent: &str, price: f64) {
    db.handbook.items.push(HandbookItem {
        id: id.to_string(),
        parent_id: parent.to_string(),
        price,
        extra: Map::new(),
    });
    db.prices.insert(id.to_string(), price);
}

/// Lists `id` at `trader` for roubles, with unlimited stock.
pub fn publish_offer(db: &mut Database, trader: &str, id: &str, terms: OfferTerms) -> Result<()> {
    let assort = db.assort_mut(trader)?;
    assort.items.push(AssortItem {
        id: id.to_string(),
        tpl: id.to_string(),
        parent_id: "hideout".to_string(),
        slot_id: "hideout".to_string(),
        upd: Some(AssortUpd {
            stack_objects_count: Some(UNLIMITED_STOCK),
            buy_restriction_max: Some(terms.buy_restriction),
            unlimited_count: Some(true),
            extra: Map::new(),
        }),
        extra: Map::new(),
    });
    assort.barter_scheme.insert(
        id.to_string(),
        vec![vec![BarterCost {
            tpl: ROUBLES.to_string(),
            count: terms.price,
            extra: Map::new(),
        }]],
    );
    assort
        .loyal_level_items
        .insert(id.to_string(), terms.loyalty_level);
    Ok(())
}

/// Proportional price rescaling, at most once per item per run.
#[derive(Debug, Default)]
pub struct EconomySync {
    rescaled: HashSet<String>,
}

impl EconomySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handbook and flat price of `id` to `floor(price * factor)` and
    /// scales every currency cost of every offer for `id` the same way. Item
    /// costs in barters are left as they are. Returns the new price.
    pub fn rescale(&mut self, db: &mut Database, id: &str, factor: f64) -> Result<f64> {
        if self.rescaled.contains(id) {
            return Err(RebalancerError::AlreadyRescaled(id.to_string()));
        }

        let entry = db
            .handbook
            .items
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| RebalancerError::MissingHandbookEntry(id.to_string()))?;
        let price = (entry.price * factor).floor();
        entry.price = price;
        db.prices.insert(id.to_string(), price);

        let mut offers = 0usize;
        for trader in db.traders.values_mut() {
            let Some(assort) = trader.assort.as_mut() else {
                continue;
            };
            let offer_ids: Vec<String> = assort
                .items
                .iter()
                .filter(|offer| offer.tpl == id)
                .map(|offer| offer.id.clone())
                .collect();
            for offer_id in offer_ids {
                if let Some(schemes) = assort.barter_scheme.get_mut(&offer_id) {
                    for cost in schemes.iter_mut().flatten() {
                        if is_currency(&cost.tpl) {
                            cost.count = (cost.count * factor).floor();
                        }
                    }
                    offers += 1;
                }
            }
        }

        self.rescaled.insert(id.to_string());
        log::debug!("{} price is now {} ({} trader offers rescaled)", id, price, offers);
        Ok(price)
    }

    pub fn rescaled_count(&self) -> usize {
        self.rescaled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{DOLLARS, EUROS, PLATE_TRADER};
    use crate::test_support::{fixture_database, HEAVY_VEST};

    #[test]
    fn rescale_is_floored_and_reaches_every_offer() {
        let mut db = fixture_database();
        let old_price = db.handbook.price_of(HEAVY_VEST).unwrap();
        let mut sync = EconomySync::new();

        let price = sync.rescale(&mut db, HEAVY_VEST, 0.3).unwrap();

        assert_eq!(price, (old_price * 0.3).floor());
        assert_eq!(db.handbook.price_of(HEAVY_VEST), Some(price));
        assert_eq!(db.prices[HEAVY_VEST], price);
        let assort = db.traders[PLATE_TRADER].assort.as_ref().unwrap();
        let offer = assort.items.iter().find(|o| o.tpl == HEAVY_VEST).unwrap();
        assert_eq!(assort.barter_scheme[&offer.id][0][0].count, (33_333.0f64 * 0.3).floor());
    }

    #[test]
    fn item_barters_keep_their_counts() {
        let mut db = fixture_database();
        let assort = db.assort_mut(PLATE_TRADER).unwrap();
        assort.items.push(AssortItem {
            id: "heavy_vest_swap".to_string(),
            tpl: HEAVY_VEST.to_string(),
            parent_id: "hideout".to_string(),
            slot_id: "hideout".to_string(),
            upd: None,
            extra: Map::new(),
        });
        let cost = |tpl: &str, count: f64| BarterCost {
            tpl: tpl.to_string(),
            count,
            extra: Map::new(),
        };
        assort.barter_scheme.insert(
            "heavy_vest_swap".to_string(),
            vec![
                vec![cost(DOLLARS, 150.0), cost("5d1b376e86f774252519444e", 2.0)],
                vec![cost(EUROS, 120.0)],
            ],
        );

        EconomySync::new().rescale(&mut db, HEAVY_VEST, 0.3).unwrap();

        let scheme = &db.traders[PLATE_TRADER].assort.as_ref().unwrap().barter_scheme["heavy_vest_swap"];
        assert_eq!(scheme[0][0].count, (150.0f64 * 0.3).floor());
        assert_eq!(scheme[0][1].count, 2.0);
        assert_eq!(scheme[1][0].count, (120.0f64 * 0.3).floor());
    }

    #[test]
    fn second_rescale_is_rejected() {
        let mut db = fixture_database();
        let mut sync = EconomySync::new();
        sync.rescale(&mut db, HEAVY_VEST, 0.3).unwrap();
        let after_first = db.handbook.price_of(HEAVY_VEST);

        let err = sync.rescale(&mut db, HEAVY_VEST, 0.3).unwrap_err();
        assert!(matches!(err, RebalancerError::AlreadyRescaled(_)));
        assert_eq!(db.handbook.price_of(HEAVY_VEST), after_first);
        assert_eq!(sync.rescaled_count(), 1);
    }

    #[test]
    fn missing_handbook_entry_is_reported() {
        let mut db = fixture_database();
        let err = EconomySync::new().rescale(&mut db, "nope", 0.5).unwrap_err();
        assert!(matches!(err, RebalancerError::MissingHandbookEntry(id) if id == "nope"));
    }

    #[test]
    fn publish_offer_requires_a_trader_with_assort() {
        let mut db = fixture_database();
        let terms = OfferTerms {
            price: 100.0,
            buy_restriction: 2,
            loyalty_level: 1,
        };
        assert!(matches!(
            publish_offer(&mut db, "missing-trader", "x", terms),
            Err(RebalancerError::MissingTrader(_))
        ));
        publish_offer(&mut db, PLATE_TRADER, "x", terms).unwrap();
        let assort = db.traders[PLATE_TRADER].assort.as_ref().unwrap();
        assert_eq!(assort.loyal_level_items["x"], 1);
        assert_eq!(assort.barter_scheme["x"][0][0].tpl, ROUBLES);
    }
}
