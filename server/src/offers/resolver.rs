//! Offer Discount Resolver
//!
//! Determines the discount percentage that applies to a restaurant at a
//! given date and time by merging per-half-hour offer rules with
//! slot-level overrides, and materializes concrete slots from offers.

use super::OfferError;
use crate::db::models::{Offer, OfferTimeSlot, Slot, SlotCreate, SlotStatus};
use crate::db::repository::{OfferRepository, RepoError, RestaurantRepository, SlotRepository};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::SqlitePool;

/// Which side won when a slot override and an offer rule both price the
/// same time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountSource {
    Slot,
    Offer,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedDiscount {
    pub percentage: f64,
    pub source: DiscountSource,
}

/// What the offers say about one (restaurant, date, time) point:
/// whether any offer covers it at all, and the best convertible
/// percentage if one exists. Covered-but-priceless happens for
/// amount-only offers without a reference price.
#[derive(Debug, Clone, Copy)]
pub struct OfferCoverage {
    pub covered: bool,
    pub percentage: Option<f64>,
}

/// Defaults applied when materializing a slot
#[derive(Debug, Clone, Copy)]
pub struct SlotDefaults {
    pub capacity: i64,
    pub min_party_size: i64,
    pub max_party_size: i64,
}

impl Default for SlotDefaults {
    fn default() -> Self {
        Self {
            capacity: 0,
            min_party_size: 1,
            max_party_size: 20,
        }
    }
}

#[derive(Clone)]
pub struct DiscountResolver {
    pool: SqlitePool,
}

impl DiscountResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The offer-derived discount percentage for a restaurant at
    /// date+time, if any offer covers it and is convertible.
    pub async fn discount_for(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<f64>, OfferError> {
        Ok(self.offer_coverage(restaurant_id, date, time).await?.percentage)
    }

    /// Scan the active offers covering `date` and fold in their rules.
    /// An explicit half-hour rule beats the offer's coarse window; the
    /// highest percentage across offers wins.
    pub async fn offer_coverage(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<OfferCoverage, OfferError> {
        let repo = OfferRepository::new(self.pool.clone());
        let offers = repo.find_active_covering(restaurant_id, date).await?;

        let mut covered = false;
        let mut best: Option<f64> = None;

        for offer in offers {
            if !offer.applies_on(date) {
                continue;
            }

            let time_slots = repo.active_time_slots(offer.id).await?;
            let matched: Option<&OfferTimeSlot> =
                time_slots.iter().find(|ts| ts.covers_time(time));

            let pct = match matched {
                Some(ts) => {
                    covered = true;
                    convert_to_percentage(
                        ts.discount_percentage,
                        ts.discount_amount,
                        offer.original_price,
                    )
                }
                None if offer.covers_time(time) => {
                    covered = true;
                    offer_percentage(&offer)
                }
                None => None,
            };

            if let Some(p) = pct {
                best = Some(best.map_or(p, |b| b.max(p)));
            }
        }

        Ok(OfferCoverage {
            covered,
            percentage: best,
        })
    }

    /// Resolve the displayed discount for a materialized slot, merging
    /// the slot's own override with the offer-derived percentage.
    pub async fn resolve_for_slot(&self, slot: &Slot) -> Result<Option<ResolvedDiscount>, OfferError> {
        let offer_pct = self
            .discount_for(slot.restaurant_id, slot.date, slot.start_time)
            .await?;
        Ok(merge_discounts(slot.discount_percentage, offer_pct))
    }

    /// Idempotently create the concrete 30-minute slot behind an offer
    /// window. An existing slot at the key is returned unchanged; a new
    /// one requires at least one covering offer.
    pub async fn materialize_slot(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        defaults: SlotDefaults,
    ) -> Result<Slot, OfferError> {
        let restaurants = RestaurantRepository::new(self.pool.clone());
        if restaurants.find_by_id(restaurant_id).await?.is_none() {
            return Err(OfferError::RestaurantNotFound(restaurant_id));
        }

        let slots = SlotRepository::new(self.pool.clone());
        if let Some(existing) = slots.find_at(restaurant_id, date, time).await? {
            return Ok(existing);
        }

        let coverage = self.offer_coverage(restaurant_id, date, time).await?;
        if !coverage.covered {
            return Err(OfferError::NoOfferCoversTime {
                restaurant_id,
                date,
                time,
            });
        }

        let create = SlotCreate {
            restaurant_id,
            date,
            start_time: time,
            end_time: time + Duration::minutes(30),
            capacity: defaults.capacity,
            min_party_size: defaults.min_party_size,
            max_party_size: defaults.max_party_size,
            discount_percentage: coverage.percentage,
            lead_time_minutes: 60,
            status: SlotStatus::Open,
            is_active: true,
        };
        match slots.create(&create).await {
            Ok(slot) => Ok(slot),
            // lost a materialize race: the unique key maps to Conflict upstream
            Err(RepoError::Duplicate(msg)) => Err(OfferError::Repo(RepoError::Duplicate(msg))),
            Err(e) => Err(e.into()),
        }
    }
}

/// The offer's own discount expressed as a percentage, if convertible
fn offer_percentage(offer: &Offer) -> Option<f64> {
    convert_to_percentage(
        offer.discount_percentage,
        offer.discount_amount,
        offer.original_price,
    )
}

/// Prefer an explicit percentage; otherwise convert a fixed amount via
/// `amount / original_price * 100`, clamped to [0, 100]. Amount-only
/// discounts without a reference price are omitted, never defaulted to 0.
fn convert_to_percentage(
    percentage: Option<f64>,
    amount: Option<f64>,
    original_price: Option<f64>,
) -> Option<f64> {
    if let Some(pct) = percentage {
        return Some(pct);
    }
    match (amount, original_price) {
        (Some(amount), Some(price)) if price > 0.0 => {
            Some((amount / price * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    }
}

/// Higher percentage wins between a slot override and an offer rule;
/// the winning source is kept for display.
fn merge_discounts(slot_pct: Option<f64>, offer_pct: Option<f64>) -> Option<ResolvedDiscount> {
    match (slot_pct, offer_pct) {
        (None, None) => None,
        (Some(s), None) => Some(ResolvedDiscount {
            percentage: s,
            source: DiscountSource::Slot,
        }),
        (None, Some(o)) => Some(ResolvedDiscount {
            percentage: o,
            source: DiscountSource::Offer,
        }),
        (Some(s), Some(o)) => {
            if (s - o).abs() < f64::EPSILON {
                Some(ResolvedDiscount {
                    percentage: s,
                    source: DiscountSource::Both,
                })
            } else if s > o {
                Some(ResolvedDiscount {
                    percentage: s,
                    source: DiscountSource::Slot,
                })
            } else {
                Some(ResolvedDiscount {
                    percentage: o,
                    source: DiscountSource::Offer,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_percentage_wins_over_amount() {
        assert_eq!(
            convert_to_percentage(Some(40.0), Some(5.0), Some(20.0)),
            Some(40.0)
        );
    }

    #[test]
    fn amount_converts_against_original_price() {
        assert_eq!(
            convert_to_percentage(None, Some(5.0), Some(20.0)),
            Some(25.0)
        );
    }

    #[test]
    fn oversized_amount_clamps_to_hundred() {
        assert_eq!(
            convert_to_percentage(None, Some(50.0), Some(20.0)),
            Some(100.0)
        );
    }

    #[test]
    fn amount_without_reference_price_is_omitted() {
        assert_eq!(convert_to_percentage(None, Some(5.0), None), None);
        assert_eq!(convert_to_percentage(None, Some(5.0), Some(0.0)), None);
    }

    #[test]
    fn higher_offer_percentage_beats_slot_override() {
        let resolved = merge_discounts(Some(30.0), Some(50.0)).unwrap();
        assert_eq!(resolved.percentage, 50.0);
        assert_eq!(resolved.source, DiscountSource::Offer);
    }

    #[test]
    fn higher_slot_override_beats_offer() {
        let resolved = merge_discounts(Some(60.0), Some(50.0)).unwrap();
        assert_eq!(resolved.percentage, 60.0);
        assert_eq!(resolved.source, DiscountSource::Slot);
    }

    #[test]
    fn equal_percentages_report_both() {
        let resolved = merge_discounts(Some(50.0), Some(50.0)).unwrap();
        assert_eq!(resolved.source, DiscountSource::Both);
    }

    #[test]
    fn slot_only_discount_stands_alone() {
        let resolved = merge_discounts(Some(30.0), None).unwrap();
        assert_eq!(resolved.percentage, 30.0);
        assert_eq!(resolved.source, DiscountSource::Slot);
    }
}
