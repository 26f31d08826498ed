//! Price calculation
//!
//! # Rules
//!
//! 1. **Weight leg**: food·R_food + nonFood·R_nonFood + hn7·R_hn7 with the
//!    per-kg rates of the mode (air or sea)
//! 2. **Volume leg** (sea only, all three sides > 0):
//!    max(L·W·H / 1,000,000, minVolume) · volumeRate
//! 3. **Base**: air → weight leg, sea → the higher leg (tie → weight),
//!    gp → fixed base rate
//! 4. **Currencies**: base EUR is kept to the cent, base XOF is
//!    round(base EUR · rate). The advance is normalized into both
//!    currencies and each remaining balance is computed from its own
//!    base/advance pair, floored at zero.
//! 5. **XOF advances** count at their exact EUR value for the EUR balance
//!    and the status; an open balance below one cent shows as 0.01.
//!
//! # Example
//!
//! ```text
//! sea, 100 x 50 x 50 cm, no weights
//!   volume        0.25 m³ -> billed 0.5 m³
//!   volume leg    0.5 x 375 = 187.50 EUR
//!   weight leg    0.00 EUR
//!   base          187.50 EUR (volume) = 122,992 XOF
//! ```

use crate::config::{PricingConfig, WeightRates};
use crate::money::{self, round_eur, round_xof};
use crate::parsing::{QuoteInput, RawQuoteInput};
use crate::rate_card::RateCard;
use crate::types::*;
use crate::{Error, Result};
use rust_decimal::Decimal;

/// cm³ per m³
const CM3_PER_M3: i64 = 1_000_000;

/// Stateless price calculator over an immutable configuration
///
/// Cheap to share behind an `Arc`; every call builds a fresh breakdown.
#[derive(Debug, Clone, Default)]
pub struct PriceCalculator {
    config: PricingConfig,
}

struct WeightLeg {
    food_cost: Decimal,
    non_food_cost: Decimal,
    hn7_cost: Decimal,
    total: Decimal,
}

struct VolumeLeg {
    volume: Decimal,
    billable_volume: Decimal,
    cost: Decimal,
}

impl PriceCalculator {
    /// Create calculator, validating the configuration
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// XOF per EUR
    pub fn exchange_rate(&self) -> Decimal {
        self.config.exchange.eur_to_xof
    }

    /// Schedule applicable to `mode`
    pub fn rate_card(&self, mode: TransportMode) -> RateCard {
        RateCard::for_mode(mode, &self.config)
    }

    /// Compute the price breakdown of one shipment
    ///
    /// Negative weights or dimensions count as zero, an advance that is not
    /// strictly positive counts as no advance. Dimensions are ignored for
    /// air and gp. Fails only when decimal arithmetic overflows.
    pub fn calculate(
        &self,
        mode: TransportMode,
        weights: &Weights,
        dimensions: Option<&Dimensions>,
        advance: Option<&AdvancePayment>,
    ) -> Result<PriceBreakdown> {
        let weights = weights.sanitized();
        let rate = self.exchange_rate();

        let total_weight = weights
            .food
            .checked_add(weights.non_food)
            .and_then(|sum| sum.checked_add(weights.hn7))
            .ok_or_else(|| Error::Overflow("total weight".to_string()))?;

        let mut details = PriceDetails {
            total_weight,
            food_cost: Decimal::ZERO,
            non_food_cost: Decimal::ZERO,
            hn7_cost: Decimal::ZERO,
            weight_based_cost: Decimal::ZERO,
            volume: None,
            billable_volume: None,
            volume_based_cost: None,
            applied_method: None,
        };

        let cost = match mode {
            TransportMode::Air => {
                let leg = weight_leg(&self.config.rates.air, &weights)?;
                leg.fill(&mut details);
                leg.total
            }
            TransportMode::Sea => {
                let leg = weight_leg(&self.config.rates.sea.per_kg, &weights)?;
                leg.fill(&mut details);

                let volume_leg = match dimensions {
                    Some(dims) => self.volume_leg(dims)?,
                    None => None,
                };

                match volume_leg {
                    Some(vol) => {
                        details.volume = Some(vol.volume);
                        details.billable_volume = Some(vol.billable_volume);
                        details.volume_based_cost = Some(vol.cost);

                        if vol.cost > leg.total {
                            details.applied_method = Some(CostingMethod::Volume);
                            vol.cost
                        } else {
                            details.applied_method = Some(CostingMethod::Weight);
                            leg.total
                        }
                    }
                    None => {
                        details.applied_method = Some(CostingMethod::Weight);
                        leg.total
                    }
                }
            }
            TransportMode::Gp => self.config.rates.gp.base,
        };

        let base_amount_eur = round_eur(cost);
        let base_amount_xof = money::eur_to_xof(base_amount_eur, rate)?;

        // EUR advances settle at the cent, XOF advances at their exact EUR value
        let (settled_eur, advance_amount_xof) = match advance.and_then(|a| {
            a.effective_amount().map(|amount| (amount, a.currency))
        }) {
            Some((amount, Currency::EUR)) => {
                let eur = round_eur(amount);
                (eur, money::eur_to_xof(eur, rate)?)
            }
            Some((amount, Currency::XOF)) => {
                let xof = round_xof(amount);
                (money::xof_value_in_eur(xof, rate)?, xof)
            }
            None => (Decimal::ZERO, Decimal::ZERO),
        };
        let advance_amount_eur = round_eur(settled_eur);

        let remaining_eur = money::round_eur_owed(money::outstanding(base_amount_eur, settled_eur));
        let remaining_xof = money::outstanding(base_amount_xof, advance_amount_xof);

        let payment_status = if remaining_eur.is_zero() || settled_eur >= base_amount_eur {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };

        tracing::debug!(
            "Quoted {} shipment: {} EUR / {} XOF, advance {} EUR, {}",
            mode,
            base_amount_eur,
            base_amount_xof,
            advance_amount_eur,
            payment_status
        );

        Ok(PriceBreakdown {
            mode,
            base_amount_eur,
            base_amount_xof,
            advance_amount_eur,
            advance_amount_xof,
            remaining_eur,
            remaining_xof,
            payment_status,
            details,
        })
    }

    /// Compute from already-parsed input
    pub fn calculate_input(&self, input: &QuoteInput) -> Result<PriceBreakdown> {
        self.calculate(
            input.mode,
            &input.weights,
            input.dimensions.as_ref(),
            input.advance.as_ref(),
        )
    }

    /// Compute from raw form text; unknown modes are `InvalidMode`
    pub fn calculate_raw(&self, mode: &str, raw: &RawQuoteInput) -> Result<PriceBreakdown> {
        let input = raw.into_quote_for(mode).map_err(|e| {
            tracing::warn!("Rejected quote request: {}", e);
            e
        })?;
        self.calculate_input(&input)
    }

    fn volume_leg(&self, dims: &Dimensions) -> Result<Option<VolumeLeg>> {
        let dims = Dimensions::new(dims.length, dims.width, dims.height);
        if !dims.is_complete() {
            return Ok(None);
        }

        let sea = &self.config.rates.sea;
        let cm3 = checked_mul(checked_mul(dims.length, dims.width)?, dims.height)?;
        let volume = cm3
            .checked_div(Decimal::from(CM3_PER_M3))
            .ok_or_else(|| Error::Overflow(format!("volume {} cm³", cm3)))?;
        let billable_volume = volume.max(sea.min_volume);
        let cost = checked_mul(billable_volume, sea.volume_rate)?;

        Ok(Some(VolumeLeg {
            volume,
            billable_volume,
            cost,
        }))
    }
}

impl WeightLeg {
    fn fill(&self, details: &mut PriceDetails) {
        details.food_cost = self.food_cost;
        details.non_food_cost = self.non_food_cost;
        details.hn7_cost = self.hn7_cost;
        details.weight_based_cost = self.total;
    }
}

fn weight_leg(rates: &WeightRates, weights: &Weights) -> Result<WeightLeg> {
    let food_cost = checked_mul(weights.food, rates.food)?;
    let non_food_cost = checked_mul(weights.non_food, rates.non_food)?;
    let hn7_cost = checked_mul(weights.hn7, rates.hn7)?;
    let total = food_cost
        .checked_add(non_food_cost)
        .and_then(|sum| sum.checked_add(hn7_cost))
        .ok_or_else(|| Error::Overflow("weight-based cost".to_string()))?;

    Ok(WeightLeg {
        food_cost,
        non_food_cost,
        hn7_cost,
        total,
    })
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| Error::Overflow(format!("{} x {}", a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn weights(food: &str, non_food: &str, hn7: &str) -> Weights {
        Weights::new(dec(food), dec(non_food), dec(hn7))
    }

    fn eur(amount: &str) -> AdvancePayment {
        AdvancePayment::new(dec(amount), Currency::EUR)
    }

    #[test]
    fn test_air_weighted_sum() {
        let calc = PriceCalculator::default();
        let quote = calc
            .calculate(TransportMode::Air, &weights("10", "5", "0"), None, None)
            .unwrap();

        assert_eq!(quote.base_amount_eur, dec("54.5"));
        assert_eq!(quote.base_amount_xof, dec("35750"));
        assert_eq!(quote.remaining_eur, dec("54.5"));
        assert_eq!(quote.remaining_xof, dec("35750"));
        assert_eq!(quote.payment_status, PaymentStatus::Pending);
        assert_eq!(quote.details.food_cost, dec("30"));
        assert_eq!(quote.details.non_food_cost, dec("24.5"));
        assert_eq!(quote.details.total_weight, dec("15"));
        assert_eq!(quote.details.applied_method, None);
    }

    #[test]
    fn test_air_ignores_dimensions() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("200"), dec("200"), dec("200"));
        let quote = calc
            .calculate(TransportMode::Air, &weights("1", "0", "0"), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.base_amount_eur, dec("3"));
        assert_eq!(quote.details.volume, None);
    }

    #[test]
    fn test_sea_minimum_volume() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("100"), dec("50"), dec("50"));
        let quote = calc
            .calculate(TransportMode::Sea, &Weights::default(), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.details.volume, Some(dec("0.25")));
        assert_eq!(quote.details.billable_volume, Some(dec("0.5")));
        assert_eq!(quote.details.volume_based_cost, Some(dec("187.5")));
        assert_eq!(quote.details.weight_based_cost, Decimal::ZERO);
        assert_eq!(quote.details.applied_method, Some(CostingMethod::Volume));
        assert_eq!(quote.base_amount_eur, dec("187.5"));
        // 187.5 * 655.957 = 122991.9375
        assert_eq!(quote.base_amount_xof, dec("122992"));
    }

    #[test]
    fn test_sea_weight_wins() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("100"), dec("100"), dec("100"));
        // volume leg 1 m³ * 375 = 375, weight leg 100 * 4 = 400
        let quote = calc
            .calculate(TransportMode::Sea, &weights("0", "100", "0"), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.details.volume_based_cost, Some(dec("375")));
        assert_eq!(quote.details.applied_method, Some(CostingMethod::Weight));
        assert_eq!(quote.base_amount_eur, dec("400"));
    }

    #[test]
    fn test_sea_tie_goes_to_weight() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("100"), dec("100"), dec("100"));
        // 150 kg food * 2.5 = 375 = volume leg
        let quote = calc
            .calculate(TransportMode::Sea, &weights("150", "0", "0"), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.details.applied_method, Some(CostingMethod::Weight));
        assert_eq!(quote.base_amount_eur, dec("375"));
    }

    #[test]
    fn test_sea_incomplete_dimensions_prices_weight_only() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("100"), Decimal::ZERO, dec("50"));
        let quote = calc
            .calculate(TransportMode::Sea, &weights("2", "0", "0"), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.details.volume_based_cost, None);
        assert_eq!(quote.details.applied_method, Some(CostingMethod::Weight));
        assert_eq!(quote.base_amount_eur, dec("5"));
    }

    #[test]
    fn test_gp_fixed_rate() {
        let calc = PriceCalculator::default();
        let dims = Dimensions::new(dec("300"), dec("300"), dec("300"));
        let quote = calc
            .calculate(TransportMode::Gp, &weights("80", "20", "3"), Some(&dims), None)
            .unwrap();

        assert_eq!(quote.base_amount_eur, dec("50"));
        assert_eq!(quote.details.weight_based_cost, Decimal::ZERO);
        assert_eq!(quote.details.total_weight, dec("103"));
    }

    #[test]
    fn test_partial_and_full_advance() {
        let calc = PriceCalculator::default();
        let w = weights("10", "5", "0");

        let partial = calc
            .calculate(TransportMode::Air, &w, None, Some(&eur("40")))
            .unwrap();
        assert_eq!(partial.remaining_eur, dec("14.5"));
        assert_eq!(partial.advance_amount_xof, dec("26238"));
        assert_eq!(partial.remaining_xof, dec("9512"));
        assert_eq!(partial.payment_status, PaymentStatus::Pending);

        let full = calc
            .calculate(TransportMode::Air, &w, None, Some(&eur("54.5")))
            .unwrap();
        assert_eq!(full.remaining_eur, Decimal::ZERO);
        assert_eq!(full.remaining_xof, Decimal::ZERO);
        assert_eq!(full.payment_status, PaymentStatus::Completed);
    }

    #[test]
    fn test_overpayment_floors_at_zero() {
        let calc = PriceCalculator::default();
        let quote = calc
            .calculate(TransportMode::Gp, &Weights::default(), None, Some(&eur("80")))
            .unwrap();

        assert_eq!(quote.remaining_eur, Decimal::ZERO);
        assert_eq!(quote.remaining_xof, Decimal::ZERO);
        assert!(quote.is_paid());
    }

    #[test]
    fn test_xof_advance() {
        let calc = PriceCalculator::default();
        // gp base 50 EUR = 32798 XOF (32797.85)
        let advance = AdvancePayment::new(dec("32798"), Currency::XOF);
        let quote = calc
            .calculate(TransportMode::Gp, &Weights::default(), None, Some(&advance))
            .unwrap();

        assert_eq!(quote.base_amount_xof, dec("32798"));
        assert_eq!(quote.advance_amount_xof, dec("32798"));
        // 32798 / 655.957 = 50.0002...
        assert_eq!(quote.advance_amount_eur, dec("50"));
        assert_eq!(quote.remaining_xof, Decimal::ZERO);
        assert_eq!(quote.payment_status, PaymentStatus::Completed);
    }

    #[test]
    fn test_xof_advance_few_francs_short_stays_pending() {
        let calc = PriceCalculator::default();
        // 32795 / 655.957 = 49.99565..., rounds to 50.00 but does not cover 50
        let advance = AdvancePayment::new(dec("32795"), Currency::XOF);
        let quote = calc
            .calculate(TransportMode::Gp, &Weights::default(), None, Some(&advance))
            .unwrap();

        assert_eq!(quote.advance_amount_eur, dec("50"));
        assert_eq!(quote.remaining_xof, dec("3"));
        assert_eq!(quote.remaining_eur, dec("0.01"));
        assert_eq!(quote.payment_status, PaymentStatus::Pending);
        assert!(!quote.is_paid());
    }

    #[test]
    fn test_non_positive_advance_ignored() {
        let calc = PriceCalculator::default();
        let quote = calc
            .calculate(TransportMode::Gp, &Weights::default(), None, Some(&eur("-5")))
            .unwrap();

        assert_eq!(quote.advance_amount_eur, Decimal::ZERO);
        assert_eq!(quote.remaining_eur, dec("50"));
        assert!(!quote.has_advance());
    }

    #[test]
    fn test_raw_input() {
        let calc = PriceCalculator::default();
        let raw = RawQuoteInput {
            food_weight: "10".into(),
            non_food_weight: "5kg".into(),
            hn7_weight: "abc".into(),
            advance: Some(crate::RawAdvancePayment::new("abc", Currency::EUR)),
            ..Default::default()
        };

        let quote = calc.calculate_raw("air", &raw).unwrap();
        assert_eq!(quote.base_amount_eur, dec("54.5"));
        assert_eq!(quote.remaining_eur, dec("54.5"));

        let err = calc.calculate_raw("truck", &raw).unwrap_err();
        assert!(matches!(err, Error::InvalidMode(_)));
    }

    #[test]
    fn test_overflow_is_reported() {
        let calc = PriceCalculator::default();
        let huge = Decimal::MAX;
        let quote = calc.calculate(TransportMode::Air, &Weights::new(huge, huge, huge), None, None);
        assert!(matches!(quote, Err(Error::Overflow(_))));
    }

    #[test]
    fn test_custom_rates() {
        let mut config = PricingConfig::default();
        config.rates.gp.base = dec("65");
        config.exchange.eur_to_xof = dec("600");
        let calc = PriceCalculator::new(config).unwrap();

        let quote = calc
            .calculate(TransportMode::Gp, &Weights::default(), None, None)
            .unwrap();
        assert_eq!(quote.base_amount_eur, dec("65"));
        assert_eq!(quote.base_amount_xof, dec("39000"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PricingConfig::default();
        config.exchange.eur_to_xof = dec("-1");
        assert!(PriceCalculator::new(config).is_err());
    }

    #[test]
    fn test_breakdown_json_names() {
        let calc = PriceCalculator::default();
        let quote = calc
            .calculate(TransportMode::Air, &weights("10", "5", "0"), None, None)
            .unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["baseAmountEUR"], "54.5");
        assert_eq!(json["remainingXOF"], "35750");
        assert_eq!(json["paymentStatus"], "pending");
        assert_eq!(json["mode"], "air");
        assert!(json["details"]["weightBasedCost"].is_string());
    }
}
