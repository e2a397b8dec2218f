use rand::Rng;
use std::ops::RangeInclusive;

/// Bounds for one offer kind's synthetic price pair.
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    /// Original (pre-discount) price range.
    pub original_price: RangeInclusive<f64>,

    /// Discount percentage range.
    pub discount: RangeInclusive<f64>,
}

impl PricingPolicy {
    pub fn flights() -> Self {
        Self {
            original_price: 800.0..=2500.0,
            discount: 50.0..=92.0,
        }
    }

    pub fn cruises() -> Self {
        Self {
            original_price: 1500.0..=6000.0,
            discount: 50.0..=88.0,
        }
    }

    /// Draw a price pair that honours the policy bounds.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PriceQuote {
        let original = rng.gen_range(self.original_price.clone());
        let discount = rng.gen_range(self.discount.clone());
        PriceQuote::from_discount(original, discount)
    }
}

/// Original/current price with the discount that links them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub original_price: f64,
    pub current_price: f64,
    pub discount_percentage: f64,
}

impl PriceQuote {
    /// Prices are rounded to cents and the discount to one decimal;
    /// the current price is derived from the rounded discount so the
    /// three figures stay consistent.
    pub fn from_discount(original: f64, discount: f64) -> Self {
        let original_price = round_to(original, 2);
        let discount_percentage = round_to(discount.clamp(0.0, 100.0), 1);
        let current_price = round_to(original_price * (1.0 - discount_percentage / 100.0), 2);
        Self {
            original_price,
            current_price,
            discount_percentage,
        }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345_6, 2), 12.35);
        assert_eq!(round_to(67.25, 1), 67.3);
        assert_eq!(round_to(3.0, 1), 3.0);
    }

    #[test]
    fn test_quote_from_discount() {
        let quote = PriceQuote::from_discount(1000.0, 62.44);
        assert_eq!(quote.discount_percentage, 62.4);
        assert_eq!(quote.original_price, 1000.0);
        assert_eq!(quote.current_price, 376.0);
    }

    #[test]
    fn test_sampled_quotes_hold_price_invariants() {
        let mut rng = rand::thread_rng();
        for policy in [PricingPolicy::flights(), PricingPolicy::cruises()] {
            for _ in 0..500 {
                let q = policy.sample(&mut rng);
                assert!(q.current_price > 0.0);
                assert!(q.current_price <= q.original_price);
                assert!(policy.discount.contains(&q.discount_percentage));

                let implied = round_to((1.0 - q.current_price / q.original_price) * 100.0, 1);
                assert!((implied - q.discount_percentage).abs() <= 0.1 + 1e-9);
            }
        }
    }
}
