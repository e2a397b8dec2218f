use serde::{Deserialize, Serialize};
use volo_shared::OfferKind;

use crate::source::RouteFilter;
use crate::{CoreError, CoreResult};

pub const DEFAULT_MIN_DISCOUNT: f64 = 50.0;
pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

/// Which kinds of offer a request covers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OfferTypeFilter {
    #[default]
    All,
    Flight,
    Cruise,
}

impl OfferTypeFilter {
    pub fn includes(&self, kind: OfferKind) -> bool {
        match self {
            OfferTypeFilter::All => true,
            OfferTypeFilter::Flight => kind == OfferKind::Flight,
            OfferTypeFilter::Cruise => kind == OfferKind::Cruise,
        }
    }
}

/// Aggregate discount figures for one collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscountStats {
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// Live search criteria. `passengers` and the dates are accepted but do not filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_min_discount")]
    pub min_discount: f64,
    #[serde(default)]
    pub offer_type: OfferTypeFilter,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            departure: None,
            arrival: None,
            departure_date: None,
            return_date: None,
            passengers: default_passengers(),
            min_discount: default_min_discount(),
            offer_type: OfferTypeFilter::All,
        }
    }
}

impl SearchCriteria {
    /// Route constraints as uppercase codes, blank ones treated as absent.
    pub fn route(&self) -> RouteFilter {
        RouteFilter::new(self.departure.clone(), self.arrival.clone())
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_min_discount(self.min_discount)?;
        if let RouteFilter { departure: Some(dep), arrival: Some(arr) } = self.route() {
            if dep == arr {
                return Err(CoreError::ValidationError(format!(
                    "departure and arrival must differ (both {})",
                    dep
                )));
            }
        }
        Ok(())
    }
}

/// Stored-offer listing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offer_type: OfferTypeFilter,
    #[serde(default = "default_min_discount")]
    pub min_discount: f64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offer_type: OfferTypeFilter::All,
            min_discount: default_min_discount(),
            limit: default_limit(),
        }
    }
}

impl ListQuery {
    pub fn validate(&self) -> CoreResult<()> {
        validate_min_discount(self.min_discount)?;
        if !(1..=MAX_LIST_LIMIT).contains(&self.limit) {
            return Err(CoreError::ValidationError(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIST_LIMIT, self.limit
            )));
        }
        Ok(())
    }
}

fn validate_min_discount(min_discount: f64) -> CoreResult<()> {
    if !(0.0..=100.0).contains(&min_discount) {
        return Err(CoreError::ValidationError(format!(
            "min_discount must be between 0 and 100, got {}",
            min_discount
        )));
    }
    Ok(())
}

fn default_passengers() -> u32 { 1 }
fn default_min_discount() -> f64 { DEFAULT_MIN_DISCOUNT }
fn default_limit() -> usize { DEFAULT_LIST_LIMIT }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_criteria_defaults() {
        let criteria: SearchCriteria = serde_json::from_str("{}").expect("Failed to deserialize");
        assert_eq!(criteria.passengers, 1);
        assert_eq!(criteria.min_discount, 50.0);
        assert_eq!(criteria.offer_type, OfferTypeFilter::All);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_search_criteria_rejects_same_airports() {
        let criteria = SearchCriteria {
            departure: Some("JFK".to_string()),
            arrival: Some("JFK".to_string()),
            ..Default::default()
        };
        assert!(matches!(criteria.validate(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_same_airports_rejected_regardless_of_case() {
        let criteria = SearchCriteria {
            departure: Some("jfk".to_string()),
            arrival: Some(" JFK".to_string()),
            ..Default::default()
        };
        assert!(matches!(criteria.validate(), Err(CoreError::ValidationError(_))));

        let criteria = SearchCriteria {
            departure: Some("lax".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.route().departure.as_deref(), Some("LAX"));
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_blank_route_codes_are_absent() {
        let criteria = SearchCriteria {
            departure: Some("  ".to_string()),
            arrival: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.route(), RouteFilter::default());
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_list_query_bounds() {
        let mut query = ListQuery::default();
        assert!(query.validate().is_ok());

        query.limit = 0;
        assert!(query.validate().is_err());
        query.limit = 101;
        assert!(query.validate().is_err());

        query.limit = 100;
        query.min_discount = 100.5;
        assert!(query.validate().is_err());
        query.min_discount = -1.0;
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_offer_type_filter() {
        let filter: OfferTypeFilter = serde_json::from_str("\"cruise\"").expect("Failed to deserialize");
        assert!(filter.includes(OfferKind::Cruise));
        assert!(!filter.includes(OfferKind::Flight));
        assert!(OfferTypeFilter::All.includes(OfferKind::Flight));
    }
}
