use crate::model::Property;
use std::cmp::Ordering;

/// Caller-side criteria applied on top of the unfiltered candidate set the
/// sync core publishes from the search endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring match on the category
    pub kind_contains: Option<String>,
    /// Inclusive bounds
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Exact match
    pub bedrooms: Option<u32>,
}

impl SearchFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(kind) = &self.kind_contains {
            if !property
                .kind
                .to_lowercase()
                .contains(&kind.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if property.bedrooms != bedrooms {
                return false;
            }
        }
        true
    }
}

/// Filter and sort search results: date descending, ties broken by price
/// ascending.
pub fn apply(candidates: &[Property], filter: &SearchFilter) -> Vec<Property> {
    let mut results: Vec<Property> = candidates
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    results.sort_by(|a, b| match b.date.cmp(&a.date) {
        Ordering::Equal => a.price.total_cmp(&b.price),
        other => other,
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn property(id: i64, date: &str, kind: &str, price: f64, bedrooms: u32) -> Property {
        Property {
            id,
            date: date.parse::<NaiveDate>().unwrap(),
            kind: kind.into(),
            address: format!("{id} Test Lane"),
            bedrooms,
            bathrooms: 1,
            price,
            area: 80.0,
            notes: String::new(),
        }
    }

    #[test]
    fn sorts_by_date_descending_then_price_ascending() {
        let candidates = vec![
            property(1, "2024-01-10", "house", 300000.0, 3),
            property(2, "2024-03-01", "house", 500000.0, 3),
            property(3, "2024-01-10", "house", 250000.0, 3),
        ];
        let sorted = apply(&candidates, &SearchFilter::default());
        let ids: Vec<i64> = sorted.iter().map(|p| p.id).collect();
        // later date first; equal dates ordered by lower price first
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn kind_filter_is_case_insensitive_substring() {
        let candidates = vec![
            property(1, "2024-01-01", "Apartment", 1.0, 1),
            property(2, "2024-01-01", "detached house", 2.0, 1),
        ];
        let filter = SearchFilter {
            kind_contains: Some("apart".into()),
            ..Default::default()
        };
        let results = apply(&candidates, &filter);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let candidates = vec![
            property(1, "2024-01-01", "house", 100.0, 1),
            property(2, "2024-01-01", "house", 200.0, 1),
            property(3, "2024-01-01", "house", 300.0, 1),
        ];
        let filter = SearchFilter {
            min_price: Some(100.0),
            max_price: Some(200.0),
            ..Default::default()
        };
        let ids: Vec<i64> = apply(&candidates, &filter).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn bedrooms_filter_is_exact() {
        let candidates = vec![
            property(1, "2024-01-01", "house", 1.0, 2),
            property(2, "2024-01-01", "house", 1.0, 3),
        ];
        let filter = SearchFilter {
            bedrooms: Some(3),
            ..Default::default()
        };
        let ids: Vec<i64> = apply(&candidates, &filter).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
