//! Reorder threshold configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shelfcast_core::{DomainError, DomainResult, ProductName};

/// Where a product's reorder threshold comes from.
///
/// Lookups are by exact product name. A known product missing from the
/// per-product table is a configuration defect surfaced as
/// [`DomainError::MissingThreshold`]; deliberately no fuzzy or partial
/// matching, and no default fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdSource {
    /// One threshold per product (the service deployment strategy).
    PerProduct(BTreeMap<ProductName, i64>),
    /// A single threshold for every product (the interactive-script strategy).
    Global(i64),
}

impl ThresholdSource {
    /// The embedded per-product table used by the service deployment.
    pub fn service_defaults() -> Self {
        let table = [
            ("Sofa", 15),
            ("Television", 2),
            ("Bed", 2),
            ("Toaster", 2),
            ("Coffee Maker", 2),
            ("T-Shirt", 5),
            ("Laptop", 2),
            ("Dining Table", 1),
            ("Refrigerator", 1),
            ("Chair", 4),
            ("Microwave", 2),
            ("Washing Machine", 1),
            ("Smartphone", 6),
            ("Headphones", 7),
            ("Blender", 3),
            ("Monitor", 4),
            ("Tablet", 5),
            ("Camera", 2),
            ("Vacuum Cleaner", 1),
            ("Bookshelf", 2),
        ];
        Self::PerProduct(
            table
                .into_iter()
                .map(|(name, units)| (ProductName::from(name), units))
                .collect(),
        )
    }

    pub fn global(units: i64) -> Self {
        Self::Global(units)
    }

    /// Threshold for an exact product name.
    pub fn threshold_for(&self, product: &ProductName) -> DomainResult<i64> {
        match self {
            ThresholdSource::PerProduct(table) => table
                .get(product)
                .copied()
                .ok_or_else(|| DomainError::missing_threshold(product.as_str())),
            ThresholdSource::Global(units) => Ok(*units),
        }
    }
}
