//! Daily sales/stock records and the per-product rolling state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::ProductName;

/// One cleaned row from a store's combined data file.
///
/// Immutable once ingested; rows with any missing field are dropped before a
/// `DailyRecord` is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub product_name: ProductName,
    pub amount_sold: f64,
    pub visible_stock: f64,
    pub inventory_stock: f64,
}

/// A `DailyRecord` plus its three min-max scaled signals.
///
/// The scaled fields are fit over the *entire* combined dataset for the store,
/// not per product (see `shelfcast-data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledRecord {
    pub daily: DailyRecord,
    pub scaled_demand: f64,
    pub scaled_visible_stock: f64,
    pub scaled_inventory_stock: f64,
}

/// Mutable rolling view of one product's scaled history.
///
/// Owned exclusively by one projection run. Autoregressive steps append
/// synthetic future rows; historical rows are never rewritten (the single
/// exception is the backroom→shelf movement rule, which adjusts the last row's
/// raw stock columns in place).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductState {
    product: ProductName,
    rows: Vec<ScaledRecord>,
}

impl ProductState {
    pub fn new(product: ProductName, rows: Vec<ScaledRecord>) -> Self {
        Self { product, rows }
    }

    pub fn product(&self) -> &ProductName {
        &self.product
    }

    pub fn rows(&self) -> &[ScaledRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: ScaledRecord) {
        self.rows.push(row);
    }

    pub fn last(&self) -> Option<&ScaledRecord> {
        self.rows.last()
    }

    /// Latest observed calendar date, if any rows exist.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.daily.date)
    }

    pub fn last_visible_stock(&self) -> Option<f64> {
        self.rows.last().map(|r| r.daily.visible_stock)
    }

    pub fn last_inventory_stock(&self) -> Option<f64> {
        self.rows.last().map(|r| r.daily.inventory_stock)
    }

    /// Adjust the last row's raw stock columns in place (movement rule).
    pub fn adjust_last_raw_stock(&mut self, visible_delta: f64, inventory_delta: f64) {
        if let Some(row) = self.rows.last_mut() {
            row.daily.visible_stock += visible_delta;
            row.daily.inventory_stock += inventory_delta;
        }
    }
}

/// Fixed-length run of consecutive `[scaled_demand, scaled_visible_stock,
/// scaled_inventory_stock]` triples, the supervised-learning unit.
pub type Window = Vec<[f64; 3]>;

/// Coarse banding of the peak predicted daily demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandSpike {
    Low,
    Medium,
    High,
}

impl DemandSpike {
    /// Fixed banding: High above 20 units/day, Medium above 10, else Low.
    pub fn classify(max_daily_prediction: i64) -> Self {
        if max_daily_prediction > 20 {
            DemandSpike::High
        } else if max_daily_prediction > 10 {
            DemandSpike::Medium
        } else {
            DemandSpike::Low
        }
    }
}

impl core::fmt::Display for DemandSpike {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            DemandSpike::Low => "Low",
            DemandSpike::Medium => "Medium",
            DemandSpike::High => "High",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, visible: f64, inventory: f64) -> ScaledRecord {
        ScaledRecord {
            daily: DailyRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                product_name: ProductName::from("Sofa"),
                amount_sold: 3.0,
                visible_stock: visible,
                inventory_stock: inventory,
            },
            scaled_demand: 0.5,
            scaled_visible_stock: 0.5,
            scaled_inventory_stock: 0.5,
        }
    }

    #[test]
    fn last_accessors_track_latest_row() {
        let mut state = ProductState::new(
            ProductName::from("Sofa"),
            vec![record(1, 10.0, 5.0), record(2, 8.0, 4.0)],
        );
        assert_eq!(state.last_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(state.last_visible_stock(), Some(8.0));
        assert_eq!(state.last_inventory_stock(), Some(4.0));

        state.push(record(3, 6.0, 3.0));
        assert_eq!(state.last_visible_stock(), Some(6.0));
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn adjust_last_raw_stock_only_touches_last_row() {
        let mut state = ProductState::new(
            ProductName::from("Sofa"),
            vec![record(1, 10.0, 5.0), record(2, 8.0, 4.0)],
        );
        state.adjust_last_raw_stock(2.0, -2.0);
        assert_eq!(state.rows()[0].daily.visible_stock, 10.0);
        assert_eq!(state.last_visible_stock(), Some(10.0));
        assert_eq!(state.last_inventory_stock(), Some(2.0));
    }

    #[test]
    fn spike_banding_boundaries() {
        assert_eq!(DemandSpike::classify(0), DemandSpike::Low);
        assert_eq!(DemandSpike::classify(10), DemandSpike::Low);
        assert_eq!(DemandSpike::classify(11), DemandSpike::Medium);
        assert_eq!(DemandSpike::classify(20), DemandSpike::Medium);
        assert_eq!(DemandSpike::classify(21), DemandSpike::High);
    }
}
