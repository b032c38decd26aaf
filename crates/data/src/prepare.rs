//! Scaling of combined datasets and per-product state preparation.

use shelfcast_core::{DailyRecord, ProductName, ProductState, ScaledRecord};

use crate::scaler::MinMaxScaler;

/// Scale a combined dataset, returning the fitted demand and stock scalers.
///
/// One scaler is fit over `amount_sold`; a single stock scaler is shared
/// across both stock columns, fit on each column in turn before transforming
/// it. Its returned state therefore reflects the inventory column, the last
/// fit. Only the demand scaler is used for inverse transforms downstream.
pub fn scale_records(
    records: &[DailyRecord],
) -> (Vec<ScaledRecord>, MinMaxScaler, MinMaxScaler) {
    let demand_values: Vec<f64> = records.iter().map(|r| r.amount_sold).collect();
    let visible_values: Vec<f64> = records.iter().map(|r| r.visible_stock).collect();
    let inventory_values: Vec<f64> = records.iter().map(|r| r.inventory_stock).collect();

    let demand_scaler = MinMaxScaler::fit(&demand_values);
    let visible_scaler = MinMaxScaler::fit(&visible_values);
    let stock_scaler = MinMaxScaler::fit(&inventory_values);

    let scaled = records
        .iter()
        .map(|r| ScaledRecord {
            daily: r.clone(),
            scaled_demand: demand_scaler.transform(r.amount_sold),
            scaled_visible_stock: visible_scaler.transform(r.visible_stock),
            scaled_inventory_stock: stock_scaler.transform(r.inventory_stock),
        })
        .collect();

    (scaled, demand_scaler, stock_scaler)
}

/// Build the rolling state for one product from a scaled combined dataset.
///
/// The product's rows keep their ingestion order. Their forward scaled fields
/// are refit over the product subset; the globally fitted demand scaler from
/// [`scale_records`] must still be the one used to inverse-transform
/// predictions.
///
/// Returns `None` when the product does not appear in the dataset.
pub fn prepare_product_state(
    scaled: &[ScaledRecord],
    product: &ProductName,
) -> Option<ProductState> {
    let subset: Vec<DailyRecord> = scaled
        .iter()
        .filter(|r| &r.daily.product_name == product)
        .map(|r| r.daily.clone())
        .collect();
    if subset.is_empty() {
        return None;
    }

    let (rows, _, _) = scale_records(&subset);
    Some(ProductState::new(product.clone(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, product: &str, sold: f64, visible: f64, inventory: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            product_name: ProductName::from(product),
            amount_sold: sold,
            visible_stock: visible,
            inventory_stock: inventory,
        }
    }

    #[test]
    fn demand_scaler_is_fit_globally() {
        let records = vec![
            record(1, "Sofa", 2.0, 10.0, 5.0),
            record(2, "Sofa", 6.0, 9.0, 5.0),
            record(3, "Chair", 10.0, 8.0, 4.0),
        ];
        let (scaled, demand, _) = scale_records(&records);
        assert_eq!(demand.data_min(), 2.0);
        assert_eq!(demand.data_max(), 10.0);
        assert_eq!(scaled[0].scaled_demand, 0.0);
        assert_eq!(scaled[1].scaled_demand, 0.5);
        assert_eq!(scaled[2].scaled_demand, 1.0);
    }

    #[test]
    fn stock_columns_each_scale_over_their_own_range() {
        let records = vec![
            record(1, "Sofa", 2.0, 10.0, 0.0),
            record(2, "Sofa", 6.0, 20.0, 8.0),
        ];
        let (scaled, _, stock) = scale_records(&records);
        assert_eq!(scaled[0].scaled_visible_stock, 0.0);
        assert_eq!(scaled[1].scaled_visible_stock, 1.0);
        assert_eq!(scaled[0].scaled_inventory_stock, 0.0);
        assert_eq!(scaled[1].scaled_inventory_stock, 1.0);
        // Returned stock scaler carries the last (inventory) fit.
        assert_eq!(stock.data_max(), 8.0);
    }

    #[test]
    fn product_state_refits_over_the_subset() {
        let records = vec![
            record(1, "Sofa", 2.0, 10.0, 5.0),
            record(2, "Sofa", 4.0, 9.0, 5.0),
            record(3, "Chair", 100.0, 8.0, 4.0),
        ];
        let (scaled, _, _) = scale_records(&records);
        let state = prepare_product_state(&scaled, &ProductName::from("Sofa")).unwrap();

        assert_eq!(state.len(), 2);
        // Subset-local fit: the Sofa maximum (4.0) scales to 1.0 even though
        // the combined maximum is 100.0.
        assert_eq!(state.rows()[1].scaled_demand, 1.0);
    }

    #[test]
    fn unknown_product_yields_none() {
        let records = vec![record(1, "Sofa", 2.0, 10.0, 5.0)];
        let (scaled, _, _) = scale_records(&records);
        assert!(prepare_product_state(&scaled, &ProductName::from("Bed")).is_none());
    }
}
