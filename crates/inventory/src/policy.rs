//! Reorder and movement rules over a product's observed state.

use chrono::{Days, NaiveDate};

use shelfcast_core::{DomainResult, ProductState};

use crate::thresholds::ThresholdSource;

/// Restocking policy for one store.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPolicy {
    source: ThresholdSource,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self::new(ThresholdSource::service_defaults())
    }
}

impl ReorderPolicy {
    pub fn new(source: ThresholdSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &ThresholdSource {
        &self.source
    }

    /// Find the first projected day where BOTH stock counters fall below the
    /// product's threshold.
    ///
    /// Each day i (1-indexed) subtracts only that single day's prediction from
    /// the *last observed* raw stocks, not from a running projected stock.
    /// A cumulative variant would trigger earlier; the policy is deliberately
    /// the non-cumulative one. The returned date is the last observed date
    /// plus i days.
    pub fn check_reorder(
        &self,
        state: &ProductState,
        predictions: &[i64],
    ) -> DomainResult<(bool, Option<NaiveDate>)> {
        let threshold = self.source.threshold_for(state.product())? as f64;
        let (Some(last_date), Some(visible), Some(inventory)) = (
            state.last_date(),
            state.last_visible_stock(),
            state.last_inventory_stock(),
        ) else {
            return Ok((false, None));
        };

        for (i, &p) in predictions.iter().enumerate() {
            let projected_visible = visible - p as f64;
            let projected_inventory = inventory - p as f64;
            if projected_visible < threshold && projected_inventory < threshold {
                let date = last_date
                    .checked_add_days(Days::new(i as u64 + 1))
                    .unwrap_or(last_date);
                return Ok((true, Some(date)));
            }
        }
        Ok((false, None))
    }

    /// Move units from backroom inventory onto the shelf when the latest
    /// visible stock sits below threshold and inventory is positive.
    ///
    /// Moves `min(threshold − visible, inventory)` units, mutating the last
    /// row's raw stock columns in place. Returns the units moved, if any.
    pub fn move_to_visible(&self, state: &mut ProductState) -> DomainResult<Option<f64>> {
        let threshold = self.source.threshold_for(state.product())? as f64;
        let (Some(visible), Some(inventory)) =
            (state.last_visible_stock(), state.last_inventory_stock())
        else {
            return Ok(None);
        };

        if visible < threshold && inventory > 0.0 {
            let units = (threshold - visible).min(inventory);
            state.adjust_last_raw_stock(units, -units);
            tracing::info!(
                product = %state.product(),
                units,
                "moved backroom inventory to visible stock"
            );
            return Ok(Some(units));
        }
        Ok(None)
    }

    /// Shortfall between total projected demand and total current coverage:
    /// `max(0, sum(predictions) − (last visible + last inventory))`.
    pub fn order_quantity(&self, state: &ProductState, predictions: &[i64]) -> i64 {
        let coverage = state.last_visible_stock().unwrap_or(0.0)
            + state.last_inventory_stock().unwrap_or(0.0);
        let total_demand: i64 = predictions.iter().sum();
        let shortfall = total_demand as f64 - coverage;
        if shortfall > 0.0 {
            shortfall.round() as i64
        } else {
            0
        }
    }
}
