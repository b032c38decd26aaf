//! Autoregressive roll-forward of one product's state.

use chrono::Days;

use shelfcast_core::{PipelineConfig, ProductState, ScaledRecord, Window};
use shelfcast_data::MinMaxScaler;

/// Projects a product `future_days` ahead, one day at a time, feeding each
/// prediction back as synthetic history.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    sequence_length: usize,
    future_days: usize,
}

impl Projector {
    pub fn new(sequence_length: usize, future_days: usize) -> Self {
        Self {
            sequence_length,
            future_days,
        }
    }

    pub fn from_config(cfg: &PipelineConfig) -> Self {
        Self::new(cfg.sequence_length, cfg.future_days)
    }

    /// Roll the product forward, returning rounded integer demand predictions.
    ///
    /// The projection owns its working copy of the state; the caller's state
    /// is left untouched (the policy checks run against *observed* history).
    /// If at any step fewer than `sequence_length` rows are available, the
    /// projection stops and returns what it has: a short-horizon partial
    /// result, not an error.
    ///
    /// Feedback is intentionally unit-inconsistent: the synthetic row's scaled
    /// counters are depleted by the scaled-space model output, while its raw
    /// stock columns are depleted by the rounded inverse-transformed
    /// prediction. The compounding scaling error across steps is a known
    /// property of this pipeline; downstream policy checks only read observed
    /// history, so it stays contained to the projection.
    pub fn project<F>(
        &self,
        state: &ProductState,
        predict: F,
        demand_scaler: &MinMaxScaler,
    ) -> Vec<i64>
    where
        F: Fn(&Window) -> f64,
    {
        let mut rows: Vec<ScaledRecord> = state.rows().to_vec();
        let mut predictions = Vec::with_capacity(self.future_days);

        for step in 0..self.future_days {
            if rows.len() < self.sequence_length {
                tracing::debug!(
                    product = %state.product(),
                    step,
                    available = rows.len(),
                    needed = self.sequence_length,
                    "history shorter than one window; stopping projection"
                );
                break;
            }

            let window: Window = rows[rows.len() - self.sequence_length..]
                .iter()
                .map(|r| {
                    [
                        r.scaled_demand,
                        r.scaled_visible_stock,
                        r.scaled_inventory_stock,
                    ]
                })
                .collect();

            let scaled_prediction = predict(&window);
            let raw_prediction = demand_scaler.inverse_transform(scaled_prediction);
            let rounded = raw_prediction.round() as i64;
            predictions.push(rounded);

            let prev = rows.last().expect("at least sequence_length rows");
            let mut synthetic = prev.clone();
            synthetic.daily.date = prev
                .daily
                .date
                .checked_add_days(Days::new(1))
                .unwrap_or(prev.daily.date);
            synthetic.daily.amount_sold = raw_prediction;
            synthetic.daily.visible_stock = prev.daily.visible_stock - rounded as f64;
            synthetic.daily.inventory_stock = prev.daily.inventory_stock - rounded as f64;
            synthetic.scaled_demand = scaled_prediction;
            synthetic.scaled_visible_stock = prev.scaled_visible_stock - scaled_prediction;
            synthetic.scaled_inventory_stock = prev.scaled_inventory_stock - scaled_prediction;
            rows.push(synthetic);
        }

        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shelfcast_core::{DailyRecord, ProductName};

    fn state(rows: usize) -> ProductState {
        let product = ProductName::from("Blender");
        let records = (0..rows)
            .map(|i| ScaledRecord {
                daily: DailyRecord {
                    date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    product_name: product.clone(),
                    amount_sold: 4.0,
                    visible_stock: 20.0,
                    inventory_stock: 10.0,
                },
                scaled_demand: 0.4,
                scaled_visible_stock: 0.8,
                scaled_inventory_stock: 0.6,
            })
            .collect();
        ProductState::new(product, records)
    }

    fn scaler() -> MinMaxScaler {
        // Demand range 0..10: scaled 0.4 is 4 units.
        MinMaxScaler::fit(&[0.0, 10.0])
    }

    #[test]
    fn full_history_yields_future_days_predictions() {
        let projector = Projector::new(7, 7);
        let predictions = projector.project(&state(9), |_| 0.4, &scaler());
        assert_eq!(predictions, vec![4; 7]);
    }

    #[test]
    fn short_history_yields_empty_partial_result() {
        let projector = Projector::new(7, 7);
        let predictions = projector.project(&state(6), |_| 0.4, &scaler());
        assert!(predictions.is_empty());
    }

    #[test]
    fn caller_state_is_not_extended() {
        let s = state(8);
        let projector = Projector::new(7, 7);
        let _ = projector.project(&s, |_| 0.4, &scaler());
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn predictions_are_inverse_transformed_and_rounded() {
        let projector = Projector::new(7, 1);
        // Scaled 0.37 over range 0..10 is 3.7 units, rounding to 4.
        let predictions = projector.project(&state(7), |_| 0.37, &scaler());
        assert_eq!(predictions, vec![4]);
    }

    #[test]
    fn feedback_window_carries_the_raw_scaled_output() {
        let projector = Projector::new(7, 2);
        // First step emits 0.37; the second window's newest row must hold the
        // unrounded scaled value and the depleted scaled stocks.
        let seen = std::cell::RefCell::new(Vec::new());
        let _ = projector.project(
            &state(7),
            |w| {
                seen.borrow_mut().push(w.clone());
                0.37
            },
            &scaler(),
        );
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        let newest = *seen[1].last().unwrap();
        assert!((newest[0] - 0.37).abs() < 1e-12);
        assert!((newest[1] - (0.8 - 0.37)).abs() < 1e-12);
        assert!((newest[2] - (0.6 - 0.37)).abs() < 1e-12);
    }

    #[test]
    fn result_length_is_never_negative_and_never_exceeds_horizon() {
        for rows in 0..12 {
            for horizon in 0..4 {
                let projector = Projector::new(7, horizon);
                let predictions = projector.project(&state(rows), |_| 0.4, &scaler());
                let expected = if rows >= 7 { horizon } else { 0 };
                assert_eq!(predictions.len(), expected);
            }
        }
    }
}
