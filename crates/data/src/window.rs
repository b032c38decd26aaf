//! Sliding-window construction and the shuffled train/validation split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use shelfcast_core::{DomainError, DomainResult, ScaledRecord, Window};

/// Slide a fixed window of `sequence_length` rows with stride 1 over the full
/// combined series, labelling each window with the next row's scaled demand.
///
/// The slide runs over the *combined* multi-product series, so a window can
/// span the boundary between two products' rows. That mixes products in
/// training and is deliberate; windowing per product would change what the
/// model learns.
pub fn make_windows(
    scaled: &[ScaledRecord],
    sequence_length: usize,
) -> DomainResult<(Vec<Window>, Vec<f64>)> {
    if scaled.len() <= sequence_length {
        return Err(DomainError::insufficient_data(
            sequence_length + 1,
            scaled.len(),
        ));
    }

    let count = scaled.len() - sequence_length;
    let mut windows = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for i in 0..count {
        let window: Window = scaled[i..i + sequence_length]
            .iter()
            .map(|r| {
                [
                    r.scaled_demand,
                    r.scaled_visible_stock,
                    r.scaled_inventory_stock,
                ]
            })
            .collect();
        windows.push(window);
        labels.push(scaled[i + sequence_length].scaled_demand);
    }
    Ok((windows, labels))
}

/// Training and validation datasets after the shuffled split.
#[derive(Debug, Clone)]
pub struct TrainValSplit {
    pub train_x: Vec<Window>,
    pub train_y: Vec<f64>,
    pub val_x: Vec<Window>,
    pub val_y: Vec<f64>,
}

/// Seeded shuffle split; deterministic for a fixed seed.
///
/// Both partitions are kept non-empty whenever two or more windows exist.
pub fn train_val_split(
    windows: Vec<Window>,
    labels: Vec<f64>,
    validation_fraction: f64,
    seed: u64,
) -> TrainValSplit {
    debug_assert_eq!(windows.len(), labels.len());
    let n = windows.len();

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_val = if n < 2 {
        0
    } else {
        (((n as f64) * validation_fraction).ceil() as usize).clamp(1, n - 1)
    };

    let mut split = TrainValSplit {
        train_x: Vec::with_capacity(n - n_val),
        train_y: Vec::with_capacity(n - n_val),
        val_x: Vec::with_capacity(n_val),
        val_y: Vec::with_capacity(n_val),
    };
    for (pos, &idx) in indices.iter().enumerate() {
        if pos < n_val {
            split.val_x.push(windows[idx].clone());
            split.val_y.push(labels[idx]);
        } else {
            split.train_x.push(windows[idx].clone());
            split.train_y.push(labels[idx]);
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shelfcast_core::{DailyRecord, ProductName};

    fn scaled_row(day: u32, demand: f64) -> ScaledRecord {
        ScaledRecord {
            daily: DailyRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                product_name: ProductName::from("Sofa"),
                amount_sold: demand * 10.0,
                visible_stock: 10.0,
                inventory_stock: 5.0,
            },
            scaled_demand: demand,
            scaled_visible_stock: 0.5,
            scaled_inventory_stock: 0.5,
        }
    }

    fn series(n: u32) -> Vec<ScaledRecord> {
        (1..=n).map(|d| scaled_row(d, d as f64 / 31.0)).collect()
    }

    #[test]
    fn window_count_is_rows_minus_sequence_length() {
        let rows = series(10);
        let (windows, labels) = make_windows(&rows, 7).unwrap();
        assert_eq!(windows.len(), 3);
        assert_eq!(labels.len(), 3);
        assert_eq!(windows[0].len(), 7);
        // Label of the first window is the 8th row's scaled demand.
        assert_eq!(labels[0], rows[7].scaled_demand);
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let rows = series(7);
        let err = make_windows(&rows, 7).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientData {
                needed: 8,
                available: 7
            }
        );
    }

    #[test]
    fn split_is_deterministic_and_keeps_both_partitions_nonempty() {
        let rows = series(17);
        let (windows, labels) = make_windows(&rows, 7).unwrap();

        let a = train_val_split(windows.clone(), labels.clone(), 0.2, 42);
        let b = train_val_split(windows, labels, 0.2, 42);

        assert!(!a.train_x.is_empty());
        assert!(!a.val_x.is_empty());
        assert_eq!(a.train_y, b.train_y);
        assert_eq!(a.val_y, b.val_y);
        assert_eq!(a.train_x.len() + a.val_x.len(), 10);
    }

    #[test]
    fn split_preserves_window_label_pairing() {
        let rows = series(20);
        let (windows, labels) = make_windows(&rows, 7).unwrap();
        let split = train_val_split(windows, labels, 0.2, 7);

        // Every label equals the scaled demand one step past its window, which
        // for this series is the window's last demand plus 1/31.
        for (w, y) in split
            .train_x
            .iter()
            .zip(&split.train_y)
            .chain(split.val_x.iter().zip(&split.val_y))
        {
            let last_demand = w.last().unwrap()[0];
            assert!((y - last_demand - 1.0 / 31.0).abs() < 1e-9);
        }
    }
}
