//! The stacked sequence-to-one regressor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shelfcast_core::{ModelConfig, Window};

use crate::lstm::{DenseLayer, LstmCache, LstmLayer};
use crate::param::Param;

/// Two stacked LSTM layers separated by dropout, closed by a single linear
/// unit. Takes a `(sequence_length, 3)` window, emits next-day scaled demand.
#[derive(Debug, Clone)]
pub struct ForecastNet {
    sequence_length: usize,
    dropout: f64,
    lstm1: LstmLayer,
    lstm2: LstmLayer,
    dense: DenseLayer,
}

pub(crate) struct ForwardCache {
    cache1: LstmCache,
    masks: Vec<Vec<f64>>,
    h1_masked: Vec<Vec<f64>>,
    cache2: LstmCache,
    h2_last: Vec<f64>,
}

impl ForecastNet {
    /// Instantiate with freshly initialized weights.
    ///
    /// The three scaled signals are the fixed input features; `seed` makes
    /// initialization (and therefore the whole training run) reproducible.
    pub fn new(sequence_length: usize, cfg: &ModelConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            sequence_length,
            dropout: cfg.dropout,
            lstm1: LstmLayer::new(3, cfg.units_1, &mut rng),
            lstm2: LstmLayer::new(cfg.units_1, cfg.units_2, &mut rng),
            dense: DenseLayer::new(cfg.units_2, &mut rng),
        }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// One forward pass on a single window; pure, dropout disabled.
    pub fn predict(&self, window: &Window) -> f64 {
        debug_assert_eq!(window.len(), self.sequence_length);
        let inputs: Vec<Vec<f64>> = window.iter().map(|t| t.to_vec()).collect();
        let (h1, _) = self.lstm1.forward(&inputs);
        let (h2, _) = self.lstm2.forward(&h1);
        self.dense.forward(h2.last().expect("non-empty window"))
    }

    /// Forward pass with inverted dropout between the recurrent layers.
    pub(crate) fn forward_train<R: Rng>(
        &self,
        window: &Window,
        rng: &mut R,
    ) -> (f64, ForwardCache) {
        let inputs: Vec<Vec<f64>> = window.iter().map(|t| t.to_vec()).collect();
        let (h1, cache1) = self.lstm1.forward(&inputs);

        let keep = 1.0 - self.dropout;
        let mut masks = Vec::with_capacity(h1.len());
        let mut h1_masked = Vec::with_capacity(h1.len());
        for h in &h1 {
            let mask: Vec<f64> = h
                .iter()
                .map(|_| {
                    if keep >= 1.0 || rng.gen_range(0.0..1.0) < keep {
                        1.0 / keep
                    } else {
                        0.0
                    }
                })
                .collect();
            let masked: Vec<f64> = h.iter().zip(&mask).map(|(v, m)| v * m).collect();
            masks.push(mask);
            h1_masked.push(masked);
        }

        let (h2, cache2) = self.lstm2.forward(&h1_masked);
        let h2_last = h2.last().expect("non-empty window").clone();
        let y = self.dense.forward(&h2_last);

        (
            y,
            ForwardCache {
                cache1,
                masks,
                h1_masked,
                cache2,
                h2_last,
            },
        )
    }

    /// Accumulate gradients for one sample given `dy = dLoss/dy`.
    pub(crate) fn backward(&mut self, cache: &ForwardCache, dy: f64) {
        let steps = cache.h1_masked.len();
        let dh2_last = self.dense.backward(&cache.h2_last, dy);

        let mut dh2_seq = vec![vec![0.0; self.lstm2.hidden()]; steps];
        *dh2_seq.last_mut().expect("non-empty window") = dh2_last;

        let dmasked = self.lstm2.backward(&cache.cache2, &dh2_seq);
        let dh1_seq: Vec<Vec<f64>> = dmasked
            .iter()
            .zip(&cache.masks)
            .map(|(d, m)| d.iter().zip(m).map(|(dv, mv)| dv * mv).collect())
            .collect();

        self.lstm1.backward(&cache.cache1, &dh1_seq);
    }

    /// All parameter blocks, in a stable order (snapshot/restore relies on it).
    pub fn params_mut(&mut self) -> Vec<&mut Param> {
        let mut params = self.lstm1.params_mut();
        params.extend(self.lstm2.params_mut());
        params.extend(self.dense.params_mut());
        params
    }

    pub fn zero_grads(&mut self) {
        for p in self.params_mut() {
            p.zero_grad();
        }
    }

    /// Copy out the current weights (early-stopping checkpoint).
    pub fn snapshot(&mut self) -> Vec<Vec<f64>> {
        self.params_mut().iter().map(|p| p.w.clone()).collect()
    }

    /// Restore weights from a snapshot taken on this network.
    pub fn restore(&mut self, snapshot: &[Vec<f64>]) {
        let mut params = self.params_mut();
        debug_assert_eq!(params.len(), snapshot.len());
        for (p, saved) in params.iter_mut().zip(snapshot) {
            p.w.copy_from_slice(saved);
        }
    }
}
