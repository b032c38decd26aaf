//! Store-scoped forecasting jobs and the local scheduler that runs them.

use std::path::PathBuf;

use thiserror::Error;

use shelfcast_core::{DomainError, DomainResult, PipelineConfig, ProductName, StoreId};
use shelfcast_data::{load, make_windows, prepare_product_state, scale_records, train_val_split};
use shelfcast_inventory::ReorderPolicy;
use shelfcast_model::{train, ForecastNet};

use crate::outcome::ForecastOutcome;
use crate::projector::Projector;

/// Scheduling failure, distinct from pipeline failures inside a job.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The job targets a store outside the scheduler's scope.
    #[error("job for store {job} rejected by scheduler scoped to {scope}")]
    ScopeViolation { job: StoreId, scope: StoreId },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Which stores a scheduler accepts jobs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreScope {
    /// Accept jobs for any store.
    Any,
    /// Accept only jobs for the named store.
    Store(StoreId),
}

impl StoreScope {
    pub fn allows(&self, store_id: &StoreId) -> bool {
        match self {
            StoreScope::Any => true,
            StoreScope::Store(own) => own == store_id,
        }
    }
}

/// A unit of forecasting work bound to one store.
pub trait ForecastJob {
    fn store_id(&self) -> &StoreId;

    /// Execute the job to completion. Synchronous and CPU-bound; callers on an
    /// async runtime should run this on a blocking thread.
    fn run(&self) -> DomainResult<ForecastOutcome>;
}

/// The full per-product pipeline: ingest, scale, window, train, project, then
/// apply the restocking policy.
///
/// Each run is self-contained. Scalers and model weights are rebuilt from the
/// store's files on every invocation and dropped afterwards.
#[derive(Debug, Clone)]
pub struct DemandForecastJob {
    store_id: StoreId,
    files: Vec<PathBuf>,
    product: ProductName,
    config: PipelineConfig,
    policy: ReorderPolicy,
}

impl DemandForecastJob {
    pub fn new(
        store_id: StoreId,
        files: Vec<PathBuf>,
        product: ProductName,
        config: PipelineConfig,
        policy: ReorderPolicy,
    ) -> Self {
        Self {
            store_id,
            files,
            product,
            config,
            policy,
        }
    }

    pub fn product(&self) -> &ProductName {
        &self.product
    }
}

impl ForecastJob for DemandForecastJob {
    fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    fn run(&self) -> DomainResult<ForecastOutcome> {
        let cfg = &self.config;
        tracing::info!(
            store = %self.store_id,
            product = %self.product,
            horizon = cfg.future_days,
            "running demand forecast job"
        );

        let records = load(&self.files)?;
        let (scaled, demand_scaler, _stock_scaler) = scale_records(&records);

        let (windows, labels) = make_windows(&scaled, cfg.sequence_length)?;
        let split = train_val_split(windows, labels, cfg.validation_fraction, cfg.seed);

        let mut net = ForecastNet::new(cfg.sequence_length, &cfg.model, cfg.seed);
        let training = train(
            &mut net,
            &split.train_x,
            &split.train_y,
            &split.val_x,
            &split.val_y,
            &cfg.model,
            cfg.seed,
        )?;

        // Membership is only checked once the store-wide model exists; an
        // unknown product still pays for training.
        let mut state = prepare_product_state(&scaled, &self.product)
            .ok_or_else(|| DomainError::product_not_found(self.product.as_str()))?;

        let projector = Projector::from_config(cfg);
        let predictions = projector.project(&state, |w| net.predict(w), &demand_scaler);

        let (reorder_needed, reorder_date) = self.policy.check_reorder(&state, &predictions)?;
        // Order quantity reads coverage before the movement rule shifts it.
        let order_quantity = self.policy.order_quantity(&state, &predictions);
        let recommended_move = self.policy.move_to_visible(&mut state)?;

        tracing::info!(
            store = %self.store_id,
            product = %self.product,
            days_projected = predictions.len(),
            reorder_needed,
            order_quantity,
            "demand forecast job complete"
        );

        Ok(ForecastOutcome {
            store_id: self.store_id.clone(),
            product: self.product.clone(),
            last_observed_date: state.last_date(),
            predictions,
            reorder_needed,
            reorder_date,
            order_quantity,
            recommended_move,
            training,
        })
    }
}

/// In-process scheduler. Runs jobs inline, enforcing its store scope first.
#[derive(Debug, Clone)]
pub struct LocalScheduler {
    scope: StoreScope,
}

impl LocalScheduler {
    pub fn new(scope: StoreScope) -> Self {
        Self { scope }
    }

    pub fn for_store(store_id: StoreId) -> Self {
        Self::new(StoreScope::Store(store_id))
    }

    pub fn run<J: ForecastJob>(&self, job: &J) -> Result<ForecastOutcome, ScheduleError> {
        match &self.scope {
            StoreScope::Store(own) if own != job.store_id() => {
                tracing::warn!(
                    job_store = %job.store_id(),
                    scope_store = %own,
                    "rejected out-of-scope forecast job"
                );
                Err(ScheduleError::ScopeViolation {
                    job: job.store_id().clone(),
                    scope: own.clone(),
                })
            }
            _ => Ok(job.run()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedJob {
        store_id: StoreId,
    }

    impl ForecastJob for FixedJob {
        fn store_id(&self) -> &StoreId {
            &self.store_id
        }

        fn run(&self) -> DomainResult<ForecastOutcome> {
            Err(DomainError::DataUnavailable)
        }
    }

    #[test]
    fn scope_any_allows_every_store() {
        assert!(StoreScope::Any.allows(&StoreId::from("store1")));
        assert!(StoreScope::Any.allows(&StoreId::from("store2")));
    }

    #[test]
    fn scoped_scheduler_rejects_foreign_jobs_without_running_them() {
        let scheduler = LocalScheduler::for_store(StoreId::from("store1"));
        let job = FixedJob {
            store_id: StoreId::from("store2"),
        };
        let err = scheduler.run(&job).unwrap_err();
        assert!(matches!(err, ScheduleError::ScopeViolation { .. }));
    }

    #[test]
    fn in_scope_job_failures_pass_through_as_domain_errors() {
        let scheduler = LocalScheduler::for_store(StoreId::from("store1"));
        let job = FixedJob {
            store_id: StoreId::from("store1"),
        };
        let err = scheduler.run(&job).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Domain(DomainError::DataUnavailable)
        ));
    }
}
