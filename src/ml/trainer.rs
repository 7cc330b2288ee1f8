// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch train + held-out validation with burn's DataLoader
// and one of three optimizers.
//
// Trainer states:
//
//   Idle ──fit()──▶ Running{epoch} ──all epochs──▶ Completed
//                        │
//                        └──non-finite loss──▶ Failed
//
// A failed attempt drops its partial history. Nothing retries;
// the caller starts a new attempt with a new Trainer or fit().
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on EvalBackend (NdArray),
//     which also switches dropout off and batch-norm to running stats
//   - the validation batcher must use EvalBackend too
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer, RmsPropConfig, SgdConfig},
    prelude::*,
};

use crate::data::{batcher::SalesBatcher, dataset::SalesDataset};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::history::{EpochRecord, History};
use crate::domain::hyperparams::{HyperparameterConfig, OptimizerKind};
use crate::ml::model::SalesRegressor;

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type EvalBackend  = burn::backend::NdArray;
pub type Device       = burn::backend::ndarray::NdArrayDevice;

/// Rows per optimizer step
pub const BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum TrainerState {
    Idle,
    Running { epoch: usize },
    Completed,
    Failed(PipelineError),
}

pub struct Trainer {
    state:   TrainerState,
    history: History,
    device:  Device,
}

/// Sample-weighted running means of loss and MAE over one pass.
#[derive(Default)]
struct PassTotals {
    loss: f64,
    mae:  f64,
    rows: usize,
}

impl PassTotals {
    fn add(&mut self, loss: f64, mae: f64, rows: usize) {
        self.loss += loss * rows as f64;
        self.mae  += mae * rows as f64;
        self.rows += rows;
    }

    fn means(&self) -> (f64, f64) {
        if self.rows == 0 {
            return (f64::NAN, f64::NAN);
        }
        (self.loss / self.rows as f64, self.mae / self.rows as f64)
    }
}

impl Trainer {
    pub fn new(device: Device) -> Self {
        Self { state: TrainerState::Idle, history: History::new(), device }
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Train for `hp.epochs` epochs and return the fitted model.
    /// `shuffle_seed` fixes the mini-batch order.
    pub fn fit(
        &mut self,
        model:        SalesRegressor<TrainBackend>,
        hp:           &HyperparameterConfig,
        train:        SalesDataset,
        test:         SalesDataset,
        shuffle_seed: u64,
    ) -> PipelineResult<SalesRegressor<TrainBackend>> {
        if train.sample_count() == 0 || test.sample_count() == 0 {
            return Err(PipelineError::config(format!(
                "need at least one training and one test row (got {} / {})",
                train.sample_count(),
                test.sample_count()
            )));
        }

        self.history = History::new();
        tracing::info!(
            "Training {} epochs with {} (lr={}) on {} rows, validating on {}",
            hp.epochs,
            hp.optimizer,
            hp.learning_rate,
            train.sample_count(),
            test.sample_count()
        );

        // ── Optimizer ─────────────────────────────────────────────────────────
        match hp.optimizer {
            OptimizerKind::Adam => {
                let optim = AdamConfig::new().with_epsilon(1e-7).init();
                self.run_epochs(model, optim, hp, train, test, shuffle_seed)
            }
            OptimizerKind::Sgd => {
                let optim = SgdConfig::new().init();
                self.run_epochs(model, optim, hp, train, test, shuffle_seed)
            }
            OptimizerKind::RmsProp => {
                let optim = RmsPropConfig::new().with_alpha(0.9).with_epsilon(1e-7).init();
                self.run_epochs(model, optim, hp, train, test, shuffle_seed)
            }
        }
    }

    fn run_epochs<O>(
        &mut self,
        mut model:    SalesRegressor<TrainBackend>,
        mut optim:    O,
        hp:           &HyperparameterConfig,
        train:        SalesDataset,
        test:         SalesDataset,
        shuffle_seed: u64,
    ) -> PipelineResult<SalesRegressor<TrainBackend>>
    where
        O: Optimizer<SalesRegressor<TrainBackend>, TrainBackend>,
    {
        // ── Training data loader (TrainBackend) ───────────────────────────────
        let train_loader = DataLoaderBuilder::new(SalesBatcher::<TrainBackend>::new(self.device.clone()))
            .batch_size(BATCH_SIZE)
            .shuffle(shuffle_seed)
            .build(train);

        // ── Validation data loader (EvalBackend — no autodiff overhead) ───────
        let test_loader = DataLoaderBuilder::new(SalesBatcher::<EvalBackend>::new(self.device.clone()))
            .batch_size(BATCH_SIZE)
            .build(test);

        for epoch in 1..=hp.epochs {
            self.state = TrainerState::Running { epoch };

            // ── Training phase ────────────────────────────────────────────────
            let mut train_totals = PassTotals::default();
            for batch in train_loader.iter() {
                let rows = batch.targets.dims()[0];
                let out  = model.forward_regression(batch.features, batch.targets);

                let loss: f64 = out.loss.clone().into_scalar().elem::<f64>();
                if !loss.is_finite() {
                    return Err(self.fail(epoch, loss));
                }
                train_totals.add(loss, out.mae(), rows);

                let grads = out.loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(hp.learning_rate, model, grads);
            }

            // ── Validation phase ──────────────────────────────────────────────
            let model_valid = model.valid();
            let mut val_totals = PassTotals::default();
            for batch in test_loader.iter() {
                let rows = batch.targets.dims()[0];
                let out  = model_valid.forward_regression(batch.features, batch.targets);
                let loss: f64 = out.loss.clone().into_scalar().elem::<f64>();
                val_totals.add(loss, out.mae(), rows);
            }

            let (train_loss, train_mae) = train_totals.means();
            let (val_loss, val_mae)     = val_totals.means();
            let record = EpochRecord { epoch, train_loss, val_loss, train_mae, val_mae };

            if !record.is_finite() {
                let bad = if train_loss.is_finite() { val_loss } else { train_loss };
                return Err(self.fail(epoch, bad));
            }
            self.history.push(record);

            println!(
                "Epoch {:>3}/{} | loss={:.4} | val_loss={:.4} | mae={:.4} | val_mae={:.4}",
                epoch, hp.epochs, train_loss, val_loss, train_mae, val_mae,
            );
        }

        self.state = TrainerState::Completed;
        tracing::info!("Training complete!");
        Ok(model)
    }

    fn fail(&mut self, epoch: usize, loss: f64) -> PipelineError {
        let err = PipelineError::NumericFailure { epoch, loss };
        tracing::error!("Training aborted at epoch {epoch}: loss is {loss}");
        self.history = History::new();
        self.state = TrainerState::Failed(err.clone());
        err
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::SalesSample;
    use crate::domain::hyperparams::ActivationKind;
    use crate::ml::model::SalesRegressorConfig;

    fn dataset(rows: usize, target_scale: f32) -> SalesDataset {
        let samples = (0..rows)
            .map(|i| {
                let x = i as f32 / rows as f32;
                SalesSample {
                    features: vec![x, 1.0 - x, (i % 2) as f32],
                    target:   (1.0 + 2.0 * x) * target_scale,
                }
            })
            .collect();
        SalesDataset::new(samples)
    }

    fn model(device: &Device) -> SalesRegressor<TrainBackend> {
        SalesRegressorConfig::new(3, 1, 32, ActivationKind::Relu, 0.1)
            .init(device)
            .unwrap()
    }

    fn hyperparams(optimizer: OptimizerKind) -> HyperparameterConfig {
        HyperparameterConfig {
            layers: 1,
            neurons: 32,
            epochs: 10,
            optimizer,
            ..Default::default()
        }
    }

    #[test]
    fn test_ten_epochs_give_ten_finite_records() {
        let device = Device::default();
        let mut trainer = Trainer::new(device.clone());
        assert_eq!(trainer.state(), &TrainerState::Idle);

        trainer
            .fit(model(&device), &hyperparams(OptimizerKind::Adam), dataset(80, 1.0), dataset(20, 1.0), 42)
            .unwrap();

        assert_eq!(trainer.state(), &TrainerState::Completed);
        let history = trainer.history();
        assert_eq!(history.len(), 10);
        for (i, r) in history.records().iter().enumerate() {
            assert_eq!(r.epoch, i + 1);
            assert!(r.train_loss.is_finite() && r.train_loss >= 0.0);
            assert!(r.val_mae.is_finite() && r.val_mae >= 0.0);
        }
    }

    #[test]
    fn test_every_optimizer_trains() {
        let device = Device::default();
        for kind in [OptimizerKind::Adam, OptimizerKind::Sgd, OptimizerKind::RmsProp] {
            let mut trainer = Trainer::new(device.clone());
            let result = trainer.fit(model(&device), &hyperparams(kind), dataset(70, 1.0), dataset(10, 1.0), 1);
            assert!(result.is_ok(), "{kind} failed");
            assert_eq!(trainer.history().len(), 10);
        }
    }

    #[test]
    fn test_overflowing_loss_fails_and_drops_history() {
        let device = Device::default();
        let mut trainer = Trainer::new(device.clone());

        // (1e20)^2 does not fit in f32, so the very first loss is infinite
        let err = trainer
            .fit(model(&device), &hyperparams(OptimizerKind::Sgd), dataset(40, 1e20), dataset(10, 1e20), 42)
            .unwrap_err();

        assert!(matches!(err, PipelineError::NumericFailure { epoch: 1, .. }));
        assert!(matches!(trainer.state(), TrainerState::Failed(_)));
        assert!(trainer.history().is_empty());
    }

    #[test]
    fn test_empty_split_is_rejected() {
        let device = Device::default();
        let mut trainer = Trainer::new(device.clone());
        let err = trainer
            .fit(model(&device), &hyperparams(OptimizerKind::Adam), dataset(10, 1.0), dataset(0, 1.0), 42)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert_eq!(trainer.state(), &TrainerState::Idle);
    }
}
