//! Training loops for causal graph classifiers.
//!
//! [`Trainer`] drives a [`CausalModel`] through epochs of mini-batch
//! updates, evaluates its three heads and keeps the best epoch. Two entry
//! points exist: [`Trainer::train_split`] for a fixed train/val/test split
//! and [`Trainer::train_cross_validated`] for stratified k-fold runs.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::Serialize;
use tracing::{Span, field, info, instrument};

use crate::{
    batch::Batches,
    config::TrainConfig,
    dataset::LabeledDataset,
    error::{Result, TrainError},
    folds::k_fold,
    loss::{CompositeLoss, NegativeLogLikelihood, SupervisedLoss},
    metrics::{
        EpochLoss, EpochRecord, HeadAccuracy, HeadCounts, MeanStd, count_correct, random_guess,
    },
    model::{CausalLogits, CausalModel, ForwardMode, OptimizerStep},
    schedule::CosineAnnealing,
};

/// Sample indices of a fixed train/validation/test split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSplit {
    /// Indices used for parameter updates.
    pub train: Vec<usize>,
    /// Indices evaluated every epoch for monitoring.
    pub val: Vec<usize>,
    /// Indices evaluated every epoch to pick the best epoch.
    pub test: Vec<usize>,
}

/// Result of [`Trainer::train_epoch`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EpochTrainStats {
    /// Sample-weighted mean losses.
    pub loss: EpochLoss,
    /// Object-head accuracy on the training samples.
    pub train_accuracy: f64,
}

/// Outcome of [`Trainer::train_split`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitReport {
    /// One record per epoch.
    pub epochs: Vec<EpochRecord>,
    /// Epoch with the best object-head test accuracy, if any epoch scored
    /// above zero.
    pub best_epoch: Option<usize>,
    /// Test accuracy of every head at `best_epoch`.
    pub best_test: HeadAccuracy,
    /// Validation accuracy after the last epoch.
    pub final_val: HeadAccuracy,
}

/// Best-epoch outcome of one cross-validation fold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FoldReport {
    /// Zero-based fold number.
    pub fold: usize,
    /// Epoch with the best combined-head test accuracy, if any epoch scored
    /// above zero.
    pub best_epoch: Option<usize>,
    /// Test accuracy of every head at `best_epoch`.
    pub best_test: HeadAccuracy,
    /// One record per epoch.
    pub epochs: Vec<EpochRecord>,
}

/// Outcome of [`Trainer::train_cross_validated`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossValidationReport {
    /// Per-fold results in fold order.
    pub folds: Vec<FoldReport>,
    /// Best combined-head accuracy across folds, in percent.
    pub combined: MeanStd,
    /// Causal-head accuracy at each fold's best epoch, in percent.
    pub causal: MeanStd,
    /// Object-head accuracy at each fold's best epoch, in percent.
    pub object: MeanStd,
    /// Accuracy of uniform guessing, in percent.
    pub random_guess: f64,
}

/// Tracks the epoch that maximises one head's test accuracy.
#[derive(Clone, Copy, Debug, Default)]
struct BestEpoch {
    epoch: Option<usize>,
    score: f64,
    accuracy: HeadAccuracy,
}

impl BestEpoch {
    fn observe(&mut self, epoch: usize, score: f64, accuracy: HeadAccuracy) {
        if score > self.score {
            self.epoch = Some(epoch);
            self.score = score;
            self.accuracy = accuracy;
        }
    }
}

/// Runs training loops with a validated [`TrainConfig`].
///
/// # Examples
/// ```
/// use motifgraph_train::{TrainConfig, Trainer};
///
/// let trainer = Trainer::new(TrainConfig::default().with_epochs(5))?;
/// assert_eq!(trainer.config().epochs(), 5);
/// # Ok::<(), motifgraph_train::TrainError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Trainer<L = NegativeLogLikelihood> {
    config: TrainConfig,
    loss: L,
}

impl Trainer {
    /// Creates a trainer using [`NegativeLogLikelihood`] as the supervised
    /// loss.
    ///
    /// # Errors
    /// Returns [`TrainError::InvalidConfig`] when `config` fails
    /// [`TrainConfig::validate`].
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loss: NegativeLogLikelihood,
        })
    }
}

impl<L: SupervisedLoss> Trainer<L> {
    /// Replaces the supervised loss applied to the object and combined
    /// heads.
    #[must_use]
    pub fn with_loss<T: SupervisedLoss>(self, loss: T) -> Trainer<T> {
        Trainer {
            config: self.config,
            loss,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Trains a fresh model on a fixed split.
    ///
    /// The model is built by `factory(feature_dim, num_classes)`. The
    /// learning rate follows a cosine schedule over the configured epochs
    /// and every optimiser step carries the configured weight decay.
    /// The reported epoch is the one with the best object-head test
    /// accuracy; ties keep the earliest epoch.
    ///
    /// # Errors
    /// Returns [`TrainError::EmptyDataset`] for an empty dataset or empty
    /// training split, [`TrainError::IndexOutOfBounds`] for split indices
    /// outside the dataset, and any error raised while training.
    #[instrument(
        name = "train.split",
        err,
        skip_all,
        fields(
            dataset = %dataset.name(),
            epochs = self.config.epochs(),
            train = split.train.len(),
            test = split.test.len(),
            best_epoch = field::Empty,
        ),
    )]
    pub fn train_split<D, M, F>(
        &self,
        dataset: &D,
        split: &DataSplit,
        factory: F,
    ) -> Result<(M, SplitReport)>
    where
        D: LabeledDataset + ?Sized,
        M: CausalModel<D>,
        F: FnOnce(usize, usize) -> M,
    {
        ensure_trainable(dataset, &split.train)?;
        check_indices(dataset, &split.val)?;
        check_indices(dataset, &split.test)?;

        let mut model = self.build_model(dataset, factory)?;
        let mut schedule =
            CosineAnnealing::new(self.config.lr(), self.config.min_lr(), self.config.epochs())?;
        let mut rng = SmallRng::seed_from_u64(self.config.seed());
        let mut best = BestEpoch::default();
        let mut records = Vec::with_capacity(self.config.epochs());
        let mut final_val = HeadAccuracy::default();

        for epoch in 1..=self.config.epochs() {
            let step = OptimizerStep {
                learning_rate: schedule.current(),
                weight_decay: self.config.weight_decay(),
            };
            let stats = self.train_epoch(&mut model, dataset, &split.train, &step, &mut rng)?;
            let val = self.evaluate(&mut model, dataset, &split.val)?;
            let test = self.evaluate(&mut model, dataset, &split.test)?;
            schedule.step();

            best.observe(epoch, test.object, test);
            final_val = val;
            info!(
                epoch,
                epochs = self.config.epochs(),
                loss = stats.loss.total,
                loss_c = stats.loss.causal,
                loss_o = stats.loss.object,
                loss_co = stats.loss.combined,
                train_acc = stats.train_accuracy,
                val_acc = val.object,
                test_acc = test.object,
                best_epoch = best.epoch.unwrap_or(0),
                lr = step.learning_rate,
                "epoch complete"
            );
            records.push(EpochRecord {
                epoch,
                loss: stats.loss,
                train_accuracy: stats.train_accuracy,
                val: Some(val),
                test,
                learning_rate: step.learning_rate,
            });
        }

        if let Some(epoch) = best.epoch {
            Span::current().record("best_epoch", epoch);
        }
        info!(
            val_acc = final_val.object,
            test_co = best.accuracy.combined,
            test_c = best.accuracy.causal,
            test_o = best.accuracy.object,
            best_epoch = best.epoch.unwrap_or(0),
            "training complete"
        );
        Ok((
            model,
            SplitReport {
                epochs: records,
                best_epoch: best.epoch,
                best_test: best.accuracy,
                final_val,
            },
        ))
    }

    /// Trains one fresh model per stratified fold of `dataset`.
    ///
    /// Each fold trains on its training indices with a constant learning
    /// rate and weight decay, and keeps the epoch with the best
    /// combined-head test accuracy. Per-head results are summarised as
    /// mean and population standard deviation in percent.
    ///
    /// # Errors
    /// Returns the errors of [`k_fold`] and any error raised while
    /// training a fold.
    #[instrument(
        name = "train.cross_validated",
        err,
        skip_all,
        fields(
            dataset = %dataset.name(),
            folds = self.config.folds(),
            epochs = self.config.epochs(),
        ),
    )]
    pub fn train_cross_validated<D, M, F>(
        &self,
        dataset: &D,
        mut factory: F,
    ) -> Result<CrossValidationReport>
    where
        D: LabeledDataset + ?Sized,
        M: CausalModel<D>,
        F: FnMut(usize, usize) -> M,
    {
        let folds = k_fold(
            dataset,
            self.config.folds(),
            self.config.epoch_select(),
            self.config.seed(),
        )?;
        let guess = random_guess(dataset.num_classes());
        let step = OptimizerStep {
            learning_rate: self.config.lr(),
            weight_decay: self.config.weight_decay(),
        };

        let mut reports = Vec::with_capacity(folds.len());
        for (fold_index, fold) in folds.iter().enumerate() {
            ensure_trainable(dataset, &fold.train)?;
            let mut model = self.build_model(dataset, &mut factory)?;
            let mut rng = SmallRng::seed_from_u64(self.config.seed().wrapping_add(fold_index as u64));
            let mut best = BestEpoch::default();
            let mut records = Vec::with_capacity(self.config.epochs());

            for epoch in 1..=self.config.epochs() {
                let stats = self.train_epoch(&mut model, dataset, &fold.train, &step, &mut rng)?;
                let test = self.evaluate(&mut model, dataset, &fold.test)?;
                best.observe(epoch, test.combined, test);
                info!(
                    fold = fold_index,
                    epoch,
                    epochs = self.config.epochs(),
                    loss = stats.loss.total,
                    loss_c = stats.loss.causal,
                    loss_o = stats.loss.object,
                    loss_co = stats.loss.combined,
                    train_acc = stats.train_accuracy,
                    test_acc = test.combined,
                    test_o = test.object,
                    test_c = test.causal,
                    best_epoch = best.epoch.unwrap_or(0),
                    "epoch complete"
                );
                records.push(EpochRecord {
                    epoch,
                    loss: stats.loss,
                    train_accuracy: stats.train_accuracy,
                    val: None,
                    test,
                    learning_rate: step.learning_rate,
                });
            }

            info!(
                fold = fold_index,
                best_test = best.accuracy.combined,
                test_o = best.accuracy.object,
                test_c = best.accuracy.causal,
                best_epoch = best.epoch.unwrap_or(0),
                random_guess = guess,
                "fold complete"
            );
            reports.push(FoldReport {
                fold: fold_index,
                best_epoch: best.epoch,
                best_test: best.accuracy,
                epochs: records,
            });
        }

        let combined = summarise(&reports, |accuracy| accuracy.combined);
        let causal = summarise(&reports, |accuracy| accuracy.causal);
        let object = summarise(&reports, |accuracy| accuracy.object);
        info!(
            test_acc = %combined,
            object_acc = %object,
            causal_acc = %causal,
            random_guess = guess * 100.0,
            "cross-validation complete"
        );
        Ok(CrossValidationReport {
            folds: reports,
            combined,
            causal,
            object,
            random_guess: guess * 100.0,
        })
    }

    /// Runs one pass of mini-batch updates over `indices`.
    ///
    /// Indices are shuffled with `rng`. Losses are averaged per sample.
    ///
    /// # Errors
    /// Returns the first error raised by a batch; later batches are not
    /// run.
    pub fn train_epoch<D, M, R>(
        &self,
        model: &mut M,
        dataset: &D,
        indices: &[usize],
        step: &OptimizerStep,
        rng: &mut R,
    ) -> Result<EpochTrainStats>
    where
        D: LabeledDataset + ?Sized,
        M: CausalModel<D>,
        R: Rng + ?Sized,
    {
        let batches = Batches::shuffled(indices, self.config.batch_size(), rng)?;
        let classes = model.num_classes();
        let weights = self.config.loss_weights();
        let mut sums = EpochLoss::default();
        let mut correct = 0;

        for batch in batches.iter() {
            let targets = labels_of(dataset, batch)?;
            let logits = model.forward(dataset, batch, ForwardMode::Train)?;
            check_logits(&logits, batch.len(), classes)?;
            let loss = CompositeLoss::compute(
                weights,
                &self.loss,
                &logits.causal,
                &logits.object,
                &logits.combined,
                &targets,
            )?;
            correct += count_correct(&logits.object, &targets);
            model.step(&loss, step)?;

            let size = batch.len() as f64;
            sums.total += loss.total * size;
            sums.causal += loss.causal * size;
            sums.object += loss.object * size;
            sums.combined += loss.combined * size;
        }

        if indices.is_empty() {
            return Ok(EpochTrainStats::default());
        }
        let samples = indices.len() as f64;
        Ok(EpochTrainStats {
            loss: EpochLoss {
                total: sums.total / samples,
                causal: sums.causal / samples,
                object: sums.object / samples,
                combined: sums.combined / samples,
            },
            train_accuracy: correct as f64 / samples,
        })
    }

    /// Measures the accuracy of every head on `indices`.
    ///
    /// An empty index list scores zero on every head.
    ///
    /// # Errors
    /// Returns the first error raised by a batch.
    pub fn evaluate<D, M>(
        &self,
        model: &mut M,
        dataset: &D,
        indices: &[usize],
    ) -> Result<HeadAccuracy>
    where
        D: LabeledDataset + ?Sized,
        M: CausalModel<D>,
    {
        let batches = Batches::sequential(indices, self.config.batch_size())?;
        let mode = ForwardMode::Eval {
            eval_random: self.config.eval_random(),
        };
        let classes = model.num_classes();
        let mut counts = HeadCounts::default();
        for batch in batches.iter() {
            let targets = labels_of(dataset, batch)?;
            let logits = model.forward(dataset, batch, mode)?;
            check_logits(&logits, batch.len(), classes)?;
            counts.combined += count_correct(&logits.combined, &targets);
            counts.causal += count_correct(&logits.causal, &targets);
            counts.object += count_correct(&logits.object, &targets);
        }
        Ok(counts.accuracy(indices.len()))
    }

    fn build_model<D, M, F>(&self, dataset: &D, factory: F) -> Result<M>
    where
        D: LabeledDataset + ?Sized,
        M: CausalModel<D>,
        F: FnOnce(usize, usize) -> M,
    {
        let features = self.config.resolve_feature_dim(dataset.num_features());
        let model = factory(features, dataset.num_classes());
        if model.num_classes() != dataset.num_classes() {
            return Err(TrainError::invalid_config(format!(
                "model predicts {} classes but dataset `{}` has {}",
                model.num_classes(),
                dataset.name(),
                dataset.num_classes()
            )));
        }
        Ok(model)
    }
}

fn summarise(reports: &[FoldReport], head: impl Fn(&HeadAccuracy) -> f64) -> MeanStd {
    let values: Vec<f64> = reports.iter().map(|report| head(&report.best_test)).collect();
    MeanStd::from_samples(&values).as_percent()
}

fn ensure_trainable<D: LabeledDataset + ?Sized>(dataset: &D, train: &[usize]) -> Result<()> {
    if dataset.is_empty() || train.is_empty() {
        return Err(TrainError::EmptyDataset {
            dataset: dataset.name().to_owned(),
        });
    }
    check_indices(dataset, train)
}

fn check_indices<D: LabeledDataset + ?Sized>(dataset: &D, indices: &[usize]) -> Result<()> {
    let len = dataset.len();
    match indices.iter().find(|&&index| index >= len) {
        Some(&index) => Err(TrainError::IndexOutOfBounds { index, len }),
        None => Ok(()),
    }
}

fn labels_of<D: LabeledDataset + ?Sized>(dataset: &D, batch: &[usize]) -> Result<Vec<usize>> {
    let classes = dataset.num_classes();
    batch
        .iter()
        .map(|&index| {
            let label = dataset.label(index)?;
            if label >= classes {
                return Err(TrainError::LabelOutOfRange {
                    index,
                    label,
                    num_classes: classes,
                });
            }
            Ok(label)
        })
        .collect()
}

fn check_logits(logits: &CausalLogits, rows: usize, classes: usize) -> Result<()> {
    for (head, values) in logits.heads() {
        let bad_row = values.iter().find(|row| row.len() != classes);
        if values.len() != rows || bad_row.is_some() {
            return Err(TrainError::LogitShape {
                head,
                rows: values.len(),
                cols: bad_row.or_else(|| values.first()).map_or(0, Vec::len),
                expected_rows: rows,
                expected_cols: classes,
            });
        }
    }
    Ok(())
}
