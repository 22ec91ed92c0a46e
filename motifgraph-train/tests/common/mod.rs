//! Scripted model and fixtures shared by the harness tests.

use motifgraph_train::{
    CausalLogits, CausalModel, CompositeLoss, ForwardMode, InMemoryDataset, LabeledDataset,
    ModelError, OptimizerStep,
};

/// Output head addressed by a [`Plan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Head {
    Causal,
    Object,
    Combined,
}

/// Chooses the predicted class for a head given the optimizer steps taken
/// so far and the sample's true label. `None` yields a uniform row.
pub type Plan = fn(steps: usize, head: Head, label: usize) -> Option<usize>;

/// Probability placed on the predicted class.
pub const CONFIDENCE: f64 = 0.9;

/// Model whose predictions are scripted per optimizer step.
#[derive(Clone, Debug)]
pub struct ScriptedModel {
    pub classes: usize,
    pub steps: usize,
    pub plan: Plan,
    pub learning_rates: Vec<f64>,
    pub weight_decays: Vec<f64>,
    pub modes: Vec<ForwardMode>,
    pub losses: Vec<CompositeLoss>,
    pub fail_on_step: Option<usize>,
    pub extra_column: bool,
}

impl ScriptedModel {
    pub fn new(classes: usize, plan: Plan) -> Self {
        Self {
            classes,
            steps: 0,
            plan,
            learning_rates: Vec::new(),
            weight_decays: Vec::new(),
            modes: Vec::new(),
            losses: Vec::new(),
            fail_on_step: None,
            extra_column: false,
        }
    }

    fn row(&self, head: Head, label: usize) -> Vec<f64> {
        let width = self.classes + usize::from(self.extra_column);
        match (self.plan)(self.steps, head, label) {
            Some(class) => {
                let rest = ((1.0 - CONFIDENCE) / (self.classes - 1) as f64).ln();
                let mut row = vec![rest; width];
                if let Some(slot) = row.get_mut(class) {
                    *slot = CONFIDENCE.ln();
                }
                row
            }
            None => vec![(1.0 / self.classes as f64).ln(); width],
        }
    }
}

impl<D: LabeledDataset + ?Sized> CausalModel<D> for ScriptedModel {
    fn num_classes(&self) -> usize {
        self.classes
    }

    fn forward(
        &mut self,
        dataset: &D,
        batch: &[usize],
        mode: ForwardMode,
    ) -> Result<CausalLogits, ModelError> {
        self.modes.push(mode);
        let mut logits = CausalLogits::default();
        for &index in batch {
            let label = dataset
                .label(index)
                .map_err(|err| ModelError::with_source("label lookup failed", err))?;
            logits.causal.push(self.row(Head::Causal, label));
            logits.object.push(self.row(Head::Object, label));
            logits.combined.push(self.row(Head::Combined, label));
        }
        Ok(logits)
    }

    fn step(&mut self, loss: &CompositeLoss, optimizer: &OptimizerStep) -> Result<(), ModelError> {
        if self.fail_on_step == Some(self.steps + 1) {
            return Err(ModelError::new("gradient exploded"));
        }
        self.steps += 1;
        self.learning_rates.push(optimizer.learning_rate);
        self.weight_decays.push(optimizer.weight_decay);
        self.losses.push(*loss);
        Ok(())
    }
}

/// Returns the wrong class for `label` among `classes`.
pub fn wrong(label: usize, classes: usize) -> usize {
    (label + 1) % classes
}

/// Twenty unit samples with alternating labels over two classes.
pub fn alternating_dataset() -> InMemoryDataset<()> {
    let labels: Vec<usize> = (0..20).map(|index| index % 2).collect();
    InMemoryDataset::new("alternating", vec![(); 20], labels, 2, 3).expect("valid dataset")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
