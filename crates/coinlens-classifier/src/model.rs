//! Dense softmax network for digit classification.
//!
//! Architecture: 784 → 256 → 128 → 10, ReLU hidden activations, softmax
//! output, trained with Adam on softmax cross-entropy. Weights round-trip
//! through a JSON artifact at a caller-supplied path.

use std::fs;
use std::path::Path;

use ndarray::{Array, Array1, Array2, ArrayView2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClassifierError;
use crate::mnist::IMAGE_PIXELS;

pub const CLASSES: usize = 10;
const HIDDEN_1: usize = 256;
const HIDDEN_2: usize = 128;

const ADAM_BETA_1: f32 = 0.9;
const ADAM_BETA_2: f32 = 0.999;
const ADAM_EPSILON: f32 = 1e-8;
const PROB_FLOOR: f32 = 1e-12;

/// The trained network; this struct is the on-disk artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mlp {
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
    w3: Array2<f32>,
    b3: Array1<f32>,
}

/// One classified upload.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted digit label, the argmax class index.
    pub digit: u8,
    /// Probability of the predicted class.
    pub confidence: f32,
    /// Per-class probabilities, index = digit.
    pub probabilities: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub val_split: f32,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 64,
            learning_rate: 1e-3,
            val_split: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub loss: f32,
    pub val_accuracy: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub epochs: Vec<EpochStats>,
}

struct Forward {
    a1: Array2<f32>,
    a2: Array2<f32>,
    probs: Array2<f32>,
}

impl Mlp {
    /// Fresh network with uniform Glorot-style initialization.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            w1: init_weights(&mut rng, IMAGE_PIXELS, HIDDEN_1),
            b1: Array1::zeros(HIDDEN_1),
            w2: init_weights(&mut rng, HIDDEN_1, HIDDEN_2),
            b2: Array1::zeros(HIDDEN_2),
            w3: init_weights(&mut rng, HIDDEN_2, CLASSES),
            b3: Array1::zeros(CLASSES),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let payload = serde_json::to_string(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let payload = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&payload)?)
    }

    fn forward(&self, x: ArrayView2<'_, f32>) -> Forward {
        let a1 = (x.dot(&self.w1) + &self.b1).mapv(relu);
        let a2 = (a1.dot(&self.w2) + &self.b2).mapv(relu);
        let probs = softmax_rows(a2.dot(&self.w3) + &self.b3);
        Forward { a1, a2, probs }
    }

    /// Per-class probabilities for a batch of flattened images.
    pub fn predict_batch(&self, x: ArrayView2<'_, f32>) -> Array2<f32> {
        self.forward(x).probs
    }

    /// Classifies one flattened 28×28 image in [0, 1].
    pub fn predict(&self, input: &Array1<f32>) -> Prediction {
        let batch = input.view().insert_axis(Axis(0));
        let probs = self.predict_batch(batch);
        let row = probs.row(0);

        let (digit, confidence) = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, &p)| (index as u8, p))
            .unwrap_or((0, 0.0));

        Prediction {
            digit,
            confidence,
            probabilities: row.to_vec(),
        }
    }

    /// Fraction of samples whose argmax matches the label.
    pub fn evaluate(&self, images: ArrayView2<'_, f32>, labels: &[u8]) -> f32 {
        if labels.is_empty() {
            return 0.0;
        }
        let probs = self.predict_batch(images);
        let correct = probs
            .outer_iter()
            .zip(labels)
            .filter(|(row, &label)| argmax(row.as_slice().unwrap_or(&[])) == usize::from(label))
            .count();
        correct as f32 / labels.len() as f32
    }

    /// Minibatch Adam on softmax cross-entropy.
    pub fn train(
        &mut self,
        images: &Array2<f32>,
        labels: &[u8],
        config: &TrainConfig,
    ) -> Result<TrainReport, ClassifierError> {
        if images.nrows() != labels.len() {
            return Err(ClassifierError::Dataset(format!(
                "image count {} does not match label count {}",
                images.nrows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(ClassifierError::Dataset(String::from("empty training set")));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut indices: Vec<usize> = (0..labels.len()).collect();
        indices.shuffle(&mut rng);

        let n_val = ((labels.len() as f32) * config.val_split.clamp(0.0, 0.5)) as usize;
        let (val_idx, train_idx) = indices.split_at(n_val);

        let mut optimizer = Adam::new(self, config.learning_rate);
        let mut train_order = train_idx.to_vec();
        let mut epochs = Vec::with_capacity(config.epochs);

        for epoch in 1..=config.epochs {
            train_order.shuffle(&mut rng);

            let mut loss_sum = 0.0_f32;
            let mut seen = 0usize;
            for batch_idx in train_order.chunks(config.batch_size.max(1)) {
                let batch = images.select(Axis(0), batch_idx);
                let batch_labels: Vec<u8> =
                    batch_idx.iter().map(|&i| labels[i]).collect();

                let loss = self.train_step(&batch, &batch_labels, &mut optimizer);
                loss_sum += loss * batch_idx.len() as f32;
                seen += batch_idx.len();
            }

            let eval_idx = if val_idx.is_empty() { train_idx } else { val_idx };
            let eval_images = images.select(Axis(0), eval_idx);
            let eval_labels: Vec<u8> = eval_idx.iter().map(|&i| labels[i]).collect();
            let val_accuracy = self.evaluate(eval_images.view(), &eval_labels);

            let loss = loss_sum / seen.max(1) as f32;
            info!(epoch, loss, val_accuracy, "epoch complete");
            epochs.push(EpochStats {
                epoch,
                loss,
                val_accuracy,
            });
        }

        Ok(TrainReport { epochs })
    }

    fn train_step(&mut self, batch: &Array2<f32>, labels: &[u8], optimizer: &mut Adam) -> f32 {
        let batch_len = labels.len() as f32;
        let Forward { a1, a2, probs } = self.forward(batch.view());

        let loss = labels
            .iter()
            .enumerate()
            .map(|(row, &label)| -probs[[row, usize::from(label)]].max(PROB_FLOOR).ln())
            .sum::<f32>()
            / batch_len;

        // dL/dz3 = (probs - onehot) / batch
        let mut dz3 = probs;
        for (row, &label) in labels.iter().enumerate() {
            dz3[[row, usize::from(label)]] -= 1.0;
        }
        dz3.mapv_inplace(|v| v / batch_len);

        let dw3 = a2.t().dot(&dz3);
        let db3 = dz3.sum_axis(Axis(0));
        let mut dz2 = dz3.dot(&self.w3.t());
        Zip::from(&mut dz2).and(&a2).for_each(|g, &a| {
            if a <= 0.0 {
                *g = 0.0;
            }
        });

        let dw2 = a1.t().dot(&dz2);
        let db2 = dz2.sum_axis(Axis(0));
        let mut dz1 = dz2.dot(&self.w2.t());
        Zip::from(&mut dz1).and(&a1).for_each(|g, &a| {
            if a <= 0.0 {
                *g = 0.0;
            }
        });

        let dw1 = batch.t().dot(&dz1);
        let db1 = dz1.sum_axis(Axis(0));

        optimizer.step(self, [&dw1, &dw2, &dw3], [&db1, &db2, &db3]);
        loss
    }
}

/// Adam moment estimates, one pair per parameter tensor.
struct Adam {
    learning_rate: f32,
    t: i32,
    weights: [AdamState<ndarray::Ix2>; 3],
    biases: [AdamState<ndarray::Ix1>; 3],
}

impl Adam {
    fn new(model: &Mlp, learning_rate: f32) -> Self {
        Self {
            learning_rate,
            t: 0,
            weights: [
                AdamState::zeros_like(&model.w1),
                AdamState::zeros_like(&model.w2),
                AdamState::zeros_like(&model.w3),
            ],
            biases: [
                AdamState::zeros_like(&model.b1),
                AdamState::zeros_like(&model.b2),
                AdamState::zeros_like(&model.b3),
            ],
        }
    }

    fn step(
        &mut self,
        model: &mut Mlp,
        weight_grads: [&Array2<f32>; 3],
        bias_grads: [&Array1<f32>; 3],
    ) {
        self.t += 1;
        let lr = self.learning_rate;
        let t = self.t;

        self.weights[0].update(&mut model.w1, weight_grads[0], lr, t);
        self.weights[1].update(&mut model.w2, weight_grads[1], lr, t);
        self.weights[2].update(&mut model.w3, weight_grads[2], lr, t);
        self.biases[0].update(&mut model.b1, bias_grads[0], lr, t);
        self.biases[1].update(&mut model.b2, bias_grads[1], lr, t);
        self.biases[2].update(&mut model.b3, bias_grads[2], lr, t);
    }
}

struct AdamState<D: Dimension> {
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> AdamState<D> {
    fn zeros_like(param: &Array<f32, D>) -> Self {
        Self {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn update(&mut self, param: &mut Array<f32, D>, grad: &Array<f32, D>, lr: f32, t: i32) {
        Zip::from(&mut self.m)
            .and(grad)
            .for_each(|m, &g| *m = ADAM_BETA_1 * *m + (1.0 - ADAM_BETA_1) * g);
        Zip::from(&mut self.v)
            .and(grad)
            .for_each(|v, &g| *v = ADAM_BETA_2 * *v + (1.0 - ADAM_BETA_2) * g * g);

        let m_correction = 1.0 - ADAM_BETA_1.powi(t);
        let v_correction = 1.0 - ADAM_BETA_2.powi(t);
        Zip::from(param)
            .and(&self.m)
            .and(&self.v)
            .for_each(|p, &m, &v| {
                *p -= lr * (m / m_correction) / ((v / v_correction).sqrt() + ADAM_EPSILON);
            });
    }
}

fn init_weights(rng: &mut StdRng, fan_in: usize, fan_out: usize) -> Array2<f32> {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    Array2::from_shape_fn((fan_in, fan_out), |_| rng.gen_range(-limit..limit))
}

fn relu(v: f32) -> f32 {
    v.max(0.0)
}

fn softmax_rows(mut z: Array2<f32>) -> Array2<f32> {
    for mut row in z.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    z
}

fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(value: f32) -> Array1<f32> {
        Array1::from_elem(IMAGE_PIXELS, value)
    }

    #[test]
    fn prediction_probabilities_sum_to_one() {
        let model = Mlp::new(7);
        let prediction = model.predict(&flat_image(0.5));

        assert_eq!(prediction.probabilities.len(), CLASSES);
        let sum: f32 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "probabilities sum to {sum}");
        assert!(prediction.digit < 10);
    }

    #[test]
    fn prediction_is_the_argmax_class() {
        let model = Mlp::new(7);
        let prediction = model.predict(&flat_image(0.3));
        let argmax_index = argmax(&prediction.probabilities);
        assert_eq!(usize::from(prediction.digit), argmax_index);
        assert_eq!(prediction.confidence, prediction.probabilities[argmax_index]);
    }

    #[test]
    fn training_separates_two_trivial_classes() {
        // Blank images are 0s, saturated images are 1s.
        let samples = 40;
        let mut images = Array2::zeros((samples, IMAGE_PIXELS));
        let mut labels = Vec::with_capacity(samples);
        for row in 0..samples {
            let label = (row % 2) as u8;
            if label == 1 {
                images.row_mut(row).fill(1.0);
            }
            labels.push(label);
        }

        let mut model = Mlp::new(3);
        let config = TrainConfig {
            epochs: 25,
            batch_size: 8,
            learning_rate: 5e-3,
            val_split: 0.0,
            seed: 3,
        };
        let report = model.train(&images, &labels, &config).expect("trains");

        let last = report.epochs.last().expect("has epochs");
        assert!(
            last.val_accuracy > 0.95,
            "expected separable classes to converge, accuracy {}",
            last.val_accuracy
        );
        assert!(
            last.loss < report.epochs[0].loss,
            "loss should decrease over training"
        );

        assert_eq!(model.predict(&flat_image(0.0)).digit, 0);
        assert_eq!(model.predict(&flat_image(1.0)).digit, 1);
    }

    #[test]
    fn artifact_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");

        let model = Mlp::new(11);
        model.save(&path).expect("saves");
        let restored = Mlp::load(&path).expect("loads");

        let input = flat_image(0.42);
        let before = model.predict(&input);
        let after = restored.predict(&input);
        assert_eq!(before.digit, after.digit);
        assert_eq!(before.probabilities, after.probabilities);
    }

    #[test]
    fn training_rejects_mismatched_inputs() {
        let images = Array2::zeros((3, IMAGE_PIXELS));
        let labels = vec![0_u8, 1];
        let mut model = Mlp::new(1);
        assert!(matches!(
            model.train(&images, &labels, &TrainConfig::default()),
            Err(ClassifierError::Dataset(_))
        ));
    }
}
