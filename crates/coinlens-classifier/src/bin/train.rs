//! Trains the digit classifier on a local MNIST dataset and writes the
//! model artifact. Not part of the interactive request path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coinlens_classifier::model::{Mlp, TrainConfig};
use coinlens_classifier::{ClassifierError, MnistSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Train the digit classifier from MNIST IDX files.
#[derive(Debug, Parser)]
#[command(name = "coinlens-train", version, about = "Train the digit classifier")]
struct Args {
    /// Directory containing the MNIST IDX files
    /// (train-images-idx3-ubyte, train-labels-idx1-ubyte, optionally the t10k pair).
    #[arg(long)]
    data_dir: PathBuf,

    /// Where to write the trained model artifact.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 10)]
    epochs: usize,

    #[arg(long, default_value_t = 64)]
    batch_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    learning_rate: f32,

    /// Fraction of the training set held out for validation.
    #[arg(long, default_value_t = 0.2)]
    val_split: f32,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ClassifierError> {
    let train_set = MnistSet::load(
        &args.data_dir.join("train-images-idx3-ubyte"),
        &args.data_dir.join("train-labels-idx1-ubyte"),
    )?;
    info!(samples = train_set.len(), "loaded training set");

    let config = TrainConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        learning_rate: args.learning_rate,
        val_split: args.val_split,
        seed: args.seed,
    };

    let mut model = Mlp::new(args.seed);
    let report = model.train(&train_set.images, &train_set.labels, &config)?;
    if let Some(last) = report.epochs.last() {
        info!(
            loss = last.loss,
            val_accuracy = last.val_accuracy,
            "training finished"
        );
    }

    // Held-out evaluation when the test split is present.
    let test_images = args.data_dir.join("t10k-images-idx3-ubyte");
    let test_labels = args.data_dir.join("t10k-labels-idx1-ubyte");
    if test_images.exists() && test_labels.exists() {
        let test_set = MnistSet::load(&test_images, &test_labels)?;
        let accuracy = model.evaluate(test_set.images.view(), &test_set.labels);
        info!(samples = test_set.len(), accuracy, "test-set evaluation");
    }

    model.save(&args.out)?;
    info!(path = %args.out.display(), "model artifact written");
    Ok(())
}
