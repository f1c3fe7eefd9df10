//! Digit-image classification for coinlens.
//!
//! This crate contains:
//! - The MNIST IDX dataset reader
//! - A dense softmax network and its training loop
//! - Upload preprocessing (decode, resize, grayscale, normalize)
//!
//! The trained model serializes to a JSON artifact whose path is always
//! supplied by the caller; nothing here hardcodes a filesystem location.

pub mod error;
pub mod mnist;
pub mod model;
pub mod preprocess;

pub use error::ClassifierError;
pub use mnist::MnistSet;
pub use model::{Mlp, Prediction, TrainConfig, TrainReport};
pub use preprocess::image_to_input;
