use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset: {0}")]
    Dataset(String),

    #[error("invalid image: {0}")]
    Image(#[from] image::ImageError),

    #[error("artifact error: {0}")]
    Artifact(#[from] serde_json::Error),
}
