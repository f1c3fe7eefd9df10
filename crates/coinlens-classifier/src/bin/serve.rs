//! Inference app: serves digit predictions for uploaded images from a
//! trained model artifact loaded at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use coinlens_classifier::model::Mlp;
use coinlens_classifier::{image_to_input, ClassifierError};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve digit classification for uploaded images.
#[derive(Debug, Parser)]
#[command(name = "coinlens-classify", version, about = "Digit classifier app")]
struct Args {
    /// Path to the trained model artifact.
    #[arg(long)]
    model: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8081")]
    bind: SocketAddr,
}

#[derive(Debug)]
enum AppError {
    MissingUpload,
    BadImage(String),
    Upload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingUpload => (
                StatusCode::BAD_REQUEST,
                String::from("Upload an image of a digit (0-9)."),
            ),
            Self::BadImage(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Upload(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(json!({ "kind": "error", "message": message }))).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let model = Arc::new(Mlp::load(&args.model)?);
    info!(path = %args.model.display(), "model artifact loaded");

    let app = Router::new()
        .route("/", get(index))
        .route("/api/classify", post(classify))
        .with_state(model);

    info!(bind = %args.bind, "classifier listening");
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/classifier.html"))
}

async fn classify(
    State(model): State<Arc<Mlp>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut upload: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        if field.name() == Some("image") || field.file_name().is_some() {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Upload(e.to_string()))?;
            upload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = upload.ok_or(AppError::MissingUpload)?;
    let input = match image_to_input(&bytes) {
        Ok(input) => input,
        Err(ClassifierError::Image(e)) => return Err(AppError::BadImage(e.to_string())),
        Err(other) => return Err(AppError::BadImage(other.to_string())),
    };

    let prediction = model.predict(&input);
    info!(digit = prediction.digit, confidence = prediction.confidence, "image classified");

    Ok(Json(json!({
        "digit": prediction.digit,
        "confidence": prediction.confidence,
        "probabilities": prediction.probabilities,
    })))
}
