/// Command-line sessions
///
/// Runs the same session flow as the window (select, submit, settle) and
/// prints the outcome instead of rendering it.
use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

use crate::classify::{display_label, DisplayResult, ProviderClient};
use crate::config::Settings;
use crate::intake::load_selected_image;
use crate::state::data::ModelId;
use crate::state::session::{SessionController, SessionState};

/// Outcome of a headless classification
#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub model: ModelId,
    pub display: DisplayResult,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.file_name, self.model.display_name())?;
        writeln!(f)?;
        for prediction in &self.display.ranked_predictions {
            writeln!(
                f,
                "  {:<24} {:>6.2}%",
                display_label(&prediction.class_label),
                prediction.probability
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.display.metadata.name)?;
        writeln!(f, "{}", self.display.metadata.description)?;
        writeln!(f, "Common uses: {}", self.display.metadata.uses)?;
        let mark = if self.display.is_mint { "✓" } else { "✗" };
        write!(f, "{} {}", mark, self.display.verdict())
    }
}

/// Classify one file with the configured provider and default model
pub async fn classify_file(settings: &Settings, path: PathBuf) -> Result<Report> {
    let client = ProviderClient::new(&settings.endpoint, settings.timeout())?;
    let image = load_selected_image(path.clone(), settings.preview_size)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let mut session = SessionController::new(settings.default_model);
    session.select_file(image);
    let submission = session.submit().context("No image selected")?;
    let file_name = submission.request.image.file_name.clone();
    let requested_model = submission.request.model;

    let outcome = client.classify(submission.request).await;
    session.settle(submission.token, outcome);

    match session.state() {
        SessionState::Completed { response, display } => Ok(Report {
            file_name,
            model: response.model_used.unwrap_or(requested_model),
            display: display.clone(),
        }),
        SessionState::Failed(error) => {
            Err(anyhow::Error::new(error.clone()).context("Error classifying image"))
        }
        other => bail!("Classification did not settle: {:?}", other),
    }
}

/// Ping the provider and print its banner
pub async fn check(settings: &Settings) -> Result<()> {
    let client = ProviderClient::new(&settings.endpoint, settings.timeout())?;
    let banner = client
        .ping()
        .await
        .with_context(|| format!("Provider at {} is not reachable", client.endpoint()))?;

    info!("Provider reachable at {}", client.endpoint());
    println!("{}: {}", client.endpoint(), banner);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::PredictionEntry;
    use crate::state::species;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use serde_json::json;
    use std::io::Cursor;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn leaf_png(dir: &std::path::Path) -> PathBuf {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, image::Rgb([30, 140, 50])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        let path = dir.join("leaf.png");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn settings(endpoint: String) -> Settings {
        Settings {
            endpoint,
            default_model: ModelId::MobileNetV2,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_classify_file() {
        let router = Router::new().route(
            "/classify/",
            post(|| async {
                Json(json!({
                    "predictions": [
                        {"class": "apple_mint", "probability": 88.0},
                        {"class": "non_mint", "probability": 12.0}
                    ],
                    "is_mint": true,
                    "model_used": "mobilenet_v2"
                }))
            }),
        );
        let endpoint = spawn_stub(router).await;
        let dir = tempfile::tempdir().unwrap();

        let report = classify_file(&settings(endpoint), leaf_png(dir.path())).await.unwrap();

        assert_eq!(report.file_name, "leaf.png");
        assert_eq!(report.model, ModelId::MobileNetV2);
        assert_eq!(report.display.top_label, "apple_mint");
        assert_eq!(report.display.metadata, species::lookup("apple_mint").unwrap());
        assert_eq!(
            report.display.ranked_predictions[1],
            PredictionEntry::new("non_mint", 12.0)
        );

        let printed = report.to_string();
        assert!(printed.contains("apple mint"));
        assert!(printed.contains("88.00%"));
        assert!(printed.contains("Not a Mint Leaf"));
        assert!(printed.ends_with("✓ This is a mint leaf"));
    }

    #[tokio::test]
    async fn test_classify_file_provider_error() {
        let router = Router::new().route(
            "/classify/",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Error loading model"})),
                )
            }),
        );
        let endpoint = spawn_stub(router).await;
        let dir = tempfile::tempdir().unwrap();

        let err = classify_file(&settings(endpoint), leaf_png(dir.path()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error classifying image");
        let cause = err.root_cause().to_string();
        assert!(cause.contains("500"));
        assert!(cause.contains("Error loading model"));
    }

    #[tokio::test]
    async fn test_classify_missing_file() {
        let err = classify_file(
            &settings("http://127.0.0.1:9".to_string()),
            PathBuf::from("/nonexistent/leaf.png"),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("Failed to load"));
    }
}
