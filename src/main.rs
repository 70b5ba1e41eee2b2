use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iced::widget::image::{Handle, Image};
use iced::widget::{button, canvas, column, container, pick_list, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::future::Future;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod classify;
mod config;
mod error;
mod headless;
mod intake;
mod state;
mod ui;

use classify::{display_label, DisplayResult, ProviderClient};
use config::{Overrides, Settings};
use error::{ClassificationError, IntakeError};
use state::data::{ClassificationResponse, ModelId, SelectedImage};
use state::session::{PickToken, SessionController, SessionToken};
use ui::PredictionBars;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "leaf-classifier")]
#[command(about = "Identify mint leaf species from photographs")]
#[command(version)]
struct Args {
    /// Settings file (defaults to the per-user config directory)
    #[arg(short, long, global = true, env = "LEAF_CLASSIFIER_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the classification provider
    #[arg(short, long, global = true, env = "LEAF_CLASSIFIER_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true, env = "LEAF_CLASSIFIER_TIMEOUT")]
    timeout: Option<u64>,

    /// Model to start with (resnet18, mobilenet_v2, efficientnet_b0, densenet121)
    #[arg(short, long, global = true, env = "LEAF_CLASSIFIER_MODEL")]
    model: Option<ModelId>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one image and print the result instead of opening a window
    Classify {
        /// Image file to classify
        path: PathBuf,
    },
    /// Check that the classification provider is reachable
    Check,
    /// List the available models
    Models,
}

/// Main application state
struct LeafClassifier {
    /// The classification session (single source of truth)
    session: SessionController,
    /// Client for the remote classification provider
    client: ProviderClient,
    /// Longest side of generated previews
    preview_size: u32,
    /// Render handle for `session.selected_preview()`, rebuilt only in `apply_loaded_image`
    preview: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "Choose an image" button
    PickFile,
    /// Background decoding of the file picked under this token finished
    FileLoaded(PickToken, Result<SelectedImage, IntakeError>),
    /// User picked another model
    ModelSelected(ModelId),
    /// User clicked "Classify"
    Classify,
    /// Provider reply (or failure) for the submission with this token
    ClassificationSettled(SessionToken, Result<ClassificationResponse, ClassificationError>),
    /// Startup reachability check finished
    ProviderChecked(Result<String, ClassificationError>),
}

impl LeafClassifier {
    /// Create a new instance of the application
    fn new(settings: Settings, client: ProviderClient) -> (Self, Task<Message>) {
        info!("🌿 Leaf classifier ready, provider at {}", client.endpoint());

        let ping_client = client.clone();
        let check = Task::perform(
            async move { ping_client.ping().await },
            Message::ProviderChecked,
        );

        (
            LeafClassifier {
                session: SessionController::new(settings.default_model),
                client,
                preview_size: settings.preview_size,
                preview: None,
                status: format!("Connecting to {}...", settings.endpoint),
            },
            check,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Leaf Photo")
                    .add_filter("Images", &intake::IMAGE_EXTENSIONS)
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Loading {}...", path.display());
                    let pick = self.session.begin_pick();
                    return Task::perform(
                        intake::load_selected_image(path, self.preview_size),
                        move |loaded| Message::FileLoaded(pick, loaded),
                    );
                }

                Task::none()
            }
            Message::FileLoaded(pick, Ok(image)) => {
                self.apply_loaded_image(pick, image);
                Task::none()
            }
            Message::FileLoaded(pick, Err(e)) => {
                // The current session stays as it was
                warn!("File intake failed: {}", e);
                if self.session.is_latest_pick(pick) {
                    self.status = format!("⚠️  {}", e);
                }
                Task::none()
            }
            Message::ModelSelected(model) => {
                self.session.set_model(model);
                Task::none()
            }
            Message::Classify => {
                let Some(submission) = self.session.submit() else {
                    return Task::none();
                };

                self.status = "Classifying...".to_string();
                let client = self.client.clone();
                let token = submission.token;

                Task::perform(
                    async move { client.classify(submission.request).await },
                    move |outcome| Message::ClassificationSettled(token, outcome),
                )
            }
            Message::ClassificationSettled(token, outcome) => {
                if !self.session.settle(token, outcome) {
                    return Task::none();
                }

                if let Some(display) = self.session.display_result() {
                    self.status = format!(
                        "✅ Top prediction: {}",
                        display_label(&display.top_label)
                    );
                } else if let Some(e) = self.session.failure() {
                    error!("Error classifying image: {}", e);
                    self.status = format!("❌ Error classifying image. Please try again. ({})", e);
                }
                Task::none()
            }
            Message::ProviderChecked(Ok(banner)) => {
                info!("Provider says: {}", banner);
                if self.session.selected_image().is_none() {
                    self.status = format!("Connected: {}", banner);
                }
                Task::none()
            }
            Message::ProviderChecked(Err(e)) => {
                warn!("Provider check failed: {}", e);
                if self.session.selected_image().is_none() {
                    self.status = format!("⚠️  {}", e);
                }
                Task::none()
            }
        }
    }

    /// Select a freshly loaded image unless a newer pick replaced it
    fn apply_loaded_image(&mut self, pick: PickToken, image: SelectedImage) {
        let file_name = image.file_name.clone();
        if !self.session.finish_pick(pick, image) {
            return;
        }

        self.status = format!("Ready to classify {}", file_name);
        self.preview = self
            .session
            .selected_preview()
            .map(|preview| Handle::from_bytes(preview.png.to_vec()));
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let busy = self.session.is_busy();

        let model_selection = row![
            text("Select Model:"),
            pick_list(
                ModelId::ALL,
                Some(self.session.selected_model()),
                Message::ModelSelected,
            ),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mut upload: Column<Message> = column![
            text("Mint Leaf Classifier").size(40),
            text("Upload an image to identify different types of mint leaves").size(16),
            model_selection,
            button("Choose an image")
                .on_press(Message::PickFile)
                .padding(10),
        ]
        .spacing(20)
        .align_x(Alignment::Center);

        if let Some(handle) = &self.preview {
            let label = if busy { "Classifying..." } else { "Classify" };
            upload = upload
                .push(Image::new(handle.clone()).width(Length::Fixed(320.0)))
                .push(
                    button(label)
                        .on_press_maybe((!busy).then_some(Message::Classify))
                        .padding(10),
                );
        }

        upload = upload.push(text(&self.status).size(14));

        let mut content = row![upload.width(Length::FillPortion(1))].spacing(40);
        if let Some(display) = self.session.display_result() {
            content = content.push(results_panel(display).width(Length::FillPortion(1)));
        }

        container(scrollable(content.padding(40)))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Ranked predictions plus species details for a completed session
fn results_panel(display: &DisplayResult) -> Column<'_, Message> {
    let bars = PredictionBars::new(&display.ranked_predictions);
    let height = bars.height();
    let mark = if display.is_mint { "✓" } else { "✗" };

    column![
        text("Classification Results").size(28),
        canvas(bars).width(Length::Fill).height(Length::Fixed(height)),
        text(display.metadata.name).size(22),
        text(display.metadata.description).size(14),
        text(format!("Common Uses: {}", display.metadata.uses)).size(14),
        text(format!("{} {}", mark, display.verdict())).size(16),
    ]
    .spacing(12)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaf_classifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let overrides = Overrides {
        endpoint: args.endpoint.clone(),
        timeout_secs: args.timeout,
        model: args.model,
    };
    let settings = Settings::resolve(args.config.as_deref(), &overrides)
        .context("Failed to load settings")?;

    match args.command {
        Some(Command::Models) => {
            for model in ModelId::ALL {
                println!("{:<16} {}", model.as_str(), model.display_name());
            }
            Ok(())
        }
        Some(Command::Check) => block_on(headless::check(&settings)),
        Some(Command::Classify { path }) => block_on(async {
            let report = headless::classify_file(&settings, path).await?;
            println!("{}", report);
            Ok::<(), anyhow::Error>(())
        }),
        None => run_window(settings),
    }
}

/// Run a command-line session on a single-threaded runtime
fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(future)
}

/// Open the desktop window
fn run_window(settings: Settings) -> Result<()> {
    let client = ProviderClient::new(&settings.endpoint, settings.timeout())
        .context("Failed to create provider client")?;

    iced::application(
        "Mint Leaf Classifier",
        LeafClassifier::update,
        LeafClassifier::view,
    )
    .theme(LeafClassifier::theme)
    .centered()
    .run_with(move || LeafClassifier::new(settings, client))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::data::PreviewImage;
    use std::sync::Arc;

    fn app() -> LeafClassifier {
        let settings = Settings::default();
        let client = ProviderClient::new(&settings.endpoint, settings.timeout()).unwrap();
        LeafClassifier::new(settings, client).0
    }

    fn loaded(name: &str) -> SelectedImage {
        SelectedImage {
            file_name: name.to_string(),
            payload: Arc::from(vec![1u8, 2, 3]),
            mime_type: "image/png",
            preview: PreviewImage {
                png: Arc::from(vec![0x89u8, b'P', b'N', b'G']),
                width: 4,
                height: 3,
            },
        }
    }

    #[test]
    fn test_slow_earlier_load_does_not_replace_later_pick() {
        let mut app = app();
        let large = app.session.begin_pick();
        let small = app.session.begin_pick();

        let _ = app.update(Message::FileLoaded(small, Ok(loaded("small.png"))));
        let _ = app.update(Message::FileLoaded(large, Ok(loaded("large.png"))));

        assert_eq!(app.session.selected_image().unwrap().file_name, "small.png");
        assert_eq!(app.status, "Ready to classify small.png");
        assert!(app.preview.is_some());
    }

    #[test]
    fn test_stale_load_error_keeps_status() {
        let mut app = app();
        let old = app.session.begin_pick();
        let current = app.session.begin_pick();

        let _ = app.update(Message::FileLoaded(current, Ok(loaded("leaf.png"))));
        let _ = app.update(Message::FileLoaded(
            old,
            Err(IntakeError::Empty(PathBuf::from("old.png"))),
        ));

        assert_eq!(app.status, "Ready to classify leaf.png");
        assert_eq!(app.session.selected_image().unwrap().file_name, "leaf.png");
    }
}
