/// Classification session controller
///
/// Owns the request lifecycle for one window: which image is picked, which
/// model is selected, and what became of the last submission. The controller
/// never performs I/O itself. `submit` hands out a `Submission` for the
/// caller to run, and the caller reports back through `settle` with the
/// token it was given.
use tracing::{debug, info, warn};

use super::data::{ClassificationRequest, ClassificationResponse, ModelId, PreviewImage, SelectedImage};
use crate::classify::interpret::{interpret, DisplayResult};
use crate::error::ClassificationError;

/// Identifies one session; replies carrying an older token are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// Identifies one file pick whose image may still be loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickToken(u64);

/// Where the session currently is
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing picked yet
    Idle,
    /// An image is waiting to be classified
    FilePicked,
    /// A request is outstanding
    Submitting,
    /// The provider replied; the display result is derived from the response
    Completed {
        response: ClassificationResponse,
        display: DisplayResult,
    },
    /// The last request failed; resubmitting is allowed
    Failed(ClassificationError),
}

/// A request the caller must send to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub token: SessionToken,
    pub request: ClassificationRequest,
}

/// The single source of truth the UI renders from
#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    image: Option<SelectedImage>,
    model: ModelId,
    token: SessionToken,
    pick: PickToken,
}

impl SessionController {
    pub fn new(model: ModelId) -> Self {
        Self {
            state: SessionState::Idle,
            image: None,
            model,
            token: SessionToken(0),
            pick: PickToken(0),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn selected_preview(&self) -> Option<&PreviewImage> {
        self.image.as_ref().map(|image| &image.preview)
    }

    pub fn selected_model(&self) -> ModelId {
        self.model
    }

    /// Display result of the completed session, if any
    pub fn display_result(&self) -> Option<&DisplayResult> {
        match &self.state {
            SessionState::Completed { display, .. } => Some(display),
            _ => None,
        }
    }

    /// Error of the failed session, if any
    pub fn failure(&self) -> Option<&ClassificationError> {
        match &self.state {
            SessionState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// True while a request is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Submitting)
    }

    /// Accept a newly picked image and start a fresh session
    ///
    /// Any previous response or error is dropped. A request still in flight
    /// is not cancelled, but its reply will no longer match the token.
    pub fn select_file(&mut self, image: SelectedImage) {
        if self.is_busy() {
            info!("New file picked while a request is outstanding; its reply will be ignored");
        }
        info!(
            "Selected {} ({} bytes, preview {}x{})",
            image.file_name,
            image.payload.len(),
            image.preview.width,
            image.preview.height
        );

        self.image = Some(image);
        self.advance_token();
        // Loads still running for earlier picks are superseded
        self.pick = PickToken(self.pick.0 + 1);
        self.state = SessionState::FilePicked;
    }

    /// Register a pick whose image is still being loaded
    ///
    /// The returned token goes back in through `finish_pick` once the load
    /// is done. Every new pick supersedes the ones before it.
    pub fn begin_pick(&mut self) -> PickToken {
        self.pick = PickToken(self.pick.0 + 1);
        debug!("File pick {} started", self.pick.0);
        self.pick
    }

    /// True if no newer pick or selection has happened since `pick`
    pub fn is_latest_pick(&self, pick: PickToken) -> bool {
        pick == self.pick
    }

    /// Select the image loaded for `pick`
    ///
    /// Returns `false` and changes nothing when a newer pick has replaced it,
    /// so loads finishing out of order never override the user's last choice.
    pub fn finish_pick(&mut self, pick: PickToken, image: SelectedImage) -> bool {
        if !self.is_latest_pick(pick) {
            warn!(
                "Discarding stale file load for {} (pick {}, current {})",
                image.file_name, pick.0, self.pick.0
            );
            return false;
        }

        self.select_file(image);
        true
    }

    /// Change the model used by the next submission
    pub fn set_model(&mut self, model: ModelId) {
        if model != self.model {
            debug!("Model changed: {} -> {}", self.model.as_str(), model.as_str());
        }
        self.model = model;
    }

    /// Build a request from the current image and model
    ///
    /// Returns `None` without touching the state when no image is picked or
    /// a request is already outstanding.
    pub fn submit(&mut self) -> Option<Submission> {
        let Some(image) = self.image.as_ref() else {
            debug!("Submit ignored: no file selected");
            return None;
        };
        if self.is_busy() {
            debug!("Submit ignored: request already outstanding");
            return None;
        }

        let request = ClassificationRequest {
            image: image.clone(),
            model: self.model,
        };
        self.advance_token();
        self.state = SessionState::Submitting;

        info!(
            "Submitting {} with {} (token {})",
            request.image.file_name,
            request.model.as_str(),
            self.token.0
        );

        Some(Submission {
            token: self.token,
            request,
        })
    }

    /// Apply the outcome of a submission
    ///
    /// Returns `false` and leaves the state alone when the token is stale or
    /// nothing is outstanding.
    pub fn settle(
        &mut self,
        token: SessionToken,
        outcome: Result<ClassificationResponse, ClassificationError>,
    ) -> bool {
        if token != self.token || !self.is_busy() {
            warn!(
                "Discarding stale classification reply (token {}, current {})",
                token.0, self.token.0
            );
            return false;
        }

        self.state = match outcome {
            Ok(response) => {
                let result = interpret(&response);
                info!(
                    "Classification complete: {} ({} predictions)",
                    result.top_label,
                    response.predictions.len()
                );
                SessionState::Completed {
                    response,
                    display: result,
                }
            }
            Err(error) => {
                warn!("Classification failed: {}", error);
                SessionState::Failed(error)
            }
        };
        true
    }

    fn advance_token(&mut self) {
        self.token = SessionToken(self.token.0 + 1);
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(ModelId::default())
    }
}
