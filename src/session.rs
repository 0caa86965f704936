//! One user's portrait session: mode, photo slots and the generation lifecycle.
//!
//! The lifecycle is an explicit state machine:
//!
//! | From                      | Event                    | To                      |
//! |---------------------------|--------------------------|-------------------------|
//! | Idle, Succeeded, Failed   | trigger, photos present  | Submitting              |
//! | Idle, Succeeded, Failed   | trigger, photos missing  | Failed(Validation)      |
//! | Submitting                | trigger                  | refused, unchanged      |
//! | Submitting                | image received           | Succeeded               |
//! | Submitting                | error received           | Failed(EmptyResponse or Transport) |
//! | anything else             | outcome received         | ignored                 |
//!
//! Entering `Submitting` drops the previous image or error.

use crate::error::{DiyaError, Result};
use crate::image::{EncodedImage, GeneratedImage, GenerationRequest, PortraitProvider};
use crate::prompt::{build_prompt, SelectionMode};
use crate::view::{StatusView, TriggerView};
use std::fmt;

/// Message shown when a required photo is missing.
pub const MISSING_PHOTOS_MESSAGE: &str = "Please upload all required photos.";
/// Message shown when the API answered without an image.
pub const NO_IMAGE_MESSAGE: &str = "No image data found in the API response.";
/// Message shown for every other failure. Details go to the log only.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate image. Please check the logs for more details.";

/// The two photo slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// First subject; always required.
    PersonOne,
    /// Second subject; required in couple mode.
    PersonTwo,
}

impl Slot {
    /// Uploader title for this slot.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PersonOne => "Image 1",
            Self::PersonTwo => "Image 2",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::PersonOne => 0,
            Self::PersonTwo => 1,
        }
    }
}

/// Why an attempt ended without a portrait, as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationFailure {
    /// Required photos missing or unreadable; nothing was sent.
    Validation,
    /// The API answered but no part carried an image.
    EmptyResponse,
    /// The call itself failed (network, auth, quota, blocked, bad payload).
    Transport,
}

impl GenerationFailure {
    /// Classifies a crate error.
    pub fn from_error(err: &DiyaError) -> Self {
        match err {
            DiyaError::NoImage => Self::EmptyResponse,
            _ => Self::Transport,
        }
    }

    /// Fixed user-facing text.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Validation => MISSING_PHOTOS_MESSAGE,
            Self::EmptyResponse => NO_IMAGE_MESSAGE,
            Self::Transport => GENERATION_FAILED_MESSAGE,
        }
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Where the current generation attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    /// Nothing attempted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting,
    /// The last attempt produced a portrait.
    Succeeded(GeneratedImage),
    /// The last attempt failed.
    Failed(GenerationFailure),
}

impl GenerationState {
    /// True while a request is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Why a trigger did not start an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TriggerRefused {
    /// An attempt is already in flight.
    #[error("a portrait is already being generated")]
    AlreadyInFlight,
    /// Required photos are missing.
    #[error("{}", MISSING_PHOTOS_MESSAGE)]
    MissingImages,
}

/// The session's single owner of UI state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: SelectionMode,
    slots: [Option<EncodedImage>; 2],
    state: GenerationState,
}

impl Session {
    /// Starts an empty single-mode session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switches mode. Keeps both slots and the generation state as they are.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Stores a photo in `slot`, replacing any previous one.
    pub fn set_image(&mut self, slot: Slot, image: EncodedImage) {
        self.slots[slot.index()] = Some(image);
    }

    /// Stores the outcome of reading a photo.
    ///
    /// A read failure leaves the slot untouched and, unless a request is in
    /// flight, shows the missing-photos message. Returns whether the slot
    /// was filled.
    pub fn load_image(&mut self, slot: Slot, image: Result<EncodedImage>) -> bool {
        match image {
            Ok(image) => {
                self.set_image(slot, image);
                true
            }
            Err(err) => {
                tracing::warn!(slot = slot.title(), error = %err, "could not read photo");
                if !self.state.is_submitting() {
                    self.state = GenerationState::Failed(GenerationFailure::Validation);
                }
                false
            }
        }
    }

    /// Empties `slot`. Does not touch the generation state.
    pub fn clear_image(&mut self, slot: Slot) {
        self.slots[slot.index()] = None;
    }

    /// Photo currently in `slot`.
    pub fn image(&self, slot: Slot) -> Option<&EncodedImage> {
        self.slots[slot.index()].as_ref()
    }

    /// Slots offered to the user in the current mode.
    pub fn visible_slots(&self) -> &'static [Slot] {
        match self.mode {
            SelectionMode::Single => &[Slot::PersonOne],
            SelectionMode::Couple => &[Slot::PersonOne, Slot::PersonTwo],
        }
    }

    /// Photo one present, and photo two present iff in couple mode.
    pub fn has_required_images(&self) -> bool {
        self.visible_slots()
            .iter()
            .all(|slot| self.image(*slot).is_some())
    }

    /// Current generation state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_submitting()
    }

    /// Message of the last failure, if the last attempt failed.
    pub fn error(&self) -> Option<&'static str> {
        match &self.state {
            GenerationState::Failed(failure) => Some(failure.message()),
            _ => None,
        }
    }

    /// Portrait from the last attempt, if it succeeded.
    pub fn generated_image(&self) -> Option<&GeneratedImage> {
        match &self.state {
            GenerationState::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    /// Output panel rendering.
    pub fn view(&self) -> StatusView {
        StatusView::project(self.is_loading(), self.error(), self.generated_image())
    }

    /// Generate button rendering.
    pub fn trigger(&self) -> TriggerView {
        TriggerView::project(self.is_loading(), self.has_required_images())
    }

    /// Validates the slots and enters `Submitting`.
    ///
    /// Returns the request to send. Missing photos move the session to
    /// `Failed(Validation)`; a trigger while in flight changes nothing.
    pub fn begin_generation(&mut self) -> std::result::Result<GenerationRequest, TriggerRefused> {
        if self.state.is_submitting() {
            return Err(TriggerRefused::AlreadyInFlight);
        }

        let Some(request) = self.build_request() else {
            self.state = GenerationState::Failed(GenerationFailure::Validation);
            return Err(TriggerRefused::MissingImages);
        };

        self.state = GenerationState::Submitting;
        Ok(request)
    }

    /// Applies the outcome of the in-flight attempt.
    ///
    /// Returns false, leaving the state alone, when nothing was in flight.
    pub fn finish_generation(&mut self, outcome: Result<GeneratedImage>) -> bool {
        if !self.state.is_submitting() {
            tracing::warn!("discarding generation outcome with no attempt in flight");
            return false;
        }

        self.state = match outcome {
            Ok(image) => GenerationState::Succeeded(image),
            Err(err) => {
                let failure = GenerationFailure::from_error(&err);
                tracing::error!(
                    error = %err,
                    ?failure,
                    retryable = err.is_retryable(),
                    retry_after = ?err.retry_after(),
                    "portrait generation failed"
                );
                GenerationState::Failed(failure)
            }
        };
        true
    }

    /// Runs one full attempt against `provider`.
    ///
    /// All failures end up in the session state; nothing is returned as an
    /// error.
    pub async fn generate(&mut self, provider: &dyn PortraitProvider) -> &GenerationState {
        self.generate_with(provider, |_| {}).await
    }

    /// Like [`generate`](Self::generate), calling `on_submit` once the
    /// session has entered `Submitting` and before the request is sent.
    pub async fn generate_with<F>(
        &mut self,
        provider: &dyn PortraitProvider,
        on_submit: F,
    ) -> &GenerationState
    where
        F: FnOnce(&Session),
    {
        let request = match self.begin_generation() {
            Ok(request) => request,
            Err(refused) => {
                tracing::debug!(%refused, "generation not started");
                return &self.state;
            }
        };

        tracing::debug!(
            mode = %self.mode,
            provider = provider.name(),
            "starting portrait generation"
        );
        on_submit(self);
        let outcome = provider.generate(&request).await;
        self.finish_generation(outcome);
        &self.state
    }

    fn build_request(&self) -> Option<GenerationRequest> {
        let mut images = vec![self.image(Slot::PersonOne)?.clone()];
        if self.mode == SelectionMode::Couple {
            images.push(self.image(Slot::PersonTwo)?.clone());
        }
        GenerationRequest::new(build_prompt(self.mode), images).ok()
    }
}
