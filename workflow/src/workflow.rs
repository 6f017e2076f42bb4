use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use shared::{DetectionResult, HistoryEntry, Phase};
use tokio::sync::Mutex;

use crate::config::WorkflowConfig;
use crate::error::{HISTORY_FALLBACK, PREDICT_FALLBACK, WorkflowError};
use crate::ports::{ImagePayload, PredictionService, SessionStore};

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// `submit` without a held image.
    NoImage,
    /// Another submission or re-detection is still in flight.
    Busy,
    /// The workflow was deactivated.
    Inactive,
    /// The image was replaced or cleared while the request was in flight.
    Superseded,
}

/// What an operation did. Failures are also recorded in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(Skip),
    Failed(WorkflowError),
}

/// Everything the UI reads, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub phase: Phase,
    pub image: Option<ImagePayload>,
    pub result: Option<DetectionResult>,
    pub history: Vec<HistoryEntry>,
    pub error: Option<WorkflowError>,
    pub history_error: Option<WorkflowError>,
}

impl WorkflowSnapshot {
    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .or(self.history_error.as_ref())
            .map(ToString::to_string)
    }
}

#[derive(Default)]
struct State {
    image: Option<ImagePayload>,
    result: Option<DetectionResult>,
    error: Option<WorkflowError>,
    history: Vec<HistoryEntry>,
    history_error: Option<WorkflowError>,
}

impl State {
    fn phase(&self, submitting: bool) -> Phase {
        if submitting {
            Phase::Submitting
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::ResultReady
        } else if self.image.is_some() {
            Phase::ImageSelected
        } else if self.history_error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }
}

/// Holds the single-flight slot for as long as it lives.
struct Flight<'a>(&'a Cell<bool>);

impl<'a> Flight<'a> {
    fn acquire(slot: &'a Cell<bool>) -> Option<Self> {
        if slot.replace(true) {
            None
        } else {
            Some(Flight(slot))
        }
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// How a failed prediction is reported.
#[derive(Clone, Copy)]
enum Origin {
    Submit,
    ReDetect,
}

/// Pick an image, classify it, show the normalized result, and keep the
/// user's detection history in sync.
///
/// All methods take `&self`; the workflow is meant to be shared behind an
/// `Rc` and driven from a single-threaded executor. At most one submission
/// (plain or re-detect) runs at a time, and history fetches never overlap.
pub struct DetectionWorkflow<P, S> {
    config: WorkflowConfig,
    service: P,
    session: S,
    state: RefCell<State>,
    in_flight: Cell<bool>,
    history_turn: Mutex<()>,
    active: Cell<bool>,
    epoch: Cell<u64>,
    observer: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<P: PredictionService, S: SessionStore> DetectionWorkflow<P, S> {
    pub fn new(config: WorkflowConfig, service: P, session: S) -> Self {
        Self {
            config,
            service,
            session,
            state: RefCell::new(State::default()),
            in_flight: Cell::new(false),
            history_turn: Mutex::new(()),
            active: Cell::new(false),
            epoch: Cell::new(0),
            observer: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Called after every state change.
    pub fn set_observer(&self, observer: impl Fn() + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Marks the workflow live and loads the history listing.
    pub async fn activate(&self) -> Outcome {
        self.active.set(true);
        log::info!("Detection workflow activated");
        self.refresh_history().await
    }

    /// Requests still in flight finish, but their results are dropped.
    pub fn deactivate(&self) {
        self.active.set(false);
        log::info!("Detection workflow deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn select_image(&self, image: ImagePayload) {
        log::debug!("Selected image {} ({})", image.file_name, image.mime_type);
        self.bump_epoch();
        self.update(|state| {
            state.image = Some(image);
            state.result = None;
            state.error = None;
            state.history_error = None;
        });
    }

    pub fn clear(&self) {
        self.bump_epoch();
        self.update(|state| {
            state.image = None;
            state.result = None;
            state.error = None;
            state.history_error = None;
        });
    }

    /// Classifies the held image, then refreshes the history listing.
    pub async fn submit(&self) -> Outcome {
        if !self.active.get() {
            return Outcome::Skipped(Skip::Inactive);
        }
        let Some(image) = self.state.borrow().image.clone() else {
            log::debug!("Submit ignored: no image selected");
            return Outcome::Skipped(Skip::NoImage);
        };
        let Some(flight) = Flight::acquire(&self.in_flight) else {
            log::warn!("Submit rejected: a detection is already in flight");
            return Outcome::Skipped(Skip::Busy);
        };

        log::info!("Submitting {} for detection", image.file_name);
        self.update(|state| {
            state.result = None;
            state.error = None;
        });
        self.classify(flight, image, Origin::Submit).await
    }

    /// Re-runs detection on the stored image of a past entry.
    pub async fn re_detect(&self, entry: &HistoryEntry) -> Outcome {
        if !self.active.get() {
            return Outcome::Skipped(Skip::Inactive);
        }
        let Some(flight) = Flight::acquire(&self.in_flight) else {
            log::warn!(
                "Re-detect of {} rejected: a detection is already in flight",
                entry.prediction_id
            );
            return Outcome::Skipped(Skip::Busy);
        };

        log::info!("Re-detecting prediction {}", entry.prediction_id);
        let epoch = self.epoch.get();
        self.update(|state| {
            state.result = None;
            state.error = None;
        });

        let (Some(url), Some(file_name)) = (
            entry.image_url(&self.config.base_url),
            entry.image_file_name(),
        ) else {
            drop(flight);
            return self.fail(
                epoch,
                WorkflowError::re_detect("this detection has no stored image"),
            );
        };

        let image = match self.service.fetch_image(&url, file_name).await {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Could not fetch stored image {}: {}", url, err);
                drop(flight);
                return self.fail(
                    epoch,
                    WorkflowError::re_detect("the stored image could not be loaded"),
                );
            }
        };

        if !self.is_current(epoch) {
            log::debug!("Re-detect of {} superseded before classification", entry.prediction_id);
            drop(flight);
            self.notify();
            return Outcome::Skipped(if self.active.get() {
                Skip::Superseded
            } else {
                Skip::Inactive
            });
        }
        let held = image.clone();
        self.update(|state| state.image = Some(held));
        self.classify(flight, image, Origin::ReDetect).await
    }

    /// Replaces the history listing with the latest from the service.
    ///
    /// Calls are served one at a time in call order. A failure keeps the
    /// last listing that loaded.
    pub async fn refresh_history(&self) -> Outcome {
        if !self.active.get() {
            return Outcome::Skipped(Skip::Inactive);
        }
        let _turn = self.history_turn.lock().await;
        if !self.active.get() {
            return Outcome::Skipped(Skip::Inactive);
        }

        let Some(user_id) = self.session.display_user_id() else {
            log::warn!("History not loaded: no user id in the session token");
            let error = WorkflowError::IdentityMissing;
            self.update(|state| state.history_error = Some(error.clone()));
            return Outcome::Failed(error);
        };

        let token = self.session.token();
        let fetched = match self.service.history(token.as_deref(), &user_id).await {
            Ok(entries) => Ok(entries),
            Err(err) if err.status() == Some(404) => {
                log::debug!("No detections recorded yet for user {}", user_id);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        };

        if !self.active.get() {
            log::debug!("History response dropped: workflow inactive");
            return Outcome::Skipped(Skip::Inactive);
        }

        match fetched {
            Ok(entries) => {
                let entries = dedupe(entries);
                log::info!("Loaded {} history entries", entries.len());
                self.update(|state| {
                    state.history = entries;
                    state.history_error = None;
                });
                Outcome::Applied
            }
            Err(err) => {
                log::warn!("History refresh failed: {}", err);
                let error = WorkflowError::from_service(err, HISTORY_FALLBACK);
                self.update(|state| state.history_error = Some(error.clone()));
                Outcome::Failed(error)
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase(self.in_flight.get())
    }

    pub fn image(&self) -> Option<ImagePayload> {
        self.state.borrow().image.clone()
    }

    pub fn result(&self) -> Option<DetectionResult> {
        self.state.borrow().result.clone()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.borrow().history.clone()
    }

    pub fn error(&self) -> Option<WorkflowError> {
        self.state.borrow().error.clone()
    }

    pub fn history_error(&self) -> Option<WorkflowError> {
        self.state.borrow().history_error.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .error
            .as_ref()
            .or(state.history_error.as_ref())
            .map(ToString::to_string)
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.borrow();
        WorkflowSnapshot {
            phase: state.phase(self.in_flight.get()),
            image: state.image.clone(),
            result: state.result.clone(),
            history: state.history.clone(),
            error: state.error.clone(),
            history_error: state.history_error.clone(),
        }
    }

    async fn classify(&self, flight: Flight<'_>, image: ImagePayload, origin: Origin) -> Outcome {
        let epoch = self.epoch.get();
        let token = self.session.token();
        let response = self.service.predict(token.as_deref(), &image).await;
        drop(flight);

        match response {
            Ok(response) => {
                let result = DetectionResult::from(response);
                let outcome = if self.is_current(epoch) {
                    log::info!(
                        "Detected {} at {}% confidence",
                        result.label,
                        result.confidence_percent
                    );
                    self.update(|state| state.result = Some(result));
                    Outcome::Applied
                } else {
                    log::debug!("Detection result for {} discarded", image.file_name);
                    self.notify();
                    Outcome::Skipped(if self.active.get() {
                        Skip::Superseded
                    } else {
                        Skip::Inactive
                    })
                };
                // The service stored the prediction either way.
                self.refresh_history().await;
                outcome
            }
            Err(err) => {
                log::warn!("Detection of {} failed: {}", image.file_name, err);
                let error = match origin {
                    Origin::Submit => WorkflowError::from_service(err, PREDICT_FALLBACK),
                    Origin::ReDetect => WorkflowError::re_detect(
                        WorkflowError::from_service(err, PREDICT_FALLBACK).to_string(),
                    ),
                };
                self.fail(epoch, error)
            }
        }
    }

    fn fail(&self, epoch: u64, error: WorkflowError) -> Outcome {
        if self.is_current(epoch) {
            self.update(|state| state.error = Some(error.clone()));
        } else {
            self.notify();
        }
        Outcome::Failed(error)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.active.get() && self.epoch.get() == epoch
    }

    fn bump_epoch(&self) {
        self.epoch.set(self.epoch.get().wrapping_add(1));
    }

    fn update(&self, apply: impl FnOnce(&mut State)) {
        let before = self.phase();
        apply(&mut self.state.borrow_mut());
        let after = self.phase();
        if before != after {
            log::debug!("Phase {} -> {}", before, after);
        }
        self.notify();
    }

    fn notify(&self) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer();
        }
    }
}

fn dedupe(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let fresh = seen.insert(entry.prediction_id.clone());
            if !fresh {
                log::warn!("Dropping duplicate history entry {}", entry.prediction_id);
            }
            fresh
        })
        .collect()
}
