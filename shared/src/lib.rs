mod claims;
mod confidence;
mod detection;
mod label;
mod media;
mod wire;

pub use claims::display_user_id;
pub use confidence::normalize_confidence;
pub use detection::{DetectionResult, HistoryEntry, PredictionId};
pub use label::LabelParts;
pub use media::{guess_mime_type, image_file_name, image_url, UPLOADS_SEGMENT};
pub use wire::{ErrorBody, ErrorDetail, PredictResponse};

use strum_macros::Display;

/// Joint state of the detection workflow as seen by the UI. Displays as a
/// kebab-case tag, e.g. `result-ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    Idle,
    ImageSelected,
    Submitting,
    ResultReady,
    Failed,
}

impl Phase {
    pub fn is_busy(self) -> bool {
        self == Phase::Submitting
    }
}
