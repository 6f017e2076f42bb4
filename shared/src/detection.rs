use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LabelParts, PredictResponse, image_file_name, image_url, normalize_confidence};

/// Server-assigned identifier of a stored prediction. The service has used
/// both integer and string keys, so either is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionId::Number(id) => write!(f, "{id}"),
            PredictionId::Text(id) => f.write_str(id),
        }
    }
}

/// Normalized outcome of one classification, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub prediction_id: Option<PredictionId>,
    pub label: String,
    pub confidence_percent: u8,
    pub description: String,
    pub treatment: String,
}

impl DetectionResult {
    pub fn label_parts(&self) -> LabelParts {
        LabelParts::parse(&self.label)
    }
}

impl From<PredictResponse> for DetectionResult {
    fn from(response: PredictResponse) -> Self {
        Self {
            prediction_id: response.prediction_id,
            label: response.predicted_label,
            confidence_percent: normalize_confidence(response.confidence_score),
            description: response.disease_description.unwrap_or_default(),
            treatment: response.disease_treatment.unwrap_or_default(),
        }
    }
}

/// One past detection of the signed-in user, as listed by
/// `GET /user/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prediction_id: PredictionId,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(rename = "predicted_label")]
    pub label: String,
    pub confidence_score: f64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn confidence_percent(&self) -> u8 {
        normalize_confidence(self.confidence_score)
    }

    pub fn image_file_name(&self) -> Option<&str> {
        self.image_path.as_deref().and_then(image_file_name)
    }

    pub fn image_url(&self, base_url: &str) -> Option<String> {
        image_url(base_url, self.image_path.as_deref())
    }

    pub fn label_parts(&self) -> LabelParts {
        LabelParts::parse(&self.label)
    }
}

/// RFC 3339 on the way out; RFC 3339 or a naive ISO-8601 timestamp (taken
/// as UTC) on the way in.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp `{raw}`")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn predict_response_is_normalized() {
        let response = PredictResponse {
            prediction_id: Some(PredictionId::Number(12)),
            predicted_label: "Leaf Blight".into(),
            confidence_score: 0.93,
            disease_description: Some("Brown lesions".into()),
            disease_treatment: None,
        };

        let result = DetectionResult::from(response);
        assert_eq!(result.confidence_percent, 93);
        assert_eq!(result.label, "Leaf Blight");
        assert_eq!(result.description, "Brown lesions");
        assert_eq!(result.treatment, "");
    }

    #[test]
    fn history_listing_parses_service_records() {
        let body = r#"[
            {"prediction_id": 3, "image_path": "C:\\app\\uploads\\4_20240501.jpg",
             "predicted_label": "Apple___Black_rot", "confidence_score": 0.66,
             "created_at": "2024-05-01T10:12:33.123456"},
            {"prediction_id": "p-2", "image_path": null,
             "predicted_label": "Tomato___healthy", "confidence_score": 91.2,
             "created_at": "2024-04-30T08:00:00Z"}
        ]"#;

        let entries: Vec<HistoryEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.prediction_id, PredictionId::Number(3));
        assert_eq!(first.image_file_name(), Some("4_20240501.jpg"));
        assert_eq!(first.confidence_percent(), 66);
        assert_eq!(first.created_at.day(), 1);
        assert_eq!(first.created_at.hour(), 10);

        let second = &entries[1];
        assert_eq!(second.prediction_id.to_string(), "p-2");
        assert_eq!(second.image_url("http://host"), None);
        assert_eq!(second.confidence_percent(), 91);
        assert!(second.label_parts().is_healthy());
    }

    #[test]
    fn space_separated_timestamps_are_accepted() {
        let parsed = timestamp::parse("2024-05-01 10:12:33").unwrap();
        assert_eq!(parsed.minute(), 12);
        assert!(timestamp::parse("yesterday").is_none());
    }
}
