//! Event catalog for bookable group fitness sessions.
//!
//! The catalog is loaded once at startup from a JSON file and served
//! read-only afterwards. An unreadable or malformed catalog degrades to
//! a logged fallback catalog instead of failing startup; the booking
//! surface is not availability-critical the way authentication is.

use chrono::{DateTime, Utc};
use fitbook_core::{EventId, Result, TrainerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A trainer leading one or more events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: TrainerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A bookable group fitness session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub category: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
    pub spots_available: u32,
    #[serde(default)]
    pub trainers: Vec<Trainer>,
}

/// Errors from loading the event catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog file could not be read.
    Unreadable { path: String, details: String },
    /// The catalog file is not valid event JSON.
    Malformed { path: String, details: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, details } => {
                write!(f, "failed to read event catalog '{path}': {details}")
            }
            Self::Malformed { path, details } => {
                write!(f, "event catalog '{path}' is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only event catalog shared across request handlers.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Arc<Vec<Event>>,
}

impl EventCatalog {
    /// Loads the catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::Unreadable {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

        let events: Vec<Event> =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Malformed {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            events: Arc::new(events),
        })
    }

    /// Loads the catalog, degrading to the fallback catalog on failure.
    #[must_use]
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(report) => {
                tracing::error!(error = ?report, "failed to load event catalog, serving fallback");
                Self::fallback()
            }
        }
    }

    /// A single placeholder event served when the real catalog is
    /// unavailable.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            events: Arc::new(vec![Event {
                id: EventId::from("fallback-1"),
                title: "Fallback Session".to_string(),
                category: "general".to_string(),
                time: Utc::now(),
                image: None,
                price: 0.0,
                spots_available: 0,
                trainers: Vec::new(),
            }]),
        }
    }

    /// Returns all catalog events.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG_JSON: &str = r#"[
        {
            "id": "yoga-101",
            "title": "Morning Yoga",
            "category": "yoga",
            "time": "2026-09-01T08:00:00Z",
            "price": 12.5,
            "spotsAvailable": 18,
            "trainers": [
                {"id": "t1", "name": "Dana", "role": "Lead instructor"}
            ]
        },
        {
            "id": "spin-2",
            "title": "Evening Spin",
            "category": "cycling",
            "time": "2026-09-01T18:30:00Z",
            "image": "/images/spin.jpg",
            "price": 9.0,
            "spotsAvailable": 0
        }
    ]"#;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file
    }

    #[test]
    fn load_parses_catalog_file() {
        let file = write_catalog(CATALOG_JSON);
        let catalog = EventCatalog::load(file.path()).expect("should load");

        let events = catalog.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.as_str(), "yoga-101");
        assert_eq!(events[0].trainers[0].name, "Dana");
        assert_eq!(events[1].spots_available, 0);
        assert!(events[1].trainers.is_empty());
    }

    #[test]
    fn load_missing_file_is_unreadable() {
        let result = EventCatalog::load(Path::new("/nonexistent/events.json"));
        assert!(result.is_err());
    }

    #[test]
    fn load_or_fallback_serves_placeholder_on_malformed_catalog() {
        let file = write_catalog("not json");
        let catalog = EventCatalog::load_or_fallback(file.path());

        let events = catalog.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_str(), "fallback-1");
        assert_eq!(events[0].title, "Fallback Session");
    }

    #[test]
    fn event_serializes_with_camel_case_fields() {
        let file = write_catalog(CATALOG_JSON);
        let catalog = EventCatalog::load(file.path()).expect("should load");

        let json = serde_json::to_value(&catalog.events()[0]).expect("serialize");
        assert_eq!(json["spotsAvailable"], 18);
        assert!(json.get("image").is_none());
    }
}
