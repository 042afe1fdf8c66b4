use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prompt::AdvisoryRequest;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvisoryId(pub String);

/// State of an advisory request as observed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum AdvisoryOutcome {
    Pending,
    Succeeded(String),
    /// Carries the user-facing fallback message.
    Failed(String),
}

impl AdvisoryOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Succeeded(text) | Self::Failed(text) => Some(text),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryRecord {
    pub id: AdvisoryId,
    pub device_description: String,
    pub plan_description: String,
    pub outcome: AdvisoryOutcome,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AdvisoryRecord {
    pub fn pending(id: AdvisoryId, request: &AdvisoryRequest) -> Self {
        Self {
            id,
            device_description: request.device_description.clone(),
            plan_description: request.plan_description.clone(),
            outcome: AdvisoryOutcome::Pending,
            requested_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn complete(&mut self, outcome: AdvisoryOutcome) {
        self.outcome = outcome;
        self.completed_at = Some(Utc::now());
    }

    pub fn status_view(&self) -> AdvisoryStatusView {
        AdvisoryStatusView {
            advisory_id: self.id.clone(),
            status: self.outcome.label(),
            text: self.outcome.text().map(str::to_string),
            device_description: self.device_description.clone(),
            plan_description: self.plan_description.clone(),
            requested_at: self.requested_at,
            completed_at: self.completed_at,
        }
    }
}

/// Storage abstraction for in-flight and finished advisories.
pub trait AdvisoryStore: Send + Sync {
    fn insert(&self, record: AdvisoryRecord) -> Result<AdvisoryRecord, AdvisoryStoreError>;
    fn update(&self, record: AdvisoryRecord) -> Result<(), AdvisoryStoreError>;
    fn fetch(&self, id: &AdvisoryId) -> Result<Option<AdvisoryRecord>, AdvisoryStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryStoreError {
    #[error("advisory already exists")]
    Conflict,
    #[error("advisory not found")]
    NotFound,
    #[error("advisory store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryStatusView {
    pub advisory_id: AdvisoryId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub device_description: String,
    pub plan_description: String,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}
