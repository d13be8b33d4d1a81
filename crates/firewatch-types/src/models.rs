use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal risk classification. Variant order is severity order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Moderate,
    #[default]
    High,
    Extreme,
}

impl Severity {
    /// Whether an event of this severity meets `threshold`.
    /// Thresholds are inclusive upward: `moderate` means moderate and above.
    pub fn reaches(self, threshold: Severity) -> bool {
        self >= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}

/// Badge text, e.g. `EXTREME`.
impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}' (expected moderate, high or extreme)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "extreme" => Ok(Self::Extreme),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// An organization configured to receive wildfire-risk alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertRecipient {
    pub id: Uuid,
    pub organization_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    pub alert_threshold: Severity,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

impl AlertRecipient {
    /// True when this recipient should hear about an event of `severity`.
    pub fn wants(&self, severity: Severity) -> bool {
        self.is_active && severity.reaches(self.alert_threshold)
    }
}

/// Append-only audit entry. `organization_name` is a copy, not a reference:
/// deleting the recipient leaves its history intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertHistoryEntry {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    pub organization_name: String,
    pub severity: Severity,
    pub message: String,
    pub delivered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub moderate: usize,
    pub high: usize,
    pub extreme: usize,
}

impl SeverityCounts {
    pub fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Moderate => self.moderate += 1,
            Severity::High => self.high += 1,
            Severity::Extreme => self.extreme += 1,
        }
    }
}

/// Counts shown in the Alerts page header and tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub total_recipients: usize,
    pub active_recipients: usize,
    pub history_total: usize,
    pub history_by_severity: SeverityCounts,
}

fn default_active() -> bool {
    true
}
