pub mod api;
pub mod models;

pub use api::{RecipientInput, RecipientPatch, SetActiveRequest};
pub use models::{AlertHistoryEntry, AlertRecipient, ParseSeverityError, Severity, StoreSummary};
