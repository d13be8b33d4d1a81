use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use firewatch_types::{
    AlertHistoryEntry, AlertRecipient, RecipientInput, RecipientPatch, Severity, StoreSummary,
};

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::seed;

pub const RECIPIENTS_KEY: &str = "recipients";
pub const HISTORY_KEY: &str = "alert_history";

/// Which collections `seed_if_empty` populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub recipients: bool,
    pub history: bool,
}

/// Alert recipients plus their append-only change history, held in memory and
/// written through to a [`KeyValueStore`] after every mutation.
///
/// Both collections are stored newest-first. Every write replaces the whole
/// collection under its key.
pub struct RecipientStore<S: KeyValueStore> {
    backend: S,
    recipients: Vec<AlertRecipient>,
    history: Vec<AlertHistoryEntry>,
}

impl<S: KeyValueStore> RecipientStore<S> {
    /// Load both collections without seeding.
    pub fn new(backend: S) -> Result<Self> {
        let recipients = load_collection(&backend, RECIPIENTS_KEY)?;
        let history = load_collection(&backend, HISTORY_KEY)?;

        Ok(Self {
            backend,
            recipients,
            history,
        })
    }

    /// Load both collections, then seed whichever is empty.
    pub fn open(backend: S) -> Result<Self> {
        let mut store = Self::new(backend)?;
        store.seed_if_empty()?;
        Ok(store)
    }

    /// Write demonstration data into each collection whose persisted value is
    /// absent, unreadable or empty and which holds nothing unsaved in memory.
    /// The two collections are checked independently.
    pub fn seed_if_empty(&mut self) -> Result<SeedReport> {
        let now = Utc::now();
        let mut report = SeedReport::default();

        if self.recipients.is_empty()
            && persisted_is_empty::<_, AlertRecipient>(&self.backend, RECIPIENTS_KEY)?
        {
            self.recipients = seed::recipients(now);
            self.persist_recipients()?;
            report.recipients = true;
        }

        if self.history.is_empty()
            && persisted_is_empty::<_, AlertHistoryEntry>(&self.backend, HISTORY_KEY)?
        {
            self.history = seed::history(now);
            self.persist_history()?;
            report.history = true;
        }

        if report.recipients || report.history {
            info!(
                recipients = report.recipients,
                history = report.history,
                "Seeded demonstration alert data"
            );
        }

        Ok(report)
    }

    /// Recipients, newest first.
    pub fn load_recipients(&self) -> Vec<AlertRecipient> {
        let mut out = self.recipients.clone();
        out.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        out
    }

    /// Alert history, newest first.
    pub fn load_history(&self) -> Vec<AlertHistoryEntry> {
        let mut out = self.history.clone();
        out.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        out
    }

    pub fn get_recipient(&self, id: Uuid) -> Option<AlertRecipient> {
        self.recipients.iter().find(|r| r.id == id).cloned()
    }

    /// Active recipients whose threshold `severity` reaches, newest first.
    pub fn recipients_for(&self, severity: Severity) -> Vec<AlertRecipient> {
        self.load_recipients()
            .into_iter()
            .filter(|r| r.wants(severity))
            .collect()
    }

    pub fn summary(&self) -> StoreSummary {
        let mut summary = StoreSummary {
            total_recipients: self.recipients.len(),
            active_recipients: self.recipients.iter().filter(|r| r.is_active).count(),
            history_total: self.history.len(),
            ..StoreSummary::default()
        };
        for entry in &self.history {
            summary.history_by_severity.bump(entry.severity);
        }
        summary
    }

    pub fn add_recipient(&mut self, input: RecipientInput) -> Result<AlertRecipient> {
        let recipient = input.into_recipient(self.fresh_id(), Utc::now());
        validate(&recipient)?;

        debug!(id = %recipient.id, org = %recipient.organization_name, "Adding recipient");

        self.recipients.insert(0, recipient.clone());
        self.record_change("Recipient added", &recipient);

        self.persist_recipients()?;
        self.persist_history()?;
        Ok(recipient)
    }

    pub fn update_recipient(&mut self, id: Uuid, patch: RecipientPatch) -> Result<AlertRecipient> {
        let idx = self
            .recipients
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let mut updated = self.recipients[idx].clone();
        patch.apply_to(&mut updated);
        validate(&updated)?;

        debug!(id = %id, org = %updated.organization_name, "Updating recipient");

        self.recipients[idx] = updated.clone();
        self.record_change("Recipient updated", &updated);

        self.persist_recipients()?;
        self.persist_history()?;
        Ok(updated)
    }

    /// Remove a recipient. Unknown ids are a no-op. History is left alone.
    pub fn delete_recipient(&mut self, id: Uuid) -> Result<()> {
        let before = self.recipients.len();
        self.recipients.retain(|r| r.id != id);

        if self.recipients.len() == before {
            debug!(id = %id, "Delete ignored, recipient not present");
            return Ok(());
        }

        debug!(id = %id, "Deleted recipient");
        self.persist_recipients()
    }

    /// Toggle notifications for a recipient. Unknown ids are a no-op.
    pub fn set_active(&mut self, id: Uuid, is_active: bool) -> Result<()> {
        let Some(recipient) = self.recipients.iter_mut().find(|r| r.id == id) else {
            debug!(id = %id, "set_active ignored, recipient not present");
            return Ok(());
        };

        recipient.is_active = is_active;
        debug!(id = %id, is_active, "Set recipient active flag");
        self.persist_recipients()
    }

    /// Re-read both collections from the backend, dropping unsaved changes.
    pub fn reload(&mut self) -> Result<()> {
        self.recipients = load_collection(&self.backend, RECIPIENTS_KEY)?;
        self.history = load_collection(&self.backend, HISTORY_KEY)?;
        Ok(())
    }

    /// Persist both in-memory collections. Use after a `Storage` error once
    /// the backend is healthy again.
    pub fn flush(&self) -> Result<()> {
        self.persist_recipients()?;
        self.persist_history()
    }

    #[cfg(test)]
    fn backend(&self) -> &S {
        &self.backend
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.recipients.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    fn record_change(&mut self, action: &str, recipient: &AlertRecipient) {
        self.history.insert(
            0,
            AlertHistoryEntry {
                id: Uuid::new_v4(),
                created_date: Utc::now(),
                organization_name: recipient.organization_name.clone(),
                severity: recipient.alert_threshold,
                message: format!("{}: {}", action, recipient.organization_name),
                delivered: true,
            },
        );
    }

    fn persist_recipients(&self) -> Result<()> {
        save_collection(&self.backend, RECIPIENTS_KEY, &self.recipients)
    }

    fn persist_history(&self) -> Result<()> {
        save_collection(&self.backend, HISTORY_KEY, &self.history)
    }
}

fn validate(recipient: &AlertRecipient) -> Result<()> {
    if recipient.organization_name.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "organization_name",
        });
    }
    if recipient.phone_number.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "phone_number",
        });
    }
    Ok(())
}

/// `Ok(None)` when the key was never written.
fn read_collection<S, T>(backend: &S, key: &'static str) -> Result<Option<Vec<T>>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = backend
        .get(key)
        .map_err(|source| StoreError::Storage { key, source })?;

    match raw {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse { key, source }),
    }
}

/// Like `read_collection`, but absent and unparseable values both load as empty.
fn load_collection<S, T>(backend: &S, key: &'static str) -> Result<Vec<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match read_collection(backend, key) {
        Ok(items) => Ok(items.unwrap_or_default()),
        Err(StoreError::Parse { key, source }) => {
            warn!(key, error = %source, "Discarding unreadable collection");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn persisted_is_empty<S, T>(backend: &S, key: &'static str) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(load_collection::<S, T>(backend, key)?.is_empty())
}

fn save_collection<S, T>(backend: &S, key: &'static str, items: &[T]) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(items).map_err(|source| StoreError::Serialize { key, source })?;
    backend
        .set(key, &raw)
        .map_err(|source| StoreError::Storage { key, source })
}
