use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{AlertRecipient, Severity};

// -- Recipients --

/// Fields supplied when creating a recipient. `id` and `created_date`
/// are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientInput {
    pub organization_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub alert_threshold: Severity,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl RecipientInput {
    pub fn new(
        organization_name: impl Into<String>,
        phone_number: impl Into<String>,
        alert_threshold: Severity,
    ) -> Self {
        Self {
            organization_name: organization_name.into(),
            contact_name: None,
            phone_number: phone_number.into(),
            email: None,
            alert_threshold,
            is_active: None,
        }
    }

    pub fn into_recipient(self, id: Uuid, created_date: DateTime<Utc>) -> AlertRecipient {
        AlertRecipient {
            id,
            organization_name: self.organization_name,
            contact_name: optional_text(self.contact_name),
            phone_number: self.phone_number,
            email: optional_text(self.email),
            alert_threshold: self.alert_threshold,
            is_active: self.is_active.unwrap_or(true),
            created_date,
        }
    }
}

/// Partial update. Absent fields keep their current value; a blank
/// `contact_name` or `email` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientPatch {
    pub organization_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub alert_threshold: Option<Severity>,
    pub is_active: Option<bool>,
}

impl RecipientPatch {
    /// Merge onto `recipient`. Never touches `id` or `created_date`.
    pub fn apply_to(self, recipient: &mut AlertRecipient) {
        if let Some(name) = self.organization_name {
            recipient.organization_name = name;
        }
        if let Some(contact) = self.contact_name {
            recipient.contact_name = optional_text(Some(contact));
        }
        if let Some(phone) = self.phone_number {
            recipient.phone_number = phone;
        }
        if let Some(email) = self.email {
            recipient.email = optional_text(Some(email));
        }
        if let Some(threshold) = self.alert_threshold {
            recipient.alert_threshold = threshold;
        }
        if let Some(active) = self.is_active {
            recipient.is_active = active;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_match_the_form() {
        let input: RecipientInput = serde_json::from_str(
            r#"{"organization_name": "X", "phone_number": "555", "contact_name": "  "}"#,
        )
        .unwrap();
        assert_eq!(input.alert_threshold, Severity::High);

        let r = input.into_recipient(Uuid::new_v4(), Utc::now());
        assert!(r.is_active);
        assert_eq!(r.contact_name, None);
    }

    #[test]
    fn input_rejects_client_assigned_id() {
        let res = serde_json::from_str::<RecipientInput>(
            r#"{"id": "abc", "organization_name": "X", "phone_number": "555"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut r = RecipientInput {
            email: Some("alerts@gov.bc.ca".into()),
            ..RecipientInput::new("BC Wildfire Service", "+1 (250) 387-1234", Severity::High)
        }
        .into_recipient(Uuid::new_v4(), Utc::now());
        let before = r.clone();

        let patch: RecipientPatch =
            serde_json::from_str(r#"{"organization_name": "Y", "email": ""}"#).unwrap();
        patch.apply_to(&mut r);

        assert_eq!(r.organization_name, "Y");
        assert_eq!(r.email, None);
        assert_eq!(r.id, before.id);
        assert_eq!(r.created_date, before.created_date);
        assert_eq!(r.phone_number, before.phone_number);
        assert_eq!(r.alert_threshold, before.alert_threshold);
    }
}
