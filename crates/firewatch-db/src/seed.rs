use chrono::{DateTime, Duration, Utc};
use firewatch_types::{AlertHistoryEntry, AlertRecipient, Severity};
use uuid::Uuid;

struct SeedRecipient {
    organization_name: &'static str,
    contact_name: &'static str,
    phone_number: &'static str,
    email: &'static str,
    alert_threshold: Severity,
}

const RECIPIENTS: [SeedRecipient; 4] = [
    SeedRecipient {
        organization_name: "BC Wildfire Service",
        contact_name: "Director Sarah Chen",
        phone_number: "+1 (250) 387-1234",
        email: "alerts@gov.bc.ca",
        alert_threshold: Severity::High,
    },
    SeedRecipient {
        organization_name: "Alberta Wildfire",
        contact_name: "Chief Michael Thompson",
        phone_number: "+1 (780) 427-3473",
        email: "emergency@alberta.ca",
        alert_threshold: Severity::High,
    },
    SeedRecipient {
        organization_name: "Parks Canada Emergency",
        contact_name: "Regional Manager Kim Patel",
        phone_number: "+1 (888) 773-8888",
        email: "emergency@pc.gc.ca",
        alert_threshold: Severity::Extreme,
    },
    SeedRecipient {
        organization_name: "Ontario Ministry Natural Resources",
        contact_name: "Fire Centre Coordinator",
        phone_number: "+1 (807) 475-1471",
        email: "firewatch@ontario.ca",
        alert_threshold: Severity::Moderate,
    },
];

// (hours ago, organization, severity, message)
const HISTORY: [(i64, &str, Severity, &str); 3] = [
    (
        6,
        "BC Wildfire Service",
        Severity::Extreme,
        "EXTREME RISK: Okanagan Mountain Park, BC — elevated fire danger. Risk score: 91.",
    ),
    (
        4,
        "Alberta Wildfire",
        Severity::High,
        "HIGH RISK: Wood Buffalo National Park, AB — elevated conditions. Risk score: 76.",
    ),
    (
        2,
        "Parks Canada Emergency",
        Severity::High,
        "HIGH RISK: Greater Vancouver Area, BC — dry + wind. Risk score: 68.",
    ),
];

/// Demonstration recipients, all active and created at `now`.
pub fn recipients(now: DateTime<Utc>) -> Vec<AlertRecipient> {
    RECIPIENTS
        .iter()
        .map(|s| AlertRecipient {
            id: Uuid::new_v4(),
            organization_name: s.organization_name.to_string(),
            contact_name: Some(s.contact_name.to_string()),
            phone_number: s.phone_number.to_string(),
            email: Some(s.email.to_string()),
            alert_threshold: s.alert_threshold,
            is_active: true,
            created_date: now,
        })
        .collect()
}

/// Demonstration alert history, spread over the hours before `now`.
pub fn history(now: DateTime<Utc>) -> Vec<AlertHistoryEntry> {
    HISTORY
        .iter()
        .map(|(hours_ago, org, severity, message)| AlertHistoryEntry {
            id: Uuid::new_v4(),
            created_date: now - Duration::hours(*hours_ago),
            organization_name: org.to_string(),
            severity: *severity,
            message: message.to_string(),
            delivered: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_sets_have_fixed_sizes() {
        let now = Utc::now();
        assert_eq!(recipients(now).len(), 4);
        assert_eq!(history(now).len(), 3);
    }

    #[test]
    fn seeded_history_is_in_the_past() {
        let now = Utc::now();
        assert!(history(now).iter().all(|h| h.created_date < now && h.delivered));
    }
}
