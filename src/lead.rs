//! Captured-lead types: the six intake fields, timestamp stamping, and the
//! restricted contact echo returned on rejection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A prospective customer's contact and problem description, captured by
/// the intake form. Missing fields deserialize to empty strings; the
/// normalizer never rejects a lead for incompleteness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub problem: String,
    pub goal: String,
    pub current_system: String,
}

/// The full lead plus the timestamp stamped at normalization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub timestamp: String,
}

/// Contact subset echoed on the invalid-input path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub timestamp: String,
}

impl Lead {
    /// Full six-field record with the given timestamp.
    pub fn stamped_at(&self, now: DateTime<Utc>) -> StampedLead {
        StampedLead {
            lead: self.clone(),
            timestamp: iso_millis(now),
        }
    }

    /// Name/email/phone only, for the rejection shape.
    pub fn contact_at(&self, now: DateTime<Utc>) -> ContactLead {
        ContactLead {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            timestamp: iso_millis(now),
        }
    }

    /// Anonymized id for logs. Leads are identified by a short hash of the
    /// email; raw contact details never reach the log output.
    pub fn anon_id(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.email.as_bytes());
        let digest = hasher.finalize();
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, matching what the
/// front end renders.
pub fn iso_millis(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
