//! # Access-Control Assessment
//!
//! Checks how the userinfo service guards its records: whether a user
//! record can be read without credentials or with forged ones, whether
//! neighbouring user ids can be harvested, whether the record carries a
//! role for access decisions, and whether fields that must be encrypted
//! come back in the clear.
//!
//! Every check is a read-only `GET`. A finding means the service is
//! weaker than it should be; transport failures are errors instead.

use std::fmt;

use piitag_schema::{PiiLevel, TagValidator};
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::client::{authorization, user_path, RecordClient};
use crate::error::ClientError;

/// Schema name of the service holding user records.
pub const USER_SERVICE: &str = "userinfo";

/// Credentials no correctly configured service should accept.
pub const FORGED_TOKENS: [&str; 3] = [
    "Bearer fake_jwt_token_12345",
    "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.fakepayload.fakesignature",
    "Invalid_Format_Token",
];

/// Record keys that count as a role for role-based access control.
pub const ROLE_FIELDS: [&str; 3] = ["role", "userRole", "userType"];

/// Number of user ids after the target that are tried for enumeration.
pub const DEFAULT_ENUMERATION_SPAN: u64 = 5;

const TOKEN_LABEL_LEN: usize = 30;

/// One access-control weakness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessFinding {
    /// The record was served without any credentials.
    UnauthenticatedAccess { user_id: u64 },
    /// The record was served for a forged `Authorization` header.
    ForgedTokenAccepted { token: String },
    /// Records of neighbouring user ids were served.
    SequentialEnumeration { user_ids: Vec<u64> },
    /// The record has none of the [`ROLE_FIELDS`].
    MissingRoleField,
    /// A field at or above the encryption threshold came back non-null.
    EncryptedFieldReturned { field: String },
}

impl fmt::Display for AccessFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnauthenticatedAccess { user_id } => {
                write!(f, "user {user_id} readable without authentication")
            }
            Self::ForgedTokenAccepted { token } => {
                write!(f, "forged Authorization header accepted: {token}")
            }
            Self::SequentialEnumeration { user_ids } => {
                let ids: Vec<String> = user_ids.iter().map(u64::to_string).collect();
                write!(f, "sequential user ids readable: {}", ids.join(", "))
            }
            Self::MissingRoleField => write!(
                f,
                "user record has no role field ({})",
                ROLE_FIELDS.join(", ")
            ),
            Self::EncryptedFieldReturned { field } => {
                write!(f, "field '{field}' must be encrypted but was returned")
            }
        }
    }
}

/// Outcome of [`assess_user_access`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessReport {
    /// User id the assessment targeted.
    pub user_id: u64,
    /// Weaknesses found, in check order.
    pub findings: Vec<AccessFinding>,
}

impl AccessReport {
    /// True iff no check found a weakness.
    pub fn is_secure(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for AccessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_secure() {
            return write!(f, "user {}: no access-control findings", self.user_id);
        }
        write!(f, "user {}: {} finding(s)", self.user_id, self.findings.len())?;
        for finding in &self.findings {
            write!(f, "\n  {finding}")?;
        }
        Ok(())
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn token_label(token: &str) -> String {
    if token.chars().count() > TOKEN_LABEL_LEN {
        let head: String = token.chars().take(TOKEN_LABEL_LEN).collect();
        format!("{head}...")
    } else {
        token.to_string()
    }
}

/// Run every access-control check against one user record.
///
/// `span` is the number of user ids after `user_id` tried for
/// enumeration. Record-content checks (role field, encrypted fields) only
/// run when the record is readable without credentials.
///
/// # Errors
///
/// Returns a [`ClientError`] for transport failures or when the readable
/// record is not a JSON object.
pub async fn assess_user_access(
    client: &RecordClient,
    validator: &TagValidator,
    user_id: u64,
    span: u64,
) -> Result<AccessReport, ClientError> {
    let path = user_path(user_id);
    let mut findings = Vec::new();

    let open = is_success(client.status_of(USER_SERVICE, &path, HeaderMap::new()).await?);
    if open {
        findings.push(AccessFinding::UnauthenticatedAccess { user_id });
    }

    for token in FORGED_TOKENS {
        let status = client
            .status_of(USER_SERVICE, &path, authorization(token)?)
            .await?;
        if is_success(status) {
            findings.push(AccessFinding::ForgedTokenAccepted {
                token: token_label(token),
            });
        }
    }

    let mut readable = Vec::new();
    for id in (user_id.saturating_add(1)..=user_id.saturating_add(span)) {
        let status = client
            .status_of(USER_SERVICE, &user_path(id), HeaderMap::new())
            .await?;
        if is_success(status) {
            readable.push(id);
        }
    }
    if !readable.is_empty() {
        findings.push(AccessFinding::SequentialEnumeration { user_ids: readable });
    }

    if open {
        let record = client.fetch_record(USER_SERVICE, &path).await?;
        if !ROLE_FIELDS.iter().any(|field| record.contains_key(*field)) {
            findings.push(AccessFinding::MissingRoleField);
        }
        let report = validator.check_record(USER_SERVICE, &record, PiiLevel::ENCRYPTION_THRESHOLD);
        findings.extend(
            report
                .exposed_encrypted
                .into_iter()
                .map(|field| AccessFinding::EncryptedFieldReturned { field }),
        );
    }

    tracing::info!(user_id, findings = findings.len(), "assessed user access");
    Ok(AccessReport { user_id, findings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_tokens_are_shortened() {
        assert_eq!(token_label("Invalid_Format_Token"), "Invalid_Format_Token");
        let label = token_label(FORGED_TOKENS[1]);
        assert_eq!(label, "Bearer eyJhbGciOiJIUzI1NiIsInR...");
    }

    #[test]
    fn report_display_lists_findings() {
        let report = AccessReport {
            user_id: 6,
            findings: vec![
                AccessFinding::UnauthenticatedAccess { user_id: 6 },
                AccessFinding::SequentialEnumeration { user_ids: vec![7, 8] },
                AccessFinding::MissingRoleField,
            ],
        };
        let text = report.to_string();
        assert!(text.starts_with("user 6: 3 finding(s)"));
        assert!(text.contains("sequential user ids readable: 7, 8"));
        assert!(text.contains("role, userRole, userType"));
        assert!(!report.is_secure());
    }

    #[test]
    fn findings_serialize_with_kind_tag() {
        let json = serde_json::to_value(AccessFinding::EncryptedFieldReturned {
            field: "userPassword".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "encrypted_field_returned");
        assert_eq!(json["field"], "userPassword");
    }

    #[test]
    fn secure_report_display() {
        let report = AccessReport { user_id: 1, findings: vec![] };
        assert!(report.is_secure());
        assert_eq!(report.to_string(), "user 1: no access-control findings");
    }
}
