// Identity payload returned by the login endpoint

use crate::Subject;
use serde::{Deserialize, Serialize};

/// One principal as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// One public credential as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub credential: serde_json::Value,
}

/// `{"principals": [...], "credentials": [...]}` for a subject.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub principals: Vec<PrincipalEntry>,
    pub credentials: Vec<CredentialEntry>,
}

impl IdentityResponse {
    /// Describe every principal and every public credential of `subject`,
    /// in the subject's order.
    pub fn from_subject(subject: &Subject) -> Self {
        let principals = subject
            .principals()
            .iter()
            .map(|principal| PrincipalEntry {
                kind: principal.kind.qualified_name(),
                name: principal.name.clone(),
            })
            .collect();

        let credentials = subject
            .public_credentials()
            .iter()
            .map(|credential| CredentialEntry {
                kind: credential.kind.clone(),
                credential: credential.payload.clone(),
            })
            .collect();

        Self {
            principals,
            credentials,
        }
    }

    /// Name of the first principal, for display.
    pub fn first_name(&self) -> Option<&str> {
        self.principals.first().map(|p| p.name.as_str())
    }
}
