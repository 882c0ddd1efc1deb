// Authenticated subjects: principals plus public credentials

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace used in the qualified type name of built-in principal kinds.
pub const PRINCIPAL_NAMESPACE: &str = "portico_auth::principal";

/// What produced a principal.
///
/// Built-in kinds cover the usual container and SSO realms; anything else is
/// carried as `Custom` with the name the upstream authenticator gave it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrincipalKind {
    /// Container user principal
    User,
    /// Keycloak SSO principal
    Keycloak,
    /// JAAS login module principal
    Jaas,
    /// Plain named principal
    Simple,
    /// Any other kind, by (possibly qualified) name
    Custom(String),
}

impl PrincipalKind {
    /// Short tag matched against the recognized-kinds allow-list.
    ///
    /// For custom kinds this is the last path segment, so
    /// `com.acme.SsoPrincipal` and `acme::SsoPrincipal` both yield
    /// `SsoPrincipal`.
    pub fn tag(&self) -> &str {
        match self {
            PrincipalKind::User => "UserPrincipal",
            PrincipalKind::Keycloak => "KeycloakPrincipal",
            PrincipalKind::Jaas => "JAASPrincipal",
            PrincipalKind::Simple => "SimplePrincipal",
            PrincipalKind::Custom(name) => name
                .rsplit(['.', ':'])
                .next()
                .unwrap_or(name),
        }
    }

    /// Fully qualified type identifier, as reported to clients.
    pub fn qualified_name(&self) -> String {
        match self {
            PrincipalKind::Custom(name) => name.clone(),
            builtin => format!("{}::{}", PRINCIPAL_NAMESPACE, builtin.tag()),
        }
    }
}

impl From<String> for PrincipalKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UserPrincipal" => PrincipalKind::User,
            "KeycloakPrincipal" => PrincipalKind::Keycloak,
            "JAASPrincipal" => PrincipalKind::Jaas,
            "SimplePrincipal" => PrincipalKind::Simple,
            _ => PrincipalKind::Custom(value),
        }
    }
}

impl From<&str> for PrincipalKind {
    fn from(value: &str) -> Self {
        PrincipalKind::from(value.to_string())
    }
}

impl From<PrincipalKind> for String {
    fn from(kind: PrincipalKind) -> Self {
        match kind {
            PrincipalKind::Custom(name) => name,
            builtin => builtin.tag().to_string(),
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A named identity claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub kind: PrincipalKind,
    pub name: String,
}

impl Principal {
    pub fn new(kind: impl Into<PrincipalKind>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(PrincipalKind::User, name)
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(PrincipalKind::Simple, name)
    }
}

/// A public credential with an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Type identifier of the credential
    pub kind: String,
    pub payload: serde_json::Value,
}

impl Credential {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// The outcome of a completed authentication.
///
/// Principals and credentials have set semantics: adding an equal entry a
/// second time is a no-op. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    principals: Vec<Principal>,
    #[serde(default)]
    public_credentials: Vec<Credential>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.add_principal(principal);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.add_credential(credential);
        self
    }

    /// Returns false if an equal principal was already present.
    pub fn add_principal(&mut self, principal: Principal) -> bool {
        if self.principals.contains(&principal) {
            return false;
        }
        self.principals.push(principal);
        true
    }

    /// Returns false if an equal credential was already present.
    pub fn add_credential(&mut self, credential: Credential) -> bool {
        if self.public_credentials.contains(&credential) {
            return false;
        }
        self.public_credentials.push(credential);
        true
    }

    pub fn principals(&self) -> &[Principal] {
        &self.principals
    }

    pub fn public_credentials(&self) -> &[Credential] {
        &self.public_credentials
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty() && self.public_credentials.is_empty()
    }
}
