// Login configuration

use crate::{RecognizedPrincipalKinds, SubjectSource};
use portico_config::ConfigManager;
use portico_log::warn;
use portico_session::{DEFAULT_COOKIE_NAME, DEFAULT_SESSION_TIMEOUT};
use serde_json::Value;
use std::time::Duration;

const SESSION_TIMEOUT_KEYS: &[&str] = &["sessionTimeout", "session_timeout", "sessiontimeout"];
const KNOWN_PRINCIPALS_KEYS: &[&str] = &["knownPrincipals", "known_principals", "knownprincipals"];
const SESSION_COOKIE_KEYS: &[&str] = &["sessionCookie", "session_cookie", "sessioncookie"];
const SUBJECT_SOURCE_KEYS: &[&str] = &["subjectSource", "subject_source", "subjectsource"];

/// Settings of the login flow, read once at startup.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    /// Inactivity timeout given to every new session
    pub session_timeout: Duration,
    pub recognized_kinds: RecognizedPrincipalKinds,
    /// Cookie carrying the session id
    pub session_cookie: String,
    pub subject_source: SubjectSource,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            recognized_kinds: RecognizedPrincipalKinds::default(),
            session_cookie: DEFAULT_COOKIE_NAME.to_string(),
            subject_source: SubjectSource::Task,
        }
    }
}

impl LoginConfig {
    /// Read the login settings from a configuration source.
    ///
    /// Nothing here fails: bad or missing values fall back to defaults. The
    /// subject source follows the environment probe unless configured.
    pub fn from_config(config: &ConfigManager) -> Self {
        let session_timeout = parse_session_timeout(config.get_value_any(SESSION_TIMEOUT_KEYS).as_ref());

        let recognized_kinds = config
            .get_value_any(KNOWN_PRINCIPALS_KEYS)
            .map(|value| parse_known_principals(&value))
            .unwrap_or_default();

        let session_cookie = match config.get_value_any(SESSION_COOKIE_KEYS) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            Some(other) => {
                warn!("Ignoring invalid session cookie name {}", other);
                DEFAULT_COOKIE_NAME.to_string()
            }
            None => DEFAULT_COOKIE_NAME.to_string(),
        };

        let subject_source = match config.get_value_any(SUBJECT_SOURCE_KEYS) {
            Some(Value::String(raw)) => SubjectSource::parse(&raw).unwrap_or_else(|| {
                warn!("Unknown subject source '{}', probing environment", raw);
                SubjectSource::detect()
            }),
            _ => SubjectSource::detect(),
        };

        Self {
            session_timeout,
            recognized_kinds,
            session_cookie,
            subject_source,
        }
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_recognized_kinds(mut self, kinds: RecognizedPrincipalKinds) -> Self {
        self.recognized_kinds = kinds;
        self
    }

    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    pub fn with_subject_source(mut self, source: SubjectSource) -> Self {
        self.subject_source = source;
        self
    }
}

/// Interpret a configured session timeout in seconds.
///
/// Strings and integers are accepted. Absent, zero, negative and unparsable
/// values yield the 1800 second default.
pub fn parse_session_timeout(raw: Option<&Value>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_SESSION_TIMEOUT;
    };

    let seconds = match raw {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };

    match seconds {
        Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
        Some(0) => DEFAULT_SESSION_TIMEOUT,
        _ => {
            warn!(
                "Invalid session timeout {}, using default of {} sec.",
                raw,
                DEFAULT_SESSION_TIMEOUT.as_secs()
            );
            DEFAULT_SESSION_TIMEOUT
        }
    }
}

// comma separated string or JSON array of strings
fn parse_known_principals(value: &Value) -> RecognizedPrincipalKinds {
    let parsed = match value {
        Value::String(list) => RecognizedPrincipalKinds::parse(list),
        Value::Array(items) => {
            RecognizedPrincipalKinds::new(items.iter().filter_map(Value::as_str))
        }
        other => RecognizedPrincipalKinds::parse(&other.to_string()),
    };

    parsed.unwrap_or_else(|err| {
        warn!("{}, using default principal kinds", err);
        RecognizedPrincipalKinds::default()
    })
}
