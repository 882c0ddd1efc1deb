// Username selection from a subject's principals

use crate::{LoginError, Principal, Result, Subject};
use portico_log::debug;

/// Principal kinds recognized by default, highest priority first.
pub const DEFAULT_RECOGNIZED_KINDS: [&str; 4] = [
    "UserPrincipal",
    "KeycloakPrincipal",
    "JAASPrincipal",
    "SimplePrincipal",
];

/// Ordered allow-list of principal kind tags that may supply the username.
///
/// Matching is exact and case-sensitive against [`PrincipalKind::tag`].
/// Position is priority: when several principals match, the one whose tag
/// comes first here wins.
///
/// [`PrincipalKind::tag`]: crate::PrincipalKind::tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedPrincipalKinds {
    tags: Vec<String>,
}

impl RecognizedPrincipalKinds {
    /// Build from tags in priority order. Blank tags are dropped and
    /// repeated tags keep their first position; the result must be non-empty.
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !unique.iter().any(|t| t == tag) {
                unique.push(tag.to_string());
            }
        }

        if unique.is_empty() {
            return Err(LoginError::InvalidConfig(
                "recognized principal kinds cannot be empty".to_string(),
            ));
        }

        Ok(Self { tags: unique })
    }

    /// Parse a comma separated list, e.g. `"UserPrincipal, SimplePrincipal"`.
    pub fn parse(list: &str) -> Result<Self> {
        Self::new(list.split(','))
    }

    /// Position of a tag in the list, lower is stronger.
    pub fn priority(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.priority(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for RecognizedPrincipalKinds {
    fn default() -> Self {
        Self {
            tags: DEFAULT_RECOGNIZED_KINDS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Pick the principal that names the user.
///
/// The winner is the principal whose kind ranks highest in `kinds`; among
/// principals of that same kind the first one added to the subject wins.
pub fn username_principal<'a>(
    subject: &'a Subject,
    kinds: &RecognizedPrincipalKinds,
) -> Option<&'a Principal> {
    let mut best: Option<(usize, &Principal)> = None;

    for principal in subject.principals() {
        let Some(rank) = kinds.priority(principal.kind.tag()) else {
            continue;
        };
        if best.is_none_or(|(best_rank, _)| rank < best_rank) {
            best = Some((rank, principal));
        }
    }

    best.map(|(_, principal)| principal)
}

/// Derive the display username, `None` when no principal is recognized.
pub fn username_from_subject(
    subject: &Subject,
    kinds: &RecognizedPrincipalKinds,
) -> Option<String> {
    let username = username_principal(subject, kinds).map(|p| p.name.clone());
    match username {
        Some(ref name) => debug!("Authorizing user {}", name),
        None => debug!("No recognized principal among {}", subject.principals().len()),
    }
    username
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrincipalKind;

    #[test]
    fn test_default_kinds() {
        let kinds = RecognizedPrincipalKinds::default();
        assert_eq!(kinds.len(), 4);
        assert_eq!(kinds.priority("UserPrincipal"), Some(0));
        assert_eq!(kinds.priority("SimplePrincipal"), Some(3));
        assert!(!kinds.contains("simpleprincipal"));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(RecognizedPrincipalKinds::new(Vec::<String>::new()).is_err());
        assert!(RecognizedPrincipalKinds::parse(" , ,").is_err());
    }

    #[test]
    fn test_parse_trims_and_dedups() {
        let kinds = RecognizedPrincipalKinds::parse("SsoPrincipal, UserPrincipal,SsoPrincipal").unwrap();
        assert_eq!(kinds.iter().collect::<Vec<_>>(), vec!["SsoPrincipal", "UserPrincipal"]);
    }

    #[test]
    fn test_unrecognized_kinds_are_skipped() {
        let subject = Subject::new()
            .with_principal(Principal::new("OtherKind", "x"))
            .with_principal(Principal::simple("alice"));

        assert_eq!(
            username_from_subject(&subject, &RecognizedPrincipalKinds::default()).as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn test_allow_list_priority_decides_between_matches() {
        let kinds = RecognizedPrincipalKinds::default();
        let forward = Subject::new()
            .with_principal(Principal::simple("alice"))
            .with_principal(Principal::new(PrincipalKind::Jaas, "bob"));
        let reverse = Subject::new()
            .with_principal(Principal::new(PrincipalKind::Jaas, "bob"))
            .with_principal(Principal::simple("alice"));

        assert_eq!(username_from_subject(&forward, &kinds).as_deref(), Some("bob"));
        assert_eq!(username_from_subject(&reverse, &kinds).as_deref(), Some("bob"));
    }

    #[test]
    fn test_same_kind_first_added_wins() {
        let subject = Subject::new()
            .with_principal(Principal::user("first"))
            .with_principal(Principal::user("second"));

        assert_eq!(
            username_from_subject(&subject, &RecognizedPrincipalKinds::default()).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_no_recognized_principal() {
        let subject = Subject::new().with_principal(Principal::new("GroupPrincipal", "admins"));
        assert_eq!(
            username_from_subject(&subject, &RecognizedPrincipalKinds::default()),
            None
        );
        assert_eq!(username_from_subject(&Subject::new(), &RecognizedPrincipalKinds::default()), None);
    }

    #[test]
    fn test_custom_allow_list_matches_qualified_custom_kind() {
        let kinds = RecognizedPrincipalKinds::parse("SsoPrincipal").unwrap();
        let subject = Subject::new()
            .with_principal(Principal::user("container-user"))
            .with_principal(Principal::new("com.acme.SsoPrincipal", "sso-user"));

        assert_eq!(username_from_subject(&subject, &kinds).as_deref(), Some("sso-user"));
    }
}
