//! Typed registry of per-user cache entries.
//!
//! Every cached read path has a [`CacheKind`]. A kind owns a key prefix that is
//! unique across kinds, so two kinds never collide for the same user, and a
//! set of kinds that must be dropped together when its data changes.

use crate::domain_model::UserId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Connections,
    Followers,
    Following,
    Blocks,
    Blocked,
    Blocking,
    Requests,
    SentRequests,
    UnreadRequests,
    UnreadRequestCount,
    ReadRequests,
    RejectedRequests,
    UnrejectedRequests,
    UnrejectedRequestCount,
}

impl CacheKind {
    pub const ALL: [CacheKind; 14] = [
        CacheKind::Connections,
        CacheKind::Followers,
        CacheKind::Following,
        CacheKind::Blocks,
        CacheKind::Blocked,
        CacheKind::Blocking,
        CacheKind::Requests,
        CacheKind::SentRequests,
        CacheKind::UnreadRequests,
        CacheKind::UnreadRequestCount,
        CacheKind::ReadRequests,
        CacheKind::RejectedRequests,
        CacheKind::UnrejectedRequests,
        CacheKind::UnrejectedRequestCount,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            CacheKind::Connections => "c",
            CacheKind::Followers => "fo",
            CacheKind::Following => "fl",
            CacheKind::Blocks => "b",
            CacheKind::Blocked => "bo",
            CacheKind::Blocking => "bd",
            CacheKind::Requests => "cr",
            CacheKind::SentRequests => "scr",
            CacheKind::UnreadRequests => "cru",
            CacheKind::UnreadRequestCount => "cruc",
            CacheKind::ReadRequests => "crr",
            CacheKind::RejectedRequests => "crj",
            CacheKind::UnrejectedRequests => "crur",
            CacheKind::UnrejectedRequestCount => "crurc",
        }
    }

    /// Kinds dropped together with `self`. Always starts with `self`.
    pub fn bust_set(&self) -> &'static [CacheKind] {
        match self {
            CacheKind::Requests => &[
                CacheKind::Requests,
                CacheKind::UnreadRequests,
                CacheKind::UnreadRequestCount,
                CacheKind::ReadRequests,
                CacheKind::RejectedRequests,
                CacheKind::UnrejectedRequests,
                CacheKind::UnrejectedRequestCount,
            ],
            CacheKind::Connections => &[CacheKind::Connections],
            CacheKind::Followers => &[CacheKind::Followers],
            CacheKind::Following => &[CacheKind::Following],
            CacheKind::Blocks => &[CacheKind::Blocks],
            CacheKind::Blocked => &[CacheKind::Blocked],
            CacheKind::Blocking => &[CacheKind::Blocking],
            CacheKind::SentRequests => &[CacheKind::SentRequests],
            CacheKind::UnreadRequests => &[CacheKind::UnreadRequests],
            CacheKind::UnreadRequestCount => &[CacheKind::UnreadRequestCount],
            CacheKind::ReadRequests => &[CacheKind::ReadRequests],
            CacheKind::RejectedRequests => &[CacheKind::RejectedRequests],
            CacheKind::UnrejectedRequests => &[CacheKind::UnrejectedRequests],
            CacheKind::UnrejectedRequestCount => &[CacheKind::UnrejectedRequestCount],
        }
    }

    pub fn key(self, user: UserId) -> CacheKey {
        CacheKey { kind: self, user }
    }

    pub fn invalidation_keys(self, user: UserId) -> Vec<CacheKey> {
        self.bust_set().iter().map(|kind| kind.key(user)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: CacheKind,
    pub user: UserId,
}

/// Wire form used by cache adapters, e.g. `cr-<uuid>`.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_distinct() {
        let prefixes: HashSet<_> = CacheKind::ALL.iter().map(|k| k.prefix()).collect();
        assert_eq!(prefixes.len(), CacheKind::ALL.len());
    }

    #[test]
    fn keys_for_one_user_never_collide() {
        let user = UserId::new_random();
        let rendered: HashSet<_> = CacheKind::ALL
            .iter()
            .map(|k| k.key(user).to_string())
            .collect();
        assert_eq!(rendered.len(), CacheKind::ALL.len());
    }

    #[test]
    fn requests_drop_every_request_view() {
        let user = UserId::new_random();
        let keys = CacheKind::Requests.invalidation_keys(user);
        assert_eq!(keys.len(), 7);
        assert!(keys.contains(&CacheKind::UnreadRequestCount.key(user)));
        assert!(keys.contains(&CacheKind::UnrejectedRequests.key(user)));
        assert!(!keys.contains(&CacheKind::SentRequests.key(user)));
    }

    #[test]
    fn bust_set_starts_with_self() {
        for kind in CacheKind::ALL {
            assert_eq!(kind.bust_set()[0], kind);
        }
    }

    #[test]
    fn key_renders_prefix_and_user() {
        let user = UserId(uuid::Uuid::nil());
        assert_eq!(
            CacheKind::SentRequests.key(user).to_string(),
            "scr-00000000-0000-0000-0000-000000000000"
        );
    }
}
