use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending connection request. At most one row exists per `(from_user,
/// to_user)`; accept, reject and cancel all remove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub from_user: UserId,
    pub to_user: UserId,
    pub message: String,
    pub created: DateTime<Utc>,
    pub rejected: Option<DateTime<Utc>>,
    pub viewed: Option<DateTime<Utc>>,
}

impl ConnectionRequest {
    pub fn new(from_user: UserId, to_user: UserId, message: String, created: DateTime<Utc>) -> Self {
        Self {
            from_user,
            to_user,
            message,
            created,
            rejected: None,
            viewed: None,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.viewed.is_none()
    }
}

/// Selection over the requests received by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFilter {
    All,
    Unread,
    Read,
    Rejected,
    Unrejected,
}

impl RequestFilter {
    pub fn matches(&self, request: &ConnectionRequest) -> bool {
        match self {
            RequestFilter::All => true,
            RequestFilter::Unread => request.viewed.is_none(),
            RequestFilter::Read => request.viewed.is_some(),
            RequestFilter::Rejected => request.rejected.is_some(),
            RequestFilter::Unrejected => request.rejected.is_none(),
        }
    }
}
