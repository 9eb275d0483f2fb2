use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One direction of a connection. Acceptance always writes the pair
/// `(a -> b)` and `(b -> a)`.
///
/// `connections(to_user)` lists the `from_user` of every edge owned by
/// `to_user`. The supplier / costumer flags describe `to_user` from the point
/// of view of `from_user` and live on the edge, not on the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub from_user: UserId,
    pub to_user: UserId,
    pub is_supplier: bool,
    pub is_costumer: bool,
    pub created: DateTime<Utc>,
}

impl ConnectionEdge {
    pub fn new(from_user: UserId, to_user: UserId, created: DateTime<Utc>) -> Self {
        Self {
            from_user,
            to_user,
            is_supplier: false,
            is_costumer: false,
            created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower: UserId,
    pub followee: UserId,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEdge {
    pub blocker: UserId,
    pub blocked: UserId,
    pub created: DateTime<Utc>,
}

/// Which flag of a connection edge an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerRole {
    Supplier,
    Costumer,
}

impl std::str::FromStr for PartnerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supplier" => Ok(PartnerRole::Supplier),
            "costumer" => Ok(PartnerRole::Costumer),
            other => Err(format!("unknown partner role: {other}")),
        }
    }
}
