use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    pub fn new() -> Self {
        UserId(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(UserId)
    }
}

/// Unordered pair of users, stored as `(low, high)`.
///
/// Every relationship row is keyed by this canonical form, so `(a, b)` and
/// `(b, a)` always address the same record.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct UserPair(UserId, UserId);

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    pub fn low(&self) -> UserId {
        self.0
    }

    pub fn high(&self) -> UserId {
        self.1
    }

    /// The member of the pair that is not `user`. Returns `None` for outsiders.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.0 {
            Some(self.1)
        } else if user == self.1 {
            Some(self.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub friend_requests_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(UserPair::new(a, b), UserPair::new(b, a));
        assert!(UserPair::new(a, b).low() < UserPair::new(a, b).high());
    }

    #[test]
    fn pair_other_side() {
        let a = UserId::new();
        let b = UserId::new();
        let pair = UserPair::new(a, b);
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(b), Some(a));
        assert_eq!(pair.other(UserId::new()), None);
    }
}
