use crate::domain_model::{FriendshipStatus, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Keyset cursor for friend listings: `(since DESC, other_user DESC)`.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct FriendCursor {
    pub since: DateTime<Utc>,
    pub other_user: UserId, // tiebreaker
}

impl FriendCursor {
    /// Whether a row sorted at `(since, other_user)` comes strictly after this cursor.
    pub fn precedes(&self, since: DateTime<Utc>, other_user: UserId) -> bool {
        since < self.since || (since == self.since && other_user < self.other_user)
    }
}

impl fmt::Display for FriendCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.since.to_rfc3339(), self.other_user)
    }
}

impl FromStr for FriendCursor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date_str, user_str) = s.split_once('~').ok_or("invalid cursor format")?;

        let since = date_str
            .parse::<DateTime<Utc>>()
            .map_err(|e| e.to_string())?;

        let other_user = uuid::Uuid::parse_str(user_str)
            .map(UserId)
            .map_err(|e| e.to_string())?;

        Ok(FriendCursor { since, other_user })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendSummary {
    pub user_id: UserId,
    pub username: String,
    pub status: FriendshipStatus,
    /// True when the listed user sent the original request.
    pub is_requester: bool,
    pub since: DateTime<Utc>,
}

impl FriendSummary {
    pub fn cursor(&self) -> FriendCursor {
        FriendCursor {
            since: self.since,
            other_user: self.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_parses_its_own_display() {
        let cursor = FriendCursor {
            since: "2024-05-01T10:00:00Z".parse().unwrap(),
            other_user: UserId::new(),
        };
        assert_eq!(cursor.to_string().parse::<FriendCursor>().unwrap(), cursor);
    }

    #[test]
    fn cursor_rejects_missing_separator() {
        assert!("2024-05-01T10:00:00Z".parse::<FriendCursor>().is_err());
    }
}
