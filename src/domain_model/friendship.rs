use crate::domain_model::{UserId, UserPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of a relationship performed an action, relative to the stored roles.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Requester,
    Requestee,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FriendshipStatus {
    Pending,
    Friends,
    Blocked { by: PartyRole },
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Friends => "friends",
            FriendshipStatus::Blocked {
                by: PartyRole::Requester,
            } => "blocked_by_requester",
            FriendshipStatus::Blocked {
                by: PartyRole::Requestee,
            } => "blocked_by_requestee",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FriendshipStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "friends" => Ok(Self::Friends),
            "blocked_by_requester" => Ok(Self::Blocked {
                by: PartyRole::Requester,
            }),
            "blocked_by_requestee" => Ok(Self::Blocked {
                by: PartyRole::Requestee,
            }),
            _ => anyhow::bail!("unknown friendship status: {}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipAction {
    Request,
    Accept,
    Block,
    Cancel,
    Reject,
    Unfriend,
    Unblock,
}

/// A relationship row. At most one exists per [`UserPair`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Friendship {
    pub requester: UserId,
    pub requestee: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    pub fn new_request(requester: UserId, requestee: UserId, now: DateTime<Utc>) -> Self {
        Self {
            requester,
            requestee,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pair(&self) -> UserPair {
        UserPair::new(self.requester, self.requestee)
    }

    /// Which side of the row `user` is on. `None` for outsiders.
    pub fn role_of(&self, user: UserId) -> Option<PartyRole> {
        if user == self.requester {
            Some(PartyRole::Requester)
        } else if user == self.requestee {
            Some(PartyRole::Requestee)
        } else {
            None
        }
    }

    pub fn user_in_role(&self, role: PartyRole) -> UserId {
        match role {
            PartyRole::Requester => self.requester,
            PartyRole::Requestee => self.requestee,
        }
    }

    /// The user who blocked the other one, if the relationship is blocked.
    pub fn who_denies_friendship(&self) -> Option<UserId> {
        match self.status {
            FriendshipStatus::Blocked { by } => Some(self.user_in_role(by)),
            _ => None,
        }
    }

    /// The user on the receiving end of a block.
    pub fn blocked_party(&self) -> Option<UserId> {
        let blocker = self.who_denies_friendship()?;
        self.pair().other(blocker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: FriendshipStatus) -> (Friendship, UserId, UserId) {
        let a = UserId::new();
        let b = UserId::new();
        let mut f = Friendship::new_request(a, b, Utc::now());
        f.status = status;
        (f, a, b)
    }

    #[test]
    fn status_text_round_trips_every_variant() {
        for status in [
            FriendshipStatus::Pending,
            FriendshipStatus::Friends,
            FriendshipStatus::Blocked {
                by: PartyRole::Requester,
            },
            FriendshipStatus::Blocked {
                by: PartyRole::Requestee,
            },
        ] {
            assert_eq!(status.as_str().parse::<FriendshipStatus>().unwrap(), status);
        }
        assert!("blocked".parse::<FriendshipStatus>().is_err());
    }

    #[test]
    fn blocker_is_recovered_from_status() {
        let (f, a, b) = sample(FriendshipStatus::Blocked {
            by: PartyRole::Requester,
        });
        assert_eq!(f.who_denies_friendship(), Some(a));
        assert_eq!(f.blocked_party(), Some(b));

        let (f, a, b) = sample(FriendshipStatus::Blocked {
            by: PartyRole::Requestee,
        });
        assert_eq!(f.who_denies_friendship(), Some(b));
        assert_eq!(f.blocked_party(), Some(a));
    }

    #[test]
    fn nobody_denies_unblocked_relationships() {
        let (f, _, _) = sample(FriendshipStatus::Friends);
        assert_eq!(f.who_denies_friendship(), None);
        assert_eq!(f.blocked_party(), None);
    }

    #[test]
    fn role_of_names_each_side() {
        let (f, a, b) = sample(FriendshipStatus::Pending);
        assert_eq!(f.role_of(a), Some(PartyRole::Requester));
        assert_eq!(f.role_of(b), Some(PartyRole::Requestee));
        assert_eq!(f.role_of(UserId::new()), None);
    }
}
