use super::Parser;
use crate::domain_model::{FriendCursor, FriendshipAction, SuggestionId, UserId};
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "linguarium", about = "Administer friendships, cards and suggestions")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply migrations and seed users, then exit.
    Migrate,
    /// Apply a friendship action on behalf of `me`.
    Friendship {
        #[arg(value_enum)]
        action: FriendshipAction,
        #[arg(long)]
        me: UserId,
        #[arg(long)]
        other: UserId,
    },
    /// List a user's relationships, most recently changed first.
    Friends {
        user: UserId,
        #[arg(long, default_value_t = 50)]
        page_size: u16,
        #[arg(long)]
        after: Option<FriendCursor>,
    },
    /// List a user's cards, optionally filtered by entry.
    Cards {
        owner: UserId,
        #[arg(long)]
        search: Option<String>,
    },
    /// List the tags on a user's cards.
    Tags { owner: UserId },
    /// Move a user's cards from one tag to another.
    RenameTag {
        owner: UserId,
        from: String,
        to: String,
    },
    /// List suggestions waiting for a user.
    Suggestions { recipient: UserId },
    /// Accept a suggestion and print the id of the copied card.
    Accept {
        suggestion: SuggestionId,
        #[arg(long)]
        recipient: UserId,
    },
}
