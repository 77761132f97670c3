mod card_line_repo;
mod card_repo;
mod friendship_repo;
mod suggestion_repo;
mod tag_repo;
mod user_repo;

mod repo_tx;

pub use card_line_repo::*;
pub use card_repo::*;
pub use friendship_repo::*;
pub use suggestion_repo::*;
pub use tag_repo::*;
pub use user_repo::*;

pub use repo_tx::*;
