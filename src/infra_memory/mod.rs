//! Process-local backend. Used by the test suite and by `store.backend = "memory"`.

mod card_line_repo_memory;
mod card_repo_memory;
mod friendship_repo_memory;
mod suggestion_repo_memory;
mod tag_repo_memory;
mod user_repo_memory;

pub use card_line_repo_memory::*;
pub use card_repo_memory::*;
pub use friendship_repo_memory::*;
pub use suggestion_repo_memory::*;
pub use tag_repo_memory::*;
pub use user_repo_memory::*;

mod store;

pub use store::*;
