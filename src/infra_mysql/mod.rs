mod card_line_repo_mysql;
mod card_repo_mysql;
mod friendship_repo_mysql;
mod suggestion_repo_mysql;
mod tag_repo_mysql;
mod user_repo_mysql;

pub use card_line_repo_mysql::*;
pub use card_repo_mysql::*;
pub use friendship_repo_mysql::*;
pub use suggestion_repo_mysql::*;
pub use tag_repo_mysql::*;
pub use user_repo_mysql::*;

mod migrate;
mod repo_tx_mysql;

pub use migrate::*;
pub use repo_tx_mysql::*;

mod util;
