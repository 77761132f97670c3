mod card_service_impl;
mod card_store;
mod friendship_service_impl;
mod suggestion_service_impl;

pub use card_service_impl::*;
pub use card_store::CardStore;
pub use friendship_service_impl::*;
pub use suggestion_service_impl::*;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision of a `DATETIME(6)` column.
pub(crate) fn db_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
