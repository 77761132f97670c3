mod card;
mod friend;
mod friendship;
mod reconcile;
mod suggestion;
mod tag;
mod unit;
mod user;

pub use card::*;
pub use friend::*;
pub use friendship::*;
pub use reconcile::*;
pub use suggestion::*;
pub use tag::*;
pub use unit::*;
pub use user::*;
