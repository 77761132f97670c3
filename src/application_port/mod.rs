mod card_service;
mod friendship_service;
mod suggestion_service;

pub use card_service::*;
pub use friendship_service::*;
pub use suggestion_service::*;
