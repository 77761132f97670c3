mod bootstrap;
mod server;

pub use bootstrap::*;
pub use server::*;
