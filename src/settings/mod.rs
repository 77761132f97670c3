//! Settings are read once at startup from a TOML file chosen by build profile
//! or `--settings`.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
