use crate::domain_model::UserId;
use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log: Log,
    pub store: Store,
    #[serde(default)]
    pub seed: Seed,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "mysql"
    pub dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    8
}

/// Users created at startup when missing. Re-running with the same list is a no-op.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub user_id: UserId,
    pub username: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(text: &str) -> Result<Settings> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow!(e))
    }

    #[test]
    fn seed_section_is_optional() {
        let settings = from_toml(
            r#"
[log]
filter = "info"

[store]
backend = "memory"
"#,
        )
        .unwrap();
        assert!(settings.seed.users.is_empty());
        assert_eq!(settings.store.max_connections, 8);
        assert!(settings.store.dsn.is_none());
    }

    #[test]
    fn seed_users_parse() {
        let settings = from_toml(
            r#"
[log]
filter = "debug"

[store]
backend = "mysql"
dsn = "mysql://app:pw@localhost:3306/linguarium"

[[seed.users]]
user_id = "6f1c1f0e-3c2a-4a53-9a8e-2d4f0f4b9a11"
username = "alice"
"#,
        )
        .unwrap();
        assert_eq!(settings.seed.users.len(), 1);
        assert_eq!(settings.seed.users[0].username, "alice");
    }
}
