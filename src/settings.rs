//! Process configuration from the environment.

/// Environment variable naming the SQLite database file.
pub const DB_PATH_ENV: &str = "DB_PATH";
pub const DEFAULT_DB_PATH: &str = "./shopdb.sqlite";
/// Value of `DB_PATH` selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";
pub const LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_path: String,
}

impl Settings {
    /// Reads `DB_PATH`, falling back to `./shopdb.sqlite` when unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup(DB_PATH_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into());
        Settings { database_path }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY
    }
}
