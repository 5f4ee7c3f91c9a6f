//! Client configuration: server entries and the on-disk JSON document
//!
//! The config file is a JSON document of the form
//! `{"servers": [{"url", "port", "user"?, "pass"?, "maxCons"?, "disable"?}], "reader": 0}`.
//! Server entries are immutable once loaded.

use crate::error::{NntpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One reachable NNTP server
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Server hostname (e.g., "news.example.com")
    pub url: String,

    /// Server port. 443 and 563 imply TLS.
    pub port: u16,

    /// Username for authentication, if the server requires it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password for authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,

    /// Maximum concurrent connections for fan-out operations (default 1)
    #[serde(rename = "maxCons", default, skip_serializing_if = "Option::is_none")]
    pub max_cons: Option<usize>,

    /// Skip this server entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
}

impl ServerEntry {
    /// Create an anonymous entry for a host/port pair
    pub fn new(url: impl Into<String>, port: u16) -> Self {
        Self {
            url: url.into(),
            port,
            user: None,
            pass: None,
            max_cons: None,
            disable: None,
        }
    }

    /// Create an entry with credentials
    pub fn with_credentials(
        url: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            port,
            user: Some(user.into()),
            pass: Some(pass.into()),
            max_cons: None,
            disable: None,
        }
    }

    /// Whether this entry's port implies an implicit-TLS connection
    #[must_use]
    pub fn is_secure_port(&self) -> bool {
        matches!(self.port, 443 | 563)
    }

    /// Whether this entry has been disabled in the config
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disable.unwrap_or(false)
    }
}

/// The full client configuration document
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// All configured servers
    pub servers: Vec<ServerEntry>,
    /// Index of the default reader server
    pub reader: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            servers: vec![
                ServerEntry::new("news.neodome.net", 119),
                ServerEntry::new("news.eternal-september.org", 443),
                ServerEntry::new("nntp.aioe.org", 119),
            ],
            reader: 0,
        }
    }
}

impl ClientConfig {
    /// Load the configuration from a JSON file
    ///
    /// If the file does not exist, the default configuration is written
    /// there first and then returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let cfg = Self::default();
            cfg.save(path)?;
            return Ok(cfg);
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the configuration as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The default reader entry
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Config`] if the reader index is out of range or
    /// points at a disabled server.
    pub fn reader_entry(&self) -> Result<&ServerEntry> {
        let entry = self
            .servers
            .get(self.reader)
            .ok_or_else(|| NntpError::Config(format!("reader index {} out of range", self.reader)))?;
        if entry.is_disabled() {
            return Err(NntpError::Config(format!(
                "reader server {} is disabled",
                entry.url
            )));
        }
        Ok(entry)
    }

    /// All entries that are not disabled
    pub fn active_servers(&self) -> impl Iterator<Item = &ServerEntry> {
        self.servers.iter().filter(|s| !s.is_disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_port_detection() {
        assert!(ServerEntry::new("a", 443).is_secure_port());
        assert!(ServerEntry::new("a", 563).is_secure_port());
        assert!(!ServerEntry::new("a", 119).is_secure_port());
        assert!(!ServerEntry::new("a", 8119).is_secure_port());
    }

    #[test]
    fn test_parse_config_json() {
        let text = r#"{
            "servers": [
                {"url": "news.example.com", "port": 563, "user": "u", "pass": "p", "maxCons": 4},
                {"url": "backup.example.com", "port": 119, "disable": true}
            ],
            "reader": 0
        }"#;
        let cfg: ClientConfig = serde_json::from_str(text).unwrap();
        assert_eq!(cfg.servers.len(), 2);
        assert_eq!(cfg.reader, 0);
        assert_eq!(cfg.servers[0].max_cons, Some(4));
        assert_eq!(cfg.servers[0].user.as_deref(), Some("u"));
        assert!(cfg.servers[1].is_disabled());
        assert_eq!(cfg.active_servers().count(), 1);
    }

    #[test]
    fn test_reader_entry() {
        let cfg = ClientConfig::default();
        let entry = cfg.reader_entry().unwrap();
        assert_eq!(entry.url, "news.neodome.net");

        let mut cfg = ClientConfig::default();
        cfg.reader = 99;
        assert!(cfg.reader_entry().is_err());
    }

    #[test]
    fn test_load_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("client.json");

        let cfg = ClientConfig::load(&path).unwrap();
        assert_eq!(cfg.servers.len(), 3);
        assert!(path.exists());

        // Second load reads the file that was just written
        let again = ClientConfig::load(&path).unwrap();
        assert_eq!(again.reader, cfg.reader);
        assert_eq!(again.servers[1].url, "news.eternal-september.org");
    }

    #[test]
    fn test_max_cons_key_round_trip() {
        let mut entry = ServerEntry::with_credentials("news.example.com", 563, "u", "p");
        entry.max_cons = Some(8);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"maxCons\":8"), "json was: {json}");
        let back: ServerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_cons, Some(8));
    }
}
