//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub storage_path: PathBuf,
    pub max_payload_size: usize,
    /// Shared secret the mobile client encrypts credentials and tokens with.
    pub crypt_secret: Option<String>,
    /// Accept the built-in `admin`/`admin` login.
    pub super_admin_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            storage_path: PathBuf::from("accredit.db"),
            max_payload_size: 1024 * 1024,
            crypt_secret: None,
            super_admin_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml_dep::from_str(&content)?;
        Ok(config)
    }

    pub fn crypt_secret(&self) -> anyhow::Result<&str> {
        self.crypt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("crypt_secret must be set (config file or ACCREDIT_CRYPT_SECRET)")
            })
    }
}
