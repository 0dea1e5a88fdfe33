//! Config file loading.
//!
//! ```toml
//! folder = "INBOX"
//! delete_limit = 200
//! trusted_domains = ["corp.example"]
//!
//! [imap]
//! host = "imap.example.com"
//! account = "me@example.com"
//! password_command = "pass show mail/imap"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use mailsieve_core::{DEFAULT_TRUSTED_DOMAINS, IMAPS_PORT, MailboxConfig, Secret};
use serde::Deserialize;

const APP_DIR: &str = "mailsieve";

/// Server and login settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImapSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub account: String,
    /// Shell command printing the password on its first line.
    pub password_command: Option<String>,
}

const fn default_port() -> u16 {
    IMAPS_PORT
}

/// Everything read from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub imap: Option<ImapSettings>,
    pub trusted_domains: Vec<String>,
    pub folder: String,
    /// Default for `delete --limit`. Zero makes `delete` a no-op unless `--all` is given.
    pub delete_limit: usize,
    pub database: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            imap: None,
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(ToString::to_string).collect(),
            folder: "INBOX".to_string(),
            delete_limit: 200,
            database: None,
        }
    }
}

impl Settings {
    /// Reads `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The `[imap]` section, required by commands that talk to the server.
    pub fn imap(&self) -> Result<&ImapSettings> {
        match &self.imap {
            Some(imap) => Ok(imap),
            None => bail!("no [imap] section in the config file"),
        }
    }

    /// Sender database location; its directory is created if needed.
    pub fn database_path(&self) -> Result<PathBuf> {
        let path = self.database.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("senders.db")
        });

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        Ok(path)
    }

    /// Builds the mailbox config with an already resolved password.
    pub fn mailbox_config(&self, secret: Secret) -> Result<MailboxConfig> {
        let imap = self.imap()?;
        Ok(MailboxConfig::new(&imap.host, &imap.account, secret)
            .with_port(imap.port)
            .with_trusted_domains(self.trusted_domains.clone()))
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.folder, "INBOX");
        assert_eq!(settings.delete_limit, 200);
        assert_eq!(settings.trusted_domains, vec!["example.com"]);
        assert!(settings.imap().is_err());
    }

    #[test]
    fn full_file() {
        let settings = Settings::parse(
            r#"
            folder = "Archive"
            delete_limit = 10
            trusted_domains = ["corp.test", "family.test"]
            database = "/tmp/senders.db"

            [imap]
            host = "imap.corp.test"
            port = 1993
            account = "me@corp.test"
            password_command = "pass show imap"
            "#,
        )
        .unwrap();

        assert_eq!(settings.folder, "Archive");
        assert_eq!(settings.delete_limit, 10);
        assert_eq!(settings.database, Some(PathBuf::from("/tmp/senders.db")));
        let imap = settings.imap().unwrap();
        assert_eq!(imap.port, 1993);
        assert_eq!(imap.password_command.as_deref(), Some("pass show imap"));

        let config = settings.mailbox_config(Secret::new("pw".into())).unwrap();
        assert_eq!(config.host, "imap.corp.test");
        assert_eq!(config.port, 1993);
        assert_eq!(config.trusted_domains, vec!["corp.test", "family.test"]);
    }

    #[test]
    fn port_defaults_to_imaps() {
        let settings = Settings::parse(
            r#"
            [imap]
            host = "h"
            account = "a"
            "#,
        )
        .unwrap();
        assert_eq!(settings.imap().unwrap().port, 993);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("delete_limt = 5").is_err());
        assert!(Settings::parse("[imap]\nhost = \"h\"\naccount = \"a\"\npassword = \"x\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("mailsieve-test-does-not-exist.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let path = std::env::temp_dir().join(format!("mailsieve-test-{}.toml", std::process::id()));
        std::fs::write(&path, "folder = \"Spam\"\n").unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.folder, "Spam");
    }
}
