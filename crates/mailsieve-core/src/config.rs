//! Mailbox connection settings.

use std::fmt;

use mailsieve_imap::IMAPS_PORT;

use crate::policy::DEFAULT_TRUSTED_DOMAINS;

/// A credential that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the cleartext. Only pass the result to the server.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True if the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Everything a [`MailboxClient`](crate::MailboxClient) needs to reach one
/// account.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    /// IMAP server host name.
    pub host: String,
    /// IMAP server port (implicit TLS).
    pub port: u16,
    /// Login name, usually the account's address.
    pub account: String,
    /// Login password.
    pub secret: Secret,
    /// Domain suffixes whose senders are always important.
    pub trusted_domains: Vec<String>,
}

impl MailboxConfig {
    /// Creates a config for port 993 with the default trusted domains.
    #[must_use]
    pub fn new(host: impl Into<String>, account: impl Into<String>, secret: Secret) -> Self {
        Self {
            host: host.into(),
            port: IMAPS_PORT,
            account: account.into(),
            secret,
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Overrides the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the trusted domain list.
    #[must_use]
    pub fn with_trusted_domains(mut self, domains: Vec<String>) -> Self {
        self.trusted_domains = domains;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted() {
        let secret = Secret::new("hunter2".to_string());
        assert_eq!(secret.to_string(), "<redacted>");
        assert!(!format!("{secret:?}").contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn config_debug_hides_secret() {
        let config = MailboxConfig::new("imap.example.com", "me@example.com", "hunter2".to_string().into());
        let debug = format!("{config:?}");
        assert!(debug.contains("imap.example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn defaults() {
        let config = MailboxConfig::new("h", "a", Secret::new(String::new()));
        assert_eq!(config.port, 993);
        assert_eq!(config.trusted_domains, vec!["example.com".to_string()]);
        let config = config.with_port(1993).with_trusted_domains(vec!["corp.test".into()]);
        assert_eq!(config.port, 1993);
        assert_eq!(config.trusted_domains, vec!["corp.test".to_string()]);
    }
}
