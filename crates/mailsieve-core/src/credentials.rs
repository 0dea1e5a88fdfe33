//! Locating the IMAP password.
//!
//! Sources, first match wins:
//! 1. the `MAILSIEVE_PASSWORD` environment variable
//! 2. the output of a configured password command
//! 3. the platform keyring (Secret Service, Keychain, Credential Manager)

use std::process::Command;

use keyring::Entry;
use tracing::debug;

use crate::config::Secret;

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "mailsieve";

/// Environment variable checked before any other source.
pub const PASSWORD_ENV: &str = "MAILSIEVE_PASSWORD";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// The password command failed.
    #[error("Password command `{command}` failed: {reason}")]
    Command {
        /// The command as configured.
        command: String,
        /// Exit status or spawn error.
        reason: String,
    },

    /// No source produced a password.
    #[error("No password found for {0}; set MAILSIEVE_PASSWORD, configure password_command or run `mailsieve password set`")]
    Missing(String),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

fn entry(account: &str) -> CredentialResult<Entry> {
    Ok(Entry::new(SERVICE_NAME, &format!("{SERVICE_NAME}_imap_{account}"))?)
}

/// Stores the IMAP password for `account` in the keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn store_password(account: &str, password: &str) -> CredentialResult<()> {
    entry(account)?.set_password(password)?;
    debug!(account, "stored IMAP password in keyring");
    Ok(())
}

/// Reads the IMAP password for `account` from the keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails. A missing entry is
/// `Ok(None)`.
pub fn get_password(account: &str) -> CredentialResult<Option<Secret>> {
    match entry(account)?.get_password() {
        Ok(password) => Ok(Some(Secret::new(password))),
        Err(keyring::Error::NoEntry) => {
            debug!(account, "no IMAP password in keyring");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Removes the keyring entry for `account`. Returns false if there was none.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn delete_password(account: &str) -> CredentialResult<bool> {
    match entry(account)?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Resolves the password for `account` from the environment, the password
/// command or the keyring, in that order.
///
/// # Errors
///
/// Returns [`CredentialError::Missing`] if no source has a password, or the
/// error of the first source that failed.
pub fn resolve_secret(account: &str, password_command: Option<&str>) -> CredentialResult<Secret> {
    resolve_from(std::env::var(PASSWORD_ENV).ok(), account, password_command, get_password)
}

fn resolve_from(
    env_value: Option<String>,
    account: &str,
    password_command: Option<&str>,
    keyring: impl FnOnce(&str) -> CredentialResult<Option<Secret>>,
) -> CredentialResult<Secret> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        debug!("using password from {PASSWORD_ENV}");
        return Ok(Secret::new(value));
    }

    if let Some(command) = password_command {
        debug!("using password from password_command");
        return run_password_command(command);
    }

    keyring(account)?.ok_or_else(|| CredentialError::Missing(account.to_string()))
}

/// Runs `command` through the shell and returns its first output line.
fn run_password_command(command: &str) -> CredentialResult<Secret> {
    let failed = |reason: String| CredentialError::Command {
        command: command.to_string(),
        reason,
    };

    let output = shell(command).output().map_err(|e| failed(e.to_string()))?;
    if !output.status.success() {
        return Err(failed(output.status.to_string()));
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))?;
    let password = stdout.lines().next().unwrap_or_default().to_string();
    if password.is_empty() {
        return Err(failed("empty output".to_string()));
    }
    Ok(Secret::new(password))
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
