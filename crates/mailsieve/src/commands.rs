//! Subcommand implementations. Each prints a one-line summary on stdout
//! and returns whether it succeeded.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use mailsieve_core::credentials;
use mailsieve_core::{DeletionScope, Importance, MailboxClient, SenderRepository};
use tracing::debug;

use crate::settings::Settings;

async fn open_store(settings: &Settings) -> Result<SenderRepository> {
    let path = settings.database_path()?;
    debug!(path = %path.display(), "opening sender database");
    let Some(path) = path.to_str() else {
        bail!("database path {} is not valid UTF-8", path.display());
    };
    SenderRepository::new(path)
        .await
        .with_context(|| format!("opening sender database {path}"))
}

fn mailbox_client(settings: &Settings) -> Result<MailboxClient> {
    let imap = settings.imap()?;
    let secret = credentials::resolve_secret(&imap.account, imap.password_command.as_deref())?;
    settings.mailbox_config(secret).map(MailboxClient::new)
}

pub async fn categorize(
    settings: &Settings,
    folder: Option<String>,
    trusted: &[String],
) -> Result<bool> {
    let store = open_store(settings).await?;
    let mut client = mailbox_client(settings)?;
    let folder = folder.unwrap_or_else(|| settings.folder.clone());
    let trusted = (!trusted.is_empty()).then_some(trusted);

    let report = client.categorize_senders(&folder, trusted, &store).await;
    println!("{report}");
    Ok(report.is_success())
}

pub async fn delete(
    settings: &Settings,
    folder: Option<String>,
    limit: Option<usize>,
    all: bool,
) -> Result<bool> {
    let store = open_store(settings).await?;
    let mut client = mailbox_client(settings)?;
    let folder = folder.unwrap_or_else(|| settings.folder.clone());
    let scope = if all {
        DeletionScope::All
    } else {
        DeletionScope::most_recent(limit.unwrap_or(settings.delete_limit))
    };

    let mut stdout = io::stdout();
    let report = client
        .delete_unimportant(&folder, scope, &store, &mut |count| {
            let _ = write!(stdout, "\rDeleted emails: {count}");
            let _ = stdout.flush();
        })
        .await;

    if report.stats.flagged > 0 {
        println!();
    }
    println!("Time taken: {:.2} seconds", report.elapsed.as_secs_f64());
    println!("{report}");
    Ok(report.is_success())
}

pub async fn mark(settings: &Settings, address: &str, status: Importance) -> Result<bool> {
    let store = open_store(settings).await?;
    let (_, created) = store.set_importance(address, status.is_important()).await?;

    if created {
        println!("New sender {address} created and marked as {status}");
    } else {
        println!("Sender {address} updated and marked as {status}");
    }
    Ok(true)
}

pub async fn mark_bulk(settings: &Settings, addresses: &[String], status: Importance) -> Result<bool> {
    let store = open_store(settings).await?;
    let count = store.mark_bulk(addresses, status.is_important()).await?;
    println!("Marked {count} senders as {status}");
    Ok(true)
}

pub async fn purge(settings: &Settings) -> Result<bool> {
    let store = open_store(settings).await?;
    let removed = store.delete_where(false).await?;

    if removed == 0 {
        println!("No unimportant senders found");
    } else {
        println!("Deleted {removed} unimportant senders");
    }
    Ok(true)
}

pub async fn senders(settings: &Settings, important: Option<bool>) -> Result<bool> {
    let store = open_store(settings).await?;
    let records = store.list(important).await?;

    for record in &records {
        println!("{}\t{}\t{}", record.email, record.importance(), record.updated_at);
    }
    println!("{} senders", records.len());
    Ok(true)
}

pub fn password_set(settings: &Settings) -> Result<bool> {
    let account = &settings.imap()?.account;
    eprintln!("Password for {account} (read from standard input):");

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("empty password");
    }

    credentials::store_password(account, password)?;
    println!("Password for {account} stored in the system keyring");
    Ok(true)
}

pub fn password_clear(settings: &Settings) -> Result<bool> {
    let account = &settings.imap()?.account;
    if credentials::delete_password(account)? {
        println!("Password for {account} removed from the system keyring");
    } else {
        println!("No stored password for {account}");
    }
    Ok(true)
}
