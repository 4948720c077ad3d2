//! One-shot subcommands, for scripting without the interactive menu.

use std::path::Path;

use anyhow::{bail, Context};
use fake_sms::{available_numbers, export_messages, filter, messages_for, Fetcher, RecordStore};

use crate::session::{print_messages, print_numbers, MATCH_ALL};

/// Print the numbers currently offered by the site.
pub async fn available(fetcher: &Fetcher, json: bool) -> anyhow::Result<()> {
    let numbers = available_numbers(fetcher)
        .await
        .context("Failed to load available numbers")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&numbers)?);
    } else if numbers.is_empty() {
        println!("No new numbers available right now");
    } else {
        for n in &numbers {
            println!("{n}");
        }
    }
    Ok(())
}

/// Print the registered numbers.
pub fn list(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let numbers = store.list().context("Failed to read registered numbers")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&numbers)?);
    } else {
        print_numbers(&numbers);
    }
    Ok(())
}

/// Register `number`, which must currently be offered on the listing page.
pub async fn register(
    fetcher: &Fetcher,
    store: &RecordStore,
    number: &str,
) -> anyhow::Result<()> {
    let numbers = available_numbers(fetcher)
        .await
        .context("Failed to load available numbers")?;
    let Some(chosen) = numbers.into_iter().find(|n| n.number == number) else {
        bail!("{number} is not offered on the listing page right now");
    };

    println!("Registering {chosen}");
    store.append(chosen).context("Failed to save the number")?;
    Ok(())
}

/// Remove the registered entry for `number`.
pub fn remove(store: &RecordStore, number: &str) -> anyhow::Result<()> {
    let removed = store
        .remove_number(number)
        .with_context(|| format!("Failed to remove {number}"))?;
    println!("Removed {removed}");
    Ok(())
}

/// Fetch, filter, print, and optionally export the messages of `number`.
pub async fn messages(
    fetcher: &Fetcher,
    number: &str,
    pattern: Option<&str>,
    export_dir: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let messages = messages_for(fetcher, number)
        .await
        .with_context(|| format!("Failed to fetch messages for {number}"))?;
    let messages = filter(pattern.unwrap_or(MATCH_ALL), &messages)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else {
        print_messages(&messages);
    }

    if let Some(dir) = export_dir {
        let path = export_messages(dir, number, &messages).context("Failed to export messages")?;
        tracing::info!("Saved {} messages to {}", messages.len(), path.display());
    }
    Ok(())
}
