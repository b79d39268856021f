//! `studybrief preview`: build one digest from the terminal

use anyhow::{Context, Result};
use chrono::Utc;
use studybrief_core::digest::resolve_date;
use studybrief_core::{Digest, DigestBuilder, NotionClient, Settings};

/// Build the digest for `date` (or today in `timezone`) and print it.
///
/// Needs Notion access only; the webhook secret is not checked.
pub async fn run_preview(
    settings: Settings,
    date: Option<String>,
    timezone: String,
    json: bool,
) -> Result<()> {
    let config = settings
        .service_config()
        .context("Notion access is not configured")?;
    let client = NotionClient::new(&config.notion).context("Failed to create Notion client")?;
    let builder = DigestBuilder::new(client, &config);

    let date = resolve_date(date.as_deref(), &timezone, Utc::now())?;
    let digest = builder
        .build(&date)
        .await
        .with_context(|| format!("Failed to build digest for {}", date))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
    } else {
        println!("{}", format_digest(&digest));
    }

    Ok(())
}

fn format_digest(digest: &Digest) -> String {
    if !digest.should_send {
        return format!(
            "Nothing to send for {} ({})",
            digest.debug.date,
            digest.reason.as_str()
        );
    }

    format!(
        "Subject: {}\n\n{}\n\n--\nobjectives: {}  resources: {}  practice test: {}  mistakes: {}",
        digest.subject,
        digest.body,
        digest.debug.objectives_count,
        digest.debug.resources_count,
        if digest.debug.practice_test_found { "yes" } else { "no" },
        digest.debug.mistakes_found
    )
}
