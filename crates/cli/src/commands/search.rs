//! `reverie search`: show which journal entries a query retrieves.

use reverie_core::journal::JournalIndex;
use tracing::debug;

pub async fn run(query: &str, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let index = super::open_journal(&config).await?;
    let limit = limit.unwrap_or(config.journal.search_limit);

    debug!(query_len = query.len(), limit, "Searching journal");
    let hits = index.search(query, limit).await?;
    if hits.is_empty() {
        println!("  No matching entries.");
        return Ok(());
    }

    let refs: Vec<_> = hits.iter().map(|h| h.entry_ref.clone()).collect();
    let texts = index.fetch_texts(&refs).await?;

    for (rank, (hit, text)) in hits.iter().zip(texts.iter()).enumerate() {
        println!("  {:>2}. {}  (score {:.3})", rank + 1, hit.entry_ref, hit.score);
        println!("      {}", preview(text, 100));
    }
    println!();
    println!("  {} of up to {} hits", hits.len(), limit);
    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{cut}...")
    }
}
