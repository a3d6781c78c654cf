//! Strict-list command implementation

use crate::config::Config;
use crate::market::{HyperliquidClient, HyperliquidConfig};
use crate::monitor::{StrictList, STRICT_MIN_MARGIN_TABLE_ID, STRICT_MIN_MAX_LEVERAGE};
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Names shown before confirming
const PREVIEW: usize = 10;

#[derive(Args, Debug)]
pub struct StrictListArgs {
    /// Output path (defaults to `filter.strict_list_path`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl StrictListArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = HyperliquidClient::with_config(HyperliquidConfig::from(&config.client))?;
        let universe = client.fetch_universe().await?;
        tracing::info!(count = universe.len(), "Fetched universe metadata");

        let strict = StrictList::select(&universe, &config.filter.excluded);

        println!(
            "{} of {} tokens qualify (listed, cross margin, leverage >= {}x, margin table >= {})",
            strict.len(),
            universe.len(),
            STRICT_MIN_MAX_LEVERAGE,
            STRICT_MIN_MARGIN_TABLE_ID
        );
        let preview: Vec<&str> = strict.names().take(PREVIEW).collect();
        println!("First {}: {}", preview.len(), preview.join(", "));

        if strict.is_empty() {
            anyhow::bail!("no tokens matched the strict criteria, leaving list untouched");
        }

        if !self.yes && !confirm("Update strict list?")? {
            println!("Strict list not updated");
            return Ok(());
        }

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| config.filter.strict_list_path.clone());
        strict.save(&path)?;
        println!("Saved {} tokens to {}", strict.len(), path.display());
        Ok(())
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} (y/N): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
