use chrono::Utc;
use clap::Subcommand;
use focushub_core::QuoteFetcher;
use tracing::warn;

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum QuoteAction {
    /// Print the cached quote
    Show,
    /// Fetch today's quote if the cached one has gone stale
    Refresh {
        /// Drop the cached quote first
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: QuoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        QuoteAction::Show => match hub.store.quote() {
            Some(quote) => print_json(quote)?,
            None => println!("no quote cached; run `focushub quote refresh`"),
        },
        QuoteAction::Refresh { force } => {
            let now = Utc::now();
            if force {
                hub.store.clear_quote();
            }
            if !hub.store.needs_quote_refresh(now) {
                println!("cached quote is still fresh");
                return Ok(());
            }
            let fetcher = QuoteFetcher::new(&hub.config.quote.feed_url)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            match runtime.block_on(fetcher.fetch_today(now)) {
                Ok(quote) => {
                    if hub.store.set_quote(quote) {
                        if let Some(quote) = hub.store.quote() {
                            print_json(quote)?;
                        }
                        hub.commit()?;
                    }
                }
                // A dead feed leaves the cache alone; nothing is committed,
                // so a forced clear is discarded too.
                Err(e) => {
                    warn!(error = %e, "quote fetch failed");
                    eprintln!("quote fetch failed: {e}");
                }
            }
        }
    }

    Ok(())
}
