mod error;
mod models;
mod report;
mod scrapers;
mod store;

use std::path::Path;

use scrapers::{somon, SomonScraper};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// All scraped listings accumulate in this file
const STORE_PATH: &str = "apartments.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = Path::new(STORE_PATH);

    // `somon-scout report` prints centre-proximity matches over the
    // accumulated file; anything else runs a scrape.
    match std::env::args().nth(1).as_deref() {
        Some("report") => report::run(path)?,
        _ => scrape(path).await?,
    }

    Ok(())
}

/// Walk every index page, fetch each advert's full record and upsert it
/// into the store.
///
/// A failed page fetch aborts the run; a single bad listing is logged
/// and skipped so the rest of the page still lands in the store.
async fn scrape(path: &Path) -> anyhow::Result<()> {
    let scraper = SomonScraper::new()?;

    let last_page = scraper.last_page_number().await?;
    info!("Listing index has {} pages", last_page);

    for page in 1..=last_page {
        info!("Processing page {}/{}", page, last_page);

        let urls = scraper.listing_urls(page).await?;
        info!("Found {} adverts on page {}", urls.len(), page);

        for url in urls {
            if let Err(err) = scrape_listing(&scraper, &url, path).await {
                warn!("Skipping advert {}: {:#}", url, err);
            }
        }
    }

    info!("Scrape finished, listings stored in {}", path.display());

    Ok(())
}

async fn scrape_listing(scraper: &SomonScraper, url: &str, path: &Path) -> anyhow::Result<()> {
    let id = somon::extract_id_from_url(url)?;
    info!("Fetching listing {}", id);

    let listing = scraper.fetch_listing(id).await?;
    store::upsert(&listing, path)?;

    Ok(())
}
