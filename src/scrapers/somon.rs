use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Listing;
use crate::scrapers::fetch::{Fetch, HttpFetcher};

/// Listing index for apartment sales in Khujand
pub const BASE_URL: &str = "https://somon.tj/nedvizhimost/prodazha-kvartir/hudzhand/";

const ITEM_API_URL: &str = "https://somon.tj/api/items";

/// Initial wait after a 403; doubled on every further attempt
const RATE_LIMIT_DELAY: Duration = Duration::from_secs(15);
const MAX_RATE_LIMIT_ATTEMPTS: u32 = 5;

static ADVERT_CARD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".list-announcement-assortiments .list-simple__output .advert").unwrap()
});
static ADVERT_TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".advert__content-title").unwrap());
static PAGINATION_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".number-list li a").unwrap());
static ADVERT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"adv/(\d+)_").unwrap());

/// Scraper for the somon.tj classifieds site
pub struct SomonScraper {
    fetcher: Box<dyn Fetch>,
}

impl SomonScraper {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: Box::new(HttpFetcher::new()?),
        })
    }

    /// Create a scraper over a custom transport, used by tests
    pub fn with_fetcher(fetcher: Box<dyn Fetch>) -> Self {
        Self { fetcher }
    }

    /// Fetch the full listing record for one advert id.
    ///
    /// A 403 means the site is throttling us: back off and retry, doubling
    /// the delay each time, up to `MAX_RATE_LIMIT_ATTEMPTS` requests.
    pub async fn fetch_listing(&self, id: u64) -> Result<Listing> {
        let url = format!("{ITEM_API_URL}/{id}/");
        let mut delay = RATE_LIMIT_DELAY;

        for attempt in 1..=MAX_RATE_LIMIT_ATTEMPTS {
            let response = self.fetcher.get(&url).await?;

            if response.status == 403 {
                if attempt == MAX_RATE_LIMIT_ATTEMPTS {
                    break;
                }
                warn!(
                    "Rate-limited on {} (attempt {}/{}), waiting {}s",
                    url,
                    attempt,
                    MAX_RATE_LIMIT_ATTEMPTS,
                    delay.as_secs()
                );
                sleep(delay).await;
                delay *= 2;
                continue;
            }

            if response.status != 200 {
                return Err(Error::RequestFailed {
                    url,
                    status: response.status,
                });
            }

            return serde_json::from_str(&response.body).map_err(|source| {
                debug!("Undecodable body for listing {}: {}", id, response.body);
                Error::Decode {
                    context: format!("listing {id}"),
                    source,
                }
            });
        }

        Err(Error::RateLimitExceeded {
            url,
            attempts: MAX_RATE_LIMIT_ATTEMPTS,
        })
    }

    /// Fetch one index page and return the advert URLs found on it, in
    /// page order.
    pub async fn listing_urls(&self, page: u32) -> Result<Vec<String>> {
        let url = format!("{BASE_URL}?page={page}");
        let body = self.get_ok(&url).await?;
        Ok(extract_listing_urls(&body))
    }

    /// Number of the last page of the listing index, taken from the
    /// pagination links on the first page.
    pub async fn last_page_number(&self) -> Result<u32> {
        let body = self.get_ok(BASE_URL).await?;
        parse_last_page_number(&body)
    }

    async fn get_ok(&self, url: &str) -> Result<String> {
        let response = self.fetcher.get(url).await?;

        if response.status != 200 {
            return Err(Error::RequestFailed {
                url: url.to_string(),
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

/// Pull advert URLs out of an index page.
///
/// Cards without a title link or without an href are skipped with a
/// warning rather than contributing an empty entry.
pub fn extract_listing_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    for card in document.select(&ADVERT_CARD) {
        let Some(link) = card.select(&ADVERT_TITLE_LINK).next() else {
            warn!("Advert card without a title link, skipping");
            continue;
        };

        match link.value().attr("href") {
            Some(href) if !href.is_empty() => urls.push(href.to_string()),
            _ => warn!("Advert title link without an href, skipping"),
        }
    }

    urls
}

/// Extract the numeric advert id from a detail URL of the form
/// `.../adv/<digits>_<slug>`.
pub fn extract_id_from_url(url: &str) -> Result<u64> {
    let captures = ADVERT_ID
        .captures(url)
        .ok_or_else(|| Error::IdNotFound(url.to_string()))?;

    captures[1]
        .parse()
        .map_err(|_| Error::IdNotFound(url.to_string()))
}

fn parse_last_page_number(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);

    let last = document
        .select(&PAGINATION_LINK)
        .last()
        .ok_or_else(|| Error::Parse("no pagination links on listing index".to_string()))?;

    let text = last.text().collect::<String>();
    let text = text.trim();

    text.parse()
        .map_err(|_| Error::Parse(format!("pagination text {text:?} is not a number")))
}
