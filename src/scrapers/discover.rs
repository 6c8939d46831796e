//! Link discovery on the paginated category page.
//!
//! # URL Pattern
//!
//! Page 1 is the category URL itself, page `n > 1` is `{category_url}?page={n}`.
//! Any `a[href]` whose target contains the configured article path, and does
//! not point back at the category root, is an article link.

use crate::fetch::{PageFetcher, error_status};
use crate::models::SiteConfig;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Collect up to `target_count` distinct article URLs from the category listing.
///
/// Pages are fetched in order until either `target_count` URLs have been
/// collected or a page contributes no link that was not already seen. The
/// loop sleeps `page_delay` before moving on to the next page.
///
/// # Returns
///
/// At most `target_count` absolute URLs, in no particular order.
///
/// A listing page answering with an HTTP error status has no article links,
/// so it ends pagination like any other page without new links.
///
/// # Errors
///
/// A transport or parse failure on any page aborts discovery; no partial
/// result is returned.
#[instrument(level = "info", skip(fetcher, site), fields(category = %site.category_url))]
pub async fn discover<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
    target_count: usize,
    page_delay: Duration,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut all_links: HashSet<String> = HashSet::new();
    let mut page = 1usize;

    while all_links.len() < target_count {
        let url = site.page_url(page);
        let html = match fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => match error_status(e.as_ref()) {
                Some(status) => {
                    info!(page, status, "Listing page answered with an error status; end of pagination");
                    break;
                }
                None => return Err(e),
            },
        };

        let new_links: Vec<String> = article_links(&html, site)?
            .into_iter()
            .filter(|link| !all_links.contains(link))
            .collect();

        if new_links.is_empty() {
            info!(page, "Page contributed no new links; end of pagination");
            break;
        }

        debug!(page, new = new_links.len(), "Collected links from listing page");
        all_links.extend(new_links);
        if all_links.len() >= target_count {
            break;
        }

        page += 1;
        sleep(page_delay).await;
    }

    let links: Vec<String> = all_links.into_iter().take(target_count).collect();
    info!(count = links.len(), pages = page, "Discovered article URLs");
    Ok(links)
}

/// Extract the absolute article links from one listing page, in document order.
///
/// Duplicates within the page are kept; the caller deduplicates.
pub fn article_links(html: &str, site: &SiteConfig) -> Result<Vec<String>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")?;
    let category_root = site.category_root();

    let links = document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(&site.article_path) && !href.ends_with(&category_root))
        .map(|href| site.absolutize(href))
        .collect();
    Ok(links)
}
