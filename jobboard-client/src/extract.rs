use jobwatch_core::{
    CoreError, Posting, ScrapeError, JOB_TYPE_NOT_SPECIFIED, LOCATION_NOT_SPECIFIED,
};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

// Page-specific selectors for the listing cards. Cards are anchors opening
// the posting in a new tab; location and job type sit in a positional
// sub-tree with no classes of their own.
const CARD_SELECTOR: &str = "a.flex.flex-col[rel~='noopener']";
const TITLE_SELECTOR: &str = "h3.font-bold";
const COMPANY_SELECTOR: &str = "div.text-orange-600";
const TIME_POSTED_SELECTOR: &str = "p[class*='absolute'][class*='right-2']";
const LOCATION_SELECTOR: &str = "div:nth-child(2) > div:nth-child(2) > div > p";
const JOB_TYPE_SELECTOR: &str = "div:nth-child(2) > div:nth-child(2) > p";

/// Extract postings from one listing page. Cards missing a title or company
/// are dropped here so malformed entries never reach keying or
/// reconciliation; absent location and job type get their sentinel defaults.
pub fn extract_postings(html: &str, page_url: &str) -> Result<Vec<Posting>, CoreError> {
    let document = Html::parse_document(html);
    let cards = parse_selector(CARD_SELECTOR)?;

    let mut postings = Vec::new();
    for card in document.select(&cards) {
        match extract_posting(card, page_url) {
            Some(posting) => postings.push(posting),
            None => warn!("Skipping listing card with missing title or company"),
        }
    }

    debug!(count = postings.len(), "Extracted postings from listing page");
    Ok(postings)
}

fn extract_posting(card: ElementRef, page_url: &str) -> Option<Posting> {
    let title = text_of(&card, TITLE_SELECTOR)?;
    let company = text_of(&card, COMPANY_SELECTOR)?;

    let location =
        text_of(&card, LOCATION_SELECTOR).unwrap_or_else(|| LOCATION_NOT_SPECIFIED.to_string());
    let job_type =
        text_of(&card, JOB_TYPE_SELECTOR).unwrap_or_else(|| JOB_TYPE_NOT_SPECIFIED.to_string());
    let time_posted = text_of(&card, TIME_POSTED_SELECTOR).unwrap_or_default();
    let link = card
        .value()
        .attr("href")
        .map(|href| resolve_link(page_url, href))
        .unwrap_or_default();

    Some(Posting {
        title,
        company,
        location,
        job_type,
        time_posted,
        link,
    })
}

fn text_of(card: &ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    card.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_selector(css: &str) -> Result<Selector, CoreError> {
    Selector::parse(css).map_err(|_| {
        CoreError::Scrape(ScrapeError::InvalidPage {
            details: format!("invalid selector: {css}"),
        })
    })
}

/// Card hrefs are usually relative; resolve them against the page URL.
fn resolve_link(page_url: &str, href: &str) -> String {
    match Url::parse(page_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.com/jobs/crewai";

    const LISTING_FIXTURE: &str = r#"
        <html><body>
        <a class="flex flex-col rounded" rel="noopener noreferrer" href="/jobs/1">
            <p class="hidden sm:flex absolute right-2">2 days ago</p>
            <div>
                <div>
                    <h3 class="font-bold">Backend Engineer</h3>
                    <div class="text-orange-600">Acme</div>
                </div>
                <div>
                    <div><p>Remote</p></div>
                    <p>Full-time</p>
                </div>
            </div>
        </a>
        <a class="flex flex-col rounded" rel="noopener noreferrer" href="https://other.example.com/jobs/2">
            <p class="hidden sm:flex absolute right-2">1 week ago</p>
            <div>
                <div>
                    <h3 class="font-bold">Designer</h3>
                    <div class="text-orange-600">Globex</div>
                </div>
            </div>
        </a>
        <a class="flex flex-col rounded" rel="noopener noreferrer" href="/jobs/3">
            <div>
                <div>
                    <h3 class="font-bold">Orphaned Card</h3>
                </div>
            </div>
        </a>
        </body></html>
    "#;

    #[test]
    fn extracts_a_complete_card() {
        let postings = extract_postings(LISTING_FIXTURE, PAGE_URL).unwrap();

        let first = &postings[0];
        assert_eq!(first.title, "Backend Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "Remote");
        assert_eq!(first.job_type, "Full-time");
        assert_eq!(first.time_posted, "2 days ago");
    }

    #[test]
    fn applies_sentinel_defaults_when_optional_fields_are_absent() {
        let postings = extract_postings(LISTING_FIXTURE, PAGE_URL).unwrap();

        let second = &postings[1];
        assert_eq!(second.title, "Designer");
        assert_eq!(second.location, LOCATION_NOT_SPECIFIED);
        assert_eq!(second.job_type, JOB_TYPE_NOT_SPECIFIED);
    }

    #[test]
    fn drops_cards_missing_required_fields() {
        let postings = extract_postings(LISTING_FIXTURE, PAGE_URL).unwrap();

        assert_eq!(postings.len(), 2);
        assert!(postings.iter().all(|p| p.title != "Orphaned Card"));
    }

    #[test]
    fn resolves_relative_links_against_the_page() {
        let postings = extract_postings(LISTING_FIXTURE, PAGE_URL).unwrap();

        assert_eq!(postings[0].link, "https://example.com/jobs/1");
        assert_eq!(postings[1].link, "https://other.example.com/jobs/2");
    }

    #[test]
    fn empty_page_yields_no_postings() {
        let postings = extract_postings("<html><body></body></html>", PAGE_URL).unwrap();
        assert!(postings.is_empty());
    }
}
