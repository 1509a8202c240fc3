use super::types::LabelLink;

use reqwest::Url;
use scraper::{Html, Selector};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(String),
}

/// Collects every anchor `href` on the page that starts with `prefix`.
///
/// Relative hrefs are resolved against `page_url` the way a browser reports
/// them. Page order is kept and duplicates are not removed.
pub fn parse_label_links(
    html: &str,
    page_url: &str,
    prefix: &str,
) -> Result<Vec<LabelLink>, ParseError> {
    let base = Url::parse(page_url)
        .map_err(|e| ParseError::UrlParseError(format!("{page_url}: {e}")))?;

    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut total = 0;
    let mut links = Vec::new();

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        total += 1;

        match base.join(href.trim()) {
            Ok(url) if url.as_str().starts_with(prefix) => {
                links.push(LabelLink::new(url.as_str()))
            }
            Ok(_) => {}
            Err(e) => log::warn!("Skipping href '{}': {}", href, e),
        }
    }

    log::debug!("Kept {} of {} anchors matching {}", links.len(), total, prefix);

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{LABEL_CLOUD_URL, LABEL_PREFIX};
    use std::fs;

    #[test]
    fn test_parse_label_cloud_fixture() {
        let html =
            fs::read_to_string("fixtures/labelcloud.html").expect("Failed to read sample file");

        let links =
            parse_label_links(&html, LABEL_CLOUD_URL, LABEL_PREFIX).expect("Failed to parse");

        assert_eq!(links.len(), 5);
        assert!(links.iter().all(|l| l.as_str().starts_with(LABEL_PREFIX)));
        assert_eq!(
            links[0].as_str(),
            "https://etherscan.io/accounts/label/0x-protocol"
        );
        assert_eq!(links[4].as_str(), "https://etherscan.io/accounts/label/uniswap");
    }

    #[test]
    fn test_filters_by_prefix() {
        let html = r#"
            <a href="https://etherscan.io/accounts/label/binance">Binance</a>
            <a href="https://etherscan.io/tokens/label/binance">Binance tokens</a>
            <a href="https://twitter.com/etherscan">Twitter</a>
            <a href="/accounts/label/coinbase">Coinbase</a>
        "#;

        let links = parse_label_links(html, LABEL_CLOUD_URL, LABEL_PREFIX).unwrap();

        assert_eq!(
            links,
            vec![
                LabelLink::new("https://etherscan.io/accounts/label/binance"),
                LabelLink::new("https://etherscan.io/accounts/label/coinbase"),
            ]
        );
    }

    #[test]
    fn test_keeps_duplicates_in_page_order() {
        let html = r#"
            <a href="/accounts/label/kraken">Kraken</a>
            <a href="/accounts/label/aave">Aave</a>
            <a href="/accounts/label/kraken">Kraken again</a>
        "#;

        let links = parse_label_links(html, LABEL_CLOUD_URL, LABEL_PREFIX).unwrap();

        let urls: Vec<&str> = links.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://etherscan.io/accounts/label/kraken",
                "https://etherscan.io/accounts/label/aave",
                "https://etherscan.io/accounts/label/kraken",
            ]
        );
    }

    #[test]
    fn test_ignores_anchors_without_href() {
        let html = r#"
            <a name="top">Top</a>
            <a>Empty</a>
            <a href="/accounts/label/lido">Lido</a>
        "#;

        let links = parse_label_links(html, LABEL_CLOUD_URL, LABEL_PREFIX).unwrap();

        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_empty_page() {
        let links = parse_label_links("<html></html>", LABEL_CLOUD_URL, LABEL_PREFIX).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_invalid_page_url() {
        let result = parse_label_links("<a href=\"/x\"></a>", "not a url", LABEL_PREFIX);
        assert!(matches!(result, Err(ParseError::UrlParseError(_))));
    }
}
