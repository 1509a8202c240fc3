use super::parser::{ParseError, parse_label_links};
use super::source::PageSource;
use super::types::LabelListing;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("WebDriver session failed: {0}")]
    WebDriverSession(#[from] fantoccini::error::NewSessionError),
    #[error("WebDriver command failed: {0}")]
    WebDriverCommand(#[from] fantoccini::error::CmdError),
}

#[derive(Debug, Clone)]
pub struct LabelScraper<S> {
    source: S,
    url: String,
    prefix: String,
}

impl<S: PageSource> LabelScraper<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            url: super::LABEL_CLOUD_URL.to_string(),
            prefix: super::LABEL_PREFIX.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub async fn fetch_labels(&self) -> Result<LabelListing, ScraperError> {
        log::info!("Fetching label links from {}...", self.url);

        let html = self.source.fetch_html(&self.url).await?;
        let links = parse_label_links(&html, &self.url, &self.prefix)?;

        log::info!("Found {} label links", links.len());
        Ok(LabelListing::new(&self.url, links))
    }
}
