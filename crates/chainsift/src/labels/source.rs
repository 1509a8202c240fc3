use super::scraper::ScraperError;

use async_trait::async_trait;
use fantoccini::ClientBuilder;
use reqwest::Client;
use serde_json::{Map, Value, json};
use std::time::Duration;

pub const DEFAULT_RENDER_WAIT: Duration = Duration::from_secs(5);
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Anything that can hand back the HTML of a page.
#[async_trait]
pub trait PageSource {
    async fn fetch_html(&self, url: &str) -> Result<String, ScraperError>;
}

/// Fetches the raw server response. Content rendered client-side is not seen.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        log::info!("Fetching {} over HTTP...", url);

        let html = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(html)
    }
}

/// Drives a browser through a running WebDriver server (chromedriver,
/// geckodriver, ...) so the page gets rendered before it is read.
#[derive(Debug, Clone)]
pub struct WebDriverPageSource {
    webdriver_url: String,
    render_wait: Duration,
    headless: bool,
}

impl WebDriverPageSource {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            render_wait: DEFAULT_RENDER_WAIT,
            headless: true,
        }
    }

    pub fn with_render_wait(mut self, render_wait: Duration) -> Self {
        self.render_wait = render_wait;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }
}

#[async_trait]
impl PageSource for WebDriverPageSource {
    async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        log::info!("Opening WebDriver session at {}", self.webdriver_url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder
            .connect(&self.webdriver_url)
            .await
            .inspect_err(|e| log::error!("WebDriver session error: {e:?}"))?;

        let result = async {
            client.goto(url).await?;
            log::debug!("Waiting {:?} for client-side rendering", self.render_wait);
            tokio::time::sleep(self.render_wait).await;
            client.source().await
        }
        .await;

        // the session is closed even when navigation failed
        if let Err(e) = client.close().await {
            log::warn!("Failed to close WebDriver session: {}", e);
        }

        Ok(result.inspect_err(|e| log::error!("WebDriver command error: {e:?}"))?)
    }
}
