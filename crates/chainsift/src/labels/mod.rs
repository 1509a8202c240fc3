mod parser;
pub mod scraper;
pub mod source;
pub mod types;

pub use parser::{ParseError, parse_label_links};
pub use scraper::{LabelScraper, ScraperError};
pub use source::{DEFAULT_WEBDRIVER_URL, HttpPageSource, PageSource, WebDriverPageSource};
pub use types::{LabelLink, LabelListing};

pub const LABEL_CLOUD_URL: &str = "https://etherscan.io/labelcloud";
pub const LABEL_PREFIX: &str = "https://etherscan.io/accounts/label/";
