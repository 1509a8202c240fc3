use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// URL of a block-explorer label detail page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelLink(String);

impl LabelLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LabelLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelListing {
    pub source_url: String,
    pub links: Vec<LabelLink>,
    pub count: usize,
}

impl LabelListing {
    pub fn new(source_url: impl Into<String>, links: Vec<LabelLink>) -> Self {
        Self {
            source_url: source_url.into(),
            count: links.len(),
            links,
        }
    }
}

impl Display for LabelListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, link) in self.links.iter().enumerate() {
            writeln!(f, "{:>4}. {}", i + 1, link)?;
        }
        writeln!(f, "\nLabels found on {}: {}", self.source_url, self.count)
    }
}
