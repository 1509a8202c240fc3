use super::bitquery::{ContractCreationQuery, ContractCreationSource, extract_smart_contract_calls};
use super::table::{CreatorTable, EnrichedTable};

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static RE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-f]{40}$").expect("invalid regex: address"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOptions {
    pub network: String,
    pub max_results: u32,
    pub days_back: u64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            network: "ethereum".to_string(),
            max_results: 100,
            days_back: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentSummary {
    pub resolved: usize,
    pub unresolved: usize,
}

impl EnrichmentSummary {
    pub fn total(&self) -> usize {
        self.resolved + self.unresolved
    }
}

impl std::fmt::Display for EnrichmentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Resolved creators:   {}", self.resolved)?;
        writeln!(f, "  Unresolved creators: {}", self.unresolved)?;
        writeln!(f, "  Total:               {}", self.total())
    }
}

pub struct Enricher<S> {
    source: S,
    options: EnrichOptions,
}

impl<S: ContractCreationSource> Enricher<S> {
    pub fn new(source: S, options: EnrichOptions) -> Self {
        Self { source, options }
    }

    /// Looks up the contracts created by `address`. Failures are logged and
    /// come back as `None`.
    pub async fn enrich_address(&self, address: &str) -> Option<Value> {
        let creator = address.to_lowercase();
        if !RE_ADDRESS.is_match(&creator) {
            log::warn!("'{}' does not look like an address, querying anyway", address);
        }

        let query = ContractCreationQuery {
            network: self.options.network.clone(),
            creator_address: creator,
            max_results: self.options.max_results,
            days_back: self.options.days_back,
        };

        let result = self
            .source
            .fetch_contract_creations(&query)
            .await
            .and_then(|response| extract_smart_contract_calls(&response));

        match result {
            Ok(contracts) => {
                log::debug!("{}: {}", query.creator_address, contracts);
                Some(contracts)
            }
            Err(e) => {
                log::error!("{}: {}", query.creator_address, e);
                None
            }
        }
    }

    /// Enriches every row in order, one request at a time. Rows are never
    /// dropped.
    pub async fn enrich_table(&self, table: CreatorTable) -> (EnrichedTable, EnrichmentSummary) {
        let total = table.len();
        let mut summary = EnrichmentSummary::default();
        let mut other_contracts = Vec::with_capacity(total);

        for (i, address) in table.addresses().enumerate() {
            log::info!("Enriching row {}/{}: {}", i + 1, total, address);

            let contracts = self.enrich_address(address).await;
            match contracts {
                Some(_) => summary.resolved += 1,
                None => summary.unresolved += 1,
            }
            other_contracts.push(contracts);
        }

        (EnrichedTable::new(table, other_contracts), summary)
    }
}
