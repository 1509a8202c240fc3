pub mod bitquery;
pub mod enricher;
pub mod table;

pub use bitquery::{
    BitqueryClient, BitqueryError, ContractCreationQuery, ContractCreationSource,
    extract_smart_contract_calls,
};
pub use enricher::{EnrichOptions, EnrichmentSummary, Enricher};
pub use table::{CREATOR_COLUMN, CreatorTable, EnrichedTable, OTHER_CONTRACTS_COLUMN, TableError};

pub const DEFAULT_INPUT_PATH: &str = "project_creator_info.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "ariel_project_data.csv";
