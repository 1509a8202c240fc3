use crate::config::BitqueryConfig;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

const SMART_CONTRACT_CALLS_POINTER: &str = "/data/ethereum/smartContractCalls";

const CONTRACT_CREATIONS_QUERY: &str = r#"
query ($network: EthereumNetwork!, $creator: String!, $limit: Int!, $since: ISO8601DateTime) {
  ethereum(network: $network) {
    smartContractCalls(
      options: {desc: "block.timestamp.time", limit: $limit}
      smartContractMethod: {is: "Contract Creation"}
      caller: {is: $creator}
      time: {since: $since}
    ) {
      block {
        height
        timestamp {
          time(format: "%Y-%m-%d %H:%M:%S")
        }
      }
      smartContract {
        contractType
        address {
          address
          annotation
        }
        currency {
          name
          symbol
          decimals
          tokenType
        }
      }
      transaction {
        hash
      }
    }
  }
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum BitqueryError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCreationQuery {
    pub network: String,
    pub creator_address: String,
    pub max_results: u32,
    pub days_back: u64,
}

impl ContractCreationQuery {
    /// First day of the lookback window, counted back from `today`.
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.days_back))
            .unwrap_or(NaiveDate::MIN)
    }

    fn variables(&self, today: NaiveDate) -> Value {
        json!({
            "network": self.network,
            "creator": self.creator_address,
            "limit": self.max_results,
            "since": self.since(today).format("%Y-%m-%d").to_string(),
        })
    }
}

/// A service that knows which contracts an address has deployed.
#[async_trait]
pub trait ContractCreationSource {
    /// Returns the raw response document for `query`.
    async fn fetch_contract_creations(
        &self,
        query: &ContractCreationQuery,
    ) -> Result<Value, BitqueryError>;
}

#[derive(Debug, Clone)]
pub struct BitqueryClient {
    client: Client,
    config: BitqueryConfig,
}

impl BitqueryClient {
    pub fn new(config: BitqueryConfig) -> Result<Self, BitqueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ContractCreationSource for BitqueryClient {
    async fn fetch_contract_creations(
        &self,
        query: &ContractCreationQuery,
    ) -> Result<Value, BitqueryError> {
        let body = json!({
            "query": CONTRACT_CREATIONS_QUERY,
            "variables": query.variables(Utc::now().date_naive()),
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .json::<Value>()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(response)
    }
}

/// Pulls `data.ethereum.smartContractCalls` out of a response, verbatim.
///
/// A response without that field is an error even when the transport
/// succeeded; any GraphQL `errors` are reported in that case.
pub fn extract_smart_contract_calls(response: &Value) -> Result<Value, BitqueryError> {
    match response.pointer(SMART_CONTRACT_CALLS_POINTER) {
        Some(calls) if !calls.is_null() => Ok(calls.clone()),
        _ => match response.get("errors").and_then(Value::as_array) {
            Some(errors) if !errors.is_empty() => {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(BitqueryError::GraphQl(messages))
            }
            _ => Err(BitqueryError::MissingField(
                "data.ethereum.smartContractCalls".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query(address: &str) -> ContractCreationQuery {
        ContractCreationQuery {
            network: "ethereum".to_string(),
            creator_address: address.to_string(),
            max_results: 100,
            days_back: 300,
        }
    }

    #[test]
    fn test_since_counts_back_days() {
        let today = NaiveDate::from_ymd_opt(2024, 10, 27).unwrap();
        assert_eq!(
            query("0xabc").since(today),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_variables() {
        let today = NaiveDate::from_ymd_opt(2024, 10, 27).unwrap();
        let vars = query("0xabc").variables(today);

        assert_eq!(vars["network"], "ethereum");
        assert_eq!(vars["creator"], "0xabc");
        assert_eq!(vars["limit"], 100);
        assert_eq!(vars["since"], "2024-01-01");
    }

    #[test]
    fn test_extract_returns_calls_verbatim() {
        let response = json!({
            "data": { "ethereum": { "smartContractCalls": [{ "address": "0x1" }] } }
        });

        let calls = extract_smart_contract_calls(&response).unwrap();
        assert_eq!(calls, json!([{ "address": "0x1" }]));
    }

    #[test]
    fn test_extract_keeps_empty_list() {
        let response = json!({ "data": { "ethereum": { "smartContractCalls": [] } } });
        assert_eq!(extract_smart_contract_calls(&response).unwrap(), json!([]));
    }

    #[test]
    fn test_extract_missing_field() {
        let response = json!({ "data": { "ethereum": {} } });
        assert!(matches!(
            extract_smart_contract_calls(&response),
            Err(BitqueryError::MissingField(_))
        ));

        let response = json!({ "data": { "ethereum": { "smartContractCalls": null } } });
        assert!(matches!(
            extract_smart_contract_calls(&response),
            Err(BitqueryError::MissingField(_))
        ));
    }

    #[test]
    fn test_extract_reports_graphql_errors() {
        let response = json!({
            "data": null,
            "errors": [{ "message": "Limit exceeded" }, { "message": "Try later" }]
        });

        match extract_smart_contract_calls(&response) {
            Err(BitqueryError::GraphQl(msg)) => assert_eq!(msg, "Limit exceeded; Try later"),
            other => panic!("Expected GraphQL error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_posts_query_with_api_key() {
        let server = MockServer::start().await;
        let body = json!({
            "data": { "ethereum": { "smartContractCalls": [{ "transaction": { "hash": "0xdead" } }] } }
        });
        Mock::given(method("POST"))
            .and(header("X-API-KEY", "test-key"))
            .and(body_partial_json(json!({
                "variables": { "network": "ethereum", "creator": "0xabc", "limit": 100 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = BitqueryClient::new(BitqueryConfig::new(server.uri(), "test-key")).unwrap();
        let response = client
            .fetch_contract_creations(&query("0xabc"))
            .await
            .expect("Should fetch response");

        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_client_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = BitqueryClient::new(BitqueryConfig::new(server.uri(), "bad-key")).unwrap();
        let result = client.fetch_contract_creations(&query("0xabc")).await;

        assert!(matches!(result, Err(BitqueryError::HttpError(_))));
    }
}
