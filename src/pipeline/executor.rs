//! Executes one strategy against the catalog.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::client::catalog::{CatalogClient, CatalogItem, SearchOutcome, SearchRequest};
use crate::film::FilmRecord;
use crate::profile::Profile;
use crate::strategy::Strategy;

/// One catalog call per strategy. Failures are tolerated: strategies are
/// redundant by design, so a failed call contributes zero results and the
/// loop moves on.
pub struct SearchExecutor {
    client: Arc<CatalogClient>,
    collections: Vec<String>,
}

impl SearchExecutor {
    #[must_use]
    pub fn new(client: Arc<CatalogClient>, collections: Vec<String>) -> Self {
        Self {
            client,
            collections,
        }
    }

    /// Compile the request for one strategy: keyword slots as generated,
    /// the configured collections, and a year window when both the film
    /// year and the tier's range exist.
    #[must_use]
    pub fn build_request(
        &self,
        strategy: &Strategy,
        film: &FilmRecord,
        profile: &Profile,
    ) -> SearchRequest {
        let (year_start, year_end) = match (film.year, profile.date_range(strategy.tier)) {
            (Some(year), Some(range)) => (Some(year - range.before), Some(year + range.after)),
            _ => (None, None),
        };

        SearchRequest {
            keyword: strategy.slots.keyword.clone(),
            second_keyword: strategy.slots.second.clone(),
            third_keyword: strategy.slots.third.clone(),
            collections: self.collections.clone(),
            year_start,
            year_end,
        }
    }

    /// Run one strategy. Network errors, error statuses, and malformed
    /// payloads are logged and yield an empty result set.
    pub async fn execute(
        &self,
        strategy: &Strategy,
        film: &FilmRecord,
        profile: &Profile,
    ) -> Vec<CatalogItem> {
        match self.try_execute(strategy, film, profile).await {
            Ok(outcome) => {
                debug!(
                    strategy = strategy.kind,
                    query = %strategy.query,
                    returned = outcome.items.len(),
                    total_count = outcome.total_count,
                    "strategy search returned"
                );
                outcome.items
            }
            Err(error) => {
                warn!(
                    strategy = strategy.kind,
                    query = %strategy.query,
                    error = ?error,
                    "strategy search failed, continuing with remaining strategies"
                );
                Vec::new()
            }
        }
    }

    async fn try_execute(
        &self,
        strategy: &Strategy,
        film: &FilmRecord,
        profile: &Profile,
    ) -> Result<SearchOutcome> {
        let request = self.build_request(strategy, film, profile);
        self.client.search(&request).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::CatalogConfig;
    use crate::strategy::{ConfidenceTier, KeywordSlots, StrategyCategory};

    use super::*;

    fn client(base_url: String) -> Arc<CatalogClient> {
        Arc::new(
            CatalogClient::new(CatalogConfig {
                base_url,
                connect_timeout: Duration::from_secs(1),
                total_timeout: Duration::from_secs(2),
            })
            .expect("client should build"),
        )
    }

    fn strategy(tier: ConfidenceTier, slots: KeywordSlots) -> Strategy {
        let query = slots.joined();
        Strategy {
            kind: "exact_title",
            category: StrategyCategory::Title,
            tier,
            profile_weight: 2.5,
            slots,
            query,
            description: "test".to_string(),
        }
    }

    fn oz() -> FilmRecord {
        FilmRecord {
            year: Some(1939),
            ..FilmRecord::titled("The Wizard of Oz")
        }
    }

    #[test]
    fn build_request_maps_slots_and_year_window() {
        let executor = SearchExecutor::new(
            client("http://localhost:1".to_string()),
            vec!["Hollywood Studio System".to_string()],
        );
        let strategy = strategy(
            ConfidenceTier::High,
            KeywordSlots::pair("L. Frank Baum", "The Wizard of Oz"),
        );

        let request = executor.build_request(&strategy, &oz(), &Profile::built_in());

        assert_eq!(request.keyword, "L. Frank Baum");
        assert_eq!(request.second_keyword.as_deref(), Some("The Wizard of Oz"));
        assert_eq!(request.third_keyword, None);
        assert_eq!(request.year_start, Some(1938));
        assert_eq!(request.year_end, Some(1940));
        assert_eq!(request.collections, vec!["Hollywood Studio System"]);
    }

    #[test]
    fn build_request_omits_year_window_without_film_year() {
        let executor = SearchExecutor::new(client("http://localhost:1".to_string()), Vec::new());
        let strategy = strategy(ConfidenceTier::High, KeywordSlots::single("Stagecoach"));
        let film = FilmRecord::titled("Stagecoach");

        let request = executor.build_request(&strategy, &film, &Profile::built_in());

        assert_eq!(request.year_start, None);
        assert_eq!(request.year_end, None);
    }

    #[tokio::test]
    async fn execute_returns_items_on_success() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "items": [{ "id": "variety137-1939-08_0054" }],
            "total_count": 1
        });
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("keyword", "\"The Wizard of Oz\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let executor = SearchExecutor::new(client(server.uri()), Vec::new());
        let strategy = strategy(
            ConfidenceTier::High,
            KeywordSlots::single("\"The Wizard of Oz\""),
        );

        let items = executor.execute(&strategy, &oz(), &Profile::built_in()).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "variety137-1939-08_0054");
    }

    #[tokio::test]
    async fn execute_tolerates_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let executor = SearchExecutor::new(client(server.uri()), Vec::new());
        let strategy = strategy(
            ConfidenceTier::High,
            KeywordSlots::single("\"The Wizard of Oz\""),
        );

        let items = executor.execute(&strategy, &oz(), &Profile::built_in()).await;

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn execute_tolerates_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>surprise</html>"))
            .mount(&server)
            .await;

        let executor = SearchExecutor::new(client(server.uri()), Vec::new());
        let strategy = strategy(
            ConfidenceTier::High,
            KeywordSlots::single("\"The Wizard of Oz\""),
        );

        let items = executor.execute(&strategy, &oz(), &Profile::built_in()).await;

        assert!(items.is_empty());
    }
}
