//! HTTP client for the exploration REST API
//!
//! Plain GET requests with query-string filters. No retries and no caching;
//! the data cache owns what gets kept.

use super::query::{LibraryQuery, MediaQuery, QueryParams, SampleLookup, SampleQuery};
use super::MapDataSource;
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::filters::FilterOptionsCatalog;
use async_trait::async_trait;
use reqwest::Client;
use seabed_types::{
    BlockAnalytics, BlockId, ContractStatus, ContractType, ContractorId, ContractorRef,
    ContractorSummary, LibraryDocument, LookupValue, MapData, Media, Sample, Station,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// API client
pub struct HttpApiClient {
    http: Client,
    base_url: Url,
    default_timeout: Duration,
    media_timeout: Duration,
}

impl HttpApiClient {
    /// Create a client from configuration
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|source| ExplorerError::Transport {
                endpoint: "<client builder>".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            default_timeout: config.http_timeout,
            media_timeout: config.media_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL and attach parameters
    pub fn endpoint_url(&self, path: &str, params: &QueryParams) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ExplorerError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })?;
        params.apply_to(&mut url);
        Ok(url)
    }

    /// Make a GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let url = self.endpoint_url(path, params)?;
        let timeout = timeout.unwrap_or(self.default_timeout);
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| transport_error(path, timeout, source))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExplorerError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| transport_error(path, timeout, source))?;
        serde_json::from_str(&body).map_err(|source| ExplorerError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    pub async fn map_data(&self, params: &QueryParams) -> Result<MapData> {
        self.get("MapFilter/map-data", params, None).await
    }

    pub async fn contract_types(&self) -> Result<Vec<ContractType>> {
        self.get("MapFilter/contract-types", &QueryParams::new(), None)
            .await
    }

    pub async fn contract_statuses(&self) -> Result<Vec<ContractStatus>> {
        self.get("MapFilter/contract-statuses", &QueryParams::new(), None)
            .await
    }

    pub async fn sponsoring_states(&self) -> Result<Vec<String>> {
        let raw: Vec<LookupValue> = self
            .get("MapFilter/sponsoring-states", &QueryParams::new(), None)
            .await?;
        Ok(raw.iter().map(LookupValue::label).collect())
    }

    pub async fn contractual_years(&self) -> Result<Vec<i32>> {
        let raw: Vec<LookupValue> = self
            .get("MapFilter/contractual-years", &QueryParams::new(), None)
            .await?;
        Ok(raw.iter().filter_map(|v| v.key().parse().ok()).collect())
    }

    pub async fn stations(&self, params: &QueryParams) -> Result<Vec<Station>> {
        self.get("MapFilter/stations", params, None).await
    }

    /// Gallery media; aborts after the configured media timeout
    pub async fn gallery_media(&self, query: &MediaQuery) -> Result<Vec<Media>> {
        self.get("Gallery/media", &query.to_params(), Some(self.media_timeout))
            .await
    }

    pub async fn library_list(&self, query: &LibraryQuery) -> Result<Vec<LibraryDocument>> {
        self.get("library/list", &query.to_params(), None).await
    }

    pub async fn library_contractors(&self) -> Result<Vec<ContractorRef>> {
        self.get("library/contractors", &QueryParams::new(), None)
            .await
    }

    pub async fn library_themes(&self) -> Result<Vec<String>> {
        let raw: Vec<LookupValue> = self
            .get("library/themes", &QueryParams::new(), None)
            .await?;
        Ok(raw.iter().map(LookupValue::label).collect())
    }

    pub async fn sample_list(&self, query: &SampleQuery) -> Result<Vec<Sample>> {
        self.get("sample/list", &query.to_params(), None).await
    }

    pub async fn sample_lookup(&self, lookup: SampleLookup) -> Result<Vec<LookupValue>> {
        self.get(lookup.path(), &QueryParams::new(), None).await
    }
}

fn transport_error(path: &str, timeout: Duration, source: reqwest::Error) -> ExplorerError {
    if source.is_timeout() {
        ExplorerError::Timeout {
            endpoint: path.to_string(),
            seconds: timeout.as_secs(),
        }
    } else {
        ExplorerError::Transport {
            endpoint: path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl MapDataSource for HttpApiClient {
    async fn fetch_map_data(&self, params: &QueryParams) -> Result<MapData> {
        self.map_data(params).await
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptionsCatalog> {
        let (contract_types, contract_statuses, sponsoring_states, contractual_years) =
            tokio::try_join!(
                self.contract_types(),
                self.contract_statuses(),
                self.sponsoring_states(),
                self.contractual_years(),
            )?;
        Ok(FilterOptionsCatalog {
            contract_types,
            contract_statuses,
            sponsoring_states,
            contractual_years,
            contractors: Vec::new(),
        })
    }

    async fn fetch_contractor_summary(&self, id: ContractorId) -> Result<ContractorSummary> {
        self.get(
            &format!("Analytics/contractor-summary/{}", id),
            &QueryParams::new(),
            None,
        )
        .await
    }

    async fn fetch_block_analytics(&self, id: BlockId) -> Result<BlockAnalytics> {
        self.get(&format!("Analytics/block/{}", id), &QueryParams::new(), None)
            .await
    }
}
