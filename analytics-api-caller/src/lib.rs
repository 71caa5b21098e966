pub mod config;
pub mod error;
pub mod json;
pub mod query;
pub mod traits;

use async_trait::async_trait;
use config::AnalyticsApiConfig;
use error::ApiCallError;
use json::{
    CameraId, DemographicsConfigId,
    camera::{Camera, CameraUpdate},
    demographics::{DemographicsConfig, DemographicsConfigPayload, DemographicsResults},
    page::Page,
    tag::Tag,
};
use query::{CameraListQuery, DemographicsQuery};
use serde::de::DeserializeOwned;
use tap::TapFallible;
use traits::AnalyticsApi;

pub fn make_analytics_client(config: AnalyticsApiConfig) -> anyhow::Result<Box<dyn AnalyticsApi>> {
    let builder = reqwest::ClientBuilder::new().timeout(config.request_timeout);
    let client = match &config.api_proxy {
        Some(proxy) => builder
            .proxy(
                reqwest::Proxy::all(proxy)
                    .map_err(|e| anyhow::anyhow!("Invalid proxy URL `{proxy}`: {e}"))?,
            )
            .build()?,
        None => builder.build()?,
    };

    let result = AnalyticsApiClient { client, config };

    Ok(Box::new(result))
}

struct AnalyticsApiClient {
    client: reqwest::Client,
    config: AnalyticsApiConfig,
}

impl AnalyticsApiClient {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .headers(json_headers_map())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> anyhow::Result<T> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().to_string();

        tracing::trace!("Sending request: {method} {url}");

        let response = self
            .client
            .execute(request)
            .await
            .tap_err(|e| tracing::warn!("Request {method} {url} failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiCallError::UnexpectedStatus {
                method,
                url,
                status,
                body,
            }
            .into());
        }

        let result = response.json::<T>().await?;
        Ok(result)
    }
}

#[async_trait]
impl AnalyticsApi for AnalyticsApiClient {
    async fn test_call(&self) -> anyhow::Result<()> {
        let request = self.request(reqwest::Method::GET, "tags/");
        let tags = self.execute::<Vec<Tag>>(request).await.map_err(|e| {
            anyhow::anyhow!(
                "Test request failed. Perhaps the base URL `{}` is invalid: {e}",
                self.config.api_base_url
            )
        })?;

        tracing::debug!("API test call succeeded with {} tags", tags.len());

        Ok(())
    }

    async fn cameras(&self, query: &CameraListQuery) -> anyhow::Result<Page<Camera>> {
        let request = self
            .request(reqwest::Method::GET, "cameras/")
            .query(&query.query_pairs());
        let result = self.execute::<Page<Camera>>(request).await?;

        tracing::debug!(
            "Call `cameras` with {query:?} returned {} of {} cameras",
            result.items.len(),
            result.total
        );

        Ok(result)
    }

    async fn camera(&self, id: CameraId) -> anyhow::Result<Camera> {
        let request = self.request(reqwest::Method::GET, &format!("cameras/{id}"));
        let result = self.execute::<Camera>(request).await?;

        tracing::debug!("Call `camera` with id {id} with response: {:?}", result);

        Ok(result)
    }

    async fn update_camera(&self, id: CameraId, update: &CameraUpdate) -> anyhow::Result<Camera> {
        let request = self
            .request(reqwest::Method::PUT, &format!("cameras/{id}"))
            .json(update);
        let result = self.execute::<Camera>(request).await?;

        tracing::debug!("Call `update_camera` with id {id} with response: {:?}", result);

        Ok(result)
    }

    async fn tags(&self) -> anyhow::Result<Vec<Tag>> {
        let request = self.request(reqwest::Method::GET, "tags/");
        let result = self.execute::<Vec<Tag>>(request).await?;

        tracing::debug!("Call `tags` returned {} tags", result.len());

        Ok(result)
    }

    async fn create_demographics_config(
        &self,
        payload: &DemographicsConfigPayload,
    ) -> anyhow::Result<DemographicsConfig> {
        let request = self
            .request(reqwest::Method::POST, "demographics/config")
            .json(payload);
        let result = self.execute::<DemographicsConfig>(request).await?;

        tracing::debug!(
            "Call `create_demographics_config` for camera {} with response: {:?}",
            payload.camera_id,
            result
        );

        Ok(result)
    }

    async fn update_demographics_config(
        &self,
        id: DemographicsConfigId,
        payload: &DemographicsConfigPayload,
    ) -> anyhow::Result<DemographicsConfig> {
        let request = self
            .request(reqwest::Method::PUT, &format!("demographics/config/{id}"))
            .json(payload);
        let result = self.execute::<DemographicsConfig>(request).await?;

        tracing::debug!(
            "Call `update_demographics_config` with id {id} with response: {:?}",
            result
        );

        Ok(result)
    }

    async fn demographics_results(
        &self,
        query: &DemographicsQuery,
    ) -> anyhow::Result<DemographicsResults> {
        let request = self
            .request(reqwest::Method::GET, "demographics/results")
            .query(&query.query_pairs());
        let result = self.execute::<DemographicsResults>(request).await?;

        tracing::debug!(
            "Call `demographics_results` with {query:?} returned {} results",
            result.items.len()
        );

        Ok(result)
    }
}

fn json_headers_map() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers
}
