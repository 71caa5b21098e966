use crate::{
    json::{
        CameraId, DemographicsConfigId,
        camera::{Camera, CameraUpdate},
        demographics::{DemographicsConfig, DemographicsConfigPayload, DemographicsResults},
        page::Page,
        tag::Tag,
    },
    query::{CameraListQuery, DemographicsQuery},
};
use async_trait::async_trait;

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Attempt a call to the API that only tests whether the API is reachable and healthy
    #[must_use]
    async fn test_call(&self) -> anyhow::Result<()>;

    #[must_use]
    async fn cameras(&self, query: &CameraListQuery) -> anyhow::Result<Page<Camera>>;

    #[must_use]
    async fn camera(&self, id: CameraId) -> anyhow::Result<Camera>;

    #[must_use]
    async fn update_camera(&self, id: CameraId, update: &CameraUpdate) -> anyhow::Result<Camera>;

    #[must_use]
    async fn tags(&self) -> anyhow::Result<Vec<Tag>>;

    #[must_use]
    async fn create_demographics_config(
        &self,
        payload: &DemographicsConfigPayload,
    ) -> anyhow::Result<DemographicsConfig>;

    #[must_use]
    async fn update_demographics_config(
        &self,
        id: DemographicsConfigId,
        payload: &DemographicsConfigPayload,
    ) -> anyhow::Result<DemographicsConfig>;

    #[must_use]
    async fn demographics_results(
        &self,
        query: &DemographicsQuery,
    ) -> anyhow::Result<DemographicsResults>;
}
