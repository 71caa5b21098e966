use analytics_api_caller::{
    json::{
        CameraId, DemographicsConfigId,
        camera::{Camera, CameraUpdate},
        demographics::{DemographicsConfig, DemographicsConfigPayload, DemographicsResults},
        page::Page,
        tag::Tag,
    },
    query::{CameraListQuery, DemographicsQuery},
    traits::AnalyticsApi,
};
use async_trait::async_trait;

#[must_use]
pub fn make_analytics_client_mock() -> MockAnalyticsApi {
    MockAnalyticsApi::new()
}

mockall::mock! {
    pub AnalyticsApi {}

    #[async_trait]
    impl AnalyticsApi for AnalyticsApi {
        async fn test_call(&self) -> anyhow::Result<()>;
        async fn cameras(&self, query: &CameraListQuery) -> anyhow::Result<Page<Camera>>;
        async fn camera(&self, id: CameraId) -> anyhow::Result<Camera>;
        async fn update_camera(&self, id: CameraId, update: &CameraUpdate) -> anyhow::Result<Camera>;
        async fn tags(&self) -> anyhow::Result<Vec<Tag>>;
        async fn create_demographics_config(
            &self,
            payload: &DemographicsConfigPayload,
        ) -> anyhow::Result<DemographicsConfig>;
        async fn update_demographics_config(
            &self,
            id: DemographicsConfigId,
            payload: &DemographicsConfigPayload,
        ) -> anyhow::Result<DemographicsConfig>;
        async fn demographics_results(
            &self,
            query: &DemographicsQuery,
        ) -> anyhow::Result<DemographicsResults>;
    }
}
