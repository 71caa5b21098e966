//! The dashboard's reads and writes, cached per resource. Writes invalidate the reads they
//! affect so that the next view shows the backend's new state.

use std::sync::Arc;

use analytics_api_caller::{
    json::{
        CameraId,
        camera::{Camera, CameraUpdate},
        demographics::{DemographicsConfig, DemographicsResults},
        page::Page,
        tag::Tag,
    },
    query::{CameraListQuery, DemographicsQuery},
    traits::AnalyticsApi,
};

use crate::{
    demographics::form::DemographicsConfigSubmission,
    query_cache::{QueryCache, QueryCacheConfig, QueryError},
};

pub struct DashboardQueries {
    api: Arc<dyn AnalyticsApi>,
    camera_pages: QueryCache<CameraListQuery, Page<Camera>>,
    cameras: QueryCache<CameraId, Camera>,
    tags: QueryCache<(), Vec<Tag>>,
    demographics: QueryCache<DemographicsQuery, DemographicsResults>,
}

impl DashboardQueries {
    pub fn new(api: Arc<dyn AnalyticsApi>, config: QueryCacheConfig) -> Self {
        Self {
            api,
            camera_pages: QueryCache::new("camera_pages", config),
            cameras: QueryCache::new("cameras", config),
            tags: QueryCache::new("tags", config),
            demographics: QueryCache::new("demographics", config),
        }
    }

    pub async fn check_connection(&self) -> anyhow::Result<()> {
        self.api.test_call().await
    }

    pub async fn camera_page(
        &self,
        query: CameraListQuery,
    ) -> Result<Arc<Page<Camera>>, QueryError> {
        let api = self.api.clone();
        let request = query.clone();
        self.camera_pages
            .fetch(query, move || {
                let api = api.clone();
                let request = request.clone();
                async move { api.cameras(&request).await }
            })
            .await
    }

    pub async fn camera(&self, id: CameraId) -> Result<Arc<Camera>, QueryError> {
        let api = self.api.clone();
        self.cameras
            .fetch(id, move || {
                let api = api.clone();
                async move { api.camera(id).await }
            })
            .await
    }

    pub async fn tags(&self) -> Result<Arc<Vec<Tag>>, QueryError> {
        let api = self.api.clone();
        self.tags
            .fetch((), move || {
                let api = api.clone();
                async move { api.tags().await }
            })
            .await
    }

    pub async fn demographics_results(
        &self,
        query: DemographicsQuery,
    ) -> Result<Arc<DemographicsResults>, QueryError> {
        let api = self.api.clone();
        let request = query.clone();
        self.demographics
            .fetch(query, move || {
                let api = api.clone();
                let request = request.clone();
                async move { api.demographics_results(&request).await }
            })
            .await
    }

    /// Stores the updated camera as the cached value and drops every cached camera page
    pub async fn update_camera(
        &self,
        id: CameraId,
        update: &CameraUpdate,
    ) -> anyhow::Result<Arc<Camera>> {
        let camera = self.api.update_camera(id, update).await?;
        let camera = self.cameras.set(id, camera);
        self.camera_pages.invalidate_all();
        Ok(camera)
    }

    /// Drops the camera, every camera page and the camera's demographics results from the cache
    pub async fn save_demographics_config(
        &self,
        submission: &DemographicsConfigSubmission,
    ) -> anyhow::Result<DemographicsConfig> {
        let config = match submission {
            DemographicsConfigSubmission::Create(payload) => {
                self.api.create_demographics_config(payload).await?
            }
            DemographicsConfigSubmission::Update { id, payload } => {
                self.api.update_demographics_config(*id, payload).await?
            }
        };

        let camera_id = submission.payload().camera_id;
        self.cameras.invalidate(&camera_id);
        self.camera_pages.invalidate_all();
        self.demographics
            .invalidate_where(|query| query.camera_id == camera_id);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        cameras::tests::make_camera,
        demographics::form::DemographicsConfigForm,
    };
    use analytics_api_caller::json::demographics::DemographicsConfigPayload;
    use mocks::analytics_api::{MockAnalyticsApi, make_analytics_client_mock};

    fn long_lived() -> QueryCacheConfig {
        QueryCacheConfig {
            stale_time: Duration::from_secs(3600),
            retries: 0,
            retry_delay: Duration::ZERO,
        }
    }

    fn make_queries(api: MockAnalyticsApi) -> DashboardQueries {
        DashboardQueries::new(Arc::new(api), long_lived())
    }

    fn page_of(cameras: Vec<Camera>) -> Page<Camera> {
        let total = u64::try_from(cameras.len()).unwrap();
        Page {
            items: cameras,
            total,
            page: 1,
            size: 10,
            pages: 1,
        }
    }

    fn config_from(id: i64, payload: &DemographicsConfigPayload) -> DemographicsConfig {
        DemographicsConfig {
            id,
            camera_id: payload.camera_id,
            track_history_max_length: payload.track_history_max_length,
            exit_threshold: payload.exit_threshold,
            min_track_duration: payload.min_track_duration,
            detection_confidence_threshold: payload.detection_confidence_threshold,
            demographics_confidence_threshold: payload.demographics_confidence_threshold,
            min_track_updates: payload.min_track_updates,
            box_area_threshold: payload.box_area_threshold,
            save_interval: payload.save_interval,
            frame_skip_interval: payload.frame_skip_interval,
        }
    }

    #[tokio::test]
    async fn reads_are_cached() {
        let mut api = make_analytics_client_mock();
        api.expect_camera()
            .times(1)
            .returning(|id| Ok(make_camera(id, "Lobby", &[], true)));
        api.expect_tags().times(1).returning(|| Ok(vec![]));

        let queries = make_queries(api);
        assert_eq!(queries.camera(3).await.unwrap().name, "Lobby");
        assert_eq!(queries.camera(3).await.unwrap().id, 3);
        assert!(queries.tags().await.unwrap().is_empty());
        assert!(queries.tags().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_errors_reach_the_caller() {
        let mut api = make_analytics_client_mock();
        api.expect_camera()
            .times(2)
            .returning(|id| Err(anyhow::anyhow!("camera {id} is gone")));

        let queries = make_queries(api);
        let err = queries.camera(8).await.unwrap_err();
        assert_eq!(err.to_string(), "camera 8 is gone");
        // Not cached, so the second read asks again
        queries.camera(8).await.unwrap_err();
    }

    #[tokio::test]
    async fn updating_a_camera_primes_it_and_drops_pages() {
        let mut api = make_analytics_client_mock();
        api.expect_cameras()
            .times(2)
            .returning(|_| Ok(page_of(vec![make_camera(1, "Lobby", &[], true)])));
        api.expect_update_camera()
            .times(1)
            .withf(|id, update| *id == 1 && update.name.as_deref() == Some("Entrance"))
            .returning(|id, _| Ok(make_camera(id, "Entrance", &[], true)));
        api.expect_camera().times(0);

        let queries = make_queries(api);
        let query = CameraListQuery::new(1, 10);
        queries.camera_page(query.clone()).await.unwrap();
        queries.camera_page(query.clone()).await.unwrap();

        let update = CameraUpdate {
            name: Some("Entrance".to_string()),
            ..CameraUpdate::default()
        };
        let updated = queries.update_camera(1, &update).await.unwrap();
        assert_eq!(updated.name, "Entrance");

        assert_eq!(queries.camera(1).await.unwrap().name, "Entrance");
        queries.camera_page(query).await.unwrap();
    }

    #[tokio::test]
    async fn failed_update_keeps_the_cache() {
        let mut api = make_analytics_client_mock();
        api.expect_cameras()
            .times(1)
            .returning(|_| Ok(page_of(vec![])));
        api.expect_update_camera()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("422 Unprocessable Entity")));

        let queries = make_queries(api);
        let query = CameraListQuery::new(1, 10);
        queries.camera_page(query.clone()).await.unwrap();
        queries
            .update_camera(1, &CameraUpdate::default())
            .await
            .unwrap_err();
        queries.camera_page(query).await.unwrap();
    }

    #[tokio::test]
    async fn creating_a_config_drops_the_cameras_reads() {
        let mut api = make_analytics_client_mock();
        api.expect_camera()
            .times(2)
            .returning(|id| Ok(make_camera(id, "Lobby", &[], true)));
        api.expect_cameras()
            .times(2)
            .returning(|_| Ok(page_of(vec![])));
        api.expect_demographics_results()
            .times(3)
            .returning(|_| Ok(DemographicsResults::default()));
        api.expect_create_demographics_config()
            .times(1)
            .withf(|payload| payload.camera_id == 4)
            .returning(|payload| Ok(config_from(77, payload)));

        let queries = make_queries(api);
        let page_query = CameraListQuery::new(1, 10);
        let this_camera = DemographicsQuery::for_camera(4);
        let other_camera = DemographicsQuery::for_camera(5);

        queries.camera(4).await.unwrap();
        queries.camera_page(page_query.clone()).await.unwrap();
        queries.demographics_results(this_camera.clone()).await.unwrap();
        queries.demographics_results(other_camera.clone()).await.unwrap();

        let camera = make_camera(4, "Lobby", &[], true);
        let submission =
            DemographicsConfigSubmission::for_camera(&camera, &DemographicsConfigForm::default())
                .unwrap();
        let config = queries.save_demographics_config(&submission).await.unwrap();
        assert_eq!(config.id, 77);

        queries.camera(4).await.unwrap();
        queries.camera_page(page_query).await.unwrap();
        queries.demographics_results(this_camera).await.unwrap();
        // Another camera's results stay cached
        queries.demographics_results(other_camera).await.unwrap();
    }

    #[tokio::test]
    async fn updating_a_config_uses_its_id() {
        let mut api = make_analytics_client_mock();
        api.expect_update_demographics_config()
            .times(1)
            .withf(|id, payload| *id == 42 && payload.save_interval == 900)
            .returning(|id, payload| Ok(config_from(id, payload)));
        api.expect_create_demographics_config().times(0);

        let queries = make_queries(api);
        let payload = DemographicsConfigForm {
            save_interval: "900".to_string(),
            ..DemographicsConfigForm::default()
        }
        .validate(4)
        .unwrap();
        let submission = DemographicsConfigSubmission::Update { id: 42, payload };
        let config = queries.save_demographics_config(&submission).await.unwrap();
        assert_eq!(config.id, 42);
        assert_eq!(config.save_interval, 900);
    }
}
