use std::{process::ExitCode, sync::Arc};

use analytics_api_caller::{
    config::AnalyticsApiConfig,
    json::{
        CameraId,
        demographics::{DemographicsConfig, DemographicsResults},
    },
    make_analytics_client,
    query::CameraListQuery,
};
use logging::init_logging;
use options::run_options::{
    RunCommand, RunOptions, TagsCommand,
    cameras_options::{self, CameraListOptions, CameraUpdateOptions, CamerasCommand},
    demographics_options::{
        DemographicsCommand, DemographicsConfigureOptions, DemographicsResultsOptions,
    },
};

use crate::{
    cameras::{self, CameraFilter, CameraSort, SortField, SortOrder, form::CameraForm},
    config::DashboardConfig,
    demographics::{
        DemographicsFilter,
        distribution::DemographicsDistributions,
        form::{DemographicsConfigForm, DemographicsConfigSubmission},
    },
    forms::ValidationErrors,
    queries::DashboardQueries,
    query_cache::{QueryCacheConfig, QueryError},
    views::{
        View, ViewState, camera_detail::CameraDetailView, camera_detail::render_demographics_config,
        camera_list::CameraListView, controls::FilterControls, demographics::DemographicsView,
        invalid_input_message, render_json, tags::TagListView,
    },
};

/// `cameras list` pulls this many cameras in one request, then filters, sorts and pages locally
pub const CAMERA_FETCH_SIZE: u32 = 100;

impl From<cameras_options::SortField> for SortField {
    fn from(field: cameras_options::SortField) -> Self {
        match field {
            cameras_options::SortField::Id => SortField::Id,
            cameras_options::SortField::Name => SortField::Name,
            cameras_options::SortField::CreatedAt => SortField::CreatedAt,
        }
    }
}

impl From<&CameraListOptions> for CameraSort {
    fn from(options: &CameraListOptions) -> Self {
        Self {
            field: options.sort.into(),
            order: if options.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
        }
    }
}

impl From<&CameraUpdateOptions> for CameraForm {
    fn from(options: &CameraUpdateOptions) -> Self {
        Self {
            name: options.name.clone(),
            rtsp_url: options.rtsp_url.clone(),
            stream_fps: options.fps.clone(),
            stream_width: options.width.clone(),
            stream_height: options.height.clone(),
            stream_bitrate: options.bitrate.clone(),
            stream_encoding: options.encoding.clone(),
            is_active: options.active.clone(),
            tag_ids: options.tags.clone(),
        }
    }
}

impl From<&DemographicsResultsOptions> for DemographicsFilter {
    fn from(options: &DemographicsResultsOptions) -> Self {
        Self {
            gender: options.gender.clone(),
            age: options.age.clone(),
            emotion: options.emotion.clone(),
            ethnicity: options.ethnicity.clone(),
            start_date: options.start.clone(),
            end_date: options.end.clone(),
        }
    }
}

/// Replaces the form's values with the ones given on the command line
fn apply_config_overrides(
    form: &mut DemographicsConfigForm,
    options: &DemographicsConfigureOptions,
) {
    let overrides = [
        (&mut form.track_history_max_length, &options.track_history_max_length),
        (&mut form.exit_threshold, &options.exit_threshold),
        (&mut form.min_track_duration, &options.min_track_duration),
        (
            &mut form.detection_confidence_threshold,
            &options.detection_confidence_threshold,
        ),
        (
            &mut form.demographics_confidence_threshold,
            &options.demographics_confidence_threshold,
        ),
        (&mut form.min_track_updates, &options.min_track_updates),
        (&mut form.box_area_threshold, &options.box_area_threshold),
        (&mut form.save_interval, &options.save_interval),
        (&mut form.frame_skip_interval, &options.frame_skip_interval),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CommandError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("Nothing to update; provide at least one field")]
    EmptyUpdate,
    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl CommandError {
    /// What the error view shows
    fn view_message(&self) -> String {
        match self {
            CommandError::Invalid(errors) => invalid_input_message(errors),
            CommandError::Query(_) | CommandError::EmptyUpdate | CommandError::Other(_) => {
                self.to_string()
            }
        }
    }
}

/// A command's output, already rendered by its own view
struct RenderedView(String);

impl View for RenderedView {
    fn render(&self) -> String {
        self.0.clone()
    }
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub default_page_size: u32,
    pub json: bool,
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

#[derive(serde::Serialize)]
struct DemographicsJson<'a> {
    results: &'a DemographicsResults,
    distributions: &'a DemographicsDistributions,
}

pub async fn run(options: RunOptions) -> anyhow::Result<ExitCode> {
    init_logging();

    let config = DashboardConfig::from_file(&options.config_file_path)?.with_env_overrides()?;
    tracing::debug!("Using API at {}", config.api_base_url());

    let api = make_analytics_client(AnalyticsApiConfig::from(&config))?;
    let queries = DashboardQueries::new(Arc::from(api), QueryCacheConfig::from(&config));
    let settings = RunSettings {
        default_page_size: config.default_page_size(),
        json: options.json,
    };

    let output = execute(&queries, settings, &options.command).await;
    print!("{}", output.text);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs one command and renders its view. Failures are rendered too, as an error view.
pub async fn execute(
    queries: &DashboardQueries,
    settings: RunSettings,
    command: &RunCommand,
) -> CommandOutput {
    let result = match command {
        RunCommand::Cameras(CamerasCommand::List(options)) => {
            list_cameras(queries, settings, options).await
        }
        RunCommand::Cameras(CamerasCommand::Show(options)) => {
            show_camera(queries, settings, options.camera_id).await
        }
        RunCommand::Cameras(CamerasCommand::Update(options)) => {
            update_camera(queries, settings, options).await
        }
        RunCommand::Tags(TagsCommand::List) => list_tags(queries, settings).await,
        RunCommand::Demographics(DemographicsCommand::Configure(options)) => {
            configure_demographics(queries, settings, options).await
        }
        RunCommand::Demographics(DemographicsCommand::Results(options)) => {
            demographics_results(queries, settings, options).await
        }
        RunCommand::Check => check_connection(queries).await,
    };

    let state = ViewState::from_result(result.map(RenderedView).map_err(|e| {
        tracing::error!("Command failed: {e}");
        e.view_message()
    }));
    CommandOutput {
        text: state.render(),
        success: state.is_ready(),
    }
}

async fn list_cameras(
    queries: &DashboardQueries,
    settings: RunSettings,
    options: &CameraListOptions,
) -> Result<String, CommandError> {
    let page_size = options.size.unwrap_or(settings.default_page_size);

    let query = CameraListQuery {
        camera_name: options.name.clone(),
        ..CameraListQuery::new(1, CAMERA_FETCH_SIZE)
    };
    let fetched = queries.camera_page(query).await?;
    if fetched.total > u64::try_from(fetched.items.len()).unwrap_or(u64::MAX) {
        tracing::warn!(
            "Only the first {} of {} cameras are listed",
            fetched.items.len(),
            fetched.total
        );
    }

    let mut filter_controls =
        FilterControls::new(CameraFilter::default(), |filter: &CameraFilter| {
            tracing::trace!("Camera filter: {filter:?}");
        });
    filter_controls.set_name(options.name.clone());
    filter_controls.set_tag_ids(options.tag_ids.clone());
    filter_controls.set_active(options.active);
    let filter = filter_controls.into_filter();

    let list = cameras::apply(
        &fetched.items,
        &filter,
        CameraSort::from(options),
        options.page,
        page_size,
    );

    if settings.json {
        Ok(render_json(&list)?)
    } else {
        Ok(CameraListView::new(list).render())
    }
}

async fn show_camera(
    queries: &DashboardQueries,
    settings: RunSettings,
    camera_id: CameraId,
) -> Result<String, CommandError> {
    let camera = queries.camera(camera_id).await?;
    if settings.json {
        Ok(render_json(camera.as_ref())?)
    } else {
        Ok(CameraDetailView::new(&camera).render())
    }
}

async fn update_camera(
    queries: &DashboardQueries,
    settings: RunSettings,
    options: &CameraUpdateOptions,
) -> Result<String, CommandError> {
    let update = CameraForm::from(options).validate()?;
    if update.is_empty() {
        return Err(CommandError::EmptyUpdate);
    }

    let camera = queries.update_camera(options.camera_id, &update).await?;
    tracing::info!("Updated camera {}", camera.id);

    if settings.json {
        Ok(render_json(camera.as_ref())?)
    } else {
        Ok(format!(
            "Updated camera #{}\n\n{}",
            camera.id,
            CameraDetailView::new(&camera).render()
        ))
    }
}

async fn list_tags(
    queries: &DashboardQueries,
    settings: RunSettings,
) -> Result<String, CommandError> {
    let tags = queries.tags().await?;
    if settings.json {
        Ok(render_json(tags.as_slice())?)
    } else {
        Ok(TagListView::new(&tags).render())
    }
}

async fn configure_demographics(
    queries: &DashboardQueries,
    settings: RunSettings,
    options: &DemographicsConfigureOptions,
) -> Result<String, CommandError> {
    let camera = queries.camera(options.camera_id).await?;

    let mut form = DemographicsConfigForm::for_camera(&camera);
    apply_config_overrides(&mut form, options);
    let submission = DemographicsConfigSubmission::for_camera(&camera, &form)?;

    let config = queries.save_demographics_config(&submission).await?;
    let action = match submission {
        DemographicsConfigSubmission::Create(_) => "Created",
        DemographicsConfigSubmission::Update { .. } => "Updated",
    };
    tracing::info!(
        "{action} demographics configuration {} of camera {}",
        config.id,
        config.camera_id
    );

    if settings.json {
        Ok(render_json(&config)?)
    } else {
        Ok(render_saved_config(action, &config))
    }
}

fn render_saved_config(action: &str, config: &DemographicsConfig) -> String {
    format!(
        "{action} demographics configuration of camera #{}\n\n{}",
        config.camera_id,
        render_demographics_config(Some(config))
    )
}

async fn demographics_results(
    queries: &DashboardQueries,
    settings: RunSettings,
    options: &DemographicsResultsOptions,
) -> Result<String, CommandError> {
    let query = DemographicsFilter::from(options).to_query(options.camera_id)?;
    let results = queries.demographics_results(query.clone()).await?;
    let distributions = DemographicsDistributions::from_results(&results);

    if settings.json {
        Ok(render_json(&DemographicsJson {
            results: &results,
            distributions: &distributions,
        })?)
    } else {
        Ok(DemographicsView::new(&query, results.items.len(), &distributions).render())
    }
}

async fn check_connection(queries: &DashboardQueries) -> Result<String, CommandError> {
    queries.check_connection().await?;
    Ok("Connection to the API is working\n".to_string())
}
