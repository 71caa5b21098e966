use clap::{Parser, Subcommand};

#[derive(Subcommand, Clone, Debug)]
pub enum DemographicsCommand {
    /// Create or update the demographics configuration of a camera
    Configure(DemographicsConfigureOptions),
    /// Show demographics distributions of a camera
    Results(DemographicsResultsOptions),
}

/// Fields not provided keep the camera's current value, or the default for a new configuration.
/// Values are kept as entered; they are validated by the demographics form.
#[derive(Parser, Clone, Debug, Default)]
pub struct DemographicsConfigureOptions {
    pub camera_id: i64,

    #[clap(long)]
    pub track_history_max_length: Option<String>,

    #[clap(long)]
    pub exit_threshold: Option<String>,

    /// Seconds
    #[clap(long)]
    pub min_track_duration: Option<String>,

    #[clap(long)]
    pub detection_confidence_threshold: Option<String>,

    #[clap(long)]
    pub demographics_confidence_threshold: Option<String>,

    #[clap(long)]
    pub min_track_updates: Option<String>,

    #[clap(long)]
    pub box_area_threshold: Option<String>,

    /// Seconds
    #[clap(long)]
    pub save_interval: Option<String>,

    /// Seconds
    #[clap(long)]
    pub frame_skip_interval: Option<String>,
}

#[derive(Parser, Clone, Debug, Default)]
pub struct DemographicsResultsOptions {
    pub camera_id: i64,

    #[clap(long)]
    pub gender: Option<String>,

    /// Age group, e.g. 25-34 or 65+
    #[clap(long)]
    pub age: Option<String>,

    #[clap(long)]
    pub emotion: Option<String>,

    #[clap(long)]
    pub ethnicity: Option<String>,

    /// RFC 3339 timestamp, e.g. 2025-03-01T00:00:00Z
    #[clap(long)]
    pub start: Option<String>,

    /// RFC 3339 timestamp
    #[clap(long)]
    pub end: Option<String>,
}
