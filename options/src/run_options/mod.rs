pub mod cameras_options;
pub mod demographics_options;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const DEFAULT_CONFIG_FILE_PATH: &str = "config.yaml";

#[derive(Parser, Clone, Debug)]
#[clap(name = "camdash", about = "Administrative dashboard for the camera analytics API")]
pub struct RunOptions {
    /// The path to the config file
    /// If not provided, the default value is used, config.yaml
    #[clap(long, short('c'), default_value_os = DEFAULT_CONFIG_FILE_PATH)]
    pub config_file_path: PathBuf,

    /// Print the fetched data as JSON instead of rendering a view
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: RunCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum RunCommand {
    /// Browse and edit cameras
    #[clap(subcommand)]
    Cameras(cameras_options::CamerasCommand),

    /// Browse tags
    #[clap(subcommand)]
    Tags(TagsCommand),

    /// Configure demographics detection and view its analytics
    #[clap(subcommand)]
    Demographics(demographics_options::DemographicsCommand),

    /// Test the connection to the API
    Check,
}

#[derive(Subcommand, Clone, Debug)]
pub enum TagsCommand {
    /// List all tags
    List,
}
