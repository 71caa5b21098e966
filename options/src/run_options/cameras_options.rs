use clap::{Parser, Subcommand, ValueEnum};

#[derive(Subcommand, Clone, Debug)]
pub enum CamerasCommand {
    /// List cameras, one page at a time
    List(CameraListOptions),
    /// Show a single camera with its tags and demographics configuration
    Show(CameraShowOptions),
    /// Edit a camera; only the provided fields are changed
    Update(CameraUpdateOptions),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    CreatedAt,
}

#[derive(Parser, Clone, Debug, Default)]
pub struct CameraListOptions {
    /// Page number, starting at 1
    #[clap(long, default_value_t = 1)]
    pub page: u32,

    /// Page size; the config's `default_page_size` if not provided
    #[clap(long)]
    pub size: Option<u32>,

    /// Only cameras whose name contains this text (case-insensitive)
    #[clap(long)]
    pub name: Option<String>,

    /// Only cameras carrying at least one of these tag ids
    #[clap(long = "tag")]
    pub tag_ids: Vec<i64>,

    /// Only active (true) or inactive (false) cameras
    #[clap(long)]
    pub active: Option<bool>,

    #[clap(long, value_enum, default_value_t = SortField::Id)]
    pub sort: SortField,

    /// Sort in descending order
    #[clap(long)]
    pub desc: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct CameraShowOptions {
    pub camera_id: i64,
}

/// Values are kept as entered; they are validated by the camera form
#[derive(Parser, Clone, Debug, Default)]
pub struct CameraUpdateOptions {
    pub camera_id: i64,

    #[clap(long)]
    pub name: Option<String>,

    #[clap(long)]
    pub rtsp_url: Option<String>,

    #[clap(long)]
    pub fps: Option<String>,

    #[clap(long)]
    pub width: Option<String>,

    #[clap(long)]
    pub height: Option<String>,

    /// kbps
    #[clap(long)]
    pub bitrate: Option<String>,

    /// h264, h265 or mjpeg
    #[clap(long)]
    pub encoding: Option<String>,

    #[clap(long)]
    pub active: Option<String>,

    /// Comma-separated tag ids, replacing the current tags. Pass an empty string to clear them.
    #[clap(long)]
    pub tags: Option<String>,
}
