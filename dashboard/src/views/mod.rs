//! Text renderings of the dashboard's views. A view maps already-fetched data onto lines of
//! output; it never fetches anything itself.

pub mod camera_detail;
pub mod camera_list;
pub mod controls;
pub mod demographics;
pub mod tags;

use std::fmt::{Display, Write};

use crate::forms::ValidationErrors;

pub const SKELETON_ROWS: usize = 5;
const SKELETON_ROW_WIDTH: usize = 48;
const SKELETON_CHAR: char = '░';

pub trait View {
    fn render(&self) -> String;
}

/// Where a view is in its fetch
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl<T: View> View for ViewState<T> {
    fn render(&self) -> String {
        match self {
            ViewState::Loading => render_skeleton(SKELETON_ROWS),
            ViewState::Failed(message) => render_error(message),
            ViewState::Ready(view) => view.render(),
        }
    }
}

/// Placeholder rows shown while data is on its way
#[must_use]
pub fn render_skeleton(rows: usize) -> String {
    let row = SKELETON_CHAR.to_string().repeat(SKELETON_ROW_WIDTH);
    (0..rows).map(|_| format!("{row}\n")).collect()
}

fn render_error(message: &str) -> String {
    format!("Error: {message}\n")
}

/// Error message with one line per invalid field
#[must_use]
pub fn invalid_input_message(errors: &ValidationErrors) -> String {
    let mut message = "invalid input".to_string();
    for error in errors.iter() {
        let _ = write!(message, "\n  {error}");
    }
    message
}

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    Ok(json)
}
