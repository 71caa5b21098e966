mod log_style;
pub mod tracing_utils;
mod utils;

use std::{io::IsTerminal, sync::Once};

use tracing_subscriber::EnvFilter;

pub use log_style::{LogStyle, LogStyleParseError, TextColoring, get_log_style_from_env};
pub use utils::{GetFromEnvError, get_from_env};

/// Selects the output format, see [`LogStyle::parse`]
pub const LOG_STYLE_ENV_VAR: &str = "LOG_STYLE";
const DEFAULT_LOG_FILTER: &str = "info";

static INIT_LOGGING: Once = Once::new();

/// Install the global subscriber. Logs go to stderr so that rendered views on stdout stay clean.
/// Calling this more than once is harmless.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let style = match get_log_style_from_env(LOG_STYLE_ENV_VAR) {
            Ok(style) => style.unwrap_or_default(),
            Err(e) => {
                eprintln!("Ignoring invalid {LOG_STYLE_ENV_VAR}: {e}");
                LogStyle::default()
            }
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        let result = match style {
            LogStyle::Json => builder.json().try_init(),
            LogStyle::Text(coloring) => {
                let ansi = match coloring {
                    TextColoring::On => true,
                    TextColoring::Off => false,
                    TextColoring::Auto => std::io::stderr().is_terminal(),
                };
                builder.with_ansi(ansi).try_init()
            }
        };

        if let Err(e) = result {
            eprintln!("Logging was already initialized elsewhere: {e}");
        }
    });
}
