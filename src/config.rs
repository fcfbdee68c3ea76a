use std::path::PathBuf;
use std::time::Duration;

/// Automatic record polls on the status view before falling back to a
/// manual "check status" action.
pub const DEFAULT_POLL_RETRIES: u8 = 2;

/// Delay between automatic record polls on the status view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);

/// Delay before the single automatic payment re-check while waiting for the
/// provider webhook to land.
pub const DEFAULT_RECHECK_DELAY: Duration = Duration::from_secs(5);

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:4000";

/// Runtime configuration. The retry counts and delays are product-tuned
/// constants, overridable from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub cache_path: PathBuf,
    pub poll_retries: u8,
    pub poll_interval: Duration,
    pub recheck_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            cache_path: PathBuf::from(".visawiz/progress.json"),
            poll_retries: DEFAULT_POLL_RETRIES,
            poll_interval: DEFAULT_POLL_INTERVAL,
            recheck_delay: DEFAULT_RECHECK_DELAY,
        }
    }
}
