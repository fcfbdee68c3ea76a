use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::core::cache::ProgressCache;
use crate::core::wizard::WizardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A dismissable banner shown above the current screen.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            text: text.into(),
        }
    }
}

/// Shared application state passed by reference into every screen update.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub cache: ProgressCache,
    pub wizard: WizardState,
    pub notification: Option<Notification>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let api = Arc::new(
            ApiClient::new(config.api_base_url.clone()).expect("failed to build HTTP client"),
        );
        let cache = ProgressCache::new(config.cache_path.clone());
        let wizard = cache.load();
        Self {
            config,
            api,
            cache,
            wizard,
            notification: None,
        }
    }
}
