use std::sync::Once;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output profile for `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines at `runctx=debug`
    Development,
    /// JSON lines at `runctx=info`
    Production,
    /// No output; tests install their own capture layer
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "runctx=debug",
            Profile::Production | Profile::Test => "runctx=info",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INIT: Once = Once::new();

/// Install the process-wide subscriber
///
/// Only the first call has any effect.
pub fn init(profile: Profile) {
    INIT.call_once(|| match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_env_filter(profile.filter())
            .with_target(false)
            .init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(profile.filter())
            .init(),
        Profile::Test => tracing_subscriber::registry().init(),
    });
}
