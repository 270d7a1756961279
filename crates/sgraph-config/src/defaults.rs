//! Default values assigned at construction.

use crate::schema::*;
use sgraph_common::RefId;

/// Endpoint used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Request deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Idle connections kept per host.
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 4;

/// Value emitted by a constant-mode query that sets none.
pub const DEFAULT_CONSTANT: f64 = 6.5;

/// Ref id given to targets that arrive without one.
pub const DEFAULT_REF_ID: &str = "A";

impl Default for Config {
    fn default() -> Self {
        Self {
            datasource: DataSourceSettings::default(),
            logging: LogSettings::default(),
        }
    }
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            day_keying: DayKeying::default(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            ref_id: RefId::from(DEFAULT_REF_ID),
            query_text: None,
            constant: DEFAULT_CONSTANT,
            user: String::new(),
        }
    }
}

impl DataSourceSettings {
    /// Settings for `base_url` with every other field defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request deadline.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the day grouping key.
    pub fn with_day_keying(mut self, day_keying: DayKeying) -> Self {
        self.day_keying = day_keying;
        self
    }
}
