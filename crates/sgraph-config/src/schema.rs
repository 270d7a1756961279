//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use sgraph_common::{RefId, UserName};

/// Main configuration structure for an SGraph data source instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote endpoint settings.
    pub datasource: DataSourceSettings,
    /// Log output settings for the host process.
    pub logging: LogSettings,
}

/// Settings shared by every query against one scrobble endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceSettings {
    /// Endpoint root; `/tracks` and `/info` are resolved below it.
    pub base_url: String,
    /// Upper bound for one outbound request, in seconds.
    pub timeout_secs: u64,
    /// Idle connections kept per host by the HTTP client.
    pub max_idle_per_host: usize,
    /// How plays are grouped into days.
    pub day_keying: DayKeying,
}

/// Grouping key used when bucketing plays by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKeying {
    /// Year, month and day.
    #[default]
    CalendarDate,
    /// Month and day only: the same date in different years shares a bucket.
    DayOfMonth,
}

impl std::str::FromStr for DayKeying {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar_date" | "date" => Ok(Self::CalendarDate),
            "day_of_month" | "legacy" => Ok(Self::DayOfMonth),
            other => Err(format!("unknown day keying '{}'", other)),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level filter directive.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Optional log file.
    pub file: Option<String>,
}

/// One query target as entered by the user.
///
/// Missing fields take the documented defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Target identifier, echoed on the result table.
    pub ref_id: RefId,
    /// Free text shown in the editor; not interpreted.
    pub query_text: Option<String>,
    /// Value emitted in constant mode.
    pub constant: f64,
    /// Scrobbling user; a non-blank value selects history mode.
    pub user: String,
}

/// What a query target asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMode {
    /// Two-point series holding the constant.
    Constant(f64),
    /// Daily play counts for the user.
    History(UserName),
}

impl QueryConfig {
    /// Creates a query with defaults for everything but the ref id.
    pub fn new(ref_id: impl Into<RefId>) -> Self {
        Self {
            ref_id: ref_id.into(),
            ..Self::default()
        }
    }

    /// Sets the user, switching the target to history mode.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the constant used in constant mode.
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Resolves the mode this target runs in.
    pub fn mode(&self) -> QueryMode {
        match UserName::parse(&self.user) {
            Ok(user) => QueryMode::History(user),
            Err(_) => QueryMode::Constant(self.constant),
        }
    }
}
