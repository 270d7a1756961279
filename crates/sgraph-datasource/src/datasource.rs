//! Query executor: routes each target to constant or history mode.

use crate::error::{DataSourceError, DataSourceResult};
use crate::health::HealthCheckResult;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use sgraph_common::Result;
use sgraph_config::{Config, ConfigValidator, DataSourceSettings, QueryConfig, QueryMode};
use sgraph_series::{
    ConstantSeriesGenerator, FetchOptions, PlayHistoryAggregator, ScrobbleClient, SeriesTable,
    TimeRange,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Dashboard range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRange {
    /// Start, epoch milliseconds.
    pub from: i64,
    /// End, epoch milliseconds.
    pub to: i64,
}

/// A query as issued by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Dashboard time range.
    pub range: QueryRange,
    /// Targets, answered in order.
    pub targets: Vec<QueryConfig>,
}

impl QueryRequest {
    /// A request over `[from_ms, to_ms]`.
    pub fn new(from_ms: i64, to_ms: i64, targets: Vec<QueryConfig>) -> Self {
        Self {
            range: QueryRange {
                from: from_ms,
                to: to_ms,
            },
            targets,
        }
    }
}

/// One table per target, in target order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    /// Result tables.
    pub data: Vec<SeriesTable>,
}

/// Scrobble data source bound to one endpoint.
#[derive(Debug)]
pub struct ScrobbleDataSource<Tz: TimeZone = Local> {
    settings: DataSourceSettings,
    client: ScrobbleClient,
    history: PlayHistoryAggregator<ScrobbleClient, Tz>,
}

impl ScrobbleDataSource<Local> {
    /// Validates settings and builds the HTTP client.
    pub fn new(settings: DataSourceSettings) -> Result<Self> {
        ConfigValidator::validate_datasource(&settings)?;
        let client = ScrobbleClient::new(&settings)?;
        let history = PlayHistoryAggregator::new(client.clone(), settings.day_keying);
        info!(base_url = %client.base_url(), keying = ?settings.day_keying, "Data source ready");
        Ok(Self {
            settings,
            client,
            history,
        })
    }

    /// Builds from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.datasource.clone())
    }
}

impl<Tz: TimeZone> ScrobbleDataSource<Tz> {
    /// Buckets plays on `timezone` instead of the local calendar.
    pub fn with_timezone<Tz2: TimeZone>(self, timezone: Tz2) -> ScrobbleDataSource<Tz2> {
        ScrobbleDataSource {
            settings: self.settings,
            client: self.client,
            history: self.history.with_timezone(timezone),
        }
    }

    /// Settings this data source was built from.
    pub fn settings(&self) -> &DataSourceSettings {
        &self.settings
    }

    fn fetch_options(&self, cancel: &CancellationToken) -> FetchOptions {
        self.client.fetch_options().with_cancel(cancel.child_token())
    }

    /// Runs every target of `request`.
    pub async fn query(&self, request: &QueryRequest) -> DataSourceResult<QueryResponse> {
        self.query_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Runs every target of `request`; cancelling `cancel` aborts the
    /// in-flight fetch. Targets run one after another and the first failure
    /// fails the query.
    #[instrument(skip(self, request, cancel), fields(targets = request.targets.len()))]
    pub async fn query_with_cancel(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> DataSourceResult<QueryResponse> {
        let range = TimeRange::from_millis(request.range.from, request.range.to)?;

        let mut data = Vec::with_capacity(request.targets.len());
        for target in &request.targets {
            let table = match target.mode() {
                QueryMode::Constant(constant) => {
                    debug!(ref_id = %target.ref_id, constant, "Constant target");
                    ConstantSeriesGenerator::generate(target.ref_id.clone(), &range, constant)
                }
                QueryMode::History(user) => {
                    debug!(ref_id = %target.ref_id, user = %user, "History target");
                    self.history
                        .daily_play_counts(target.ref_id.clone(), &user, &self.fetch_options(cancel))
                        .await
                        .map_err(|source| {
                            warn!(ref_id = %target.ref_id, error = %source, "Target failed");
                            DataSourceError::Target {
                                ref_id: target.ref_id.clone(),
                                source,
                            }
                        })?
                }
            };
            data.push(table);
        }

        Ok(QueryResponse { data })
    }

    /// Probes `{base_url}/info`; success only on HTTP 200.
    #[instrument(skip(self))]
    pub async fn test_datasource(&self) -> HealthCheckResult {
        let options = self.client.fetch_options();
        match self.client.check_info(&options).await {
            Ok(status) => {
                let result = HealthCheckResult::from_status(status);
                if result.is_success() {
                    info!("Connection test successful");
                } else {
                    warn!(status, "Connection test failed");
                }
                result
            }
            Err(e) => {
                warn!(error = %e, "Connection test failed");
                HealthCheckResult::failure()
            }
        }
    }
}
