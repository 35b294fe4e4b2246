//! The data source service: the thin adapter that binds the SLS model
//! onto the SDK's data and diagnostics services.
//!
//! Everything that actually talks to SLS lives behind the [`SlsBackend`]
//! trait. The adapter's whole job is resolving each incoming query and
//! the instance's connection settings, forwarding both to the transport
//! verbatim, and answering Grafana under the right `ref_id`.

use std::{convert::Infallible, fmt, sync::Arc};

use futures_util::stream::FuturesOrdered;
use grafana_plugin_sdk::{backend, data};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{
    QueryPayload, Settings, SettingsError, SlsInstanceSettings, SlsJsonData, SlsQuery,
    SlsSecureData,
};

/// The transport that actually talks to SLS.
///
/// The plugin resolves queries and connection settings and hands both
/// here unchanged; executing the query, authenticating to Aliyun and the
/// SLS wire protocol are entirely the implementation's concern. Frames
/// returned from [`query`](SlsBackend::query) are forwarded to Grafana
/// as-is.
#[backend::async_trait]
pub trait SlsBackend: Send + Sync + 'static {
    /// The error returned by the transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute one resolved query against the configured log store.
    async fn query(
        &self,
        settings: &Settings,
        payload: &QueryPayload,
    ) -> Result<Vec<data::Frame>, Self::Error>;

    /// Probe the configured log store.
    ///
    /// Backs the 'Save & Test' button on the configuration page: the
    /// probe should fail if the log store cannot be reached with the
    /// given settings.
    async fn check_store(&self, settings: &Settings) -> Result<(), Self::Error>;
}

/// An error answering a single query.
///
/// Carries the `ref_id` of the failed query so Grafana can line the
/// error up with its panel.
#[derive(Debug, Error)]
pub enum QueryError<E> {
    /// The request carried no data source instance settings.
    #[error("missing data source instance settings for query {ref_id}")]
    MissingSettings {
        /// The failed query.
        ref_id: String,
    },
    /// The instance's connection settings could not be loaded.
    #[error("invalid data source settings for query {ref_id}: {source}")]
    Settings {
        /// Why the settings were rejected.
        source: SettingsError,
        /// The failed query.
        ref_id: String,
    },
    /// The transport failed to execute the query.
    #[error("error querying SLS for query {ref_id}: {source}")]
    Transport {
        /// The transport's error.
        source: E,
        /// The failed query.
        ref_id: String,
    },
    /// The transport returned a malformed frame.
    #[error("invalid frame returned for query {ref_id}: {source}")]
    Frame {
        /// The underlying frame error.
        source: data::Error,
        /// The failed query.
        ref_id: String,
    },
}

impl<E> backend::DataQueryError for QueryError<E>
where
    E: std::error::Error + 'static,
{
    fn ref_id(self) -> String {
        match self {
            Self::MissingSettings { ref_id }
            | Self::Settings { ref_id, .. }
            | Self::Transport { ref_id, .. }
            | Self::Frame { ref_id, .. } => ref_id,
        }
    }

    fn status(&self) -> backend::DataQueryStatus {
        match self {
            Self::MissingSettings { .. } | Self::Settings { .. } => {
                backend::DataQueryStatus::BadRequest
            }
            Self::Transport { .. } | Self::Frame { .. } => backend::DataQueryStatus::Internal,
        }
    }
}

/// A failed health check, collapsed to a message for Grafana.
#[derive(Debug, Error)]
enum HealthError<E> {
    #[error("missing data source instance settings")]
    MissingSettings,
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("error checking log store: {0}")]
    Store(E),
}

/// The Grafana data source for SLS.
///
/// Owns the transport and adapts it to the SDK: incoming queries are
/// deserialized as [`SlsQuery`], resolved into [`QueryPayload`]s, and
/// executed through the transport together with the instance's
/// [`Settings`]. Cloning is cheap and shares the transport, which is
/// what lets one value serve both the data and diagnostics services.
pub struct SlsDataSource<T> {
    transport: Arc<T>,
}

impl<T> SlsDataSource<T>
where
    T: SlsBackend,
{
    /// Create a data source that executes queries through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    async fn probe_store(
        &self,
        instance_settings: Option<&SlsInstanceSettings>,
    ) -> Result<(), HealthError<T::Error>> {
        let settings = match instance_settings {
            Some(source) => Settings::load(source)?,
            None => return Err(HealthError::MissingSettings),
        };
        info!(
            project = %settings.project,
            log_store = %settings.log_store,
            "Checking log store",
        );
        self.transport
            .check_store(&settings)
            .await
            .map_err(HealthError::Store)
    }
}

impl<T> Clone for SlsDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> fmt::Debug for SlsDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlsDataSource").finish_non_exhaustive()
    }
}

// `derive(GrafanaPlugin)` does not support type parameters, so the impl
// is spelled out.
impl<T> backend::GrafanaPlugin for SlsDataSource<T> {
    type PluginType = backend::DataSourcePlugin<Self::JsonData, Self::SecureJsonData>;
    type JsonData = SlsJsonData;
    type SecureJsonData = SlsSecureData;
}

#[backend::async_trait]
impl<T> backend::DataService for SlsDataSource<T>
where
    T: SlsBackend,
{
    type Query = SlsQuery;
    type QueryError = QueryError<T::Error>;
    type Stream = backend::BoxDataResponseStream<Self::QueryError>;

    async fn query_data(
        &self,
        request: backend::QueryDataRequest<Self::Query, Self>,
    ) -> Self::Stream {
        let instance_settings = request.plugin_context.instance_settings;
        Box::pin(
            request
                .queries
                .into_iter()
                .map(|query| {
                    let transport = Arc::clone(&self.transport);
                    let instance_settings = instance_settings.clone();
                    async move {
                        let settings = load_settings(instance_settings.as_ref(), &query.ref_id)?;
                        let payload = QueryPayload::from_query(&query);
                        debug!(
                            ref_id = %query.ref_id,
                            project = %settings.project,
                            log_store = %settings.log_store,
                            "Dispatching query to SLS",
                        );
                        let frames = transport.query(&settings, &payload).await.map_err(
                            |source| QueryError::Transport {
                                source,
                                ref_id: query.ref_id.clone(),
                            },
                        )?;
                        let checked = frames
                            .iter()
                            .map(data::Frame::check)
                            .collect::<Result<Vec<_>, _>>()
                            .map_err(|source| QueryError::Frame {
                                source,
                                ref_id: query.ref_id.clone(),
                            })?;
                        Ok(backend::DataResponse::new(query.ref_id, checked))
                    }
                })
                .collect::<FuturesOrdered<_>>(),
        )
    }
}

fn load_settings<E>(
    instance_settings: Option<&SlsInstanceSettings>,
    ref_id: &str,
) -> Result<Settings, QueryError<E>> {
    let source = instance_settings.ok_or_else(|| QueryError::MissingSettings {
        ref_id: ref_id.to_string(),
    })?;
    Settings::load(source).map_err(|source| QueryError::Settings {
        source,
        ref_id: ref_id.to_string(),
    })
}

#[backend::async_trait]
impl<T> backend::DiagnosticsService for SlsDataSource<T>
where
    T: SlsBackend,
{
    type CheckHealthError = Infallible;

    async fn check_health(
        &self,
        request: backend::CheckHealthRequest<Self>,
    ) -> Result<backend::CheckHealthResponse, Self::CheckHealthError> {
        let instance_settings = request.plugin_context.instance_settings;
        Ok(match self.probe_store(instance_settings.as_ref()).await {
            Ok(()) => backend::CheckHealthResponse::ok("Data source is working".to_string()),
            Err(error) => backend::CheckHealthResponse::error(error.to_string()),
        })
    }

    type CollectMetricsError = Infallible;

    async fn collect_metrics(
        &self,
        _request: backend::CollectMetricsRequest<Self>,
    ) -> Result<backend::CollectMetricsResponse, Self::CollectMetricsError> {
        // No custom metrics are exposed.
        Ok(backend::CollectMetricsResponse::new(None))
    }
}
