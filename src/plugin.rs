//! Plugin registration.
//!
//! One value binds the whole plugin together: the data source (backed
//! by an [`SlsBackend`] transport), the per-instance config editor and
//! the per-session query editor, plus the serve entrypoint that speaks
//! the go-plugin protocol to Grafana.

use std::{fmt, io};

use grafana_plugin_sdk::backend;
use thiserror::Error;

use crate::{
    datasource::{SlsBackend, SlsDataSource},
    editor::{ConfigEditor, DataSourceOptions, QueryEditor},
    model::SlsQuery,
};

/// An error serving the plugin.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The go-plugin handshake or the listener could not be set up.
    #[error("error initializing plugin listener: {0}")]
    Initialize(#[from] io::Error),
    /// The gRPC server failed while running.
    #[error("error serving plugin: {0}")]
    Serve(#[from] backend::Error),
}

/// The assembled SLS plugin.
///
/// Binds the data source to the editors that configure and drive it:
/// [`config_editor`](SlsPlugin::config_editor) opens an editor for one
/// data source instance's connection options, and
/// [`query_editor`](SlsPlugin::query_editor) opens an editor for one
/// panel's query. [`serve`](SlsPlugin::serve) runs the backend half
/// from the embedder's `main`.
pub struct SlsPlugin<T> {
    datasource: SlsDataSource<T>,
}

impl<T> SlsPlugin<T>
where
    T: SlsBackend,
{
    /// Assemble the plugin around a transport.
    pub fn new(transport: T) -> Self {
        Self {
            datasource: SlsDataSource::new(transport),
        }
    }

    /// The data source bound to this plugin.
    pub fn datasource(&self) -> &SlsDataSource<T> {
        &self.datasource
    }

    /// Open a config editor over one instance's stored options.
    ///
    /// `on_options_change` receives the full replacement options object
    /// after every edit.
    pub fn config_editor<F>(
        &self,
        options: DataSourceOptions,
        on_options_change: F,
    ) -> ConfigEditor<F>
    where
        F: FnMut(DataSourceOptions),
    {
        ConfigEditor::new(options, on_options_change)
    }

    /// Open a query editor over one panel's stored query.
    ///
    /// `on_change` receives the full replacement query after every
    /// edit; `on_run_query` fires after the edits that should re-run
    /// the panel.
    pub fn query_editor<C, R>(
        &self,
        query: SlsQuery,
        on_change: C,
        on_run_query: R,
    ) -> QueryEditor<C, R>
    where
        C: FnMut(SlsQuery),
        R: FnMut(),
    {
        QueryEditor::new(query, on_change, on_run_query)
    }

    /// Serve the data and diagnostics services to Grafana.
    ///
    /// Performs the go-plugin handshake on stdout, installs the
    /// Grafana-compatible log subscriber, and blocks until Grafana
    /// shuts the plugin down. Call this from `main`.
    pub async fn serve(self) -> Result<(), ServeError> {
        let listener = backend::initialize().await?;
        backend::Plugin::new()
            .init_subscriber(true)
            .data_service(self.datasource.clone())
            .diagnostics_service(self.datasource)
            .start(listener)
            .await?;
        Ok(())
    }
}

impl<T> Clone for SlsPlugin<T> {
    fn clone(&self) -> Self {
        Self {
            datasource: self.datasource.clone(),
        }
    }
}

impl<T> fmt::Debug for SlsPlugin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlsPlugin").finish_non_exhaustive()
    }
}
