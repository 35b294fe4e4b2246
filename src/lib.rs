/*! A Grafana data source plugin for Aliyun Log Service (SLS).

This crate implements an SLS data source for Grafana: the typed query
and connection-settings model, the editors that maintain them, and the
backend services that execute queries. It is divided into four modules:

- [`model`] contains the data structures shared by the editors and the
  backend services: the stored query and its defaults overlay, the
  connection settings, and the conversion from Java-style time format
  patterns to `chrono` format strings.
- [`editor`] contains the configuration and query editors. These are
  callback-driven renditions of the plugin's UI state: each edit
  replaces exactly one field and hands the full replacement object to
  the host, and the access key secret follows Grafana's write-only
  secret lifecycle.
- [`datasource`] contains [`SlsDataSource`][datasource::SlsDataSource],
  which implements the SDK's data and diagnostics services on top of a
  pluggable [`SlsBackend`][datasource::SlsBackend] transport.
- [`plugin`] binds the data source and the editors together and serves
  the backend half to Grafana over gRPC.

All stored objects use the camelCase wire shapes Grafana persists for
this plugin; defaults are resolved when a value is read, never written
back.

# Example

Embedding the plugin requires a transport that talks to SLS:

```no_run
use grafana_plugin_sdk::{backend, data};
use grafana_sls_datasource::{
    datasource::SlsBackend,
    model::{QueryPayload, Settings},
    plugin::{ServeError, SlsPlugin},
};
use thiserror::Error;

#[derive(Debug)]
struct HttpTransport;

#[derive(Debug, Error)]
#[error("SLS request failed")]
struct TransportError;

#[backend::async_trait]
impl SlsBackend for HttpTransport {
    type Error = TransportError;

    async fn query(
        &self,
        settings: &Settings,
        payload: &QueryPayload,
    ) -> Result<Vec<data::Frame>, Self::Error> {
        // Run `payload.query_text` against the log store named in
        // `settings`, and convert the results to frames.
        let _ = (settings, payload);
        Ok(Vec::new())
    }

    async fn check_store(&self, settings: &Settings) -> Result<(), Self::Error> {
        let _ = settings;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), ServeError> {
    SlsPlugin::new(HttpTransport).serve().await
}
```
*/
#![deny(missing_docs)]

pub mod datasource;
pub mod editor;
pub mod model;
pub mod plugin;
