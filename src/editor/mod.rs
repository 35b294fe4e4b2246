//! The editor state layer: the configuration form and the query form.
//!
//! Both editors follow the same host contract. The host owns the stored
//! object (the instance's [`DataSourceOptions`], or one panel's
//! [`SlsQuery`][crate::model::SlsQuery]); the editor holds a snapshot of
//! it plus the host's change callback, and every edit hands the complete
//! updated object back through that callback. All of it is synchronous
//! event-to-callback mapping: no validation, no I/O, and no state beyond
//! the snapshot.

mod config;
mod options;
mod query;

pub use config::ConfigEditor;
pub use options::{DataSourceOptions, SecretState, SecureJsonFields};
pub use query::{QueryEditor, QueryForm, TimeSeriesForm};
