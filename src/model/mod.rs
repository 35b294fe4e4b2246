//! The data model shared by the editors and the backend transport.
//!
//! Grafana stores two JSON objects on behalf of this plugin: the
//! per-panel query ([`SlsQuery`]) and the per-instance connection
//! options ([`SlsJsonData`] plus the encrypted [`SlsSecureData`]). Both
//! only ever contain what the user explicitly edited; defaults are
//! overlaid at use time and never written back. [`ResolvedQuery`],
//! [`QueryPayload`] and [`Settings`] are the fully resolved forms handed
//! to the transport.

mod query;
mod settings;
pub mod time_format;

pub use query::{
    Format, QueryPayload, ResolvedQuery, SlsQuery, DEFAULT_NUMBER_FIELD, DEFAULT_TIME_FIELD,
    DEFAULT_TIME_FORMAT, DEFAULT_TIMEZONE,
};
pub use settings::{Settings, SettingsError, SlsInstanceSettings, SlsJsonData, SlsSecureData};
