//! The options envelope owned by the Grafana host for one data source
//! instance, and the derived view of the secret's lifecycle.

use serde::{Deserialize, Serialize};

use crate::model::{SlsJsonData, SlsSecureData};

/// Which secure fields the host currently holds a value for.
///
/// The host never reports secret values back to the editor, only these
/// flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureJsonFields {
    /// Whether an access key secret is stored for the instance.
    #[serde(default)]
    pub access_key_secret: bool,
}

/// The full options object for one data source instance, as passed to
/// and persisted by the Grafana host.
///
/// The configuration editor never mutates this in place: every edit
/// produces a complete updated copy which is handed to the host through
/// its options-changed callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceOptions {
    /// The plain connection options.
    #[serde(default)]
    pub json_data: SlsJsonData,
    /// Secret values in flight to the host. Write-only: the host
    /// encrypts these on save and never sends them back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_json_data: Option<SlsSecureData>,
    /// Which secure fields the host holds a value for.
    #[serde(default)]
    pub secure_json_fields: SecureJsonFields,
}

impl DataSourceOptions {
    /// The current lifecycle state of the access key secret.
    pub fn secret_state(&self) -> SecretState<'_> {
        if self.secure_json_fields.access_key_secret {
            return SecretState::Configured;
        }
        match self
            .secure_json_data
            .as_ref()
            .and_then(|secure| secure.access_key_secret.as_deref())
        {
            Some(value) if !value.is_empty() => SecretState::Pending(value),
            _ => SecretState::Unconfigured,
        }
    }
}

/// The lifecycle of the access key secret, from the editor's side.
///
/// The secret itself is write-only: once saved, the host reports only
/// that it is configured, and the stored value is never exposed to this
/// layer again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretState<'a> {
    /// The host holds a saved secret. Its value is opaque; the editor
    /// renders a masked, non-editable input with a reset action.
    Configured,
    /// The user is typing a replacement that has not been saved yet.
    Pending(&'a str),
    /// No secret is stored or in flight; the input is empty and editable.
    Unconfigured,
}
