//! Connection settings for an SLS data source instance: the options
//! stored by Grafana, the secret stored alongside them, and the resolved
//! [`Settings`] handed to the transport.

use std::fmt;

use grafana_plugin_sdk::backend;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The plain (non-secret) connection options for one data source instance.
///
/// Every field is optional: a freshly created instance has none of them
/// set, and the configuration editor fills them in one keystroke at a
/// time. Grafana persists this object as the instance's `jsonData`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlsJsonData {
    /// Aliyun access key id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// SLS endpoint, e.g. `cn-hangzhou.log.aliyuncs.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// SLS project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// SLS log store name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_store: Option<String>,
}

impl SlsJsonData {
    fn is_empty(&self) -> bool {
        self.access_key_id.is_none()
            && self.endpoint.is_none()
            && self.project.is_none()
            && self.log_store.is_none()
    }
}

/// The secret part of the connection options.
///
/// Grafana encrypts this server side and only ever sends it to the
/// backend; the editor can overwrite or clear the secret but never read
/// it back. `Debug` redacts the value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlsSecureData {
    /// Aliyun access key secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_secret: Option<String>,
}

impl fmt::Debug for SlsSecureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlsSecureData")
            .field(
                "access_key_secret",
                &self.access_key_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// The instance settings delivered to this plugin by Grafana.
pub type SlsInstanceSettings = backend::DataSourceInstanceSettings<SlsJsonData, SlsSecureData>;

/// Errors loading [`Settings`] from a data source instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The instance has no connection options configured at all.
    #[error("data source instance is not configured")]
    Unconfigured,
}

/// Resolved connection settings for one data source instance.
///
/// Every field is a plain string: anything the user left unset resolves
/// to the empty string, and whether that is usable is for the transport
/// to decide. `Debug` redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Aliyun access key id.
    pub access_key_id: String,
    /// Aliyun access key secret.
    pub access_key_secret: String,
    /// SLS endpoint.
    pub endpoint: String,
    /// SLS project name.
    pub project: String,
    /// SLS log store name.
    pub log_store: String,
}

impl Settings {
    /// Load the settings configured for a data source instance.
    ///
    /// An instance with no connection options at all is an error; a
    /// partially configured instance passes through, with unset fields
    /// resolved to empty strings.
    pub fn load(source: &SlsInstanceSettings) -> Result<Self, SettingsError> {
        let json_data = &source.json_data;
        if json_data.is_empty() {
            return Err(SettingsError::Unconfigured);
        }
        Ok(Self {
            access_key_id: json_data.access_key_id.clone().unwrap_or_default(),
            access_key_secret: source
                .decrypted_secure_json_data
                .access_key_secret
                .clone()
                .unwrap_or_default(),
            endpoint: json_data.endpoint.clone().unwrap_or_default(),
            project: json_data.project.clone().unwrap_or_default(),
            log_store: json_data.log_store.clone().unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("log_store", &self.log_store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use grafana_plugin_sdk::pluginv2;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn instance_settings(
        json_data: serde_json::Value,
        secure: &[(&str, &str)],
    ) -> SlsInstanceSettings {
        let context: backend::PluginContext<SlsInstanceSettings, SlsJsonData, SlsSecureData> =
            pluginv2::PluginContext {
                org_id: 1,
                plugin_id: "aliyun-sls-datasource".to_string(),
                data_source_instance_settings: Some(pluginv2::DataSourceInstanceSettings {
                    json_data: json_data.to_string().into_bytes(),
                    decrypted_secure_json_data: secure
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    ..Default::default()
                }),
                ..Default::default()
            }
            .try_into()
            .expect("valid plugin context");
        context.instance_settings.expect("instance settings present")
    }

    #[test]
    fn load_resolves_configured_instance() {
        let source = instance_settings(
            json!({
                "accessKeyId": "AKID123",
                "endpoint": "cn-hangzhou.log.aliyuncs.com",
                "project": "ops",
                "logStore": "nginx-access",
            }),
            &[("accessKeySecret", "sekrit")],
        );
        assert_eq!(
            Settings::load(&source).unwrap(),
            Settings {
                access_key_id: "AKID123".to_string(),
                access_key_secret: "sekrit".to_string(),
                endpoint: "cn-hangzhou.log.aliyuncs.com".to_string(),
                project: "ops".to_string(),
                log_store: "nginx-access".to_string(),
            }
        );
    }

    #[test]
    fn load_fails_on_unconfigured_instance() {
        let source = instance_settings(json!({}), &[]);
        assert!(matches!(
            Settings::load(&source),
            Err(SettingsError::Unconfigured)
        ));
    }

    #[test]
    fn load_fills_missing_fields_with_empty_strings() {
        let source = instance_settings(json!({"project": "ops"}), &[]);
        let settings = Settings::load(&source).unwrap();
        assert_eq!(settings.project, "ops");
        assert_eq!(settings.access_key_id, "");
        assert_eq!(settings.access_key_secret, "");
        assert_eq!(settings.endpoint, "");
        assert_eq!(settings.log_store, "");
    }

    #[test]
    fn unknown_json_data_fields_are_ignored() {
        let source = instance_settings(
            json!({"endpoint": "intranet", "keepCookies": []}),
            &[],
        );
        assert_eq!(Settings::load(&source).unwrap().endpoint, "intranet");
    }

    #[test]
    fn debug_redacts_the_secret() {
        let settings = Settings {
            access_key_id: "AKID123".to_string(),
            access_key_secret: "sekrit".to_string(),
            endpoint: String::new(),
            project: String::new(),
            log_store: String::new(),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sekrit"));
        assert!(rendered.contains("<redacted>"));

        let secure = SlsSecureData {
            access_key_secret: Some("sekrit".to_string()),
        };
        let rendered = format!("{secure:?}");
        assert!(!rendered.contains("sekrit"));
    }

    #[test]
    fn json_data_serializes_with_camel_case_wire_keys() {
        let json_data = SlsJsonData {
            access_key_id: Some("AKID123".to_string()),
            endpoint: Some("cn-hangzhou.log.aliyuncs.com".to_string()),
            project: Some("ops".to_string()),
            log_store: Some("nginx-access".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&json_data).unwrap(),
            json!({
                "accessKeyId": "AKID123",
                "endpoint": "cn-hangzhou.log.aliyuncs.com",
                "project": "ops",
                "logStore": "nginx-access",
            })
        );
        assert_eq!(
            serde_json::to_value(SlsJsonData::default()).unwrap(),
            json!({})
        );
    }
}
