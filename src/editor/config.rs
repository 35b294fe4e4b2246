//! The configuration form for one data source instance.

use crate::model::SlsSecureData;

use super::{DataSourceOptions, SecretState};

/// The state of the configuration form for one data source instance.
///
/// The editor owns a snapshot of the instance's [`DataSourceOptions`]
/// and the host's options-changed callback. Every setter produces a full
/// updated options object with exactly one field replaced, hands it to
/// the callback, and then adopts it as the new snapshot. Nothing is
/// validated: empty strings are valid intermediate states, and any
/// failure to use the resulting options surfaces later, in the backend.
pub struct ConfigEditor<F> {
    options: DataSourceOptions,
    on_options_change: F,
}

impl<F> ConfigEditor<F>
where
    F: FnMut(DataSourceOptions),
{
    /// Open an editor over a host-owned options object.
    ///
    /// `on_options_change` receives the complete updated options object
    /// after every edit, exactly as the host persists it.
    pub fn new(options: DataSourceOptions, on_options_change: F) -> Self {
        Self {
            options,
            on_options_change,
        }
    }

    /// The options as currently displayed.
    pub fn options(&self) -> &DataSourceOptions {
        &self.options
    }

    /// The current lifecycle state of the access key secret field.
    pub fn secret_state(&self) -> SecretState<'_> {
        self.options.secret_state()
    }

    /// Set the access key id input.
    pub fn set_access_key_id(&mut self, value: impl Into<String>) {
        let mut next = self.options.clone();
        next.json_data.access_key_id = Some(value.into());
        self.emit(next);
    }

    /// Set the endpoint input.
    pub fn set_endpoint(&mut self, value: impl Into<String>) {
        let mut next = self.options.clone();
        next.json_data.endpoint = Some(value.into());
        self.emit(next);
    }

    /// Set the project input.
    pub fn set_project(&mut self, value: impl Into<String>) {
        let mut next = self.options.clone();
        next.json_data.project = Some(value.into());
        self.emit(next);
    }

    /// Set the log store input.
    pub fn set_log_store(&mut self, value: impl Into<String>) {
        let mut next = self.options.clone();
        next.json_data.log_store = Some(value.into());
        self.emit(next);
    }

    /// Set the access key secret input.
    ///
    /// Emits a fresh secure object containing only the new secret; the
    /// host overwrites its stored secure data with it on save rather
    /// than merging. The configured flags are left as the host reported
    /// them.
    pub fn set_access_key_secret(&mut self, value: impl Into<String>) {
        let mut next = self.options.clone();
        next.secure_json_data = Some(SlsSecureData {
            access_key_secret: Some(value.into()),
        });
        self.emit(next);
    }

    /// Reset the access key secret.
    ///
    /// Clears the configured flag and blanks the stored value, returning
    /// the field to its editable, empty state regardless of what it held
    /// before.
    pub fn reset_access_key_secret(&mut self) {
        let mut next = self.options.clone();
        next.secure_json_fields.access_key_secret = false;
        let mut secure = next.secure_json_data.take().unwrap_or_default();
        secure.access_key_secret = Some(String::new());
        next.secure_json_data = Some(secure);
        self.emit(next);
    }

    fn emit(&mut self, next: DataSourceOptions) {
        (self.on_options_change)(next.clone());
        self.options = next;
    }
}
