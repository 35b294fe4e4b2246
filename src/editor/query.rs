//! The query form for one panel query.

use crate::model::{Format, SlsQuery};

/// The state of the query form for one editing session.
///
/// The editor owns a snapshot of the panel's [`SlsQuery`] plus the
/// host's two callbacks: `on_change`, which receives the complete
/// updated query after every edit, and `on_run_query`, which asks the
/// host to re-execute the current query immediately. Edits to the query
/// text or the format run the query right away; the remaining fields
/// only update state and take effect on the next run.
///
/// No input is validated here. An unparseable time format or a field
/// name that does not exist in the log store is stored as typed, and
/// whatever goes wrong with it surfaces from the backend.
pub struct QueryEditor<C, R> {
    query: SlsQuery,
    on_change: C,
    on_run_query: R,
}

impl<C, R> QueryEditor<C, R>
where
    C: FnMut(SlsQuery),
    R: FnMut(),
{
    /// Open an editor over a host-owned query object.
    pub fn new(query: SlsQuery, on_change: C, on_run_query: R) -> Self {
        Self {
            query,
            on_change,
            on_run_query,
        }
    }

    /// The stored query, exactly as the host holds it.
    ///
    /// Fields the user never edited stay unset here; the defaults appear
    /// only in the rendered [`form`](Self::form).
    pub fn query(&self) -> &SlsQuery {
        &self.query
    }

    /// Render the form: the stored query overlaid onto the defaults.
    ///
    /// Pure; the stored query is not modified, and the defaults shown
    /// for untouched fields are not written back until the user edits
    /// them.
    pub fn form(&self) -> QueryForm {
        QueryForm::new(&self.query)
    }

    /// Set the query text and run the query.
    pub fn set_query_text(&mut self, value: impl Into<String>) {
        let mut next = self.query.clone();
        next.query_text = Some(value.into());
        self.emit(next);
        (self.on_run_query)();
    }

    /// Select the output format and run the query.
    pub fn set_format(&mut self, format: Format) {
        let mut next = self.query.clone();
        next.format = Some(format);
        self.emit(next);
        (self.on_run_query)();
    }

    /// Set the time field name. Takes effect on the next run.
    pub fn set_time_field(&mut self, value: impl Into<String>) {
        let mut next = self.query.clone();
        next.time_field = Some(value.into());
        self.emit(next);
    }

    /// Set the timezone. Takes effect on the next run.
    pub fn set_timezone(&mut self, value: impl Into<String>) {
        let mut next = self.query.clone();
        next.timezone = Some(value.into());
        self.emit(next);
    }

    /// Set the time format pattern. Takes effect on the next run.
    pub fn set_time_format(&mut self, value: impl Into<String>) {
        let mut next = self.query.clone();
        next.time_format = Some(value.into());
        self.emit(next);
    }

    /// Set the number field name. Takes effect on the next run.
    pub fn set_number_field(&mut self, value: impl Into<String>) {
        let mut next = self.query.clone();
        next.number_field = Some(value.into());
        self.emit(next);
    }

    fn emit(&mut self, next: SlsQuery) {
        (self.on_change)(next.clone());
        self.query = next;
    }
}

/// The rendered view of a query: every input's displayed value.
///
/// Built by overlaying the stored query onto the defaults. The inputs
/// that only apply to time series rendering are grouped in
/// [`time_series`](QueryForm::time_series) and present only when the
/// effective format is [`Format::TimeSeries`]; their stored values
/// persist while hidden. The format selector offers [`Format::ALL`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryForm {
    /// The query text input.
    pub query_text: String,
    /// The selected output format.
    pub format: Format,
    /// The time-series-only inputs, hidden under [`Format::Table`].
    pub time_series: Option<TimeSeriesForm>,
}

/// The inputs shown only when the format is [`Format::TimeSeries`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSeriesForm {
    /// Field holding the x-axis timestamps.
    pub time_field: String,
    /// Timezone in which the time field is parsed.
    pub timezone: String,
    /// Java-style pattern in which the time field is parsed.
    pub time_format: String,
    /// Field holding the y-axis values.
    pub number_field: String,
}

impl QueryForm {
    fn new(query: &SlsQuery) -> Self {
        let resolved = query.resolve();
        Self {
            query_text: resolved.query_text,
            format: resolved.format,
            time_series: (resolved.format == Format::TimeSeries).then_some(TimeSeriesForm {
                time_field: resolved.time_field,
                timezone: resolved.timezone,
                time_format: resolved.time_format,
                number_field: resolved.number_field,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Event {
        Changed(SlsQuery),
        Ran,
    }

    fn stored_query() -> SlsQuery {
        SlsQuery {
            query_text: Some("* | select count(*) as qpm".to_string()),
            format: Some(Format::TimeSeries),
            time_field: Some("ts".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn text_and_format_edits_run_the_query_once() {
        let events = RefCell::new(Vec::new());
        let mut editor = QueryEditor::new(
            stored_query(),
            |query| events.borrow_mut().push(Event::Changed(query)),
            || events.borrow_mut().push(Event::Ran),
        );

        editor.set_query_text("* | select avg(latency) as qpm");

        let mut expected = stored_query();
        expected.query_text = Some("* | select avg(latency) as qpm".to_string());
        assert_eq!(
            *events.borrow(),
            vec![Event::Changed(expected.clone()), Event::Ran]
        );

        events.borrow_mut().clear();
        editor.set_format(Format::Table);
        expected.format = Some(Format::Table);
        assert_eq!(*events.borrow(), vec![Event::Changed(expected), Event::Ran]);
    }

    #[test]
    fn secondary_field_edits_do_not_run_the_query() {
        let events = RefCell::new(Vec::new());
        let mut editor = QueryEditor::new(
            stored_query(),
            |query| events.borrow_mut().push(Event::Changed(query)),
            || events.borrow_mut().push(Event::Ran),
        );

        editor.set_time_field("timestamp");
        editor.set_timezone("UTC");
        editor.set_time_format("yyyy/MM/dd");
        editor.set_number_field("latency");

        let events = events.borrow();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|event| matches!(event, Event::Changed(_))));

        let query = editor.query();
        assert_eq!(query.time_field.as_deref(), Some("timestamp"));
        assert_eq!(query.timezone.as_deref(), Some("UTC"));
        assert_eq!(query.time_format.as_deref(), Some("yyyy/MM/dd"));
        assert_eq!(query.number_field.as_deref(), Some("latency"));
    }

    #[test]
    fn number_field_edits_touch_only_the_number_field() {
        let changed = RefCell::new(Vec::new());
        let mut editor = QueryEditor::new(
            stored_query(),
            |query| changed.borrow_mut().push(query),
            || {},
        );

        editor.set_number_field("errors");

        let mut expected = stored_query();
        expected.number_field = Some("errors".to_string());
        assert_eq!(*changed.borrow(), vec![expected]);
    }

    #[test]
    fn form_displays_defaults_without_writing_them_back() {
        let editor = QueryEditor::new(SlsQuery::default(), |_| {}, || {});

        let form = editor.form();
        assert_eq!(form.query_text, "");
        assert_eq!(form.format, Format::TimeSeries);
        assert_eq!(
            form.time_series,
            Some(TimeSeriesForm {
                time_field: "time".to_string(),
                timezone: "Asia/Shanghai".to_string(),
                time_format: "yyyy-MM-dd HH:mm:ss".to_string(),
                number_field: "qpm".to_string(),
            })
        );
        // Rendering never mutates the stored query.
        assert_eq!(editor.query(), &SlsQuery::default());
    }

    #[test]
    fn form_prefers_stored_values_over_defaults() {
        let editor = QueryEditor::new(stored_query(), |_| {}, || {});

        let form = editor.form();
        assert_eq!(form.query_text, "* | select count(*) as qpm");
        let time_series = form.time_series.unwrap();
        assert_eq!(time_series.time_field, "ts");
        assert_eq!(time_series.timezone, "Asia/Shanghai");
    }

    #[test]
    fn table_format_hides_the_time_series_inputs() {
        let events = RefCell::new(Vec::new());
        let mut editor = QueryEditor::new(
            stored_query(),
            |query| events.borrow_mut().push(Event::Changed(query)),
            || events.borrow_mut().push(Event::Ran),
        );

        editor.set_format(Format::Table);
        assert_eq!(editor.form().time_series, None);
        // The stored values persist while hidden.
        assert_eq!(editor.query().time_field.as_deref(), Some("ts"));

        editor.set_format(Format::TimeSeries);
        let time_series = editor.form().time_series.unwrap();
        assert_eq!(time_series.time_field, "ts");
    }
}
