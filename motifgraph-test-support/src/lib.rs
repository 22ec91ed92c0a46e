//! Shared test utilities used across motifgraph crates.

pub mod tracing {
    //! Recording layer that captures spans and events so tests can assert
    //! on instrumentation without parsing formatted output.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    /// Layer storing closed spans and emitted events in arrival order.
    ///
    /// # Examples
    /// ```
    /// use motifgraph_test_support::tracing::RecordingLayer;
    ///
    /// let (layer, ()) = RecordingLayer::capture(|| {
    ///     tracing::info!(answer = 42, "computed");
    /// });
    /// let event = layer.events().pop().expect("event recorded");
    /// assert_eq!(event.field("answer"), Some("42"));
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl RecordingLayer {
        /// Runs `body` with a fresh recording subscriber installed as the
        /// thread default and returns the layer with the body's output.
        pub fn capture<T>(body: impl FnOnce() -> T) -> (Self, T) {
            let layer = Self::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            let output = tracing::subscriber::with_default(subscriber, body);
            (layer, output)
        }

        /// Returns a snapshot of the closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            lock(&self.spans).clone()
        }

        /// Returns a snapshot of the emitted events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            lock(&self.events).clone()
        }

        /// Returns the first closed span called `name`.
        #[must_use]
        pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
            lock(&self.spans)
                .iter()
                .find(|span| span.name == name)
                .cloned()
        }

        /// Returns the events whose `message` equals `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            lock(&self.events)
                .iter()
                .filter(|event| event.field("message") == Some(message))
                .cloned()
                .collect()
        }
    }

    /// Snapshot of a closed span and its recorded fields.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the tracing metadata.
        pub name: String,
        /// Fields recorded at creation or later via `Span::record`.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Returns the recorded value of `name`, if any.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// Snapshot of an emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Level the event was emitted at.
        pub level: Level,
        /// Event target from the metadata.
        pub target: String,
        /// Structured fields, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Returns the recorded value of `name`, if any.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    #[derive(Default)]
    struct SpanData {
        name: String,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            id: &tracing::span::Id,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut data = SpanData {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut FieldRecorder(&mut data.fields));
            span.extensions_mut().insert(data);
        }

        fn on_record(
            &self,
            id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(data) = extensions.get_mut::<SpanData>() {
                values.record(&mut FieldRecorder(&mut data.fields));
            }
        }

        fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(data) = span.extensions_mut().remove::<SpanData>() else {
                return;
            };
            lock(&self.spans).push(SpanRecord {
                name: data.name,
                fields: data.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldRecorder(&mut fields));
            lock(&self.events).push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
        }
    }

    struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

    impl FieldRecorder<'_> {
        fn insert(&mut self, field: &Field, value: String) {
            self.0.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldRecorder<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.insert(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.insert(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.insert(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.insert(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.insert(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.insert(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.insert(field, value.to_string());
        }
    }

}
