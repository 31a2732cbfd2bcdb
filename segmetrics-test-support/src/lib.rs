//! Shared fixtures for the segmetrics test suites and benchmarks.
//!
//! - [`tracing`]: a layer that captures spans and events for assertions.
//! - [`fixtures`]: seeded random segmentations.
//! - [`oracle`]: quadratic pair-counting reference for the Rand family.
//! - [`ci`]: environment-driven tuning for property tests.

pub mod ci;
pub mod fixtures;
pub mod oracle;

pub mod tracing {
    //! Span and event capture for instrumentation tests.
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};

    type Fields = BTreeMap<String, String>;

    #[derive(Default)]
    struct Captured {
        spans: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// Layer that keeps every closed span and every event it observes.
    ///
    /// Clones share the same storage, so a clone can be installed while the
    /// original is kept for inspection.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        captured: Arc<Mutex<Captured>>,
    }

    impl RecordingLayer {
        /// Runs `body` with a fresh recording subscriber as the thread default
        /// and returns its output together with the layer.
        ///
        /// Spans entered on other threads (e.g. pool workers) are not seen.
        ///
        /// # Examples
        /// ```
        /// use segmetrics_test_support::tracing::RecordingLayer;
        ///
        /// let ((), layer) = RecordingLayer::capture(|| {
        ///     let _span = tracing::info_span!("example.span", answer = 42).entered();
        /// });
        /// let span = layer.span("example.span").expect("span recorded");
        /// assert_eq!(span.field("answer"), Some("42"));
        /// ```
        pub fn capture<R>(body: impl FnOnce() -> R) -> (R, Self) {
            let layer = Self::default();
            let subscriber = Registry::default().with(layer.clone());
            let output = tracing::subscriber::with_default(subscriber, body);
            (output, layer)
        }

        /// Closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.lock().spans.clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.lock().events.clone()
        }

        /// The first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.lock().spans.iter().find(|span| span.name == name).cloned()
        }

        /// Events at `level` whose message equals `message`.
        #[must_use]
        pub fn events_with_message(&self, level: Level, message: &str) -> Vec<EventRecord> {
            self.lock()
                .events
                .iter()
                .filter(|event| event.level == level && event.message.as_deref() == Some(message))
                .cloned()
                .collect()
        }

        fn lock(&self) -> MutexGuard<'_, Captured> {
            self.captured.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    /// A closed span.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the metadata.
        pub name: String,
        /// Fields recorded at creation or later through `Span::record`.
        pub fields: Fields,
    }

    impl SpanRecord {
        /// Returns the rendered value of `name`, if recorded.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// The `message` field, if any.
        pub message: Option<String>,
        /// Every other field.
        pub fields: Fields,
    }

    struct OpenSpan {
        name: &'static str,
        fields: Fields,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = Fields::new();
            attrs.record(&mut FieldWriter(&mut fields));
            span.extensions_mut().insert(OpenSpan {
                name: attrs.metadata().name(),
                fields,
            });
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(open) = extensions.get_mut::<OpenSpan>() {
                values.record(&mut FieldWriter(&mut open.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(open) = span.extensions_mut().remove::<OpenSpan>() else {
                return;
            };
            self.lock().spans.push(SpanRecord {
                name: open.name.to_owned(),
                fields: open.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldWriter(&mut fields));
            let message = fields.remove("message");
            self.lock().events.push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                message,
                fields,
            });
        }
    }

    /// Renders strings verbatim and everything else through `Debug`, which
    /// matches `Display` for the primitive field types.
    struct FieldWriter<'a>(&'a mut Fields);

    impl Visit for FieldWriter<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}
