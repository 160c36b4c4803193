//! Shared test utilities used across socialwalk crates.

pub mod tracing {
    //! In-memory capture of spans and events for instrumentation assertions.
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::{LookupSpan, Registry};

    /// Field name and rendered value pairs, sorted by name.
    pub type Fields = BTreeMap<String, String>;

    /// A span that has closed, with every field recorded during its life.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ClosedSpan {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Recorded fields.
        pub fields: Fields,
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedEvent {
        /// Event level.
        pub level: Level,
        /// Name of the innermost span the event was emitted in, if any.
        pub span: Option<String>,
        /// Recorded fields, including `message`.
        pub fields: Fields,
    }

    impl CapturedEvent {
        /// The formatted event message, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    #[derive(Default)]
    struct Journal {
        spans: Vec<ClosedSpan>,
        events: Vec<CapturedEvent>,
    }

    /// Layer that records closed spans and events for later inspection.
    ///
    /// Clones share the same journal, so a test can keep one handle while the
    /// other is moved into a subscriber.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        fn journal(&self) -> MutexGuard<'_, Journal> {
            self.journal.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Closed spans in completion order.
        ///
        /// # Examples
        /// ```
        /// use socialwalk_test_support::tracing::RecordingLayer;
        ///
        /// assert!(RecordingLayer::default().spans().is_empty());
        /// ```
        #[must_use]
        pub fn spans(&self) -> Vec<ClosedSpan> {
            self.journal().spans.clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.journal().events.clone()
        }

        /// The first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<ClosedSpan> {
            self.journal()
                .spans
                .iter()
                .find(|span| span.name == name)
                .cloned()
        }

        /// Events whose message equals `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<CapturedEvent> {
            self.journal()
                .events
                .iter()
                .filter(|event| event.message() == Some(message))
                .cloned()
                .collect()
        }
    }

    /// Runs `action` with a fresh [`RecordingLayer`] installed as the
    /// thread-local default subscriber and returns both.
    ///
    /// # Examples
    /// ```
    /// use socialwalk_test_support::tracing::capture;
    ///
    /// let ((), layer) = capture(|| tracing::info_span!("demo").in_scope(|| ()));
    /// assert!(layer.span("demo").is_some());
    /// ```
    pub fn capture<T>(action: impl FnOnce() -> T) -> (T, RecordingLayer) {
        let layer = RecordingLayer::default();
        let subscriber = Registry::default().with(layer.clone());
        let output = tracing::subscriber::with_default(subscriber, action);
        (output, layer)
    }

    struct OpenSpan {
        name: String,
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
            let mut open = OpenSpan {
                name: attrs.metadata().name().to_owned(),
                fields: Fields::new(),
            };
            attrs.record(&mut FieldWriter(&mut open.fields));
            span.extensions_mut().insert(open);
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if let Some(open) = span.extensions_mut().get_mut::<OpenSpan>() {
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
            self.journal().spans.push(ClosedSpan {
                name: open.name,
                fields: open.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldWriter(&mut fields));
            let span = ctx.event_span(event).map(|span| span.name().to_owned());
            self.journal().events.push(CapturedEvent {
                level: *event.metadata().level(),
                span,
                fields,
            });
        }
    }

    struct FieldWriter<'a>(&'a mut Fields);

    impl Visit for FieldWriter<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}
