//! Installing the tracing adapter behind the process-wide dispatcher.
#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};

use logging::{Level, LoggerFactory, TracingLoggerFactory};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Default)]
struct Fields(Vec<(String, String)>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_owned(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_owned(), value.to_owned()));
    }
}

#[derive(Clone, Default)]
struct Collect(Arc<Mutex<Vec<(tracing::Level, Vec<(String, String)>)>>>);

impl<S: tracing::Subscriber> Layer<S> for Collect {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), fields.0));
    }
}

#[test]
fn dispatcher_forwards_to_tracing_subscriber() {
    let collect = Collect::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .with(collect.clone());

    let dispatcher = logging::Dispatcher::new();
    dispatcher.open(Some(TracingLoggerFactory.create_shared("orders")));

    tracing::subscriber::with_default(subscriber, || {
        assert!(!dispatcher.is_enabled(Level::Debug));
        logging::debug!(dispatcher, "hidden {0}", 1);
        logging::info!(dispatcher, "order {id} shipped", 7);
        logging::critical!(dispatcher, error: &std::io::Error::other("db down"), "halt");
    });

    let events = collect.0.lock().unwrap();
    assert_eq!(events.len(), 2);

    let (level, fields) = &events[0];
    assert_eq!(*level, tracing::Level::INFO);
    assert!(fields.contains(&("logger".to_owned(), "orders".to_owned())));
    assert!(fields.contains(&("message".to_owned(), "order 7 shipped".to_owned())));
    assert!(fields.contains(&("template".to_owned(), "order {id} shipped".to_owned())));
    assert!(fields.contains(&("arguments".to_owned(), r#"["7"]"#.to_owned())));

    let (level, fields) = &events[1];
    assert_eq!(*level, tracing::Level::ERROR);
    assert!(fields.contains(&("error".to_owned(), "db down".to_owned())));
}
