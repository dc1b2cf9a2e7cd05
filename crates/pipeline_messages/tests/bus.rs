use std::sync::{mpsc, Arc, Mutex, Once};
use std::thread;

use log::Level;
use pipeline_messages::{
    ChannelObserver, ErrorCollector, LoggingObserver, Message, MessageBus, Observer,
    ProgressTracker,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pipeline_logging::initialize_for_tests);
}

struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Observer for Recorder {
    fn receive(&self, _message: &Message) {
        self.log.lock().unwrap().push(self.name);
    }
}

#[test]
fn delivers_in_registration_order() {
    init_logging();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut bus = MessageBus::new();
    for name in ["first", "second", "third"] {
        bus.register(Arc::new(Recorder {
            name,
            log: Arc::clone(&log),
        }));
    }

    bus.notify(&Message::pipeline_status("Pipeline", "go"));

    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn unregister_stops_delivery() {
    init_logging();
    let collector = Arc::new(ErrorCollector::new());
    let mut bus = MessageBus::new();
    let id = bus.register(collector.clone());
    bus.register(Arc::new(LoggingObserver::new()));

    bus.notify(&Message::pipeline_error("Pipeline", -1, "one"));
    assert!(bus.unregister(id));
    assert!(!bus.unregister(id));
    bus.notify(&Message::pipeline_error("Pipeline", -2, "two"));

    assert_eq!(collector.error_codes(), vec![-1]);
    assert_eq!(bus.observer_count(), 1);
}

#[test]
fn empty_bus_is_a_noop() {
    let bus = MessageBus::new();
    assert!(bus.is_empty());
    bus.notify(&Message::pipeline_error("Pipeline", -1, "nobody listens"));
}

#[test]
fn progress_is_observed_in_order() {
    init_logging();
    let tracker = Arc::new(ProgressTracker::new());
    let mut bus = MessageBus::new();
    bus.register(tracker.clone());

    bus.notify_all(
        [0, 25, 50, 100]
            .into_iter()
            .map(|value| Message::pipeline_progress("Montage", "stitching", value)),
    );

    assert_eq!(tracker.values(), vec![0, 25, 50, 100]);
    assert_eq!(tracker.regressions(), 0);
}

#[test]
fn progress_regression_is_counted_per_origin() {
    init_logging();
    let tracker = ProgressTracker::new();
    tracker.receive(&Message::filter_progress("A", 0, "", 50));
    tracker.receive(&Message::filter_progress("B", 1, "", 10));
    tracker.receive(&Message::filter_progress("A", 0, "", 40));

    assert_eq!(tracker.regressions(), 1);
    assert_eq!(
        tracker.entries(),
        vec![
            (pipeline_messages::Origin::filter("A", 0), 50),
            (pipeline_messages::Origin::filter("B", 1), 10),
            (pipeline_messages::Origin::filter("A", 0), 40),
        ]
    );
    assert_eq!(
        tracker.latest(&pipeline_messages::Origin::filter("A", 0)),
        Some(40)
    );
}

#[test]
fn channel_observer_forwards_across_threads() {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let mut bus = MessageBus::new();
    bus.register(Arc::new(ChannelObserver::new(tx)));
    let bus = Arc::new(bus);

    let producer = {
        let bus = Arc::clone(&bus);
        thread::spawn(move || {
            for value in [10, 20] {
                bus.notify(&Message::pipeline_progress("Pipeline", "step", value));
            }
        })
    };
    producer.join().unwrap();

    let received: Vec<Option<i32>> = rx.try_iter().map(|m| m.progress()).collect();
    assert_eq!(received, vec![Some(10), Some(20)]);
}

#[test]
fn channel_observer_ignores_a_dropped_receiver() {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let observer = ChannelObserver::new(tx);
    drop(rx);

    observer.receive(&Message::pipeline_error("Pipeline", -1, "nobody is listening"));
}

#[test]
fn bus_keeps_delivering_after_a_channel_closes() {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let collector = Arc::new(ErrorCollector::new());
    let mut bus = MessageBus::new();
    bus.register(Arc::new(ChannelObserver::new(tx)));
    bus.register(collector.clone());
    drop(rx);

    bus.notify(&Message::pipeline_error("Pipeline", -9, "after close"));

    assert_eq!(collector.error_codes(), vec![-9]);
}

#[test]
fn logging_observer_level_follows_kind() {
    let cases = [
        (Message::filter_error("Crop", 1, -1, "failed"), Level::Error),
        (Message::pipeline_warning("Pipeline", 4, "slow"), Level::Warn),
        (Message::filter_progress("Crop", 1, "cropping", 30), Level::Debug),
        (Message::pipeline_status("Pipeline", "started"), Level::Info),
    ];
    for (message, level) in cases {
        assert_eq!(LoggingObserver::level_for(&message), level, "{message}");
    }
}
