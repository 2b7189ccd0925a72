/// End-to-end wiring of a small application graph.
///
/// `ConsumerService -> HelloService -> MessageService`, with the consumer and
/// hello services transient and the message service a singleton. Each of
/// three resolutions must get a fresh consumer and hello service around the
/// one shared message service.
use ferrous_inject::{
    BoxError, Injectable, RecordingObserver, ResolutionEvent, Resolver, ServiceCollection,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ===== Test Services =====

struct MessageService {
    id: u64,
}

impl MessageService {
    fn message(&self) -> String {
        format!("Yo #{}", self.id)
    }
}

impl Injectable for MessageService {
    type Deps = ();
    fn inject(_: ()) -> Result<Self, BoxError> {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Ok(MessageService { id: NEXT.fetch_add(1, Ordering::SeqCst) })
    }
}

struct HelloService {
    id: u64,
    message: Arc<MessageService>,
}

impl HelloService {
    fn greeting(&self) -> String {
        format!("Hello #{} {} !", self.id, self.message.message())
    }
}

impl Injectable for HelloService {
    type Deps = (Arc<MessageService>,);
    fn inject((message,): Self::Deps) -> Result<Self, BoxError> {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Ok(HelloService { id: NEXT.fetch_add(1, Ordering::SeqCst), message })
    }
}

struct ConsumerService {
    hello: Arc<HelloService>,
}

impl Injectable for ConsumerService {
    type Deps = (Arc<HelloService>,);
    fn inject((hello,): Self::Deps) -> Result<Self, BoxError> {
        Ok(ConsumerService { hello })
    }
}

// ===== Tests =====

#[test]
fn test_consumer_scenario() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut services = ServiceCollection::new();
    services
        .add_transient::<ConsumerService>()
        .add_transient::<HelloService>()
        .add_singleton::<MessageService>()
        .add_observer(recorder.clone());

    assert!(services.validate().is_valid());
    let provider = services.build().unwrap();

    let consumers: Vec<_> = (0..3).map(|_| provider.get_required::<ConsumerService>()).collect();

    // Three distinct consumers and three distinct hello services
    for i in 0..3 {
        for j in (i + 1)..3 {
            assert!(!Arc::ptr_eq(&consumers[i], &consumers[j]));
            assert!(!Arc::ptr_eq(&consumers[i].hello, &consumers[j].hello));
        }
    }

    // One message service shared by all of them
    let message = &consumers[0].hello.message;
    assert!(consumers.iter().all(|c| Arc::ptr_eq(&c.hello.message, message)));

    let greetings: Vec<String> = consumers.iter().map(|c| c.hello.greeting()).collect();
    let suffix = format!("Yo #{} !", message.id);
    assert!(greetings.iter().all(|g| g.ends_with(&suffix)));
    assert_ne!(greetings[0], greetings[1]);
    assert_ne!(greetings[1], greetings[2]);

    // Every resolution performs a lookup per service, the cached singleton included
    assert_eq!(recorder.lookups(), 9);
    let failures = recorder
        .events()
        .into_iter()
        .filter(|e| matches!(e, ResolutionEvent::Failed(_)))
        .count();
    assert_eq!(failures, 0);
}

#[test]
fn test_registration_order_does_not_matter() {
    let mut services = ServiceCollection::new();
    services
        .add_singleton::<MessageService>()
        .add_transient::<HelloService>()
        .add_transient::<ConsumerService>();
    let provider = services.build().unwrap();

    let a = provider.get_required::<ConsumerService>();
    let b = provider.get_required::<ConsumerService>();
    assert!(Arc::ptr_eq(&a.hello.message, &b.hello.message));
}

#[test]
fn test_zero_parameter_service_needs_one_lookup() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut services = ServiceCollection::new();
    services
        .add_transient::<MessageService>()
        .add_observer(recorder.clone());
    let provider = services.build().unwrap();

    provider.get_required::<MessageService>();
    assert_eq!(recorder.lookups(), 1);
    assert_eq!(recorder.events().len(), 2);
}
