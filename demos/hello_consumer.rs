//! Wires up three services with mixed lifetimes and resolves the root three times.
//!
//! `MessageService` is a singleton, so every `HelloService` prints the same
//! message id, while each resolution produces a new `HelloService`.
//!
//! Run with `RUST_LOG=debug` to see the container's trace output.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ferrous_inject::{BoxError, DiResult, Injectable, LoggingObserver, Resolver, ServiceCollection};
use tracing_subscriber::EnvFilter;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

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
        Ok(MessageService { id: next_id() })
    }
}

struct HelloService {
    id: u64,
    message: Arc<MessageService>,
}

impl HelloService {
    fn print(&self) {
        println!("Hello #{} {} !", self.id, self.message.message());
    }
}

impl Injectable for HelloService {
    type Deps = (Arc<MessageService>,);

    fn inject((message,): Self::Deps) -> Result<Self, BoxError> {
        Ok(HelloService { id: next_id(), message })
    }
}

struct ConsumerService {
    hello: Arc<HelloService>,
}

impl ConsumerService {
    fn print(&self) {
        self.hello.print();
    }
}

impl Injectable for ConsumerService {
    type Deps = (Arc<HelloService>,);

    fn inject((hello,): Self::Deps) -> Result<Self, BoxError> {
        Ok(ConsumerService { hello })
    }
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut services = ServiceCollection::new();
    services
        .add_transient::<ConsumerService>()
        .add_transient::<HelloService>()
        .add_singleton::<MessageService>()
        .add_observer(Arc::new(LoggingObserver::new()));

    let provider = services.build()?;

    for _ in 0..3 {
        provider.get::<ConsumerService>()?.print();
    }
    Ok(())
}
