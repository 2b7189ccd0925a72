#![no_main]

use ferrous_inject::{
    ContainerOptions, DiError, DiResult, DuplicatePolicy, Resolver, ResolverContext, ServiceCollection,
};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const NODES: usize = 4;

struct Node<const I: usize> {
    edges: u8,
}

fn resolve_node(r: &ResolverContext, index: usize) -> DiResult<()> {
    match index {
        0 => r.get::<Node<0>>().map(drop),
        1 => r.get::<Node<1>>().map(drop),
        2 => r.get::<Node<2>>().map(drop),
        _ => r.get::<Node<3>>().map(drop),
    }
}

fn factory<const I: usize>(edges: u8) -> impl Fn(&ResolverContext) -> DiResult<Node<I>> + Send + Sync + 'static {
    move |r| {
        for dep in (0..NODES).filter(|j| edges & (1 << j) != 0) {
            resolve_node(r, dep)?;
        }
        Ok(Node { edges })
    }
}

fn register<const I: usize>(services: &mut ServiceCollection, edges: u8, singleton: bool) {
    if singleton {
        services.add_singleton_factory::<Node<I>, _>(factory::<I>(edges));
    } else {
        services.add_transient_factory::<Node<I>, _>(factory::<I>(edges));
    }
}

fn check<const I: usize>(provider: &ferrous_inject::ServiceProvider, edges: u8, singleton: bool) {
    match (provider.get::<Node<I>>(), provider.get::<Node<I>>()) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.edges, edges);
            assert_eq!(Arc::ptr_eq(&a, &b), singleton);
        }
        (Err(DiError::NotFound(_)), _) | (Err(DiError::Circular(_)), _) => {}
        (Err(other), _) => panic!("unexpected error: {other}"),
        (Ok(_), Err(e)) => panic!("resolution stopped working: {e}"),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < NODES + 1 {
        return;
    }

    // data[0]: which nodes are registered (low nibble) and which are singletons (high nibble)
    let present = data[0] & 0x0f;
    let singletons = data[0] >> 4;
    let edges: Vec<u8> = data[1..=NODES].iter().map(|b| b & 0x0f).collect();
    let policy = if data.len() > NODES + 1 && data[NODES + 1] % 2 == 1 {
        DuplicatePolicy::LastWins
    } else {
        DuplicatePolicy::FirstWins
    };

    let mut services = ServiceCollection::with_options(ContainerOptions::default().with_duplicate_policy(policy));
    let is = |mask: u8, i: usize| mask & (1 << i) != 0;
    if is(present, 0) {
        register::<0>(&mut services, edges[0], is(singletons, 0));
    }
    if is(present, 1) {
        register::<1>(&mut services, edges[1], is(singletons, 1));
    }
    if is(present, 2) {
        register::<2>(&mut services, edges[2], is(singletons, 2));
    }
    if is(present, 3) {
        register::<3>(&mut services, edges[3], is(singletons, 3));
    }

    // Validation must never panic, whatever the graph looks like
    let _ = services.validate();

    let Ok(provider) = services.build() else {
        return;
    };
    check::<0>(&provider, edges[0], is(singletons, 0));
    check::<1>(&provider, edges[1], is(singletons, 1));
    check::<2>(&provider, edges[2], is(singletons, 2));
    check::<3>(&provider, edges[3], is(singletons, 3));
});
