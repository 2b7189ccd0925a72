use ferrous_inject::{BoxError, ContainerOptions, DiError, Injectable, ServiceCollection, Resolver};
use std::sync::Arc;

// ===== A <-> B =====

struct A;
struct B;

impl Injectable for A {
    type Deps = (Arc<B>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(A)
    }
}

impl Injectable for B {
    type Deps = (Arc<A>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(B)
    }
}

// ===== Self reference =====

struct Narcissus;

impl Injectable for Narcissus {
    type Deps = (Arc<Narcissus>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(Narcissus)
    }
}

// ===== X -> Y -> Z -> X =====

struct X;
struct Y;
struct Z;

impl Injectable for X {
    type Deps = (Arc<Y>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(X)
    }
}

impl Injectable for Y {
    type Deps = (Arc<Z>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(Y)
    }
}

impl Injectable for Z {
    type Deps = (Arc<X>,);
    fn inject(_: Self::Deps) -> Result<Self, BoxError> {
        Ok(Z)
    }
}

fn short_names(path: &[&'static str]) -> Vec<String> {
    path.iter()
        .map(|name| name.rsplit("::").next().unwrap_or(name).to_string())
        .collect()
}

fn build_error(sc: ServiceCollection) -> DiError {
    match sc.build() {
        Err(e) => e,
        Ok(_) => panic!("Expected build to reject the cycle"),
    }
}

#[test]
fn test_two_node_cycle_rejected_at_build() {
    let mut sc = ServiceCollection::new();
    sc.add_transient::<A>().add_transient::<B>();

    match build_error(sc) {
        DiError::Circular(path) => assert_eq!(short_names(&path), vec!["A", "B", "A"]),
        other => panic!("Expected circular dependency error, got {other}"),
    }
}

#[test]
fn test_self_dependency_rejected_at_build() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton::<Narcissus>();

    match build_error(sc) {
        DiError::Circular(path) => {
            assert_eq!(short_names(&path), vec!["Narcissus", "Narcissus"]);
        }
        other => panic!("Expected circular dependency error, got {other}"),
    }
}

#[test]
fn test_three_node_cycle_message() {
    let mut sc = ServiceCollection::new();
    sc.add_transient::<X>().add_singleton::<Y>().add_transient::<Z>();

    let err = build_error(sc);
    let DiError::Circular(path) = &err else {
        panic!("Expected circular dependency error, got {err}");
    };
    assert_eq!(short_names(path), vec!["X", "Y", "Z", "X"]);

    let message = err.to_string();
    assert!(message.starts_with("Circular dependency: "));
    assert!(message.contains("circular::X -> circular::Y -> circular::Z -> circular::X"));
}

#[test]
fn test_cycle_through_declared_constructor_rejected_at_build() {
    struct Left;
    struct Right;

    let mut sc = ServiceCollection::new();
    sc.add_service::<Left>(ferrous_inject::Lifetime::Singleton)
        .add_service::<Right>(ferrous_inject::Lifetime::Transient)
        .declare_constructor::<Left, (Arc<Right>,), _>(|_| Ok(Left))
        .declare_constructor::<Right, (Arc<Left>,), _>(|_| Ok(Right));

    assert!(matches!(build_error(sc), DiError::Circular(path) if path.len() == 3));
}

#[test]
fn test_singleton_factory_cycle_fails_instead_of_blocking() {
    struct Alpha;
    struct Beta;

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Alpha, _>(|r| {
        r.get::<Beta>()?;
        Ok(Alpha)
    });
    sc.add_singleton_factory::<Beta, _>(|r| {
        r.get::<Alpha>()?;
        Ok(Beta)
    });
    let sp = sc.build().unwrap();

    match sp.get::<Beta>() {
        Err(DiError::Circular(path)) => assert_eq!(short_names(&path), vec!["Beta", "Alpha", "Beta"]),
        _ => panic!("Expected circular dependency error"),
    }

    // Nothing cached, and asking again still fails the same way
    assert!(sp.get_service_descriptors().iter().all(|d| !d.instantiated));
    assert!(matches!(sp.get::<Alpha>(), Err(DiError::Circular(_))));
}

#[test]
fn test_cycle_through_factory_is_detected() {
    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<u32, _>(|r| Ok(*r.get::<u64>()? as u32));
    sc.add_transient_factory::<u64, _>(|r| Ok(*r.get::<u32>()? as u64));
    let sp = sc.build().unwrap();

    match sp.get::<u32>() {
        Err(DiError::Circular(path)) => assert_eq!(path, vec!["u32", "u64", "u32"]),
        _ => panic!("Expected circular dependency error"),
    }
}

#[test]
fn test_factory_context_exposes_resolution_path() {
    struct Outer;

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(|r| Ok(r.resolution_path().join(" > ")));
    sc.add_transient_factory::<Outer, _>(|r| {
        let inner = r.get::<String>()?;
        assert!(inner.ends_with("Outer > alloc::string::String"));
        Ok(Outer)
    });
    let sp = sc.build().unwrap();

    assert!(sp.get::<Outer>().is_ok());
}

#[test]
fn test_deep_chain_hits_depth_limit() {
    struct L0;
    struct L1;
    struct L2;
    struct L3;

    impl Injectable for L3 {
        type Deps = ();
        fn inject(_: ()) -> Result<Self, BoxError> {
            Ok(L3)
        }
    }
    impl Injectable for L2 {
        type Deps = (Arc<L3>,);
        fn inject(_: Self::Deps) -> Result<Self, BoxError> {
            Ok(L2)
        }
    }
    impl Injectable for L1 {
        type Deps = (Arc<L2>,);
        fn inject(_: Self::Deps) -> Result<Self, BoxError> {
            Ok(L1)
        }
    }
    impl Injectable for L0 {
        type Deps = (Arc<L1>,);
        fn inject(_: Self::Deps) -> Result<Self, BoxError> {
            Ok(L0)
        }
    }

    let register = |sc: &mut ServiceCollection| {
        sc.add_transient::<L0>()
            .add_transient::<L1>()
            .add_transient::<L2>()
            .add_transient::<L3>();
    };

    let mut shallow = ServiceCollection::with_options(ContainerOptions::default().with_max_depth(3));
    register(&mut shallow);
    let sp = shallow.build().unwrap();
    assert!(matches!(sp.get::<L0>(), Err(DiError::DepthExceeded(3))));
    // A shorter chain fits
    assert!(sp.get::<L1>().is_ok());

    let mut roomy = ServiceCollection::new();
    register(&mut roomy);
    assert!(roomy.build().unwrap().get::<L0>().is_ok());
}
