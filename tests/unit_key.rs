/// Unit tests for Key and key_of_type

use ferrous_inject::{key_of_type, Key};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};

struct LocalService;

#[test]
fn test_key_identity_is_type_id() {
    let a = key_of_type::<LocalService>();
    let b = key_of_type::<LocalService>();
    assert_eq!(a, b);
    assert_eq!(a.type_id(), TypeId::of::<LocalService>());
    assert_ne!(a, key_of_type::<String>());
}

#[test]
fn test_key_name_is_diagnostic_only() {
    let real = key_of_type::<u32>();
    let renamed = Key::new(TypeId::of::<u32>(), "totally different");
    assert_eq!(real, renamed);

    let mut set = HashSet::new();
    set.insert(real);
    assert!(!set.insert(renamed));
}

#[test]
fn test_key_display_and_debug() {
    let key = key_of_type::<LocalService>();
    assert_eq!(key.display_name(), "unit_key::LocalService");
    assert_eq!(format!("{}", key), "unit_key::LocalService");
    assert_eq!(format!("{:?}", key), "Key(unit_key::LocalService)");
}

#[test]
fn test_key_works_as_map_key() {
    let mut map = HashMap::new();
    map.insert(key_of_type::<u8>(), "u8");
    map.insert(key_of_type::<u16>(), "u16");
    map.insert(key_of_type::<u8>(), "u8 again");

    assert_eq!(map.len(), 2);
    assert_eq!(map[&key_of_type::<u8>()], "u8 again");
}

#[test]
fn test_unsized_types_have_keys() {
    let key = key_of_type::<dyn std::fmt::Debug + Send + Sync>();
    assert!(key.display_name().contains("Debug"));
    assert_ne!(key, key_of_type::<str>());
}
