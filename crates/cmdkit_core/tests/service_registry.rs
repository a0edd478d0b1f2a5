use cmdkit_core::extension::registry::ServiceRegistry;
use cmdkit_core::service::{CONFIG, LOGGING, MESSAGE, WORKSPACE};
use cmdkit_core::{
    Disposable, ExtensionManager, LocalServiceProvider, MemoryHost, Service, ServiceKey,
    ServiceProviderExt,
};
use std::cell::Cell;
use std::rc::Rc;

struct Counter {
    value: u32,
}

impl Service for Counter {}

struct Tracked {
    teardowns: Rc<Cell<u32>>,
}

impl Service for Tracked {
    fn as_disposable(self: Rc<Self>) -> Option<Rc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for Tracked {
    fn dispose(&self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}

const COUNTER: ServiceKey<Counter> = ServiceKey::new("counter");
const TRACKED: ServiceKey<Tracked> = ServiceKey::new("tracked");

#[test]
fn manager_registers_default_services() {
    let host = MemoryHost::new();
    let manager = ExtensionManager::new(host.host());

    assert!(manager.get_service(LOGGING).is_some());
    assert!(manager.get_service(CONFIG).is_some());
    assert!(manager.get_service(MESSAGE).is_some());
    assert!(manager.get_service(WORKSPACE).is_some());
    assert_eq!(
        manager.service_keys(),
        vec!["config", "logging", "message", "workspace"]
    );
}

#[test]
fn last_registration_wins_and_unknown_keys_are_absent() {
    let host = MemoryHost::new();
    let manager = ExtensionManager::new(host.host());

    manager.register_service(COUNTER, Rc::new(Counter { value: 1 }));
    manager.register_service(COUNTER, Rc::new(Counter { value: 2 }));

    assert_eq!(manager.get_service(COUNTER).unwrap().value, 2);
    assert!(manager.get_service(TRACKED).is_none());
}

#[test]
fn same_disposable_instance_registered_twice_is_torn_down_twice() {
    let host = MemoryHost::new();
    let manager = ExtensionManager::new(host.host());
    let teardowns = Rc::new(Cell::new(0));
    let tracked = Rc::new(Tracked {
        teardowns: Rc::clone(&teardowns),
    });

    manager.register_service(TRACKED, Rc::clone(&tracked));
    manager.register_service(TRACKED, tracked);
    manager.dispose();

    assert_eq!(teardowns.get(), 2);
}

#[test]
fn registry_lookup_by_raw_name_returns_stored_value() {
    let registry = ServiceRegistry::new();
    registry.insert("counter", Rc::new(Counter { value: 7 }));

    let stored = registry.get("counter").unwrap().downcast::<Counter>().ok();
    assert_eq!(stored.map(|counter| counter.value), Some(7));
    assert!(registry.contains("counter"));
    assert!(registry.get("missing").is_none());
}

#[test]
fn local_provider_tears_down_in_registration_order() {
    let provider = LocalServiceProvider::new();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    provider.register_service(
        TRACKED,
        Rc::new(Tracked {
            teardowns: Rc::clone(&first),
        }),
    );
    provider.register_service(COUNTER, Rc::new(Counter { value: 0 }));
    provider.register_service(
        ServiceKey::<Tracked>::new("tracked.second"),
        Rc::new(Tracked {
            teardowns: Rc::clone(&second),
        }),
    );

    assert_eq!(provider.pending_teardowns(), 2);
    provider.dispose();

    assert_eq!((first.get(), second.get()), (1, 1));
    assert!(provider.registry().is_empty());
}
