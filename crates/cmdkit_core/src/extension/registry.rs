//! Typed service registry contracts.
//!
//! # Responsibility
//! - Resolve shared services by a typed `ServiceKey<T>` token.
//! - Queue teardown for services that declare the capability.
//!
//! # Invariants
//! - One value per key name; a later registration replaces the earlier one.
//! - Teardown capability is inspected once, at registration time.
//! - Lookups never panic on a type mismatch; they report the service as absent.

use crate::extension::lifecycle::{Disposable, DisposableList};
use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::rc::Rc;

/// Named token carrying the concrete service type stored under it.
pub struct ServiceKey<T> {
    name: &'static str,
    _service: PhantomData<fn() -> T>,
}

impl<T> ServiceKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _service: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ServiceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ServiceKey<T> {}

impl<T> Debug for ServiceKey<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServiceKey({})", self.name)
    }
}

/// Marker for values that can live in a service registry.
pub trait Service: Any {
    /// Teardown handle for services that own a releasable resource.
    fn as_disposable(self: Rc<Self>) -> Option<Rc<dyn Disposable>> {
        None
    }
}

/// Object-safe lookup/registration surface.
///
/// Use the typed helpers from `ServiceProviderExt` instead of calling these
/// directly.
pub trait ServiceProvider {
    fn resolve(&self, name: &str) -> Option<Rc<dyn Any>>;
    fn store(&self, name: &'static str, service: Rc<dyn Any>, teardown: Option<Rc<dyn Disposable>>);
}

/// Typed access on top of any `ServiceProvider`.
pub trait ServiceProviderExt: ServiceProvider {
    fn get_service<T: Any>(&self, key: ServiceKey<T>) -> Option<Rc<T>> {
        self.resolve(key.name())?.downcast::<T>().ok()
    }

    fn register_service<T: Service>(&self, key: ServiceKey<T>, service: Rc<T>) {
        let teardown = Rc::clone(&service).as_disposable();
        self.store(key.name(), service, teardown);
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

/// Key-to-instance table backing a service provider.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: RefCell<BTreeMap<&'static str, Rc<dyn Any>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `service` under `name`, returning the replaced value if any.
    pub fn insert(&self, name: &'static str, service: Rc<dyn Any>) -> Option<Rc<dyn Any>> {
        self.entries.borrow_mut().insert(name, service)
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.entries.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Returns registered key names in sorted order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.borrow().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Standalone provider owning its own teardown queue.
///
/// Useful for running commands outside an `ExtensionManager`.
#[derive(Default)]
pub struct LocalServiceProvider {
    registry: ServiceRegistry,
    teardowns: DisposableList,
}

impl LocalServiceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn pending_teardowns(&self) -> usize {
        self.teardowns.len()
    }
}

impl ServiceProvider for LocalServiceProvider {
    fn resolve(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.registry.get(name)
    }

    fn store(&self, name: &'static str, service: Rc<dyn Any>, teardown: Option<Rc<dyn Disposable>>) {
        self.registry.insert(name, service);
        if let Some(teardown) = teardown {
            self.teardowns.push(teardown);
        }
    }
}

impl Disposable for LocalServiceProvider {
    fn dispose(&self) {
        self.teardowns.dispose_all();
        self.registry.clear();
    }
}
