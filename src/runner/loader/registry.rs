//! The two-tier component registry and session lifecycle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::runner::ds::value::Value;
use crate::runner::host::module_map::HostModuleMap;

use super::component::{ComponentHandle, ComponentListing, ComponentLookup};
use super::error::LoadError;
use super::events::{EventBus, EventPayload, EventTopic};
use super::executor::BundleExecutor;
use super::session::{NavigationDescriptor, SessionSummary};

/// Point-in-time registry numbers, computed from live tier sizes on every
/// call.
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_components: usize,
    pub session_components: usize,
    pub last_update_time: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
}

/// Override-aware component store. The session tier shadows the default
/// tier name-by-name; defaults survive untouched underneath and reappear
/// when the session clears. All operations take `&self`; the registry is
/// single-threaded by construction.
pub struct ComponentRegistry {
    defaults: RefCell<HashMap<String, ComponentHandle>>,
    session_components: RefCell<HashMap<String, ComponentHandle>>,
    services: RefCell<HashMap<String, Value>>,
    session_app: RefCell<Option<ComponentHandle>>,
    session_navigation: RefCell<Option<NavigationDescriptor>>,
    active_session: RefCell<Option<SessionSummary>>,
    last_update: Cell<Option<DateTime<Utc>>>,
    load_in_flight: Cell<bool>,
    executor: BundleExecutor,
    events: EventBus,
}

/// RAII ownership of the in-flight flag. Dropping releases it, so an early
/// return or a panic inside a host primitive cannot leave loads locked out
/// forever.
struct LoadGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> LoadGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self, LoadError> {
        if flag.get() {
            return Err(LoadError::LoadInProgress);
        }
        flag.set(true);
        Ok(LoadGuard { flag })
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl ComponentRegistry {
    /// Registry over the standard host module map and default budget.
    pub fn new() -> Self {
        ComponentRegistry::with_executor(BundleExecutor::new(Rc::new(HostModuleMap::standard())))
    }

    pub fn with_executor(executor: BundleExecutor) -> Self {
        ComponentRegistry {
            defaults: RefCell::new(HashMap::new()),
            session_components: RefCell::new(HashMap::new()),
            services: RefCell::new(HashMap::new()),
            session_app: RefCell::new(None),
            session_navigation: RefCell::new(None),
            active_session: RefCell::new(None),
            last_update: Cell::new(None),
            load_in_flight: Cell::new(false),
            executor,
            events: EventBus::new(),
        }
    }

    /// The registry's event bus; subscribe and unsubscribe through this.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Execute bundle text and splice its exports in as the active session.
    /// Any previous session state is cleared first, so a failed load leaves
    /// the registry default-only rather than partially mixed. Reentrant
    /// calls (including from event callbacks) get `LoadInProgress`.
    pub fn load_session_bundle(
        &self,
        source: &str,
        session_id: &str,
    ) -> Result<SessionSummary, LoadError> {
        let _guard = LoadGuard::acquire(&self.load_in_flight)?;
        debug!(session_id, bytes = source.len(), "loading session bundle");
        self.reset_session_state();

        let module = match self.executor.execute(source) {
            Ok(module) => module,
            Err(err) => {
                warn!(session_id, error = %err, "session bundle rejected");
                self.events.emit(
                    EventTopic::BundleExecutionError,
                    &EventPayload::BundleExecutionError {
                        session_id: session_id.to_string(),
                        message: err.to_string(),
                    },
                );
                return Err(LoadError::Bundle(err));
            }
        };

        let component_count = module.screens.len();
        let service_count = module.services.len();
        let has_app = module.app.is_some();
        let has_navigation = module.navigation.is_some();

        {
            let mut session = self.session_components.borrow_mut();
            for (name, handle) in module.screens {
                session.insert(name, handle);
            }
        }
        {
            let mut services = self.services.borrow_mut();
            for (name, service) in module.services {
                services.insert(name, service);
            }
        }
        *self.session_app.borrow_mut() = module.app;
        *self.session_navigation.borrow_mut() = module.navigation;

        let summary = SessionSummary {
            id: session_id.to_string(),
            loaded_at: Utc::now(),
            component_count,
            service_count,
            has_app,
            has_navigation,
        };
        *self.active_session.borrow_mut() = Some(summary.clone());
        self.last_update.set(Some(summary.loaded_at));

        info!(
            session_id,
            components = component_count,
            services = service_count,
            has_app,
            has_navigation,
            "session bundle loaded"
        );
        self.emit_components_updated();
        self.events.emit(
            EventTopic::BundleExecuted,
            &EventPayload::BundleExecuted {
                session_id: session_id.to_string(),
                component_count,
            },
        );
        Ok(summary)
    }

    /// Drop every session-tier artifact: components, services, the App and
    /// navigation slots, and the session record. Idempotent. Always emits
    /// `session-cleared` then `components-updated`.
    pub fn clear_session_components(&self) {
        let previous = self.reset_session_state();
        self.last_update.set(Some(Utc::now()));
        let previous_id = previous.map(|s| s.id);
        info!(session_id = ?previous_id, "session cleared");
        self.events.emit(
            EventTopic::SessionCleared,
            &EventPayload::SessionCleared {
                session_id: previous_id,
            },
        );
        self.emit_components_updated();
    }

    /// Clears session state without emitting. Returns the record that was
    /// active, if any.
    fn reset_session_state(&self) -> Option<SessionSummary> {
        self.session_components.borrow_mut().clear();
        self.services.borrow_mut().clear();
        *self.session_app.borrow_mut() = None;
        *self.session_navigation.borrow_mut() = None;
        self.active_session.borrow_mut().take()
    }

    fn emit_components_updated(&self) {
        let stats = self.stats();
        self.events.emit(
            EventTopic::ComponentsUpdated,
            &EventPayload::ComponentsUpdated {
                total_components: stats.total_components,
                session_components: stats.session_components,
            },
        );
    }

    // ========================================================================
    // Registration and lookup
    // ========================================================================

    /// Boot-time registration into the default tier. Never touches the
    /// session tier, so calling it mid-session cannot un-shadow an active
    /// override.
    pub fn register_default_component(&self, name: &str, handle: ComponentHandle) {
        debug!(component = name, "registering default component");
        self.defaults.borrow_mut().insert(name.to_string(), handle);
    }

    /// Tri-state resolution: session tier, else default tier, else missing.
    pub fn lookup(&self, name: &str) -> ComponentLookup {
        if let Some(handle) = self.session_components.borrow().get(name) {
            return ComponentLookup::Session(handle.clone());
        }
        if let Some(handle) = self.defaults.borrow().get(name) {
            return ComponentLookup::Default(handle.clone());
        }
        ComponentLookup::Missing
    }

    /// `lookup` collapsed to an `Option`; a miss warns but never faults.
    pub fn get_component(&self, name: &str) -> Option<ComponentHandle> {
        match self.lookup(name) {
            ComponentLookup::Session(handle) | ComponentLookup::Default(handle) => Some(handle),
            ComponentLookup::Missing => {
                warn!(component = name, "component not found in either tier");
                None
            }
        }
    }

    pub fn is_session_component(&self, name: &str) -> bool {
        self.session_components.borrow().contains_key(name)
    }

    pub fn get_service(&self, name: &str) -> Option<Value> {
        self.services.borrow().get(name).cloned()
    }

    pub fn get_session_app(&self) -> Option<ComponentHandle> {
        self.session_app.borrow().clone()
    }

    pub fn get_session_navigation(&self) -> Option<NavigationDescriptor> {
        self.session_navigation.borrow().clone()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Every known name across both tiers, sorted, each flagged with
    /// whether a session entry currently owns it.
    pub fn list_components(&self) -> Vec<ComponentListing> {
        let session = self.session_components.borrow();
        let defaults = self.defaults.borrow();
        let mut names: Vec<&String> = session.keys().chain(defaults.keys()).collect();
        names.sort();
        names.dedup();
        names
            .into_iter()
            .map(|name| ComponentListing {
                name: name.clone(),
                session: session.contains_key(name),
            })
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        let session = self.session_components.borrow();
        let defaults = self.defaults.borrow();
        let shadowed = session.keys().filter(|k| defaults.contains_key(*k)).count();
        RegistryStats {
            // Distinct resolvable names, counting a shadowed pair once.
            total_components: session.len() + defaults.len() - shadowed,
            session_components: session.len(),
            last_update_time: self.last_update.get(),
            session_id: self
                .active_session
                .borrow()
                .as_ref()
                .map(|s| s.id.clone()),
        }
    }

    /// The active-session record, when a session is loaded.
    pub fn session(&self) -> Option<SessionSummary> {
        self.active_session.borrow().clone()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        ComponentRegistry::new()
    }
}
