//! Decoded bundle exports and the active-session record.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::runner::ds::object::ObjectHandle;
use crate::runner::ds::value::Value;

use super::component::ComponentHandle;
use super::error::BundleError;

/// What one load produced, kept as the active-session record until the next
/// clear or load.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub loaded_at: DateTime<Utc>,
    pub component_count: usize,
    pub service_count: usize,
    pub has_app: bool,
    pub has_navigation: bool,
}

#[derive(Debug, Clone)]
pub struct NavigationRoute {
    pub name: String,
    pub screen: String,
    pub title: Option<String>,
}

/// Navigation shape decoded leniently from the bundle's `navigation`
/// export. Unknown keys are ignored; incomplete route entries are skipped.
#[derive(Debug, Clone)]
pub struct NavigationDescriptor {
    pub initial: Option<String>,
    pub routes: Vec<NavigationRoute>,
}

/// A bundle's decoded exports. All fields optional; the empty module is a
/// legal no-op bundle.
#[derive(Default)]
pub struct SessionModule {
    pub screens: Vec<(String, ComponentHandle)>,
    pub services: Vec<(String, Value)>,
    pub navigation: Option<NavigationDescriptor>,
    pub app: Option<ComponentHandle>,
}

/// Decode the final `module.exports` value. Structural violations are
/// `MalformedExports`; map-internal laxity (extra keys, partial navigation
/// routes) is tolerated with warnings.
pub fn decode_session_module(exports: &Value) -> Result<SessionModule, BundleError> {
    let root = match exports {
        Value::Object(handle) => handle,
        other => {
            return Err(BundleError::MalformedExports(format!(
                "bundle exports are {} instead of an object",
                type_label(other)
            )))
        }
    };

    Ok(SessionModule {
        screens: decode_screens(&root.get("screens"))?,
        services: decode_services(&root.get("services"))?,
        navigation: decode_navigation(&root.get("navigation"))?,
        app: decode_app(root)?,
    })
}

/// `typeof` with arrays called out; "object instead of an object" reads
/// wrong in a rejection message.
fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        other => other.type_of(),
    }
}

fn decode_screens(value: &Value) -> Result<Vec<(String, ComponentHandle)>, BundleError> {
    let map = match value {
        Value::Undefined | Value::Null => return Ok(Vec::new()),
        Value::Object(handle) => handle,
        other => {
            return Err(BundleError::MalformedExports(format!(
                "'screens' export is {} instead of an object",
                type_label(other)
            )))
        }
    };
    let mut screens = Vec::new();
    for name in map.borrow().own_keys() {
        match map.get(&name) {
            Value::Function(function) => {
                screens.push((name, ComponentHandle::from_function(function)))
            }
            other => {
                return Err(BundleError::MalformedExports(format!(
                    "screen '{}' is {} instead of a callable component",
                    name,
                    type_label(&other)
                )))
            }
        }
    }
    Ok(screens)
}

fn decode_services(value: &Value) -> Result<Vec<(String, Value)>, BundleError> {
    let map = match value {
        Value::Undefined | Value::Null => return Ok(Vec::new()),
        Value::Object(handle) => handle,
        other => {
            return Err(BundleError::MalformedExports(format!(
                "'services' export is {} instead of an object",
                type_label(other)
            )))
        }
    };
    let mut services = Vec::new();
    for name in map.borrow().own_keys() {
        let service = map.get(&name);
        services.push((name, service));
    }
    Ok(services)
}

fn decode_navigation(value: &Value) -> Result<Option<NavigationDescriptor>, BundleError> {
    let map = match value {
        Value::Undefined | Value::Null => return Ok(None),
        Value::Object(handle) => handle,
        other => {
            return Err(BundleError::MalformedExports(format!(
                "'navigation' export is {} instead of an object",
                type_label(other)
            )))
        }
    };
    let initial = match map.get("initial") {
        Value::String(s) => Some(s),
        _ => None,
    };
    let routes = match map.get("routes") {
        Value::Array(items) => items
            .borrow()
            .iter()
            .filter_map(decode_route)
            .collect(),
        _ => Vec::new(),
    };
    Ok(Some(NavigationDescriptor { initial, routes }))
}

fn decode_route(entry: &Value) -> Option<NavigationRoute> {
    let map = match entry {
        Value::Object(handle) => handle,
        other => {
            warn!(entry = %type_label(other), "navigation route entry is not an object, skipped");
            return None;
        }
    };
    let name = match map.get("name") {
        Value::String(s) => s,
        _ => {
            warn!("navigation route entry without a 'name' string, skipped");
            return None;
        }
    };
    let screen = match map.get("screen") {
        Value::String(s) => s,
        _ => {
            warn!(route = %name, "navigation route entry without a 'screen' string, skipped");
            return None;
        }
    };
    let title = match map.get("title") {
        Value::String(s) => Some(s),
        _ => None,
    };
    Some(NavigationRoute {
        name,
        screen,
        title,
    })
}

/// The session App: the `App` export, else a callable `default` export.
/// When both are present `App` wins.
fn decode_app(root: &ObjectHandle) -> Result<Option<ComponentHandle>, BundleError> {
    let app = match root.get("App") {
        Value::Undefined | Value::Null => None,
        Value::Function(function) => Some(ComponentHandle::from_function(function)),
        other => {
            return Err(BundleError::MalformedExports(format!(
                "'App' export is {} instead of a callable component",
                type_label(&other)
            )))
        }
    };
    match root.get("default") {
        Value::Undefined | Value::Null => Ok(app),
        Value::Function(function) => {
            if app.is_some() {
                warn!("bundle exports both 'App' and a callable 'default'; 'App' wins");
                Ok(app)
            } else {
                Ok(Some(ComponentHandle::from_function(function)))
            }
        }
        other => {
            if app.is_some() {
                // A non-callable default alongside an explicit App is noise,
                // not a structural failure.
                warn!(
                    "'default' export is {} and was ignored in favor of 'App'",
                    type_label(&other)
                );
                Ok(app)
            } else {
                Err(BundleError::MalformedExports(format!(
                    "'default' export is {} instead of a callable component",
                    type_label(&other)
                )))
            }
        }
    }
}
