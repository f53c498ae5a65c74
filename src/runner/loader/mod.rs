//! The bundle loader: module resolution, sandboxed execution, the two-tier
//! component registry and its event bus.

pub mod component;
pub mod error;
pub mod events;
pub mod executor;
pub mod registry;
pub mod resolver;
pub mod session;

pub use component::{ComponentHandle, ComponentListing, ComponentLookup};
pub use error::{BundleError, LoadError};
pub use events::{EventBus, EventPayload, EventTopic, SubscriptionId};
pub use executor::BundleExecutor;
pub use registry::{ComponentRegistry, RegistryStats};
pub use resolver::ModuleResolver;
pub use session::{NavigationDescriptor, NavigationRoute, SessionModule, SessionSummary};
