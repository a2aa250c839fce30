//! Bootstrapping events: handler trait, dispatcher, payloads.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::BootstrapEventHandler;
