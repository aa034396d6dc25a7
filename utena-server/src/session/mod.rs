//! Session registry and the service layer on top of it

mod registry;
mod service;

pub use registry::SessionRegistry;
pub use service::SessionService;
