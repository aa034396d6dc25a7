//! Commands from the daemon to the zellij plugin

mod dispatcher;
pub mod transport;

pub use dispatcher::PluginDispatcher;
pub use transport::{DispatchError, PipeTransport, ZellijPipe};
