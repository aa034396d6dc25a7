pub mod session;
pub mod workspace;

pub use session::*;
pub use workspace::*;
