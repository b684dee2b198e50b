pub mod memory;
pub mod protocol;
pub mod remote;
pub mod services;
pub mod session;

pub use memory::*;
pub use protocol::*;
pub use remote::*;
pub use services::*;
pub use session::*;
