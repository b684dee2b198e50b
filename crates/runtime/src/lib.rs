pub mod event_bus;
pub mod frame;
pub mod poll;

pub use event_bus::*;
pub use frame::*;
pub use poll::*;
