pub mod camera;
pub mod picking;
pub mod transition;
pub mod view_state;

pub use camera::*;
pub use picking::*;
pub use transition::*;
pub use view_state::*;
