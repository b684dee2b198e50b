pub mod basemap;
pub mod orbit;
pub mod surface;
pub mod symbology;

pub use basemap::*;
pub use orbit::*;
pub use surface::*;
pub use symbology::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;
    fn name(&self) -> &'static str;
}
