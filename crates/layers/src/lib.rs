pub mod basemap;
pub mod layer;
pub mod overlay;
pub mod raster;
pub mod symbology;

pub use basemap::BaseLayerKind;
pub use layer::*;
pub use overlay::OverlayLayer;
pub use raster::TileSource;
pub use symbology::StyleRecord;
