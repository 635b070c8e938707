pub mod basemap;
pub mod config;
pub mod error;
pub mod events;
pub mod flows;
pub mod location;
pub mod map;
pub mod overlays;
pub mod panels;
pub mod preferences;
pub mod style_editor;
pub mod upload;
pub mod viewer;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use events::*;
pub use map::{MapError, MapWidget};
pub use panels::{Modal, Panel};
pub use style_editor::StyleForm;
pub use viewer::Viewer;
pub use viewport::ViewInput;
