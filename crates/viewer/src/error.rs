use api::ApiError;
use layers::LayerId;
use prefs::PrefsError;
use thiserror::Error;

use crate::events::Notice;
use crate::map::MapError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("viewpoint input is not numeric")]
    InvalidViewpoint,
    #[error("stroke weight {0:?} is not a number")]
    InvalidWeight(String),
    #[error("no layer selected for editing")]
    NoLayerSelected,
    #[error("layer {0} is not loaded")]
    UnknownLayer(LayerId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error(transparent)]
    Map(#[from] MapError),
}

impl ViewerError {
    /// User-facing text for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            ViewerError::InvalidViewpoint => Notice::error("Please enter valid numbers."),
            ViewerError::InvalidWeight(_) => Notice::error("Please enter a valid stroke weight."),
            ViewerError::NoLayerSelected => {
                Notice::error("Select a layer before saving styles.")
            }
            ViewerError::UnknownLayer(id) => {
                Notice::error(format!("Layer {id} is no longer available."))
            }
            ViewerError::Api(e) => Notice::error(format!("Layer service request failed: {e}")),
            ViewerError::Prefs(e) => {
                Notice::error(format!("Could not access saved preferences: {e}"))
            }
            ViewerError::Map(e) => Notice::error(format!("Could not render layer: {e}")),
        }
    }
}
