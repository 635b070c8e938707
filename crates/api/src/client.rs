use layers::LayerId;

use crate::error::ApiError;
use crate::protocol::{
    DeviceLocation, LayerDetail, LayerRecord, MessageResponse, UpdateAttributesRequest,
    UpdateStylesRequest, UploadRequest,
};

/// Request/response contract of the layer backend.
///
/// Futures are not `Send`: the client runs on the browser's single thread.
#[allow(async_fn_in_trait)]
pub trait BackendClient {
    /// Platform file handle carried by uploads.
    type File;

    async fn list_layers(&self) -> Result<Vec<LayerRecord>, ApiError>;

    async fn get_layer(&self, id: &LayerId) -> Result<LayerDetail, ApiError>;

    async fn upload_geojson(
        &self,
        request: UploadRequest<Self::File>,
    ) -> Result<MessageResponse, ApiError>;

    async fn update_styles(
        &self,
        request: &UpdateStylesRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn update_attributes(
        &self,
        id: &LayerId,
        request: &UpdateAttributesRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn latest_location(&self) -> Result<DeviceLocation, ApiError>;
}
