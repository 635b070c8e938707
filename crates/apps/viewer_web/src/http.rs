use api::{
    ApiError, BackendClient, DeviceLocation, Endpoints, LayerDetail, LayerRecord,
    MessageResponse, UPLOAD_FIELD_FILE, UPLOAD_FIELD_LAYER_NAME, UPLOAD_FIELD_STYLES,
    UpdateAttributesRequest, UpdateStylesRequest, UploadRequest, decode_layer_list,
};
use gloo_net::http::{Request, Response};
use layers::LayerId;
use serde::de::DeserializeOwned;
use tracing::debug;
use web_sys::{File, FormData};

use crate::js_error_text;

fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

fn encode(e: gloo_net::Error) -> ApiError {
    ApiError::Encode(e.to_string())
}

/// Reads a success body, or turns a non-2xx answer into `ApiError::Status`.
async fn read_body(resp: Response) -> Result<String, ApiError> {
    let ok = resp.ok();
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    if !ok {
        return Err(ApiError::from_status(status, &body));
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    Ok(serde_json::from_str(&read_body(resp).await?)?)
}

/// Layer backend over `fetch`.
#[derive(Debug, Clone)]
pub struct GlooBackendClient {
    endpoints: Endpoints,
}

impl GlooBackendClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    async fn get(&self, url: &str) -> Result<Response, ApiError> {
        debug!(url, "GET");
        Request::get(url).send().await.map_err(transport)
    }
}

impl BackendClient for GlooBackendClient {
    type File = File;

    async fn list_layers(&self) -> Result<Vec<LayerRecord>, ApiError> {
        let resp = self.get(&self.endpoints.layers()).await?;
        decode_layer_list(&read_body(resp).await?)
    }

    async fn get_layer(&self, id: &LayerId) -> Result<LayerDetail, ApiError> {
        read_json(self.get(&self.endpoints.layer(id)).await?).await
    }

    async fn upload_geojson(
        &self,
        request: UploadRequest<File>,
    ) -> Result<MessageResponse, ApiError> {
        let styles = request
            .styles_json()
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let form = FormData::new().map_err(|e| ApiError::Encode(js_error_text(&e)))?;
        form.append_with_blob(UPLOAD_FIELD_FILE, &request.file)
            .and_then(|_| form.append_with_str(UPLOAD_FIELD_LAYER_NAME, &request.layer_name))
            .and_then(|_| form.append_with_str(UPLOAD_FIELD_STYLES, &styles))
            .map_err(|e| ApiError::Encode(js_error_text(&e)))?;

        let url = self.endpoints.upload_geojson();
        debug!(url = %url, layer_name = %request.layer_name, "POST");
        let resp = Request::post(&url)
            .body(form)
            .map_err(encode)?
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn update_styles(
        &self,
        request: &UpdateStylesRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoints.update_styles();
        debug!(url = %url, layer_id = %request.layer_id, "PUT");
        let resp = Request::put(&url)
            .json(request)
            .map_err(encode)?
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn update_attributes(
        &self,
        id: &LayerId,
        request: &UpdateAttributesRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoints.update_attributes(id);
        debug!(url = %url, "PUT");
        let resp = Request::put(&url)
            .json(request)
            .map_err(encode)?
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn latest_location(&self) -> Result<DeviceLocation, ApiError> {
        read_json(self.get(&self.endpoints.location()).await?).await
    }
}
