//! Request/response flows against the layer service.
//!
//! Every flow borrows the viewer only between awaits: read what the request
//! needs, release, await the response, re-borrow to apply it. Overlapping
//! flows may interleave; keyed reconciliation makes the last applied
//! response win.

use std::cell::RefCell;

use api::{BackendClient, MessageResponse, UpdateAttributesRequest};
use layers::LayerId;
use prefs::PreferenceStore;
use tracing::debug;

use crate::error::ViewerError;
use crate::map::MapWidget;
use crate::overlays::SyncReport;
use crate::style_editor::StyleForm;
use crate::viewer::Viewer;

/// `GET /layers`, then reconcile the overlay set.
pub async fn load_layers<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
) -> Result<SyncReport, ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    debug!("loading layers");
    let response = client.list_layers().await;
    viewer.borrow_mut().apply_layers(response)
}

/// `GET /layers/{id}`, then replace that overlay's geometry and name.
pub async fn refresh_layer<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
    id: &LayerId,
) -> Result<(), ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    let response = client.get_layer(id).await;
    viewer.borrow_mut().apply_layer_detail(response)
}

/// Sends the style form for the selected layer.
pub async fn save_styles<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
    form: &StyleForm,
) -> Result<(), ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    let request = viewer.borrow_mut().begin_style_save(form)?;
    let response = client.update_styles(&request).await;
    viewer.borrow_mut().finish_style_save(&request, response)
}

/// Uploads one file with the default style and reloads all layers.
pub async fn upload_file<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
    file: C::File,
    file_name: &str,
) -> Result<MessageResponse, ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    let request = viewer.borrow().upload_request(file, file_name);
    let response = client.upload_geojson(request).await;
    let ack = viewer.borrow_mut().finish_upload(response)?;
    load_layers(viewer, client).await?;
    Ok(ack)
}

/// Replaces feature properties of a layer and refreshes it.
pub async fn update_attributes<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
    id: &LayerId,
    updated_attributes: serde_json::Value,
) -> Result<MessageResponse, ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    let request = UpdateAttributesRequest { updated_attributes };
    let response = client.update_attributes(id, &request).await;
    let ack = viewer.borrow_mut().finish_attribute_update(id, response)?;
    refresh_layer(viewer, client, id).await?;
    Ok(ack)
}

pub async fn locate_device<M, S, C>(
    viewer: &RefCell<Viewer<M, S>>,
    client: &C,
) -> Result<(), ViewerError>
where
    M: MapWidget,
    S: PreferenceStore,
    C: BackendClient,
{
    let response = client.latest_location().await;
    viewer.borrow_mut().show_device_location(response)
}
