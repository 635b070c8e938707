use api::UploadRequest;
use layers::StyleRecord;

/// Packages a picked file for `POST /upload_geojson`.
///
/// The file's own name becomes the layer name. No content checks happen
/// client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFlow {
    default_style: StyleRecord,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self {
            default_style: StyleRecord::upload_default(),
        }
    }
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request<F>(&self, file: F, file_name: &str) -> UploadRequest<F> {
        UploadRequest {
            file,
            layer_name: file_name.to_string(),
            styles: self.default_style.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_file_name_and_default_style() {
        let req = UploadFlow::new().request(vec![1u8, 2, 3], "parcels.geojson");
        assert_eq!(req.layer_name, "parcels.geojson");
        assert_eq!(req.styles, StyleRecord::new("#ff7800", "#000000", 2));
        assert_eq!(req.file, vec![1, 2, 3]);
    }
}
