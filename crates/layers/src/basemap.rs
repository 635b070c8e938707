//! Fixed catalog of base tile layers.

use crate::raster::TileSource;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BaseLayerKind {
    Watercolor,
    #[default]
    SatelliteHybrid,
    Topographic,
}

impl BaseLayerKind {
    pub const ALL: [BaseLayerKind; 3] = [
        BaseLayerKind::Watercolor,
        BaseLayerKind::SatelliteHybrid,
        BaseLayerKind::Topographic,
    ];

    /// Name persisted under `selectedBasemap`.
    pub const fn storage_name(self) -> &'static str {
        match self {
            BaseLayerKind::Watercolor => "watercolor",
            BaseLayerKind::SatelliteHybrid => "googleSatHybrid",
            BaseLayerKind::Topographic => "TopPlusOpen_Color",
        }
    }

    /// Parses a persisted name. Unknown names yield `None`.
    pub fn from_storage_name(s: &str) -> Option<Self> {
        match s.trim() {
            "watercolor" => Some(BaseLayerKind::Watercolor),
            "googleSatHybrid" | "satellite-hybrid" => Some(BaseLayerKind::SatelliteHybrid),
            "TopPlusOpen_Color" | "topographic" => Some(BaseLayerKind::Topographic),
            _ => None,
        }
    }

    pub fn source(self) -> &'static TileSource {
        match self {
            BaseLayerKind::Watercolor => &WATERCOLOR,
            BaseLayerKind::SatelliteHybrid => &SATELLITE_HYBRID,
            BaseLayerKind::Topographic => &TOPOGRAPHIC,
        }
    }
}

static WATERCOLOR: TileSource = TileSource {
    url_template: "https://tiles.stadiamaps.com/tiles/stamen_watercolor/{z}/{x}/{y}.{ext}",
    attribution: concat!(
        "&copy; <a href=\"https://www.stadiamaps.com/\" target=\"_blank\">Stadia Maps</a> ",
        "&copy; <a href=\"https://www.stamen.com/\" target=\"_blank\">Stamen Design</a>",
    ),
    min_zoom: Some(1),
    max_zoom: 16,
    subdomains: &[],
    ext: Some("jpg"),
};

static SATELLITE_HYBRID: TileSource = TileSource {
    url_template: "https://{s}.google.com/vt/lyrs=y&x={x}&y={y}&z={z}",
    attribution: "&copy; <a href=\"https://www.google.com/earth/\">Google Earth</a>",
    min_zoom: None,
    max_zoom: 19,
    subdomains: &["mt0", "mt1", "mt2", "mt3"],
    ext: None,
};

static TOPOGRAPHIC: TileSource = TileSource {
    url_template: concat!(
        "http://sgx.geodatenzentrum.de/wmts_topplus_open/tile/1.0.0",
        "/web/default/WEBMERCATOR/{z}/{y}/{x}.png",
    ),
    attribution: "Map data: &copy; <a href=\"http://www.govdata.de/dl-de/by-2-0\">dl-de/by-2-0</a>",
    min_zoom: None,
    max_zoom: 18,
    subdomains: &[],
    ext: None,
};
