/// A tile source: URL template plus the options the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub min_zoom: Option<u8>,
    pub max_zoom: u8,
    /// Values substituted for `{s}` in the template.
    pub subdomains: &'static [&'static str],
    /// Value substituted for `{ext}` in the template.
    pub ext: Option<&'static str>,
}
