use foundation::Viewpoint;
use foundation::parse::{parse_finite, parse_truncated_i32};
use layers::BaseLayerKind;
use prefs::{PrefKey, PreferenceStore, PrefsError};
use tracing::warn;

/// Typed view over the preference store: default viewpoint and base layer.
///
/// Reads never fail; absent, unreadable or non-numeric entries fall back to
/// their defaults.
#[derive(Debug)]
pub struct ViewPreferences<S> {
    store: S,
}

impl<S: PreferenceStore> ViewPreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn viewpoint(&self) -> Viewpoint {
        let lat = self
            .read_with(PrefKey::DefaultLat, parse_finite)
            .unwrap_or(Viewpoint::DEFAULT_LAT);
        let lng = self
            .read_with(PrefKey::DefaultLng, parse_finite)
            .unwrap_or(Viewpoint::DEFAULT_LNG);
        let zoom = self
            .read_with(PrefKey::DefaultZoom, parse_truncated_i32)
            .unwrap_or(Viewpoint::DEFAULT_ZOOM);
        Viewpoint::new(lat, lng, zoom)
    }

    pub fn save_viewpoint(&mut self, view: Viewpoint) -> Result<(), PrefsError> {
        self.store.set(PrefKey::DefaultLat, &view.lat().to_string())?;
        self.store.set(PrefKey::DefaultLng, &view.lng().to_string())?;
        self.store.set(PrefKey::DefaultZoom, &view.zoom.to_string())?;
        Ok(())
    }

    pub fn base_layer(&self) -> BaseLayerKind {
        self.read_with(PrefKey::SelectedBasemap, BaseLayerKind::from_storage_name)
            .unwrap_or_default()
    }

    pub fn save_base_layer(&mut self, kind: BaseLayerKind) -> Result<(), PrefsError> {
        self.store.set(PrefKey::SelectedBasemap, kind.storage_name())
    }

    /// Removes stored entries that do not parse, so they stop being
    /// re-read (and warned about) on every load. Returns how many went.
    pub fn prune_invalid(&mut self) -> Result<usize, PrefsError> {
        let mut pruned = 0;
        for key in PrefKey::ALL {
            let Some(raw) = self.store.get(key)? else {
                continue;
            };
            let valid = match key {
                PrefKey::DefaultLat | PrefKey::DefaultLng => parse_finite(&raw).is_some(),
                PrefKey::DefaultZoom => parse_truncated_i32(&raw).is_some(),
                PrefKey::SelectedBasemap => BaseLayerKind::from_storage_name(&raw).is_some(),
            };
            if !valid {
                warn!(key = key.as_str(), value = %raw, "removing unparsable stored preference");
                self.store.remove(key)?;
                pruned += 1;
            }
        }
        Ok(pruned)
    }

    fn read_with<T>(&self, key: PrefKey, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = key.as_str(), %err, "preference read failed, using default");
                return None;
            }
        };
        let parsed = parse(&raw);
        if parsed.is_none() {
            warn!(key = key.as_str(), value = %raw, "ignoring unparsable stored preference");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::store_with;
    use prefs::InMemoryPreferenceStore;

    #[test]
    fn empty_store_yields_defaults() {
        let p = ViewPreferences::new(InMemoryPreferenceStore::new());
        assert_eq!(p.viewpoint(), Viewpoint::default());
        assert_eq!(p.base_layer(), BaseLayerKind::SatelliteHybrid);
    }

    #[test]
    fn invalid_entries_fall_back_per_field() {
        let store = store_with([
            (PrefKey::DefaultLat, "abc"),
            (PrefKey::DefaultLng, "12.25"),
            (PrefKey::DefaultZoom, "7"),
            (PrefKey::SelectedBasemap, "mystery"),
        ]);
        let p = ViewPreferences::new(store);
        assert_eq!(p.viewpoint(), Viewpoint::new(6.0, 12.25, 7));
        assert_eq!(p.base_layer(), BaseLayerKind::SatelliteHybrid);
    }

    #[test]
    fn prune_removes_only_unparsable_entries() {
        let store = store_with([
            (PrefKey::DefaultLat, "abc"),
            (PrefKey::DefaultLng, "12.25"),
            (PrefKey::DefaultZoom, "7.9"),
            (PrefKey::SelectedBasemap, "mystery"),
        ]);
        let mut p = ViewPreferences::new(store);
        assert_eq!(p.prune_invalid().unwrap(), 2);
        assert_eq!(p.store().get(PrefKey::DefaultLat).unwrap(), None);
        assert_eq!(p.store().get(PrefKey::SelectedBasemap).unwrap(), None);
        assert_eq!(p.viewpoint(), Viewpoint::new(6.0, 12.25, 7));
        assert_eq!(p.prune_invalid().unwrap(), 0);
    }

    #[test]
    fn saved_values_are_plain_strings() {
        let mut p = ViewPreferences::new(InMemoryPreferenceStore::new());
        p.save_viewpoint(Viewpoint::new(48.5, -3.25, 11)).unwrap();
        p.save_base_layer(BaseLayerKind::Topographic).unwrap();

        let store = p.store();
        assert_eq!(store.get(PrefKey::DefaultLat).unwrap().as_deref(), Some("48.5"));
        assert_eq!(store.get(PrefKey::DefaultLng).unwrap().as_deref(), Some("-3.25"));
        assert_eq!(store.get(PrefKey::DefaultZoom).unwrap().as_deref(), Some("11"));
        assert_eq!(
            store.get(PrefKey::SelectedBasemap).unwrap().as_deref(),
            Some("TopPlusOpen_Color")
        );
    }
}
