use std::collections::{HashMap, HashSet};

use api::LayerDetail;
use layers::{LayerId, OverlayLayer, StyleRecord};
use tracing::{debug, error, warn};

use crate::map::{MapError, MapWidget};

/// A rendered overlay and the record it was rendered from.
#[derive(Debug)]
pub struct OverlayEntry<O> {
    pub layer: OverlayLayer,
    pub handle: O,
}

/// One row of the side list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerListEntry {
    pub layer_id: LayerId,
    pub label: String,
}

/// Outcome of reconciling against the backend's layer set.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
    pub recreated: usize,
    pub restyled: usize,
    pub unchanged: usize,
    /// Records the map widget refused to render.
    pub failed: usize,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.added + self.removed + self.recreated + self.restyled > 0
    }
}

/// Overlays keyed by layer id, kept in the backend's order.
///
/// The side list is derived from the same entries, so map objects and list
/// rows always come in matching pairs.
#[derive(Debug)]
pub struct OverlayManager<O> {
    entries: Vec<OverlayEntry<O>>,
}

impl<O> Default for OverlayManager<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O> OverlayManager<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &LayerId) -> Option<&OverlayEntry<O>> {
        self.entries.iter().find(|e| &e.layer.layer_id == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn list_entries(&self) -> Vec<LayerListEntry> {
        self.entries
            .iter()
            .map(|e| LayerListEntry {
                layer_id: e.layer.layer_id.clone(),
                label: e.layer.layer_name.clone(),
            })
            .collect()
    }

    /// Makes the rendered set mirror `records`.
    ///
    /// Existing overlays are reused when their geometry is unchanged and
    /// restyled in place when only the style differs. Duplicate ids in
    /// `records` keep their first occurrence.
    pub fn sync<M: MapWidget<Overlay = O>>(
        &mut self,
        map: &mut M,
        records: Vec<OverlayLayer>,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        let mut previous: HashMap<LayerId, OverlayEntry<O>> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|e| (e.layer.layer_id.clone(), e))
            .collect();
        let mut seen: HashSet<LayerId> = HashSet::with_capacity(records.len());
        let mut next: Vec<OverlayEntry<O>> = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.layer_id.clone()) {
                warn!(layer_id = %record.layer_id, "backend listed layer twice, keeping first");
                continue;
            }

            match previous.remove(&record.layer_id) {
                Some(existing) if existing.layer.geojson_data != record.geojson_data => {
                    map.remove_overlay(&existing.handle);
                    match render(map, record) {
                        Some(entry) => {
                            report.recreated += 1;
                            next.push(entry);
                        }
                        None => report.failed += 1,
                    }
                }
                Some(mut existing) => {
                    if existing.layer.styles != record.styles {
                        map.set_overlay_style(&existing.handle, &record.styles);
                        report.restyled += 1;
                    } else {
                        report.unchanged += 1;
                    }
                    existing.layer = record;
                    next.push(existing);
                }
                None => match render(map, record) {
                    Some(entry) => {
                        report.added += 1;
                        next.push(entry);
                    }
                    None => report.failed += 1,
                },
            }
        }

        for (_, stale) in previous {
            map.remove_overlay(&stale.handle);
            report.removed += 1;
        }

        self.entries = next;
        debug!(?report, total = self.entries.len(), "overlays reconciled");
        report
    }

    /// Replaces one overlay's geometry and name, keeping its style.
    pub fn replace_detail<M: MapWidget<Overlay = O>>(
        &mut self,
        map: &mut M,
        detail: LayerDetail,
    ) -> Result<(), MapError> {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.layer.layer_id == detail.layer_id)
        else {
            return Err(MapError(format!("layer {} is not rendered", detail.layer_id)));
        };

        let entry = &mut self.entries[pos];
        if entry.layer.geojson_data != detail.geojson_data {
            let handle = map.add_overlay(&detail.geojson_data, &entry.layer.styles)?;
            map.remove_overlay(&entry.handle);
            entry.handle = handle;
            entry.layer.geojson_data = detail.geojson_data;
        }
        entry.layer.layer_name = detail.layer_name;
        Ok(())
    }

    /// Restyles a rendered overlay. Returns `false` if `id` is unknown.
    pub fn restyle<M: MapWidget<Overlay = O>>(
        &mut self,
        map: &mut M,
        id: &LayerId,
        style: &StyleRecord,
    ) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| &e.layer.layer_id == id) else {
            return false;
        };
        map.set_overlay_style(&entry.handle, style);
        entry.layer.styles = style.clone();
        true
    }
}

fn render<M: MapWidget>(map: &mut M, layer: OverlayLayer) -> Option<OverlayEntry<M::Overlay>> {
    match map.add_overlay(&layer.geojson_data, &layer.styles) {
        Ok(handle) => Some(OverlayEntry { layer, handle }),
        Err(err) => {
            error!(layer_id = %layer.layer_id, %err, "failed to render overlay");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMap, layer};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn repeated_sync_does_not_duplicate() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        let records = vec![layer("a", "roads"), layer("b", "parcels")];

        let first = overlays.sync(&mut map, records.clone());
        assert_eq!(first.added, 2);
        let second = overlays.sync(&mut map, records);
        assert_eq!(second.unchanged, 2);
        assert!(!second.changed());

        assert_eq!(overlays.len(), 2);
        assert_eq!(map.overlays.len(), 2);
    }

    #[test]
    fn list_follows_backend_order() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads"), layer("b", "parcels")]);
        overlays.sync(&mut map, vec![layer("b", "parcels"), layer("a", "roads")]);

        let labels: Vec<String> = overlays.list_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["parcels".to_string(), "roads".to_string()]);
    }

    #[test]
    fn sync_removes_stale_and_restyles_changed() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads"), layer("b", "parcels")]);

        let mut restyled = layer("a", "roads");
        restyled.styles = StyleRecord::new("#00ff00", "#0000ff", 5);
        let report = overlays.sync(&mut map, vec![restyled.clone()]);

        assert_eq!(report.removed, 1);
        assert_eq!(report.restyled, 1);
        assert_eq!(map.overlays.len(), 1);
        let handle = &overlays.get(&LayerId::new("a")).unwrap().handle;
        assert_eq!(map.overlays[handle].1, restyled.styles);
    }

    #[test]
    fn changed_geometry_recreates_overlay() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads")]);
        let old_handle = overlays.get(&LayerId::new("a")).unwrap().handle;

        let mut moved = layer("a", "roads");
        moved.geojson_data =
            json!({"type": "FeatureCollection", "features": [{"type": "Feature"}]});
        let report = overlays.sync(&mut map, vec![moved]);

        assert_eq!(report.recreated, 1);
        assert!(!map.overlays.contains_key(&old_handle));
        assert_eq!(map.overlays.len(), 1);
    }

    #[test]
    fn unrenderable_records_are_skipped_with_their_list_row() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        let mut broken = layer("x", "broken");
        broken.geojson_data = serde_json::Value::Null;

        let report = overlays.sync(&mut map, vec![broken, layer("a", "roads")]);
        assert_eq!(report.failed, 1);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays.list_entries().len(), map.overlays.len());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "first"), layer("a", "second")]);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays.list_entries()[0].label, "first");
    }

    #[test]
    fn replace_detail_keeps_style() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        let mut styled = layer("a", "roads");
        styled.styles = StyleRecord::new("#123456", "#654321", 4);
        overlays.sync(&mut map, vec![styled.clone()]);

        overlays
            .replace_detail(
                &mut map,
                LayerDetail {
                    layer_id: LayerId::new("a"),
                    layer_name: "roads v2".to_string(),
                    geojson_data: json!({
                        "type": "FeatureCollection",
                        "features": [{"type": "Feature"}]
                    }),
                },
            )
            .unwrap();

        let entry = overlays.get(&LayerId::new("a")).unwrap();
        assert_eq!(entry.layer.layer_name, "roads v2");
        assert_eq!(map.overlays[&entry.handle].1, styled.styles);
        assert_eq!(map.overlays.len(), 1);
    }
}
