//! Result rendering
//!
//! Turns fetched features into [`ResultItem`]s, appends them to the
//! [`ResultList`] straight away with a loading label, and spawns one detached
//! task per item that backfills the reverse-geocoded location.
//!
//! Nothing cancels those tasks. The list instead carries a generation counter
//! that every reset bumps; a label write for an older generation, a missing
//! item, or an item whose label is already final is dropped.

pub mod html;

use crate::constants::text::{LOADING_LABEL, NO_LINK, UNKNOWN};
use crate::features::{Feature, FeatureCollection};
use crate::geo::retry::{resolve_location, RetryPolicy};
use crate::geo::{Coordinates, ReverseGeocoder};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// Location label of a result item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "text")]
pub enum LocationLabel {
    Loading,
    Resolved(String),
}

impl LocationLabel {
    pub fn text(&self) -> &str {
        match self {
            LocationLabel::Loading => LOADING_LABEL,
            LocationLabel::Resolved(label) => label,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LocationLabel::Loading)
    }
}

/// One rendered kilometer point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    /// Position in service order
    pub index: usize,
    pub nombre: String,
    pub numero: String,
    pub sentido: String,
    pub fuente: String,
    pub coordinates: Option<Coordinates>,
    pub map_link: String,
    pub label: LocationLabel,
}

impl ResultItem {
    /// Build the item for a feature
    ///
    /// Items without coordinates start with the unknown placeholder since no
    /// lookup will ever run for them.
    pub fn from_feature(index: usize, feature: &Feature, link_template: &str) -> Self {
        let coordinates = feature.coordinates();
        let label = match coordinates {
            Some(_) => LocationLabel::Loading,
            None => LocationLabel::Resolved(UNKNOWN.to_string()),
        };

        Self {
            index,
            nombre: feature.nombre(),
            numero: feature.numero(),
            sentido: feature.sentido(),
            fuente: feature.fuente(),
            coordinates,
            map_link: map_link(link_template, coordinates),
            label,
        }
    }
}

/// Fill a `{lat}`/`{lng}` template, or `#` without coordinates
pub fn map_link(template: &str, coords: Option<Coordinates>) -> String {
    match coords {
        Some(c) => template
            .replace("{lat}", &c.lat.to_string())
            .replace("{lng}", &c.lon.to_string()),
        None => NO_LINK.to_string(),
    }
}

/// Change notifications for front ends that draw incrementally
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Reset,
    Appended(ResultItem),
    LabelResolved { index: usize, label: String },
}

/// Where a spawned lookup should write its label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    pub generation: u64,
    pub index: usize,
}

#[derive(Debug, Default)]
struct ListState {
    generation: u64,
    items: Vec<ResultItem>,
    events: Option<UnboundedSender<ListEvent>>,
}

impl ListState {
    fn emit(&self, event: ListEvent) {
        if let Some(tx) = &self.events {
            // receiver gone just means nobody is drawing
            let _ = tx.send(event);
        }
    }
}

/// The results container, shared with the label tasks
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    inner: Arc<Mutex<ListState>>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive list events from now on, replacing any previous subscriber
    pub fn subscribe(&self) -> UnboundedReceiver<ListEvent> {
        let (tx, rx) = unbounded_channel();
        self.state().events = Some(tx);
        rx
    }

    /// Remove all items and invalidate outstanding label writes
    pub fn reset(&self) -> u64 {
        let mut state = self.state();
        state.generation += 1;
        state.items.clear();
        state.emit(ListEvent::Reset);
        state.generation
    }

    /// Append an item, re-indexing it to its position in the list
    pub fn append(&self, mut item: ResultItem) -> ItemSlot {
        let mut state = self.state();
        item.index = state.items.len();
        let slot = ItemSlot {
            generation: state.generation,
            index: item.index,
        };
        state.emit(ListEvent::Appended(item.clone()));
        state.items.push(item);
        slot
    }

    /// Write the final label for a slot
    ///
    /// Returns false, leaving the list untouched, when the slot belongs to an
    /// older generation or its label is already final.
    pub fn resolve_label(&self, slot: ItemSlot, label: String) -> bool {
        let mut state = self.state();
        if state.generation != slot.generation {
            return false;
        }
        let Some(item) = state.items.get_mut(slot.index) else {
            return false;
        };
        if !item.label.is_loading() {
            return false;
        }
        item.label = LocationLabel::Resolved(label.clone());
        state.emit(ListEvent::LabelResolved {
            index: slot.index,
            label,
        });
        true
    }

    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    /// Copy of the current items
    pub fn snapshot(&self) -> Vec<ResultItem> {
        self.state().items.clone()
    }
}

/// Populates a [`ResultList`] and starts the label lookups
#[derive(Debug)]
pub struct Renderer<G> {
    geocoder: Arc<G>,
    policy: RetryPolicy,
    link_template: String,
}

impl<G> Renderer<G>
where
    G: ReverseGeocoder + 'static,
{
    pub fn new(geocoder: G, policy: RetryPolicy, link_template: impl Into<String>) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            policy,
            link_template: link_template.into(),
        }
    }

    /// Replace the list contents with one item per feature
    ///
    /// Items are appended synchronously in feature order. The returned handles
    /// belong to the detached label tasks; dropping them does not stop them.
    pub fn render(&self, list: &ResultList, collection: &FeatureCollection) -> Vec<JoinHandle<()>> {
        list.reset();
        let mut handles = Vec::new();

        for (index, feature) in collection.features().iter().enumerate() {
            let item = ResultItem::from_feature(index, feature, &self.link_template);
            let coords = item.coordinates;
            let slot = list.append(item);

            let Some(coords) = coords else {
                continue;
            };

            let geocoder = Arc::clone(&self.geocoder);
            let list = list.clone();
            let policy = self.policy;
            handles.push(tokio::spawn(async move {
                let label = resolve_location(geocoder.as_ref(), coords, policy).await;
                if !list.resolve_label(slot, label) {
                    debug!(index = slot.index, generation = slot.generation, "dropping stale location label");
                }
            }));
        }

        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_MAP_LINK;
    use crate::error::{Error, Result};
    use crate::geo::Address;
    use std::time::Duration;

    struct FixedGeocoder;

    impl ReverseGeocoder for FixedGeocoder {
        async fn reverse(&self, coords: Coordinates) -> Result<Address> {
            if coords.lat < 0.0 {
                return Err(Error::Geocoding("southern hemisphere".to_string()));
            }
            Ok(Address {
                town: Some(format!("Town {}", coords.lat)),
                province: Some("Cuenca".to_string()),
                ..Default::default()
            })
        }
    }

    fn feature(json: serde_json::Value) -> Feature {
        serde_json::from_value(json).unwrap()
    }

    fn collection(features: Vec<serde_json::Value>) -> FeatureCollection {
        serde_json::from_value(serde_json::json!({ "features": features })).unwrap()
    }

    fn quick_renderer() -> Renderer<FixedGeocoder> {
        let policy = RetryPolicy {
            max_retries: 2,
            delay: Duration::from_millis(1),
        };
        Renderer::new(FixedGeocoder, policy, DEFAULT_MAP_LINK)
    }

    #[test]
    fn test_item_from_feature() {
        let f = feature(serde_json::json!({
            "attributes": { "nombre": "A-1", "numero": "5", "sentidopkd": "creciente", "fuented": "IGN" },
            "geometry": { "x": -3.7, "y": 40.4 }
        }));
        let item = ResultItem::from_feature(0, &f, DEFAULT_MAP_LINK);

        assert_eq!(item.nombre, "A-1");
        assert_eq!(item.numero, "5");
        assert_eq!(item.sentido, "creciente");
        assert_eq!(item.fuente, "IGN");
        assert_eq!(item.map_link, "https://www.google.com/maps?q=40.4,-3.7");
        assert_eq!(item.label, LocationLabel::Loading);
        assert_eq!(item.label.text(), "Cargando municipio/provincia...");
    }

    #[test]
    fn test_item_without_coordinates() {
        let f = feature(serde_json::json!({ "attributes": { "nombre": "N-II" } }));
        let item = ResultItem::from_feature(3, &f, DEFAULT_MAP_LINK);

        assert_eq!(item.map_link, "#");
        assert_eq!(item.label, LocationLabel::Resolved(UNKNOWN.to_string()));
        assert_eq!(item.numero, UNKNOWN);
    }

    #[test]
    fn test_map_link_template() {
        let link = map_link(
            "https://www.openstreetmap.org/#map=18/{lat}/{lng}",
            Some(Coordinates::new(41.0, 2.15)),
        );
        assert_eq!(link, "https://www.openstreetmap.org/#map=18/41/2.15");
        assert_eq!(map_link(DEFAULT_MAP_LINK, None), "#");
    }

    #[test]
    fn test_label_written_once() {
        let list = ResultList::new();
        let f = feature(serde_json::json!({ "geometry": { "x": 1.0, "y": 2.0 } }));
        let slot = list.append(ResultItem::from_feature(0, &f, DEFAULT_MAP_LINK));

        assert!(list.resolve_label(slot, "Soria / Soria".to_string()));
        assert!(!list.resolve_label(slot, "Otra / Otra".to_string()));
        assert_eq!(list.snapshot()[0].label.text(), "Soria / Soria");
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let list = ResultList::new();
        let f = feature(serde_json::json!({ "geometry": { "x": 1.0, "y": 2.0 } }));
        let stale = list.append(ResultItem::from_feature(0, &f, DEFAULT_MAP_LINK));

        list.reset();
        assert!(!list.resolve_label(stale, "Soria / Soria".to_string()));
        assert!(list.is_empty());

        // same index in the new generation is a different item
        let fresh = list.append(ResultItem::from_feature(0, &f, DEFAULT_MAP_LINK));
        assert!(!list.resolve_label(stale, "Soria / Soria".to_string()));
        assert!(list.resolve_label(fresh, "Teruel / Teruel".to_string()));
    }

    #[test]
    fn test_events() {
        let list = ResultList::new();
        let mut rx = list.subscribe();
        let f = feature(serde_json::json!({ "geometry": { "x": 1.0, "y": 2.0 } }));

        list.reset();
        let slot = list.append(ResultItem::from_feature(0, &f, DEFAULT_MAP_LINK));
        list.resolve_label(slot, "Soria / Soria".to_string());

        assert_eq!(rx.try_recv().unwrap(), ListEvent::Reset);
        assert!(matches!(rx.try_recv().unwrap(), ListEvent::Appended(item) if item.index == 0));
        assert_eq!(
            rx.try_recv().unwrap(),
            ListEvent::LabelResolved {
                index: 0,
                label: "Soria / Soria".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_render_keeps_feature_order_and_backfills() {
        let list = ResultList::new();
        let renderer = quick_renderer();
        let features = collection(vec![
            serde_json::json!({ "attributes": { "numero": "1" }, "geometry": { "x": 0.5, "y": 10.0 } }),
            serde_json::json!({ "attributes": { "numero": "2" } }),
            serde_json::json!({ "attributes": { "numero": "3" }, "geometry": { "x": 0.5, "y": -10.0 } }),
        ]);

        let handles = renderer.render(&list, &features);
        let items = list.snapshot();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items.iter().map(|i| i.numero.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
        assert_eq!(handles.len(), 2, "one lookup per item with coordinates");

        for handle in handles {
            handle.await.unwrap();
        }

        let items = list.snapshot();
        assert_eq!(items[0].label.text(), "Town 10 / Cuenca");
        assert_eq!(items[1].label.text(), UNKNOWN);
        assert_eq!(items[2].label.text(), UNKNOWN, "exhausted retries settle on the placeholder");
    }

    #[tokio::test]
    async fn test_render_replaces_previous_items() {
        let list = ResultList::new();
        let renderer = quick_renderer();

        let first = collection(vec![serde_json::json!({ "attributes": { "numero": "1" } })]);
        let second = collection(vec![
            serde_json::json!({ "attributes": { "numero": "7" } }),
            serde_json::json!({ "attributes": { "numero": "8" } }),
        ]);

        renderer.render(&list, &first);
        renderer.render(&list, &second);

        let items = list.snapshot();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].numero, "7");
    }
}
