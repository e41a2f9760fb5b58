//! Search controller
//!
//! Owns the status slot and the results list, runs a submission through the
//! fetch (with its one hyphen fallback) and the renderer, and implements the
//! "clear" action.
//!
//! ```text
//! Idle -> Searching -> Empty | Results | Error -> (next submit or clear)
//! ```

use crate::config::Config;
use crate::constants::text::{result_count, status_error, status_retrying, STATUS_NO_RESULTS, STATUS_SEARCHING};
use crate::error::Result;
use crate::features::arcgis::ArcGisClient;
use crate::features::{FeatureCollection, FeatureSource};
use crate::geo::nominatim::NominatimBackend;
use crate::geo::ReverseGeocoder;
use crate::query::{fallback_road_name, SearchInput};
use crate::render::{Renderer, ResultItem, ResultList};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lifecycle state of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    Empty,
    Results,
    Error,
}

/// What a submission ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank road name; nothing fetched, status untouched
    Rejected,
    /// No features, even after the fallback
    Empty,
    /// This many items were rendered
    Results(usize),
    /// The fetch failed with this detail
    Failed(String),
}

/// Controller wired to the live ArcGIS and Nominatim services
pub type LiveController = SearchController<ArcGisClient, NominatimBackend>;

/// The search form
pub struct SearchController<F, G> {
    source: F,
    renderer: Renderer<G>,
    list: ResultList,
    status: watch::Sender<String>,
    count: String,
    results_visible: bool,
    state: SearchState,
    input: SearchInput,
    pending: Vec<JoinHandle<()>>,
}

impl LiveController {
    /// Build a controller from configuration
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ArcGisClient::new(config)?,
            NominatimBackend::new(config)?,
            config,
        ))
    }
}

impl<F, G> SearchController<F, G>
where
    F: FeatureSource,
    G: ReverseGeocoder + 'static,
{
    pub fn new(source: F, geocoder: G, config: &Config) -> Self {
        Self {
            source,
            renderer: Renderer::new(geocoder, config.retry_policy(), config.output.map_link.clone()),
            list: ResultList::new(),
            status: watch::Sender::new(String::new()),
            count: String::new(),
            results_visible: false,
            state: SearchState::Idle,
            input: SearchInput::default(),
            pending: Vec::new(),
        }
    }

    /// Run one submission to completion of the initial render
    ///
    /// Location labels keep arriving afterwards; see [`Self::wait_for_labels`].
    pub async fn submit(&mut self, input: SearchInput) -> SubmitOutcome {
        if input.is_blank() {
            debug!("blank road name, submission ignored");
            return SubmitOutcome::Rejected;
        }

        self.input = input.clone();
        self.hide_results();
        self.set_status(STATUS_SEARCHING);
        self.state = SearchState::Searching;

        let collection = match self.fetch_with_fallback(&input).await {
            Ok(collection) => collection,
            Err(err) => {
                warn!(error = %err, carretera = %input.carretera, "feature search failed");
                let detail = err.to_string();
                self.set_status(&status_error(&detail));
                self.state = SearchState::Error;
                return SubmitOutcome::Failed(detail);
            }
        };

        if collection.is_empty() {
            self.set_status(STATUS_NO_RESULTS);
            self.results_visible = false;
            self.state = SearchState::Empty;
            return SubmitOutcome::Empty;
        }

        let n = collection.len();
        info!(count = n, carretera = %input.carretera, "rendering results");
        self.set_status("");
        self.results_visible = true;
        self.count = result_count(n);
        self.pending = self.renderer.render(&self.list, &collection);
        self.state = SearchState::Results;
        SubmitOutcome::Results(n)
    }

    /// Fetch once, and once more with a hyphenated road name if nothing came back
    async fn fetch_with_fallback(&self, input: &SearchInput) -> Result<FeatureCollection> {
        let collection = self
            .source
            .fetch_features(&input.carretera, &input.pk)
            .await?;

        if !collection.is_empty() {
            return Ok(collection);
        }

        let Some(rewritten) = fallback_road_name(&input.carretera) else {
            return Ok(collection);
        };

        info!(from = %input.carretera, to = %rewritten, "no results, retrying with hyphen");
        self.set_status(&status_retrying(&rewritten));
        self.source.fetch_features(&rewritten, &input.pk).await
    }

    /// Reset the form back to idle
    ///
    /// Lookups still in flight are left running; their writes are dropped by
    /// the list.
    pub fn clear(&mut self) {
        self.input = SearchInput::default();
        self.hide_results();
        self.set_status("");
        self.state = SearchState::Idle;
    }

    fn hide_results(&mut self) {
        self.list.reset();
        self.results_visible = false;
        self.count.clear();
        // detach, not abort
        self.pending.clear();
    }

    /// Wait for the label lookups started by the latest render
    pub async fn wait_for_labels(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(err) = handle.await {
                warn!(error = %err, "location lookup task failed");
            }
        }
    }

    fn set_status(&self, text: &str) {
        debug!(status = text, "status changed");
        self.status.send_replace(text.to_string());
    }

    /// Current status message
    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    /// Follow status changes
    pub fn watch_status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    /// Count label, empty unless results are shown
    pub fn count(&self) -> &str {
        &self.count
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Last accepted input, reset by [`Self::clear`]
    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn list(&self) -> &ResultList {
        &self.list
    }

    pub fn items(&self) -> Vec<ResultItem> {
        self.list.snapshot()
    }
}
