//! Viewport-driven search pipeline (client side)
//!
//! Converts continuous map movement into a bounded stream of search
//! requests:
//!
//! - settle events are debounced: only the last event inside a 500ms quiet
//!   window dispatches, earlier pending dispatches are canceled outright
//! - the search radius is derived from the zoom level
//! - once a request is in flight it is never aborted; a monotone token makes
//!   sure a superseded request that resolves late cannot overwrite fresher
//!   results
//! - a one-shot "locate" action recenters on the device position and
//!   dispatches immediately, bypassing the debounce

use crate::constants::viewport::{
    BASE_ZOOM, DEBOUNCE_MS, RADIUS_AT_BASE_ZOOM, RADIUS_CEILING, RADIUS_FLOOR,
};
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::PositionProvider;
use crate::upstream::Landmark;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The visible map region: center coordinate plus zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Search radius for this viewport, derived from the zoom level
    pub fn radius(&self) -> f64 {
        radius_for_zoom(self.zoom)
    }
}

/// Search radius in meters for a zoom level
///
/// `50000 / 2^(zoom - 10)`, clamped to [1000, 10000]: zoomed-out views ask
/// for the upstream maximum, zoomed-in views are floored so nearby results
/// are never starved.
pub fn radius_for_zoom(zoom: f64) -> f64 {
    (RADIUS_AT_BASE_ZOOM / 2f64.powf(zoom - BASE_ZOOM)).clamp(RADIUS_FLOOR, RADIUS_CEILING)
}

/// Observable state of the viewport search pipeline
///
/// `Ready` with an empty list means "nothing nearby"; `Failed` means the
/// fetch errored out. The two are deliberately distinct states.
#[derive(Debug, Clone)]
pub enum ViewState {
    Idle,
    Loading,
    Ready {
        viewport: Viewport,
        landmarks: Vec<Landmark>,
    },
    Failed {
        message: String,
    },
}

/// Seam between the controller and whatever performs the search
///
/// The bundled [`crate::client::ApiClient`] implements this against the
/// proxy; tests use recording stubs.
pub trait SearchDispatcher: Send + Sync + 'static {
    fn search(
        &self,
        center: Coordinates,
        radius: f64,
    ) -> impl std::future::Future<Output = Result<Vec<Landmark>>> + Send;
}

/// Debouncing controller between map movement and search dispatch
pub struct ViewportController<D: SearchDispatcher> {
    dispatcher: Arc<D>,
    debounce: Duration,
    /// Monotone token; the newest dispatched request owns the state
    seq: Arc<AtomicU64>,
    /// The scheduled-but-not-yet-dispatched debounce task, if any
    pending: Mutex<Option<JoinHandle<()>>>,
    state: watch::Sender<ViewState>,
}

impl<D: SearchDispatcher> ViewportController<D> {
    /// Create a controller with the standard 500ms quiet window
    pub fn new(dispatcher: D) -> Self {
        Self::with_debounce(dispatcher, Duration::from_millis(DEBOUNCE_MS))
    }

    /// Create a controller with a custom quiet window
    pub fn with_debounce(dispatcher: D, debounce: Duration) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            dispatcher: Arc::new(dispatcher),
            debounce,
            seq: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            state,
        }
    }

    /// Subscribe to pipeline state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Handle a map-settled event
    ///
    /// Cancels any dispatch still waiting out the quiet window and schedules
    /// a new one for this viewport. A dispatch that already started is left
    /// running; the token check discards its result if it loses the race.
    pub fn on_settle(&self, viewport: Viewport) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(task) = pending.take() {
            task.abort();
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let seq = Arc::clone(&self.seq);
        let state = self.state.clone();
        let debounce = self.debounce;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Quiet window survived: commit the request. Detach it so a
            // later settle can supersede but no longer cancel it.
            tokio::spawn(dispatch(dispatcher, seq, state, viewport));
        }));
    }

    /// Dispatch a search for `viewport` immediately, without debouncing
    pub fn dispatch_now(&self, viewport: Viewport) {
        tokio::spawn(dispatch(
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.seq),
            self.state.clone(),
            viewport,
        ));
    }

    /// One-shot locate: query the device position, recenter, search now
    ///
    /// Independent of the debounce path. Returns the viewport that was
    /// dispatched so the caller can recenter its map widget.
    pub async fn locate<P: PositionProvider>(&self, provider: &P, zoom: f64) -> Result<Viewport> {
        let position = provider.position().await?;
        let viewport = Viewport::new(Coordinates::new(position.lat, position.lon), zoom);
        self.dispatch_now(viewport);
        Ok(viewport)
    }
}

/// Run one search and publish its outcome unless it was superseded
async fn dispatch<D: SearchDispatcher>(
    dispatcher: Arc<D>,
    seq: Arc<AtomicU64>,
    state: watch::Sender<ViewState>,
    viewport: Viewport,
) {
    let token = seq.fetch_add(1, Ordering::SeqCst) + 1;
    let _ = state.send(ViewState::Loading);

    let result = dispatcher.search(viewport.center, viewport.radius()).await;

    // A newer request was dispatched while this one was in flight
    if seq.load(Ordering::SeqCst) != token {
        return;
    }

    let next = match result {
        Ok(landmarks) => ViewState::Ready { viewport, landmarks },
        Err(err) => ViewState::Failed {
            message: err.to_string(),
        },
    };
    let _ = state.send(next);
}
