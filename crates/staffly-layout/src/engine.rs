//! Dashboard layout engine
//!
//! Owns the card order for the current restaurant and keeps it in sync
//! with the layout endpoint.
//!
//! # States
//!
//! ```text
//! Loading ──fetch ok──▶ Ready (server order, reconciled)
//!    └────fetch err───▶ Ready (default order, load error recorded)
//!
//! Ready: Idle ──long-press / begin_drag──▶ Reorder
//!        Reorder ──drop on card──▶ Reorder   (persist)
//!        Reorder ──drop nowhere / cancel / tap outside──▶ Idle (persist)
//! ```
//!
//! Every asynchronous completion is checked against the context generation
//! that started it, so a late answer for a previous restaurant is dropped.
//! Saves are serialized and always send the layout held at the moment the
//! save actually runs.

use crate::api::LayoutApi;
use crate::card::{default_order, CardId};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, DEFAULT_PERSIST_MESSAGE};
use crate::events::{DashboardEvent, EventBus};
use crate::gesture::{Point, PointerId, PressEvent, PressTracker};
use crate::layout::{reconcile, Layout};
use crate::optimistic::OptimisticLayout;
use crate::toast::{Toast, ToastId, ToastQueue};
use parking_lot::Mutex;
use staffly_access::RestaurantId;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Loading state of the current restaurant context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the remote layout
    Loading,
    /// A layout is available
    Ready,
}

/// Interaction mode overlaid on [`Phase::Ready`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cards are static
    Idle,
    /// Cards can be dragged
    Reorder,
}

/// Result of [`LayoutEngine::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Server layout loaded
    Loaded,
    /// Server unreachable; default order in use
    FellBack,
    /// A newer context started before the answer arrived
    Superseded,
}

/// Successful result of [`LayoutEngine::persist`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Server stored the layout; carries the confirmed value
    Saved(Layout),
    /// Layout equals the last confirmed one; nothing sent
    Unchanged,
    /// No restaurant context (or still loading); nothing sent
    NoContext,
    /// The context changed while the save was in flight
    Superseded,
}

#[derive(Debug, Clone)]
struct DragSession {
    pointer: PointerId,
    active: CardId,
}

#[derive(Debug)]
struct EngineState {
    restaurant: Option<RestaurantId>,
    generation: u64,
    phase: Phase,
    available: Vec<CardId>,
    layout: OptimisticLayout,
    mode: Mode,
    drag: Option<DragSession>,
    press: PressTracker,
    load_error: Option<String>,
    toasts: ToastQueue,
}

impl EngineState {
    fn new(config: &LayoutConfig) -> Self {
        Self {
            restaurant: None,
            generation: 0,
            phase: Phase::Loading,
            available: Vec::new(),
            layout: OptimisticLayout::default(),
            mode: Mode::Idle,
            drag: None,
            press: PressTracker::new(config),
            load_error: None,
            toasts: ToastQueue::new(config.toast_ttl()),
        }
    }

    fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    fn enter_reorder(&mut self, drag: Option<DragSession>) {
        if self.mode == Mode::Idle {
            tracing::debug!(restaurant = ?self.restaurant, "entering reorder mode");
        }
        self.press.reset();
        self.mode = Mode::Reorder;
        self.drag = drag;
    }

    fn exit_reorder(&mut self) {
        self.mode = Mode::Idle;
        self.drag = None;
    }

    fn drag_for(&self, pointer: PointerId) -> Option<&DragSession> {
        self.drag.as_ref().filter(|d| d.pointer == pointer)
    }

    fn apply_press(&mut self, event: &PressEvent, keep_drag: bool) {
        if let PressEvent::LongPress { pointer, card } = event {
            let drag = keep_drag.then(|| DragSession {
                pointer: *pointer,
                active: card.clone(),
            });
            self.enter_reorder(drag);
        }
    }
}

/// Dashboard layout engine for one grid
pub struct LayoutEngine {
    api: Arc<dyn LayoutApi>,
    events: EventBus,
    state: Mutex<EngineState>,
    persist_lock: tokio::sync::Mutex<()>,
}

impl LayoutEngine {
    /// Create engine in [`Phase::Loading`] with no restaurant context
    #[must_use]
    pub fn new(api: Arc<dyn LayoutApi>, config: &LayoutConfig, events: EventBus) -> Self {
        Self {
            api,
            events,
            state: Mutex::new(EngineState::new(config)),
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Switch to `restaurant` and fetch its layout.
    ///
    /// # Arguments
    /// * `restaurant` - New restaurant context
    /// * `available` - Cards the caller may currently see
    ///
    /// A fetch failure is not an error: the default order is used and the
    /// failure is kept in [`LayoutEngine::load_error`].
    pub async fn load(&self, restaurant: RestaurantId, available: Vec<CardId>) -> LoadOutcome {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.restaurant = Some(restaurant.clone());
            state.phase = Phase::Loading;
            state.available = available;
            state.load_error = None;
            state.press.reset();
            state.exit_reorder();
            state.generation
        };

        tracing::info!(%restaurant, "loading dashboard layout");
        let fetched = self.api.fetch_layout(&restaurant).await;

        let (outcome, layout) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::warn!(%restaurant, "discarding layout for superseded context");
                return LoadOutcome::Superseded;
            }

            let (outcome, layout) = match fetched {
                Ok(server) => (LoadOutcome::Loaded, reconcile(&server, &state.available)),
                Err(err) => {
                    tracing::warn!(%restaurant, error = %err, "layout load failed, using default order");
                    state.load_error = Some(err.to_string());
                    (
                        LoadOutcome::FellBack,
                        reconcile(&default_order(), &state.available),
                    )
                }
            };

            state.layout = OptimisticLayout::new(layout.clone());
            state.phase = Phase::Ready;
            (outcome, layout)
        };

        self.events
            .publish(DashboardEvent::LayoutChanged { restaurant, layout });
        outcome
    }

    /// Leave the current restaurant context; in-flight answers are dropped
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.restaurant = None;
        state.phase = Phase::Loading;
        state.available.clear();
        state.layout = OptimisticLayout::default();
        state.load_error = None;
        state.press.reset();
        state.exit_reorder();
    }

    /// Replace the set of available cards, reconciling the current layout
    pub fn set_available(&self, available: Vec<CardId>) -> Layout {
        let (changed, layout, restaurant) = {
            let mut state = self.state.lock();
            state.available = available;
            if !state.is_ready() {
                return state.layout.displayed().clone();
            }

            let before = state.layout.displayed().clone();
            let available = state.available.clone();
            state.layout.reconcile_available(&available);

            let dragged_away = state
                .drag
                .as_ref()
                .is_some_and(|d| !state.layout.displayed().contains(&d.active));
            if dragged_away {
                state.drag = None;
            }

            let layout = state.layout.displayed().clone();
            (before != layout, layout, state.restaurant.clone())
        };

        if let (true, Some(restaurant)) = (changed, restaurant) {
            self.events.publish(DashboardEvent::LayoutChanged {
                restaurant,
                layout: layout.clone(),
            });
        }
        layout
    }

    /// Move `active` onto `over` in the displayed layout without saving.
    ///
    /// No-op when not ready, when the ids are equal, or either is absent.
    pub fn reorder(&self, active: &CardId, over: &CardId) -> bool {
        let mut state = self.state.lock();
        state.is_ready() && state.layout.displayed_mut().move_card(active, over)
    }

    /// Pointer pressed on `card`.
    ///
    /// In reorder mode this starts a drag right away; otherwise it starts
    /// long-press tracking. Returns `false` if the press was ignored.
    pub fn pointer_down(&self, pointer: PointerId, card: CardId, at: Point, now: Instant) -> bool {
        let mut state = self.state.lock();
        if !state.is_ready() || !state.layout.displayed().contains(&card) {
            return false;
        }
        let mode = state.mode;
        match mode {
            Mode::Reorder if state.drag.is_none() => {
                state.drag = Some(DragSession {
                    pointer,
                    active: card,
                });
                true
            }
            Mode::Reorder => false,
            Mode::Idle => state.press.begin(pointer, card, at, now),
        }
    }

    /// Pointer moved; may fire or cancel a pending long-press
    pub fn pointer_move(&self, pointer: PointerId, at: Point, now: Instant) -> Option<PressEvent> {
        let mut state = self.state.lock();
        if state.mode != Mode::Idle {
            return None;
        }
        let event = state.press.moved(pointer, at, now)?;
        state.apply_press(&event, true);
        Some(event)
    }

    /// Timer tick; fires a long-press held without movement
    pub fn tick(&self, now: Instant) -> Option<PressEvent> {
        let mut state = self.state.lock();
        if state.mode != Mode::Idle {
            return None;
        }
        let event = state.press.poll(now)?;
        state.apply_press(&event, true);
        Some(event)
    }

    /// Start dragging `card` explicitly (e.g. a mouse on a drag handle)
    pub fn begin_drag(&self, pointer: PointerId, card: CardId) -> bool {
        let mut state = self.state.lock();
        if !state.is_ready() || state.drag.is_some() || !state.layout.displayed().contains(&card) {
            return false;
        }
        state.enter_reorder(Some(DragSession {
            pointer,
            active: card,
        }));
        true
    }

    /// Dragged card is over `over`; reorders the displayed layout live
    pub fn drag_over(&self, pointer: PointerId, over: &CardId) -> bool {
        let mut state = self.state.lock();
        let Some(active) = state.drag_for(pointer).map(|d| d.active.clone()) else {
            return false;
        };
        state.layout.displayed_mut().move_card(&active, over)
    }

    /// Pointer released.
    ///
    /// Ends a pending press (a held press enters reorder mode) or the
    /// active drag. Returns the persist result when a save was attempted.
    pub async fn pointer_up(
        &self,
        pointer: PointerId,
        over: Option<&CardId>,
        now: Instant,
    ) -> Option<Result<PersistOutcome, LayoutError>> {
        {
            let mut state = self.state.lock();
            if state.press.pending_pointer() == Some(pointer) {
                if let Some(event) = state.press.release(pointer, now) {
                    state.apply_press(&event, false);
                }
                return None;
            }
        }
        self.drag_end(pointer, over).await
    }

    /// Drag released.
    ///
    /// Dropping on a card commits the move and stays in reorder mode;
    /// dropping anywhere else leaves reorder mode. Both save the layout.
    /// Events from a pointer other than the dragging one are ignored.
    pub async fn drag_end(
        &self,
        pointer: PointerId,
        over: Option<&CardId>,
    ) -> Option<Result<PersistOutcome, LayoutError>> {
        {
            let mut state = self.state.lock();
            let session = state.drag_for(pointer)?.clone();
            state.drag = None;
            match over {
                Some(target) if state.layout.displayed().contains(target) => {
                    state.layout.displayed_mut().move_card(&session.active, target);
                }
                _ => state.exit_reorder(),
            }
        }
        Some(self.persist().await)
    }

    /// Drag aborted (e.g. pointer capture lost); leaves reorder mode and saves
    pub async fn drag_cancel(&self, pointer: PointerId) -> Option<Result<PersistOutcome, LayoutError>> {
        {
            let mut state = self.state.lock();
            if state.press.cancel(pointer).is_some() {
                return None;
            }
            state.drag_for(pointer)?;
            state.exit_reorder();
        }
        Some(self.persist().await)
    }

    /// Tap outside the grid; leaves reorder mode and saves
    pub async fn tap_outside(&self) -> Option<Result<PersistOutcome, LayoutError>> {
        {
            let mut state = self.state.lock();
            if state.mode != Mode::Reorder {
                return None;
            }
            state.exit_reorder();
        }
        Some(self.persist().await)
    }

    /// Save the displayed layout.
    ///
    /// Skips the request when the normalized layout equals the last
    /// confirmed one. On failure the display reverts to the last confirmed
    /// layout, a notification is queued and the failure is returned; there
    /// is no retry.
    ///
    /// # Errors
    /// [`LayoutError::PersistFailed`] when the server rejected the save.
    pub async fn persist(&self) -> Result<PersistOutcome, LayoutError> {
        let _serial = self.persist_lock.lock().await;

        let (restaurant, generation, candidate) = {
            let state = self.state.lock();
            let Some(restaurant) = state.restaurant.clone().filter(|_| state.is_ready()) else {
                tracing::debug!("no restaurant context, not saving layout");
                return Ok(PersistOutcome::NoContext);
            };
            let candidate = reconcile(state.layout.displayed(), &state.available);
            if candidate == *state.layout.last_confirmed() {
                tracing::debug!(%restaurant, "layout unchanged, skipping save");
                return Ok(PersistOutcome::Unchanged);
            }
            (restaurant, state.generation, candidate)
        };

        tracing::info!(%restaurant, cards = candidate.len(), "saving dashboard layout");
        let saved = self.api.save_layout(&restaurant, &candidate.to_vec()).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::warn!(%restaurant, "discarding save result for superseded context");
            return Ok(PersistOutcome::Superseded);
        }

        match saved {
            Ok(stored) => {
                let confirmed = reconcile(&stored, &state.available);
                state.layout.confirm(&candidate, confirmed.clone());
                let layout = state.layout.displayed().clone();
                drop(state);

                self.events
                    .publish(DashboardEvent::LayoutChanged { restaurant, layout });
                Ok(PersistOutcome::Saved(confirmed))
            }
            Err(err) => {
                tracing::warn!(%restaurant, error = %err, "layout save failed, reverting");
                state.layout.revert();
                let detail = err.user_message().map(str::to_string);
                let message = detail
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PERSIST_MESSAGE.to_string());
                state.toasts.push(message.clone(), Instant::now());
                let layout = state.layout.displayed().clone();
                drop(state);

                self.events.publish(DashboardEvent::LayoutPersistFailed {
                    restaurant: restaurant.clone(),
                    message,
                });
                self.events.publish(DashboardEvent::LayoutChanged {
                    restaurant: restaurant.clone(),
                    layout,
                });
                Err(LayoutError::PersistFailed {
                    restaurant,
                    message: detail,
                })
            }
        }
    }

    /// Displayed layout
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.state.lock().layout.displayed().clone()
    }

    /// Last server-confirmed layout
    #[must_use]
    pub fn last_confirmed(&self) -> Layout {
        self.state.lock().layout.last_confirmed().clone()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Current interaction mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.lock().mode
    }

    /// Card being dragged, if any
    #[must_use]
    pub fn dragging(&self) -> Option<CardId> {
        self.state.lock().drag.as_ref().map(|d| d.active.clone())
    }

    /// Current restaurant context
    #[must_use]
    pub fn restaurant(&self) -> Option<RestaurantId> {
        self.state.lock().restaurant.clone()
    }

    /// Non-fatal error from the last load, if it fell back to defaults
    #[must_use]
    pub fn load_error(&self) -> Option<String> {
        self.state.lock().load_error.clone()
    }

    /// Notifications still showing at `now`
    #[must_use]
    pub fn toasts(&self, now: Instant) -> Vec<Toast> {
        self.state.lock().toasts.active(now)
    }

    /// Dismiss a notification early
    pub fn dismiss_toast(&self, id: ToastId) -> bool {
        self.state.lock().toasts.dismiss(id)
    }

    /// Bus the engine publishes on
    #[inline]
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
