//! Rooms - one shared grid, its participants and its tick timer
//!
//! A room is idle while nobody is in it and ticks every `delay_ms` while
//! at least one participant is present. Grid and tick counter survive idle
//! periods. Every tick, edit and delay change is published on the room's
//! event channel for the transport layer to forward.

pub mod manager;
pub mod session;

pub use manager::RoomManager;
pub use session::{DelaySettings, RoomSession};

use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::cell::CellGrid;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{ParticipantId, RoomCode, Tick};
use crate::simulation::{run_simulation_tick, TickOutput};
use session::Ticker;

/// Something subscribers of a room should hear about
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum RoomEvent {
    /// A step ran: new grid plus the notes it triggered
    Tick(Arc<TickOutput>),
    /// The grid changed outside a tick (edit, or someone joined)
    GridChanged(Arc<CellGrid>),
    DelayChanged(DelaySettings),
}

/// What a joining participant needs to render the room
#[derive(Debug, Clone, Serialize)]
pub struct JoinInfo {
    pub grid: CellGrid,
    #[serde(flatten)]
    pub delay: DelaySettings,
}

pub struct Room {
    code: RoomCode,
    session: Arc<Mutex<RoomSession>>,
    events: broadcast::Sender<RoomEvent>,
}

impl Room {
    pub fn new(code: RoomCode, config: &EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.broadcast.channel_capacity);
        Self {
            session: Arc::new(Mutex::new(RoomSession::new(code.clone(), config))),
            code,
            events,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    /// Add a participant, starting the timer if the room was idle
    pub async fn add_participant(&self, id: ParticipantId) -> JoinInfo {
        let mut session = self.session.lock().await;
        session.add_participant(id);
        tracing::info!(
            "Room {}: participant {} joined ({} present)",
            self.code,
            id,
            session.participant_count()
        );
        if !session.is_running() {
            self.arm_ticker(&mut session);
        }
        self.publish(RoomEvent::GridChanged(Arc::new(session.grid().clone())));

        JoinInfo {
            grid: session.grid().clone(),
            delay: session.delay(),
        }
    }

    /// Remove a participant, stopping the timer when the room empties
    pub async fn remove_participant(&self, id: &ParticipantId) -> bool {
        let mut session = self.session.lock().await;
        let was_present = session.has_participant(id);
        if session.remove_participant(id) && session.stop_ticker() {
            tracing::info!(
                "Room {}: last participant left, idle at tick {}",
                self.code,
                session.tick_count()
            );
        } else if was_present {
            tracing::info!(
                "Room {}: participant {} left ({} present)",
                self.code,
                id,
                session.participant_count()
            );
        }
        was_present
    }

    /// Apply one key press to a cell
    ///
    /// The change is visible to the next tick whatever the timer phase.
    pub async fn submit_cell_edit(&self, row: i64, col: i64, key: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        if let Err(e) = session.apply_edit(row, col, key) {
            tracing::warn!("Room {}: rejected edit: {}", self.code, e);
            return Err(e);
        }
        tracing::debug!("Room {}: edit {:?} at ({}, {})", self.code, key, row, col);
        self.publish(RoomEvent::GridChanged(Arc::new(session.grid().clone())));
        Ok(())
    }

    /// Change the tick period, restarting the timer phase
    pub async fn submit_delay_change(&self, delay_ms: u64) -> Result<DelaySettings> {
        let mut session = self.session.lock().await;
        let settings = match session.set_delay(delay_ms) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Room {}: rejected delay change: {}", self.code, e);
                return Err(e);
            }
        };
        if session.is_running() {
            // Replaced under the lock, so at most one timer is ever armed
            self.arm_ticker(&mut session);
        }
        tracing::info!("Room {}: delay set to {}ms", self.code, delay_ms);
        self.publish(RoomEvent::DelayChanged(settings));
        Ok(settings)
    }

    /// Stop the timer regardless of participants
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        if session.stop_ticker() {
            tracing::info!("Room {}: timer stopped", self.code);
        }
    }

    pub async fn snapshot(&self) -> CellGrid {
        self.session.lock().await.grid().clone()
    }

    pub async fn tick_count(&self) -> Tick {
        self.session.lock().await.tick_count()
    }

    pub async fn delay(&self) -> DelaySettings {
        self.session.lock().await.delay()
    }

    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_running()
    }

    pub async fn participant_count(&self) -> usize {
        self.session.lock().await.participant_count()
    }

    pub async fn has_participant(&self, id: &ParticipantId) -> bool {
        self.session.lock().await.has_participant(id)
    }

    /// Spawn a timer at the current delay, replacing any armed one
    fn arm_ticker(&self, session: &mut RoomSession) {
        let epoch = session.next_epoch();
        let period = Duration::from_millis(session.delay().delay_ms);
        let handle = tokio::spawn(run_ticker(
            Arc::downgrade(&self.session),
            self.events.clone(),
            epoch,
            Instant::now() + period,
            period,
        ));
        session.install_ticker(Ticker { epoch, handle });
        tracing::info!("Room {}: ticking every {}ms", self.code, period.as_millis());
    }

    fn publish(&self, event: RoomEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Timer loop: one step per period until stopped or superseded
async fn run_ticker(
    session: Weak<Mutex<RoomSession>>,
    events: broadcast::Sender<RoomEvent>,
    epoch: u64,
    start: Instant,
    period: Duration,
) {
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        // Room dropped
        let Some(shared) = session.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        // Superseded or stopped while waiting for the lock
        if guard.current_epoch() != epoch {
            break;
        }

        let started = std::time::Instant::now();
        let output = run_simulation_tick(&mut guard.sim);
        let elapsed = started.elapsed();
        if elapsed > period.mul_f64(0.9) {
            tracing::warn!(
                "Room {}: slow tick #{}: {:?} (period {:?})",
                guard.code,
                output.tick,
                elapsed,
                period
            );
        }

        let _ = events.send(RoomEvent::Tick(Arc::new(output)));
    }
}
