//! Refresh controller for the dashboard dataset.
//!
//! Every refresh takes a ticket. Only the ticket from the latest
//! `begin_refresh` may apply its result; older runs still finish, but what
//! they return is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use marketpulse_common::DashboardData;

use crate::pipeline::normalize;
use crate::producer::IntelligenceSource;

/// Shown to the user when a refresh fails. The underlying error is logged.
pub const REFRESH_FAILED_MESSAGE: &str =
    "Strategic synthesis engine failed. Please check connection and refresh.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Proof that a refresh was started. Carries the generation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub status: AppStatus,
    pub data: Option<DashboardData>,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct BoardState {
    generation: u64,
    status: AppStatus,
    data: Option<DashboardData>,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

pub struct PulseBoard {
    state: RwLock<BoardState>,
}

impl Default for PulseBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseBoard {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BoardState {
                generation: 0,
                status: AppStatus::Idle,
                data: None,
                error: None,
                last_updated: None,
            }),
        }
    }

    /// Start a refresh. Supersedes any refresh still in flight.
    pub async fn begin_refresh(&self) -> RefreshTicket {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.status = AppStatus::Loading;
        state.error = None;
        debug!(generation = state.generation, "Refresh started");
        RefreshTicket(state.generation)
    }

    /// Apply a run's outcome. Returns `false` and changes nothing if a newer
    /// refresh has started since `ticket` was issued.
    ///
    /// A failed run keeps the previous dataset so the last good view stays
    /// available alongside the error.
    pub async fn complete(&self, ticket: RefreshTicket, outcome: anyhow::Result<DashboardData>) -> bool {
        let mut state = self.state.write().await;
        if ticket.0 != state.generation {
            debug!(
                ticket = ticket.0,
                current = state.generation,
                "Discarding superseded refresh result"
            );
            return false;
        }

        match outcome {
            Ok(data) => {
                info!(
                    generation = ticket.0,
                    moves = data.moves.len(),
                    links = data.links.len(),
                    "Dashboard refreshed"
                );
                state.status = AppStatus::Success;
                state.data = Some(data);
                state.error = None;
                state.last_updated = Some(Utc::now());
            }
            Err(e) => {
                error!(generation = ticket.0, error = %e, "Refresh failed");
                state.status = AppStatus::Error;
                state.error = Some(REFRESH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Run one full refresh against `source` and return the resulting status.
    /// If another refresh started meanwhile, the returned status is that
    /// newer refresh's current one.
    pub async fn refresh(&self, source: &dyn IntelligenceSource) -> AppStatus {
        let ticket = self.begin_refresh().await;
        let outcome = source
            .fetch_intelligence()
            .await
            .map(|raw| normalize(&raw));
        self.complete(ticket, outcome).await;
        self.status().await
    }

    pub async fn status(&self) -> AppStatus {
        self.state.read().await.status
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn data(&self) -> Option<DashboardData> {
        self.state.read().await.data.clone()
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.read().await;
        BoardSnapshot {
            status: state.status,
            data: state.data.clone(),
            error: state.error.clone(),
            last_updated: state.last_updated,
        }
    }
}
