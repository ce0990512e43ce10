use crate::launch::LaunchRecord;
use std::sync::Arc;

/// Fetch lifecycle. Exactly one phase is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Error(String),
    Ready,
}

/// Every way the state can change.
#[derive(Debug, Clone)]
pub enum Action {
    FetchStarted,
    FetchSucceeded(Vec<LaunchRecord>),
    FetchFailed(String),
    Select(Arc<LaunchRecord>),
    Dismiss,
}

/// The single mutable entity of the application.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    collection: Vec<Arc<LaunchRecord>>,
    phase: Phase,
    selected: Option<Arc<LaunchRecord>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn collection(&self) -> &[Arc<LaunchRecord>] {
        &self.collection
    }

    pub fn selected(&self) -> Option<&Arc<LaunchRecord>> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Pure transition function.
    ///
    /// Fetch outcomes only apply while loading; a second outcome for the same
    /// mount leaves the state untouched.
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::FetchStarted => {
                if self.phase != Phase::Loading {
                    tracing::debug!(phase = ?self.phase, "fetch already settled, ignoring start");
                    return self;
                }
            }
            Action::FetchSucceeded(records) => {
                if self.phase != Phase::Loading {
                    tracing::debug!(phase = ?self.phase, "ignoring late fetch result");
                    return self;
                }
                self.collection = records.into_iter().map(Arc::new).collect();
                self.phase = Phase::Ready;
            }
            Action::FetchFailed(message) => {
                if self.phase != Phase::Loading {
                    tracing::debug!(phase = ?self.phase, "ignoring late fetch failure");
                    return self;
                }
                self.phase = Phase::Error(message);
            }
            Action::Select(record) => {
                self.selected = Some(record);
            }
            Action::Dismiss => {
                self.selected = None;
            }
        }
        self
    }

    pub fn dispatch(&mut self, action: Action) {
        *self = std::mem::take(self).apply(action);
    }
}
