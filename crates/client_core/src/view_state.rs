//! Per-page load state and the stale-response guard.
//!
//! A page owns one [`PageSlot`]. Every load starts with [`PageSlot::begin`],
//! which bumps the slot's generation and drops whatever the page showed
//! before. The returned [`LoadTicket`] travels with the in-flight load; when
//! the result comes back, [`PageSlot::complete`] only applies it if no newer
//! load has started in the meantime.

use serde::Serialize;
use shared::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ApiError),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> ViewState<&T> {
        match self {
            ViewState::Idle => ViewState::Idle,
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(data) => ViewState::Ready(data),
            ViewState::Failed(err) => ViewState::Failed(err.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Idle => ViewState::Idle,
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(data) => ViewState::Ready(f(data)),
            ViewState::Failed(err) => ViewState::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct PageSlot<T> {
    generation: u64,
    state: ViewState<T>,
}

impl<T> Default for PageSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: ViewState::Idle,
        }
    }
}

impl<T> PageSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a finished load. Returns `false` and leaves the slot untouched
    /// when the ticket belongs to a superseded load.
    pub fn complete(&mut self, ticket: LoadTicket, state: ViewState<T>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = state;
        true
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Forgets the page, e.g. when the user navigates away. In-flight loads become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ViewState::Idle;
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
