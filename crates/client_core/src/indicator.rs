//! Three-state sync indicator shared by every bound field.

use std::sync::{Arc, Mutex, PoisonError};

use shared::{domain::SyncState, protocol::StorePayload};
use tracing::{debug, info};

use crate::field_binding::Field;

/// Presentation side of a binding. `render` is invoked on every state
/// transition; `reload_page` when a write with `refresh_on_success` lands.
pub trait Indicator: Send + Sync {
    fn render(&self, field: &Field, state: SyncState);

    fn reload_page(&self) {}
}

/// Logs transitions instead of drawing them.
pub struct TracingIndicator;

impl Indicator for TracingIndicator {
    fn render(&self, field: &Field, state: SyncState) {
        debug!(
            resource = %field.resource,
            key = %field.key,
            state = state.css_class(),
            "indicator transition"
        );
    }

    fn reload_page(&self) {
        info!("page reload requested");
    }
}

/// The currently active state of one field plus the renderer it reports to.
pub(crate) struct IndicatorCell {
    field: Arc<Field>,
    state: Mutex<SyncState>,
    renderer: Arc<dyn Indicator>,
}

impl IndicatorCell {
    pub(crate) fn new(field: Arc<Field>, renderer: Arc<dyn Indicator>) -> Self {
        renderer.render(&field, SyncState::Ok);
        Self {
            field,
            state: Mutex::new(SyncState::Ok),
            renderer,
        }
    }

    pub(crate) fn state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn transition(&self, next: SyncState) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == next {
                return;
            }
            *state = next;
        }
        self.renderer.render(&self.field, next);
    }

    pub(crate) fn reload_page(&self) {
        self.renderer.reload_page();
    }

    pub(crate) fn note_write(&self, payload: &StorePayload) {
        debug!(
            resource = %self.field.resource,
            key = %self.field.key,
            fields = payload.0.len(),
            "issuing store write"
        );
    }
}
