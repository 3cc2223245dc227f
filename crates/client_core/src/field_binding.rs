//! Debounced binding of one editable control to one `(resource, key)` pair
//! on the store endpoint.
//!
//! Every edit restarts a trailing timer and moves the indicator to
//! [`SyncState::Pending`]. When the timer fires the control is read, a single
//! `/store/<resource>` request is issued and its response decides between
//! [`SyncState::Ok`] and [`SyncState::Error`]. Failed writes are not retried
//! until the next edit.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use serde_json::{Map, Number, Value};
use shared::{
    domain::{FieldKey, ResourcePath, SyncState},
    protocol::{is_truthy, StorePayload},
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    indicator::{Indicator, IndicatorCell},
    transport::StoreTransport,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub resource: ResourcePath,
    pub key: FieldKey,
    pub refresh_on_success: bool,
}

impl Field {
    pub fn new(resource: ResourcePath, key: FieldKey, refresh_on_success: bool) -> Self {
        Self {
            resource,
            key,
            refresh_on_success,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Text(String),
    Number(Number),
    Select { index: usize, value: String },
    Checkbox(bool),
}

impl ControlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn select(index: usize, value: impl Into<String>) -> Self {
        Self::Select {
            index,
            value: value.into(),
        }
    }

    /// Checkboxes go out as booleans, everything else as its raw value.
    pub fn to_wire(&self) -> Value {
        match self {
            ControlValue::Text(text) => Value::String(text.clone()),
            ControlValue::Number(number) => Value::Number(number.clone()),
            ControlValue::Select { value, .. } => Value::String(value.clone()),
            ControlValue::Checkbox(checked) => Value::Bool(*checked),
        }
    }

    pub fn ordinal(&self) -> Option<usize> {
        match self {
            ControlValue::Select { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ControlValue::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|v| v.trunc() as i64)),
            ControlValue::Text(text) | ControlValue::Select { value: text, .. } => {
                leading_integer(text)
            }
            ControlValue::Checkbox(_) => None,
        }
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        Self::Checkbox(value)
    }
}

/// Integer prefix of a form value, so `"3 (high)"` sorts as 3.
fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().ok()
}

/// Shared handle to the value currently shown by a control. The UI side
/// writes through [`ControlHandle::set`]; bindings read it when they fire.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    value: Arc<Mutex<ControlValue>>,
}

impl ControlHandle {
    pub fn new(value: ControlValue) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
        }
    }

    pub fn get(&self) -> ControlValue {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: ControlValue) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    pub refresh_on_success: bool,
    pub debounce: Duration,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            refresh_on_success: false,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl BindOptions {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            refresh_on_success: false,
            debounce: settings.debounce(),
        }
    }

    pub fn refreshing(mut self) -> Self {
        self.refresh_on_success = true;
        self
    }
}

/// One checkbox of a group: its control and the identifying fields that
/// travel with its writes.
pub struct CheckboxItem {
    pub control: ControlHandle,
    pub extra: Map<String, Value>,
}

struct BindingInner {
    field: Arc<Field>,
    control: ControlHandle,
    extra: Map<String, Value>,
    transport: Arc<dyn StoreTransport>,
    indicator: IndicatorCell,
}

impl BindingInner {
    fn payload(&self) -> StorePayload {
        StorePayload::with_extra(self.extra.clone(), &self.field.key, self.control.get().to_wire())
    }

    async fn write(&self) {
        let payload = self.payload();
        let path = format!("/store/{}", self.field.resource);
        self.indicator.note_write(&payload);

        match self.transport.fetch_json(&path, &payload.query_pairs()).await {
            Ok(response) if is_truthy(response.as_ref()) => {
                info!(resource = %self.field.resource, key = %self.field.key, "store write ok");
                self.indicator.transition(SyncState::Ok);
                if self.field.refresh_on_success {
                    self.indicator.reload_page();
                }
            }
            Ok(response) => {
                warn!(
                    resource = %self.field.resource,
                    key = %self.field.key,
                    ?response,
                    "store write rejected"
                );
                self.indicator.transition(SyncState::Error);
            }
            Err(err) => {
                warn!(
                    resource = %self.field.resource,
                    key = %self.field.key,
                    error = %err,
                    "store write failed"
                );
                self.indicator.transition(SyncState::Error);
            }
        }
    }
}

pub struct FieldBinding {
    inner: Arc<BindingInner>,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl FieldBinding {
    /// Binds a text input, textarea or select. Writes carry only `key` and
    /// `value`.
    pub fn bind(
        control: ControlHandle,
        resource: ResourcePath,
        key: FieldKey,
        transport: Arc<dyn StoreTransport>,
        indicator: Arc<dyn Indicator>,
        options: BindOptions,
    ) -> Self {
        Self::build(control, resource, key, Map::new(), transport, indicator, options)
    }

    /// Binds a checkbox whose writes also carry `extra`, the identifying
    /// attributes of its enclosing element.
    pub fn checkbox(
        control: ControlHandle,
        resource: ResourcePath,
        key: FieldKey,
        extra: Map<String, Value>,
        transport: Arc<dyn StoreTransport>,
        indicator: Arc<dyn Indicator>,
        options: BindOptions,
    ) -> Self {
        Self::build(control, resource, key, extra, transport, indicator, options)
    }

    pub fn checkbox_group(
        resource: ResourcePath,
        key: FieldKey,
        items: Vec<CheckboxItem>,
        transport: Arc<dyn StoreTransport>,
        indicator: Arc<dyn Indicator>,
        options: BindOptions,
    ) -> Vec<Self> {
        items
            .into_iter()
            .map(|item| {
                Self::checkbox(
                    item.control,
                    resource.clone(),
                    key.clone(),
                    item.extra,
                    Arc::clone(&transport),
                    Arc::clone(&indicator),
                    options,
                )
            })
            .collect()
    }

    fn build(
        control: ControlHandle,
        resource: ResourcePath,
        key: FieldKey,
        extra: Map<String, Value>,
        transport: Arc<dyn StoreTransport>,
        indicator: Arc<dyn Indicator>,
        options: BindOptions,
    ) -> Self {
        let field = Arc::new(Field::new(resource, key, options.refresh_on_success));
        Self {
            inner: Arc::new(BindingInner {
                indicator: IndicatorCell::new(Arc::clone(&field), indicator),
                field,
                control,
                extra,
                transport,
            }),
            debounce: options.debounce,
            timer: None,
        }
    }

    pub fn field(&self) -> &Field {
        &self.inner.field
    }

    pub fn control(&self) -> &ControlHandle {
        &self.inner.control
    }

    pub fn state(&self) -> SyncState {
        self.inner.indicator.state()
    }

    /// The payload a write would carry if it fired now.
    pub fn payload(&self) -> StorePayload {
        self.inner.payload()
    }

    /// Records a change, keystroke or selection on the control.
    ///
    /// Must be called from within a tokio runtime. A write already in flight
    /// is left alone; only a write that has not fired yet is cancelled.
    pub fn notify_edit(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.inner.indicator.transition(SyncState::Pending);
        debug!(
            resource = %self.inner.field.resource,
            key = %self.inner.field.key,
            debounce_ms = self.debounce.as_millis() as u64,
            "write scheduled"
        );

        let inner = Arc::clone(&self.inner);
        let debounce = self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Aborting this task from here on only detaches the write.
            let write = tokio::spawn(async move { inner.write().await });
            let _ = write.await;
        }));
    }

    pub fn edit(&mut self, value: ControlValue) {
        self.inner.control.set(value);
        self.notify_edit();
    }

    /// Waits until the scheduled write, if any, has fired and its response
    /// has been applied.
    pub async fn settle(&mut self) {
        if let Some(timer) = self.timer.take() {
            let _ = timer.await;
        }
    }

    pub fn has_scheduled_write(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for FieldBinding {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/field_binding_tests.rs"]
mod tests;
