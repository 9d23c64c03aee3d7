//! The draggable numeric input: one field's editing state machine.
//!
//! A [`DraggableInput`] is idle, editing text, or dragging. It keeps a draft
//! string apart from the committed value so partial input such as `-` or `1.`
//! survives until Enter or blur. Every committed value passes through
//! [`value_transform::apply`] with the field's kind, precision and increment
//! lock, and is handed back to the caller as `Some(value)`.

use std::time::Duration;

use crate::drag_session::{CaptureSlot, DragSession, PointerSample};
use crate::draft_buffer::DraftBuffer;
use crate::field::FieldId;
use crate::increment_lock::IncrementPolicy;
use crate::value_transform::{self, format_value, parse_float};

/// Per-instance configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct InputConfig {
    pub label: String,
    pub field: FieldId,
    /// Decimal digits kept on commit and shown on display.
    pub precision: usize,
    /// Value change per pixel of drag; also the keyboard step when unlocked.
    pub sensitivity: f64,
}

/// Current interaction mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    /// Focused for typing or keyboard stepping.
    Editing,
    Dragging,
}

/// Non-character keys the input reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    Enter,
    Escape,
}

/// Modifier keys held during a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Editing state of one numeric field.
#[derive(Debug)]
pub struct DraggableInput {
    config: InputConfig,
    lock: IncrementPolicy,
    value: f64,
    draft: DraftBuffer,
    focused: bool,
    session: Option<DragSession>,
    capture: CaptureSlot,
}

impl DraggableInput {
    pub fn new(config: InputConfig, value: f64, lock: IncrementPolicy) -> Self {
        let draft = DraftBuffer::new(format_value(value, config.precision));
        Self {
            config,
            lock,
            value,
            draft,
            focused: false,
            session: None,
            capture: CaptureSlot::default(),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn field(&self) -> FieldId {
        self.config.field
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn draft(&self) -> &str {
        self.draft.text()
    }

    pub fn lock(&self) -> IncrementPolicy {
        self.lock
    }

    pub fn mode(&self) -> EditMode {
        if self.session.is_some() {
            EditMode::Dragging
        } else if self.focused {
            EditMode::Editing
        } else {
            EditMode::Idle
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_uncommitted_edits(&self) -> bool {
        self.draft.is_dirty()
    }

    pub fn is_all_selected(&self) -> bool {
        self.draft.is_all_selected()
    }

    /// Horizontal pointer travel since the current drag began.
    pub fn drag_displacement(&self) -> Option<f64> {
        self.session.as_ref().map(DragSession::displacement)
    }

    /// Registration routing global pointer events to this input. Held only
    /// while a drag is active.
    pub fn capture_slot(&self) -> &CaptureSlot {
        &self.capture
    }

    /// Text to render: the draft while focused, otherwise the committed value.
    pub fn display_text(&self) -> String {
        if self.focused {
            self.draft.text().to_string()
        } else {
            format_value(self.value, self.config.precision)
        }
    }

    /// Mirrors the externally held value. Uncommitted drafts are kept.
    pub fn sync_value(&mut self, value: f64) {
        self.value = value;
        self.draft.sync(format_value(value, self.config.precision));
    }

    /// Replaces the increment lock used for future commits.
    pub fn set_lock(&mut self, lock: IncrementPolicy) {
        self.lock = lock;
    }

    /// Points the input at another field. Ends any drag.
    pub fn retarget(&mut self, config: InputConfig) {
        self.end_drag();
        self.config = config;
        self.draft.reset(format_value(self.value, self.config.precision));
    }

    /// Keyboard focus arrived from somewhere other than a drag press.
    pub fn focus(&mut self) {
        self.end_drag();
        self.focused = true;
        self.draft.select_all();
    }

    /// Focus left the field. Commits uncommitted edits.
    pub fn blur(&mut self) -> Option<f64> {
        self.end_drag();
        let committed = self.commit_draft();
        self.focused = false;
        self.draft.clear_selection();
        committed
    }

    /// Primary-button press over the value. Focuses the field and starts a
    /// fresh drag session, tearing down any previous one first.
    ///
    /// Text typed but not yet committed is committed before the drag starts,
    /// and that value is returned.
    pub fn pointer_down(&mut self, sample: PointerSample, now: Duration) -> Option<f64> {
        self.end_drag();
        let committed = self.commit_draft();
        self.focused = true;
        self.draft.select_all();

        let capture = self.capture.acquire();
        self.session = Some(DragSession::begin(sample, self.value, now, capture));
        committed
    }

    /// Records pointer motion. Returns whether a drag consumed it.
    pub fn pointer_move(&mut self, sample: PointerSample) -> bool {
        match &mut self.session {
            Some(session) => {
                session.record(sample);
                true
            }
            None => false,
        }
    }

    /// Display-frame tick. Commits drag motion at most once per frame interval.
    pub fn frame(&mut self, now: Duration) -> Option<f64> {
        let constrain = self.constrainer();
        let sensitivity = self.config.sensitivity;
        let committed = self.session.as_mut()?.frame(now, sensitivity, constrain)?;
        Some(self.commit(committed))
    }

    /// Pointer release. Flushes motion not yet committed, then ends the drag.
    /// The field stays focused.
    pub fn pointer_up(&mut self, sample: Option<PointerSample>) -> Option<f64> {
        let constrain = self.constrainer();
        let sensitivity = self.config.sensitivity;
        let mut session = self.session.take()?;
        if let Some(sample) = sample {
            session.record(sample);
        }
        let committed = session.flush(sensitivity, constrain);
        drop(session);
        committed.map(|value| self.commit(value))
    }

    /// Types one character. Rejected characters leave the draft unchanged.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if !self.focused || self.is_dragging() {
            return false;
        }
        self.draft.insert_char(ch)
    }

    /// Replaces the whole draft, as a text-change event does.
    pub fn set_draft(&mut self, text: &str) -> bool {
        if !self.focused || self.is_dragging() {
            return false;
        }
        self.draft.replace(text)
    }

    pub fn backspace(&mut self) {
        if !self.focused || self.is_dragging() {
            return;
        }
        self.draft.backspace();
    }

    /// Handles a navigation or commit key.
    pub fn key_down(&mut self, key: NavKey, modifiers: Modifiers) -> Option<f64> {
        if self.is_dragging() {
            return None;
        }
        match key {
            NavKey::Enter => self.commit_draft(),
            NavKey::Escape => {
                self.revert_draft();
                None
            }
            NavKey::Home => Some(self.commit(self.config.field.kind.default_value())),
            _ if self.draft.is_dirty() => None,
            _ => {
                let delta = self.step_delta(key, modifiers)?;
                let constrain = self.constrainer();
                Some(self.commit(constrain(self.value + delta)))
            }
        }
    }

    fn step_delta(&self, key: NavKey, modifiers: Modifiers) -> Option<f64> {
        let step = if self.lock.enabled() {
            self.lock.step()
        } else {
            self.config.sensitivity
        };
        let mut delta = match key {
            NavKey::Up | NavKey::Right => step,
            NavKey::Down | NavKey::Left => -step,
            NavKey::PageUp => step * 10.0,
            NavKey::PageDown => -step * 10.0,
            _ => return None,
        };
        if modifiers.shift {
            delta *= 0.1;
        }
        if modifiers.ctrl {
            delta *= 10.0;
        }
        Some(delta)
    }

    fn constrainer(&self) -> impl Fn(f64) -> f64 + use<> {
        let kind = self.config.field.kind;
        let precision = self.config.precision;
        let lock = self.lock;
        move |raw| value_transform::apply(raw, kind, precision, lock)
    }

    fn commit_draft(&mut self) -> Option<f64> {
        let text = self.draft.take_edit()?;
        let raw = parse_float(&text).unwrap_or_else(|| self.config.field.kind.default_value());
        let constrain = self.constrainer();
        Some(self.commit(constrain(raw)))
    }

    fn revert_draft(&mut self) {
        self.draft.reset(format_value(self.value, self.config.precision));
        self.draft.select_all();
    }

    fn commit(&mut self, value: f64) -> f64 {
        self.value = value;
        self.draft.reset(format_value(value, self.config.precision));
        value
    }

    fn end_drag(&mut self) {
        self.session = None;
    }
}
