//! Panel widgets.
//!
//! Provides the editable controls of the transform panel:
//! - DragValue: a draggable number input (like ImGui's DragFloat)
//!   - Drag horizontally to change value
//!   - Type, step with arrow keys, or press Home to reset
//! - StepInput: the snap increment box of a locked field

pub mod drag_value;
pub mod step_input;

use bevy::prelude::*;

pub use drag_value::{
    drag_value, DragValue, DragValuePlugin, DragValueText, FieldValueChanged,
    update_drag_value_display,
};
pub use step_input::{step_input, FieldStepEdited, StepInput, StepInputPlugin};

/// Marker for widgets that keep keyboard focus when pressed. Pressing
/// anything else clears focus.
#[derive(Component, Default)]
pub struct FocusableField;
