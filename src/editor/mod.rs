//! Editor UI module.
//!
//! Wires the draggable inputs into a Bevy scene: a cube in a 3D viewport with
//! a transform gizmo, and a floating properties panel, built with bevy_ui and
//! bevy_feathers, that mirrors and edits the cube's transform.

pub mod config;
pub mod error;
pub mod gizmo;
pub mod panels;
pub mod plugin;
pub mod state;
pub mod widgets;

pub use config::{EditorConfig, FieldPreset};
pub use error::PanelError;
pub use gizmo::{GizmoMode, TransformGizmoPlugin};
pub use plugin::{PanelSet, TransformPanelPlugin};
pub use state::{EditedObject, FaultBoundary, PanelLayout, TransformState};
pub use widgets::{DragValue, DragValuePlugin, FieldStepEdited, FieldValueChanged, StepInput};
