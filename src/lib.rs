//! Draggable numeric transform inputs and a Bevy 3D transform panel.
//!
//! The editing core is independent of Bevy:
//! - [`value_transform`] constrains, snaps and rounds candidate values
//! - [`increment_lock`] holds a field's snap-to-increment policy
//! - [`drag_session`] turns pointer motion into frame-capped value updates
//! - [`draft_buffer`] holds the text typed into a field
//! - [`draggable_input`] is the per-field state machine tying them together
//!
//! [`editor`] hosts it in a Bevy app.

pub mod drag_session;
pub mod draft_buffer;
pub mod draggable_input;
pub mod editor;
pub mod field;
pub mod increment_lock;
pub mod value_transform;

// Re-export the main plugin for convenience
pub use editor::{EditorConfig, TransformPanelPlugin};
pub use field::{Axis, FieldId, TransformKind};
