//! UI panels for the transform editor.

pub mod fault_boundary;
pub mod properties_panel;

pub use fault_boundary::*;
pub use properties_panel::*;
