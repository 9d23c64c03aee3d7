//! Faults raised while keeping the panel in sync with the edited object.

use bevy::ecs::entity::Entity;
use thiserror::Error;

use crate::field::FieldId;

/// A failure that trips the panel's fault boundary.
#[derive(Debug, Clone, Error)]
pub enum PanelError {
    /// The transform state holds a value no field can display.
    #[error("{field} holds a non-finite value ({value})")]
    NonFinite { field: FieldId, value: f64 },
    /// A value widget lost the text node it renders into.
    #[error("value widget {entity:?} for {field} has no text child")]
    MissingText { entity: Entity, field: FieldId },
}
