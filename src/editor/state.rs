//! Central state for the transform panel.

use bevy::prelude::*;

use super::config::EditorConfig;
use super::error::PanelError;
use crate::field::{Axis, FieldId, TransformKind};
use crate::increment_lock::IncrementLock;

/// Marker for the object whose transform the panel edits.
#[derive(Component)]
pub struct EditedObject;

/// The edited transform and the increment lock of every field.
///
/// This is the single source of truth: widgets report changes here and
/// re-render from here. Rotation is stored in degrees.
#[derive(Resource, Clone, Debug)]
pub struct TransformState {
    values: [f64; 9],
    locks: [IncrementLock; 9],
}

impl TransformState {
    /// Identity transform with unlocked fields using the configured steps.
    pub fn new(config: &EditorConfig) -> Self {
        let mut values = [0.0; 9];
        let mut locks = [IncrementLock::default(); 9];
        for field in FieldId::all() {
            values[field.index()] = field.kind.default_value();
            locks[field.index()] = IncrementLock::new(config.preset(field.kind).lock_step);
        }
        Self { values, locks }
    }

    pub fn value(&self, field: FieldId) -> f64 {
        self.values[field.index()]
    }

    pub fn set_value(&mut self, field: FieldId, value: f64) {
        self.values[field.index()] = value;
    }

    pub fn lock(&self, field: FieldId) -> &IncrementLock {
        &self.locks[field.index()]
    }

    pub fn lock_mut(&mut self, field: FieldId) -> &mut IncrementLock {
        &mut self.locks[field.index()]
    }

    fn vector(&self, kind: TransformKind) -> Vec3 {
        let [x, y, z] = Axis::ALL.map(|axis| self.value(FieldId::new(kind, axis)) as f32);
        Vec3::new(x, y, z)
    }

    /// Bevy transform of the edited object. Euler angles apply in XYZ order.
    pub fn to_transform(&self) -> Transform {
        let degrees = self.vector(TransformKind::Rotation);
        Transform {
            translation: self.vector(TransformKind::Position),
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                degrees.x.to_radians(),
                degrees.y.to_radians(),
                degrees.z.to_radians(),
            ),
            scale: self.vector(TransformKind::Scale),
        }
    }

    /// Fails on the first value a field could not display.
    pub fn validate(&self) -> Result<(), PanelError> {
        match FieldId::all().find(|field| !self.value(*field).is_finite()) {
            Some(field) => Err(PanelError::NonFinite {
                field,
                value: self.value(field),
            }),
            None => Ok(()),
        }
    }

    /// Replaces non-finite values with their kind default.
    /// Returns how many fields were repaired.
    pub fn reset_non_finite(&mut self) -> usize {
        let mut repaired = 0;
        for field in FieldId::all() {
            if !self.value(field).is_finite() {
                self.set_value(field, field.kind.default_value());
                repaired += 1;
            }
        }
        repaired
    }
}

impl FromWorld for TransformState {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<EditorConfig>() {
            Some(config) => Self::new(config),
            None => Self::new(&EditorConfig::default()),
        }
    }
}

/// Position of the floating panel, in logical pixels from the top-left.
#[derive(Resource, Clone, Debug)]
pub struct PanelLayout {
    pub offset: Vec2,
}

impl FromWorld for PanelLayout {
    fn from_world(world: &mut World) -> Self {
        let offset = world
            .get_resource::<EditorConfig>()
            .map_or(Vec2::ZERO, |config| config.panel_offset);
        Self { offset }
    }
}

/// Tracks whether the panel has faulted and is showing its fallback.
#[derive(Resource, Default, Debug)]
pub struct FaultBoundary {
    fault: Option<PanelError>,
}

impl FaultBoundary {
    pub fn is_tripped(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&PanelError> {
        self.fault.as_ref()
    }

    /// Records a fault. Returns `false` if the boundary was already tripped.
    pub fn trip(&mut self, error: PanelError) -> bool {
        let first = self.fault.is_none();
        self.fault = Some(error);
        first
    }

    pub fn clear(&mut self) {
        self.fault = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS_X: FieldId = FieldId::new(TransformKind::Position, Axis::X);
    const SCALE_Z: FieldId = FieldId::new(TransformKind::Scale, Axis::Z);

    #[test]
    fn new_state_is_identity() {
        let state = TransformState::new(&EditorConfig::default());
        assert_eq!(state.to_transform(), Transform::IDENTITY);
        assert_eq!(state.lock(SCALE_Z).step(), 0.1);
        assert_eq!(state.lock(POS_X).step(), 1.0);
        assert!(!state.lock(POS_X).is_locked());
    }

    #[test]
    fn transform_converts_degrees() {
        let mut state = TransformState::new(&EditorConfig::default());
        state.set_value(FieldId::new(TransformKind::Rotation, Axis::Y), 90.0);
        state.set_value(POS_X, 2.0);
        let transform = state.to_transform();
        assert_eq!(transform.translation, Vec3::new(2.0, 0.0, 0.0));
        let rotated = transform.rotation * Vec3::X;
        assert!(rotated.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn non_finite_values_fail_validation_and_reset() {
        let mut state = TransformState::new(&EditorConfig::default());
        state.set_value(SCALE_Z, f64::NAN);
        assert!(matches!(
            state.validate(),
            Err(PanelError::NonFinite { field, .. }) if field == SCALE_Z
        ));
        assert_eq!(state.reset_non_finite(), 1);
        assert_eq!(state.value(SCALE_Z), 1.0);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn boundary_reports_first_trip() {
        let mut boundary = FaultBoundary::default();
        let error = PanelError::NonFinite {
            field: POS_X,
            value: f64::NAN,
        };
        assert!(boundary.trip(error.clone()));
        assert!(!boundary.trip(error));
        assert!(boundary.is_tripped());
        boundary.clear();
        assert!(boundary.fault().is_none());
    }
}
