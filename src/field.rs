//! Field identity for transform inputs.
//!
//! A field is one scalar of an object's transform, named by its kind
//! (position, rotation, scale) and axis (x, y, z).

use core::fmt;

/// Which part of a transform a field belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Translation, in world units.
    Position,
    /// Euler rotation, in degrees.
    Rotation,
    /// Non-uniform scale factor.
    Scale,
}

impl TransformKind {
    /// All kinds in panel order.
    pub const ALL: [TransformKind; 3] = [
        TransformKind::Position,
        TransformKind::Rotation,
        TransformKind::Scale,
    ];

    /// The value a field of this kind falls back to when its input is unusable.
    pub fn default_value(self) -> f64 {
        match self {
            TransformKind::Scale => 1.0,
            TransformKind::Position | TransformKind::Rotation => 0.0,
        }
    }

    /// Group heading shown in the panel.
    pub fn title(self) -> &'static str {
        match self {
            TransformKind::Position => "Position",
            TransformKind::Rotation => "Rotation",
            TransformKind::Scale => "Scale",
        }
    }
}

/// Vector component of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in panel order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Upper-case label ("X", "Y", "Z").
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Identifies a single editable transform scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub kind: TransformKind,
    pub axis: Axis,
}

impl FieldId {
    pub const fn new(kind: TransformKind, axis: Axis) -> Self {
        Self { kind, axis }
    }

    /// Iterates all nine fields, grouped by kind.
    pub fn all() -> impl Iterator<Item = FieldId> {
        TransformKind::ALL
            .into_iter()
            .flat_map(|kind| Axis::ALL.into_iter().map(move |axis| FieldId::new(kind, axis)))
    }

    /// Dense index in `0..9`, used by the state tables.
    pub(crate) fn index(self) -> usize {
        let kind = match self.kind {
            TransformKind::Position => 0,
            TransformKind::Rotation => 1,
            TransformKind::Scale => 2,
        };
        kind * 3 + self.axis.index()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind.title().to_lowercase(), self.axis.label().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_kind() {
        assert_eq!(TransformKind::Position.default_value(), 0.0);
        assert_eq!(TransformKind::Rotation.default_value(), 0.0);
        assert_eq!(TransformKind::Scale.default_value(), 1.0);
    }

    #[test]
    fn field_indices_are_dense_and_unique() {
        let mut seen: Vec<usize> = FieldId::all().map(FieldId::index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn display_names_field() {
        let field = FieldId::new(TransformKind::Rotation, Axis::Y);
        assert_eq!(field.to_string(), "rotation.y");
    }
}
