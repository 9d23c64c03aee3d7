//! Configuration for the transform panel UI.

use bevy::prelude::*;
use bevy::ui::Val;

use crate::field::TransformKind;

/// Input tuning for all fields of one transform kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPreset {
    /// Decimal digits kept on commit.
    pub precision: usize,
    /// Value change per dragged pixel.
    pub sensitivity: f64,
    /// Initial increment for the snap lock.
    pub lock_step: f64,
}

/// Configuration for panel layout, styling and field tuning.
///
/// Insert a customized copy before adding the plugin to override it.
#[derive(Resource, Clone)]
pub struct EditorConfig {
    // Layout
    /// Width of the floating properties panel.
    pub panel_width: Val,
    /// Initial offset of the panel from the top-left corner, in logical pixels.
    pub panel_offset: Vec2,
    /// Height of the draggable header.
    pub header_height: Val,
    /// Minimum width of a value box.
    pub value_min_width: Val,

    // Spacing
    /// Padding inside the panel and cards.
    pub panel_padding: UiRect,
    /// Gap between rows.
    pub item_gap: Val,
    /// Gap between columns of a row.
    pub column_gap: Val,

    // Typography
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub small_font_size: f32,

    // Colors (for non-themed elements)
    pub border_color: Color,
    pub muted_text_color: Color,
    pub error_text_color: Color,
    /// Text color of editable values.
    pub value_text_color: Color,
    pub value_background: Color,
    /// Border of a value box with keyboard focus.
    pub focused_border_color: Color,
    /// Border of a value box being dragged.
    pub dragging_border_color: Color,

    // Fields
    pub position: FieldPreset,
    pub rotation: FieldPreset,
    pub scale: FieldPreset,
}

impl EditorConfig {
    /// Tuning for fields of `kind`.
    pub fn preset(&self, kind: TransformKind) -> FieldPreset {
        match kind {
            TransformKind::Position => self.position,
            TransformKind::Rotation => self.rotation,
            TransformKind::Scale => self.scale,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            // Layout
            panel_width: Val::Px(300.0),
            panel_offset: Vec2::new(16.0, 16.0),
            header_height: Val::Px(32.0),
            value_min_width: Val::Px(80.0),

            // Spacing
            panel_padding: UiRect::all(Val::Px(8.0)),
            item_gap: Val::Px(4.0),
            column_gap: Val::Px(8.0),

            // Typography
            title_font_size: 16.0,
            body_font_size: 13.0,
            small_font_size: 11.0,

            // Colors
            border_color: Color::srgba(0.3, 0.3, 0.3, 1.0),
            muted_text_color: Color::srgba(0.6, 0.6, 0.6, 1.0),
            error_text_color: Color::srgba(0.8, 0.3, 0.3, 1.0),
            value_text_color: Color::srgba(0.9, 0.9, 0.6, 1.0),
            value_background: Color::srgba(0.15, 0.15, 0.15, 1.0),
            focused_border_color: Color::srgba(0.35, 0.55, 0.9, 1.0),
            dragging_border_color: Color::srgba(0.95, 0.65, 0.2, 1.0),

            // Fields
            position: FieldPreset {
                precision: 3,
                sensitivity: 0.005,
                lock_step: 1.0,
            },
            rotation: FieldPreset {
                precision: 1,
                sensitivity: 0.2,
                lock_step: 1.0,
            },
            scale: FieldPreset {
                precision: 3,
                sensitivity: 0.005,
                lock_step: 0.1,
            },
        }
    }
}
