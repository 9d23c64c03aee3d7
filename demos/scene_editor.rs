//! Demonstrates the transform panel.
//!
//! Drag a value horizontally to change it (hold Shift for fine control),
//! click it and type a number, or use the arrow, Page and Home keys while it
//! is focused. Tick "Snap" to lock a field to an increment.

use bevy::prelude::*;
use transform_panel::{EditorConfig, TransformPanelPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Transform Panel".to_string(),
                ..default()
            }),
            ..default()
        }))
        // Optional: override the defaults before adding the plugin
        .insert_resource(EditorConfig {
            panel_offset: Vec2::new(24.0, 24.0),
            ..default()
        })
        .add_plugins(TransformPanelPlugin)
        .run();
}
