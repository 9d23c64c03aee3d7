//! Transform panel plugin and scene scaffold.

use bevy::ecs::observer::On;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::dark_theme::create_dark_theme;
use bevy::feathers::theme::UiTheme;
use bevy::feathers::FeathersPlugins;
use bevy::input_focus::InputFocus;
use bevy::picking::events::{Pointer, Press};
use bevy::prelude::*;

use super::config::EditorConfig;
use super::gizmo::{axis_color, TransformGizmoPlugin};
use super::panels::{
    apply_field_change, apply_lock_toggle, apply_panel_layout, apply_step_edit,
    contain_panel_fault, on_header_drag, spawn_fallback_card, spawn_properties_panel,
    sync_edited_object, sync_fault_view, sync_fields_from_state, sync_mode_buttons,
};
use crate::field::Axis;
use super::state::{EditedObject, FaultBoundary, PanelLayout, TransformState};
use super::widgets::{update_drag_value_display, DragValuePlugin, FocusableField, StepInputPlugin};

/// Half the side length of the ground grid, in world units.
const GRID_HALF_EXTENT: i32 = 10;
const AXIS_LENGTH: f32 = 5.0;

/// System sets for organizing panel systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PanelSet {
    /// Focus changes and other input bookkeeping.
    Input,
    /// Pointer routing and frame ticks of active drags.
    Drag,
    /// Sync UI and the edited object with state.
    Sync,
}

/// Plugin that sets up the scene, the properties panel, its widgets and the
/// transform gizmo.
pub struct TransformPanelPlugin;

impl Plugin for TransformPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FeathersPlugins)
            .add_plugins((DragValuePlugin, StepInputPlugin, TransformGizmoPlugin))
            .insert_resource(UiTheme(create_dark_theme()))
            // State resources; config first, the others read it
            .init_resource::<EditorConfig>()
            .init_resource::<TransformState>()
            .init_resource::<PanelLayout>()
            .init_resource::<FaultBoundary>()
            // System ordering
            .configure_sets(
                Update,
                (PanelSet::Input, PanelSet::Drag, PanelSet::Sync).chain(),
            )
            // Change routing
            .add_observer(apply_field_change)
            .add_observer(apply_lock_toggle)
            .add_observer(apply_step_edit)
            .add_observer(on_header_drag)
            .add_observer(clear_focus_on_outside_press)
            // Startup
            .add_systems(Startup, (setup_scene, setup_panel_ui))
            // Update systems
            .add_systems(
                Update,
                (
                    draw_ground_grid,
                    (
                        sync_fields_from_state.pipe(contain_panel_fault),
                        update_drag_value_display.pipe(contain_panel_fault),
                        apply_panel_layout,
                        sync_mode_buttons,
                        sync_fault_view,
                        sync_edited_object,
                    )
                        .chain()
                        .in_set(PanelSet::Sync),
                ),
            );
    }
}

/// Spawns the camera, lights and the edited cube.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<TransformState>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 1_500_000.0,
            ..default()
        },
        Transform::from_xyz(-4.0, 6.0, -4.0),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(2.0, 2.0, 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(1.0, 0.65, 0.0))),
        state.to_transform(),
        EditedObject,
        Name::new("Edited Cube"),
    ));

    info!("Scene created");
}

/// Spawns the properties panel and its hidden fallback card.
fn setup_panel_ui(
    mut commands: Commands,
    config: Res<EditorConfig>,
    state: Res<TransformState>,
    layout: Res<PanelLayout>,
) {
    spawn_properties_panel(&mut commands, &config, &state, &layout);
    spawn_fallback_card(&mut commands, &config);
    info!("Transform panel initialized");
}

/// Draws the ground grid and world axes.
fn draw_ground_grid(mut gizmos: Gizmos) {
    let extent = GRID_HALF_EXTENT as f32;
    let grid_color = Color::srgba(0.5, 0.5, 0.5, 0.6);
    for i in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
        let offset = i as f32;
        gizmos.line(
            Vec3::new(offset, 0.0, -extent),
            Vec3::new(offset, 0.0, extent),
            grid_color,
        );
        gizmos.line(
            Vec3::new(-extent, 0.0, offset),
            Vec3::new(extent, 0.0, offset),
            grid_color,
        );
    }

    for (axis, direction) in Axis::ALL.into_iter().zip([Vec3::X, Vec3::Y, Vec3::Z]) {
        gizmos.line(Vec3::ZERO, direction * AXIS_LENGTH, axis_color(axis));
    }
}

/// Observer: a press outside every focusable widget clears keyboard focus,
/// which blurs (and commits) the focused field.
fn clear_focus_on_outside_press(
    press: On<Pointer<Press>>,
    fields: Query<(), With<FocusableField>>,
    parents: Query<&ChildOf>,
    mut input_focus: ResMut<InputFocus>,
) {
    let mut current = press.entity;
    loop {
        if fields.contains(current) {
            return;
        }
        if let Ok(child_of) = parents.get(current) {
            current = child_of.get();
        } else {
            break;
        }
    }
    if input_focus.get().is_some() {
        input_focus.clear();
    }
}
