//! Floating properties panel mirroring the edited object's transform.
//!
//! Three groups (position, rotation, scale) of three axis rows, then the gizmo
//! mode buttons. Each row holds the axis label, a [`DragValue`], a snap
//! checkbox and, while locked, a [`StepInput`]. The header can be dragged to
//! move the panel.

use bevy::ecs::event::Event;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::ecs::observer::On;
use bevy::ecs::relationship::Relationship;
use bevy::feathers::controls::{button, checkbox, ButtonProps, ButtonVariant};
use bevy::feathers::theme::{ThemeBackgroundColor, ThemedText};
use bevy::feathers::tokens;
use bevy::picking::events::{Drag, Pointer};
use bevy::prelude::*;
use bevy::ui::Checked;
use bevy::ui::Val::*;
use bevy::ui_widgets::{observe, Activate, ValueChange};

use crate::draggable_input::{DraggableInput, InputConfig};
use crate::editor::config::EditorConfig;
use crate::editor::error::PanelError;
use crate::editor::gizmo::GizmoMode;
use crate::editor::state::{EditedObject, PanelLayout, TransformState};
use crate::editor::widgets::{
    drag_value, step_input, DragValue, FieldStepEdited, FieldValueChanged, StepInput,
};
use crate::field::{FieldId, TransformKind};

/// Marker for the panel root.
#[derive(Component)]
pub struct PropertiesPanel;

/// Marker for the draggable header.
#[derive(Component)]
pub struct PanelHeader;

/// Snap checkbox of a field.
#[derive(Component)]
pub struct LockToggle(pub FieldId);

/// Button selecting a gizmo mode.
#[derive(Component)]
pub struct ModeButton(pub GizmoMode);

/// Event emitted when a field's snap lock is toggled.
#[derive(Event, Clone, Debug)]
pub struct FieldLockToggled {
    pub field: FieldId,
}

/// Spawns the panel at the current layout offset.
pub fn spawn_properties_panel(
    commands: &mut Commands,
    config: &EditorConfig,
    state: &TransformState,
    layout: &PanelLayout,
) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Px(layout.offset.x),
                top: Px(layout.offset.y),
                width: config.panel_width,
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                row_gap: config.item_gap,
                padding: config.panel_padding,
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            ThemeBackgroundColor(tokens::WINDOW_BG),
            BorderColor::all(config.border_color),
            PropertiesPanel,
        ))
        .with_children(|panel| {
            spawn_panel_header(panel, config);
            for kind in TransformKind::ALL {
                spawn_property_group(panel, kind, config, state);
            }
            spawn_mode_group(panel, config);
        });
}

fn spawn_panel_header(parent: &mut ChildSpawnerCommands<'_>, config: &EditorConfig) {
    parent
        .spawn((
            Node {
                width: Percent(100.0),
                height: config.header_height,
                display: Display::Flex,
                align_items: AlignItems::Center,
                border: UiRect::bottom(Px(1.0)),
                ..default()
            },
            BorderColor::all(config.border_color),
            PanelHeader,
        ))
        .with_children(|header| {
            header.spawn((
                Text::new("Properties"),
                TextFont {
                    font_size: config.title_font_size,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_property_group(
    parent: &mut ChildSpawnerCommands<'_>,
    kind: TransformKind,
    config: &EditorConfig,
    state: &TransformState,
) {
    parent
        .spawn(Node {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            row_gap: config.item_gap,
            margin: UiRect::top(Px(4.0)),
            ..default()
        })
        .with_children(|group| {
            group.spawn((
                Text::new(kind.title()),
                TextFont {
                    font_size: config.body_font_size,
                    ..default()
                },
                TextColor(config.muted_text_color),
            ));

            for field in FieldId::all().filter(|field| field.kind == kind) {
                spawn_field_row(group, field, config, state);
            }
        });
}

fn spawn_field_row(
    parent: &mut ChildSpawnerCommands<'_>,
    field: FieldId,
    config: &EditorConfig,
    state: &TransformState,
) {
    let preset = config.preset(field.kind);
    let lock = state.lock(field);
    let input = DraggableInput::new(
        InputConfig {
            label: field.axis.label().to_string(),
            field,
            precision: preset.precision,
            sensitivity: preset.sensitivity,
        },
        state.value(field),
        lock.policy(),
    );

    parent
        .spawn(Node {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: config.column_gap,
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(input.config().label.clone()),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(Color::srgba(0.6, 0.8, 1.0, 1.0)),
                Node {
                    width: Px(14.0),
                    ..default()
                },
            ));

            row.spawn(drag_value(input, config));

            row.spawn((
                checkbox(LockToggle(field), Spawn((Text::new("Snap"), ThemedText))),
                observe(on_lock_checkbox_change),
            ));

            row.spawn(step_input(field, lock.step(), config));
        });
}

fn spawn_mode_group(parent: &mut ChildSpawnerCommands<'_>, config: &EditorConfig) {
    parent
        .spawn(Node {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            row_gap: config.item_gap,
            margin: UiRect::top(Px(4.0)),
            ..default()
        })
        .with_children(|group| {
            group.spawn((
                Text::new("Transform Mode"),
                TextFont {
                    font_size: config.body_font_size,
                    ..default()
                },
                TextColor(config.muted_text_color),
            ));
            group
                .spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    column_gap: config.column_gap,
                    ..default()
                })
                .with_children(|buttons| {
                    for mode in GizmoMode::ALL {
                        buttons.spawn((
                            button(
                                ButtonProps::default(),
                                ModeButton(mode),
                                Spawn((Text::new(mode.label()), ThemedText)),
                            ),
                            observe(on_mode_button_click),
                        ));
                    }
                });
        });
}

/// Observer for snap checkbox clicks. The checkbox only shows the lock state,
/// so a click asks for a toggle and the state sync updates the mark.
fn on_lock_checkbox_change(
    change: On<ValueChange<bool>>,
    toggles: Query<&LockToggle>,
    state: Res<TransformState>,
    mut commands: Commands,
) {
    let Ok(toggle) = toggles.get(change.source) else {
        warn!("Snap checkbox {} has no LockToggle", change.source);
        return;
    };
    if state.lock(toggle.0).is_locked() != change.value {
        commands.trigger(FieldLockToggled { field: toggle.0 });
    }
}

/// Observer for mode button clicks.
/// Traverses up the parent hierarchy to find the ModeButton component.
fn on_mode_button_click(
    activate: On<Activate>,
    buttons: Query<&ModeButton>,
    parents: Query<&ChildOf>,
    mut mode: ResMut<GizmoMode>,
) {
    let mut current = activate.entity;
    loop {
        if let Ok(button) = buttons.get(current) {
            if *mode != button.0 {
                *mode = button.0;
                info!("Gizmo mode: {}", button.0.label());
            }
            return;
        }
        if let Ok(child_of) = parents.get(current) {
            current = child_of.get();
        } else {
            break;
        }
    }
    warn!("Could not find ModeButton in hierarchy!");
}

/// Highlights the button of the current gizmo mode.
pub fn sync_mode_buttons(mode: Res<GizmoMode>, mut buttons: Query<(&ModeButton, &mut ButtonVariant)>) {
    if !mode.is_changed() {
        return;
    }
    for (button, mut variant) in &mut buttons {
        let wanted = if button.0 == *mode {
            ButtonVariant::Primary
        } else {
            ButtonVariant::Normal
        };
        if *variant != wanted {
            *variant = wanted;
        }
    }
}

/// Observer: dragging the header moves the panel.
pub fn on_header_drag(
    mut drag: On<Pointer<Drag>>,
    headers: Query<(), With<PanelHeader>>,
    mut layout: ResMut<PanelLayout>,
) {
    if headers.contains(drag.entity) {
        drag.propagate(false);
        layout.offset += drag.delta;
    }
}

/// Observer: writes committed field values into the state.
pub fn apply_field_change(change: On<FieldValueChanged>, mut state: ResMut<TransformState>) {
    state.set_value(change.field, change.new_value);
}

pub fn apply_lock_toggle(toggle: On<FieldLockToggled>, mut state: ResMut<TransformState>) {
    let locked = state.lock_mut(toggle.field).toggle();
    debug!("Snap lock for {} is now {}", toggle.field, if locked { "on" } else { "off" });
}

pub fn apply_step_edit(edit: On<FieldStepEdited>, mut state: ResMut<TransformState>) {
    let step = state.lock_mut(edit.field).edit_step(&edit.text);
    debug!("Snap step for {} set to {} from {:?}", edit.field, step, edit.text);
}

/// Pushes the state into every widget after it changes.
pub fn sync_fields_from_state(
    state: Res<TransformState>,
    mut q_values: Query<&mut DragValue>,
    mut q_steps: Query<(&mut StepInput, &mut Node)>,
    q_toggles: Query<(Entity, &LockToggle, Has<Checked>)>,
    mut commands: Commands,
) -> Result<(), PanelError> {
    if !state.is_changed() {
        return Ok(());
    }
    state.validate()?;

    for mut drag_value in &mut q_values {
        let field = drag_value.input.field();
        drag_value.input.sync_value(state.value(field));
        drag_value.input.set_lock(state.lock(field).policy());
    }

    for (mut step, mut node) in &mut q_steps {
        let lock = state.lock(step.field());
        step.sync_step(lock.step());
        node.display = if lock.is_locked() {
            Display::Flex
        } else {
            Display::None
        };
    }

    for (entity, toggle, checked) in &q_toggles {
        match (state.lock(toggle.0).is_locked(), checked) {
            (true, false) => {
                commands.entity(entity).insert(Checked);
            }
            (false, true) => {
                commands.entity(entity).remove::<Checked>();
            }
            _ => {}
        }
    }

    Ok(())
}

/// Moves the panel to the current layout offset.
pub fn apply_panel_layout(
    layout: Res<PanelLayout>,
    mut panels: Query<&mut Node, With<PropertiesPanel>>,
) {
    if !layout.is_changed() {
        return;
    }
    for mut node in &mut panels {
        node.left = Px(layout.offset.x);
        node.top = Px(layout.offset.y);
    }
}

/// Applies the state to the edited object.
pub fn sync_edited_object(
    state: Res<TransformState>,
    mut objects: Query<&mut Transform, With<EditedObject>>,
) {
    if !state.is_changed() || state.validate().is_err() {
        return;
    }
    let transform = state.to_transform();
    for mut object in &mut objects {
        *object = transform;
    }
}
