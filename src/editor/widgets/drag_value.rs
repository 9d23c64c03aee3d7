//! Drag value widget - a draggable number input like ImGui's DragFloat.
//!
//! This widget edits one transform field by:
//! 1. Pressing and dragging horizontally anywhere on screen
//! 2. Typing a value while focused (Enter or blur commits, Escape reverts)
//! 3. Arrow, Page and Home keys while focused
//!
//! All editing logic lives in [`DraggableInput`]; this module only feeds it
//! Bevy input and publishes its commits as [`FieldValueChanged`].

use bevy::ecs::event::Event;
use bevy::ecs::observer::On;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::Pickable;
use bevy::picking::events::{Pointer, Press};
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::window::PrimaryWindow;

use super::FocusableField;
use crate::drag_session::PointerSample;
use crate::draggable_input::{DraggableInput, EditMode, Modifiers, NavKey};
use crate::editor::config::EditorConfig;
use crate::editor::error::PanelError;
use crate::editor::plugin::PanelSet;
use crate::field::FieldId;

/// A numeric field widget. Wraps the field's editing state.
#[derive(Component, Debug)]
#[require(FocusableField)]
pub struct DragValue {
    pub input: DraggableInput,
}

/// Marker for the text node a [`DragValue`] renders into.
#[derive(Component)]
pub struct DragValueText;

/// Event emitted whenever a DragValue commits a value.
#[derive(Event, Clone, Debug)]
pub struct FieldValueChanged {
    /// The UI entity that committed the value.
    pub source: Entity,
    /// The edited field.
    pub field: FieldId,
    /// The new, already constrained value.
    pub new_value: f64,
}

/// Builds a DragValue widget with its text child.
pub fn drag_value(input: DraggableInput, config: &EditorConfig) -> impl Bundle {
    let label = input.display_text();
    (
        Node {
            min_width: config.value_min_width,
            flex_grow: 1.0,
            padding: UiRect::horizontal(Px(4.0)),
            border: UiRect::all(Px(1.0)),
            ..default()
        },
        BorderColor::all(config.border_color),
        BackgroundColor(config.value_background),
        DragValue { input },
        children![(
            Text::new(label),
            TextFont {
                font_size: config.small_font_size,
                ..default()
            },
            TextColor(config.value_text_color),
            DragValueText,
            Pickable::IGNORE,
        )],
    )
}

pub(crate) fn held_modifiers(keys: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        shift: keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        ctrl: keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
    }
}

fn sample_at(x: f32, modifiers: Modifiers) -> PointerSample {
    PointerSample {
        x: f64::from(x),
        shift: modifiers.shift,
    }
}

/// Text a key press types into a field. Ctrl chords are shortcuts, not text.
pub(crate) fn typed_text(key: &Key, modifiers: Modifiers) -> Option<&str> {
    match key {
        Key::Character(text) if !modifiers.ctrl => Some(text.as_str()),
        _ => None,
    }
}

// Observer: primary press starts a drag session and focuses the field
fn drag_value_on_press(
    mut press: On<Pointer<Press>>,
    mut q_drag_value: Query<&mut DragValue>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    let entity = press.entity;
    let Ok(mut drag_value) = q_drag_value.get_mut(entity) else {
        return;
    };
    press.propagate(false);

    if press.button != PointerButton::Primary {
        return;
    }

    let sample = sample_at(press.pointer_location.position.x, held_modifiers(&keys));
    // Pressing a field that is being typed into commits the text first
    if let Some(new_value) = drag_value.input.pointer_down(sample, time.elapsed()) {
        commands.trigger(FieldValueChanged {
            source: entity,
            field: drag_value.input.field(),
            new_value,
        });
    }
    // Focus lands directly; `sync_field_focus` sees the input already focused
    // and does not run the focus teardown.
    input_focus.set(entity);

    debug!("Drag started on {}", drag_value.input.field());
}

/// Routes global cursor motion and button release to widgets holding a
/// pointer capture, then runs their frame tick.
pub fn route_captured_pointers(
    mut q_drag_value: Query<(Entity, &mut DragValue)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    mut commands: Commands,
) {
    let modifiers = held_modifiers(&keys);
    let sample = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .map(|position| sample_at(position.x, modifiers));
    let released = !mouse.pressed(MouseButton::Left);

    for (entity, mut drag_value) in &mut q_drag_value {
        if !drag_value.input.capture_slot().is_held() {
            continue;
        }

        let input = &mut drag_value.input;
        if let Some(sample) = sample {
            input.pointer_move(sample);
        }

        let committed = if released {
            debug!(
                "Drag ended on {} after {:.0}px",
                input.field(),
                input.drag_displacement().unwrap_or_default()
            );
            input.pointer_up(sample)
        } else {
            input.frame(time.elapsed())
        };

        if let Some(new_value) = committed {
            commands.trigger(FieldValueChanged {
                source: entity,
                field: input.field(),
                new_value,
            });
        }
    }
}

/// Mirrors [`InputFocus`] into the widgets: focus gained elsewhere ends a
/// drag and selects all, focus lost commits the draft.
pub fn sync_field_focus(
    input_focus: Res<InputFocus>,
    mut q_drag_value: Query<(Entity, &mut DragValue)>,
    mut commands: Commands,
) {
    let focused = input_focus.get();
    for (entity, mut drag_value) in &mut q_drag_value {
        let has_focus = focused == Some(entity);
        if has_focus == drag_value.input.is_focused() {
            continue;
        }

        if has_focus {
            drag_value.input.focus();
        } else if let Some(new_value) = drag_value.input.blur() {
            commands.trigger(FieldValueChanged {
                source: entity,
                field: drag_value.input.field(),
                new_value,
            });
        }
    }
}

/// Observer: keyboard input for the focused DragValue
fn drag_value_on_keyboard_input(
    mut trigger: On<FocusedInput<KeyboardInput>>,
    mut q_drag_value: Query<&mut DragValue>,
    keys: Res<ButtonInput<KeyCode>>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    // Only process key presses
    if trigger.input.state != ButtonState::Pressed {
        return;
    }

    let entity = trigger.focused_entity;
    let Ok(mut drag_value) = q_drag_value.get_mut(entity) else {
        return;
    };
    // Handled here; ancestors must not see the key again.
    trigger.propagate(false);
    let modifiers = held_modifiers(&keys);
    let input = &mut drag_value.input;

    if let Some(text) = typed_text(&trigger.input.logical_key, modifiers) {
        for ch in text.chars() {
            input.insert_char(ch);
        }
        return;
    }

    let key = match &trigger.input.logical_key {
        Key::ArrowUp => NavKey::Up,
        Key::ArrowDown => NavKey::Down,
        Key::ArrowLeft => NavKey::Left,
        Key::ArrowRight => NavKey::Right,
        Key::PageUp => NavKey::PageUp,
        Key::PageDown => NavKey::PageDown,
        Key::Home => NavKey::Home,
        Key::Enter => NavKey::Enter,
        Key::Escape => NavKey::Escape,
        Key::Backspace => {
            input.backspace();
            return;
        }
        _ => return,
    };

    let committed = input.key_down(key, modifiers);
    if key == NavKey::Escape {
        input_focus.clear();
    }

    if let Some(new_value) = committed {
        commands.trigger(FieldValueChanged {
            source: entity,
            field: input.field(),
            new_value,
        });
    }
}

/// Re-renders widgets whose editing state changed.
pub fn update_drag_value_display(
    config: Res<EditorConfig>,
    mut q_drag_value: Query<(Entity, &DragValue, &Children, &mut BorderColor), Changed<DragValue>>,
    mut q_text: Query<&mut Text, With<DragValueText>>,
) -> Result<(), PanelError> {
    for (entity, drag_value, children, mut border) in &mut q_drag_value {
        let input = &drag_value.input;
        let mode = input.mode();
        let label = match mode {
            // Show the draft with a cursor indicator
            EditMode::Editing => format!("{}|", input.display_text()),
            EditMode::Idle | EditMode::Dragging => input.display_text(),
        };

        let mut rendered = false;
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0.clone_from(&label);
                rendered = true;
            }
        }
        if !rendered {
            return Err(PanelError::MissingText {
                entity,
                field: input.field(),
            });
        }

        *border = BorderColor::all(match mode {
            EditMode::Idle => config.border_color,
            EditMode::Editing => config.focused_border_color,
            EditMode::Dragging => config.dragging_border_color,
        });
    }
    Ok(())
}

/// Plugin that adds the DragValue widget observers and input systems.
pub struct DragValuePlugin;

impl Plugin for DragValuePlugin {
    fn build(&self, app: &mut App) {
        app
            // Drag behavior
            .add_observer(drag_value_on_press)
            // Keyboard input for text editing and stepping
            .add_observer(drag_value_on_keyboard_input)
            .add_systems(
                Update,
                (
                    sync_field_focus.in_set(PanelSet::Input),
                    route_captured_pointers.in_set(PanelSet::Drag),
                ),
            );
    }
}
