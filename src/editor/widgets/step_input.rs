//! Text box for a field's snap increment, shown while the field is locked.
//!
//! Edits are reported as raw text in [`FieldStepEdited`]; parsing and the
//! fallback to a step of 1 happen in [`IncrementLock::edit_step`].
//!
//! [`IncrementLock::edit_step`]: crate::increment_lock::IncrementLock::edit_step

use bevy::ecs::event::Event;
use bevy::ecs::observer::On;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input_focus::{FocusedInput, InputFocus};
use bevy::picking::Pickable;
use bevy::picking::events::{Pointer, Press};
use bevy::prelude::*;
use bevy::ui::Val::*;

use super::drag_value::{held_modifiers, typed_text};
use super::FocusableField;
use crate::draft_buffer::DraftBuffer;
use crate::editor::config::EditorConfig;
use crate::editor::plugin::PanelSet;
use crate::field::FieldId;

/// Editing state of a step box.
#[derive(Component, Debug)]
#[require(FocusableField)]
pub struct StepInput {
    field: FieldId,
    step: f64,
    draft: DraftBuffer,
    focused: bool,
}

impl StepInput {
    pub fn new(field: FieldId, step: f64) -> Self {
        Self {
            field,
            step,
            draft: DraftBuffer::new(step.to_string()),
            focused: false,
        }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn draft(&self) -> &str {
        self.draft.text()
    }

    /// Mirrors the step stored in the lock.
    pub fn sync_step(&mut self, step: f64) {
        self.step = step;
        self.draft.sync(step.to_string());
    }

    pub fn display_text(&self) -> String {
        if self.focused {
            format!("{}|", self.draft.text())
        } else {
            self.step.to_string()
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.draft.select_all();
    }

    /// Loses focus, returning the edited text if there is any.
    pub fn blur(&mut self) -> Option<String> {
        self.focused = false;
        self.draft.clear_selection();
        self.commit()
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        self.draft.insert_char(ch)
    }

    pub fn backspace(&mut self) {
        self.draft.backspace();
    }

    /// Takes the edited text for submission. The draft is resynced once the
    /// new step comes back through [`sync_step`](Self::sync_step).
    pub fn commit(&mut self) -> Option<String> {
        self.draft.take_edit()
    }

    pub fn revert(&mut self) {
        self.draft.reset(self.step.to_string());
    }
}

/// Marker for the text node a [`StepInput`] renders into.
#[derive(Component)]
pub struct StepInputText;

/// Event emitted when the user submits a new step for a field.
#[derive(Event, Clone, Debug)]
pub struct FieldStepEdited {
    pub field: FieldId,
    /// Raw text as typed.
    pub text: String,
}

/// Builds a StepInput widget. Hidden until the field is locked.
pub fn step_input(field: FieldId, step: f64, config: &EditorConfig) -> impl Bundle {
    (
        Node {
            display: Display::None,
            min_width: Px(44.0),
            padding: UiRect::horizontal(Px(4.0)),
            border: UiRect::all(Px(1.0)),
            ..default()
        },
        BorderColor::all(config.border_color),
        BackgroundColor(config.value_background),
        StepInput::new(field, step),
        children![(
            Text::new(step.to_string()),
            TextFont {
                font_size: config.small_font_size,
                ..default()
            },
            TextColor(config.muted_text_color),
            StepInputText,
            Pickable::IGNORE,
        )],
    )
}

fn step_input_on_press(
    mut press: On<Pointer<Press>>,
    q_step: Query<(), With<StepInput>>,
    mut input_focus: ResMut<InputFocus>,
) {
    if q_step.contains(press.entity) {
        press.propagate(false);
        input_focus.set(press.entity);
    }
}

fn step_input_on_keyboard_input(
    mut trigger: On<FocusedInput<KeyboardInput>>,
    mut q_step: Query<&mut StepInput>,
    keys: Res<ButtonInput<KeyCode>>,
    mut input_focus: ResMut<InputFocus>,
    mut commands: Commands,
) {
    if trigger.input.state != ButtonState::Pressed {
        return;
    }
    let Ok(mut step) = q_step.get_mut(trigger.focused_entity) else {
        return;
    };
    trigger.propagate(false);

    if let Some(text) = typed_text(&trigger.input.logical_key, held_modifiers(&keys)) {
        for ch in text.chars() {
            step.insert_char(ch);
        }
        return;
    }

    match &trigger.input.logical_key {
        Key::Enter => {
            if let Some(text) = step.commit() {
                commands.trigger(FieldStepEdited {
                    field: step.field(),
                    text,
                });
            }
            input_focus.clear();
        }
        Key::Escape => {
            step.revert();
            input_focus.clear();
        }
        Key::Backspace => step.backspace(),
        _ => {}
    }
}

/// Focus gained selects all; focus lost submits pending text.
pub fn sync_step_focus(
    input_focus: Res<InputFocus>,
    mut q_step: Query<(Entity, &mut StepInput)>,
    mut commands: Commands,
) {
    let focused = input_focus.get();
    for (entity, mut step) in &mut q_step {
        let has_focus = focused == Some(entity);
        if has_focus == step.focused {
            continue;
        }
        if has_focus {
            step.focus();
        } else if let Some(text) = step.blur() {
            commands.trigger(FieldStepEdited {
                field: step.field(),
                text,
            });
        }
    }
}

pub fn update_step_input_display(
    q_step: Query<(&StepInput, &Children), Changed<StepInput>>,
    mut q_text: Query<&mut Text, With<StepInputText>>,
) {
    for (step, children) in &q_step {
        for child in children.iter() {
            if let Ok(mut text) = q_text.get_mut(child) {
                text.0 = step.display_text();
            }
        }
    }
}

/// Plugin that adds the StepInput observers and systems.
pub struct StepInputPlugin;

impl Plugin for StepInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(step_input_on_press)
            .add_observer(step_input_on_keyboard_input)
            .add_systems(
                Update,
                (
                    sync_step_focus.in_set(PanelSet::Input),
                    update_step_input_display.in_set(PanelSet::Sync),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Axis, TransformKind};

    fn step_box() -> StepInput {
        StepInput::new(FieldId::new(TransformKind::Scale, Axis::X), 0.1)
    }

    #[test]
    fn typing_replaces_selected_step() {
        let mut step = step_box();
        step.focus();
        for ch in "0.25".chars() {
            assert!(step.insert_char(ch));
        }
        assert_eq!(step.blur(), Some("0.25".to_string()));
    }

    #[test]
    fn filter_keeps_draft_numeric() {
        let mut step = step_box();
        step.focus();
        assert!(!step.insert_char('x'));
        assert_eq!(step.draft(), "0.1");
        assert_eq!(step.blur(), None);
    }

    #[test]
    fn revert_drops_edit() {
        let mut step = step_box();
        step.focus();
        step.backspace();
        step.insert_char('5');
        step.revert();
        assert_eq!(step.draft(), "0.1");
        assert_eq!(step.commit(), None);
    }

    #[test]
    fn sync_resets_committed_draft() {
        let mut step = step_box();
        step.focus();
        step.insert_char('0');
        assert_eq!(step.commit(), Some("0".to_string()));
        step.sync_step(1.0);
        assert_eq!(step.draft(), "1");
    }
}
