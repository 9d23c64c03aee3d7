//! Fault boundary around the properties panel.
//!
//! Panel systems that can fail are piped into [`contain_panel_fault`]. The
//! first fault hides the panel and shows a fallback card with a retry button;
//! retrying repairs unusable values and shows the panel again.

use bevy::ecs::observer::On;
use bevy::feathers::controls::{button, ButtonProps};
use bevy::feathers::theme::ThemeBackgroundColor;
use bevy::feathers::tokens;
use bevy::prelude::*;
use bevy::ui::Val::*;
use bevy::ui_widgets::{observe, Activate};

use super::properties_panel::PropertiesPanel;
use crate::editor::config::EditorConfig;
use crate::editor::error::PanelError;
use crate::editor::state::{FaultBoundary, TransformState};

/// Marker for the fallback card.
#[derive(Component)]
pub struct FallbackCard;

/// Marker for the text describing the fault.
#[derive(Component)]
pub struct FallbackDetail;

/// Pipe target for fallible panel systems.
pub fn contain_panel_fault(In(result): In<Result<(), PanelError>>, mut boundary: ResMut<FaultBoundary>) {
    let Err(fault) = result else {
        return;
    };
    let message = fault.to_string();
    if boundary.trip(fault) {
        error!("Transform controls failed: {}", message);
    }
}

/// Swaps between the panel and the fallback card when the boundary changes.
pub fn sync_fault_view(
    boundary: Res<FaultBoundary>,
    mut panels: Query<&mut Node, (With<PropertiesPanel>, Without<FallbackCard>)>,
    mut cards: Query<&mut Node, (With<FallbackCard>, Without<PropertiesPanel>)>,
    mut details: Query<&mut Text, With<FallbackDetail>>,
) {
    if !boundary.is_changed() {
        return;
    }

    let tripped = boundary.is_tripped();
    for mut node in &mut panels {
        node.display = if tripped { Display::None } else { Display::Flex };
    }
    for mut node in &mut cards {
        node.display = if tripped { Display::Flex } else { Display::None };
    }
    if let Some(fault) = boundary.fault() {
        for mut text in &mut details {
            text.0 = fault.to_string();
        }
    }
}

fn on_retry_click(
    _activate: On<Activate>,
    mut boundary: ResMut<FaultBoundary>,
    mut state: ResMut<TransformState>,
) {
    let repaired = state.reset_non_finite();
    boundary.clear();
    // Force a full resync even when nothing needed repair.
    state.set_changed();
    info!("Transform controls reset ({} field(s) repaired)", repaired);
}

/// Spawns the hidden fallback card, centered over the viewport.
pub fn spawn_fallback_card(commands: &mut Commands, config: &EditorConfig) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Percent(50.0),
                top: Percent(50.0),
                margin: UiRect {
                    left: Px(-160.0),
                    top: Px(-60.0),
                    ..default()
                },
                width: Px(320.0),
                display: Display::None,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: config.item_gap,
                padding: UiRect::all(Px(20.0)),
                border: UiRect::all(Px(1.0)),
                ..default()
            },
            ThemeBackgroundColor(tokens::WINDOW_BG),
            BorderColor::all(config.error_text_color),
            FallbackCard,
        ))
        .with_children(|card| {
            card.spawn((
                Text::new("Something went wrong with the transform controls"),
                TextFont {
                    font_size: config.title_font_size,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            card.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.small_font_size,
                    ..default()
                },
                TextColor(config.error_text_color),
                FallbackDetail,
            ));
            card.spawn((
                button(
                    ButtonProps::default(),
                    (),
                    Spawn((
                        Text::new("Try Again"),
                        TextFont {
                            font_size: config.body_font_size,
                            ..default()
                        },
                    )),
                ),
                observe(on_retry_click),
            ));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::panels::properties_panel::sync_fields_from_state;
    use crate::field::{Axis, FieldId, TransformKind};

    const SCALE_Y: FieldId = FieldId::new(TransformKind::Scale, Axis::Y);

    struct Views {
        panel: Entity,
        card: Entity,
        detail: Entity,
    }

    fn boundary_app() -> (App, Views) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<EditorConfig>()
            .init_resource::<TransformState>()
            .init_resource::<FaultBoundary>()
            .add_systems(
                Update,
                (sync_fields_from_state.pipe(contain_panel_fault), sync_fault_view).chain(),
            );
        let world = app.world_mut();
        let views = Views {
            panel: world.spawn((Node::default(), PropertiesPanel)).id(),
            card: world
                .spawn((
                    Node {
                        display: Display::None,
                        ..default()
                    },
                    FallbackCard,
                ))
                .id(),
            detail: world.spawn((Text::new(""), FallbackDetail)).id(),
        };
        (app, views)
    }

    fn display(app: &App, entity: Entity) -> Display {
        app.world().get::<Node>(entity).expect("view node").display
    }

    #[test]
    fn non_finite_state_shows_fallback_card() {
        let (mut app, views) = boundary_app();
        app.update();
        assert!(!app.world().resource::<FaultBoundary>().is_tripped());
        assert_eq!(display(&app, views.panel), Display::Flex);

        app.world_mut()
            .resource_mut::<TransformState>()
            .set_value(SCALE_Y, f64::NAN);
        app.update();

        assert!(app.world().resource::<FaultBoundary>().is_tripped());
        assert_eq!(display(&app, views.panel), Display::None);
        assert_eq!(display(&app, views.card), Display::Flex);
        let detail = app.world().get::<Text>(views.detail).expect("detail text");
        assert!(detail.0.contains("scale.y"), "{}", detail.0);
    }

    #[test]
    fn retry_repairs_state_and_restores_panel() {
        let (mut app, views) = boundary_app();
        let retry = app.world_mut().spawn_empty().observe(on_retry_click).id();
        app.world_mut()
            .resource_mut::<TransformState>()
            .set_value(SCALE_Y, f64::INFINITY);
        app.update();
        assert_eq!(display(&app, views.card), Display::Flex);

        app.world_mut().trigger(Activate { entity: retry });
        app.update();

        assert!(!app.world().resource::<FaultBoundary>().is_tripped());
        assert_eq!(app.world().resource::<TransformState>().value(SCALE_Y), 1.0);
        assert_eq!(display(&app, views.panel), Display::Flex);
        assert_eq!(display(&app, views.card), Display::None);
    }
}
