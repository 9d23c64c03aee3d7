//! Transform gizmo on the edited object.
//!
//! Draws one handle per axis for the current [`GizmoMode`]: arrows to
//! translate, rings to rotate, boxed lines to scale. Dragging a handle edits
//! the matching field of [`TransformState`] through
//! [`value_transform::apply`], so gizmo edits obey the same clamping, snapping
//! and rounding as the panel.

use std::f32::consts::TAU;

use bevy::picking::hover::HoverMap;
use bevy::picking::pointer::PointerId;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::config::EditorConfig;
use super::plugin::PanelSet;
use super::state::{EditedObject, TransformState};
use crate::field::{Axis, FieldId, TransformKind};
use crate::value_transform;

/// World-space length of translate and scale handles.
pub const HANDLE_LENGTH: f32 = 2.5;
/// Radius of the rotate rings.
pub const RING_RADIUS: f32 = 2.0;
/// Distance in logical pixels within which the pointer grabs a handle.
pub const PICK_RADIUS: f32 = 10.0;

/// Translation per pixel, per world unit of camera distance.
const TRANSLATE_PER_PIXEL: f32 = 0.003;
const DEGREES_PER_PIXEL: f64 = 0.5;
const SCALE_PER_PIXEL: f64 = 0.005;
const RING_SEGMENTS: usize = 48;
const HANDLE_START: f32 = 0.2;

/// What dragging a gizmo handle edits.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub const ALL: [GizmoMode; 3] = [GizmoMode::Translate, GizmoMode::Rotate, GizmoMode::Scale];

    pub fn label(self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }

    /// Field group edited in this mode.
    pub fn kind(self) -> TransformKind {
        match self {
            GizmoMode::Translate => TransformKind::Position,
            GizmoMode::Rotate => TransformKind::Rotation,
            GizmoMode::Scale => TransformKind::Scale,
        }
    }
}

/// Pointer interaction with the gizmo.
#[derive(Resource, Debug, Default)]
pub struct GizmoDragState {
    pub hovered: Option<Axis>,
    pub active: Option<ActiveGizmoDrag>,
}

/// A handle being dragged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveGizmoDrag {
    pub mode: GizmoMode,
    pub field: FieldId,
    pub start_cursor: Vec2,
    pub start_value: f64,
    /// Screen direction whose pointer travel drives the value.
    pub screen_axis: Vec2,
    /// World units per pixel of travel, used when translating.
    pub world_per_pixel: f32,
}

pub fn axis_direction(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::X,
        Axis::Y => Vec3::Y,
        Axis::Z => Vec3::Z,
    }
}

pub fn axis_color(axis: Axis) -> Color {
    match axis {
        Axis::X => Color::srgb(1.0, 0.2, 0.2),
        Axis::Y => Color::srgb(0.2, 1.0, 0.2),
        Axis::Z => Color::srgb(0.2, 0.4, 1.0),
    }
}

/// World-space polyline of one handle. Drawing and picking share it.
pub fn handle_points(mode: GizmoMode, origin: Vec3, axis: Axis) -> Vec<Vec3> {
    let dir = axis_direction(axis);
    match mode {
        GizmoMode::Translate | GizmoMode::Scale => vec![
            origin + dir * (HANDLE_LENGTH * HANDLE_START),
            origin + dir * HANDLE_LENGTH,
        ],
        GizmoMode::Rotate => {
            let (u, v) = dir.any_orthonormal_pair();
            (0..=RING_SEGMENTS)
                .map(|i| {
                    let angle = i as f32 / RING_SEGMENTS as f32 * TAU;
                    origin + (u * angle.cos() + v * angle.sin()) * RING_RADIUS
                })
                .collect()
        }
    }
}

/// Distance from `point` to the segment `a`..`b`.
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// The handle closest to `cursor`, if any lies within [`PICK_RADIUS`].
/// Handles are given as screen-space polylines.
pub fn pick_handle(cursor: Vec2, handles: &[(Axis, Vec<Vec2>)]) -> Option<Axis> {
    handles
        .iter()
        .filter_map(|(axis, points)| {
            points
                .windows(2)
                .map(|pair| distance_to_segment(cursor, pair[0], pair[1]))
                .min_by(f32::total_cmp)
                .map(|distance| (*axis, distance))
        })
        .filter(|(_, distance)| *distance <= PICK_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(axis, _)| axis)
}

/// Unconstrained value after dragging `pixels` along the grabbed handle.
pub fn drag_candidate(drag: &ActiveGizmoDrag, pixels: f32) -> f64 {
    let pixels = f64::from(pixels);
    match drag.mode {
        GizmoMode::Translate => drag.start_value + pixels * f64::from(drag.world_per_pixel),
        GizmoMode::Rotate => drag.start_value + pixels * DEGREES_PER_PIXEL,
        GizmoMode::Scale => drag.start_value * (1.0 + pixels * SCALE_PER_PIXEL),
    }
}

fn cursor_position(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    windows.single().ok()?.cursor_position()
}

fn pointer_over_ui(hover_map: Option<&HoverMap>, ui_nodes: &Query<(), With<Node>>) -> bool {
    hover_map
        .and_then(|map| map.get(&PointerId::Mouse))
        .is_some_and(|hits| hits.keys().any(|entity| ui_nodes.contains(*entity)))
}

fn screen_handles(
    mode: GizmoMode,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    origin: Vec3,
) -> Vec<(Axis, Vec<Vec2>)> {
    Axis::ALL
        .into_iter()
        .filter_map(|axis| {
            let points = handle_points(mode, origin, axis)
                .into_iter()
                .map(|point| camera.world_to_viewport(camera_transform, point))
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            Some((axis, points))
        })
        .collect()
}

/// Highlights the handle under the cursor.
pub fn update_gizmo_hover(
    mode: Res<GizmoMode>,
    mut drag: ResMut<GizmoDragState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    objects: Query<&Transform, With<EditedObject>>,
) {
    if drag.active.is_some() {
        return;
    }
    let hovered = match (cursor_position(&windows), cameras.single(), objects.single()) {
        (Some(cursor), Ok((camera, camera_transform)), Ok(object)) => pick_handle(
            cursor,
            &screen_handles(*mode, camera, camera_transform, object.translation),
        ),
        _ => None,
    };
    if drag.hovered != hovered {
        drag.hovered = hovered;
    }
}

/// Grabs the hovered handle on a primary press outside the panel.
pub fn begin_gizmo_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    mode: Res<GizmoMode>,
    mut drag: ResMut<GizmoDragState>,
    state: Res<TransformState>,
    hover_map: Option<Res<HoverMap>>,
    ui_nodes: Query<(), With<Node>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    objects: Query<&Transform, With<EditedObject>>,
) {
    if !mouse.just_pressed(MouseButton::Left) || drag.active.is_some() {
        return;
    }
    if pointer_over_ui(hover_map.as_deref(), &ui_nodes) {
        return;
    }
    let Some(cursor) = cursor_position(&windows) else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(object) = objects.single() else {
        return;
    };

    let origin = object.translation;
    let Some(axis) = pick_handle(cursor, &screen_handles(*mode, camera, camera_transform, origin))
    else {
        return;
    };

    // Rings turn with horizontal travel; arrows and boxes follow their axis on screen
    let screen_axis = match *mode {
        GizmoMode::Rotate => Vec2::X,
        GizmoMode::Translate | GizmoMode::Scale => {
            let start = camera.world_to_viewport(camera_transform, origin);
            let end = camera.world_to_viewport(camera_transform, origin + axis_direction(axis));
            match (start, end) {
                (Ok(start), Ok(end)) => (end - start).normalize_or(Vec2::X),
                _ => Vec2::X,
            }
        }
    };

    let field = FieldId::new(mode.kind(), axis);
    drag.active = Some(ActiveGizmoDrag {
        mode: *mode,
        field,
        start_cursor: cursor,
        start_value: state.value(field),
        screen_axis,
        world_per_pixel: camera_transform.translation().distance(origin) * TRANSLATE_PER_PIXEL,
    });
    debug!("Gizmo drag started on {}", field);
}

/// Writes the dragged handle's value into the state.
pub fn drag_gizmo(
    mouse: Res<ButtonInput<MouseButton>>,
    drag: Res<GizmoDragState>,
    config: Res<EditorConfig>,
    mut state: ResMut<TransformState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(active) = drag.active else {
        return;
    };
    if !mouse.pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = cursor_position(&windows) else {
        return;
    };

    let pixels = (cursor - active.start_cursor).dot(active.screen_axis);
    let field = active.field;
    let value = value_transform::apply(
        drag_candidate(&active, pixels),
        field.kind,
        config.preset(field.kind).precision,
        state.lock(field).policy(),
    );
    if state.value(field) != value {
        state.set_value(field, value);
    }
}

pub fn end_gizmo_drag(mouse: Res<ButtonInput<MouseButton>>, mut drag: ResMut<GizmoDragState>) {
    if mouse.pressed(MouseButton::Left) || drag.active.is_none() {
        return;
    }
    if let Some(active) = drag.active.take() {
        debug!("Gizmo drag ended on {}", active.field);
    }
}

/// Draws the handles of the current mode around the edited object.
pub fn draw_transform_gizmo(
    mode: Res<GizmoMode>,
    drag: Res<GizmoDragState>,
    objects: Query<&Transform, With<EditedObject>>,
    mut gizmos: Gizmos,
) {
    let Ok(object) = objects.single() else {
        return;
    };
    let origin = object.translation;
    let grabbed = drag.active.map(|active| active.field.axis).or(drag.hovered);

    for axis in Axis::ALL {
        let color = if grabbed == Some(axis) {
            Color::srgb(1.0, 0.9, 0.1)
        } else {
            axis_color(axis)
        };
        match *mode {
            GizmoMode::Translate => {
                gizmos.arrow(origin, origin + axis_direction(axis) * HANDLE_LENGTH, color);
            }
            GizmoMode::Rotate => gizmos.linestrip(handle_points(*mode, origin, axis), color),
            GizmoMode::Scale => {
                let end = origin + axis_direction(axis) * HANDLE_LENGTH;
                gizmos.line(origin, end, color);
                gizmos.cuboid(
                    Transform::from_translation(end).with_scale(Vec3::splat(0.25)),
                    color,
                );
            }
        }
    }
}

/// Plugin that adds the transform gizmo.
pub struct TransformGizmoPlugin;

impl Plugin for TransformGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GizmoMode>()
            .init_resource::<GizmoDragState>()
            .add_systems(
                Update,
                (
                    (update_gizmo_hover, begin_gizmo_drag, drag_gizmo, end_gizmo_drag)
                        .chain()
                        .in_set(PanelSet::Drag),
                    draw_transform_gizmo.after(PanelSet::Sync),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::increment_lock::IncrementLock;

    const POS_X: FieldId = FieldId::new(TransformKind::Position, Axis::X);

    fn translate_drag(start_value: f64) -> ActiveGizmoDrag {
        ActiveGizmoDrag {
            mode: GizmoMode::Translate,
            field: POS_X,
            start_cursor: Vec2::new(100.0, 100.0),
            start_value,
            screen_axis: Vec2::X,
            world_per_pixel: 0.5,
        }
    }

    #[test]
    fn modes_edit_their_field_group() {
        assert_eq!(GizmoMode::default(), GizmoMode::Translate);
        assert_eq!(GizmoMode::Translate.kind(), TransformKind::Position);
        assert_eq!(GizmoMode::Rotate.kind(), TransformKind::Rotation);
        assert_eq!(GizmoMode::Scale.kind(), TransformKind::Scale);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(14.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(0.0, 2.0), a, a), 2.0);
    }

    #[test]
    fn picks_nearest_handle_in_range() {
        let handles = vec![
            (Axis::X, vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]),
            (Axis::Y, vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, -100.0)]),
        ];
        assert_eq!(pick_handle(Vec2::new(50.0, 4.0), &handles), Some(Axis::X));
        assert_eq!(pick_handle(Vec2::new(3.0, -60.0), &handles), Some(Axis::Y));
        assert_eq!(pick_handle(Vec2::new(50.0, 40.0), &handles), None);
    }

    #[test]
    fn rings_sit_at_ring_radius_around_axis() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ring = handle_points(GizmoMode::Rotate, origin, Axis::Y);
        assert_eq!(ring.len(), RING_SEGMENTS + 1);
        for point in ring {
            let offset = point - origin;
            assert!((offset.length() - RING_RADIUS).abs() < 1e-4);
            assert!(offset.y.abs() < 1e-4);
        }
    }

    #[test]
    fn candidates_follow_mode() {
        let translate = translate_drag(1.0);
        assert_eq!(drag_candidate(&translate, 50.0), 26.0);

        let rotate = ActiveGizmoDrag {
            mode: GizmoMode::Rotate,
            ..translate
        };
        assert_eq!(drag_candidate(&rotate, -20.0), -9.0);

        let scale = ActiveGizmoDrag {
            mode: GizmoMode::Scale,
            start_value: 2.0,
            ..translate
        };
        assert_eq!(drag_candidate(&scale, 100.0), 3.0);
    }

    fn gizmo_app(drag: ActiveGizmoDrag, lock: Option<IncrementLock>) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<EditorConfig>()
            .init_resource::<TransformState>()
            .insert_resource(GizmoDragState {
                hovered: None,
                active: Some(drag),
            })
            .add_systems(Update, (drag_gizmo, end_gizmo_drag).chain());
        if let Some(lock) = lock {
            *app.world_mut()
                .resource_mut::<TransformState>()
                .lock_mut(POS_X) = lock;
        }
        let mut window = Window::default();
        window.set_cursor_position(Some(Vec2::new(150.0, 130.0)));
        app.world_mut().spawn((window, PrimaryWindow));
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app
    }

    #[test]
    fn dragging_handle_writes_state() {
        let mut app = gizmo_app(translate_drag(0.0), None);
        app.update();
        let state = app.world().resource::<TransformState>();
        assert_eq!(state.value(POS_X), 25.0);
        assert!(app.world().resource::<GizmoDragState>().active.is_some());

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .release(MouseButton::Left);
        app.update();
        assert!(app.world().resource::<GizmoDragState>().active.is_none());
    }

    #[test]
    fn gizmo_edits_respect_increment_lock() {
        let mut lock = IncrementLock::new(10.0);
        lock.toggle();
        let mut app = gizmo_app(translate_drag(0.0), Some(lock));
        app.update();
        // 25 snaps half away from zero.
        assert_eq!(app.world().resource::<TransformState>().value(POS_X), 30.0);
    }
}
