//! Orbit camera with zoom, orbit, and pan controls.
//!
//! Input moves a goal pose; the actual pose eases toward it every frame so
//! motion is damped. Polar angle and distance stay within configured limits.

use std::f32::consts::PI;

use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitConfig>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_zoom, camera_drag, camera_reset, apply_orbit).chain(),
            );
    }
}

/// Orbit camera limits and feel.
#[derive(Resource, Clone, Debug)]
pub struct OrbitConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Initial camera position; the camera looks at the origin.
    pub start_position: Vec3,
    /// Polar angle limits, measured from straight up.
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining distance to the goal covered per 60 Hz frame.
    pub damping: f32,
    /// Radians per pixel of mouse drag.
    pub rotate_speed: f32,
    /// Distance fraction per scroll line.
    pub zoom_speed: f32,
    /// World units per pixel of drag at distance 1.
    pub pan_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            start_position: Vec3::new(0.0, 8.0, 15.0),
            min_polar: PI / 6.0,
            max_polar: PI / 2.5,
            min_distance: 5.0,
            max_distance: 30.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.0015,
        }
    }
}

/// Spherical camera pose around a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPose {
    pub target: Vec3,
    /// Rotation about the vertical axis; 0 looks down -Z.
    pub yaw: f32,
    /// Angle from straight up.
    pub polar: f32,
    pub distance: f32,
}

impl OrbitPose {
    /// Pose that places the camera at `position` looking at `target`.
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target + self.distance * Vec3::new(sin_polar * sin_yaw, cos_polar, sin_polar * cos_yaw)
    }

    pub fn clamped(mut self, config: &OrbitConfig) -> Self {
        self.polar = self.polar.clamp(config.min_polar, config.max_polar);
        self.distance = self.distance.clamp(config.min_distance, config.max_distance);
        self
    }

    /// Move toward `goal` by the frame-rate independent share of `damping`.
    pub fn eased_toward(&self, goal: &OrbitPose, damping: f32, delta_secs: f32) -> Self {
        let t = 1.0 - (1.0 - damping.clamp(0.0, 1.0)).powf(delta_secs * 60.0);
        Self {
            target: self.target.lerp(goal.target, t),
            yaw: self.yaw + (goal.yaw - self.yaw) * t,
            polar: self.polar + (goal.polar - self.polar) * t,
            distance: self.distance + (goal.distance - self.distance) * t,
        }
    }
}

/// Marker and state for the orbit camera.
#[derive(Component, Debug)]
pub struct OrbitCamera {
    pub pose: OrbitPose,
    pub goal: OrbitPose,
}

fn initial_pose(config: &OrbitConfig) -> OrbitPose {
    OrbitPose::looking_from(config.start_position, Vec3::ZERO).clamped(config)
}

fn setup_camera(mut commands: Commands, config: Res<OrbitConfig>) {
    let pose = initial_pose(&config);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(pose.position()).looking_at(pose.target, Vec3::Y),
        OrbitCamera { pose, goal: pose },
    ));
}

fn camera_zoom(
    mut query: Query<&mut OrbitCamera>,
    mut scroll_events: EventReader<MouseWheel>,
    config: Res<OrbitConfig>,
) {
    let scroll: f32 = scroll_events.read().map(|e| e.y).sum();
    if scroll == 0.0 {
        return;
    }

    for mut cam in &mut query {
        let distance = cam.goal.distance * (1.0 - scroll * config.zoom_speed);
        cam.goal.distance = distance.clamp(config.min_distance, config.max_distance);
    }
}

fn camera_drag(
    mut query: Query<&mut OrbitCamera>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<OrbitConfig>,
) {
    let orbiting = mouse_buttons.pressed(MouseButton::Left);
    let panning =
        mouse_buttons.pressed(MouseButton::Right) || mouse_buttons.pressed(MouseButton::Middle);

    if !orbiting && !panning {
        // Drop motion that happened while no button was held
        mouse_motion.clear();
        return;
    }

    let delta: Vec2 = mouse_motion.read().map(|e| e.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    for mut cam in &mut query {
        if orbiting {
            cam.goal.yaw -= delta.x * config.rotate_speed;
            cam.goal.polar = (cam.goal.polar - delta.y * config.rotate_speed)
                .clamp(config.min_polar, config.max_polar);
        } else {
            // Grab-and-drag: the scene follows the cursor
            let yaw = Quat::from_rotation_y(cam.goal.yaw);
            let right = yaw * Vec3::X;
            let forward = yaw * Vec3::NEG_Z;
            let scale = config.pan_speed * cam.goal.distance;
            cam.goal.target += (-right * delta.x + forward * delta.y) * scale;
        }
    }
}

fn camera_reset(
    mut query: Query<&mut OrbitCamera>,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<OrbitConfig>,
) {
    if !keys.just_pressed(KeyCode::KeyF) {
        return;
    }
    for mut cam in &mut query {
        cam.goal = initial_pose(&config);
    }
    info!("Camera view reset");
}

fn apply_orbit(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    config: Res<OrbitConfig>,
    time: Res<Time>,
) {
    for (mut transform, mut cam) in &mut query {
        let goal = cam.goal;
        cam.pose = cam
            .pose
            .eased_toward(&goal, config.damping, time.delta_secs())
            .clamped(&config);
        *transform =
            Transform::from_translation(cam.pose.position()).looking_at(cam.pose.target, Vec3::Y);
    }
}
