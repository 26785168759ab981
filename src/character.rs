//! Character controller: discrete gravity, point-vs-heightfield ground
//! contact, clamped mouse-look and camera-relative planar movement.
//!
//! Every quantity here is per tick. Gravity and speed are not scaled by frame
//! time; the host decides how often to tick.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::{self, CharacterConfig};
use crate::input::InputState;
use crate::terrain::HeightProvider;

#[derive(Debug, Clone)]
pub struct CharacterController {
    position: Vec3,
    velocity_y: f32,
    grounded: bool,
    /// Look yaw of the camera pivot, folded into `body_yaw` when the character moves.
    yaw: f32,
    pitch: f32,
    body_yaw: f32,
    pivot_rotation: Quat,

    mouse_sensitivity: f32,
    gravity: f32,
    speed: f32,
    half_height: f32,
    fallback_floor: f32,
}

impl CharacterController {
    pub fn new(spawn: Vec3) -> Self {
        Self::from_config(&CharacterConfig { spawn: spawn.to_array(), ..Default::default() })
    }

    pub fn from_config(cfg: &CharacterConfig) -> Self {
        Self {
            position: Vec3::from(cfg.spawn),
            velocity_y: 0.0,
            grounded: false,
            yaw: 0.0,
            pitch: 0.0,
            body_yaw: 0.0,
            pivot_rotation: Quat::IDENTITY,
            mouse_sensitivity: cfg.mouse_sensitivity,
            gravity: cfg.gravity,
            speed: cfg.speed,
            half_height: cfg.half_height,
            fallback_floor: cfg.fallback_floor,
        }
    }

    /// Runs one tick. `ground` may be absent or unusable, in which case the
    /// fixed fallback floor is used instead.
    pub fn update(&mut self, input: &mut InputState, ground: Option<&dyn HeightProvider>) {
        self.apply_gravity();
        self.resolve_ground(ground);
        self.apply_look(input);
        self.apply_movement(input);
        self.refresh_pivot();
    }

    fn apply_gravity(&mut self) {
        if !self.grounded {
            self.velocity_y += self.gravity;
        }
        self.position.y += self.velocity_y;
    }

    /// Snaps to the surface under the current position. Movement runs after
    /// this step, so a tick that walks onto a higher cell can end up to one
    /// cell step below it; the next tick's snap lifts it back.
    fn resolve_ground(&mut self, ground: Option<&dyn HeightProvider>) {
        let surface = ground
            .and_then(|g| {
                g.height_at(self.position.x, self.position.z)
                    .map(|h| h + g.origin_y() + self.half_height)
            })
            .filter(|s| s.is_finite());

        match surface {
            Some(surface) => {
                if self.position.y < surface {
                    self.position.y = surface;
                    self.velocity_y = 0.0;
                    self.grounded = true;
                } else {
                    self.grounded = false;
                }
            }
            None => {
                self.grounded = self.position.y < self.fallback_floor;
                if self.grounded {
                    self.position.y = self.fallback_floor;
                    self.velocity_y = 0.0;
                }
            }
        }
    }

    fn apply_look(&mut self, input: &mut InputState) {
        let Some(delta) = input.take_mouse() else { return };

        self.yaw -= delta.x * self.mouse_sensitivity;

        // Out-of-range deltas are dropped whole rather than clamped.
        let candidate = self.pitch - delta.y * self.mouse_sensitivity;
        if (pitch_min()..=pitch_max()).contains(&candidate) {
            self.pitch = candidate;
        }
    }

    fn apply_movement(&mut self, input: &InputState) {
        if !input.any_movement() {
            return;
        }

        // Direction comes from the pivot as last refreshed, i.e. the camera
        // the player is currently looking through.
        let mut forward = self.camera_forward();
        forward.y = 0.0;
        let forward = forward.normalize_or_zero();
        let right = forward.cross(Vec3::Y);

        let mut movement = Vec3::ZERO;
        if input.move_fwd { movement += forward; }
        if input.move_back { movement -= forward; }
        if input.move_right { movement += right; }
        if input.move_left { movement -= right; }

        if movement.length_squared() > 0.0 {
            // Turning the body only happens once the character actually moves.
            self.body_yaw += self.yaw;
            self.yaw = 0.0;
            self.position += movement.normalize() * self.speed;
        }
    }

    fn refresh_pivot(&mut self) {
        self.pivot_rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
    }

    pub fn position(&self) -> Vec3 { self.position }
    pub fn velocity_y(&self) -> f32 { self.velocity_y }
    pub fn grounded(&self) -> bool { self.grounded }
    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn body_yaw(&self) -> f32 { self.body_yaw }
    pub fn speed(&self) -> f32 { self.speed }
    pub fn half_height(&self) -> f32 { self.half_height }
    pub fn fallback_floor(&self) -> f32 { self.fallback_floor }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.body_yaw)
    }

    /// Orientation of the camera pivot relative to the body.
    pub fn pivot_rotation(&self) -> Quat {
        self.pivot_rotation
    }

    pub fn body_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.body_rotation(), self.position)
    }

    fn camera_rotation(&self) -> Quat {
        self.body_rotation() * self.pivot_rotation
    }

    pub fn camera_eye(&self) -> Vec3 {
        self.position + self.camera_rotation() * Vec3::from(config::CAMERA_OFFSET)
    }

    /// The camera always looks back at the pivot it orbits.
    pub fn camera_forward(&self) -> Vec3 {
        self.camera_rotation() * -Vec3::from(config::CAMERA_OFFSET).normalize()
    }

    pub fn camera_up(&self) -> Vec3 {
        self.camera_rotation() * Vec3::Y
    }
}

pub fn pitch_min() -> f32 {
    config::PITCH_MIN_DEG.to_radians()
}

pub fn pitch_max() -> f32 {
    config::PITCH_MAX_DEG.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    struct Flat(f32);

    impl HeightProvider for Flat {
        fn height_at(&self, _x: f32, _z: f32) -> Option<f32> { Some(self.0) }
        fn origin_y(&self) -> f32 { -40.0 }
    }

    struct Broken;

    impl HeightProvider for Broken {
        fn height_at(&self, _x: f32, _z: f32) -> Option<f32> { None }
        fn origin_y(&self) -> f32 { 0.0 }
    }

    fn mouse(dx: f32, dy: f32) -> InputState {
        InputState { mouse_moved: true, mouse_delta: Vec2::new(dx, dy), ..Default::default() }
    }

    fn horizontal(a: Vec3, b: Vec3) -> f32 {
        Vec2::new(b.x - a.x, b.z - a.z).length()
    }

    #[test]
    fn gravity_is_a_discrete_euler_step() {
        let mut c = CharacterController::new(Vec3::new(0.0, 10.0, 0.0));
        c.update(&mut InputState::new(), None);
        assert!((c.velocity_y() + 0.01).abs() < 1e-7);
        assert!((c.position().y - 9.99).abs() < 1e-5);
        c.update(&mut InputState::new(), None);
        assert!((c.velocity_y() + 0.02).abs() < 1e-7);
        assert!((c.position().y - 9.97).abs() < 1e-5);
    }

    #[test]
    fn lands_on_provider_surface() {
        let ground = Flat(15.0);
        let mut c = CharacterController::new(Vec3::new(0.0, -30.0, 0.0));
        c.update(&mut InputState::new(), Some(&ground));
        // surface = 15 - 40 + 0.5
        assert_eq!(c.position().y, -24.5);
        assert_eq!(c.velocity_y(), 0.0);
        assert!(c.grounded());
    }

    #[test]
    fn fallback_floor_catches_a_falling_character() {
        let mut c = CharacterController::new(Vec3::new(0.0, 10.0, 0.0));
        let mut steps = 0;
        while !c.grounded() {
            c.update(&mut InputState::new(), None);
            steps += 1;
            assert!(steps < 10_000, "never reached the floor");
        }
        assert_eq!(c.position().y, config::FALLBACK_FLOOR_Y);
        assert_eq!(c.velocity_y(), 0.0);
    }

    #[test]
    fn unusable_provider_behaves_like_no_provider() {
        let mut with_broken = CharacterController::new(Vec3::new(0.0, -38.0, 0.0));
        let mut without = with_broken.clone();
        for _ in 0..50 {
            with_broken.update(&mut InputState::new(), Some(&Broken));
            without.update(&mut InputState::new(), None);
            assert_eq!(with_broken.position(), without.position());
            assert_eq!(with_broken.grounded(), without.grounded());
        }
    }

    #[test]
    fn pitch_never_leaves_its_window() {
        let mut c = CharacterController::new(Vec3::ZERO);
        for _ in 0..200 {
            c.update(&mut mouse(0.0, 7.0), None);
            assert!(c.pitch() >= pitch_min() - 1e-6);
        }
        assert!(c.pitch() < 0.0);
        for _ in 0..200 {
            c.update(&mut mouse(0.0, -7.0), None);
            assert!(c.pitch() <= pitch_max() + 1e-6);
        }
        assert!(c.pitch() > 0.0);
    }

    #[test]
    fn out_of_range_pitch_delta_is_rejected_whole() {
        let mut c = CharacterController::new(Vec3::ZERO);
        // 0.02 * 100 = 2 rad, well past -40 degrees
        c.update(&mut mouse(5.0, 100.0), None);
        assert_eq!(c.pitch(), 0.0);
        // yaw still applies
        assert!((c.yaw() + 0.1).abs() < 1e-6);
    }

    #[test]
    fn mouse_flag_is_consumed() {
        let mut c = CharacterController::new(Vec3::ZERO);
        let mut input = mouse(10.0, 0.0);
        c.update(&mut input, None);
        assert!(!input.mouse_moved);
        let yaw = c.yaw();
        c.update(&mut input, None);
        assert_eq!(c.yaw(), yaw);
    }

    #[test]
    fn forward_moves_along_negative_z_at_speed() {
        let mut c = CharacterController::new(Vec3::new(0.0, 100.0, 0.0));
        let before = c.position();
        c.update(&mut InputState { move_fwd: true, ..Default::default() }, None);
        let after = c.position();
        assert!((after.z - (before.z - 0.1)).abs() < 1e-6);
        assert!((after.x - before.x).abs() < 1e-6);
    }

    #[test]
    fn diagonal_is_not_faster_than_axial() {
        let start = Vec3::new(0.0, 100.0, 0.0);
        let mut axial = CharacterController::new(start);
        let mut diagonal = CharacterController::new(start);
        axial.update(&mut InputState { move_fwd: true, ..Default::default() }, None);
        diagonal.update(
            &mut InputState { move_fwd: true, move_right: true, ..Default::default() },
            None,
        );
        let a = horizontal(start, axial.position());
        let d = horizontal(start, diagonal.position());
        assert!((a - d).abs() < 1e-5);
        assert!((d - 0.1).abs() < 1e-5);
    }

    #[test]
    fn opposing_keys_cancel_and_keep_look_yaw() {
        let mut c = CharacterController::new(Vec3::new(0.0, 100.0, 0.0));
        c.update(&mut mouse(10.0, 0.0), None);
        let start = c.position();
        c.update(&mut InputState { move_fwd: true, move_back: true, ..Default::default() }, None);
        assert_eq!(horizontal(start, c.position()), 0.0);
        assert!(c.yaw() != 0.0);
        assert_eq!(c.body_yaw(), 0.0);
    }

    #[test]
    fn look_yaw_folds_into_body_when_moving() {
        let mut c = CharacterController::new(Vec3::new(0.0, 100.0, 0.0));
        c.update(&mut mouse(-40.0, 0.0), None);
        let look = c.yaw();
        assert!((look - 0.8).abs() < 1e-6);
        assert_eq!(c.body_yaw(), 0.0);

        // Standing still keeps the look free.
        c.update(&mut InputState::new(), None);
        assert_eq!(c.yaw(), look);

        c.update(&mut InputState { move_fwd: true, ..Default::default() }, None);
        assert_eq!(c.yaw(), 0.0);
        assert!((c.body_yaw() - look).abs() < 1e-6);
    }

    #[test]
    fn movement_follows_the_camera_heading() {
        let mut c = CharacterController::new(Vec3::new(0.0, 100.0, 0.0));
        // quarter turn left: yaw = +pi/2
        let dx = -std::f32::consts::FRAC_PI_2 / config::MOUSE_SENSITIVITY;
        c.update(&mut mouse(dx, 0.0), None);
        let start = c.position();
        c.update(&mut InputState { move_fwd: true, ..Default::default() }, None);
        let step = c.position() - start;
        // forward (0,0,-1) rotated +90 degrees about Y points to -X
        assert!((step.x + 0.1).abs() < 1e-5);
        assert!(step.z.abs() < 1e-5);
    }

    #[test]
    fn pivot_tracks_yaw_and_pitch() {
        let mut c = CharacterController::new(Vec3::ZERO);
        c.update(&mut mouse(5.0, 5.0), None);
        let expected = Quat::from_euler(EulerRot::YXZ, c.yaw(), c.pitch(), 0.0);
        assert!(c.pivot_rotation().abs_diff_eq(expected, 1e-6));
    }
}
