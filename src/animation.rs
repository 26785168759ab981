//! Periodic leg swing for four-legged characters and the per-frame fan-out
//! that drives every registered animator.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::{Rc, Weak};

use crate::config;
use crate::locomotion::{LocomotionState, SharedLocomotion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Joint {
    pub const ALL: [Joint; 4] = [Joint::FrontLeft, Joint::FrontRight, Joint::BackLeft, Joint::BackRight];

    pub fn index(self) -> usize {
        self as usize
    }

    /// FrontRight and BackLeft run half a cycle behind, so diagonal pairs
    /// swing together and neighbours swing opposite.
    pub fn phase_offset(self) -> f64 {
        match self {
            Joint::FrontRight | Joint::BackLeft => PI,
            Joint::FrontLeft | Joint::BackRight => 0.0,
        }
    }
}

/// Anything that advances once per frame by wall-clock seconds.
pub trait Animatable {
    fn update(&mut self, dt: f32);
}

/// (cadence, amplitude) for a moving gait, `None` when standing still.
pub fn gait(state: LocomotionState) -> Option<(f32, f32)> {
    match state {
        LocomotionState::Idle => None,
        LocomotionState::Walking => Some((config::WALK_CADENCE, config::WALK_AMPLITUDE)),
        LocomotionState::Running => Some((config::RUN_CADENCE, config::RUN_AMPLITUDE)),
    }
}

#[derive(Debug)]
pub struct LimbAnimator {
    // Accumulated in f64 so a long session keeps frame-sized increments exact.
    phase_time: f64,
    rotations: [f32; 4],
    locomotion: SharedLocomotion,
}

impl LimbAnimator {
    pub fn new(locomotion: SharedLocomotion) -> Self {
        Self { phase_time: 0.0, rotations: [0.0; 4], locomotion }
    }

    pub fn phase_time(&self) -> f64 {
        self.phase_time
    }

    /// Swing angle about the joint's local X axis, in radians.
    pub fn rotation(&self, joint: Joint) -> f32 {
        self.rotations[joint.index()]
    }

    pub fn rotations(&self) -> [f32; 4] {
        self.rotations
    }

    pub fn locomotion(&self) -> LocomotionState {
        self.locomotion.get()
    }
}

impl Animatable for LimbAnimator {
    fn update(&mut self, dt: f32) {
        // Phase keeps running while idle; only its effect is suppressed.
        if dt.is_finite() && dt > 0.0 {
            self.phase_time += f64::from(dt);
        }

        let Some((cadence, amplitude)) = gait(self.locomotion.get()) else {
            self.rotations = [0.0; 4];
            return;
        };

        for joint in Joint::ALL {
            let angle = self.phase_time * f64::from(cadence) + joint.phase_offset();
            self.rotations[joint.index()] = angle.sin() as f32 * amplitude;
        }
    }
}

/// Non-owning set of animators. Membership is by identity; iteration order
/// carries no meaning.
#[derive(Default)]
pub struct AnimatableRegistry {
    animatables: Vec<Weak<RefCell<dyn Animatable>>>,
}

impl AnimatableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the animator was already registered.
    pub fn add<A: Animatable + 'static>(&mut self, animatable: &Rc<RefCell<A>>) -> bool {
        let strong: Rc<RefCell<dyn Animatable>> = animatable.clone();
        let weak = Rc::downgrade(&strong);
        if self.position(&weak).is_some() {
            return false;
        }
        self.animatables.push(weak);
        true
    }

    /// Returns `false` if the animator was not registered.
    pub fn remove<A: Animatable + 'static>(&mut self, animatable: &Rc<RefCell<A>>) -> bool {
        let strong: Rc<RefCell<dyn Animatable>> = animatable.clone();
        match self.position(&Rc::downgrade(&strong)) {
            Some(i) => {
                self.animatables.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains<A: Animatable + 'static>(&self, animatable: &Rc<RefCell<A>>) -> bool {
        let strong: Rc<RefCell<dyn Animatable>> = animatable.clone();
        self.position(&Rc::downgrade(&strong)).is_some()
    }

    /// Live registrations; animators dropped by their owners are not counted.
    pub fn len(&self) -> usize {
        self.animatables.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advances every live animator exactly once.
    pub fn update(&mut self, dt: f32) {
        self.animatables.retain(|w| w.strong_count() > 0);
        for weak in &self.animatables {
            if let Some(animatable) = weak.upgrade() {
                animatable.borrow_mut().update(dt);
            }
        }
    }

    fn position(&self, weak: &Weak<RefCell<dyn Animatable>>) -> Option<usize> {
        self.animatables
            .iter()
            .position(|w| std::ptr::addr_eq(w.as_ptr(), weak.as_ptr()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion;

    fn animator(state: LocomotionState) -> (SharedLocomotion, LimbAnimator) {
        let shared = locomotion::shared(state);
        let animator = LimbAnimator::new(shared.clone());
        (shared, animator)
    }

    #[test]
    fn idle_keeps_all_joints_neutral() {
        let (_, mut anim) = animator(LocomotionState::Idle);
        for _ in 0..10 {
            anim.update(0.016);
        }
        assert_eq!(anim.rotations(), [0.0; 4]);
        assert!((anim.phase_time() - 0.16).abs() < 1e-5);
    }

    #[test]
    fn switching_to_idle_resets_on_next_frame() {
        let (state, mut anim) = animator(LocomotionState::Walking);
        for _ in 0..7 {
            anim.update(0.05);
        }
        assert!(anim.rotations().iter().any(|&r| r != 0.0));

        state.set(LocomotionState::Idle);
        anim.update(0.05);
        assert_eq!(anim.rotations(), [0.0; 4]);
    }

    #[test]
    fn diagonal_pairs_share_rotation_when_running() {
        let (_, mut anim) = animator(LocomotionState::Running);
        for _ in 0..25 {
            anim.update(0.013);
            assert_eq!(anim.rotation(Joint::FrontLeft), anim.rotation(Joint::BackRight));
            assert_eq!(anim.rotation(Joint::FrontRight), anim.rotation(Joint::BackLeft));
            // neighbours are half a cycle apart
            let sum = anim.rotation(Joint::FrontLeft) + anim.rotation(Joint::FrontRight);
            assert!(sum.abs() < 1e-5);
        }
    }

    #[test]
    fn walking_and_running_use_their_own_cadence() {
        let (state, mut anim) = animator(LocomotionState::Walking);
        anim.update(0.1);
        assert!((anim.rotation(Joint::FrontLeft) - (0.1f32 * 3.0).sin() * 0.5).abs() < 1e-6);

        state.set(LocomotionState::Running);
        anim.update(0.1);
        assert!((anim.rotation(Joint::FrontLeft) - (0.2f32 * 5.0).sin() * 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_does_not_advance_phase() {
        let (_, mut anim) = animator(LocomotionState::Running);
        anim.update(0.2);
        let before = anim.rotations();
        anim.update(0.0);
        anim.update(-1.0);
        anim.update(f32::NAN);
        assert_eq!(anim.phase_time(), f64::from(0.2f32));
        assert_eq!(anim.rotations(), before);
    }

    #[test]
    fn phase_step_stays_exact_after_a_day() {
        let (_, mut anim) = animator(LocomotionState::Walking);
        anim.update(86_400.0);
        let before = anim.phase_time();
        anim.update(1.0 / 60.0);
        let step = anim.phase_time() - before;
        assert!((step - 1.0 / 60.0).abs() < 1e-6, "step was {step}");
        assert!(anim.rotations().iter().all(|r| r.abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn rotation_stays_within_amplitude() {
        let (_, mut anim) = animator(LocomotionState::Running);
        for _ in 0..500 {
            anim.update(0.021);
            assert!(anim.rotations().iter().all(|r| r.abs() <= 0.8 + 1e-6));
        }
    }

    struct Counter(u32);

    impl Animatable for Counter {
        fn update(&mut self, _dt: f32) {
            self.0 += 1;
        }
    }

    #[test]
    fn registry_deduplicates_by_identity() {
        let mut registry = AnimatableRegistry::new();
        let a = Rc::new(RefCell::new(Counter(0)));
        let b = Rc::new(RefCell::new(Counter(0)));

        assert!(registry.add(&a));
        assert!(!registry.add(&a));
        assert!(registry.add(&b));
        assert_eq!(registry.len(), 2);

        registry.update(0.016);
        assert_eq!(a.borrow().0, 1);
        assert_eq!(b.borrow().0, 1);
    }

    #[test]
    fn removing_unknown_animator_is_a_no_op() {
        let mut registry = AnimatableRegistry::new();
        let a = Rc::new(RefCell::new(Counter(0)));
        let stranger = Rc::new(RefCell::new(Counter(0)));
        registry.add(&a);

        assert!(!registry.remove(&stranger));
        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert!(registry.is_empty());

        registry.update(0.016);
        assert_eq!(a.borrow().0, 0);
    }

    #[test]
    fn dropped_animators_are_skipped() {
        let mut registry = AnimatableRegistry::new();
        let kept = Rc::new(RefCell::new(Counter(0)));
        {
            let temporary = Rc::new(RefCell::new(Counter(0)));
            registry.add(&temporary);
        }
        registry.add(&kept);
        assert_eq!(registry.len(), 1);

        registry.update(0.016);
        assert_eq!(kept.borrow().0, 1);
    }

    #[test]
    fn registry_drives_limb_animators() {
        let mut registry = AnimatableRegistry::new();
        let state = locomotion::shared(LocomotionState::Walking);
        let anim = Rc::new(RefCell::new(LimbAnimator::new(state)));
        registry.add(&anim);
        registry.update(0.25);
        assert_eq!(anim.borrow().phase_time(), 0.25);
        assert!(registry.contains(&anim));
    }
}
