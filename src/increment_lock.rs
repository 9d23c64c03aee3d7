//! Per-field snap-to-increment locking.

use crate::value_transform::parse_float;

/// Step used whenever an edited step is unusable.
pub const FALLBACK_STEP: f64 = 1.0;

/// Immutable snapshot of a field's increment lock, consumed by
/// [`apply`](crate::value_transform::apply).
///
/// The step is always a positive, finite, normal number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementPolicy {
    enabled: bool,
    step: f64,
}

impl IncrementPolicy {
    /// A policy that never snaps.
    pub const DISABLED: IncrementPolicy = IncrementPolicy {
        enabled: false,
        step: FALLBACK_STEP,
    };

    /// Creates a policy, replacing a zero, subnormal or non-finite step with
    /// [`FALLBACK_STEP`] and a negative one with its magnitude.
    pub fn new(enabled: bool, step: f64) -> Self {
        Self {
            enabled,
            step: sanitize_step(step),
        }
    }

    pub fn enabled(self) -> bool {
        self.enabled
    }

    pub fn step(self) -> f64 {
        self.step
    }

    /// Rounds `value` to the nearest multiple of the step when enabled.
    pub fn snap(self, value: f64) -> f64 {
        if self.enabled {
            (value / self.step).round() * self.step
        } else {
            value
        }
    }
}

impl Default for IncrementPolicy {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Mutable increment lock owned by the panel for one field.
///
/// Changes only through [`toggle`](Self::toggle) and
/// [`edit_step`](Self::edit_step).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementLock {
    policy: IncrementPolicy,
}

impl IncrementLock {
    /// An unlocked lock with the given step.
    pub fn new(step: f64) -> Self {
        Self {
            policy: IncrementPolicy::new(false, step),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.policy.enabled
    }

    pub fn step(&self) -> f64 {
        self.policy.step
    }

    pub fn policy(&self) -> IncrementPolicy {
        self.policy
    }

    /// Flips the lock and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.policy.enabled = !self.policy.enabled;
        self.policy.enabled
    }

    /// Sets the step from user text. Anything that does not parse to a
    /// non-zero number yields [`FALLBACK_STEP`]. Returns the stored step.
    pub fn edit_step(&mut self, text: &str) -> f64 {
        self.policy.step = parse_float(text).map_or(FALLBACK_STEP, sanitize_step);
        self.policy.step
    }
}

impl Default for IncrementLock {
    fn default() -> Self {
        Self::new(FALLBACK_STEP)
    }
}

fn sanitize_step(step: f64) -> f64 {
    let step = step.abs();
    if step.is_normal() {
        step
    } else {
        FALLBACK_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_enabled() {
        let mut lock = IncrementLock::new(0.5);
        assert!(!lock.is_locked());
        assert!(lock.toggle());
        assert!(lock.policy().enabled());
        assert!(!lock.toggle());
    }

    #[test]
    fn edit_step_parses_number() {
        let mut lock = IncrementLock::default();
        assert_eq!(lock.edit_step("0.25"), 0.25);
        assert_eq!(lock.edit_step("5deg"), 5.0);
    }

    #[test]
    fn degenerate_steps_fall_back_to_one() {
        let mut lock = IncrementLock::new(0.5);
        assert_eq!(lock.edit_step("0"), FALLBACK_STEP);
        assert_eq!(lock.edit_step(""), FALLBACK_STEP);
        assert_eq!(lock.edit_step("abc"), FALLBACK_STEP);
        assert_eq!(lock.edit_step("1e999"), FALLBACK_STEP);
        assert_eq!(IncrementPolicy::new(true, 0.0).step(), FALLBACK_STEP);
        assert_eq!(IncrementPolicy::new(true, f64::NAN).step(), FALLBACK_STEP);
    }

    #[test]
    fn subnormal_steps_fall_back_to_one() {
        let mut lock = IncrementLock::new(0.5);
        let typed = format!("0.{}1", "0".repeat(319));
        assert_eq!(lock.edit_step(&typed), FALLBACK_STEP);
        assert_eq!(lock.edit_step("1e-320"), FALLBACK_STEP);
        assert_eq!(lock.edit_step("1e-300"), 1e-300);
    }

    #[test]
    fn negative_step_uses_magnitude() {
        let mut lock = IncrementLock::default();
        assert_eq!(lock.edit_step("-2"), 2.0);
    }

    #[test]
    fn snap_only_when_enabled() {
        assert_eq!(IncrementPolicy::new(false, 0.5).snap(0.7), 0.7);
        assert_eq!(IncrementPolicy::new(true, 0.5).snap(0.7), 0.5);
        assert_eq!(IncrementPolicy::new(true, 0.5).snap(0.8), 1.0);
    }
}
