//! Counter-based debouncing of raw button samples.
//!
//! A transition is accepted once the pin has read the new level for
//! `threshold` consecutive samples. Any sample at the current stable level
//! resets the counter, so contact bounce never reaches the threshold.

use crate::state::ButtonEvent;

#[derive(Debug, Clone)]
pub struct Debouncer {
    threshold: u8,
    pressed: bool,
    streak: u8,
}

impl Debouncer {
    /// Create a debouncer in the released state.
    ///
    /// A `threshold` of zero is treated as one.
    #[must_use]
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.max(1),
            pressed: false,
            streak: 0,
        }
    }

    /// Feed one raw sample (`true` = pressed) and return the accepted
    /// transition, if any.
    pub fn sample(&mut self, pressed: bool) -> ButtonEvent {
        if pressed == self.pressed {
            self.streak = 0;
            return ButtonEvent::None;
        }

        self.streak += 1;
        if self.streak < self.threshold {
            return ButtonEvent::None;
        }

        self.streak = 0;
        self.pressed = pressed;
        if pressed {
            ButtonEvent::Pressed
        } else {
            ButtonEvent::Released
        }
    }

    #[cfg(test)]
    const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Consecutive samples needed to accept a transition.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(debouncer: &mut Debouncer, samples: &[bool]) -> Vec<ButtonEvent> {
        samples
            .iter()
            .map(|&s| debouncer.sample(s))
            .filter(|e| *e != ButtonEvent::None)
            .collect()
    }

    #[test]
    fn should_ignore_runs_shorter_than_threshold() {
        let mut debouncer = Debouncer::new(3);
        let samples = [
            true, true, false, true, false, true, true, false, false, true,
        ];

        assert!(feed(&mut debouncer, &samples).is_empty());
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn should_accept_press_after_threshold_samples() {
        let mut debouncer = Debouncer::new(3);

        assert_eq!(debouncer.sample(true), ButtonEvent::None);
        assert_eq!(debouncer.sample(true), ButtonEvent::None);
        assert_eq!(debouncer.sample(true), ButtonEvent::Pressed);
        assert!(debouncer.is_pressed());
    }

    #[test]
    fn should_emit_single_press_while_held() {
        let mut debouncer = Debouncer::new(2);

        let events = feed(&mut debouncer, &[true; 50]);
        assert_eq!(events, [ButtonEvent::Pressed]);
    }

    #[test]
    fn should_require_debounced_release_before_next_press() {
        let mut debouncer = Debouncer::new(3);
        let mut samples = vec![true, true, true];
        // Bouncy release that never holds long enough.
        samples.extend([false, true, false, false, true, true, true]);

        assert_eq!(feed(&mut debouncer, &samples), [ButtonEvent::Pressed]);

        samples = vec![false, false, false, true, true, true];
        assert_eq!(
            feed(&mut debouncer, &samples),
            [ButtonEvent::Released, ButtonEvent::Pressed]
        );
    }

    #[test]
    fn should_emit_one_press_per_edge_under_bounce() {
        let mut debouncer = Debouncer::new(3);
        let bounce_press = [true, false, true, true, false, true, true, true, true];
        let bounce_release = [false, true, false, false, true, false, false, false];

        let mut presses = 0;
        for _ in 0..5 {
            for event in feed(&mut debouncer, &bounce_press)
                .into_iter()
                .chain(feed(&mut debouncer, &bounce_release))
            {
                if event == ButtonEvent::Pressed {
                    presses += 1;
                }
            }
        }

        assert_eq!(presses, 5);
    }

    #[test]
    fn should_clamp_zero_threshold_to_one() {
        let mut debouncer = Debouncer::new(0);
        assert_eq!(debouncer.threshold(), 1);
        assert_eq!(debouncer.sample(true), ButtonEvent::Pressed);
        assert_eq!(debouncer.sample(false), ButtonEvent::Released);
    }
}
