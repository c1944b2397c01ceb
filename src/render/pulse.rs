use crate::config::rendering::PulseConfig;
use glam::Vec4;

/// Bounces the red channel of a color between 0 and 1, one step per frame.
///
/// The direction only flips once the channel has moved past a bound, so it
/// overshoots by at most one increment.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPulse {
    base: Vec4,
    red: f32,
    step: f32,
    increment: f32,
}

impl ColorPulse {
    pub fn new(config: &PulseConfig) -> Self {
        let increment = config.increment.abs();
        Self {
            base: Vec4::from_array(config.base_color),
            red: config.initial,
            step: increment,
            increment,
        }
    }

    pub fn color(&self) -> Vec4 {
        Vec4::new(self.red, self.base.y, self.base.z, self.base.w)
    }

    pub fn red(&self) -> f32 {
        self.red
    }

    pub fn advance(&mut self) {
        if self.red > 1.0 {
            self.step = -self.increment;
        } else if self.red < 0.0 {
            self.step = self.increment;
        }
        self.red += self.step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(initial: f32, increment: f32) -> ColorPulse {
        ColorPulse::new(&PulseConfig {
            initial,
            increment,
            base_color: [0.0, 0.25, 0.5, 1.0],
        })
    }

    #[test]
    fn test_color_uses_base_channels() {
        let pulse = pulse(0.4, 0.1);
        assert_eq!(pulse.color(), Vec4::new(0.4, 0.25, 0.5, 1.0));
    }

    #[test]
    fn test_rises_from_initial() {
        let mut pulse = pulse(0.0, 0.25);
        pulse.advance();
        assert_eq!(pulse.red(), 0.25);
        pulse.advance();
        assert_eq!(pulse.red(), 0.5);
    }

    #[test]
    fn test_turns_after_passing_one() {
        let mut pulse = pulse(1.0, 0.25);
        pulse.advance();
        assert_eq!(pulse.red(), 1.25);
        pulse.advance();
        assert_eq!(pulse.red(), 1.0);
        pulse.advance();
        assert_eq!(pulse.red(), 0.75);
    }

    #[test]
    fn test_turns_after_passing_zero() {
        let mut pulse = pulse(0.25, 0.25);
        pulse.step = -0.25;
        pulse.advance();
        assert_eq!(pulse.red(), 0.0);
        pulse.advance();
        assert_eq!(pulse.red(), -0.25);
        pulse.advance();
        assert_eq!(pulse.red(), 0.0);
        pulse.advance();
        assert_eq!(pulse.red(), 0.25);
    }

    #[test]
    fn test_stays_within_one_step_of_range() {
        let mut pulse = pulse(0.0, 0.002);
        for _ in 0..5000 {
            pulse.advance();
            assert!(pulse.red() >= -0.002 - 1e-4);
            assert!(pulse.red() <= 1.002 + 1e-4);
        }
    }

    #[test]
    fn test_negative_increment_is_treated_as_magnitude() {
        let mut pulse = pulse(0.0, -0.5);
        pulse.advance();
        assert_eq!(pulse.red(), 0.5);
    }
}
