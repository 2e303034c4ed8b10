//! Simulation timestep and pause state

use crate::config::ClockConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    dt: f64,
    factor: f64,
    paused: bool,
}

impl SimClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            dt: config.dt.max(0.0),
            factor: config.factor,
            paused: false,
        }
    }

    /// Timestep handed to the next tick
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn faster(&mut self) {
        self.dt *= self.factor;
        log::debug!("timestep now {:.4}", self.dt);
    }

    pub fn slower(&mut self) {
        self.dt /= self.factor;
        log::debug!("timestep now {:.4}", self.dt);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_steps_are_inverse() {
        let mut clock = SimClock::default();
        clock.faster();
        assert_relative_eq!(clock.dt(), 1.2);
        clock.slower();
        clock.slower();
        assert_relative_eq!(clock.dt(), 1.0 / 1.2);
    }

    #[test]
    fn pause_toggles() {
        let mut clock = SimClock::default();
        assert!(!clock.is_paused());
        assert!(clock.toggle_pause());
        assert!(!clock.toggle_pause());
    }
}
