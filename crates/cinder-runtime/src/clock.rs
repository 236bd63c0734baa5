//! Dual-base simulation clock
//!
//! Tracks real time (unaffected by simulation speed or suspension) and scaled
//! time (multiplied by the speed factor, frozen while suspended) side by side.
//! All counters are signed 64-bit nanoseconds, which covers sessions well past
//! ten years without overflow.

use std::time::Instant;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Tracks four time bases: real/scaled, absolute/relative.
///
/// `tick()` is called once per loop iteration. Real time accumulates
/// unconditionally; scaled time accumulates `delta * speed` unless the clock
/// is suspended, in which case the scaled-relative delta is zero for that tick.
pub struct SimulationClock {
    /// Instant of the previous tick
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,

    /// Absolute real time since construction [ns]
    real_abs: i64,
    /// Real time of the last tick [ns]
    real_rel: i64,
    /// Absolute scaled time since construction [ns]
    scaled_abs: i64,
    /// Scaled time of the last tick [ns]
    scaled_rel: i64,

    speed: f32,
    suspended: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
            first_tick: true,
            real_abs: 0,
            real_rel: 0,
            scaled_abs: 0,
            scaled_rel: 0,
            speed: 1.0,
            suspended: false,
        }
    }

    /// Advance the clock. Call once per loop iteration.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.real_rel = 0;
            self.scaled_rel = 0;
            return;
        }

        let delta_ns = now.duration_since(self.last_instant).as_nanos() as i64;
        self.last_instant = now;
        self.advance(delta_ns);
    }

    /// Advance by an explicit real delta. `tick()` delegates here; tests call
    /// it directly for deterministic deltas.
    pub fn advance(&mut self, delta_ns: i64) {
        self.real_rel = delta_ns;
        self.real_abs += delta_ns;

        if self.suspended {
            self.scaled_rel = 0;
        } else {
            self.scaled_rel = (delta_ns as f64 * self.speed as f64) as i64;
            self.scaled_abs += self.scaled_rel;
        }
    }

    /// Set the simulation speed factor. Must be positive. Takes effect from
    /// the next tick; already-accumulated time is not rescaled.
    pub fn set_speed(&mut self, speed: f32) {
        debug_assert!(speed > 0.0, "simulation speed must be positive");
        if speed > 0.0 {
            self.speed = speed;
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Freeze scaled-time advancement. Real time keeps accumulating.
    /// Idempotent.
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.scaled_rel = 0;
    }

    /// Resume scaled-time accumulation from the real-time point of resume.
    /// The suspended interval is not caught up.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn suspended(&self) -> bool {
        self.suspended
    }

    /// Absolute scaled time [seconds]
    pub fn abs_time(&self) -> f32 {
        (self.scaled_abs as f64 / NANOS_PER_SEC) as f32
    }

    /// Scaled time of the last tick [seconds]
    pub fn rel_time(&self) -> f32 {
        (self.scaled_rel as f64 / NANOS_PER_SEC) as f32
    }

    /// Absolute scaled time [ns]
    pub fn exact_abs_time(&self) -> i64 {
        self.scaled_abs
    }

    /// Scaled time of the last tick [ns]
    pub fn exact_rel_time(&self) -> i64 {
        self.scaled_rel
    }

    /// Absolute real time, disregarding speed and suspension [ns]
    pub fn real_abs_time(&self) -> i64 {
        self.real_abs
    }

    /// Real time of the last tick, disregarding speed and suspension [ns]
    pub fn real_rel_time(&self) -> i64 {
        self.real_rel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: i64 = 1_000_000;

    #[test]
    fn first_tick_zero_delta() {
        let mut clock = SimulationClock::new();
        clock.tick();
        assert_eq!(clock.real_rel_time(), 0);
        assert_eq!(clock.exact_rel_time(), 0);
    }

    #[test]
    fn real_time_monotonic() {
        let mut clock = SimulationClock::new();
        let mut prev = 0;
        for (i, delta) in [16 * MS, 0, 33 * MS, 1].iter().enumerate() {
            if i == 1 {
                clock.suspend();
            }
            if i == 2 {
                clock.set_speed(10.0);
            }
            clock.advance(*delta);
            assert!(clock.real_abs_time() >= prev);
            prev = clock.real_abs_time();
        }
    }

    #[test]
    fn speed_scales_relative_time() {
        for speed in [0.5f32, 1.0, 2.0, 10.0] {
            let mut clock = SimulationClock::new();
            clock.set_speed(speed);
            clock.advance(16 * MS);
            let expected = (16 * MS) as f64 * speed as f64;
            let got = clock.exact_rel_time() as f64;
            assert!(
                (got - expected).abs() <= 1.0,
                "speed {speed}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn speed_does_not_rescale_accumulated_time() {
        let mut clock = SimulationClock::new();
        clock.advance(100 * MS);
        let before = clock.exact_abs_time();
        clock.set_speed(2.0);
        clock.advance(100 * MS);
        assert_eq!(clock.exact_abs_time(), before + 200 * MS);
    }

    #[test]
    fn suspend_freezes_scaled_time() {
        let mut clock = SimulationClock::new();
        clock.advance(10 * MS);
        let frozen = clock.exact_abs_time();

        clock.suspend();
        clock.suspend(); // idempotent
        for _ in 0..5 {
            clock.advance(10 * MS);
            assert_eq!(clock.exact_rel_time(), 0);
        }
        assert_eq!(clock.exact_abs_time(), frozen);
        // Real time kept moving the whole while
        assert_eq!(clock.real_abs_time(), 60 * MS);
    }

    #[test]
    fn resume_does_not_catch_up() {
        let mut clock = SimulationClock::new();
        clock.suspend();
        clock.advance(500 * MS);
        clock.resume();
        clock.advance(10 * MS);
        // Only the post-resume delta counts toward scaled time
        assert_eq!(clock.exact_abs_time(), 10 * MS);
    }

    #[test]
    fn speed_change_while_suspended_applies_after_resume() {
        let mut clock = SimulationClock::new();
        clock.suspend();
        clock.set_speed(3.0);
        clock.advance(10 * MS);
        assert_eq!(clock.exact_rel_time(), 0);

        clock.resume();
        clock.advance(10 * MS);
        assert_eq!(clock.exact_rel_time(), 30 * MS);
    }

    #[test]
    fn seconds_views_match_nanosecond_counters() {
        let mut clock = SimulationClock::new();
        clock.advance(1_500 * MS);
        assert!((clock.abs_time() - 1.5).abs() < 1e-6);
        assert!((clock.rel_time() - 1.5).abs() < 1e-6);
    }
}
