use std::time::Duration;
use rand::{Rng, RngCore};

pub const ACCURACY_MIN: f32 = 94.0;
pub const ACCURACY_MAX: f32 = 95.5;
pub const INITIAL_ACCURACY: f32 = 94.7;
pub const INITIAL_QUEUE: u32 = 3;
pub const INITIAL_PATIENTS: u32 = 247;
pub const BASE_WAIT_MINUTES: f32 = 2.3;
const WAIT_JITTER: f32 = 0.5;
pub const INITIAL_TOTAL_SCANS: u32 = 1847;
const QUEUE_UPDATE_CHANCE: f64 = 0.3;

fn ease_out_quart(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(4)
}

/// A displayed number that glides from its previous value to a new target.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedValue {
    from: f32,
    to: f32,
    started: Duration,
    duration: Duration,
}

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            started: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Retargets from wherever the animation currently is.
    pub fn animate_to(&mut self, now: Duration, target: f32, duration: Duration) {
        self.from = self.value_at(now);
        self.to = target;
        self.started = now;
        self.duration = duration;
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (now.saturating_sub(self.started).as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from + (self.to - self.from) * ease_out_quart(t)
    }
}

#[derive(Debug, Clone)]
pub struct LiveStats {
    pub patients: AnimatedValue,
    pub queue: AnimatedValue,
    pub accuracy: AnimatedValue,
    pub average_wait: f32, // Minutes, one decimal
    total_scans: u32,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            patients: AnimatedValue::new(0.0),
            queue: AnimatedValue::new(INITIAL_QUEUE as f32),
            accuracy: AnimatedValue::new(INITIAL_ACCURACY),
            average_wait: BASE_WAIT_MINUTES,
            total_scans: INITIAL_TOTAL_SCANS,
        }
    }
}

impl LiveStats {
    pub fn patients_count(&self) -> u32 {
        self.patients.target() as u32
    }

    pub fn queue_count(&self) -> u32 {
        self.queue.target() as u32
    }

    pub fn accuracy_percent(&self) -> f32 {
        self.accuracy.target()
    }

    pub fn total_scans(&self) -> u32 {
        self.total_scans
    }

    pub fn record_scan(&mut self) {
        self.total_scans += 1;
    }

    pub fn increment_patients(&mut self, now: Duration, animation: Duration) {
        let next = self.patients.target() + 1.0;
        self.patients.animate_to(now, next, animation);
    }

    pub fn reveal_patients(&mut self, now: Duration, animation: Duration) {
        self.patients.animate_to(now, INITIAL_PATIENTS as f32, animation);
    }

    /// One simulated "live" refresh: accuracy wanders a little, the average
    /// wait is resampled around its base, and now and then the queue moves
    /// by one.
    pub fn drift(&mut self, now: Duration, animation: Duration, rng: &mut dyn RngCore) {
        let accuracy = self.accuracy.target() + (rng.gen::<f32>() - 0.5) * 0.2;
        self.accuracy.animate_to(now, accuracy.clamp(ACCURACY_MIN, ACCURACY_MAX), animation);

        let wait = BASE_WAIT_MINUTES + rng.gen_range(-WAIT_JITTER..=WAIT_JITTER);
        self.average_wait = (wait * 10.0).round() / 10.0;

        if rng.gen_bool(QUEUE_UPDATE_CHANCE) {
            let step: i64 = rng.gen_range(-1..=1);
            let queue = (self.queue.target() as i64 + step).max(0);
            self.queue.animate_to(now, queue as f32, animation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn animation_eases_toward_target() {
        let mut v = AnimatedValue::new(0.0);
        v.animate_to(ms(0), 100.0, ms(1000));
        assert_eq!(v.value_at(ms(0)), 0.0);
        let mid = v.value_at(ms(500));
        assert!(mid > 50.0 && mid < 100.0, "ease-out should be past halfway, got {mid}");
        assert_eq!(v.value_at(ms(1000)), 100.0);
    }

    #[test]
    fn retarget_starts_from_current_position() {
        let mut v = AnimatedValue::new(0.0);
        v.animate_to(ms(0), 100.0, ms(1000));
        let here = v.value_at(ms(500));
        v.animate_to(ms(500), 0.0, ms(1000));
        assert!((v.value_at(ms(500)) - here).abs() < 1e-3);
    }

    #[test]
    fn drift_keeps_accuracy_in_band_and_queue_non_negative() {
        let mut stats = LiveStats::default();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..2000 {
            stats.drift(ms(i * 5000), Duration::ZERO, &mut rng);
            let acc = stats.accuracy_percent();
            assert!((ACCURACY_MIN..=ACCURACY_MAX).contains(&acc));
        }
        assert!(stats.queue.target() >= 0.0);
    }

    #[test]
    fn average_wait_stays_near_base() {
        let mut stats = LiveStats::default();
        let mut rng = StdRng::seed_from_u64(8);
        for i in 0..500 {
            stats.drift(ms(i * 5000), Duration::ZERO, &mut rng);
            let w = stats.average_wait;
            assert!((1.8..=2.8).contains(&w), "wait {w}");
            assert!(((w * 10.0).round() - w * 10.0).abs() < 1e-3, "one decimal: {w}");
        }
    }

    #[test]
    fn scans_count_every_analysis() {
        let mut stats = LiveStats::default();
        assert_eq!(stats.total_scans(), INITIAL_TOTAL_SCANS);
        stats.record_scan();
        stats.record_scan();
        assert_eq!(stats.total_scans(), INITIAL_TOTAL_SCANS + 2);
    }

    #[test]
    fn patients_count_up_by_one() {
        let mut stats = LiveStats::default();
        stats.reveal_patients(ms(0), Duration::ZERO);
        stats.increment_patients(ms(10), ms(1000));
        assert_eq!(stats.patients_count(), INITIAL_PATIENTS + 1);
    }
}
