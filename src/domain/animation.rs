//! Looping banner animation
//!
//! Progress is a pure function of the clock: a running animation is a
//! segment description (where it started, when, over how long) and any
//! instant can be sampled from it. Pausing samples once and keeps that
//! value, resuming finishes the interrupted pass at the original speed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Currently running stretch of the animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Progress at `started_at`
    pub from: f64,
    /// Clock time the segment began
    pub started_at: Duration,
    /// Time to go from `from` to 1.0
    pub duration: Duration,
}

impl Segment {
    fn sample(&self, now: Duration, pass: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed < self.duration {
            let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            return self.from + (1.0 - self.from) * t;
        }

        // Past the end of this segment: fresh full-length passes from 0
        let looped = (elapsed - self.duration).as_nanos();
        let pass_nanos = pass.as_nanos().max(1);
        (looped % pass_nanos) as f64 / pass_nanos as f64
    }
}

/// Linear left-to-right loop with pause/resume support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopAnimation {
    pass_duration: Duration,
    running: Option<Segment>,
    held: f64,
}

impl LoopAnimation {
    pub fn new(pass_duration: Duration) -> Self {
        Self {
            pass_duration,
            running: None,
            held: 0.0,
        }
    }

    pub fn pass_duration(&self) -> Duration {
        self.pass_duration
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn segment(&self) -> Option<Segment> {
        self.running
    }

    /// Progress in `[0, 1)` at `now`
    pub fn sample(&self, now: Duration) -> f64 {
        match &self.running {
            Some(segment) => segment.sample(now, self.pass_duration),
            None => self.held,
        }
    }

    /// Starts a full pass from 0
    pub fn restart(&mut self, now: Duration) {
        self.running = Some(Segment {
            from: 0.0,
            started_at: now,
            duration: self.pass_duration,
        });
    }

    /// Time needed to finish the pass from the held progress
    pub fn remaining(&self) -> Duration {
        self.pass_duration.mul_f64(1.0 - self.held.clamp(0.0, 1.0))
    }

    /// Continues from the held progress over the remaining share of a pass
    pub fn resume(&mut self, now: Duration) {
        self.running = Some(Segment {
            from: self.held,
            started_at: now,
            duration: self.remaining(),
        });
    }

    /// Samples the current progress and stops advancing
    pub fn freeze(&mut self, now: Duration) -> f64 {
        self.held = self.sample(now);
        self.running = None;
        self.held
    }

    /// Halts at 0
    pub fn reset(&mut self) {
        self.running = None;
        self.held = 0.0;
    }

    /// Drops the running segment without touching the held progress
    pub fn cancel(&mut self) {
        self.running = None;
    }

    /// Lazy sequence of `(time, progress)` samples every `interval`
    ///
    /// The sequence is a snapshot: restarting the animation afterwards does
    /// not affect an iterator that is already in flight.
    pub fn samples(&self, from: Duration, interval: Duration) -> ProgressSamples {
        ProgressSamples {
            animation: self.clone(),
            next: from,
            interval: interval.max(Duration::from_millis(1)),
        }
    }
}

/// Iterator over progress samples, see [`LoopAnimation::samples`]
#[derive(Debug, Clone)]
pub struct ProgressSamples {
    animation: LoopAnimation,
    next: Duration,
    interval: Duration,
}

impl Iterator for ProgressSamples {
    type Item = (Duration, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.next;
        self.next += self.interval;
        Some((at, self.animation.sample(at)))
    }
}
