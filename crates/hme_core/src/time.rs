//! Fixed-rate tick clock.
//!
//! Updates run at a fixed `TICKS_PER_SECOND` regardless of display refresh,
//! so the 3 px/tick player speed means the same thing on every machine.
//! Wall-clock time feeds an accumulator; `should_step()` drains it one tick
//! at a time. Draws happen once per frame, independent of tick count.

use std::time::Instant;

pub const TICKS_PER_SECOND: u32 = 60;
const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub tick_count: u64,
    pub frame_count: u64,
    pub ticks_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        let fixed_dt = 1.0 / f64::from(TICKS_PER_SECOND);
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            tick_count: 0,
            frame_count: 0,
            ticks_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: f64::from(TICKS_PER_SECOND),
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Measures the wall-clock delta since the previous frame and feeds it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feeds an explicit frame delta. `begin_frame` is the usual entry point.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.ticks_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.tick_count += 1;
            self.ticks_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Discards pending time, e.g. while the simulation is paused.
    pub fn drain(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation pause driven by the debug overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseState {
    pub paused: bool,
    pub single_step_requested: bool,
}

impl PauseState {
    pub fn toggle(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "Simulation {}",
            if self.paused { "PAUSED" } else { "RESUMED" }
        );
    }

    /// Queues one tick to run while paused.
    pub fn request_step(&mut self) {
        self.single_step_requested = true;
    }
}

/// Consumes every tick the accumulator owes.
///
/// `poll` runs on each owed tick whether or not the simulation is paused.
/// `simulate` runs only on ticks the pause state lets through. While paused
/// the first owed tick drains the accumulator, so resuming never replays
/// time spent paused. Returns the number of simulated ticks.
pub fn run_fixed_ticks(
    time: &mut TimeState,
    pause: &mut PauseState,
    mut poll: impl FnMut(),
    mut simulate: impl FnMut(),
) -> u32 {
    let mut simulated = 0;
    while time.should_step() {
        poll();

        if pause.paused && !pause.single_step_requested {
            time.drain();
            break;
        }
        pause.single_step_requested = false;

        simulate();
        simulated += 1;
    }
    simulated
}
