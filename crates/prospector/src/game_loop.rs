//! # PROSPECTOR Game Loop
//!
//! Frame orchestration:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. BEGIN FRAME                                                      │
//! │    └─ Measure delta, clamp to max_frame_delta                       │
//! │                                                                     │
//! │ 2. UPDATE                                                           │
//! │    ├─ Asteroids spin                                                │
//! │    ├─ Ships run their state machines (spawn order)                  │
//! │    └─ Player drifts                                                 │
//! │                                                                     │
//! │ 3. DRAW                                                             │
//! │    ├─ Screen pass: parallax background + planet                     │
//! │    └─ World pass: culled asteroids and ships, then the player       │
//! │                                                                     │
//! │ 4. END FRAME                                                        │
//! │    └─ Record timings, warn over budget                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events raised during the update stay queued until the host calls
//! [`GameLoop::drain_events`].

use std::time::{Duration, Instant};

use crate::config::{GameConfig, GameLoopConfig};
use crate::error::GameResult;
use crate::events::{EventBus, EventReceiver, GameEvent};
use crate::random::WorldRng;
use crate::render::{AssetProvider, Camera, RenderSink};
use crate::world::WorldManager;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Delta fed to the update, seconds, after clamping.
    pub delta: f32,
    /// Update pass time in microseconds.
    pub update_us: u64,
    /// Draw passes time in microseconds.
    pub draw_us: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// World pass submissions, player included.
    pub drawn: u32,
    /// Entities skipped by culling.
    pub culled: u32,
}

/// The main game loop orchestrator.
///
/// Owns the world and the consumer end of its event channel.
pub struct GameLoop {
    world: WorldManager,
    events: EventReceiver,
    config: GameLoopConfig,
    frame_count: u64,
    last_frame_time: Instant,
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Wraps an already generated world.
    ///
    /// `events` must be the receiver paired with the sender the world was
    /// generated with.
    #[must_use]
    pub fn new(world: WorldManager, events: EventReceiver) -> Self {
        let config = world.config().game_loop.clone();
        let budget = frame_budget(config.target_fps);

        Self {
            world,
            events,
            config,
            frame_count: 0,
            last_frame_time: Instant::now(),
            stats_accumulator: FrameStatsAccumulator::with_budget(budget),
        }
    }

    /// Creates the event channel, generates the world and wraps it.
    ///
    /// # Errors
    ///
    /// Propagates world generation failures.
    pub fn bootstrap(
        config: GameConfig,
        assets: &mut dyn AssetProvider,
        rng: &mut WorldRng,
    ) -> GameResult<Self> {
        let (sender, receiver) = EventBus::create_pair(config.game_loop.event_capacity);
        let world = WorldManager::generate(config, assets, rng, sender)?;
        Ok(Self::new(world, receiver))
    }

    /// Runs one frame with the wall-clock delta since the previous one.
    ///
    /// # Errors
    ///
    /// As [`GameLoop::tick`].
    pub fn frame(&mut self, camera: &dyn Camera, sink: &mut dyn RenderSink) -> GameResult<FrameStats> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.tick(delta.as_secs_f32(), camera, sink)
    }

    /// Runs one frame with an explicit delta in seconds.
    ///
    /// The delta is clamped to `max_frame_delta`, then the world is updated
    /// and both draw passes run.
    ///
    /// # Errors
    ///
    /// Returns the world's update error. These are programming errors: they
    /// are logged at `error` and assert in debug builds. No drawing happens
    /// for a failed frame.
    pub fn tick(&mut self, dt: f32, camera: &dyn Camera, sink: &mut dyn RenderSink) -> GameResult<FrameStats> {
        let frame_start = Instant::now();
        // Clamp delta time to keep ships from jumping after a stall
        let delta = dt.clamp(0.0, self.config.max_frame_delta);

        let updated = self.world.update(delta);
        if let Err(err) = &updated {
            tracing::error!(frame = self.frame_count, error = %err, "world update failed");
        }
        debug_assert!(updated.is_ok(), "world update failed: {updated:?}");
        updated?;
        let update_us = elapsed_us(frame_start);

        let draw_start = Instant::now();
        self.world.draw_screen(camera, sink);
        let cull = self.world.draw_world(camera, sink);
        let draw_us = elapsed_us(draw_start);

        let stats = FrameStats {
            frame: self.frame_count,
            delta,
            update_us,
            draw_us,
            total_us: elapsed_us(frame_start),
            drawn: cull.drawn,
            culled: cull.culled,
        };
        self.end_frame(stats);
        Ok(stats)
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > self.stats_accumulator.budget_us {
            tracing::warn!(
                frame = stats.frame,
                frame_ms = stats.total_us as f64 / 1000.0,
                budget_ms = self.stats_accumulator.budget_us as f64 / 1000.0,
                "frame exceeded budget"
            );
        }
    }

    /// Takes every queued event.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &WorldManager {
        &self.world
    }

    /// The world, for issuing commands between frames.
    pub fn world_mut(&mut self) -> &mut WorldManager {
        &mut self.world
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// Loop settings in use.
    #[must_use]
    pub const fn config(&self) -> &GameLoopConfig {
        &self.config
    }

    /// Releases the world's textures.
    pub fn teardown(&mut self, assets: &mut dyn AssetProvider) {
        self.world.teardown(assets);
    }
}

fn frame_budget(target_fps: u32) -> Duration {
    if target_fps == 0 {
        return TARGET_FRAME_TIME;
    }
    Duration::from_micros(1_000_000 / u64::from(target_fps))
}

fn elapsed_us(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of update pass times.
    pub update_us_sum: u64,
    /// Sum of draw pass times.
    pub draw_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Sum of world pass submissions.
    pub drawn_sum: u64,
    /// Sum of culled entities.
    pub culled_sum: u64,
    /// Frame budget in microseconds.
    pub budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator with the 60 FPS budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_budget(TARGET_FRAME_TIME)
    }

    /// Creates an accumulator with a custom frame budget.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            draw_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            drawn_sum: 0,
            culled_sum: 0,
            budget_us: budget.as_micros() as u64,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.update_us_sum += stats.update_us;
        self.draw_us_sum += stats.draw_us;
        self.drawn_sum += u64::from(stats.drawn);
        self.culled_sum += u64::from(stats.culled);
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        self.average(self.total_us_sum) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        self.average(self.frames_over_budget)
    }

    fn average(&self, sum: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        sum as f64 / self.frames_recorded as f64
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ───────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms ({:.1} FPS)", self.avg_frame_ms(), self.avg_fps());
        if self.frames_recorded > 0 {
            println!("│ Min Frame:          {:.3} ms", self.min_frame_us as f64 / 1000.0);
            println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        }
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ───────────────────────────────────────────────────────┐");
        println!("│ Target:             {:.3} ms", self.budget_us as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");

        if self.frames_recorded > 0 {
            println!();
            println!("┌─ BREAKDOWN ─────────────────────────────────────────────────────┐");
            println!("│ Update:             {:.3} ms", self.average(self.update_us_sum) / 1000.0);
            println!("│ Draw:               {:.3} ms", self.average(self.draw_us_sum) / 1000.0);
            println!("│ Drawn / frame:      {:.1}", self.average(self.drawn_sum));
            println!("│ Culled / frame:     {:.1}", self.average(self.culled_sum));
            println!("└──────────────────────────────────────────────────────────────────┘");
        }
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
