//! Loading controller: simulated progress, then the loader's exit.
//!
//! Running adds a bounded increment every `interval` seconds until the
//! canonical progress reaches 100 (clamped, never exceeded). Completing
//! waits `exit_wait`, then plays the exit timeline. Done is entered when
//! that timeline completes, together with the single
//! [`LoadingEvent::Completed`].

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use folio_api_core::{Property, StyleMap, Value};
use folio_motion::{
    CancelGuard, Config as MotionConfig, Stage, Timeline, TimelineEvent, Tween, TweenSet,
};

use crate::config::LoadingConfig;
use crate::error::PageError;
use crate::section::build_timeline;

pub const COMPLETE: f32 = 100.0;

/// Supplies progress increments.
pub trait ProgressSource: fmt::Debug {
    /// Next increment, expected in `[0, max)`.
    fn next_increment(&mut self, max: f32) -> f32;
}

/// Uniform random increments.
#[derive(Debug)]
pub struct RandomProgress {
    rng: StdRng,
}

impl RandomProgress {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSource for RandomProgress {
    fn next_increment(&mut self, max: f32) -> f32 {
        if max.is_nan() || max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..max)
    }
}

/// Replays fixed increments, then repeats `fallback`. Values are used as
/// given, so a script may overshoot 100 in one step.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProgress {
    steps: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedProgress {
    pub fn new(steps: impl IntoIterator<Item = f32>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn then(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }
}

impl ProgressSource for ScriptedProgress {
    fn next_increment(&mut self, _max: f32) -> f32 {
        self.steps.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingPhase {
    Running,
    Completing,
    Done,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LoadingEvent {
    Progress(f32),
    Completed,
}

#[derive(Debug)]
pub struct LoadingController {
    cfg: LoadingConfig,
    source: Box<dyn ProgressSource>,
    phase: LoadingPhase,
    progress: f32,
    since_increment: f32,
    wait_left: f32,
    exit_started: bool,
    entrance: Timeline,
    exit: Timeline,
    tweens: TweenSet,
    guard: CancelGuard,
}

impl LoadingController {
    /// Build the entrance and exit timelines, show 0% and start the
    /// entrance. Increments come from a [`RandomProgress`] unless replaced
    /// with [`LoadingController::with_progress_source`].
    pub fn new(cfg: LoadingConfig, motion: &MotionConfig, stage: &mut dyn Stage) -> Result<Self, PageError> {
        let guard = CancelGuard::new();
        let mut entrance = build_timeline("loading", &cfg.entrance, 0.0, stage, motion, guard.token())?;
        let exit = build_timeline("loading-exit", &cfg.exit, 0.0, stage, motion, guard.token())?;
        entrance.render(stage);
        entrance.play();
        stage.write(&cfg.percentage, Property::Text, Value::text("0%"));
        Ok(Self {
            wait_left: cfg.exit_wait.max(0.0),
            cfg,
            source: Box::new(RandomProgress::new()),
            phase: LoadingPhase::Running,
            progress: 0.0,
            since_increment: 0.0,
            exit_started: false,
            entrance,
            exit,
            tweens: TweenSet::new(),
            guard,
        })
    }

    pub fn with_progress_source(mut self, source: Box<dyn ProgressSource>) -> Self {
        self.source = source;
        self
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    /// Canonical progress in `[0, 100]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.phase == LoadingPhase::Done
    }

    pub fn is_cancelled(&self) -> bool {
        self.guard.is_cancelled()
    }

    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> Vec<LoadingEvent> {
        if self.is_cancelled() {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.entrance.tick(dt, stage);
        match self.phase {
            LoadingPhase::Running => self.tick_running(dt, stage, &mut events),
            LoadingPhase::Completing => self.tick_completing(dt, stage, &mut events),
            LoadingPhase::Done => {}
        }
        self.tweens.tick(dt, stage);
        events
    }

    fn tick_running(&mut self, dt: f32, stage: &mut dyn Stage, events: &mut Vec<LoadingEvent>) {
        let interval = self.cfg.interval.max(1e-3);
        self.since_increment += dt;
        while self.since_increment >= interval && self.progress < COMPLETE {
            self.since_increment -= interval;
            self.advance(stage);
            events.push(LoadingEvent::Progress(self.progress));
        }
        if self.progress >= COMPLETE {
            log::info!("loading: progress complete, exit in {:.2}s", self.wait_left);
            self.phase = LoadingPhase::Completing;
        }
    }

    fn tick_completing(&mut self, dt: f32, stage: &mut dyn Stage, events: &mut Vec<LoadingEvent>) {
        let mut dt = dt;
        if !self.exit_started {
            let used = dt.min(self.wait_left);
            self.wait_left -= used;
            dt -= used;
            if self.wait_left > 0.0 {
                return;
            }
            self.exit_started = true;
            self.exit.play();
        }
        if self.exit.tick(dt, stage).contains(&TimelineEvent::Completed) {
            self.phase = LoadingPhase::Done;
            events.push(LoadingEvent::Completed);
            log::info!("loading: done");
        }
    }

    fn advance(&mut self, stage: &mut dyn Stage) {
        let inc = self.source.next_increment(self.cfg.max_increment).max(0.0);
        self.progress = (self.progress + inc).min(COMPLETE);
        let bar = Tween::to(
            self.cfg.bar.clone(),
            StyleMap::new().with(Property::Width, self.progress),
            self.cfg.bar_duration,
        )
        .with_ease(self.cfg.bar_ease)
        .with_cancel(self.guard.token());
        self.tweens.add(bar);
        let label = format!("{}%", self.progress.floor() as u32);
        stage.write(&self.cfg.percentage, Property::Text, Value::text(label));
    }

    /// Stop for good; later ticks do nothing.
    pub fn cancel(&mut self) {
        if self.is_cancelled() {
            return;
        }
        self.guard.cancel();
        self.entrance.kill();
        self.exit.kill();
        self.tweens.cancel_all();
        log::debug!("loading: cancelled in {:?}", self.phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_api_core::TargetPath;
    use folio_motion::MemoryStage;

    fn stage() -> MemoryStage {
        let mut stage = MemoryStage::new();
        for p in ["preloader", "preloader/bar", "preloader/percentage"] {
            stage.insert(TargetPath::parse(p).unwrap());
        }
        stage
    }

    #[test]
    fn random_increments_stay_bounded() {
        let mut src = RandomProgress::seeded(7);
        for _ in 0..1000 {
            let v = src.next_increment(15.0);
            assert!((0.0..15.0).contains(&v));
        }
        assert_eq!(src.next_increment(0.0), 0.0);
    }

    #[test]
    fn one_increment_per_interval() {
        let mut stage = stage();
        let cfg = LoadingConfig::default();
        let src = ScriptedProgress::new([10.0, 20.0]);
        let mut ctl = LoadingController::new(cfg, &MotionConfig::default(), &mut stage)
            .unwrap()
            .with_progress_source(Box::new(src));
        assert!(ctl.tick(0.05, &mut stage).is_empty());
        assert_eq!(ctl.tick(0.05, &mut stage), vec![LoadingEvent::Progress(10.0)]);
        assert_eq!(ctl.tick(0.1, &mut stage), vec![LoadingEvent::Progress(30.0)]);
        let pct = TargetPath::parse("preloader/percentage").unwrap();
        assert_eq!(stage.value(&pct, Property::Text), Some(&Value::text("30%")));
    }

    #[test]
    fn cancelled_controller_never_ticks() {
        let mut stage = stage();
        let src = ScriptedProgress::new([]).then(50.0);
        let mut ctl =
            LoadingController::new(LoadingConfig::default(), &MotionConfig::default(), &mut stage)
                .unwrap()
                .with_progress_source(Box::new(src));
        ctl.cancel();
        stage.take_writes();
        for _ in 0..100 {
            assert!(ctl.tick(0.1, &mut stage).is_empty());
        }
        assert!(stage.writes().is_empty());
        assert_eq!(ctl.progress(), 0.0);
    }
}
