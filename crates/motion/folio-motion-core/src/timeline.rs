//! Timelines: ordered property steps driven by a single playhead.
//!
//! The rendered state is a pure function of the playhead. For every
//! `(target, property)` pair the governing step is the last one (in start
//! order) that has started; before any has started it is the first one. Its
//! eased interpolation at the playhead is written to the stage. Because of
//! that, reversing restores from-states exactly and replays are
//! idempotent, whatever the tick sizes were.

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use folio_api_core::{Property, StyleMap, TargetPath, Value};

use crate::cancel::CancelToken;
use crate::ease::Ease;
use crate::error::MotionError;
use crate::interp::sample;
use crate::stage::Stage;
use crate::step::{AnimationStep, Position};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    /// At the start, not running.
    Idle,
    Playing,
    Paused,
    /// At the end after playing forward.
    Finished,
    Killed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEvent {
    Started,
    Reversed,
    Completed,
    ReverseCompleted,
}

/// Offsets for a group of elements animated one after another.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Stagger {
    /// Member `i` starts `overlap - i * decay` seconds before the current
    /// end, so later members overlap less and the cascade fans out.
    Overlap { overlap: f32, decay: f32 },
    /// Member `i` starts at absolute time `i * interval`.
    Each { interval: f32 },
}

impl Stagger {
    pub fn position(&self, i: usize) -> Position {
        match *self {
            Stagger::Overlap { overlap, decay } => Position::Relative(-(overlap - i as f32 * decay)),
            Stagger::Each { interval } => Position::Absolute(i as f32 * interval),
        }
    }
}

/// Fluent builder. `ease` and `at` adjust the most recently added step.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    label: String,
    steps: Vec<AnimationStep>,
    delay: f32,
    cancel: Option<CancelToken>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label used in log lines.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn add(mut self, step: AnimationStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn from_to(self, target: TargetPath, from: StyleMap, to: StyleMap, duration: f32) -> Self {
        self.add(AnimationStep::from_to(target, from, to, duration))
    }

    pub fn to(self, target: TargetPath, to: StyleMap, duration: f32) -> Self {
        self.add(AnimationStep::to(target, to, duration))
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.ease = ease;
        }
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.position = position;
        }
        self
    }

    /// One step per member, each a copy of `template` retargeted and
    /// positioned by `stagger`.
    pub fn stagger(mut self, members: &[TargetPath], template: &AnimationStep, stagger: Stagger) -> Self {
        for (i, member) in members.iter().enumerate() {
            let mut step = template.clone();
            step.target = member.clone();
            step.position = stagger.position(i);
            self.steps.push(step);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn build(self) -> Result<Timeline, MotionError> {
        let mut scheduled = Vec::with_capacity(self.steps.len());
        let mut end = 0.0f32;
        let mut prev_start = 0.0f32;
        for step in self.steps {
            step.validate()?;
            let start = step.position.resolve(end, prev_start);
            end = end.max(start + step.duration);
            prev_start = start;
            scheduled.push(Scheduled { start, step });
        }
        // Stable: equal starts keep insertion order.
        scheduled.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut tracks: IndexMap<(TargetPath, Property), Vec<usize>> = IndexMap::new();
        for (i, s) in scheduled.iter().enumerate() {
            for property in s.step.to.properties() {
                tracks
                    .entry((s.step.target.clone(), property))
                    .or_default()
                    .push(i);
            }
        }

        Ok(Timeline {
            label: self.label,
            steps: scheduled,
            tracks,
            captured: HashMap::new(),
            missing: HashSet::new(),
            duration: end,
            delay: self.delay,
            delay_left: 0.0,
            playhead: 0.0,
            direction: Direction::Forward,
            state: PlayState::Idle,
            dirty: true,
            pending: Vec::new(),
            cancel: self.cancel,
        })
    }
}

#[derive(Clone, Debug)]
struct Scheduled {
    start: f32,
    step: AnimationStep,
}

#[derive(Debug)]
pub struct Timeline {
    label: String,
    steps: Vec<Scheduled>,
    /// Indices into `steps`, in start order, per animated pair.
    tracks: IndexMap<(TargetPath, Property), Vec<usize>>,
    /// Start values of `to` steps, read the first time they are reached.
    captured: HashMap<(usize, Property), Value>,
    missing: HashSet<TargetPath>,
    duration: f32,
    delay: f32,
    delay_left: f32,
    playhead: f32,
    direction: Direction,
    state: PlayState,
    dirty: bool,
    pending: Vec<TimelineEvent>,
    cancel: Option<CancelToken>,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn time(&self) -> f32 {
        self.playhead
    }

    /// Playhead as a fraction of the duration. Empty timelines report 0
    /// until finished, then 1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.state == PlayState::Finished { 1.0 } else { 0.0 };
        }
        (self.playhead / self.duration).clamp(0.0, 1.0)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// True while the playhead is moving.
    pub fn is_active(&self) -> bool {
        self.state == PlayState::Playing && !self.is_cancelled()
    }

    pub fn is_killed(&self) -> bool {
        self.state == PlayState::Killed || self.is_cancelled()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps with their resolved start times, in start order.
    pub fn schedule(&self) -> impl Iterator<Item = (&AnimationStep, f32)> {
        self.steps.iter().map(|s| (&s.step, s.start))
    }

    /// Start time of the first step animating `target`.
    pub fn start_of(&self, target: &TargetPath) -> Option<f32> {
        self.steps
            .iter()
            .find(|s| &s.step.target == target)
            .map(|s| s.start)
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetPath> {
        let mut seen = HashSet::new();
        self.tracks
            .keys()
            .map(|(t, _)| t)
            .filter(move |t| seen.insert(*t))
    }

    /// Run forward from the current playhead. No-op when already doing so.
    pub fn play(&mut self) {
        if self.is_killed() {
            return;
        }
        let forward = self.direction == Direction::Forward;
        if forward && matches!(self.state, PlayState::Playing | PlayState::Finished) {
            return;
        }
        self.direction = Direction::Forward;
        if self.playhead >= self.duration && self.duration > 0.0 {
            self.state = PlayState::Finished;
            return;
        }
        self.delay_left = if self.playhead <= 0.0 { self.delay } else { 0.0 };
        self.state = PlayState::Playing;
        self.pending.push(TimelineEvent::Started);
        log::debug!("timeline '{}': play from {:.3}", self.label, self.playhead);
    }

    /// Run backward from the current playhead. No-op when already doing so
    /// or when already at the start.
    pub fn reverse(&mut self) {
        if self.is_killed() {
            return;
        }
        if self.direction == Direction::Backward && self.state == PlayState::Playing {
            return;
        }
        self.direction = Direction::Backward;
        self.delay_left = 0.0;
        if self.playhead <= 0.0 {
            self.state = PlayState::Idle;
            return;
        }
        self.state = PlayState::Playing;
        self.pending.push(TimelineEvent::Reversed);
        log::debug!("timeline '{}': reverse from {:.3}", self.label, self.playhead);
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused && !self.is_cancelled() {
            self.state = PlayState::Playing;
        }
    }

    /// Jump to the start and play forward, skipping the delay.
    pub fn restart(&mut self) {
        if self.is_killed() {
            return;
        }
        self.playhead = 0.0;
        self.delay_left = 0.0;
        self.direction = Direction::Forward;
        self.state = PlayState::Playing;
        self.dirty = true;
        self.pending.push(TimelineEvent::Started);
    }

    /// Jump to the start and stop.
    pub fn reset(&mut self) {
        if self.is_killed() {
            return;
        }
        self.playhead = 0.0;
        self.delay_left = 0.0;
        self.direction = Direction::Forward;
        self.state = PlayState::Idle;
        self.dirty = true;
    }

    /// Jump to the end.
    pub fn complete(&mut self) {
        if self.is_killed() {
            return;
        }
        self.playhead = self.duration;
        self.delay_left = 0.0;
        self.direction = Direction::Forward;
        self.state = PlayState::Finished;
        self.dirty = true;
        self.pending.push(TimelineEvent::Completed);
    }

    /// Move the playhead without changing the play state. Rendered on the
    /// next tick or [`Timeline::render`].
    pub fn seek(&mut self, time: f32) {
        if self.is_killed() || !time.is_finite() {
            return;
        }
        self.playhead = time.clamp(0.0, self.duration);
        self.dirty = true;
    }

    /// Stop for good. A killed timeline never writes again.
    pub fn kill(&mut self) {
        self.state = PlayState::Killed;
        self.pending.clear();
    }

    /// Advance by `dt` seconds (already lag-clamped by the caller) and
    /// render. Returns the events raised since the last tick.
    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> Vec<TimelineEvent> {
        if self.is_killed() {
            self.state = PlayState::Killed;
            self.pending.clear();
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.pending);
        if self.state != PlayState::Playing {
            if self.dirty {
                self.render(stage);
            }
            return events;
        }

        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.direction == Direction::Forward && self.delay_left > 0.0 {
            let used = dt.min(self.delay_left);
            self.delay_left -= used;
            dt -= used;
            if self.delay_left > 0.0 {
                if self.dirty {
                    self.render(stage);
                }
                return events;
            }
        }

        match self.direction {
            Direction::Forward => {
                self.playhead = (self.playhead + dt).min(self.duration);
                if self.playhead >= self.duration {
                    self.state = PlayState::Finished;
                    events.push(TimelineEvent::Completed);
                    log::debug!("timeline '{}': completed", self.label);
                }
            }
            Direction::Backward => {
                self.playhead = (self.playhead - dt).max(0.0);
                if self.playhead <= 0.0 {
                    self.state = PlayState::Idle;
                    events.push(TimelineEvent::ReverseCompleted);
                    log::debug!("timeline '{}': reverse completed", self.label);
                }
            }
        }
        self.render(stage);
        events
    }

    /// Write the state at the current playhead. Used at mount to apply
    /// from-states before the timeline ever plays.
    pub fn render(&mut self, stage: &mut dyn Stage) {
        self.dirty = false;
        if self.is_killed() {
            return;
        }
        let playhead = self.playhead;
        for ((target, property), indices) in &self.tracks {
            if !stage.contains(target) {
                if self.missing.insert(target.clone()) {
                    log::debug!(
                        "timeline '{}': skipping missing target {target}",
                        self.label
                    );
                }
                continue;
            }
            let slot = indices
                .iter()
                .rposition(|&i| self.steps[i].start <= playhead)
                .unwrap_or(0);
            let idx = indices[slot];
            let Scheduled { start, step } = &self.steps[idx];
            let Some(to) = step.to.get(*property) else {
                continue;
            };

            let explicit = step.from.as_ref().and_then(|f| f.get(*property));
            let from = match explicit {
                Some(v) => v.clone(),
                None => match self.captured.get(&(idx, *property)) {
                    Some(v) => v.clone(),
                    // Not reached yet: nothing to restore.
                    None if playhead < *start => continue,
                    None => {
                        let v = match slot.checked_sub(1).map(|p| indices[p]) {
                            Some(prev) => self.steps[prev]
                                .step
                                .to
                                .get(*property)
                                .cloned()
                                .unwrap_or_else(|| property.default_value()),
                            None => stage
                                .read(target, *property)
                                .unwrap_or_else(|| property.default_value()),
                        };
                        self.captured.insert((idx, *property), v.clone());
                        v
                    }
                },
            };

            let local = if step.duration <= 0.0 {
                if playhead >= *start {
                    1.0
                } else {
                    0.0
                }
            } else {
                ((playhead - start) / step.duration).clamp(0.0, 1.0)
            };
            stage.write(target, *property, sample(&from, to, local, &step.ease));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::MemoryStage;

    fn tp(s: &str) -> TargetPath {
        TargetPath::parse(s).unwrap()
    }

    fn fade(target: &str) -> AnimationStep {
        AnimationStep::from_to(
            tp(target),
            StyleMap::new().with(Property::Opacity, 0.0),
            StyleMap::new().with(Property::Opacity, 1.0),
            1.0,
        )
    }

    fn opacity(stage: &MemoryStage, target: &str) -> f32 {
        stage
            .value(&tp(target), Property::Opacity)
            .and_then(Value::as_float)
            .unwrap()
    }

    #[test]
    fn relative_positions_measure_from_end() {
        let tl = TimelineBuilder::new()
            .add(fade("hero/headline").at(Position::Sequential))
            .add(fade("hero/subtitle").at(Position::Relative(-0.6)))
            .add(fade("hero/cta").at(Position::WithPrevious))
            .build()
            .unwrap();
        assert_eq!(tl.start_of(&tp("hero/headline")), Some(0.0));
        assert!((tl.start_of(&tp("hero/subtitle")).unwrap() - 0.4).abs() < 1e-6);
        assert!((tl.start_of(&tp("hero/cta")).unwrap() - 0.4).abs() < 1e-6);
        assert!((tl.duration() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn render_applies_from_state() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("about/image"));
        let mut tl = TimelineBuilder::new().add(fade("about/image")).build().unwrap();
        tl.render(&mut stage);
        assert_eq!(opacity(&stage, "about/image"), 0.0);
    }

    #[test]
    fn play_twice_is_noop() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("about/image"));
        let mut tl = TimelineBuilder::new().add(fade("about/image")).build().unwrap();
        tl.play();
        tl.play();
        let events = tl.tick(0.5, &mut stage);
        assert_eq!(events, vec![TimelineEvent::Started]);
        assert!((tl.time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn delay_only_on_forward_from_start() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("hero/headline"));
        let mut tl = TimelineBuilder::new()
            .delay(0.5)
            .add(fade("hero/headline"))
            .build()
            .unwrap();
        tl.play();
        tl.tick(0.4, &mut stage);
        assert_eq!(tl.time(), 0.0);
        tl.tick(0.3, &mut stage);
        assert!((tl.time() - 0.2).abs() < 1e-5);
        tl.reverse();
        tl.tick(0.1, &mut stage);
        assert!((tl.time() - 0.1).abs() < 1e-5);
        tl.play();
        tl.tick(0.1, &mut stage);
        assert!((tl.time() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn reverse_at_start_does_nothing() {
        let mut stage = MemoryStage::new();
        let mut tl = TimelineBuilder::new().add(fade("x")).build().unwrap();
        tl.reverse();
        assert_eq!(tl.state(), PlayState::Idle);
        assert!(tl.tick(0.1, &mut stage).is_empty());
    }

    #[test]
    fn cancelled_timeline_never_writes() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("about/image"));
        let token = CancelToken::new();
        let mut tl = TimelineBuilder::new()
            .with_cancel(token.clone())
            .add(fade("about/image"))
            .build()
            .unwrap();
        tl.play();
        token.cancel();
        assert!(tl.tick(0.5, &mut stage).is_empty());
        assert!(stage.writes().is_empty());
        assert!(tl.is_killed());
    }

    #[test]
    fn to_steps_capture_stage_values() {
        let mut stage = MemoryStage::new();
        stage.insert_with(tp("loader/bar"), StyleMap::new().with(Property::Width, 20.0));
        let mut tl = TimelineBuilder::new()
            .to(tp("loader/bar"), StyleMap::new().with(Property::Width, 60.0), 1.0)
            .ease(Ease::Linear)
            .build()
            .unwrap();
        tl.play();
        tl.tick(0.5, &mut stage);
        assert_eq!(stage.value(&tp("loader/bar"), Property::Width), Some(&Value::f(40.0)));
        tl.reverse();
        tl.tick(1.0, &mut stage);
        assert_eq!(stage.value(&tp("loader/bar"), Property::Width), Some(&Value::f(20.0)));
    }

    #[test]
    fn invalid_duration_fails_build() {
        let err = TimelineBuilder::new()
            .to(tp("a"), StyleMap::new().with(Property::Opacity, 1.0), f32::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, MotionError::InvalidDuration { .. }));
    }

    #[test]
    fn stagger_json_forms() {
        let s: Stagger = serde_json::from_str(r#"{ "mode": "overlap", "overlap": 0.8, "decay": 0.1 }"#).unwrap();
        assert_eq!(s, Stagger::Overlap { overlap: 0.8, decay: 0.1 });
        let s: Stagger = serde_json::from_str(r#"{ "mode": "each", "interval": 0.1 }"#).unwrap();
        assert_eq!(s.position(3), Position::Absolute(3.0 * 0.1));
    }
}
