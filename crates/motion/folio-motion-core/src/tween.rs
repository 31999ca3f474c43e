//! Standalone `to` tweens, repeats and the running set that owns them.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use folio_api_core::{Property, StyleMap, TargetPath};

use crate::cancel::CancelToken;
use crate::ease::Ease;
use crate::error::MotionError;
use crate::ids::{IdAllocator, TweenId};
use crate::interp::sample;
use crate::stage::Stage;

/// Extra cycles after the first. JSON uses a count, `-1` meaning forever.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Never,
    Count(u32),
    Infinite,
}

impl Serialize for Repeat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Repeat::Never => serializer.serialize_i64(0),
            Repeat::Count(n) => serializer.serialize_i64(i64::from(*n)),
            Repeat::Infinite => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for Repeat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = i64::deserialize(deserializer)?;
        match n {
            -1 => Ok(Repeat::Infinite),
            0 => Ok(Repeat::Never),
            n if n > 0 => u32::try_from(n)
                .map(Repeat::Count)
                .map_err(|_| de::Error::custom(format!("repeat {n} out of range"))),
            n => Err(de::Error::custom(format!("invalid repeat {n}"))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TweenStatus {
    Running,
    Finished,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Tween {
    target: TargetPath,
    to: StyleMap,
    from: Option<StyleMap>,
    duration: f32,
    ease: Ease,
    delay: f32,
    repeat: Repeat,
    yoyo: bool,
    elapsed: f32,
    cancel: Option<CancelToken>,
}

impl Tween {
    /// Animate `target` from whatever it currently shows to `to`.
    pub fn to(target: TargetPath, to: StyleMap, duration: f32) -> Self {
        Self {
            target,
            to,
            from: None,
            duration,
            ease: Ease::default(),
            delay: 0.0,
            repeat: Repeat::Never,
            yoyo: false,
            elapsed: 0.0,
            cancel: None,
        }
    }

    /// Fix the start values instead of reading them from the stage.
    pub fn from_values(mut self, from: StyleMap) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Alternate direction on every repeat.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn target(&self) -> &TargetPath {
        &self.target
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.to.properties()
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Delay plus every cycle; `None` for infinite tweens.
    pub fn total_duration(&self) -> Option<f32> {
        let cycles = match self.repeat {
            Repeat::Never => 1,
            Repeat::Count(n) => n + 1,
            Repeat::Infinite => return None,
        };
        Some(self.delay + self.duration * cycles as f32)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(MotionError::InvalidDuration {
                target: self.target.to_string(),
                duration: self.duration,
            });
        }
        self.to.validate()?;
        Ok(())
    }

    /// Stop animating `properties`. Returns true when nothing is left.
    fn drop_properties(&mut self, properties: &[Property]) -> bool {
        for p in properties {
            self.to.remove(*p);
            if let Some(from) = self.from.as_mut() {
                from.remove(*p);
            }
        }
        self.to.is_empty()
    }

    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> TweenStatus {
        if self.is_cancelled() {
            return TweenStatus::Cancelled;
        }
        if !stage.contains(&self.target) {
            log::debug!("tween: target {} detached, dropping", self.target);
            return TweenStatus::Cancelled;
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let active = self.elapsed - self.delay;
        if active < 0.0 {
            return TweenStatus::Running;
        }

        if self.from.is_none() {
            let captured = self
                .to
                .properties()
                .map(|p| {
                    let v = stage.read(&self.target, p).unwrap_or_else(|| p.default_value());
                    (p, v)
                })
                .collect();
            self.from = Some(captured);
        }

        let (progress, done) = self.progress_at(active);
        let Some(from) = self.from.as_ref() else {
            return TweenStatus::Finished;
        };
        for (property, to) in self.to.iter() {
            let start = from
                .get(property)
                .cloned()
                .unwrap_or_else(|| property.default_value());
            stage.write(&self.target, property, sample(&start, to, progress, &self.ease));
        }
        if done {
            TweenStatus::Finished
        } else {
            TweenStatus::Running
        }
    }

    /// Linear progress of the current cycle at `active` seconds past the
    /// delay, and whether the last cycle has ended.
    fn progress_at(&self, active: f32) -> (f32, bool) {
        if self.duration <= 0.0 {
            return (1.0, !matches!(self.repeat, Repeat::Infinite));
        }
        let cycle = (active / self.duration).floor();
        let last = match self.repeat {
            Repeat::Never => Some(0.0),
            Repeat::Count(n) => Some(n as f32),
            Repeat::Infinite => None,
        };
        if let Some(last) = last {
            if cycle > last {
                let backwards = self.yoyo && (last as u32) % 2 == 1;
                return (if backwards { 0.0 } else { 1.0 }, true);
            }
        }
        let local = (active - cycle * self.duration) / self.duration;
        let backwards = self.yoyo && (cycle as u64) % 2 == 1;
        (if backwards { 1.0 - local } else { local }, false)
    }
}

/// Running tweens. At most one tween animates a given
/// `(target, property)` pair; adding a tween takes the overlapping
/// properties away from older ones.
#[derive(Debug, Default)]
pub struct TweenSet {
    tweens: Vec<(TweenId, Tween)>,
    ids: IdAllocator,
}

impl TweenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tween: Tween) -> TweenId {
        let props: Vec<Property> = tween.properties().collect();
        self.tweens.retain_mut(|(id, old)| {
            if old.target != tween.target {
                return true;
            }
            let emptied = old.drop_properties(&props);
            if emptied {
                log::trace!("tween {:?} overwritten on {}", id, old.target);
            }
            !emptied
        });
        let id = self.ids.alloc_tween();
        self.tweens.push((id, tween));
        id
    }

    pub fn cancel(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(tid, _)| *tid != id);
        before != self.tweens.len()
    }

    /// Drop every tween animating `target`.
    pub fn cancel_target(&mut self, target: &TargetPath) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|(_, t)| &t.target != target);
        before - self.tweens.len()
    }

    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|(tid, _)| *tid == id)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advance every tween. Returns the ids that finished this tick;
    /// finished and cancelled tweens are removed.
    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> Vec<TweenId> {
        let mut finished = Vec::new();
        self.tweens.retain_mut(|(id, tween)| match tween.tick(dt, stage) {
            TweenStatus::Running => true,
            TweenStatus::Finished => {
                finished.push(*id);
                false
            }
            TweenStatus::Cancelled => false,
        });
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::MemoryStage;
    use folio_api_core::Value;

    fn tp(s: &str) -> TargetPath {
        TargetPath::parse(s).unwrap()
    }

    fn scale(stage: &MemoryStage, target: &str) -> f32 {
        stage
            .value(&tp(target), Property::Scale)
            .and_then(Value::as_float)
            .unwrap()
    }

    #[test]
    fn yoyo_repeat_returns_to_start() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("contact/submit"));
        let mut tween = Tween::to(
            tp("contact/submit"),
            StyleMap::new().with(Property::Scale, 0.95),
            0.1,
        )
        .repeat(Repeat::Count(1))
        .yoyo(true);
        assert_eq!(tween.tick(0.1, &mut stage), TweenStatus::Running);
        assert!((scale(&stage, "contact/submit") - 0.95).abs() < 1e-5);
        assert_eq!(tween.tick(0.15, &mut stage), TweenStatus::Finished);
        assert_eq!(scale(&stage, "contact/submit"), 1.0);
    }

    #[test]
    fn delay_holds_writes() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("hero/orb[0]"));
        let mut tween = Tween::to(tp("hero/orb[0]"), StyleMap::new().with(Property::Y, -20.0), 1.0)
            .with_delay(0.5);
        tween.tick(0.3, &mut stage);
        assert!(stage.writes().is_empty());
        tween.tick(0.3, &mut stage);
        assert_eq!(stage.writes().len(), 1);
    }

    #[test]
    fn infinite_never_finishes() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("hero/particle[0]"));
        let mut tween = Tween::to(
            tp("hero/particle[0]"),
            StyleMap::new().with(Property::Rotation, 360.0),
            2.0,
        )
        .with_ease(Ease::Linear)
        .repeat(Repeat::Infinite);
        for _ in 0..100 {
            assert_eq!(tween.tick(0.25, &mut stage), TweenStatus::Running);
        }
        assert_eq!(tween.total_duration(), None);
    }

    #[test]
    fn overwrite_takes_pair_from_older_tween() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("about/skill-item[0]"));
        let mut set = TweenSet::new();
        let enter = set.add(Tween::to(
            tp("about/skill-item[0]"),
            StyleMap::new().with(Property::Scale, 1.1).with(Property::Y, -5.0),
            0.3,
        ));
        set.tick(0.15, &mut stage);
        let mid = scale(&stage, "about/skill-item[0]");
        let leave = set.add(Tween::to(
            tp("about/skill-item[0]"),
            StyleMap::new().with(Property::Scale, 1.0).with(Property::Y, 0.0),
            0.3,
        ));
        assert!(!set.is_running(enter));
        assert!(set.is_running(leave));
        assert_eq!(set.len(), 1);
        set.tick(0.0, &mut stage);
        assert_eq!(scale(&stage, "about/skill-item[0]"), mid);
        let done = set.tick(0.3, &mut stage);
        assert_eq!(done, vec![leave]);
        assert_eq!(scale(&stage, "about/skill-item[0]"), 1.0);
        assert!(set.is_empty());
    }

    #[test]
    fn cancelled_tween_stops_writing() {
        let mut stage = MemoryStage::new();
        stage.insert(tp("hero/orb[1]"));
        let token = CancelToken::new();
        let mut set = TweenSet::new();
        set.add(
            Tween::to(tp("hero/orb[1]"), StyleMap::new().with(Property::Y, 20.0), 1.0)
                .with_cancel(token.clone()),
        );
        token.cancel();
        assert!(set.tick(0.5, &mut stage).is_empty());
        assert!(set.is_empty());
        assert!(stage.writes().is_empty());
    }

    #[test]
    fn repeat_json() {
        let r: Repeat = serde_json::from_str("-1").unwrap();
        assert_eq!(r, Repeat::Infinite);
        let r: Repeat = serde_json::from_str("1").unwrap();
        assert_eq!(r, Repeat::Count(1));
        assert!(serde_json::from_str::<Repeat>("-3").is_err());
    }
}
