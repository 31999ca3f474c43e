//! Section controller: one entrance timeline, one observer binding and the
//! section's ambient, hover and scrub tweens, all under one cancel guard.

use serde::{Deserialize, Serialize};

use folio_api_core::{StyleMap, TargetPath};
use folio_motion::{
    CancelGuard, CancelToken, Config as MotionConfig, Ease, MotionError, ObserverBinding,
    ScrubBinding, Stage, Timeline, TimelineBuilder, TimelineEvent, Tween, TweenId, TweenSet,
    Viewport,
};

use crate::config::{HoverSpec, ScrubSpec, SectionSpec, StepSpec, TriggerSpec};
use crate::error::PageError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionEvent {
    Activated,
    Deactivated,
}

/// Build a timeline from authored steps. Staggered steps expand to the
/// group's attached members; a group with no members adds nothing.
pub(crate) fn build_timeline(
    label: &str,
    steps: &[StepSpec],
    delay: f32,
    stage: &dyn Stage,
    motion: &MotionConfig,
    token: CancelToken,
) -> Result<Timeline, MotionError> {
    let mut builder = TimelineBuilder::new()
        .named(label)
        .delay(delay)
        .with_cancel(token);
    for step in steps {
        let template = step.to_step(step.target.clone(), motion);
        builder = match step.stagger {
            Some(stagger) => {
                let members = stage.query(&step.target);
                if members.is_empty() {
                    log::debug!("{label}: group {} has no members", step.target);
                }
                builder.stagger(&members, &template, stagger)
            }
            None => builder.add(template),
        };
    }
    builder.build()
}

#[derive(Debug)]
struct Scrub {
    spec: ScrubSpec,
    binding: ScrubBinding,
}

#[derive(Debug)]
pub struct SectionController {
    id: String,
    root: TargetPath,
    timeline: Timeline,
    binding: Option<ObserverBinding>,
    scrub: Option<Scrub>,
    hover: Vec<HoverSpec>,
    tweens: TweenSet,
    default_ease: Ease,
    guard: CancelGuard,
}

impl SectionController {
    /// Build everything the section animates and apply its from-states.
    ///
    /// An immediate section starts playing here; a scroll section waits for
    /// its binding to fire in [`SectionController::on_scroll`].
    pub fn mount(
        spec: &SectionSpec,
        stage: &mut dyn Stage,
        motion: &MotionConfig,
    ) -> Result<Self, PageError> {
        let guard = CancelGuard::new();
        let mut timeline = build_timeline(
            &spec.id,
            &spec.steps,
            spec.delay,
            stage,
            motion,
            guard.token(),
        )?;
        timeline.render(stage);

        let binding = match &spec.trigger {
            TriggerSpec::Immediate => {
                timeline.play();
                None
            }
            TriggerSpec::Scroll {
                start,
                end,
                exit,
                toggle_actions,
            } => {
                let mut binding =
                    ObserverBinding::new(*start, *toggle_actions).with_cancel(guard.token());
                if let Some(end) = end {
                    binding = binding.with_end(*end);
                }
                if let Some(exit) = exit {
                    binding = binding.with_exit(*exit);
                }
                Some(binding)
            }
        };

        let mut tweens = TweenSet::new();
        for ambient in &spec.ambient {
            for (i, member) in stage.query(&ambient.group).into_iter().enumerate() {
                tweens.add(ambient.tween_for(i, member, motion).with_cancel(guard.token()));
            }
        }

        let scrub = spec.scrub.clone().map(|spec| Scrub {
            binding: ScrubBinding::new(spec.start, spec.end).with_cancel(guard.token()),
            spec,
        });

        log::debug!(
            "section '{}' mounted: {} steps, {} ambient tweens",
            spec.id,
            timeline.len(),
            tweens.len()
        );
        Ok(Self {
            id: spec.id.clone(),
            root: spec.root(),
            timeline,
            binding,
            scrub,
            hover: spec.hover.clone(),
            tweens,
            default_ease: motion.default_ease,
            guard,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn is_mounted(&self) -> bool {
        !self.guard.is_cancelled()
    }

    /// True once the entrance has been triggered and not yet left back.
    /// Immediate sections are always active.
    pub fn is_active(&self) -> bool {
        match &self.binding {
            Some(binding) => binding.is_active(),
            None => self.is_mounted(),
        }
    }

    /// Feed a scroll sample. Reads the section root's rect from the stage;
    /// without layout nothing happens.
    pub fn on_scroll(&mut self, viewport: &Viewport, stage: &dyn Stage) -> Option<SectionEvent> {
        if !self.is_mounted() {
            return None;
        }
        let rect = stage.rect(&self.root)?;

        if let Some(scrub) = &mut self.scrub {
            if let Some(progress) = scrub.binding.update(viewport, &rect) {
                let to = StyleMap::new().with(scrub.spec.property, progress * scrub.spec.distance);
                let tween = Tween::to(scrub.spec.target.clone(), to, scrub.spec.smoothing)
                    .with_ease(Ease::Linear)
                    .with_cancel(self.guard.token());
                self.tweens.add(tween);
            }
        }

        let binding = self.binding.as_mut()?;
        let was_active = binding.is_active();
        for action in binding.update(viewport, &rect) {
            log::trace!("section '{}': {}", self.id, action.as_str());
            action.apply_to(&mut self.timeline);
        }
        match (was_active, binding.is_active()) {
            (false, true) => Some(SectionEvent::Activated),
            (true, false) => Some(SectionEvent::Deactivated),
            _ => None,
        }
    }

    /// Start the enter or leave tween of the hover group `target` belongs
    /// to. Returns false when no hover matches.
    pub fn on_hover(&mut self, target: &TargetPath, entered: bool) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(hover) = self.hover.iter().find(|h| h.matches(target)) else {
            return false;
        };
        let to = if entered { &hover.enter } else { &hover.leave };
        let tween = Tween::to(target.clone(), to.clone(), hover.duration)
            .with_ease(hover.ease.unwrap_or(self.default_ease))
            .with_cancel(self.guard.token());
        self.tweens.add(tween);
        true
    }

    /// Run a one-off tween owned by this section.
    pub fn animate(&mut self, tween: Tween) -> TweenId {
        self.tweens.add(tween.with_cancel(self.guard.token()))
    }

    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> Vec<TimelineEvent> {
        if !self.is_mounted() {
            return Vec::new();
        }
        let events = self.timeline.tick(dt, stage);
        self.tweens.tick(dt, stage);
        events
    }

    /// Cancel the binding, timeline and every tween of this section.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.guard.cancel();
        self.timeline.kill();
        self.tweens.cancel_all();
        log::debug!("section '{}' unmounted", self.id);
    }
}
