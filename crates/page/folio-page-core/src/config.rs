//! Page configuration.
//!
//! Everything the page animates is described here as data: one
//! [`SectionSpec`] per section in page order, plus the loader, navigation
//! and contact settings. [`PageConfig::portfolio`] is the built-in page.

use serde::{Deserialize, Serialize};

use folio_api_core::{Property, StyleMap, TargetPath, Value};
use folio_form_relay::RelayConfig;
use folio_motion::{
    AnimationStep, Config as MotionConfig, Ease, Marker, MotionError, Position, Repeat, Stagger,
    Threshold, ToggleActions, Tween,
};

use crate::error::PageError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub motion: MotionConfig,
    pub loading: LoadingConfig,
    pub navigation: NavigationConfig,
    pub contact: ContactConfig,
    /// Sections in page order.
    pub sections: Vec<SectionSpec>,
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let cfg: PageConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject duplicate section ids, steps and tweens that could never
    /// build, negative timings, and exit thresholds stricter than their
    /// start.
    pub fn validate(&self) -> Result<(), PageError> {
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                return Err(PageError::DuplicateSection(section.id.clone()));
            }
            section.validate(&self.motion)?;
        }
        for step in self.loading.entrance.iter().chain(&self.loading.exit) {
            step.to_step(step.target.clone(), &self.motion).validate()?;
        }
        let loading = &self.loading;
        let label = loading.root.to_string();
        check_time(&label, loading.interval)?;
        check_time(&label, loading.exit_wait)?;
        check_time(&label, loading.removal_delay)?;
        Tween::to(loading.bar.clone(), StyleMap::new(), loading.bar_duration).validate()?;

        let contact = &self.contact;
        Tween::to(contact.submit_button.clone(), contact.press.clone(), contact.press_duration)
            .validate()?;
        Tween::to(contact.submit_button.clone(), contact.success.clone(), contact.success_duration)
            .validate()?;
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// How a section's entrance timeline is started.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TriggerSpec {
    /// Play as soon as the section mounts.
    Immediate,
    /// Drive the timeline from a scroll observer on the section root.
    #[serde(rename_all = "camelCase")]
    Scroll {
        #[serde(default)]
        start: Threshold,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<Marker>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit: Option<Threshold>,
        #[serde(default)]
        toggle_actions: ToggleActions,
    },
}

impl Default for TriggerSpec {
    fn default() -> Self {
        TriggerSpec::Scroll {
            start: Threshold::default(),
            end: None,
            exit: None,
            toggle_actions: ToggleActions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    #[serde(default)]
    pub trigger: TriggerSpec,
    /// Timeline delay, applied only when playing forward from the start.
    #[serde(default)]
    pub delay: f32,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub ambient: Vec<AmbientSpec>,
    #[serde(default)]
    pub hover: Vec<HoverSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrub: Option<ScrubSpec>,
}

impl SectionSpec {
    /// The section's root element, observed for scroll triggers.
    pub fn root(&self) -> TargetPath {
        TargetPath::new(Vec::new(), self.id.clone(), None)
    }

    fn validate(&self, motion: &MotionConfig) -> Result<(), MotionError> {
        check_time(&self.id, self.delay)?;
        if let TriggerSpec::Scroll {
            start,
            exit: Some(exit),
            ..
        } = &self.trigger
        {
            // Active would drop back to inactive on the sample that entered.
            if exit.stricter_than(start) {
                return Err(MotionError::StrictExit {
                    start: format!("{start:?}"),
                    exit: format!("{exit:?}"),
                });
            }
        }
        for step in &self.steps {
            step.to_step(step.target.clone(), motion).validate()?;
        }
        for ambient in &self.ambient {
            // Member i adds i * step, so non-negative steps keep every member valid.
            let group = ambient.group.to_string();
            check_time(&group, ambient.duration_step)?;
            check_time(&group, ambient.delay_step)?;
            ambient.tween_for(0, ambient.group.clone(), motion).validate()?;
        }
        for hover in &self.hover {
            Tween::to(hover.group.clone(), hover.enter.clone(), hover.duration).validate()?;
            Tween::to(hover.group.clone(), hover.leave.clone(), hover.duration).validate()?;
        }
        if let Some(scrub) = &self.scrub {
            check_time(&scrub.target.to_string(), scrub.smoothing)?;
            if !scrub.distance.is_finite() {
                return Err(MotionError::InvalidDuration {
                    target: scrub.target.to_string(),
                    duration: scrub.distance,
                });
            }
        }
        Ok(())
    }
}

/// Durations, delays and steps must be finite and non-negative.
fn check_time(target: &str, seconds: f32) -> Result<(), MotionError> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidDuration {
            target: target.to_string(),
            duration: seconds,
        })
    }
}

/// One authored step. With `stagger`, `target` names a repeated group
/// and one step is scheduled per member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub target: TargetPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<StyleMap>,
    pub to: StyleMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<Stagger>,
}

impl StepSpec {
    pub fn from_to(target: &str, from: StyleMap, to: StyleMap, duration: f32) -> Result<Self, MotionError> {
        Ok(Self {
            target: TargetPath::parse(target)?,
            from: Some(from),
            to,
            duration: Some(duration),
            ease: None,
            position: Position::Sequential,
            stagger: None,
        })
    }

    pub fn to(target: &str, to: StyleMap, duration: f32) -> Result<Self, MotionError> {
        Ok(Self {
            from: None,
            ..Self::from_to(target, StyleMap::new(), to, duration)?
        })
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn staggered(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Concrete step for `target`, filling omitted duration and ease from
    /// the motion defaults.
    pub fn to_step(&self, target: TargetPath, motion: &MotionConfig) -> AnimationStep {
        AnimationStep {
            target,
            from: self.from.clone(),
            to: self.to.clone(),
            duration: self.duration.unwrap_or(motion.default_duration),
            ease: self.ease.unwrap_or(motion.default_ease),
            position: self.position,
        }
    }
}

fn forever() -> Repeat {
    Repeat::Infinite
}

/// A looping tween started on every member of a group at mount.
///
/// Member `i` animates to `to + i * per_member` (float properties), over
/// `duration + i * duration_step` seconds, after `i * delay_step` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientSpec {
    pub group: TargetPath,
    pub to: StyleMap,
    #[serde(default)]
    pub per_member: StyleMap,
    pub duration: f32,
    #[serde(default)]
    pub duration_step: f32,
    #[serde(default)]
    pub delay_step: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    #[serde(default = "forever")]
    pub repeat: Repeat,
    #[serde(default)]
    pub yoyo: bool,
}

impl AmbientSpec {
    pub fn tween_for(&self, i: usize, target: TargetPath, motion: &MotionConfig) -> Tween {
        let n = i as f32;
        let to = self
            .to
            .iter()
            .map(|(p, v)| {
                let v = match (v, self.per_member.get(p).and_then(Value::as_float)) {
                    (Value::Float(base), Some(step)) => Value::Float(base + n * step),
                    _ => v.clone(),
                };
                (p, v)
            })
            .collect();
        Tween::to(target, to, self.duration + n * self.duration_step)
            .with_delay(n * self.delay_step)
            .with_ease(self.ease.unwrap_or(motion.default_ease))
            .repeat(self.repeat)
            .yoyo(self.yoyo)
    }
}

/// Pointer enter/leave tweens for members of a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverSpec {
    pub group: TargetPath,
    pub enter: StyleMap,
    pub leave: StyleMap,
    pub duration: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
}

impl HoverSpec {
    pub fn matches(&self, target: &TargetPath) -> bool {
        target == &self.group || target.is_member_of(&self.group)
    }
}

/// Scroll-linked motion: between the `start` and `end` markers of the
/// section root, `property` of `target` follows `progress * distance`,
/// smoothed by a short tween.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrubSpec {
    pub target: TargetPath,
    pub start: Marker,
    pub end: Marker,
    pub property: Property,
    pub distance: f32,
    pub smoothing: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadingConfig {
    /// Removed by the host once the page is ready.
    pub root: TargetPath,
    pub bar: TargetPath,
    pub percentage: TargetPath,
    /// Seconds between progress increments.
    pub interval: f32,
    /// Increments are drawn from `[0, max_increment)`.
    pub max_increment: f32,
    pub bar_duration: f32,
    pub bar_ease: Ease,
    /// Pause between reaching 100 and the exit timeline.
    pub exit_wait: f32,
    /// Seconds after completion before the preloader is removed.
    pub removal_delay: f32,
    pub entrance: Vec<StepSpec>,
    pub exit: Vec<StepSpec>,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            root: TargetPath::new(Vec::new(), "preloader", None),
            bar: TargetPath::new(vec!["preloader".into()], "bar", None),
            percentage: TargetPath::new(vec!["preloader".into()], "percentage", None),
            interval: 0.1,
            max_increment: 15.0,
            bar_duration: 0.3,
            bar_ease: Ease::Power {
                degree: 2,
                mode: folio_motion::EaseMode::Out,
            },
            exit_wait: 0.5,
            removal_delay: 1.0,
            entrance: Vec::new(),
            exit: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub id: String,
}

impl NavItem {
    pub fn new(label: &str, id: &str) -> Self {
        Self {
            label: label.to_string(),
            id: id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// The bar switches to its solid style past this scroll offset (px).
    pub scrolled_threshold: f32,
    pub smooth_scroll: bool,
    pub items: Vec<NavItem>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 50.0,
            smooth_scroll: true,
            items: vec![
                NavItem::new("Home", "hero"),
                NavItem::new("About", "about"),
                NavItem::new("Projects", "projects"),
                NavItem::new("Contact", "contact"),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactConfig {
    pub relay: RelayConfig,
    pub submit_button: TargetPath,
    /// Press pulse, played once forward and back on submit.
    pub press: StyleMap,
    pub press_duration: f32,
    pub press_ease: Ease,
    /// Button style tweened in after a successful submit.
    pub success: StyleMap,
    pub success_duration: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            submit_button: TargetPath::new(vec!["contact".into()], "submit", None),
            press: StyleMap::new().with(Property::Scale, 0.95),
            press_duration: 0.1,
            press_ease: Ease::Power {
                degree: 2,
                mode: folio_motion::EaseMode::InOut,
            },
            success: StyleMap::new()
                .with(Property::BackgroundColor, "#10B981")
                .with(Property::Color, "#ffffff"),
            success_duration: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_defaults_to_scroll_trigger() {
        let s: SectionSpec = serde_json::from_str(r#"{ "id": "footer" }"#).unwrap();
        assert_eq!(s.trigger, TriggerSpec::default());
        assert_eq!(s.root().to_string(), "footer");
    }

    #[test]
    fn immediate_trigger_json() {
        let s: SectionSpec =
            serde_json::from_str(r#"{ "id": "hero", "trigger": { "kind": "immediate" }, "delay": 0.5 }"#)
                .unwrap();
        assert_eq!(s.trigger, TriggerSpec::Immediate);
        assert_eq!(s.delay, 0.5);
    }

    #[test]
    fn ambient_member_offsets() {
        let spec = AmbientSpec {
            group: TargetPath::parse("hero/orb").unwrap(),
            to: StyleMap::new().with(Property::Y, -30.0).with(Property::X, 20.0),
            per_member: StyleMap::new().with(Property::Y, -10.0).with(Property::X, -15.0),
            duration: 3.0,
            duration_step: 0.5,
            delay_step: 0.5,
            ease: None,
            repeat: Repeat::Infinite,
            yoyo: true,
        };
        let tween = spec.tween_for(2, spec.group.member(2), &MotionConfig::default());
        assert_eq!(tween.duration(), 4.0);
        assert_eq!(tween.total_duration(), None);
        assert_eq!(tween.target(), &spec.group.member(2));
    }

    #[test]
    fn duplicate_sections_rejected() {
        let err = PageConfig::from_json(r#"{ "sections": [ { "id": "about" }, { "id": "about" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, PageError::DuplicateSection(id) if id == "about"));
    }

    #[test]
    fn negative_step_duration_rejected() {
        let err = PageConfig::from_json(
            r#"{ "sections": [ { "id": "about", "steps": [
                { "target": "about/image", "to": { "opacity": 1 }, "duration": -1 }
            ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PageError::Motion(MotionError::InvalidDuration { .. })));
    }

    fn invalid_duration(json: &str) -> bool {
        matches!(
            PageConfig::from_json(json),
            Err(PageError::Motion(MotionError::InvalidDuration { .. }))
        )
    }

    #[test]
    fn negative_timings_rejected() {
        assert!(invalid_duration(
            r#"{ "sections": [ { "id": "hero", "ambient": [
                { "group": "hero/orb", "to": { "y": -30 }, "duration": 3, "durationStep": -2 }
            ] } ] }"#
        ));
        assert!(invalid_duration(
            r#"{ "sections": [ { "id": "about", "hover": [
                { "group": "about/skill-item", "enter": { "scale": 1.1 }, "leave": { "scale": 1 }, "duration": -0.3 }
            ] } ] }"#
        ));
        assert!(invalid_duration(
            r#"{ "sections": [ { "id": "hero", "scrub": {
                "target": "hero/spline", "start": "top top", "end": "bottom top",
                "property": "y", "distance": 100, "smoothing": -1
            } } ] }"#
        ));
        assert!(invalid_duration(r#"{ "contact": { "pressDuration": -0.1 } }"#));
        assert!(invalid_duration(r#"{ "contact": { "successDuration": -1 } }"#));
        assert!(invalid_duration(r#"{ "loading": { "barDuration": -0.3 } }"#));
    }

    #[test]
    fn strict_exit_rejected() {
        let err = PageConfig::from_json(
            r#"{ "sections": [ { "id": "about", "trigger":
                { "kind": "scroll", "start": "top 80%", "exit": "top 50%" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PageError::Motion(MotionError::StrictExit { .. })));

        let looser = r#"{ "sections": [ { "id": "about", "trigger":
            { "kind": "scroll", "start": 0.5, "exit": 0.1 } } ] }"#;
        assert!(PageConfig::from_json(looser).is_ok());
        let stricter = r#"{ "sections": [ { "id": "about", "trigger":
            { "kind": "scroll", "start": 0.1, "exit": 0.5 } } ] }"#;
        assert!(PageConfig::from_json(stricter).is_err());
    }
}
