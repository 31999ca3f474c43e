//! Scroll observer bindings.
//!
//! An [`ObserverBinding`] watches one element against the viewport and
//! turns threshold crossings into [`ToggleAction`]s for its timeline. A
//! [`ScrubBinding`] maps the scroll position between two markers onto a
//! `[0, 1]` progress.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::cancel::CancelToken;
use crate::error::MotionError;
use crate::geometry::{ElementRect, Viewport};
use crate::timeline::Timeline;

/// A line within a box: a fraction of its extent or a pixel offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Offset {
    Fraction(f32),
    Px(f32),
}

impl Offset {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => return Some(Offset::Fraction(0.0)),
            "center" => return Some(Offset::Fraction(0.5)),
            "bottom" => return Some(Offset::Fraction(1.0)),
            _ => {}
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct.parse::<f32>().ok().filter(|v| v.is_finite()).map(|v| Offset::Fraction(v / 100.0));
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        px.parse::<f32>().ok().filter(|v| v.is_finite()).map(Offset::Px)
    }

    pub fn resolve(&self, extent: f32) -> f32 {
        match *self {
            Offset::Fraction(f) => f * extent,
            Offset::Px(px) => px,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Fraction(v) if v == 0.0 => f.write_str("top"),
            Offset::Fraction(v) if v == 0.5 => f.write_str("center"),
            Offset::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            Offset::Fraction(v) => write!(f, "{}%", v * 100.0),
            Offset::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// `"<element line> <viewport line>"`, e.g. `"top 80%"`: the marker is hit
/// when the element's top reaches 80% down the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Marker {
    pub element: Offset,
    pub viewport: Offset,
}

impl Marker {
    pub fn new(element: Offset, viewport: Offset) -> Self {
        Self { element, viewport }
    }

    pub fn parse(s: &str) -> Result<Self, MotionError> {
        let invalid = || MotionError::InvalidThreshold(s.to_string());
        let mut parts = s.split_whitespace();
        let element = parts.next().and_then(Offset::parse).ok_or_else(invalid)?;
        // A lone edge means the same line on both boxes.
        let viewport = match parts.next() {
            Some(v) => Offset::parse(v).ok_or_else(invalid)?,
            None => element,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { element, viewport })
    }

    /// Scroll offset at which the two lines meet.
    pub fn trigger_scroll(&self, rect: &ElementRect, viewport_height: f32) -> f32 {
        rect.top + self.element.resolve(rect.height) - self.viewport.resolve(viewport_height)
    }

    /// True when the element line sits at or above the viewport line.
    pub fn crossed(&self, rect: &ElementRect, viewport: &Viewport) -> bool {
        viewport.scroll_y >= self.trigger_scroll(rect, viewport.height)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl FromStr for Marker {
    type Err = MotionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Marker::parse(s)
    }
}

impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Marker::parse(&s).map_err(de::Error::custom)
    }
}

/// When a binding counts as entered. JSON accepts a marker string or a
/// visible fraction in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Threshold {
    Marker(Marker),
    VisibleFraction(f32),
}

impl Threshold {
    pub fn visible(fraction: f32) -> Result<Self, MotionError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(MotionError::InvalidThreshold(fraction.to_string()));
        }
        Ok(Threshold::VisibleFraction(fraction))
    }

    pub fn crossed(&self, rect: &ElementRect, viewport: &Viewport) -> bool {
        match self {
            Threshold::Marker(m) => m.crossed(rect, viewport),
            Threshold::VisibleFraction(f) => rect.visible_fraction(viewport) >= *f,
        }
    }

    /// True when `self` is harder to cross than `other` for every element
    /// and viewport size. Offsets of different units cannot be compared
    /// and count as not stricter.
    pub fn stricter_than(&self, other: &Threshold) -> bool {
        match (self, other) {
            (Threshold::VisibleFraction(a), Threshold::VisibleFraction(b)) => a > b,
            (Threshold::Marker(a), Threshold::Marker(b)) => {
                // A later element line or an earlier viewport line moves the
                // trigger further down the page.
                let (Some(element), Some(viewport)) = (
                    offset_cmp(&a.element, &b.element),
                    offset_cmp(&b.viewport, &a.viewport),
                ) else {
                    return false;
                };
                element.is_ge() && viewport.is_ge() && (element.is_gt() || viewport.is_gt())
            }
            _ => false,
        }
    }
}

fn offset_cmp(a: &Offset, b: &Offset) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Offset::Fraction(a), Offset::Fraction(b)) | (Offset::Px(a), Offset::Px(b)) => a.partial_cmp(b),
        _ => None,
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Marker(Marker::new(Offset::Fraction(0.0), Offset::Fraction(0.8)))
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Threshold::Marker(m) => m.serialize(serializer),
            Threshold::VisibleFraction(f) => serializer.serialize_f32(*f),
        }
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Fraction(f32),
            Marker(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Fraction(f) => Threshold::visible(f).map_err(de::Error::custom),
            Raw::Marker(s) => Marker::parse(&s).map(Threshold::Marker).map_err(de::Error::custom),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl ToggleAction {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        }
    }

    pub fn apply_to(self, timeline: &mut Timeline) {
        match self {
            ToggleAction::Play => timeline.play(),
            ToggleAction::Pause => timeline.pause(),
            ToggleAction::Resume => timeline.resume(),
            ToggleAction::Reverse => timeline.reverse(),
            ToggleAction::Restart => timeline.restart(),
            ToggleAction::Reset => timeline.reset(),
            ToggleAction::Complete => timeline.complete(),
            ToggleAction::None => {}
        }
    }
}

/// Actions for the four crossings, written `"onEnter onLeave onEnterBack
/// onLeaveBack"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::Reverse,
        }
    }
}

impl ToggleActions {
    pub fn parse(s: &str) -> Result<Self, MotionError> {
        let invalid = || MotionError::InvalidToggleActions(s.to_string());
        let parsed: Vec<ToggleAction> = s
            .split_whitespace()
            .map(ToggleAction::parse)
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;
        match parsed.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(Self {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter.as_str(),
            self.on_leave.as_str(),
            self.on_enter_back.as_str(),
            self.on_leave_back.as_str()
        )
    }
}

impl Serialize for ToggleActions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ToggleActions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ToggleActions::parse(&s).map_err(de::Error::custom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingState {
    Inactive,
    Active,
}

/// Two-state scroll observer.
///
/// Inactive becomes Active when the start threshold is crossed, from
/// either scroll direction. Active becomes Inactive once the exit threshold
/// (the start threshold unless set) is no longer crossed. An optional end
/// marker adds the onLeave / onEnterBack crossings while active.
#[derive(Clone, Debug)]
pub struct ObserverBinding {
    start: Threshold,
    exit: Option<Threshold>,
    end: Option<Marker>,
    actions: ToggleActions,
    state: BindingState,
    beyond_end: bool,
    cancel: Option<CancelToken>,
}

impl ObserverBinding {
    pub fn new(start: Threshold, actions: ToggleActions) -> Self {
        Self {
            start,
            exit: None,
            end: None,
            actions,
            state: BindingState::Inactive,
            beyond_end: false,
            cancel: None,
        }
    }

    pub fn with_exit(mut self, exit: Threshold) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn with_end(mut self, end: Marker) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BindingState::Active
    }

    pub fn actions(&self) -> ToggleActions {
        self.actions
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Feed a scroll sample. Returns the actions to apply, in order; empty
    /// when the state did not change or the binding is cancelled.
    pub fn update(&mut self, viewport: &Viewport, rect: &ElementRect) -> Vec<ToggleAction> {
        if self.is_cancelled() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let past_end = self.end.is_some_and(|m| m.crossed(rect, viewport));
        match self.state {
            BindingState::Inactive => {
                if self.start.crossed(rect, viewport) {
                    self.state = BindingState::Active;
                    out.push(self.actions.on_enter);
                    if past_end {
                        out.push(self.actions.on_leave);
                    }
                    self.beyond_end = past_end;
                }
            }
            BindingState::Active => {
                let exit = self.exit.unwrap_or(self.start);
                if !exit.crossed(rect, viewport) {
                    if self.beyond_end {
                        out.push(self.actions.on_enter_back);
                    }
                    self.state = BindingState::Inactive;
                    self.beyond_end = false;
                    out.push(self.actions.on_leave_back);
                } else if past_end != self.beyond_end {
                    self.beyond_end = past_end;
                    out.push(if past_end {
                        self.actions.on_leave
                    } else {
                        self.actions.on_enter_back
                    });
                }
            }
        }
        out.retain(|a| *a != ToggleAction::None);
        out
    }
}

/// Maps scroll position between two markers to progress in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct ScrubBinding {
    start: Marker,
    end: Marker,
    last: Option<f32>,
    cancel: Option<CancelToken>,
}

impl ScrubBinding {
    pub fn new(start: Marker, end: Marker) -> Self {
        Self {
            start,
            end,
            last: None,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn progress(&self, viewport: &Viewport, rect: &ElementRect) -> f32 {
        let s = self.start.trigger_scroll(rect, viewport.height);
        let e = self.end.trigger_scroll(rect, viewport.height);
        if e <= s {
            return if viewport.scroll_y >= s { 1.0 } else { 0.0 };
        }
        ((viewport.scroll_y - s) / (e - s)).clamp(0.0, 1.0)
    }

    /// New progress when it changed since the last sample.
    pub fn update(&mut self, viewport: &Viewport, rect: &ElementRect) -> Option<f32> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return None;
        }
        let p = self.progress(viewport, rect);
        if self.last == Some(p) {
            return None;
        }
        self.last = Some(p);
        Some(p)
    }
}
