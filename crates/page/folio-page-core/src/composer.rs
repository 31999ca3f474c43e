//! Page composer: loader first, then the sections in page order.
//!
//! The composer itself animates nothing beyond the contact button. It
//! routes host input (frame ticks, scroll samples, hovers, navigation and
//! form input) to the loader, the section controllers, the navigation and
//! the contact form, and reports what happened as a [`PageFrame`].

use serde::{Deserialize, Serialize};

use folio_api_core::TargetPath;
use folio_form_relay::{FormPayload, FormRelay, RelayError, RelayReceipt};
use folio_motion::{Repeat, Stage, Tween, TweenSet, Viewport};

use crate::config::PageConfig;
use crate::contact::{ContactError, ContactForm, SubmitStatus};
use crate::error::PageError;
use crate::loading::{LoadingController, LoadingEvent, ProgressSource};
use crate::navigation::{Navigation, ScrollRequest};
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::section::{SectionController, SectionEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagePhase {
    Loading,
    Ready,
    Unmounted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    LoadingProgress { progress: f32 },
    LoadingComplete,
    /// The host should detach the preloader subtree.
    PreloaderRemoved,
    SectionActivated { id: String },
    SectionDeactivated { id: String },
    NavScrolled { scrolled: bool },
    MenuToggled { open: bool },
    ScrollRequested { request: ScrollRequest },
    ContactSubmitted,
    ContactFailed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageFrame {
    pub epoch: u64,
    pub dt: f32,
    pub phase: PagePhase,
    pub scroll_locked: bool,
    /// Events since the previous frame, in the order they happened.
    pub events: Vec<PageEvent>,
}

#[derive(Debug)]
pub struct PageComposer {
    config: PageConfig,
    epoch: u64,
    phase: PagePhase,
    source: Option<Box<dyn ProgressSource>>,
    loading: Option<LoadingController>,
    sections: Vec<SectionController>,
    navigation: Navigation,
    contact: ContactForm,
    tweens: TweenSet,
    scroll_lock: ScrollLock,
    lock_guard: Option<ScrollLockGuard>,
    removal_left: Option<f32>,
    viewport: Option<Viewport>,
    pending: Vec<PageEvent>,
}

impl PageComposer {
    /// A page in its loading phase with the scroll lock held. The loader
    /// starts on the first tick. Fails when `config` does not validate.
    pub fn new(config: PageConfig) -> Result<Self, PageError> {
        config.validate()?;
        let scroll_lock = ScrollLock::new();
        let lock_guard = Some(scroll_lock.acquire());
        Ok(Self {
            navigation: Navigation::new(config.navigation.clone()),
            config,
            epoch: 0,
            phase: PagePhase::Loading,
            source: None,
            loading: None,
            sections: Vec::new(),
            contact: ContactForm::new(),
            tweens: TweenSet::new(),
            scroll_lock,
            lock_guard,
            removal_left: None,
            viewport: None,
            pending: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Replace the random progress source (scripted loaders in tests).
    pub fn with_progress_source(mut self, source: Box<dyn ProgressSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Handle on the page scroll lock, for hosts that mirror it.
    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock.clone()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    pub fn loading(&self) -> Option<&LoadingController> {
        self.loading.as_ref()
    }

    pub fn sections(&self) -> &[SectionController] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionController> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<PageFrame, PageError> {
        self.epoch = self.epoch.wrapping_add(1);
        let dt = self.config.motion.clamp_dt(dt);
        let mut events = std::mem::take(&mut self.pending);

        match self.phase {
            PagePhase::Loading => {
                if let Err(err) = self.tick_loading(dt, stage, &mut events) {
                    // Keep what happened for the next successful frame.
                    self.pending = events;
                    return Err(err);
                }
            }
            PagePhase::Ready => {
                for section in &mut self.sections {
                    section.tick(dt, stage);
                }
                if let Some(left) = self.removal_left.as_mut() {
                    *left -= dt;
                    if *left <= 0.0 {
                        self.removal_left = None;
                        if let Some(mut loading) = self.loading.take() {
                            loading.cancel();
                        }
                        events.push(PageEvent::PreloaderRemoved);
                    }
                }
            }
            PagePhase::Unmounted => {}
        }
        self.tweens.tick(dt, stage);

        Ok(PageFrame {
            epoch: self.epoch,
            dt,
            phase: self.phase,
            scroll_locked: self.is_scroll_locked(),
            events,
        })
    }

    fn tick_loading(
        &mut self,
        dt: f32,
        stage: &mut dyn Stage,
        events: &mut Vec<PageEvent>,
    ) -> Result<(), PageError> {
        if self.loading.is_none() {
            let mut loading = LoadingController::new(self.config.loading.clone(), &self.config.motion, stage)?;
            if let Some(source) = self.source.take() {
                loading = loading.with_progress_source(source);
            }
            self.loading = Some(loading);
        }
        let Some(loading) = self.loading.as_mut() else {
            return Ok(());
        };
        for event in loading.tick(dt, stage) {
            if let LoadingEvent::Progress(progress) = event {
                events.push(PageEvent::LoadingProgress { progress });
            }
        }
        // Done stays set, so a failed mount is retried on the next tick.
        if loading.is_done() {
            self.enter_ready(stage, events)?;
        }
        Ok(())
    }

    fn enter_ready(&mut self, stage: &mut dyn Stage, events: &mut Vec<PageEvent>) -> Result<(), PageError> {
        let mut sections = Vec::with_capacity(self.config.sections.len());
        for spec in &self.config.sections {
            sections.push(SectionController::mount(spec, stage, &self.config.motion)?);
        }
        self.sections = sections;
        events.push(PageEvent::LoadingComplete);
        self.lock_guard = None;
        self.phase = PagePhase::Ready;
        self.removal_left = Some(self.config.loading.removal_delay.max(0.0));
        log::info!("page ready: {} sections mounted", self.sections.len());
        if let Some(viewport) = self.viewport {
            self.route_scroll(&viewport, stage, events);
        }
        Ok(())
    }

    fn route_scroll(&mut self, viewport: &Viewport, stage: &dyn Stage, events: &mut Vec<PageEvent>) {
        for section in &mut self.sections {
            match section.on_scroll(viewport, stage) {
                Some(SectionEvent::Activated) => events.push(PageEvent::SectionActivated {
                    id: section.id().to_string(),
                }),
                Some(SectionEvent::Deactivated) => events.push(PageEvent::SectionDeactivated {
                    id: section.id().to_string(),
                }),
                None => {}
            }
        }
    }

    /// Feed a scroll sample. While loading it is remembered and applied
    /// once the sections mount.
    pub fn on_scroll(&mut self, viewport: Viewport, stage: &dyn Stage) -> Vec<PageEvent> {
        let mut events = Vec::new();
        if self.phase == PagePhase::Unmounted {
            return events;
        }
        self.viewport = Some(viewport);
        if let Some(scrolled) = self.navigation.on_scroll(viewport.scroll_y) {
            events.push(PageEvent::NavScrolled { scrolled });
        }
        if self.phase == PagePhase::Ready {
            self.route_scroll(&viewport, stage, &mut events);
        }
        events
    }

    /// Route a pointer enter/leave to the section owning `target`.
    pub fn on_hover(&mut self, target: &TargetPath, entered: bool) -> bool {
        let id = target.section();
        self.sections
            .iter_mut()
            .find(|s| s.id() == id)
            .is_some_and(|s| s.on_hover(target, entered))
    }

    pub fn navigate(&mut self, id: &str, stage: &dyn Stage) -> Result<ScrollRequest, PageError> {
        let spec = self
            .config
            .section(id)
            .ok_or_else(|| PageError::UnknownSection(id.to_string()))?;
        let rect = stage.rect(&spec.root());
        let request = self.navigation.scroll_to_section(id, rect);
        self.pending.push(PageEvent::ScrollRequested {
            request: request.clone(),
        });
        Ok(request)
    }

    pub fn scroll_to_top(&mut self) -> ScrollRequest {
        let request = self.navigation.scroll_to_top();
        self.pending.push(PageEvent::ScrollRequested {
            request: request.clone(),
        });
        request
    }

    pub fn toggle_menu(&mut self) -> bool {
        let open = self.navigation.toggle_menu();
        self.pending.push(PageEvent::MenuToggled { open });
        open
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), ContactError> {
        self.contact.set_field(field, value)
    }

    /// Validate the form and pulse the submit button. The host posts the
    /// payload and reports back with [`PageComposer::finish_contact_submit`].
    pub fn begin_contact_submit(&mut self) -> Result<FormPayload, ContactError> {
        let payload = match self.contact.begin_submit() {
            Ok(payload) => payload,
            Err(ContactError::AlreadySubmitting) => return Err(ContactError::AlreadySubmitting),
            Err(err) => {
                self.pending.push(PageEvent::ContactFailed {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };
        let c = &self.config.contact;
        let press = Tween::to(c.submit_button.clone(), c.press.clone(), c.press_duration)
            .with_ease(c.press_ease)
            .repeat(Repeat::Count(1))
            .yoyo(true);
        self.tweens.add(press);
        Ok(payload)
    }

    pub fn finish_contact_submit(&mut self, result: Result<RelayReceipt, RelayError>) -> SubmitStatus {
        let status = self.contact.finish_submit(result).clone();
        match &status {
            SubmitStatus::Succeeded => {
                let c = &self.config.contact;
                let success = Tween::to(c.submit_button.clone(), c.success.clone(), c.success_duration)
                    .with_ease(self.config.motion.default_ease);
                self.tweens.add(success);
                self.pending.push(PageEvent::ContactSubmitted);
            }
            SubmitStatus::Failed(reason) => self.pending.push(PageEvent::ContactFailed {
                reason: reason.clone(),
            }),
            SubmitStatus::Idle | SubmitStatus::Submitting => {}
        }
        status
    }

    /// Whole submit cycle against `relay`. Never returns an error.
    pub async fn submit_contact(&mut self, relay: &dyn FormRelay) -> SubmitStatus {
        let Ok(payload) = self.begin_contact_submit() else {
            return self.contact.status().clone();
        };
        let result = relay.submit(&payload).await;
        self.finish_contact_submit(result)
    }

    /// Tear everything down and release the scroll lock.
    pub fn unmount(&mut self) {
        if self.phase == PagePhase::Unmounted {
            return;
        }
        for section in &mut self.sections {
            section.unmount();
        }
        if let Some(loading) = self.loading.as_mut() {
            loading.cancel();
        }
        self.tweens.cancel_all();
        self.removal_left = None;
        self.lock_guard = None;
        self.phase = PagePhase::Unmounted;
        log::debug!("page unmounted at epoch {}", self.epoch);
    }
}
