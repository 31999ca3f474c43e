//! Folio page core (host-agnostic)
//!
//! Controllers for an animated single-page portfolio, built on
//! `folio_motion`:
//! - [`PageComposer`]: loader gate, scroll lock, section mounting
//! - [`SectionController`]: entrance timeline + observer binding per section
//! - [`LoadingController`]: simulated progress and the loader's exit
//! - [`Navigation`] and [`ContactForm`]: the page's interactive parts
//! - [`PageConfig`]: the page as data; [`PageConfig::portfolio`] is built in

pub mod composer;
pub mod config;
pub mod contact;
pub mod error;
pub mod loading;
pub mod navigation;
pub mod presets;
pub mod scroll_lock;
pub mod section;

pub use composer::{PageComposer, PageEvent, PageFrame, PagePhase};
pub use config::{
    AmbientSpec, ContactConfig, HoverSpec, LoadingConfig, NavItem, NavigationConfig, PageConfig,
    ScrubSpec, SectionSpec, StepSpec, TriggerSpec,
};
pub use contact::{ContactError, ContactForm, FormFields, SubmitStatus};
pub use error::PageError;
pub use loading::{
    LoadingController, LoadingEvent, LoadingPhase, ProgressSource, RandomProgress, ScriptedProgress,
};
pub use navigation::{Navigation, ScrollRequest};
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use section::{SectionController, SectionEvent};

pub use folio_form_relay::{FormPayload, FormRelay, RelayConfig, RelayError, RelayReceipt};
pub use folio_motion::{ElementRect, MemoryStage, Stage, StageLayout, Viewport};
