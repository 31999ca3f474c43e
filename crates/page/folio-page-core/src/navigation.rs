//! Top navigation: scrolled style, mobile menu and section jumps.

use serde::{Deserialize, Serialize};

use folio_motion::ElementRect;

use crate::config::{NavItem, NavigationConfig};

/// Fire-and-forget scroll for the host to perform. `section: None` is the
/// top of the page. `y` is absent when the section's layout is unknown;
/// the host then scrolls the element with that id into view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub section: Option<String>,
    pub y: Option<f32>,
    pub smooth: bool,
}

#[derive(Debug)]
pub struct Navigation {
    cfg: NavigationConfig,
    scrolled: bool,
    menu_open: bool,
}

impl Navigation {
    pub fn new(cfg: NavigationConfig) -> Self {
        Self {
            cfg,
            scrolled: false,
            menu_open: false,
        }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.cfg.items
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Returns the new flag when it flipped.
    pub fn on_scroll(&mut self, scroll_y: f32) -> Option<bool> {
        let scrolled = scroll_y > self.cfg.scrolled_threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Jump to a section; always closes the mobile menu.
    pub fn scroll_to_section(&mut self, id: &str, rect: Option<ElementRect>) -> ScrollRequest {
        self.menu_open = false;
        ScrollRequest {
            section: Some(id.to_string()),
            y: rect.map(|r| r.top),
            smooth: self.cfg.smooth_scroll,
        }
    }

    pub fn scroll_to_top(&mut self) -> ScrollRequest {
        self.menu_open = false;
        ScrollRequest {
            section: None,
            y: Some(0.0),
            smooth: self.cfg.smooth_scroll,
        }
    }
}
