use anyhow::{anyhow, Context, Result};
use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_api_core::{StyleWrite, TargetPath};
use folio_motion::{ElementRect, MemoryStage, StageLayout, Viewport};
use folio_page::{
    PageComposer, PageConfig, PageEvent, PageFrame, RelayError, RelayReceipt,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(e: anyhow::Error) -> JsError {
    JsError::new(&format!("{e:#}"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    // Maps become plain objects so hosts can index events by field.
    let ser = swb::Serializer::json_compatible();
    value
        .serialize(&ser)
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

fn parse_path(path: &str) -> Result<TargetPath> {
    TargetPath::parse(path).with_context(|| format!("invalid element path '{path}'"))
}

#[derive(Serialize)]
struct TickOutput<'a> {
    frame: &'a PageFrame,
    writes: Vec<StyleWrite>,
}

/// The page controllers over an in-memory stage. The host registers its
/// elements and their layout, feeds frames, scroll and pointer input, and
/// applies the style writes each `tick` returns.
#[wasm_bindgen]
pub struct FolioPage {
    core: PageComposer,
    stage: MemoryStage,
}

#[wasm_bindgen]
impl FolioPage {
    /// `config` is a PageConfig object, or undefined/null for the built-in
    /// portfolio. `layout` is an optional StageLayout.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, layout: JsValue) -> Result<FolioPage, JsError> {
        console_error_panic_hook::set_once();

        let cfg: PageConfig = if jsvalue_is_undefined_or_null(&config) {
            PageConfig::portfolio()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let stage = if jsvalue_is_undefined_or_null(&layout) {
            MemoryStage::new()
        } else {
            let layout: StageLayout = swb::from_value(layout)
                .map_err(|e| JsError::new(&format!("layout error: {e}")))?;
            MemoryStage::from_layout(&layout)
        };

        let core = PageComposer::new(cfg).map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(FolioPage { core, stage })
    }

    /// Attach an element, or `count` members of a repeated group.
    #[wasm_bindgen(js_name = register_element)]
    pub fn register_element(&mut self, path: String, count: Option<u32>) -> Result<(), JsError> {
        let target = parse_path(&path).map_err(js_err)?;
        match count {
            Some(n) => self.stage.insert_group(&target, n as usize),
            None => self.stage.insert(target),
        }
        Ok(())
    }

    /// Detach an element together with everything nested below it.
    #[wasm_bindgen(js_name = remove_element)]
    pub fn remove_element(&mut self, path: String) -> Result<bool, JsError> {
        let target = parse_path(&path).map_err(js_err)?;
        Ok(self.stage.remove(&target))
    }

    /// Record an element's document offset and height (px).
    #[wasm_bindgen(js_name = set_rect)]
    pub fn set_rect(&mut self, path: String, top: f32, height: f32) -> Result<bool, JsError> {
        let target = parse_path(&path).map_err(js_err)?;
        Ok(self.stage.set_rect(&target, ElementRect::new(top, height)))
    }

    /// Advance one frame. Returns `{ frame, writes }`.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let frame = self
            .core
            .tick(dt, &mut self.stage)
            .map_err(|e| JsError::new(&format!("tick error: {e}")))?;
        let mut writes = self.stage.take_writes();
        if frame.events.contains(&PageEvent::PreloaderRemoved) {
            let root = self.core.config().loading.root.clone();
            self.stage.remove(&root);
            writes.append(self.stage.take_writes());
        }
        to_js(&TickOutput {
            frame: &frame,
            writes: writes.into_vec(),
        })
    }

    /// Feed a scroll sample. Returns the events it raised.
    #[wasm_bindgen(js_name = on_scroll)]
    pub fn on_scroll(&mut self, scroll_y: f32, viewport_height: f32) -> Result<JsValue, JsError> {
        let events = self
            .core
            .on_scroll(Viewport::new(scroll_y, viewport_height), &self.stage);
        to_js(&events)
    }

    #[wasm_bindgen(js_name = on_hover)]
    pub fn on_hover(&mut self, path: String, entered: bool) -> Result<bool, JsError> {
        let target = parse_path(&path).map_err(js_err)?;
        Ok(self.core.on_hover(&target, entered))
    }

    /// Returns the ScrollRequest to perform.
    #[wasm_bindgen]
    pub fn navigate(&mut self, section: String) -> Result<JsValue, JsError> {
        let request = self
            .core
            .navigate(&section, &self.stage)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&request)
    }

    #[wasm_bindgen(js_name = scroll_to_top)]
    pub fn scroll_to_top(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.core.scroll_to_top())
    }

    #[wasm_bindgen(js_name = toggle_menu)]
    pub fn toggle_menu(&mut self) -> bool {
        self.core.toggle_menu()
    }

    /// Navigation items as `[{ label, id }]`.
    #[wasm_bindgen(js_name = nav_items)]
    pub fn nav_items(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.navigation().items())
    }

    #[wasm_bindgen(js_name = set_field)]
    pub fn set_field(&mut self, field: String, value: String) -> Result<(), JsError> {
        self.core
            .set_field(&field, value)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Validate the form and start the submit animation. Returns the
    /// payload (`{ name, email, message }`) for the host to POST to
    /// `relay_config().endpoint`.
    #[wasm_bindgen(js_name = begin_submit)]
    pub fn begin_submit(&mut self) -> Result<JsValue, JsError> {
        let payload = self
            .core
            .begin_contact_submit()
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&payload)
    }

    /// Report the POST outcome: the HTTP status when the request resolved,
    /// or `undefined` with an error message when it was rejected. Returns
    /// the resulting SubmitStatus.
    #[wasm_bindgen(js_name = finish_submit)]
    pub fn finish_submit(&mut self, status: Option<u16>, error: Option<String>) -> Result<JsValue, JsError> {
        let result = match status {
            Some(status) => Ok(RelayReceipt { status }),
            None => Err(RelayError::Transport(
                error.unwrap_or_else(|| "request failed".to_string()),
            )),
        };
        to_js(&self.core.finish_contact_submit(result))
    }

    #[wasm_bindgen(js_name = relay_config)]
    pub fn relay_config(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.config().contact.relay)
    }

    #[wasm_bindgen(js_name = is_scroll_locked)]
    pub fn is_scroll_locked(&self) -> bool {
        self.core.is_scroll_locked()
    }

    /// Section ids currently mounted, in page order.
    #[wasm_bindgen(js_name = section_ids)]
    pub fn section_ids(&self) -> Array {
        self.core
            .sections()
            .iter()
            .map(|s| JsValue::from_str(s.id()))
            .collect()
    }

    /// Tear down every section and release the scroll lock.
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        self.core.unmount();
    }
}

/// Parse and validate a PageConfig JSON string without building a page.
#[wasm_bindgen(js_name = validate_config)]
pub fn validate_config(json: &str) -> Result<(), JsError> {
    PageConfig::from_json(json)
        .map(|_| ())
        .map_err(|e| js_err(anyhow!(e)))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
