#![cfg(target_arch = "wasm32")]
use folio_page_wasm::{abi_version, validate_config, FolioPage};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

fn portfolio() -> FolioPage {
    let mut page = FolioPage::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    for path in ["preloader", "preloader/logo", "preloader/bar", "preloader/percentage"] {
        page.register_element(path.into(), None).unwrap();
    }
    page.register_element("about".into(), None).unwrap();
    page.set_rect("about".into(), 800.0, 900.0).unwrap();
    page.register_element("about/skill-item".into(), Some(8)).unwrap();
    page.register_element("contact/submit".into(), None).unwrap();
    page
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn rejects_bad_config() {
    assert!(validate_config(r#"{ "sections": [ { "id": "a" }, { "id": "a" } ] }"#).is_err());
    assert!(validate_config("{}").is_ok());
}

#[wasm_bindgen_test]
fn tick_returns_frame_and_writes() {
    let mut page = portfolio();
    assert!(page.is_scroll_locked());
    let out = page.tick(0.016).unwrap();
    let frame = get(&out, "frame");
    assert_eq!(get(&frame, "epoch").as_f64(), Some(1.0));
    assert_eq!(get(&frame, "scroll_locked").as_bool(), Some(true));
    let writes = js_sys::Array::from(&get(&out, "writes"));
    assert!(writes.length() > 0);
}

#[wasm_bindgen_test]
fn contact_round_trip_through_host() {
    let mut page = portfolio();
    page.set_field("name".into(), "Ada".into()).unwrap();
    page.set_field("email".into(), "ada@example.com".into()).unwrap();
    page.set_field("message".into(), "Hello".into()).unwrap();
    let payload = page.begin_submit().unwrap();
    assert_eq!(get(&payload, "email").as_string().as_deref(), Some("ada@example.com"));
    assert!(page.begin_submit().is_err());

    let status = page.finish_submit(None, Some("offline".into())).unwrap();
    assert!(get(&status, "Failed").as_string().unwrap().contains("offline"));
    assert!(page.set_field("phone".into(), "1".into()).is_err());
}

#[wasm_bindgen_test]
fn relay_config_exposes_endpoint() {
    let page = portfolio();
    let cfg = page.relay_config().unwrap();
    assert_eq!(
        get(&cfg, "endpoint").as_string().as_deref(),
        Some("https://formspree.io/f/movlqezb")
    );
}

#[wasm_bindgen_test]
fn preloader_subtree_is_detached_after_loading() {
    let mut page = portfolio();
    // Random increments: run well past any plausible loading time.
    for _ in 0..400 {
        page.tick(0.1).unwrap();
    }
    assert!(!page.is_scroll_locked());
    for path in ["preloader", "preloader/logo", "preloader/bar", "preloader/percentage"] {
        assert!(!page.remove_element(path.into()).unwrap(), "{path} still attached");
    }
    assert!(page.remove_element("about".into()).unwrap());
}
