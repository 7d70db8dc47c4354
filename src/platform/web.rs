//! Browser backend and JS entry point

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, Storage, Window};

use crate::consts::{DARK_SCHEME_QUERY, SETTINGS_OVERLAY_SELECTOR};
use crate::context::PreferenceContext;
use crate::error::SettingsError;
use crate::page::{Control, Overlay, Page};
use crate::persistence::PreferenceStore;
use crate::registry::Registry;

type WebContext = PreferenceContext<LocalStore, DocumentPage>;

impl From<SettingsError> for JsValue {
    fn from(err: SettingsError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Best-effort text for a thrown JS value
fn js_reason(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`; reads as empty when storage is blocked
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, preferences will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStore {
    fn get_item(&self, key: &str) -> crate::Result<Option<String>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        storage.get_item(key).map_err(|e| SettingsError::Storage {
            key: key.to_string(),
            reason: js_reason(&e),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> crate::Result<()> {
        let Some(storage) = &self.storage else {
            return Err(SettingsError::Storage {
                key: key.to_string(),
                reason: "LocalStorage unavailable".to_string(),
            });
        };
        storage.set_item(key, value).map_err(|e| SettingsError::Storage {
            key: key.to_string(),
            reason: js_reason(&e),
        })
    }
}

pub struct InputControl(HtmlInputElement);

impl Control for InputControl {
    fn name(&self) -> String {
        self.0.name()
    }

    fn checked(&self) -> bool {
        self.0.checked()
    }

    fn set_checked(&self, checked: bool) {
        self.0.set_checked(checked);
    }

    fn value(&self) -> String {
        self.0.value()
    }
}

// Modal controller defined by the documentation theme's page script
#[wasm_bindgen]
extern "C" {
    type Modal;

    #[wasm_bindgen(constructor, catch)]
    fn new(element: &Element) -> Result<Modal, JsValue>;

    #[wasm_bindgen(method)]
    fn open(this: &Modal);

    #[wasm_bindgen(method)]
    fn close(this: &Modal);
}

struct ModalOverlay(Modal);

impl Overlay for ModalOverlay {
    fn show(&self) {
        self.0.open();
    }

    fn hide(&self) {
        self.0.close();
    }
}

/// Quote a string for use inside a CSS attribute selector
fn css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

pub struct DocumentPage {
    window: Window,
    document: Document,
}

impl DocumentPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn root(&self) -> crate::Result<Element> {
        self.document
            .document_element()
            .ok_or_else(|| SettingsError::Dom("document has no root element".to_string()))
    }
}

impl Page for DocumentPage {
    fn set_root_attribute(&self, name: &str, value: &str) -> crate::Result<()> {
        self.root()?
            .set_attribute(name, value)
            .map_err(|e| SettingsError::Dom(js_reason(&e)))
    }

    fn remove_root_attribute(&self, name: &str) -> crate::Result<()> {
        self.root()?
            .remove_attribute(name)
            .map_err(|e| SettingsError::Dom(js_reason(&e)))
    }

    fn prefers_dark_scheme(&self) -> Option<bool> {
        self.window
            .match_media(DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .map(|list| list.matches())
    }

    fn find_control(&self, name: &str, value: Option<&str>) -> Option<Box<dyn Control>> {
        let selector = match value {
            Some(v) => format!("input[name={}][value={}]", css_string(name), css_string(v)),
            None => format!("input[name={}]", css_string(name)),
        };
        self.document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| Box::new(InputControl(input)) as Box<dyn Control>)
    }

    fn settings_overlay(&self) -> Option<Box<dyn Overlay>> {
        let container = self
            .document
            .query_selector(SETTINGS_OVERLAY_SELECTOR)
            .ok()
            .flatten()?;
        match Modal::new(&container) {
            Ok(modal) => Some(Box::new(ModalOverlay(modal))),
            Err(e) => {
                log::warn!("Could not create settings modal: {}", js_reason(&e));
                None
            }
        }
    }
}

/// Handle returned to page script
#[wasm_bindgen]
pub struct Preferences {
    ctx: Rc<WebContext>,
}

#[wasm_bindgen]
impl Preferences {
    /// Apply the change carried by `element` (for inline `onchange` hooks)
    #[wasm_bindgen(js_name = updateSetting)]
    pub fn update_setting(&self, element: HtmlInputElement) -> Result<(), JsValue> {
        self.ctx.dispatch_update(&InputControl(element))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = openSettings)]
    pub fn open_settings(&self) -> bool {
        self.ctx.open_settings()
    }

    #[wasm_bindgen(js_name = closeSettings)]
    pub fn close_settings(&self) -> bool {
        self.ctx.close_settings()
    }
}

/// Load and apply stored preferences, then bind controls once the document
/// is parsed.
///
/// Call from a `<script>` in `<head>` so settings apply before first paint.
#[wasm_bindgen(js_name = initPreferences)]
pub fn init_preferences() -> Result<Preferences, JsValue> {
    console_error_panic_hook::set_once();
    // A second init on the same page keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let ctx = Rc::new(PreferenceContext::new(
        Registry::standard(),
        LocalStore::new(&window),
        DocumentPage::new(window, document.clone()),
    ));
    ctx.load_all();

    if document.ready_state() == "loading" {
        let ready = ctx.clone();
        let closure = Closure::<dyn FnMut() -> Result<(), JsValue>>::new(move || {
            ready.bind()?;
            Ok(())
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
    } else {
        ctx.bind()?;
    }

    setup_change_listener(&document, ctx.clone())?;

    log::info!("Preferences initialized");
    Ok(Preferences { ctx })
}

/// Route `change` events from any `<input>` into the registry
fn setup_change_listener(document: &Document, ctx: Rc<WebContext>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(_) -> Result<(), JsValue>>::new(
        move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return Ok(());
            };
            ctx.dispatch_update(&InputControl(input))?;
            Ok(())
        },
    );
    document.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
