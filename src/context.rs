//! Page-wide preference state
//!
//! Built once at startup and shared (behind `Rc` in the browser) with every
//! event handler, instead of module-level globals.

use std::cell::{OnceCell, Ref, RefCell};

use crate::binder;
use crate::error::Result;
use crate::page::{Control, Overlay, Page};
use crate::persistence::PreferenceStore;
use crate::registry::Registry;

pub struct PreferenceContext<S, P> {
    pub(crate) registry: RefCell<Registry>,
    pub(crate) store: S,
    pub(crate) page: P,
    /// Set at most once, by the document-ready step
    pub(crate) overlay: OnceCell<Box<dyn Overlay>>,
}

impl<S: PreferenceStore, P: Page> PreferenceContext<S, P> {
    pub fn new(registry: Registry, store: S, page: P) -> Self {
        Self {
            registry: RefCell::new(registry),
            store,
            page,
            overlay: OnceCell::new(),
        }
    }

    /// Load and apply every setting. Must run before [`Self::bind`].
    pub fn load_all(&self) {
        self.registry.borrow_mut().load_all(&self.store, &self.page);
        log::info!(
            "Loaded {} settings",
            self.registry.borrow().settings().len()
        );
    }

    /// Document-ready step: acquire the overlay, reflect settings onto controls
    pub fn bind(&self) -> Result<()> {
        binder::bind(self)
    }

    /// Handle a change on `control`, routed by its `name`
    pub fn dispatch_update(&self, control: &dyn Control) -> Result<()> {
        binder::route_change(self, control)
    }

    /// Take the settings overlay from the page unless one is already held.
    ///
    /// Returns whether an overlay is held afterwards.
    pub(crate) fn acquire_overlay(&self) -> bool {
        if self.overlay.get().is_some() {
            return true;
        }
        let Some(overlay) = self.page.settings_overlay() else {
            return false;
        };
        if self.overlay.set(overlay).is_err() {
            log::warn!("Settings overlay acquired twice, keeping the first");
        }
        true
    }

    /// Show the settings overlay. `false` if none was acquired.
    pub fn open_settings(&self) -> bool {
        let Some(overlay) = self.overlay.get() else {
            return false;
        };
        overlay.show();
        true
    }

    /// Hide the settings overlay. `false` if none was acquired.
    pub fn close_settings(&self) -> bool {
        let Some(overlay) = self.overlay.get() else {
            return false;
        };
        overlay.hide();
        true
    }

    pub fn registry(&self) -> Ref<'_, Registry> {
        self.registry.borrow()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HeadlessPage;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_overlay_unavailable_before_bind() {
        let page = HeadlessPage::new();
        let overlay = page.add_overlay();
        let ctx = PreferenceContext::new(Registry::default(), MemoryStore::new(), page);

        assert!(!ctx.open_settings());
        ctx.bind().unwrap();
        assert!(ctx.open_settings());
        assert!(overlay.is_visible());
        assert!(ctx.close_settings());
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_acquire_overlay_keeps_first() {
        let page = HeadlessPage::new();
        let ctx = PreferenceContext::new(Registry::default(), MemoryStore::new(), page);
        assert!(!ctx.acquire_overlay());

        let first = ctx.page().add_overlay();
        assert!(ctx.acquire_overlay());
        let second = ctx.page().add_overlay();
        assert!(ctx.acquire_overlay());

        ctx.open_settings();
        assert!(first.is_visible());
        assert!(!second.is_visible());
    }
}
