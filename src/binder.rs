//! Binding between settings and their input controls

use crate::context::PreferenceContext;
use crate::error::Result;
use crate::page::{Control, Page};
use crate::persistence::PreferenceStore;

/// Run once the document has been parsed.
///
/// Acquires the settings overlay (first call only) and checks each setting's
/// control to match its loaded value. A missing control is an error in the
/// page markup and is returned as-is.
pub fn bind<S: PreferenceStore, P: Page>(ctx: &PreferenceContext<S, P>) -> Result<()> {
    if !ctx.acquire_overlay() {
        log::warn!("Settings overlay not found, panel cannot be opened");
    }

    ctx.registry.borrow().reflect_all(&ctx.page)
}

/// Route a changed control into the registry by its `name`
pub fn route_change<S: PreferenceStore, P: Page>(
    ctx: &PreferenceContext<S, P>,
    control: &dyn Control,
) -> Result<()> {
    let name = control.name();
    ctx.registry
        .borrow_mut()
        .dispatch_update(&name, control, &ctx.store, &ctx.page)
}
