//! docprefs entry point
//!
//! The browser build is driven from page script through `initPreferences`
//! exported by the library. Natively this runs the settings against a
//! headless page and prints the resulting document state.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("docprefs (native) starting...");
    log::info!("Native mode has no document - build for wasm32 to use in a page");

    if let Err(err) = headless_demo() {
        log::error!("Headless run failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is initPreferences in the library
}

#[cfg(not(target_arch = "wasm32"))]
use docprefs::consts::{
    FONT_ATTRIBUTE, FONT_SETTING, THEME_ATTRIBUTE, THEME_CHOICES, THEME_SETTING,
};
#[cfg(not(target_arch = "wasm32"))]
use docprefs::{Control, HeadlessPage, MemoryStore, PreferenceContext, Registry};

/// Load defaults, bind a fake settings panel, then click through it
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() -> docprefs::Result<()> {
    let page = HeadlessPage::with_dark_preference(true);
    let font = page.add_control(FONT_SETTING, "on");
    let themes: Vec<_> = THEME_CHOICES
        .iter()
        .map(|c| page.add_radio(THEME_SETTING, c))
        .collect();
    page.add_overlay();

    let ctx = PreferenceContext::new(Registry::standard(), MemoryStore::new(), page);
    ctx.load_all();
    ctx.bind()?;
    print_state(&ctx, "after load");

    font.set_checked(true);
    ctx.dispatch_update(&font)?;
    if let Some(light) = themes.iter().find(|c| c.value() == "light") {
        ctx.dispatch_update(light)?;
    }
    print_state(&ctx, "after changes");

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn print_state(ctx: &PreferenceContext<MemoryStore, HeadlessPage>, label: &str) {
    let page = ctx.page();
    println!(
        "{label}: {FONT_ATTRIBUTE}={:?} {THEME_ATTRIBUTE}={:?}",
        page.root_attribute(FONT_ATTRIBUTE),
        page.root_attribute(THEME_ATTRIBUTE)
    );
    for setting in ctx.registry().settings() {
        println!("  {} = {}", setting.name(), setting.value());
    }
}
