#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Browser entry point for the PKI console.
//!
//! The widgets only mount inside a page served to a browser; a native build
//! prints how to serve the console instead.

#[cfg(target_arch = "wasm32")]
fn main() {
    pki_ui::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_NOTICE: &str = "\
pki-ui renders inside a browser page.
Serve it with `trunk serve crates/pki-ui/index.html`; settings are read from
the `pki-ui-config` JSON element of the host page.
";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    std::io::stderr().lock().write_all(NATIVE_NOTICE.as_bytes())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn notice_names_the_config_element() {
        assert!(NATIVE_NOTICE.contains(pki_ui::core::config::CONFIG_ELEMENT_ID));
        assert!(main().is_ok());
    }
}
