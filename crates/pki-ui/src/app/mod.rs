//! Console boot: settings, logging, menu and home page.

use crate::components::navigation::{Menu, MenuItem, MenuProps};
use crate::core::config::{CONFIG_ELEMENT_ID, UiConfig};
use crate::core::navigation::Navigation;
use crate::core::notify::Notifier;
use crate::core::transport::Transport;
use crate::features::{ResourcePage, groups, users};
use crate::services::api::BrowserTransport;
use crate::services::dom::{BrowserNotifier, FragmentLoader};
use gloo::utils::{document, window};
use pages::{Mounted, TablePage};
use std::rc::Rc;
use yew::platform::spawn_local;

mod logging;
mod pages;

const MENU_ELEMENT_ID: &str = "pki-ui-menu";
const CONTENT_ELEMENT_ID: &str = "pki-ui-content";

fn load_config() -> UiConfig {
    let raw = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .unwrap_or_default();
    UiConfig::from_json(&raw).unwrap_or_else(|err| {
        gloo::console::warn!(format!("{err}; using default settings"));
        UiConfig::default()
    })
}

fn navigation(config: &UiConfig) -> Navigation {
    let transport: Rc<dyn Transport> = Rc::new(BrowserTransport::new());
    let notifier: Rc<dyn Notifier> = Rc::new(BrowserNotifier);
    let mounted = Mounted::default();
    let page = |name: &'static str, build: fn() -> ResourcePage| {
        Rc::new(TablePage::new(
            name,
            build,
            config,
            Rc::clone(&transport),
            Rc::clone(&notifier),
            Rc::clone(&mounted),
        ))
    };
    Navigation::new(Rc::new(FragmentLoader::new(CONTENT_ELEMENT_ID)), Rc::clone(&notifier))
        .page("users", page("users", users::page))
        .page("groups", page("groups", groups::page))
        .home_page(config.home_page.clone())
        .on_logout(|| {
            if let Err(err) = window().location().reload() {
                tracing::warn!(error = ?err, "reload after logout failed");
            }
        })
}

/// Boot the console into the host page.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let config = load_config();
    if let Err(err) = logging::init_logging(&config.log_level) {
        gloo::console::warn!(err.to_string());
    }
    tracing::info!(home = ?config.home_page, "starting console");

    let navigation = Rc::new(navigation(&config));
    let items = navigation
        .page_names()
        .map(|name| MenuItem {
            label: name.to_string().into(),
            href: format!("#{name}").into(),
        })
        .chain(std::iter::once(MenuItem {
            label: "Logout".into(),
            href: "#logout".into(),
        }))
        .collect();
    let props = MenuProps {
        navigation: Rc::clone(&navigation),
        items,
    };
    match document().get_element_by_id(MENU_ELEMENT_ID) {
        Some(root) => {
            yew::Renderer::<Menu>::with_root_and_props(root, props).render();
        }
        None => tracing::warn!(root = MENU_ELEMENT_ID, "no menu container; menu not shown"),
    }
    spawn_local(async move {
        if let Err(err) = navigation.start().await {
            tracing::warn!(error = %err, "home page failed to load");
        }
    });
}
