//! Hash-link menu that swaps page fragments into a content container.
//!
//! # Design
//! - [`ContentLoader`] fetches and inserts a page's markup; [`Page::load`] runs
//!   once the markup is in place.
//! - Unknown pages and failed fragment loads are reported through the
//!   injected [`Notifier`].

use crate::core::error::UiError;
use crate::core::notify::Notifier;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Where a menu link leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `#logout`.
    Logout,
    /// `#<name>`.
    Page(String),
}

impl Route {
    /// Classify a menu href; anything but a non-empty `#fragment` is inert.
    #[must_use]
    pub fn parse(href: &str) -> Option<Self> {
        match href.strip_prefix('#') {
            Some("logout") => Some(Self::Logout),
            Some(name) if !name.is_empty() => Some(Self::Page(name.to_string())),
            _ => None,
        }
    }
}

/// A page reachable from the menu.
pub trait Page {
    /// URL of the page's markup fragment.
    fn url(&self) -> &str;

    /// Runs after the fragment has been inserted.
    fn load(&self) {}
}

/// Inserts a fragment into the content container.
#[async_trait(?Send)]
pub trait ContentLoader {
    /// Fetch `url` and replace the container contents with it.
    ///
    /// # Errors
    /// Returns the transport or status failure; the container is left as it was.
    async fn load(&self, url: &str) -> Result<(), UiError>;
}

/// Menu wiring plus the page registry.
pub struct Navigation {
    pages: BTreeMap<String, Rc<dyn Page>>,
    home_page: Option<String>,
    logout: Option<Rc<dyn Fn()>>,
    content: Rc<dyn ContentLoader>,
    notifier: Rc<dyn Notifier>,
    current: RefCell<Option<String>>,
}

impl Navigation {
    /// Empty registry writing into `content`.
    #[must_use]
    pub fn new(content: Rc<dyn ContentLoader>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            pages: BTreeMap::new(),
            home_page: None,
            logout: None,
            content,
            notifier,
            current: RefCell::new(None),
        }
    }

    /// Register a page under `name`.
    #[must_use]
    pub fn page(mut self, name: impl Into<String>, page: Rc<dyn Page>) -> Self {
        self.pages.insert(name.into(), page);
        self
    }

    /// Page loaded by [`Navigation::start`].
    #[must_use]
    pub fn home_page(mut self, name: Option<String>) -> Self {
        self.home_page = name;
        self
    }

    /// Callback for the `#logout` link.
    #[must_use]
    pub fn on_logout(mut self, logout: impl Fn() + 'static) -> Self {
        self.logout = Some(Rc::new(logout));
        self
    }

    /// Registered page names.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Name of the last page loaded successfully.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// Load the home page, if one is configured.
    ///
    /// # Errors
    /// See [`Navigation::load`].
    pub async fn start(&self) -> Result<(), UiError> {
        match self.home_page.clone() {
            Some(name) => self.load(&name).await,
            None => Ok(()),
        }
    }

    /// A menu link was clicked.
    ///
    /// # Errors
    /// See [`Navigation::load`].
    pub async fn follow(&self, href: &str) -> Result<(), UiError> {
        match Route::parse(href) {
            Some(Route::Logout) => {
                tracing::info!("logout requested");
                if let Some(logout) = &self.logout {
                    logout();
                }
                Ok(())
            }
            Some(Route::Page(name)) => self.load(&name).await,
            None => {
                tracing::debug!(href, "inert menu link");
                Ok(())
            }
        }
    }

    /// Show a registered page: insert its fragment, then run its hook.
    ///
    /// # Errors
    /// Returns [`UiError::UnknownPage`] for unregistered names or the
    /// fragment failure; both are alerted first.
    pub async fn load(&self, name: &str) -> Result<(), UiError> {
        let Some(page) = self.pages.get(name).cloned() else {
            let err = UiError::UnknownPage(name.to_string());
            tracing::warn!(page = name, "unknown page");
            self.notifier.alert(&err.to_string());
            return Err(err);
        };
        tracing::debug!(page = name, url = page.url(), "loading page");
        if let Err(err) = self.content.load(page.url()).await {
            tracing::warn!(page = name, error = %err, "page fragment failed");
            self.notifier.alert(&format!("ERROR: {}", err.body_text()));
            return Err(err);
        }
        *self.current.borrow_mut() = Some(name.to_string());
        page.load();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingNotifier;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeContent {
        loaded: RefCell<Vec<String>>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl ContentLoader for FakeContent {
        async fn load(&self, url: &str) -> Result<(), UiError> {
            if self.fail.get() {
                return Err(UiError::Transport("offline".to_string()));
            }
            self.loaded.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct CountingPage {
        url: String,
        hooks: Cell<usize>,
    }

    impl Page for CountingPage {
        fn url(&self) -> &str {
            &self.url
        }

        fn load(&self) {
            self.hooks.set(self.hooks.get() + 1);
        }
    }

    fn counting(url: &str) -> Rc<CountingPage> {
        Rc::new(CountingPage {
            url: url.to_string(),
            hooks: Cell::new(0),
        })
    }

    #[test]
    fn routes_follow_hash_rules() {
        assert_eq!(Route::parse("#logout"), Some(Route::Logout));
        assert_eq!(Route::parse("#users"), Some(Route::Page("users".into())));
        assert_eq!(Route::parse("#"), None);
        assert_eq!(Route::parse("/ui/users"), None);
    }

    #[tokio::test]
    async fn start_loads_home_page_then_runs_hook() {
        let content = Rc::new(FakeContent::default());
        let users = counting("users.html");
        let nav = Navigation::new(content.clone(), Rc::new(RecordingNotifier::new(true)))
            .page("users", users.clone())
            .home_page(Some("users".into()));
        nav.start().await.unwrap();
        assert_eq!(*content.loaded.borrow(), vec!["users.html".to_string()]);
        assert_eq!(users.hooks.get(), 1);
        assert_eq!(nav.current().as_deref(), Some("users"));
    }

    #[tokio::test]
    async fn unknown_page_alerts() {
        let notifier = Rc::new(RecordingNotifier::new(true));
        let nav = Navigation::new(Rc::new(FakeContent::default()), notifier.clone());
        let result = nav.follow("#certs").await;
        assert_eq!(result, Err(UiError::UnknownPage("certs".into())));
        assert_eq!(notifier.alerts(), vec!["Invalid page: certs"]);
    }

    #[tokio::test]
    async fn failed_fragment_skips_hook() {
        let content = Rc::new(FakeContent::default());
        content.fail.set(true);
        let notifier = Rc::new(RecordingNotifier::new(true));
        let groups = counting("groups.html");
        let nav = Navigation::new(content, notifier.clone()).page("groups", groups.clone());
        assert!(nav.load("groups").await.is_err());
        assert_eq!(groups.hooks.get(), 0);
        assert_eq!(notifier.alerts(), vec!["ERROR: offline"]);
        assert_eq!(nav.current(), None);
    }

    #[tokio::test]
    async fn logout_link_calls_back_and_inert_links_do_nothing() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let content = Rc::new(FakeContent::default());
        let nav = Navigation::new(content.clone(), Rc::new(RecordingNotifier::new(true)))
            .on_logout(move || counter.set(counter.get() + 1));
        nav.follow("#logout").await.unwrap();
        nav.follow("#").await.unwrap();
        assert_eq!(calls.get(), 1);
        assert!(content.loaded.borrow().is_empty());
    }
}
