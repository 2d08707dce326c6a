//! Menu pages hosting a table view inside their fragment.

use crate::components::table::{TableHandle, TableView, TableViewProps};
use crate::core::config::UiConfig;
use crate::core::navigation::Page;
use crate::core::notify::Notifier;
use crate::core::transport::Transport;
use crate::features::ResourcePage;
use gloo::utils::document;
use std::cell::RefCell;
use std::rc::Rc;
use yew::AppHandle;

/// Table view currently mounted in the content container.
pub(crate) type Mounted = Rc<RefCell<Option<AppHandle<TableView>>>>;

/// `static/<name>.html` fragment plus a table mounted into `#<name>-table`.
pub(crate) struct TablePage {
    name: &'static str,
    url: String,
    build: fn() -> ResourcePage,
    config: UiConfig,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
    mounted: Mounted,
}

impl TablePage {
    pub(crate) fn new(
        name: &'static str,
        build: fn() -> ResourcePage,
        config: &UiConfig,
        transport: Rc<dyn Transport>,
        notifier: Rc<dyn Notifier>,
        mounted: Mounted,
    ) -> Self {
        Self {
            name,
            url: format!("static/{name}.html"),
            build,
            config: config.clone(),
            transport,
            notifier,
            mounted,
        }
    }
}

impl Page for TablePage {
    fn url(&self) -> &str {
        &self.url
    }

    fn load(&self) {
        if let Some(previous) = self.mounted.borrow_mut().take() {
            previous.destroy();
        }
        let root_id = format!("{}-table", self.name);
        let Some(root) = document().get_element_by_id(&root_id) else {
            tracing::warn!(page = self.name, root = %root_id, "fragment has no table root");
            return;
        };
        let table = (self.build)().into_table(
            &self.config,
            Rc::clone(&self.transport),
            Rc::clone(&self.notifier),
        );
        let props = TableViewProps {
            table: TableHandle(Rc::new(table)),
        };
        let handle = yew::Renderer::<TableView>::with_root_and_props(root, props).render();
        *self.mounted.borrow_mut() = Some(handle);
    }
}
