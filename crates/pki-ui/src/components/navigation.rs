//! Menu view wired to a [`Navigation`].

use crate::core::navigation::Navigation;
use std::rc::Rc;
use yew::platform::spawn_local;
use yew::prelude::*;

/// One menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MenuItem {
    pub(crate) label: AttrValue,
    pub(crate) href: AttrValue,
}

#[derive(Properties)]
pub(crate) struct MenuProps {
    pub(crate) navigation: Rc<Navigation>,
    pub(crate) items: Vec<MenuItem>,
}

impl PartialEq for MenuProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.navigation, &other.navigation) && self.items == other.items
    }
}

#[function_component(Menu)]
pub(crate) fn menu(props: &MenuProps) -> Html {
    let items = props.items.iter().map(|item| {
        let navigation = Rc::clone(&props.navigation);
        let href = item.href.clone();
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let navigation = Rc::clone(&navigation);
            let href = href.clone();
            spawn_local(async move {
                if let Err(err) = navigation.follow(&href).await {
                    tracing::debug!(error = %err, "menu navigation failed");
                }
            });
        });
        html! {
            <li><a href={item.href.clone()} {onclick}>{item.label.clone()}</a></li>
        }
    });
    html! { <ul class="menu">{ for items }</ul> }
}
