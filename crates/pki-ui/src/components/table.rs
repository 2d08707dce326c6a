//! Table view: toolbar, rows, paging footer and the table's dialogs.

use crate::components::dialog::DialogForm;
use crate::core::error::UiError;
use crate::core::table::{Cell, ColumnKind, DialogKind, TableActions};
use std::future::Future;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

/// Shared table handle compared by identity.
#[derive(Clone)]
pub(crate) struct TableHandle(pub(crate) Rc<dyn TableActions>);

impl PartialEq for TableHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct TableViewProps {
    pub(crate) table: TableHandle,
}

/// Run a table action, then redraw. Failures were already shown to the operator.
fn run<F>(redraw: Callback<()>, action: F)
where
    F: Future<Output = Result<(), UiError>> + 'static,
{
    spawn_local(async move {
        if let Err(err) = action.await {
            tracing::debug!(error = %err, "table action failed");
        }
        redraw.emit(());
    });
}

#[derive(Clone, Copy)]
enum PageStep {
    First,
    Prev,
    Next,
    Last,
}

impl PageStep {
    const fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }

    async fn apply(self, table: &dyn TableActions) -> Result<(), UiError> {
        match self {
            Self::First => table.first_page().await,
            Self::Prev => table.prev_page().await,
            Self::Next => table.next_page().await,
            Self::Last => table.last_page().await,
        }
    }
}

fn enter_pressed(e: &KeyboardEvent) -> Option<String> {
    (e.key() == "Enter").then(|| e.target_unchecked_into::<HtmlInputElement>().value())
}

#[function_component(TableView)]
pub(crate) fn table_view(props: &TableViewProps) -> Html {
    let revision = use_state(|| 0u64);
    let redraw = {
        let revision = revision.clone();
        Callback::from(move |()| revision.set(revision.wrapping_add(1)))
    };

    {
        let table = props.table.clone();
        let redraw = redraw.clone();
        use_effect_with_deps(
            move |table| {
                let frame_redraw = redraw.clone();
                let subscription = table
                    .0
                    .frame()
                    .on_row_update(move |_| frame_redraw.emit(()));
                let loader = Rc::clone(&table.0);
                run(redraw, async move { loader.render().await });
                move || drop(subscription)
            },
            table,
        );
    }

    let table = Rc::clone(&props.table.0);
    let frame = table.frame();

    let on_search = {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        Callback::from(move |e: KeyboardEvent| {
            if let Some(filter) = enter_pressed(&e) {
                let table = Rc::clone(&table);
                run(redraw.clone(), async move { table.search(&filter).await });
            }
        })
    };
    let on_page = {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        Callback::from(move |e: KeyboardEvent| {
            if let Some(raw) = enter_pressed(&e) {
                let table = Rc::clone(&table);
                run(redraw.clone(), async move { table.jump_to(&raw).await });
            }
        })
    };
    let on_add = {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            table.add();
            redraw.emit(());
        })
    };
    let on_remove = {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let table = Rc::clone(&table);
            run(redraw.clone(), async move { table.remove_selected().await });
        })
    };
    let on_select_all = {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            table.frame().toggle_all(checked);
            redraw.emit(());
        })
    };
    let pager = |step: PageStep| {
        let table = Rc::clone(&table);
        let redraw = redraw.clone();
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let table = Rc::clone(&table);
            run(redraw.clone(), async move { step.apply(&*table).await });
        });
        html! { <a href="#" class={step.label()} {onclick}>{step.label()}</a> }
    };

    let headers = frame.columns().iter().map(|column| match column.kind {
        ColumnKind::Select => html! {
            <th><input type="checkbox" checked={frame.select_all()} onchange={on_select_all.clone()} /></th>
        },
        _ => html! { <th>{column.name.clone()}</th> },
    });

    let rows = frame.rows().into_iter().enumerate().map(|(row, cells)| {
        let cells = cells.into_iter().map(|cell| match cell {
            Cell::Select {
                checkbox_id,
                value,
                checked,
                label_visible,
            } => {
                let table = Rc::clone(&table);
                let redraw = redraw.clone();
                let onchange = Callback::from(move |e: Event| {
                    let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
                    table.frame().set_checked(row, checked);
                    redraw.emit(());
                });
                html! {
                    <td>
                        <input type="checkbox" id={checkbox_id.clone()} {value} {checked} {onchange} />
                        { if label_visible { html! { <label for={checkbox_id}></label> } } else { html! {} } }
                    </td>
                }
            }
            Cell::Id(Some(id)) => {
                let table = Rc::clone(&table);
                let redraw = redraw.clone();
                let onclick = Callback::from(move |e: MouseEvent| {
                    e.prevent_default();
                    let table = Rc::clone(&table);
                    run(redraw.clone(), async move { table.open(row).await });
                });
                html! { <td><a href="#" {onclick}>{id}</a></td> }
            }
            Cell::Id(None) => html! { <td></td> },
            Cell::Text(text) => html! { <td>{text}</td> },
        });
        html! { <tr>{ for cells }</tr> }
    });

    let dialog = |kind: DialogKind| {
        let Some(view) = table.dialog_view(kind) else {
            return html! {};
        };
        let on_input = {
            let table = Rc::clone(&table);
            let redraw = redraw.clone();
            Callback::from(move |(field, value): (String, String)| {
                table.dialog_input(kind, &field, value);
                redraw.emit(());
            })
        };
        let on_action = {
            let table = Rc::clone(&table);
            let redraw = redraw.clone();
            Callback::from(move |action: String| {
                let table = Rc::clone(&table);
                run(redraw.clone(), async move { table.dialog_action(kind, &action).await });
            })
        };
        let on_dismiss = {
            let table = Rc::clone(&table);
            let redraw = redraw.clone();
            Callback::from(move |()| {
                table.dialog_dismiss(kind);
                redraw.emit(());
            })
        };
        html! { <DialogForm {view} {on_input} {on_action} {on_dismiss} /> }
    };

    html! {
        <div class="pki-table" id={frame.name().to_string()}>
            <div class="pki-table-toolbar">
                <input name="search" class="input" placeholder="Search" onkeydown={on_search} />
                <button name="add" class="btn" onclick={on_add}>{"Add"}</button>
                <button name="remove" class="btn" onclick={on_remove}>{"Remove"}</button>
            </div>
            <table class="table">
                <thead><tr>{ for headers }</tr></thead>
                <tbody>{ for rows }</tbody>
            </table>
            <div class="pki-table-footer">
                <span name="totalEntries">{frame.total_entries().to_string()}</span>{" entries"}
                <div class="pagination">
                    { pager(PageStep::First) }
                    { pager(PageStep::Prev) }
                    <input name="page" class="input" value={frame.page_field()} onkeydown={on_page} />
                    {" of "}<span name="totalPages">{frame.total_pages().to_string()}</span>
                    { pager(PageStep::Next) }
                    { pager(PageStep::Last) }
                </div>
            </div>
            { dialog(DialogKind::Add) }
            { dialog(DialogKind::Edit) }
        </div>
    }
}
