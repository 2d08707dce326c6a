//! Modal form view.

use crate::core::dialog::DialogView;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DialogFormProps {
    pub(crate) view: DialogView,
    /// `(field, text)` on every keystroke.
    #[prop_or_default]
    pub(crate) on_input: Callback<(String, String)>,
    /// Button name on click.
    #[prop_or_default]
    pub(crate) on_action: Callback<String>,
    /// Header close control.
    #[prop_or_default]
    pub(crate) on_dismiss: Callback<()>,
}

#[function_component(DialogForm)]
pub(crate) fn dialog_form(props: &DialogFormProps) -> Html {
    let view = &props.view;
    let classes = classes!("modal", view.open.then_some("modal-open"));
    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    let fields = view.fields.iter().map(|field| {
        let name = field.name.clone();
        let on_input = props.on_input.clone();
        let oninput = Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit((name.clone(), input.value()));
        });
        html! {
            <label class="form-control">
                <span class="label-text">{field.name.clone()}</span>
                <input
                    class="input input-bordered"
                    name={field.name.clone()}
                    value={field.value.clone()}
                    readonly={field.readonly}
                    {oninput}
                />
            </label>
        }
    });

    let buttons = view.buttons.iter().filter(|button| button.visible).map(|button| {
        let name = button.name.clone();
        let on_action = props.on_action.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_action.emit(name.clone()));
        html! {
            <button class="btn" name={button.name.clone()} {onclick}>{button.name.clone()}</button>
        }
    });

    html! {
        <div class={classes} role="dialog" aria-modal="true">
            <div class="modal-box">
                <div class="modal-header">
                    <h3 class="modal-title">{view.title.clone().unwrap_or_default()}</h3>
                    <button class="close" aria-label="close" onclick={on_dismiss}>{"×"}</button>
                </div>
                <div class="modal-body">{ for fields }</div>
                <div class="modal-action">{ for buttons }</div>
            </div>
        </div>
    }
}
