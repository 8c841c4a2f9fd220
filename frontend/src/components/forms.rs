use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::view::SelectOption;

pub fn input_value(on_value: Callback<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_value.emit(input.value());
    })
}

pub fn select_value(on_value: Callback<String>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        on_value.emit(select.value());
    })
}

/// First file of a file input, or `None` when the selection was cleared.
pub fn file_value(on_file: Callback<Option<web_sys::File>>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_file.emit(input.files().and_then(|files| files.get(0)));
    })
}

const INPUT_CLASS: &str = "w-full px-3 py-2 bg-slate-900 border border-slate-600 rounded-lg text-slate-100 focus:outline-none focus:ring-2 focus:ring-indigo-500";

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: &'static str,
    pub value: String,
    pub on_input: Callback<String>,
    #[prop_or("text")]
    pub kind: &'static str,
    #[prop_or_default]
    pub placeholder: &'static str,
    #[prop_or_default]
    pub required: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    html! {
        <label class="block space-y-1">
            <span class="text-sm font-medium text-slate-300">
                { props.label }
                if props.required { <span class="text-red-400">{" *"}</span> }
            </span>
            <input
                type={props.kind}
                class={INPUT_CLASS}
                step={(props.kind == "number").then_some("any")}
                placeholder={props.placeholder}
                value={props.value.clone()}
                oninput={input_value(props.on_input.clone())}
            />
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectFieldProps {
    pub label: &'static str,
    pub options: Vec<SelectOption>,
    /// Shown first with an empty value.
    pub placeholder: &'static str,
    pub on_change: Callback<String>,
}

#[function_component(SelectField)]
pub fn select_field(props: &SelectFieldProps) -> Html {
    let nothing_selected = !props.options.iter().any(|o| o.selected);
    html! {
        <label class="block space-y-1">
            <span class="text-sm font-medium text-slate-300">{ props.label }</span>
            <select class={INPUT_CLASS} onchange={select_value(props.on_change.clone())}>
                <option value="" selected={nothing_selected}>{ props.placeholder }</option>
                { for props.options.iter().map(|option| html! {
                    <option value={option.value.clone()} selected={option.selected}>
                        { option.label.clone() }
                    </option>
                }) }
            </select>
        </label>
    }
}
