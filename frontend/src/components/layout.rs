use yew::prelude::*;

use super::error_banner::ErrorBanner;
use crate::controller::Panel;

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="min-h-screen bg-slate-900 text-slate-100">
            <div class="p-6 max-w-7xl mx-auto">
                <div class="flex items-center justify-between pb-4 border-b border-slate-700">
                    <h1 class="text-2xl font-bold">{ title }</h1>
                    { actions }
                </div>
                <div class="pt-5 space-y-6">
                    { children }
                </div>
            </div>
        </div>
    }
}

/// A row of tab buttons; exactly one is marked active.
pub fn tab_bar<T>(tabs: &[(T, &'static str)], active: T, on_select: &Callback<T>) -> Html
where
    T: Copy + PartialEq + 'static,
{
    html! {
        <nav class="flex gap-2 border-b border-slate-700 pb-2" role="tablist">
            { for tabs.iter().map(|(tab, label)| {
                let tab = *tab;
                let class_name = if tab == active {
                    "px-4 py-2 rounded-lg text-sm font-semibold bg-indigo-500 text-white"
                } else {
                    "px-4 py-2 rounded-lg text-sm font-medium text-slate-300 hover:bg-white/5 hover:text-white"
                };
                let on_select = on_select.clone();
                html! {
                    <button
                        type="button"
                        role="tab"
                        aria-selected={(tab == active).to_string()}
                        class={class_name}
                        onclick={Callback::from(move |_| on_select.emit(tab))}
                    >
                        { *label }
                    </button>
                }
            }) }
        </nav>
    }
}

pub fn loading_line() -> Html {
    html! { <p class="text-sm text-slate-400">{"Loading..."}</p> }
}

pub fn empty_line(message: &'static str) -> Html {
    html! { <p class="text-sm text-slate-400 py-8 text-center">{ message }</p> }
}

pub fn failed_line(message: &str) -> Html {
    html! {
        <div class="py-8 text-center">
            <p class="text-sm font-semibold text-red-300">{"Failed to load."}</p>
            <p class="text-xs text-slate-400 mt-1">{ message.to_string() }</p>
        </div>
    }
}

/// Body of a data panel: loading line before the first answer, an explicit
/// failed state when nothing ever loaded, otherwise the data with any
/// refresh error above it.
pub fn panel_view<T>(panel: &Panel<T>, render: impl FnOnce(&T) -> Html) -> Html {
    match (&panel.data, &panel.error) {
        (None, Some(message)) => failed_line(message),
        (None, None) => loading_line(),
        (Some(data), error) => html! {
            <>
                if let Some(message) = error {
                    <ErrorBanner message={message.clone()} />
                }
                { render(data) }
            </>
        },
    }
}
