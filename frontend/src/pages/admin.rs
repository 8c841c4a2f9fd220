use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::PageProps;
use crate::components::error_banner::ErrorBanner;
use crate::components::forms::{input_value, select_value, SelectField, TextField};
use crate::components::icons::{icon_arrow_left, icon_log_out, icon_pencil, icon_plus, icon_refresh};
use crate::components::layout::{empty_line, page_shell, panel_view, tab_bar};
use crate::components::overlay::{Lightbox, Modal};
use crate::components::print_card::PrintCardView;
use crate::components::tables::{filament_view, summary_view};
use crate::controller::{
    AdminAction, AdminController, AdminState, AdminTab, EditDraft, FormField, WindowConfirm,
};
use crate::models::PaymentStatus;
use crate::session::Route;
use crate::view::{admin_grid, filament_options, filament_table, summary_table, Grid};

const TABS: [(AdminTab, &str); 3] = [
    (AdminTab::Prints, "Prints"),
    (AdminTab::Summary, "Summary"),
    (AdminTab::Filaments, "Filaments"),
];

const SELECT_CLASS: &str = "px-3 py-2 bg-slate-900 border border-slate-600 rounded-lg text-slate-100 text-sm";

fn filter_bar(state: &AdminState, dispatch: &Callback<AdminAction>) -> Html {
    let uploader = state.filters.uploader.clone().unwrap_or_default();
    let status = state.filters.status;
    html! {
        <div class="flex flex-wrap items-center gap-3">
            <select class={SELECT_CLASS} onchange={select_value(dispatch.reform(AdminAction::FilterUploader))}>
                <option value="" selected={uploader.is_empty()}>{"All"}</option>
                { for state.uploaders.iter().map(|name| html! {
                    <option value={name.clone()} selected={*name == uploader}>{ name.clone() }</option>
                }) }
            </select>
            <select class={SELECT_CLASS} onchange={select_value(dispatch.reform(AdminAction::FilterStatus))}>
                <option value="" selected={status.is_none()}>{"Any status"}</option>
                { for [PaymentStatus::Open, PaymentStatus::Paid].into_iter().map(|option| html! {
                    <option value={option.wire_value()} selected={status == Some(option)}>{ option.label() }</option>
                }) }
            </select>
            <button type="button" class="flex items-center gap-1 rounded-lg bg-slate-700 px-3 py-2 text-sm hover:bg-slate-600"
                onclick={dispatch.reform(|_: MouseEvent| AdminAction::Refresh)}>
                { icon_refresh() }{"Refresh"}
            </button>
        </div>
    }
}

fn prints_tab(state: &AdminState, dispatch: &Callback<AdminAction>) -> Html {
    let on_image = dispatch.reform(AdminAction::ShowImage);
    let on_edit = dispatch.reform(AdminAction::OpenEditor);
    let on_toggle =
        dispatch.reform(|(id, to): (i64, PaymentStatus)| AdminAction::ToggleStatus { id, to });
    let on_delete = dispatch.reform(AdminAction::DeletePrint);

    html! {
        <div class="space-y-4">
            { filter_bar(state, dispatch) }
            if let Some(notice) = state.notice.clone() {
                <ErrorBanner message={notice} on_close={dispatch.reform(|_: ()| AdminAction::DismissNotice)} />
            }
            { panel_view(&state.prints, |prints| match admin_grid(prints) {
                Grid::Empty(message) => empty_line(message),
                Grid::Items(cards) => html! {
                    <div class="grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3">
                        { for cards.into_iter().map(|card| html! {
                            <PrintCardView
                                key={card.id}
                                card={card.clone()}
                                on_image={on_image.clone()}
                                on_edit={Some(on_edit.clone())}
                                on_toggle={Some(on_toggle.clone())}
                                on_delete={Some(on_delete.clone())}
                            />
                        }) }
                    </div>
                },
            }) }
        </div>
    }
}

fn summary_tab(state: &AdminState) -> Html {
    panel_view(&state.summary, |rows| match summary_table(rows) {
        Grid::Empty(message) => empty_line(message),
        Grid::Items(table) => summary_view(&table),
    })
}

fn filaments_tab(state: &AdminState, dispatch: &Callback<AdminAction>) -> Html {
    let draft = &state.new_filament;
    let on_submit = dispatch.reform(|e: SubmitEvent| {
        e.prevent_default();
        AdminAction::SaveFilament
    });
    let on_edit = dispatch.reform(AdminAction::EditFilament);
    let on_delete = dispatch.reform(AdminAction::DeleteFilament);
    let input_class = "px-3 py-2 bg-slate-900 border border-slate-600 rounded-lg text-slate-100";

    html! {
        <div class="space-y-4">
            <form class="flex flex-wrap items-end gap-3 rounded-xl border border-slate-700 bg-slate-800 p-4" onsubmit={on_submit}>
                <input class={input_class} placeholder="Name, e.g. PLA"
                    value={draft.name.clone()} oninput={input_value(dispatch.reform(AdminAction::NewFilamentName))} />
                <input class={input_class} type="number" step="0.01" placeholder="Price per kg (CHF)"
                    value={draft.price.clone()} oninput={input_value(dispatch.reform(AdminAction::NewFilamentPrice))} />
                if draft.editing.is_some() {
                    <button type="submit" class="flex items-center gap-1 rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold hover:bg-indigo-400">
                        { icon_pencil() }{"Save changes"}
                    </button>
                    <button type="button" class="rounded-lg bg-slate-700 px-4 py-2 text-sm hover:bg-slate-600"
                        onclick={dispatch.reform(|_: MouseEvent| AdminAction::CancelFilamentEdit)}>
                        {"Cancel"}
                    </button>
                } else {
                    <button type="submit" class="flex items-center gap-1 rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold hover:bg-indigo-400">
                        { icon_plus() }{"Add filament"}
                    </button>
                }
            </form>
            if let Some(message) = draft.error.clone() {
                <ErrorBanner message={message} />
            }
            { panel_view(&state.filaments, |filaments| match filament_table(filaments) {
                Grid::Empty(message) => empty_line(message),
                Grid::Items(rows) => filament_view(&rows, &on_edit, &on_delete),
            }) }
        </div>
    }
}

fn edit_modal(draft: &EditDraft, state: &AdminState, dispatch: &Callback<AdminAction>) -> Html {
    let field =
        |field: FormField| dispatch.reform(move |value: String| AdminAction::Edit(field, value));
    let filaments = state.filaments.data.as_deref().unwrap_or_default();
    let on_submit = dispatch.reform(|e: SubmitEvent| {
        e.prevent_default();
        AdminAction::SubmitEdit
    });
    let on_cancel = dispatch.reform(|_: MouseEvent| AdminAction::CancelEdit);

    html! {
        <Modal title="Edit print" on_close={dispatch.reform(|_: ()| AdminAction::CancelEdit)}>
            <form class="space-y-4" onsubmit={on_submit}>
                <TextField label="Name" required=true value={draft.name.clone()} on_input={field(FormField::Name)} />
                <TextField label="Uploader" required=true value={draft.uploader.clone()} on_input={field(FormField::Uploader)} />
                <SelectField
                    label="Filament type"
                    placeholder="Choose filament..."
                    options={filament_options(filaments, draft.filament_type_id)}
                    on_change={field(FormField::Filament)}
                />
                <TextField label="Filament (grams)" kind="number" required=true value={draft.grams.clone()} on_input={field(FormField::Grams)} />
                <TextField label="Link" kind="url" value={draft.link.clone()} on_input={field(FormField::Link)} />
                <label class="block space-y-1">
                    <span class="text-sm font-medium text-slate-300">{"Payment status"}</span>
                    <select class={SELECT_CLASS} onchange={select_value(field(FormField::Status))}>
                        { for [PaymentStatus::Open, PaymentStatus::Paid].into_iter().map(|option| html! {
                            <option value={option.wire_value()} selected={draft.status == option}>{ option.label() }</option>
                        }) }
                    </select>
                </label>
                if let Some(message) = draft.error.clone() {
                    <ErrorBanner message={message} />
                }
                <div class="flex justify-end gap-2">
                    <button type="button" class="rounded-lg bg-slate-700 px-4 py-2 text-sm hover:bg-slate-600" onclick={on_cancel}>
                        {"Cancel"}
                    </button>
                    <button type="submit" class="rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold hover:bg-indigo-400" disabled={draft.saving}>
                        { if draft.saving { "Saving..." } else { "Save" } }
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[function_component(AdminPage)]
pub fn admin_page(props: &PageProps) -> Html {
    let force = use_force_update();
    let controller = {
        let ctx = props.ctx.clone();
        use_memo(
            move |_| {
                AdminController::new(
                    ctx.backend,
                    ctx.session,
                    Rc::new(WindowConfirm),
                    Rc::new(move || force.force_update()),
                )
            },
            (),
        )
    };

    let dispatch = {
        let controller = controller.clone();
        Callback::from(move |action: AdminAction| {
            let controller = controller.clone();
            spawn_local(async move { controller.dispatch(action).await });
        })
    };

    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                dispatch.emit(AdminAction::Start);
                || ()
            },
            (),
        );
    }

    let state = controller.snapshot();

    if !state.ready {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-slate-900 text-slate-400">
                {"Checking session..."}
            </div>
        };
    }

    let on_back = {
        let session = props.ctx.session.clone();
        Callback::from(move |_| session.navigate(Route::Public))
    };

    let content = match state.tab {
        AdminTab::Prints => prints_tab(&state, &dispatch),
        AdminTab::Summary => summary_tab(&state),
        AdminTab::Filaments => filaments_tab(&state, &dispatch),
    };

    page_shell(
        "Admin",
        html! {
            <div class="flex gap-2">
                <button type="button" class="flex items-center gap-2 rounded-lg bg-slate-700 px-3 py-2 text-sm hover:bg-slate-600" onclick={on_back}>
                    { icon_arrow_left() }{"Public view"}
                </button>
                <button type="button" class="flex items-center gap-2 rounded-lg bg-slate-700 px-3 py-2 text-sm hover:bg-slate-600"
                    onclick={dispatch.reform(|_: MouseEvent| AdminAction::Logout)}>
                    { icon_log_out() }{"Log out"}
                </button>
            </div>
        },
        html! {
            <>
                { tab_bar(&TABS, state.tab, &dispatch.reform(AdminAction::SelectTab)) }
                { content }
                if let Some(draft) = state.editor.as_ref() {
                    { edit_modal(draft, &state, &dispatch) }
                }
                if let Some(src) = state.lightbox.clone() {
                    <Lightbox src={src} on_close={dispatch.reform(|_: ()| AdminAction::CloseLightbox)} />
                }
            </>
        },
    )
}
