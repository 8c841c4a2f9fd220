use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::statistics::StatisticsTab;
use super::PageProps;
use crate::components::error_banner::{ErrorBanner, SuccessNotice};
use crate::components::forms::{file_value, SelectField, TextField};
use crate::components::icons::{icon_lock, icon_plus};
use crate::components::layout::{empty_line, page_shell, panel_view, tab_bar};
use crate::components::overlay::Lightbox;
use crate::components::print_card::PrintCardView;
use crate::controller::{FormField, PublicAction, PublicController, PublicState, PublicTab};
use crate::session::Route;
use crate::view::{filament_options, print_grid, Grid};

const TABS: [(PublicTab, &str); 3] = [
    (PublicTab::Submit, "Submit print"),
    (PublicTab::Prints, "All prints"),
    (PublicTab::Statistics, "Statistics"),
];

fn submit_tab(state: &PublicState, dispatch: &Callback<PublicAction>) -> Html {
    let draft = &state.draft;
    let field = |field: FormField| {
        dispatch.reform(move |value: String| PublicAction::Draft(field, value))
    };
    let filaments = state.filaments.data.as_deref().unwrap_or_default();
    let on_submit = dispatch.reform(|e: SubmitEvent| {
        e.prevent_default();
        PublicAction::Submit
    });
    let on_file = file_value(dispatch.reform(PublicAction::AttachImage));

    html! {
        <form class="max-w-xl space-y-4 rounded-xl border border-slate-700 bg-slate-800 p-6" onsubmit={on_submit}>
            <TextField label="Name" required=true value={draft.name.clone()} on_input={field(FormField::Name)} />
            <TextField label="Uploader" required=true value={draft.uploader.clone()} on_input={field(FormField::Uploader)} />
            <SelectField
                label="Filament type"
                placeholder="Choose filament..."
                options={filament_options(filaments, draft.filament_type_id)}
                on_change={field(FormField::Filament)}
            />
            <TextField label="Filament (grams)" kind="number" required=true value={draft.grams.clone()} on_input={field(FormField::Grams)} />
            <TextField label="Link" kind="url" placeholder="https://" value={draft.link.clone()} on_input={field(FormField::Link)} />
            <label class="block space-y-1">
                <span class="text-sm font-medium text-slate-300">{"Image"}</span>
                <input
                    key={draft.generation.to_string()}
                    type="file"
                    accept="image/*"
                    class="block w-full text-sm text-slate-300"
                    onchange={on_file}
                />
            </label>
            if let Some(message) = &draft.error {
                <ErrorBanner message={message.clone()} />
            }
            if let Some(message) = &draft.success {
                <SuccessNotice message={message.clone()} />
            }
            <button
                type="submit"
                class="flex items-center gap-2 rounded-lg bg-indigo-500 px-4 py-2 font-semibold hover:bg-indigo-400"
                disabled={draft.submitting}
            >
                { icon_plus() }
                { if draft.submitting { "Saving..." } else { "Submit" } }
            </button>
        </form>
    }
}

fn prints_tab(state: &PublicState, dispatch: &Callback<PublicAction>) -> Html {
    let on_image = dispatch.reform(PublicAction::ShowImage);
    panel_view(&state.prints, |prints| match print_grid(prints) {
        Grid::Empty(message) => empty_line(message),
        Grid::Items(cards) => html! {
            <div class="grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3">
                { for cards.into_iter().map(|card| html! {
                    <PrintCardView key={card.id} card={card.clone()} on_image={on_image.clone()} />
                }) }
            </div>
        },
    })
}

#[function_component(PublicPage)]
pub fn public_page(props: &PageProps) -> Html {
    let force = use_force_update();
    let controller = {
        let backend = props.ctx.backend.clone();
        use_memo(
            move |_| PublicController::new(backend, Rc::new(move || force.force_update())),
            (),
        )
    };

    let dispatch = {
        let controller = controller.clone();
        Callback::from(move |action: PublicAction| {
            let controller = controller.clone();
            spawn_local(async move { controller.dispatch(action).await });
        })
    };

    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                dispatch.emit(PublicAction::Start);
                || ()
            },
            (),
        );
    }

    let state = controller.snapshot();

    let on_admin = {
        let session = props.ctx.session.clone();
        Callback::from(move |_| {
            let route = if session.token().is_some() {
                Route::Admin
            } else {
                Route::Login
            };
            session.navigate(route);
        })
    };

    let content = match state.tab {
        PublicTab::Submit => submit_tab(&state, &dispatch),
        PublicTab::Prints => prints_tab(&state, &dispatch),
        PublicTab::Statistics => html! {
            <StatisticsTab
                statistics={state.statistics.clone()}
                range={state.range.clone()}
                revision={state.stats_revision}
                dispatch={dispatch.clone()}
            />
        },
    };

    page_shell(
        "🖨️ 3D print costs",
        html! {
            <button type="button" class="flex items-center gap-2 rounded-lg bg-slate-700 px-3 py-2 text-sm hover:bg-slate-600" onclick={on_admin}>
                { icon_lock() }{"Admin"}
            </button>
        },
        html! {
            <>
                { tab_bar(&TABS, state.tab, &dispatch.reform(PublicAction::SelectTab)) }
                { content }
                if let Some(src) = state.lightbox.clone() {
                    <Lightbox src={src} on_close={dispatch.reform(|_: ()| PublicAction::CloseLightbox)} />
                }
            </>
        },
    )
}

