use yew::prelude::*;

use super::icons::{icon_link, icon_pencil, icon_trash};
use crate::config::PLACEHOLDER_GLYPH;
use crate::models::PaymentStatus;
use crate::view::{ImageSlot, PrintCard};

#[derive(Properties, PartialEq)]
pub struct PrintImageProps {
    pub slot: ImageSlot,
    pub alt: String,
    pub on_open: Callback<String>,
}

/// Photo of a print; falls back to the placeholder glyph when the reference
/// is missing or the image fails to load.
#[function_component(PrintImage)]
pub fn print_image(props: &PrintImageProps) -> Html {
    let broken = use_state(|| false);

    {
        let broken = broken.clone();
        use_effect_with_deps(
            move |_| {
                broken.set(false);
                || ()
            },
            props.slot.clone(),
        );
    }

    match (&props.slot, *broken) {
        (ImageSlot::Photo(src), false) => {
            let on_error = {
                let broken = broken.clone();
                Callback::from(move |_: Event| broken.set(true))
            };
            let on_click = {
                let on_open = props.on_open.clone();
                let src = src.clone();
                Callback::from(move |_| on_open.emit(src.clone()))
            };
            html! {
                <img
                    src={src.clone()}
                    alt={props.alt.clone()}
                    loading="lazy"
                    class="h-48 w-full cursor-zoom-in object-cover"
                    onerror={on_error}
                    onclick={on_click}
                />
            }
        }
        _ => html! {
            <div class="flex h-48 w-full items-center justify-center bg-slate-700 text-5xl" aria-label="No image">
                { PLACEHOLDER_GLYPH }
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct PrintCardViewProps {
    pub card: PrintCard,
    pub on_image: Callback<String>,
    #[prop_or_default]
    pub on_edit: Option<Callback<i64>>,
    #[prop_or_default]
    pub on_toggle: Option<Callback<(i64, PaymentStatus)>>,
    #[prop_or_default]
    pub on_delete: Option<Callback<i64>>,
}

#[function_component(PrintCardView)]
pub fn print_card_view(props: &PrintCardViewProps) -> Html {
    let card = &props.card;
    let id = card.id;

    let controls = match &card.admin {
        Some(admin) => {
            let to = admin.toggle_to;
            let on_edit = props.on_edit.clone();
            let on_toggle = props.on_toggle.clone();
            let on_delete = props.on_delete.clone();
            html! {
                <div class="flex gap-2 pt-3">
                    <button type="button" class="flex items-center gap-1 rounded-lg bg-slate-700 px-3 py-1 text-xs hover:bg-slate-600"
                        onclick={Callback::from(move |_| if let Some(cb) = &on_edit { cb.emit(id) })}>
                        { icon_pencil() }{"Edit"}
                    </button>
                    <button type="button" class={admin.toggle_class}
                        onclick={Callback::from(move |_| if let Some(cb) = &on_toggle { cb.emit((id, to)) })}>
                        { admin.toggle_label }
                    </button>
                    <button type="button" class="flex items-center gap-1 rounded-lg bg-red-600/80 px-3 py-1 text-xs hover:bg-red-600"
                        onclick={Callback::from(move |_| if let Some(cb) = &on_delete { cb.emit(id) })}>
                        { icon_trash() }{"Delete"}
                    </button>
                </div>
            }
        }
        None => html! {},
    };

    html! {
        <article class="overflow-hidden rounded-xl border border-slate-700 bg-slate-800 shadow-sm">
            <PrintImage slot={card.image.clone()} alt={card.title.clone()} on_open={props.on_image.clone()} />
            <div class="space-y-1 p-4 text-sm">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="text-base font-bold text-slate-100">{ card.title.clone() }</h3>
                    <span class={card.badge.class}>{ card.badge.label }</span>
                </div>
                <p class="text-slate-400">{ format!("by {}", card.uploader) }</p>
                <p class="text-slate-300">{ format!("{} · {}", card.filament, card.grams) }</p>
                <p class="text-lg font-semibold text-emerald-400">{ card.price.clone() }</p>
                if let Some(created) = &card.created {
                    <p class="text-xs text-slate-500">{ created.clone() }</p>
                }
                if let Some(link) = &card.link {
                    <a href={link.clone()} target="_blank" rel="noopener noreferrer" class="inline-flex items-center gap-1 text-xs text-indigo-300 hover:text-indigo-200">
                        { icon_link() }{"Model link"}
                    </a>
                }
                { controls }
            </div>
        </article>
    }
}
