use yew::prelude::*;

use super::icons::icon_x;

fn backdrop_close(on_close: &Callback<()>) -> Callback<MouseEvent> {
    let on_close = on_close.clone();
    Callback::from(move |_| on_close.emit(()))
}

fn keep_open() -> Callback<MouseEvent> {
    Callback::from(|e: MouseEvent| e.stop_propagation())
}

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: &'static str,
    pub on_close: Callback<()>,
    pub children: Children,
}

/// Dialog closed by its close button or a click on the backdrop.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    html! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/70 p-4" onclick={backdrop_close(&props.on_close)}>
            <div class="w-full max-w-lg rounded-2xl border border-slate-700 bg-slate-800 p-6 shadow-xl" role="dialog" onclick={keep_open()}>
                <div class="mb-4 flex items-center justify-between">
                    <h2 class="text-lg font-bold text-slate-100">{ props.title }</h2>
                    <button type="button" class="text-slate-400 hover:text-white" aria-label="Close" onclick={backdrop_close(&props.on_close)}>
                        { icon_x() }
                    </button>
                </div>
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LightboxProps {
    pub src: String,
    pub on_close: Callback<()>,
}

#[function_component(Lightbox)]
pub fn lightbox(props: &LightboxProps) -> Html {
    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/90 p-4" onclick={backdrop_close(&props.on_close)}>
            <button type="button" class="absolute top-4 right-4 text-slate-300 hover:text-white" aria-label="Close" onclick={backdrop_close(&props.on_close)}>
                { icon_x() }
            </button>
            <img src={props.src.clone()} alt="Print" class="max-h-[90vh] max-w-[90vw] rounded-lg object-contain" onclick={keep_open()} />
        </div>
    }
}
