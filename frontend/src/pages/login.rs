use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::PageProps;
use crate::components::error_banner::ErrorBanner;
use crate::components::forms::TextField;
use crate::components::icons::icon_arrow_left;
use crate::controller::{LoginAction, LoginController};

#[function_component(LoginPage)]
pub fn login_page(props: &PageProps) -> Html {
    let force = use_force_update();
    let controller = {
        let ctx = props.ctx.clone();
        use_memo(
            move |_| {
                LoginController::new(
                    ctx.backend,
                    ctx.session,
                    std::rc::Rc::new(move || force.force_update()),
                )
            },
            (),
        )
    };

    let dispatch = {
        let controller = controller.clone();
        Callback::from(move |action: LoginAction| {
            let controller = controller.clone();
            spawn_local(async move { controller.dispatch(action).await });
        })
    };

    let state = controller.snapshot();
    let on_submit = dispatch.reform(|e: SubmitEvent| {
        e.prevent_default();
        LoginAction::Submit
    });

    html! {
        <div class="min-h-screen flex items-center justify-center bg-slate-900 text-slate-100">
            <div class="w-full max-w-md bg-slate-800 border border-slate-700 rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold">{"Admin login"}</h1>
                    <p class="text-sm text-slate-400 mt-2">{"Sign in to manage prints and filaments."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <TextField label="Username" value={state.username.clone()} on_input={dispatch.reform(LoginAction::Username)} />
                    <TextField label="Password" kind="password" value={state.password.clone()} on_input={dispatch.reform(LoginAction::Password)} />

                    if let Some(message) = state.error.clone() {
                        <ErrorBanner message={message} />
                    }

                    <button
                        type="submit"
                        class="w-full bg-indigo-500 py-2 rounded-lg font-semibold hover:bg-indigo-400 transition-colors"
                        disabled={state.busy}
                    >
                        { if state.busy { "Please wait..." } else { "Login" } }
                    </button>
                </form>

                <div class="mt-6 text-center">
                    <button type="button" class="inline-flex items-center gap-1 text-sm text-slate-400 hover:text-white"
                        onclick={dispatch.reform(|_: MouseEvent| LoginAction::Back)}>
                        { icon_arrow_left() }{"Back to the public view"}
                    </button>
                </div>
            </div>
        </div>
    }
}
