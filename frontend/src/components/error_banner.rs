use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
}

/// Inline failure message for a panel or form. Stays until dismissed or
/// replaced; the panel's previous content is still shown below it.
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    if props.message.trim().is_empty() {
        return Html::default();
    }

    html! {
        <div class="flex items-start gap-3 rounded-xl border border-red-500/40 bg-red-500/10 px-4 py-3 text-sm text-red-300" role="alert">
            <span aria-hidden="true">{"⚠️"}</span>
            <p class="flex-1">{ props.message.clone() }</p>
            if let Some(on_close) = props.on_close.clone() {
                <button
                    type="button"
                    class="text-red-300 hover:text-white"
                    aria-label="Dismiss"
                    onclick={Callback::from(move |_| on_close.emit(()))}
                >
                    {"×"}
                </button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: String,
}

#[function_component(SuccessNotice)]
pub fn success_notice(props: &NoticeProps) -> Html {
    html! {
        <div class="rounded-xl border border-emerald-500/40 bg-emerald-500/10 px-4 py-3 text-sm text-emerald-300" role="status">
            { props.message.clone() }
        </div>
    }
}
