use yew::prelude::*;

use crate::view;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub card: view::StatCard,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-slate-800 p-6 rounded-[10px] shadow-sm border border-slate-700 flex justify-between items-start">
            <div>
                <p class="text-slate-400 text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.card.title }</p>
                <h3 class="text-2xl font-bold text-slate-100 tracking-tight">{ props.card.value.clone() }</h3>
            </div>
            <div class="p-3 bg-slate-700 rounded-[10px] text-xl" aria-hidden="true">
                { props.card.icon }
            </div>
        </div>
    }
}
