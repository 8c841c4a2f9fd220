use log::debug;
use yew::prelude::*;

use crate::charts::{CanvasSurface, ChartAdapter, ChartRegion};
use crate::components::forms::input_value;
use crate::components::icons::icon_refresh;
use crate::components::layout::panel_view;
use crate::components::stat_card::StatCard;
use crate::controller::{Panel, PublicAction};
use crate::models::{DateRange, StatisticsBundle};
use crate::view::stat_cards;

#[derive(Properties, PartialEq)]
struct ChartGridProps {
    bundle: StatisticsBundle,
    revision: u64,
}

/// Canvases for every chart region. Charts are redrawn whenever the
/// revision moves and destroyed when the grid unmounts.
#[function_component(ChartGrid)]
fn chart_grid(props: &ChartGridProps) -> Html {
    let adapter = use_mut_ref(|| ChartAdapter::new(CanvasSurface));

    {
        let adapter = adapter.clone();
        let bundle = props.bundle.clone();
        use_effect_with_deps(
            move |revision| {
                let live = adapter.borrow_mut().render_bundle(&bundle);
                debug!("statistics revision {}: {} charts live", revision, live);
                || ()
            },
            props.revision,
        );
    }

    {
        let adapter = adapter.clone();
        use_effect_with_deps(move |_| move || adapter.borrow_mut().clear(), ());
    }

    html! {
        <div class="grid grid-cols-1 gap-6 lg:grid-cols-2">
            { for ChartRegion::ALL.iter().map(|region| {
                let wide = *region == ChartRegion::FilamentOverTime;
                html! {
                    <div class={classes!("rounded-xl", "border", "border-slate-700", "bg-slate-800", "p-4", wide.then_some("lg:col-span-2"))}>
                        <h3 class="mb-3 text-sm font-semibold text-slate-300">{ region.title() }</h3>
                        <div class="relative">
                            <canvas id={region.canvas_id()}></canvas>
                            if !region.has_data(&props.bundle) {
                                <p class="absolute inset-0 flex items-center justify-center text-sm text-slate-500">
                                    {"No data for this period"}
                                </p>
                            }
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatisticsTabProps {
    pub statistics: Panel<StatisticsBundle>,
    pub range: DateRange,
    pub revision: u64,
    pub dispatch: Callback<PublicAction>,
}

#[function_component(StatisticsTab)]
pub fn statistics_tab(props: &StatisticsTabProps) -> Html {
    let dispatch = &props.dispatch;
    let on_start = input_value(dispatch.reform(PublicAction::RangeStart));
    let on_end = input_value(dispatch.reform(PublicAction::RangeEnd));
    let on_apply = dispatch.reform(|_: MouseEvent| PublicAction::ApplyRange);
    let on_reset = dispatch.reform(|_: MouseEvent| PublicAction::ResetRange);

    let date_class = "px-3 py-2 bg-slate-900 border border-slate-600 rounded-lg text-slate-100";

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-end gap-3 rounded-xl border border-slate-700 bg-slate-800 p-4">
                <label class="space-y-1">
                    <span class="block text-xs text-slate-400">{"From"}</span>
                    <input type="date" class={date_class} value={props.range.start.clone().unwrap_or_default()} oninput={on_start} />
                </label>
                <label class="space-y-1">
                    <span class="block text-xs text-slate-400">{"To"}</span>
                    <input type="date" class={date_class} value={props.range.end.clone().unwrap_or_default()} oninput={on_end} />
                </label>
                <button type="button" class="rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold hover:bg-indigo-400" onclick={on_apply}>
                    {"Apply"}
                </button>
                <button type="button" class="flex items-center gap-1 rounded-lg bg-slate-700 px-4 py-2 text-sm hover:bg-slate-600" onclick={on_reset}>
                    { icon_refresh() }{"Reset"}
                </button>
                if props.statistics.loading {
                    <span class="text-xs text-slate-400">{"Loading..."}</span>
                }
            </div>

            { panel_view(&props.statistics, |bundle| html! {
                <>
                    <div class="grid grid-cols-1 gap-4 md:grid-cols-2 xl:grid-cols-4">
                        { for stat_cards(&bundle.total_stats).into_iter().map(|card| html! { <StatCard card={card} /> }) }
                    </div>
                    <ChartGrid bundle={bundle.clone()} revision={props.revision} />
                </>
            }) }
        </div>
    }
}
