use yew::prelude::*;

use super::icons::{icon_pencil, icon_trash};
use crate::format::format_currency;
use crate::view::{FilamentRow, SummaryTable};

const TH: &str = "px-4 py-3 text-left text-xs font-semibold uppercase tracking-wider text-slate-400";
const TD: &str = "px-4 py-3 text-sm text-slate-200";

pub fn summary_view(table: &SummaryTable) -> Html {
    html! {
        <div class="overflow-x-auto rounded-xl border border-slate-700 bg-slate-800">
            <table class="w-full">
                <thead class="border-b border-slate-700">
                    <tr>
                        <th class={TH}>{"Uploader"}</th>
                        <th class={TH}>{"Prints"}</th>
                        <th class={TH}>{"Open"}</th>
                        <th class={TH}>{"Paid"}</th>
                        <th class={TH}>{"Total"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-slate-700">
                    { for table.lines.iter().map(|line| html! {
                        <tr>
                            <td class={TD}>{ line.uploader.clone() }</td>
                            <td class={TD}>{ line.prints }</td>
                            <td class={classes!(TD, "text-red-300")}>{ format_currency(line.open) }</td>
                            <td class={classes!(TD, "text-emerald-300")}>{ format_currency(line.paid) }</td>
                            <td class={TD} title={line.diverges.then_some("Recomputed from open + paid")}>
                                { format_currency(line.total) }
                                if line.diverges { <span class="ml-1 text-amber-400">{"*"}</span> }
                            </td>
                        </tr>
                    }) }
                </tbody>
                <tfoot class="border-t-2 border-slate-600 font-bold">
                    <tr>
                        <td class={TD}>{"Total"}</td>
                        <td class={TD}>{ table.totals.prints }</td>
                        <td class={classes!(TD, "text-red-300")}>{ format_currency(table.totals.open) }</td>
                        <td class={classes!(TD, "text-emerald-300")}>{ format_currency(table.totals.paid) }</td>
                        <td class={TD}>{ format_currency(table.totals.total) }</td>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}

pub fn filament_view(
    rows: &[FilamentRow],
    on_edit: &Callback<i64>,
    on_delete: &Callback<i64>,
) -> Html {
    html! {
        <div class="overflow-x-auto rounded-xl border border-slate-700 bg-slate-800">
            <table class="w-full">
                <thead class="border-b border-slate-700">
                    <tr>
                        <th class={TH}>{"Name"}</th>
                        <th class={TH}>{"Price"}</th>
                        <th class={TH}></th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-slate-700">
                    { for rows.iter().map(|row| {
                        let id = row.id;
                        let on_edit = on_edit.clone();
                        let on_delete = on_delete.clone();
                        html! {
                            <tr key={id}>
                                <td class={TD}>{ row.name.clone() }</td>
                                <td class={TD}>{ row.price_per_kg.clone() }</td>
                                <td class={classes!(TD, "text-right", "space-x-2")}>
                                    <button type="button" class="inline-flex items-center gap-1 rounded-lg bg-slate-600 px-3 py-1 text-xs hover:bg-slate-500"
                                        onclick={Callback::from(move |_| on_edit.emit(id))}>
                                        { icon_pencil() }{"Edit"}
                                    </button>
                                    <button type="button" class="inline-flex items-center gap-1 rounded-lg bg-red-600/80 px-3 py-1 text-xs hover:bg-red-600"
                                        onclick={Callback::from(move |_| on_delete.emit(id))}>
                                        { icon_trash() }{"Delete"}
                                    </button>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        </div>
    }
}
