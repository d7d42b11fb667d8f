use dioxus::prelude::*;

use crate::hooks::query::use_query_state;
use crate::hooks::remote::use_remote;
use crate::models::{cell_text, DashboardSummary, Page, Row};
use crate::query::screen::Column;
use crate::query::{PanelData, PanelSpec, PanelView, Pager, ParamSet, ResourceQuery};
use crate::APP_CONFIG;

const SIZE_CHOICES: [u32; 4] = [10, 20, 50, 100];
const PAGER_BUTTON_CLASS: &str =
    "rounded border border-slate-300 px-3 py-1 text-xs text-slate-700 disabled:opacity-40";

fn default_page_size() -> u32 {
    APP_CONFIG.get().map(|config| config.page_size).unwrap_or(20)
}

#[component]
pub fn PanelHost(
    panel: &'static PanelSpec,
    #[props(!optional)] path_id: Option<String>,
    params: ParamSet,
) -> Element {
    let pager = Pager::new(default_page_size());
    let query = ResourceQuery::for_panel(panel, path_id.as_deref(), &params, &pager);

    match &panel.view {
        PanelView::Table(columns) => rsx! {
            ResourceTable {
                query,
                columns: *columns,
                page: pager.page(&params),
                size: pager.size(&params),
            }
        },
        PanelView::Metrics => rsx! {
            MetricsPanel { query }
        },
    }
}

#[component]
pub fn ResourceTable(
    query: ResourceQuery,
    columns: &'static [Column],
    page: u32,
    size: u32,
) -> Element {
    let snapshot = use_remote::<Page<Row>>(query);

    let body = match snapshot {
        PanelData::Idle | PanelData::Loading => rsx! {
            p { class: "text-xs text-slate-500", "Loading…" }
        },
        PanelData::Failed(message) => rsx! {
            p { class: "text-xs text-red-500", "Could not load data: {message}" }
        },
        PanelData::Loaded(result) => {
            let total_pages = result.total_pages(size);
            let table = if result.results.is_empty() {
                rsx! {
                    p { class: "text-xs text-slate-500 italic", "No records" }
                }
            } else {
                rsx! {
                    table { class: "min-w-full divide-y divide-slate-200 text-sm",
                        thead { class: "bg-slate-50",
                            tr {
                                {columns.iter().map(|column| rsx! {
                                    th {
                                        key: "{column.field}",
                                        class: "px-3 py-2 text-left text-xs font-semibold text-slate-600",
                                        "{column.label}"
                                    }
                                })}
                            }
                        }
                        tbody { class: "divide-y divide-slate-100",
                            {result.results.iter().enumerate().map(|(idx, row)| rsx! {
                                tr { key: "{idx}",
                                    {columns.iter().map(|column| {
                                        let text = cell_text(row, column.field);
                                        rsx! {
                                            td { key: "{column.field}", class: "px-3 py-2 text-slate-700", "{text}" }
                                        }
                                    })}
                                }
                            })}
                        }
                    }
                }
            };

            rsx! {
                {table}
                PagerControls { page, total_pages, size, count: result.count }
            }
        }
    };

    rsx! {
        div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white p-3 shadow-sm space-y-3",
            {body}
        }
    }
}

/// Owns `page`/`size`; never touches the other filters.
#[component]
pub fn PagerControls(page: u32, total_pages: u64, size: u32, count: u64) -> Element {
    let query = use_query_state();
    let pager = Pager::new(default_page_size());
    let (shown, total) = pager.position(page, total_pages);
    let has_prev = shown > 1;
    let has_next = shown < total;
    let shown_page = u32::try_from(shown).unwrap_or(u32::MAX);

    let on_prev = {
        let query = query.clone();
        move |_: MouseEvent| query.write(pager.go_to(shown_page.saturating_sub(1)))
    };
    let on_next = {
        let query = query.clone();
        move |_: MouseEvent| query.write(pager.go_to(shown_page.saturating_add(1)))
    };
    let on_size = move |evt: FormEvent| {
        if let Ok(size) = evt.value().parse::<u32>() {
            query.write(pager.resize(size));
        }
    };

    rsx! {
        div { class: "flex flex-wrap items-center justify-between gap-2 text-xs text-slate-600",
            span { "{count} records · page {shown} of {total}" }
            div { class: "flex items-center gap-2",
                button { class: PAGER_BUTTON_CLASS, disabled: !has_prev, onclick: on_prev, "Previous" }
                button { class: PAGER_BUTTON_CLASS, disabled: !has_next, onclick: on_next, "Next" }
                select {
                    class: "rounded border border-slate-300 px-2 py-1",
                    value: "{size}",
                    onchange: on_size,
                    {SIZE_CHOICES.iter().map(|choice| rsx! {
                        option { key: "{choice}", value: "{choice}", selected: *choice == size, "{choice} / page" }
                    })}
                }
            }
        }
    }
}

#[component]
pub fn MetricsPanel(query: ResourceQuery) -> Element {
    let snapshot = use_remote::<DashboardSummary>(query);

    match snapshot {
        PanelData::Idle | PanelData::Loading => rsx! {
            p { class: "text-xs text-slate-500", "Loading metrics…" }
        },
        PanelData::Failed(message) => rsx! {
            p { class: "text-xs text-red-500", "Could not load metrics: {message}" }
        },
        PanelData::Loaded(summary) => rsx! {
            div { class: "grid gap-3 md:grid-cols-3",
                MetricCard { label: "Revenue", value: format!("{:.2}", summary.revenue) }
                MetricCard { label: "Expenses", value: format!("{:.2}", summary.expenses) }
                MetricCard { label: "Profit", value: format!("{:.2}", summary.profit()) }
                MetricCard { label: "Orders", value: summary.orders_count.to_string() }
                MetricCard { label: "Clients", value: summary.clients_count.to_string() }
                if let Some(check) = summary.average_check.clone() {
                    MetricCard { label: "Average check", value: check }
                }
            }
        },
    }
}

#[component]
fn MetricCard(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
            p { class: "text-xs text-slate-500", "{label}" }
            p { class: "text-lg font-semibold text-slate-900", "{value}" }
        }
    }
}
