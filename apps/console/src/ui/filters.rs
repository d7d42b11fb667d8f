use dioxus::prelude::*;

use crate::hooks::query::use_query_state;
use crate::hooks::search::{use_search_writer, SearchEvent};
use crate::query::params::{PERIOD, TYPE};
use crate::query::widgets::{format_date, parse_date, PERIOD_OPTIONS, SERVICE_TYPES};
use crate::query::{DateRangePicker, FilterKind, OptionSwitcher, ScreenDescriptor, SearchBox};

const CHIP_BASE_CLASS: &str = "px-3 py-1 rounded-full border text-xs transition-colors";
const CHIP_ACTIVE_CLASS: &str = "bg-slate-900 text-white border-slate-900";
const CHIP_INACTIVE_CLASS: &str = "bg-white text-slate-700 border-slate-200 hover:border-slate-400";
const INPUT_CLASS: &str = "rounded border border-slate-300 px-2 py-1 text-xs text-slate-700";

/// The widgets a screen declares, each bound to its own keys only.
#[component]
pub fn FilterBar(descriptor: &'static ScreenDescriptor) -> Element {
    rsx! {
        div { class: "flex flex-wrap items-center gap-3 rounded-lg border border-slate-200 bg-white p-3 shadow-sm",
            if descriptor.shows(FilterKind::Type) {
                SwitcherBar { switcher: OptionSwitcher::new(TYPE, SERVICE_TYPES) }
            }
            if descriptor.shows(FilterKind::Period) {
                SwitcherBar { switcher: OptionSwitcher::new(PERIOD, PERIOD_OPTIONS) }
            }
            if descriptor.shows(FilterKind::DateRange) {
                DateRangeFilter {}
            }
            if descriptor.shows(FilterKind::Search) {
                SearchFilter {}
            }
        }
    }
}

#[component]
pub fn SwitcherBar(switcher: OptionSwitcher) -> Element {
    let query = use_query_state();
    let current = switcher.current(&query.params()).map(|option| option.link);

    let on_key = {
        let query = query.clone();
        move |evt: KeyboardEvent| {
            if evt.key() == Key::ArrowRight {
                if let Some(patch) = switcher.cycle(&query.params()) {
                    query.write(patch);
                }
            }
        }
    };

    rsx! {
        div { class: "flex flex-wrap gap-2", tabindex: "0", onkeydown: on_key,
            {switcher.options().iter().map(|option| {
                let query = query.clone();
                let state_class = if current == Some(option.link) {
                    CHIP_ACTIVE_CLASS
                } else {
                    CHIP_INACTIVE_CLASS
                };
                rsx! {
                    button {
                        key: "{option.link}",
                        class: "{CHIP_BASE_CLASS} {state_class}",
                        onclick: move |_| {
                            if let Some(patch) = switcher.select(option.link) {
                                query.write(patch);
                            }
                        },
                        "{option.name}"
                    }
                }
            })}
        }
    }
}

#[component]
pub fn DateRangeFilter() -> Element {
    let query = use_query_state();
    let picker = DateRangePicker;
    let range = picker.read(&query.params());
    let start = range.map(|range| range.start);
    let end = range.map(|range| range.end);
    let start_value = start.map(format_date).unwrap_or_default();
    let end_value = end.map(format_date).unwrap_or_default();

    let on_start = {
        let query = query.clone();
        move |evt: FormEvent| query.write(picker.select(parse_date(&evt.value()), end))
    };
    let on_end = {
        let query = query.clone();
        move |evt: FormEvent| query.write(picker.select(start, parse_date(&evt.value())))
    };
    let on_clear = move |_: MouseEvent| query.write(picker.clear());

    rsx! {
        div { class: "flex items-center gap-2 text-xs text-slate-600",
            input { r#type: "date", class: INPUT_CLASS, value: "{start_value}", onchange: on_start }
            span { "—" }
            input { r#type: "date", class: INPUT_CLASS, value: "{end_value}", onchange: on_end }
            if range.is_some() {
                button {
                    class: "text-[11px] text-slate-500 underline",
                    onclick: on_clear,
                    "Clear dates"
                }
            }
        }
    }
}

#[component]
pub fn SearchFilter() -> Element {
    let query = use_query_state();
    let committed = SearchBox::read(&query.params());
    let mut text = use_signal(|| committed.clone());
    let writer = use_search_writer(query);

    // Back/forward or another tab may change the committed term.
    use_effect(use_reactive!(|committed| {
        let local = text.peek().clone();
        if let Some(next) = SearchBox::echo(&local, &committed) {
            text.set(next);
        }
    }));

    rsx! {
        div { class: "flex items-center gap-2",
            input {
                r#type: "search",
                class: "{INPUT_CLASS} w-56",
                placeholder: "Search…",
                value: "{text}",
                oninput: move |evt: FormEvent| {
                    let value = evt.value();
                    text.set(value.clone());
                    writer.send(SearchEvent::Typed(value));
                },
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        writer.send(SearchEvent::Flush);
                    }
                },
            }
            if !text.read().is_empty() {
                button {
                    class: "text-[11px] text-slate-500 underline",
                    onclick: move |_| {
                        text.set(String::new());
                        writer.send(SearchEvent::Typed(String::new()));
                        writer.send(SearchEvent::Flush);
                    },
                    "Clear"
                }
            }
        }
    }
}
