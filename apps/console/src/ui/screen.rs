use dioxus::prelude::*;

use super::filters::{FilterBar, SwitcherBar};
use super::panels::PanelHost;
use crate::hooks::screen::{use_screen, ScreenContent};
use crate::query::params::TAB;
use crate::query::{OptionSwitcher, ScreenDescriptor};

/// A whole screen: tab bar, filters and the panel the `tab` key selects.
#[component]
pub fn ScreenPage(
    descriptor: &'static ScreenDescriptor,
    #[props(!optional)] path_id: Option<String>,
) -> Element {
    let (params, content) = use_screen(descriptor);
    let tabs = OptionSwitcher::new(TAB, descriptor.tabs);

    let body = match content {
        ScreenContent::Placeholder => rsx! {
            p { class: "text-xs text-slate-500", "Preparing view…" }
        },
        ScreenContent::Panel(panel) => rsx! {
            PanelHost { key: "{panel.tab}", panel, path_id: path_id.clone(), params }
        },
        ScreenContent::NoMatch(tab) => rsx! {
            p { class: "text-xs text-slate-500 italic", "Nothing to show for \"{tab}\"." }
        },
    };

    rsx! {
        section { class: "space-y-4",
            header { class: "flex flex-col gap-1",
                h1 { class: "text-xl font-semibold text-slate-900", "{descriptor.title}" }
                if let Some(id) = path_id.as_ref() {
                    p { class: "text-xs text-slate-500", "#{id}" }
                }
            }
            if descriptor.tabs.len() > 1 {
                SwitcherBar { switcher: tabs }
            }
            FilterBar { descriptor }
            {body}
        }
    }
}
