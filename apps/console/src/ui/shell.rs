use std::mem::discriminant;

use dioxus::prelude::*;
use dioxus_router::prelude::*;

use crate::screens::{CLIENTS, DASHBOARD, EMPLOYEES, EXPENSES, MATERIALS, ORDERS, PACKAGES};
use crate::session::is_authenticated;
use crate::{Route, APP_CONFIG};

const NAV_ACTIVE_CLASS: &str = "rounded-md bg-slate-900 px-3 py-1.5 text-sm font-semibold text-white";
const NAV_LINK_CLASS: &str = "rounded-md px-3 py-1.5 text-sm text-slate-600 hover:bg-slate-100";

fn nav_items() -> [(Route, &'static str); 7] {
    [
        (Route::Dashboard {}, DASHBOARD.title),
        (Route::Orders {}, ORDERS.title),
        (Route::Employees {}, EMPLOYEES.title),
        (Route::Materials {}, MATERIALS.title),
        (Route::Packages {}, PACKAGES.title),
        (Route::Expenses {}, EXPENSES.title),
        (Route::Clients {}, CLIENTS.title),
    ]
}

/// Category pages live under the materials entry.
fn is_section(current: &Route, item: &Route) -> bool {
    discriminant(current) == discriminant(item)
        || matches!(
            (current, item),
            (Route::MaterialCategory { .. }, Route::Materials {})
        )
}

/// Layout for every signed-in screen: session gate, navigation, outlet.
#[component]
pub fn Shell() -> Element {
    let authenticated = APP_CONFIG.get().map(is_authenticated).unwrap_or(false);
    let current = use_route::<Route>();
    let nav = navigator();

    use_effect(move || {
        if !authenticated {
            tracing::info!("no session cookie, redirecting to sign in");
            nav.replace(Route::Login {});
        }
    });

    if !authenticated {
        return rsx! {
            p { class: "p-6 text-sm text-slate-500", "Redirecting to sign in…" }
        };
    }

    rsx! {
        div { class: "min-h-screen bg-slate-50",
            header { class: "border-b border-slate-200 bg-white",
                nav { class: "mx-auto flex max-w-6xl flex-wrap items-center gap-2 px-4 py-3",
                    span { class: "mr-4 text-base font-semibold text-slate-900", "WashDesk" }
                    {nav_items().into_iter().map(|(route, label)| {
                        // The current screen is not a link: following it would drop the query.
                        if discriminant(&current) == discriminant(&route) {
                            rsx! {
                                span { key: "{label}", class: NAV_ACTIVE_CLASS, "{label}" }
                            }
                        } else {
                            let class = if is_section(&current, &route) { NAV_ACTIVE_CLASS } else { NAV_LINK_CLASS };
                            rsx! {
                                Link { key: "{label}", class: "{class}", to: route, "{label}" }
                            }
                        }
                    })}
                }
            }
            main { class: "mx-auto max-w-6xl px-4 py-6",
                Outlet::<Route> {}
            }
        }
    }
}
