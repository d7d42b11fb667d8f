//! Screen catalog. Parameter names and tab keys here end up in shared links,
//! so renaming any of them breaks bookmarks.

use crate::query::params::{END_DATE, PAGE, PERIOD, SEARCH, SIZE, START_DATE, TYPE};
use crate::query::screen::{Column, FilterKind, PanelSpec, PanelView, ScreenDescriptor};
use crate::query::widgets::SwitchOption;

const RANGE_LIST: &[&str] = &[PERIOD, START_DATE, END_DATE, SEARCH, PAGE, SIZE];
const SEARCH_LIST: &[&str] = &[SEARCH, PAGE, SIZE];

pub static DASHBOARD: ScreenDescriptor = ScreenDescriptor {
    id: "dashboard",
    path: "/",
    title: "Dashboard",
    tabs: &[SwitchOption { link: "overview", name: "Overview" }],
    default_tab: "overview",
    required: &[(PERIOD, "day")],
    panels: &[PanelSpec {
        tab: "overview",
        endpoint: "dashboard/summary/",
        forwards: &[PERIOD, START_DATE, END_DATE],
        view: PanelView::Metrics,
    }],
    filters: &[FilterKind::Period, FilterKind::DateRange],
};

pub static ORDERS: ScreenDescriptor = ScreenDescriptor {
    id: "orders",
    path: "/orders",
    title: "Orders",
    tabs: &[
        SwitchOption { link: "list", name: "Orders" },
        SwitchOption { link: "stats", name: "Statistics" },
    ],
    default_tab: "list",
    required: &[(TYPE, "washing"), (PERIOD, "day")],
    panels: &[
        PanelSpec {
            tab: "list",
            endpoint: "orders/",
            forwards: &[TYPE, PERIOD, START_DATE, END_DATE, SEARCH, PAGE, SIZE],
            view: PanelView::Table(&[
                Column { field: "id", label: "#" },
                Column { field: "car_number", label: "Car" },
                Column { field: "package", label: "Package" },
                Column { field: "employee", label: "Washer" },
                Column { field: "total", label: "Total" },
                Column { field: "created_at", label: "Created" },
            ]),
        },
        PanelSpec {
            tab: "stats",
            endpoint: "orders/stats/",
            forwards: &[TYPE, PERIOD, START_DATE, END_DATE, PAGE, SIZE],
            view: PanelView::Table(&[
                Column { field: "date", label: "Date" },
                Column { field: "orders", label: "Orders" },
                Column { field: "revenue", label: "Revenue" },
            ]),
        },
    ],
    filters: &[
        FilterKind::Type,
        FilterKind::Period,
        FilterKind::DateRange,
        FilterKind::Search,
    ],
};

pub static EMPLOYEES: ScreenDescriptor = ScreenDescriptor {
    id: "employees",
    path: "/employees",
    title: "Employees",
    tabs: &[
        SwitchOption { link: "list", name: "Employees" },
        SwitchOption { link: "payouts", name: "Salary payouts" },
    ],
    default_tab: "list",
    required: &[(PERIOD, "month")],
    panels: &[
        PanelSpec {
            tab: "list",
            endpoint: "employees/",
            forwards: &[PERIOD, SEARCH, PAGE, SIZE],
            view: PanelView::Table(&[
                Column { field: "full_name", label: "Name" },
                Column { field: "position", label: "Position" },
                Column { field: "phone", label: "Phone" },
                Column { field: "orders_count", label: "Orders" },
                Column { field: "earned", label: "Earned" },
            ]),
        },
        PanelSpec {
            tab: "payouts",
            endpoint: "employees/payouts/",
            forwards: RANGE_LIST,
            view: PanelView::Table(&[
                Column { field: "employee", label: "Employee" },
                Column { field: "amount", label: "Amount" },
                Column { field: "paid_at", label: "Paid at" },
            ]),
        },
    ],
    filters: &[FilterKind::Period, FilterKind::DateRange, FilterKind::Search],
};

pub static MATERIALS: ScreenDescriptor = ScreenDescriptor {
    id: "materials",
    path: "/materials",
    title: "Materials",
    tabs: &[
        SwitchOption { link: "instock", name: "In stock" },
        SwitchOption { link: "writeoffs", name: "Write-offs" },
        SwitchOption { link: "categories", name: "Categories" },
    ],
    default_tab: "instock",
    required: &[(PERIOD, "day")],
    panels: &[
        PanelSpec {
            tab: "instock",
            endpoint: "materials/",
            forwards: SEARCH_LIST,
            view: PanelView::Table(&[
                Column { field: "name", label: "Material" },
                Column { field: "category", label: "Category" },
                Column { field: "quantity", label: "Quantity" },
                Column { field: "unit", label: "Unit" },
                Column { field: "price", label: "Price" },
            ]),
        },
        PanelSpec {
            tab: "writeoffs",
            endpoint: "materials/write-offs/",
            forwards: RANGE_LIST,
            view: PanelView::Table(&[
                Column { field: "material", label: "Material" },
                Column { field: "quantity", label: "Quantity" },
                Column { field: "employee", label: "Written off by" },
                Column { field: "created_at", label: "Date" },
            ]),
        },
        PanelSpec {
            tab: "categories",
            endpoint: "materials/categories/",
            forwards: SEARCH_LIST,
            view: PanelView::Table(&[
                Column { field: "id", label: "#" },
                Column { field: "name", label: "Category" },
                Column { field: "materials_count", label: "Materials" },
            ]),
        },
    ],
    filters: &[FilterKind::Period, FilterKind::DateRange, FilterKind::Search],
};

pub static MATERIAL_CATEGORY: ScreenDescriptor = ScreenDescriptor {
    id: "material-category",
    path: "/materials/categories/:id",
    title: "Material category",
    tabs: &[SwitchOption { link: "items", name: "Materials" }],
    default_tab: "items",
    required: &[],
    panels: &[PanelSpec {
        tab: "items",
        endpoint: "materials/categories/{id}/materials/",
        forwards: SEARCH_LIST,
        view: PanelView::Table(&[
            Column { field: "name", label: "Material" },
            Column { field: "quantity", label: "Quantity" },
            Column { field: "unit", label: "Unit" },
            Column { field: "price", label: "Price" },
        ]),
    }],
    filters: &[FilterKind::Search],
};

pub static PACKAGES: ScreenDescriptor = ScreenDescriptor {
    id: "packages",
    path: "/packages",
    title: "Packages",
    tabs: &[SwitchOption { link: "list", name: "Packages" }],
    default_tab: "list",
    required: &[(TYPE, "washing")],
    panels: &[PanelSpec {
        tab: "list",
        endpoint: "packages/",
        forwards: &[TYPE, SEARCH, PAGE, SIZE],
        view: PanelView::Table(&[
            Column { field: "name", label: "Package" },
            Column { field: "price", label: "Price" },
            Column { field: "duration", label: "Duration, min" },
            Column { field: "services_count", label: "Services" },
        ]),
    }],
    filters: &[FilterKind::Type, FilterKind::Search],
};

pub static EXPENSES: ScreenDescriptor = ScreenDescriptor {
    id: "expenses",
    path: "/expenses",
    title: "Expenses",
    tabs: &[
        SwitchOption { link: "list", name: "Expenses" },
        SwitchOption { link: "categories", name: "Categories" },
    ],
    default_tab: "list",
    required: &[(PERIOD, "month")],
    panels: &[
        PanelSpec {
            tab: "list",
            endpoint: "expenses/",
            forwards: RANGE_LIST,
            view: PanelView::Table(&[
                Column { field: "category", label: "Category" },
                Column { field: "amount", label: "Amount" },
                Column { field: "comment", label: "Comment" },
                Column { field: "created_at", label: "Date" },
            ]),
        },
        PanelSpec {
            tab: "categories",
            endpoint: "expenses/categories/",
            forwards: &[PERIOD, PAGE, SIZE],
            view: PanelView::Table(&[
                Column { field: "name", label: "Category" },
                Column { field: "total", label: "Total" },
            ]),
        },
    ],
    filters: &[FilterKind::Period, FilterKind::DateRange, FilterKind::Search],
};

pub static CLIENTS: ScreenDescriptor = ScreenDescriptor {
    id: "clients",
    path: "/clients",
    title: "Clients",
    tabs: &[
        SwitchOption { link: "list", name: "Clients" },
        SwitchOption { link: "visits", name: "Visits" },
    ],
    default_tab: "list",
    required: &[],
    panels: &[
        PanelSpec {
            tab: "list",
            endpoint: "clients/",
            forwards: SEARCH_LIST,
            view: PanelView::Table(&[
                Column { field: "full_name", label: "Client" },
                Column { field: "phone", label: "Phone" },
                Column { field: "car_number", label: "Car" },
                Column { field: "visits_count", label: "Visits" },
            ]),
        },
        PanelSpec {
            tab: "visits",
            endpoint: "clients/visits/",
            forwards: &[START_DATE, END_DATE, SEARCH, PAGE, SIZE],
            view: PanelView::Table(&[
                Column { field: "client", label: "Client" },
                Column { field: "car_number", label: "Car" },
                Column { field: "package", label: "Package" },
                Column { field: "visited_at", label: "Visited" },
            ]),
        },
    ],
    filters: &[FilterKind::DateRange, FilterKind::Search],
};

pub static ALL_SCREENS: &[&ScreenDescriptor] = &[
    &DASHBOARD,
    &ORDERS,
    &EMPLOYEES,
    &MATERIALS,
    &MATERIAL_CATEGORY,
    &PACKAGES,
    &EXPENSES,
    &CLIENTS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tab_has_a_panel_and_default_is_listed() {
        for screen in ALL_SCREENS {
            assert!(screen.tab(screen.default_tab).is_some(), "{}", screen.id);
            for tab in screen.tabs {
                assert!(screen.panel(tab.link).is_some(), "{}:{}", screen.id, tab.link);
            }
        }
    }

    #[test]
    fn screens_with_switchers_require_their_keys() {
        for screen in ALL_SCREENS {
            let required: Vec<_> = screen.required.iter().map(|(key, _)| *key).collect();
            if screen.shows(FilterKind::Period) {
                assert!(required.contains(&PERIOD), "{}", screen.id);
            }
            if screen.shows(FilterKind::Type) {
                assert!(required.contains(&TYPE), "{}", screen.id);
            }
        }
    }
}
