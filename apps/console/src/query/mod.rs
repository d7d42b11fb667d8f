//! URL-backed view state: the parameter set, the store that mirrors it into
//! the address bar, the per-screen controller and the filter widgets.

pub mod debounce;
pub mod fetch;
pub mod params;
pub mod screen;
pub mod store;
pub mod widgets;

pub use fetch::{FetchTracker, KeyedData, PanelData, ResourceQuery};
pub use params::{ParamSet, QueryPatch};
pub use screen::{
    FilterKind, PanelSpec, PanelView, Reconcile, ScreenController, ScreenDescriptor, Selection,
};
pub use store::{QueryStore, WriteOptions};
pub use widgets::{DateRangePicker, OptionSwitcher, Pager, SearchBox};
