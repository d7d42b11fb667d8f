use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, error};

use super::params::{ParamSet, QueryPatch};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Replace,
    Push,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub history: HistoryMode,
    pub preserve_scroll: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            history: HistoryMode::Replace,
            preserve_scroll: true,
        }
    }
}

impl WriteOptions {
    pub fn push() -> Self {
        Self {
            history: HistoryMode::Push,
            ..Self::default()
        }
    }

    pub fn reset_scroll(mut self) -> Self {
        self.preserve_scroll = false;
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("browser window is not available")]
    NoWindow,
    #[error("history update rejected: {0}")]
    Rejected(String),
}

/// The navigation surface the store commits to.
pub trait Location {
    fn path(&self) -> String;
    fn search(&self) -> String;
    /// Rewrites the current address without reloading the document.
    fn commit(&self, href: &str, mode: HistoryMode) -> Result<(), LocationError>;
    fn reset_scroll(&self) {}
}

#[derive(Debug, Default)]
struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    scroll_resets: usize,
}

/// In-process history stack used off the browser and in tests.
#[derive(Clone, Debug)]
pub struct MemoryLocation {
    history: Rc<RefCell<MemoryHistory>>,
}

impl MemoryLocation {
    pub fn new(href: &str) -> Self {
        Self {
            history: Rc::new(RefCell::new(MemoryHistory {
                entries: vec![href.to_string()],
                cursor: 0,
                scroll_resets: 0,
            })),
        }
    }

    pub fn href(&self) -> String {
        let history = self.history.borrow();
        history.entries[history.cursor].clone()
    }

    pub fn entries(&self) -> Vec<String> {
        self.history.borrow().entries.clone()
    }

    pub fn scroll_resets(&self) -> usize {
        self.history.borrow().scroll_resets
    }

    /// Navigates to `href` as a link click would: drops forward entries and
    /// pushes a new one.
    pub fn visit(&self, href: &str) {
        let mut history = self.history.borrow_mut();
        let keep = history.cursor + 1;
        history.entries.truncate(keep);
        history.entries.push(href.to_string());
        history.cursor = keep;
    }

    pub fn back(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.cursor == 0 {
            return false;
        }
        history.cursor -= 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.cursor + 1 >= history.entries.len() {
            return false;
        }
        history.cursor += 1;
        true
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> String {
        let href = self.href();
        href.split_once('?')
            .map(|(path, _)| path.to_string())
            .unwrap_or(href)
    }

    fn search(&self) -> String {
        self.href()
            .split_once('?')
            .map(|(_, search)| search.to_string())
            .unwrap_or_default()
    }

    fn commit(&self, href: &str, mode: HistoryMode) -> Result<(), LocationError> {
        match mode {
            HistoryMode::Replace => {
                let mut history = self.history.borrow_mut();
                let cursor = history.cursor;
                history.entries[cursor] = href.to_string();
            }
            HistoryMode::Push => self.visit(href),
        }
        Ok(())
    }

    fn reset_scroll(&self) {
        self.history.borrow_mut().scroll_resets += 1;
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

#[cfg(target_arch = "wasm32")]
impl Location for BrowserLocation {
    fn path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn search(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    fn commit(&self, href: &str, mode: HistoryMode) -> Result<(), LocationError> {
        let window = web_sys::window().ok_or(LocationError::NoWindow)?;
        let history = window
            .history()
            .map_err(|err| LocationError::Rejected(format!("{err:?}")))?;
        // The router keeps its own data in the entry state; carry it over.
        let state = history.state().unwrap_or(wasm_bindgen::JsValue::NULL);
        let result = match mode {
            HistoryMode::Replace => history.replace_state_with_url(&state, "", Some(href)),
            HistoryMode::Push => history.push_state_with_url(&state, "", Some(href)),
        };
        result.map_err(|err| LocationError::Rejected(format!("{err:?}")))
    }

    fn reset_scroll(&self) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
}

pub fn default_location() -> Rc<dyn Location> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserLocation)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryLocation::new("/"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&ParamSet)>;

struct StoreInner {
    location: Rc<dyn Location>,
    path: String,
    params: ParamSet,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

/// Single source of truth for view state, mirrored into the address bar.
///
/// Writes merge into the in-memory set before committing, so several writes
/// issued in the same tick all land even though none of them re-reads the
/// location in between.
#[derive(Clone)]
pub struct QueryStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl QueryStore {
    pub fn new(location: Rc<dyn Location>) -> Self {
        let path = location.path();
        let params = ParamSet::parse(&location.search());
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                location,
                path,
                params,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn read(&self) -> ParamSet {
        self.inner.borrow().params.clone()
    }

    pub fn path(&self) -> String {
        self.inner.borrow().path.clone()
    }

    pub fn href(&self) -> String {
        let inner = self.inner.borrow();
        inner.params.to_href(&inner.path)
    }

    pub fn write(&self, patch: QueryPatch, options: WriteOptions) -> Result<ParamSet, LocationError> {
        let next = {
            let mut inner = self.inner.borrow_mut();
            let next = inner.params.merged(&patch);
            if next == inner.params {
                return Ok(next);
            }

            let href = next.to_href(&inner.path);
            if let Err(err) = inner.location.commit(&href, options.history) {
                error!(%href, ?err, "query commit failed");
                return Err(err);
            }
            if !options.preserve_scroll {
                inner.location.reset_scroll();
            }
            debug!(%href, mode = ?options.history, "query state committed");
            inner.params = next.clone();
            next
        };

        self.notify(&next);
        Ok(next)
    }

    /// Re-reads the location after back/forward or a path change and tells
    /// subscribers when anything moved.
    pub fn resync(&self) -> bool {
        match self.reload() {
            Some(params) => {
                self.notify(&params);
                true
            }
            None => false,
        }
    }

    /// Like [`resync`](Self::resync) but without notifying, for callers that
    /// read the fresh set right away.
    pub fn resync_quietly(&self) -> bool {
        self.reload().is_some()
    }

    pub fn subscribe(&self, listener: impl Fn(&ParamSet) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(existing, _)| *existing != id);
    }

    fn reload(&self) -> Option<ParamSet> {
        let mut inner = self.inner.borrow_mut();
        let path = inner.location.path();
        let params = ParamSet::parse(&inner.location.search());
        if path == inner.path && params == inner.params {
            return None;
        }
        inner.path = path;
        inner.params = params.clone();
        Some(params)
    }

    fn notify(&self, params: &ParamSet) {
        // Listeners may write back, so the borrow must be released first.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(params);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::query::params::{PERIOD, SEARCH, TAB};

    fn store_at(href: &str) -> (QueryStore, MemoryLocation) {
        let location = MemoryLocation::new(href);
        let store = QueryStore::new(Rc::new(location.clone()));
        (store, location)
    }

    #[test]
    fn write_merges_and_commits_by_replacing() {
        let (store, location) = store_at("/orders?a=0&b=2");
        store
            .write(QueryPatch::new().set("a", "1"), WriteOptions::default())
            .unwrap();

        assert_eq!(location.href(), "/orders?a=1&b=2");
        assert_eq!(location.entries().len(), 1);
        assert_eq!(location.scroll_resets(), 0);
    }

    #[test]
    fn push_adds_history_entry_and_scroll_reset_is_opt_in() {
        let (store, location) = store_at("/orders");
        store
            .write(QueryPatch::new().set(TAB, "list"), WriteOptions::push().reset_scroll())
            .unwrap();

        assert_eq!(location.entries(), vec!["/orders", "/orders?tab=list"]);
        assert_eq!(location.scroll_resets(), 1);
    }

    #[test]
    fn same_tick_writes_from_two_widgets_both_land() {
        let (store, location) = store_at("/orders?tab=list");
        store
            .write(QueryPatch::new().set(PERIOD, "week"), WriteOptions::default())
            .unwrap();
        store
            .write(QueryPatch::new().set(SEARCH, "foam"), WriteOptions::default())
            .unwrap();

        assert_eq!(location.href(), "/orders?tab=list&period=week&search=foam");
    }

    #[test]
    fn clearing_search_removes_key() {
        let (store, location) = store_at("/clients?tab=list");
        store
            .write(QueryPatch::new().set(SEARCH, "abc"), WriteOptions::default())
            .unwrap();
        store
            .write(QueryPatch::new().set(SEARCH, ""), WriteOptions::default())
            .unwrap();

        assert!(!store.read().contains(SEARCH));
        assert_eq!(location.href(), "/clients?tab=list");
    }

    #[test]
    fn subscribers_hear_writes_until_unsubscribed() {
        let (store, _location) = store_at("/");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = store.subscribe(move |_| counter.set(counter.get() + 1));

        store
            .write(QueryPatch::new().set(PERIOD, "day"), WriteOptions::default())
            .unwrap();
        // No-op writes do not notify.
        store
            .write(QueryPatch::new().set(PERIOD, "day"), WriteOptions::default())
            .unwrap();
        assert_eq!(hits.get(), 1);

        store.unsubscribe(id);
        store
            .write(QueryPatch::new().set(PERIOD, "week"), WriteOptions::default())
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_may_write_back_without_reentrancy_panic() {
        let (store, location) = store_at("/");
        let writer = store.clone();
        store.subscribe(move |params| {
            if params.get(TAB).is_some() && !params.contains(PERIOD) {
                let _ = writer.write(QueryPatch::new().set(PERIOD, "day"), WriteOptions::default());
            }
        });

        store
            .write(QueryPatch::new().set(TAB, "overview"), WriteOptions::default())
            .unwrap();
        assert_eq!(location.href(), "/?tab=overview&period=day");
    }

    #[test]
    fn resync_follows_back_navigation_and_path_changes() {
        let (store, location) = store_at("/orders?tab=list");
        store
            .write(QueryPatch::new().set(TAB, "stats"), WriteOptions::push())
            .unwrap();

        assert!(location.back());
        assert!(store.resync());
        assert_eq!(store.read().get(TAB), Some("list"));
        assert!(location.forward());
        assert!(store.resync());
        assert_eq!(store.href(), "/orders?tab=stats");

        location.visit("/materials");
        assert!(store.resync_quietly());
        assert_eq!(store.path(), "/materials");
        assert!(store.read().is_empty());
        assert!(!store.resync());
    }
}
