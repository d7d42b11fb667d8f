use dioxus::prelude::*;
use tracing::error;

use crate::query::store::{default_location, LocationError};
use crate::query::{ParamSet, QueryPatch, QueryStore, WriteOptions};

/// The app-wide [`QueryStore`] plus a revision counter so that every
/// component reading parameters re-renders when they change.
#[derive(Clone)]
pub struct QueryState {
    store: QueryStore,
    revision: Signal<u64>,
}

impl QueryState {
    /// Current parameters; subscribes the calling component.
    pub fn params(&self) -> ParamSet {
        let _ = self.revision.read();
        self.store.read()
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn write(&self, patch: QueryPatch) {
        let _ = self.try_write(patch, WriteOptions::default());
    }

    pub fn try_write(&self, patch: QueryPatch, options: WriteOptions) -> Result<ParamSet, LocationError> {
        self.store.write(patch, options).inspect_err(|err| {
            error!(?err, "query write failed");
        })
    }

    /// Forces readers to re-render without touching the parameters.
    pub fn refresh(&self) {
        let mut revision = self.revision;
        *revision.write() += 1;
    }
}

pub fn use_query_state_provider() -> QueryState {
    let state = use_hook(|| {
        let store = QueryStore::new(default_location());
        let revision = Signal::new(0u64);
        store.subscribe(move |_| {
            let mut revision = revision;
            *revision.write() += 1;
        });
        QueryState { store, revision }
    });

    use_context_provider(|| state.clone());
    use_history_listener(state.clone());
    state
}

pub fn use_query_state() -> QueryState {
    use_context::<QueryState>()
}

/// Back/forward only changes the address bar, so the store re-reads it.
#[cfg(target_arch = "wasm32")]
fn use_history_listener(state: QueryState) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    use_hook(move || {
        let store = state.store.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            store.resync();
        });

        if let Some(window) = web_sys::window() {
            if let Err(err) =
                window.add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
            {
                tracing::warn!(?err, "failed to listen for popstate");
            }
        }
        callback.forget();
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn use_history_listener(_state: QueryState) {}
