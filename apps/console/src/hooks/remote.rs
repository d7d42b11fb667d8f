use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::query::{FetchTracker, KeyedData, PanelData, ResourceQuery};
use crate::API_CLIENT;

/// Loads `query` whenever it changes and returns what to render for it.
///
/// Responses for a superseded query are dropped, so a slow `period=day`
/// answer never replaces `period=week`. Data held for any other query reads
/// as `Loading` until the effect for the new one has run.
pub fn use_remote<T>(query: ResourceQuery) -> PanelData<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let state = use_signal(KeyedData::<T>::default);
    let tracker = use_hook(|| Rc::new(RefCell::new(FetchTracker::<ResourceQuery>::default())));

    use_effect(use_reactive!(|query| {
        let ticket = tracker.borrow_mut().begin(query.clone());
        let tracker = Rc::clone(&tracker);
        let mut state = state;
        state.set(KeyedData::new(query.clone(), PanelData::Loading));

        spawn(async move {
            let outcome = fetch_json::<T>(&query).await;
            if !tracker.borrow().settle(&ticket) {
                return;
            }
            let data = match outcome {
                Ok(value) => PanelData::Loaded(value),
                Err(message) => PanelData::Failed(message),
            };
            state.set(KeyedData::new(query, data));
        });
    }));

    let view = state.read().view(&query);
    view
}

async fn fetch_json<T: DeserializeOwned>(query: &ResourceQuery) -> Result<T, String> {
    let Some(client) = API_CLIENT.get().cloned() else {
        return Err("API client is not initialized".to_string());
    };

    client.get_json::<T>(query).await.map_err(|err| {
        error!(endpoint = %query.endpoint, status = ?err.status(), "panel fetch failed: {err}");
        err.user_message()
    })
}
