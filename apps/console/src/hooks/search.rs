use dioxus::prelude::*;
use futures::future::{select, Either};
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;

use super::query::QueryState;
use crate::query::SearchBox;
use crate::APP_CONFIG;

#[derive(Clone, Debug)]
pub enum SearchEvent {
    Typed(String),
    /// Commit now (Enter, clear button).
    Flush,
}

/// Feeds keystrokes through a [`SearchBox`] and writes only settled values.
pub fn use_search_writer(query: QueryState) -> Coroutine<SearchEvent> {
    let quiet_ms = APP_CONFIG
        .get()
        .map(|config| config.search_debounce_ms())
        .unwrap_or(300);

    use_coroutine(move |mut rx: UnboundedReceiver<SearchEvent>| {
        let query = query.clone();
        async move {
            let mut search = SearchBox::new(quiet_ms);

            loop {
                let event = match search.next_deadline() {
                    Some(deadline) => {
                        let wait = deadline.saturating_sub(now_ms()).min(u64::from(u32::MAX));
                        let timer = Box::pin(TimeoutFuture::new(wait as u32));
                        match select(rx.next(), timer).await {
                            Either::Left((event, _)) => event,
                            Either::Right(_) => {
                                if let Some(patch) = search.due(now_ms()) {
                                    query.write(patch);
                                }
                                continue;
                            }
                        }
                    }
                    None => rx.next().await,
                };

                match event {
                    Some(SearchEvent::Typed(text)) => {
                        search.input(&text, now_ms());
                    }
                    Some(SearchEvent::Flush) => {
                        if let Some(patch) = search.flush() {
                            query.write(patch);
                        }
                    }
                    None => break,
                }
            }
        }
    })
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
