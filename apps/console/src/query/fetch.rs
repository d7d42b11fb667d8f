use tracing::debug;

use super::params::{ParamSet, END_DATE, PAGE, SIZE, START_DATE};
use super::screen::PanelSpec;
use super::widgets::{format_date, DateRangePicker, Pager};

/// Identity of a remote read: endpoint plus every forwarded parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceQuery {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl ResourceQuery {
    pub fn for_panel(
        panel: &PanelSpec,
        path_id: Option<&str>,
        params: &ParamSet,
        pager: &Pager,
    ) -> Self {
        let range = DateRangePicker.read(params);
        let mut forwarded = Vec::with_capacity(panel.forwards.len());

        for key in panel.forwards {
            let value = match *key {
                START_DATE => range.map(|range| format_date(range.start)),
                END_DATE => range.map(|range| format_date(range.end)),
                PAGE => Some(pager.page(params).to_string()),
                SIZE => Some(pager.size(params).to_string()),
                other => params.get(other).map(str::to_string),
            };
            if let Some(value) = value {
                forwarded.push((key.to_string(), value));
            }
        }

        Self {
            endpoint: panel.endpoint_for(path_id),
            params: forwarded,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket<K> {
    seq: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Remembers the last issued request so late responses for superseded
/// parameters can be dropped.
#[derive(Debug)]
pub struct FetchTracker<K> {
    issued: u64,
    latest: Option<FetchTicket<K>>,
}

impl<K> Default for FetchTracker<K> {
    fn default() -> Self {
        Self {
            issued: 0,
            latest: None,
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> FetchTracker<K> {
    pub fn begin(&mut self, key: K) -> FetchTicket<K> {
        self.issued += 1;
        let ticket = FetchTicket {
            seq: self.issued,
            key,
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    /// True when `ticket` is still the newest request; anything else is stale.
    pub fn is_current(&self, ticket: &FetchTicket<K>) -> bool {
        self.latest.as_ref() == Some(ticket)
    }

    pub fn settle(&self, ticket: &FetchTicket<K>) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(key = ?ticket.key, "discarding stale response");
        }
        current
    }

    pub fn current_key(&self) -> Option<&K> {
        self.latest.as_ref().map(|ticket| &ticket.key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelData<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for PanelData<T> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Panel data together with the query it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedData<T> {
    query: Option<ResourceQuery>,
    data: PanelData<T>,
}

impl<T> Default for KeyedData<T> {
    fn default() -> Self {
        Self {
            query: None,
            data: PanelData::Idle,
        }
    }
}

impl<T: Clone> KeyedData<T> {
    pub fn new(query: ResourceQuery, data: PanelData<T>) -> Self {
        Self {
            query: Some(query),
            data,
        }
    }

    /// What to render for `query`: anything held for another query reads as
    /// `Loading`, so old rows never show under new filters or columns.
    pub fn view(&self, query: &ResourceQuery) -> PanelData<T> {
        match &self.query {
            Some(held) if held == query => self.data.clone(),
            _ => PanelData::Loading,
        }
    }
}
