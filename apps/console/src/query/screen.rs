use tracing::{info, warn};

use super::params::{ParamSet, QueryPatch, TAB};
use super::widgets::SwitchOption;

#[derive(Debug, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PanelView {
    Table(&'static [Column]),
    Metrics,
}

/// What a tab renders: the endpoint it reads and the query keys it forwards.
///
/// `{id}` in the endpoint is replaced by the screen's path id.
#[derive(Debug, PartialEq, Eq)]
pub struct PanelSpec {
    pub tab: &'static str,
    pub endpoint: &'static str,
    pub forwards: &'static [&'static str],
    pub view: PanelView,
}

impl PanelSpec {
    pub fn endpoint_for(&self, path_id: Option<&str>) -> String {
        match path_id {
            Some(id) => self.endpoint.replace("{id}", id),
            None => self.endpoint.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Period,
    Type,
    DateRange,
    Search,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub id: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    pub tabs: &'static [SwitchOption],
    pub default_tab: &'static str,
    /// Parameters besides `tab` the screen cannot render without.
    pub required: &'static [(&'static str, &'static str)],
    pub panels: &'static [PanelSpec],
    pub filters: &'static [FilterKind],
}

impl ScreenDescriptor {
    pub fn tab(&self, key: &str) -> Option<&'static SwitchOption> {
        self.tabs.iter().find(|tab| tab.link == key)
    }

    pub fn panel(&self, tab: &str) -> Option<&'static PanelSpec> {
        self.panels.iter().find(|panel| panel.tab == tab)
    }

    pub fn shows(&self, filter: FilterKind) -> bool {
        self.filters.contains(&filter)
    }

    /// Defaults for every required key absent from `params`, `tab` first.
    pub fn missing_defaults(&self, params: &ParamSet) -> QueryPatch {
        let mut patch = QueryPatch::new();
        if !params.contains(TAB) {
            patch.put(TAB, Some(self.default_tab.to_string()));
        }
        for (key, value) in self.required {
            if !params.contains(key) {
                patch.put(key, Some(value.to_string()));
            }
        }
        patch
    }

    /// `params` with absent required keys filled in, for display only.
    pub fn with_defaults(&self, params: &ParamSet) -> ParamSet {
        params.merged(&self.missing_defaults(params))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerPhase {
    AwaitingDefaults,
    Ready(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Panel(String),
    /// `tab` names nothing this screen knows; rendered as an empty state.
    NoMatch(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconcile {
    /// Commit this patch once, render a placeholder meanwhile.
    Inject(QueryPatch),
    /// The injected defaults have not arrived yet.
    Await,
    Render(Selection),
}

/// Per-mount state machine deciding what a screen shows for a parameter set.
#[derive(Debug)]
pub struct ScreenController {
    descriptor: &'static ScreenDescriptor,
    phase: ControllerPhase,
    injected: bool,
}

impl ScreenController {
    pub fn new(descriptor: &'static ScreenDescriptor) -> Self {
        Self {
            descriptor,
            phase: ControllerPhase::AwaitingDefaults,
            injected: false,
        }
    }

    pub fn descriptor(&self) -> &'static ScreenDescriptor {
        self.descriptor
    }

    pub fn phase(&self) -> &ControllerPhase {
        &self.phase
    }

    pub fn reconcile(&mut self, params: &ParamSet) -> Reconcile {
        if let ControllerPhase::AwaitingDefaults = self.phase {
            let patch = self.descriptor.missing_defaults(params);
            if !patch.is_empty() {
                if self.injected {
                    return Reconcile::Await;
                }
                self.injected = true;
                info!(screen = self.descriptor.id, ?patch, "injecting default query parameters");
                return Reconcile::Inject(patch);
            }
        }

        // Ready never re-injects; keys removed later fall back to defaults.
        let tab = params
            .get(TAB)
            .unwrap_or(self.descriptor.default_tab)
            .to_string();
        self.phase = ControllerPhase::Ready(tab.clone());
        Reconcile::Render(self.select(tab))
    }

    /// Settles on the defaults without a write when the injection could not
    /// be committed.
    pub fn abandon_injection(&mut self) {
        warn!(screen = self.descriptor.id, "default injection failed, rendering defaults");
        self.phase = ControllerPhase::Ready(self.descriptor.default_tab.to_string());
    }

    fn select(&self, tab: String) -> Selection {
        if self.descriptor.tab(&tab).is_some() && self.descriptor.panel(&tab).is_some() {
            Selection::Panel(tab)
        } else {
            Selection::NoMatch(tab)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::query::params::PERIOD;
    use crate::query::store::{MemoryLocation, QueryStore, WriteOptions};
    use crate::screens::{ALL_SCREENS, MATERIALS, ORDERS};

    fn drive(store: &QueryStore, controller: &mut ScreenController) -> Reconcile {
        let step = controller.reconcile(&store.read());
        if let Reconcile::Inject(patch) = &step {
            store.write(patch.clone(), WriteOptions::default()).unwrap();
        }
        step
    }

    #[test]
    fn bare_visit_injects_defaults_exactly_once() {
        let location = MemoryLocation::new("/materials");
        let store = QueryStore::new(Rc::new(location.clone()));
        let mut controller = ScreenController::new(&MATERIALS);

        assert!(matches!(drive(&store, &mut controller), Reconcile::Inject(_)));
        assert_eq!(location.href(), "/materials?tab=instock&period=day");
        assert_eq!(location.entries().len(), 1);

        let step = drive(&store, &mut controller);
        assert_eq!(step, Reconcile::Render(Selection::Panel("instock".into())));
        assert_eq!(controller.phase(), &ControllerPhase::Ready("instock".into()));
    }

    #[test]
    fn every_screen_redirects_to_its_defaults() {
        for screen in ALL_SCREENS.iter().copied() {
            let mut controller = ScreenController::new(screen);
            match controller.reconcile(&ParamSet::default()) {
                Reconcile::Inject(patch) => {
                    let applied = ParamSet::default().merged(&patch);
                    assert_eq!(applied.get(TAB), Some(screen.default_tab), "{}", screen.id);
                    for (key, value) in screen.required {
                        assert_eq!(applied.get(key), Some(*value), "{}", screen.id);
                    }
                    assert!(screen.panel(screen.default_tab).is_some(), "{}", screen.id);
                }
                other => panic!("{} did not inject: {other:?}", screen.id),
            }
        }
    }

    #[test]
    fn waits_instead_of_injecting_twice() {
        let mut controller = ScreenController::new(&ORDERS);
        assert!(matches!(
            controller.reconcile(&ParamSet::default()),
            Reconcile::Inject(_)
        ));
        assert_eq!(controller.reconcile(&ParamSet::default()), Reconcile::Await);
        assert_eq!(controller.phase(), &ControllerPhase::AwaitingDefaults);
    }

    #[test]
    fn complete_params_render_without_injection() {
        let mut controller = ScreenController::new(&ORDERS);
        let params = ParamSet::parse("tab=stats&type=detailing&period=week");
        assert_eq!(
            controller.reconcile(&params),
            Reconcile::Render(Selection::Panel("stats".into()))
        );
    }

    #[test]
    fn tab_switches_never_reinject() {
        let location = MemoryLocation::new("/materials");
        let store = QueryStore::new(Rc::new(location.clone()));
        let mut controller = ScreenController::new(&MATERIALS);
        drive(&store, &mut controller);
        drive(&store, &mut controller);

        for tab in ["writeoffs", "categories", "instock"] {
            store
                .write(QueryPatch::new().set(TAB, tab), WriteOptions::default())
                .unwrap();
            assert_eq!(
                drive(&store, &mut controller),
                Reconcile::Render(Selection::Panel(tab.into()))
            );
        }

        // Even when a required key disappears the controller stays Ready.
        store
            .write(QueryPatch::new().remove(PERIOD), WriteOptions::default())
            .unwrap();
        assert_eq!(
            drive(&store, &mut controller),
            Reconcile::Render(Selection::Panel("instock".into()))
        );
        assert_eq!(location.entries().len(), 1);
        assert_eq!(location.href(), "/materials?tab=instock");
    }

    #[test]
    fn unknown_tab_is_an_empty_state() {
        let mut controller = ScreenController::new(&MATERIALS);
        let params = ParamSet::parse("tab=bogus&period=day");
        assert_eq!(
            controller.reconcile(&params),
            Reconcile::Render(Selection::NoMatch("bogus".into()))
        );
    }

    #[test]
    fn abandoned_injection_settles_on_default_tab() {
        let mut controller = ScreenController::new(&MATERIALS);
        assert!(matches!(
            controller.reconcile(&ParamSet::default()),
            Reconcile::Inject(_)
        ));
        controller.abandon_injection();
        assert_eq!(
            controller.reconcile(&ParamSet::default()),
            Reconcile::Render(Selection::Panel("instock".into()))
        );
        assert_eq!(
            MATERIALS.with_defaults(&ParamSet::default()).get(PERIOD),
            Some("day")
        );
    }
}
