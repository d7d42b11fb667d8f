use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use super::query::use_query_state;
use crate::query::{
    PanelSpec, ParamSet, Reconcile, ScreenController, ScreenDescriptor, Selection, WriteOptions,
};

#[derive(Clone, Debug, PartialEq)]
pub enum ScreenContent {
    /// Defaults are on their way into the address bar.
    Placeholder,
    Panel(&'static PanelSpec),
    NoMatch(String),
}

/// Runs the screen's controller against the current parameters.
///
/// Returns the parameters with display defaults applied and what the content
/// area should show. The controller lives as long as the mounted screen, so
/// a remount (another path) starts over from `AwaitingDefaults`.
pub fn use_screen(descriptor: &'static ScreenDescriptor) -> (ParamSet, ScreenContent) {
    let query = use_query_state();
    let controller = use_hook(|| {
        // Parameters left over from the previous path must not leak in.
        query.store().resync_quietly();
        Rc::new(RefCell::new(ScreenController::new(descriptor)))
    });

    let params = query.params();
    let step = controller.borrow_mut().reconcile(&params);

    match step {
        Reconcile::Inject(patch) => {
            let query = query.clone();
            let controller = Rc::clone(&controller);
            spawn(async move {
                if query.try_write(patch, WriteOptions::default()).is_err() {
                    controller.borrow_mut().abandon_injection();
                    query.refresh();
                }
            });
            (params, ScreenContent::Placeholder)
        }
        Reconcile::Await => (params, ScreenContent::Placeholder),
        Reconcile::Render(Selection::Panel(tab)) => {
            let content = match descriptor.panel(&tab) {
                Some(panel) => ScreenContent::Panel(panel),
                None => ScreenContent::NoMatch(tab),
            };
            (descriptor.with_defaults(&params), content)
        }
        Reconcile::Render(Selection::NoMatch(tab)) => {
            (descriptor.with_defaults(&params), ScreenContent::NoMatch(tab))
        }
    }
}
