//! Decides whether the current visitor may see a page.

use log::info;

use crate::router::{Access, Route};
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(Route),
}

/// Check the stored session against a page's access rules.
///
/// Malformed stored session data counts as no session; the store wipes itself
/// when it finds it.
pub fn check(route: Route, store: &SessionStore) -> Decision {
    let Access::Roles(roles) = route.access() else {
        return Decision::Render;
    };

    let Some(session) = store.session() else {
        if store.user().is_some_and(|user| user.is_deactivated_officer()) {
            info!("Deactivated officer tried to open {route}");
            return Decision::Redirect(Route::AccountDeactivated);
        }
        info!("No session for {route}, redirecting to login");
        return Decision::Redirect(Route::Login);
    };

    if session.user.is_deactivated_officer() {
        info!("Deactivated officer tried to open {route}");
        return Decision::Redirect(Route::AccountDeactivated);
    }

    if !roles.contains(&session.user.role) {
        let own = Route::dashboard(session.user.role);
        info!("{} cannot open {route}, redirecting to {own}", session.user.role);
        return Decision::Redirect(own);
    }

    Decision::Render
}
