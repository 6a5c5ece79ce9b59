//! Table-driven navigation with a session guard in front of every view.

use std::sync::Arc;

use shared::domain::{Role, Session};
use tracing::{info, warn};

use crate::{
    bills::BillsListController,
    gateway::BillGateway,
    new_bill::NewBillController,
    ports::{NavigationPort, PreviewPort},
    session::SessionStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    pub fn token(self) -> &'static str {
        match self {
            Route::Login => "",
            Route::Bills => "employee/bills",
            Route::NewBill => "employee/bill/new",
        }
    }

    /// Accepts tokens with or without a leading `#` or `/`.
    pub fn from_token(token: &str) -> Option<Route> {
        let token = token.trim().trim_start_matches(['#', '/']);
        ROUTES
            .iter()
            .find(|entry| entry.route.token() == token)
            .map(|entry| entry.route)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIcon {
    Window,
    Mail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Role(Role),
}

#[derive(Clone)]
pub struct Services {
    pub gateway: Arc<dyn BillGateway>,
    pub sessions: Arc<dyn SessionStore>,
    pub navigation: Arc<dyn NavigationPort>,
    pub preview: Arc<dyn PreviewPort>,
}

pub enum MountedView {
    Login,
    Bills(Arc<BillsListController>),
    NewBill(Arc<NewBillController>),
}

struct RouteEntry {
    route: Route,
    access: Access,
    icon: Option<NavIcon>,
    mount: fn(&Services) -> MountedView,
}

fn mount_login(_: &Services) -> MountedView {
    MountedView::Login
}

fn mount_bills(services: &Services) -> MountedView {
    MountedView::Bills(Arc::new(BillsListController::new(
        services.gateway.clone(),
        services.navigation.clone(),
        services.preview.clone(),
    )))
}

fn mount_new_bill(services: &Services) -> MountedView {
    MountedView::NewBill(Arc::new(NewBillController::new(
        services.gateway.clone(),
        services.sessions.clone(),
        services.navigation.clone(),
    )))
}

static ROUTES: [RouteEntry; 3] = [
    RouteEntry {
        route: Route::Login,
        access: Access::Public,
        icon: None,
        mount: mount_login,
    },
    RouteEntry {
        route: Route::Bills,
        access: Access::Role(Role::Employee),
        icon: Some(NavIcon::Window),
        mount: mount_bills,
    },
    RouteEntry {
        route: Route::NewBill,
        access: Access::Role(Role::Employee),
        icon: Some(NavIcon::Mail),
        mount: mount_new_bill,
    },
];

fn entry(route: Route) -> &'static RouteEntry {
    ROUTES
        .iter()
        .find(|entry| entry.route == route)
        .unwrap_or(&ROUTES[0])
}

pub fn active_icon(token: &str) -> Option<NavIcon> {
    Route::from_token(token).and_then(|route| entry(route).icon)
}

pub fn is_icon_active(token: &str, icon: NavIcon) -> bool {
    active_icon(token) == Some(icon)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    UnknownToken,
    NoSession,
    WrongRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub requested: String,
    pub reason: RedirectReason,
}

pub struct Navigation {
    pub route: Route,
    pub view: MountedView,
    pub redirected: Option<Redirect>,
}

impl Navigation {
    pub fn active_icon(&self) -> Option<NavIcon> {
        active_icon(self.route.token())
    }
}

pub struct Router {
    services: Services,
    landing: Route,
}

impl Router {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            landing: Route::Bills,
        }
    }

    /// Route used after login and for refused or unknown tokens.
    pub fn with_landing(mut self, landing: Route) -> Self {
        self.landing = landing;
        self
    }

    pub fn navigate(&self, token: &str) -> Navigation {
        let session = self.services.sessions.get();
        let (route, reason) = self.resolve(token, session.as_ref());
        let redirected = reason.map(|reason| {
            warn!(token, redirect_to = route.token(), ?reason, "router: redirect");
            Redirect {
                requested: token.to_string(),
                reason,
            }
        });
        if redirected.is_none() {
            info!(token = route.token(), "router: mounting view");
        }
        Navigation {
            route,
            view: (entry(route).mount)(&self.services),
            redirected,
        }
    }

    fn resolve(&self, token: &str, session: Option<&Session>) -> (Route, Option<RedirectReason>) {
        let Some(route) = Route::from_token(token) else {
            return (self.fallback(session), Some(RedirectReason::UnknownToken));
        };
        match admit(entry(route).access, session) {
            Ok(()) => (route, None),
            Err(RedirectReason::NoSession) => (Route::Login, Some(RedirectReason::NoSession)),
            Err(reason) => (self.fallback(session), Some(reason)),
        }
    }

    /// Landing route when the session may see it, login otherwise.
    fn fallback(&self, session: Option<&Session>) -> Route {
        match admit(entry(self.landing).access, session) {
            Ok(()) => self.landing,
            Err(_) => Route::Login,
        }
    }
}

fn admit(access: Access, session: Option<&Session>) -> Result<(), RedirectReason> {
    match (access, session) {
        (Access::Public, _) => Ok(()),
        (Access::Role(_), None) => Err(RedirectReason::NoSession),
        (Access::Role(required), Some(session)) if session.role == required => Ok(()),
        (Access::Role(_), Some(_)) => Err(RedirectReason::WrongRole),
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
