use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Artist,
    Podcaster,
    Admin,
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Artist => write!(f, "artist"),
            Role::Podcaster => write!(f, "podcaster"),
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

/// Authenticated user, as returned by the login endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Artists,
    Podcasts,
    Blog,
    Login,
    Register,
    Profile,
    ArtistDashboard,
    PodcasterDashboard,
    AdminDashboard,
}

/// Who may open a view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectLogin,
    RedirectHome,
}

impl View {
    pub const fn permission(self) -> Permission {
        match self {
            View::Home
            | View::Artists
            | View::Podcasts
            | View::Blog
            | View::Login
            | View::Register => Permission::Public,
            View::Profile => Permission::Authenticated,
            View::ArtistDashboard => Permission::Roles(&[Role::Artist]),
            View::PodcasterDashboard => Permission::Roles(&[Role::Podcaster]),
            View::AdminDashboard => Permission::Roles(&[Role::Admin, Role::Staff]),
        }
    }

    /// Dashboard a role lands on from the profile page, if it has one
    pub const fn dashboard_for(role: Role) -> Option<View> {
        match role {
            Role::Admin | Role::Staff => Some(View::AdminDashboard),
            Role::Artist => Some(View::ArtistDashboard),
            Role::Podcaster => Some(View::PodcasterDashboard),
            Role::Member => None,
        }
    }
}

/// Evaluated once per navigation. Anonymous users are sent to login, signed
/// in users without the right role are sent home.
pub fn navigate(session: Option<&Session>, view: View) -> Access {
    match (view.permission(), session) {
        (Permission::Public, _) => Access::Granted,
        (_, None) => Access::RedirectLogin,
        (Permission::Authenticated, Some(_)) => Access::Granted,
        (Permission::Roles(roles), Some(s)) if roles.contains(&s.role) => Access::Granted,
        (Permission::Roles(_), Some(_)) => Access::RedirectHome,
    }
}
