use crate::models::user::Role;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";

/// Navigable areas of the client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    StudentDashboard,
    Submissions,
    EventDiscovery,
    Portfolio,
    StudentReports,
    FacultyDashboard,
    Verification,
    Analytics,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Login,
        View::StudentDashboard,
        View::Submissions,
        View::EventDiscovery,
        View::Portfolio,
        View::StudentReports,
        View::FacultyDashboard,
        View::Verification,
        View::Analytics,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => LOGIN_PATH,
            View::StudentDashboard => "/dashboard",
            View::Submissions => "/submissions",
            View::EventDiscovery => "/events",
            View::Portfolio => "/portfolio",
            View::StudentReports => "/reports",
            View::FacultyDashboard => "/faculty/dashboard",
            View::Verification => "/faculty/verify",
            View::Analytics => "/faculty/reports",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Welcome to Skillfolio",
            View::StudentDashboard => "Dashboard",
            View::Submissions => "My Submissions",
            View::EventDiscovery => "Discover Events",
            View::Portfolio => "Portfolio",
            View::StudentReports => "Reports",
            View::FacultyDashboard => "Faculty Dashboard",
            View::Verification => "Verification Queue",
            View::Analytics => "Analytics",
        }
    }

    /// Role a user needs to open this view; `None` for public views
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::Login => None,
            View::StudentDashboard
            | View::Submissions
            | View::EventDiscovery
            | View::Portfolio
            | View::StudentReports => Some(Role::Student),
            View::FacultyDashboard | View::Verification | View::Analytics => Some(Role::Faculty),
        }
    }

    /// Look up the view served at `path`. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<View> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        View::ALL.into_iter().find(|view| view.path() == path)
    }

    /// Views shown in the navigation menu for a role
    pub fn menu(role: Role) -> Vec<View> {
        View::ALL
            .into_iter()
            .filter(|view| view.required_role() == Some(role))
            .collect()
    }
}
