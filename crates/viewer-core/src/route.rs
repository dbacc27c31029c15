//! Navigation between the dashboard and the document viewer.

use std::fmt;

use url::form_urlencoded;

use crate::context::AppContext;

const DASHBOARD_PATH: &str = "/";
const DOCUMENT_VIEWER_PATH: &str = "/document-viewer";
const FILEPATH_PARAM: &str = "filepath";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    /// The filepath travels either in the query string or, when `None`, in
    /// the viewer session.
    DocumentViewer { filepath: Option<String> },
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Self::Dashboard => DASHBOARD_PATH.to_owned(),
            Self::DocumentViewer { filepath: None } => DOCUMENT_VIEWER_PATH.to_owned(),
            Self::DocumentViewer { filepath: Some(filepath) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(FILEPATH_PARAM, filepath)
                    .finish();
                format!("{DOCUMENT_VIEWER_PATH}?{query}")
            }
        }
    }

    /// Inverse of [`Route::to_path`]. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        match route {
            DASHBOARD_PATH | "" => Some(Self::Dashboard),
            DOCUMENT_VIEWER_PATH => {
                let filepath = form_urlencoded::parse(query.as_bytes())
                    .find(|(name, _)| name == FILEPATH_PARAM)
                    .map(|(_, value)| value.into_owned());
                Some(Self::DocumentViewer { filepath })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Moves the UI to another view.
pub trait Navigator {
    fn goto(&mut self, route: Route);
}

/// Remembers every route it was sent to. Used by headless shells and tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub visited: Vec<Route>,
}

impl Navigator for RecordingNavigator {
    fn goto(&mut self, route: Route) {
        tracing::debug!(path = %route, "navigate");
        self.visited.push(route);
    }
}

/// Open `filepath` in the viewer: hand it over through the session, then
/// navigate. The history entry is recorded once the viewer has loaded the
/// document (see [`AppContext::load_document`]).
pub fn open_document_viewer(ctx: &AppContext, navigator: &mut impl Navigator, filepath: &str) {
    ctx.session.reload(filepath);
    navigator.goto(Route::DocumentViewer { filepath: None });
}

pub fn open_dashboard(navigator: &mut impl Navigator) {
    navigator.goto(Route::Dashboard);
}
