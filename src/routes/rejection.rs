use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Admin,
    Authentication,
    Dashboard,
    Import,
    NextText,
    Progress,
    Record,
    Search { query: String },
    Upload,
}

impl Context {
    pub fn admin() -> Context {
        Context::Admin
    }

    pub fn authentication() -> Context {
        Context::Authentication
    }

    pub fn dashboard() -> Context {
        Context::Dashboard
    }

    pub fn import() -> Context {
        Context::Import
    }

    pub fn next_text() -> Context {
        Context::NextText
    }

    pub fn progress() -> Context {
        Context::Progress
    }

    pub fn record() -> Context {
        Context::Record
    }

    pub fn search(query: String) -> Context {
        Context::Search { query }
    }

    pub fn upload() -> Context {
        Context::Upload
    }
}
