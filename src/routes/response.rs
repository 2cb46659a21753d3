use serde::Serialize;

use crate::identity::Identity;
use crate::progress::Progress;
use crate::recording::Recording;
use crate::text::Text;

pub const COMPLETE_MESSAGE: &str = "All recordings complete!";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Admin {
        progress: Progress,
        recordings: Vec<Recording>,
    },
    Assignment(Assignment),
    Dashboard {
        user: &'a Identity,
        is_admin: bool,
        text: Option<Text>,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Import {
        imported: u64,
    },
    Progress(Progress),
    Search {
        query: &'a str,
        recordings: Vec<Recording>,
    },
    Upload(Recording),
}

/// Either the next text to record or a note that nothing is left.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Assignment {
    Text(Text),
    Complete { complete: bool, message: &'static str },
}

impl From<Option<Text>> for Assignment {
    fn from(text: Option<Text>) -> Self {
        match text {
            Some(text) => Assignment::Text(text),
            None => Assignment::Complete {
                complete: true,
                message: COMPLETE_MESSAGE,
            },
        }
    }
}
