use std::sync::Arc;

use log::Logger;

use crate::assignment::AssignmentService;
use crate::db::Db;
use crate::progress::ProgressService;
use crate::search::SearchService;
use crate::store::Store;

/// Everything a handler needs, built once at startup and cloned into
/// each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub store: Arc<dyn Store>,
    pub assignments: AssignmentService,
    pub progress: ProgressService,
    pub search: SearchService,
    pub config: Arc<Config>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<dyn Db + Send + Sync>,
        store: Arc<dyn Store>,
        config: Config,
    ) -> Self {
        Self {
            assignments: AssignmentService::new(logger.clone(), db.clone()),
            progress: ProgressService::new(db.clone()),
            search: SearchService::new(db.clone()),
            db,
            logger,
            store,
            config: Arc::new(config),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// The only user allowed on the admin routes.
    pub(crate) admin_email: String,

    /// Prepended to the key of every uploaded object.
    pub(crate) upload_prefix: String,
}

impl Config {
    pub fn new(admin_email: impl Into<String>, upload_prefix: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            upload_prefix: upload_prefix.into(),
        }
    }
}
