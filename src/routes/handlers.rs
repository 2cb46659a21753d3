use std::time::{Duration, Instant};

use log::{debug, o, warn};
use warp::{
    filters::multipart::FormData,
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::identity::Identity;
use crate::io::{parse_import, parse_text_rows, parse_upload};
use crate::recording::NewRecording;
use crate::routes::{
    query::SearchQuery,
    rejection::{Context, Rejection},
    response::{Assignment, SuccessResponse},
};
use crate::store::object_key;

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn dashboard(environment: Environment, identity: Identity) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::dashboard(), e);

        let text = reserve_and_assign(&environment, &identity)
            .await
            .map_err(error_handler)?;

        let is_admin = identity.is_admin(&environment.config.admin_email);

        json(&SuccessResponse::Dashboard {
            user: &identity,
            is_admin,
            text,
        })
    }
}

pub async fn record(environment: Environment, identity: Identity) -> RouteResult {
    timed! {
        let text = reserve_and_assign(&environment, &identity)
            .await
            .map_err(|e| Rejection::new(Context::record(), e))?;

        json(&SuccessResponse::Assignment(Assignment::from(text)))
    }
}

pub async fn next_text(environment: Environment, _identity: Identity) -> RouteResult {
    timed! {
        let text = environment
            .assignments
            .next_unrecorded()
            .await
            .map_err(|e| Rejection::new(Context::next_text(), e))?;

        json(&SuccessResponse::Assignment(Assignment::from(text)))
    }
}

pub async fn upload(
    environment: Environment,
    content: FormData,
    identity: Identity,
) -> RouteResult {
    timed! {
        let Environment {
            logger,
            db,
            store,
            assignments,
            config,
            ..
        } = environment.clone();

        let logger = logger.new(o!("user" => identity.email().to_owned()));
        let error_handler = |e: BackendError| Rejection::new(Context::upload(), e);

        debug!(logger, "Parsing submission...");
        let upload = parse_upload(content).await.map_err(error_handler)?;

        let key = object_key(&config.upload_prefix, upload.filename.as_deref());
        let logger = logger.new(o!("key" => key.clone()));

        debug!(logger, "Saving recording to store..."; "bytes" => upload.audio.len());
        let url = store
            .save(key, upload.content_type, upload.audio)
            .await
            .map_err(error_handler)?;

        // a failure from here on leaves the audio orphaned in the store
        debug!(logger, "Writing metadata to database...");
        let recording = db
            .insert_recording(NewRecording::new(
                &identity,
                url.as_str(),
                upload.transcript,
                upload.text_id,
            ))
            .await
            .map_err(error_handler)?;
        let logger = logger.new(o!("id" => recording.id().to_string()));

        if let Some(text_id) = upload.text_id {
            debug!(logger, "Marking text as recorded..."; "text_id" => %text_id);

            // the recording exists already, so this must not fail the request
            if let Err(e) = assignments.mark_recorded(&text_id).await {
                warn!(logger, "Failed to mark text as recorded"; "text_id" => %text_id, "error" => %e);
            }
        };

        debug!(logger, "Sending response...");
        with_status(json(&SuccessResponse::Upload(recording)), StatusCode::CREATED)
    }
}

pub async fn search(
    environment: Environment,
    query: SearchQuery,
    _identity: Identity,
) -> RouteResult {
    timed! {
        let SearchQuery { query } = query;

        let recordings = environment
            .search
            .search_by_transcript(&query)
            .await
            .map_err(|e| Rejection::new(Context::search(query.clone()), e))?;

        json(&SuccessResponse::Search {
            query: &query,
            recordings,
        })
    }
}

pub async fn admin(environment: Environment, identity: Identity) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::admin(), e);

        require_admin(&environment, &identity).map_err(error_handler)?;

        let progress = environment
            .progress
            .get_progress()
            .await
            .map_err(error_handler)?;
        let recordings = environment
            .search
            .list_recordings()
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Admin {
            progress,
            recordings,
        })
    }
}

pub async fn import(
    environment: Environment,
    content: FormData,
    identity: Identity,
) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::import(), e);

        require_admin(&environment, &identity).map_err(error_handler)?;

        debug!(environment.logger, "Parsing import...");
        let raw = parse_import(content).await.map_err(error_handler)?;
        let texts = parse_text_rows(&raw).map_err(error_handler)?;

        let imported = environment
            .assignments
            .bulk_import(texts)
            .await
            .map_err(error_handler)?;
        debug!(environment.logger, "Imported texts"; "count" => imported);

        with_status(
            json(&SuccessResponse::Import { imported }),
            StatusCode::CREATED,
        )
    }
}

pub async fn progress(environment: Environment, identity: Identity) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::progress(), e);

        require_admin(&environment, &identity).map_err(error_handler)?;

        let progress = environment
            .progress
            .get_progress()
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Progress(progress))
    }
}

async fn reserve_and_assign(
    environment: &Environment,
    identity: &Identity,
) -> Result<Option<crate::text::Text>, BackendError> {
    let user_key = identity.user_key();

    environment.assignments.ensure_reservation(&user_key).await?;
    environment.assignments.get_assignment(&user_key).await
}

fn require_admin(environment: &Environment, identity: &Identity) -> Result<(), BackendError> {
    if identity.is_admin(&environment.config.admin_email) {
        Ok(())
    } else {
        Err(BackendError::Forbidden)
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
