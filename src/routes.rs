use std::sync::Arc;

use log::{error, warn, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod query;
pub(crate) mod rejection;
mod response;

pub use internal::*;

/// The maximum form data size to accept. This should be enforced by
/// the HTTP gateway, so on the Rust side it’s set to an unreasonably
/// large number.
const MAX_CONTENT_LENGTH: u64 = 2 * 1024 * 1024 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_server_error() {
            error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status, "message" => %r.error);
        } else {
            warn!(logger, "Request rejected"; "context" => ?r.context, "status" => %status, "message" => %r.error);
        }

        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        EmptyUserKey
        | InvalidId(..)
        | PartsMissing
        | MalformedFormSubmission
        | MalformedCsv => StatusCode::BAD_REQUEST,
        Unauthenticated => StatusCode::UNAUTHORIZED,
        Forbidden => StatusCode::FORBIDDEN,
        NonExistentText(..) => StatusCode::NOT_FOUND,
        UnsupportedMediaType(..) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Sqlx { .. } | UploadFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        FailedToGenerateUrl { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::filters::multipart::form;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, post, query};

    use super::{handlers, query as q, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;
    use crate::identity::identity;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any()
                .map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and(identity()).and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_dashboard_route => dashboard, rt; p("dashboard"), end(), g());
    route!(make_record_route => record, rt; p("record"), end(), g());
    route!(make_next_text_route => next_text, rt; p("next-text"), end(), g());
    route!(make_upload_route => upload, rt; p("upload-audio"), end(), post(), form().max_length(MAX_CONTENT_LENGTH));
    route!(make_search_route => search, rt; p("search"), end(), g(), query::<q::SearchQuery>());
    route!(make_admin_route => admin, rt; p("admin"), end(), g());
    route!(make_import_route => import, rt; p("import-texts"), end(), post(), form().max_length(MAX_CONTENT_LENGTH));
    route!(make_progress_route => progress, rt; p("progress"), end(), g());

    /// Every route on the main port, without rejection handling.
    pub fn make_routes(environment: Environment) -> Route {
        make_dashboard_route(environment.clone())
            .or(make_record_route(environment.clone()))
            .unify()
            .or(make_next_text_route(environment.clone()))
            .unify()
            .or(make_upload_route(environment.clone()))
            .unify()
            .or(make_search_route(environment.clone()))
            .unify()
            .or(make_admin_route(environment.clone()))
            .unify()
            .or(make_import_route(environment.clone()))
            .unify()
            .or(make_progress_route(environment))
            .unify()
            .boxed()
    }
}
