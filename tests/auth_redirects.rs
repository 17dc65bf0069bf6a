//! Integration tests: identity extraction and the auth gate
//!
//! Exercises the middleware contract over `actix_web::test` without any
//! external services:
//! - unauthenticated requests to gated routes redirect to login with the
//!   original path as the `next` return target
//! - a valid bearer token passes the gate and resolves to the caller
//! - public routes observe a present identity but never require one

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, Error, HttpResponse};
use blog_service::middleware::{issue_token, IdentityMiddleware, RequireAuth, UserId, Viewer};
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";
const LOGIN_URL: &str = "/auth/login";

async fn whoami(user_id: UserId) -> HttpResponse {
    HttpResponse::Ok().body(user_id.0.to_string())
}

async fn viewer_probe(viewer: Viewer) -> HttpResponse {
    match viewer.0 {
        Some(user_id) => HttpResponse::Ok().body(user_id.to_string()),
        None => HttpResponse::Ok().body("anonymous"),
    }
}

fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new().service(
        web::scope("/api/v1")
            .wrap(IdentityMiddleware::new(SECRET))
            .route("/public", web::get().to(viewer_probe))
            .service(
                web::scope("")
                    .wrap(RequireAuth::new(LOGIN_URL))
                    .route("/private", web::get().to(whoami)),
            ),
    )
}

/// Run a request and normalize the middleware error path into a response
/// status + Location header, whether the framework materialized the error
/// or propagated it.
async fn status_and_location<S, R>(app: &S, req: R) -> (StatusCode, Option<String>)
where
    S: Service<R, Response = ServiceResponse, Error = Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let location = resp
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            (resp.status(), location)
        }
        Err(err) => {
            let resp = err.as_response_error().error_response();
            let location = resp
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            (resp.status(), location)
        }
    }
}

#[actix_web::test]
async fn unauthenticated_request_redirects_to_login_with_next() {
    let app = test::init_service(test_app()).await;

    let req = test::TestRequest::get().uri("/api/v1/private").to_request();
    let (status, location) = status_and_location(&app, req).await;

    assert_eq!(status, StatusCode::FOUND);
    let location = location.expect("redirect must carry a Location header");
    assert!(location.starts_with(LOGIN_URL));
    assert!(location.contains("next=%2Fapi%2Fv1%2Fprivate"));
}

#[actix_web::test]
async fn garbage_token_is_treated_as_unauthenticated() {
    let app = test::init_service(test_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/private")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let (status, location) = status_and_location(&app, req).await;

    assert_eq!(status, StatusCode::FOUND);
    assert!(location.expect("redirect").starts_with(LOGIN_URL));
}

#[actix_web::test]
async fn valid_token_passes_the_gate_and_resolves_the_caller() {
    let app = test::init_service(test_app()).await;
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, SECRET, 60);

    let req = test::TestRequest::get()
        .uri("/api/v1/private")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], user_id.to_string().as_bytes());
}

#[actix_web::test]
async fn public_route_works_without_identity() {
    let app = test::init_service(test_app()).await;

    let req = test::TestRequest::get().uri("/api/v1/public").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"anonymous");
}

#[actix_web::test]
async fn public_route_observes_a_present_identity() {
    let app = test::init_service(test_app()).await;
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, SECRET, 60);

    let req = test::TestRequest::get()
        .uri("/api/v1/public")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], user_id.to_string().as_bytes());
}
