//! App Router

use salvo::{
    catcher::Catcher,
    cors::{self, Cors},
    http::Method,
    prelude::*,
};

use crate::{
    checkout,
    errors::{json_errors, method_not_allowed},
    healthcheck, products,
};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .goal(method_not_allowed)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .goal(method_not_allowed),
                ),
        )
        .push(
            Router::with_path("checkout/quote")
                .post(checkout::quote::handler)
                .goal(method_not_allowed),
        )
}

/// Any origin may call the API.
fn cors() -> Cors {
    Cors::new()
        .allow_origin(cors::Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(cors::Any)
}

/// Wrap a router with CORS handling and JSON error bodies.
pub(crate) fn service(router: Router) -> Service {
    Service::new(router)
        .catcher(Catcher::default().hoop(json_errors))
        .hoop(cors().into_handler())
}
