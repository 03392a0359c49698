//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::products::{
        MockImageStore, MockProductsService,
        models::{Product, ProductUuid},
    },
};

use crate::{router, state::State};

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        name: "Kibble 1kg".to_string(),
        sku: "KIB-001".to_string(),
        category: Some("food".to_string()),
        price: 85_000,
        stock: 12,
        min_stock: 3,
        reserved: 2,
        available: 10,
        location: Some("A-01".to_string()),
        image: None,
        status: "active".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A products mock that fails the test on any call.
pub(crate) fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

/// An image store mock that fails the test on any call.
pub(crate) fn strict_images_mock() -> MockImageStore {
    let mut images = MockImageStore::new();

    images.expect_store_image().never();
    images.expect_remove_image().never();

    images
}

pub(crate) fn state_with(products: MockProductsService, images: MockImageStore) -> Arc<State> {
    State::from_app_context(AppContext {
        products: Arc::new(products),
        images: Arc::new(images),
    })
}

/// Serve `route` with mocked services, rendering errors the way the server does.
pub(crate) fn service_with(
    products: MockProductsService,
    images: MockImageStore,
    route: Router,
) -> Service {
    router::service(
        Router::new()
            .hoop(inject(state_with(products, images)))
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service_with(products, strict_images_mock(), route)
}
