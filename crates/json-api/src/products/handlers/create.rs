//! Create Product Handler

use salvo::{
    http::{form::FormData, header::LOCATION},
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use storefront_app::domain::products::{data::NewProduct, models::ProductUuid};

use crate::{
    extensions::*,
    products::errors::{image_status_error, into_status_error},
};

/// Product Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductCreatedResponse {
    pub success: bool,

    /// Created product UUID
    pub uuid: Uuid,
}

fn text<'a>(form: &'a FormData, key: &str) -> Option<&'a str> {
    form.fields
        .get(key)
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required<'a>(form: &'a FormData, key: &str) -> Result<&'a str, StatusError> {
    text(form, key).ok_or_else(|| StatusError::bad_request().brief(format!("{key} is required")))
}

/// Stock counters default to zero when left blank.
fn count(form: &FormData, key: &str) -> Result<i32, StatusError> {
    text(form, key).map_or(Ok(0), |value| {
        value.parse().map_err(|_ignored| {
            StatusError::bad_request().brief(format!("{key} must be a whole number"))
        })
    })
}

fn new_product(form: &FormData) -> Result<NewProduct, StatusError> {
    let price = required(form, "price")?.parse().map_err(|_ignored| {
        StatusError::bad_request().brief("price must be a non-negative whole number")
    })?;

    Ok(NewProduct {
        uuid: ProductUuid::new(),
        name: required(form, "name")?.to_string(),
        sku: required(form, "sku")?.to_string(),
        category: text(form, "category").map(str::to_string),
        price,
        stock: count(form, "stock")?,
        min_stock: count(form, "min_stock")?,
        reserved: count(form, "reserved")?,
        available: count(form, "available")?,
        location: text(form, "location").map(str::to_string),
        image: None,
        status: required(form, "status")?.to_string(),
    })
}

/// Create Product Handler
///
/// Accepts a multipart or urlencoded form. An `image` file part, when present, is stored
/// first and its generated name saved with the product.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "SKU already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductCreatedResponse>, StatusError> {
    let state = depot.state()?;

    let form = req.form_data().await.map_err(|error| {
        warn!("unreadable product form: {error}");

        StatusError::bad_request().brief("Invalid form data")
    })?;

    let mut product = new_product(form)?;

    if let Some(file) = form.files.get("image")
        && let Some(name) = file.name().filter(|name| !name.is_empty())
    {
        let stored = state
            .app
            .images
            .store_image(name, file.path())
            .await
            .map_err(image_status_error)?;

        product.image = Some(stored);
    }

    let stored = product.image.clone();

    let uuid = match state.app.products.create_product(product).await {
        Ok(created) => created.uuid,
        Err(error) => {
            if let Some(stored) = stored
                && let Err(cleanup) = state.app.images.remove_image(&stored).await
            {
                warn!(image = %stored, "failed to remove orphaned product image: {cleanup}");
            }

            return Err(into_status_error(error));
        }
    };

    res.add_header(LOCATION, format!("/products/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    info!(product_uuid = %uuid, "created product");

    Ok(Json(ProductCreatedResponse {
        success: true,
        uuid: uuid.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use storefront_app::domain::products::{
        ImageUploadError, MockImageStore, MockProductsService, ProductsServiceError,
    };

    use crate::test_helpers::{
        make_product, products_service, service_with, strict_images_mock, strict_products_mock,
    };

    use super::*;

    const BOUNDARY: &str = "storefront-boundary";

    fn route() -> Router {
        Router::with_path("products").post(handler)
    }

    fn form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Kibble 1kg"),
            ("sku", "KIB-001"),
            ("category", "food"),
            ("price", "85000"),
            ("stock", "12"),
            ("min_stock", "3"),
            ("status", "active"),
        ]
    }

    fn multipart(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }

        if let Some((file_name, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        body
    }

    fn post_multipart(body: Vec<u8>) -> salvo::test::RequestBuilder {
        TestClient::post("http://example.com/products")
            .add_header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
                true,
            )
            .bytes(body)
    }

    #[tokio::test]
    async fn test_create_product_from_urlencoded_form() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| {
                new.name == "Kibble 1kg"
                    && new.sku == "KIB-001"
                    && new.category.as_deref() == Some("food")
                    && new.price == 85_000
                    && new.stock == 12
                    && new.min_stock == 3
                    && new.reserved == 0
                    && new.available == 0
                    && new.location.is_none()
                    && new.image.is_none()
                    && new.status == "active"
            })
            .return_once(|new| Ok(make_product(new.uuid)));

        repo.expect_list_products().never();
        repo.expect_get_product().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();

        let mut res = TestClient::post("http://example.com/products")
            .form(&form())
            .send(&products_service(repo, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body: ProductCreatedResponse = res.take_json().await?;

        assert!(body.success);
        assert_eq!(location, Some(format!("/products/{}", body.uuid)));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_stores_uploaded_image() -> TestResult {
        let mut images = MockImageStore::new();

        images
            .expect_store_image()
            .once()
            .withf(|name, source| name == "Cat.PNG" && source.exists())
            .return_once(|_, _| Ok("img_0001.png".to_string()));

        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| new.image.as_deref() == Some("img_0001.png"))
            .return_once(|new| Ok(make_product(new.uuid)));

        let res = post_multipart(multipart(&form(), Some(("Cat.PNG", b"\x89PNG"))))
            .send(&service_with(repo, images, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_rejects_unsupported_image() -> TestResult {
        let mut images = MockImageStore::new();

        images
            .expect_store_image()
            .once()
            .return_once(|_, _| Err(ImageUploadError::UnsupportedFormat));

        let mut res = post_multipart(multipart(&form(), Some(("shell.php", b"<?php"))))
            .send(&service_with(strict_products_mock(), images, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: Value = res.take_json().await?;

        assert_eq!(body["error"], true);
        assert_eq!(
            body["message"],
            "Unsupported image format (allowed: jpg, jpeg, png)"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_create_removes_stored_image() -> TestResult {
        let mut images = MockImageStore::new();

        images
            .expect_store_image()
            .once()
            .return_once(|_, _| Ok("img_0002.png".to_string()));

        images
            .expect_remove_image()
            .once()
            .withf(|stored| stored == "img_0002.png")
            .return_once(|_| Ok(()));

        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::AlreadyExists));

        let mut res = post_multipart(multipart(&form(), Some(("Cat.png", b"\x89PNG"))))
            .send(&service_with(repo, images, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        let body: Value = res.take_json().await?;

        assert_eq!(body["message"], "A product with this SKU already exists");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_without_sku_returns_400() -> TestResult {
        let fields: Vec<_> = form().into_iter().filter(|(k, _)| *k != "sku").collect();

        let mut res = TestClient::post("http://example.com/products")
            .form(&fields)
            .send(&service_with(
                strict_products_mock(),
                strict_images_mock(),
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: Value = res.take_json().await?;

        assert_eq!(body["message"], "sku is required");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_with_bad_price_returns_400() {
        let fields: Vec<_> = form()
            .into_iter()
            .map(|(k, v)| if k == "price" { (k, "-5") } else { (k, v) })
            .collect();

        let res = TestClient::post("http://example.com/products")
            .form(&fields)
            .send(&products_service(strict_products_mock(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_create_product_duplicate_sku_returns_409() {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products")
            .form(&form())
            .send(&products_service(repo, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
