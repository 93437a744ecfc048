//! Integration tests for `/api/v1/ads`: CRUD, filtered listing,
//! pagination and image attachment.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, create_ad, create_category, create_location, create_user, delete, get,
    patch_json, post_file, post_json, BASE_URL,
};
use serde_json::{json, Value};

fn ids(json: &Value) -> Vec<i64> {
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ad| ad["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_ad_returns_projection_of_input() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Bikes").await;
    let author = create_user(&app, "Ivan", &[]).await;

    let response = post_json(
        &app,
        "/api/v1/ads",
        json!({
            "name": "Red bike",
            "author_id": author,
            "category_id": cat,
            "price": 120.5,
            "description": "Barely used",
            "is_published": false,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let ad = body_json(response).await;
    assert!(ad["id"].is_i64());
    assert_eq!(ad["name"], "Red bike");
    assert_eq!(ad["author_id"], author);
    assert_eq!(ad["author"], "Ivan");
    assert_eq!(ad["price"].as_f64(), Some(120.5));
    assert_eq!(ad["description"], "Barely used");
    assert_eq!(ad["is_published"], false);
    assert_eq!(ad["category_id"], cat);
    assert!(ad["image"].is_null());
}

#[tokio::test]
async fn create_ad_with_unknown_author_is_404_and_persists_nothing() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Bikes").await;

    let response = post_json(
        &app,
        "/api/v1/ads",
        json!({
            "name": "Ghost bike",
            "author_id": 999,
            "category_id": cat,
            "price": 10,
            "description": "",
            "is_published": true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "User with id 999 not found");

    let list = body_json(get(&app, "/api/v1/ads").await).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn create_ad_with_unknown_category_is_404() {
    let app = common::build_test_app();
    let author = create_user(&app, "Ivan", &[]).await;

    let response = post_json(
        &app,
        "/api/v1/ads",
        json!({
            "name": "Orphan",
            "author_id": author,
            "category_id": 42,
            "price": 1,
            "description": "",
            "is_published": true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Category with id 42 not found");
}

#[tokio::test]
async fn create_ad_missing_field_is_bad_request() {
    let app = common::build_test_app();

    let response = post_json(&app, "/api/v1/ads", json!({ "name": "No price" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn create_ad_with_negative_price_is_validation_error() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Bikes").await;
    let author = create_user(&app, "Ivan", &[]).await;

    let response = post_json(
        &app,
        "/api/v1/ads",
        json!({
            "name": "Cheap",
            "author_id": author,
            "category_id": cat,
            "price": -1,
            "description": "",
            "is_published": true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_missing_ad_is_404() {
    let app = common::build_test_app();
    let response = get(&app, "/api/v1/ads/12345").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Ad with id 12345 not found");
}

#[tokio::test]
async fn update_ad_replaces_fields_and_keeps_publish_flag() {
    let app = common::build_test_app();
    let bikes = create_category(&app, "Bikes").await;
    let cars = create_category(&app, "Cars").await;
    let ivan = create_user(&app, "Ivan", &[]).await;
    let olga = create_user(&app, "Olga", &[]).await;
    let id = create_ad(&app, "Old name", ivan, bikes, 10.0).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/ads/{id}"),
        json!({
            "name": "New name",
            "author_id": olga,
            "category_id": cars,
            "price": 99,
            "description": "Updated",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let ad = body_json(response).await;
    assert_eq!(ad["name"], "New name");
    assert_eq!(ad["author"], "Olga");
    assert_eq!(ad["category_id"], cars);
    assert_eq!(ad["price"].as_f64(), Some(99.0));
    assert_eq!(ad["is_published"], true);
}

#[tokio::test]
async fn update_ad_with_unknown_author_leaves_ad_untouched() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Bikes").await;
    let ivan = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", ivan, cat, 10.0).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/ads/{id}"),
        json!({
            "name": "Stolen",
            "author_id": 999,
            "category_id": cat,
            "price": 1,
            "description": "",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let ad = body_json(get(&app, &format!("/api/v1/ads/{id}")).await).await;
    assert_eq!(ad["name"], "Bike");
    assert_eq!(ad["author_id"], ivan);
}

#[tokio::test]
async fn delete_ad_twice_is_ok_then_404() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let mut last = 0;
    for n in 1..=7 {
        last = create_ad(&app, &format!("Ad {n}"), author, cat, 1.0).await;
    }
    assert_eq!(last, 7);

    let first = delete(&app, "/api/v1/ads/7").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await, json!({ "status": "ok" }));

    let second = delete(&app, "/api/v1/ads/7").await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(second).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn third_page_of_twenty_five_ads() {
    let app = common::build_test_app_with_page_size(5);
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    for n in 1..=25 {
        create_ad(&app, &format!("Ad {n}"), author, cat, 1.0).await;
    }

    let json = body_json(get(&app, "/api/v1/ads?page=3").await).await;

    assert_eq!(ids(&json), vec![11, 12, 13, 14, 15]);
    assert_eq!(json["num_page"], 5);
    assert_eq!(json["total"], 25);
}

#[tokio::test]
async fn out_of_range_and_garbage_pages_clamp() {
    let app = common::build_test_app_with_page_size(5);
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    for n in 1..=12 {
        create_ad(&app, &format!("Ad {n}"), author, cat, 1.0).await;
    }

    let past_end = body_json(get(&app, "/api/v1/ads?page=99").await).await;
    assert_eq!(ids(&past_end), vec![11, 12]);

    let below = body_json(get(&app, "/api/v1/ads?page=0").await).await;
    assert_eq!(ids(&below), vec![1, 2, 3, 4, 5]);

    let garbage = body_json(get(&app, "/api/v1/ads?page=abc").await).await;
    assert_eq!(ids(&garbage), vec![1, 2, 3, 4, 5]);

    let overflow = body_json(get(&app, "/api/v1/ads?page=99999999999999999999").await).await;
    assert_eq!(ids(&overflow), vec![11, 12]);

    let negative_overflow =
        body_json(get(&app, "/api/v1/ads?page=-99999999999999999999").await).await;
    assert_eq!(ids(&negative_overflow), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn empty_listing_has_one_empty_page() {
    let app = common::build_test_app();

    let response = get(&app, "/api/v1/ads").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "items": [], "num_page": 1, "total": 0 })
    );
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_filter_orders_by_author() {
    let app = common::build_test_app();
    let bikes = create_category(&app, "Bikes").await;
    let cars = create_category(&app, "Cars").await;
    let anna = create_user(&app, "Anna", &[]).await;
    let boris = create_user(&app, "Boris", &[]).await;

    let a1 = create_ad(&app, "Boris bike", boris, bikes, 1.0).await;
    let a2 = create_ad(&app, "Anna car", anna, cars, 1.0).await;
    let a3 = create_ad(&app, "Boris car", boris, cars, 1.0).await;

    let all = body_json(get(&app, &format!("/api/v1/ads?cat={bikes}&cat={cars}")).await).await;
    assert_eq!(ids(&all), vec![a2, a1, a3]);

    let only_cars = body_json(get(&app, &format!("/api/v1/ads?cat={cars}")).await).await;
    assert_eq!(ids(&only_cars), vec![a2, a3]);
}

#[tokio::test]
async fn text_filter_is_case_insensitive() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let bike = create_ad(&app, "Bike", author, cat, 1.0).await;
    create_ad(&app, "Car", author, cat, 1.0).await;
    let helmet = create_ad(&app, "bike helmet", author, cat, 1.0).await;

    let json = body_json(get(&app, "/api/v1/ads?text=BIKE").await).await;

    assert_eq!(ids(&json), vec![bike, helmet]);
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn location_filter_matches_author_locations() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let moscow = create_location(&app, "Moscow").await;
    let kazan = create_location(&app, "Kazan").await;
    let ivan = create_user(&app, "Ivan", &[moscow]).await;
    let olga = create_user(&app, "Olga", &[kazan]).await;
    let ivans = create_ad(&app, "Ivan's", ivan, cat, 1.0).await;
    create_ad(&app, "Olga's", olga, cat, 1.0).await;

    let json = body_json(get(&app, "/api/v1/ads?location=mos").await).await;
    assert_eq!(ids(&json), vec![ivans]);
}

#[tokio::test]
async fn price_range_is_inclusive_and_sorted_ascending() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let p15 = create_ad(&app, "p15", author, cat, 15.0).await;
    create_ad(&app, "p5", author, cat, 5.0).await;
    let p20 = create_ad(&app, "p20", author, cat, 20.0).await;
    let p10 = create_ad(&app, "p10", author, cat, 10.0).await;
    create_ad(&app, "p25", author, cat, 25.0).await;

    let json = body_json(get(&app, "/api/v1/ads?price_from=10&price_to=20").await).await;

    assert_eq!(ids(&json), vec![p10, p15, p20]);
    let prices: Vec<f64> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ad| ad["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![10.0, 15.0, 20.0]);
}

#[tokio::test]
async fn price_step_ordering_overrides_category_ordering() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let anna = create_user(&app, "Anna", &[]).await;
    let boris = create_user(&app, "Boris", &[]).await;
    let expensive = create_ad(&app, "Anna's", anna, cat, 50.0).await;
    let cheap = create_ad(&app, "Boris'", boris, cat, 5.0).await;

    let by_author = body_json(get(&app, &format!("/api/v1/ads?cat={cat}")).await).await;
    assert_eq!(ids(&by_author), vec![expensive, cheap]);

    let by_price =
        body_json(get(&app, &format!("/api/v1/ads?cat={cat}&price_from=0")).await).await;
    assert_eq!(ids(&by_price), vec![cheap, expensive]);
}

#[tokio::test]
async fn empty_and_unknown_params_are_ignored() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    create_ad(&app, "One", author, cat, 1.0).await;
    create_ad(&app, "Two", author, cat, 2.0).await;

    let json = body_json(get(&app, "/api/v1/ads?text=&cat=&price_to=&colour=red").await).await;
    assert_eq!(ids(&json), vec![1, 2]);
}

#[tokio::test]
async fn malformed_filter_values_are_bad_request() {
    let app = common::build_test_app();

    for uri in [
        "/api/v1/ads?price_from=cheap",
        "/api/v1/ads?price_to=ten",
        "/api/v1/ads?cat=bikes",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST", "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_image_attaches_url_and_serves_file() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;

    let response = post_file(
        &app,
        &format!("/api/v1/ads/{id}/image"),
        "image",
        "bike.PNG",
        b"fake-png",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let ad = body_json(response).await;
    let url = ad["image"].as_str().unwrap().to_string();
    let prefix = format!("{BASE_URL}/media/ads/{id}_");
    assert!(url.starts_with(&prefix), "unexpected url {url}");
    assert!(url.ends_with(".png"));

    let media_path = url.strip_prefix(BASE_URL).unwrap();
    let served = get(&app, media_path).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, b"fake-png");

    let fetched = body_json(get(&app, &format!("/api/v1/ads/{id}")).await).await;
    assert_eq!(fetched["image"], url.as_str());
}

#[tokio::test]
async fn replacing_image_removes_previous_file() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;
    let uri = format!("/api/v1/ads/{id}/image");

    let first = body_json(post_file(&app, &uri, "image", "a.jpg", b"one").await).await;
    let first_key = first["image"]
        .as_str()
        .unwrap()
        .strip_prefix(&format!("{BASE_URL}/media/"))
        .unwrap()
        .to_string();
    assert!(app.media_root().join(&first_key).exists());

    let second = post_file(&app, &uri, "image", "b.webp", b"two").await;
    assert_eq!(second.status(), StatusCode::OK);

    assert!(!app.media_root().join(&first_key).exists());
}

#[tokio::test]
async fn clear_image_sets_null_and_deletes_file() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;
    let uri = format!("/api/v1/ads/{id}/image");

    let uploaded = body_json(post_file(&app, &uri, "image", "a.gif", b"gif").await).await;
    let key = uploaded["image"]
        .as_str()
        .unwrap()
        .strip_prefix(&format!("{BASE_URL}/media/"))
        .unwrap()
        .to_string();

    let response = delete(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["image"].is_null());
    assert!(!app.media_root().join(key).exists());
}

#[tokio::test]
async fn upload_without_image_field_is_rejected() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;

    let response = post_file(
        &app,
        &format!("/api/v1/ads/{id}/image"),
        "photo",
        "a.png",
        b"png",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn upload_empty_file_is_rejected() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;

    let response = post_file(&app, &format!("/api/v1/ads/{id}/image"), "image", "a.png", b"").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_unsupported_extension_is_validation_error() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;

    let response = post_file(
        &app,
        &format!("/api/v1/ads/{id}/image"),
        "image",
        "notes.txt",
        b"text",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn upload_to_missing_ad_is_404() {
    let app = common::build_test_app();

    let response = post_file(&app, "/api/v1/ads/77/image", "image", "a.png", b"png").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_over_size_limit_is_413_and_keeps_ad_unchanged() {
    let app = common::build_test_app();
    let cat = create_category(&app, "Misc").await;
    let author = create_user(&app, "Ivan", &[]).await;
    let id = create_ad(&app, "Bike", author, cat, 1.0).await;

    // The test config allows 1 MiB.
    let oversized = vec![0u8; 2 * 1024 * 1024];
    let response = post_file(
        &app,
        &format!("/api/v1/ads/{id}/image"),
        "image",
        "huge.png",
        &oversized,
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert!(json["error"].as_str().unwrap().contains("1048576"));

    let ad = body_json(get(&app, &format!("/api/v1/ads/{id}")).await).await;
    assert_eq!(ad["image"], Value::Null);
    assert!(!app.media_root().join("ads").exists());
}
