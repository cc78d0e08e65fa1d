mod common;

use axum::http::StatusCode;
use serde_json::json;

// Single-record lifecycle through the REST surface.

#[tokio::test]
async fn create_show_update_destroy_round_trip() {
    let app = common::app();
    let admin = common::admin_token();

    // Create
    let (status, created) = common::send(
        &app,
        "POST",
        "/v1/banners",
        Some(&admin),
        Some(json!({"title": "Promo", "subtitle": "Save now", "image": "x.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Banner creado Satisfactoriamente");
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["title"], "Promo");
    assert_eq!(created["data"]["subtitle"], "Save now");
    assert_eq!(created["data"]["image"], "x.png");

    // Show returns the same fields
    let path = format!("/v1/banners/{}", id);
    let (status, fetched) = common::send(&app, "GET", &path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["title"], "Promo");
    assert_eq!(fetched["data"]["subtitle"], "Save now");

    // Partial update: untouched fields keep their values
    let (status, updated) = common::send(
        &app,
        "PUT",
        &path,
        Some(&admin),
        Some(json!({"subtitle": "Last week"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Banner actualizado Satisfactoriamente");
    assert_eq!(updated["data"]["title"], "Promo");
    assert_eq!(updated["data"]["subtitle"], "Last week");
    assert_eq!(updated["data"]["image"], "x.png");

    // Destroy, then the record is gone
    let (status, destroyed) = common::send(&app, "DELETE", &path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(destroyed["success"], true);
    assert_eq!(destroyed["message"], "Banner eliminado Satisfactoriamente");

    let (status, _) = common::send(&app, "GET", &path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send(&app, "DELETE", &path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn optional_fields_default_to_null() {
    let app = common::app();
    let admin = common::admin_token();

    let (_, created) = common::send(
        &app,
        "POST",
        "/v1/banners",
        Some(&admin),
        Some(json!({"title": "Promo"})),
    )
    .await;
    assert!(created["data"]["subtitle"].is_null());
    assert!(created["data"]["image"].is_null());
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = common::app();
    let admin = common::admin_token();

    let (status, payload) = common::send(
        &app,
        "POST",
        "/v1/banners",
        Some(&admin),
        Some(json!({"subtitle": "no title"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["code"], "UNPROCESSABLE_ENTITY");
    assert_eq!(
        payload["field_errors"]["title"],
        "This field is required"
    );

    // Nothing was written
    let (_, listing) = common::send(&app, "GET", "/v1/banners", Some(&admin), None).await;
    assert_eq!(listing["data"]["total"], 0);
}

#[tokio::test]
async fn create_rejects_overlong_values() {
    let app = common::app();
    let admin = common::admin_token();

    let (status, payload) = common::send(
        &app,
        "POST",
        "/v1/banners",
        Some(&admin),
        Some(json!({"title": "x".repeat(101)})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(payload["field_errors"]["title"]
        .as_str()
        .unwrap()
        .contains("100"));
}

#[tokio::test]
async fn update_rejects_clearing_a_required_field() {
    let app = common::app();
    let admin = common::admin_token();
    let id = common::seed_banner(&app, &admin, "Promo", None).await;

    let (status, payload) = common::send(
        &app,
        "PUT",
        &format!("/v1/banners/{}", id),
        Some(&admin),
        Some(json!({"title": null})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(payload["field_errors"]["title"].is_string());
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let app = common::app();
    let admin = common::admin_token();

    let (status, _) = common::send(
        &app,
        "PUT",
        "/v1/banners/999",
        Some(&admin),
        Some(json!({"title": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_entity_is_not_found() {
    let app = common::app();
    let admin = common::admin_token();

    let (status, payload) = common::send(&app, "GET", "/v1/payrolls", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_payload_keys_are_ignored() {
    let app = common::app();
    let admin = common::admin_token();

    let (status, created) = common::send(
        &app,
        "POST",
        "/v1/banners",
        Some(&admin),
        Some(json!({"title": "Promo", "id": 999, "created_at": "1999-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["id"], 1);
    assert_ne!(created["data"]["created_at"], "1999-01-01");
}

#[tokio::test]
async fn entities_share_the_service_but_not_the_schema() {
    let app = common::app();
    let admin = common::admin_token();

    // Agreements require name and photo
    let (status, payload) = common::send(
        &app,
        "POST",
        "/v1/agreements",
        Some(&admin),
        Some(json!({"name": "Municipal survey"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(payload["field_errors"]["photo"].is_string());

    let (status, created) = common::send(
        &app,
        "POST",
        "/v1/agreements",
        Some(&admin),
        Some(json!({"name": "Municipal survey", "photo": "seal.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Acuerdo creado Satisfactoriamente");

    // FAQ label is feminine
    let (status, created) = common::send(
        &app,
        "POST",
        "/v1/faqs",
        Some(&admin),
        Some(json!({"question": "¿Cómo me colegio?", "answer": "En la sede central."})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Pregunta creada Satisfactoriamente");
}
