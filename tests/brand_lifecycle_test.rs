mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use stockroom_api::entities::brand;
use stockroom_api::services::items::CreateItemRequest;
use uuid::Uuid;

use common::{response_json, TestApp};

#[tokio::test]
async fn brand_crud_round_trip() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/brands",
            Some(json!({ "name": "Makita" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["brand"]["name"], "Makita");
    assert_eq!(body["brand"]["status"], "active");
    let brand_id = body["brand"]["id"].as_str().unwrap().to_string();

    let response = app
        .request_authenticated(Method::GET, &format!("/api/brands/{brand_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["brand"]["id"], brand_id.as_str());

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/brands/{brand_id}"),
            Some(json!({ "name": "Makita Tools", "status": "inactive" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["brand"]["name"], "Makita Tools");
    assert_eq!(body["brand"]["status"], "inactive");
}

#[tokio::test]
async fn brand_list_carries_names_and_full_rows() {
    let app = TestApp::new().await;

    for name in ["Bosch", "Atlas"] {
        let response = app
            .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": name })))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request_authenticated(Method::GET, "/api/brands", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    // Sorted ascending by name, with the bare name list for dropdowns.
    assert_eq!(body["brands"], json!(["Atlas", "Bosch"]));
    assert_eq!(body["brandList"][0]["name"], "Atlas");
    assert_eq!(body["brandList"][1]["name"], "Bosch");

    let response = app
        .request_authenticated(Method::GET, "/api/brands?search=Bo", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["brands"], json!(["Bosch"]));
}

#[tokio::test]
async fn duplicate_brand_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": "Hilti" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": "Hilti" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Brand already exists");

    // Exact-match check is case sensitive, so a different casing is a new brand.
    let response = app
        .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": "HILTI" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The rejected duplicate left no extra row behind.
    let count = brand::Entity::find()
        .filter(brand::Column::Name.eq("Hilti"))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
    let total = brand::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn malformed_body_is_a_json_400() {
    let app = TestApp::new().await;

    // Wrong field type: syntactically valid JSON the request struct rejects.
    let response = app
        .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": 123 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn unreferenced_brand_is_hard_deleted() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/brands",
            Some(json!({ "name": "Orphan" })),
        )
        .await;
    let body = response_json(response).await;
    let brand_id: Uuid = body["brand"]["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .request_authenticated(Method::DELETE, &format!("/api/brands/{brand_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Brand deleted successfully");
    assert!(body.get("brand").is_none());

    let row = brand::Entity::find_by_id(brand_id)
        .one(&*app.state.db)
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn referenced_brand_is_deactivated_instead_of_deleted() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/brands",
            Some(json!({ "name": "InUse" })),
        )
        .await;
    let body = response_json(response).await;
    let brand_id: Uuid = body["brand"]["id"].as_str().unwrap().parse().unwrap();

    app.state
        .services
        .items
        .create_item(CreateItemRequest {
            item_no: Some("IT-001".to_string()),
            name: "Angle grinder".to_string(),
            brand_id: Some(brand_id),
        })
        .await
        .unwrap();

    let response = app
        .request_authenticated(Method::DELETE, &format!("/api/brands/{brand_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        "Brand marked as inactive because it is in use"
    );
    assert_eq!(body["brand"]["status"], "inactive");

    // Row survives so the item keeps a valid reference.
    let row = brand::Entity::find_by_id(brand_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "inactive");
}

#[tokio::test]
async fn deleting_missing_brand_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/brands/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Brand not found");
}

#[tokio::test]
async fn blank_brand_name_fails_validation() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(Method::POST, "/api/brands", Some(json!({ "name": "" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
