mod common;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::json;
use stockroom_api::entities::{purchase_order, purchase_order_item};
use stockroom_api::services::suppliers::CreateSupplierRequest;
use uuid::Uuid;

use common::{response_json, TestApp};

async fn seed_supplier(app: &TestApp, name: &str) -> Uuid {
    app.state
        .services
        .suppliers
        .create_supplier(CreateSupplierRequest {
            name: name.to_string(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
        })
        .await
        .unwrap()
        .id
}

async fn seed_part(app: &TestApp, part_no: &str) -> Uuid {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/parts",
            Some(json!({ "partNo": part_no })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["part"]["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn order_creation_fills_defaults_and_copies_supplier_name() {
    let app = TestApp::new().await;
    let supplier_id = seed_supplier(&app, "Acme Industrial").await;
    let part_id = seed_part(&app, "CB-325").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/purchase-orders",
            Some(json!({
                "poNo": "PO-2024-001",
                "supplierId": supplier_id,
                "items": [
                    { "partId": part_id },
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;

    let order = &body["purchaseOrder"];
    assert_eq!(order["poNo"], "PO-2024-001");
    // Name resolved from the referenced supplier, defaults applied elsewhere.
    assert_eq!(order["supplierName"], "Acme Industrial");
    assert_eq!(order["type"], "purchase");
    assert_eq!(order["status"], "draft");
    assert_eq!(order["totalAmount"], "0");
    assert_eq!(order["supplier"]["name"], "Acme Industrial");

    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(items[0]["unitPrice"], "0");
    assert_eq!(items[0]["totalPrice"], "0");
    assert_eq!(items[0]["partNo"], "");
    assert_eq!(items[0]["part"]["partNo"], "CB-325");
}

#[tokio::test]
async fn explicit_supplier_name_wins_over_lookup() {
    let app = TestApp::new().await;
    let supplier_id = seed_supplier(&app, "Acme Industrial").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/purchase-orders",
            Some(json!({
                "poNo": "PO-2024-002",
                "supplierId": supplier_id,
                "supplierName": "Acme (Northern Branch)",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(
        body["purchaseOrder"]["supplierName"],
        "Acme (Northern Branch)"
    );
}

#[tokio::test]
async fn missing_supplier_name_rejects_before_anything_is_written() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/purchase-orders",
            Some(json!({
                "poNo": "PO-2024-003",
                "items": [ { "partNo": "CB-1", "quantity": 5 } ],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Supplier name is required");

    let orders = purchase_order::Entity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn failed_line_item_rolls_back_the_whole_order() {
    let app = TestApp::new().await;
    let part_id = seed_part(&app, "CB-325").await;

    // The second line references a part that does not exist, so its insert
    // violates the foreign key after the order and first line are written.
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/purchase-orders",
            Some(json!({
                "poNo": "PO-2024-004",
                "supplierName": "Acme Industrial",
                "items": [
                    { "partId": part_id, "quantity": 2 },
                    { "partId": Uuid::new_v4(), "quantity": 3 },
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let orders = purchase_order::Entity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(orders.is_empty());
    let items = purchase_order_item::Entity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_filters_by_status_and_orders_newest_first() {
    let app = TestApp::new().await;

    for (po_no, status) in [("PO-A", "draft"), ("PO-B", "ordered"), ("PO-C", "draft")] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/purchase-orders",
                Some(json!({
                    "poNo": po_no,
                    "supplierName": "Acme Industrial",
                    "status": status,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request_authenticated(Method::GET, "/api/purchase-orders?status=draft", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let orders = body["purchaseOrders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["status"] == "draft"));
}

#[tokio::test]
async fn get_missing_order_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/purchase-orders/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
