//! Router tests: real router, in-memory SQLite, `oneshot` requests

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{Order, ProductCreate, Role};
use tower::ServiceExt;

use crate::core::ServerState;
use crate::db::repository::{order, product, user};

struct TestApp {
    state: ServerState,
    app: Router,
}

impl TestApp {
    async fn new() -> Self {
        let state = ServerState::for_tests().await.unwrap();
        let app = super::build_app(state.clone());
        Self { state, app }
    }

    /// Account row plus a bearer token for it
    async fn account(&self, email: &str, role: Role) -> (i64, String) {
        let created = user::create(&self.state.db.pool, email, "unused-hash", role)
            .await
            .unwrap();
        let token = self
            .state
            .get_jwt_service()
            .generate_token(created.id, email, role)
            .unwrap();
        (created.id, token)
    }

    async fn product(&self, title: &str, stock: i64, price: f64) -> i64 {
        product::create(
            &self.state.db.pool,
            ProductCreate {
                title: title.into(),
                category: "Peripherals".into(),
                supply_price: price / 2.0,
                retail_price: price,
                available_quantity: stock,
                supplier: "Acme".into(),
                image1: None,
                image2: None,
                image3: None,
                image4: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn stock(&self, id: i64) -> i64 {
        product::find_by_id(&self.state.db.pool, id)
            .await
            .unwrap()
            .unwrap()
            .available_quantity
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn checkout(titles: Value, quantities: Value, total: f64) -> Value {
    json!({
        "product_title": titles,
        "quantity": quantities,
        "total": total,
        "name": "Ada Lovelace",
        "address": "12 Analytical Way",
        "phone": "5550100",
        "email": "ada@example.com",
        "payment_method": "card",
    })
}

async fn raw_order(app: &TestApp, id: &str, user_id: i64, titles: &str, quantities: &str) {
    order::insert(
        &app.state.db.pool,
        &Order {
            id: id.into(),
            user_id,
            product_title: titles.into(),
            quantity: quantities.into(),
            total: 10.0,
            name: "n".into(),
            address: "a".into(),
            phone: "p".into(),
            email: "e@example.com".into(),
            payment_method: "card".into(),
            received_to_supplier: false,
            created_at: shared::util::now_millis(),
        },
    )
    .await
    .unwrap();
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

// ========== Orders ==========

#[tokio::test]
async fn test_checkout_creates_order_and_empties_cart() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;
    let mouse = app.product("Mouse", 5, 10.0).await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/cart/add",
            Some(&token),
            Some(json!({"productId": mouse, "quantity": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders/add",
            Some(&token),
            Some(checkout(json!("Mouse"), json!("2"), 20.0)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["orderId"].as_str().unwrap().len(), 6);

    // stock is only touched by the receive transition
    assert_eq!(app.stock(mouse).await, 5);

    let (_, cart) = app.call(Method::GET, "/api/cart", Some(&token), None).await;
    assert_eq!(cart, json!([]));
}

#[tokio::test]
async fn test_checkout_reports_shortfalls() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;
    app.product("Mouse", 5, 10.0).await;
    app.product("Keyboard", 10, 30.0).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders/add",
            Some(&token),
            Some(checkout(json!(["Keyboard", "Mouse"]), json!([1, 6]), 90.0)),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
    let issues = body["details"]["stock_issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0],
        json!({"title": "Mouse", "requestedQuantity": 6, "availableQuantity": 5})
    );

    let (_, orders) = app.call(Method::GET, "/api/orders/user", Some(&token), None).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_checkout_rejects_missing_fields_and_anonymous_callers() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders/add",
            Some(&token),
            Some(json!({"product_title": "Mouse", "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("total"));

    let (status, _) = app
        .call(
            Method::POST,
            "/api/orders/add",
            None,
            Some(checkout(json!("Mouse"), json!(1), 10.0)),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_for_another_user_requires_admin() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;
    let (other_id, _) = app.account("other@example.com", Role::User).await;
    app.product("Mouse", 5, 10.0).await;

    let mut body = checkout(json!("Mouse"), json!(1), 10.0);
    body["user_id"] = json!(other_id);
    let (status, _) = app
        .call(Method::POST, "/api/orders/add", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_status_decrements_once() {
    let app = TestApp::new().await;
    let (_, shopper) = app.account("shopper@example.com", Role::User).await;
    let (_, courier) = app.account("courier@example.com", Role::DeliveryPartner).await;
    let keyboard = app.product("Keyboard", 10, 30.0).await;

    let (_, created) = app
        .call(
            Method::POST,
            "/api/orders/add",
            Some(&shopper),
            Some(checkout(json!("Keyboard"), json!(1), 30.0)),
        )
        .await;
    let order_id = created["orderId"].as_str().unwrap().to_string();
    let update = json!({"orderId": order_id, "receivedToSupplier": true});

    let (status, _) = app
        .call(Method::PUT, "/api/orders/update-status", Some(&shopper), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::PUT, "/api/orders/update-status", Some(&courier), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order status updated successfully");
    assert_eq!(body["data"]["status"], "received");
    assert_eq!(app.stock(keyboard).await, 9);

    let (status, body) = app
        .call(Method::PUT, "/api/orders/update-status", Some(&courier), Some(update))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order already marked as received");
    assert_eq!(body["data"]["affectedRows"], 0);
    assert_eq!(app.stock(keyboard).await, 9);

    let (_, received) = app
        .call(Method::GET, "/api/orders/received", Some(&courier), None)
        .await;
    assert_eq!(received.as_array().unwrap().len(), 1);
    let (_, pending) = app.call(Method::GET, "/api/orders", Some(&courier), None).await;
    assert_eq!(pending, json!([]));
}

#[tokio::test]
async fn test_update_status_partial_failure_is_multi_status() {
    let app = TestApp::new().await;
    let (user_id, _) = app.account("shopper@example.com", Role::User).await;
    let (_, admin) = app.account("admin@example.com", Role::Admin).await;
    let keyboard = app.product("Keyboard", 10, 30.0).await;
    raw_order(&app, "PART01", user_id, "Keyboard, Ghost", "2, 1").await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/orders/update-status",
            Some(&admin),
            Some(json!({"orderId": "PART01", "receivedToSupplier": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["code"], 4005);
    assert_eq!(
        body["message"],
        "Order status updated, but failed to update quantities for: Ghost"
    );
    assert_eq!(body["details"]["failed_titles"], json!(["Ghost"]));
    assert_eq!(body["data"]["status"], "partially_received");
    assert_eq!(app.stock(keyboard).await, 8);

    let (_, received) = app.call(Method::GET, "/api/orders/received", Some(&admin), None).await;
    assert_eq!(received[0]["receivedToSupplier"], true);
}

#[tokio::test]
async fn test_update_status_validation() {
    let app = TestApp::new().await;
    let (_, admin) = app.account("admin@example.com", Role::Admin).await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/orders/update-status",
            Some(&admin),
            Some(json!({"orderId": "ABC123"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/orders/update-status",
            Some(&admin),
            Some(json!({"orderId": "ABC123", "receivedToSupplier": false})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/orders/update-status",
            Some(&admin),
            Some(json!({"orderId": "NOPE00", "receivedToSupplier": true})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_owner_marks_received_and_history() {
    let app = TestApp::new().await;
    let (owner_id, owner) = app.account("shopper@example.com", Role::User).await;
    let (_, stranger) = app.account("other@example.com", Role::User).await;
    let mouse = app.product("Mouse", 5, 10.0).await;
    raw_order(&app, "OWN001", owner_id, "Mouse", "3").await;

    let (status, _) = app
        .call(Method::PUT, "/api/orders/OWN001/received", Some(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, history) = app.call(Method::GET, "/api/orders/history", Some(&owner), None).await;
    assert_eq!(history, json!([]));

    let (status, body) = app
        .call(Method::PUT, "/api/orders/OWN001/received", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order marked as received successfully");
    assert_eq!(app.stock(mouse).await, 2);

    let (_, history) = app.call(Method::GET, "/api/orders/history", Some(&owner), None).await;
    assert_eq!(history[0]["id"], "OWN001");
}

#[tokio::test]
async fn test_cancel_order() {
    let app = TestApp::new().await;
    let (owner_id, owner) = app.account("shopper@example.com", Role::User).await;
    let (_, courier) = app.account("courier@example.com", Role::DeliveryPartner).await;
    let mouse = app.product("Mouse", 5, 10.0).await;
    raw_order(&app, "CAN001", owner_id, "Mouse", "2").await;

    // delivery partners cannot cancel
    let (status, _) = app
        .call(Method::DELETE, "/api/orders/CAN001", Some(&courier), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::DELETE, "/api/orders/CAN001", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order cancelled successfully");
    assert_eq!(app.stock(mouse).await, 5);

    let (status, _) = app
        .call(Method::DELETE, "/api/orders/CAN001", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports_are_admin_only() {
    let app = TestApp::new().await;
    let (user_id, shopper) = app.account("shopper@example.com", Role::User).await;
    let (_, admin) = app.account("admin@example.com", Role::Admin).await;
    app.product("Widget", 50, 4.0).await;
    raw_order(&app, "TOP001", user_id, "Widget", "2").await;
    raw_order(&app, "TOP002", user_id, "Widget", "3").await;

    let (status, _) = app
        .call(Method::GET, "/api/orders/top-selling", Some(&shopper), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, top) = app
        .call(Method::GET, "/api/orders/top-selling", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top[0]["productName"], "Widget");
    assert_eq!(top[0]["totalSold"], 5);

    let (status, body) = app
        .call(Method::GET, "/api/orders/sales-report?year=2025", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4007);

    let (status, rows) = app
        .call(Method::GET, "/api/orders/sales-report?month=1&year=1999", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, json!([]));
}

// ========== Delivery details ==========

#[tokio::test]
async fn test_delivery_details_crud() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;
    let (_, other) = app.account("other@example.com", Role::User).await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/orders/delivery-details",
            Some(&token),
            Some(json!({"fullName": "Ada", "city": "London"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let address = json!({
        "fullName": "Ada Lovelace",
        "streetAddress": "12 Analytical Way",
        "city": "London",
        "phoneNumber": "5550100",
        "email": "ada@example.com",
    });
    let (status, created) = app
        .call(Method::POST, "/api/orders/delivery-details", Some(&token), Some(address.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/orders/delivery-details/{id}");

    let (status, body) = app.call(Method::GET, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);

    let mut moved = address;
    moved["city"] = json!("Paris");
    let (status, updated) = app.call(Method::PUT, &uri, Some(&token), Some(moved)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Paris");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app
        .call(Method::GET, "/api/orders/delivery-details", Some(&token), None)
        .await;
    assert_eq!(list, json!([]));
}

// ========== Products ==========

#[tokio::test]
async fn test_product_writes_require_admin() {
    let app = TestApp::new().await;
    let (_, shopper) = app.account("shopper@example.com", Role::User).await;
    let (_, admin) = app.account("admin@example.com", Role::Admin).await;
    let product = json!({
        "title": "Monitor",
        "category": "Displays",
        "supplyPrice": 80.0,
        "retailPrice": 150.0,
        "availableQuantity": 4,
        "supplier": "Acme",
        "image1": {"data": "aGVsbG8=", "mimeType": "image/png"},
    });

    let (status, body) = app
        .call(Method::POST, "/api/products/add", Some(&shopper), Some(product.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, created) = app
        .call(Method::POST, "/api/products/add", Some(&admin), Some(product.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    // comma would break the joined line item columns
    let mut bad = product;
    bad["title"] = json!("Monitor, 27in");
    let (status, _) = app
        .call(Method::POST, "/api/products/add", Some(&admin), Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .call(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&admin),
            Some(json!({"retailPrice": 140.0})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["retailPrice"], 140.0);
    assert_eq!(updated["image1"]["data"], "aGVsbG8=");

    let (status, _) = app
        .call(Method::DELETE, &format!("/api/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .call(Method::GET, &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_product_listings_are_public() {
    let app = TestApp::new().await;
    let mouse = app.product("Mouse", 5, 10.0).await;
    app.product("Keyboard", 5, 30.0).await;

    let (status, all) = app.call(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, groups) = app
        .call(Method::GET, "/api/products/grouped-by-category", None, None)
        .await;
    assert_eq!(groups[0]["category"], "Peripherals");
    assert_eq!(groups[0]["products"].as_array().unwrap().len(), 2);

    let (_, others) = app
        .call(
            Method::GET,
            &format!("/api/products/other?excludeId={mouse}&limit=5"),
            None,
            None,
        )
        .await;
    assert_eq!(others.as_array().unwrap().len(), 1);
    assert_eq!(others[0]["title"], "Keyboard");
}

// ========== Cart ==========

#[tokio::test]
async fn test_cart_lifecycle() {
    let app = TestApp::new().await;
    let (_, token) = app.account("shopper@example.com", Role::User).await;
    let mouse = app.product("Mouse", 5, 10.0).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/cart/add",
            Some(&token),
            Some(json!({"productId": 999, "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/cart/add",
            Some(&token),
            Some(json!({"productId": mouse, "quantity": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.call(
        Method::POST,
        "/api/cart/add",
        Some(&token),
        Some(json!({"productId": mouse, "quantity": 2})),
    )
    .await;
    let (_, lines) = app.call(Method::GET, "/api/cart", Some(&token), None).await;
    let line_id = lines[0]["id"].as_i64().unwrap();
    assert_eq!(lines[0]["totalPrice"], 20.0);

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/cart/update",
            Some(&token),
            Some(json!({"cartId": line_id, "quantity": 4})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::DELETE,
            "/api/cart/remove",
            Some(&token),
            Some(json!({"cartId": line_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::DELETE,
            "/api/cart/remove",
            Some(&token),
            Some(json!({"cartId": line_id})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);

    let (status, _) = app.call(Method::DELETE, "/api/cart/empty1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

// ========== Slides ==========

#[tokio::test]
async fn test_slides() {
    let app = TestApp::new().await;
    let (_, admin) = app.account("admin@example.com", Role::Admin).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/slides/add",
            Some(&admin),
            Some(json!({
                "title": "Summer sale",
                "description": "Everything must go",
                "image": {"data": "%%%", "mimeType": "image/png"},
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);

    let (status, slide) = app
        .call(
            Method::POST,
            "/api/slides/add",
            Some(&admin),
            Some(json!({
                "title": "Summer sale",
                "description": "Everything must go",
                "image": {"data": "aGVsbG8=", "mimeType": "image/png"},
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, slides) = app.call(Method::GET, "/api/slides", None, None).await;
    assert_eq!(slides[0]["image"], "data:image/png;base64,aGVsbG8=");

    let id = slide["id"].as_i64().unwrap();
    let (status, _) = app
        .call(Method::DELETE, &format!("/api/slides/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .call(Method::DELETE, &format!("/api/slides/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

// ========== Auth ==========

#[tokio::test]
async fn test_signup_signin_me() {
    let app = TestApp::new().await;
    let credentials = json!({"email": "New@Example.com", "password": "Passw0rd!"});

    let (status, body) = app
        .call(Method::POST, "/api/auth/signup", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = app
        .call(Method::POST, "/api/auth/signup", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1007);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/signin",
            None,
            Some(json!({"email": "new@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, body) = app
        .call(Method::POST, "/api/auth/signin", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.call(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "new@example.com");
}

#[tokio::test]
async fn test_signup_rejects_weak_password_and_privileged_roles() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "a@example.com", "password": "password"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1006);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({"email": "b@example.com", "password": "Passw0rd!", "role": "admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_blocks_user() {
    let app = TestApp::new().await;
    let (admin_id, admin) = app.account("admin@example.com", Role::Admin).await;
    let (user_id, shopper) = app.account("shopper@example.com", Role::User).await;

    let (status, _) = app
        .call(Method::GET, "/api/auth/users", Some(&shopper), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::PUT, &format!("/api/auth/users/block/{admin_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3002);

    let (status, _) = app
        .call(Method::PUT, &format!("/api/auth/users/block/{user_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // an issued token stops working once the account is blocked
    let (status, body) = app.call(Method::GET, "/api/auth/me", Some(&shopper), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1005);

    let (_, blocked) = app
        .call(Method::GET, "/api/auth/users/blocked", Some(&admin), None)
        .await;
    assert_eq!(blocked[0]["id"], user_id);

    let (status, _) = app
        .call(Method::PUT, "/api/auth/users/unblock/999", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signin_rate_limited() {
    let app = TestApp::new().await;
    let attempt = json!({"email": "nobody@example.com", "password": "Passw0rd!"});

    for _ in 0..5 {
        let (status, _) = app
            .call(Method::POST, "/api/auth/signin", None, Some(attempt.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = app
        .call(Method::POST, "/api/auth/signin", None, Some(attempt))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 9);
}
