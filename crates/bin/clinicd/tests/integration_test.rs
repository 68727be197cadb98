//! End-to-end tests over the full HTTP stack with an in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use clinic_adapter_http_axum::state::{Adapters, AppState, Ports};
use clinic_adapter_storage_sqlite_sqlx::{
    Config, SqliteOrderRepository, SqlitePaymentLedger, SqliteReviewRepository,
    SqliteServiceRepository, SqliteUserRepository,
};
use clinic_adapter_token_jwt::JwtTokenCodec;
use clinic_app::ports::{PaymentLedger, PaymentProcessor, UserRepository};
use clinic_domain::error::ClinicError;
use clinic_domain::payment::{ChargeRequest, PaymentIntent};
use clinic_domain::user::Role;

struct StubProcessor;

impl PaymentProcessor for StubProcessor {
    async fn create_intent(&self, charge: ChargeRequest) -> Result<PaymentIntent, ClinicError> {
        Ok(PaymentIntent {
            client_secret: format!("pi_{}_{}_secret", charge.amount, charge.currency),
        })
    }
}

struct TestAdapters;

impl Adapters for TestAdapters {
    type Services = SqliteServiceRepository;
    type Orders = SqliteOrderRepository;
    type Users = SqliteUserRepository;
    type Reviews = SqliteReviewRepository;
    type Ledger = SqlitePaymentLedger;
    type Processor = StubProcessor;
    type Tokens = JwtTokenCodec;
}

/// The router plus direct handles on the same database for seeding and
/// inspecting state behind the API's back.
struct TestApp {
    router: Router,
    users: SqliteUserRepository,
    ledger: SqlitePaymentLedger,
}

impl TestApp {
    async fn new() -> Self {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();
        let secret = SecretString::from("integration-secret".to_string());

        let ports = Ports::<TestAdapters> {
            services: SqliteServiceRepository::new(pool.clone()),
            orders: SqliteOrderRepository::new(pool.clone()),
            users: SqliteUserRepository::new(pool.clone()),
            reviews: SqliteReviewRepository::new(pool.clone()),
            ledger: SqlitePaymentLedger::new(pool.clone()),
            processor: StubProcessor,
            tokens: JwtTokenCodec::new(&secret),
        };

        Self {
            router: clinic_adapter_http_axum::router::build(AppState::new(ports, "usd")),
            users: SqliteUserRepository::new(pool.clone()),
            ledger: SqlitePaymentLedger::new(pool),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Sign in through the API and return the issued token.
    async fn sign_in(&self, email: &str) -> String {
        let (status, body) = self
            .send("PUT", &format!("/user/{email}"), None, Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Sign in and grant the admin role directly in storage.
    async fn admin_token(&self, email: &str) -> String {
        let token = self.sign_in(email).await;
        self.users
            .set_role(email.to_string(), Role::Admin)
            .await
            .unwrap();
        token
    }

    async fn create_service(&self, name: &str, slots: &[&str]) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/services",
                None,
                Some(json!({ "name": name, "price": 80, "slots": slots, "img": "a.png" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn place_order(
        &self,
        email: &str,
        treatment: &str,
        date: &str,
        slot: &str,
    ) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/orders",
            None,
            Some(json!({
                "email": email,
                "treatment": treatment,
                "date": date,
                "slot": slot,
                "totalPrice": 80,
                "patientName": "Rafi"
            })),
        )
        .await
    }
}

fn slots(service: &Value) -> Vec<&str> {
    service["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot.as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn should_hide_booked_slot_only_on_booked_date() {
    let app = TestApp::new().await;
    app.create_service("A", &["9am", "10am"]).await;
    let (status, _) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, booked) = app.send("GET", "/available?date=2024-01-01", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots(&booked[0]), ["10am"]);

    let (_, free) = app.send("GET", "/available?date=2024-01-02", None, None).await;
    assert_eq!(slots(&free[0]), ["9am", "10am"]);

    let (_, again) = app.send("GET", "/available?date=2024-01-01", None, None).await;
    assert_eq!(again, booked);

    let (_, catalog) = app.send("GET", "/services", None, None).await;
    assert_eq!(slots(&catalog[0]), ["9am", "10am"]);
    assert_eq!(catalog[0]["img"], "a.png");
}

#[tokio::test]
async fn should_reject_double_booking_with_409() {
    let app = TestApp::new().await;
    app.create_service("A", &["9am"]).await;
    app.place_order("x@y.com", "A", "2024-01-01", "9am").await;

    let (status, body) = app.place_order("z@y.com", "A", "2024-01-01", "9am").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "slot_taken");
}

#[tokio::test]
async fn should_free_slot_when_order_deleted() {
    let app = TestApp::new().await;
    let (_, order) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    let id = order["_id"].as_str().unwrap();

    let (status, _) = app.send("DELETE", &format!("/orders/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send("DELETE", &format!("/orders/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.place_order("z@y.com", "A", "2024-01-01", "9am").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn should_distinguish_missing_and_invalid_credentials() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/all-orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, body) = app.send("GET", "/all-orders", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn should_grant_admin_access_after_promotion() {
    let app = TestApp::new().await;
    let admin = app.admin_token("boss@clinic.com").await;
    let customer = app.sign_in("x@y.com").await;

    let (status, body) = app.send("GET", "/all-orders", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = app
        .send("PUT", "/user/admin/x@y.com", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, outcome) = app
        .send("PUT", "/user/admin/x@y.com", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "matched": 1, "modified": 1 }));

    // Same token as before: the role is read from storage on every request.
    let (status, _) = app.send("GET", "/all-orders", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, flag) = app.send("GET", "/admin/x@y.com", None, None).await;
    assert_eq!(flag, json!({ "admin": true }));
}

#[tokio::test]
async fn should_not_promote_unknown_user() {
    let app = TestApp::new().await;
    let admin = app.admin_token("boss@clinic.com").await;

    let (status, _) = app
        .send("PUT", "/user/admin/ghost@y.com", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, flag) = app.send("GET", "/admin/ghost@y.com", None, None).await;
    assert_eq!(flag, json!({ "admin": false }));
}

#[tokio::test]
async fn should_ignore_role_in_sign_in_payload() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            "PUT",
            "/user/x@y.com",
            None,
            Some(json!({ "role": "admin", "name": "X" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");

    let (_, flag) = app.send("GET", "/admin/x@y.com", None, None).await;
    assert_eq!(flag, json!({ "admin": false }));

    let (_, user) = app.send("GET", "/user?email=x@y.com", None, None).await;
    assert_eq!(user["name"], "X");
    assert!(user.get("role").is_none());
}

#[tokio::test]
async fn should_restrict_orders_to_owner_or_admin() {
    let app = TestApp::new().await;
    let owner = app.sign_in("x@y.com").await;
    let stranger = app.sign_in("z@y.com").await;
    let admin = app.admin_token("boss@clinic.com").await;
    let (_, order) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    let uri = format!("/order/{}", order["_id"].as_str().unwrap());

    let (status, _) = app.send("GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send("GET", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send("GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, mine) = app
        .send("GET", "/orders?email=x@y.com", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["patientName"], "Rafi");

    let (status, _) = app
        .send("GET", "/orders?email=x@y.com", Some(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_confirm_payment_once() {
    let app = TestApp::new().await;
    let token = app.sign_in("x@y.com").await;
    let (_, order) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    let uri = format!("/order/{}", order["_id"].as_str().unwrap());

    let (status, outcome) = app
        .send(
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "transactionId": "pi_T", "amount": 80 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "matched": 1, "modified": 1 }));

    let (_, paid) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(paid["paid"], true);
    assert_eq!(paid["transactionId"], "pi_T");
    let record = app
        .ledger
        .find_by_transaction_id("pi_T".to_string())
        .await
        .unwrap();
    assert!(record.is_some());

    let (status, body) = app
        .send(
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "transactionId": "pi_U" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_paid");
    let duplicate = app
        .ledger
        .find_by_transaction_id("pi_U".to_string())
        .await
        .unwrap();
    assert!(duplicate.is_none());
}

#[tokio::test]
async fn should_create_payment_intent_in_cents() {
    let app = TestApp::new().await;
    let token = app.sign_in("x@y.com").await;

    let (status, body) = app
        .send(
            "POST",
            "/create-payment-intent",
            Some(&token),
            Some(json!({ "totalPrice": 80.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientSecret"], "pi_8050_usd_secret");

    let (status, _) = app
        .send(
            "POST",
            "/create-payment-intent",
            Some(&token),
            Some(json!({ "price": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_report_created_then_updated_availability() {
    let app = TestApp::new().await;
    let service = app.create_service("A", &["9am"]).await;
    let uri = format!("/purchase/{}", service["_id"].as_str().unwrap());

    let (status, body) = app
        .send("PUT", &uri, None, Some(json!({ "available": false })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "updated");

    let (_, fetched) = app.send("GET", &uri, None, None).await;
    assert_eq!(fetched["available"], false);

    let unknown = format!("/purchase/{}", clinic_domain::id::ServiceId::new());
    let (status, body) = app
        .send("PUT", &unknown, None, Some(json!({ "available": true })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "created");
}

#[tokio::test]
async fn should_store_reviews_under_caller_identity() {
    let app = TestApp::new().await;
    let token = app.sign_in("x@y.com").await;

    let (status, _) = app
        .send(
            "POST",
            "/add-review",
            None,
            Some(json!({ "text": "Great", "rating": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, review) = app
        .send(
            "POST",
            "/add-review",
            Some(&token),
            Some(json!({ "text": "Great", "rating": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["author"], "x@y.com");

    let (_, reviews) = app.send("GET", "/reviews", None, None).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_merge_profile_updates() {
    let app = TestApp::new().await;
    app.sign_in("x@y.com").await;

    let (status, body) = app
        .send(
            "PUT",
            "/user-update/x@y.com",
            None,
            Some(json!({ "phone": "123", "city": "Dhaka" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "updated");

    let (_, user) = app.send("GET", "/user?email=x@y.com", None, None).await;
    assert_eq!(user["phone"], "123");

    let (status, _) = app.send("GET", "/user?email=ghost@y.com", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let users = app.users.get_all().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn should_ship_order_as_admin_only() {
    let app = TestApp::new().await;
    let customer = app.sign_in("x@y.com").await;
    let admin = app.admin_token("boss@clinic.com").await;
    let (_, order) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    let uri = format!("/ship-order/{}", order["_id"].as_str().unwrap());

    let (status, _) = app.send("PATCH", &uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, outcome) = app.send("PATCH", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "matched": 1, "modified": 1 }));

    let (_, again) = app.send("PATCH", &uri, Some(&admin), None).await;
    assert_eq!(again, json!({ "matched": 1, "modified": 0 }));
}

#[tokio::test]
async fn should_delete_paid_order_and_keep_payment_record() {
    let app = TestApp::new().await;
    let token = app.sign_in("x@y.com").await;
    app.create_service("A", &["9am", "10am"]).await;
    let (_, order) = app.place_order("x@y.com", "A", "2024-01-01", "9am").await;
    let id = order["_id"].as_str().unwrap();

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/order/{id}"),
            Some(&token),
            Some(json!({ "transactionId": "pi_T" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("DELETE", &format!("/orders/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, available) = app.send("GET", "/available?date=2024-01-01", None, None).await;
    assert_eq!(slots(&available[0]), ["9am", "10am"]);
    let (status, _) = app.place_order("z@y.com", "A", "2024-01-01", "9am").await;
    assert_eq!(status, StatusCode::CREATED);

    let record = app
        .ledger
        .find_by_transaction_id("pi_T".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.order_id.to_string(), id);
}

#[tokio::test]
async fn should_create_service_without_name() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            "POST",
            "/services",
            None,
            Some(json!({ "price": 80, "slots": ["9am"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "");
    assert_eq!(body["slots"], json!(["9am"]));
}
