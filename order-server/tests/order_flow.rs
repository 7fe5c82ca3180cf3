//! End-to-end order flow tests
//!
//! Boots the real HTTP server on an ephemeral port with a temp work dir
//! and drives it through the order-client library, the same way the
//! frontends do.

use std::net::SocketAddr;

use order_client::{
    Cart, CartItem, CartStore, Checkout, CustomerDetails, MemoryStore, NetworkHttpClient, OrderApi,
    SubmitError,
};
use order_server::{Config, ServerState, api};
use shared::ValidationError;
use shared::order::{OrderStatus, OrderType, PaymentStatus};

struct TestServer {
    base_url: String,
    #[allow(dead_code)]
    state: ServerState,
    // Dropping the TempDir removes the database and uploads
    #[allow(dead_code)]
    work_dir: tempfile::TempDir,
}

async fn spawn_server() -> TestServer {
    let work_dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::from_env();
    config.work_dir = work_dir.path().to_string_lossy().into_owned();
    config.admin_user = "admin".into();
    config.admin_pass = "admin123".into();
    config.kitchen_pin = "1234".into();
    // Force mock payment mode regardless of the environment
    config.gateway.secret = None;
    config.gateway.frontend_url = "http://localhost:5173".into();

    let state = ServerState::initialize(&config).await;

    let app = api::router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        state,
        work_dir,
    }
}

fn loaded_cart() -> Cart<MemoryStore> {
    let store = MemoryStore::new();
    store
        .save(&[CartItem {
            menu_item_id: 1,
            name: "Nasi Ayam".into(),
            price_cents: 990,
            quantity: 2,
        }])
        .unwrap();
    Cart::load(store)
}

fn ali() -> CustomerDetails {
    CustomerDetails {
        name: "Ali".into(),
        phone: "0123456789".into(),
        ..Default::default()
    }
}

async fn kitchen_client(server: &TestServer) -> NetworkHttpClient {
    let mut client = NetworkHttpClient::new(&server.base_url).unwrap();
    client.login_kitchen("1234").await.expect("kitchen login");
    client
}

async fn admin_client(server: &TestServer) -> NetworkHttpClient {
    let mut client = NetworkHttpClient::new(&server.base_url).unwrap();
    client
        .login_admin("admin", "admin123")
        .await
        .expect("admin login");
    client
}

#[tokio::test]
async fn scenario_a_dine_in_submission() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut cart = loaded_cart();
    let mut details = ali();
    details.table_number = Some("5".into());

    let order_id = Checkout::new(&public)
        .submit(&mut cart, &details, OrderType::DineIn)
        .await
        .expect("submission succeeds");

    assert_eq!(order_id, "1");
    assert!(cart.is_empty());

    let kitchen = kitchen_client(&server).await;
    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders.len(), 1);

    let order = &orders[0];
    assert_eq!(order.total_cents, 1980);
    assert_eq!(order.computed_total_cents(), 1980);
    assert_eq!(order.status, OrderStatus::New);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.table_number.as_deref(), Some("5"));
    assert_eq!(order.customer_name, "Ali");
}

#[tokio::test]
async fn scenario_b_bad_phone_is_rejected_everywhere() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut cart = loaded_cart();
    let mut details = ali();
    details.phone = "0223456789".into(); // does not start with 01/03

    // Client-side gate: no request goes out, cart untouched
    let err = Checkout::new(&public)
        .submit(&mut cart, &details, OrderType::TakeAway)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::InvalidPhone)
    ));
    assert_eq!(cart.items().len(), 1);

    // Server-side gate: a direct POST with the same payload is rejected
    // and leaves no row behind
    let bad_request = shared::client::CreateOrderRequest {
        customer_name: "Ali".into(),
        customer_phone: "0223456789".into(),
        customer_email: None,
        table_number: None,
        special_request: None,
        order_type: OrderType::TakeAway,
        items: cart.to_order_lines(),
        total_cents: cart.total_cents(),
    };
    let direct = public.create_order(&bad_request).await;
    assert!(matches!(
        direct,
        Err(order_client::ClientError::Validation(_))
    ));

    let admin = admin_client(&server).await;
    let orders: Vec<shared::order::Order> = admin.get("/api/orders").await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn dine_in_requires_table_number_server_side() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let request = shared::client::CreateOrderRequest {
        customer_name: "Ali".into(),
        customer_phone: "0123456789".into(),
        customer_email: None,
        table_number: None,
        special_request: None,
        order_type: OrderType::DineIn,
        items: loaded_cart().to_order_lines(),
        total_cents: 1980,
    };
    assert!(matches!(
        public.create_order(&request).await,
        Err(order_client::ClientError::Validation(_))
    ));

    // Same payload as take-away is fine without a table
    let mut request = request;
    request.order_type = OrderType::TakeAway;
    let resp = public.create_order(&request).await.unwrap();
    assert_eq!(resp.order_id, "1");
}

#[tokio::test]
async fn scenario_c_status_advance_is_monotonic() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut details = ali();
    details.table_number = Some("3".into());
    Checkout::new(&public)
        .submit(&mut loaded_cart(), &details, OrderType::DineIn)
        .await
        .unwrap();

    let kitchen = kitchen_client(&server).await;

    let order = kitchen
        .update_status("1", OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    let order = kitchen
        .update_status("1", OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    // Backward and repeated writes are rejected; the row keeps its state
    for bad in [OrderStatus::New, OrderStatus::Preparing, OrderStatus::Completed] {
        assert!(matches!(
            kitchen.update_status("1", bad).await,
            Err(order_client::ClientError::Validation(_))
        ));
    }

    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn payment_status_is_orthogonal_to_fulfillment() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut details = ali();
    details.table_number = Some("2".into());
    Checkout::new(&public)
        .submit(&mut loaded_cart(), &details, OrderType::DineIn)
        .await
        .unwrap();

    let kitchen = kitchen_client(&server).await;
    kitchen
        .update_status("1", OrderStatus::Preparing)
        .await
        .unwrap();

    // Settlement arrives through the webhook while the kitchen works
    let raw = reqwest::Client::new();
    let resp = raw
        .post(format!("{}/api/payment/webhook", server.base_url))
        .form(&[("refno", "1"), ("status", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), "OK");

    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::Preparing); // untouched
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);

    // And fulfillment writes never touch the payment axis
    kitchen
        .update_status("1", OrderStatus::Completed)
        .await
        .unwrap();
    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn webhook_ignores_unknown_references() {
    let server = spawn_server().await;

    let raw = reqwest::Client::new();
    let resp = raw
        .post(format!("{}/api/payment/webhook", server.base_url))
        .form(&[("refno", "999"), ("status", "1")])
        .send()
        .await
        .unwrap();

    // Always 200 "OK" so the gateway stops retrying; nothing mutated
    assert_eq!(resp.text().await.unwrap(), "OK");

    let admin = admin_client(&server).await;
    let orders: Vec<shared::order::Order> = admin.get("/api/orders").await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn scenario_d_mock_payment_settles_synchronously() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut details = ali();
    details.table_number = Some("8".into());

    let handoff = Checkout::new(&public)
        .submit_and_pay(&mut loaded_cart(), &details, OrderType::DineIn)
        .await
        .expect("mock payment succeeds");

    assert!(handoff.mock);
    assert!(
        handoff
            .payment_url
            .starts_with("http://localhost:5173/payment/status?status_id=1&order_id=1")
    );

    // PAID synchronously with the initiate call, status untouched
    let kitchen = kitchen_client(&server).await;
    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);
    assert_eq!(orders[0].status, OrderStatus::New);
}

#[tokio::test]
async fn initiate_rejects_unknown_orders() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let result = public
        .initiate_payment(&shared::client::InitiatePaymentRequest {
            order_id: "42".into(),
            amount_cents: 1000,
            customer_name: "Ali".into(),
            customer_email: None,
            customer_phone: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(order_client::ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn clear_all_resets_the_id_sequence() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();
    let checkout = Checkout::new(&public);

    let mut details = ali();
    details.table_number = Some("1".into());
    assert_eq!(
        checkout
            .submit(&mut loaded_cart(), &details, OrderType::DineIn)
            .await
            .unwrap(),
        "1"
    );
    assert_eq!(
        checkout
            .submit(&mut loaded_cart(), &details, OrderType::DineIn)
            .await
            .unwrap(),
        "2"
    );

    let admin = admin_client(&server).await;
    let cleared: bool = admin.delete("/api/admin/orders").await.unwrap();
    assert!(cleared);

    let orders: Vec<shared::order::Order> = admin.get("/api/orders").await.unwrap();
    assert!(orders.is_empty());

    // The bulk clear explicitly resets the sequence; ids restart at 1
    assert_eq!(
        checkout
            .submit(&mut loaded_cart(), &details, OrderType::DineIn)
            .await
            .unwrap(),
        "1"
    );
}

#[tokio::test]
async fn role_gates_are_enforced() {
    let server = spawn_server().await;

    // No token at all
    let anonymous = NetworkHttpClient::new(&server.base_url).unwrap();
    assert!(matches!(
        anonymous.fetch_active_orders().await,
        Err(order_client::ClientError::AccessDenied(_))
    ));

    // Kitchen token cannot reach admin operations
    let kitchen = kitchen_client(&server).await;
    let result: Result<Vec<shared::order::Order>, _> = kitchen.get("/api/orders").await;
    assert!(matches!(
        result,
        Err(order_client::ClientError::AccessDenied(_))
    ));

    // Admin token satisfies kitchen operations
    let admin = admin_client(&server).await;
    assert!(admin.fetch_active_orders().await.is_ok());
}

#[tokio::test]
async fn special_request_over_the_cap_is_rejected_not_truncated() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut request = shared::client::CreateOrderRequest {
        customer_name: "Ali".into(),
        customer_phone: "0123456789".into(),
        customer_email: None,
        table_number: None,
        special_request: Some("x".repeat(101)),
        order_type: OrderType::TakeAway,
        items: loaded_cart().to_order_lines(),
        total_cents: 1980,
    };
    assert!(matches!(
        public.create_order(&request).await,
        Err(order_client::ClientError::Validation(_))
    ));

    // Exactly at the cap passes through unmodified
    request.special_request = Some("y".repeat(100));
    public.create_order(&request).await.unwrap();

    let kitchen = kitchen_client(&server).await;
    let orders = kitchen.fetch_active_orders().await.unwrap();
    assert_eq!(orders[0].special_request.as_deref(), Some("y".repeat(100).as_str()));
}

#[tokio::test]
async fn order_totals_are_snapshots_not_live_references() {
    let server = spawn_server().await;
    let public = NetworkHttpClient::new(&server.base_url).unwrap();

    let mut details = ali();
    details.table_number = Some("4".into());
    Checkout::new(&public)
        .submit(&mut loaded_cart(), &details, OrderType::DineIn)
        .await
        .unwrap();

    // The stored order embeds name/quantity/price copies; its total is
    // the sum of those snapshots, independent of any future menu state
    let admin = admin_client(&server).await;
    let orders: Vec<shared::order::Order> = admin.get("/api/orders").await.unwrap();
    let order = &orders[0];
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].name, "Nasi Ayam");
    assert_eq!(order.lines[0].price_cents, 990);
    assert_eq!(order.total_cents, order.computed_total_cents());
}
