//! Gateway in front of the real auth and booking services.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_full_flow_through_gateway() {
    let (auth, booking) = common::start_services().await;
    let gateway = common::spawn_gateway(auth, booking, 5).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{gateway}/api/register"))
        .json(&json!({"name": "Asha", "email": "asha@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client
        .post(format!("http://{gateway}/api/login"))
        .json(&json!({"email": "asha@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let login: Value = res.json().await.unwrap();
    let token = login["token"].as_str().unwrap().to_string();
    assert!(token.starts_with("mock-jwt-token-"));

    let res = client
        .post(format!("http://{gateway}/api/bookService"))
        .bearer_auth(&token)
        .json(&common::valid_booking("Premium Care"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();

    let list: Value = client
        .get(format!("http://{gateway}/api/bookings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 1);
    assert_eq!(list["bookings"][0]["id"], created["bookingId"]);
    assert_eq!(list["bookings"][0]["_id"], created["bookingId"]);
}

#[tokio::test]
async fn test_downstream_errors_pass_through() {
    let (auth, booking) = common::start_services().await;
    let gateway = common::spawn_gateway(auth, booking, 5).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{gateway}/api/login"))
        .json(&json!({"email": "admin@example.com", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "error": "Invalid credentials"}));

    let res = client
        .post(format!("http://{gateway}/api/bookService"))
        .json(&json!({"customerName": "   ", "packageName": "Gold", "vehicleType": "Sedan"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Customer name must be a non-empty string.");
}

#[tokio::test]
async fn test_seeded_admin_can_log_in() {
    let (auth, booking) = common::start_services().await;
    let gateway = common::spawn_gateway(auth, booking, 5).await;

    let login: Value = reqwest::Client::new()
        .post(format!("http://{gateway}/api/login"))
        .json(&json!({"email": "admin@example.com", "password": "admin123"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(login["user"]["role"], "Admin");
    assert_eq!(login["user"]["name"], "Admin User");
}
