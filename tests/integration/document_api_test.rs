// HTTP flow over the in-memory repository: create, edit, pay, complete.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::{decimal, test_app, TestDataFactory, TestState};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_health_endpoints() {
    let state = TestState::default();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_invoice_lifecycle() {
    let state = TestState::default();
    let app = test_app!(state);

    // create
    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(TestDataFactory::create_payload("invoice", "100000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let doc: Value = test::read_body_json(resp).await;
    let id = doc["id"].as_str().unwrap().to_string();
    assert!(doc["number"].as_str().unwrap().starts_with("INV-"));
    assert_eq!(doc["status"], "draft");
    assert_eq!(doc["document_kind"], "invoice");
    assert_eq!(decimal(&doc["total"]), dec!(100000));

    // rates
    let req = test::TestRequest::put()
        .uri(&format!("/documents/{}/rates", id))
        .set_json(json!({"discount_percent": "10", "tax_percent": "9"}))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(decimal(&doc["discount_amount"]), dec!(10000));
    assert_eq!(decimal(&doc["tax_amount"]), dec!(8100));
    assert_eq!(decimal(&doc["total"]), dec!(98100));

    // partial payment
    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/payments", id))
        .set_json(TestDataFactory::payment_payload("30000"))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["status"], "sent");
    assert_eq!(decimal(&doc["remaining_amount"]), dec!(68100));

    // complete
    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/complete", id))
        .set_json(json!({"settled_on": "2024-04-01"}))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["status"], "paid");
    assert_eq!(decimal(&doc["paid_amount"]), dec!(98100));
    assert_eq!(decimal(&doc["remaining_amount"]), dec!(0));
    assert_eq!(doc["payments"].as_array().unwrap().len(), 2);
    assert_eq!(doc["version"], 4);

    // read back
    let req = test::TestRequest::get()
        .uri(&format!("/documents/{}", id))
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["status"], "paid");
}

#[actix_web::test]
async fn test_item_editing() {
    let state = TestState::default();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(json!({
            "document_kind": "quotation",
            "client_id": "client-1",
            "date": "2024-03-20"
        }))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let id = doc["id"].as_str().unwrap().to_string();
    assert!(doc["number"].as_str().unwrap().starts_with("QF-"));
    assert_eq!(doc["items"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/items", id))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["items"].as_array().unwrap().len(), 2);
    let item_id = doc["items"][1]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/documents/{}/items/{}", id, item_id))
        .set_json(json!({"field": "unit_price", "value": "45000"}))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(decimal(&doc["items"][1]["total"]), dec!(45000));
    assert_eq!(decimal(&doc["subtotal"]), dec!(45000));

    let req = test::TestRequest::patch()
        .uri(&format!("/documents/{}/items/{}", id, item_id))
        .set_json(json!({"field": "quantity", "value": "-1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/documents/{}/items/{}", id, item_id))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["items"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&doc["total"]), dec!(0));

    let req = test::TestRequest::delete()
        .uri(&format!("/documents/{}/items/{}", id, item_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_quotation_rejects_payment_and_converts() {
    let state = TestState::default();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(TestDataFactory::create_payload("quotation", "5000"))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let id = doc["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/payments", id))
        .set_json(TestDataFactory::payment_payload("5000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cannot accept payments"));

    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/convert", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["document_kind"], "invoice");
    assert_eq!(decimal(&invoice["total"]), dec!(5000));

    let req = test::TestRequest::get().uri("/documents").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_status_override_and_validation() {
    let state = TestState::default();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(TestDataFactory::create_payload("invoice", "2000"))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let id = doc["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/documents/{}/status", id))
        .set_json(json!({"status": "sent"}))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["status"], "sent");

    let req = test::TestRequest::put()
        .uri(&format!("/documents/{}/status", id))
        .set_json(json!({"status": "paid"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::put()
        .uri(&format!("/documents/{}/rates", id))
        .set_json(json!({"discount_percent": "120", "tax_percent": "0"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/documents/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/documents/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_oversized_amounts_are_rejected() {
    let state = TestState::default();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(json!({
            "document_kind": "invoice",
            "client_id": "client-42",
            "date": "2024-03-20",
            "items": [{
                "description": "Bulk",
                "quantity": "100000000000000000000",
                "unit_price": "100000000000000000000"
            }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("out of range"));

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(TestDataFactory::create_payload("invoice", "1000"))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let id = doc["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/payments", id))
        .set_json(TestDataFactory::payment_payload("79228162514264337593543950335"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/documents/{}/payments", id))
        .set_json(TestDataFactory::payment_payload("1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/documents/{}", id))
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["payments"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_payment_ids_are_assigned_by_server() {
    let state = TestState::default();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/documents")
        .set_json(TestDataFactory::create_payload("invoice", "10000"))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let id = doc["id"].as_str().unwrap().to_string();

    let mut body = TestDataFactory::payment_payload("1000");
    body["id"] = json!("client-chosen");
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/documents/{}/payments", id))
            .set_json(body.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/documents/{}", id))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    let payments = doc["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_ne!(payments[0]["id"], "client-chosen");
    assert_ne!(payments[0]["id"], payments[1]["id"]);

    // removing one leaves the other
    let first = payments[0]["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::delete()
        .uri(&format!("/documents/{}/payments/{}", id, first))
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(doc["payments"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&doc["paid_amount"]), dec!(1000));
}
