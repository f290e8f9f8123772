// Overdue sweep over a populated repository

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use daftar::invoices::models::{DocumentKind, InvoiceStatus};
use daftar::invoices::services::OverdueChecker;
use daftar::invoices::{InvoiceService, LedgerOperation};
use helpers::{TestDataFactory, TestState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn invoice_due(service: &InvoiceService, due: Option<NaiveDate>) -> String {
    let mut input = TestDataFactory::new_document(
        DocumentKind::Invoice,
        &[(Decimal::ONE, dec!(40000))],
        Decimal::ZERO,
        Decimal::ZERO,
    );
    input.due_date = due;
    service.create(input).await.unwrap().id
}

fn checker(state: &TestState) -> OverdueChecker {
    OverdueChecker::new(state.invoice_service.clone(), Duration::from_secs(3600))
}

#[tokio::test]
async fn test_sweep_marks_only_unpaid_past_due_invoices() {
    let state = TestState::default();
    let service = &state.invoice_service;
    let today = TestDataFactory::date(2024, 4, 1);

    let overdue_draft = invoice_due(service, Some(TestDataFactory::date(2024, 3, 25))).await;

    let overdue_sent = invoice_due(service, Some(TestDataFactory::date(2024, 3, 31))).await;
    service
        .apply(
            &overdue_sent,
            LedgerOperation::RecordPayment(TestDataFactory::payment(dec!(10000))),
        )
        .await
        .unwrap();

    let due_today = invoice_due(service, Some(today)).await;
    let no_due_date = invoice_due(service, None).await;

    let settled = invoice_due(service, Some(TestDataFactory::date(2024, 3, 25))).await;
    service
        .apply(
            &settled,
            LedgerOperation::RecordPayment(TestDataFactory::payment(dec!(40000))),
        )
        .await
        .unwrap();

    let quotation = service
        .create(TestDataFactory::new_document(
            DocumentKind::Quotation,
            &[(Decimal::ONE, dec!(40000))],
            Decimal::ZERO,
            Decimal::ZERO,
        ))
        .await
        .unwrap()
        .id;

    let marked = checker(&state).run_once(today).await.unwrap();
    assert_eq!(marked, 2);

    let status = |id: String| {
        let service = Arc::clone(service);
        async move { service.get(&id).await.unwrap().status() }
    };
    assert_eq!(status(overdue_draft).await, InvoiceStatus::Overdue);
    assert_eq!(status(overdue_sent).await, InvoiceStatus::Overdue);
    assert_eq!(status(due_today).await, InvoiceStatus::Draft);
    assert_eq!(status(no_due_date).await, InvoiceStatus::Draft);
    assert_eq!(status(settled).await, InvoiceStatus::Paid);
    assert_eq!(status(quotation).await, InvoiceStatus::Draft);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let state = TestState::default();
    let id = invoice_due(&state.invoice_service, Some(TestDataFactory::date(2024, 3, 21))).await;
    let checker = checker(&state);
    let today = TestDataFactory::date(2024, 4, 1);

    assert_eq!(checker.run_once(today).await.unwrap(), 1);
    let version = state.invoice_service.get(&id).await.unwrap().version;

    assert_eq!(checker.run_once(today).await.unwrap(), 0);
    assert_eq!(state.invoice_service.get(&id).await.unwrap().version, version);
}

#[tokio::test]
async fn test_overdue_invoice_still_accepts_payment() {
    let state = TestState::default();
    let service = &state.invoice_service;
    let id = invoice_due(service, Some(TestDataFactory::date(2024, 3, 21))).await;

    checker(&state)
        .run_once(TestDataFactory::date(2024, 4, 1))
        .await
        .unwrap();

    let doc = service
        .apply(
            &id,
            LedgerOperation::RecordPayment(TestDataFactory::payment(dec!(40000))),
        )
        .await
        .unwrap();
    assert_eq!(doc.status(), InvoiceStatus::Paid);
    assert_eq!(doc.totals().remaining_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_empty_repository() {
    let state = TestState::default();
    let marked = checker(&state)
        .run_once(TestDataFactory::date(2024, 4, 1))
        .await
        .unwrap();
    assert_eq!(marked, 0);
}
