//! Integration tests for receiving-core

use receiving_core::{
    utils::{EnhancedReceiptValidator, MemoryRecordService},
    FulfillmentStatus, GstConfig, LineNumberMatcher, PurchaseOrder, PurchaseOrderLine,
    ReceiptMetadata, ReceivingDesk, ReceivingError, ReconciliationEngine, RecordService,
    Violation,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

const HOME_VENDOR: &str = "24AAAFF2996A1Z5";
const OUT_OF_STATE_VENDOR: &str = "19AABCT1332L1ZZ";

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
}

fn order_line(name: &str, quantity: i64, rate: i64) -> PurchaseOrderLine {
    PurchaseOrderLine::new(
        name.to_string(),
        BigDecimal::from(quantity),
        BigDecimal::from(rate),
        "Nos".to_string(),
        "7318".to_string(),
    )
}

fn seeded_storage(po: PurchaseOrder) -> MemoryRecordService {
    let storage = MemoryRecordService::new();
    storage.insert_purchase_order(po).unwrap();
    storage
}

fn bolts_and_nuts(vendor: &str) -> PurchaseOrder {
    PurchaseOrder::new(
        "PO-1001".to_string(),
        vendor.to_string(),
        vec![order_line("Bolt", 100, 10), order_line("Nut", 50, 2)],
    )
}

#[tokio::test]
async fn test_complete_receiving_workflow() {
    let storage = seeded_storage(bolts_and_nuts(HOME_VENDOR));
    let mut desk = ReceivingDesk::new(storage.clone());

    assert_eq!(
        desk.fulfillment_status("PO-1001").await.unwrap(),
        FulfillmentStatus::Open
    );

    // First delivery: 60 bolts, no nuts
    let mut draft = desk.prepare_receipt("PO-1001", date(2)).await.unwrap();
    assert_eq!(draft.lines.len(), 2);
    draft.set_quantity("Bolt", "60").unwrap();
    draft.exclude_line("Nut").unwrap();

    let first = desk.submit_receipt(&draft).await.unwrap();
    assert_eq!(first.lines.len(), 1);
    assert_eq!(first.totals.subtotal, BigDecimal::from(600));
    assert_eq!(first.totals.cgst, BigDecimal::from(54));
    assert_eq!(first.totals.sgst, BigDecimal::from(54));
    assert_eq!(first.totals.igst, BigDecimal::from(0));
    assert_eq!(first.totals.total, BigDecimal::from(708));

    assert_eq!(
        desk.fulfillment_status("PO-1001").await.unwrap(),
        FulfillmentStatus::PartiallyReceived
    );

    let remaining = desk.remaining_quantities("PO-1001").await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].line.name, "Bolt");
    assert_eq!(remaining[0].received_so_far, BigDecimal::from(60));
    assert_eq!(remaining[0].remaining_quantity, BigDecimal::from(40));
    assert_eq!(remaining[1].remaining_quantity, BigDecimal::from(50));

    // Second delivery clears the order; the draft is prefilled with what is left
    let draft = desk.prepare_receipt("PO-1001", date(5)).await.unwrap();
    let second = desk.submit_receipt(&draft).await.unwrap();
    assert_eq!(second.totals.subtotal, BigDecimal::from(500));
    assert_eq!(second.totals.total, BigDecimal::from(590));

    assert_eq!(
        desk.fulfillment_status("PO-1001").await.unwrap(),
        FulfillmentStatus::FullyReceived
    );
    assert_eq!(storage.receipt_count().unwrap(), 2);

    let result = desk.prepare_receipt("PO-1001", date(6)).await;
    assert!(matches!(result, Err(ReceivingError::OrderFullyReceived(po)) if po == "PO-1001"));
}

#[tokio::test]
async fn test_over_receipt_rejected_at_submit() {
    let storage = seeded_storage(bolts_and_nuts(HOME_VENDOR));
    let mut desk = ReceivingDesk::new(storage);

    let mut draft = desk.prepare_receipt("PO-1001", date(2)).await.unwrap();
    draft.fill_quantity("Bolt", BigDecimal::from(60)).unwrap();
    draft.exclude_line("Nut").unwrap();
    desk.submit_receipt(&draft).await.unwrap();

    // Batch fill bypasses the input clamp
    let mut draft = desk.prepare_receipt("PO-1001", date(3)).await.unwrap();
    draft.fill_quantity("Bolt", BigDecimal::from(45)).unwrap();
    draft.fill_quantity("Nut", BigDecimal::from(51)).unwrap();

    let err = desk.submit_receipt(&draft).await.unwrap_err();
    assert_eq!(
        err.violations(),
        &[
            Violation::QuantityExceedsRemaining {
                name: "Bolt".to_string(),
                max: BigDecimal::from(40),
            },
            Violation::QuantityExceedsRemaining {
                name: "Nut".to_string(),
                max: BigDecimal::from(50),
            },
        ]
    );

    // Exactly the remaining quantity is accepted
    draft.fill_quantity("Bolt", BigDecimal::from(40)).unwrap();
    draft.exclude_line("Nut").unwrap();
    desk.submit_receipt(&draft).await.unwrap();

    let remaining = desk.remaining_quantities("PO-1001").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].line.name, "Nut");
}

#[tokio::test]
async fn test_typed_quantity_is_clamped() {
    let storage = seeded_storage(bolts_and_nuts(HOME_VENDOR));
    let desk = ReceivingDesk::new(storage);

    let mut draft = desk.prepare_receipt("PO-1001", date(2)).await.unwrap();
    let accepted = draft.set_quantity("Bolt", "250").unwrap();
    assert_eq!(accepted, BigDecimal::from(100));

    let err = draft.set_quantity("Nut", "ten").unwrap_err();
    assert!(matches!(
        err.violations(),
        [Violation::InvalidQuantityFormat { name, .. }] if name == "Nut"
    ));

    let err = draft.set_quantity("Nut", "-3").unwrap_err();
    assert_eq!(err.violations().len(), 1);
}

#[tokio::test]
async fn test_stale_draft_rejected() {
    let po = PurchaseOrder::new(
        "PO-2002".to_string(),
        HOME_VENDOR.to_string(),
        vec![order_line("Bolt", 100, 10)],
    );
    let storage = seeded_storage(po);

    // Two clerks open the same order
    let mut desk_a = ReceivingDesk::new(storage.clone());
    let mut desk_b = ReceivingDesk::new(storage.clone());
    let draft_a = desk_a.prepare_receipt("PO-2002", date(2)).await.unwrap();
    let mut draft_b = desk_b.prepare_receipt("PO-2002", date(2)).await.unwrap();

    desk_a.submit_receipt(&draft_a).await.unwrap();

    let err = desk_b.submit_receipt(&draft_b).await.unwrap_err();
    assert!(err.is_stale());

    // Partial race: B's quantity no longer fits
    storage.clear().unwrap();
    storage
        .insert_purchase_order(PurchaseOrder::new(
            "PO-2002".to_string(),
            HOME_VENDOR.to_string(),
            vec![order_line("Bolt", 100, 10)],
        ))
        .unwrap();

    let mut draft_a = desk_a.prepare_receipt("PO-2002", date(3)).await.unwrap();
    draft_b = desk_b.prepare_receipt("PO-2002", date(3)).await.unwrap();
    draft_a.set_quantity("Bolt", "70").unwrap();
    draft_b.set_quantity("Bolt", "40").unwrap();

    desk_a.submit_receipt(&draft_a).await.unwrap();
    let err = desk_b.submit_receipt(&draft_b).await.unwrap_err();
    assert!(matches!(
        err,
        ReceivingError::StaleRemainingQuantity { ref po_number, .. } if po_number == "PO-2002"
    ));

    // Reload and retry within the fresh remaining quantity
    let mut draft_b = desk_b.prepare_receipt("PO-2002", date(3)).await.unwrap();
    assert_eq!(draft_b.lines[0].cap, BigDecimal::from(30));
    draft_b.set_quantity("Bolt", "40").unwrap();
    desk_b.submit_receipt(&draft_b).await.unwrap();
}

#[tokio::test]
async fn test_record_service_rechecks_at_write_time() {
    let po = PurchaseOrder::new(
        "PO-3003".to_string(),
        HOME_VENDOR.to_string(),
        vec![order_line("Bolt", 10, 10)],
    );
    let mut storage = seeded_storage(po);
    let mut desk = ReceivingDesk::new(storage.clone());

    let draft = desk.prepare_receipt("PO-3003", date(2)).await.unwrap();
    let document = desk.submit_receipt(&draft).await.unwrap();

    // Replaying the same lines under a new number goes over the order
    let mut replay = document.clone();
    replay.document_number = "GRN-REPLAY01".to_string();
    let err = storage.create_receipt_document(&replay).await.unwrap_err();
    assert!(err.is_stale());

    // Replaying the same number is a duplicate
    let err = storage.create_receipt_document(&document).await.unwrap_err();
    assert!(matches!(err, ReceivingError::DuplicateDocumentNumber(_)));
}

#[tokio::test]
async fn test_unknown_purchase_order() {
    let desk = ReceivingDesk::new(MemoryRecordService::new());
    let result = desk.prepare_receipt("PO-MISSING", date(1)).await;
    assert!(matches!(result, Err(ReceivingError::PurchaseOrderNotFound(_))));
}

#[tokio::test]
async fn test_inter_state_vendor_pays_igst() {
    let storage = seeded_storage(bolts_and_nuts(OUT_OF_STATE_VENDOR));
    let mut desk = ReceivingDesk::new(storage);

    let mut draft = desk.prepare_receipt("PO-1001", date(2)).await.unwrap();
    draft.exclude_line("Nut").unwrap();
    draft.set_other_charges("250");

    let document = desk.submit_receipt(&draft).await.unwrap();
    assert_eq!(document.totals.subtotal, BigDecimal::from(1000));
    assert_eq!(document.totals.cgst, BigDecimal::from(0));
    assert_eq!(document.totals.sgst, BigDecimal::from(0));
    assert_eq!(document.totals.igst, BigDecimal::from(180));
    assert_eq!(document.totals.other_charges, BigDecimal::from(250));
    assert_eq!(document.totals.total, BigDecimal::from(1430));
}

#[tokio::test]
async fn test_metadata_update_keeps_amounts() {
    let storage = seeded_storage(bolts_and_nuts(HOME_VENDOR));
    let mut desk = ReceivingDesk::new(storage);

    let draft = desk.prepare_receipt("PO-1001", date(2)).await.unwrap();
    let document = desk.submit_receipt(&draft).await.unwrap();

    let metadata = ReceiptMetadata {
        received_on: date(3),
        transporter: Some("Shree Roadways".to_string()),
        vehicle_number: Some("GJ-01-AB-1234".to_string()),
    };
    let updated = desk
        .update_receipt_metadata(&document.document_number, metadata.clone())
        .await
        .unwrap();

    assert_eq!(updated.metadata, metadata);
    assert_eq!(updated.lines, document.lines);
    assert_eq!(updated.totals, document.totals);

    let fetched = desk.get_receipt(&document.document_number).await.unwrap().unwrap();
    assert_eq!(fetched, updated);

    let result = desk
        .update_receipt_metadata("GRN-NOPE", ReceiptMetadata::new(date(4)))
        .await;
    assert!(matches!(result, Err(ReceivingError::ReceiptNotFound(_))));
}

#[tokio::test]
async fn test_enhanced_validator() {
    let po = PurchaseOrder::new(
        "PO-4004".to_string(),
        "24-BAD-GSTIN".to_string(),
        vec![order_line("Bolt", 10, 10)],
    );
    let storage = seeded_storage(po);
    let mut desk = ReceivingDesk::with_validator(
        storage.clone(),
        ReconciliationEngine::new(),
        Box::new(EnhancedReceiptValidator),
    );

    let draft = desk.prepare_receipt("PO-4004", date(2)).await.unwrap();
    let result = desk.submit_receipt(&draft).await;
    assert!(matches!(result, Err(ReceivingError::InvalidField(_))));
    assert_eq!(storage.receipt_count().unwrap(), 0);

    // Bad vehicle number is caught before the record service is called
    let result = desk
        .update_receipt_metadata(
            "GRN-ANY",
            ReceiptMetadata {
                vehicle_number: Some("GJ01#1234".to_string()),
                ..ReceiptMetadata::new(date(2))
            },
        )
        .await;
    assert!(matches!(result, Err(ReceivingError::InvalidField(_))));
}

#[tokio::test]
async fn test_configured_jurisdiction_and_line_numbers() {
    // Maharashtra desk; the vendor is local there
    let engine = ReconciliationEngine::with_config(GstConfig::with_rate(
        "27".to_string(),
        BigDecimal::from(12),
    ))
    .unwrap()
    .with_matcher(Box::new(LineNumberMatcher));

    let po = PurchaseOrder::new(
        "PO-5005".to_string(),
        "27AAPFU0939F1ZV".to_string(),
        vec![
            order_line("Bolt", 10, 10).with_line_no(1),
            order_line("Bolt", 20, 12).with_line_no(2),
        ],
    );
    let storage = seeded_storage(po);
    let mut desk = ReceivingDesk::with_engine(storage, engine);

    let mut draft = desk.prepare_receipt("PO-5005", date(2)).await.unwrap();
    draft.lines[1].included = false;

    let document = desk.submit_receipt(&draft).await.unwrap();
    assert_eq!(document.lines[0].line_no, Some(1));
    assert_eq!(document.totals.cgst, BigDecimal::from(6));
    assert_eq!(document.totals.sgst, BigDecimal::from(6));
    assert_eq!(document.totals.total, BigDecimal::from(112));

    // Only line 1 was received, even though both lines share a name
    let remaining = desk.remaining_quantities("PO-5005").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].line.line_no, Some(2));
    assert_eq!(remaining[0].remaining_quantity, BigDecimal::from(20));
}

#[test]
fn test_half_up_rounding_on_receipt_totals() {
    let engine = ReconciliationEngine::new();
    let lines = vec![receiving_core::ReceiptLine::new(
        "Washer".to_string(),
        BigDecimal::from(5),
        BigDecimal::from_str("6.667").unwrap(),
    )];

    let totals = engine.compute_totals(&lines, None, HOME_VENDOR).unwrap();
    assert_eq!(totals.subtotal, BigDecimal::from_str("33.34").unwrap());
    assert_eq!(totals.cgst, BigDecimal::from_str("3.00").unwrap());
    assert_eq!(totals.sgst, BigDecimal::from_str("3.00").unwrap());
    assert_eq!(totals.total, BigDecimal::from_str("39.34").unwrap());
}
