//! Receiving goods against a purchase order in several deliveries

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use receiving_core::{
    telemetry, utils::MemoryRecordService, PurchaseOrder, PurchaseOrderLine, ReceiptMetadata,
    ReceivingDesk, ReceivingError,
};

fn line(name: &str, quantity: i64, rate: i64) -> PurchaseOrderLine {
    PurchaseOrderLine::new(
        name.to_string(),
        BigDecimal::from(quantity),
        BigDecimal::from(rate),
        "Nos".to_string(),
        "7318".to_string(),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    println!("📦 Receiving Core - Goods Receipt Example\n");

    let storage = MemoryRecordService::new();
    storage.insert_purchase_order(
        PurchaseOrder::new(
            "PO-1001".to_string(),
            "24AAAFF2996A1Z5".to_string(),
            vec![line("Hex Bolt M8", 100, 10), line("Hex Nut M8", 100, 2)],
        )
        .with_vendor_name("Acme Fasteners".to_string()),
    )?;

    let mut desk = ReceivingDesk::new(storage);

    // First truck: 60 bolts and all the nuts
    let mut draft = desk
        .prepare_receipt("PO-1001", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
        .await?;
    draft.set_quantity("Hex Bolt M8", "60")?;
    draft.set_other_charges("150");
    draft.set_transporter("Shree Roadways");

    let first = desk.submit_receipt(&draft).await?;
    println!("✅ Recorded {}", first.document_number);
    println!("   Subtotal: ₹{}", first.totals.subtotal);
    println!("   CGST:     ₹{}", first.totals.cgst);
    println!("   SGST:     ₹{}", first.totals.sgst);
    println!("   Total:    ₹{}", first.totals.total);
    println!();

    println!("📋 Still to receive:");
    for position in desk.remaining_quantities("PO-1001").await? {
        println!(
            "   {}: {} of {}",
            position.line.name, position.remaining_quantity, position.line.quantity_ordered
        );
    }
    println!();

    // Typed quantities above the remaining are clamped
    let mut draft = desk
        .prepare_receipt("PO-1001", NaiveDate::from_ymd_opt(2024, 4, 5).unwrap())
        .await?;
    let accepted = draft.set_quantity("Hex Bolt M8", "75")?;
    println!("✏️  Typed 75 bolts, accepted {}", accepted);

    let second = desk.submit_receipt(&draft).await?;
    desk.update_receipt_metadata(
        &second.document_number,
        ReceiptMetadata {
            received_on: second.metadata.received_on,
            transporter: Some("Shree Roadways".to_string()),
            vehicle_number: Some("GJ-01-AB-1234".to_string()),
        },
    )
    .await?;
    println!("✅ Recorded {} (₹{})", second.document_number, second.totals.total);
    println!(
        "📊 Status: {:?}",
        desk.fulfillment_status("PO-1001").await?
    );

    match desk
        .prepare_receipt("PO-1001", NaiveDate::from_ymd_opt(2024, 4, 6).unwrap())
        .await
    {
        Err(ReceivingError::OrderFullyReceived(po)) => {
            println!("🔒 {} is fully received, no further receipts allowed", po)
        }
        other => println!("Unexpected: {:?}", other.map(|d| d.document_number)),
    }

    Ok(())
}
