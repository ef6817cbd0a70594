//! GST calculation examples for goods receipts

use bigdecimal::BigDecimal;
use receiving_core::{GstCalculator, GstCategory, GstConfig, ReceiptLine, ReconciliationEngine};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Receiving Core - GST Calculation Examples\n");

    // 1. Rate slabs
    println!("📊 Standard GST Rates by Category:");
    let categories = [
        (GstCategory::Essential, "Essential items (medicines, food)"),
        (GstCategory::Reduced, "Reduced rate items"),
        (GstCategory::Standard, "Standard rate items"),
        (GstCategory::Higher, "Higher rate items (most goods)"),
        (GstCategory::Luxury, "Luxury/Sin goods"),
    ];

    for (category, description) in categories.iter() {
        println!("  {:?}: {}% - {}", category, category.rate(), description);
    }
    println!();

    // 2. Vendor state decides the split
    let calculator = GstCalculator::default();
    let subtotal = BigDecimal::from(10000);

    println!("🏢 Gujarat vendor 24AAAFF2996A1Z5 (CGST + SGST):");
    let intra = calculator.calculate(&subtotal, "24AAAFF2996A1Z5")?;
    println!("  Subtotal:  ₹{}", intra.base_amount);
    println!("  CGST (9%): ₹{}", intra.cgst_amount);
    println!("  SGST (9%): ₹{}", intra.sgst_amount);
    println!("  Total GST: ₹{}", intra.total_gst_amount);
    println!();

    println!("🌍 West Bengal vendor 19AABCT1332L1ZZ (IGST only):");
    let inter = calculator.calculate(&subtotal, "19AABCT1332L1ZZ")?;
    println!("  Subtotal:   ₹{}", inter.base_amount);
    println!("  IGST (18%): ₹{}", inter.igst_amount);
    println!("  Total GST:  ₹{}", inter.total_gst_amount);
    println!();

    // 3. Another home state and slab
    println!("🏭 Maharashtra desk at the Standard slab:");
    let maharashtra = GstCalculator::new(GstConfig::for_category(
        "27".to_string(),
        GstCategory::Standard,
    ))?;
    for vendor in ["27AAPFU0939F1ZV", "24AAAFF2996A1Z5"] {
        let calc = maharashtra.calculate(&subtotal, vendor)?;
        println!(
            "  {}: CGST ₹{} SGST ₹{} IGST ₹{}",
            vendor, calc.cgst_amount, calc.sgst_amount, calc.igst_amount
        );
    }
    println!();

    // 4. Half-up rounding on a full receipt
    println!("🔢 Receipt totals with rounding:");
    let engine = ReconciliationEngine::new();
    let lines = vec![
        ReceiptLine::new(
            "Washer".to_string(),
            BigDecimal::from(5),
            BigDecimal::from_str("6.667")?,
        ),
        ReceiptLine::new(
            "Spring".to_string(),
            BigDecimal::from_str("2.5")?,
            BigDecimal::from_str("18.10")?,
        ),
    ];

    let totals = engine.compute_totals(&lines, Some("120.50"), "24AAAFF2996A1Z5")?;
    println!("  Subtotal:      ₹{}", totals.subtotal);
    println!("  CGST:          ₹{}", totals.cgst);
    println!("  SGST:          ₹{}", totals.sgst);
    println!("  Other charges: ₹{}", totals.other_charges);
    println!("  Total:         ₹{}", totals.total);

    Ok(())
}
