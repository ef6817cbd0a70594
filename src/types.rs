//! Core types and data structures for goods receiving

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::tax::gst::GstError;

/// A single line of an issued purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    /// Stable line identifier, when the order system provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_no: Option<u32>,
    /// Item name as printed on the order
    pub name: String,
    /// Quantity ordered from the vendor
    pub quantity_ordered: BigDecimal,
    /// Agreed unit rate (before GST)
    pub rate: BigDecimal,
    /// Unit of measure (Nos, Kg, Mtr, ...)
    #[serde(default)]
    pub unit: String,
    /// HSN classification code
    #[serde(default)]
    pub hsn_code: String,
}

impl PurchaseOrderLine {
    /// Create a new order line
    pub fn new(
        name: String,
        quantity_ordered: BigDecimal,
        rate: BigDecimal,
        unit: String,
        hsn_code: String,
    ) -> Self {
        Self {
            line_no: None,
            name,
            quantity_ordered,
            rate,
            unit,
            hsn_code,
        }
    }

    /// Attach a stable line number
    pub fn with_line_no(mut self, line_no: u32) -> Self {
        self.line_no = Some(line_no);
        self
    }
}

/// Purchase order as issued by the external order system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    /// Unique order number
    pub po_number: String,
    /// Vendor GSTIN; its leading state code drives the GST split
    pub vendor_tax_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    /// Ordered lines, in order
    pub lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrder {
    /// Create a new purchase order
    pub fn new(po_number: String, vendor_tax_id: String, lines: Vec<PurchaseOrderLine>) -> Self {
        Self {
            po_number,
            vendor_tax_id,
            vendor_name: None,
            order_date: None,
            lines,
        }
    }

    /// Set the vendor display name
    pub fn with_vendor_name(mut self, vendor_name: String) -> Self {
        self.vendor_name = Some(vendor_name);
        self
    }

    /// Total quantity ordered across all lines
    pub fn total_quantity_ordered(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.quantity_ordered).sum()
    }
}

/// A received line on a goods receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_no: Option<u32>,
    /// Item name; matched against the order line name
    pub name: String,
    /// Quantity physically received
    pub quantity_received: BigDecimal,
    /// Unit rate carried over from the order
    pub rate: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
}

impl ReceiptLine {
    /// Create a new receipt line
    pub fn new(name: String, quantity_received: BigDecimal, rate: BigDecimal) -> Self {
        Self {
            line_no: None,
            name,
            quantity_received,
            rate,
            unit: None,
            hsn_code: None,
        }
    }

    /// Create a receipt line for an order line, copying its identity and rate
    pub fn from_order_line(line: &PurchaseOrderLine, quantity_received: BigDecimal) -> Self {
        Self {
            line_no: line.line_no,
            name: line.name.clone(),
            quantity_received,
            rate: line.rate.clone(),
            unit: Some(line.unit.clone()),
            hsn_code: Some(line.hsn_code.clone()),
        }
    }

    /// Line amount before tax
    pub fn amount(&self) -> BigDecimal {
        &self.quantity_received * &self.rate
    }
}

/// The editable part of a persisted receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptMetadata {
    /// Date the goods arrived
    pub received_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
}

impl ReceiptMetadata {
    /// Metadata with only a receipt date
    pub fn new(received_on: NaiveDate) -> Self {
        Self {
            received_on,
            transporter: None,
            vehicle_number: None,
        }
    }
}

/// Computed amounts of a receipt, each rounded to two places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    pub subtotal: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub other_charges: BigDecimal,
    pub total: BigDecimal,
}

impl ReceiptTotals {
    /// CGST + SGST + IGST
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }
}

/// Goods received note recorded against a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDocument {
    /// Unique document number
    pub document_number: String,
    /// Order this receipt was recorded against
    pub po_number: String,
    pub vendor_tax_id: String,
    pub lines: Vec<ReceiptLine>,
    pub totals: ReceiptTotals,
    pub metadata: ReceiptMetadata,
    pub created_at: NaiveDateTime,
}

impl ReceiptDocument {
    /// Create a new receipt document for an order
    pub fn new(
        document_number: String,
        purchase_order: &PurchaseOrder,
        lines: Vec<ReceiptLine>,
        totals: ReceiptTotals,
        metadata: ReceiptMetadata,
    ) -> Self {
        Self {
            document_number,
            po_number: purchase_order.po_number.clone(),
            vendor_tax_id: purchase_order.vendor_tax_id.clone(),
            lines,
            totals,
            metadata,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Replace the editable metadata. Lines and amounts never change after creation.
    pub fn apply_metadata(&mut self, metadata: ReceiptMetadata) {
        self.metadata = metadata;
    }
}

/// Receivable position of one order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingLine {
    pub line: PurchaseOrderLine,
    /// Quantity already received across prior receipts
    pub received_so_far: BigDecimal,
    /// max(0, ordered - received)
    pub remaining_quantity: BigDecimal,
}

/// Fulfilment state of a purchase order, always derived from its receipt history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentStatus {
    /// Nothing received yet
    Open,
    /// Some lines still have a receivable quantity
    PartiallyReceived,
    /// No receivable quantity remains on any line
    FullyReceived,
}

/// Per-line reasons a candidate receipt is rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    #[error("Quantity for '{name}' exceeds the remaining quantity of {max}")]
    QuantityExceedsRemaining { name: String, max: BigDecimal },
    #[error("Invalid quantity for '{name}': '{input}'")]
    InvalidQuantityFormat { name: String, input: String },
    #[error("Rate for '{name}' must be positive")]
    NonPositiveRate { name: String },
}

impl Violation {
    /// Name of the offending line
    pub fn line_name(&self) -> &str {
        match self {
            Violation::QuantityExceedsRemaining { name, .. }
            | Violation::InvalidQuantityFormat { name, .. }
            | Violation::NonPositiveRate { name } => name,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while receiving goods
#[derive(Debug, thiserror::Error)]
pub enum ReceivingError {
    #[error("Purchase order {0} is fully received")]
    OrderFullyReceived(String),
    #[error("Receipt rejected: {}", join_violations(.0))]
    Validation(Vec<Violation>),
    #[error("Remaining quantity for purchase order {po_number} is stale: {reason}")]
    StaleRemainingQuantity { po_number: String, reason: String },
    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(String),
    #[error("Receipt document not found: {0}")]
    ReceiptNotFound(String),
    #[error("Receipt document already exists: {0}")]
    DuplicateDocumentNumber(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Record service error: {0}")]
    Transport(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Tax(#[from] GstError),
}

impl ReceivingError {
    /// Per-line violations, empty for every other kind
    pub fn violations(&self) -> &[Violation] {
        match self {
            ReceivingError::Validation(violations) => violations,
            _ => &[],
        }
    }

    /// Whether the caller should reload fresh data and let the user try again
    pub fn is_stale(&self) -> bool {
        matches!(self, ReceivingError::StaleRemainingQuantity { .. })
    }
}

/// Result type for receiving operations
pub type ReceivingResult<T> = Result<T, ReceivingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_line_from_order_line() {
        let order_line = PurchaseOrderLine::new(
            "Hex Bolt M8".to_string(),
            BigDecimal::from(100),
            BigDecimal::from(12),
            "Nos".to_string(),
            "7318".to_string(),
        )
        .with_line_no(3);

        let line = ReceiptLine::from_order_line(&order_line, BigDecimal::from(40));

        assert_eq!(line.line_no, Some(3));
        assert_eq!(line.rate, BigDecimal::from(12));
        assert_eq!(line.amount(), BigDecimal::from(480));
        assert_eq!(line.hsn_code.as_deref(), Some("7318"));
    }

    #[test]
    fn test_validation_error_lists_every_violation() {
        let error = ReceivingError::Validation(vec![
            Violation::QuantityExceedsRemaining {
                name: "Bolt".to_string(),
                max: BigDecimal::from(40),
            },
            Violation::NonPositiveRate {
                name: "Nut".to_string(),
            },
        ]);

        let message = error.to_string();
        assert!(message.contains("'Bolt'"));
        assert!(message.contains("40"));
        assert!(message.contains("'Nut'"));
        assert_eq!(error.violations().len(), 2);
        assert!(!error.is_stale());
    }

    #[test]
    fn test_purchase_order_wire_format_is_camel_case() {
        let json = r#"{
            "poNumber": "PO-1",
            "vendorTaxId": "24AAAFF2996A1Z5",
            "lines": [
                {"name": "Bolt", "quantityOrdered": "100", "rate": "2.50", "unit": "Nos", "hsnCode": "7318"}
            ]
        }"#;

        let po: PurchaseOrder = serde_json::from_str(json).unwrap();
        assert_eq!(po.po_number, "PO-1");
        assert_eq!(po.lines[0].line_no, None);
        assert_eq!(po.total_quantity_ordered(), BigDecimal::from(100));
    }
}
