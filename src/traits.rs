//! Traits for record-service abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;

/// Access to the external system of record for orders and receipts
///
/// This trait lets the receiving core work against the REST backend, an
/// in-memory store, or any other source of truth by implementing these methods.
/// Implementations that persist receipts must repeat the remaining-quantity
/// check at write time and answer with
/// [`ReceivingError::StaleRemainingQuantity`] when it fails.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Get a purchase order with its lines
    async fn get_purchase_order(&self, po_number: &str) -> ReceivingResult<Option<PurchaseOrder>>;

    /// List every receipt recorded against a purchase order
    async fn list_receipt_documents(&self, po_number: &str)
        -> ReceivingResult<Vec<ReceiptDocument>>;

    /// Persist a new receipt, returning the stored document
    async fn create_receipt_document(
        &mut self,
        document: &ReceiptDocument,
    ) -> ReceivingResult<ReceiptDocument>;

    /// Get a receipt by document number
    async fn get_receipt_document(
        &self,
        document_number: &str,
    ) -> ReceivingResult<Option<ReceiptDocument>>;

    /// Replace the editable metadata of a persisted receipt
    async fn update_receipt_metadata(
        &mut self,
        document_number: &str,
        metadata: &ReceiptMetadata,
    ) -> ReceivingResult<ReceiptDocument>;
}

/// Normalize an item name for matching: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Decides which order line a receipt line belongs to
pub trait LineMatcher: Send + Sync {
    /// Whether the receipt line was received against the order line
    fn matches(&self, order_line: &PurchaseOrderLine, receipt_line: &ReceiptLine) -> bool;

    /// Whether a candidate name refers to the order line
    fn matches_name(&self, order_line: &PurchaseOrderLine, name: &str) -> bool {
        normalize_name(&order_line.name) == normalize_name(name)
    }
}

/// Matches lines by case-insensitive, trimmed name
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatcher;

impl LineMatcher for NameMatcher {
    fn matches(&self, order_line: &PurchaseOrderLine, receipt_line: &ReceiptLine) -> bool {
        self.matches_name(order_line, &receipt_line.name)
    }
}

/// Matches lines by stable line number, falling back to names when either side has none
#[derive(Debug, Clone, Copy, Default)]
pub struct LineNumberMatcher;

impl LineMatcher for LineNumberMatcher {
    fn matches(&self, order_line: &PurchaseOrderLine, receipt_line: &ReceiptLine) -> bool {
        match (order_line.line_no, receipt_line.line_no) {
            (Some(ordered), Some(received)) => ordered == received,
            _ => self.matches_name(order_line, &receipt_line.name),
        }
    }
}

/// Trait for implementing receipt field validation rules
pub trait ReceiptValidator: Send + Sync {
    /// Validate a receipt before it is sent to the record service
    fn validate_document(&self, document: &ReceiptDocument) -> ReceivingResult<()>;

    /// Validate a metadata edit
    fn validate_metadata(&self, metadata: &ReceiptMetadata) -> ReceivingResult<()>;
}

/// Default receipt validator with basic rules
pub struct DefaultReceiptValidator;

impl ReceiptValidator for DefaultReceiptValidator {
    fn validate_document(&self, document: &ReceiptDocument) -> ReceivingResult<()> {
        if document.document_number.trim().is_empty() {
            return Err(ReceivingError::InvalidField(
                "Document number cannot be empty".to_string(),
            ));
        }

        if document.po_number.trim().is_empty() {
            return Err(ReceivingError::InvalidField(
                "Purchase order number cannot be empty".to_string(),
            ));
        }

        if document.lines.is_empty() {
            return Err(ReceivingError::InvalidField(
                "Receipt must have at least one line".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_metadata(&self, _metadata: &ReceiptMetadata) -> ReceivingResult<()> {
        Ok(())
    }
}
