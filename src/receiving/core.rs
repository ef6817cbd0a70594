//! Receiving desk that coordinates the record service and the reconciliation engine

use chrono::NaiveDate;

use crate::receiving::ReceiptDraft;
use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Entry point for recording goods received against purchase orders
pub struct ReceivingDesk<S: RecordService> {
    storage: S,
    engine: ReconciliationEngine,
    validator: Box<dyn ReceiptValidator>,
}

impl<S: RecordService> ReceivingDesk<S> {
    /// Create a new desk with the default engine and validator
    pub fn new(storage: S) -> Self {
        Self::with_engine(storage, ReconciliationEngine::new())
    }

    /// Create a new desk with a configured engine
    pub fn with_engine(storage: S, engine: ReconciliationEngine) -> Self {
        Self {
            storage,
            engine,
            validator: Box::new(DefaultReceiptValidator),
        }
    }

    /// Create a new desk with a custom receipt validator
    pub fn with_validator(
        storage: S,
        engine: ReconciliationEngine,
        validator: Box<dyn ReceiptValidator>,
    ) -> Self {
        Self {
            storage,
            engine,
            validator,
        }
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetch an order together with its full receipt history
    async fn load_order(
        &self,
        po_number: &str,
    ) -> ReceivingResult<(PurchaseOrder, Vec<ReceiptDocument>)> {
        let purchase_order = self
            .storage
            .get_purchase_order(po_number)
            .await?
            .ok_or_else(|| ReceivingError::PurchaseOrderNotFound(po_number.to_string()))?;
        let documents = self.storage.list_receipt_documents(po_number).await?;
        Ok((purchase_order, documents))
    }

    /// Receivable lines of an order, computed from fresh history
    pub async fn remaining_quantities(&self, po_number: &str) -> ReceivingResult<Vec<RemainingLine>> {
        let (purchase_order, documents) = self.load_order(po_number).await?;
        self.engine.compute_remaining(&purchase_order, &documents)
    }

    /// Current fulfilment status of an order
    pub async fn fulfillment_status(&self, po_number: &str) -> ReceivingResult<FulfillmentStatus> {
        let (purchase_order, documents) = self.load_order(po_number).await?;
        Ok(self.engine.fulfillment_status(&purchase_order, &documents))
    }

    /// Start a receipt against an order.
    ///
    /// Fails with [`ReceivingError::OrderFullyReceived`] when nothing is left to receive.
    pub async fn prepare_receipt(
        &self,
        po_number: &str,
        received_on: NaiveDate,
    ) -> ReceivingResult<ReceiptDraft> {
        let (purchase_order, documents) = self.load_order(po_number).await?;
        let remaining = self.engine.compute_remaining(&purchase_order, &documents)?;

        tracing::debug!(
            po_number = %po_number,
            receipts = documents.len(),
            receivable = remaining.len(),
            "prepared receipt draft"
        );

        Ok(ReceiptDraft::new(&purchase_order, remaining, received_on))
    }

    /// Validate, total and persist a draft
    pub async fn submit_receipt(&mut self, draft: &ReceiptDraft) -> ReceivingResult<ReceiptDocument> {
        let lines = draft.receipt_lines();
        if lines.is_empty() {
            return Err(ReceivingError::InvalidField(
                "Receipt must have at least one line".to_string(),
            ));
        }

        // Quantities that slipped past the input clamp
        self.engine.validate(&lines, &draft.caps())?;

        // Remaining quantity may have moved since the draft was prepared
        let (purchase_order, documents) = self.load_order(&draft.po_number).await?;
        let fresh = match self.engine.compute_remaining(&purchase_order, &documents) {
            Ok(fresh) => fresh,
            Err(ReceivingError::OrderFullyReceived(po_number)) => {
                return Err(ReceivingError::StaleRemainingQuantity {
                    po_number,
                    reason: "order has been fully received since the draft was prepared"
                        .to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let violations = self.engine.violations(&lines, &fresh);
        if !violations.is_empty() {
            tracing::warn!(
                po_number = %draft.po_number,
                count = violations.len(),
                "draft quantities exceed fresh remaining quantities"
            );
            return Err(ReceivingError::StaleRemainingQuantity {
                po_number: draft.po_number.clone(),
                reason: violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        let totals = self.engine.compute_totals(
            &lines,
            draft.other_charges.as_deref(),
            &purchase_order.vendor_tax_id,
        )?;

        let document = ReceiptDocument::new(
            draft.document_number.clone(),
            &purchase_order,
            lines,
            totals,
            draft.metadata.clone(),
        );
        self.validator.validate_document(&document)?;
        self.validator.validate_metadata(&document.metadata)?;

        let stored = self.storage.create_receipt_document(&document).await?;

        tracing::info!(
            document_number = %stored.document_number,
            po_number = %stored.po_number,
            total = %stored.totals.total,
            "receipt recorded"
        );

        Ok(stored)
    }

    /// Get a receipt by document number
    pub async fn get_receipt(&self, document_number: &str) -> ReceivingResult<Option<ReceiptDocument>> {
        self.storage.get_receipt_document(document_number).await
    }

    /// Edit the transporter, vehicle and date of a persisted receipt
    pub async fn update_receipt_metadata(
        &mut self,
        document_number: &str,
        metadata: ReceiptMetadata,
    ) -> ReceivingResult<ReceiptDocument> {
        self.validator.validate_metadata(&metadata)?;
        let updated = self
            .storage
            .update_receipt_metadata(document_number, &metadata)
            .await?;

        tracing::info!(document_number = %document_number, "receipt metadata updated");
        Ok(updated)
    }
}
