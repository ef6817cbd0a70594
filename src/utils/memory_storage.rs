//! In-memory record service for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// In-memory record service for testing and development
///
/// Persisting a receipt repeats the remaining-quantity check against the
/// stored history, the way the real backend does at write time.
#[derive(Debug, Clone)]
pub struct MemoryRecordService {
    purchase_orders: Arc<RwLock<HashMap<String, PurchaseOrder>>>,
    receipts: Arc<RwLock<HashMap<String, ReceiptDocument>>>,
}

fn read<T>(lock: &RwLock<T>) -> ReceivingResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| ReceivingError::Storage("record store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> ReceivingResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| ReceivingError::Storage("record store lock poisoned".to_string()))
}

impl MemoryRecordService {
    /// Create a new memory record service instance
    pub fn new() -> Self {
        Self {
            purchase_orders: Arc::new(RwLock::new(HashMap::new())),
            receipts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a purchase order, replacing any with the same number
    pub fn insert_purchase_order(&self, purchase_order: PurchaseOrder) -> ReceivingResult<()> {
        write(&self.purchase_orders)?.insert(purchase_order.po_number.clone(), purchase_order);
        Ok(())
    }

    /// Number of stored receipts
    pub fn receipt_count(&self) -> ReceivingResult<usize> {
        Ok(read(&self.receipts)?.len())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> ReceivingResult<()> {
        write(&self.purchase_orders)?.clear();
        write(&self.receipts)?.clear();
        Ok(())
    }
}

fn history_of(receipts: &HashMap<String, ReceiptDocument>, po_number: &str) -> Vec<ReceiptDocument> {
    let mut documents: Vec<ReceiptDocument> = receipts
        .values()
        .filter(|doc| doc.po_number == po_number)
        .cloned()
        .collect();
    documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    documents
}

impl Default for MemoryRecordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordService for MemoryRecordService {
    async fn get_purchase_order(&self, po_number: &str) -> ReceivingResult<Option<PurchaseOrder>> {
        Ok(read(&self.purchase_orders)?.get(po_number).cloned())
    }

    async fn list_receipt_documents(
        &self,
        po_number: &str,
    ) -> ReceivingResult<Vec<ReceiptDocument>> {
        let receipts = read(&self.receipts)?;
        Ok(history_of(&receipts, po_number))
    }

    async fn create_receipt_document(
        &mut self,
        document: &ReceiptDocument,
    ) -> ReceivingResult<ReceiptDocument> {
        let purchase_order = read(&self.purchase_orders)?
            .get(&document.po_number)
            .cloned()
            .ok_or_else(|| ReceivingError::PurchaseOrderNotFound(document.po_number.clone()))?;

        let mut receipts = write(&self.receipts)?;
        if receipts.contains_key(&document.document_number) {
            return Err(ReceivingError::DuplicateDocumentNumber(
                document.document_number.clone(),
            ));
        }

        // Authoritative check against the stored history
        let history = history_of(&receipts, &document.po_number);
        let engine = ReconciliationEngine::new();
        let remaining = engine
            .compute_remaining(&purchase_order, &history)
            .unwrap_or_default();
        let violations = engine.violations(&document.lines, &remaining);
        if !violations.is_empty() {
            return Err(ReceivingError::StaleRemainingQuantity {
                po_number: document.po_number.clone(),
                reason: violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        receipts.insert(document.document_number.clone(), document.clone());
        Ok(document.clone())
    }

    async fn get_receipt_document(
        &self,
        document_number: &str,
    ) -> ReceivingResult<Option<ReceiptDocument>> {
        Ok(read(&self.receipts)?.get(document_number).cloned())
    }

    async fn update_receipt_metadata(
        &mut self,
        document_number: &str,
        metadata: &ReceiptMetadata,
    ) -> ReceivingResult<ReceiptDocument> {
        let mut receipts = write(&self.receipts)?;
        let document = receipts
            .get_mut(document_number)
            .ok_or_else(|| ReceivingError::ReceiptNotFound(document_number.to_string()))?;
        document.apply_metadata(metadata.clone());
        Ok(document.clone())
    }
}
