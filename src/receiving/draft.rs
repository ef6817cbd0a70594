//! Receipt drafts: the editable state of a receipt before it is submitted

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconciliation::{clamp_to_cap, parse_quantity, ReconciliationEngine};
use crate::traits::normalize_name;
use crate::types::*;

/// Generate a fresh receipt document number
pub fn generate_document_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("GRN-{}", id[..8].to_uppercase())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One receivable order line on a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub line: PurchaseOrderLine,
    /// Remaining quantity when the draft was prepared
    pub cap: BigDecimal,
    pub quantity: BigDecimal,
    /// Excluded lines are left out of the receipt
    pub included: bool,
}

/// A receipt being filled in against one purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    pub document_number: String,
    pub po_number: String,
    pub vendor_tax_id: String,
    pub lines: Vec<DraftLine>,
    pub metadata: ReceiptMetadata,
    /// Raw "other charges" input; absent or non-numeric counts as zero
    pub other_charges: Option<String>,
}

impl ReceiptDraft {
    /// Create a draft offering every receivable line, prefilled at its remaining quantity
    pub fn new(
        purchase_order: &PurchaseOrder,
        remaining: Vec<RemainingLine>,
        received_on: NaiveDate,
    ) -> Self {
        let lines = remaining
            .into_iter()
            .map(|position| DraftLine {
                line: position.line,
                cap: position.remaining_quantity.clone(),
                quantity: position.remaining_quantity,
                included: true,
            })
            .collect();

        Self {
            document_number: generate_document_number(),
            po_number: purchase_order.po_number.clone(),
            vendor_tax_id: purchase_order.vendor_tax_id.clone(),
            lines,
            metadata: ReceiptMetadata::new(received_on),
            other_charges: None,
        }
    }

    /// Use a caller-supplied document number
    pub fn with_document_number(mut self, document_number: String) -> Self {
        self.document_number = document_number;
        self
    }

    fn line_mut(&mut self, name: &str) -> ReceivingResult<&mut DraftLine> {
        let key = normalize_name(name);
        self.lines
            .iter_mut()
            .find(|l| normalize_name(&l.line.name) == key)
            .ok_or_else(|| {
                ReceivingError::InvalidField(format!("No receivable line named '{}'", name))
            })
    }

    /// Set a quantity from user input.
    ///
    /// Values above the line's cap are silently reduced to the cap. Returns the
    /// accepted quantity.
    pub fn set_quantity(&mut self, name: &str, input: &str) -> ReceivingResult<BigDecimal> {
        let quantity =
            parse_quantity(name, input).map_err(|v| ReceivingError::Validation(vec![v]))?;

        let line = self.line_mut(name)?;
        let accepted = clamp_to_cap(quantity, &line.cap);
        line.quantity = accepted.clone();
        line.included = true;
        Ok(accepted)
    }

    /// Set a quantity programmatically, without clamping.
    ///
    /// Used for batch fills; anything above the cap or past two decimal places is
    /// rejected at submit.
    pub fn fill_quantity(&mut self, name: &str, quantity: BigDecimal) -> ReceivingResult<()> {
        let line = self.line_mut(name)?;
        line.quantity = quantity;
        line.included = true;
        Ok(())
    }

    /// Leave a line out of this receipt
    pub fn exclude_line(&mut self, name: &str) -> ReceivingResult<()> {
        self.line_mut(name)?.included = false;
        Ok(())
    }

    pub fn set_other_charges(&mut self, input: &str) {
        self.other_charges = Some(input.to_string());
    }

    pub fn set_transporter(&mut self, transporter: &str) {
        self.metadata.transporter = non_blank(transporter);
    }

    pub fn set_vehicle_number(&mut self, vehicle_number: &str) {
        self.metadata.vehicle_number = non_blank(vehicle_number);
    }

    pub fn set_received_on(&mut self, received_on: NaiveDate) {
        self.metadata.received_on = received_on;
    }

    /// Lines that will be recorded on the receipt
    pub fn receipt_lines(&self) -> Vec<ReceiptLine> {
        self.lines
            .iter()
            .filter(|l| l.included)
            .map(|l| ReceiptLine::from_order_line(&l.line, l.quantity.clone()))
            .collect()
    }

    /// The caps this draft was prepared with
    pub fn caps(&self) -> Vec<RemainingLine> {
        self.lines
            .iter()
            .map(|l| RemainingLine {
                line: l.line.clone(),
                received_so_far: &l.line.quantity_ordered - &l.cap,
                remaining_quantity: l.cap.clone(),
            })
            .collect()
    }

    /// Running totals for display while the draft is edited
    pub fn totals(&self, engine: &ReconciliationEngine) -> ReceivingResult<ReceiptTotals> {
        engine.compute_totals(
            &self.receipt_lines(),
            self.other_charges.as_deref(),
            &self.vendor_tax_id,
        )
    }
}
