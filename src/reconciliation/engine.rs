//! Remaining-quantity tracking, receipt validation and receipt totals

use bigdecimal::BigDecimal;

use crate::reconciliation::quantity::{has_excess_precision, parse_other_charges};
use crate::tax::gst::{round2, GstCalculator, GstConfig};
use crate::traits::*;
use crate::types::*;

/// Pure reconciliation engine over an order and its receipt history
///
/// Holds no state about any particular order; every call recomputes from the
/// inputs it is given.
pub struct ReconciliationEngine {
    calculator: GstCalculator,
    matcher: Box<dyn LineMatcher>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Engine with the default GST jurisdiction and name matching
    pub fn new() -> Self {
        Self {
            calculator: GstCalculator::default(),
            matcher: Box::new(NameMatcher),
        }
    }

    /// Engine with a custom GST jurisdiction
    pub fn with_config(config: GstConfig) -> ReceivingResult<Self> {
        Ok(Self {
            calculator: GstCalculator::new(config)?,
            matcher: Box::new(NameMatcher),
        })
    }

    /// Replace the line matching strategy
    pub fn with_matcher(mut self, matcher: Box<dyn LineMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// GST calculator in use
    pub fn gst_calculator(&self) -> &GstCalculator {
        &self.calculator
    }

    /// Position of every order line, including fully received ones
    pub fn line_positions(
        &self,
        purchase_order: &PurchaseOrder,
        documents: &[ReceiptDocument],
    ) -> Vec<RemainingLine> {
        let zero = BigDecimal::from(0);

        purchase_order
            .lines
            .iter()
            .map(|line| {
                let received_so_far: BigDecimal = documents
                    .iter()
                    .filter(|doc| doc.po_number == purchase_order.po_number)
                    .flat_map(|doc| doc.lines.iter())
                    .filter(|received| self.matcher.matches(line, received))
                    .map(|received| &received.quantity_received)
                    .sum();

                let outstanding = &line.quantity_ordered - &received_so_far;
                let remaining_quantity = if outstanding > zero {
                    outstanding
                } else {
                    zero.clone()
                };

                RemainingLine {
                    line: line.clone(),
                    received_so_far,
                    remaining_quantity,
                }
            })
            .collect()
    }

    /// Lines that can still be received, with their remaining quantity
    ///
    /// Fails with [`ReceivingError::OrderFullyReceived`] when no line remains.
    pub fn compute_remaining(
        &self,
        purchase_order: &PurchaseOrder,
        documents: &[ReceiptDocument],
    ) -> ReceivingResult<Vec<RemainingLine>> {
        let zero = BigDecimal::from(0);
        let receivable: Vec<RemainingLine> = self
            .line_positions(purchase_order, documents)
            .into_iter()
            .filter(|position| position.remaining_quantity > zero)
            .collect();

        tracing::debug!(
            po_number = %purchase_order.po_number,
            receivable = receivable.len(),
            lines = purchase_order.lines.len(),
            "computed remaining quantities"
        );

        if receivable.is_empty() {
            return Err(ReceivingError::OrderFullyReceived(
                purchase_order.po_number.clone(),
            ));
        }

        Ok(receivable)
    }

    /// Collect every violation of candidate lines against the remaining quantities
    ///
    /// Candidates matching the same order line are summed before comparing with
    /// its remaining quantity; an over-received line is reported once, under the
    /// name of its first candidate.
    pub fn violations(&self, candidates: &[ReceiptLine], remaining: &[RemainingLine]) -> Vec<Violation> {
        let zero = BigDecimal::from(0);
        let mut violations = Vec::new();

        // Candidate indexes grouped by the order line they match
        let mut groups: Vec<(Option<usize>, Vec<usize>)> = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let quantity = &candidate.quantity_received;
            if *quantity <= zero || has_excess_precision(quantity) {
                violations.push((
                    index,
                    Violation::InvalidQuantityFormat {
                        name: candidate.name.clone(),
                        input: candidate.quantity_received.to_string(),
                    },
                ));
                continue;
            }

            if candidate.rate <= zero {
                violations.push((
                    index,
                    Violation::NonPositiveRate {
                        name: candidate.name.clone(),
                    },
                ));
            }

            let matched = remaining
                .iter()
                .position(|position| self.matcher.matches(&position.line, candidate));

            // Unmatched candidates are checked one by one
            let group = matched.and_then(|_| groups.iter().position(|(line, _)| *line == matched));
            match group {
                Some(group) => groups[group].1.push(index),
                None => groups.push((matched, vec![index])),
            }
        }

        for (matched, members) in groups {
            let max = matched
                .map(|line| remaining[line].remaining_quantity.clone())
                .unwrap_or_else(|| zero.clone());
            let total: BigDecimal = members
                .iter()
                .map(|index| &candidates[*index].quantity_received)
                .sum();

            if total > max {
                let first = members[0];
                violations.push((
                    first,
                    Violation::QuantityExceedsRemaining {
                        name: candidates[first].name.clone(),
                        max,
                    },
                ));
            }
        }

        // Report in candidate order
        violations.sort_by_key(|(index, _)| *index);
        violations.into_iter().map(|(_, violation)| violation).collect()
    }

    /// Validate candidate lines against the remaining quantities
    pub fn validate(
        &self,
        candidates: &[ReceiptLine],
        remaining: &[RemainingLine],
    ) -> ReceivingResult<()> {
        let violations = self.violations(candidates, remaining);
        if violations.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = violations.len(), "receipt lines rejected");
            Err(ReceivingError::Validation(violations))
        }
    }

    /// Subtotal, GST split and total for a set of receipt lines
    pub fn compute_totals(
        &self,
        lines: &[ReceiptLine],
        other_charges: Option<&str>,
        vendor_tax_id: &str,
    ) -> ReceivingResult<ReceiptTotals> {
        let subtotal: BigDecimal = lines.iter().map(ReceiptLine::amount).sum();
        let other_charges = parse_other_charges(other_charges);
        let gst = self.calculator.calculate(&subtotal, vendor_tax_id)?;

        let total = round2(&(&subtotal + &gst.total_gst_amount + &other_charges));

        Ok(ReceiptTotals {
            subtotal: round2(&subtotal),
            cgst: gst.cgst_amount,
            sgst: gst.sgst_amount,
            igst: gst.igst_amount,
            other_charges: round2(&other_charges),
            total,
        })
    }

    /// Whether no line of the order can be received any more
    pub fn is_order_fully_received(
        &self,
        purchase_order: &PurchaseOrder,
        documents: &[ReceiptDocument],
    ) -> bool {
        matches!(
            self.compute_remaining(purchase_order, documents),
            Err(ReceivingError::OrderFullyReceived(_))
        )
    }

    /// Derive the fulfilment status from the full receipt history
    pub fn fulfillment_status(
        &self,
        purchase_order: &PurchaseOrder,
        documents: &[ReceiptDocument],
    ) -> FulfillmentStatus {
        let zero = BigDecimal::from(0);
        let positions = self.line_positions(purchase_order, documents);

        if positions.iter().all(|p| p.remaining_quantity == zero) {
            FulfillmentStatus::FullyReceived
        } else if positions.iter().all(|p| p.received_so_far == zero) {
            FulfillmentStatus::Open
        } else {
            FulfillmentStatus::PartiallyReceived
        }
    }
}
