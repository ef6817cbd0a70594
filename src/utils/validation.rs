//! Validation utilities for receipt form fields

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(field: &str, amount: &BigDecimal) -> ReceivingResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(ReceivingError::InvalidField(format!(
            "{} must be positive",
            field
        )))
    } else {
        Ok(())
    }
}

/// Validate that a document number is valid
pub fn validate_document_number(document_number: &str) -> ReceivingResult<()> {
    if document_number.trim().is_empty() {
        return Err(ReceivingError::InvalidField(
            "Document number cannot be empty".to_string(),
        ));
    }

    if document_number.len() > 50 {
        return Err(ReceivingError::InvalidField(
            "Document number cannot exceed 50 characters".to_string(),
        ));
    }

    // Alphanumeric plus the separators order systems commonly use
    if !document_number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/')
    {
        return Err(ReceivingError::InvalidField(
            "Document number can only contain letters, digits, '-', '_' and '/'".to_string(),
        ));
    }

    Ok(())
}

/// Validate the shape of a GSTIN: two-digit state code followed by 13 alphanumerics
pub fn validate_gstin(gstin: &str) -> ReceivingResult<()> {
    let gstin = gstin.trim();

    if gstin.len() != 15 {
        return Err(ReceivingError::InvalidField(format!(
            "GSTIN '{}' must be 15 characters",
            gstin
        )));
    }

    if !gstin.chars().take(2).all(|c| c.is_ascii_digit()) {
        return Err(ReceivingError::InvalidField(format!(
            "GSTIN '{}' must start with a two-digit state code",
            gstin
        )));
    }

    if !gstin
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(ReceivingError::InvalidField(format!(
            "GSTIN '{}' can only contain digits and upper-case letters",
            gstin
        )));
    }

    Ok(())
}

/// Validate a vehicle registration number
pub fn validate_vehicle_number(vehicle_number: &str) -> ReceivingResult<()> {
    if vehicle_number.trim().is_empty() {
        return Err(ReceivingError::InvalidField(
            "Vehicle number cannot be blank".to_string(),
        ));
    }

    if vehicle_number.len() > 20 {
        return Err(ReceivingError::InvalidField(
            "Vehicle number cannot exceed 20 characters".to_string(),
        ));
    }

    if !vehicle_number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ReceivingError::InvalidField(
            "Vehicle number can only contain letters, digits, spaces and dashes".to_string(),
        ));
    }

    Ok(())
}

/// Validate a transporter name
pub fn validate_transporter(transporter: &str) -> ReceivingResult<()> {
    if transporter.trim().is_empty() {
        return Err(ReceivingError::InvalidField(
            "Transporter cannot be blank".to_string(),
        ));
    }

    if transporter.len() > 100 {
        return Err(ReceivingError::InvalidField(
            "Transporter cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced receipt validator with detailed field checks
pub struct EnhancedReceiptValidator;

impl ReceiptValidator for EnhancedReceiptValidator {
    fn validate_document(&self, document: &ReceiptDocument) -> ReceivingResult<()> {
        // Basic validation
        DefaultReceiptValidator.validate_document(document)?;

        validate_document_number(&document.document_number)?;
        validate_gstin(&document.vendor_tax_id)?;

        for line in &document.lines {
            validate_positive_amount(&format!("Quantity of '{}'", line.name), &line.quantity_received)?;
            validate_positive_amount(&format!("Rate of '{}'", line.name), &line.rate)?;
        }

        // The same item cannot appear twice on one receipt
        let mut names = std::collections::HashSet::new();
        for line in &document.lines {
            if !names.insert(normalize_name(&line.name)) {
                return Err(ReceivingError::InvalidField(format!(
                    "Item '{}' appears more than once on the receipt",
                    line.name
                )));
            }
        }

        Ok(())
    }

    fn validate_metadata(&self, metadata: &ReceiptMetadata) -> ReceivingResult<()> {
        if let Some(transporter) = &metadata.transporter {
            validate_transporter(transporter)?;
        }
        if let Some(vehicle_number) = &metadata.vehicle_number {
            validate_vehicle_number(vehicle_number)?;
        }
        Ok(())
    }
}
