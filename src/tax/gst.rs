//! GST (Goods and Services Tax) computation for goods receipts

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

/// Default state code of the receiving business (Gujarat)
pub const DEFAULT_HOME_STATE_CODE: &str = "24";

/// Round half-up to two decimal places
pub fn round2(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// GST rate structure for Indian taxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    /// Total GST rate percentage (e.g., 18.0 for 18%)
    pub total_rate: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
}

impl GstRate {
    /// Create a new GST rate with intra-state rates (CGST + SGST)
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
        }
    }

    /// Create a new GST rate with inter-state rates (IGST)
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            total_rate: total_rate.clone(),
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate,
        }
    }

    /// Validate that the GST rate structure is correct
    pub fn validate(&self) -> Result<(), GstError> {
        let zero = BigDecimal::from(0);
        if self.cgst_rate < zero || self.sgst_rate < zero || self.igst_rate < zero {
            return Err(GstError::InvalidRate(
                "GST components cannot be negative".to_string(),
            ));
        }

        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;

        if calculated_total != self.total_rate {
            return Err(GstError::InvalidRate(format!(
                "GST components don't add up to total rate: {} != {}",
                calculated_total, self.total_rate
            )));
        }

        // For intra-state transactions, CGST and SGST should be equal
        if self.igst_rate == zero && self.cgst_rate != self.sgst_rate {
            return Err(GstError::InvalidRate(
                "CGST and SGST rates must be equal for intra-state transactions".to_string(),
            ));
        }

        // For inter-state transactions, only IGST should be non-zero
        if self.igst_rate > zero && (self.cgst_rate > zero || self.sgst_rate > zero) {
            return Err(GstError::InvalidRate(
                "Only IGST should be applicable for inter-state transactions".to_string(),
            ));
        }

        Ok(())
    }

    fn is_intra_state_split(&self) -> bool {
        self.igst_rate == BigDecimal::from(0)
    }
}

/// Standard GST rates for different categories of goods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    /// Essential items - 0%
    Essential,
    /// Reduced rate items - 5%
    Reduced,
    /// Standard rate items - 12%
    Standard,
    /// Higher rate items - 18%
    Higher,
    /// Luxury/Sin goods - 28%
    Luxury,
}

impl GstCategory {
    /// Get the standard GST rate for this category
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstCategory::Essential => BigDecimal::from(0),
            GstCategory::Reduced => BigDecimal::from(5),
            GstCategory::Standard => BigDecimal::from(12),
            GstCategory::Higher => BigDecimal::from(18),
            GstCategory::Luxury => BigDecimal::from(28),
        }
    }

    /// Create intra-state GST rate for this category
    pub fn intra_state_rate(&self) -> GstRate {
        GstRate::intra_state(self.rate())
    }

    /// Create inter-state GST rate for this category
    pub fn inter_state_rate(&self) -> GstRate {
        GstRate::inter_state(self.rate())
    }
}

/// Jurisdiction settings deciding how a receipt is taxed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstConfig {
    /// GSTIN prefix of vendors in the same state as the receiving business
    pub home_state_code: String,
    /// Rates applied to vendors in the home state
    pub intra_state: GstRate,
    /// Rates applied to every other vendor
    pub inter_state: GstRate,
}

impl GstConfig {
    /// Configuration using one of the standard slabs
    pub fn for_category(home_state_code: String, category: GstCategory) -> Self {
        Self {
            home_state_code,
            intra_state: category.intra_state_rate(),
            inter_state: category.inter_state_rate(),
        }
    }

    /// Configuration using an arbitrary total rate percentage
    pub fn with_rate(home_state_code: String, total_rate: BigDecimal) -> Self {
        Self {
            home_state_code,
            intra_state: GstRate::intra_state(total_rate.clone()),
            inter_state: GstRate::inter_state(total_rate),
        }
    }

    /// Validate both rate sets and the state code
    pub fn validate(&self) -> Result<(), GstError> {
        let code = self.home_state_code.as_str();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(GstError::InvalidConfig(format!(
                "Home state code must be two digits, got '{}'",
                code
            )));
        }

        self.intra_state.validate()?;
        self.inter_state.validate()?;

        if !self.intra_state.is_intra_state_split() {
            return Err(GstError::InvalidConfig(
                "Intra-state rates cannot carry IGST".to_string(),
            ));
        }

        if self.inter_state.cgst_rate != BigDecimal::from(0)
            || self.inter_state.sgst_rate != BigDecimal::from(0)
        {
            return Err(GstError::InvalidConfig(
                "Inter-state rates cannot carry CGST or SGST".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a vendor GSTIN starts with the home state code, compared literally
    pub fn is_intra_state(&self, vendor_tax_id: &str) -> bool {
        vendor_tax_id.starts_with(self.home_state_code.as_str())
    }
}

impl Default for GstConfig {
    fn default() -> Self {
        Self::for_category(DEFAULT_HOME_STATE_CODE.to_string(), GstCategory::Higher)
    }
}

/// Detailed GST calculation breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstCalculation {
    /// Base amount (before GST), unrounded
    pub base_amount: BigDecimal,
    /// GST rate used for calculation
    pub gst_rate: GstRate,
    /// Calculated CGST amount
    pub cgst_amount: BigDecimal,
    /// Calculated SGST amount
    pub sgst_amount: BigDecimal,
    /// Calculated IGST amount
    pub igst_amount: BigDecimal,
    /// Total GST amount (CGST + SGST + IGST)
    pub total_gst_amount: BigDecimal,
}

impl GstCalculation {
    /// Calculate GST amounts from base amount and GST rate.
    ///
    /// Each component is computed on the unrounded base and rounded on its own.
    pub fn calculate(base_amount: BigDecimal, gst_rate: GstRate) -> Result<Self, GstError> {
        gst_rate.validate()?;

        let cgst_amount = round2(&((&base_amount * &gst_rate.cgst_rate) / BigDecimal::from(100)));
        let sgst_amount = round2(&((&base_amount * &gst_rate.sgst_rate) / BigDecimal::from(100)));
        let igst_amount = round2(&((&base_amount * &gst_rate.igst_rate) / BigDecimal::from(100)));

        let total_gst_amount = &cgst_amount + &sgst_amount + &igst_amount;

        Ok(Self {
            base_amount,
            gst_rate,
            cgst_amount,
            sgst_amount,
            igst_amount,
            total_gst_amount,
        })
    }
}

/// GST calculation engine bound to one jurisdiction
#[derive(Debug, Clone, Default)]
pub struct GstCalculator {
    config: GstConfig,
}

impl GstCalculator {
    /// Create a calculator, rejecting inconsistent rate sets
    pub fn new(config: GstConfig) -> Result<Self, GstError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &GstConfig {
        &self.config
    }

    /// Pick the rate set for a vendor
    pub fn rate_for(&self, vendor_tax_id: &str) -> &GstRate {
        if self.config.is_intra_state(vendor_tax_id) {
            &self.config.intra_state
        } else {
            &self.config.inter_state
        }
    }

    /// Split tax on a subtotal for a vendor
    pub fn calculate(
        &self,
        subtotal: &BigDecimal,
        vendor_tax_id: &str,
    ) -> Result<GstCalculation, GstError> {
        GstCalculation::calculate(subtotal.clone(), self.rate_for(vendor_tax_id).clone())
    }
}

/// GST-related errors
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
    #[error("Invalid GST configuration: {0}")]
    InvalidConfig(String),
}
