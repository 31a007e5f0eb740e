//! Payment methods offered at the payment-choice stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A supported payment channel.
///
/// The snake_case key is what arrives in the `pay_<method>` callback action
/// and what the pricing table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Paypal,
    Bankak,
    Saudi,
    Uae,
    WuMg,
    Rwanda,
    VodafoneEg,
    Iban,
}

impl PaymentMethod {
    /// Methods whose receipts cannot be verified without sender details:
    /// the funnel asks one extra free-text question after the receipt.
    pub fn requires_extra_info(&self) -> bool {
        matches!(self, PaymentMethod::WuMg | PaymentMethod::VodafoneEg)
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Bankak => "bankak",
            PaymentMethod::Saudi => "saudi",
            PaymentMethod::Uae => "uae",
            PaymentMethod::WuMg => "wu_mg",
            PaymentMethod::Rwanda => "rwanda",
            PaymentMethod::VodafoneEg => "vodafone_eg",
            PaymentMethod::Iban => "iban",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paypal" => Ok(PaymentMethod::Paypal),
            "bankak" => Ok(PaymentMethod::Bankak),
            "saudi" => Ok(PaymentMethod::Saudi),
            "uae" => Ok(PaymentMethod::Uae),
            "wu_mg" => Ok(PaymentMethod::WuMg),
            "rwanda" => Ok(PaymentMethod::Rwanda),
            "vodafone_eg" => Ok(PaymentMethod::VodafoneEg),
            "iban" => Ok(PaymentMethod::Iban),
            other => Err(ValidationError::invalid_format(
                "payment_method",
                format!("unknown payment method '{}'", other),
            )),
        }
    }
}
