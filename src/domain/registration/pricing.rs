//! Per-method, per-course pricing and quote computation.
//!
//! Pricing is explicit configuration injected at startup, never ambient
//! state. The engine only ever sees it through [`PricingTable::quote`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Course, PaymentMethod};

/// Prices for one payment channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodPricing {
    /// Display currency code for this channel (e.g. "USD", "SDG").
    pub currency: String,
    /// Per-course unit amount. Roster courses are priced per participant.
    pub amounts: HashMap<Course, u64>,
}

/// The full pricing table, keyed by payment method.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PricingTable {
    pub methods: HashMap<PaymentMethod, MethodPricing>,
}

/// A computed amount due for one registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub method: PaymentMethod,
    pub course: Course,
    pub currency: String,
    /// Price per participant (equals `subtotal` for single enrollments).
    pub unit_amount: u64,
    /// Number of participants billed. Always 1 for non-roster courses.
    pub seats: u32,
    /// Total before any discount.
    pub subtotal: u64,
    pub discount_percent: Option<u8>,
    /// Amount due after the discount, if any.
    pub total: f64,
}

impl PricingTable {
    /// Computes the amount due, or `None` if the method is not priced.
    ///
    /// Roster courses multiply the unit amount by the participant count
    /// (minimum 1). The discount applies to the whole subtotal.
    pub fn quote(
        &self,
        method: PaymentMethod,
        course: Course,
        seats: Option<u32>,
        discount_percent: Option<u8>,
    ) -> Option<PaymentQuote> {
        let pricing = self.methods.get(&method)?;
        let unit_amount = *pricing.amounts.get(&course)?;

        let seats = if course.has_roster() {
            seats.unwrap_or(1).max(1)
        } else {
            1
        };
        let subtotal = unit_amount * u64::from(seats);

        let total = match discount_percent {
            Some(pct) if pct > 0 => {
                let subtotal = subtotal as f64;
                subtotal - subtotal * f64::from(pct) / 100.0
            }
            _ => subtotal as f64,
        };

        Some(PaymentQuote {
            method,
            course,
            currency: pricing.currency.clone(),
            unit_amount,
            seats,
            subtotal,
            discount_percent: discount_percent.filter(|p| *p > 0),
            total,
        })
    }
}
