//! Registration ledger port.
//!
//! The ledger is the admins' external record of completed registrations
//! (in production, a spreadsheet). Every completed funnel is appended as
//! one row; the approval decision later updates that row's status column.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::registration::Registration;

/// Position of an appended row, used to update its status later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerRow(pub i64);

/// Decision recorded against a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStatus {
    Approved,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::Rejected => "rejected",
        }
    }
}

/// Port for appending registrations to the external ledger.
#[async_trait]
pub trait RegistrationLedger: Send + Sync {
    /// Append a completed registration and return where it landed.
    async fn append(
        &self,
        user: UserId,
        registration: &Registration,
    ) -> Result<LedgerRow, DomainError>;

    /// Stamp a previously appended row with the admin decision.
    async fn update_status(&self, row: LedgerRow, status: DecisionStatus)
        -> Result<(), DomainError>;
}
