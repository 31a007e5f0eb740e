//! Registration funnel: courses, stages, pricing and the dialogue engine.

pub mod course;
pub mod engine;
pub mod event;
pub mod payment;
pub mod pricing;
pub mod prompt;
pub mod stage;
pub mod state;

pub use course::Course;
pub use engine::{Effect, FunnelEngine, Step};
pub use event::{Action, Decision, ReceiptUpload};
pub use payment::PaymentMethod;
pub use pricing::{MethodPricing, PaymentQuote, PricingTable};
pub use prompt::{approval_sequence, AdminNotice, NudgeKind, Prompt};
pub use stage::Stage;
pub use state::{ReceiptRef, Registration};
