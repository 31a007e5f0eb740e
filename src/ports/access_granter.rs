//! Course-resource access port.

use async_trait::async_trait;

use crate::domain::registration::Course;

/// Port for granting an approved registrant access to course resources
/// (in production, sharing a drive folder with their account).
///
/// Granting is best-effort: a failure must never abort the approval that
/// triggered it, so the call reports success as a boolean instead of an
/// error. Implementations log the underlying cause themselves.
#[async_trait]
pub trait AccessGranter: Send + Sync {
    /// Share the course's resources with `email`. Returns whether the
    /// grant went through.
    async fn grant(&self, course: Course, email: &str) -> bool;
}
