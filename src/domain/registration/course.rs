//! Course catalog keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The four enrollable programs.
///
/// The enum value doubles as the persisted key, the callback-action key and
/// the coupon scope key, always in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Course {
    Expert,
    Private,
    Kids,
    Highschool,
}

impl Course {
    /// All courses, in menu order.
    pub fn all() -> [Course; 4] {
        [Course::Expert, Course::Private, Course::Kids, Course::Highschool]
    }

    /// Returns the persisted key for this course.
    pub fn as_key(&self) -> &'static str {
        match self {
            Course::Expert => "expert",
            Course::Private => "private",
            Course::Kids => "kids",
            Course::Highschool => "highschool",
        }
    }

    /// Courses delivered through a shared drive folder require a verified
    /// Gmail address: the email must end in `@gmail.com` and be entered twice.
    pub fn requires_gmail(&self) -> bool {
        matches!(self, Course::Expert | Course::Highschool)
    }

    /// True if approval should grant read access to the course folder.
    pub fn grants_resource_access(&self) -> bool {
        matches!(self, Course::Expert | Course::Highschool)
    }

    /// Group enrollments collect a participant count and a name roster.
    pub fn has_roster(&self) -> bool {
        matches!(self, Course::Kids | Course::Highschool)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for Course {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expert" => Ok(Course::Expert),
            "private" => Ok(Course::Private),
            "kids" => Ok(Course::Kids),
            "highschool" => Ok(Course::Highschool),
            other => Err(ValidationError::invalid_format(
                "course",
                format!("unknown course key '{}'", other),
            )),
        }
    }
}
