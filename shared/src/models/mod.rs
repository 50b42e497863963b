mod attendees;
mod events;
mod photos;
mod profiles;

pub use attendees::{Attendee, NewAttendee, RsvpStatus};
pub use events::{Category, CoHost, EventQuery, EventRecord, NewEvent};
pub use photos::{NewPhoto, Photo};
pub use profiles::Profile;

use thiserror::Error;

/// Raised when a string does not name a known enum variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}
