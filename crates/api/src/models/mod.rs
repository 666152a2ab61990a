//! Domain models for the API.
//!
//! Row-backed domain types live here; wire DTOs that differ from the domain
//! shape (request payloads, public projections) live next to their handlers.

pub mod course;
pub mod enrollment;
pub mod order;
pub mod user;

pub use course::{Course, CourseDetails, EnrolledStudent, Lecture};
pub use enrollment::Enrollment;
pub use order::Order;
pub use user::{User, UserProfile};
