mod booking;
mod ids;
mod project;

pub use booking::{Booking, BookingDraft, BookingError, BookingSheet, ProjectTotal};
pub use ids::{PhaseId, ProjectId};
pub use project::{phases_for_project, Phase, Project};
