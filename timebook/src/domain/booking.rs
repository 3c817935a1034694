use serde::Serialize;
use thiserror::Error;
use time::Date;

use super::{Phase, PhaseId, Project, ProjectId};
use crate::duration::{parse_duration, validate_booking_minutes, DurationError};

time::serde::format_description!(booking_date, Date, "[year]-[month]-[day]");

/// Errors that can occur when turning a draft into a booking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("no project selected")]
    MissingProject,
    #[error("no phase selected")]
    MissingPhase,
    #[error("phase {phase} does not belong to project {project}")]
    PhaseNotInProject { phase: PhaseId, project: ProjectId },
    #[error("invalid duration: {0}")]
    Duration(#[from] DurationError),
}

/// A validated time booking, only obtainable from [`BookingDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    #[serde(with = "booking_date")]
    date: Date,
    project: Project,
    phase: Phase,
    /// Canonical minutes, a multiple of 15 and at least 15.
    minutes: u32,
}

impl Booking {
    pub fn date(&self) -> Date {
        self.date
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

/// A booking row as the form holds it while it is being filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub date: Date,
    pub project: Option<Project>,
    pub phase: Option<Phase>,
    pub duration_text: String,
}

impl BookingDraft {
    pub fn new(date: Date) -> Self {
        Self {
            date,
            project: None,
            phase: None,
            duration_text: String::new(),
        }
    }

    /// Minutes the duration field currently parses to, before validation.
    pub fn parsed_minutes(&self) -> Option<u32> {
        parse_duration(&self.duration_text)
    }

    pub fn validate(&self) -> Result<Booking, BookingError> {
        let project = self.project.as_ref().ok_or(BookingError::MissingProject)?;
        let phase = self.phase.as_ref().ok_or(BookingError::MissingPhase)?;
        if phase.project_id != project.id {
            return Err(BookingError::PhaseNotInProject {
                phase: phase.id.clone(),
                project: project.id.clone(),
            });
        }
        let minutes = validate_booking_minutes(self.parsed_minutes())?;

        Ok(Booking {
            date: self.date,
            project: project.clone(),
            phase: phase.clone(),
            minutes,
        })
    }
}

/// Minutes booked against one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTotal {
    pub project: Project,
    pub minutes: u64,
}

/// The bookings entered during one session.
#[derive(Debug, Clone, Default)]
pub struct BookingSheet {
    bookings: Vec<Booking>,
}

impl BookingSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, booking: Booking) {
        tracing::debug!(
            project = %booking.project.id,
            phase = %booking.phase.id,
            minutes = booking.minutes,
            "booking added"
        );
        self.bookings.push(booking);
    }

    pub fn remove(&mut self, index: usize) -> Option<Booking> {
        (index < self.bookings.len()).then(|| self.bookings.remove(index))
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn bookings_on(&self, date: Date) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |booking| booking.date == date)
    }

    // Totals are u64: a single booking may hold up to u32::MAX minutes.
    pub fn total_minutes_on(&self, date: Date) -> u64 {
        self.bookings_on(date)
            .map(|booking| u64::from(booking.minutes))
            .sum()
    }

    pub fn total_minutes(&self) -> u64 {
        self.bookings
            .iter()
            .map(|booking| u64::from(booking.minutes))
            .sum()
    }

    /// Per-project totals, in order of first booking.
    pub fn totals_by_project(&self) -> Vec<ProjectTotal> {
        let mut totals: Vec<ProjectTotal> = Vec::new();
        for booking in &self.bookings {
            match totals
                .iter_mut()
                .find(|total| total.project.id == booking.project.id)
            {
                Some(total) => total.minutes += u64::from(booking.minutes),
                None => totals.push(ProjectTotal {
                    project: booking.project.clone(),
                    minutes: u64::from(booking.minutes),
                }),
            }
        }
        totals
    }
}
