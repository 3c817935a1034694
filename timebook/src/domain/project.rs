use serde::Serialize;

use super::{PhaseId, ProjectId};
use crate::matcher::Candidate;

/// A project that time can be booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Optional project number/code (e.g., "ABC-123").
    pub code: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl Candidate for Project {
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// A phase within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub id: PhaseId,
    pub name: String,
    pub project_id: ProjectId,
}

impl Phase {
    pub fn new(
        id: impl Into<PhaseId>,
        name: impl Into<String>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
        }
    }
}

impl Candidate for Phase {
    type Id = PhaseId;

    fn id(&self) -> &PhaseId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Phases belonging to `project_id`, in catalog order.
pub fn phases_for_project(phases: &[Phase], project_id: &ProjectId) -> Vec<Phase> {
    phases
        .iter()
        .filter(|phase| &phase.project_id == project_id)
        .cloned()
        .collect()
}
