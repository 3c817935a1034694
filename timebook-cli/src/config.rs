use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use timebook::domain::{Phase, Project, ProjectId};

/// Project and phase catalog the CLI books against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimebookConfig {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub phases: Vec<PhaseEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub id: String,
    pub name: String,
    /// Id of the owning project.
    pub project: String,
}

/// Validated catalog, in config file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub projects: Vec<Project>,
    pub phases: Vec<Phase>,
}

impl Default for TimebookConfig {
    fn default() -> Self {
        let project = |id: &str, name: &str| ProjectEntry {
            id: id.to_string(),
            name: name.to_string(),
            code: None,
        };
        let phase = |id: &str, name: &str, project: &str| PhaseEntry {
            id: id.to_string(),
            name: name.to_string(),
            project: project.to_string(),
        };

        Self {
            projects: vec![
                project("anthropic", "Anthropic"),
                project("vercel", "Vercel"),
                project("stripe", "Stripe"),
                project("linear", "Linear"),
                project("figma", "Figma"),
            ],
            phases: vec![
                phase("anthropic-discovery", "Discovery", "anthropic"),
                phase("anthropic-build", "Build", "anthropic"),
                phase("anthropic-support", "Support", "anthropic"),
                phase("vercel-design", "Design", "vercel"),
                phase("vercel-build", "Build", "vercel"),
                phase("stripe-integration", "Integration", "stripe"),
                phase("stripe-review", "Review", "stripe"),
                phase("linear-planning", "Planning", "linear"),
                phase("figma-design", "Design", "figma"),
                phase("figma-handoff", "Handoff", "figma"),
            ],
        }
    }
}

impl TimebookConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("timebook")
            .join("config.toml"))
    }

    /// Load config from `path`, or the default location. Returns the default
    /// catalog if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using default catalog");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Check ids and phase ownership and build the domain catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        let mut project_ids = HashSet::new();
        for project in &self.projects {
            if !project_ids.insert(project.id.as_str()) {
                bail!("Duplicate project id '{}'", project.id);
            }
        }

        let mut phase_ids = HashSet::new();
        for phase in &self.phases {
            if !phase_ids.insert(phase.id.as_str()) {
                bail!("Duplicate phase id '{}'", phase.id);
            }
            if !project_ids.contains(phase.project.as_str()) {
                bail!(
                    "Phase '{}' refers to unknown project '{}'",
                    phase.id,
                    phase.project
                );
            }
        }

        let projects = self
            .projects
            .iter()
            .map(|entry| {
                let project = Project::new(entry.id.as_str(), entry.name.as_str());
                match &entry.code {
                    Some(code) => project.with_code(code.as_str()),
                    None => project,
                }
            })
            .collect();
        let phases = self
            .phases
            .iter()
            .map(|entry| {
                Phase::new(
                    entry.id.as_str(),
                    entry.name.as_str(),
                    ProjectId::new(entry.project.as_str()),
                )
            })
            .collect();

        Ok(Catalog { projects, phases })
    }
}
