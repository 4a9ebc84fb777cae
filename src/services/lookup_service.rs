use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;
use crate::database::models::{
    AllocationType, InternalProject, JobRole, NewInternalProject, NewTraining, SecurityQuestion,
    Skill, Training,
};
use crate::database::Repository;
use crate::error::ApiError;

/// Create payload for job roles and skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

impl NameRequest {
    pub fn validate(&self) -> Result<String, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 100);
        errors.into_result("Invalid name")?;
        Ok(self.name.trim().to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TrainingRequest {
    pub fn validate(&self) -> Result<NewTraining, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 150);
        errors.require_order("end_date", self.start_date, self.end_date);
        errors.into_result("Invalid training")?;

        Ok(NewTraining {
            name: self.name.trim().to_string(),
            description: clean_description(&self.description),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl InternalProjectRequest {
    pub fn validate(&self) -> Result<NewInternalProject, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 150);
        errors.into_result("Invalid internal project")?;

        Ok(NewInternalProject {
            name: self.name.trim().to_string(),
            description: clean_description(&self.description),
        })
    }
}

fn clean_description(description: &Option<String>) -> Option<String> {
    description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Reference data shared by every role, plus the admin/manager writes on it.
pub struct LookupService {
    repo: Arc<dyn Repository>,
}

impl LookupService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn job_roles(&self) -> Result<Vec<JobRole>, ApiError> {
        Ok(self.repo.list_job_roles().await?)
    }

    pub async fn create_job_role(&self, request: &NameRequest) -> Result<JobRole, ApiError> {
        let name = request.validate()?;
        Ok(self.repo.insert_job_role(name).await?)
    }

    pub async fn delete_job_role(&self, id: i64) -> Result<(), ApiError> {
        if !self.repo.delete_job_role(id).await? {
            return Err(ApiError::not_found(format!("Job role {} not found", id)));
        }
        Ok(())
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, ApiError> {
        Ok(self.repo.list_skills().await?)
    }

    pub async fn create_skill(&self, request: &NameRequest) -> Result<Skill, ApiError> {
        let name = request.validate()?;
        Ok(self.repo.insert_skill(name).await?)
    }

    pub async fn delete_skill(&self, id: i64) -> Result<(), ApiError> {
        if !self.repo.delete_skill(id).await? {
            return Err(ApiError::not_found(format!("Skill {} not found", id)));
        }
        Ok(())
    }

    pub async fn allocation_types(&self) -> Result<Vec<AllocationType>, ApiError> {
        Ok(self.repo.list_allocation_types().await?)
    }

    pub async fn trainings(&self) -> Result<Vec<Training>, ApiError> {
        Ok(self.repo.list_trainings().await?)
    }

    pub async fn create_training(&self, request: &TrainingRequest) -> Result<Training, ApiError> {
        let new = request.validate()?;
        Ok(self.repo.insert_training(new).await?)
    }

    pub async fn internal_projects(&self) -> Result<Vec<InternalProject>, ApiError> {
        Ok(self.repo.list_internal_projects().await?)
    }

    pub async fn create_internal_project(
        &self,
        request: &InternalProjectRequest,
    ) -> Result<InternalProject, ApiError> {
        let new = request.validate()?;
        Ok(self.repo.insert_internal_project(new).await?)
    }

    pub async fn security_questions(&self) -> Result<Vec<SecurityQuestion>, ApiError> {
        Ok(self.repo.list_security_questions().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_dropped() {
        let req = InternalProjectRequest {
            name: " Portal ".into(),
            description: Some("   ".into()),
        };
        let new = req.validate().unwrap();
        assert_eq!(new.name, "Portal");
        assert!(new.description.is_none());
    }

    #[test]
    fn training_dates_are_ordered() {
        let req = TrainingRequest {
            name: "Rust".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(req.validate().is_err());
    }
}
