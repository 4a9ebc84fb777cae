use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Seeded `allocation_types` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    Bench = 1,
    Training = 2,
    InternalProject = 3,
}

impl AllocationKind {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Bench),
            2 => Some(Self::Training),
            3 => Some(Self::InternalProject),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bench => "Bench",
            Self::Training => "Training",
            Self::InternalProject => "Internal Project",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Allocation {
    pub id: i64,
    pub employee_id: i64,
    pub allocation_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub training_id: Option<i64>,
    pub internal_project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAllocation {
    pub employee_id: i64,
    pub kind: AllocationKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub training_id: Option<i64>,
    pub internal_project_id: Option<i64>,
}

impl NewAllocation {
    pub fn into_allocation(self, id: i64, created_at: DateTime<Utc>) -> Allocation {
        Allocation {
            id,
            employee_id: self.employee_id,
            allocation_type_id: self.kind.id(),
            start_date: self.start_date,
            end_date: self.end_date,
            training_id: self.training_id,
            internal_project_id: self.internal_project_id,
            created_at,
        }
    }
}
