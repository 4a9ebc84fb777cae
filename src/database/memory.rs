use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Allocation, AllocationType, DateRangeReportRow, Employee, InternalProject, JobRole,
    JobRoleReportRow, NewAllocation, NewEmployee, NewInternalProject, NewTraining, NewUser,
    SecurityQuestion, Skill, Training, User,
};
use crate::database::repository::Repository;
use crate::filter::{AllocationQuery, EmployeeQuery, FilterOrderInfo, Page, SortDirection};

#[derive(Default)]
struct Tables {
    employees: BTreeMap<i64, Employee>,
    allocations: BTreeMap<i64, Allocation>,
    job_roles: BTreeMap<i64, JobRole>,
    skills: BTreeMap<i64, Skill>,
    allocation_types: BTreeMap<i64, AllocationType>,
    trainings: BTreeMap<i64, Training>,
    internal_projects: BTreeMap<i64, InternalProject>,
    security_questions: BTreeMap<i64, SecurityQuestion>,
    users: BTreeMap<i64, User>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn check_employee_refs(&self, employee: &NewEmployee) -> Result<(), DatabaseError> {
        if !self.job_roles.contains_key(&employee.job_role_id) {
            return Err(DatabaseError::InvalidReference("employees_job_role_id_fkey".into()));
        }
        if !self.allocation_types.contains_key(&employee.allocation_type_id) {
            return Err(DatabaseError::InvalidReference("employees_allocation_type_id_fkey".into()));
        }
        if employee.skill_ids.iter().any(|id| !self.skills.contains_key(id)) {
            return Err(DatabaseError::InvalidReference("employee_skills_skill_id_fkey".into()));
        }
        Ok(())
    }

    fn check_email_free(&self, email: &str, except: Option<i64>) -> Result<(), DatabaseError> {
        let taken = self
            .employees
            .values()
            .any(|e| e.email.eq_ignore_ascii_case(email) && Some(e.id) != except);
        if taken {
            return Err(DatabaseError::Conflict("employees_email_key".into()));
        }
        Ok(())
    }

    fn check_allocation_refs(&self, allocation: &NewAllocation) -> Result<(), DatabaseError> {
        if !self.employees.contains_key(&allocation.employee_id) {
            return Err(DatabaseError::InvalidReference("allocations_employee_id_fkey".into()));
        }
        if let Some(id) = allocation.training_id {
            if !self.trainings.contains_key(&id) {
                return Err(DatabaseError::InvalidReference("allocations_training_id_fkey".into()));
            }
        }
        if let Some(id) = allocation.internal_project_id {
            if !self.internal_projects.contains_key(&id) {
                return Err(DatabaseError::InvalidReference(
                    "allocations_internal_project_id_fkey".into(),
                ));
            }
        }
        Ok(())
    }

    fn type_name(&self, id: i64) -> String {
        self.allocation_types
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    fn job_role_name(&self, id: i64) -> String {
        self.job_roles.get(&id).map(|r| r.name.clone()).unwrap_or_default()
    }
}

/// Repository kept entirely in process memory, seeded with the same lookup
/// rows as the initial migration.
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryRepository {
    pub fn seeded() -> Self {
        let mut tables = Tables::default();

        for (id, name) in [(1, "Bench"), (2, "Training"), (3, "Internal Project")] {
            tables.allocation_types.insert(id, AllocationType { id, name: name.to_string() });
        }
        tables.sequences.insert("allocation_types", 3);

        for name in ["Software Engineer", "Quality Analyst", "Business Analyst", "DevOps Engineer"] {
            let id = tables.next_id("job_roles");
            tables.job_roles.insert(id, JobRole { id, name: name.to_string() });
        }
        for name in ["Rust", "SQL", "Angular", "C#", "Testing"] {
            let id = tables.next_id("skills");
            tables.skills.insert(id, Skill { id, name: name.to_string() });
        }
        for question in [
            "What was the name of your first pet?",
            "In which city were you born?",
            "What is your favourite book?",
        ] {
            let id = tables.next_id("security_questions");
            tables
                .security_questions
                .insert(id, SecurityQuestion { id, question: question.to_string() });
        }

        let id = tables.next_id("trainings");
        tables.trainings.insert(
            id,
            Training {
                id,
                name: "Onboarding".to_string(),
                description: Some("General onboarding programme".to_string()),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
                end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            },
        );

        let id = tables.next_id("internal_projects");
        tables.internal_projects.insert(
            id,
            InternalProject {
                id,
                name: "Internal Tools".to_string(),
                description: Some("Maintenance of in-house tooling".to_string()),
            },
        );

        Self { tables: RwLock::new(tables) }
    }
}

/// Lookup-name uniqueness, matching the `LOWER(name)` unique indexes.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn compare_employees(a: &Employee, b: &Employee, column: &str) -> Ordering {
    match column {
        "name" => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        "email" => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        "bench_start_date" => a.bench_start_date.cmp(&b.bench_start_date),
        "bench_end_date" => a.bench_end_date.cmp(&b.bench_end_date),
        "job_role_id" => a.job_role_id.cmp(&b.job_role_id),
        "allocation_type_id" => a.allocation_type_id.cmp(&b.allocation_type_id),
        _ => a.id.cmp(&b.id),
    }
}

fn compare_allocations(a: &Allocation, b: &Allocation, column: &str) -> Ordering {
    match column {
        "employee_id" => a.employee_id.cmp(&b.employee_id),
        "allocation_type_id" => a.allocation_type_id.cmp(&b.allocation_type_id),
        "start_date" => a.start_date.cmp(&b.start_date),
        "end_date" => a.end_date.cmp(&b.end_date),
        _ => a.id.cmp(&b.id),
    }
}

fn sort_by_infos<T>(rows: &mut [T], order: &[FilterOrderInfo], cmp: fn(&T, &T, &str) -> Ordering) {
    rows.sort_by(|a, b| {
        for info in order {
            let ord = match info.sort {
                SortDirection::Asc => cmp(a, b, &info.column),
                SortDirection::Desc => cmp(b, a, &info.column),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        cmp(a, b, "id")
    });
}

fn paginate<T: Clone>(rows: Vec<T>, request: crate::filter::PageRequest) -> Page<T> {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();
    Page::new(items, total, request)
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DatabaseError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut rows: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| query.allocation_type_id.map_or(true, |t| e.allocation_type_id == t))
            .filter(|e| match &needle {
                Some(n) => e.name.to_lowercase().contains(n) || e.email.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect();
        sort_by_infos(&mut rows, &query.order, compare_employees);
        Ok(paginate(rows, query.page))
    }

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.tables.read().await.employees.get(&id).cloned())
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_employee_refs(&employee)?;
        tables.check_email_free(&employee.email, None)?;
        let id = tables.next_id("employees");
        let row = employee.into_employee(id);
        tables.employees.insert(id, row.clone());
        Ok(row)
    }

    async fn update_employee(&self, id: i64, employee: NewEmployee) -> Result<Option<Employee>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.employees.contains_key(&id) {
            return Ok(None);
        }
        tables.check_employee_refs(&employee)?;
        tables.check_email_free(&employee.email, Some(id))?;
        let row = employee.into_employee(id);
        tables.employees.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_employee(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.employees.remove(&id).is_none() {
            return Ok(false);
        }
        tables.allocations.retain(|_, a| a.employee_id != id);
        Ok(true)
    }

    async fn list_allocations(&self, query: &AllocationQuery) -> Result<Page<Allocation>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Allocation> = tables
            .allocations
            .values()
            .filter(|a| query.employee_id.map_or(true, |e| a.employee_id == e))
            .cloned()
            .collect();
        sort_by_infos(&mut rows, &query.order, compare_allocations);
        Ok(paginate(rows, query.page))
    }

    async fn get_allocation(&self, id: i64) -> Result<Option<Allocation>, DatabaseError> {
        Ok(self.tables.read().await.allocations.get(&id).cloned())
    }

    async fn insert_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_allocation_refs(&allocation)?;
        let id = tables.next_id("allocations");
        let employee_id = allocation.employee_id;
        let row = allocation.into_allocation(id, Utc::now());
        if let Some(employee) = tables.employees.get_mut(&employee_id) {
            employee.allocation_type_id = row.allocation_type_id;
        }
        tables.allocations.insert(id, row.clone());
        Ok(row)
    }

    async fn update_allocation(&self, id: i64, allocation: NewAllocation) -> Result<Option<Allocation>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.allocations.get(&id).map(|a| a.created_at) else {
            return Ok(None);
        };
        tables.check_allocation_refs(&allocation)?;
        let row = allocation.into_allocation(id, created_at);
        tables.allocations.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_allocation(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.allocations.remove(&id).is_some())
    }

    async fn list_job_roles(&self) -> Result<Vec<JobRole>, DatabaseError> {
        Ok(self.tables.read().await.job_roles.values().cloned().collect())
    }

    async fn insert_job_role(&self, name: String) -> Result<JobRole, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.job_roles.values().any(|r| same_name(&r.name, &name)) {
            return Err(DatabaseError::Conflict("job_roles_name_key".into()));
        }
        let id = tables.next_id("job_roles");
        let row = JobRole { id, name };
        tables.job_roles.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_job_role(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.employees.values().any(|e| e.job_role_id == id) {
            return Err(DatabaseError::InvalidReference("employees_job_role_id_fkey".into()));
        }
        Ok(tables.job_roles.remove(&id).is_some())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        Ok(self.tables.read().await.skills.values().cloned().collect())
    }

    async fn insert_skill(&self, name: String) -> Result<Skill, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.skills.values().any(|s| same_name(&s.name, &name)) {
            return Err(DatabaseError::Conflict("skills_name_key".into()));
        }
        let id = tables.next_id("skills");
        let row = Skill { id, name };
        tables.skills.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_skill(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.employees.values().any(|e| e.skill_ids.contains(&id)) {
            return Err(DatabaseError::InvalidReference("employee_skills_skill_id_fkey".into()));
        }
        Ok(tables.skills.remove(&id).is_some())
    }

    async fn list_allocation_types(&self) -> Result<Vec<AllocationType>, DatabaseError> {
        Ok(self.tables.read().await.allocation_types.values().cloned().collect())
    }

    async fn list_trainings(&self) -> Result<Vec<Training>, DatabaseError> {
        Ok(self.tables.read().await.trainings.values().cloned().collect())
    }

    async fn insert_training(&self, training: NewTraining) -> Result<Training, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id("trainings");
        let row = Training {
            id,
            name: training.name,
            description: training.description,
            start_date: training.start_date,
            end_date: training.end_date,
        };
        tables.trainings.insert(id, row.clone());
        Ok(row)
    }

    async fn list_internal_projects(&self) -> Result<Vec<InternalProject>, DatabaseError> {
        Ok(self.tables.read().await.internal_projects.values().cloned().collect())
    }

    async fn insert_internal_project(&self, project: NewInternalProject) -> Result<InternalProject, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.internal_projects.values().any(|p| same_name(&p.name, &project.name)) {
            return Err(DatabaseError::Conflict("internal_projects_name_key".into()));
        }
        let id = tables.next_id("internal_projects");
        let row = InternalProject { id, name: project.name, description: project.description };
        tables.internal_projects.insert(id, row.clone());
        Ok(row)
    }

    async fn list_security_questions(&self) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        Ok(self.tables.read().await.security_questions.values().cloned().collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict("users_username_key".into()));
        }
        if tables.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::Conflict("users_email_key".into()));
        }
        if !tables.security_questions.contains_key(&user.security_question_id) {
            return Err(DatabaseError::InvalidReference("users_security_question_id_fkey".into()));
        }
        let id = tables.next_id("users");
        let row = user.into_user(id, Utc::now());
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn update_user_password(&self, id: i64, hash: String, salt: String) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = hash;
                user.password_salt = salt;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn allocations_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DateRangeReportRow>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut allocations: Vec<&Allocation> = tables
            .allocations
            .values()
            .filter(|a| a.start_date <= to && a.end_date >= from)
            .collect();
        allocations.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));

        let rows = allocations
            .into_iter()
            .filter_map(|a| {
                let employee = tables.employees.get(&a.employee_id)?;
                Some(DateRangeReportRow {
                    allocation_id: a.id,
                    employee_id: employee.id,
                    employee_name: employee.name.clone(),
                    job_role: tables.job_role_name(employee.job_role_id),
                    allocation_type: tables.type_name(a.allocation_type_id),
                    start_date: a.start_date,
                    end_date: a.end_date,
                    training: a
                        .training_id
                        .and_then(|id| tables.trainings.get(&id))
                        .map(|t| t.name.clone()),
                    internal_project: a
                        .internal_project_id
                        .and_then(|id| tables.internal_projects.get(&id))
                        .map(|p| p.name.clone()),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn employees_by_job_roles(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut employees: Vec<&Employee> = tables
            .employees
            .values()
            .filter(|e| job_role_ids.contains(&e.job_role_id))
            .collect();
        employees.sort_by(|a, b| compare_employees(a, b, "name").then(a.id.cmp(&b.id)));

        Ok(employees
            .into_iter()
            .map(|e| JobRoleReportRow {
                employee_id: e.id,
                employee_name: e.name.clone(),
                email: e.email.clone(),
                job_role: tables.job_role_name(e.job_role_id),
                allocation_type: tables.type_name(e.allocation_type_id),
                bench_start_date: e.bench_start_date,
            })
            .collect())
    }
}
