use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Allocation, AllocationType, DateRangeReportRow, Employee, InternalProject, JobRole,
    JobRoleReportRow, NewAllocation, NewEmployee, NewInternalProject, NewTraining, NewUser,
    SecurityQuestion, Skill, Training, User,
};
use crate::database::repository::Repository;
use crate::filter::{AllocationQuery, EmployeeQuery, FilterOrder, Page};

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, bench_start_date, bench_end_date, job_role_id, allocation_type_id";

const ALLOCATION_COLUMNS: &str =
    "id, employee_id, allocation_type_id, start_date, end_date, training_id, internal_project_id, created_at";

const USER_COLUMNS: &str = "id, username, email, password_hash, password_salt, role, \
     security_question_id, security_answer_hash, security_answer_salt, created_at";

pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fill `skill_ids` for a batch of employees with one query.
    async fn attach_skills(&self, employees: &mut [Employee]) -> Result<(), DatabaseError> {
        if employees.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = employees.iter().map(|e| e.id).collect();
        let links: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT employee_id, skill_id FROM employee_skills
             WHERE employee_id = ANY($1)
             ORDER BY skill_id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_employee: HashMap<i64, Vec<i64>> = HashMap::new();
        for (employee_id, skill_id) in links {
            by_employee.entry(employee_id).or_default().push(skill_id);
        }
        for employee in employees.iter_mut() {
            employee.skill_ids = by_employee.remove(&employee.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn replace_skills(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: i64,
        skill_ids: &[i64],
    ) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM employee_skills WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&mut **tx)
            .await?;
        if !skill_ids.is_empty() {
            sqlx::query(
                "INSERT INTO employee_skills (employee_id, skill_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(employee_id)
            .bind(skill_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    fn push_employee_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a EmployeeQuery) {
        builder.push(" WHERE TRUE");
        if let Some(type_id) = query.allocation_type_id {
            builder.push(" AND allocation_type_id = ").push_bind(type_id);
        }
        if let Some(search) = &query.search {
            let pattern = contains_pattern(search);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

/// `ILIKE` pattern matching `search` literally anywhere in the value.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Repository for PgRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DatabaseError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM employees");
        Self::push_employee_filters(&mut count, query);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(format!("SELECT {} FROM employees", EMPLOYEE_COLUMNS));
        Self::push_employee_filters(&mut select, query);
        select
            .push(" ")
            .push(FilterOrder::generate(&query.order, "id"))
            .push(" LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());
        let mut items: Vec<Employee> = select.build_query_as().fetch_all(&self.pool).await?;
        self.attach_skills(&mut items).await?;

        Ok(Page::new(items, total, query.page))
    }

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        let row: Option<Employee> =
            sqlx::query_as(&format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(employee) => {
                let mut batch = [employee];
                self.attach_skills(&mut batch).await?;
                let [employee] = batch;
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut row: Employee = sqlx::query_as(&format!(
            "INSERT INTO employees (name, email, bench_start_date, bench_end_date, job_role_id, allocation_type_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(employee.bench_start_date)
        .bind(employee.bench_end_date)
        .bind(employee.job_role_id)
        .bind(employee.allocation_type_id)
        .fetch_one(&mut *tx)
        .await?;
        Self::replace_skills(&mut tx, row.id, &employee.skill_ids).await?;
        tx.commit().await?;

        row.skill_ids = employee.skill_ids;
        Ok(row)
    }

    async fn update_employee(&self, id: i64, employee: NewEmployee) -> Result<Option<Employee>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let row: Option<Employee> = sqlx::query_as(&format!(
            "UPDATE employees
             SET name = $2, email = $3, bench_start_date = $4, bench_end_date = $5,
                 job_role_id = $6, allocation_type_id = $7
             WHERE id = $1
             RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(employee.bench_start_date)
        .bind(employee.bench_end_date)
        .bind(employee.job_role_id)
        .bind(employee.allocation_type_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut row) = row else {
            return Ok(None);
        };
        Self::replace_skills(&mut tx, id, &employee.skill_ids).await?;
        tx.commit().await?;

        row.skill_ids = employee.skill_ids;
        Ok(Some(row))
    }

    async fn delete_employee(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_allocations(&self, query: &AllocationQuery) -> Result<Page<Allocation>, DatabaseError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM allocations WHERE TRUE");
        if let Some(employee_id) = query.employee_id {
            count.push(" AND employee_id = ").push_bind(employee_id);
        }
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(format!("SELECT {} FROM allocations WHERE TRUE", ALLOCATION_COLUMNS));
        if let Some(employee_id) = query.employee_id {
            select.push(" AND employee_id = ").push_bind(employee_id);
        }
        select
            .push(" ")
            .push(FilterOrder::generate(&query.order, "id"))
            .push(" LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());
        let items = select.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total, query.page))
    }

    async fn get_allocation(&self, id: i64) -> Result<Option<Allocation>, DatabaseError> {
        let row = sqlx::query_as(&format!("SELECT {} FROM allocations WHERE id = $1", ALLOCATION_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let row: Allocation = sqlx::query_as(&format!(
            "INSERT INTO allocations (employee_id, allocation_type_id, start_date, end_date, training_id, internal_project_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            ALLOCATION_COLUMNS
        ))
        .bind(allocation.employee_id)
        .bind(allocation.kind.id())
        .bind(allocation.start_date)
        .bind(allocation.end_date)
        .bind(allocation.training_id)
        .bind(allocation.internal_project_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE employees SET allocation_type_id = $2 WHERE id = $1")
            .bind(allocation.employee_id)
            .bind(allocation.kind.id())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn update_allocation(&self, id: i64, allocation: NewAllocation) -> Result<Option<Allocation>, DatabaseError> {
        let row = sqlx::query_as(&format!(
            "UPDATE allocations
             SET employee_id = $2, allocation_type_id = $3, start_date = $4, end_date = $5,
                 training_id = $6, internal_project_id = $7
             WHERE id = $1
             RETURNING {}",
            ALLOCATION_COLUMNS
        ))
        .bind(id)
        .bind(allocation.employee_id)
        .bind(allocation.kind.id())
        .bind(allocation.start_date)
        .bind(allocation.end_date)
        .bind(allocation.training_id)
        .bind(allocation.internal_project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_allocation(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM allocations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_job_roles(&self) -> Result<Vec<JobRole>, DatabaseError> {
        Ok(sqlx::query_as("SELECT id, name FROM job_roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_job_role(&self, name: String) -> Result<JobRole, DatabaseError> {
        Ok(sqlx::query_as("INSERT INTO job_roles (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_job_role(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM job_roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        Ok(sqlx::query_as("SELECT id, name FROM skills ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_skill(&self, name: String) -> Result<Skill, DatabaseError> {
        Ok(sqlx::query_as("INSERT INTO skills (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_skill(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_allocation_types(&self) -> Result<Vec<AllocationType>, DatabaseError> {
        Ok(sqlx::query_as("SELECT id, name FROM allocation_types ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_trainings(&self) -> Result<Vec<Training>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT id, name, description, start_date, end_date FROM trainings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_training(&self, training: NewTraining) -> Result<Training, DatabaseError> {
        Ok(sqlx::query_as(
            "INSERT INTO trainings (name, description, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, start_date, end_date",
        )
        .bind(training.name)
        .bind(training.description)
        .bind(training.start_date)
        .bind(training.end_date)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_internal_projects(&self) -> Result<Vec<InternalProject>, DatabaseError> {
        Ok(sqlx::query_as("SELECT id, name, description FROM internal_projects ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_internal_project(&self, project: NewInternalProject) -> Result<InternalProject, DatabaseError> {
        Ok(sqlx::query_as(
            "INSERT INTO internal_projects (name, description) VALUES ($1, $2)
             RETURNING id, name, description",
        )
        .bind(project.name)
        .bind(project.description)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_security_questions(&self) -> Result<Vec<SecurityQuestion>, DatabaseError> {
        Ok(sqlx::query_as("SELECT id, question FROM security_questions ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        Ok(sqlx::query_as(&format!(
            "INSERT INTO users (username, email, password_hash, password_salt, role,
                                security_question_id, security_answer_hash, security_answer_salt)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.password_salt)
        .bind(user.role)
        .bind(user.security_question_id)
        .bind(user.security_answer_hash)
        .bind(user.security_answer_salt)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_user_password(&self, id: i64, hash: String, salt: String) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, password_salt = $3 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .bind(salt)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn allocations_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DateRangeReportRow>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT a.id AS allocation_id, e.id AS employee_id, e.name AS employee_name,
                    j.name AS job_role, t.name AS allocation_type,
                    a.start_date, a.end_date,
                    tr.name AS training, p.name AS internal_project
             FROM allocations a
             JOIN employees e ON e.id = a.employee_id
             JOIN job_roles j ON j.id = e.job_role_id
             JOIN allocation_types t ON t.id = a.allocation_type_id
             LEFT JOIN trainings tr ON tr.id = a.training_id
             LEFT JOIN internal_projects p ON p.id = a.internal_project_id
             WHERE a.start_date <= $2 AND a.end_date >= $1
             ORDER BY a.start_date, a.id",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn employees_by_job_roles(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT e.id AS employee_id, e.name AS employee_name, e.email,
                    j.name AS job_role, t.name AS allocation_type, e.bench_start_date
             FROM employees e
             JOIN job_roles j ON j.id = e.job_role_id
             JOIN allocation_types t ON t.id = e.allocation_type_id
             WHERE e.job_role_id = ANY($1)
             ORDER BY LOWER(e.name), e.id",
        )
        .bind(job_role_ids)
        .fetch_all(&self.pool)
        .await?)
    }
}
