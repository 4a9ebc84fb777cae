use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;

use super::auth::parse_role;
use super::{employee_line, ListArgs};
use crate::auth::Role;
use crate::cli::config::api_client;
use crate::cli::utils::{ensure_role, output_rows, output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::{capitalize, AdminApi, LookupApi, ADMIN_GUARD};
use crate::services::{EmployeeRequest, SignUpRequest};

#[derive(Args, Debug, Clone)]
pub struct EmployeeArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, help = "YYYY-MM-DD")]
    pub bench_start: NaiveDate,
    #[arg(long, help = "YYYY-MM-DD")]
    pub bench_end: Option<NaiveDate>,
    #[arg(long)]
    pub job_role: i64,
    #[arg(long = "skill", help = "Skill id; repeat for several")]
    pub skills: Vec<i64>,
    #[arg(long, default_value_t = 1, help = "1 bench, 2 training, 3 internal project")]
    pub allocation_type: i64,
}

impl From<EmployeeArgs> for EmployeeRequest {
    fn from(args: EmployeeArgs) -> Self {
        EmployeeRequest {
            name: args.name,
            email: args.email,
            bench_start_date: args.bench_start,
            bench_end_date: args.bench_end,
            job_role_id: args.job_role,
            skill_ids: args.skills,
            allocation_type_id: args.allocation_type,
        }
    }
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "List employees")]
    Employees {
        #[command(flatten)]
        list: ListArgs,
    },

    #[command(about = "Show one employee")]
    Employee { id: i64 },

    #[command(about = "Add an employee")]
    AddEmployee {
        #[command(flatten)]
        employee: EmployeeArgs,
    },

    #[command(about = "Replace an employee's details")]
    UpdateEmployee {
        id: i64,
        #[command(flatten)]
        employee: EmployeeArgs,
    },

    #[command(about = "Delete an employee and its allocations")]
    DeleteEmployee { id: i64 },

    #[command(about = "List job roles")]
    JobRoles,

    #[command(about = "Add a job role")]
    AddJobRole { name: String },

    #[command(about = "Delete a job role")]
    DeleteJobRole { id: i64 },

    #[command(about = "List skills")]
    Skills,

    #[command(about = "Add a skill")]
    AddSkill { name: String },

    #[command(about = "Delete a skill")]
    DeleteSkill { id: i64 },

    #[command(about = "Create an account with any role")]
    AddUser {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_role, help = "admin, manager or allocator")]
        role: Role,
        #[arg(long, help = "Security question id (see `auth questions`)")]
        question: i64,
        #[arg(long)]
        answer: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ensure_role(ADMIN_GUARD)?;
    let client = api_client()?;
    let admin = AdminApi::new(client.clone());
    let lookups = LookupApi::new(client);

    match cmd {
        AdminCommands::Employees { list } => {
            let page = admin.list_employees(&list.params()).await?;
            output_rows(&output_format, &page.items, "No employees found", employee_line)?;
            if matches!(output_format, OutputFormat::Text) {
                println!("page {} of {} ({} total)", page.page, page.total_pages(), page.total);
            }
            Ok(())
        }
        AdminCommands::Employee { id } => output_value(&output_format, &admin.get_employee(id).await?),
        AdminCommands::AddEmployee { employee } => {
            let reply = admin.add_employee(&employee.into()).await?;
            output_success(&output_format, &reply.message, Some(json!(reply.data)))
        }
        AdminCommands::UpdateEmployee { id, employee } => {
            let reply = admin.update_employee(id, &employee.into()).await?;
            output_success(&output_format, &reply.message, Some(json!(reply.data)))
        }
        AdminCommands::DeleteEmployee { id } => {
            let message = admin.delete_employee(id).await?;
            output_success(&output_format, &message, None)
        }
        AdminCommands::JobRoles => {
            let roles = lookups.job_roles().await?;
            output_rows(&output_format, &roles, "No job roles", |r| {
                format!("{:>3}  {}", r.id, capitalize(&r.name))
            })
        }
        AdminCommands::AddJobRole { name } => {
            let role = admin.add_job_role(&name).await?;
            output_success(&output_format, &format!("Job role {} added", role.id), Some(json!(role)))
        }
        AdminCommands::DeleteJobRole { id } => {
            let message = admin.delete_job_role(id).await?;
            output_success(&output_format, &message, None)
        }
        AdminCommands::Skills => {
            let skills = lookups.skills().await?;
            output_rows(&output_format, &skills, "No skills", |s| {
                format!("{:>3}  {}", s.id, capitalize(&s.name))
            })
        }
        AdminCommands::AddSkill { name } => {
            let skill = admin.add_skill(&name).await?;
            output_success(&output_format, &format!("Skill {} added", skill.id), Some(json!(skill)))
        }
        AdminCommands::DeleteSkill { id } => {
            let message = admin.delete_skill(id).await?;
            output_success(&output_format, &message, None)
        }
        AdminCommands::AddUser { username, email, password, role, question, answer } => {
            let request = SignUpRequest {
                username,
                email,
                password,
                role,
                security_question_id: question,
                security_answer: answer,
            };
            let user = admin.add_user(&request).await?;
            output_success(
                &output_format,
                &format!("Account {} created as {}", user.username, user.role),
                Some(json!(user)),
            )
        }
    }
}
