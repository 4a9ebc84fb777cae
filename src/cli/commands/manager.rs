use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use super::{employee_line, ListArgs};
use crate::cli::config::api_client;
use crate::cli::utils::{ensure_role, output_rows, output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::{capitalize, LookupApi, ManagerApi, MANAGER_GUARD};
use crate::services::{InternalProjectRequest, TrainingRequest};

#[derive(Subcommand)]
pub enum ManagerCommands {
    #[command(about = "List employees, optionally by allocation type")]
    Employees {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, help = "1 bench, 2 training, 3 internal project")]
        allocation_type: Option<i64>,
    },

    #[command(about = "Show one employee")]
    Employee { id: i64 },

    #[command(about = "List trainings")]
    Trainings,

    #[command(about = "Add a training")]
    AddTraining {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "YYYY-MM-DD")]
        start: NaiveDate,
        #[arg(long, help = "YYYY-MM-DD")]
        end: NaiveDate,
    },

    #[command(about = "List internal projects")]
    Projects,

    #[command(about = "Add an internal project")]
    AddProject {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
}

pub async fn handle(cmd: ManagerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ensure_role(MANAGER_GUARD)?;
    let client = api_client()?;
    let manager = ManagerApi::new(client.clone());
    let lookups = LookupApi::new(client);

    match cmd {
        ManagerCommands::Employees { list, allocation_type } => {
            let mut params = list.params();
            params.allocation_type_id = allocation_type;
            let page = manager.list_employees(&params).await?;
            output_rows(&output_format, &page.items, "No employees found", employee_line)
        }
        ManagerCommands::Employee { id } => output_value(&output_format, &manager.get_employee(id).await?),
        ManagerCommands::Trainings => {
            let trainings = lookups.trainings().await?;
            output_rows(&output_format, &trainings, "No trainings", |t| {
                format!("{:>3}  {:<30} {} .. {}", t.id, capitalize(&t.name), t.start_date, t.end_date)
            })
        }
        ManagerCommands::AddTraining { name, description, start, end } => {
            let request = TrainingRequest {
                name,
                description,
                start_date: start,
                end_date: end,
            };
            let training = manager.add_training(&request).await?;
            output_success(&output_format, &format!("Training {} added", training.id), Some(json!(training)))
        }
        ManagerCommands::Projects => {
            let projects = lookups.internal_projects().await?;
            output_rows(&output_format, &projects, "No internal projects", |p| {
                format!("{:>3}  {}", p.id, capitalize(&p.name))
            })
        }
        ManagerCommands::AddProject { name, description } => {
            let request = InternalProjectRequest { name, description };
            let project = manager.add_internal_project(&request).await?;
            output_success(&output_format, &format!("Internal project {} added", project.id), Some(json!(project)))
        }
    }
}
