use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde_json::json;

use super::{employee_line, ListArgs};
use crate::cli::config::api_client;
use crate::cli::utils::{ensure_role, output_rows, output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::{AllocatorApi, ManageAllocation, ALLOCATOR_GUARD};
use crate::services::AllocationRequest;

#[derive(Subcommand)]
pub enum AllocatorCommands {
    #[command(about = "List employees on the bench")]
    Bench {
        #[command(flatten)]
        list: ListArgs,
    },

    #[command(about = "Show one employee")]
    Employee { id: i64 },

    #[command(about = "Allocate an employee (defaults to bench)")]
    Allocate {
        employee_id: i64,
        #[arg(long, help = "1 bench, 2 training, 3 internal project")]
        r#type: Option<i64>,
        #[arg(long)]
        training: Option<i64>,
        #[arg(long)]
        project: Option<i64>,
        #[arg(long, help = "YYYY-MM-DD, defaults to today")]
        start: Option<NaiveDate>,
        #[arg(long, help = "YYYY-MM-DD, defaults to the start date")]
        end: Option<NaiveDate>,
    },

    #[command(about = "List allocations")]
    Allocations {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        employee: Option<i64>,
    },

    #[command(about = "Show one allocation")]
    Allocation { id: i64 },

    #[command(about = "Replace an allocation")]
    UpdateAllocation {
        id: i64,
        #[arg(long)]
        employee_id: i64,
        #[arg(long)]
        r#type: i64,
        #[arg(long)]
        training: Option<i64>,
        #[arg(long)]
        project: Option<i64>,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },

    #[command(about = "Delete an allocation")]
    DeleteAllocation { id: i64 },
}

pub async fn handle(cmd: AllocatorCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ensure_role(ALLOCATOR_GUARD)?;
    let allocator = AllocatorApi::new(api_client()?);

    match cmd {
        AllocatorCommands::Bench { list } => {
            let page = allocator.list_bench_employees(&list.params()).await?;
            output_rows(&output_format, &page.items, "Nobody is on the bench", employee_line)
        }
        AllocatorCommands::Employee { id } => output_value(&output_format, &allocator.get_employee(id).await?),
        AllocatorCommands::Allocate { employee_id, r#type, training, project, start, end } => {
            let today = Utc::now().date_naive();
            let mut screen = ManageAllocation::load(&allocator, employee_id, today).await?;
            if let Some(type_id) = r#type {
                screen.form.type_id = type_id;
            }
            if training.is_some() {
                screen.form.training_id = training;
            }
            screen.form.internal_project_id = project;
            screen.form.start_date = start.unwrap_or(today);
            screen.form.end_date = end.unwrap_or(screen.form.start_date);

            let message = screen.submit().await?;
            output_success(&output_format, &message, Some(json!({ "employee_id": employee_id })))
        }
        AllocatorCommands::Allocations { list, employee } => {
            let mut params = list.params();
            params.employee_id = employee;
            let page = allocator.list_allocations(&params).await?;
            output_rows(&output_format, &page.items, "No allocations", |a| {
                format!(
                    "{:>5}  employee={} type={} {} .. {}",
                    a.id, a.employee_id, a.allocation_type_id, a.start_date, a.end_date
                )
            })
        }
        AllocatorCommands::Allocation { id } => output_value(&output_format, &allocator.get_allocation(id).await?),
        AllocatorCommands::UpdateAllocation { id, employee_id, r#type, training, project, start, end } => {
            let request = AllocationRequest {
                employee_id,
                allocation_type_id: r#type,
                start_date: start,
                end_date: end,
                training_id: training,
                internal_project_id: project,
            };
            let reply = allocator.update_allocation(id, &request).await?;
            output_success(&output_format, &reply.message, Some(json!(reply.data)))
        }
        AllocatorCommands::DeleteAllocation { id } => {
            let message = allocator.delete_allocation(id).await?;
            output_success(&output_format, &message, None)
        }
    }
}
