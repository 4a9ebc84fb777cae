use chrono::NaiveDate;
use clap::Subcommand;

use crate::cli::config::api_client;
use crate::cli::utils::{ensure_role, output_rows};
use crate::cli::OutputFormat;
use crate::client::{capitalize, DateRangeReportForm, JobRoleReportForm, ManagerApi, MANAGER_GUARD};

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "Allocations overlapping a date range")]
    DateRange {
        #[arg(long, help = "YYYY-MM-DD")]
        from: NaiveDate,
        #[arg(long, help = "YYYY-MM-DD")]
        to: NaiveDate,
    },

    #[command(about = "Employees holding any of the given job roles")]
    JobRole {
        #[arg(long = "role", help = "Job role id; repeat for several")]
        roles: Vec<i64>,
    },
}

pub async fn handle(cmd: ReportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ensure_role(MANAGER_GUARD)?;
    let manager = ManagerApi::new(api_client()?);

    match cmd {
        ReportCommands::DateRange { from, to } => {
            let mut form = DateRangeReportForm::new(from, to);
            form.submit(&manager).await?;
            output_rows(&output_format, &form.rows, "No allocations in range", |r| {
                format!(
                    "{:<28} {:<22} {:<16} {} .. {} {}",
                    capitalize(&r.employee_name),
                    r.job_role,
                    r.allocation_type,
                    r.start_date,
                    r.end_date,
                    r.training.as_deref().or(r.internal_project.as_deref()).unwrap_or("")
                )
            })
        }
        ReportCommands::JobRole { roles } => {
            let mut form = JobRoleReportForm::new(roles);
            form.submit(&manager).await?;
            output_rows(&output_format, &form.rows, "No employees with those roles", |r| {
                format!(
                    "{:<28} {:<32} {:<22} {}",
                    capitalize(&r.employee_name),
                    r.email,
                    r.job_role,
                    r.allocation_type
                )
            })
        }
    }
}
