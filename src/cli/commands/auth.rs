use clap::Subcommand;
use serde_json::json;

use crate::auth::Role;
use crate::cli::config::api_client;
use crate::cli::utils::{output_rows, output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::AuthService;
use crate::services::{ResetPasswordRequest, SignUpRequest};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and store the token")]
    Signin {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Create an allocator account and sign in")]
    Signup {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_role, default_value = "allocator", help = "Only allocator can self-register")]
        role: Role,
        #[arg(long, help = "Security question id (see `auth questions`)")]
        question: i64,
        #[arg(long)]
        answer: String,
    },

    #[command(about = "Forget the stored token")]
    Signout,

    #[command(about = "Show the signed-in user from the stored token")]
    Status,

    #[command(about = "Ask the server who the token belongs to")]
    Whoami,

    #[command(about = "Change the signed-in user's password")]
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },

    #[command(about = "List security questions")]
    Questions,

    #[command(about = "Reset a password with the security answer")]
    ResetPassword {
        username: String,
        #[arg(long)]
        question: i64,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        new: String,
    },
}

pub(crate) fn parse_role(value: &str) -> Result<Role, String> {
    match value.to_ascii_lowercase().as_str() {
        "admin" | "1" => Ok(Role::Admin),
        "manager" | "2" => Ok(Role::Manager),
        "allocator" | "3" => Ok(Role::Allocator),
        other => Err(format!("unknown role '{}'", other)),
    }
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = AuthService::new(api_client()?);

    match cmd {
        AuthCommands::Signin { username, password } => {
            let issued = auth.sign_in(&username, &password).await?;
            output_success(
                &output_format,
                &format!("Signed in as {} ({})", issued.username, issued.role),
                Some(json!({ "username": issued.username, "role": issued.role, "expires_in": issued.expires_in })),
            )
        }
        AuthCommands::Signup { username, email, password, role, question, answer } => {
            let request = SignUpRequest {
                username,
                email,
                password,
                role,
                security_question_id: question,
                security_answer: answer,
            };
            let issued = auth.sign_up(&request).await?;
            output_success(
                &output_format,
                &format!("Account {} created", issued.username),
                Some(json!({ "username": issued.username, "role": issued.role })),
            )
        }
        AuthCommands::Signout => {
            auth.sign_out()?;
            output_success(&output_format, "Signed out", None)
        }
        AuthCommands::Status => {
            let status = json!({
                "authenticated": auth.is_authenticated(),
                "username": auth.username(),
                "role": auth.role().map(|r| r.name()),
            });
            output_value(&output_format, &status)
        }
        AuthCommands::Whoami => output_value(&output_format, &auth.whoami().await?),
        AuthCommands::ChangePassword { current, new } => {
            let message = auth.change_password(&current, &new).await?;
            output_success(&output_format, &message, None)
        }
        AuthCommands::Questions => {
            let questions = auth.security_questions().await?;
            output_rows(&output_format, &questions, "No security questions", |q| {
                format!("{:>3}  {}", q.id, q.question)
            })
        }
        AuthCommands::ResetPassword { username, question, answer, new } => {
            let request = ResetPasswordRequest {
                username,
                security_question_id: question,
                security_answer: answer,
                new_password: new,
            };
            let message = auth.reset_password(&request).await?;
            output_success(&output_format, &message, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_names_and_numbers() {
        assert_eq!(parse_role("Manager"), Ok(Role::Manager));
        assert_eq!(parse_role("3"), Ok(Role::Allocator));
        assert!(parse_role("root").is_err());
    }
}
