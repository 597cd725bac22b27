//! Command line surface of the `sasb` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use sasb_auth::{require_appointment_change, require_appointment_update};
use sasb_core::validation::normalize_start_time;
use sasb_core::{AppointmentId, AppointmentUpdate, DomainError, Role, UserId};

use crate::api::{ApiClient, RoleFilter};
use crate::config::{API_URL_ENV, ClientConfig, TOKEN_PATH_ENV};
use crate::error::ClientError;

pub const PASSWORD_ENV: &str = "SASB_PASSWORD";

/// Salon scheduling API client.
#[derive(Debug, Parser)]
#[command(name = "sasb", version)]
pub struct Args {
    /// Base URL of the API.
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// File holding the persisted tokens.
    #[arg(long, global = true, env = TOKEN_PATH_ENV)]
    pub token_path: Option<PathBuf>,

    /// Human-readable logs instead of JSON.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Log in and persist the issued tokens.
    Login {
        username: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// List the service catalog.
    Services {
        #[arg(long)]
        search: Option<String>,
    },
    /// List staff, optionally only the given roles.
    Employees {
        #[arg(long = "role", value_delimiter = ',')]
        roles: Vec<Role>,
    },
    /// List appointments.
    Appointments,
    /// Reschedule, reassign or annotate an appointment.
    UpdateAppointment {
        id: AppointmentId,
        /// Professional the appointment is assigned to.
        #[arg(long)]
        employee: Option<UserId>,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel a reserved appointment.
    CancelAppointment { id: AppointmentId },
    /// Mark an appointment as completed.
    CompleteAppointment { id: AppointmentId },
}

impl Args {
    /// Environment defaults with the command line flags applied on top.
    pub fn config(&self) -> Result<ClientConfig, ClientError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(path) = &self.token_path {
            config = config.with_token_path(path.clone());
        }
        Ok(config)
    }
}

impl Command {
    /// Whether the stored session must be restored before running.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Login { .. } | Command::Logout)
    }
}

/// Execute `command` and return what should be printed.
pub async fn run(client: &ApiClient, command: Command) -> Result<Value, ClientError> {
    let output = match command {
        Command::Login { username, password } => {
            let user = client.login(&username, &password).await?;
            to_value(&user)?
        }
        Command::Logout => {
            client.logout();
            json!({ "logged_out": true })
        }
        Command::Whoami => to_value(&client.session().view())?,
        Command::Services { search } => to_value(&client.list_services(search.as_deref()).await?)?,
        Command::Employees { roles } => {
            to_value(&client.list_users(&RoleFilter::only(roles)).await?)?
        }
        Command::Appointments => to_value(&client.list_appointments().await?)?,
        Command::UpdateAppointment {
            id,
            employee,
            start_time,
            notes,
        } => {
            let update = AppointmentUpdate {
                employee_id: employee,
                start_time: start_time.as_deref().map(normalize_start_time).transpose()?,
                notes,
                ..AppointmentUpdate::default()
            };
            if update.is_empty() {
                return Err(DomainError::validation("nothing to update").into());
            }
            let appointment = client.get_appointment(id).await?;
            require_appointment_update(client.session().user().as_ref(), &appointment, &update)?;
            to_value(&client.update_appointment(id, &update).await?)?
        }
        Command::CancelAppointment { id } => {
            check_appointment_change(client, id).await?;
            to_value(&client.cancel_appointment(id).await?)?
        }
        Command::CompleteAppointment { id } => {
            check_appointment_change(client, id).await?;
            to_value(&client.complete_appointment(id).await?)?
        }
    };
    Ok(output)
}

async fn check_appointment_change(client: &ApiClient, id: AppointmentId) -> Result<(), ClientError> {
    let appointment = client.get_appointment(id).await?;
    require_appointment_change(client.session().user().as_ref(), &appointment)?;
    Ok(())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::Encode(e.to_string()))
}
