use clap::Subcommand;

use crate::util::api_request;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Fetch the frozen/session/behavior/sequence summary for a user
    Summary { user_id: String },
    /// Freeze a user's account
    Freeze { user_id: String },
    /// Clear a user's active sessions
    ResetSessions { user_id: String },
}

pub async fn run(api_url: &str, command: AccountCommands) -> i32 {
    match command {
        AccountCommands::Summary { user_id } => {
            api_request(
                api_url,
                reqwest::Method::GET,
                &format!("/accounts/{user_id}/summary"),
                None,
            )
            .await
        }
        AccountCommands::Freeze { user_id } => {
            api_request(
                api_url,
                reqwest::Method::POST,
                &format!("/accounts/{user_id}/freeze"),
                None,
            )
            .await
        }
        AccountCommands::ResetSessions { user_id } => {
            api_request(
                api_url,
                reqwest::Method::POST,
                &format!("/accounts/{user_id}/reset-sessions"),
                None,
            )
            .await
        }
    }
}
