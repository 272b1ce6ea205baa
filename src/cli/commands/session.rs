use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_details;
use crate::cli::OutputFormat;
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Show whether a usable token is configured")]
    Status,
}

pub async fn handle(client: &ApiClient, cmd: SessionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::Status => {
            let session = client.session();
            output_details(
                &output_format,
                "session",
                json!({
                    "base_url": client.base_url().as_str(),
                    "token_present": session.token().is_some(),
                    "logged_in": session.is_logged(),
                    "honor_error_codes": client.expiry_policy().honor_error_codes,
                }),
            )
        }
    }
}
