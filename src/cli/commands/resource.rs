use clap::Subcommand;

use crate::cli::utils::{output_envelope, read_body};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::resources::Resource;

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "List all records")]
    List,

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Create a record from --data or stdin")]
    Create {
        #[arg(long, help = "JSON body")]
        data: Option<String>,
    },

    #[command(about = "Update a record from --data or stdin")]
    Update {
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, help = "JSON body")]
        data: Option<String>,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record ID")]
        id: String,
    },
}

pub async fn handle(
    client: &ApiClient,
    name: &str,
    cmd: ResourceCommands,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let resource: Resource = name.parse()?;
    let api = client.resource(resource);

    let envelope = match cmd {
        ResourceCommands::List => api.list().await,
        ResourceCommands::Show { id } => api.show(&id).await,
        ResourceCommands::Create { data } => api.create(read_body(data)?).await,
        ResourceCommands::Update { id, data } => api.update(&id, read_body(data)?).await,
        ResourceCommands::Delete { id } => api.remove(&id).await,
    };

    output_envelope(&output_format, &envelope)
}
