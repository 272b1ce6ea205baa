use clap::Args;

use crate::cli::utils::{output_envelope, read_body};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::transport::HttpMethod;

#[derive(Args)]
pub struct RequestArgs {
    #[arg(help = "HTTP method (GET, POST, PUT, DELETE)")]
    pub method: String,
    #[arg(help = "Absolute URL or path relative to the API base URL")]
    pub url: String,
    #[arg(long, help = "JSON body for POST/PUT (read from stdin if omitted)")]
    pub data: Option<String>,
}

pub async fn handle(client: &ApiClient, args: RequestArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let method: HttpMethod = args.method.parse()?;

    let body = if method.allows_body() {
        Some(read_body(args.data)?)
    } else {
        None
    };

    let envelope = client.request(method, &args.url, body).await;
    output_envelope(&output_format, &envelope)
}
