use crate::{
    api::{ApiRequest, ApiResponse, FormPart},
    cli::actions::{Context, print_json},
};
use anyhow::{Context as _, Result};
use http::Method;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// A raw JSON request against an API path.
#[derive(Debug)]
pub struct Args {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// A multipart upload of one or more files under the same field name.
#[derive(Debug)]
pub struct UploadArgs {
    pub method: Method,
    pub path: String,
    pub field: String,
    pub files: Vec<PathBuf>,
}

/// # Errors
/// Returns an error if the request fails or the session can not be recovered.
pub async fn execute(context: &Context, args: Args) -> Result<()> {
    let Args { method, path, body } = args;

    let mut request = ApiRequest::new(method, &path);
    if let Some(body) = body {
        request = request.with_json(&body)?;
    }

    context.resume().await;
    let response = context.api.execute(request).await?;
    print_response(&response)
}

/// # Errors
/// Returns an error if a file can not be read or the upload fails.
pub async fn upload(context: &Context, args: UploadArgs) -> Result<()> {
    let mut parts = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let part = FormPart::from_path(&args.field, file)
            .await
            .with_context(|| format!("failed to prepare {}", file.display()))?;
        debug!(file = %part.file_name, bytes = part.data.len(), "upload part ready");
        parts.push(part);
    }

    let request = ApiRequest::new(args.method, &args.path).with_multipart(parts);

    context.resume().await;
    let response = context.api.execute(request).await?;
    print_response(&response)
}

fn print_response(response: &ApiResponse) -> Result<()> {
    match response.json::<Value>() {
        Ok(value) => print_json(&value),
        Err(_) => {
            println!("{}", response.text());
            Ok(())
        }
    }
}
