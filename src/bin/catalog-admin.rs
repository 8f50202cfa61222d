use anyhow::Result;
use catalog_admin::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = cli::start()?;

    action.execute(&globals).await?;

    Ok(())
}
