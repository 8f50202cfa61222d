pub mod catalog;
pub mod request;
pub mod session;

mod context;
mod run;

pub use context::Context;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(session::Credentials),
    Register(session::Credentials),
    Logout,
    Status,
    Refresh,
    Navigate { path: String },
    Request(request::Args),
    Upload(request::UploadArgs),
    List(catalog::Resource),
    Color,
    ImageUrl { url: Option<String> },
    Sizes { product_type: String },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
