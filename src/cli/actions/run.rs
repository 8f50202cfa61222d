use crate::cli::{
    actions::{Action, Context, catalog, request, session},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    // Offline actions never build a context, so they work without a reachable API.
    let context = || Context::new(&globals.config);

    match action {
        Action::Login(credentials) => session::login(&context()?, credentials).await,
        Action::Register(credentials) => session::register(&context()?, credentials).await,
        Action::Logout => session::logout(&context()?),
        Action::Status => session::status(&context()?, globals),
        Action::Refresh => session::refresh(&context()?).await,
        Action::Navigate { path } => session::navigate(&context()?, &path).await,
        Action::Request(args) => request::execute(&context()?, args).await,
        Action::Upload(args) => request::upload(&context()?, args).await,
        Action::List(resource) => catalog::list(&context()?, resource).await,
        Action::Color => catalog::color(&context()?).await,
        Action::ImageUrl { url } => catalog::image_url(&globals.config, url.as_deref()),
        Action::Sizes { product_type } => catalog::sizes(&product_type),
    }
}
