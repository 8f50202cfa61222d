use crate::cli::{
    actions::{
        Action,
        catalog::Resource,
        request::{Args, UploadArgs},
        session::Credentials,
    },
    commands::{
        ARG_DATA, ARG_FIELD, ARG_FILE, ARG_METHOD, ARG_PASSWORD, ARG_PATH, ARG_RESOURCE, ARG_TYPE,
        ARG_URL, ARG_USERNAME,
    },
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use http::Method;
use secrecy::SecretString;
use serde_json::Value;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand, see --help")?;

    let action = match name {
        "login" => Action::Login(credentials(sub)?),
        "register" => Action::Register(credentials(sub)?),
        "logout" => Action::Logout,
        "status" => Action::Status,
        "refresh" => Action::Refresh,
        "navigate" => Action::Navigate {
            path: required(sub, ARG_PATH)?,
        },
        "get" => Action::Request(Args {
            method: Method::GET,
            path: required(sub, ARG_PATH)?,
            body: None,
        }),
        "delete" => Action::Request(Args {
            method: Method::DELETE,
            path: required(sub, ARG_PATH)?,
            body: None,
        }),
        "post" | "put" | "patch" => Action::Request(Args {
            method: method(name)?,
            path: required(sub, ARG_PATH)?,
            body: Some(json_body(&required(sub, ARG_DATA)?)?),
        }),
        "upload" => Action::Upload(UploadArgs {
            method: method(&required(sub, ARG_METHOD)?)?,
            path: required(sub, ARG_PATH)?,
            field: required(sub, ARG_FIELD)?,
            files: sub
                .get_many::<String>(ARG_FILE)
                .context("missing required argument: --file")?
                .map(PathBuf::from)
                .collect(),
        }),
        "list" => Action::List(required(sub, ARG_RESOURCE)?.parse::<Resource>()?),
        "color" => Action::Color,
        "image-url" => Action::ImageUrl {
            url: sub.get_one::<String>(ARG_URL).cloned(),
        },
        "sizes" => Action::Sizes {
            product_type: required(sub, ARG_TYPE)?,
        },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn credentials(matches: &ArgMatches) -> Result<Credentials> {
    Ok(Credentials {
        username: required(matches, ARG_USERNAME)?,
        password: SecretString::from(required(matches, ARG_PASSWORD)?),
    })
}

fn method(name: &str) -> Result<Method> {
    Method::from_bytes(name.to_ascii_uppercase().as_bytes())
        .map_err(|err| anyhow!("invalid HTTP method {name:?}: {err}"))
}

fn json_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("--data must be valid JSON")
}
