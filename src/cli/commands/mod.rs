pub mod logging;

use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_MEDIA_BASE_URL};
use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        PossibleValuesParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_MEDIA_URL: &str = "media-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PATH: &str = "path";
pub const ARG_DATA: &str = "data";
pub const ARG_FILE: &str = "file";
pub const ARG_FIELD: &str = "field";
pub const ARG_METHOD: &str = "method";
pub const ARG_RESOURCE: &str = "resource";
pub const ARG_URL: &str = "url";
pub const ARG_TYPE: &str = "type";

pub const RESOURCES: [&str; 5] = ["categories", "items", "styles", "lending", "social"];

fn credentials(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Account username")
                .env("CATALOG_ADMIN_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long("password")
                .help("Account password")
                .env("CATALOG_ADMIN_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

fn path_arg() -> Arg {
    Arg::new(ARG_PATH)
        .help("API path relative to the base URL, example: /item/3")
        .required(true)
}

fn json_request(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(path_arg()).arg(
        Arg::new(ARG_DATA)
            .short('d')
            .long("data")
            .help("JSON request body")
            .required(true),
    )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("catalog-admin")
        .about("Catalog administration client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Catalog API base URL")
                .default_value(DEFAULT_API_BASE_URL)
                .env("CATALOG_ADMIN_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_MEDIA_URL)
                .long("media-url")
                .help("Base URL used to resolve uploaded images")
                .default_value(DEFAULT_MEDIA_BASE_URL)
                .env("CATALOG_ADMIN_MEDIA_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding the persisted refresh token")
                .env("CATALOG_ADMIN_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("CATALOG_ADMIN_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(credentials(
            Command::new("login").about("Sign in and persist the refresh token"),
        ))
        .subcommand(credentials(
            Command::new("register").about("Create an account and sign in"),
        ))
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("status").about("Show the current session"))
        .subcommand(Command::new("refresh").about("Exchange the refresh token for an access token"))
        .subcommand(
            Command::new("navigate")
                .about("Resolve a panel route through the auth guard")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("get")
                .about("GET an API path")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("DELETE an API path")
                .arg(path_arg()),
        )
        .subcommand(json_request("post", "POST a JSON body"))
        .subcommand(json_request("put", "PUT a JSON body"))
        .subcommand(json_request("patch", "PATCH a JSON body"))
        .subcommand(
            Command::new("upload")
                .about("Upload image files as multipart form data")
                .arg(path_arg())
                .arg(
                    Arg::new(ARG_FILE)
                        .short('f')
                        .long("file")
                        .help("File to upload, repeat for several files")
                        .action(ArgAction::Append)
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_FIELD)
                        .long("field")
                        .help("Form field name")
                        .default_value("image"),
                )
                .arg(
                    Arg::new(ARG_METHOD)
                        .short('X')
                        .long("method")
                        .help("HTTP method")
                        .default_value("patch")
                        .value_parser(PossibleValuesParser::new(["patch", "post", "put"])),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List a catalog resource")
                .arg(
                    Arg::new(ARG_RESOURCE)
                        .required(true)
                        .value_parser(PossibleValuesParser::new(RESOURCES)),
                ),
        )
        .subcommand(Command::new("color").about("Show the storefront color theme"))
        .subcommand(
            Command::new("image-url")
                .about("Resolve an image reference against the media base URL")
                .arg(Arg::new(ARG_URL).help("Image URL or upload path")),
        )
        .subcommand(
            Command::new("sizes")
                .about("List the sizes available for a product type")
                .arg(Arg::new(ARG_TYPE).required(true)),
        );

    logging::with_args(command)
}
