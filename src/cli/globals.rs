use crate::{
    cli::commands::{ARG_API_URL, ARG_MEDIA_URL, ARG_STATE_DIR, ARG_TIMEOUT},
    config::{AppConfig, normalize_runtime_value},
};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Layers the global flags over the environment-derived configuration.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut config = AppConfig::load();

        if let Some(url) = matches
            .get_one::<String>(ARG_API_URL)
            .and_then(|v| normalize_runtime_value(v))
        {
            config.api_base_url = url;
        }
        if let Some(url) = matches
            .get_one::<String>(ARG_MEDIA_URL)
            .and_then(|v| normalize_runtime_value(v))
        {
            config.media_base_url = url;
        }
        if let Some(dir) = matches
            .get_one::<String>(ARG_STATE_DIR)
            .and_then(|v| normalize_runtime_value(v))
        {
            config.state_dir = PathBuf::from(dir);
        }
        if let Some(seconds) = matches.get_one::<u64>(ARG_TIMEOUT) {
            config.timeout = Duration::from_secs(*seconds);
        }

        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use std::path::Path;

    #[test]
    fn test_global_args_from_flags() {
        temp_env::with_vars(
            [
                ("CATALOG_ADMIN_API_URL", None::<&str>),
                ("CATALOG_ADMIN_STATE_DIR", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "catalog-admin",
                    "--api-url",
                    "http://localhost:3000/api",
                    "--state-dir",
                    "/tmp/catalog",
                    "--timeout",
                    "30",
                    "status",
                ]);
                let args = GlobalArgs::from_matches(&matches);

                assert_eq!(args.config.api_base_url, "http://localhost:3000/api");
                assert_eq!(args.config.state_dir, Path::new("/tmp/catalog"));
                assert_eq!(args.config.timeout, Duration::from_secs(30));
            },
        );
    }

    #[test]
    fn test_global_args_blank_flag_keeps_default() {
        temp_env::with_vars([("CATALOG_ADMIN_MEDIA_URL", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "catalog-admin",
                "--media-url",
                "  ",
                "status",
            ]);
            let args = GlobalArgs::from_matches(&matches);

            assert_eq!(
                args.config.media_base_url,
                AppConfig::default().media_base_url
            );
        });
    }
}
