use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Initialize logging on stderr; stdout is reserved for command output.
///
/// `RUST_LOG` directives take precedence over the verbosity flag.
///
/// # Errors
///
/// Returns an error if the filter or subscriber can not be initialized
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false);

    let subscriber = Registry::default().with(fmt_layer).with(filter(verbosity_level)?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn filter(verbosity_level: Level) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_verbosity() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = filter(Level::DEBUG).unwrap();
            assert_eq!(filter.max_level_hint(), Some(Level::DEBUG.into()));
        });
    }

    #[test]
    fn test_filter_honours_rust_log() {
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            let filter = filter(Level::ERROR).unwrap();
            assert_eq!(filter.max_level_hint(), Some(Level::TRACE.into()));
        });
    }
}
