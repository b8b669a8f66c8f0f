use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with the project-standard configuration.
///
/// Call this first thing in `main()` so startup failures get colored output.
/// Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

fn default_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new("info,tower_http=info")
        } else {
            EnvFilter::new("debug,tower_http=debug,handlebars=warn")
        }
    })
}

/// Initialize tracing with environment-aware formatting and span capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines, module
///   targets hidden.
/// - **Development** (default): pretty multi-line output.
///
/// Both variants install [`tracing_error::ErrorLayer`] so `eyre` reports carry
/// the active span trace. `RUST_LOG` overrides the default filter, e.g.
/// `RUST_LOG=domain_blueprint=trace`.
///
/// Safe to call multiple times; later calls are no-ops (common in tests).
pub fn init_tracing(environment: &Environment) {
    let filter = default_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(
                "Tracing initialized with ErrorLayer. Environment: {:?}",
                environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_development() {
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_production() {
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_init_tracing_multiple_calls() {
        let env = Environment::Development;
        init_tracing(&env);
        init_tracing(&env);
    }

    #[test]
    fn test_init_tracing_with_rust_log_env() {
        temp_env::with_var("RUST_LOG", Some("domain_blueprint=trace"), || {
            init_tracing(&Environment::Development);
        });
    }

    #[test]
    fn test_install_color_eyre_twice() {
        install_color_eyre();
        install_color_eyre();
    }
}
