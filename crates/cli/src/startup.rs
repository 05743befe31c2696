use anyhow::Result;
use dotenvy::dotenv;
use tracing::{info, warn};
use wavefront_autoconfigure::{AccountProvisioning, DeferredLog, ProvisioningOutcome};
use wavefront_config::{
    ApplicationInfo, ConfigContext, ENV_PREFIX, Endpoint, expand_tilde, properties,
};

use crate::cli_args::Cli;

/// What the metrics exporter will run with once startup completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsExport {
    pub endpoint: Endpoint,
    pub api_token: Option<String>,
    pub application: ApplicationInfo,
}

impl MetricsExport {
    pub fn from_context(context: &ConfigContext) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::resolve(context)?,
            api_token: context.get_text(properties::API_TOKEN),
            application: ApplicationInfo::resolve(context),
        })
    }

    pub fn masked_api_token(&self) -> Option<String> {
        self.api_token.as_deref().map(mask_token)
    }
}

/// Keeps the last four characters of `token` readable.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let hidden = chars.len().saturating_sub(4);
    let visible: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), visible)
}

/// Builds the configuration, provisions an api token if needed, and only
/// then hands the configuration to the metrics exporter.
pub fn run(cli: Cli) -> Result<()> {
    dotenv().ok();

    let token_file = cli.token_file_path();
    let mut provisioning =
        AccountProvisioning::new().with_token_file_locator(move || token_file.clone());
    let mut context = load_context(&cli, provisioning.log_mut())?;

    let outcome = provisioning.provision(&mut context);

    init_logging(&cli.log_level);
    provisioning.log_mut().replay();

    start_metrics_export(&context, outcome);
    Ok(())
}

/// Command line first, then the environment and configuration file.
pub fn load_context(cli: &Cli, log: &mut DeferredLog) -> Result<ConfigContext> {
    let mut context = ConfigContext::new().with_source(cli.command_line_source()?);
    match ConfigContext::load(&cli.config_path, ENV_PREFIX) {
        Ok(loaded) => {
            log.debug(format!(
                "Loaded configuration from {} and {}__* environment variables",
                expand_tilde(&cli.config_path),
                ENV_PREFIX
            ));
            for source in loaded.sources() {
                context.add_last(source.clone());
            }
        }
        Err(e) => log.warn(format!("Failed to load configuration: {}. Using defaults.", e)),
    }
    Ok(context)
}

fn init_logging(log_level: &str) {
    pretty_env_logger::formatted_builder().parse_filters(log_level).init();
}

fn start_metrics_export(context: &ConfigContext, outcome: ProvisioningOutcome) {
    let export = match MetricsExport::from_context(context) {
        Ok(export) => export,
        Err(e) => {
            warn!("Metrics export disabled: {}", e);
            return;
        }
    };

    info!(
        "Exporting metrics for application={} service={} to {}",
        export.application.name(),
        export.application.service(),
        export.endpoint
    );
    match export.masked_api_token() {
        Some(token) => info!("Using Wavefront api token {} ({:?})", token, outcome),
        None => warn!("No Wavefront api token available, metrics will not be exported"),
    }
}
