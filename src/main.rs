use anyhow::{bail, Result};
use camwatch::common::logging_setup;
use camwatch::{cli, config_loader, operations};
use log::{debug, error, info};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();

    let explicit_config = matches.get_one::<String>("config");
    let config_path = explicit_config
        .map(|s| s.as_str())
        .unwrap_or(config_loader::DEFAULT_CONFIG_PATH);

    let config = match config_loader::load_config(config_path, explicit_config.is_some()) {
        Ok(cfg) => {
            logging_setup::initialize_logging(Some(&cfg), &matches);
            cfg
        }
        Err(e) => {
            logging_setup::initialize_logging(None, &matches);
            error!("❌ Failed to load configuration from '{}': {:#}. Exiting.", config_path, e);
            return Err(e.context(format!("Failed to load configuration from '{}'", config_path)));
        }
    };
    debug!("Effective configuration: {:?}", config);

    let operation_name = matches.subcommand_name().unwrap_or("serve");
    let op_start_time = Instant::now();
    let op_result: Result<()> = match operation_name {
        "serve" => operations::serve_op::handle_serve(&config).await,
        "probe" => operations::probe_op::handle_probe(&config).await,
        "sweep" => operations::sweep_op::handle_sweep(&config).await,
        other => bail!("Subcommand '{}' not implemented.", other),
    };

    if let Err(e) = op_result {
        error!("❌ Operation '{}' failed after {:?}: {:#}", operation_name, op_start_time.elapsed(), e);
        return Err(e);
    }

    info!("🏁 camwatch finished in {:?}.", main_start_time.elapsed());
    Ok(())
}
