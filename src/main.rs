use anyhow::Context;
use clap::Parser;
use hlo_tools_data::utils::{logger, validation::Validate};
use hlo_tools_data::{convert_hlo_proto_to_tool_data_with_config, CliConfig};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting hlo-tools");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let tools_config = match config.validate().and_then(|_| config.tools_config()) {
        Ok(tools_config) => tools_config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("{}", e);
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let json = match convert_hlo_proto_to_tool_data_with_config(
        &config.xspace_paths,
        &config.tool,
        &config.tool_options(),
        &tools_config,
    ) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match &config.output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path))?;
            tracing::info!("Output saved to: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
