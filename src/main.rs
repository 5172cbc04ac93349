use clap::Parser;
use site_content::utils::error::ErrorSeverity;
use site_content::utils::{logger, validation::Validate};
use site_content::{
    render_sitemap_xml, robots_txt, CliConfig, Command, ConfigProvider, ContentError,
    ContentGateway, TomlConfig,
};

async fn run(
    command: &Command,
    gateway: &ContentGateway,
    site_url: &str,
) -> site_content::Result<String> {
    let output = match command {
        Command::Story { slug, preview } => {
            let document = gateway.fetch_document(slug, *preview).await?;
            // surface content-authoring errors before anything renders it
            let blocks = document.blocks()?;
            tracing::info!("Story '{}' has {} blocks", document.full_slug, blocks.len());
            serde_json::to_string_pretty(&document)?
        }
        Command::Global { slug, preview } => {
            let document = gateway.fetch_global(slug, *preview).await?;
            serde_json::to_string_pretty(&document)?
        }
        Command::Stories { .. } => {
            let query = command.query_options().unwrap_or_default();
            let page = gateway.fetch_documents(&query).await?;
            tracing::info!(
                "Fetched {} of {} stories (page {})",
                page.items.len(),
                page.total,
                page.page
            );
            serde_json::to_string_pretty(&page)?
        }
        Command::Sitemap { json } => {
            let entries = gateway.generate_sitemap_entries().await;
            if *json {
                serde_json::to_string_pretty(&entries)?
            } else {
                render_sitemap_xml(site_url, &entries)
            }
        }
        Command::Robots => robots_txt(site_url),
    };

    Ok(output)
}

fn exit_with(e: &ContentError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let json_logs = cli.json_logs || toml.as_ref().is_some_and(TomlConfig::json_logs);
    let verbose = cli.verbose || toml.as_ref().is_some_and(TomlConfig::verbose);
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::debug!("CLI config: {:?}", cli.command);

    let validation = match &toml {
        Some(config) => config.validate(),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let built = match &toml {
        Some(config) => ContentGateway::new(config).map(|g| (g, config.site_url().to_string())),
        None => ContentGateway::new(&cli).map(|g| (g, cli.site_url().to_string())),
    };
    let (gateway, site_url) = match built {
        Ok(built) => built,
        Err(e) => exit_with(&e),
    };

    tracing::debug!("Using content service at {}", gateway.base_url());

    match run(&cli.command, &gateway, &site_url).await {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(&e),
    }

    Ok(())
}
