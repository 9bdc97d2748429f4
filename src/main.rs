use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogsmith::cli::{Cli, Commands, OutputFormat};
use blogsmith::config::Config;
use blogsmith::output;
use blogsmith::pipeline::Pipeline;
use blogsmith::presenter::{AudioTarget, TerminalPresenter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli);

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            url,
            output,
            format,
            save_audio,
            chunk_size,
            no_narration,
        } => {
            if let Some(chunk_size) = chunk_size {
                config.pipeline.chunk_size = chunk_size;
            }
            config.validate()?;

            let mut pipeline = Pipeline::new(&config);
            pipeline.settings_mut().narrate = !no_narration;

            let audio_target = match save_audio {
                None => AudioTarget::Discard,
                Some(None) => AudioTarget::AutoNamed,
                Some(Some(path)) => AudioTarget::Path(path),
            };
            let mut presenter = TerminalPresenter::new(cli.quiet, audio_target);

            tracing::info!("Starting blog generation for URL: {}", url);

            let post = match pipeline.run(&url, &mut presenter).await {
                Ok(post) => post,
                Err(failure) => {
                    tracing::debug!("Run ended after '{}'", failure.last_state);
                    return Ok(ExitCode::FAILURE);
                }
            };

            match (output, format) {
                (Some(path), format) => {
                    let format = format.unwrap_or(OutputFormat::Markdown);
                    output::save_to_file(&post, &path, &format)?;
                    println!("Article saved to: {}", path.display());
                }
                (None, Some(format)) => output::print_to_console(&post, &format)?,
                (None, None) => {}
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save()?;
                println!("Default configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                config.display();
                println!();
                println!("Run `blogsmith config --init` to write an editable config file.");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(cli: &Cli) {
    let default_filter = match (cli.verbose, cli.quiet) {
        (true, _) => "blogsmith=debug",
        (false, true) => "blogsmith=warn",
        (false, false) => "blogsmith=info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);

    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
