use agenda_builder::pipeline::LogoUpload;
use agenda_builder::{
    AgendaConfig, AgendaRequest, Delivery, PipelineBuilder, PipelineError, write_default_template,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Generates meeting agenda documents from JSON data and a DOCX template.
#[derive(Parser, Debug)]
#[command(name = "agenda-builder", version, about)]
struct Cli {
    /// TOML configuration file; `AGENDA__*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an agenda from a JSON record.
    Generate {
        /// Path to the agenda record (JSON).
        data: PathBuf,
        /// Template to render instead of the configured one.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output file; defaults to a name derived from the record.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Logo image to embed, taking precedence over the record's logo.
        #[arg(long)]
        logo: Option<PathBuf>,
    },
    /// Write the bundled agenda template.
    InitTemplate {
        path: PathBuf,
    },
    /// Print logo suggestions for a company as JSON.
    FindLogo {
        company: String,
    },
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::InitTemplate { path } => {
            write_default_template(&path)?;
            println!("Wrote template to {}", path.display());
        }
        Command::FindLogo { company } => {
            let config = AgendaConfig::load(cli.config.as_deref())?;
            let pipeline = PipelineBuilder::new().with_config(config).build()?;
            let suggestions = pipeline.find_logo(&company)?;
            let json = serde_json::to_string_pretty(&suggestions)
                .map_err(|e| PipelineError::Output(e.to_string()))?;
            println!("{json}");
        }
        Command::Generate {
            data,
            template,
            output,
            logo,
        } => {
            let config = AgendaConfig::load(cli.config.as_deref())?;
            let mut builder = PipelineBuilder::new().with_config(config);
            if let Some(template) = template {
                builder = builder.with_template_file(template);
            }
            let pipeline = builder.build()?;

            let json = fs::read_to_string(&data)?;
            let mut request = AgendaRequest::from_json(&json)?;
            if let Some(output) = output {
                request = request.with_output_path(output);
            }
            if let Some(logo) = logo {
                request = request.with_upload(LogoUpload::from_path(&logo)?);
            }

            let agenda = pipeline.generate(request)?;
            if agenda.logo_dropped {
                eprintln!("Warning: the logo could not be embedded and was left out");
            }
            match &agenda.delivery {
                Delivery::File => println!("{}", agenda.path.display()),
                Delivery::Link(stored) => {
                    println!("{} (expires {})", stored.url, stored.expires_at.to_rfc3339())
                }
            }
        }
    }
    Ok(())
}
