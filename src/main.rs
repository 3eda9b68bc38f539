use clap::{Parser, Subcommand};
use roomgen::{
    input, logger, server, Config, GenerationMethod, ProxyClient, SpaceOption, Studio,
    StudioState, StyleOption,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "roomgen", version, about = "Furniture and room image studio")]
struct Cli {
    /// Verbose (debug) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP proxy in front of the image model.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one generation through a running proxy and save the result.
    Generate(GenerateArgs),
    /// List methods, styles and spaces.
    Options,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Furniture or room photo.
    #[arg(long)]
    image: PathBuf,
    /// describe, reference, edit, add-decoration or remove-object.
    #[arg(long, default_value = "remove-object")]
    method: GenerationMethod,
    #[arg(long, default_value = "Modern")]
    style: StyleOption,
    #[arg(long, default_value = "Living Room")]
    space: SpaceOption,
    /// Instruction, description or object to remove, depending on the method.
    #[arg(long)]
    prompt: Option<String>,
    #[arg(long)]
    reference: Option<PathBuf>,
    #[arg(long)]
    decoration: Option<PathBuf>,
    #[arg(long)]
    mask: Option<PathBuf>,
    /// Proxy base URL; defaults to ROOMGEN_PROXY_URL or http://127.0.0.1:8080.
    #[arg(long)]
    proxy_url: Option<String>,
    /// Directory the generated image is written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let base = if cli.verbose {
        logger::LoggerConfig::development()
    } else {
        logger::LoggerConfig::default()
    };
    logger::init_with_config(logger::LoggerConfig::from_env(base))?;
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let config = Config::from_env();

    match cli.command {
        Command::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            server::run(config).await?;
        }
        Command::Generate(args) => generate(&config, args).await?,
        Command::Options => print_options(),
    }

    Ok(())
}

async fn generate(config: &Config, args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = StudioState::new().with_primary_image(input::load_image(&args.image)?);
    state.select_method(args.method);
    state.set_style(args.style);
    state.set_space(args.space);
    state.set_custom_prompt(args.prompt.unwrap_or_default());
    state.set_reference_image(input::load_optional(args.reference.as_deref())?);
    state.set_decoration_image(input::load_optional(args.decoration.as_deref())?);
    state.set_mask_image(input::load_optional(args.mask.as_deref())?);

    let proxy_url = args.proxy_url.as_deref().unwrap_or(config.proxy_url());
    let studio = Studio::with_state(state, Arc::new(ProxyClient::new(proxy_url)));

    log::info!("{}: {}", args.method.title(), args.method.upload_hint());
    let result = match studio.generate().await {
        Ok(result) => result,
        Err(e) => {
            let message = studio
                .snapshot()
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| e.user_message());
            return Err(message.into());
        }
    };

    let path = save_result(&args.out, &result)?;
    println!("{}", path.display());
    Ok(())
}

fn save_result(dir: &Path, result: &roomgen::GenerationResult) -> roomgen::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "roomgen-{}-{}.{}",
        result.created_at.format("%Y%m%d-%H%M%S"),
        &result.id.simple().to_string()[..8],
        result.image.file_extension()
    ));
    fs::write(&path, result.image.decode()?)?;
    log::info!("💾 Saved {}", path.display());
    Ok(path)
}

fn print_options() {
    println!("Methods:");
    for method in GenerationMethod::ALL {
        println!("  {:<14} {} - {}", method.as_str(), method.title(), method.description());
    }
    println!("Styles:");
    for style in StyleOption::ALL {
        println!("  {:<20} {}", style.label(), style.localized());
    }
    println!("Spaces:");
    for space in SpaceOption::ALL {
        println!("  {:<20} {}", space.label(), space.localized());
    }
}
