use clap::{Parser, Subcommand};
use folio::blog::BlogCollection;
use folio::contact::{ContactRelay, SmtpMailer};
use folio::content::ContentClient;
use folio::server::AppState;
use folio::{config, generate, logging, output, server};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Builds and serves a personal portfolio and blog")]
#[command(long_about = "\
Builds and serves a personal portfolio and blog

Page sections come from a hosted content store; blog posts are local
markdown files. 'folio serve' hosts the built site and relays the contact
form to the owner's mailbox.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  └── blog/                        # Markdown posts with YAML front matter
      ├── hello-world.md           # → /blog/hello-world/
      └── notes/
          └── scroll-animations.md # → /blog/scroll-animations/

Front matter:

  ---
  title: Hello world
  tags: [meta]
  excerpt: First post.
  pubDate: 2021-01-15
  updatedDate: 2021-02-01          # optional
  image: /images/hello.png         # optional
  ---

Secrets are read from the environment: FOLIO_SANITY_TOKEN,
FOLIO_SMTP_HOST, FOLIO_SMTP_PORT, FOLIO_SMTP_USER, FOLIO_SMTP_PASS.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch content, load posts and produce the final HTML site
    Build,
    /// Validate config and blog posts without touching the network
    Check,
    /// Serve the output directory and the contact endpoint
    Serve {
        /// Socket address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = load_site_config(&cli.source)?;
            let blog = load_blog(&cli.source, &site_config)?;

            println!("==> Fetching content from {}", site_config.content_store.project_id);
            let client = ContentClient::new(&site_config.content_store);
            let content = client.fetch_all().await?;

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&content, &blog, &site_config, &cli.output)?;
            output::print_build_output(&content, &report, &cli.output);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = load_site_config(&cli.source)?;
            let blog = load_blog(&cli.source, &site_config)?;
            output::print_check_output(&site_config, &blog);
            println!("==> Content is valid");
        }
        Command::Serve { bind } => {
            let site_config = load_site_config(&cli.source)?;
            let mailer = Arc::new(SmtpMailer::from_config(&site_config.smtp)?);
            let relay = ContactRelay::from_config(&site_config, mailer)?;
            let addr = bind.unwrap_or_else(|| site_config.server.bind.clone());

            println!("==> Serving {} on http://{}", cli.output.display(), addr);
            server::serve(&addr, &cli.output, AppState { relay }).await?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `config.toml` from the source directory, with environment overrides on top.
fn load_site_config(source: &Path) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(source)?;
    site_config.apply_env()?;
    site_config.validate()?;
    Ok(site_config)
}

fn load_blog(
    source: &Path,
    site_config: &config::SiteConfig,
) -> Result<BlogCollection, folio::blog::BlogError> {
    BlogCollection::load(&source.join(&site_config.blog.dir))
}
