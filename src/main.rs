use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ghcr_next_tag::config::Config;
use ghcr_next_tag::output::EnvFile;
use ghcr_next_tag::registry::error::RegistryError;
use ghcr_next_tag::registry::ghcr::GhcrRegistry;
use ghcr_next_tag::version::rc::next_rc;
use ghcr_next_tag::version::release::{ReleaseLine, plan_release};

#[derive(Parser)]
#[command(name = "ghcr-next-tag")]
#[command(version, about = "Computes the next version tag for a GHCR container image")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next release-candidate tag from the latest published tags
    NextRc,
    /// Compute the next stable tag for a release branch and whether to build or retag
    NextRelease,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            match cli.command {
                Command::NextRc => run_next_rc(&config).await,
                Command::NextRelease => run_next_release(&config).await,
            }
        })
}

async fn run_next_rc(config: &Config) -> anyhow::Result<()> {
    let registry = GhcrRegistry::github(&config.token);
    let tags = match registry.fetch_tags(&config.owner, &config.image).await {
        Ok(tags) => tags,
        // A package that was never published simply has no tags yet.
        Err(RegistryError::NotFound(package)) => {
            info!("package {} does not exist yet", package);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let next = next_rc(&tags);
    info!("next tag is {}", next);

    write_outputs(config, &[("NEXT_TAG", next.to_string())])
}

async fn run_next_release(config: &Config) -> anyhow::Result<()> {
    let line = ReleaseLine::from_branch(config.require_branch()?)?;

    let registry = GhcrRegistry::github(&config.token);
    let tags = registry.fetch_tags(&config.owner, &config.image).await?;

    let plan = plan_release(&tags, line)?;
    info!("next tag is {}", plan.next);
    info!("build image: {}", plan.build());
    info!("retag image: {}", plan.retag());

    let mut outputs = vec![
        ("NEXT_TAG", plan.next.to_string()),
        ("BUILD_IMAGE", plan.build().to_string()),
        ("RETAG_IMAGE", plan.retag().to_string()),
    ];
    if let Some(source) = plan.source() {
        info!("source tag: {}", source);
        outputs.push(("SOURCE_TAG", source.to_string()));
    }

    write_outputs(config, &outputs)
}

fn write_outputs(config: &Config, pairs: &[(&str, String)]) -> anyhow::Result<()> {
    let path = config
        .env_file
        .as_ref()
        .context("GITHUB_ENV environment variable is not set")?;

    let env_file = EnvFile::new(path);
    for (key, value) in pairs {
        env_file
            .append(key, value)
            .with_context(|| format!("failed to write {} to {}", key, path.display()))?;
    }
    Ok(())
}
