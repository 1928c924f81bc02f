use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use update_gate::config::{GateConfig, data_dir, log_path};
use update_gate::console::{ConsoleStoreLauncher, TerminalPresenter};
use update_gate::gate::{PlatformKind, evaluate};
use update_gate::prompt::effects::RequiredVersionSource;
use update_gate::prompt::package_info::{CachedPackageInfo, PackageInfo, StaticPackageInfo};
use update_gate::prompt::{PrompterOptions, UpdatePrompter};
use update_gate::sources::{HttpVersionSource, StaticVersionSource};

#[derive(Parser)]
#[command(name = "update-gate")]
#[command(version, about = "Forced-update gate for store-distributed applications")]
struct Cli {
    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    stderr_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the gate decision for a pair of versions
    Evaluate {
        /// Remotely required version
        #[arg(long)]
        remote: String,
        /// Version of the running build
        #[arg(long)]
        local: String,
        #[arg(long, default_value_t = PlatformKind::current())]
        platform: PlatformKind,
    },
    /// Run one update check, prompting on the terminal if required
    Check {
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = PlatformKind::current())]
        platform: PlatformKind,
        /// Version of the running build
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        local_version: String,
        /// Store package id of the running build
        #[arg(long, default_value = "")]
        package_id: String,
        /// Use this required version instead of fetching it
        #[arg(long)]
        required: Option<String>,
        /// Endpoint serving the required version document
        #[arg(long)]
        remote_url: Option<String>,
        /// Let the user dismiss the prompt without updating
        #[arg(long)]
        allow_cancel: bool,
    },
}

fn init_logging(stderr: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    if stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(data_dir())?;
    let log_path = log_path();
    let (Some(dir), Some(file_name)) = (log_path.parent(), log_path.file_name()) else {
        bail!("Invalid log path {:?}", log_path);
    };
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(Some(guard))
}

async fn run_check(
    config: GateConfig,
    platform: PlatformKind,
    package: PackageInfo,
    required: Option<String>,
) -> anyhow::Result<()> {
    let version_source: Arc<dyn RequiredVersionSource> = match (required, &config.remote_version_url) {
        (Some(required), _) => Arc::new(StaticVersionSource::new(required)),
        (None, Some(url)) => Arc::new(HttpVersionSource::with_field(
            url,
            &config.remote_version_field,
        )),
        (None, None) => bail!("Either --required or a remote version URL must be given"),
    };

    let package_info = Arc::new(CachedPackageInfo::new(Arc::new(StaticPackageInfo::new(
        package,
    ))));
    let prompter = UpdatePrompter::new(
        PrompterOptions::from(&config),
        package_info,
        version_source,
        Arc::new(TerminalPresenter::stdio(config.prompt.clone())),
        Arc::new(ConsoleStoreLauncher::stdout()),
    )
    .with_platform(platform);

    let outcome = prompter.check_and_maybe_prompt().await?;
    println!("{:?}", outcome);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.stderr_log)?;

    match cli.command {
        Command::Evaluate {
            remote,
            local,
            platform,
        } => {
            println!("{}", evaluate(&remote, &local, platform));
            Ok(())
        }
        Command::Check {
            config,
            platform,
            local_version,
            package_id,
            required,
            remote_url,
            allow_cancel,
        } => {
            let mut config = match config {
                Some(path) => GateConfig::load(&path)?,
                None => GateConfig::default(),
            };
            config.allow_cancel |= allow_cancel;
            if remote_url.is_some() {
                config.remote_version_url = remote_url;
            }

            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(run_check(
                    config,
                    platform,
                    PackageInfo::new(local_version, package_id),
                    required,
                ))
        }
    }
}
