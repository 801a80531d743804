use anyhow::Context;
use bookshelf_app::build_registry;
use bookshelf_db::Store;
use bookshelf_kernel::{settings::Settings, InitCtx};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book and author catalogue service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
        /// Load the demo catalogue at start-up
        #[arg(long)]
        seed: bool,
    },
    /// Load and validate the configuration, then print a summary
    CheckConfig,
    /// Print the API mount points of every module
    Routes,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port, seed } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            settings.seed.enabled |= seed;

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(serve(settings))
        }
        Command::CheckConfig => {
            println!("environment: {:?}", settings.environment);
            println!("listen: {}:{}", settings.server.host, settings.server.port);
            println!("request timeout: {}ms", settings.server.request_timeout_ms);
            println!("page size: {}", settings.pagination.page_size);
            println!("api tokens: {}", settings.auth.tokens.len());
            println!("seed demo catalogue: {}", settings.seed.enabled);
            Ok(())
        }
        Command::Routes => {
            let registry = build_registry(&Store::new(), &settings);
            println!(
                "modules: {} core, {} custom",
                registry.core_module_count(),
                registry.custom_module_count()
            );
            for mount_point in registry.mount_points() {
                println!("{mount_point}");
            }
            Ok(())
        }
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(env = ?settings.environment, "bookshelf starting");

    let store = Store::new();
    let registry = build_registry(&store, &settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
