use batchgen_cli::commands::{analyze, check, cli, parse, run};
use batchgen_core::api::{AppConfig, BatchError, CliError, LoggingConfig, ServiceError};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

fn load_config(args: &cli::Args) -> Result<AppConfig, CliError> {
    let cfg = match args.config.as_deref() {
        Some(path) => {
            let mut cfg = batchgen_core::config::load_from_path(path)
                .map_err(|e| CliError::Config(e.to_string()))?;
            batchgen_core::config::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
            cfg
        }
        None => batchgen_core::config::load_default()
            .map_err(|e| CliError::Config(e.to_string()))?,
    };
    Ok(cfg)
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(&args)?;
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    match args.command {
        cli::Commands::Parse(parse_args) => parse::handle_parse(parse_args).await,
        cli::Commands::Analyze(analyze_args) => {
            analyze::handle_analyze(analyze_args, &cfg).await
        }
        cli::Commands::Run(run_args) => run::handle_run(run_args, &cfg).await,
        cli::Commands::Check => check::handle_check(&cfg).await,
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: every task succeeded
    // 2: run finished with failed tasks (returned as a normal exit code)
    // 11: config error
    // 20: IO / command error
    // 30: run-level batch error
    // 40: service error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Batch(be) => match be {
            BatchError::Config(_) => 11,
            BatchError::SharedContext(_) | BatchError::RunInProgress => 30,
        },
        CliError::Service(se) => match se {
            ServiceError::MissingCredential(_) => 11,
            _ => 40,
        },
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Json(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("batchgen"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("batchgen.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
