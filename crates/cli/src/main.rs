use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use {
    anyhow::Context,
    clap::{Parser, ValueEnum},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    envinterp_config::EnvinterpConfig,
    envinterp_interpolate::{EnvResolver, Resolver, UndefinedPolicy, Utf8Reader, Utf8Writer},
};

#[derive(Parser)]
#[command(
    name = "envinterp",
    version,
    about = "Substitute $VAR and ${VAR} references in stdin from the environment"
)]
struct Cli {
    /// What to do with references to unset variables.
    #[arg(long, value_enum, env = "ENVINTERP_UNDEFINED")]
    undefined: Option<UndefinedArg>,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not look variables up in the process environment.
    #[arg(long, default_value_t = false)]
    no_env: bool,

    /// Load additional variables from a dotenv file.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum UndefinedArg {
    /// Replace the reference with nothing.
    Remove,
    /// Leave the reference exactly as written.
    Preserve,
}

impl From<UndefinedArg> for UndefinedPolicy {
    fn from(arg: UndefinedArg) -> Self {
        match arg {
            UndefinedArg::Remove => Self::Remove,
            UndefinedArg::Preserve => Self::Preserve,
        }
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // stdout carries the substituted stream; logs go to stderr.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(false),
            )
            .init();
    }
}

fn build_resolver(config: &EnvinterpConfig, use_env: bool) -> Box<dyn Resolver> {
    let vars = config.vars.clone();
    if use_env {
        Box::new(vars.or(EnvResolver))
    } else {
        Box::new(vars)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path.display()))?;
        debug!(path = %path.display(), "loaded env file");
    }

    let config = match &cli.config {
        Some(path) => envinterp_config::load_config(path)?,
        None => envinterp_config::discover_and_load(),
    };
    let policy = cli.undefined.map_or(config.undefined, UndefinedPolicy::from);
    let use_env = config.use_env && !cli.no_env;
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        %policy,
        use_env,
        vars = config.vars.len(),
        "envinterp starting"
    );

    let resolver = build_resolver(&config, use_env);
    let mut source = Utf8Reader::new(io::stdin().lock());
    let mut sink = Utf8Writer::new(BufWriter::new(io::stdout().lock()));
    envinterp_interpolate::run(&mut source, &mut sink, &*resolver, policy)?;

    Ok(())
}
