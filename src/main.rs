use clap::Parser;
use layercheck::cli::{CheckArgs, Cli, Command};
use layercheck::config::CheckKind;
use layercheck::{cmd_check, cmd_graph, cmd_init};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Some(Command::Check(args)) => cmd_check(args, None),
        Some(Command::Cycles(args)) => cmd_check(args, Some(CheckKind::Cycles)),
        Some(Command::Depth(args)) => cmd_check(args, Some(CheckKind::Depth)),
        Some(Command::Boundaries(args)) => cmd_check(args, Some(CheckKind::Boundaries)),
        Some(Command::Orphans(args)) => cmd_check(args, Some(CheckKind::Orphans)),
        Some(Command::Graph(args)) => cmd_graph(args),
        Some(Command::Init(args)) => cmd_init(args),
        None => {
            let args = CheckArgs {
                path: cli.path,
                ..Default::default()
            };
            cmd_check(args, None)
        }
    };

    std::process::exit(exit_code);
}

/// Diagnostics go to stderr so reports on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "layercheck=debug"
    } else {
        "layercheck=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
