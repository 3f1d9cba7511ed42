use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use mpi_matmul::config::{self, Settings};
use mpi_matmul::error::{ConfigError, Error, Result};
use mpi_matmul::matrix::Fill;
use mpi_matmul::report::RunReport;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Order N of the square matrices.
    #[arg(allow_hyphen_values = true)]
    order: Option<String>,

    /// Run this many participants as threads of one process instead of MPI ranks.
    #[arg(short = 'l', long)]
    local: Option<usize>,

    /// Fill A and B with seeded random values instead of the index formula.
    #[arg(short = 'r', long, action)]
    random: bool,

    #[arg(short = 'S', long, default_value_t = 0)]
    seed: u64,

    /// Compare against a sequential product on the root.
    #[arg(short = 'v', long, action)]
    verify: bool,

    /// Print A, B and C.
    #[arg(short = 'p', long, action)]
    print: bool,

    /// Print the report as JSON.
    #[arg(long, action)]
    json: bool,
}

impl Args {
    fn settings(&self) -> std::result::Result<Settings, ConfigError> {
        let order = config::parse_order(self.order.as_deref())?;
        Ok(Settings {
            order,
            fill: if self.random {
                Fill::Random { seed: self.seed }
            } else {
                Fill::Indexed
            },
            verify: self.verify,
            print: self.print,
        })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage(e: &ConfigError) {
    eprintln!("error: {e}");
    eprintln!("{}", Args::command().render_usage());
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_threads(args: &Args, participants: usize) -> Result<()> {
    let settings = args.settings()?;
    let (_, report) = mpi_matmul::run_local(participants, &settings)?;
    print_report(&report, args.json)
}

#[cfg(feature = "mpi")]
fn run_mpi(args: &Args) -> Result<()> {
    use mpi_matmul::comm::mpi_comm::MpiTransport;
    use mpi_matmul::comm::Transport;
    use mpi_matmul::{root, worker, ROOT_RANK};

    let universe = mpi::initialize().ok_or(Error::MpiInit)?;
    let transport = MpiTransport::new(universe.world());
    let _span = tracing::info_span!("rank", rank = transport.rank()).entered();

    if transport.rank() == ROOT_RANK {
        let settings = match args.settings() {
            Ok(settings) => settings,
            Err(e) => {
                // the workers already wait for the order broadcast
                print_usage(&e);
                transport.abort(2)
            }
        };
        let (_, report) = root::root_workflow(&transport, &settings)?;
        print_report(&report, args.json)
    } else {
        worker::worker_workflow(&transport)
    }
}

fn main() -> ExitCode {
    // parse hyperparameters; every process parses them, only the root uses them
    let args = Args::parse();
    init_logging();

    #[cfg(feature = "mpi")]
    let result = match args.local {
        Some(participants) => run_threads(&args, participants),
        None => run_mpi(&args),
    };
    #[cfg(not(feature = "mpi"))]
    let result = run_threads(&args, args.local.unwrap_or(1));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Config(e)) => {
            print_usage(&e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
