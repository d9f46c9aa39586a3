use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use base::util::cli::Verbosity;
use painter::flood::FloodCommand;
use painter::paint::PaintCommand;

#[derive(StructOpt)]
#[structopt(about = "Camera proximity heatmap painter")]
struct Opts {
    #[structopt(flatten)]
    verbosity: Verbosity,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    Paint(PaintCommand),
    Flood(FloodCommand),
}

fn main() {
    let opts = Opts::from_args();

    let level = if opts.verbosity.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let res = match opts.command {
        Command::Paint(command) => command.run(),
        Command::Flood(command) => command.run(),
    };

    if let Err(err) = res {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
