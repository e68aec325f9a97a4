//! Command line front-end: reads an `.aag` file and prints one report.
//!
//! ```shell
//! $ aigscope assets/circuits/full-adder.aag summary
//! $ aigscope assets/circuits/full-adder.aag gate 11 --fanin 3
//! $ aigscope assets/circuits/floating.aag write -o out.aag
//! ```
//!
//! Set `RUST_LOG=debug` to trace the parser.

use std::{fs::File, io, path::PathBuf};

use aigscope::{Circuit, GateId};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the ASCII AIGER (.aag) design.
    design: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gate counts.
    Summary,
    /// Gates reachable from the outputs, fanins first.
    Netlist,
    /// Primary input ids.
    Pi,
    /// Primary output ids.
    Po,
    /// Gates with undefined fanins, and gates nobody reads.
    Floating,
    /// One gate, optionally with its fanin or fanout cone.
    Gate {
        id: GateId,
        /// Print the fanin cone down to this depth.
        #[arg(long, conflicts_with = "fanout")]
        fanin: Option<usize>,
        /// Print the fanout cone up to this depth.
        #[arg(long)]
        fanout: Option<usize>,
    },
    /// Write the reachable part of the circuit back as AAG.
    Write {
        /// Output file, stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn run(args: Args) -> aigscope::Result<()> {
    let circuit = Circuit::from_file(&args.design)?;

    match args.command {
        Command::Summary => println!("{}", circuit.statistics()),
        Command::Netlist => print!("{}", circuit.netlist()),
        Command::Pi => println!("{}", circuit.report_pis()),
        Command::Po => println!("{}", circuit.report_pos()),
        Command::Floating => print!("{}", circuit.report_floating()),
        Command::Gate { id, fanin, fanout } => match (fanin, fanout) {
            (Some(level), _) => print!("{}", circuit.report_fanin(id, level)?),
            (_, Some(level)) => print!("{}", circuit.report_fanout(id, level)?),
            _ => print!("{}", circuit.report_gate(id)?),
        },
        Command::Write { output } => {
            let result = match &output {
                Some(path) => File::create(path).and_then(|mut f| circuit.write_aag(&mut f)),
                None => circuit.write_aag(&mut io::stdout().lock()),
            };
            result.map_err(|source| aigscope::CircuitError::Output {
                path: output
                    .as_ref()
                    .map_or("<stdout>".to_string(), |p| p.display().to_string()),
                source,
            })?;
        }
    }
    Ok(())
}

fn main() {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
