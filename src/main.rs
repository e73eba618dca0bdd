use clap::{CommandFactory, Parser};
use manufacturing_kpi::cli::args::{Args, Commands};
use manufacturing_kpi::cli::commands;
use std::process;

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help and exit
    let Some(Commands::Run(run_args)) = args.command else {
        if let Err(e) = Args::command().print_help() {
            eprintln!("Failed to print help: {}", e);
        }
        process::exit(0);
    };

    if let Err(e) = commands::setup_logging(&run_args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(run_args)) {
        Ok(summary) => {
            println!("{}", summary.final_rows);
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
