// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use fpga_registers::ArtifactKind;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod regs_gen;
mod regs_gen_all;

#[derive(Parser)]
#[command(name = "xtask", version, about = "FPGA register generation tasks", long_about = None)]
struct Xtask {
    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate register artifacts from one register definition file
    RegsGen {
        /// Register definition file (.toml or .json)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Module name, used as prefix of every generated symbol and file
        #[arg(short, long)]
        name: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Artifact to generate, e.g. c-header or vhdl-package (repeatable, default all)
        #[arg(short, long = "artifact")]
        artifacts: Vec<ArtifactKind>,

        /// Do not place the default registers ahead of the file's registers
        #[arg(long, default_value_t = false)]
        no_default_registers: bool,

        /// Leave git provenance out of the generated files
        #[arg(long, default_value_t = false)]
        no_git: bool,
    },
    /// Generate register artifacts for every module found in the module roots
    RegsGenAll {
        /// Directories whose sub-directories are modules
        #[arg(short, long, value_name = "DIR", required = true, num_args = 1..)]
        modules: Vec<PathBuf>,

        /// Output directory, artifacts go to <output>/<module>/
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Only these modules (repeatable, default all)
        #[arg(short, long)]
        include: Vec<String>,

        /// Parse and render only, write nothing
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() {
    let cli = Xtask::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let result = match &cli.xtask {
        Commands::RegsGen {
            file,
            name,
            output,
            artifacts,
            no_default_registers,
            no_git,
        } => regs_gen::generate(
            file,
            name,
            output,
            artifacts,
            !*no_default_registers,
            !*no_git,
        ),
        Commands::RegsGenAll {
            modules,
            output,
            include,
            check,
        } => regs_gen_all::generate(modules, output, include, *check),
    };
    result.unwrap_or_else(|e| {
        eprintln!("{:#}", e);
        std::process::exit(1);
    });
}
