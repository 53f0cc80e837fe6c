//! Symbolic GR(1) synthesizer.
//!
//! Takes a textual GR(1) specification (from a file path or standard input), decides
//! whether it is realizable, and if so synthesizes a winning strategy and dumps it in
//! the selected format.
//!
//! Exit codes: 0 on success (realizable), -1 on a parse error or an unrealizable
//! specification, 1 on a usage error (help and version requests included).

use gr1_synthesis::analysis::{check_realizability, synthesize};
use gr1_synthesis::preprocessing::read_inputs::load_spec_text;
use gr1_synthesis::preprocessing::specification::parse_specification;
use gr1_synthesis::result_print::{PrintOptions, echo_specification, print_verdict};
use gr1_synthesis::synthesis::InitMode;

use clap::Parser;
use clap::builder::PossibleValuesParser;

use std::io::Write;
use std::process;

/// Structure to collect CLI arguments
#[derive(Parser)]
#[clap(version, about = "Symbolic realizability checking and strategy synthesis for GR(1) games.")]
struct Arguments {
    /// Path to a file with the GR(1) specification (standard input when omitted).
    input_path: Option<String>,

    /// Be verbose.
    #[clap(short, long)]
    verbose: bool,

    /// Only check specification syntax (exit 0 on success).
    #[clap(short, long)]
    syntax_check: bool,

    /// Echo the parsed formulas and variable indices.
    #[clap(short, long)]
    print_parsed: bool,

    /// Only check realizability; do not synthesize a strategy
    /// (exit 0 if realizable, -1 if not).
    #[clap(short, long)]
    realizability: bool,

    /// Strategy output format.
    #[clap(short = 't', long, default_value = "tulip", value_parser = PossibleValuesParser::new(["txt", "tulip"]))]
    format: String,

    /// Interpretation of initial conditions: either every initial environment choice
    /// must have a winning system answer, or a single winning initial state suffices.
    #[clap(long, default_value = "all-env", value_parser = PossibleValuesParser::new(["all-env", "one-sided"]))]
    init_mode: String,
}

/// Wrapper function to invoke the synthesizer, works with CLI arguments.
fn main() {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // `-h`/`--version` exit through the usage path as well
            let _ = e.print();
            process::exit(1);
        }
    };
    let print_opt = if args.verbose {
        PrintOptions::FullPrint
    } else {
        PrintOptions::NoPrint
    };
    let init_mode = match args.init_mode.as_str() {
        "one-sided" => InitMode::OneSidedSysInit,
        _ => InitMode::AllEnvExistsSysInit,
    };

    let text = match load_spec_text(args.input_path.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{e}");
            process::exit(-1);
        }
    };

    let spec = match parse_specification(&text) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{e}");
            process::exit(-1);
        }
    };
    if args.syntax_check {
        process::exit(0);
    }
    if args.print_parsed {
        echo_specification(&spec);
    }

    if args.realizability {
        match check_realizability(&spec, init_mode, print_opt) {
            Ok(realizable) => {
                print_verdict(realizable);
                process::exit(if realizable { 0 } else { -1 });
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(-1);
            }
        }
    }

    match synthesize(&spec, init_mode, print_opt) {
        Ok(Some(strategy)) => {
            if args.verbose {
                print_verdict(true);
            }
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let dumped = match args.format.as_str() {
                "txt" => strategy.dump_text(&mut out),
                _ => strategy.dump_labeled(&mut out, &spec.env_vars, &spec.sys_vars),
            };
            let dumped = dumped.and_then(|_| out.flush());
            if let Err(e) = dumped {
                eprintln!("Cannot write strategy: {e}");
                process::exit(-1);
            }
        }
        Ok(None) => {
            if args.verbose {
                print_verdict(false);
            }
            process::exit(-1);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(-1);
        }
    }
}
