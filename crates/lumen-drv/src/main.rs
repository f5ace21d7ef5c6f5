use clap::Parser as _;
use lumen_drv::{render, report_error, run_source, Cli, Config};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli);
    init_logging(config.verbose);

    let source = match std::fs::read_to_string(&config.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", config.source.display());
            std::process::exit(2);
        }
    };

    if config.emit_tokens {
        match lumen_lex::tokenize(&source) {
            Ok(tokens) => {
                for (tok, _) in &tokens {
                    println!("{tok:?}");
                }
                std::process::exit(0);
            }
            Err(e) => std::process::exit(report_error(&e.into(), &source)),
        }
    }

    if config.emit_ast {
        let outcome = lumen_lex::tokenize(&source)
            .map_err(lumen_drv::DriverError::from)
            .and_then(|tokens| lumen_par::parse_tokens(tokens).map_err(lumen_drv::DriverError::from));
        match outcome {
            Ok(program) => {
                println!("{program:#?}");
                std::process::exit(0);
            }
            Err(e) => std::process::exit(report_error(&e, &source)),
        }
    }

    match run_source(&source) {
        Ok(outcome) => {
            println!("{}", render(&outcome.value, &outcome.heap));
            std::process::exit(0);
        }
        Err(e) => std::process::exit(report_error(&e, &source)),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "lumen=warn",
        1 => "lumen=info",
        2 => "lumen=debug",
        _ => "lumen=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
