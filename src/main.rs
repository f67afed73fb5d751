//! Campus analytics entry point: CLI wiring, dataset load, and model warm-up.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use campus_analytics::CampusEngine;
use campus_analytics::config::EngineConfig;
use campus_analytics::io::export::export_csv;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    data_override: Option<String>,
    export_path: Option<String>,
    simulate: Option<(f64, f64)>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("campus-analytics: campus operations analytics engine");
    eprintln!();
    eprintln!("Usage: campus-analytics [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load engine config from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (default, fast)");
    eprintln!("  --data <path>            Override the dataset CSV path");
    eprintln!("  --export <path>          Write the processed dataset to CSV");
    eprintln!("  --simulate <c>,<d>       Project satisfaction for congestion/delay cuts (%)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after loading");
        eprintln!("  --port <u16>             API server port (default: 8000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the default preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Takes the value following flag `args[*i]`, exiting if it is missing.
fn take_value(args: &[String], i: &mut usize, what: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {} requires {what}", args[*i - 1]);
            process::exit(1);
        }
    }
}

/// Parses `"<c>,<d>"` into two percentages.
fn parse_pair(s: &str) -> Option<(f64, f64)> {
    let (c, d) = s.split_once(',')?;
    Some((c.trim().parse().ok()?, d.trim().parse().ok()?))
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        data_override: None,
        export_path: None,
        simulate: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 8000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => cli.config_path = Some(take_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(take_value(&args, &mut i, "a name argument")),
            "--data" => cli.data_override = Some(take_value(&args, &mut i, "a path argument")),
            "--export" => cli.export_path = Some(take_value(&args, &mut i, "a path argument")),
            "--simulate" => {
                let raw = take_value(&args, &mut i, "a <c>,<d> argument");
                if let Some(pair) = parse_pair(&raw) {
                    cli.simulate = Some(pair);
                } else {
                    eprintln!("error: --simulate value \"{raw}\" is not of the form <c>,<d>");
                    process::exit(1);
                }
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let raw = take_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // --config takes priority, then --preset, then defaults
    let mut config = if let Some(ref path) = cli.config_path {
        match EngineConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match EngineConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        EngineConfig::default()
    };

    if let Some(path) = cli.data_override {
        config.data.path = path;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let engine = CampusEngine::load(config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    if let Err(e) = engine.warm_up() {
        eprintln!("error: {e}");
        process::exit(1);
    }

    match engine.kpis() {
        Ok(kpi) => println!("{kpi}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    if let Some((c, d)) = cli.simulate {
        match engine.simulate(c, d) {
            Ok(r) => println!(
                "\nWhat-if ({c}% congestion, {d}% delay): {:.3} -> {:.3} ({:+.2}%)",
                r.baseline_satisfaction, r.projected_satisfaction, r.improvement_pct
            ),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = cli.export_path {
        if let Err(e) = export_csv(engine.dataset(), Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Processed dataset written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(campus_analytics::api::AppState {
            engine: Arc::new(engine),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(campus_analytics::api::serve(state, addr)) {
            eprintln!("error: server failed on {addr}: {e}");
            process::exit(1);
        }
    }
}
