use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuidv9::{
    Timestamp, Uuidv9Gen, Uuidv9Options, ValidateOptions, calc_checksum, check_version,
    is_uuid, is_valid_uuidv9, strip_dashes, verify_checksum,
};

#[derive(Debug, Clone)]
struct EmitOpts {
    options: Uuidv9Options,
    count: usize,
}

fn default_prefix() -> String {
    env::var("UUIDV9_PREFIX").unwrap_or_default()
}

fn init_logging() {
    let filter = env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level.to_lowercase()).ok())
        .unwrap_or_else(|| {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_help() {
    eprintln!(
        "uuidv9 - UUIDv9 generator CLI\n\n\
Usage:\n  uuidv9 next [--prefix <hex>] [--timestamp now|off|<ticks>|<rfc3339>] [--checksum] [--version] [--legacy]\n  uuidv9 stream [same flags as next] [--count <n>]\n  uuidv9 validate <id> [--checksum] [--version]\n  uuidv9 inspect <id> [--json]\n  uuidv9 checksum <hex>\n  uuidv9 healthcheck [--json]\n  uuidv9 bench [--count <n>] [same flags as next]\n  uuidv9 selftest\n\n\
Environment:\n  UUIDV9_PREFIX  default prefix\n  LOG_LEVEL      log filter (falls back to RUST_LOG)\n"
    );
}

fn parse_emit_flags(args: &[String], allow_count: bool) -> Result<EmitOpts, String> {
    let mut opts = EmitOpts {
        options: Uuidv9Options {
            prefix: default_prefix(),
            ..Default::default()
        },
        count: 0,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--prefix" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --prefix".to_string());
                }
                opts.options.prefix = args[i + 1].clone();
                i += 2;
            }
            "--timestamp" | "--T" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --timestamp".to_string());
                }
                opts.options.timestamp = args[i + 1]
                    .parse::<Timestamp>()
                    .map_err(|e| e.to_string())?;
                i += 2;
            }
            "--checksum" => {
                opts.options.checksum = true;
                i += 1;
            }
            "--version" => {
                opts.options.version = true;
                i += 1;
            }
            "--legacy" => {
                opts.options.legacy = true;
                i += 1;
            }
            "--count" if allow_count => {
                if i + 1 >= args.len() {
                    return Err("missing value for --count".to_string());
                }
                opts.count = args[i + 1]
                    .parse::<usize>()
                    .map_err(|_| "invalid integer for --count".to_string())?;
                i += 2;
            }
            _ => return Err(format!("unknown flag: {}", args[i])),
        }
    }

    Ok(opts)
}

fn parse_validate_flags(args: &[String]) -> Result<ValidateOptions, String> {
    let mut opts = ValidateOptions::default();
    for arg in args {
        match arg.as_str() {
            "--checksum" => opts.checksum = true,
            "--version" => opts.version = true,
            _ => return Err(format!("unknown flag: {}", arg)),
        }
    }
    Ok(opts)
}

fn run_next(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, false)?;
    let mut generator = Uuidv9Gen::new();
    println!(
        "{}",
        generator.generate(&opts.options).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_stream(args: &[String]) -> Result<(), String> {
    let opts = parse_emit_flags(args, true)?;
    let mut generator = Uuidv9Gen::new();
    let mut emitted = 0usize;

    loop {
        if opts.count > 0 && emitted >= opts.count {
            break;
        }
        println!(
            "{}",
            generator.generate(&opts.options).map_err(|e| e.to_string())?
        );
        io::stdout().flush().map_err(|e| e.to_string())?;
        emitted += 1;
    }

    debug!(emitted, "stream finished");
    Ok(())
}

fn run_validate(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("validate requires an id".to_string());
    }

    let id = args[0].clone();
    let opts = parse_validate_flags(&args[1..])?;
    let ok = is_valid_uuidv9(&id, &opts);

    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("invalid uuidv9".to_string())
    }
}

fn run_inspect(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("inspect requires an id".to_string());
    }

    let id = args[0].clone();
    let mut json_out = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--json" => json_out = true,
            _ => return Err(format!("unknown flag: {}", arg)),
        }
    }

    let well_formed = is_uuid(&id);
    let checksum_ok = well_formed && verify_checksum(&id);
    let version_ok = well_formed && check_version(&id, None);
    let version_digit = id.get(14..15).unwrap_or_default();
    let variant_digit = id.get(19..20).unwrap_or_default();
    let payload = strip_dashes(&id);

    if json_out {
        let report = json!({
            "raw": id,
            "payload": payload,
            "well_formed": well_formed,
            "checksum": checksum_ok,
            "version": version_ok,
            "version_digit": version_digit,
            "variant_digit": variant_digit,
        });
        println!(
            "{}",
            serde_json::to_string(&report).map_err(|e| e.to_string())?
        );
    } else {
        println!("raw={}", id);
        println!("payload={}", payload);
        println!("well_formed={}", well_formed);
        println!("checksum={}", checksum_ok);
        println!("version={}", version_ok);
        println!("version_digit={}", version_digit);
        println!("variant_digit={}", variant_digit);
    }

    Ok(())
}

fn run_checksum(args: &[String]) -> Result<(), String> {
    let Some(hex) = args.first() else {
        return Err("checksum requires a hex payload".to_string());
    };
    println!(
        "{}",
        calc_checksum(&strip_dashes(hex)).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_healthcheck(args: &[String]) -> Result<(), String> {
    let mut json_mode = false;
    for arg in args {
        match arg.as_str() {
            "--json" => json_mode = true,
            _ => return Err(format!("unknown flag: {}", arg)),
        }
    }

    let options = Uuidv9Options {
        checksum: true,
        version: true,
        ..Default::default()
    };
    let sample = Uuidv9Gen::new()
        .generate(&options)
        .map_err(|e| e.to_string())?;
    let ok = is_valid_uuidv9(
        &sample,
        &ValidateOptions {
            checksum: true,
            version: true,
        },
    );

    if json_mode {
        let payload = json!({
            "ok": ok,
            "checksum": options.checksum,
            "version": options.version,
            "sample_id": sample,
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "ok={} sample={}",
            if ok { "true" } else { "false" },
            sample
        );
    }

    if ok {
        Ok(())
    } else {
        Err("healthcheck failed".to_string())
    }
}

fn run_bench(args: &[String]) -> Result<(), String> {
    let mut opts = parse_emit_flags(args, true)?;
    if opts.count == 0 {
        opts.count = 100_000;
    }

    let mut generator = Uuidv9Gen::new();
    let start = Instant::now();
    for _ in 0..opts.count {
        let _ = generator.generate(&opts.options).map_err(|e| e.to_string())?;
    }

    let secs = start.elapsed().as_secs_f64().max(1e-9);
    let ips = opts.count as f64 / secs;

    let payload = json!({
        "impl": "rust",
        "options": opts.options,
        "n": opts.count,
        "seconds": secs,
        "ids_per_sec": ips,
    });
    println!(
        "{}",
        serde_json::to_string(&payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_selftest() -> Result<(), String> {
    let mut generator = Uuidv9Gen::new();
    let strict = ValidateOptions {
        checksum: true,
        version: true,
    };
    for legacy in [false, true] {
        let options = Uuidv9Options {
            checksum: true,
            version: !legacy,
            legacy,
            ..Default::default()
        };
        let id = generator.generate(&options).map_err(|e| e.to_string())?;
        if !is_valid_uuidv9(&id, &strict) {
            return Err(format!("selftest failed: {id} did not validate"));
        }
    }
    info!("selftest passed");
    Ok(())
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        process::exit(2);
    }

    if args[0] == "-h" || args[0] == "--help" || args[0] == "help" {
        print_help();
        return;
    }

    let cmd = args[0].as_str();
    let rest = &args[1..];

    let res = match cmd {
        "next" => run_next(rest),
        "stream" => run_stream(rest),
        "validate" => run_validate(rest),
        "inspect" => run_inspect(rest),
        "checksum" => run_checksum(rest),
        "healthcheck" => run_healthcheck(rest),
        "bench" => run_bench(rest),
        "selftest" => run_selftest(),
        _ => Err(format!("unknown command: {}", cmd)),
    };

    if let Err(err) = res {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_emit_flags() {
        let opts = parse_emit_flags(
            &args(&["--prefix", "ab", "--timestamp", "off", "--checksum", "--legacy"]),
            false,
        )
        .unwrap();
        assert_eq!(opts.options.prefix, "ab");
        assert_eq!(opts.options.timestamp, Timestamp::Disabled);
        assert!(opts.options.checksum);
        assert!(opts.options.legacy);
        assert!(!opts.options.version);
    }

    #[test]
    fn test_parse_emit_count_only_for_stream() {
        let opts = parse_emit_flags(&args(&["--count", "3"]), true).unwrap();
        assert_eq!(opts.count, 3);
        assert!(parse_emit_flags(&args(&["--count", "3"]), false).is_err());
        assert!(parse_emit_flags(&args(&["--prefix"]), false).is_err());
    }

    #[test]
    fn test_parse_emit_tick_string() {
        let opts = parse_emit_flags(&args(&["--timestamp", "638396640000000000"]), false).unwrap();
        assert_eq!(
            opts.options.timestamp,
            Timestamp::TickString("638396640000000000".to_string())
        );
        assert!(parse_emit_flags(&args(&["--timestamp", "soon"]), false).is_err());
    }

    #[test]
    fn test_parse_validate_flags() {
        let opts = parse_validate_flags(&args(&["--checksum", "--version"])).unwrap();
        assert!(opts.checksum);
        assert!(opts.version);
        assert!(parse_validate_flags(&args(&["--json"])).is_err());
    }

    #[test]
    fn test_selftest_passes() {
        assert!(run_selftest().is_ok());
    }
}
