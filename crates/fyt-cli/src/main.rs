use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing::{debug, info};

use fyt_core::{ContainerReport, DecodedContainer, ProtocolTree, build_report, decode, encode};

mod logging;

use logging::{LogFormat, LogLevel, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("FYT_BUILD_COMMIT"),
    ", built ",
    env!("FYT_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "fyt")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Inspect, convert and verify FYT climate-chamber protocol files.",
    long_about = None,
    after_help = "Examples:\n  fyt inspect protocol.fyt --pretty\n  fyt export protocol.fyt -o protocol.json\n  fyt pack protocol.json -o protocol.fyt\n  fyt verify protocol.fyt --strict-length"
)]
struct Cli {
    /// Log verbosity (stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Log line format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a JSON summary of a .fyt file (header, description, groups, protocol).
    Inspect {
        /// Path to a .fyt file
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Write the protocol of a .fyt file as JSON, description included.
    Export {
        /// Path to a .fyt file
        input: PathBuf,

        /// Output path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Encode a protocol JSON file into a fresh .fyt file.
    Pack {
        /// Path to a protocol .json file
        input: PathBuf,

        /// Output .fyt path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Check that a .fyt file re-encodes to identical bytes.
    Verify {
        /// Path to a .fyt file
        input: PathBuf,

        /// Also require header bytes 22-23 to match the JSON length
        #[arg(long)]
        strict_length: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Inspect { input, pretty } => cmd_inspect(input, pretty),
        Commands::Export {
            input,
            output,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_export(input, output, stdout, pretty, compact, quiet),
        Commands::Pack {
            input,
            output,
            quiet,
        } => cmd_pack(input, output, quiet),
        Commands::Verify {
            input,
            strict_length,
            quiet,
        } => cmd_verify(input, strict_length, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_inspect(input: PathBuf, pretty: bool) -> Result<(), CliError> {
    let (_, decoded) = read_container(&input)?;
    let report = build_report(&decoded);
    let json = serialize_report(&report, pretty)?;
    println!("{}", json);
    Ok(())
}

fn cmd_export(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let (resolved_input, decoded) = read_container(&input)?;
    let tree = serde_json::Value::Object(decoded.protocol_with_description());
    let json = if pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    };
    let json = json.context("JSON serialization failed")?;

    if stdout {
        println!("{}", json);
        return Ok(());
    }

    let output = output.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--output or --stdout".to_string()),
        )
    })?;
    ensure_distinct_paths(&resolved_input, &output)?;
    write_output(&output, json.as_bytes())?;
    if !quiet {
        eprintln!("OK: protocol written -> {}", output.display());
    }
    Ok(())
}

fn cmd_pack(input: PathBuf, output: PathBuf, quiet: bool) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input, "json")?;
    ensure_distinct_paths(&resolved_input, &output)?;

    let text = fs::read_to_string(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    let tree: ProtocolTree = serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid protocol JSON in {}: {}", resolved_input.display(), err),
            Some("the file must hold a single JSON object".to_string()),
        )
    })?;

    let bytes = encode(&tree);
    info!(bytes = bytes.len(), "fresh-encoded protocol");
    write_output(&output, &bytes)?;
    if !quiet {
        eprintln!("OK: container written -> {}", output.display());
    }
    Ok(())
}

fn cmd_verify(input: PathBuf, strict_length: bool, quiet: bool) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input, "fyt")?;
    let bytes = read_bytes(&resolved_input)?;
    let decoded = decode_bytes(&resolved_input, &bytes)?;

    let encoded = encode(&decoded);
    if encoded != bytes {
        let offset = first_difference(&encoded, &bytes);
        return Err(CliError::new(
            format!(
                "round-trip mismatch in {} at byte {}",
                resolved_input.display(),
                offset
            ),
            Some("the file decodes but does not re-encode identically".to_string()),
        ));
    }

    let json_len = decoded.json_bytes().len();
    if strict_length && !decoded.header().length_pair_matches(json_len) {
        let (lo, hi) = decoded.header().length_pair();
        let (expected_lo, expected_hi) = fyt_core::Header::expected_length_pair(json_len);
        return Err(CliError::new(
            format!(
                "header length bytes {:#04x} {:#04x} do not match JSON length {} (expected {:#04x} {:#04x})",
                lo, hi, json_len, expected_lo, expected_hi
            ),
            Some("re-pack the protocol to rebuild the header".to_string()),
        ));
    }

    if !quiet {
        eprintln!("OK: round-trip verified -> {}", resolved_input.display());
    }
    Ok(())
}

fn read_container(input: &Path) -> Result<(PathBuf, DecodedContainer), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input, "fyt")?;
    let bytes = read_bytes(&resolved_input)?;
    let decoded = decode_bytes(&resolved_input, &bytes)?;
    Ok((resolved_input, decoded))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input");
    Ok(bytes)
}

fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<DecodedContainer, CliError> {
    decode(bytes).map_err(|err| {
        CliError::new(
            format!("FYT decode failed for {}: {}", path.display(), err),
            Some(format!("format error kind: {}", err.kind())),
        )
    })
}

fn serialize_report(report: &ContainerReport, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(output, bytes)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;
    Ok(())
}

fn ensure_distinct_paths(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Ok(output_dir) = fs::canonicalize(&output_dir) else {
        // Directory does not exist yet, so it cannot alias the input.
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| CliError::new(format!("invalid output path: {}", output.display()), None))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn first_difference(left: &[u8], right: &[u8]) -> usize {
    left.iter()
        .zip(right)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| left.len().min(right.len()))
}

fn validate_input_file(input: &Path, expected_ext: &str) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(format!("use a .{} file", expected_ext)),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some(format!("use a .{} file", expected_ext)),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != expected_ext {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some(format!("expected a .{} file", expected_ext)),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::{first_difference, is_glob_pattern};

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("captures/*.fyt"));
        assert!(is_glob_pattern("day?.fyt"));
        assert!(!is_glob_pattern("protocol.fyt"));
    }

    #[test]
    fn first_difference_reports_offset_or_shorter_len() {
        assert_eq!(first_difference(b"abc", b"abd"), 2);
        assert_eq!(first_difference(b"ab", b"abc"), 2);
    }
}
