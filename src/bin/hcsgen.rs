//! hcsgen - Command-line front end for HCS code generation
//!
//! Reads an input profile JSON file, generates the codes and writes:
//! - `<input>_output.json`: the full output
//! - `<input>_output.hcs`: the codes only, one per line
//!
//! The secret comes from `HCS_SECRET_KEY`; the salt is read from (or created
//! in) `--salt-dir`, `HCS_SALT_DIR` or the working directory.

use clap::Parser;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use hcs_codes::{GenerateOptions, HcsError, HcsGenerator, HcsOutput, InputProfile, HCS_VERSION};

/// Generate HCS codes from an input profile
#[derive(Parser)]
#[command(name = "hcsgen")]
#[command(version = HCS_VERSION)]
#[command(about = "Generate HCS codes from an input profile", long_about = None)]
#[command(after_help = "Examples:\n  hcsgen input.json\n  hcsgen --u3-only profile.json\n  hcsgen --pretty --raw-json input.json")]
struct Cli {
    /// Input profile JSON file
    input: PathBuf,

    /// Only compute and output the U3 code
    #[arg(long, conflicts_with = "u4_only")]
    u3_only: bool,

    /// Only compute and output the U4 code
    #[arg(long)]
    u4_only: bool,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print only JSON to stdout (no extra text)
    #[arg(long)]
    raw_json: bool,

    /// Directory holding the persistent .hcs_salt file
    #[arg(long)]
    salt_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HcsCliError> {
    let data = fs::read_to_string(&cli.input).map_err(HcsCliError::ReadInput)?;
    let input: InputProfile = serde_json::from_str(&data).map_err(HcsCliError::ParseInput)?;

    let generator = HcsGenerator::from_env(cli.salt_dir.as_deref())?;
    let options = GenerateOptions {
        u3_only: cli.u3_only,
        u4_only: cli.u4_only,
    };
    let output = generator.generate_with_options(&input, options)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(HcsError::from)?;

    let json_path = output_path(&cli.input, "_output.json");
    let hcs_path = output_path(&cli.input, "_output.hcs");
    fs::write(&json_path, &json).map_err(HcsCliError::WriteOutput)?;
    fs::write(&hcs_path, codes(&output).join("\n")).map_err(HcsCliError::WriteOutput)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.raw_json {
        write!(out, "{json}").map_err(HcsCliError::WriteOutput)?;
    } else {
        print_summary(&mut out, &output, &json_path, &hcs_path).map_err(HcsCliError::WriteOutput)?;
    }

    Ok(())
}

/// `dir/profile.json` → `dir/profile<suffix>`
fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = input.with_extension("").into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Codes present in the output, in U3, U4, U5, U7 order
fn codes(output: &HcsOutput) -> Vec<&str> {
    let mut codes = Vec::with_capacity(4);
    if !output.code_u3.is_empty() {
        codes.push(output.code_u3.as_str());
    }
    codes.extend(output.code_u4.as_deref());
    codes.extend(output.code_u5.as_deref());
    codes.push(output.code_u7.as_str());
    codes
}

fn print_summary(
    out: &mut impl Write,
    output: &HcsOutput,
    json_path: &Path,
    hcs_path: &Path,
) -> io::Result<()> {
    if !output.code_u3.is_empty() {
        writeln!(out, "HCS-U3: {}", output.code_u3)?;
    }
    if let Some(code) = &output.code_u4 {
        writeln!(out, "HCS-U4: {code}")?;
    }
    if let Some(code) = &output.code_u5 {
        writeln!(out, "HCS-U5: {code}")?;
        if let Some(chinese) = &output.chinese_profile {
            writeln!(out, "\nChinese BaZi Profile detected:")?;
            writeln!(
                out,
                "  Four Pillars: {} | {} | {} | {}",
                chinese.year_pillar, chinese.month_pillar, chinese.day_pillar, chinese.hour_pillar
            )?;
            writeln!(
                out,
                "  Day Master: {} (Strength: {:.0}%)",
                chinese.day_master,
                chinese.day_master_strength * 100.0
            )?;
            writeln!(
                out,
                "  Yin/Yang Balance: {:.0}% Yang",
                chinese.yin_yang_balance * 100.0
            )?;
        }
    }
    writeln!(out, "HCS-U7: {}", output.code_u7)?;
    writeln!(out, "\nCHIP: {}", output.chip)?;
    writeln!(out, "\nOutput written to:")?;
    writeln!(out, "  - {} (full JSON)", json_path.display())?;
    writeln!(out, "  - {} (codes only)", hcs_path.display())?;
    Ok(())
}

// Error types

#[derive(Debug)]
enum HcsCliError {
    ReadInput(io::Error),
    ParseInput(serde_json::Error),
    WriteOutput(io::Error),
    Generate(HcsError),
}

impl From<HcsError> for HcsCliError {
    fn from(e: HcsError) -> Self {
        HcsCliError::Generate(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HcsCliError> for CliError {
    fn from(e: HcsCliError) -> Self {
        match e {
            HcsCliError::ReadInput(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: format!("failed to read input file: {e}"),
                hint: Some("Check the input path and permissions".to_string()),
            },
            HcsCliError::ParseInput(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: format!("failed to parse input JSON: {e}"),
                hint: Some("Check JSON syntax and field names".to_string()),
            },
            HcsCliError::WriteOutput(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: format!("failed to write output: {e}"),
                hint: Some("Check that the input directory is writable".to_string()),
            },
            HcsCliError::Generate(e) => {
                let (code, hint) = match &e {
                    HcsError::Validation(_) | HcsError::InvalidBirthInfo(_) => (
                        "VALIDATION_ERROR",
                        "Ratios must be within 0-1 and categorical values must be known",
                    ),
                    HcsError::Configuration(_) => (
                        "CONFIG_ERROR",
                        "Set HCS_SECRET_KEY to 32 or 64 hex-encoded bytes",
                    ),
                    HcsError::Io(_) => ("IO_ERROR", "Check that the salt directory is writable"),
                    _ => ("GENERATION_ERROR", "Report this input as a bug"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("dir/profile.json"), "_output.json"),
            PathBuf::from("dir/profile_output.json")
        );
        assert_eq!(
            output_path(Path::new("profile"), "_output.hcs"),
            PathBuf::from("profile_output.hcs")
        );
    }

    #[test]
    fn test_cli_error_codes() {
        let err = CliError::from(HcsCliError::from(HcsError::Configuration("x".into())));
        assert_eq!(err.code, "CONFIG_ERROR");

        let err = CliError::from(HcsCliError::from(HcsError::Validation("x".into())));
        assert_eq!(err.code, "VALIDATION_ERROR");
    }
}
