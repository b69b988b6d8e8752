use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use sinemodel::analysis::fidelity::{write_reports_json, FidelityReport};
use sinemodel::io::wav::{read_wav_file, write_wav_file_16bit, write_wav_file_float};
use sinemodel::{AudioBuffer, ModelConfig, WindowType};

#[derive(Parser, Debug)]
#[command(
    name = "sinemodel-cli",
    about = "Compare single- and multi-resolution sinusoidal resynthesis of a WAV file"
)]
struct Cli {
    /// Input WAV file
    input: Option<PathBuf>,

    /// Directory for sineModel.wav and sineModelMultiRes.wav
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON model configuration (defaults to the three-band layout)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis window type, overriding the configuration
    #[arg(short, long)]
    window: Option<WindowType>,

    /// Peak detection threshold in dB, overriding the configuration
    #[arg(short, long, allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Write a JSON fidelity report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write 32-bit float WAV instead of 16-bit PCM
    #[arg(long)]
    float: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    let config = load_config(&cli)?;
    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let Some(input_path) = cli.input.as_deref() else {
        bail!("no input file given (see --help)");
    };
    let input = read_wav_file(input_path)
        .with_context(|| format!("failed to read {}", input_path.display()))?;
    log::info!(
        "Input: {} ({} Hz, {} ch, {:.2}s)",
        input_path.display(),
        input.sample_rate,
        input.channels,
        input.duration_secs()
    );

    // The default layout tops out at the file's own Nyquist frequency.
    let config = if cli.config.is_none() {
        let mut scaled = ModelConfig::default_three_band(input.sample_rate);
        scaled.window = config.window;
        scaled.threshold_db = config.threshold_db;
        scaled
    } else {
        config
    };

    let single_params = config.single_params(input.sample_rate)?;
    let single = sinemodel::sine_model_buffer(&input, &single_params)
        .context("single-resolution model failed")?;

    let multi_params = config.multi_res_params(input.sample_rate)?;
    let multi = sinemodel::sine_model_multi_res_buffer(&input, &multi_params)
        .context("multi-resolution model failed")?;

    let reports = vec![
        FidelityReport::measure("sineModel", &input.data, &single.data, input.sample_rate)?,
        FidelityReport::measure(
            "sineModelMultiRes",
            &input.data,
            &multi.data,
            input.sample_rate,
        )?,
    ];
    for report in &reports {
        log::info!("SNR {}: {}", report.label, report.snr());
    }

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;
    write_output(&cli.output_dir.join("sineModel.wav"), &single, cli.float)?;
    write_output(&cli.output_dir.join("sineModelMultiRes.wav"), &multi, cli.float)?;

    if let Some(report_path) = &cli.report {
        write_reports_json(report_path, &reports)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
        log::info!("Report: {}", report_path.display());
    }

    Ok(())
}

/// Loads the configuration file if given and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<ModelConfig> {
    let mut config = match &cli.config {
        Some(path) => ModelConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ModelConfig::default(),
    };
    if let Some(window) = cli.window {
        config = config.with_window(window);
    }
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold_db(threshold);
    }
    Ok(config)
}

fn write_output(path: &Path, buffer: &AudioBuffer, float: bool) -> Result<()> {
    if float {
        write_wav_file_float(path, buffer)?;
    } else {
        write_wav_file_16bit(path, buffer)?;
    }
    log::info!("Output: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "sinemodel-cli",
            "in.wav",
            "--window",
            "blackman-harris",
            "--threshold",
            "-80",
            "-o",
            "out",
        ]);
        assert_eq!(cli.input.as_deref(), Some(Path::new("in.wav")));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        let config = load_config(&cli).unwrap();
        assert_eq!(config.window, WindowType::BlackmanHarris);
        assert_eq!(config.threshold_db, -80.0);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["sinemodel-cli", "--print-config"]);
        assert!(cli.print_config);
        assert!(cli.input.is_none());
        assert_eq!(load_config(&cli).unwrap(), ModelConfig::default());
    }
}
