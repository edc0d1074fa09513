use crate::navigation::WaitUntil;
use crate::pdf::RenderSettings;
use crate::settings::{CssLength, PaperFormat, SettingsError};
use clap::error::ErrorKind;
use clap::Parser;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod navigation;
mod pdf;
mod settings;
mod settle;
mod source;

const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Debug, Parser)]
#[command(version, about = "Print an HTML page or file to PDF with headless Chrome")]
struct Options {
    /// Path or URL of the page to print
    #[arg(default_value = "/work/input.html")]
    input: String,
    #[arg(default_value = "/work/output.pdf")]
    output: PathBuf,
    /// load, domcontentloaded, networkidle0 or networkidle2
    #[arg(long = "waitFor", default_value = "networkidle0")]
    wait_for: WaitUntil,
    #[arg(long, default_value = "A4")]
    format: PaperFormat,
    /// CSS length applied to all four sides
    #[arg(long, default_value = "10mm")]
    margin: CssLength,
    #[arg(long, default_value = "1.0", value_parser = parse_scale)]
    scale: f64,
    /// Anything but `false` prints page numbers in the footer
    #[arg(
        long = "pageNumbers",
        value_name = "BOOL",
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_page_numbers,
    )]
    page_numbers: bool,
    /// Seconds to wait for navigation and page scripts
    #[arg(long, default_value = "180", value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    timeout: u64,
    /// Browser executable, auto-detected when omitted
    #[arg(long, env = "CHROME_PATH")]
    chrome: Option<PathBuf>,
}

impl Options {
    fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            wait_until: self.wait_for,
            format: self.format,
            margin: self.margin,
            scale: self.scale,
            page_numbers: self.page_numbers,
            timeout: Duration::from_secs(self.timeout),
            chrome: self.chrome.clone(),
        }
    }
}

fn parse_page_numbers(value: &str) -> Result<bool, Infallible> {
    Ok(value != "false")
}

fn parse_scale(value: &str) -> Result<f64, SettingsError> {
    let scale = value
        .trim()
        .parse::<f64>()
        .map_err(|_| SettingsError::InvalidScale(value.to_string()))?;
    settings::validate_scale(scale)
}

/// Exit status for a failed argument parse. Help and version output are
/// successes; every other failure exits 1 like a failed render.
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn run(opts: &Options) -> anyhow::Result<()> {
    let url = source::resolve_input(&opts.input)?;
    pdf::to_pdf(&url, &opts.output, &opts.render_settings())?;

    println!("html → pdf: wrote {}", opts.output.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = match Options::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            let code = parse_exit_code(&err);
            if code == 0 {
                err.exit();
            }
            err.print()?;
            process::exit(code);
        }
    };

    run(&opts)
}
