use crate::navigation::{self, WaitUntil};
use crate::settings::{CssLength, PaperFormat};
use crate::settle;
use anyhow::Context;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

const HEADER_TEMPLATE: &str = r#"<div style="font-size: 9px; margin: 0 auto; width: 100%; text-align: center; color: #666;"></div>"#;
const FOOTER_TEMPLATE: &str = r#"<div style="font-size: 9px; margin: 0 auto; width: 100%; text-align: center; color: #666;"><span class="pageNumber"></span></div>"#;

const WINDOW_SIZE: (u32, u32) = (1200, 800);

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub wait_until: WaitUntil,
    pub format: PaperFormat,
    pub margin: CssLength,
    pub scale: f64,
    pub page_numbers: bool,
    pub timeout: Duration,
    pub chrome: Option<PathBuf>,
}

impl RenderSettings {
    pub fn print_options(&self) -> PrintToPdfOptions {
        let (paper_width, paper_height) = self.format.size_in_inches();
        let margin = self.margin.to_inches();
        let (header_template, footer_template) = if self.page_numbers {
            (HEADER_TEMPLATE, FOOTER_TEMPLATE)
        } else {
            ("", "")
        };

        PrintToPdfOptions {
            display_header_footer: Some(self.page_numbers),
            print_background: Some(true),
            scale: Some(self.scale),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(margin),
            margin_bottom: Some(margin),
            margin_left: Some(margin),
            margin_right: Some(margin),
            header_template: Some(header_template.to_string()),
            footer_template: Some(footer_template.to_string()),
            ..Default::default()
        }
    }

    fn launch_options(&self) -> LaunchOptions<'_> {
        LaunchOptions {
            headless: true,
            sandbox: false,
            window_size: Some(WINDOW_SIZE),
            path: self.chrome.clone(),
            args: vec![OsStr::new("--disable-setuid-sandbox")],
            // the connection must outlive a slow navigation
            idle_browser_timeout: self.timeout.saturating_add(Duration::from_secs(30)),
            ..Default::default()
        }
    }
}

pub fn to_pdf(url: &Url, output: &Path, settings: &RenderSettings) -> anyhow::Result<()> {
    let browser = Browser::new(settings.launch_options()).context("Failed to launch browser")?;

    let tab = browser.new_tab()?;
    tab.set_default_timeout(settings.timeout);

    navigation::navigate(&tab, url.as_str(), settings.wait_until, settings.timeout)
        .with_context(|| format!("Failed to load {url}"))?;

    settle::wait_for_fonts(&tab);
    settle::wait_for_math(&tab)?;

    if settings.page_numbers {
        settle::hide_first_page_footer(&tab)?;
    }

    info!(format = ?settings.format, margin = %settings.margin, scale = settings.scale, "printing");
    let pdf_bytes = tab.print_to_pdf(Some(settings.print_options()))?;

    let mut pdf_file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    pdf_file.write_all(pdf_bytes.as_slice())?;

    Ok(())
}
