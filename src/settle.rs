//! Readiness checks that run after navigation and before printing.

use headless_chrome::Tab;
use tracing::{debug, warn};

const FONTS_READY: &str = "document.fonts ? document.fonts.ready.then(() => true) : true";

const MATH_READY: &str = r#"
new Promise((resolve) => {
    try {
        if (window.MathJax && MathJax.typesetPromise) {
            MathJax.typesetPromise().then(() => resolve(true)).catch(() => resolve(true));
        } else if (window.katex) {
            const done = () => resolve(true);
            if (document.readyState === 'complete') done();
            else window.addEventListener('load', done, { once: true });
        } else {
            resolve(true);
        }
    } catch (e) {
        resolve(true);
    }
})
"#;

pub const FIRST_PAGE_STYLE: &str =
    "@media print { @page :first { @bottom-center { content: none; } } }";

pub fn wait_for_fonts(tab: &Tab) {
    match tab.evaluate(FONTS_READY, true) {
        Ok(_) => debug!("fonts ready"),
        Err(error) => warn!(%error, "failed to wait for web fonts"),
    }
}

/// Waits for MathJax or KaTeX to finish typesetting, if the page uses either.
pub fn wait_for_math(tab: &Tab) -> anyhow::Result<()> {
    tab.evaluate(MATH_READY, true)?;
    debug!("math typesetting settled");
    Ok(())
}

pub fn hide_first_page_footer(tab: &Tab) -> anyhow::Result<()> {
    tab.evaluate(&append_style_script(FIRST_PAGE_STYLE), false)?;
    Ok(())
}

fn append_style_script(css: &str) -> String {
    format!(
        "(() => {{ const style = document.createElement('style'); \
         style.textContent = {css:?}; \
         (document.head || document.documentElement).appendChild(style); \
         return true; }})()"
    )
}
