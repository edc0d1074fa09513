use anyhow::Context;
use std::fs;
use std::path::Path;
use url::Url;

/// Turns the `input` argument into something the browser can navigate to.
///
/// Existing paths win over URL parsing, so `C:/page.html` or a file literally
/// named `http:x` still load from disk.
pub fn resolve_input(input: &str) -> anyhow::Result<Url> {
    let path = Path::new(input);
    if path.exists() {
        let path = fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve input path {}", path.display()))?;
        return Url::from_file_path(&path)
            .map_err(|_| anyhow::anyhow!("Failed to convert file path to URL"));
    }

    Url::parse(input)
        .with_context(|| format!("Input `{input}` is neither an existing file nor a valid URL"))
}
