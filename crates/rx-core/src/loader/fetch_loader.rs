//! Default loader for hosts that bring none: gated GET for network URLs,
//! plain file reads for `file:` URLs.

use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use url::Url;

use super::{DefaultLoad, Loaded};
use crate::context::HookContext;
use crate::fetch::{Fetch, Method};
use crate::format::ModuleFormat;

pub struct FetchLoader<F> {
    fetch: F,
}

impl<F: Fetch> FetchLoader<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    async fn load_remote(&self, url: &Url) -> Result<Loaded> {
        let resp = self.fetch.fetch(url, Method::Get).await?;
        let format = resp
            .content_type()
            .filter(|ct| ct.to_ascii_lowercase().contains("javascript"))
            .map(|_| ModuleFormat::Module);
        tracing::debug!(url = %url, status = resp.status, content_type = ?resp.content_type(), "fetched module");
        Ok(Loaded {
            format,
            source: resp.body.unwrap_or_default(),
            response_url: None,
            short_circuit: false,
        })
    }
}

impl<F: Fetch> DefaultLoad for FetchLoader<F> {
    async fn load(&self, url: &str, _ctx: &HookContext) -> Result<Loaded> {
        let parsed = Url::parse(url).with_context(|| format!("parse module URL: {url}"))?;
        match parsed.scheme() {
            "https" | "http" => self.load_remote(&parsed).await,
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|()| anyhow!("not a local file URL: {url}"))?;
                let source = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("read module: {}", path.display()))?;
                Ok(Loaded {
                    format: format_from_extension(&path),
                    source,
                    response_url: None,
                    short_circuit: false,
                })
            }
            other => bail!("cannot load {other}: URLs: {url}"),
        }
    }
}

fn format_from_extension(path: &Path) -> Option<ModuleFormat> {
    match path.extension()?.to_str()? {
        "mjs" => Some(ModuleFormat::Module),
        "cjs" => Some(ModuleFormat::Commonjs),
        "json" => Some(ModuleFormat::Json),
        "wasm" => Some(ModuleFormat::Wasm),
        _ => None,
    }
}
