//! CLI command implementations.
//!
//! Commands write their trace to any `io::Write` and return the localized
//! diagnostic on failure; exiting the process is left to `main`.

pub mod workflow;

use std::io::Write;
use std::path::PathBuf;

use aip_core::i18n::LANG_ENV;
use aip_core::{t, AipError, Catalog, Locale, McpConfig};

/// Per-process configuration: the message catalog and optional MCP settings.
pub struct Session {
    pub catalog: Catalog,
    /// `Some` when MCP mode is enabled
    pub mcp: Option<McpConfig>,
}

impl Session {
    /// Build the session from flags, falling back to the environment.
    pub fn init(lang: Option<&str>, mcp_enabled: bool, mcp_config: Option<&str>) -> Self {
        let env_lang = std::env::var(LANG_ENV).ok();
        let locale = Locale::resolve(lang, env_lang.as_deref());
        let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let catalog = Catalog::load(locale, &project_root);

        let mcp = mcp_enabled.then(|| McpConfig::from_env_or(mcp_config));

        Self { catalog, mcp }
    }

    /// Print the language line and, in MCP mode, the MCP notice.
    pub fn print_banner<W: Write>(&self, out: &mut W) -> Result<(), String> {
        emit(out, &t!(self.catalog, "using_lang", lang = self.catalog.locale()), self)?;
        if self.mcp.is_some() {
            emit(out, &t!(self.catalog, "mcp_enabled"), self)?;
        }
        Ok(())
    }

    /// Render a fatal error for the user.
    pub fn describe(&self, error: AipError) -> String {
        error.localize(&self.catalog)
    }
}

/// Write one line, turning sink failures into a localized diagnostic.
pub(crate) fn emit<W: Write>(out: &mut W, line: &str, session: &Session) -> Result<(), String> {
    writeln!(out, "{}", line).map_err(|e| session.describe(e.into()))
}
