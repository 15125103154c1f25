use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::catalog::DEFAULT_ENDPOINT;
use crate::models::LevelBand;
use crate::query::PageSlicing;

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse a book catalog and build a reading list")]
pub struct Cli {
    /// GraphQL endpoint serving the `books` query.
    #[arg(long, env = "CATALOG_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Base URL that relative cover references are resolved against.
    #[arg(long, env = "CATALOG_ASSET_BASE")]
    pub asset_base: Option<Url>,

    /// Drop the first match before slicing pages after the first, like the
    /// original web client did.
    #[arg(long)]
    pub legacy_paging: bool,

    /// HTTP timeout for the catalog request.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print one catalog page to stdout instead of starting the TUI.
    #[arg(long)]
    pub print: bool,

    /// Search term applied in print mode.
    #[arg(long, default_value = "", requires = "print")]
    pub search: String,

    /// Reading level band applied in print mode (All Levels, A-C, D-F, G-I, J-L).
    #[arg(long, default_value = "All Levels", requires = "print")]
    pub level: LevelBand,

    /// Catalog page printed in print mode.
    #[arg(long, default_value_t = 1, requires = "print")]
    pub page: usize,
}

impl Cli {
    pub fn slicing(&self) -> PageSlicing {
        if self.legacy_paging {
            PageSlicing::SkipLeadingOnLaterPages
        } else {
            PageSlicing::Contiguous
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
