use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::Client;
use tracing::{debug, warn};

use crate::archive::{ArchiveClient, ArchiveError};
use crate::format::{format_doc_types, format_documents};
use crate::query::doc_types::static_catalog;
use crate::query::{KeywordForm, ProjectForm, QueryError, SearchQuery, build_keyword, build_project};
use crate::session::{DirSink, Session};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "wbdocs",
    version,
    about = "Search World Bank project documents and download them as zip archives"
)]
pub struct Cli {
    /// Archive service base URL (default: $WBDOCS_API_URL, then http://localhost:5000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Keyword search
    Search(KeywordArgs),
    /// Search by World Bank project IDs
    Projects(ProjectArgs),
    /// List known document types for --doc-type
    DocTypes {
        /// Ask the archive service instead of printing the built-in list
        #[arg(long)]
        remote: bool,
    },
    /// Check that the archive service is up
    Health,
}

#[derive(Args, Debug)]
pub struct KeywordArgs {
    /// Free-text query
    #[arg(long, short)]
    pub query: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub topic: Option<String>,
    /// Document type (see `wbdocs doc-types`)
    #[arg(long)]
    pub doc_type: Option<String>,
    /// Earliest document date, YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// Latest document date, YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    /// Maximum results as a whole number (no decimals), clamped to 1-1000 (default: 100)
    #[arg(long, allow_hyphen_values = true)]
    pub max_results: Option<String>,
    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project IDs, separated by spaces, commas or newlines (e.g. "P162789, P160628")
    pub ids: Vec<String>,
    /// Read additional project IDs from a file
    #[arg(long)]
    pub ids_file: Option<PathBuf>,
    /// Document type (see `wbdocs doc-types`)
    #[arg(long)]
    pub doc_type: Option<String>,
    /// Maximum documents per project as a whole number (no decimals), clamped to 1-1000 (default: 100)
    #[arg(long, allow_hyphen_values = true)]
    pub max_per_project: Option<String>,
    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Toggle selection of every result (applied before --select)
    #[arg(long)]
    pub all: bool,
    /// Toggle selection of the document with this id (repeatable)
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,
    /// Download the selection as a zip archive
    #[arg(long, value_enum)]
    pub download: Option<DownloadMode>,
    /// Directory the archive is saved into
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DownloadMode {
    /// Files keep their original names
    Plain,
    /// Files are renamed after the project ID found in them
    Renamed,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("could not read {}: {source}", .path.display())]
    IdsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("nothing selected: pass --all or --select ID to choose documents")]
    NothingSelected,

    /// A failure already reduced to its user-visible message.
    #[error("{0}")]
    Failed(String),
}

impl KeywordArgs {
    fn form(&self) -> KeywordForm {
        let raw = |v: &Option<String>| v.clone().unwrap_or_default();
        KeywordForm {
            query: raw(&self.query),
            country: raw(&self.country),
            topic: raw(&self.topic),
            doc_type: raw(&self.doc_type),
            from_date: raw(&self.from_date),
            to_date: raw(&self.to_date),
            language: raw(&self.language),
            max_results: raw(&self.max_results),
        }
    }
}

impl ProjectArgs {
    async fn form(&self) -> Result<ProjectForm, CliError> {
        let mut project_ids = self.ids.join("\n");
        if let Some(path) = &self.ids_file {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::IdsFile {
                    path: path.clone(),
                    source,
                })?;
            project_ids.push('\n');
            project_ids.push_str(&text);
        }
        Ok(ProjectForm {
            project_ids,
            doc_type: self.doc_type.clone().unwrap_or_default(),
            max_per_project: self.max_per_project.clone().unwrap_or_default(),
        })
    }
}

impl Cli {
    pub async fn run(self) -> Result<(), CliError> {
        let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        match self.command {
            Command::Search(args) => {
                let query = build_keyword(&args.form())?;
                let client = ArchiveClient::from_env(http, self.api_url.as_deref())?;
                search_and_download(client, &query, &args.select).await
            }
            Command::Projects(args) => {
                let query = build_project(&args.form().await?)?;
                if let SearchQuery::ByProjectId(p) = &query
                    && p.project_ids.is_empty()
                {
                    warn!("no project IDs given; the archive service will reject the search");
                }
                let client = ArchiveClient::from_env(http, self.api_url.as_deref())?;
                search_and_download(client, &query, &args.select).await
            }
            Command::DocTypes { remote } => {
                let options = if remote {
                    let client = ArchiveClient::from_env(http, self.api_url.as_deref())?;
                    client.document_types().await?
                } else {
                    static_catalog()
                };
                print!("{}", format_doc_types(&options));
                Ok(())
            }
            Command::Health => {
                let client = ArchiveClient::from_env(http, self.api_url.as_deref())?;
                let status = client.health().await?;
                println!("{}: {status}", client.base_url());
                Ok(())
            }
        }
    }
}

async fn search_and_download(
    client: ArchiveClient,
    query: &SearchQuery,
    select: &SelectArgs,
) -> Result<(), CliError> {
    let mut session = Session::new(client, DirSink::new(&select.output_dir));
    session.search(query).await.map_err(CliError::Failed)?;
    debug!(phase = ?session.store().phase(), "search settled");

    if select.all {
        session.toggle_all();
    }
    for id in &select.select {
        if session.toggle_one(id).is_none() {
            warn!(%id, "not in the search results; ignoring");
        }
    }

    let store = session.store();
    print!("{}", format_documents(store.documents(), store.selection()));

    let Some(mode) = select.download else {
        return Ok(());
    };
    let saved = match mode {
        DownloadMode::Plain => session.download_plain().await,
        DownloadMode::Renamed => session.download_renamed().await,
    };
    match saved.map_err(CliError::Failed)? {
        Some(path) => {
            println!("\nSaved {}", path.display());
            Ok(())
        }
        None => Err(CliError::NothingSelected),
    }
}
