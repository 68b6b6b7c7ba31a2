//! Folio CLI - render a source tree into paginated HTML.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use folio::builder::{BuildReport, Folio};
use folio::config::{Config, DEFAULT_CONFIG_PATH};
use folio::errors::{exit_code, FolioError};
use folio::filter::FilterPolicy;
use folio::output::{Budget, RenderSummary};
use folio::source::{prepare, repo_name};
use folio::tree::{format_number, render_outline};
use serde::Serialize;
use tracing::info;

/// Content length per page used by default.
const DEFAULT_MAX_LENGTH: usize = 500_000;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render a source tree into paginated HTML")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the tree as numbered HTML pages
    Render {
        /// Repository URL or local directory
        source: String,

        /// Base output path; pages are named <stem>0.<ext>, <stem>1.<ext>, ...
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum file content length per page
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Put everything in a single page
        #[arg(long, conflicts_with = "max_length")]
        unbounded: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the files that would be rendered
    Tree {
        /// Repository URL or local directory
        source: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Config file [default: config/config.json, if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extensions to include (replaces the configured whitelist)
    #[arg(long, value_delimiter = ',')]
    whitelist: Vec<String>,

    /// Extensions to exclude (replaces the configured blacklist)
    #[arg(long, value_delimiter = ',')]
    blacklist: Vec<String>,

    /// Include dotfiles
    #[arg(long)]
    include_hidden: bool,

    /// Directory remote sources are cloned into
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Visit directory entries in name order
    #[arg(long)]
    sorted: bool,
}

impl FilterArgs {
    fn policy(&self) -> Result<FilterPolicy, FolioError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };

        if !self.whitelist.is_empty() {
            config.extension_whitelist = self.whitelist.clone();
        }
        if !self.blacklist.is_empty() {
            config.extension_blacklist = self.blacklist.clone();
        }
        config.include_hidden_files |= self.include_hidden;

        Ok(config.policy())
    }

    fn folio(&self, source: &str) -> Result<(PathBuf, Folio), FolioError> {
        let policy = self.policy()?;
        let root = prepare(source, &self.workdir)?;
        let folio = Folio::new(&root).policy(&policy).sorted(self.sorted);
        Ok((root, folio))
    }
}

fn main() {
    let cli = Cli::parse();
    folio::logging::init(cli.verbose, cli.quiet);
    let json_output = matches!(cli.command, Commands::Render { json: true, .. });

    let result = match cli.command {
        Commands::Render {
            source,
            output,
            max_length,
            unbounded,
            filter,
            json,
        } => {
            let budget = Budget::from((!unbounded).then_some(max_length));
            run_render(&source, output, budget, &filter, json)
        }
        Commands::Tree { source, filter } => run_tree(&source, &filter),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "folio", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

/// `<name>.html` in the current directory, named after the rendered root.
fn default_output(root: &Path, source: &str) -> PathBuf {
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| repo_name(source));
    PathBuf::from(format!("{}.html", name))
}

// --- Render command ---

#[derive(Serialize)]
struct RenderOutput<'a> {
    root: String,
    #[serde(flatten)]
    summary: &'a RenderSummary,
    report: &'a BuildReport,
}

fn run_render(
    source: &str,
    output: Option<PathBuf>,
    budget: Budget,
    filter: &FilterArgs,
    json: bool,
) -> Result<(), FolioError> {
    let (root, folio) = filter.folio(source)?;
    let html_path = output.unwrap_or_else(|| default_output(&root, source));

    info!("generating {}...", html_path.display());
    let (report, summary) = folio.budget(budget).write(&html_path)?;

    if json {
        let payload = RenderOutput {
            root: root.display().to_string(),
            summary: &summary,
            report: &report,
        };
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|e| FolioError::Io(std::io::Error::other(e.to_string())))?;
        println!("{json}");
    } else {
        for page in &summary.pages {
            println!("{}", page.display());
        }
        println!(
            "{} files rendered into {} pages",
            format_number(summary.files_rendered),
            summary.pages.len()
        );
    }

    Ok(())
}

// --- Tree command ---

fn run_tree(source: &str, filter: &FilterArgs) -> Result<(), FolioError> {
    let (_, folio) = filter.folio(source)?;
    let (tree, report) = folio.tree()?;

    print!("{}", render_outline(&tree));
    println!(
        "\n{} files, {} folders, {} chars",
        format_number(tree.file_count()),
        format_number(tree.folder_count()),
        format_number(tree.total_content_length())
    );
    if report.warned > 0 || !report.read_failures.is_empty() {
        println!(
            "{} not whitelisted, {} unreadable",
            report.warned,
            report.read_failures.len()
        );
    }

    Ok(())
}
