//! treequery - mirror a directory tree in memory and query it.
//!
//! Usage:
//!   tq [PATH]                  Print the tree (depth-limited)
//!   tq type <SUFFIX> [PATH]    List files whose path ends with SUFFIX
//!   tq find <NAME> [PATH]      Print the first file with that exact name
//!   tq tree [PATH]             Print the tree with display options
//!   tq export [PATH]           Export the built tree to JSON
//!   tq --help                  Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};

use treequery_core::NodeId;
use treequery_walk::{DirWalker, FileTree, WalkConfig};

#[derive(Parser)]
#[command(
    name = "treequery",
    version,
    about = "Mirror a directory tree in memory and query it",
    long_about = "treequery walks a directory once, keeps the result in memory, \
                  and answers suffix and exact-name lookups over it.\n\n\
                  Run `tq [PATH]` for a quick tree view, or use subcommands \
                  for queries."
)]
struct Cli {
    /// Path to walk (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Skip hidden entries (starting with .)
    #[arg(short = 'H', long, global = true)]
    no_hidden: bool,

    /// Entry names to ignore (exact, or a single leading/trailing *)
    #[arg(short, long, global = true)]
    ignore: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List every file whose full path ends with a suffix
    Type {
        /// Path suffix to match (e.g. ".txt", plain match, case-sensitive)
        suffix: String,

        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find the first file with an exact name
    Find {
        /// Bare file name to look for (exact match)
        name: String,

        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Print the tree
    Tree {
        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum depth to display
        #[arg(short, long, default_value = "3")]
        depth: u32,

        /// Show all entries (no depth limit on display)
        #[arg(short, long)]
        all: bool,
    },

    /// Export the built tree to JSON
    Export {
        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Type {
            ref suffix,
            ref path,
            format,
        }) => {
            let tree = build_tree(path, &cli)?;
            run_type(&tree, suffix, format)?;
        }
        Some(Command::Find { ref name, ref path }) => {
            let tree = build_tree(path, &cli)?;
            run_find(&tree, name);
        }
        Some(Command::Tree {
            ref path,
            depth,
            all,
        }) => {
            let tree = build_tree(path, &cli)?;
            run_tree(&tree, if all { None } else { Some(depth) });
        }
        Some(Command::Export {
            ref path,
            ref output,
        }) => {
            let tree = build_tree(path, &cli)?;
            run_export(&tree, output.as_deref())?;
        }
        None => {
            let path = cli.path.clone();
            let tree = build_tree(&path, &cli)?;
            run_tree(&tree, Some(3));
        }
    }

    Ok(())
}

/// Walk the directory once; every subcommand queries the result.
fn build_tree(path: &PathBuf, cli: &Cli) -> Result<FileTree> {
    let config = WalkConfig::builder()
        .root(path.as_path())
        .include_hidden(!cli.no_hidden)
        .ignore_patterns(cli.ignore.clone())
        .build()
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;

    DirWalker::new()
        .walk(&config)
        .with_context(|| format!("Failed to walk {}", path.display()))
}

/// List files matching a path suffix.
fn run_type(tree: &FileTree, suffix: &str, format: OutputFormat) -> Result<()> {
    let paths = tree.files_of_type(suffix);

    match format {
        OutputFormat::Text => {
            for path in &paths {
                println!("{}", path.display());
            }
            eprintln!("{} file(s) matched", paths.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }

    Ok(())
}

/// Print the first file with the given exact name.
fn run_find(tree: &FileTree, name: &str) {
    match tree.find_file(name) {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!(
                "No file named {:?} under {}",
                name,
                tree.root_path.display()
            );
            std::process::exit(1);
        }
    }
}

/// Print the tree with a summary header.
fn run_tree(tree: &FileTree, max_depth: Option<u32>) {
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        tree.root_path.display(),
        format_size(tree.total_size())
    );
    println!(
        " {} files, {} directories",
        tree.total_files(),
        tree.total_dirs()
    );
    println!(" Walked in {:.2}s", tree.walk_duration.as_secs_f64());
    println!("{}", "─".repeat(60));

    print_node(tree, tree.root(), 0, max_depth.unwrap_or(u32::MAX));

    if tree.has_warnings() {
        println!();
        println!("{} warning(s) during walk", tree.warnings.len());
    }
}

/// Print a node and its children.
fn print_node(tree: &FileTree, id: NodeId, depth: u32, max_depth: u32) {
    let entry = tree.tree().data(id);
    let indent = "  ".repeat(depth as usize);

    let name = if depth == 0 {
        tree.root_path.display().to_string()
    } else {
        entry.name().to_string()
    };

    if entry.is_dir() {
        println!("{indent}{name}/");
    } else if entry.is_file() {
        println!("{indent}{name} ({})", format_size(entry.size()));
    } else {
        println!("{indent}{name}");
    }

    if entry.is_dir() && depth < max_depth {
        let children: Vec<_> = tree.tree().children(id).collect();
        let truncated = depth + 1 == max_depth
            && children.iter().any(|&c| !tree.tree().is_leaf(c));

        for child in &children {
            print_node(tree, *child, depth + 1, max_depth);
        }

        if truncated {
            let indent = "  ".repeat((depth + 1) as usize);
            println!("{indent}...");
        }
    }
}

/// Export the whole tree as JSON.
fn run_export(tree: &FileTree, output: Option<&std::path::Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(tree)?;

    match output {
        Some(output_path) => {
            std::fs::write(output_path, json)?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
