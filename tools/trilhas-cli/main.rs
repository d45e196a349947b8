use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use trilhas::config::GatewayConfig;
use trilhas::prelude::*;

/// Browse and edit a sales playbook from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000/api
    #[arg(long, global = true, env = "API_BASE_URL")]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the step tree
    Tree {
        /// Only show steps matching this term, with their ancestors expanded
        #[arg(short, long)]
        search: Option<String>,
        /// Select a step and expand the path leading to it
        #[arg(long)]
        select: Option<NodeId>,
        /// Read the tree from a JSON file in backend format instead of the backend
        #[arg(long)]
        from_file: Option<PathBuf>,
        /// Expand every step
        #[arg(long)]
        expand_all: bool,
    },
    /// Print one step with its documents, products and next steps
    Show {
        id: NodeId,
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Create a step
    Create {
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        title: Option<String>,
        /// Parent step; omit to create a root step
        #[arg(short, long)]
        parent: Option<NodeId>,
        /// Comma-separated ids of the steps this one leads to (root steps only)
        #[arg(long)]
        go_to: Option<String>,
        /// Files to attach
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
    /// Move a step within its sibling group
    Move {
        /// Parent of the sibling group; omit for the root steps
        #[arg(long)]
        parent: Option<NodeId>,
        /// Current 0-based position
        #[arg(long)]
        from: usize,
        /// Target 0-based position
        #[arg(long)]
        to: usize,
        /// Put the previous order back if saving fails
        #[arg(long)]
        restore_on_failure: bool,
    },
    /// Delete a step that has no child steps
    Delete { id: NodeId },
    /// List products
    Products,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        exit_with_error(&e.to_string());
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Tree {
            search,
            select,
            from_file,
            expand_all,
        } => {
            let tree = load_tree(cli.api_base_url.as_deref(), from_file.as_deref()).await?;
            print_tree(&tree, search.as_deref(), select, expand_all);
        }
        Command::Show { id, from_file } => {
            let tree = load_tree(cli.api_base_url.as_deref(), from_file.as_deref()).await?;
            match find(&tree, id) {
                Some(node) => print!("{}", TreeFormatter::render_details(node, &tree)),
                None => exit_with_error(&format!("Step {id} was not found")),
            }
        }
        Command::Create {
            description,
            title,
            parent,
            go_to,
            files,
        } => {
            let gateway = connect(cli.api_base_url.as_deref())?;
            let mut fields = NewDecision::new(description);
            fields.title = title;
            fields.parent_id = parent;
            fields.go_to = go_to.as_deref().map(GoTo::parse);
            for path in &files {
                fields.files.push(read_upload(path).await?);
            }

            let mut store = TrilhaStore::new();
            match store.create(&gateway, &fields).await {
                Ok(node) => println!("Created step #{} {}", node.id, node.display_name()),
                Err(e) => report_gateway_error(&e),
            }
        }
        Command::Move {
            parent,
            from,
            to,
            restore_on_failure,
        } => {
            let gateway = connect(cli.api_base_url.as_deref())?;
            let mut store = TrilhaStore::new();
            store.reload(&gateway).await?;

            let policy = if restore_on_failure {
                RollbackPolicy::Restore
            } else {
                RollbackPolicy::KeepOptimistic
            };
            let group = parent.map_or(SiblingGroup::Root, SiblingGroup::ChildrenOf);
            let mut controller = ReorderController::new(policy);
            let outcome = controller
                .run(&mut store, &gateway, DragOutcome::Dropped { group, from, to })
                .await?;

            match outcome {
                ReorderOutcome::Unchanged => println!("Nothing to move."),
                ReorderOutcome::Persisted => {
                    if let Some(notice) = controller.feedback().active_success(Instant::now()) {
                        println!("{notice}");
                    }
                    print_tree(store.tree(), None, None, false);
                }
                ReorderOutcome::Failed(e) => report_gateway_error(&e),
            }
        }
        Command::Delete { id } => {
            let gateway = connect(cli.api_base_url.as_deref())?;
            let mut store = TrilhaStore::new();
            match store.delete(&gateway, id).await {
                Ok(()) => println!("Deleted step #{id}"),
                Err(e) => report_gateway_error(&e),
            }
        }
        Command::Products => {
            let gateway = connect(cli.api_base_url.as_deref())?;
            let mut catalog = ProductCatalog::new();
            catalog.load(&gateway).await?;
            for product in catalog.products() {
                let price = product
                    .price
                    .map(|p| format!("{p:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                let status = if product.active { "" } else { " (inactive)" };
                println!(
                    "#{:<5} {:<8} {:>10}  {}{}",
                    product.id,
                    product.kind.as_wire(),
                    price,
                    product.name,
                    status
                );
            }
        }
    }
    Ok(())
}

fn connect(base_url: Option<&str>) -> Result<HttpGateway> {
    let config = GatewayConfig::from_lookup_with_base_url(base_url, |var| std::env::var(var).ok())?;
    Ok(HttpGateway::builder(config).build()?)
}

async fn load_tree(base_url: Option<&str>, from_file: Option<&Path>) -> Result<Vec<DecisionNode>> {
    if let Some(path) = from_file {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let raw: Vec<ApiNode> = serde_json::from_str(&json)?;
        return Ok(normalize(raw));
    }

    let gateway = connect(base_url)?;
    let mut store = TrilhaStore::new();
    store.reload(&gateway).await?;
    Ok(store.tree().to_vec())
}

fn print_tree(tree: &[DecisionNode], search: Option<&str>, select: Option<NodeId>, expand_all: bool) {
    let mut nav = Navigator::new();
    if expand_all {
        for node in flatten(tree) {
            nav.toggle(node);
        }
    }
    if let Some(id) = select {
        if !nav.select_by_id(tree, id) {
            eprintln!("Step {id} is not in the tree.");
        }
    }

    let visible = match search {
        Some(term) => nav.set_search_term(tree, term),
        None => nav.visible(tree),
    };
    if visible.is_empty() {
        println!("No steps found.");
        return;
    }
    print!("{}", TreeFormatter::render(&visible, &nav));
}

async fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileUpload::new(file_name, bytes))
}

fn report_gateway_error(err: &GatewayError) {
    let rejections = err.file_rejections();
    if rejections.is_empty() {
        exit_with_error(&err.user_message());
    }
    eprintln!("\nSome files were rejected:");
    for rejection in rejections {
        eprintln!("  - {}: {}", rejection.file_name, rejection.reason);
    }
    std::process::exit(1);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
