use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use dtree_rs::config::Settings;
use dtree_rs::tree::{answers_from_json, tree_schema, Engine, TreeFormat, TreeLoader};
use dtree_rs::DtreeError;

use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a tree file is well-formed
    Validate {
        /// Path to the tree file (JSON or YAML)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Walk a tree with the given answers
    Decide {
        /// Path to the tree file (JSON or YAML)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Answers as a JSON object, e.g. '{"ShouldBuy": true}'
        #[arg(short, long)]
        input: String,
    },
    /// Print tree statistics
    Inspect {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Re-serialize a tree in another format
    Convert {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        to: OutputFormat,
    },
    /// Print the JSON Schema of the tree file format
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for TreeFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => TreeFormat::Json,
            OutputFormat::Yaml => TreeFormat::Yaml,
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), DtreeError> {
    let settings = Settings::from_env()?;
    let loader = TreeLoader::new();

    match args.command {
        Commands::Validate { file } => {
            let path = settings.resolve_tree_file(file)?;
            let tree = loader.load_tree(&path)?;
            println!("{}: ok ({} nodes)", path.display(), tree.node_count());
        }
        Commands::Decide { file, input } => {
            let tree = loader.load_tree(settings.resolve_tree_file(file)?)?;
            let answers = answers_from_json(&input)?;
            let engine = Engine::new(settings.engine);

            let decision = engine.decide(&tree, &answers)?;
            log::info!("Decision path: {}", decision.path.join(" -> "));

            match decision.leaf {
                Some(leaf) => println!("Leaf: {} (node_id {})", leaf.predict, leaf.id),
                None => println!("Leaf: none"),
            }
            if let Some(result) = decision.result {
                println!("Result: {}", result);
            }
        }
        Commands::Inspect { file } => {
            let tree = loader.load_tree(settings.resolve_tree_file(file)?)?;
            println!("Root: {}", tree.root().predict);
            println!("Nodes: {}", tree.node_count());
            println!("Depth: {}", tree.depth());
            println!("Predicates: {}", tree.predicates().join(", "));
            let leaves: Vec<&str> = tree.leaves().iter().map(|n| n.predict.as_str()).collect();
            println!("Leaves: {}", leaves.join(", "));
        }
        Commands::Convert { file, to } => {
            let tree = loader.load_tree(settings.resolve_tree_file(file)?)?;
            println!("{}", TreeLoader::render(&tree, to.into())?);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(tree_schema())?);
        }
    }

    Ok(())
}
