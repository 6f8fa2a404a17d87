//! CLI entry point for MAYA

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Select};
use maya_agent::Assistant;
use maya_core::config::{Config, ConfigLoader};
use maya_core::session::TranscriptManager;
use maya_core::todo::{Priority, TodoItem, TodoStore};
use maya_core::utils::{format_date, greeting};
use maya_providers::{ChatProvider, ProviderRegistry};
use maya_tools::{
    AppendFileTool, EditorBridge, FileInfoTool, ListDirTool, OpenInEditorTool, ReadFileTool, Tool,
    TodoTool, ToolRegistry, WebFetchTool, WebSearchTool, WriteFileTool,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "maya")]
#[command(about = "MAYA, a personal AI assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize MAYA configuration
    Onboard,
    /// Start an interactive chat session
    Chat {
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,
        /// Transcript to resume
        #[arg(short, long)]
        session: Option<String>,
        /// Send one message and exit instead of starting the REPL
        #[arg(long)]
        message: Option<String>,
    },
    /// Ask a single question and exit
    Ask {
        /// The question to ask
        message: String,
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Manage the task list
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },
    /// Manage saved conversation transcripts
    Transcripts {
        #[command(subcommand)]
        command: TranscriptCommands,
    },
    /// Open a file in the configured editor
    Open {
        /// File path to open
        path: PathBuf,
        /// Line number to jump to
        #[arg(short, long)]
        line: Option<u32>,
    },
    /// Open a folder in the configured editor
    OpenFolder {
        /// Folder path to open
        path: PathBuf,
    },
    /// Compare two files side by side in the configured editor
    Diff {
        /// Left-hand file
        left: PathBuf,
        /// Right-hand file
        right: PathBuf,
    },
    /// Search the web
    Search {
        /// Search query
        query: String,
        /// Number of results
        #[arg(short, long)]
        count: Option<u32>,
    },
    /// Fetch a URL and print its readable text
    Fetch {
        /// URL to fetch
        url: String,
    },
    /// Show configuration and data status
    Status,
}

#[derive(Subcommand)]
enum TodoCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        /// Priority: 1 high, 2 medium, 3 low
        #[arg(short, long)]
        priority: Option<u8>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only overdue tasks
        #[arg(long)]
        overdue: bool,
    },
    /// Toggle a task's completion state
    Done {
        /// Task number from `maya todo list`
        number: usize,
    },
    /// Remove a task
    Remove {
        /// Task number from `maya todo list`
        number: usize,
    },
}

#[derive(Subcommand)]
enum TranscriptCommands {
    /// List saved transcripts
    List,
    /// Delete a transcript
    Delete {
        /// Transcript name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let loader = match cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    // Onboard runs before a config exists, so skip loading for it.
    if matches!(cli.command, Commands::Onboard) {
        return run_onboard(&loader).await;
    }

    let config = loader.load()?;
    let mut logging = config.logging.clone();
    if PathBuf::from(&logging.dir).is_relative() {
        logging.dir = data_dir(&config).join(&logging.dir).display().to_string();
    }
    let _guard = maya_core::logging::init_logging(&logging);

    match cli.command {
        Commands::Onboard => unreachable!(),
        Commands::Chat {
            model,
            session,
            message,
        } => match message {
            Some(message) => run_ask(config, &message, model).await?,
            None => run_chat(config, model, session).await?,
        },
        Commands::Ask { message, model } => run_ask(config, &message, model).await?,
        Commands::Todo { command } => run_todo(&config, command)?,
        Commands::Transcripts { command } => run_transcripts(&config, command)?,
        Commands::Open { path, line } => {
            let bridge = editor_bridge(&config);
            bridge.open_file(&path, line, None).await?;
            println!("Opened {} in editor", path.display());
        }
        Commands::OpenFolder { path } => {
            let bridge = editor_bridge(&config);
            bridge.open_folder(&path).await?;
            println!("Opened {} in editor", path.display());
        }
        Commands::Diff { left, right } => {
            let bridge = editor_bridge(&config);
            bridge.diff(&left, &right).await?;
            println!(
                "Opened diff of {} and {} in editor",
                left.display(),
                right.display()
            );
        }
        Commands::Search { query, count } => {
            let tool = WebSearchTool::new(
                Some(config.tools.web.search.api_key.clone()),
                config.tools.web.search.max_results as usize,
            );
            let mut params = serde_json::json!({ "query": query });
            if let Some(count) = count {
                params["count"] = serde_json::json!(count);
            }
            println!("{}", tool.execute(params).await?);
        }
        Commands::Fetch { url } => {
            let tool = WebFetchTool::new();
            println!("{}", tool.execute(serde_json::json!({ "url": url })).await?);
        }
        Commands::Status => run_status(&loader, &config)?,
    }

    Ok(())
}

fn data_dir(config: &Config) -> PathBuf {
    expand_tilde(&config.assistant.data_dir)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn editor_bridge(config: &Config) -> EditorBridge {
    let command = config.tools.editor.command.trim();
    EditorBridge::discover(if command.is_empty() {
        None
    } else {
        Some(command)
    })
}

fn todo_store(config: &Config) -> maya_core::Result<TodoStore> {
    TodoStore::open(data_dir(config).join("todos.json"))
}

fn build_tool_registry(config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let data = data_dir(config);
    let allowed_dir = config.tools.restrict_to_data_dir.then(|| data.clone());

    registry.register(Arc::new(WebSearchTool::new(
        Some(config.tools.web.search.api_key.clone()),
        config.tools.web.search.max_results as usize,
    )));
    registry.register(Arc::new(WebFetchTool::new()));
    registry.register(Arc::new(ReadFileTool::new(allowed_dir.clone())));
    registry.register(Arc::new(WriteFileTool::new(allowed_dir.clone())));
    registry.register(Arc::new(AppendFileTool::new(allowed_dir.clone())));
    registry.register(Arc::new(FileInfoTool::new(allowed_dir.clone())));
    registry.register(Arc::new(ListDirTool::new(allowed_dir)));
    registry.register(Arc::new(OpenInEditorTool::new(editor_bridge(config))));
    registry.register(Arc::new(TodoTool::new(data.join("todos.json"))));

    registry
}

fn build_provider(config: &Config, model: &str) -> Result<Arc<dyn ChatProvider>> {
    ProviderRegistry::new()
        .client_from_config(&config.providers, model)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No provider configured. Run `maya onboard` or set GROQ_API_KEY."
            )
        })
}

fn build_assistant(config: &Config, model: Option<String>) -> Result<Assistant> {
    let mut session_config = config.assistant.session_config();
    if let Some(model) = model {
        session_config.model = model;
    }
    let provider = build_provider(config, &session_config.model)?;
    Ok(Assistant::new(session_config, provider))
}

/// Run the onboard wizard
async fn run_onboard(loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("Welcome to MAYA!").bold().cyan());
    println!("Let's set up your configuration.\n");

    let config_path = loader.config_dir().join("config.json");
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt("Configuration already exists. Overwrite?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Onboard cancelled.");
            return Ok(());
        }
    }

    let providers = vec!["groq", "openai", "openrouter", "custom"];
    let provider_idx = Select::new()
        .with_prompt("Select your completion provider")
        .items(&providers)
        .default(0)
        .interact()?;
    let provider_name = providers[provider_idx];

    let api_key: String = Input::new()
        .with_prompt(format!("Enter your {} API key", provider_name))
        .interact_text()?;

    let registry = ProviderRegistry::new();
    let default_model = registry
        .find_by_name(provider_name)
        .map(|spec| spec.default_model.to_string())
        .unwrap_or_else(|| "llama-3.3-70b-versatile".to_string());
    let model: String = Input::new()
        .with_prompt("Enter the model to use")
        .default(default_model)
        .interact_text()?;

    let mut config = Config::default();
    config.assistant.model = model;
    match provider_name {
        "groq" => config.providers.groq.api_key = api_key,
        "openai" => config.providers.openai.api_key = api_key,
        "openrouter" => config.providers.openrouter.api_key = api_key,
        "custom" => {
            config.providers.custom.api_key = api_key;
            let api_base: String = Input::new()
                .with_prompt("Enter the API base URL")
                .interact_text()?;
            config.providers.custom.api_base = Some(api_base);
        }
        _ => {}
    }

    loader.save(&config)?;
    maya_core::utils::ensure_dir(data_dir(&config));

    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    println!("Config location: {}", config_path.display());
    println!("\nYou can now run:");
    println!("  {} - Start chatting", style("maya chat").cyan());
    println!("  {} - Ask one question", style("maya ask \"...\"").cyan());
    Ok(())
}

/// Interactive chat session
async fn run_chat(config: Config, model: Option<String>, session: Option<String>) -> Result<()> {
    let mut assistant = build_assistant(&config, model)?;
    let transcripts = TranscriptManager::new(data_dir(&config));
    let tools = build_tool_registry(&config);

    if let Some(name) = &session {
        transcripts.load(name, assistant.session_mut())?;
        println!("Resumed transcript {}", style(name).cyan());
    }

    info!(model = %assistant.session().config().model, "chat session started");

    println!(
        "{} {}",
        style(greeting()).bold().cyan(),
        style("I'm MAYA. How can I help?").bold()
    );
    println!(
        "{}",
        style("Type /help for commands, /quit to leave.").dim()
    );

    loop {
        let input: String = Input::new()
            .with_prompt(style("You").green().to_string())
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            if handle_slash_command(command, &mut assistant, &transcripts, &tools).await? {
                break;
            }
            continue;
        }

        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            println!("{}", style("Goodbye!").cyan());
            break;
        }

        match assistant.send(input).await {
            Ok(reply) => {
                println!("{} {}", style("MAYA:").magenta().bold(), reply);
            }
            Err(e) => {
                warn!(error = %e, "turn failed");
                println!("{} {}", style("Error:").red().bold(), e);
            }
        }
    }

    Ok(())
}

/// Handle a /command in the chat loop. Returns true to exit.
async fn handle_slash_command(
    command: &str,
    assistant: &mut Assistant,
    transcripts: &TranscriptManager,
    tools: &ToolRegistry,
) -> Result<bool> {
    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match name {
        "quit" | "exit" => {
            println!("{}", style("Goodbye!").cyan());
            return Ok(true);
        }
        "clear" => {
            assistant.session_mut().clear();
            println!("Conversation cleared.");
        }
        "save" => match arg {
            Some(name) => {
                let path = transcripts.save(name, assistant.session())?;
                println!("Saved transcript to {}", path.display());
            }
            None => println!("Usage: /save NAME"),
        },
        "load" => match arg {
            Some(name) => match transcripts.load(name, assistant.session_mut()) {
                Ok(()) => println!(
                    "Loaded transcript {} ({} messages)",
                    name,
                    assistant.session().len()
                ),
                Err(e) => println!("{} {}", style("Error:").red().bold(), e),
            },
            None => println!("Usage: /load NAME"),
        },
        "transcripts" => {
            let list = transcripts.list();
            if list.is_empty() {
                println!("No saved transcripts.");
            } else {
                for info in list {
                    println!(
                        "  {} ({})",
                        info.name,
                        info.updated_at.as_deref().unwrap_or("unknown time")
                    );
                }
            }
        }
        "tools" => {
            let mut names = tools.tool_names();
            names.sort();
            println!("Available tools: {}", names.join(", "));
        }
        "tool" => match arg {
            Some(rest) => {
                let mut parts = rest.splitn(2, ' ');
                let tool_name = parts.next().unwrap_or("");
                let params = match parts.next() {
                    Some(raw) => match serde_json::from_str(raw) {
                        Ok(value) => value,
                        Err(e) => {
                            println!("Invalid JSON parameters: {}", e);
                            return Ok(false);
                        }
                    },
                    None => serde_json::json!({}),
                };
                println!("{}", tools.execute(tool_name, params).await);
            }
            None => println!("Usage: /tool NAME {{\"param\": \"value\"}}"),
        },
        "help" => {
            println!(
                "Commands: /clear /save NAME /load NAME /transcripts /tools /tool NAME ARGS /quit"
            );
        }
        other => println!("Unknown command: /{}", other),
    }

    Ok(false)
}

/// One-shot question
async fn run_ask(config: Config, message: &str, model: Option<String>) -> Result<()> {
    let mut assistant = build_assistant(&config, model)?;
    let reply = assistant.send(message).await?;
    println!("{}", reply);
    Ok(())
}

fn run_todo(config: &Config, command: TodoCommands) -> Result<()> {
    let mut store = todo_store(config)?;

    match command {
        TodoCommands::Add {
            title,
            due,
            priority,
            category,
        } => {
            let mut item = TodoItem::new(title.trim());
            if let Some(due) = due {
                item.due_date = Some(due.parse()?);
            }
            if let Some(code) = priority {
                item.priority = Priority::try_from(code).map_err(anyhow::Error::msg)?;
            }
            if let Some(category) = category {
                if !category.trim().is_empty() {
                    item.category = category.trim().to_string();
                }
            }
            let title = item.title.clone();
            store.add(item)?;
            println!("Added task: {}", style(&title).green());
        }
        TodoCommands::List { category, overdue } => {
            let items: Vec<(usize, &TodoItem)> = store
                .all()
                .iter()
                .enumerate()
                .filter(|(_, item)| category.as_deref().map_or(true, |c| item.category == c))
                .filter(|(_, item)| !overdue || item.is_overdue())
                .collect();

            if items.is_empty() {
                println!("No tasks.");
                return Ok(());
            }

            for (i, item) in items {
                let mark = if item.completed {
                    style("[x]").green()
                } else {
                    style("[ ]").dim()
                };
                let mut line = format!(
                    "{}. {} {} ({}, {})",
                    i + 1,
                    mark,
                    item.title,
                    item.priority.name(),
                    item.category
                );
                if let Some(due) = item.due_date {
                    line.push_str(&format!(", due {}", format_date(due)));
                }
                if item.is_overdue() {
                    line.push_str(&format!(" {}", style("OVERDUE").red().bold()));
                } else if item.is_due_today() {
                    line.push_str(&format!(" {}", style("due today").yellow()));
                }
                println!("{}", line);
            }
        }
        TodoCommands::Done { number } => {
            let index = checked_index(number, store.all().len())?;
            let title = store.all()[index].title.clone();
            if store.toggle_complete(index)? {
                println!("Completed task: {}", style(&title).green());
            } else {
                println!("Reopened task: {}", title);
            }
        }
        TodoCommands::Remove { number } => {
            let index = checked_index(number, store.all().len())?;
            let removed = store.delete(index)?;
            println!("Removed task: {}", removed.title);
        }
    }

    Ok(())
}

fn checked_index(number: usize, len: usize) -> Result<usize> {
    if number == 0 || number > len {
        anyhow::bail!("Task number {} is out of range (1-{})", number, len);
    }
    Ok(number - 1)
}

fn run_transcripts(config: &Config, command: TranscriptCommands) -> Result<()> {
    let transcripts = TranscriptManager::new(data_dir(config));

    match command {
        TranscriptCommands::List => {
            let list = transcripts.list();
            if list.is_empty() {
                println!("No saved transcripts.");
                return Ok(());
            }
            println!("{}", style("Saved transcripts:").bold());
            for info in list {
                println!(
                    "  {} ({}, model {})",
                    style(&info.name).cyan(),
                    info.updated_at.as_deref().unwrap_or("unknown time"),
                    info.model.as_deref().unwrap_or("unknown")
                );
            }
        }
        TranscriptCommands::Delete { name } => {
            if transcripts.delete(&name)? {
                println!("Deleted transcript {}", name);
            } else {
                println!("No transcript named {}", name);
            }
        }
    }

    Ok(())
}

fn run_status(loader: &ConfigLoader, config: &Config) -> Result<()> {
    println!("{}", style("MAYA Status").bold().cyan());
    println!("Version: {}\n", env!("CARGO_PKG_VERSION"));

    println!("{}", style("Configuration:").bold());
    println!("  Config directory: {}", loader.config_dir().display());
    println!("  Data directory: {}", data_dir(config).display());
    println!("  Model: {}", config.assistant.model);
    println!("  Window size: {} messages", config.assistant.max_messages);
    println!();

    println!("{}", style("Providers:").bold());
    for (name, provider) in [
        ("groq", &config.providers.groq),
        ("openai", &config.providers.openai),
        ("openrouter", &config.providers.openrouter),
        ("custom", &config.providers.custom),
    ] {
        let configured = !provider.api_key.trim().is_empty()
            || provider
                .api_base
                .as_deref()
                .map_or(false, |b| !b.trim().is_empty());
        let status = if configured {
            style("configured").green()
        } else {
            style("not configured").dim()
        };
        println!("  {}: {}", name, status);
    }
    println!();

    println!("{}", style("Tools:").bold());
    let search = if config.tools.web.search.api_key.trim().is_empty()
        && std::env::var("BRAVE_API_KEY").is_err()
    {
        style("not configured").dim()
    } else {
        style("configured").green()
    };
    println!("  Web search: {}", search);

    let bridge = editor_bridge(config);
    match bridge.command() {
        Some(path) => println!("  Editor: {}", style(path.display()).green()),
        None => println!("  Editor: {}", style("not found").dim()),
    }
    println!();

    let transcripts = TranscriptManager::new(data_dir(config));
    println!("{}", style("Data:").bold());
    println!("  Transcripts: {}", transcripts.list().len());
    match todo_store(config) {
        Ok(store) => {
            let total = store.all().len();
            let open = store.all().iter().filter(|t| !t.completed).count();
            println!("  Tasks: {} ({} open)", total, open);
        }
        Err(e) => println!("  Tasks: unavailable ({})", e),
    }

    Ok(())
}
