use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::cli::Invocation;
use crate::notify::{Notice, Notifier};
use crate::render::Renderer;
use crate::store::{AddError, TaskStore};
use crate::task::{Category, Task};
use crate::theme::{ThemeMode, ThemeProvider};
use crate::view::{self, StatusFilter};

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "list", "done", "delete", "category", "stats", "theme", "export", "help", "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, themes, renderer, notifier, inv))]
pub fn dispatch(
    store: &mut TaskStore,
    themes: &ThemeProvider,
    renderer: &mut Renderer,
    notifier: &Notifier,
    inv: Invocation,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let command = inv.command.as_str();

    debug!(command, args = ?inv.args, "dispatching command");

    match command {
        "add" => cmd_add(store, notifier, &inv.args, now),
        "list" => cmd_list(store, renderer, &inv.args),
        "done" => cmd_done(store, &inv.args),
        "delete" => cmd_delete(store, notifier, &inv.args),
        "category" => cmd_category(store, &inv.args),
        "stats" => cmd_stats(store, renderer),
        "theme" => cmd_theme(themes, &inv.args),
        "export" => cmd_export(store),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(store, notifier, args, now))]
fn cmd_add(
    store: &mut TaskStore,
    notifier: &Notifier,
    args: &[String],
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command add");

    let (text, category) = parse_text_and_category(args)?;
    match store.add(&text, category, now) {
        Ok(task) => {
            notifier.emit(Notice::info(
                "Task added",
                "Your new task has been added successfully",
            ));
            println!("Created task {}.", task.short_id());
            Ok(())
        }
        Err(AddError::EmptyText) => {
            notifier.emit(Notice::error(
                "Task cannot be empty",
                "Please enter a task description",
            ));
            Ok(())
        }
        Err(AddError::Persist(err)) => Err(err),
    }
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(store: &TaskStore, renderer: &mut Renderer, args: &[String]) -> anyhow::Result<()> {
    info!("command list");

    let filter = match args.first() {
        None => StatusFilter::All,
        Some(token) => StatusFilter::parse(token).ok_or_else(|| {
            anyhow!("invalid filter: {token} (expected all, active or completed)")
        })?,
    };

    debug!(filter = filter.name(), "rendering visible tasks");
    let rows = view::visible(store.tasks(), filter);
    renderer.print_task_list(&rows, filter)?;
    renderer.print_progress(view::stats(store.tasks()))?;
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_done(store: &mut TaskStore, args: &[String]) -> anyhow::Result<()> {
    info!("command done");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("done requires a task id"))?;
    let Some(id) = resolve_task_id(store.tasks(), token) else {
        debug!(token = %token, "no matching task; nothing to toggle");
        return Ok(());
    };

    match store.toggle(id)? {
        Some(true) => println!("Completed task {}.", short(&id)),
        Some(false) => println!("Task {} is active again.", short(&id)),
        None => {}
    }
    Ok(())
}

#[instrument(skip(store, notifier, args))]
fn cmd_delete(store: &mut TaskStore, notifier: &Notifier, args: &[String]) -> anyhow::Result<()> {
    info!("command delete");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("delete requires a task id"))?;
    let Some(id) = resolve_task_id(store.tasks(), token) else {
        debug!(token = %token, "no matching task; nothing to delete");
        return Ok(());
    };

    if store.delete(id)?.is_some() {
        notifier.emit(Notice::info("Task deleted", "The task has been removed"));
        println!("Deleted task {}.", short(&id));
    }
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_category(store: &mut TaskStore, args: &[String]) -> anyhow::Result<()> {
    info!("command category");

    let [id_token, category_token] = args else {
        return Err(anyhow!("category requires a task id and a category name"));
    };
    let category = Category::parse(category_token)
        .ok_or_else(|| anyhow!("invalid category: {category_token}"))?;

    let Some(id) = resolve_task_id(store.tasks(), id_token) else {
        debug!(token = %id_token, "no matching task; nothing to recategorize");
        return Ok(());
    };

    if store.set_category(id, category)? {
        println!("Task {} categorized as {}.", short(&id), category.name());
    }
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_stats(store: &TaskStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command stats");

    renderer.print_progress(view::stats(store.tasks()))
}

#[instrument(skip(themes, args))]
fn cmd_theme(themes: &ThemeProvider, args: &[String]) -> anyhow::Result<()> {
    info!("command theme");

    match args.first() {
        None => {
            println!("{}", themes.get().storage_value());
            Ok(())
        }
        Some(token) => {
            let mode = ThemeMode::parse(token)
                .ok_or_else(|| anyhow!("invalid theme: {token} (expected light or dark)"))?;
            themes.set(mode)?;
            println!("Theme set to {}.", mode.storage_value());
            Ok(())
        }
    }
}

#[instrument(skip(store))]
fn cmd_export(store: &TaskStore) -> anyhow::Result<()> {
    info!("command export");

    let out = serde_json::to_string(store.tasks())?;
    println!("{out}");
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: add, list, done, delete, category, stats, theme, export, help, version"
    );
    Ok(())
}

/// Splits add arguments into the task text and an optional category picked
/// from a `category:<name>` (or `category=<name>`) token. A `--` token makes
/// everything after it literal text.
fn parse_text_and_category(args: &[String]) -> anyhow::Result<(String, Category)> {
    let mut text_parts = Vec::new();
    let mut category = Category::None;

    let mut literal = false;
    for arg in args {
        if arg == "--" {
            literal = true;
            continue;
        }

        if !literal && let Some(value) = parse_category_token(arg)? {
            category = value;
            continue;
        }

        text_parts.push(arg.clone());
    }

    Ok((text_parts.join(" "), category))
}

fn parse_category_token(tok: &str) -> anyhow::Result<Option<Category>> {
    let (key, value) = if let Some((k, v)) = tok.split_once(':') {
        (k, v)
    } else if let Some((k, v)) = tok.split_once('=') {
        (k, v)
    } else {
        return Ok(None);
    };

    match key.to_ascii_lowercase().as_str() {
        "cat" | "category" => Category::parse(value)
            .map(Some)
            .ok_or_else(|| anyhow!("invalid category: {value}")),
        _ => Ok(None),
    }
}

/// Accepts a full uuid or a unique id prefix. Anything that matches zero or
/// several tasks resolves to nothing.
fn resolve_task_id(tasks: &[Task], token: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(token) {
        return Some(id);
    }

    let needle = token.to_ascii_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&needle));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first.id)
    }
}

fn short(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{
        expand_command_abbrev, known_command_names, parse_text_and_category, resolve_task_id,
    };
    use crate::task::{Category, Task};

    #[test]
    fn unique_command_prefixes_expand() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("a", &known), Some("add"));
        assert_eq!(expand_command_abbrev("exp", &known), Some("export"));
        assert_eq!(expand_command_abbrev("list", &known), Some("list"));
    }

    #[test]
    fn ambiguous_or_unknown_prefixes_do_not_expand() {
        let known = known_command_names();
        // "d" matches both done and delete.
        assert_eq!(expand_command_abbrev("d", &known), None);
        assert_eq!(expand_command_abbrev("frobnicate", &known), None);
    }

    #[test]
    fn add_args_split_into_text_and_category() {
        let args = vec![
            "Buy".to_string(),
            "milk".to_string(),
            "category:personal".to_string(),
        ];
        let (text, category) = parse_text_and_category(&args).unwrap();
        assert_eq!(text, "Buy milk");
        assert_eq!(category, Category::Personal);
    }

    #[test]
    fn category_defaults_to_none_and_invalid_names_error() {
        let (_, category) = parse_text_and_category(&["Buy milk".to_string()]).unwrap();
        assert_eq!(category, Category::None);

        let err = parse_text_and_category(&["x".to_string(), "category:chores".to_string()]);
        assert!(err.is_err());
    }

    #[test]
    fn literal_marker_keeps_colon_tokens_in_the_text() {
        let args = vec![
            "--".to_string(),
            "read".to_string(),
            "category:theory".to_string(),
        ];
        let (text, category) = parse_text_and_category(&args).unwrap();
        assert_eq!(text, "read category:theory");
        assert_eq!(category, Category::None);
    }

    #[test]
    fn id_prefixes_resolve_only_when_unique() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let tasks: Vec<Task> = (0..4)
            .map(|idx| Task::new(format!("task {idx}"), Category::None, now))
            .collect();

        let full = tasks[0].id.to_string();
        assert_eq!(resolve_task_id(&tasks, &full), Some(tasks[0].id));
        assert_eq!(resolve_task_id(&tasks, &full[..8]), Some(tasks[0].id));
        assert_eq!(resolve_task_id(&tasks, ""), None);
        assert_eq!(resolve_task_id(&tasks, "zzzz"), None);
    }
}
