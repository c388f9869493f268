use clap::{CommandFactory, Parser};
use falcon_cli::cli::{Cli, Command, collect_overrides};
use falcon_cli::output;
use falcon_core::calendar::{self, parse_date, parse_weekday};
use falcon_core::clipboard::{Clipboard, CopyOutcome, clipboard_from_env, copy_with_fallback};
use falcon_core::config::{
    Config, Palette, load_config_with_fallback, merge_overrides, palette_for_theme,
};
use falcon_core::error::AppError;
use falcon_core::model::{NewTask, Task};
use falcon_core::session::{self, LocalSession};
use falcon_core::share;
use falcon_core::storage::snapshot::SNAPSHOT_FILE_NAME;
use std::io::{self, BufRead};
use std::path::PathBuf;

const LOG_ENV_VAR: &str = "FALCON_LOG";

struct App {
    session: LocalSession,
    config: Config,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    fn open() -> Result<Self, AppError> {
        let load = load_config_with_fallback();
        if let Some(err) = load.error {
            log::warn!("using default config: {err}");
        }

        let session = session::open_local(&load.config, calendar::today()?)?;
        log::debug!("session opened from {:?}", session.origin());
        Ok(Self {
            session,
            config: load.config,
            clipboard: clipboard_from_env(),
        })
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV_VAR, "warn"))
        .format_timestamp(None)
        .init();
}

fn print_task(task: &Task, verb: &str, json: bool, palette: &Palette) -> Result<(), AppError> {
    if json {
        println!("{}", output::task_json(task)?);
    } else {
        println!("{verb}: {} ({})", palette.accentize(&task.title), task.id);
    }
    Ok(())
}

fn copy_and_report(clipboard: &dyn Clipboard, label: &str, text: &str, json: bool) {
    let outcome = copy_with_fallback(clipboard, text);
    if json {
        let json = serde_json::json!({
            "text": text,
            "copied": outcome == CopyOutcome::Copied,
        });
        println!("{json}");
        return;
    }

    match outcome {
        CopyOutcome::Copied => println!("Copied {label}: {text}"),
        CopyOutcome::Fallback { error } => {
            eprintln!("NOTICE: {error}; copy the {label} manually");
            println!("{}", output::render_manual_copy(text));
        }
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, app: &mut App) -> Result<(), AppError> {
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&app.config, &overrides);
    let palette = palette_for_theme(config.theme.as_deref());
    let json = cli.json;

    match cli.command {
        Command::Add {
            title,
            date,
            repeat,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };
            let due_date = date.as_deref().map(parse_date).transpose()?;
            let repeat_days = repeat
                .iter()
                .filter(|day| !day.trim().is_empty())
                .map(|day| parse_weekday(day))
                .collect::<Result<Vec<_>, _>>()?;

            let task = app.session.add_task(NewTask {
                title,
                due_date,
                repeat_days,
            })?;
            print_task(&task, "Added task", json, &palette)?;
        }
        Command::Done { id } => {
            let task = app.session.toggle_done(id)?;
            let verb = if task.completed_on == Some(app.session.today()) {
                "Completed task"
            } else {
                "Reopened task"
            };
            print_task(&task, verb, json, &palette)?;
        }
        Command::Remove { id } => {
            let task = app.session.remove(id)?;
            print_task(&task, "Removed task", json, &palette)?;
        }
        Command::Restore { id } => {
            let task = app.session.restore(id)?;
            print_task(&task, "Restored task", json, &palette)?;
        }
        Command::Purge { id } => {
            let task = app.session.delete_forever(id)?;
            print_task(&task, "Deleted task", json, &palette)?;
        }
        Command::Unschedule { id } => {
            let task = app.session.clear_schedule(id)?;
            print_task(&task, "Unscheduled task", json, &palette)?;
        }
        Command::List { view } => {
            let tasks = app.session.visible(view);
            if json {
                println!("{}", output::tasks_json(&tasks)?);
            } else {
                println!("{}", output::render_tasks_plain(&tasks, view, &palette));
            }
        }
        Command::Summary { scope } => {
            let scope = match scope {
                Some(scope) => scope,
                None => config.scope()?,
            };
            let summary = app.session.summary(scope);
            if json {
                println!("{}", output::summary_json(&summary));
            } else {
                println!("{}", output::render_summary_plain(&summary, &palette));
            }
        }
        Command::Save { output: path } => {
            let path = path
                .or_else(|| config.export_path.clone())
                .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILE_NAME));
            app.session.save(&path)?;
            if json {
                println!("{}", serde_json::json!({ "path": path }));
            } else {
                println!("Saved tasks to {}", path.display());
            }
        }
        Command::Import { file } => {
            let outcome = app.session.import_file(&file)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "active": outcome.active, "removed": outcome.removed })
                );
            } else {
                println!(
                    "Imported {} tasks ({} removed)",
                    outcome.active, outcome.removed
                );
            }
        }
        Command::Incident => {
            let text = share::incident_text(app.session.today());
            copy_and_report(app.clipboard.as_ref(), "incident status", &text, json);
        }
        Command::ClassKey { link } => {
            let key = share::extract_class_key(&link)?;
            copy_and_report(app.clipboard.as_ref(), "class key", &key, json);
        }
    }

    Ok(())
}

fn run_interactive(app: &mut App) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("falcon".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let result = calendar::today()
            .and_then(|today| app.session.roll_over(today))
            .and_then(|_| run_command(cli, app));
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
        }
    }

    if app.session.has_unsaved_changes() {
        eprintln!("WARNING: unsaved changes; run `save` to write the export file");
    }

    Ok(())
}

fn main() {
    init_logging();

    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let cli = if interactive {
        None
    } else {
        match Cli::try_parse() {
            Ok(cli) => Some(cli),
            Err(err) if !err.use_stderr() => err.exit(),
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
        }
    };

    let result = App::open().and_then(|mut app| match cli {
        Some(cli) => run_command(cli, &mut app),
        None => run_interactive(&mut app),
    });

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
