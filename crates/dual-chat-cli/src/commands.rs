use std::io::{self, Write};

use anyhow::{anyhow, bail};
use chat_core::model::MODELS;
use chat_core::{Branch, GroupedSessions, ModelId};
use chat_state::SubmitOutcome;
use chrono::Utc;
use colored::Colorize;

use crate::app::{warn_if_unknown, App};
use crate::render;

fn require_session(session: Option<&str>) -> anyhow::Result<&str> {
    session.ok_or_else(|| {
        anyhow!("No session selected. Pass --session <id> or create one with `new-session`.")
    })
}

fn print_notices(app: &mut App) {
    for notice in app.drain_notices() {
        render::print_notice(&notice);
    }
}

pub fn list_models(app: &App) -> anyhow::Result<()> {
    let left = app.coordinator.model(Branch::Left);
    let right = app.coordinator.model(Branch::Right);

    for info in MODELS {
        let marker = if left.as_str() == info.id {
            "◀ left".blue().to_string()
        } else if right.as_str() == info.id {
            "right ▶".magenta().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<26} {:<8} {:<32} {}",
            info.id.bold(),
            info.provider.display_name(),
            info.description.dimmed(),
            marker
        );
    }
    Ok(())
}

pub fn set_model(app: &mut App, branch: Branch, model: &str) -> anyhow::Result<()> {
    let model = ModelId::from(model);
    warn_if_unknown(&model);
    app.coordinator.select_model(branch, model.clone())?;
    app.save_models()?;
    println!("{}", format!("✅ {} branch now uses {}", branch, model).green());
    Ok(())
}

pub async fn list_sessions(app: &App) -> anyhow::Result<()> {
    let sessions = app.client.list_sessions().await?;
    if sessions.is_empty() {
        println!("{}", "No sessions yet. Create one with `new-session`.".dimmed());
        return Ok(());
    }

    let grouped = GroupedSessions::group(sessions, Utc::now());
    for (group, sessions) in grouped.iter() {
        println!("{}", group.label().cyan().bold());
        for session in sessions {
            let title = if session.title.is_empty() {
                "Untitled"
            } else {
                session.title.as_str()
            };
            println!("  {}  {}", session.session_id.dimmed(), title);
        }
    }
    Ok(())
}

pub async fn new_session(app: &App, title: &str) -> anyhow::Result<()> {
    let session = app.client.create_session(title).await?;
    println!("{}", format!("✅ Session ID: {}", session.session_id).green());
    Ok(())
}

pub async fn delete_session(app: &App, session_id: &str) -> anyhow::Result<()> {
    app.client.delete_session(session_id).await?;
    app.coordinator.reconciler().clear(session_id);
    println!("{}", format!("🗑  Deleted session {}", session_id).green());
    Ok(())
}

pub async fn history(app: &App, session: Option<&str>) -> anyhow::Result<()> {
    let session_id = require_session(session)?;
    app.coordinator.load_history(session_id).await?;

    let left = app.coordinator.branch_state(Branch::Left);
    let right = app.coordinator.branch_state(Branch::Right);
    render::print_timelines(&app.coordinator.timelines(session_id), [&left, &right]);
    Ok(())
}

/// Submit one message and print both answers.
async fn submit(app: &mut App, session_id: &str, message: &str) -> anyhow::Result<()> {
    println!("{}", "⏳ Asking both models...".dimmed());
    let outcome = app.coordinator.submit(message, Some(session_id)).await;
    print_notices(app);

    if matches!(outcome, SubmitOutcome::Saved { .. }) {
        let left = app.coordinator.branch_state(Branch::Left);
        let right = app.coordinator.branch_state(Branch::Right);
        render::print_latest(&app.coordinator.timelines(session_id), [&left, &right]);
    }
    render::print_outcome(&outcome);
    Ok(())
}

/// History and quota before the first submit of a run.
async fn prepare(app: &mut App, session_id: &str) -> anyhow::Result<()> {
    if let Err(err) = app.coordinator.load_history(session_id).await {
        tracing::warn!("Could not load history for {}: {}", session_id, err);
    }
    app.refresh_quota().await;
    let fragments = app.load_context().await?;
    if fragments > 0 {
        println!("{}", format!("📎 {} prompt(s) attached as context", fragments).dimmed());
    }
    print_notices(app);
    Ok(())
}

pub async fn send(app: &mut App, session: Option<&str>, message: &str) -> anyhow::Result<()> {
    let Some(session_id) = session else {
        render::print_outcome(&app.coordinator.submit(message, None).await);
        return Ok(());
    };
    prepare(app, session_id).await?;
    submit(app, session_id, message).await
}

pub async fn chat(app: &mut App, session: Option<&str>) -> anyhow::Result<()> {
    let session_id = match session {
        Some(id) => id.to_string(),
        None => {
            let created = app.client.create_session("New Chat").await?;
            created.session_id
        }
    };

    println!("{}", "🤖 Dual Model Chat".cyan().bold());
    println!("{}", format!("Session ID: {}", session_id).dimmed());
    println!(
        "{}",
        format!(
            "Left: {}  Right: {}",
            app.coordinator.model(Branch::Left),
            app.coordinator.model(Branch::Right)
        )
        .dimmed()
    );
    println!("{}", "Commands: /left <model>, /right <model>, /history, /quit".dimmed());
    println!();

    prepare(app, &session_id).await?;
    app.start_quota_polling();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("/quit") || input.eq_ignore_ascii_case("exit") {
            println!("{}", "👋 Goodbye!".cyan());
            break;
        }
        if input.is_empty() {
            continue;
        }

        let result = if let Some(model) = input.strip_prefix("/left ") {
            set_model(app, Branch::Left, model.trim())
        } else if let Some(model) = input.strip_prefix("/right ") {
            set_model(app, Branch::Right, model.trim())
        } else if input == "/history" {
            let left = app.coordinator.branch_state(Branch::Left);
            let right = app.coordinator.branch_state(Branch::Right);
            render::print_timelines(&app.coordinator.timelines(&session_id), [&left, &right]);
            Ok(())
        } else {
            submit(app, &session_id, input).await
        };

        if let Err(e) = result {
            println!("{}", format!("❌ Error: {}", e).red());
        }
        println!();
    }

    Ok(())
}

pub async fn quota(app: &App) -> anyhow::Result<()> {
    let snapshot = app.client.get_quota().await?;
    render::print_quota(&snapshot);
    Ok(())
}

pub async fn prompts(app: &App) -> anyhow::Result<()> {
    let system = app.client.list_system_prompts().await?;
    let user = app.client.list_user_prompts().await?;
    let marker = |id: &str| {
        if app.prefs.prompts.is_selected(id) {
            "[x]".green().to_string()
        } else {
            "[ ]".dimmed().to_string()
        }
    };

    println!("{}", "System prompts".cyan().bold());
    for prompt in &system {
        println!("  {} {}  {}", marker(&prompt.prompt_id), prompt.prompt_id.dimmed(), prompt.prompt_text);
    }
    println!("{}", "Your prompts".cyan().bold());
    if user.is_empty() {
        println!("  {}", "none yet, add one with `add-prompt`".dimmed());
    }
    for prompt in &user {
        println!("  {} {}  {}", marker(&prompt.prompt_id), prompt.prompt_id.dimmed(), prompt.prompt_text);
    }
    Ok(())
}

pub async fn select_prompt(app: &mut App, prompt_id: &str) -> anyhow::Result<()> {
    let selected = if app
        .client
        .list_system_prompts()
        .await?
        .iter()
        .any(|p| p.prompt_id == prompt_id)
    {
        app.prefs.prompts.toggle_system(prompt_id)
    } else if app
        .client
        .list_user_prompts()
        .await?
        .iter()
        .any(|p| p.prompt_id == prompt_id)
    {
        app.prefs.prompts.toggle_user(prompt_id)
    } else {
        bail!("Prompt {} not found in the library", prompt_id);
    };

    app.prefs.save()?;
    let state = if selected { "attached" } else { "detached" };
    println!("{}", format!("✅ Prompt {} {}", prompt_id, state).green());
    Ok(())
}

pub async fn add_prompt(app: &App, text: &str) -> anyhow::Result<()> {
    let prompt = app.client.create_user_prompt(text).await?;
    println!("{}", format!("✅ Saved prompt {}", prompt.prompt_id).green());
    Ok(())
}

pub async fn delete_prompt(app: &mut App, prompt_id: &str) -> anyhow::Result<()> {
    app.client.delete_user_prompt(prompt_id).await?;
    if app.prefs.prompts.is_selected(prompt_id) {
        app.prefs.prompts.toggle_user(prompt_id);
        app.prefs.save()?;
    }
    println!("{}", format!("🗑  Deleted prompt {}", prompt_id).green());
    Ok(())
}
