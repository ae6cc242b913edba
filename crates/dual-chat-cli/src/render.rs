use chat_core::{Branch, BranchMessage, MessageRole, QuotaSnapshot};
use chat_state::{BranchDispatchState, BranchTimelines, Notice, Rejection, SubmitOutcome};
use colored::Colorize;

fn branch_header(branch: Branch, state: &BranchDispatchState) -> String {
    let title = format!("── {} · {} ", branch.as_str().to_uppercase(), state.model);
    match branch {
        Branch::Left => title.blue().bold().to_string(),
        Branch::Right => title.magenta().bold().to_string(),
    }
}

fn print_message(message: &BranchMessage) {
    match message.role {
        MessageRole::User => println!("{} {}", "You:".cyan().bold(), message.content),
        MessageRole::Assistant => println!("{}\n{}", "Assistant:".green().bold(), message.content),
    }
}

/// Full history of both branches, one after the other.
pub fn print_timelines(timelines: &BranchTimelines, states: [&BranchDispatchState; 2]) {
    if timelines.is_empty() {
        println!("{}", "No messages in this session yet".dimmed());
        return;
    }
    for branch in Branch::BOTH {
        println!("{}", branch_header(branch, states[branch.slot()]));
        for message in timelines.get(branch) {
            print_message(message);
        }
        println!();
    }
}

/// The newest answer of each branch, or its error.
pub fn print_latest(timelines: &BranchTimelines, states: [&BranchDispatchState; 2]) {
    for branch in Branch::BOTH {
        let state = states[branch.slot()];
        println!("{}", branch_header(branch, state));
        match (&state.error, timelines.get(branch).last()) {
            (Some(error), _) => println!("{}", format!("❌ {}", error).red()),
            (None, Some(message)) if message.role == MessageRole::Assistant => {
                println!("{}", message.content)
            }
            _ => println!("{}", "(no response)".dimmed()),
        }
        println!();
    }
}

pub fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Saved { record, .. } => {
            println!(
                "{}",
                format!("✅ Saved {} ({} tokens)", record.id, record.tokens_used).dimmed()
            );
        }
        SubmitOutcome::RolledBack { error } => {
            println!("{}", format!("❌ Message was not saved: {}", error).red());
        }
        SubmitOutcome::Rejected(Rejection::NoSession) => {
            println!(
                "{}",
                "No session selected. Pass --session <id> or create one with `new-session`.".yellow()
            );
        }
        SubmitOutcome::Rejected(Rejection::EmptyMessage) => {
            println!("{}", "Nothing to send".dimmed());
        }
        SubmitOutcome::Rejected(Rejection::QuotaExceeded { .. }) => {}
    }
}

pub fn print_notice(notice: &Notice) {
    match notice {
        Notice::QuotaExceeded { .. } => println!("{}", format!("⛔ {}", notice).red().bold()),
        Notice::QuotaNearLimit { .. } => println!("{}", format!("⚠️  {}", notice).yellow()),
    }
}

pub fn print_quota(quota: &QuotaSnapshot) {
    const WIDTH: usize = 30;
    let percentage = quota.percentage().min(100) as usize;
    let filled = percentage * WIDTH / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled));
    let bar = if quota.is_exhausted() {
        bar.red()
    } else if percentage >= 80 {
        bar.yellow()
    } else {
        bar.green()
    };

    println!("{} {}%", bar, quota.percentage());
    println!(
        "{}",
        format!(
            "{} / {} tokens used today, {} remaining",
            quota.used_today,
            quota.daily_limit,
            quota.remaining()
        )
        .dimmed()
    );
    if let Some(reset) = &quota.last_reset {
        println!("{}", format!("Last reset: {}", reset).dimmed());
    }
}
