//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

use super::OutputFormat;
use crate::api::Page;
use crate::auth::AdminUser;
use crate::presale::records::format_timestamp;
use crate::presale::{CountdownSettings, DashboardStats, LiveStats, Participant, Tokenomics, TxLog};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print any value as JSON or YAML
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_structured(value, format)?);
    Ok(())
}

/// JSON or YAML text; tables have no text form and fall back to JSON
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
    })
}

fn active_cell(active: bool) -> Cell {
    if active {
        Cell::new("active").fg(Color::Green)
    } else {
        Cell::new("inactive").fg(Color::Red)
    }
}

fn key_value_table(rows: Vec<(&str, Cell)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), value]);
    }
    table
}

fn header(table: &mut Table, names: &[&str]) {
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(names.iter().map(|n| Cell::new(n).fg(Color::Cyan)).collect::<Vec<_>>());
}

/// Print the logged in operator
pub fn print_admin(user: &AdminUser) {
    println!("{}", "Operator".bold().underline());
    println!();
    println!("  {} {}", "Name:".bold(), user.name);
    println!("  {} {}", "Email:".bold(), user.email);
    println!("  {} {}", "Role:".bold(), user.role.cyan());
    println!("  {} {}", "ID:".bold(), user.id);
    if !user.is_active {
        println!("  {} {}", "Status:".bold(), "inactive".red());
    }
    if !user.permissions.is_empty() {
        let permissions: Vec<&str> = user.permissions.iter().map(String::as_str).collect();
        println!("  {} {}", "Permissions:".bold(), permissions.join(", "));
    }
}

/// Print dashboard totals
pub fn print_dashboard(stats: &DashboardStats) {
    let table = key_value_table(vec![
        ("Total Users", Cell::new(stats.total_users)),
        ("Paid Users", Cell::new(stats.paid_users).fg(Color::Green)),
        ("Unpaid Users", Cell::new(stats.unpaid_users).fg(Color::Yellow)),
        ("Success Rate", Cell::new(format!("{}%", stats.success_rate()))),
    ]);
    println!("{table}");
}

/// Print countdown settings
pub fn print_countdown(settings: &CountdownSettings) {
    let remaining = settings
        .remaining_from(chrono::Local::now().naive_local())
        .map(|d| {
            if d.num_seconds() <= 0 {
                "reached".to_string()
            } else {
                format!(
                    "{}d {}h {}m",
                    d.num_days(),
                    d.num_hours() % 24,
                    d.num_minutes() % 60
                )
            }
        })
        .unwrap_or_else(|| "-".to_string());

    let table = key_value_table(vec![
        (
            "Target",
            Cell::new(if settings.target_date.is_empty() {
                "-"
            } else {
                settings.target_date.as_str()
            }),
        ),
        ("Remaining", Cell::new(remaining)),
        ("Title", Cell::new(&settings.title)),
        ("Description", Cell::new(&settings.description)),
        ("Status", active_cell(settings.is_active)),
        ("Updated", Cell::new(format_timestamp(settings.updated_at.as_deref()))),
    ]);
    println!("{table}");
}

/// Print live statistics
pub fn print_live_stats(stats: &LiveStats) {
    let table = key_value_table(vec![
        ("Participants", Cell::new(stats.participants)),
        ("Raised", Cell::new(stats.raised_display())),
        ("Tokens Allocated", Cell::new(&stats.tokens_allocated)),
        ("Days to Launch", Cell::new(stats.days_to_launch)),
        ("Status", active_cell(stats.is_active)),
        ("Updated", Cell::new(format_timestamp(stats.updated_at.as_deref()))),
    ]);
    println!("{table}");
}

/// Print tokenomics with its allocation preview
pub fn print_tokenomics(tokenomics: &Tokenomics) {
    let mut rows = vec![("Total Supply", Cell::new(tokenomics.total_supply))];
    let labels = ["Stage 1", "Stage 2", "Stage 3", "Stage 4", "Stage 5"];
    for (label, price) in labels.into_iter().zip(tokenomics.stage_prices()) {
        rows.push((label, Cell::new(format!("${}", price))));
    }
    rows.push(("Public Sale", Cell::new(format!("${}", tokenomics.public_sale_price))));
    rows.push(("Status", active_cell(tokenomics.is_active)));
    println!("{}", key_value_table(rows));
    println!();
    print_distribution(tokenomics.total_supply);
}

/// Print the allocation of `total_supply`
pub fn print_distribution(total_supply: u64) {
    let distribution = crate::presale::Distribution::for_supply(total_supply);
    let mut table = Table::new();
    header(&mut table, &["Allocation", "Share", "Tokens"]);
    for (name, percent, amount) in distribution.rows() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{}%", percent)),
            Cell::new(amount),
        ]);
    }
    println!("{table}");
}

/// Print one page of participants
pub fn print_participants(page: &Page<Participant>) {
    if page.items.is_empty() {
        info("No participants yet");
        return;
    }

    let mut table = Table::new();
    header(&mut table, &["#", "Wallet", "Joined", "Tokens", "Paid"]);
    for (index, p) in page.items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(page.row_number(index)),
            Cell::new(&p.walletid),
            Cell::new(format_timestamp(p.joined_at())),
            Cell::new(format!("{} MEME", p.token_total())),
            if p.paid {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Yellow)
            },
        ]);
    }
    println!("{table}");
    print_page_footer(page.page, page.pages);
}

/// Print one page of the transaction log
pub fn print_transactions(page: &Page<TxLog>) {
    if page.items.is_empty() {
        info("No transactions yet");
        return;
    }

    let mut table = Table::new();
    header(&mut table, &["#", "Wallet", "Chain", "Amount", "Date-Time"]);
    for (index, tx) in page.items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(page.row_number(index)),
            Cell::new(&tx.walletid),
            Cell::new(tx.chain.as_deref().unwrap_or("-")),
            Cell::new(tx.amount.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(format_timestamp(Some(&tx.created_at))),
        ]);
    }
    println!("{table}");
    print_page_footer(page.page, page.pages);
}

fn print_page_footer(page: u32, pages: u32) {
    let mut footer = format!("Page {} of {}", page, pages);
    if page < pages {
        footer.push_str(&format!("  (next: --page {})", page + 1));
    }
    println!("{}", footer.dimmed());
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
