//! `counsel services`: counseling services and quick actions.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use counsel_core::chat::instructions;
use counsel_core::chat::quick_actions::QUICK_ACTIONS;

pub fn list_services(json: bool) -> Result<()> {
    let services = instructions::catalog();

    if json {
        let export = serde_json::json!({
            "services": services,
            "quick_actions": QUICK_ACTIONS,
        });
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Service").fg(Color::White),
        Cell::new("Follow-up questions").fg(Color::White),
    ]);
    for profile in &services {
        table.add_row(vec![
            Cell::new(profile.service_type.to_string()).fg(Color::DarkGrey),
            Cell::new(profile.label).fg(Color::Cyan),
            Cell::new(profile.follow_up_questions.len().to_string()).fg(Color::White),
        ]);
    }

    println!();
    println!("  {}", style("Services").bold());
    println!("{table}");

    let mut actions = Table::new();
    actions.load_preset(presets::UTF8_FULL_CONDENSED);
    actions.set_content_arrangement(ContentArrangement::Dynamic);
    actions.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Quick action").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);
    for action in QUICK_ACTIONS {
        actions.add_row(vec![
            Cell::new(action.key).fg(Color::DarkGrey),
            Cell::new(action.title).fg(Color::Cyan),
            Cell::new(action.description).fg(Color::White),
        ]);
    }

    println!();
    println!("  {}", style("Quick actions").bold());
    println!("{actions}");
    println!();

    Ok(())
}
