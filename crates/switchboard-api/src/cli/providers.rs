//! Provider table listing.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use switchboard_types::provider::DailyLimit;

use crate::http::handlers::providers::capability_views;
use crate::state::AppState;

pub fn list_providers(state: &AppState, json: bool) -> Result<()> {
    let views = capability_views(state);

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Capability").fg(Color::White),
        Cell::new("Provider").fg(Color::White),
        Cell::new("Transport").fg(Color::White),
        Cell::new("Daily limit").fg(Color::White),
        Cell::new("Quality").fg(Color::White),
        Cell::new("Speed").fg(Color::White),
    ]);

    for view in &views {
        for (i, provider) in view.providers.iter().enumerate() {
            let is_fallback = view.fallback.as_deref() == Some(provider.name.as_str());
            let name = if is_fallback {
                Cell::new(format!("{} (fallback)", provider.name)).fg(Color::Green)
            } else {
                Cell::new(&provider.name).fg(Color::Cyan)
            };
            let limit = match provider.daily_limit {
                DailyLimit::Unbounded => Cell::new("unbounded").fg(Color::DarkGrey),
                DailyLimit::Bounded(n) => Cell::new(n.to_string()),
            };
            table.add_row(vec![
                Cell::new(if i == 0 { view.capability.as_str() } else { "" }),
                name,
                Cell::new(provider.transport.to_string()),
                limit,
                Cell::new(format!("{:?}", provider.quality).to_lowercase()),
                Cell::new(format!("{:?}", provider.speed).to_lowercase()),
            ]);
        }
    }

    let total: usize = views.iter().map(|v| v.providers.len()).sum();
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} provider{} across {} capabilities",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        views.len()
    );
    println!();

    Ok(())
}
