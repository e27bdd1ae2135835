use crate::ledger::equal_split;
use anyhow::Result;
use colored::Colorize;

use super::utils::format_percent;

pub fn handle_split(count: usize, json: bool) -> Result<()> {
    let shares: Vec<f64> = equal_split(count).iter().map(|p| p.value()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shares)?);
        return Ok(());
    }

    if shares.is_empty() {
        println!("{}", "Nothing to split".dimmed());
        return Ok(());
    }

    for (i, share) in shares.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).dimmed(), format_percent(*share));
    }
    Ok(())
}
