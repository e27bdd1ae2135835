use crate::ledger::Ledger;
use crate::schedule::project_due;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::{self, Read};

/// Resolve task text from a CLI arg, reading stdin for '-'
pub fn resolve_text(text: Option<String>) -> Result<Option<String>> {
    match text {
        Some(t) if t == "-" => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read task text from stdin")?;
            Ok(Some(content))
        }
        other => Ok(other),
    }
}

/// Parse an RFC 3339 reference time, or take the current time
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid --now timestamp: {}", s))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
        .replace(".00%", "%")
}

/// Ledger total, green when it passes the 100% check
pub fn format_total(ledger: &Ledger) -> colored::ColoredString {
    let total = format!("total {}", format_percent(ledger.total()));
    if ledger.is_empty() {
        "empty".dimmed()
    } else if ledger.is_valid() {
        total.green()
    } else {
        format!("{} (must equal 100%)", total).red()
    }
}

pub fn format_eta(eta_days: Option<f64>) -> String {
    match eta_days {
        Some(days) => format!("eta {}d", days),
        None => "no eta".to_string(),
    }
}

/// Print a ledger, one row per assignee, with optional task counts
pub fn print_ledger(ledger: &Ledger, counts: Option<&[usize]>, now: DateTime<Utc>) {
    let title = format!("{}s ({})", ledger.role(), ledger.len());
    println!("{} {}", title.bold(), format_total(ledger));

    for (i, entry) in ledger.entries().iter().enumerate() {
        let mut line = format!(
            "  {} {:<20} {:>8}  {}",
            format!("#{}", entry.assignee_id).cyan(),
            entry.name,
            format_percent(entry.percent.value()),
            format_eta(entry.eta_days).dimmed()
        );
        if let Some(counts) = counts {
            let count = counts.get(i).copied().unwrap_or(0);
            line.push_str(&format!("  {} tasks", count.to_string().yellow()));
            if count > 0 {
                if let Some(due) = project_due(now, entry.eta_days) {
                    line.push_str(&format!("  due {}", due.format("%Y-%m-%d %H:%M")));
                }
            }
        }
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(50.0), "50%");
        assert_eq!(format_percent(33.3), "33.30%");
        assert_eq!(format_percent(33.4), "33.40%");
    }

    #[test]
    fn test_resolve_now() {
        let now = resolve_now(Some("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(now.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(resolve_now(Some("yesterday")).is_err());
    }

    #[test]
    fn test_resolve_text_passthrough() {
        assert_eq!(resolve_text(None).unwrap(), None);
        assert_eq!(
            resolve_text(Some("a\nb".to_string())).unwrap().as_deref(),
            Some("a\nb")
        );
    }
}
