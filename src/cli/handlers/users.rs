use crate::backend::Backend;
use crate::cli::commands::RoleArg;
use crate::model::{Assignee, Role};
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;

pub fn handle_users(ctx: &CommandContext, role: RoleArg, json: bool) -> Result<()> {
    let role: Role = role.into();
    let backend = ctx.http_backend()?;
    let users = backend
        .users_by_role(role)
        .with_context(|| format!("Failed to fetch {}s", role))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No {}s found", role);
        return Ok(());
    }

    for user in &users {
        let assignee = Assignee::from_user(user, role);
        println!(
            "{} {} {}",
            format!("#{}", assignee.id).cyan(),
            assignee.display_name,
            user.email.dimmed()
        );
    }
    Ok(())
}
