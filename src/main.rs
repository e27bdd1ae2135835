use anyhow::{Context, Result};
use clap::Parser;

use apportion::cli::handlers::{self, CommandContext, PlanParams, SendParams};
use apportion::cli::{Cli, Commands};
use apportion::config::ApportionConfig;
use apportion::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before a config exists.
    if let Commands::Init { url } = &cli.command {
        logging::init(cli.verbose, cli.log_file.clone());
        return handlers::handle_init(url.clone());
    }

    let cwd = std::env::current_dir()?;
    let (config, root) =
        ApportionConfig::load_or_default(&cwd).context("Failed to load apportion configuration")?;

    let log_file = cli.log_file.or_else(|| config.log_path(&root));
    logging::init(cli.verbose, log_file);
    tracing::debug!(root = %root.display(), backend = %config.backend.url, "Configuration loaded");

    let ctx = CommandContext::new(config, cli.api_url, cli.token);

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Users { role, json } => handlers::handle_users(&ctx, role, json),
        Commands::Split { count, json } => handlers::handle_split(count, json),
        Commands::Plan {
            plan,
            tasks,
            now,
            json,
        } => handlers::handle_plan(PlanParams {
            plan,
            tasks,
            now,
            json,
        }),
        Commands::Send {
            plan,
            project,
            workspace,
            name,
            description,
            text,
            items_file,
            batch_name,
            no_workflow,
            dry_run,
            json,
        } => handlers::handle_send(
            &ctx,
            SendParams {
                plan,
                project,
                workspace,
                name,
                description,
                text,
                items_file,
                batch_name,
                no_workflow,
                dry_run,
                json,
            },
        ),
    }
}
