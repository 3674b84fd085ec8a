//! Session commands

use anyhow::bail;
use colored::Colorize;

use docdesk_forms::DeskUseCases;

use super::Context;
use crate::config::Config;
use crate::output::UserRow;
use crate::SessionCommands;

pub async fn handle(action: SessionCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        SessionCommands::Login { token } => {
            ctx.auth.init(token.clone());
            let user = match ctx.desk.current_user().await {
                Ok(user) => user,
                Err(e) => {
                    ctx.auth.clear();
                    bail!("token rejected: {}", e);
                }
            };

            let mut config = Config::load(ctx.profile()).unwrap_or_default();
            config.token = Some(token);
            let path = config.save(ctx.profile())?;
            println!("{} Signed in as {} (saved to {})", "✓".green(), user.name, path.display());
        }
        SessionCommands::Logout => {
            ctx.auth.clear();
            let mut config = Config::load(ctx.profile()).unwrap_or_default();
            if config.token.take().is_some() {
                config.save(ctx.profile())?;
            }
            println!("Signed out");
        }
        SessionCommands::Whoami => {
            let user = ctx.desk.current_user().await?;
            ctx.format.print(&UserRow::from(&user))?;
        }
    }
    Ok(())
}
