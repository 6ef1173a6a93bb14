use crate::cli::Commands;
use crate::command_handlers::{info, install, uninstall, verify, Context};
use crate::formula::Formula;
use anyhow::Result;

pub fn dispatch(cmd: Commands, formula: &Formula, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::Info { json } => info::show(formula, ctx, json),
        Commands::Url { os } => info::print_url(formula, os.as_deref().unwrap_or(&ctx.host_os)),
        Commands::Install {
            archive,
            skip_verify,
        } => {
            let args = install::InstallArgs {
                archive: archive.as_deref(),
                verify: !skip_verify,
                formula,
                ctx,
            };
            install::run_install(args)
        }
        Commands::Uninstall => uninstall::run_uninstall(formula, ctx),
        Commands::Verify => verify::verify_formula(formula),
    }
}
