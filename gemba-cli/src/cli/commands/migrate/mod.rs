mod handler;

use clap::Args;

pub use handler::handle_migrate_command;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Build and count records without writing stores or checkpoints
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
