use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "playgate", about = "playgate account registration client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and have a verification code emailed to it
    Register { name: String, email: String },
    /// Redeem the emailed code (defaults to the last registered account)
    Verify { account_id: Option<Uuid> },
    /// Email a fresh verification code (defaults to the last registered email)
    Resend { email: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Register { name, email } => {
            playgate_cli::commands::register::run_register(&name, &email).await?;
        }
        Commands::Verify { account_id } => {
            playgate_cli::commands::verify::run_verify(account_id).await?;
        }
        Commands::Resend { email } => {
            playgate_cli::commands::resend::run_resend(email).await?;
        }
    }
    Ok(())
}
