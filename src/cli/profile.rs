//! Profile CLI commands

use clap::Subcommand;

use crate::display::format_profile;
use crate::error::TallyResult;
use crate::models::Currency;
use crate::services::{ProfileInput, ProfileService};
use crate::storage::Storage;

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,

    /// Create the profile, or update the given fields
    Set {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Currency code (INR, USD, EUR, GBP, JPY, CAD, AUD)
        #[arg(short, long)]
        currency: Option<Currency>,
    },

    /// Delete the profile; transactions and budgets are kept
    Delete,
}

/// Handle a profile command
pub fn handle_profile_command(storage: &Storage, cmd: ProfileCommands) -> TallyResult<()> {
    let service = ProfileService::new(storage);

    match cmd {
        ProfileCommands::Show => match service.get()? {
            Some(profile) => print!("{}", format_profile(&profile)),
            None => {
                println!("No profile yet.");
                println!("Create one with: tally profile set --name <NAME> --email <EMAIL>");
            }
        },

        ProfileCommands::Set {
            name,
            email,
            currency,
        } => {
            let existed = service.get()?.is_some();
            let profile = service.save(ProfileInput {
                name,
                email,
                currency,
            })?;
            if existed {
                println!("Updated profile");
            } else {
                println!("Created profile");
            }
            print!("{}", format_profile(&profile));
        }

        ProfileCommands::Delete => {
            let profile = service.delete()?;
            println!("Deleted profile for {}", profile.name);
        }
    }

    Ok(())
}
