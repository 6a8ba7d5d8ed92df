//! Settings CLI commands

use clap::Subcommand;

use crate::display::format_settings;
use crate::error::TallyResult;
use crate::models::{Currency, SettingsPatch, TransactionType};
use crate::services::SettingsService;
use crate::storage::Storage;

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the current preferences
    Show,

    /// Change one or more preferences
    Set {
        /// Display currency (INR, USD, EUR, GBP, JPY, CAD, AUD)
        #[arg(long)]
        currency: Option<Currency>,

        /// Type used by `transaction add` when --type is omitted
        #[arg(long)]
        default_type: Option<TransactionType>,

        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        dark_mode: Option<bool>,
    },

    /// Restore every preference to its default
    Reset,
}

/// Handle a settings command
pub fn handle_settings_command(storage: &Storage, cmd: SettingsCommands) -> TallyResult<()> {
    let service = SettingsService::new(storage);

    match cmd {
        SettingsCommands::Show => {
            print!("{}", format_settings(&service.get()?));
        }

        SettingsCommands::Set {
            currency,
            default_type,
            notifications,
            dark_mode,
        } => {
            let patch = SettingsPatch {
                currency,
                default_transaction_type: default_type,
                notifications_enabled: notifications,
                dark_mode,
            };
            if patch.is_empty() {
                println!("Nothing to change. Pass at least one of --currency, --default-type, --notifications or --dark-mode.");
                return Ok(());
            }

            let settings = service.update(patch)?;
            println!("Settings saved");
            print!("{}", format_settings(&settings));
        }

        SettingsCommands::Reset => {
            let settings = service.reset()?;
            println!("Settings reset to defaults");
            print!("{}", format_settings(&settings));
        }
    }

    Ok(())
}
