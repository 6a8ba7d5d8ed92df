//! Profile and settings display

use crate::models::{Settings, UserProfile};

pub fn format_profile(profile: &UserProfile) -> String {
    let mut output = String::new();
    output.push_str(&format!("Name:      {} ({})\n", profile.name, profile.initials()));
    output.push_str(&format!("Email:     {}\n", profile.email));
    output.push_str(&format!(
        "Currency:  {} ({})\n",
        profile.currency.code(),
        profile.currency.name()
    ));
    output.push_str(&format!(
        "Since:     {}\n",
        profile.created_at.format("%Y-%m-%d")
    ));
    output
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn format_settings(settings: &Settings) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "currency                  {} ({})\n",
        settings.currency.code(),
        settings.currency.symbol()
    ));
    output.push_str(&format!(
        "default-type              {}\n",
        settings.default_transaction_type
    ));
    output.push_str(&format!(
        "notifications             {}\n",
        on_off(settings.notifications_enabled)
    ));
    output.push_str(&format!(
        "dark-mode                 {}\n",
        on_off(settings.dark_mode)
    ));
    output
}
