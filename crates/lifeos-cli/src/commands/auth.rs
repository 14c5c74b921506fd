//! Account commands for CLI.

use clap::Subcommand;
use lifeos_core::{ProfileUpdate, RecordStore};

use super::{open_session, print_json, CmdResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// At least 8 characters
        #[arg(long)]
        password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out of the current session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Update the logged-in account's profile
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// New password; needs --current-password
        #[arg(long, requires = "current_password")]
        password: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
    },
}

pub fn run(action: AuthAction) -> CmdResult {
    match action {
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let store = RecordStore::open()?;
            let session = store.accounts().register(&name, &email, &password)?;
            print_json(&session)?;
        }
        AuthAction::Login { email, password } => {
            let store = RecordStore::open()?;
            let session = store.accounts().login(&email, &password)?;
            print_json(&session)?;
        }
        AuthAction::Logout => {
            let store = RecordStore::open()?;
            store.accounts().logout()?;
            println!("logged out");
        }
        AuthAction::Whoami => {
            let (_, session) = open_session()?;
            print_json(&session)?;
        }
        AuthAction::Update {
            name,
            email,
            password,
            current_password,
        } => {
            let (store, session) = open_session()?;
            let updated = store.accounts().update_profile(
                &session.id,
                ProfileUpdate {
                    name,
                    email,
                    password,
                    current_password,
                },
            )?;
            print_json(&updated)?;
        }
    }
    Ok(())
}
