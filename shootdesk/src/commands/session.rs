//! Session commands
//!
//! Stand-in for the authentication provider: remembers who is signed in so
//! client-scoped listings can narrow to that client's shoots.

use clap::Args;
use shootdesk::app::AppState;
use shootdesk::error::Result;
use shootdesk::models::{Principal, Role};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// admin, superadmin, client, photographer or editor
    #[arg(long, default_value = "client")]
    pub role: Role,
}

/// Sign in as the given principal
pub fn login(state: &AppState, args: LoginArgs) -> Result<Principal> {
    let principal = Principal {
        id: Uuid::new_v4().to_string(),
        name: args.name,
        email: args.email,
        company: args.company,
        phone: args.phone,
        role: args.role,
    };

    state.sign_in(principal.clone())?;
    Ok(principal)
}

pub fn logout(state: &AppState) -> Result<()> {
    state.sign_out()
}

pub fn whoami(state: &AppState) -> Option<Principal> {
    state.shoots_service.principal()
}
