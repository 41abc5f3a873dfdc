//! Print the `[admin]` hash and salt for a password.
//!
//! Usage: `hash_password <password>`; Argon2 parameters come from the
//! `[argon2]` section of the active configuration when one is present.

use std::process::ExitCode;

use service::auth::{Argon2SecurityService, SecurityService};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let Some(password) = std::env::args().nth(1).filter(|p| !p.is_empty()) else {
        eprintln!("usage: hash_password <password>");
        return ExitCode::FAILURE;
    };
    let argon2 = configs::load_default().map(|cfg| cfg.argon2).unwrap_or_default();
    let security = match Argon2SecurityService::new(&argon2) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("invalid argon2 parameters: {e}");
            return ExitCode::FAILURE;
        }
    };
    match security.hash_password(&password) {
        Ok((hash, salt)) => {
            println!("password_hash = \"{hash}\"");
            println!("password_salt = \"{salt}\"");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("hashing failed: {e}");
            ExitCode::FAILURE
        }
    }
}
