//! Command handlers. Each one resolves its inputs, calls into `core`, and
//! renders the result; none of them touch a store directly except through
//! the ledger.

pub mod add;
pub mod clear;
pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod history;
pub mod init;
pub mod list;
pub mod log;
pub mod rates;
pub mod site;
pub mod week;

use crate::config::Config;
use crate::core::{Ledger, WriteFailure};
use crate::errors::{AppError, AppResult};
use crate::session::Session;
use crate::store::{self, Backend, Subscription};
use crate::ui::messages::{error, warning};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A ledger opened for one command, collecting write failures as they
/// happen so they can be reported before the process exits.
pub(crate) struct CommandLedger {
    pub ledger: Ledger,
    failures: Arc<Mutex<Vec<WriteFailure>>>,
    _errors: Subscription,
}

impl CommandLedger {
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let session = Session::new(&cfg.user)?;
        if cfg.backend == Backend::Memory {
            warning("Memory backend: nothing will be kept after this command.");
        }

        let store = store::open(cfg.backend, cfg.store_path())?;
        let ledger = Ledger::open(store, session, cfg.rate_policy)?;

        let failures: Arc<Mutex<Vec<WriteFailure>>> = Arc::default();
        let sink = Arc::clone(&failures);
        let errors = ledger.on_error(move |f| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(f.clone());
        });

        Ok(Self {
            ledger,
            failures,
            _errors: errors,
        })
    }

    /// Wait for queued writes, then report any that failed.
    pub fn finish(self) -> AppResult<()> {
        self.ledger.flush();

        let failures = std::mem::take(
            &mut *self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if failures.is_empty() {
            return Ok(());
        }

        for f in &failures {
            error(format!("Failed to {}: {}", f.op, f.error));
        }
        Err(AppError::Storage(format!(
            "{} write(s) could not be saved",
            failures.len()
        )))
    }
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
