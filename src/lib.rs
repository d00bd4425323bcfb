#![doc(html_root_url = "https://docs.rs/sentence-compare/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # sentence-compare
//!
//! Terminal front-end and client library for a remote text-embedding and
//! similarity service. The service computes embeddings and scores; this
//! crate owns the comparator form, its submission workflow and the HTTP
//! plumbing around it.
//!
//! ## Features
//!
//! - **Comparator form**: target text, a resizable list of compare texts
//!   (never fewer than one) and a similarity function
//! - **Submission workflow**: guarded, single in-flight request with
//!   guaranteed return to idle
//! - **Embedding trigger**: ask the service for the embedding of a text
//! - **CLI**: interactive form plus one-shot `compare` and `embed` commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentence_compare::{ComparatorController, Config, ConsoleNotifier, HttpBackend, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let backend = HttpBackend::new(&Config::from_env()?)?;
//!     let mut form = ComparatorController::new(backend, ConsoleNotifier);
//!
//!     form.update_target("The court dismissed the appeal.");
//!     form.update_compare_at(0, "The appeal was rejected.")?;
//!     for result in form.submit().await? {
//!         println!("{:.4}  {}", result.score, result.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod build_info;
pub mod core;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
mod state;
pub mod utils;

// Public API exports
pub use crate::{
    api::{CompareBackend, HttpBackend},
    core::{
        command::{FormCommand, Reply},
        controller::{trigger_embedding, ComparatorController, PendingSubmission},
        form::{CompareTexts, FormState, Phase},
        notify::{ConsoleNotifier, MemoryNotifier, Notification, Notifier},
    },
    error::{AppError, Result},
    models::{
        comparison::{ComparisonRequest, ComparisonResult, SimilarityFunction},
        embedding::{EmbedRequest, EmbedResponse},
    },
    state::{Config, COMPARE_PATH, EMBED_PATH},
};

/// Initialize logging with default settings
///
/// Defaults to the `info` level; `RUST_LOG` overrides it. Calling it more
/// than once is harmless.
///
/// # Errors
///
/// Never fails today; the `Result` keeps the signature stable for callers.
pub fn init() -> Result<()> {
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    let initialized = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok();

    if initialized {
        log::debug!("sentence-compare {}", build_info::long_version());
    }
    Ok(())
}

/// Header shown on top of the interactive form
pub fn render_banner(config: &Config) -> String {
    let title = match &config.user_label {
        Some(user) => format!("{}  ·  {}", config.app_title, user),
        None => config.app_title.clone(),
    };
    let rule = "─".repeat(title.chars().count().max(24));
    format!(
        "{}\n{}\n{}\nservice: {}\n",
        rule,
        title,
        rule,
        config.base_url.trim_end_matches('/')
    )
}
