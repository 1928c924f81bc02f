//! Update prompting layer
//!
//! Runs the gate on lifecycle triggers and, when an update is required,
//! keeps the user behind a modal prompt until they decide.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ VersionSource│────▶│   Prompter   │────▶│  Presenter   │
//! │   (fetch)    │     │ (check/loop) │     │   (prompt)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │                    │
//!                             ▼                    ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │     Gate     │     │   Launcher   │
//!                      │  (evaluate)  │     │ (store page) │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`prompter`]: `UpdatePrompter` and `check_and_maybe_prompt`
//! - [`state`]: Prompt outcomes and the retry state machine
//! - [`effects`]: Traits for the injected collaborators
//! - [`package_info`]: Local package metadata and its single-flight cache
//! - [`error`]: Collaborator error types

pub mod effects;
pub mod error;
pub mod package_info;
pub mod prompter;
pub mod state;

pub use prompter::{CheckOutcome, PrompterOptions, SkipReason, UpdatePrompter};
pub use state::{PromptOutcome, Resolution, RetryState};
