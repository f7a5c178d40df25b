//!
//! # Actions
//!
//! The action stream is the application-wide, ordered event feed. Every feature area dispatches
//! tagged [`Action`]s onto a shared [`ActionStream`] and any number of subscribers observe them in
//! dispatch order.
//!
//! Payloads are opaque to the stream itself: they are stored behind an [`ActionPayload`] trait
//! object and recovered by the consumer with a downcast to the concrete type it expects.
//!
//! ## Basic example
//!
//! ```
//! use nv_actions::{Action, ActionKind, ActionStream};
//!
//! const NOTE_SAVED: ActionKind = ActionKind::from_static("note-saved");
//!
//! #[derive(Debug)]
//! struct NoteSaved {
//!     title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let stream = ActionStream::default();
//!     let mut rx = stream.subscribe();
//!
//!     stream.dispatch(Action::with_payload(
//!         NOTE_SAVED,
//!         NoteSaved { title: "groceries".to_string() },
//!     ));
//!
//!     let action = rx.recv().await.unwrap();
//!     assert_eq!(action.kind(), &NOTE_SAVED);
//!     assert_eq!(action.payload_as::<NoteSaved>().unwrap().title, "groceries");
//! }
//! ```

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod action;
mod kind;
mod stream;

pub use action::{Action, ActionPayload};
pub use kind::ActionKind;
pub use stream::{ActionStream, DEFAULT_CAPACITY};

pub use tokio::sync::broadcast::{error::RecvError, Receiver};
