//!
//! # VCS Items
//!
//! Raw change entries reported by a VCS scanner are classified into typed [`VcsViewItem`]s by an
//! ordered [`FactoryRegistry`]. Each registered [`VcsItemFactory`] claims the entries it
//! recognizes; the first factory to claim an entry creates its item, and a [`BaseVcsItemFactory`]
//! fallback that accepts everything is always evaluated last, so every entry maps to exactly one
//! item.
//!
//! ```
//! use nv_vcs_items::{
//!     materialize, ConflictItemFactory, FactoryRegistry, RawChangeEntry, ScanResult, StatusCode,
//!     VcsViewItem,
//! };
//!
//! let registry = FactoryRegistry::builder()
//!     .register(ConflictItemFactory)
//!     .build()
//!     .unwrap();
//!
//! let scan = ScanResult::from(vec![
//!     RawChangeEntry::new("a.txt", StatusCode::Conflicted),
//!     RawChangeEntry::new("b.txt", StatusCode::Staged),
//! ]);
//!
//! let items = materialize(&scan, &registry).unwrap();
//! assert!(matches!(items[0], VcsViewItem::Conflicted(_)));
//! assert!(matches!(items[1], VcsViewItem::Unknown(_)));
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

mod entry;
mod error;
mod factory;
mod item;
mod materialize;
mod registry;

pub use entry::{PorcelainCode, RawChangeEntry, ScanResult, StatusCode};
pub use error::{Error, FactoryError, RegistryError};
pub use factory::{
	BaseVcsItemFactory, ConflictItemFactory, RenamedItemFactory, StagedItemFactory,
	UnstagedItemFactory, UntrackedItemFactory, VcsItemFactory,
};
pub use item::{
	ChangeKind, ConflictItem, ConflictKind, RenamedItem, StagedItem, UnknownItem, UnstagedItem,
	UntrackedItem, VcsViewItem,
};
pub use materialize::materialize;
pub use registry::{FactoryRegistry, FactoryRegistryBuilder};
