//! Chart of accounts domain logic.
//!
//! - Account types, natures, and the type/nature consistency rule
//! - Automatic account-code assignment
//! - Assembly of the account forest from flat parent pointers

pub mod account;
pub mod code;
pub mod tree;

pub use account::{Account, AccountNature, AccountType};
pub use code::next_code;
pub use tree::{build_tree, AccountNode, OrphanParent, TreeOutcome};
