//! Assembly of the account forest from flat parent pointers.
//!
//! The chart of accounts is stored flat with nullable `parent_id` pointers.
//! Real data drifts: a parent may have been deleted, or pointers may even
//! form a cycle. Assembly never crashes and never drops an account - any
//! account whose parent cannot be resolved is promoted to a tree root and
//! reported, so the reconciliation audit can surface it.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use corebook_shared::types::AccountId;

use super::account::Account;

/// An account with its children, assembled into a tree.
#[derive(Debug, Clone, Serialize)]
pub struct AccountNode {
    /// The account at this node.
    pub account: Account,
    /// Child accounts, ordered by code.
    pub children: Vec<AccountNode>,
}

/// A parent pointer that could not be resolved during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanParent {
    /// Code of the account whose parent is missing or cyclic.
    pub code: String,
    /// The unresolved parent id.
    pub parent_id: Uuid,
}

/// Result of assembling the account forest.
#[derive(Debug, Clone, Serialize)]
pub struct TreeOutcome {
    /// Root nodes, ordered by code. Includes promoted orphans.
    pub roots: Vec<AccountNode>,
    /// Accounts promoted to roots because their parent did not resolve.
    pub orphans: Vec<OrphanParent>,
}

/// Builds parent->children trees from a flat account list in one pass.
#[must_use]
pub fn build_tree(accounts: Vec<Account>) -> TreeOutcome {
    let index_by_id: HashMap<AccountId, usize> = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| (account.id, idx))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); accounts.len()];
    let mut roots: Vec<usize> = Vec::new();
    let mut orphans: Vec<OrphanParent> = Vec::new();

    for (idx, account) in accounts.iter().enumerate() {
        match account.parent_id {
            None => roots.push(idx),
            Some(parent_id) => match index_by_id.get(&parent_id) {
                Some(&parent_idx) => children[parent_idx].push(idx),
                None => {
                    orphans.push(OrphanParent {
                        code: account.code.clone(),
                        parent_id: parent_id.into_inner(),
                    });
                    roots.push(idx);
                }
            },
        }
    }

    // Cycle guard: nodes unreachable from any root sit on a parent cycle.
    // Promote one entry point per cycle until everything is reachable.
    let mut visited = vec![false; accounts.len()];
    for &root in &roots {
        mark_reachable(root, &children, &mut visited);
    }
    for idx in 0..accounts.len() {
        if !visited[idx] {
            let account = &accounts[idx];
            orphans.push(OrphanParent {
                code: account.code.clone(),
                parent_id: account
                    .parent_id
                    .map_or_else(Uuid::nil, AccountId::into_inner),
            });
            // Detach from the cycle so the subtree is built exactly once.
            if let Some(parent_id) = account.parent_id {
                if let Some(&parent_idx) = index_by_id.get(&parent_id) {
                    children[parent_idx].retain(|&c| c != idx);
                }
            }
            roots.push(idx);
            mark_reachable(idx, &children, &mut visited);
        }
    }

    let mut root_nodes: Vec<AccountNode> = roots
        .into_iter()
        .map(|idx| assemble(idx, &accounts, &children))
        .collect();
    root_nodes.sort_by(|a, b| a.account.code.cmp(&b.account.code));

    TreeOutcome {
        roots: root_nodes,
        orphans,
    }
}

fn mark_reachable(idx: usize, children: &[Vec<usize>], visited: &mut [bool]) {
    if visited[idx] {
        return;
    }
    visited[idx] = true;
    for &child in &children[idx] {
        mark_reachable(child, children, visited);
    }
}

fn assemble(idx: usize, accounts: &[Account], children: &[Vec<usize>]) -> AccountNode {
    let mut child_nodes: Vec<AccountNode> = children[idx]
        .iter()
        .map(|&child| assemble(child, accounts, children))
        .collect();
    child_nodes.sort_by(|a, b| a.account.code.cmp(&b.account.code));

    AccountNode {
        account: accounts[idx].clone(),
        children: child_nodes,
    }
}
