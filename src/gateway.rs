use std::collections::BTreeSet;

use regex::Regex;

use crate::error::ChainError;
use crate::types::ConfigScope;

/// Everything the chain model and the rebase engine need from version control.
///
/// `GitChain` implements this against a real repository. Refs are anything
/// git can resolve: branch names, full or abbreviated commit ids, `HEAD`.
pub trait Gateway {
    /// Resolves `reference` to a full commit id.
    fn resolve(&self, reference: &str) -> Result<String, ChainError>;

    /// Best common ancestor of all `references`, or `None` when they are unrelated.
    fn merge_base(&self, references: &[&str]) -> Result<Option<String>, ChainError>;

    /// Whether `ancestor` is reachable from `reference`. A commit is its own ancestor.
    fn is_ancestor(&self, ancestor: &str, reference: &str) -> Result<bool, ChainError>;

    /// `git rebase --onto <new_base> <range_lower> <branch>`
    fn rebase_onto(
        &self,
        new_base: &str,
        range_lower: &str,
        branch: &str,
        keep_empty: bool,
    ) -> Result<(), ChainError>;

    fn cherry_pick_continue(&self) -> Result<(), ChainError>;

    fn rebase_in_progress(&self) -> Result<bool, ChainError>;

    fn cherry_pick_in_progress(&self) -> Result<bool, ChainError>;

    /// The commit being cherry-picked, while a cherry-pick is in progress.
    fn cherry_pick_target(&self) -> Result<String, ChainError>;

    /// Points `branch` at the current HEAD and checks it out.
    fn force_branch(&self, branch: &str) -> Result<(), ChainError>;

    fn list_branches(&self) -> Result<BTreeSet<String>, ChainError>;

    fn current_branch(&self) -> Result<Option<String>, ChainError>;

    fn checkout(&self, branch: &str) -> Result<(), ChainError>;

    fn get_config(&self, key: &str) -> Result<Option<String>, ChainError>;

    fn get_configs_matching(&self, regexp: &Regex) -> Result<Vec<(String, String)>, ChainError>;

    fn set_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<(), ChainError>;

    /// Removing a key that does not exist is not an error.
    fn unset_config(&self, key: &str) -> Result<(), ChainError>;
}
