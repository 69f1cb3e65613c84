use colored::*;

use crate::error::ChainError;
use crate::gateway::Gateway;
use crate::types::{BranchUpdate, ConfigScope, RebaseOutcome};
use crate::{branch, Branch, Chain};

/// Refuses to go on while git itself is in the middle of a rebase.
pub fn ensure_no_rebase_in_progress<G: Gateway>(gateway: &G) -> Result<(), ChainError> {
    if gateway.rebase_in_progress()? {
        return Err(ChainError::ConflictInProgress);
    }
    Ok(())
}

/// Whether the recorded branch point of `branch` can move to its parent's tip
/// without replaying anything.
///
/// Either the parent is already contained in the branch, or the old branch
/// point is still an ancestor of where the branch and its parent meet. The
/// second case is a parent that only moved forward; a rewritten parent pulls
/// that meeting point behind the old branch point and fails the check.
pub fn forwardable_branch_point<G: Gateway>(
    gateway: &G,
    parent_branch: &str,
    branch: &Branch,
) -> Result<bool, ChainError> {
    if gateway.is_ancestor(parent_branch, &branch.name)? {
        return Ok(true);
    }

    let branch_point = match &branch.branch_point {
        Some(branch_point) => branch_point,
        None => return Ok(false),
    };

    let common_point = match gateway.merge_base(&[parent_branch, branch.name.as_str()])? {
        Some(common_point) => common_point,
        None => return Ok(false),
    };

    let merge_base = gateway.merge_base(&[branch_point.as_str(), common_point.as_str()])?;
    Ok(merge_base.as_deref() == Some(branch_point.as_str()))
}

impl Chain {
    /// Rebases every non-root branch onto the branch before it, in order.
    ///
    /// Branch points are persisted one branch at a time as each rebase
    /// succeeds. A failing rebase stops the run and leaves that branch and
    /// everything after it as they were.
    pub fn rebase<G: Gateway>(&mut self, gateway: &G) -> Result<RebaseOutcome, ChainError> {
        ensure_no_rebase_in_progress(gateway)?;

        self.resume_cherry_pick(gateway)?;

        if self.branches.len() < 2 {
            return Err(ChainError::NoBranchesToRebase {
                chain: self.name.clone(),
            });
        }

        let total = self.branches.len() - 1;
        let mut updates = Vec::with_capacity(total);

        for index in 1..self.branches.len() {
            let parent_branch = self.branches[index - 1].name.clone();
            let branch = &mut self.branches[index];

            println!(
                "📌 [{}/{}] Rebasing {} onto {}...",
                index,
                total,
                branch.name.bold(),
                parent_branch.bold()
            );

            let update = rebase_branch(gateway, &parent_branch, branch)?;
            updates.push((branch.name.clone(), update));
        }

        Ok(RebaseOutcome {
            chain_name: self.name.clone(),
            updates,
        })
    }

    /// Finishes a cherry-pick left behind by an earlier run. Any branch whose
    /// tip is the commit being picked is moved to the continued result, so the
    /// loop sees it as resolved.
    fn resume_cherry_pick<G: Gateway>(&self, gateway: &G) -> Result<(), ChainError> {
        if !gateway.cherry_pick_in_progress()? {
            return Ok(());
        }

        let cherry_pick_target = gateway.cherry_pick_target()?;
        println!("Continuing cherry-pick of {}", cherry_pick_target.bold());
        gateway.cherry_pick_continue()?;

        for branch in self.branches.iter().skip(1) {
            if gateway.resolve(&branch.name)? == cherry_pick_target {
                println!(
                    "Moving {} to the resolved cherry-pick",
                    branch.name.bold()
                );
                gateway.force_branch(&branch.name)?;
            }
        }

        Ok(())
    }
}

fn rebase_branch<G: Gateway>(
    gateway: &G,
    parent_branch: &str,
    branch: &mut Branch,
) -> Result<BranchUpdate, ChainError> {
    let parent_sha = gateway.resolve(parent_branch)?;

    if branch.branch_point.as_deref() == Some(parent_sha.as_str()) {
        println!("Branch {} is already up-to-date.", branch.name.bold());
        return Ok(BranchUpdate::UpToDate);
    }

    // Only kept in memory until the rebase below goes through.
    let forwarded = forwardable_branch_point(gateway, parent_branch, branch)?;
    if forwarded {
        println!(
            "Auto-forwarding {} to {}",
            branch.name.bold(),
            parent_branch.bold()
        );
        branch.branch_point = Some(parent_sha.clone());
    }

    let range_lower = match &branch.branch_point {
        Some(branch_point) => branch_point.clone(),
        None => gateway
            .merge_base(&[parent_branch, branch.name.as_str()])?
            .ok_or_else(|| {
                ChainError::NotConnected(vec![parent_branch.to_string(), branch.name.clone()])
            })?,
    };

    println!(
        "git rebase --keep-empty --onto {} {} {}",
        parent_branch, range_lower, branch.name
    );

    match gateway.rebase_onto(parent_branch, &range_lower, &branch.name, true) {
        Ok(()) => {}
        Err(ChainError::GitCommand { stdout, stderr, .. }) => {
            let message = format!("{}{}", stdout, stderr);
            eprintln!("{}", message.trim_end().yellow());
            return Err(ChainError::ConflictFailure {
                branch: branch.name.clone(),
                parent: parent_branch.to_string(),
                message,
            });
        }
        Err(e) => return Err(e),
    }

    gateway.set_config(
        &branch::branch_point_key(&branch.name),
        &parent_sha,
        ConfigScope::Local,
    )?;
    branch.branch_point = Some(parent_sha);

    if forwarded {
        Ok(BranchUpdate::Forwarded)
    } else {
        Ok(BranchUpdate::Replayed)
    }
}
