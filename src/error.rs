use std::fmt;

use thiserror::Error;

/// How a set of branch records failed to form a single path.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokenLink {
    // No remaining branch has the expected parent. Holds the unreachable branches.
    Disconnected(Vec<String>),

    // More than one remaining branch claims the same parent.
    Forked(Vec<String>),
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenLink::Disconnected(branches) => {
                write!(f, "unreachable branches: {}", branches.join(", "))
            }
            BrokenLink::Forked(branches) => {
                write!(f, "competing branches: {}", branches.join(", "))
            }
        }
    }
}

fn describe_broken_chain(chain: &str, parent: &Option<String>, link: &BrokenLink) -> String {
    match (parent, link) {
        (None, BrokenLink::Disconnected(_)) => {
            format!("Chain {} has no root branch ({})", chain, link)
        }
        (None, BrokenLink::Forked(_)) => {
            format!("Chain {} has more than one root branch ({})", chain, link)
        }
        (Some(parent), BrokenLink::Disconnected(_)) => format!(
            "Branch {} is not connected to the rest of chain {} ({})",
            parent, chain, link
        ),
        (Some(parent), BrokenLink::Forked(_)) => format!(
            "Branch {} has more than one child in chain {} ({})",
            parent, chain, link
        ),
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("{}", describe_broken_chain(.chain, .parent, .link))]
    BrokenChain {
        chain: String,
        parent: Option<String>,
        link: BrokenLink,
    },

    #[error(
        "A rebase is in progress. Finish it with 'git rebase --continue' or 'git rebase --abort' first, then rebase the chain again."
    )]
    ConflictInProgress,

    #[error("Cannot rebase {branch} onto {parent}.\nFix the rebase and run the chain rebase again.")]
    ConflictFailure {
        branch: String,
        parent: String,
        message: String,
    },

    #[error("No branches to rebase for chain '{chain}'.")]
    NoBranchesToRebase { chain: String },

    #[error("Unable to resolve reference: {0}")]
    RefNotFound(String),

    #[error("Branch does not exist: {}", .0.join(", "))]
    MissingBranches(Vec<String>),

    #[error("{0} cannot be part of the chain multiple times")]
    DuplicateBranch(String),

    #[error("Branches are not all connected: {}", .0.join(", "))]
    NotConnected(Vec<String>),

    #[error("Branch {branch} is currently attached to chain {chain}")]
    AttachedToOtherChain { branch: String, chain: String },

    #[error("Branch is not part of any chain: {0}")]
    NotPartOfChain(String),

    #[error("Chain does not exist: {0}")]
    ChainNotFound(String),

    #[error("A chain needs a root branch and at least one other branch")]
    TooFewBranches,

    #[error("Git command failed: {command}\nStatus: {status}\nStdout: {stdout}\nStderr: {stderr}")]
    GitCommand {
        command: String,
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChainError {
    pub fn git_command_failed(command: String, output: &std::process::Output) -> Self {
        ChainError::GitCommand {
            command,
            status: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
