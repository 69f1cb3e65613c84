use crate::Chain;

// Where a git config value is written.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ConfigScope {
    // The repository's own .git/config
    Local,

    // The user's ~/.gitconfig
    #[allow(dead_code)]
    Global,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ListFormat {
    // Only chain names, one per line
    Short,

    // Chain name followed by its branches
    Full,
}

// What happened to a single branch during a chain rebase.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BranchUpdate {
    // The recorded branch point already matches the parent's tip
    UpToDate,

    // The branch point was advanced without replaying, then the rebase was confirmed
    Forwarded,

    // The branch's own commits were replayed onto its parent
    Replayed,
}

#[derive(Debug)]
pub struct RebaseOutcome {
    pub chain_name: String,
    pub updates: Vec<(String, BranchUpdate)>,
}

impl RebaseOutcome {
    pub fn num_of_updates(&self) -> usize {
        self.updates
            .iter()
            .filter(|(_, update)| *update != BranchUpdate::UpToDate)
            .count()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.num_of_updates() == 0
    }
}

pub struct SetupReport {
    pub chain: Chain,
    pub removed: Vec<String>,
}
