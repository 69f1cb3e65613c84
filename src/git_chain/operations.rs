use colored::*;

use super::GitChain;
use crate::error::ChainError;
use crate::gateway::Gateway;
use crate::rebase::ensure_no_rebase_in_progress;
use crate::types::ListFormat;
use crate::Chain;

impl GitChain {
    pub fn rebase(&self, chain_name: Option<&str>) -> Result<(), ChainError> {
        // HEAD is detached in the middle of a rebase, so check before looking
        // up the current chain.
        ensure_no_rebase_in_progress(self)?;

        let orig_branch = self.current_branch()?;
        let mut chain = Chain::current(self, chain_name)?;

        println!("Rebasing chain {}", chain.formatted());

        let outcome = chain.rebase(self)?;

        println!();
        if outcome.is_up_to_date() {
            println!("Chain {} is already up-to-date.", outcome.chain_name.bold());
        } else {
            println!(
                "🎉 {} {}",
                "Successfully rebased chain".green(),
                outcome.chain_name.bold()
            );
        }

        if let Some(orig_branch) = orig_branch {
            if self.current_branch()?.as_deref() != Some(orig_branch.as_str()) {
                println!("Switching back to branch: {}", orig_branch.bold());
                self.checkout(&orig_branch)?;
            }
        }

        Ok(())
    }

    pub fn setup_chain(&self, chain_name: &str, branch_names: &[String]) -> Result<(), ChainError> {
        let report = Chain::setup(self, chain_name, branch_names)?;

        if !report.removed.is_empty() {
            let removed: Vec<String> = report
                .removed
                .iter()
                .map(|name| name.bold().to_string())
                .collect();
            println!(
                "{} Removed {} from the chain.",
                "⚠️".yellow(),
                removed.join(", ")
            );
        }

        println!("🔗 Configured chain {}", report.chain.formatted());
        Ok(())
    }

    pub fn list_chains(&self, filter: Option<&str>, format: ListFormat) -> Result<(), ChainError> {
        let chain_names = Chain::chain_names(self, filter)?;

        if chain_names.is_empty() {
            if let Some(chain_name) = filter {
                return Err(ChainError::ChainNotFound(chain_name.to_string()));
            }
            println!("No chains to list.");
            println!(
                "To set up a chain, run {} setup <chain_name> <root_branch> <branch>...",
                self.executable_name
            );
            return Ok(());
        }

        match format {
            ListFormat::Short => {
                for chain_name in chain_names {
                    println!("{}", chain_name);
                }
            }
            ListFormat::Full => {
                let current = self.current_chain_name()?;

                for chain_name in chain_names {
                    let chain = Chain::from_config(self, &chain_name)?;
                    let prefix = match &current {
                        Some(current) if *current == chain_name => "* ".yellow().to_string(),
                        _ => "  ".to_string(),
                    };
                    println!("{}{}", prefix, chain.formatted());
                }
            }
        }

        Ok(())
    }

    fn current_chain_name(&self) -> Result<Option<String>, ChainError> {
        match self.current_branch()? {
            Some(branch_name) => self.get_config(&crate::branch::chain_name_key(&branch_name)),
            None => Ok(None),
        }
    }

    pub fn run_status(&self) -> Result<(), ChainError> {
        let branch_name = self
            .current_branch()?
            .ok_or_else(|| ChainError::NotPartOfChain("HEAD".to_string()))?;
        println!("On branch: {}", branch_name.bold());
        println!();

        let chain = match Chain::current(self, None) {
            Ok(chain) => chain,
            Err(ChainError::NotPartOfChain(branch_name)) => {
                return Err(ChainError::NotPartOfChain(format!(
                    "{}\nTo set up a chain for this branch, run {} setup <chain_name> <root_branch> <branch>...",
                    branch_name, self.executable_name
                )));
            }
            Err(e) => return Err(e),
        };

        self.display_list(&chain, &branch_name)
    }

    fn display_ahead_behind(&self, upstream: &str, branch: &str) -> Result<String, ChainError> {
        let status = match self.ahead_behind(upstream, branch)? {
            (0, 0) => "".to_string(),
            (ahead, 0) => {
                format!("{} ahead", ahead)
            }
            (0, behind) => {
                format!("{} behind", behind)
            }
            (ahead, behind) => {
                format!("{} ahead ⦁ {} behind", ahead, behind)
            }
        };

        Ok(status)
    }

    /// Prints the chain tip first, root last, with each branch's distance to its parent.
    pub fn display_list(&self, chain: &Chain, current_branch: &str) -> Result<(), ChainError> {
        println!("{}", chain.name);

        for (index, branch) in chain.branches.iter().enumerate().rev() {
            let (marker, branch_name) = if branch.name == current_branch {
                ("➜ ", branch.name.bold().to_string())
            } else {
                ("", branch.name.clone())
            };

            if index == 0 {
                println!("{:>6}{} (root branch)", marker, branch_name);
                continue;
            }

            let upstream = &chain.branches[index - 1].name;
            let ahead_behind_status = self.display_ahead_behind(upstream, &branch.name)?;

            let status_line = if ahead_behind_status.is_empty() {
                format!("{:>6}{}", marker, branch_name)
            } else {
                format!("{:>6}{} ⦁ {}", marker, branch_name, ahead_behind_status)
            };

            println!("{}", status_line.trim_end());
        }

        Ok(())
    }
}
