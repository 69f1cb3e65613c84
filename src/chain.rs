use std::collections::{BTreeSet, HashSet};

use colored::*;
use regex::Regex;

use crate::error::{BrokenLink, ChainError};
use crate::gateway::Gateway;
use crate::types::SetupReport;
use crate::Branch;

fn chain_key_regex() -> Regex {
    Regex::new(r"^branch\.(?P<branch_name>.+)\.chain$").expect("chain key pattern is valid")
}

/// Orders `branches` into a single path starting at the record with no parent.
///
/// Each step must find exactly one remaining record whose parent is the
/// previously placed branch. Forks, cycles and stragglers are rejected as a
/// whole; nothing partial is returned.
pub fn sort_branches(chain_name: &str, branches: Vec<Branch>) -> Result<Vec<Branch>, ChainError> {
    let mut sorted: Vec<Branch> = Vec::with_capacity(branches.len());
    let mut remaining = branches;
    let mut current_parent: Option<String> = None;

    while !remaining.is_empty() {
        let matches: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, branch)| branch.parent_branch == current_parent)
            .map(|(index, _)| index)
            .collect();

        match matches.as_slice() {
            [index] => {
                let node = remaining.remove(*index);
                current_parent = Some(node.name.clone());
                sorted.push(node);
            }
            [] => {
                return Err(ChainError::BrokenChain {
                    chain: chain_name.to_string(),
                    parent: current_parent,
                    link: BrokenLink::Disconnected(
                        remaining.into_iter().map(|b| b.name).collect(),
                    ),
                });
            }
            _ => {
                return Err(ChainError::BrokenChain {
                    chain: chain_name.to_string(),
                    parent: current_parent,
                    link: BrokenLink::Forked(
                        matches.iter().map(|i| remaining[*i].name.clone()).collect(),
                    ),
                });
            }
        }
    }

    Ok(sorted)
}

#[derive(Clone, Debug)]
pub struct Chain {
    pub name: String,
    pub branches: Vec<Branch>,
}

impl Chain {
    fn get_all_branch_configs<G: Gateway>(gateway: &G) -> Result<Vec<(String, String)>, ChainError> {
        gateway.get_configs_matching(&chain_key_regex())
    }

    /// Names of the branches tagged with `chain_name`, in config order.
    pub fn member_names<G: Gateway>(gateway: &G, chain_name: &str) -> Result<Vec<String>, ChainError> {
        let key_regex = chain_key_regex();
        let mut names = vec![];

        for (key, value) in Chain::get_all_branch_configs(gateway)? {
            if value != chain_name {
                continue;
            }
            if let Some(captures) = key_regex.captures(&key) {
                names.push(captures["branch_name"].to_string());
            }
        }

        Ok(names)
    }

    /// Every chain name in the repository, sorted and deduplicated.
    /// With `filter`, only that name (if it exists).
    pub fn chain_names<G: Gateway>(gateway: &G, filter: Option<&str>) -> Result<Vec<String>, ChainError> {
        let names: BTreeSet<String> = Chain::get_all_branch_configs(gateway)?
            .into_iter()
            .map(|(_key, chain_name)| chain_name)
            .filter(|chain_name| filter.map_or(true, |wanted| *chain_name == wanted))
            .collect();
        Ok(names.into_iter().collect())
    }

    pub fn chain_exists<G: Gateway>(gateway: &G, chain_name: &str) -> Result<bool, ChainError> {
        Ok(!Chain::member_names(gateway, chain_name)?.is_empty())
    }

    pub fn from_config<G: Gateway>(gateway: &G, chain_name: &str) -> Result<Self, ChainError> {
        let mut branches = Chain::member_names(gateway, chain_name)?
            .iter()
            .map(|name| Branch::from_config(gateway, name))
            .collect::<Result<Vec<Branch>, ChainError>>()?;

        // The base of a chain is never tagged with it; it is implied by the
        // first member's parent.
        if !branches.iter().any(|b| b.parent_branch.is_none()) {
            let members: HashSet<&str> = branches.iter().map(|b| b.name.as_str()).collect();
            let roots: BTreeSet<&str> = branches
                .iter()
                .filter_map(|b| b.parent_branch.as_deref())
                .filter(|parent| !members.contains(parent))
                .collect();

            let roots = roots
                .into_iter()
                .map(|root| Branch::root_from_config(gateway, root))
                .collect::<Result<Vec<Branch>, ChainError>>()?;
            branches.extend(roots);
        }

        Ok(Chain {
            name: chain_name.to_string(),
            branches: sort_branches(chain_name, branches)?,
        })
    }

    /// The chain named on the command line, or else the chain of the checked-out branch.
    pub fn current<G: Gateway>(gateway: &G, chain_name: Option<&str>) -> Result<Self, ChainError> {
        if let Some(chain_name) = chain_name {
            if !Chain::chain_exists(gateway, chain_name)? {
                return Err(ChainError::ChainNotFound(chain_name.to_string()));
            }
            return Chain::from_config(gateway, chain_name);
        }

        let branch_name = gateway
            .current_branch()?
            .ok_or_else(|| ChainError::NotPartOfChain("HEAD".to_string()))?;

        match Branch::from_config(gateway, &branch_name)?.chain_name {
            Some(chain_name) => Chain::from_config(gateway, &chain_name),
            None => Err(ChainError::NotPartOfChain(branch_name)),
        }
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches.iter().map(|b| b.name.clone()).collect()
    }

    pub fn formatted(&self) -> String {
        let names: Vec<String> = self
            .branches
            .iter()
            .map(|b| b.name.cyan().to_string())
            .collect();
        format!("{} [{}]", self.name.bold(), names.join(" -> "))
    }

    /// Records `branch_names` as the chain `chain_name`: the first entry is the
    /// root, every other entry is stacked on the one before it.
    ///
    /// Previous members missing from the new list are detached. Membership is
    /// read raw rather than sorted, so a broken chain can be repaired here.
    pub fn setup<G: Gateway>(
        gateway: &G,
        chain_name: &str,
        branch_names: &[String],
    ) -> Result<SetupReport, ChainError> {
        if branch_names.len() < 2 {
            return Err(ChainError::TooFewBranches);
        }

        let existing = gateway.list_branches()?;
        let missing: Vec<String> = branch_names
            .iter()
            .filter(|name| !existing.contains(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ChainError::MissingBranches(missing));
        }

        let mut seen = HashSet::new();
        for name in branch_names {
            if !seen.insert(name.as_str()) {
                return Err(ChainError::DuplicateBranch(name.clone()));
            }
        }

        let refs: Vec<&str> = branch_names.iter().map(String::as_str).collect();
        if gateway.merge_base(&refs)?.is_none() {
            return Err(ChainError::NotConnected(branch_names.to_vec()));
        }

        let mut branches = branch_names[1..]
            .iter()
            .map(|name| Branch::from_config(gateway, name))
            .collect::<Result<Vec<Branch>, ChainError>>()?;

        for branch in &branches {
            if let Some(other_chain) = &branch.chain_name {
                if other_chain != chain_name {
                    return Err(ChainError::AttachedToOtherChain {
                        branch: branch.name.clone(),
                        chain: other_chain.clone(),
                    });
                }
            }
        }

        let previous_members = Chain::member_names(gateway, chain_name)?;

        for (index, branch) in branches.iter_mut().enumerate() {
            // branch_names[index] is the entry right before this branch
            let parent_branch = &branch_names[index];

            if !branch.is_member_of(chain_name) {
                branch.set_chain_name(gateway, Some(chain_name))?;
            }

            if branch.parent_branch.as_deref() != Some(parent_branch.as_str()) {
                if let Some(old_parent) = &branch.parent_branch {
                    println!(
                        "Changing parent branch of {} from {} to {}",
                        branch.name.bold(),
                        old_parent.bold(),
                        parent_branch.bold()
                    );
                }
                branch.set_parent_branch(gateway, Some(parent_branch))?;
            }

            let branch_point = gateway
                .merge_base(&[parent_branch.as_str(), branch.name.as_str()])?
                .ok_or_else(|| {
                    ChainError::NotConnected(vec![parent_branch.clone(), branch.name.clone()])
                })?;

            if gateway.resolve(parent_branch)? != branch_point {
                println!(
                    "{} is not currently branched from the tip of {}",
                    branch.name.bold(),
                    parent_branch.bold()
                );
            }

            if branch.branch_point.as_deref() != Some(branch_point.as_str()) {
                branch.set_branch_point(gateway, Some(&branch_point))?;
            }
        }

        let kept: HashSet<&str> = branch_names[1..].iter().map(String::as_str).collect();
        let mut removed = vec![];
        for name in previous_members {
            if kept.contains(name.as_str()) {
                continue;
            }
            Branch::new(&name).remove_from_chain(gateway)?;
            removed.push(name);
        }

        Ok(SetupReport {
            chain: Chain::from_config(gateway, chain_name)?,
            removed,
        })
    }
}
