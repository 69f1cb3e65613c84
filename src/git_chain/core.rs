use std::collections::BTreeSet;
use std::process::{self, Command, Output};

use colored::*;
use git2::{
    BranchType, Config, ConfigLevel, ErrorClass, ErrorCode, Oid, Repository, RepositoryState,
};
use regex::Regex;

use super::GitChain;
use crate::error::ChainError;
use crate::executable_name;
use crate::gateway::Gateway;
use crate::types::ConfigScope;

impl GitChain {
    pub fn init() -> Result<Self, ChainError> {
        let name_of_current_executable = executable_name();

        let repo = match Repository::discover(".") {
            Ok(repo) => repo,
            Err(ref e)
                if e.class() == ErrorClass::Repository && e.code() == ErrorCode::NotFound =>
            {
                eprintln!(
                    "{} Not a git repository (or any of the parent directories)",
                    "error:".red().bold()
                );
                eprintln!(
                    "\n{} This command must be run inside a git repository.",
                    "hint:".yellow().bold()
                );
                eprintln!(
                    "{} Run {} to create a new git repository.",
                    "hint:".yellow().bold(),
                    "git init".bold()
                );
                process::exit(1);
            }
            Err(e) => return Err(e.into()),
        };

        if repo.is_bare() {
            eprintln!(
                "Cannot run {} on bare git repository.",
                name_of_current_executable
            );
            process::exit(1);
        }

        let git_chain = GitChain {
            repo,
            executable_name: name_of_current_executable,
        };
        Ok(git_chain)
    }

    pub fn get_local_git_config(&self) -> Result<Config, ChainError> {
        Ok(self.repo.config()?.open_level(ConfigLevel::Local)?)
    }

    fn get_git_config_at(&self, scope: ConfigScope) -> Result<Config, ChainError> {
        match scope {
            ConfigScope::Local => self.get_local_git_config(),
            ConfigScope::Global => Ok(Config::open_default()?.open_level(ConfigLevel::Global)?),
        }
    }

    fn oid_of(&self, reference: &str) -> Result<Oid, ChainError> {
        Ok(Oid::from_str(&self.resolve(reference)?)?)
    }

    fn run_git(&self, args: &[&str], non_interactive: bool) -> Result<Output, ChainError> {
        let command = format!("git {}", args.join(" "));

        let mut git = Command::new("git");
        git.args(args);
        if non_interactive {
            git.env("GIT_EDITOR", "true");
        }

        let output = git.output()?;
        if !output.status.success() {
            return Err(ChainError::git_command_failed(command, &output));
        }
        Ok(output)
    }

    /// Commits on `branch` not on `upstream`, and the other way around.
    pub fn ahead_behind(&self, upstream: &str, branch: &str) -> Result<(usize, usize), ChainError> {
        let upstream_oid = self.oid_of(upstream)?;
        let branch_oid = self.oid_of(branch)?;
        Ok(self.repo.graph_ahead_behind(branch_oid, upstream_oid)?)
    }
}

impl Gateway for GitChain {
    fn resolve(&self, reference: &str) -> Result<String, ChainError> {
        let object = match self.repo.revparse_single(reference) {
            Ok(object) => object,
            Err(ref e) if e.code() == ErrorCode::NotFound => {
                return Err(ChainError::RefNotFound(reference.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(object.peel_to_commit()?.id().to_string())
    }

    fn merge_base(&self, references: &[&str]) -> Result<Option<String>, ChainError> {
        let oids = references
            .iter()
            .map(|reference| self.oid_of(reference))
            .collect::<Result<Vec<Oid>, ChainError>>()?;

        let merge_base = match oids.as_slice() {
            [] => return Ok(None),
            [only] => return Ok(Some(only.to_string())),
            [one, two] => self.repo.merge_base(*one, *two),
            _ => self.repo.merge_base_many(&oids),
        };

        match merge_base {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(ref e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn is_ancestor(&self, ancestor: &str, reference: &str) -> Result<bool, ChainError> {
        let ancestor_oid = self.oid_of(ancestor)?;
        let descendant_oid = self.oid_of(reference)?;

        if ancestor_oid == descendant_oid {
            return Ok(true);
        }

        Ok(self.repo.graph_descendant_of(descendant_oid, ancestor_oid)?)
    }

    fn rebase_onto(
        &self,
        new_base: &str,
        range_lower: &str,
        branch: &str,
        keep_empty: bool,
    ) -> Result<(), ChainError> {
        // git rebase --keep-empty --onto <new_base> <range_lower> <branch>
        let mut args = vec!["rebase"];
        if keep_empty {
            args.push("--keep-empty");
        }
        args.extend(["--onto", new_base, range_lower, branch]);

        self.run_git(&args, false)?;
        Ok(())
    }

    fn cherry_pick_continue(&self) -> Result<(), ChainError> {
        self.run_git(&["cherry-pick", "--continue"], true)?;
        Ok(())
    }

    fn rebase_in_progress(&self) -> Result<bool, ChainError> {
        Ok(matches!(
            self.repo.state(),
            RepositoryState::Rebase
                | RepositoryState::RebaseInteractive
                | RepositoryState::RebaseMerge
                | RepositoryState::ApplyMailboxOrRebase
        ))
    }

    fn cherry_pick_in_progress(&self) -> Result<bool, ChainError> {
        Ok(matches!(
            self.repo.state(),
            RepositoryState::CherryPick | RepositoryState::CherryPickSequence
        ))
    }

    fn cherry_pick_target(&self) -> Result<String, ChainError> {
        self.resolve("CHERRY_PICK_HEAD")
    }

    fn force_branch(&self, branch: &str) -> Result<(), ChainError> {
        // git checkout -B <branch>
        self.run_git(&["checkout", "-B", branch], false)?;
        Ok(())
    }

    fn list_branches(&self) -> Result<BTreeSet<String>, ChainError> {
        let mut names = BTreeSet::new();
        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _branch_type) = entry?;
            if let Some(name) = branch.name()? {
                names.insert(name.to_string());
            }
        }
        Ok(names)
    }

    fn current_branch(&self) -> Result<Option<String>, ChainError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(ref e)
                if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(str::to_string))
    }

    fn checkout(&self, branch_name: &str) -> Result<(), ChainError> {
        let (object, reference) = self.repo.revparse_ext(branch_name)?;

        // set working directory
        self.repo.checkout_tree(&object, None)?;

        // set HEAD to branch_name
        match reference.as_ref().and_then(|r| r.name()) {
            // ref_name is an actual reference like branches or tags
            Some(ref_name) => self.repo.set_head(ref_name)?,
            // this is a commit, not a reference
            None => self.repo.set_head_detached(object.id())?,
        }

        Ok(())
    }

    fn get_config(&self, key: &str) -> Result<Option<String>, ChainError> {
        let local_config = self.get_local_git_config()?;
        match local_config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(ref e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_configs_matching(&self, regexp: &Regex) -> Result<Vec<(String, String)>, ChainError> {
        let local_config = self.get_local_git_config()?;
        let mut entries = vec![];

        local_config.entries(None)?.for_each(|entry| {
            if let (Some(key), Some(value)) = (entry.name(), entry.value()) {
                if regexp.is_match(key) {
                    entries.push((key.to_string(), value.to_string()));
                }
            }
        })?;

        Ok(entries)
    }

    fn set_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<(), ChainError> {
        let mut config = self.get_git_config_at(scope)?;
        config.set_str(key, value)?;
        Ok(())
    }

    fn unset_config(&self, key: &str) -> Result<(), ChainError> {
        let mut local_config = self.get_local_git_config()?;
        match local_config.remove(key) {
            Ok(()) => Ok(()),
            Err(ref e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
