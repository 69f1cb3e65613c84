use crate::error::ChainError;
use crate::gateway::Gateway;
use crate::types::ConfigScope;

pub fn chain_name_key(branch_name: &str) -> String {
    format!("branch.{}.chain", branch_name)
}

pub fn parent_branch_key(branch_name: &str) -> String {
    format!("branch.{}.parentBranch", branch_name)
}

pub fn branch_point_key(branch_name: &str) -> String {
    format!("branch.{}.branchPoint", branch_name)
}

fn set_or_unset<G: Gateway>(gateway: &G, key: &str, value: Option<&str>) -> Result<(), ChainError> {
    match value {
        Some(value) => gateway.set_config(key, value, ConfigScope::Local),
        None => gateway.unset_config(key),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub name: String,
    pub chain_name: Option<String>,
    pub parent_branch: Option<String>,
    pub branch_point: Option<String>,
}

impl Branch {
    pub fn new(name: &str) -> Self {
        Branch {
            name: name.to_string(),
            chain_name: None,
            parent_branch: None,
            branch_point: None,
        }
    }

    pub fn from_config<G: Gateway>(gateway: &G, branch_name: &str) -> Result<Self, ChainError> {
        Ok(Branch {
            name: branch_name.to_string(),
            chain_name: gateway.get_config(&chain_name_key(branch_name))?,
            parent_branch: gateway.get_config(&parent_branch_key(branch_name))?,
            branch_point: gateway.get_config(&branch_point_key(branch_name))?,
        })
    }

    /// Loads `branch_name` as the base of a chain. Whatever parent it has
    /// belongs to some other chain, so it is not tracked here.
    pub fn root_from_config<G: Gateway>(gateway: &G, branch_name: &str) -> Result<Self, ChainError> {
        let mut branch = Branch::from_config(gateway, branch_name)?;
        branch.parent_branch = None;
        branch.branch_point = None;
        Ok(branch)
    }

    pub fn delete_all_configs<G: Gateway>(gateway: &G, branch_name: &str) -> Result<(), ChainError> {
        gateway.unset_config(&chain_name_key(branch_name))?;
        gateway.unset_config(&parent_branch_key(branch_name))?;
        gateway.unset_config(&branch_point_key(branch_name))?;
        Ok(())
    }

    pub fn remove_from_chain<G: Gateway>(self, gateway: &G) -> Result<(), ChainError> {
        Branch::delete_all_configs(gateway, &self.name)
    }

    pub fn set_chain_name<G: Gateway>(
        &mut self,
        gateway: &G,
        chain_name: Option<&str>,
    ) -> Result<(), ChainError> {
        set_or_unset(gateway, &chain_name_key(&self.name), chain_name)?;
        self.chain_name = chain_name.map(str::to_string);
        Ok(())
    }

    pub fn set_parent_branch<G: Gateway>(
        &mut self,
        gateway: &G,
        parent_branch: Option<&str>,
    ) -> Result<(), ChainError> {
        set_or_unset(gateway, &parent_branch_key(&self.name), parent_branch)?;
        self.parent_branch = parent_branch.map(str::to_string);
        Ok(())
    }

    pub fn set_branch_point<G: Gateway>(
        &mut self,
        gateway: &G,
        branch_point: Option<&str>,
    ) -> Result<(), ChainError> {
        set_or_unset(gateway, &branch_point_key(&self.name), branch_point)?;
        self.branch_point = branch_point.map(str::to_string);
        Ok(())
    }

    pub fn is_member_of(&self, chain_name: &str) -> bool {
        self.chain_name.as_deref() == Some(chain_name)
    }
}
