use clap::ArgMatches;

use crate::error::ChainError;
use crate::git_chain::GitChain;
use crate::types::ListFormat;

pub fn run(arg_matches: ArgMatches) -> Result<(), ChainError> {
    let git_chain = GitChain::init()?;

    match arg_matches.subcommand() {
        ("setup", Some(sub_matches)) => {
            // Set up a chain.

            let chain_name = sub_matches.value_of("chain_name").unwrap_or_default();
            let root_branch = sub_matches.value_of("root_branch").unwrap_or_default();

            let mut branch_names = vec![root_branch.to_string()];
            if let Some(values) = sub_matches.values_of("branch") {
                branch_names.extend(values.map(|x| x.to_string()));
            }

            git_chain.setup_chain(chain_name, &branch_names)?;
        }
        ("list", Some(sub_matches)) => {
            // List existing chains.

            let format = if sub_matches.is_present("short") {
                ListFormat::Short
            } else {
                ListFormat::Full
            };
            git_chain.list_chains(sub_matches.value_of("chain_name"), format)?;
        }
        ("rebase", Some(sub_matches)) => {
            // Rebase all branches of the chain.

            git_chain.rebase(sub_matches.value_of("chain_name"))?;
        }
        _ => {
            git_chain.run_status()?;
        }
    }

    Ok(())
}
