use std::ffi::OsString;

use clap::{App, Arg, ArgMatches, SubCommand};

use crate::executable_name;

pub fn parse_arg_matches<'a, I, T>(arguments: I) -> ArgMatches<'a>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let setup_subcommand = SubCommand::with_name("setup")
        .about("Set up a chain from a root branch and the branches stacked on it, in order.")
        .arg(
            Arg::with_name("chain_name")
                .help("The name of the chain.")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("root_branch")
                .help("The branch the first branch of the chain is stacked on.")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("branch")
                .help("A branch to add to the chain, stacked on the one before it.")
                .required(true)
                .multiple(true)
                .index(3),
        );

    let list_subcommand = SubCommand::with_name("list")
        .about("List existing chains.")
        .arg(
            Arg::with_name("short")
                .short("s")
                .long("short")
                .help("Only display chain names.")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("chain_name")
                .help("Only list this chain.")
                .required(false)
                .index(1),
        );

    let rebase_subcommand = SubCommand::with_name("rebase")
        .about("Rebase all branches of the current chain.")
        .arg(
            Arg::with_name("chain_name")
                .short("c")
                .long("chain")
                .value_name("chain_name")
                .help("Rebase this chain instead of the chain of the current branch.")
                .takes_value(true),
        );

    let arg_matches = App::new("git-branch-chain")
        .bin_name(executable_name())
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tool for rebasing a chain of stacked git branches.")
        .subcommand(setup_subcommand)
        .subcommand(list_subcommand)
        .subcommand(rebase_subcommand)
        .get_matches_from(arguments);

    arg_matches
}
