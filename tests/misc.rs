#[path = "common/mod.rs"]
pub mod common;

use std::fs;

use common::{
    create_branch_with_commit, create_new_file, first_commit_all, generate_path_to_repo,
    get_current_branch_name, run_test_bin_expect_err, run_test_bin_expect_ok, setup_git_repo,
    stderr_of, stdout_of, teardown_git_repo,
};

#[test]
fn no_subcommand() {
    let repo_name = "no_subcommand";
    let repo = setup_git_repo(repo_name);
    let path_to_repo = generate_path_to_repo(repo_name);

    {
        // create new file
        create_new_file(&path_to_repo, "hello_world.txt", "Hello, world!");

        // add first commit to master
        first_commit_all(&repo, "first commit");
    };

    assert_eq!(&get_current_branch_name(&repo), "master");

    let args: Vec<String> = vec![];
    let output = run_test_bin_expect_err(&path_to_repo, args);
    assert!(stdout_of(&output).contains("On branch: master"));

    let stderr = stderr_of(&output);
    assert!(stderr.contains("Branch is not part of any chain: master"));
    assert!(stderr.contains(
        "To set up a chain for this branch, run git branch-chain setup <chain_name> <root_branch> <branch>..."
    ));

    create_branch_with_commit(&repo, &path_to_repo, "some_branch_1", "file_1.txt");

    let args: Vec<&str> = vec!["setup", "chain_name", "master", "some_branch_1"];
    run_test_bin_expect_ok(&path_to_repo, args);

    let args: Vec<String> = vec![];
    let output = run_test_bin_expect_ok(&path_to_repo, args);

    assert_eq!(
        stdout_of(&output),
        r#"
On branch: some_branch_1

chain_name
    ➜ some_branch_1 ⦁ 1 ahead
      master (root branch)
"#
        .trim_start()
    );

    teardown_git_repo(repo_name);
}

#[test]
fn setup_with_too_few_branches() {
    let repo_name = "setup_with_too_few_branches";
    let repo = setup_git_repo(repo_name);
    let path_to_repo = generate_path_to_repo(repo_name);

    {
        // create new file
        create_new_file(&path_to_repo, "hello_world.txt", "Hello, world!");

        // add first commit to master
        first_commit_all(&repo, "first commit");
    };

    // clap rejects a chain without any branch on top of the root
    let args: Vec<&str> = vec!["setup", "chain_name", "master"];
    let output = run_test_bin_expect_err(&path_to_repo, args);
    assert!(stderr_of(&output).contains("<branch>..."));

    teardown_git_repo(repo_name);
}

#[test]
fn not_a_git_repo() {
    // Create a directory in the system temp location to avoid finding parent git repos
    let temp_dir = std::env::temp_dir();
    let path_to_non_git_dir = temp_dir.join("git_branch_chain_test_not_a_repo");

    fs::remove_dir_all(&path_to_non_git_dir).ok();
    fs::create_dir_all(&path_to_non_git_dir).unwrap();

    let args: Vec<String> = vec![];
    let output = run_test_bin_expect_err(&path_to_non_git_dir, args);

    let stderr = stderr_of(&output);

    assert!(
        stderr.contains("Not a git repository"),
        "Error message should mention 'Not a git repository', got: {}",
        stderr
    );
    assert!(
        stderr.contains("This command must be run inside a git repository"),
        "Error message should provide helpful hint, got: {}",
        stderr
    );

    fs::remove_dir_all(&path_to_non_git_dir).ok();
}
