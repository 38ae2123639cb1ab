//! Repository setup of the generated project.
use crate::error::Result;
use git2::{Commit, IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use log::debug;
use std::path::Path;

/// Initializes a repository in `dir` whose `HEAD` points at `branch`.
pub fn init_repository(dir: &Path, branch: &str) -> Result<Repository> {
    debug!("Initializing git repository in '{}' on branch '{}'.", dir.display(), branch);
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(branch);
    Ok(Repository::init_opts(dir, &opts)?)
}

/// Stages the whole working tree and commits it on the current branch.
///
/// Uses the configured git identity, falling back to a layercake signature
/// when none is set.
pub fn commit_all(dir: &Path, message: &str) -> Result<Oid> {
    let repo = Repository::open(dir)?;
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.write()?;

    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = match repo.signature() {
        Ok(signature) => signature,
        Err(_) => Signature::now("layercake", "layercake@localhost")?,
    };

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit()?],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit> = parents.iter().collect();

    let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)?;
    debug!("Created commit {oid}.");
    Ok(oid)
}
