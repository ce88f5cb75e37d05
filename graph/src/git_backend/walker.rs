use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use git2::{BranchType, Commit as GitCommit, Oid, Repository, Sort};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::Commit;
use crate::session::{CommitSource, Page, PageRequest};

/// Reads paginated, topologically sorted history out of a git repository.
///
/// The repository is reopened for every page so the walker can be shared
/// between tasks. Each page walks again from the branch tips, so fetching
/// page `n` costs the `n * limit` commits before it.
#[derive(Debug, Clone)]
pub struct GitWalker {
    path: PathBuf,
    name: String,
}

impl GitWalker {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path.as_ref()).context("Failed to open repository")?;
        let path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        let name = path.display().to_string();

        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch `request.limit` commits starting `request.offset` commits into
    /// the walk of HEAD and every branch tip, children first.
    pub fn fetch(&self, request: PageRequest) -> Result<Page> {
        let repo = Repository::open(&self.path).context("Failed to open repository")?;
        let labels = ref_labels(&repo)?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        if let Err(err) = revwalk.push_head() {
            debug!(repository = %self.name, error = %err, "HEAD has no commit to walk from");
        }
        for branch in repo.branches(None)? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
            }
        }

        let mut commits = Vec::with_capacity(request.limit);
        let mut has_more = false;
        for (index, oid) in revwalk.enumerate() {
            let oid = oid.with_context(|| format!("Failed to walk history at commit #{}", index))?;
            if index < request.offset {
                continue;
            }
            if commits.len() == request.limit {
                has_more = true;
                break;
            }

            let commit = repo
                .find_commit(oid)
                .with_context(|| format!("Failed to read commit {}", oid))?;
            let refs = labels.get(&oid).cloned().unwrap_or_default();
            commits.push(convert_commit(&commit)?.with_refs(refs));
        }

        debug!(
            repository = %self.name,
            offset = request.offset,
            fetched = commits.len(),
            has_more,
            "walked commit page"
        );
        Ok(Page { commits, has_more })
    }
}

#[async_trait]
impl CommitSource for GitWalker {
    fn repository(&self) -> &str {
        &self.name
    }

    /// Walks on the blocking pool; git2 calls block on disk I/O.
    async fn fetch_page(&self, request: PageRequest) -> Result<Page> {
        let walker = self.clone();
        tokio::task::spawn_blocking(move || walker.fetch(request))
            .await
            .context("Commit walk task failed")?
    }
}

/// Convert a git2 commit to a layout commit
fn convert_commit(commit: &GitCommit) -> Result<Commit> {
    let hash = commit.id().to_string();
    let parents: Vec<String> = commit.parent_ids().map(|oid| oid.to_string()).collect();

    let date = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .context("Invalid commit timestamp")?;

    let author = commit.author().name().unwrap_or("Unknown").to_string();
    let message = commit.summary().unwrap_or("").to_string();

    Ok(Commit::new(hash, parents, date, author, message))
}

/// Labels for every commit something points at: HEAD, branches and tags
fn ref_labels(repo: &Repository) -> Result<HashMap<Oid, Vec<String>>> {
    let mut labels: HashMap<Oid, Vec<String>> = HashMap::new();

    if let Ok(head) = repo.head() {
        if let Some(target) = head.target() {
            labels.entry(target).or_default().push("HEAD".to_string());
        }
    }

    for kind in [BranchType::Local, BranchType::Remote] {
        for branch in repo.branches(Some(kind))? {
            let (branch, _) = branch?;
            let (Some(name), Some(target)) = (branch.name()?, branch.get().target()) else {
                continue;
            };
            labels.entry(target).or_default().push(name.to_string());
        }
    }

    for name in repo.tag_names(None)?.iter().flatten() {
        let Ok(object) = repo.revparse_single(&format!("refs/tags/{}", name)) else {
            continue;
        };
        // Annotated tags point at a tag object; label the commit underneath
        if let Ok(commit) = object.peel_to_commit() {
            labels.entry(commit.id()).or_default().push(format!("tag: {}", name));
        }
    }

    Ok(labels)
}
