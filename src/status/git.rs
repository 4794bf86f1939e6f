//! Read-only working tree snapshot.
//!
//! Counts follow `git status --porcelain`: every entry carries a two-character code, `??`
//! is untracked, a non-space first character is staged and a non-space second character is
//! modified. Repository statuses from `git2` are mapped onto the same codes so both sources
//! share one classification rule.

use crate::domain::GitSnapshot;
use git2::{ErrorCode, Repository, Status, StatusOptions};
use std::path::Path;

/// Two-character porcelain status code: index state then worktree state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode {
    pub index: char,
    pub worktree: char,
}

impl StatusCode {
    pub fn is_untracked(&self) -> bool {
        self.index == '?' && self.worktree == '?'
    }

    pub fn is_staged(&self) -> bool {
        !self.is_untracked() && self.index != ' '
    }

    pub fn is_modified(&self) -> bool {
        !self.is_untracked() && self.worktree != ' '
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
}

impl StatusCounts {
    pub fn record(&mut self, code: StatusCode) {
        if code.is_untracked() {
            self.untracked += 1;
            return;
        }
        if code.is_staged() {
            self.staged += 1;
        }
        if code.is_modified() {
            self.modified += 1;
        }
    }
}

/// Classify textual `git status --porcelain` output. Lines shorter than two characters
/// are ignored.
pub fn parse_porcelain(output: &str) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for line in output.lines() {
        let mut chars = line.chars();
        if let (Some(index), Some(worktree)) = (chars.next(), chars.next()) {
            counts.record(StatusCode { index, worktree });
        }
    }
    counts
}

/// Porcelain code for a `git2` status; `None` for entries porcelain does not list.
pub fn status_code(status: Status) -> Option<StatusCode> {
    if status.is_ignored() {
        return None;
    }
    if status.is_conflicted() {
        return Some(StatusCode { index: 'U', worktree: 'U' });
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    if status.is_wt_new() && index == ' ' {
        return Some(StatusCode { index: '?', worktree: '?' });
    }

    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    if index == ' ' && worktree == ' ' {
        None
    } else {
        Some(StatusCode { index, worktree })
    }
}

/// Snapshot of the repository containing `root`. Any failure degrades to
/// [`GitSnapshot::unavailable`].
pub fn snapshot(root: &Path) -> GitSnapshot {
    let Ok(repo) = Repository::discover(root) else {
        tracing::debug!("No git repository at {}", root.display());
        return GitSnapshot::unavailable();
    };

    let branch = branch_name(&repo);
    let mut options = StatusOptions::new();
    options.include_untracked(true).recurse_untracked_dirs(false).include_ignored(false);

    let statuses = match repo.statuses(Some(&mut options)) {
        Ok(statuses) => statuses,
        Err(e) => {
            tracing::warn!("Cannot read git status in {}: {}", root.display(), e);
            return GitSnapshot { available: true, branch, ..GitSnapshot::default() };
        }
    };

    let mut counts = StatusCounts::default();
    for entry in statuses.iter() {
        if let Some(code) = status_code(entry.status()) {
            counts.record(code);
        }
    }

    GitSnapshot {
        available: true,
        branch,
        staged: counts.staged,
        modified: counts.modified,
        untracked: counts.untracked,
    }
}

fn branch_name(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) => head.shorthand().unwrap_or("HEAD").to_string(),
        // Fresh repositories have no commit yet; HEAD still names the branch
        Err(e) if e.code() == ErrorCode::UnbornBranch => repo
            .find_reference("HEAD")
            .ok()
            .and_then(|head| head.symbolic_target().map(str::to_string))
            .map(|target| target.trim_start_matches("refs/heads/").to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        Err(_) => "unknown".to_string(),
    }
}
