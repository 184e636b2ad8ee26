//! Resource-name helpers.
//!
//! Backups and restores are addressed by their full relative names, e.g.
//! `projects/p/locations/l/backupPlans/bp/backups/b`. These helpers check
//! the shape before any request goes out and derive related names (parent
//! plan, child resources, short ids). There is no name registry; a name is
//! just its string.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// Name does not match the expected segment pattern.
    #[error("malformed {kind} name {name:?}, expected {pattern}")]
    Malformed {
        kind: &'static str,
        name: String,
        pattern: &'static str,
    },
    /// Short ids are single non-empty path segments.
    #[error("invalid {kind} id {id:?}")]
    BadId { kind: &'static str, id: String },
}

const BACKUP_PATTERN: &str = "projects/*/locations/*/backupPlans/*/backups/*";
const RESTORE_PATTERN: &str = "projects/*/locations/*/restorePlans/*/restores/*";
const BACKUP_PLAN_PATTERN: &str = "projects/*/locations/*/backupPlans/*";
const RESTORE_PLAN_PATTERN: &str = "projects/*/locations/*/restorePlans/*";
const OPERATION_PATTERN: &str = "projects/*/locations/*/operations/*";

fn check(
    name: &str,
    kind: &'static str,
    pattern: &'static str,
    collections: &[&str],
) -> Result<(), NameError> {
    let segments: Vec<&str> = name.split('/').collect();
    let ok = segments.len() == collections.len() * 2
        && collections
            .iter()
            .enumerate()
            .all(|(i, collection)| segments[2 * i] == *collection && !segments[2 * i + 1].is_empty());
    if ok {
        Ok(())
    } else {
        Err(NameError::Malformed {
            kind,
            name: name.to_string(),
            pattern,
        })
    }
}

pub fn ensure_backup(name: &str) -> Result<(), NameError> {
    check(
        name,
        "backup",
        BACKUP_PATTERN,
        &["projects", "locations", "backupPlans", "backups"],
    )
}

pub fn ensure_restore(name: &str) -> Result<(), NameError> {
    check(
        name,
        "restore",
        RESTORE_PATTERN,
        &["projects", "locations", "restorePlans", "restores"],
    )
}

pub fn ensure_backup_plan(name: &str) -> Result<(), NameError> {
    check(
        name,
        "backup plan",
        BACKUP_PLAN_PATTERN,
        &["projects", "locations", "backupPlans"],
    )
}

pub fn ensure_restore_plan(name: &str) -> Result<(), NameError> {
    check(
        name,
        "restore plan",
        RESTORE_PLAN_PATTERN,
        &["projects", "locations", "restorePlans"],
    )
}

pub fn ensure_operation(name: &str) -> Result<(), NameError> {
    check(
        name,
        "operation",
        OPERATION_PATTERN,
        &["projects", "locations", "operations"],
    )
}

/// Checks a short id (one non-empty path segment).
pub fn ensure_id(kind: &'static str, id: &str) -> Result<(), NameError> {
    if id.is_empty() || id.contains('/') {
        return Err(NameError::BadId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// The plan a backup belongs to.
pub fn backup_plan_of(backup: &str) -> Result<&str, NameError> {
    ensure_backup(backup)?;
    Ok(parent_of(parent_of(backup)))
}

/// The plan a restore belongs to.
pub fn restore_plan_of(restore: &str) -> Result<&str, NameError> {
    ensure_restore(restore)?;
    Ok(parent_of(parent_of(restore)))
}

/// Last segment of a resource name.
pub fn short_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Full name of a backup under `plan`.
pub fn backup_name(plan: &str, backup_id: &str) -> Result<String, NameError> {
    ensure_backup_plan(plan)?;
    ensure_id("backup", backup_id)?;
    Ok(format!("{plan}/backups/{backup_id}"))
}

/// Full name of a restore under `plan`.
pub fn restore_name(plan: &str, restore_id: &str) -> Result<String, NameError> {
    ensure_restore_plan(plan)?;
    ensure_id("restore", restore_id)?;
    Ok(format!("{plan}/restores/{restore_id}"))
}

fn parent_of(name: &str) -> &str {
    match name.rfind('/') {
        Some(i) => &name[..i],
        None => name,
    }
}
