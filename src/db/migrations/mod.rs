//! Schema migrations for the rewards database.
//!
//! Each schema version `NN` has two embedded scripts:
//! - `migration_NN_up.sql` takes the schema from version `NN-1` to `NN`
//! - `migration_NN_down.sql` takes it from `NN` back to `NN-1`

use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use crate::Result;

/// The schema version this build of the program expects.
pub(crate) const LATEST: i32 = 1;

struct Migration {
    up: &'static str,
    down: &'static str,
}

/// Indexed by `version - 1`.
const MIGRATIONS: &[Migration] = &[Migration {
    up: include_str!("migration_01_up.sql"),
    down: include_str!("migration_01_down.sql"),
}];

fn migration(version: i32) -> Result<&'static Migration> {
    usize::try_from(version - 1)
        .ok()
        .and_then(|ix| MIGRATIONS.get(ix))
        .with_context(|| format!("There is no migration for schema version {version}"))
}

/// Moves the schema from version `from` to version `to`, one version at a time. Each step runs in
/// its own transaction together with the `schema_version` update, so a failed step leaves the
/// database at the last successful version.
pub(crate) async fn run(pool: &SqlitePool, from: i32, to: i32) -> Result<()> {
    if from == to {
        debug!("Schema already at version {to}");
        return Ok(());
    }
    if from < 0 || to < 0 || from.max(to) > LATEST {
        bail!("Cannot migrate the schema from version {from} to {to}, latest is {LATEST}");
    }

    if from < to {
        for version in (from + 1)..=to {
            debug!("Migrating schema up to version {version:02}");
            apply(pool, migration(version)?.up, version).await?;
        }
    } else {
        for version in ((to + 1)..=from).rev() {
            debug!("Migrating schema down from version {version:02}");
            apply(pool, migration(version)?.down, version - 1).await?;
        }
    }
    Ok(())
}

async fn apply(pool: &SqlitePool, sql: &str, resulting_version: i32) -> Result<()> {
    let mut tx = pool.begin().await.context("Unable to begin migration")?;
    (&mut *tx)
        .execute(sql)
        .await
        .with_context(|| format!("Migration to schema version {resulting_version} failed"))?;
    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(resulting_version)
        .execute(&mut *tx)
        .await
        .context("Unable to record the schema version")?;
    tx.commit().await.context("Unable to commit migration")?;
    Ok(())
}
