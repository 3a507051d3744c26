//! Single-file migration source
//!
//! All migrations live in one SQL script that is embedded into the binary.
//! Each migration starts with a header line comment:
//! ```text
//! --##1 initial schema
//! ```
//! carrying the version (1) and a description (initial schema). Versions must increase.
use std::{borrow::Cow, future::Future, pin::Pin};

use sqlx::{
    error::BoxDynError,
    migrate::{Migration, MigrationSource, MigrationType},
};

const HEADER_PREFIX: &str = "--##";

#[derive(Debug)]
pub struct MigrationScript<'s> {
    data: &'s str,
}

impl<'s> MigrationSource<'s> for MigrationScript<'s> {
    fn resolve(
        self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Migration>, BoxDynError>> + Send + 's>> {
        Box::pin(async move {
            let migrations = parse_script(self.data)?
                .into_iter()
                .map(|(version, description, sql)| {
                    Migration::new(
                        version,
                        Cow::Owned(description),
                        MigrationType::Simple,
                        Cow::Owned(sql),
                    )
                })
                .collect();

            Ok(migrations)
        })
    }
}

/// Split a script into `(version, description, sql)` triples.
fn parse_script(data: &str) -> Result<Vec<(i64, String, String)>, String> {
    let mut result: Vec<(i64, String, String)> = Vec::new();

    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
            let (version, description) = header.split_once(' ').unwrap_or((header, ""));
            let version = version.parse::<i64>().map_err(|e| {
                format!("cannot parse migration version '{version}' as int: {e}")
            })?;

            if let Some((previous, _, _)) = result.last() {
                if version <= *previous {
                    return Err(format!(
                        "migration version {version} does not increase on {previous}"
                    ));
                }
            }

            result.push((version, description.trim().to_owned(), String::new()));
            continue;
        }

        match result.last_mut() {
            Some((_, _, sql)) => {
                sql.push_str(line);
                sql.push('\n');
            }
            // comments before the first header are allowed
            None if line.starts_with("--") => continue,
            None => {
                return Err(format!(
                    "migration script does not start with a migration header, got: {line}"
                ))
            }
        }
    }

    Ok(result)
}

pub fn postgresql_migrations() -> MigrationScript<'static> {
    MigrationScript {
        data: include_str!("./sql/migrations.pg.sql"),
    }
}
