// Reading a day's scrums from the store.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use scrum_common::holiday::DATE_INPUT_FORMAT;
use scrum_common::path::{is_reserved, scrum_dir, scrum_object};
use scrum_common::types::{ObjectEntry, Scrum};
use tracing::{error, warn};

use crate::store::FsStore;

/// Users who scrummed on `date`, sorted by name. Reserved names are
/// skipped.
pub async fn scrummers(store: &FsStore, date: NaiveDate) -> Result<Vec<ObjectEntry>> {
    let dir = scrum_dir(date);
    let entries = store.list(&dir).await.with_context(|| format!("unable to list `{dir}`"))?;
    Ok(entries.into_iter().filter(|entry| !is_reserved(&entry.name)).collect())
}

pub async fn fetch(store: &FsStore, date: NaiveDate, username: &str) -> Result<Scrum> {
    let object = scrum_object(date, username)?;
    let stored = store.get(&object).await.context("unable to get scrum")?;
    Ok(Scrum {
        username: username.to_string(),
        date,
        mtime: stored.entry.mtime,
        body: String::from_utf8_lossy(&stored.body).into_owned(),
    })
}

/// Every scrum of a day. A failed fetch is logged and remembered; the
/// remaining users are still fetched.
#[derive(Debug, Default)]
pub struct Day {
    pub scrums: Vec<Scrum>,
    pub first_error: Option<anyhow::Error>,
}

impl Day {
    pub fn into_result(self) -> Result<()> {
        self.first_error.map_or(Ok(()), Err)
    }
}

pub async fn fetch_all(store: &FsStore, date: NaiveDate) -> Result<Day> {
    let mut day = Day::default();
    for entry in scrummers(store, date).await? {
        match fetch(store, date, &entry.name).await {
            Ok(scrum) => day.scrums.push(scrum),
            Err(err) => {
                let error = format!("{err:#}");
                error!(username = %entry.name, %error, "unable to get user's scrum");
                day.first_error.get_or_insert(err);
            }
        }
    }
    if day.scrums.is_empty() && day.first_error.is_none() {
        warn!(%date, "no users have scrummed for this day");
    }
    Ok(day)
}

/// One document holding every scrum of the day, in username order.
pub fn rollup_digest(date: NaiveDate, scrums: &[Scrum]) -> String {
    let mut out = format!("# Scrum rollup for {}\n", date.format(DATE_INPUT_FORMAT));
    for scrum in scrums {
        out.push_str("\n## ");
        out.push_str(&scrum.username);
        out.push_str("\n\n");
        out.push_str(scrum.body.trim());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 2).unwrap()
    }

    async fn seeded(dir: &TempDir) -> FsStore {
        let store = FsStore::new(dir.path(), "Team").unwrap();
        store.put("stor/scrum/2018/01/02/bob", b"  bob things \n", false).await.unwrap();
        store.put("stor/scrum/2018/01/02/alice", b"alice things\n", false).await.unwrap();
        store.put("stor/scrum/2018/01/02/rollup", b"old digest", false).await.unwrap();
        store.put("stor/scrum/2018/01/02/all", b"legacy", false).await.unwrap();
        store
    }

    #[tokio::test]
    async fn scrummers_skip_reserved_names() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir).await;
        let names: Vec<_> =
            scrummers(&store, date()).await.unwrap().into_iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn fetch_all_reads_every_user() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir).await;
        let day = fetch_all(&store, date()).await.unwrap();
        assert_eq!(day.scrums.len(), 2);
        assert_eq!(day.scrums[0].username, "alice");
        assert!(day.into_result().is_ok());
    }

    #[tokio::test]
    async fn empty_day_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path(), "Team").unwrap();
        let day = fetch_all(&store, date()).await.unwrap();
        assert!(day.scrums.is_empty());
        assert!(day.into_result().is_ok());
    }

    #[tokio::test]
    async fn fetch_missing_user_fails() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir).await;
        assert!(fetch(&store, date(), "carol").await.is_err());
    }

    #[test]
    fn digest_lists_users_in_order() {
        let scrum = |username: &str, body: &str| Scrum {
            username: username.into(),
            date: date(),
            mtime: Utc::now(),
            body: body.into(),
        };
        let digest = rollup_digest(date(), &[scrum("alice", "a\n"), scrum("bob", "  b  ")]);
        assert_eq!(digest, "# Scrum rollup for 2018-01-02\n\n## alice\n\na\n\n## bob\n\nb\n");
    }
}
