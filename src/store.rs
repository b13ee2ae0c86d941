// SQLite store holding imported user records

use crate::cutoff::Cutoff;
use crate::record::{InactiveUser, UserRecord};
use eyre::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Single-table user store backed by a SQLite file
pub struct UserStore {
    path: PathBuf,
    db: Connection,
}

impl UserStore {
    /// Open or create a store at the given file path
    ///
    /// The parent directory must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let db = Connection::open(&path).with_context(|| format!("Failed to open SQLite database {}", path.display()))?;

        let store = Self { path, db };

        // Initialize schema
        store
            .create_schema()
            .with_context(|| format!("Failed to initialize store {}", store.path.display()))?;

        Ok(store)
    }

    /// Get the path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a reference to the SQLite database connection
    pub fn db(&self) -> &Connection {
        &self.db
    }

    /// Create database schema
    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS zoom_users (
                email TEXT,
                firstname TEXT,
                lastname TEXT,
                department TEXT,
                usergroup TEXT,
                imgroup TEXT,
                lastlogin TIMESTAMP,
                lastclient TEXT,
                creationdate TIMESTAMP,
                role TEXT,
                usertype TEXT,
                logintype TEXT,
                userstatus TEXT,
                pmi TEXT,
                jobtitle TEXT,
                location TEXT
            );
            "#,
        )?;

        Ok(())
    }

    /// Insert users in a single transaction
    ///
    /// Every record is appended as a new row, even when the email is already
    /// present. If the iterator yields an error, nothing from this call is
    /// committed. Returns the number of rows inserted.
    pub fn insert_users<I>(&mut self, users: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<UserRecord>>,
    {
        let tx = self.db.transaction()?;
        let mut count = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO zoom_users (email, firstname, lastname, department, usergroup, imgroup,
                     lastlogin, lastclient, creationdate, role, usertype, logintype, userstatus,
                     pmi, jobtitle, location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;

            for user in users {
                let user = user?;
                debug!(email = %user.email, "insert_users: inserting");

                stmt.execute(rusqlite::params![
                    user.email,
                    user.first_name,
                    user.last_name,
                    user.department,
                    user.user_group,
                    user.im_group,
                    user.last_login_text(),
                    user.last_client,
                    user.creation_date_text(),
                    user.role,
                    user.user_type,
                    user.login_type,
                    user.user_status,
                    user.pmi,
                    user.job_title,
                    user.location,
                ])?;
                count += 1;
            }
        }

        tx.commit()?;

        info!(count, "Committed imported users");
        Ok(count)
    }

    /// Total number of stored rows
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.db.query_row("SELECT COUNT(*) FROM zoom_users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Users whose last login is earlier than the cutoff date
    ///
    /// Users with an empty last login never match.
    pub fn inactive_users(&self, cutoff: &Cutoff) -> Result<Vec<InactiveUser>> {
        let mut stmt = self.db.prepare(
            "SELECT email, firstname, lastname, department, jobtitle, location, lastlogin
             FROM zoom_users
             WHERE lastlogin <> '' AND lastlogin < date(?1)
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map([cutoff.to_sql_date()], |row| {
            Ok(InactiveUser {
                email: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                department: row.get(3)?,
                job_title: row.get(4)?,
                location: row.get(5)?,
                last_login: row.get(6)?,
            })
        })?;

        let mut results = Vec::new();
        for row_result in rows {
            results.push(row_result?);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use eyre::eyre;
    use tempfile::TempDir;

    fn user(email: &str, last_login: Option<&str>) -> UserRecord {
        UserRecord {
            email: email.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            department: "Sales".to_string(),
            user_group: String::new(),
            im_group: String::new(),
            last_login: last_login.map(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()),
            last_client: "5.4.1".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            role: "Member".to_string(),
            user_type: "Licensed".to_string(),
            login_type: "SSO".to_string(),
            user_status: "Active".to_string(),
            pmi: "123".to_string(),
            job_title: "Manager".to_string(),
            location: "Oslo".to_string(),
        }
    }

    #[test]
    fn test_store_open_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.db");

        let store = UserStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_store_open_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.db");

        {
            let mut store = UserStore::open(&path).unwrap();
            store.insert_users(vec![Ok(user("a@x.com", None))]).unwrap();
        }

        let store = UserStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_store_open_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("users.db");

        assert!(UserStore::open(&path).is_err());
    }

    #[test]
    fn test_store_open_rejects_non_database() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.db");
        std::fs::write(&path, "not a sqlite database\n".repeat(100)).unwrap();

        assert!(UserStore::open(&path).is_err());
    }

    #[test]
    fn test_insert_users_appends_duplicates() {
        let temp = TempDir::new().unwrap();
        let mut store = UserStore::open(temp.path().join("users.db")).unwrap();

        let inserted = store
            .insert_users(vec![Ok(user("a@x.com", None)), Ok(user("a@x.com", None))])
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_users_rolls_back_on_error() {
        let temp = TempDir::new().unwrap();
        let mut store = UserStore::open(temp.path().join("users.db")).unwrap();

        let result = store.insert_users(vec![
            Ok(user("a@x.com", Some("2022-05-01 10:00:00"))),
            Err(eyre!("bad row")),
            Ok(user("b@x.com", None)),
        ]);
        assert!(result.is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_stored_text_values() {
        let temp = TempDir::new().unwrap();
        let mut store = UserStore::open(temp.path().join("users.db")).unwrap();
        store
            .insert_users(vec![Ok(user("a@x.com", Some("2022-05-01 10:00:00"))), Ok(user("b@x.com", None))])
            .unwrap();

        let (last_login, creation): (String, String) = store
            .db()
            .query_row(
                "SELECT lastlogin, creationdate FROM zoom_users WHERE email = 'a@x.com'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(last_login, "2022-05-01 10:00:00");
        assert_eq!(creation, "2021-01-01 00:00:00");

        let empty: String = store
            .db()
            .query_row("SELECT lastlogin FROM zoom_users WHERE email = 'b@x.com'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(empty, "");
    }

    #[test]
    fn test_inactive_users_filters_by_cutoff() {
        let temp = TempDir::new().unwrap();
        let mut store = UserStore::open(temp.path().join("users.db")).unwrap();
        store
            .insert_users(vec![
                Ok(user("old@x.com", Some("2022-05-01 10:00:00"))),
                Ok(user("edge@x.com", Some("2023-01-01 00:00:00"))),
                Ok(user("new@x.com", Some("2024-03-01 08:30:00"))),
                Ok(user("never@x.com", None)),
            ])
            .unwrap();

        let cutoff = Cutoff::from_year("2023").unwrap();
        let users = store.inactive_users(&cutoff).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "old@x.com");
        assert_eq!(users[0].last_login, "2022-05-01 10:00:00");

        // A late cutoff still skips users that never logged in
        let cutoff = Cutoff::from_year("2099").unwrap();
        let users = store.inactive_users(&cutoff).unwrap();
        for u in &users {
            let last_login = NaiveDateTime::parse_from_str(&u.last_login, "%Y-%m-%d %H:%M:%S").unwrap();
            assert!(cutoff.includes(Some(last_login)));
        }
        let emails: Vec<String> = users.into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["old@x.com", "edge@x.com", "new@x.com"]);
    }
}
