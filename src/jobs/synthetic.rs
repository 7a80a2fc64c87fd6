use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use sqlx::SqlitePool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use super::deferred::DeferredTask;
use crate::config::JobConfig;
use crate::contacts::{dto::NewContact, services};

const USERNAME_LEN: usize = 10;
const MAIL_DOMAIN: &str = "mail.com";

/// Creates a throwaway contact every `interval` and removes it again
/// `delete_delay` later.
#[derive(Clone)]
pub struct SyntheticContactJob {
    db: SqlitePool,
    interval: Duration,
    delete_delay: Duration,
}

/// A running [`SyntheticContactJob`].
pub struct JobHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl JobHandle {
    /// Stop creating contacts and remove every contact whose deletion is
    /// still waiting on its delay. Returns once that is done.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "synthetic contact job ended abnormally");
        }
    }
}

impl SyntheticContactJob {
    pub fn new(db: SqlitePool, config: &JobConfig) -> Self {
        Self::with_schedule(db, config.interval(), config.delete_delay())
    }

    pub fn with_schedule(db: SqlitePool, interval: Duration, delete_delay: Duration) -> Self {
        Self {
            db,
            interval,
            delete_delay,
        }
    }

    /// One round: create a contact and schedule its removal.
    #[instrument(skip(self))]
    pub async fn tick(&self) -> anyhow::Result<(String, DeferredTask<bool>)> {
        let username = random_username();
        services::create_contact(&self.db, synthetic_contact(&username))
            .await
            .with_context(|| format!("create synthetic contact {username}"))?;
        info!(%username, "synthetic contact created");

        let db = self.db.clone();
        let target = username.clone();
        let deletion = DeferredTask::schedule(self.delete_delay, move || async move {
            remove(&db, &target).await
        });

        Ok((username, deletion))
    }

    /// Run on the configured interval until the handle is shut down. The
    /// first round fires one interval after start.
    pub fn spawn(self) -> JobHandle {
        let (stop, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs_f64(),
                delete_delay_secs = self.delete_delay.as_secs_f64(),
                "synthetic contact job started"
            );
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let mut pending: Vec<(String, DeferredTask<bool>)> = Vec::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stopped.changed() => break,
                }
                pending.retain(|(_, t)| !t.is_finished());
                match self.tick().await {
                    Ok(round) => pending.push(round),
                    Err(e) => warn!(error = %e, "synthetic contact round failed"),
                }
                debug!(pending = pending.len(), "scheduled deletions outstanding");
            }

            self.flush(pending).await;
            info!("synthetic contact job stopped");
        });
        JobHandle { stop, task }
    }

    /// Run the outstanding deletions now instead of after their delay.
    async fn flush(&self, pending: Vec<(String, DeferredTask<bool>)>) {
        let mut flushed = 0;
        for (username, deletion) in pending {
            deletion.cancel();
            // Some(_) means it ran to completion before the cancel landed
            if deletion.wait().await.is_none() {
                remove(&self.db, &username).await;
                flushed += 1;
            }
        }
        if flushed > 0 {
            info!(flushed, "pending synthetic contacts removed at shutdown");
        }
    }
}

async fn remove(db: &SqlitePool, username: &str) -> bool {
    match services::delete_if_exists(db, username).await {
        Ok(true) => {
            info!(%username, "synthetic contact deleted");
            true
        }
        Ok(false) => {
            debug!(%username, "synthetic contact already gone");
            false
        }
        Err(e) => {
            error!(error = %e, %username, "synthetic contact deletion failed");
            false
        }
    }
}

pub(crate) fn random_username() -> String {
    let mut rng = rand::thread_rng();
    (0..USERNAME_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

fn synthetic_contact(username: &str) -> NewContact {
    NewContact {
        username: username.to_string(),
        first_name: username.to_string(),
        last_name: username.to_string(),
        addresses: vec![format!("{username}@{MAIL_DOMAIN}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::state::AppState;

    #[test]
    fn username_is_ten_lowercase_letters() {
        for _ in 0..50 {
            let name = random_username();
            assert_eq!(name.len(), USERNAME_LEN);
            assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[tokio::test]
    async fn tick_creates_then_deletes() {
        let state = AppState::in_memory().await;
        let job = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_secs(15),
            Duration::from_millis(50),
        );

        let (username, deletion) = job.tick().await.unwrap();
        let contact = services::get_contact(&state.db, &username).await.unwrap();
        assert_eq!(contact.first_name, username);
        assert_eq!(contact.last_name, username);
        assert_eq!(contact.addresses.len(), 1);
        assert_eq!(contact.addresses[0].email, format!("{username}@mail.com"));

        assert_eq!(deletion.wait().await, Some(true));
        assert!(matches!(
            services::get_contact(&state.db, &username).await,
            Err(AppError::NotFound(_))
        ));
        assert!(services::list_user_emails(&state.db, &username)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn deletion_of_already_removed_contact_is_noop() {
        let state = AppState::in_memory().await;
        let job = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_secs(15),
            Duration::from_millis(50),
        );

        let (username, deletion) = job.tick().await.unwrap();
        services::delete_contact(&state.db, &username).await.unwrap();
        assert_eq!(deletion.wait().await, Some(false));
    }

    #[tokio::test]
    async fn cancelled_deletion_keeps_contact() {
        let state = AppState::in_memory().await;
        let job = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_secs(15),
            Duration::from_secs(60),
        );

        let (username, deletion) = job.tick().await.unwrap();
        deletion.cancel();
        assert_eq!(deletion.wait().await, None);
        assert!(services::get_contact(&state.db, &username).await.is_ok());
    }

    #[tokio::test]
    async fn spawned_job_keeps_creating_contacts() {
        let state = AppState::in_memory().await;
        let handle = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_millis(20),
            Duration::from_secs(60),
        )
        .spawn();

        tokio::time::sleep(Duration::from_millis(150)).await;
        let contacts = services::list_contacts(&state.db).await.unwrap();
        handle.shutdown().await;

        assert!(!contacts.is_empty());
        for c in contacts {
            assert_eq!(c.username.len(), USERNAME_LEN);
            assert_eq!(c.addresses[0].email, format!("{}@mail.com", c.username));
        }
    }

    #[tokio::test]
    async fn shutdown_removes_contacts_still_awaiting_deletion() {
        let state = AppState::in_memory().await;
        let handle = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_millis(20),
            Duration::from_secs(60),
        )
        .spawn();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!services::list_contacts(&state.db).await.unwrap().is_empty());

        handle.shutdown().await;
        assert!(services::list_contacts(&state.db).await.unwrap().is_empty());
        let addresses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM address")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(addresses, 0);
    }

    #[tokio::test]
    async fn rounds_and_request_writes_share_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::on_disk(&dir).await;
        let job = SyntheticContactJob::with_schedule(
            state.db.clone(),
            Duration::from_secs(15),
            Duration::from_millis(5),
        );

        let db = state.db.clone();
        let requests = tokio::spawn(async move {
            for i in 0..20 {
                let name = format!("person{i}");
                services::create_contact(
                    &db,
                    NewContact {
                        username: name.clone(),
                        first_name: "F".into(),
                        last_name: "L".into(),
                        addresses: vec![format!("{name}@x.com")],
                    },
                )
                .await
                .unwrap();
            }
        });

        let mut deletions = Vec::new();
        for _ in 0..20 {
            deletions.push(job.tick().await.unwrap().1);
        }
        requests.await.unwrap();
        for deletion in deletions {
            assert_eq!(deletion.wait().await, Some(true));
        }

        let left = services::list_contacts(&state.db).await.unwrap();
        assert_eq!(left.len(), 20);
        assert!(left.iter().all(|c| c.username.starts_with("person")));
    }
}
