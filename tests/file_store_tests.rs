// Integration tests for the file-backed session store

use anyhow::Result;
use prashna_interviews::{
    Evaluation, FileSessionStore, InterviewSession, SessionFilter, SessionStatus, SessionStore,
    Speaker, StoreError, Transcript,
};
use tempfile::TempDir;

fn short_transcript() -> Transcript {
    let mut transcript = Transcript::new();
    transcript.push(Speaker::AI, "How would you design a rate limiter?");
    transcript.push(Speaker::Candidate, "A token bucket per client.");
    transcript
}

#[tokio::test]
async fn test_session_survives_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let session = InterviewSession::pending("job-1", "ada@example.com");
    let id = session.id.clone();

    {
        let store = FileSessionStore::open(dir.path()).await?;
        store.insert(session).await?;
        assert!(
            store
                .compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress)
                .await?
        );
    }

    let reopened = FileSessionStore::open(dir.path()).await?;
    let loaded = reopened.get(&id).await?.expect("session persisted");
    assert_eq!(loaded.status, SessionStatus::InProgress);
    assert_eq!(loaded.candidate_ref, "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_insert_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::open(dir.path()).await?;
    let session = InterviewSession::pending("job-1", "ada@example.com");

    store.insert(session.clone()).await?;
    let err = store.insert(session).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    Ok(())
}

#[tokio::test]
async fn test_claim_is_single_use() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::open(dir.path()).await?;
    let session = InterviewSession::pending("job-1", "ada@example.com");
    let id = session.id.clone();
    store.insert(session).await?;

    let (a, b) = tokio::join!(
        store.compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress),
        store.compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress),
    );
    assert!(a? ^ b?);

    assert!(
        !store
            .compare_and_set_status("missing", SessionStatus::PendingStart, SessionStatus::InProgress)
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn test_final_write_requires_claim() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::open(dir.path()).await?;
    let session = InterviewSession::pending("job-1", "ada@example.com");
    let id = session.id.clone();
    store.insert(session).await?;

    let transcript = short_transcript();
    let err = store
        .persist_final(&id, &transcript, None, SessionStatus::Aborted)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition { .. }));

    store
        .compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress)
        .await?;
    let evaluation = Evaluation {
        summary: "Solid fundamentals".to_string(),
        strengths: vec!["system design".to_string()],
        weaknesses: vec![],
        score: 81,
    };
    store
        .persist_final(&id, &transcript, Some(&evaluation), SessionStatus::Completed)
        .await?;

    let stored = store.get(&id).await?.expect("session exists");
    assert_eq!(stored.status, SessionStatus::Completed);
    assert_eq!(stored.turn_count, 1);
    assert_eq!(stored.transcript, transcript);
    assert_eq!(stored.score(), 81);

    // Terminal records are immutable
    let err = store
        .persist_final(&id, &transcript, None, SessionStatus::Aborted)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition { .. }));
    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_skips_foreign_files() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileSessionStore::open(dir.path()).await?;

    for candidate in ["a@example.com", "b@example.com", "c@example.com"] {
        store
            .insert(InterviewSession::pending("job-1", candidate))
            .await?;
    }
    let other = InterviewSession::pending("job-2", "d@example.com");
    let other_id = other.id.clone();
    store.insert(other).await?;
    store
        .compare_and_set_status(&other_id, SessionStatus::PendingStart, SessionStatus::InProgress)
        .await?;

    std::fs::write(dir.path().join("notes.txt"), "not a session")?;
    std::fs::write(dir.path().join("broken.json"), "{")?;

    let all = store.list(&SessionFilter::default()).await?;
    assert_eq!(all.len(), 4);

    let job_1 = store
        .list(&SessionFilter {
            job_id: Some("job-1".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(job_1.len(), 3);

    let in_progress = store
        .list(&SessionFilter {
            status: Some(SessionStatus::InProgress),
            ..Default::default()
        })
        .await?;
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id, other_id);

    let limited = store
        .list(&SessionFilter {
            limit: Some(2),
            ..Default::default()
        })
        .await?;
    assert_eq!(limited.len(), 2);
    Ok(())
}
