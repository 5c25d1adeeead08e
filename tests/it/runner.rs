use super::*;
use std::time::Duration;

fn reply_by_title(request: &ChatRequest) -> Result<String, CompletionError> {
    if request.user.contains("Title: Rats on a diet") {
        Ok(ANIMAL_REPLY.to_string())
    } else if request.user.contains("Title: Opinion piece") {
        Ok("I would probably include this one.".to_string())
    } else {
        Ok(INCLUDE_REPLY.to_string())
    }
}

#[tokio::test]
async fn completed_run_appends_three_columns_in_row_order() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_articles(
        dir.path(),
        "articles.csv",
        &[
            ["Knee arthroplasty outcomes", "Park H", "2019", ""],
            ["Rats on a diet", "Lee S", "2020", "We fed 30 rats a high-fat diet."],
            ["Opinion piece", "Choi K", "2018", "Commentary."],
        ],
    );
    let backend = FnBackend::new(reply_by_title);
    let handle = ReviewRunner::new().start_with_backend(&input, backend.clone())?;
    let (progress, outcome) = finish(handle).await;

    let output = dir.path().join("articles_result.csv");
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            output_path: output.clone(),
            rows: 3
        }
    );
    assert_eq!(progress, vec![33, 66, 100]);
    assert_eq!(backend.calls(), 3);

    let (headers, rows) = read_rows(&output);
    assert_eq!(
        headers,
        [
            "title",
            "author",
            "year",
            "abstract",
            "exclusion_criteria",
            "decision",
            "evidence"
        ]
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "Knee arthroplasty outcomes");
    assert_eq!(rows[0][4..], ["None", "Include", "None"]);
    assert_eq!(
        rows[1][4..],
        ["1", "Exclude", "We fed 30 rats a high-fat diet."]
    );
    assert_eq!(rows[2][4..], ["Not formatted", "Not formatted", "None"]);

    let (input_headers, input_rows) = read_rows(&input);
    assert_eq!(input_headers.len(), 4);
    assert_eq!(input_rows.len(), 3);
    Ok(())
}

#[tokio::test]
async fn extra_columns_pass_through_unchanged() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("export.csv");
    std::fs::write(
        &input,
        "id,title,author,year,abstract,journal\n\
         17,Rats on a diet,Lee S,2020,\"Rats, mice\",\"J Nutr, 12(3)\"\n",
    )?;
    let handle = ReviewRunner::new().start_with_backend(&input, FnBackend::new(reply_by_title))?;
    let (_, outcome) = finish(handle).await;
    assert!(outcome.is_success(), "{outcome}");

    let (headers, rows) = read_rows(&dir.path().join("export_result.csv"));
    assert_eq!(headers[..6], ["id", "title", "author", "year", "abstract", "journal"]);
    assert_eq!(rows[0][..6], ["17", "Rats on a diet", "Lee S", "2020", "Rats, mice", "J Nutr, 12(3)"]);
    assert_eq!(rows[0][7], "Exclude");
    Ok(())
}

#[tokio::test]
async fn backend_failure_fails_the_run_without_output() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "ten.csv", 10);
    let backend = FnBackend::new(|request: &ChatRequest| {
        if request.user.contains("Title: Article 1\n") {
            Err(CompletionError::ResponseContentEmpty)
        } else {
            Ok(INCLUDE_REPLY.to_string())
        }
    });
    let handle = ReviewRunner::new().start_with_backend(&input, backend.clone())?;
    let (progress, outcome) = finish(handle).await;

    match &outcome {
        RunOutcome::Failed { message } => {
            assert!(message.contains("row 1 of 10"), "{message}");
            assert!(message.contains("Response had no content"), "{message}");
            assert!(!message.contains('\n'));
        }
        other => panic!("expected failure, got {other}"),
    }
    assert!(progress.is_empty());
    assert_eq!(backend.calls(), 1);
    assert!(!dir.path().join("ten_result.csv").exists());
    Ok(())
}

#[tokio::test]
async fn failure_mid_table_keeps_earlier_progress_but_writes_nothing() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "four.csv", 4);
    let backend = FnBackend::new(|request: &ChatRequest| {
        if request.user.contains("Title: Article 3\n") {
            Err(CompletionError::RequestBuilderError("connection reset".to_string()))
        } else {
            Ok(INCLUDE_REPLY.to_string())
        }
    });
    let (progress, outcome) =
        finish(ReviewRunner::new().start_with_backend(&input, backend)?).await;
    assert_eq!(progress, vec![25, 50]);
    assert!(matches!(outcome, RunOutcome::Failed { ref message } if message.contains("row 3 of 4")));
    assert!(!dir.path().join("four_result.csv").exists());
    Ok(())
}

#[tokio::test]
async fn missing_column_fails_the_run() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("partial.csv");
    std::fs::write(&input, "title,author,year\nA,B,2020\n")?;
    let backend = FnBackend::new(reply_by_title);
    let (progress, outcome) =
        finish(ReviewRunner::new().start_with_backend(&input, backend.clone())?).await;

    assert!(progress.is_empty());
    assert_eq!(backend.calls(), 0);
    match outcome {
        RunOutcome::Failed { message } => {
            assert!(message.contains("required column 'abstract' not found"), "{message}")
        }
        other => panic!("expected failure, got {other}"),
    }
    assert!(!dir.path().join("partial_result.csv").exists());
    Ok(())
}

#[tokio::test]
async fn empty_table_writes_header_only_result() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_articles(dir.path(), "empty.csv", &[]);
    let backend = FnBackend::new(reply_by_title);
    let (progress, outcome) =
        finish(ReviewRunner::new().start_with_backend(&input, backend.clone())?).await;

    assert!(progress.is_empty());
    assert_eq!(backend.calls(), 0);
    assert!(matches!(outcome, RunOutcome::Completed { rows: 0, .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("empty_result.csv"))?,
        "title,author,year,abstract,exclusion_criteria,decision,evidence\n"
    );
    Ok(())
}

#[tokio::test]
async fn second_start_is_rejected_while_busy() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "two.csv", 2);
    let runner = ReviewRunner::new();
    let backend = GatedBackend::closed();

    let handle = runner.start_with_backend(&input, backend.clone())?;
    assert!(runner.is_busy());
    assert!(matches!(
        runner.start_with_backend(&input, FnBackend::new(reply_by_title)),
        Err(RunError::RunInProgress)
    ));
    assert!(matches!(
        runner.clone().start_with_backend(&input, FnBackend::new(reply_by_title)),
        Err(RunError::RunInProgress)
    ));

    backend.open(2);
    let (progress, outcome) = finish(handle).await;
    assert_eq!(progress, vec![50, 100]);
    assert!(outcome.is_success());
    assert!(!runner.is_busy());

    let (_, outcome) = finish(runner.start_with_backend(&input, FnBackend::new(reply_by_title))?).await;
    assert!(outcome.is_success());
    Ok(())
}

#[tokio::test]
async fn cancel_abandons_in_flight_request_and_writes_nothing() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "three.csv", 3);
    let runner = ReviewRunner::new();
    let backend = GatedBackend::closed();
    let handle = runner.start_with_backend(&input, backend.clone())?;

    while backend.started.load(std::sync::atomic::Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!handle.is_finished());
    handle.cancel();
    assert!(handle.is_cancelled());

    let (progress, outcome) = finish(handle).await;
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(progress.is_empty());
    assert_eq!(backend.started.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(!dir.path().join("three_result.csv").exists());
    assert!(!runner.is_busy());
    Ok(())
}

#[tokio::test]
async fn invalid_input_path_is_rejected_before_starting() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ReviewRunner::new();
    let backend = FnBackend::new(reply_by_title);

    let err = runner
        .start_with_backend(dir.path().join("absent.csv"), backend.clone())
        .err()
        .unwrap();
    assert!(matches!(err, RunError::Validation(_)));
    assert!(matches!(
        runner.start_with_backend("", backend.clone()),
        Err(RunError::Validation(_))
    ));
    assert_eq!(backend.calls(), 0);
    assert!(!runner.is_busy());
}

#[tokio::test]
async fn blank_api_key_is_rejected_before_starting() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_numbered(dir.path(), "one.csv", 1);
    let runner = ReviewRunner::new();
    let err = runner
        .start(ScreeningRequest::new("", &input))
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "API key is required");
    assert!(!runner.is_busy());
}

#[tokio::test]
async fn write_failure_fails_the_run_and_leaves_output_untouched() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "blocked.csv", 2);
    // A directory squatting on the result path makes the final write fail.
    let output = dir.path().join("blocked_result.csv");
    std::fs::create_dir(&output)?;

    let backend = FnBackend::new(reply_by_title);
    let runner = ReviewRunner::new();
    let (progress, outcome) = finish(runner.start_with_backend(&input, backend.clone())?).await;

    assert_eq!(progress, vec![50, 100]);
    assert_eq!(backend.calls(), 2);
    match outcome {
        RunOutcome::Failed { message } => {
            assert!(message.starts_with("failed to write"), "{message}");
            assert!(message.contains("blocked_result.csv"), "{message}");
        }
        other => panic!("expected failure, got {other}"),
    }
    assert!(output.is_dir());
    assert_eq!(std::fs::read_dir(&output)?.count(), 0);
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 2);
    assert!(!runner.is_busy());
    Ok(())
}

#[tokio::test]
async fn shutdown_signal_raised_before_the_first_redraw_still_cancels() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "signal.csv", 3);
    let backend = GatedBackend::closed();
    let handle = ReviewRunner::new().start_with_backend(&input, backend.clone())?;

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tx.send(()).unwrap();
    let shutdown = async move {
        let _ = rx.await;
    };
    let mut out = Vec::new();
    let outcome = sr_automator::shell::drive_run(handle, &mut out, shutdown).await?;

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(!dir.path().join("signal_result.csv").exists());
    let screen = String::from_utf8(out)?;
    assert!(screen.starts_with("\rProgress: 0% | Time Elapsed: 0:00:0"), "{screen:?}");
    assert!(screen.ends_with('\n'));
    Ok(())
}

#[tokio::test]
async fn status_loop_reports_progress_to_completion() -> crate::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_numbered(dir.path(), "two_rows.csv", 2);
    let handle = ReviewRunner::new().start_with_backend(&input, FnBackend::new(reply_by_title))?;

    let mut out = Vec::new();
    let outcome =
        sr_automator::shell::drive_run(handle, &mut out, std::future::pending::<()>()).await?;

    assert!(outcome.is_success(), "{outcome}");
    let screen = String::from_utf8(out)?;
    assert!(screen.contains("\rProgress: 50% | "), "{screen:?}");
    assert!(screen.contains("\rProgress: 100% | "), "{screen:?}");
    assert_eq!(screen.matches('\n').count(), 1);
    Ok(())
}
