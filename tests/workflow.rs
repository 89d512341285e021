// ABOUTME: Integration tests for the workflow engine and activity sessions.
// ABOUTME: Covers end-to-end submissions, gating, cancellation, and status events.

mod support;

use chrono::{Local, Months};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use support::{ScriptedDirectory, init_tracing, number, snapshot_with};
use tokio_util::sync::CancellationToken;
use yardcheck::activity::{
    CleaningSegment, CodeCompletion, ConfirmationKind, Photo, ReviewDecision, ValidationResult,
};
use yardcheck::diagnostics::WarningKind;
use yardcheck::directory::CleaningDetails;
use yardcheck::record::{ActivityKind, ActivityStatus, Order, RepairCode};
use yardcheck::workflow::{StatusChanged, SubmitError, WorkflowEngine, WorkflowError};

use yardcheck::record::ActivityStatus::{Finished, NotFilled, OnReview, Rejected};

fn engine_with(directory: ScriptedDirectory) -> (WorkflowEngine, Arc<ScriptedDirectory>) {
    init_tracing();
    let directory = Arc::new(directory);
    (WorkflowEngine::new(directory.clone()), directory)
}

fn all_segment_photos() -> Vec<Photo> {
    CleaningSegment::ALL
        .iter()
        .map(|segment| Photo::segment(*segment, format!("{segment}.jpg")))
        .collect()
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn cleaning_without_directory_data_is_blocked() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let session = engine.open(ActivityKind::Cleaning, &record).await.unwrap();
        assert!(!session.has_data());
        assert!(!session.diagnostics().has_warnings());

        let (_, result) = session.validate().unwrap_err();
        assert_eq!(
            result.error_message(),
            "Please upload photos for: Top Outside, Front Upper Half, Front Lower Half, \
             Back Upper Half, Back Lower Half"
        );
        assert_eq!(record.read(|r| r.status(ActivityKind::Cleaning)), NotFilled);
    }

    #[tokio::test]
    async fn survey_accept_finishes_cleaning() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(OnReview, NotFilled, NotFilled)));
        let record = engine.lookup("efgh 000000 2").await.unwrap();

        let mut session = engine.open(ActivityKind::Survey, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("survey.jpg"));
        session.state_mut().review_mut().set_accept(true);
        let completed = session.validate().unwrap().submit().unwrap();

        assert_eq!(
            completed.changes(),
            &[StatusChanged {
                container: number("EFGH0000002"),
                activity: ActivityKind::Cleaning,
                from: OnReview,
                to: Finished,
            }]
        );

        let mut snapshot = record.snapshot();
        assert_eq!(snapshot.status(ActivityKind::Cleaning), Finished);
        snapshot.update_activities();
        assert_eq!(snapshot.activities()[0].status, Finished);
        assert_eq!(snapshot.overall_status(), NotFilled);
    }

    #[tokio::test]
    async fn survey_reject_keeps_remark() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(OnReview, Finished, Finished)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Survey, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("survey.jpg"));
        let review = session.state_mut().review_mut();
        review.set_reject(true);
        review.set_remark(Some("residue in the back corners".to_string()));
        session.validate().unwrap().submit().unwrap();

        let snapshot = record.snapshot();
        assert_eq!(snapshot.status(ActivityKind::Cleaning), Rejected);
        assert_eq!(snapshot.overall_status(), OnReview);
        assert_eq!(
            snapshot.review_remark.as_deref(),
            Some("residue in the back corners")
        );
    }

    #[tokio::test]
    async fn reopened_survey_keeps_remark_out_of_the_review() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(OnReview, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Survey, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("survey.jpg"));
        let review = session.state_mut().review_mut();
        review.set_reject(true);
        review.set_remark(Some("dirty".to_string()));
        session.validate().unwrap().submit().unwrap();

        let reopened = engine.open(ActivityKind::Survey, &record).await.unwrap();
        assert_eq!(reopened.state().previous_remark.as_deref(), Some("dirty"));
        assert!(!reopened.state().review().reject());
        assert_eq!(reopened.state().review().remark(), None);
    }

    #[tokio::test]
    async fn cleaning_submission_goes_on_review() {
        let details = CleaningDetails {
            commodity: Some("Cocoa beans".to_string()),
            cleaning_requirement: Some("Sweep and wash".to_string()),
            codes: vec![RepairCode::new("CL01"), RepairCode::new("CL02")],
        };
        let (engine, _) = engine_with(ScriptedDirectory::with_cleaning(
            snapshot_with(NotFilled, NotFilled, NotFilled),
            details,
        ));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Cleaning, &record).await.unwrap();
        assert!(session.has_data());
        assert_eq!(record.read(|r| r.commodity.clone()).as_deref(), Some("Cocoa beans"));
        assert_eq!(
            session.state().cleaning_requirement_text.as_deref(),
            Some("Sweep and wash")
        );

        for photo in all_segment_photos() {
            session.state_mut().add_photo(photo);
        }
        assert!(session.toggle_code(0, CodeCompletion::completed()));

        let (mut session, result) = session.validate().unwrap_err();
        let confirmation = result.confirmation().unwrap();
        assert_eq!(confirmation.kind, ConfirmationKind::IncompleteCleaningRequirements);
        assert_eq!(
            confirmation.message,
            "1 of 2 cleaning requirements are not completed. Continue anyway?"
        );

        session.confirm(ConfirmationKind::IncompleteCleaningRequirements);
        let start = session.state().start_date;
        session.validate().unwrap().submit().unwrap();

        let snapshot = record.snapshot();
        assert_eq!(snapshot.status(ActivityKind::Cleaning), OnReview);
        assert_eq!(snapshot.cleaning_window.unwrap().start, start);
    }

    #[tokio::test]
    async fn cleaning_rejects_inverted_dates() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Cleaning, &record).await.unwrap();
        for photo in all_segment_photos() {
            session.state_mut().add_photo(photo);
        }
        let today = session.state().start_date;
        session
            .state_mut()
            .set_dates(today, today.pred_opt().unwrap());

        let (_, result) = session.validate().unwrap_err();
        assert_eq!(result, ValidationResult::invalid("End date cannot be before start date"));
    }

    #[tokio::test]
    async fn periodic_window_defaults_to_thirty_months() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        let today = Local::now().date_naive();
        assert_eq!(session.state().start_date, today);
        assert_eq!(
            session.state().end_date,
            today.checked_add_months(Months::new(30)).unwrap()
        );

        session.state_mut().add_photo(Photo::general("plate.jpg"));
        session.confirm(ConfirmationKind::NotApproved);
        session.validate().unwrap().submit().unwrap();
        assert_eq!(record.read(|r| r.status(ActivityKind::Periodic)), Finished);
    }
}

mod gating {
    use super::*;

    #[tokio::test]
    async fn unapproved_repair_needs_confirmation() {
        let mut snapshot = snapshot_with(NotFilled, NotFilled, NotFilled);
        snapshot.repair_codes = vec![RepairCode::new("DT01"), RepairCode::new("HL02")];
        let (engine, _) = engine_with(ScriptedDirectory::with_snapshot(snapshot));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Repair, &record).await.unwrap();
        assert!(session.has_data());
        session.state_mut().add_photo(Photo::general("weld.jpg"));

        let (mut session, result) = session.validate().unwrap_err();
        assert_eq!(
            result.confirmation().map(|c| c.kind),
            Some(ConfirmationKind::NotApproved)
        );
        assert_eq!(record.read(|r| r.status(ActivityKind::Repair)), NotFilled);

        assert!(session.toggle_code(
            1,
            CodeCompletion::Completed {
                actor: Some("welder".to_string()),
                notes: None,
            },
        ));
        assert!(!session.toggle_code(7, CodeCompletion::completed()));
        session.confirm(ConfirmationKind::NotApproved);
        session.validate().unwrap().submit().unwrap();

        let snapshot = record.snapshot();
        assert_eq!(snapshot.status(ActivityKind::Repair), Finished);
        assert!(snapshot.repair_codes[1].is_completed);
        assert!(snapshot.repair_codes[1].completed_at.is_some());
        assert!(!snapshot.repair_codes[0].is_completed);
    }

    #[tokio::test]
    async fn unapproved_periodic_needs_confirmation() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("plate.jpg"));

        let (mut session, result) = session.validate().unwrap_err();
        assert_eq!(
            result.confirmation().map(|c| c.kind),
            Some(ConfirmationKind::NotApproved)
        );
        assert_eq!(record.read(|r| r.status(ActivityKind::Periodic)), NotFilled);

        session.confirm(ConfirmationKind::NotApproved);
        session.validate().unwrap().submit().unwrap();
        assert_eq!(record.read(|r| r.status(ActivityKind::Periodic)), Finished);
    }

    #[tokio::test]
    async fn approved_periodic_skips_confirmation() {
        let mut snapshot = snapshot_with(NotFilled, NotFilled, NotFilled);
        snapshot.is_approved = true;
        let (engine, _) = engine_with(ScriptedDirectory::with_snapshot(snapshot));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        assert!(session.state().approval.is_approved);
        session.state_mut().add_photo(Photo::general("plate.jpg"));
        assert!(session.validate().is_ok());
    }

    #[tokio::test]
    async fn survey_needs_cleaning_on_review() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(Finished, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Survey, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("survey.jpg"));
        session.state_mut().review_mut().set_accept(true);

        let (_, result) = session.validate().unwrap_err();
        assert_eq!(
            result.error_message(),
            "Cleaning is not on review (current status: Finished)"
        );
    }
}

mod directory_failures {
    use super::*;

    #[tokio::test]
    async fn unreachable_directory_degrades_to_no_data() {
        let (engine, _) = engine_with(
            ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled))
                .unreachable(),
        );
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let session = engine.open(ActivityKind::Cleaning, &record).await.unwrap();
        assert!(!session.has_data());
        let warnings = session.diagnostics().warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DirectoryUnavailable);
        assert!(warnings[0].message.contains("EFGH0000002"));
    }

    #[tokio::test]
    async fn invalid_number_never_reaches_directory() {
        let (engine, directory) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));

        let err = engine.lookup("ABCD0000001").await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidNumber(_)));
        assert_eq!(directory.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_container_is_not_found() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));

        let err = engine.lookup("ABCD0000008").await.unwrap_err();
        match err {
            WorkflowError::NotFound { number, message } => {
                assert_eq!(number.as_str(), "ABCD0000008");
                assert!(message.contains("not found"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

mod registry {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_cached_record() {
        let (engine, directory) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));

        let first = engine.lookup("EFGH0000002").await.unwrap();
        let calls = directory.calls();
        let second = engine.lookup("EFGH0000002").await.unwrap();

        assert!(first.same_record(&second));
        assert_eq!(directory.calls(), calls);
        assert_eq!(engine.containers(), vec![number("EFGH0000002")]);
    }

    #[tokio::test]
    async fn register_adds_unknown_container_once() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));

        let record = engine
            .register("ABCD0000008", "GLOBEX", Some("Steel coils".to_string()))
            .unwrap();
        assert_eq!(record.read(|r| r.customer_code.clone()), "GLOBEX");
        assert!(engine.record(&number("ABCD0000008")).is_some());

        let err = engine.register("abcd0000008", "GLOBEX", None).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn lookup_order_resolves_every_container() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));

        let mut order = Order::new("ORD-1", "ACME", number("EFGH0000002"));
        assert!(!order.add(number("EFGH0000002")));
        let records = engine.lookup_order(&order).await.unwrap();
        assert_eq!(records.len(), 1);

        order.add(number("ABCD0000008"));
        assert!(engine.lookup_order(&order).await.is_err());
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_aborts_load() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let err = engine
            .open_with_token(ActivityKind::Periodic, &record, token)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Cancelled));
    }

    #[tokio::test]
    async fn cancel_during_slow_load_applies_nothing() {
        let details = CleaningDetails {
            commodity: Some("Cocoa beans".to_string()),
            ..Default::default()
        };
        let (engine, _) = engine_with(
            ScriptedDirectory::with_cleaning(snapshot_with(NotFilled, NotFilled, NotFilled), details)
                .delayed(Duration::from_secs(30)),
        );
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = engine
            .open_with_token(ActivityKind::Cleaning, &record, token)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Cancelled));
        assert_eq!(record.read(|r| r.commodity.clone()), None);
    }

    #[tokio::test]
    async fn cancelled_session_does_not_submit() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();

        let mut session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("plate.jpg"));
        session.confirm(ConfirmationKind::NotApproved);
        let accepted = session.validate().unwrap();
        accepted.cancel();

        let (session, err) = accepted.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Cancelled));
        assert!(err.is_retryable());
        assert!(session.is_cancelled());
        assert_eq!(record.read(|r| r.status(ActivityKind::Periodic)), NotFilled);
    }
}

mod events {
    use super::*;

    #[tokio::test]
    async fn last_base_activity_moves_overall_status() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(Finished, Finished, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();
        let mut events = engine.subscribe();

        let mut session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        session.state_mut().add_photo(Photo::general("plate.jpg"));
        session.confirm(ConfirmationKind::NotApproved);
        session.validate().unwrap().submit().unwrap();

        let first = events.recv().await.unwrap();
        assert_eq!(first.activity, ActivityKind::Periodic);
        assert_eq!((first.from, first.to), (NotFilled, Finished));

        let second = events.recv().await.unwrap();
        assert!(second.is_overall());
        assert_eq!((second.from, second.to), (NotFilled, Finished));
        assert_eq!(record.read(|r| r.overall_status()), Finished);
    }

    #[tokio::test]
    async fn validation_failure_emits_nothing() {
        let (engine, _) =
            engine_with(ScriptedDirectory::with_snapshot(snapshot_with(NotFilled, NotFilled, NotFilled)));
        let record = engine.lookup("EFGH0000002").await.unwrap();
        let mut events = engine.subscribe();

        let session = engine.open(ActivityKind::Periodic, &record).await.unwrap();
        assert!(session.validate().is_err());
        assert!(events.try_recv().is_err());
    }
}

fn status() -> impl Strategy<Value = ActivityStatus> {
    prop_oneof![
        Just(NotFilled),
        Just(OnReview),
        Just(Finished),
        Just(Rejected),
    ]
}

proptest! {
    #[test]
    fn aggregation_only_fires_when_all_started(
        cleaning in status(),
        repair in status(),
        periodic in status(),
        prior in status(),
    ) {
        let mut snapshot = snapshot_with(cleaning, repair, periodic);
        snapshot.survey_status = prior;
        let mut record = snapshot.into_record();
        record.update_activities();
        let first = record.activities().to_vec();
        record.update_activities();
        prop_assert_eq!(record.activities(), first.as_slice());

        let statuses = [cleaning, repair, periodic];
        let expected = if statuses.contains(&NotFilled) {
            prior
        } else if statuses.iter().all(|s| *s == Finished) {
            Finished
        } else {
            OnReview
        };
        prop_assert_eq!(record.overall_status(), expected);
        prop_assert_eq!(record.activities()[3].status, expected);
    }
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
    Accept(bool),
    Reject(bool),
    Remark,
}

fn toggle() -> impl Strategy<Value = Toggle> {
    prop_oneof![
        any::<bool>().prop_map(Toggle::Accept),
        any::<bool>().prop_map(Toggle::Reject),
        Just(Toggle::Remark),
    ]
}

proptest! {
    #[test]
    fn accept_and_reject_never_both_set(toggles in proptest::collection::vec(toggle(), 0..32)) {
        let mut review = ReviewDecision::default();
        for toggle in toggles {
            match toggle {
                Toggle::Accept(value) => review.set_accept(value),
                Toggle::Reject(value) => review.set_reject(value),
                Toggle::Remark => review.set_remark(Some("remark".to_string())),
            }
            prop_assert!(!(review.accept() && review.reject()));
            prop_assert!(review.remark().is_none() || review.reject());
            if let Toggle::Reject(false) = toggle {
                prop_assert_eq!(review.remark(), None);
            }
        }
    }
}
