mod common;

use std::time::Duration;

use common::*;
use teamsync_core::{ActionKind, ActionOutcome, MembershipPlan};
use teamsync_engine::{ActionExecutor, Pacer, RosterFetcher, RosterSource};

#[tokio::test]
async fn stream_hides_page_boundaries() {
    let fake = FakeDirectory::new(&["a1", "a2", "a3", "a4", "a5"]);
    let pacer = Pacer::new(Duration::ZERO);
    let mut stream = RosterFetcher::new(&fake, &pacer).org_members("acme");

    let mut seen = Vec::new();
    while let Some(user) = stream.next().await.unwrap() {
        seen.push(user.login().to_string());
    }

    assert_eq!(seen, vec!["a1", "a2", "a3", "a4", "a5"]);
    assert_eq!(stream.pages_fetched(), 3);
    assert_eq!(fake.call_keys(), vec!["org_members:1", "org_members:2", "org_members:3"]);
    // Exhausted streams stay exhausted without further calls.
    assert!(stream.next().await.unwrap().is_none());
    assert_eq!(fake.calls().len(), 3);
}

#[tokio::test]
async fn stream_is_lazy() {
    let fake = FakeDirectory::new(&["a1", "a2", "a3"]);
    let pacer = Pacer::new(Duration::ZERO);
    let mut stream = RosterFetcher::new(&fake, &pacer).org_members("acme");
    assert!(fake.calls().is_empty());

    stream.next().await.unwrap();
    stream.next().await.unwrap();
    assert_eq!(fake.call_keys(), vec!["org_members:1"]);

    stream.next().await.unwrap();
    assert_eq!(fake.call_keys(), vec!["org_members:1", "org_members:2"]);
}

#[tokio::test]
async fn failed_page_leaves_the_cursor_in_place() {
    let fake = FakeDirectory::new(&["a1", "a2", "a3"]).fail("org_members:2", rate_limited("GET /orgs/acme/members"));
    let pacer = Pacer::new(Duration::ZERO);
    let mut stream = RosterFetcher::new(&fake, &pacer).org_members("acme");

    assert!(stream.next().await.unwrap().is_some());
    assert!(stream.next().await.unwrap().is_some());
    let err = stream.next().await.unwrap_err();
    assert!(err.to_string().contains("members of organization acme"));

    let user = stream.next().await.unwrap().unwrap();
    assert_eq!(user.login().as_str(), "a3");
    assert_eq!(fake.call_keys(), vec!["org_members:1", "org_members:2", "org_members:2"]);
}

#[tokio::test]
async fn empty_roster_yields_nothing() {
    let fake = FakeDirectory::new(&[]).with_team("Everyone", "everyone", &[]);
    let pacer = Pacer::new(Duration::ZERO);
    let stream = RosterFetcher::new(&fake, &pacer).team_members("acme", "everyone");
    assert_eq!(
        stream.source(),
        &RosterSource::Team {
            org: "acme".into(),
            team_slug: "everyone".into()
        }
    );

    assert!(stream.collect_logins().await.unwrap().is_empty());
    assert_eq!(fake.call_keys(), vec!["team_members:1"]);
}

#[tokio::test]
async fn team_roster_collects_logins() {
    let fake = FakeDirectory::new(&[]).with_team("Everyone", "everyone", &["zed", "ann", "bob"]);
    let pacer = Pacer::new(Duration::ZERO);

    let members = RosterFetcher::new(&fake, &pacer)
        .team_members("acme", "everyone")
        .collect_logins()
        .await
        .unwrap();

    assert_eq!(members, logins(&["ann", "bob", "zed"]));
}

#[tokio::test]
async fn executor_runs_adds_then_removes_in_login_order() {
    let fake = FakeDirectory::new(&[]).with_team("Everyone", "everyone", &["yan", "abe"]);
    let pacer = Pacer::new(Duration::ZERO);
    let plan = MembershipPlan::compute(&logins(&["zoe", "carl"]), &logins(&["yan", "abe"]));

    let results = ActionExecutor::new(&fake, &pacer, "acme", "everyone", false)
        .execute(&plan)
        .await;

    assert_eq!(fake.mutation_calls(), vec!["add:carl", "add:zoe", "remove:abe", "remove:yan"]);
    let kinds: Vec<_> = results.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Add, ActionKind::Add, ActionKind::Remove, ActionKind::Remove]);
    assert!(results.iter().all(|r| r.outcome == ActionOutcome::Applied));
    assert_eq!(fake.team_members("everyone"), logins(&["carl", "zoe"]));
}

#[tokio::test]
async fn executor_records_failure_detail() {
    let fake = FakeDirectory::new(&[])
        .with_team("Everyone", "everyone", &["abe"])
        .fail("remove:abe", not_found("DELETE /orgs/acme/teams/everyone/memberships/abe"));
    let pacer = Pacer::new(Duration::ZERO);
    let plan = MembershipPlan::compute(&logins(&[]), &logins(&["abe"]));

    let results = ActionExecutor::new(&fake, &pacer, "acme", "everyone", false)
        .execute(&plan)
        .await;

    assert_eq!(results.len(), 1);
    match &results[0].outcome {
        ActionOutcome::Failed { detail } => assert!(detail.contains("memberships/abe"), "{detail}"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn dry_run_executor_issues_no_calls() {
    let fake = FakeDirectory::new(&[]).with_team("Everyone", "everyone", &["abe"]);
    let pacer = Pacer::new(Duration::from_secs(3));
    let plan = MembershipPlan::compute(&logins(&["carl"]), &logins(&["abe"]));

    let results = ActionExecutor::new(&fake, &pacer, "acme", "everyone", true)
        .execute(&plan)
        .await;

    assert!(fake.calls().is_empty());
    assert_eq!(pacer.calls(), 0);
    assert!(results.iter().all(|r| r.outcome == ActionOutcome::SkippedDryRun));
}
