//! Reconciliation passes driven through the real GitHub client.
//!
//! wiremock plays `api.github.com`; these tests cover the `TeamDirectory`
//! adapter and the spacing of calls as the server sees them.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;
use teamsync_core::{ActionKind, ActionOutcome, FilterRuleSet};
use teamsync_engine::{reconcile, RunSettings, TeamStatus};
use teamsync_github::{GithubApiConfig, GithubClient, RetryPolicy};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client(server: &MockServer, min_delay: Duration) -> GithubClient {
    let config = GithubApiConfig::new(&server.uri(), "test-token")
        .unwrap()
        .with_retry(RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            min_delay,
        });
    GithubClient::new(config).unwrap()
}

fn settings(rules: FilterRuleSet, delay: Duration) -> RunSettings {
    RunSettings {
        org: "acme".into(),
        team: "Everyone".into(),
        rules,
        dry_run: false,
        delay,
        create_team: true,
    }
}

fn users(logins: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        logins
            .iter()
            .enumerate()
            .map(|(i, l)| json!({"login": l, "id": i + 1, "type": "User"}))
            .collect(),
    )
}

/// Arrival time of every request the server answered.
#[derive(Clone, Default)]
struct Arrivals(Arc<Mutex<Vec<Instant>>>);

impl Arrivals {
    fn gaps(&self) -> Vec<Duration> {
        let times = self.0.lock().unwrap();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

struct Stamped {
    reply: ResponseTemplate,
    arrivals: Arrivals,
}

impl Respond for Stamped {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.0.lock().unwrap().push(Instant::now());
        self.reply.clone()
    }
}

fn stamped(arrivals: &Arrivals, reply: ResponseTemplate) -> Stamped {
    Stamped {
        reply,
        arrivals: arrivals.clone(),
    }
}

async fn mount_rosters(server: &MockServer, arrivals: &Arrivals, org: &[&str], team: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams"))
        .respond_with(stamped(
            arrivals,
            ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "name": "Everyone", "slug": "everyone", "privacy": "closed"}
            ])),
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members"))
        .respond_with(stamped(arrivals, ResponseTemplate::new(200).set_body_json(users(org))))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/everyone/members"))
        .respond_with(stamped(arrivals, ResponseTemplate::new(200).set_body_json(users(team))))
        .mount(server)
        .await;
}

#[tokio::test]
async fn retried_membership_call_keeps_the_pass_delay() {
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    let arrivals = Arrivals::default();
    mount_rosters(&server, &arrivals, &["ann", "shawn"], &["shawn"]).await;
    Mock::given(method("PUT"))
        .and(path("/orgs/acme/teams/everyone/memberships/ann"))
        .respond_with(stamped(
            &arrivals,
            ResponseTemplate::new(429).insert_header("retry-after", "0"),
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/orgs/acme/teams/everyone/memberships/ann"))
        .respond_with(stamped(
            &arrivals,
            ResponseTemplate::new(200).set_body_json(json!({"state": "active", "role": "member"})),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let report = reconcile(&client(&server, delay), &settings(FilterRuleSet::empty(), delay))
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].outcome, ActionOutcome::Applied);
    // The pacer counts the membership call once; the server saw it twice.
    assert_eq!(report.api_calls, 4);
    assert_eq!(arrivals.len(), 5);
    // Small allowance for scheduling jitter between client and server.
    let floor = delay - Duration::from_millis(20);
    for gap in arrivals.gaps() {
        assert!(gap >= floor, "calls {gap:?} apart, expected at least {delay:?}");
    }
}

#[tokio::test]
async fn pass_through_github_client_adds_and_removes() {
    let server = MockServer::start().await;
    let arrivals = Arrivals::default();
    mount_rosters(&server, &arrivals, &["ann", "bob", "shawn"], &["carol", "shawn"]).await;
    for (login, company) in [("ann", "Acme"), ("bob", "Evil Corp"), ("shawn", "Acme")] {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"login": login, "company": company})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }
    // ann has not accepted the org invitation yet.
    Mock::given(method("PUT"))
        .and(path("/orgs/acme/teams/everyone/memberships/ann"))
        .and(body_json(json!({"role": "member"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "pending", "role": "member"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/orgs/acme/teams/everyone/memberships/carol"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let rules = FilterRuleSet::from_value(json!({ "company": { "reject": ["^Evil"] } })).unwrap();
    let report = reconcile(&client(&server, Duration::ZERO), &settings(rules, Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(report.team.status, TeamStatus::Existing);
    assert_eq!(report.desired, 2);
    assert_eq!(report.actual, 2);
    let actions: Vec<_> = report
        .results
        .iter()
        .map(|r| (r.login.as_str(), r.kind, r.outcome.clone()))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("ann", ActionKind::Add, ActionOutcome::Applied),
            ("carol", ActionKind::Remove, ActionOutcome::Applied),
        ]
    );
    assert!(!report.has_failures());
}

#[tokio::test]
async fn missing_team_is_created_through_github_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Core Devs", "slug": "core-devs"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orgs/acme/teams"))
        .and(body_json(json!({"name": "Everyone", "privacy": "closed"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42, "name": "Everyone", "slug": "everyone", "privacy": "closed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users(&["ann"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/teams/everyone/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users(&[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/orgs/acme/teams/everyone/memberships/ann"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "active", "role": "member"})))
        .expect(1)
        .mount(&server)
        .await;

    let report = reconcile(&client(&server, Duration::ZERO), &settings(FilterRuleSet::empty(), Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(report.team.status, TeamStatus::Created);
    assert_eq!(report.team.slug, "everyone");
    assert_eq!(report.counts().applied, 1);
}
