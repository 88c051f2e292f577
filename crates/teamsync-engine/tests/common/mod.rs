//! In-memory [`TeamDirectory`] for engine tests.
//!
//! Holds an organization roster, a set of teams with members, and optional
//! profiles. Lists are served in fixed-size pages with `fake://` cursors.
//! Failures can be scripted per call key (`org_members:2`, `add:ann`, ...),
//! each consumed once. Every call is logged with the paused-clock instant
//! it was issued at.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use teamsync_core::{Login, UserRecord};
use teamsync_engine::TeamDirectory;
use teamsync_github::{GithubApiError, Page, Team};
use tokio::time::Instant;
use url::Url;

pub fn login(l: &str) -> Login {
    Login::new(l).unwrap()
}

pub fn logins(ls: &[&str]) -> BTreeSet<Login> {
    ls.iter().map(|l| login(l)).collect()
}

pub fn user(l: &str) -> UserRecord {
    UserRecord::new(login(l))
}

pub fn rate_limited(endpoint: &str) -> GithubApiError {
    GithubApiError::RateLimited {
        endpoint: endpoint.into(),
        retry_after: None,
        message: "secondary rate limit".into(),
    }
}

pub fn unprocessable(endpoint: &str) -> GithubApiError {
    GithubApiError::ApiError {
        endpoint: endpoint.into(),
        status: 422,
        body: "Validation Failed".into(),
    }
}

pub fn unauthorized(endpoint: &str) -> GithubApiError {
    GithubApiError::Auth {
        endpoint: endpoint.into(),
        status: 401,
        message: "Bad credentials".into(),
    }
}

pub fn not_found(endpoint: &str) -> GithubApiError {
    GithubApiError::NotFound {
        endpoint: endpoint.into(),
        message: "Not Found".into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub key: String,
    pub at: Instant,
}

pub struct FakeDirectory {
    page_size: usize,
    org_members: Vec<UserRecord>,
    profiles: HashMap<String, UserRecord>,
    teams: Mutex<BTreeMap<String, (Team, BTreeSet<Login>)>>,
    failures: Mutex<Vec<(String, GithubApiError)>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDirectory {
    pub fn new(org_members: &[&str]) -> Self {
        Self {
            page_size: 2,
            org_members: org_members.iter().map(|l| user(l)).collect(),
            profiles: HashMap::new(),
            teams: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_org_records(records: Vec<UserRecord>) -> Self {
        let mut fake = Self::new(&[]);
        fake.org_members = records;
        fake
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_team(self, name: &str, slug: &str, members: &[&str]) -> Self {
        let team = Team {
            id: self.teams.lock().unwrap().len() as u64 + 1,
            name: name.into(),
            slug: slug.into(),
            description: None,
            privacy: Some("closed".into()),
        };
        self.teams
            .lock()
            .unwrap()
            .insert(slug.to_string(), (team, logins(members)));
        self
    }

    pub fn with_profile(mut self, profile: UserRecord) -> Self {
        self.profiles.insert(profile.login().to_string(), profile);
        self
    }

    /// Make the next call with `key` fail with `err`.
    pub fn fail(self, key: &str, err: GithubApiError) -> Self {
        self.failures.lock().unwrap().push((key.to_string(), err));
        self
    }

    pub fn team_members(&self, slug: &str) -> BTreeSet<Login> {
        self.teams
            .lock()
            .unwrap()
            .get(slug)
            .map(|(_, m)| m.clone())
            .unwrap_or_default()
    }

    pub fn has_team(&self, slug: &str) -> bool {
        self.teams.lock().unwrap().contains_key(slug)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.key).collect()
    }

    pub fn mutation_calls(&self) -> Vec<String> {
        self.call_keys()
            .into_iter()
            .filter(|k| k.starts_with("add:") || k.starts_with("remove:") || k.starts_with("create_team:"))
            .collect()
    }

    fn record(&self, key: String) -> Result<(), GithubApiError> {
        self.calls.lock().unwrap().push(Call {
            key: key.clone(),
            at: Instant::now(),
        });
        let mut failures = self.failures.lock().unwrap();
        match failures.iter().position(|(k, _)| *k == key) {
            Some(i) => Err(failures.remove(i).1),
            None => Ok(()),
        }
    }

    fn page_of<T: Clone>(&self, kind: &str, items: &[T], cursor: Option<&Url>) -> Page<T> {
        let page = page_number(cursor);
        let start = (page - 1) * self.page_size;
        let chunk: Vec<T> = items.iter().skip(start).take(self.page_size).cloned().collect();
        let next = (start + self.page_size < items.len())
            .then(|| Url::parse(&format!("fake://{kind}/{}", page + 1)).unwrap());
        Page { items: chunk, next }
    }
}

fn page_number(cursor: Option<&Url>) -> usize {
    cursor
        .and_then(|u| u.path().trim_start_matches('/').parse().ok())
        .unwrap_or(1)
}

#[async_trait]
impl TeamDirectory for FakeDirectory {
    async fn org_members_page(
        &self,
        _org: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        self.record(format!("org_members:{}", page_number(cursor)))?;
        Ok(self.page_of("org-members", &self.org_members, cursor))
    }

    async fn teams_page(&self, _org: &str, cursor: Option<&Url>) -> Result<Page<Team>, GithubApiError> {
        self.record(format!("teams:{}", page_number(cursor)))?;
        let teams: Vec<Team> = self
            .teams
            .lock()
            .unwrap()
            .values()
            .map(|(t, _)| t.clone())
            .collect();
        Ok(self.page_of("teams", &teams, cursor))
    }

    async fn create_team(&self, _org: &str, name: &str) -> Result<Team, GithubApiError> {
        self.record(format!("create_team:{name}"))?;
        let mut teams = self.teams.lock().unwrap();
        let slug = name.to_lowercase().replace(' ', "-");
        let team = Team {
            id: teams.len() as u64 + 1,
            name: name.into(),
            slug: slug.clone(),
            description: None,
            privacy: Some("closed".into()),
        };
        teams.insert(slug, (team.clone(), BTreeSet::new()));
        Ok(team)
    }

    async fn team_members_page(
        &self,
        _org: &str,
        team_slug: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        self.record(format!("team_members:{}", page_number(cursor)))?;
        let members: Vec<UserRecord> = match self.teams.lock().unwrap().get(team_slug) {
            Some((_, members)) => members.iter().cloned().map(UserRecord::new).collect(),
            None => return Err(not_found("GET /orgs/acme/teams/x/members")),
        };
        Ok(self.page_of("team-members", &members, cursor))
    }

    async fn user_profile(&self, login: &Login) -> Result<UserRecord, GithubApiError> {
        self.record(format!("profile:{login}"))?;
        self.profiles
            .get(login.as_str())
            .cloned()
            .ok_or_else(|| not_found("GET /users/x"))
    }

    async fn add_team_member(&self, _org: &str, team_slug: &str, login: &Login) -> Result<(), GithubApiError> {
        self.record(format!("add:{login}"))?;
        if let Some((_, members)) = self.teams.lock().unwrap().get_mut(team_slug) {
            members.insert(login.clone());
        }
        Ok(())
    }

    async fn remove_team_member(
        &self,
        _org: &str,
        team_slug: &str,
        login: &Login,
    ) -> Result<(), GithubApiError> {
        self.record(format!("remove:{login}"))?;
        if let Some((_, members)) = self.teams.lock().unwrap().get_mut(team_slug) {
            members.remove(login);
        }
        Ok(())
    }
}
