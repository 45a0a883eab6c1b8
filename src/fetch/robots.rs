//! robots.txt fetching and evaluation for polite fetching.
//!
//! The checker is fail-closed: a policy that cannot be fetched or read yields
//! [`CrawlDecision::Unknown`], which callers treat exactly like a denial.
//! Policies are cached per origin for the lifetime of the checker.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, instrument};
use url::Url;

use super::client::HttpClient;
use crate::config::WILDCARD_AGENT;

const ROBOTS_PATH: &str = "/robots.txt";

/// Outcome of checking a URL against its host's crawl policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlDecision {
    /// The policy permits fetching the URL.
    Allowed,
    /// The policy forbids fetching the URL, or the URL cannot be checked.
    Denied,
    /// The policy could not be obtained; treated as a denial.
    Unknown,
}

impl CrawlDecision {
    /// Collapses the decision to a boolean; only [`CrawlDecision::Allowed`] is true.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// What a host's robots.txt request told us, independent of the agent asking.
#[derive(Debug)]
enum PolicyState {
    Rules(RobotsRules),
    /// 4xx other than 401/403: no policy exists.
    AllowAll,
    /// 401/403: the policy itself is off limits.
    DenyAll,
    Unavailable(String),
}

/// robots.txt checker with a per-origin policy cache.
#[derive(Debug)]
pub struct RobotsChecker {
    client: HttpClient,
    agent: String,
    cache: DashMap<String, Arc<PolicyState>>,
}

impl RobotsChecker {
    /// Creates a checker that evaluates policies for `agent` (`"*"` for the
    /// wildcard group only).
    #[must_use]
    pub fn new(client: HttpClient, agent: impl Into<String>) -> Self {
        Self {
            client,
            agent: agent.into(),
            cache: DashMap::new(),
        }
    }

    /// Returns whether the configured agent may fetch `url`.
    ///
    /// Never fails: unparseable URLs, network errors, timeouts, unreadable
    /// policies and 401/403 policy responses all return `false`.
    pub async fn is_allowed(&self, url: &str) -> bool {
        self.decide(url).await.is_allowed()
    }

    /// Returns whether `agent` may fetch `url`, with the same fail-closed
    /// semantics as [`is_allowed`](Self::is_allowed).
    pub async fn is_allowed_for(&self, url: &str, agent: &str) -> bool {
        self.decide_for(url, agent).await.is_allowed()
    }

    /// Evaluates `url` for the configured agent.
    pub async fn decide(&self, url: &str) -> CrawlDecision {
        self.decide_for(url, &self.agent).await
    }

    /// Evaluates `url` for `agent`, fetching and caching the origin's policy
    /// on first use.
    #[instrument(skip_all, fields(url = %url, agent = %agent))]
    pub async fn decide_for(&self, url: &str, agent: &str) -> CrawlDecision {
        let Some((origin, path)) = split_target(url) else {
            debug!("URL has no fetchable origin; denying");
            return CrawlDecision::Denied;
        };

        let policy = self.policy_for(&origin).await;
        let decision = match policy.as_ref() {
            PolicyState::Rules(rules) => {
                if rules.is_allowed(agent, &path) {
                    CrawlDecision::Allowed
                } else {
                    CrawlDecision::Denied
                }
            }
            PolicyState::AllowAll => CrawlDecision::Allowed,
            PolicyState::DenyAll => CrawlDecision::Denied,
            PolicyState::Unavailable(reason) => {
                debug!(%origin, %reason, "robots.txt unavailable; treating as denied");
                CrawlDecision::Unknown
            }
        };

        if decision == CrawlDecision::Denied {
            debug!(%origin, %path, "robots.txt disallows path");
        }
        decision
    }

    async fn policy_for(&self, origin: &str) -> Arc<PolicyState> {
        if let Some(cached) = self.cache.get(origin) {
            return Arc::clone(cached.value());
        }

        let fetched = Arc::new(fetch_policy(origin, &self.client).await);
        // First writer wins; entries never change once set.
        let entry = self.cache.entry(origin.to_string()).or_insert(fetched);
        Arc::clone(entry.value())
    }
}

async fn fetch_policy(origin: &str, client: &HttpClient) -> PolicyState {
    let robots_url = format!("{origin}{ROBOTS_PATH}");
    let response = match client.get(&robots_url).await {
        Ok(response) => response,
        Err(error) if error.is_timeout() => {
            return PolicyState::Unavailable(format!("timeout fetching {robots_url}"));
        }
        Err(error) => {
            return PolicyState::Unavailable(format!("failed to fetch {robots_url}: {error}"));
        }
    };

    let status = response.status().as_u16();
    match status {
        200..=299 => {
            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(error) => {
                    return PolicyState::Unavailable(format!(
                        "failed to read {robots_url}: {error}"
                    ));
                }
            };
            match std::str::from_utf8(&bytes) {
                Ok(body) => PolicyState::Rules(RobotsRules::parse(body)),
                Err(_) => PolicyState::Unavailable(format!("{robots_url} is not valid UTF-8")),
            }
        }
        401 | 403 => PolicyState::DenyAll,
        400..=499 => PolicyState::AllowAll,
        _ => PolicyState::Unavailable(format!("{robots_url} returned status {status}")),
    }
}

/// Splits a target URL into its origin (scheme + host + port) and the path
/// plus query that rules are matched against.
fn split_target(url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let origin = origin_for_robots(&parsed)?;

    let mut path = parsed.path().to_string();
    if path.is_empty() {
        path.push('/');
    }
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }
    Some((origin, path))
}

/// Builds the origin string (scheme + host) from a URL for robots.txt lookup.
fn origin_for_robots(parsed: &Url) -> Option<String> {
    let host = parsed.host_str().filter(|host| !host.is_empty())?;
    let scheme = parsed.scheme();
    let origin = if let Some(port) = parsed.port() {
        format!("{scheme}://{host}:{port}")
    } else {
        format!("{scheme}://{host}")
    };
    Some(origin)
}

/// Parsed robots.txt rule groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Group {
    agents: Vec<String>,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    allow: bool,
    pattern: String,
}

impl RobotsRules {
    /// Parses a robots.txt body.
    ///
    /// Consecutive `User-agent:` lines open a group that owns the following
    /// `Allow:`/`Disallow:` lines. Directive names are case-insensitive and
    /// `#` starts a comment. Rules outside any group and unknown directives
    /// are ignored.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut groups = Vec::new();
        let mut current: Option<Group> = None;
        let mut last_was_agent = false;

        for raw_line in body.trim_start_matches('\u{feff}').lines() {
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if !last_was_agent && let Some(group) = current.take() {
                        groups.push(group);
                    }
                    current
                        .get_or_insert_with(Group::default)
                        .agents
                        .push(value.to_ascii_lowercase());
                    last_was_agent = true;
                }
                "allow" | "disallow" => {
                    last_was_agent = false;
                    let Some(group) = current.as_mut() else {
                        continue;
                    };
                    // Empty values mean "no restriction".
                    if value.is_empty() {
                        continue;
                    }
                    group.rules.push(Rule {
                        allow: key == "allow",
                        pattern: normalize_rule_path(value),
                    });
                }
                _ => last_was_agent = false,
            }
        }
        if let Some(group) = current {
            groups.push(group);
        }

        Self { groups }
    }

    /// Returns whether `agent` may fetch `path` (path plus optional query).
    ///
    /// A specific agent uses the groups naming it (matched against the
    /// agent's product token) and falls back to the `*` groups. Among the
    /// matching rules the longest pattern wins and `Allow` wins ties.
    #[must_use]
    pub fn is_allowed(&self, agent: &str, path: &str) -> bool {
        if path == ROBOTS_PATH {
            return true;
        }

        let rules = self.rules_for(agent);
        let mut best: Option<(usize, bool)> = None;
        for rule in rules {
            if !pattern_matches(&rule.pattern, path) {
                continue;
            }
            let len = rule.pattern.len();
            let better = match best {
                None => true,
                Some((best_len, best_allow)) => {
                    len > best_len || (len == best_len && rule.allow && !best_allow)
                }
            };
            if better {
                best = Some((len, rule.allow));
            }
        }

        best.is_none_or(|(_, allow)| allow)
    }

    fn rules_for(&self, agent: &str) -> Vec<&Rule> {
        let token = product_token(agent);
        let names_agent = |group: &Group| {
            group.agents.iter().any(|name| {
                name != WILDCARD_AGENT && !name.is_empty() && token.contains(name.as_str())
            })
        };
        let is_wildcard = |group: &Group| group.agents.iter().any(|name| name == WILDCARD_AGENT);

        let specific =
            token != WILDCARD_AGENT && self.groups.iter().any(|group| names_agent(group));
        self.groups
            .iter()
            .filter(|group| {
                if specific {
                    names_agent(*group)
                } else {
                    is_wildcard(*group)
                }
            })
            .flat_map(|group| group.rules.iter())
            .collect()
    }
}

/// `"MyBot/1.0 (+https://...)"` -> `"mybot"`
fn product_token(agent: &str) -> String {
    agent
        .trim()
        .split(['/', ' '])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn normalize_rule_path(path: &str) -> String {
    let s = path.trim();
    if s.starts_with('/') || s.starts_with('*') {
        s.to_string()
    } else {
        format!("/{s}")
    }
}

/// Matches a rule pattern against a path. `*` matches any sequence and a
/// trailing `$` anchors the pattern at the end of the path; otherwise the
/// pattern is a prefix match.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    if !path.starts_with(first) {
        return false;
    }
    let mut pos = first.len();
    let rest: Vec<&str> = parts.collect();

    let Some((last, middle)) = rest.split_last() else {
        return !anchored || path.len() == pos;
    };
    for part in middle {
        match path[pos..].find(part) {
            Some(idx) => pos += idx + part.len(),
            None => return false,
        }
    }
    if anchored {
        path.len() >= pos + last.len() && path.ends_with(last)
    } else {
        path[pos..].contains(last)
    }
}
