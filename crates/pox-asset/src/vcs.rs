//! VCS host detection for URL dependencies.
//!
//! A dependency whose version is a URL becomes a VCS repository when one of
//! the registered matchers recognizes the URL:
//! - GitHub (https, ssh and git protocol URLs)
//! - GitLab (gitlab.com and self-hosted instances)
//! - Bitbucket
//! - Generic git URLs (`git://`, `*.git`, `git@host:`)
//! - Subversion

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GIT_URL_RE: Regex = Regex::new(r"(?i)(^git://|\.git/?$|git(?:olite)?@|//git\.|//github\.com/)").unwrap();

    static ref SVN_URL_RE: Regex = Regex::new(r"(?i)(^svn://|^svn\+ssh://|svn\.)").unwrap();

    static ref DEFAULT_HOSTS: VcsHosts = VcsHosts::default();
}

/// Recognizes repository URLs of one kind of VCS host
pub trait VcsHostMatcher: Send + Sync {
    /// Name of the host kind
    fn name(&self) -> &str;

    /// Check if the URL points to a repository of this host
    fn supports(&self, url: &str) -> bool;
}

pub struct GitHubHost;
pub struct GitLabHost;
pub struct BitbucketHost;
pub struct GitHost;
pub struct SvnHost;

impl VcsHostMatcher for GitHubHost {
    fn name(&self) -> &str {
        "github"
    }

    fn supports(&self, url: &str) -> bool {
        parse_github_url(url).is_some()
    }
}

impl VcsHostMatcher for GitLabHost {
    fn name(&self) -> &str {
        "gitlab"
    }

    fn supports(&self, url: &str) -> bool {
        parse_gitlab_url(url).map_or(false, |(host, _)| host.to_lowercase().contains("gitlab"))
    }
}

impl VcsHostMatcher for BitbucketHost {
    fn name(&self) -> &str {
        "bitbucket"
    }

    fn supports(&self, url: &str) -> bool {
        parse_bitbucket_url(url).is_some()
    }
}

impl VcsHostMatcher for GitHost {
    fn name(&self) -> &str {
        "git"
    }

    fn supports(&self, url: &str) -> bool {
        GIT_URL_RE.is_match(url)
    }
}

impl VcsHostMatcher for SvnHost {
    fn name(&self) -> &str {
        "svn"
    }

    fn supports(&self, url: &str) -> bool {
        SVN_URL_RE.is_match(url)
    }
}

/// A host configured by name, e.g. a self-hosted forge
pub struct NamedHost {
    host: String,
}

impl NamedHost {
    pub fn new(host: impl Into<String>) -> Self {
        NamedHost { host: host.into().to_lowercase() }
    }
}

impl VcsHostMatcher for NamedHost {
    fn name(&self) -> &str {
        &self.host
    }

    fn supports(&self, url: &str) -> bool {
        url_host(url).map_or(false, |host| host.eq_ignore_ascii_case(&self.host))
    }
}

/// The set of matchers a URL is checked against
pub struct VcsHosts {
    matchers: Vec<Box<dyn VcsHostMatcher>>,
}

impl Default for VcsHosts {
    fn default() -> Self {
        VcsHosts {
            matchers: vec![
                Box::new(GitHubHost),
                Box::new(GitLabHost),
                Box::new(BitbucketHost),
                Box::new(GitHost),
                Box::new(SvnHost),
            ],
        }
    }
}

impl VcsHosts {
    /// Built-in matchers plus the configured host names
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = VcsHosts::default();
        for host in hosts {
            registry.register(Box::new(NamedHost::new(host)));
        }
        registry
    }

    pub fn register(&mut self, matcher: Box<dyn VcsHostMatcher>) {
        self.matchers.push(matcher);
    }

    /// Name of the first matcher accepting the URL
    pub fn find(&self, url: &str) -> Option<&str> {
        self.matchers
            .iter()
            .find(|matcher| matcher.supports(url))
            .map(|matcher| matcher.name())
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.find(url).is_some()
    }
}

/// Check a URL against the built-in matchers
pub fn is_known_vcs_host(url: &str) -> bool {
    DEFAULT_HOSTS.is_known(url)
}

/// Parse a GitHub URL into owner and repo
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    // Handle various GitHub URL formats:
    // - https://github.com/owner/repo
    // - https://github.com/owner/repo.git
    // - git@github.com:owner/repo.git
    // - git://github.com/owner/repo.git
    let url = url.trim_end_matches(".git");

    let path = url.split("github.com").nth(1)?;
    let path = path.trim_start_matches('/').trim_start_matches(':');
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        return Some((parts[0].to_string(), parts[1].to_string()));
    }

    None
}

/// Parse a GitLab-style URL into host and project path
pub fn parse_gitlab_url(url: &str) -> Option<(String, String)> {
    let url = url.trim_end_matches(".git");

    if let Some(rest) = url.strip_prefix("git@") {
        // git@gitlab.com:owner/repo
        let (host, path) = rest.split_once(':')?;
        if !path.is_empty() {
            return Some((host.to_string(), path.to_string()));
        }
    } else if url.starts_with("https://") || url.starts_with("http://") {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let path = parsed.path().trim_start_matches('/');
        if !path.is_empty() {
            return Some((host.to_string(), path.to_string()));
        }
    }

    None
}

/// Parse a Bitbucket URL into workspace and repo slug
pub fn parse_bitbucket_url(url: &str) -> Option<(String, String)> {
    let url = url.trim_end_matches(".git");
    if !url.contains("bitbucket.org") {
        return None;
    }

    let path = if url.starts_with("git@") {
        url.trim_start_matches("git@bitbucket.org:")
    } else {
        url.split("bitbucket.org").nth(1)?.trim_start_matches('/')
    };

    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        return Some((parts[0].to_string(), parts[1].to_string()));
    }

    None
}

fn url_host(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split_once(':').map(|(host, _)| host.to_string());
    }
    url::Url::parse(url).ok()?.host_str().map(str::to_string)
}
