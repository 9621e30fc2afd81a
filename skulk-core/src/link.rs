use std::fmt;

use glob::Pattern;
use url::Url;

use crate::error::LinkError;

/// Where a link was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referrer {
    /// Seeded directly as a crawl root rather than reached via a page.
    Root,
    /// Absolute URL of the page the link appeared on.
    Page(String),
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referrer::Root => write!(f, "root"),
            Referrer::Page(url) => write!(f, "{url}"),
        }
    }
}

/// A link discovered during traversal, resolved to an absolute URL.
#[derive(Debug, Clone)]
pub struct Link {
    raw: String,
    referrer: Referrer,
    absolute: Url,
}

impl Link {
    /// Resolve `url` against its referrer. Fragments are stripped so that
    /// `page#a` and `page#b` land on the same node.
    pub fn new(url: &str, referrer: Referrer) -> Result<Self, LinkError> {
        let mut absolute = match &referrer {
            Referrer::Root => Url::parse(url).map_err(|source| LinkError::InvalidUrl {
                url: url.to_string(),
                source,
            })?,
            Referrer::Page(base) => {
                let base_url = Url::parse(base).map_err(|source| LinkError::BadReferrer {
                    url: url.to_string(),
                    referrer: base.clone(),
                    source,
                })?;
                base_url.join(url).map_err(|source| LinkError::BadReferrer {
                    url: url.to_string(),
                    referrer: base.clone(),
                    source,
                })?
            }
        };
        absolute.set_fragment(None);
        Ok(Self {
            raw: url.to_string(),
            referrer,
            absolute,
        })
    }

    pub fn root(url: &str) -> Result<Self, LinkError> {
        Self::new(url, Referrer::Root)
    }

    /// Seed a link from an already-parsed root URL.
    pub fn from_root_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self {
            raw: url.as_str().to_string(),
            referrer: Referrer::Root,
            absolute: url,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn referrer(&self) -> &Referrer {
        &self.referrer
    }

    pub fn absolute(&self) -> &str {
        self.absolute.as_str()
    }

    pub fn address(&self) -> &Url {
        &self.absolute
    }

    /// The absolute URL with http/https swapped, for scheme-squash
    /// comparisons. `None` for any other scheme.
    pub fn alt_scheme(&self) -> Option<String> {
        self.alt_scheme_url().map(String::from)
    }

    fn alt_scheme_url(&self) -> Option<Url> {
        let mut alt = self.absolute.clone();
        let swapped = match alt.scheme() {
            "http" => "https",
            "https" => "http",
            _ => return None,
        };
        alt.set_scheme(swapped).ok()?;
        Some(alt)
    }

    /// Whether the link stays inside at least one of the roots. Root-seeded
    /// links are internal by definition. With `scheme_squash`, the
    /// alternate-scheme variant of the URL counts too.
    pub fn is_internal(&self, roots: &[Url], scheme_squash: bool) -> bool {
        if self.referrer == Referrer::Root {
            return true;
        }
        if scheme_squash {
            if let Some(alt) = self.alt_scheme_url() {
                return roots
                    .iter()
                    .any(|root| internal_to(root, &self.absolute) || internal_to(root, &alt));
            }
        }
        roots.iter().any(|root| internal_to(root, &self.absolute))
    }

    /// Whether the link should be fetched at all: http(s) only, and not
    /// blacklisted unless the whitelist overrides.
    pub fn is_runnable(&self, blacklist: &[Pattern], whitelist: &[Pattern]) -> bool {
        if !matches!(self.absolute.scheme(), "http" | "https") {
            return false;
        }
        !self.matches(blacklist) || self.matches(whitelist)
    }

    /// Does the absolute URL match any of the shell-style globs?
    pub fn matches(&self, globs: &[Pattern]) -> bool {
        globs.iter().any(|glob| glob.matches(self.absolute.as_str()))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.absolute)
    }
}

/// Whether `to` can be reached from `root` without escaping upward.
///
/// A root ending in `/` names a directory: anything at or below it is
/// internal. A root whose last segment carries an extension names a file,
/// so its directory siblings are internal too. A slashless, extensionless
/// root is ambiguous and gets re-tested with a synthetic trailing slash.
pub fn internal_to(root: &Url, to: &Url) -> bool {
    let Some(route) = root.make_relative(to) else {
        // No relative form exists: different scheme, host, or port.
        return false;
    };
    if root.path().ends_with('/') || has_extension(root.path()) {
        return !route.starts_with("../");
    }
    let mut slashed = root.clone();
    slashed.set_path(&format!("{}/", root.path()));
    match slashed.make_relative(to) {
        Some(slashed_route) => !slashed_route.starts_with("../"),
        None => false,
    }
}

fn has_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rfind('.') {
        None | Some(0) => false,
        Some(idx) => idx + 1 < segment.len(),
    }
}
