//! Owner/repository extraction from a git remote URL.

/// Returns `(owner, repo)` for SSH (`git@host:o/r`, `ssh://git@host/o/r`) or
/// HTTPS remotes, with or without a `.git` suffix or trailing slash.
pub fn parse_owner_repo(remote: &str) -> Option<(String, String)> {
    let trimmed = strip_suffixes(remote.trim());

    let path = if trimmed.contains("://") {
        let parsed = url::Url::parse(trimmed).ok()?;
        parsed.path().to_string()
    } else {
        // scp-like syntax: [user@]host:owner/repo
        let (host, path) = trimmed.split_once(':')?;
        if host.is_empty() || host.contains('/') {
            return None;
        }
        path.to_string()
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty()).rev();
    let repo = segments.next()?;
    let owner = segments.next()?;
    Some((owner.to_string(), repo.to_string()))
}

fn strip_suffixes(s: &str) -> &str {
    let s = s.trim_end_matches('/');
    let len = s.len();
    if len > 4 && s.is_char_boundary(len - 4) && s[len - 4..].eq_ignore_ascii_case(".git") {
        s[..len - 4].trim_end_matches('/')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(o: &str, r: &str) -> Option<(String, String)> {
        Some((o.to_string(), r.to_string()))
    }

    #[test]
    fn https_all_suffix_combinations() {
        for url in [
            "https://github.com/acme/mail",
            "https://github.com/acme/mail/",
            "https://github.com/acme/mail.git",
            "https://github.com/acme/mail.git/",
        ] {
            assert_eq!(parse_owner_repo(url), pair("acme", "mail"), "{url}");
        }
    }

    #[test]
    fn ssh_all_suffix_combinations() {
        for url in [
            "git@github.com:acme/mail",
            "git@github.com:acme/mail/",
            "git@github.com:acme/mail.git",
            "git@github.com:acme/mail.git/",
            "ssh://git@github.com/acme/mail.git",
        ] {
            assert_eq!(parse_owner_repo(url), pair("acme", "mail"), "{url}");
        }
    }

    #[test]
    fn repo_names_with_dots_and_case() {
        assert_eq!(
            parse_owner_repo("https://github.com/Acme/mail.sync.GIT"),
            pair("Acme", "mail.sync")
        );
        assert_eq!(
            parse_owner_repo("  git@github.com:acme/mail.sync\n"),
            pair("acme", "mail.sync")
        );
    }

    #[test]
    fn unparseable_remotes() {
        assert_eq!(parse_owner_repo(""), None);
        assert_eq!(parse_owner_repo("mail"), None);
        assert_eq!(parse_owner_repo("https://github.com/acme"), None);
        assert_eq!(parse_owner_repo("../relative/path"), None);
    }
}
