use crate::models::{Author, PackageInfo, Repository};

/// `None` when the source is absent; `Some(value)` ends the lookup, even if the
/// present source carries no usable value.
type Accessor = fn(&PackageInfo) -> Option<Option<&str>>;

/// Attribution sources, highest precedence first.
const PRECEDENCE: [Accessor; 3] = [from_author, from_homepage, from_repository];

/// The copyright/attribution string for a package, taken from the first present
/// source among author, homepage and repository.
///
/// Empty strings count as absent. A structured author or repository is present
/// even without a name or URL, and then yields no copyright.
pub fn copyright_of(pkg: &PackageInfo) -> Option<String> {
    PRECEDENCE
        .iter()
        .find_map(|accessor| accessor(pkg))
        .flatten()
        .map(str::to_string)
}

pub fn has_copyright(pkg: &PackageInfo) -> bool {
    copyright_of(pkg).is_some()
}

fn from_author(pkg: &PackageInfo) -> Option<Option<&str>> {
    match pkg.author.as_ref()? {
        Author::Plain(s) if s.is_empty() => None,
        author => Some(author.display_name()),
    }
}

fn from_homepage(pkg: &PackageInfo) -> Option<Option<&str>> {
    pkg.homepage
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(Some)
}

fn from_repository(pkg: &PackageInfo) -> Option<Option<&str>> {
    match pkg.repository.as_ref()? {
        Repository::Plain(s) if s.is_empty() => None,
        repository => Some(repository.url()),
    }
}
