//! Declarative page routes consumed by the host's navigation component.
//!
//! The login view is not addressable: the host shows it whenever no
//! credential is stored. `/login` survives only as a redirect to the root.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Layout,
    Notice,
    Mail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Path-based URLs without a `#` fragment.
    Clean,
}

#[derive(Debug)]
pub enum Route {
    View {
        path: &'static str,
        view: ViewId,
        children: &'static [Route],
    },
    Redirect {
        path: &'static str,
        to: &'static str,
    },
}

pub const HISTORY_MODE: HistoryMode = HistoryMode::Clean;

pub static ROUTES: &[Route] = &[
    Route::View {
        path: "/",
        view: ViewId::Layout,
        children: &[
            Route::View {
                path: "notice",
                view: ViewId::Notice,
                children: &[],
            },
            Route::View {
                path: "mail",
                view: ViewId::Mail,
                children: &[],
            },
        ],
    },
    Route::Redirect {
        path: "/login",
        to: "/",
    },
];

const MAX_REDIRECTS: usize = 8;

/// Outcome of resolving a URL path against [`ROUTES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Path after following redirects.
    pub path: String,
    /// Matched views, outermost layout first.
    pub views: Vec<ViewId>,
}

impl Resolved {
    /// The innermost view, the one the host renders inside its layouts.
    pub fn leaf(&self) -> Option<ViewId> {
        self.views.last().copied()
    }
}

/// Resolves `path`, following redirects. Query strings, fragments and
/// trailing slashes are ignored. Returns `None` for unknown paths.
pub fn resolve(path: &str) -> Option<Resolved> {
    let mut current = normalize(path);
    for _ in 0..=MAX_REDIRECTS {
        match find(ROUTES, "", &current)? {
            Match::Redirect(to) => current = normalize(to),
            Match::Views(views) => return Some(Resolved { path: current, views }),
        }
    }
    None
}

enum Match {
    Redirect(&'static str),
    Views(Vec<ViewId>),
}

fn find(routes: &'static [Route], parent: &str, path: &str) -> Option<Match> {
    for route in routes {
        match route {
            Route::Redirect { path: from, to } => {
                if join(parent, from) == path {
                    return Some(Match::Redirect(*to));
                }
            }
            Route::View { path: own, view, children } => {
                let full = join(parent, own);
                if full == path {
                    return Some(Match::Views(vec![*view]));
                }
                if !children.is_empty() && is_within(&full, path) {
                    match find(*children, &full, path) {
                        Some(Match::Views(mut views)) => {
                            views.insert(0, *view);
                            return Some(Match::Views(views));
                        }
                        Some(redirect) => return Some(redirect),
                        None => {}
                    }
                }
            }
        }
    }
    None
}

fn is_within(prefix: &str, path: &str) -> bool {
    prefix == "/" || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else {
        format!("{}/{child}", parent.trim_end_matches('/'))
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirects_to_root() {
        let resolved = resolve("/login").unwrap();
        assert_eq!(resolved.path, "/");
        assert_eq!(resolved.views, vec![ViewId::Layout]);
    }

    #[test]
    fn children_share_the_root_layout() {
        let notice = resolve("/notice").unwrap();
        let mail = resolve("/mail").unwrap();
        assert_eq!(notice.views, vec![ViewId::Layout, ViewId::Notice]);
        assert_eq!(mail.views, vec![ViewId::Layout, ViewId::Mail]);
        assert_ne!(notice.leaf(), mail.leaf());
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(resolve("/mail/?tab=records").unwrap().leaf(), Some(ViewId::Mail));
        assert_eq!(resolve("").unwrap().path, "/");
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert!(resolve("/settings").is_none());
        assert!(resolve("/notice/42").is_none());
        assert!(resolve("/mailbox").is_none());
    }

    #[test]
    fn exactly_one_layout_root() {
        let roots = ROUTES
            .iter()
            .filter(|r| matches!(r, Route::View { path, .. } if *path == "/"))
            .count();
        assert_eq!(roots, 1);
        assert_eq!(HISTORY_MODE, HistoryMode::Clean);
    }
}
