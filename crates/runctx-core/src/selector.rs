//! Repository selection for one resolution run

use std::collections::HashMap;
use std::sync::Arc;

use crate::repository::Repository;
use crate::run_spec::RunSpec;

/// Order and filter the available repositories according to `run_spec`
///
/// Without `run_repos` every repository is used in registry order. With it,
/// the result follows the listed order exactly: unknown names are dropped and
/// unlisted repositories are left out. When several repositories share a
/// name the last one registered wins.
pub fn select_repositories(
    available: Vec<Arc<dyn Repository>>,
    run_spec: &RunSpec,
) -> Vec<Arc<dyn Repository>> {
    let Some(names) = run_spec.run_repos() else {
        return available;
    };

    let mut by_name: HashMap<&str, &Arc<dyn Repository>> = HashMap::with_capacity(available.len());
    for repo in &available {
        by_name.insert(repo.name(), repo);
    }

    names
        .iter()
        .filter_map(|name| match by_name.get(name.as_str()) {
            Some(repo) => Some(Arc::clone(repo)),
            None => {
                tracing::debug!(repository = %name, "run repository not available, skipping");
                None
            }
        })
        .collect()
}
