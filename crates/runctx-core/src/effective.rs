use crate::model::namespace::{EFFECTIVE_DIRECTIVE, EFFECTIVE_RESOLVE};
use crate::model::Requirement;

/// Whether `requirement` takes part in this resolve pass
///
/// True when the `effective` directive is absent or `resolve`; any other
/// value (e.g. `active`) defers the requirement to a later stage.
pub fn is_effective(requirement: &Requirement) -> bool {
    requirement
        .directive(EFFECTIVE_DIRECTIVE)
        .map_or(true, |effective| effective == EFFECTIVE_RESOLVE)
}
