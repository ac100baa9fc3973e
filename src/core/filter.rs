use crate::domain::model::SourceAvailability;
use crate::domain::services::ServiceRegistry;
use std::collections::BTreeSet;

/// Names of the tracked services distributing a title, or `None` when the
/// title is on none of them. Repeated provider ids collapse to one name.
pub fn match_services(
    availability: &SourceAvailability,
    registry: &ServiceRegistry,
) -> Option<BTreeSet<String>> {
    let matched: BTreeSet<String> = availability
        .provider_ids
        .iter()
        .filter_map(|id| registry.name_of(*id))
        .map(str::to_string)
        .collect();

    if matched.is_empty() {
        None
    } else {
        Some(matched)
    }
}
