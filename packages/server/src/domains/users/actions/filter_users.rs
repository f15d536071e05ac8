//! User filter pipeline: scan, equality filters, count lookups, range filters,
//! sort, paginate.
//!
//! Every call scans the whole Users table; nothing is pushed down to an index.
//! Cost grows with the table size, not with the result size.

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::common::{Page, ValidatedPageArgs};
use crate::domains::users::data::{SortOrder, UserFilter, UserSort};
use crate::domains::users::models::User;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Filter, sort and paginate users.
///
/// `total_count` is the number of users that passed every predicate. Any storage
/// failure, including a single failed count lookup, fails the whole call.
pub async fn filter_users(
    filter: &UserFilter,
    page: &ValidatedPageArgs,
    sort: &UserSort,
    deps: &ServerDeps,
) -> Result<Page<User>> {
    info!(
        page = page.page(),
        page_size = page.page_size(),
        sort_by = ?sort.sort_by,
        "Filtering users"
    );

    let population = deps.users().scan().await?;
    let scanned = population.len();

    let candidates = apply_equality_filters(population, filter);
    debug!(scanned, remaining = candidates.len(), "Equality filters applied");

    let matched = if filter.has_count_bounds() {
        apply_count_filters(candidates, filter, deps).await?
    } else {
        candidates
    };

    let sorted = sort_users(matched, sort);
    Ok(Page::from_vec(sorted, page))
}

/// Case-insensitive equality, one full pass per set predicate.
fn apply_equality_filters(mut users: Vec<User>, filter: &UserFilter) -> Vec<User> {
    for (attribute, wanted) in filter.equality_predicates() {
        let Some(wanted) = wanted else { continue };
        let wanted = wanted.to_lowercase();
        users.retain(|user| {
            user.text_field(attribute)
                .unwrap_or_default()
                .to_lowercase()
                == wanted
        });
    }
    users
}

/// Look up hosted/attended counts, at most `count_lookup_concurrency` at a time,
/// and keep users within bounds.
///
/// Lookups complete in any order; results are put back in candidate order.
async fn apply_count_filters(
    candidates: Vec<User>,
    filter: &UserFilter,
    deps: &ServerDeps,
) -> Result<Vec<User>> {
    let user_events = &deps.user_events();
    let max_concurrent = deps.limits.count_lookup_concurrency.max(1);

    let mut scored: Vec<(usize, User)> = stream::iter(candidates.into_iter().enumerate())
        .map(|(position, user)| async move {
            let counts = user_events.event_counts(&user.id).await?;
            Ok::<_, anyhow::Error>((position, user, counts))
        })
        .buffer_unordered(max_concurrent)
        .try_filter_map(|(position, user, counts)| async move {
            Ok::<_, anyhow::Error>(filter.accepts_counts(counts).then_some((position, user)))
        })
        .try_collect()
        .await?;

    scored.sort_by_key(|(position, _)| *position);
    Ok(scored.into_iter().map(|(_, user)| user).collect())
}

/// Stable sort on the named attribute. Equal keys keep their prior order in
/// both directions.
fn sort_users(users: Vec<User>, sort: &UserSort) -> Vec<User> {
    let Some(field) = sort.sort_by.as_deref() else {
        return users;
    };

    let mut keyed: Vec<(String, User)> = users
        .into_iter()
        .map(|user| (user.sort_key(field), user))
        .collect();

    match sort.sort_order {
        SortOrder::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, user)| user).collect()
}
