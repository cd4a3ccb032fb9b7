use super::WorkflowError;
use super::graph::StatusGraph;

/// Anything that carries exactly one current status.
pub trait HasStatus<S> {
    fn status(&self) -> S;
}

impl<S: StatusGraph> HasStatus<S> for S {
    fn status(&self) -> S {
        *self
    }
}

/// Options for a single-entity "change status" affordance.
pub fn next_options_for<S: StatusGraph>(current: S) -> &'static [S] {
    current.allowed_next()
}

/// The status shared by every selected entity, if there is one.
pub fn common_status<S, E>(selected: &[E]) -> Option<S>
where
    S: StatusGraph,
    E: HasStatus<S>,
{
    let mut statuses = selected.iter().map(HasStatus::<S>::status);
    let first = statuses.next()?;
    statuses.all(|s| s == first).then_some(first)
}

/// Options for a bulk selection.
///
/// Empty for an empty selection and for any selection whose statuses are
/// not all identical, so a transition is never offered that would be
/// invalid for part of the selection.
pub fn next_options_for_bulk<S, E>(selected: &[E]) -> &'static [S]
where
    S: StatusGraph,
    E: HasStatus<S>,
{
    common_status(selected).map(next_options_for).unwrap_or(&[])
}

pub fn permits<S: StatusGraph>(current: S, target: S) -> bool {
    current.can_transition_to(target)
}

/// The check every status mutation runs before it is applied.
pub fn check<S: StatusGraph>(current: S, target: S) -> Result<(), WorkflowError> {
    if permits(current, target) {
        Ok(())
    } else {
        Err(WorkflowError::TransitionRefused {
            kind: S::KIND,
            from: current.as_str(),
            to: target.as_str(),
        })
    }
}

/// Bulk counterpart of [`check`]. Returns the common status on success.
pub fn check_bulk<S, E>(selected: &[E], target: S) -> Result<S, WorkflowError>
where
    S: StatusGraph,
    E: HasStatus<S>,
{
    if selected.is_empty() {
        return Err(WorkflowError::EmptySelection);
    }
    let common = common_status(selected).ok_or(WorkflowError::HeterogeneousSelection)?;
    check(common, target)?;
    Ok(common)
}
