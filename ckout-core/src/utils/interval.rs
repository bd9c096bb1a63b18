/// Returns `true` when `value` lies in the closed interval `[min_value, max_value]`.
///
/// A missing bound leaves that side of the interval open.
pub fn is_number_in_interval<T: PartialOrd>(
    value: T,
    min_value: Option<T>,
    max_value: Option<T>,
) -> bool {
    min_value.as_ref().is_none_or(|min| *min <= value)
        && max_value.as_ref().is_none_or(|max| value <= *max)
}
